//! Owner-scoped, newest-first projection of the photo collection.
//!
//! A view is rebuilt from scratch on every live-query snapshot; it is never
//! patched in place.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::{PhotoDocument, PhotoRecord, TimestampMs};
use crate::ids::{PhotoId, UserId};

/// First local receipt time of every document still awaiting its server
/// timestamp.
///
/// Kept across snapshots of one subscription so a pending record keeps the
/// same substitute time until the server value lands.
#[derive(Debug, Default, Clone)]
pub struct PendingReceipts {
    first_seen: HashMap<PhotoId, TimestampMs>,
}

impl PendingReceipts {
    pub fn new() -> Self {
        Self::default()
    }

    fn receipt_for(&mut self, id: &PhotoId, received_at: TimestampMs) -> TimestampMs {
        *self.first_seen.entry(id.clone()).or_insert(received_at)
    }

    pub fn len(&self) -> usize {
        self.first_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionView {
    owner: UserId,
    photos: Vec<PhotoRecord>,
}

impl CollectionView {
    pub fn empty(owner: UserId) -> Self {
        Self {
            owner,
            photos: Vec::new(),
        }
    }

    /// Materialize one live-query snapshot.
    ///
    /// Records with a pending server timestamp take their first local receipt
    /// time and sort ahead of every committed record: the server will stamp
    /// them no earlier than anything already committed, so they stay on top
    /// when the real value arrives instead of jumping around.
    pub fn project(
        owner: &UserId,
        documents: Vec<PhotoDocument>,
        received_at: TimestampMs,
        pending: &mut PendingReceipts,
    ) -> Self {
        let mut rows: Vec<(bool, PhotoRecord)> = Vec::with_capacity(documents.len());
        let mut still_pending = Vec::new();

        for doc in documents {
            if &doc.fields.owner_id != owner {
                continue;
            }
            let is_pending = doc.is_pending();
            let fallback = if is_pending {
                still_pending.push(doc.id.clone());
                pending.receipt_for(&doc.id, received_at)
            } else {
                received_at
            };
            rows.push((is_pending, doc.into_record(fallback)));
        }

        pending
            .first_seen
            .retain(|id, _| still_pending.contains(id));

        rows.sort_by(|(a_pending, a), (b_pending, b)| {
            b_pending
                .cmp(a_pending)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| tie_break(a, b))
        });

        Self {
            owner: owner.clone(),
            photos: rows.into_iter().map(|(_, record)| record).collect(),
        }
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn photos(&self) -> &[PhotoRecord] {
        &self.photos
    }

    pub fn into_photos(self) -> Vec<PhotoRecord> {
        self.photos
    }

    pub fn get(&self, id: &PhotoId) -> Option<&PhotoRecord> {
        self.photos.iter().find(|photo| &photo.id == id)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhotoRecord> {
        self.photos.iter()
    }
}

fn tie_break(a: &PhotoRecord, b: &PhotoRecord) -> Ordering {
    a.id.as_str().cmp(b.id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::UploadId;
    use crate::photo::{MimeType, NewPhotoDocument, StoragePath};

    fn doc(id: &str, owner: &str, created_at: Option<i64>) -> PhotoDocument {
        let owner_id = UserId::from(owner);
        let path = StoragePath::derive(&owner_id, &UploadId::from(id), &format!("{id}.png"));
        PhotoDocument {
            id: PhotoId::from(id),
            fields: NewPhotoDocument {
                owner_id,
                download_url: format!("https://cdn.example/{path}"),
                title: format!("{id}.png"),
                byte_size: 10,
                mime_type: MimeType::image_png(),
                file_name: path.file_name().to_string(),
                storage_path: path,
            },
            created_at: created_at.map(TimestampMs::from_epoch_millis),
        }
    }

    fn ids(view: &CollectionView) -> Vec<&str> {
        view.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_orders_newest_first() {
        let owner = UserId::from("uid-1");
        let mut pending = PendingReceipts::new();
        let view = CollectionView::project(
            &owner,
            vec![doc("a", "uid-1", Some(10)), doc("b", "uid-1", Some(30)), doc("c", "uid-1", Some(20))],
            TimestampMs::from_epoch_millis(100),
            &mut pending,
        );

        assert_eq!(ids(&view), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_drops_foreign_documents() {
        let owner = UserId::from("uid-1");
        let mut pending = PendingReceipts::new();
        let view = CollectionView::project(
            &owner,
            vec![doc("a", "uid-1", Some(10)), doc("x", "uid-2", Some(50))],
            TimestampMs::from_epoch_millis(100),
            &mut pending,
        );

        assert_eq!(ids(&view), vec!["a"]);
        assert_eq!(view.owner(), &owner);
    }

    #[test]
    fn test_pending_record_sorts_first_even_with_lagging_local_clock() {
        let owner = UserId::from("uid-1");
        let mut pending = PendingReceipts::new();
        // local clock is behind the server: receipt time 5 < committed 30
        let view = CollectionView::project(
            &owner,
            vec![doc("old", "uid-1", Some(30)), doc("new", "uid-1", None)],
            TimestampMs::from_epoch_millis(5),
            &mut pending,
        );

        assert_eq!(ids(&view), vec!["new", "old"]);
        assert_eq!(view.get(&PhotoId::from("new")).unwrap().created_at.as_millis(), 5);
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn test_pending_receipt_time_is_stable_until_committed() {
        let owner = UserId::from("uid-1");
        let mut pending = PendingReceipts::new();
        CollectionView::project(
            &owner,
            vec![doc("new", "uid-1", None)],
            TimestampMs::from_epoch_millis(5),
            &mut pending,
        );
        let second = CollectionView::project(
            &owner,
            vec![doc("new", "uid-1", None)],
            TimestampMs::from_epoch_millis(9),
            &mut pending,
        );
        assert_eq!(second.photos()[0].created_at.as_millis(), 5);

        let committed = CollectionView::project(
            &owner,
            vec![doc("new", "uid-1", Some(40)), doc("old", "uid-1", Some(30))],
            TimestampMs::from_epoch_millis(12),
            &mut pending,
        );
        assert_eq!(ids(&committed), vec!["new", "old"]);
        assert_eq!(committed.photos()[0].created_at.as_millis(), 40);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_equal_timestamps_have_a_total_order() {
        let owner = UserId::from("uid-1");
        let mut pending = PendingReceipts::new();
        let first = CollectionView::project(
            &owner,
            vec![doc("b", "uid-1", Some(10)), doc("a", "uid-1", Some(10))],
            TimestampMs::from_epoch_millis(100),
            &mut pending,
        );
        let second = CollectionView::project(
            &owner,
            vec![doc("a", "uid-1", Some(10)), doc("b", "uid-1", Some(10))],
            TimestampMs::from_epoch_millis(100),
            &mut pending,
        );
        assert_eq!(ids(&first), ids(&second));
    }
}
