use async_trait::async_trait;
use tokio::sync::mpsc;

use super::errors::DocumentStoreError;
use crate::ids::{PhotoId, UserId};
use crate::photo::{NewPhotoDocument, PhotoDocument, TimestampMs};

/// `userId == owner ORDER BY createdAt DESC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoQuery {
    pub owner_id: UserId,
}

impl PhotoQuery {
    pub fn for_owner(owner_id: UserId) -> Self {
        Self { owner_id }
    }
}

/// Acknowledgement of a committed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertedDocument {
    pub id: PhotoId,
    /// Server-assigned creation time.
    pub created_at: TimestampMs,
}

/// Full result set of a live query at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySnapshot {
    pub documents: Vec<PhotoDocument>,
}

pub type SnapshotResult = Result<QuerySnapshot, DocumentStoreError>;

/// Stream of snapshots for one registered listener.
///
/// Dropping it (or calling [`close`](Self::close)) releases the listener on
/// the store side.
#[derive(Debug)]
pub struct LiveQuery {
    receiver: mpsc::UnboundedReceiver<SnapshotResult>,
}

impl LiveQuery {
    pub fn new(receiver: mpsc::UnboundedReceiver<SnapshotResult>) -> Self {
        Self { receiver }
    }

    /// Next snapshot or error; `None` once the store has closed the stream.
    pub async fn next(&mut self) -> Option<SnapshotResult> {
        self.receiver.recv().await
    }

    pub fn close(&mut self) {
        self.receiver.close();
    }
}

#[async_trait]
pub trait DocumentStorePort: Send + Sync {
    /// Commit a document; the store stamps `createdAt`.
    async fn insert(&self, document: NewPhotoDocument)
        -> Result<InsertedDocument, DocumentStoreError>;

    /// Register a listener. The current result set is delivered first.
    async fn live_query(&self, query: PhotoQuery) -> Result<LiveQuery, DocumentStoreError>;
}
