use async_trait::async_trait;
use gallery_core::photo::{NewPhotoDocument, PhotoDocument};
use gallery_core::ports::{
    ClockPort, DocumentStoreError, DocumentStorePort, InsertedDocument, LiveQuery, PhotoQuery,
    QuerySnapshot, SnapshotResult,
};
use gallery_core::{PhotoId, TimestampMs};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

struct Listener {
    query: PhotoQuery,
    tx: mpsc::UnboundedSender<SnapshotResult>,
}

#[derive(Default)]
struct State {
    documents: Vec<PhotoDocument>,
    listeners: Vec<Listener>,
    last_server_ms: i64,
    insert_fault: Option<DocumentStoreError>,
}

impl State {
    fn snapshot_for(&self, query: &PhotoQuery) -> QuerySnapshot {
        let mut documents: Vec<PhotoDocument> = self
            .documents
            .iter()
            .filter(|doc| doc.fields.owner_id == query.owner_id)
            .cloned()
            .collect();
        // createdAt DESC; local writes without a server time come first
        documents.sort_by(|a, b| match (a.created_at, b.created_at) {
            (None, None) => a.id.as_str().cmp(b.id.as_str()),
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(a_ts), Some(b_ts)) => b_ts.cmp(&a_ts),
        });
        QuerySnapshot { documents }
    }

    /// Push the current result set to every listener whose query matches
    /// `owner`, dropping listeners whose receiver is gone.
    fn notify(&mut self, owner: &gallery_core::UserId) {
        self.listeners.retain(|listener| !listener.tx.is_closed());

        let snapshots: Vec<(usize, QuerySnapshot)> = self
            .listeners
            .iter()
            .enumerate()
            .filter(|(_, listener)| &listener.query.owner_id == owner)
            .map(|(index, listener)| (index, self.snapshot_for(&listener.query)))
            .collect();

        for (index, snapshot) in snapshots {
            // A failed send means the receiver closed since the retain above
            let _ = self.listeners[index].tx.send(Ok(snapshot));
        }
    }

    fn next_server_time(&mut self, now_ms: i64) -> TimestampMs {
        self.last_server_ms = now_ms.max(self.last_server_ms + 1);
        TimestampMs::from_epoch_millis(self.last_server_ms)
    }
}

/// Realtime document store held in memory.
///
/// An insert is delivered to matching listeners twice: first as a local
/// write with a pending `createdAt`, then again once the server timestamp
/// is assigned. Server timestamps are strictly increasing.
pub struct InMemoryDocumentStore {
    state: Mutex<State>,
    clock: Arc<dyn ClockPort>,
    latency_compensation: bool,
}

impl InMemoryDocumentStore {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
            latency_compensation: true,
        }
    }

    /// Deliver each insert only once, already carrying its server timestamp.
    pub fn without_latency_compensation(mut self) -> Self {
        self.latency_compensation = false;
        self
    }

    /// Make the next insert fail with `err`.
    pub async fn fail_next_insert(&self, err: DocumentStoreError) {
        self.state.lock().await.insert_fault = Some(err);
    }

    /// Push `err` to every open listener and drop them, as the hosted store
    /// does when it revokes a query.
    pub async fn fail_listeners(&self, err: DocumentStoreError) {
        let mut state = self.state.lock().await;
        for listener in state.listeners.drain(..) {
            let _ = listener.tx.send(Err(err.clone()));
        }
        warn!(error = %err, "Live queries failed");
    }

    /// Listeners whose receiving side is still open.
    pub async fn active_listeners(&self) -> usize {
        let mut state = self.state.lock().await;
        state.listeners.retain(|listener| !listener.tx.is_closed());
        state.listeners.len()
    }

    pub async fn documents(&self) -> Vec<PhotoDocument> {
        self.state.lock().await.documents.clone()
    }
}

#[async_trait]
impl DocumentStorePort for InMemoryDocumentStore {
    async fn insert(
        &self,
        document: NewPhotoDocument,
    ) -> Result<InsertedDocument, DocumentStoreError> {
        let mut state = self.state.lock().await;
        if let Some(err) = state.insert_fault.take() {
            return Err(err);
        }

        let id = PhotoId::from(uuid::Uuid::new_v4().simple().to_string());
        let owner = document.owner_id.clone();
        state.documents.push(PhotoDocument {
            id: id.clone(),
            fields: document,
            created_at: None,
        });
        if self.latency_compensation {
            state.notify(&owner);
        }

        let created_at = state.next_server_time(self.clock.now_ms());
        if let Some(doc) = state.documents.iter_mut().find(|doc| doc.id == id) {
            doc.created_at = Some(created_at);
        }
        state.notify(&owner);

        debug!(photo_id = %id, created_at = created_at.as_millis(), "Document committed");
        Ok(InsertedDocument { id, created_at })
    }

    async fn live_query(&self, query: PhotoQuery) -> Result<LiveQuery, DocumentStoreError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.state.lock().await;

        let initial = state.snapshot_for(&query);
        tx.send(Ok(initial))
            .map_err(|_| DocumentStoreError::Listener("listener closed on registration".into()))?;
        state.listeners.push(Listener { query, tx });

        Ok(LiveQuery::new(rx))
    }
}
