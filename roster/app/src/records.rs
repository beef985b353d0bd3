//! Whole-value persistence on top of a [`KeyValueStore`].
//!
//! Reads fail soft: anything that cannot be read or decoded comes back as the
//! default value. Writes are fire-and-forget and funnelled through a single
//! writer task, so they reach the store in the order they were issued.

use crate::storage::KeyValueStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use tracing_futures::Instrument;

#[derive(Debug)]
enum WriteOp {
    Set { key: String, value: String },
    Remove { key: String },
    Flush(oneshot::Sender<()>),
}

/// Record Store Adapter shared by all sessions of one store.
///
/// Cloning is cheap; all clones feed the same writer. The writer task stops
/// once every clone has been dropped and the queue is drained.
#[derive(Clone)]
pub struct RecordStore {
    store: Arc<dyn KeyValueStore>,
    writes: mpsc::UnboundedSender<WriteOp>,
}

impl RecordStore {
    /// Spawns the writer task. Must be called from within a tokio runtime.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (writes, queue) = mpsc::unbounded_channel();
        let writer = run_writer(Arc::clone(&store), queue);
        tokio::spawn(writer.instrument(tracing::debug_span!("record_writer")));
        RecordStore { store, writes }
    }

    /// Loads the value stored under `key`.
    ///
    /// Pending writes are flushed first. A missing key, a storage error or an
    /// undecodable value all yield `T::default()`.
    #[tracing::instrument(skip(self))]
    pub async fn load<T>(&self, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        self.flush().await;

        let raw = match self.store.get_item(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored value, starting empty");
                return T::default();
            }
            Err(err) => {
                warn!("Failed to read stored value: {}", err);
                return T::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!("Failed to decode stored value: {}", err);
            T::default()
        })
    }

    /// Serializes `value` now and queues it to overwrite `key`.
    #[tracing::instrument(skip(self, value))]
    pub fn save<T>(&self, key: &str, value: &T)
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_string(value) {
            Ok(value) => self.enqueue(WriteOp::Set {
                key: key.to_string(),
                value,
            }),
            Err(err) => warn!("Failed to encode value, not saved: {}", err),
        }
    }

    /// Queues removal of `key`.
    #[tracing::instrument(skip(self))]
    pub fn clear(&self, key: &str) {
        self.enqueue(WriteOp::Remove {
            key: key.to_string(),
        });
    }

    /// Waits until every write issued before this call has been applied.
    pub async fn flush(&self) {
        let (done, applied) = oneshot::channel();
        self.enqueue(WriteOp::Flush(done));
        let _ = applied.await;
    }

    fn enqueue(&self, op: WriteOp) {
        if let Err(err) = self.writes.send(op) {
            warn!("Record writer has stopped, dropping {:?}", err.0);
        }
    }
}

async fn run_writer(store: Arc<dyn KeyValueStore>, mut queue: mpsc::UnboundedReceiver<WriteOp>) {
    while let Some(op) = queue.recv().await {
        match op {
            WriteOp::Set { key, value } => {
                debug!("Writing {} bytes to '{}'", value.len(), key);
                if let Err(err) = store.set_item(&key, &value).await {
                    warn!("Failed to write '{}': {}", key, err);
                }
            }
            WriteOp::Remove { key } => {
                debug!("Removing '{}'", key);
                if let Err(err) = store.remove_item(&key).await {
                    warn!("Failed to remove '{}': {}", key, err);
                }
            }
            WriteOp::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Record writer stopped");
}
