use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sha2::{Digest, Sha256};
use tokio::task::JoinHandle;

use super::storage::DraftStore;
use super::types::DraftPatch;

/// Quiet period after the last edit before an autosave fires
pub const AUTOSAVE_DEBOUNCE_MS: u64 = 500;

// ==================== Debouncer ====================

/// Cancellable debounce timer owning an abortable task handle and a
/// monotonic sequence counter. Re-scheduling supersedes the pending timer
/// outright; a superseded callback never runs.
pub struct Debouncer {
    delay: Duration,
    seq: Arc<AtomicU64>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            seq: Arc::new(AtomicU64::new(0)),
            handle: Mutex::new(None),
        }
    }

    /// Run `f` after the quiet period, unless superseded or cancelled first.
    /// Returns the sequence number assigned to this schedule.
    pub fn schedule<F>(&self, f: F) -> u64
    where
        F: FnOnce() + Send + 'static,
    {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let seq_counter = self.seq.clone();
        let delay = self.delay;

        let mut handle = self.handle.lock().unwrap();
        if let Some(pending) = handle.take() {
            pending.abort();
        }
        *handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Only the most recently issued schedule may fire
            if seq_counter.load(Ordering::SeqCst) == seq {
                f();
            }
        }));

        seq
    }

    /// Cancel any pending schedule; the timer is aborted, not merely ignored
    pub fn cancel(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
        let mut handle = self.handle.lock().unwrap();
        if let Some(pending) = handle.take() {
            pending.abort();
        }
    }

    /// Whether the given sequence number is still the latest issued
    pub fn is_current(&self, seq: u64) -> bool {
        self.seq.load(Ordering::SeqCst) == seq
    }
}

// ==================== Draft Autosave ====================

/// Debounced autosave for the in-progress draft.
///
/// Bursts of edits coalesce into a single save after the quiet period;
/// `flush` performs the save immediately (the page-unload path), so edits
/// in the trailing debounce window are not lost. Payloads identical to the
/// last persisted one are skipped by content hash.
pub struct DraftAutosave {
    store: Arc<DraftStore>,
    debouncer: Debouncer,
    pending: Arc<Mutex<Option<DraftPatch>>>,
    last_saved_hash: Arc<Mutex<Option<String>>>,
}

impl DraftAutosave {
    pub fn new(store: Arc<DraftStore>) -> Self {
        Self::with_delay(store, Duration::from_millis(AUTOSAVE_DEBOUNCE_MS))
    }

    pub fn with_delay(store: Arc<DraftStore>, delay: Duration) -> Self {
        Self {
            store,
            debouncer: Debouncer::new(delay),
            pending: Arc::new(Mutex::new(None)),
            last_saved_hash: Arc::new(Mutex::new(None)),
        }
    }

    /// Record the latest form state and (re)arm the save timer
    pub fn schedule(&self, patch: DraftPatch) {
        *self.pending.lock().unwrap() = Some(patch);

        let store = self.store.clone();
        let pending = self.pending.clone();
        let last_saved_hash = self.last_saved_hash.clone();
        self.debouncer.schedule(move || {
            save_pending(&store, &pending, &last_saved_hash);
        });
    }

    /// Save any pending patch right now. Returns true if a write happened.
    pub fn flush(&self) -> bool {
        self.debouncer.cancel();
        save_pending(&self.store, &self.pending, &self.last_saved_hash)
    }

    /// Drop any pending save without writing
    pub fn cancel(&self) {
        self.debouncer.cancel();
        *self.pending.lock().unwrap() = None;
    }

    /// Forget the last persisted payload hash (after a clear, the next
    /// autosave must write even if the form state is unchanged)
    pub fn reset_dedup(&self) {
        *self.last_saved_hash.lock().unwrap() = None;
    }
}

fn save_pending(
    store: &DraftStore,
    pending: &Mutex<Option<DraftPatch>>,
    last_saved_hash: &Mutex<Option<String>>,
) -> bool {
    let patch = match pending.lock().unwrap().take() {
        Some(patch) => patch,
        None => return false,
    };

    let hash = hash_payload(&patch);
    {
        let last = last_saved_hash.lock().unwrap();
        if last.as_ref() == Some(&hash) {
            tracing::debug!("autosave skipped: payload unchanged");
            return false;
        }
    }

    if store.save(&patch) {
        *last_saved_hash.lock().unwrap() = Some(hash);
        true
    } else {
        false
    }
}

/// SHA-256 of the serialized patch, for skipping redundant writes
fn hash_payload(patch: &DraftPatch) -> String {
    let serialized = serde_json::to_string(patch).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryStore, StoreError};
    use std::sync::atomic::AtomicUsize;

    /// MemoryStore wrapper that counts writes
    struct CountingStore {
        inner: MemoryStore,
        writes: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                writes: AtomicUsize::new(0),
            }
        }
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    fn titled_patch(title: &str) -> DraftPatch {
        DraftPatch {
            title: Some(title.to_string()),
            site_id: Some("site-a".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_burst_of_edits_coalesces_to_one_save() {
        let kv = Arc::new(CountingStore::new());
        let store = Arc::new(DraftStore::new(kv.clone()));
        let autosave = DraftAutosave::with_delay(store.clone(), Duration::from_millis(20));

        autosave.schedule(titled_patch("a"));
        autosave.schedule(titled_patch("ab"));
        autosave.schedule(titled_patch("abc"));

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert_eq!(kv.writes.load(Ordering::SeqCst), 1);
        let loaded = store.load("site-a").unwrap();
        assert_eq!(loaded.title, "abc");
    }

    #[tokio::test]
    async fn test_flush_saves_without_waiting() {
        let kv = Arc::new(CountingStore::new());
        let store = Arc::new(DraftStore::new(kv.clone()));
        let autosave = DraftAutosave::with_delay(store.clone(), Duration::from_secs(60));

        autosave.schedule(titled_patch("unload me"));
        assert!(autosave.flush());

        let loaded = store.load("site-a").unwrap();
        assert_eq!(loaded.title, "unload me");
    }

    #[tokio::test]
    async fn test_unchanged_payload_skipped() {
        let kv = Arc::new(CountingStore::new());
        let store = Arc::new(DraftStore::new(kv.clone()));
        let autosave = DraftAutosave::with_delay(store, Duration::from_secs(60));

        autosave.schedule(titled_patch("same"));
        assert!(autosave.flush());

        autosave.schedule(titled_patch("same"));
        assert!(!autosave.flush());

        assert_eq!(kv.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancel_drops_pending_save() {
        let kv = Arc::new(CountingStore::new());
        let store = Arc::new(DraftStore::new(kv.clone()));
        let autosave = DraftAutosave::with_delay(store, Duration::from_millis(20));

        autosave.schedule(titled_patch("never"));
        autosave.cancel();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(kv.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_flush_with_nothing_pending_is_noop() {
        let kv = Arc::new(CountingStore::new());
        let store = Arc::new(DraftStore::new(kv));
        let autosave = DraftAutosave::with_delay(store, Duration::from_millis(20));

        assert!(!autosave.flush());
    }
}
