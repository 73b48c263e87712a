//! Draft store: persisted collection of draft posts, newest first.

use crate::backing::BackingStore;
use crate::collection::Collection;
use crate::error::{Result, StoreError};
use crate::persist::SnapshotWriter;
use crate::subscriptions::{StoreEvent, SubscriptionManager};
use crate::types::{Draft, DraftInput, DraftPatch};
use chrono::Utc;
use parking_lot::RwLock;
use std::sync::Arc;

/// Backing-store key for the draft snapshot.
const STORE_KEY: &str = "drafts";

/// Store for draft posts. The whole collection is the persisted subset.
pub struct DraftStore {
    drafts: RwLock<Collection<Draft>>,
    writer: Arc<SnapshotWriter>,
    subscriptions: Arc<SubscriptionManager>,
}

impl DraftStore {
    /// Load the draft collection from the backing store.
    pub(crate) fn load(
        backing: &dyn BackingStore,
        writer: Arc<SnapshotWriter>,
        subscriptions: Arc<SubscriptionManager>,
    ) -> Result<Self> {
        let drafts = match backing.load(STORE_KEY)? {
            Some(bytes) => serde_json::from_slice::<Vec<Draft>>(&bytes)
                .map_err(|e| StoreError::Deserialization(e.to_string()))?,
            None => Vec::new(),
        };

        Ok(Self {
            drafts: RwLock::new(Collection::from_items(drafts)),
            writer,
            subscriptions,
        })
    }

    /// Create a draft: fresh id, equal creation and modification stamps,
    /// prepended so the collection stays newest-first. Returns the created
    /// record.
    pub fn create(&self, input: DraftInput) -> Draft {
        let draft = Draft::create(input, Utc::now());

        let snapshot = {
            let mut drafts = self.drafts.write();
            drafts.push_front(draft.clone());
            encode_snapshot(&drafts)
        };

        self.persist(snapshot);
        self.subscriptions.broadcast(StoreEvent::DraftCreated {
            draft: draft.clone(),
        });
        draft
    }

    /// Merge a patch into an existing draft, refreshing `updated_at`.
    /// Silent no-op (returns `false`) when the id is absent.
    pub fn update(&self, id: &str, patch: DraftPatch) -> bool {
        let mut updated = None;
        let snapshot = {
            let mut drafts = self.drafts.write();
            let touched = drafts.merge(id, |draft| {
                draft.apply(patch, Utc::now());
                updated = Some(draft.clone());
            });
            if !touched {
                return false;
            }
            encode_snapshot(&drafts)
        };

        self.persist(snapshot);
        if let Some(draft) = updated {
            self.subscriptions
                .broadcast(StoreEvent::DraftUpdated { draft });
        }
        true
    }

    /// Delete a draft. Silent no-op (returns `false`) when the id is absent.
    pub fn delete(&self, id: &str) -> bool {
        let snapshot = {
            let mut drafts = self.drafts.write();
            if drafts.remove(id).is_none() {
                return false;
            }
            encode_snapshot(&drafts)
        };

        self.persist(snapshot);
        self.subscriptions.broadcast(StoreEvent::DraftDeleted {
            id: id.to_string(),
        });
        true
    }

    /// Synchronous lookup; `None` on a missing id, never an error.
    pub fn get(&self, id: &str) -> Option<Draft> {
        self.drafts.read().get(id).cloned()
    }

    /// Snapshot of all drafts, newest first.
    pub fn drafts(&self) -> Vec<Draft> {
        self.drafts.read().snapshot()
    }

    pub fn len(&self) -> usize {
        self.drafts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.read().is_empty()
    }

    fn persist(&self, snapshot: Option<Vec<u8>>) {
        if let Some(bytes) = snapshot {
            self.writer.submit(STORE_KEY, bytes);
        }
    }
}

/// Serialize the whole collection; see the trend store for why encoding
/// failures are logged rather than propagated.
fn encode_snapshot(drafts: &Collection<Draft>) -> Option<Vec<u8>> {
    match serde_json::to_vec(drafts.as_slice()) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode draft snapshot");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backing::MemoryBacking;

    fn store() -> (DraftStore, Arc<MemoryBacking>) {
        let backing = Arc::new(MemoryBacking::new());
        let writer = Arc::new(SnapshotWriter::spawn(backing.clone()));
        let subs = Arc::new(SubscriptionManager::new());
        let store = DraftStore::load(backing.as_ref(), writer, subs).unwrap();
        (store, backing)
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let (store, _) = store();

        let d1 = store.create(DraftInput::new("first"));
        let d2 = store.create(DraftInput::new("second"));

        assert_ne!(d1.id, d2.id);
        assert_eq!(d1.created_at, d1.updated_at);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_drafts_are_newest_first() {
        let (store, _) = store();

        store.create(DraftInput::new("D1"));
        store.create(DraftInput::new("D2"));

        let captions: Vec<String> = store.drafts().into_iter().map(|d| d.caption).collect();
        assert_eq!(captions, vec!["D2".to_string(), "D1".to_string()]);
    }

    #[test]
    fn test_update_merges_and_bumps_updated_at() {
        let (store, _) = store();
        let draft = store.create(
            DraftInput::new("caption").with_hashtags(vec!["#trend".into()]),
        );

        assert!(store.update(&draft.id, DraftPatch::default().caption("new caption")));

        let updated = store.get(&draft.id).unwrap();
        assert_eq!(updated.caption, "new caption");
        assert_eq!(updated.hashtags, vec!["#trend".to_string()]);
        assert_eq!(updated.created_at, draft.created_at);
        assert!(updated.updated_at >= draft.updated_at);
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let (store, _) = store();
        store.create(DraftInput::new("only"));

        let before = store.drafts();
        assert!(!store.update("ghost", DraftPatch::default().caption("x")));
        assert_eq!(store.drafts(), before);
    }

    #[test]
    fn test_delete_missing_id_is_noop() {
        let (store, _) = store();
        store.create(DraftInput::new("only"));

        let before = store.drafts();
        assert!(!store.delete("ghost"));
        assert_eq!(store.drafts(), before);
    }

    #[test]
    fn test_delete_removes_draft() {
        let (store, _) = store();
        let draft = store.create(DraftInput::new("doomed"));

        assert!(store.delete(&draft.id));
        assert!(store.get(&draft.id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_whole_collection_is_persisted() {
        let (store, backing) = store();
        store.create(DraftInput::new("D1"));
        store.create(DraftInput::new("D2"));
        drop(store);

        let bytes = backing.load(STORE_KEY).unwrap().unwrap();
        let persisted: Vec<Draft> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[0].caption, "D2");
    }

    #[test]
    fn test_corrupt_snapshot_fails_load() {
        let backing = Arc::new(MemoryBacking::new());
        backing.save(STORE_KEY, b"{broken").unwrap();

        let writer = Arc::new(SnapshotWriter::spawn(backing.clone()));
        let result = DraftStore::load(
            backing.as_ref(),
            writer,
            Arc::new(SubscriptionManager::new()),
        );
        assert!(matches!(result, Err(StoreError::Deserialization(_))));
    }
}
