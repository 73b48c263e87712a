//! In-memory backing for tests and ephemeral sessions.

use super::BackingStore;
use crate::error::Result;
use parking_lot::Mutex;
use std::collections::HashMap;

/// In-memory backing store. Does NOT survive the process.
#[derive(Default)]
pub struct MemoryBacking {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBacking {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackingStore for MemoryBacking {
    fn load(&self, store: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().get(store).cloned())
    }

    fn save(&self, store: &str, payload: &[u8]) -> Result<()> {
        self.entries.lock().insert(store.to_string(), payload.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_store() {
        let backing = MemoryBacking::new();
        assert!(backing.load("trends").unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let backing = MemoryBacking::new();
        backing.save("trends", b"{}").unwrap();
        assert_eq!(backing.load("trends").unwrap().unwrap(), b"{}");
    }

    #[test]
    fn test_save_replaces_previous_blob() {
        let backing = MemoryBacking::new();
        backing.save("drafts", b"[1]").unwrap();
        backing.save("drafts", b"[1,2]").unwrap();
        assert_eq!(backing.load("drafts").unwrap().unwrap(), b"[1,2]");
    }
}
