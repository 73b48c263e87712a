//! Session: the composition root owning both stores.
//!
//! One instance per process replaces the original app's global singleton:
//! the session wires a backing store, the background snapshot writer, the
//! subscription bus, and the two collection stores, and is passed by
//! reference to consumers.

use crate::backing::{BackingStore, FileBacking, MemoryBacking};
use crate::drafts::DraftStore;
use crate::error::Result;
use crate::feed::TrendFeed;
use crate::persist::SnapshotWriter;
use crate::subscriptions::{SubscriptionConfig, SubscriptionHandle, SubscriptionManager};
use crate::trends::TrendStore;
use std::path::PathBuf;
use std::sync::Arc;

/// Session configuration.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Directory holding the session's snapshot files.
    pub path: PathBuf,

    /// Whether to create the directory if it doesn't exist. When `false`,
    /// opening a missing directory fails with
    /// [`StoreError::NotInitialized`](crate::StoreError::NotInitialized)
    /// instead of silently starting empty.
    pub create_if_missing: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./trendline"),
            create_if_missing: true,
        }
    }
}

/// A running session: both stores plus their shared plumbing.
pub struct Session {
    trends: TrendStore,
    drafts: DraftStore,
    subscriptions: Arc<SubscriptionManager>,
    writer: Arc<SnapshotWriter>,
}

impl Session {
    /// Open a file-backed session.
    pub fn open(config: SessionConfig, feed: Arc<dyn TrendFeed>) -> Result<Self> {
        let backing: Arc<dyn BackingStore> = if config.create_if_missing {
            Arc::new(FileBacking::open_or_create(&config.path)?)
        } else {
            Arc::new(FileBacking::open(&config.path)?)
        };
        Self::with_backing(backing, feed)
    }

    /// Open a session over an in-memory backing (tests, previews).
    pub fn in_memory(feed: Arc<dyn TrendFeed>) -> Result<Self> {
        Self::with_backing(Arc::new(MemoryBacking::new()), feed)
    }

    /// Open a session over any backing implementation.
    pub fn with_backing(backing: Arc<dyn BackingStore>, feed: Arc<dyn TrendFeed>) -> Result<Self> {
        let writer = Arc::new(SnapshotWriter::spawn(Arc::clone(&backing)));
        let subscriptions = Arc::new(SubscriptionManager::new());

        let trends = TrendStore::load(
            backing.as_ref(),
            Arc::clone(&writer),
            Arc::clone(&subscriptions),
            feed,
        )?;
        let drafts = DraftStore::load(
            backing.as_ref(),
            Arc::clone(&writer),
            Arc::clone(&subscriptions),
        )?;

        Ok(Self {
            trends,
            drafts,
            subscriptions,
            writer,
        })
    }

    /// The trend store.
    pub fn trends(&self) -> &TrendStore {
        &self.trends
    }

    /// The draft store.
    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    /// Subscribe to store events.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.subscriptions.subscribe(config)
    }

    /// Block until every snapshot enqueued so far is durable. For shutdown
    /// hooks; regular mutations never wait.
    pub fn flush(&self) {
        self.writer.flush();
    }

    /// The most recent persistence failure this session, if any.
    pub fn last_persist_error(&self) -> Option<String> {
        self.writer.last_error()
    }
}
