//! Trend store: fetched working list, persisted saved subset, category
//! preference.
//!
//! The working list is session-scoped and re-fetched from the feed; only
//! the saved subset and the selected category are mirrored to the backing
//! store. Every mutation commits in memory first, enqueues a snapshot with
//! the background writer, then notifies subscribers.

use crate::backing::BackingStore;
use crate::collection::Collection;
use crate::error::{Result, StoreError};
use crate::feed::TrendFeed;
use crate::persist::SnapshotWriter;
use crate::subscriptions::{StoreEvent, SubscriptionManager};
use crate::types::{CategoryFilter, SavedTrend, Trend};
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Backing-store key for the trend snapshot.
const STORE_KEY: &str = "trends";

/// The persisted subset: saved trends plus the category preference.
/// The working list is deliberately absent.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TrendSnapshot {
    saved: Vec<SavedTrend>,
    #[serde(default)]
    selected_category: CategoryFilter,
}

struct TrendState {
    working: Collection<Trend>,
    saved: Collection<SavedTrend>,
    selected: CategoryFilter,
}

/// Store for the trend feed and the user's saved trends.
pub struct TrendStore {
    state: RwLock<TrendState>,
    feed: Arc<dyn TrendFeed>,
    writer: Arc<SnapshotWriter>,
    subscriptions: Arc<SubscriptionManager>,

    /// Outstanding fetches; the busy flag is `in_flight > 0` so an early
    /// completion does not clear it while a newer fetch is still out.
    in_flight: AtomicU64,

    /// Monotonic refresh generation; completions that are no longer the
    /// newest generation are discarded instead of clobbering the list.
    refresh_generation: AtomicU64,
}

impl TrendStore {
    /// Load the persisted subset from the backing store.
    ///
    /// A corrupt snapshot fails loudly here rather than silently starting
    /// empty over the user's saved data.
    pub(crate) fn load(
        backing: &dyn BackingStore,
        writer: Arc<SnapshotWriter>,
        subscriptions: Arc<SubscriptionManager>,
        feed: Arc<dyn TrendFeed>,
    ) -> Result<Self> {
        let snapshot = match backing.load(STORE_KEY)? {
            Some(bytes) => serde_json::from_slice::<TrendSnapshot>(&bytes)
                .map_err(|e| StoreError::Deserialization(e.to_string()))?,
            None => TrendSnapshot::default(),
        };

        Ok(Self {
            state: RwLock::new(TrendState {
                working: Collection::new(),
                saved: Collection::from_items(snapshot.saved),
                selected: snapshot.selected_category,
            }),
            feed,
            writer,
            subscriptions,
            in_flight: AtomicU64::new(0),
            refresh_generation: AtomicU64::new(0),
        })
    }

    // --- Working List ---

    /// Snapshot of the current working list.
    pub fn trending(&self) -> Vec<Trend> {
        self.state.read().working.snapshot()
    }

    /// Re-fetch the working list from the feed.
    ///
    /// On success the entire working list is replaced. On failure the list
    /// is left untouched, the error goes to the log and a `RefreshFailed`
    /// event, and the caller just sees `false`; a fetch failure is never an
    /// error to the UI. Returns whether the list was replaced.
    pub fn refresh(&self) -> bool {
        let generation = self.refresh_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.fetch_add(1, Ordering::SeqCst);

        let outcome = self.feed.fetch_trends();

        let replaced = match outcome {
            Ok(trends) => {
                let count = trends.len();
                let installed = {
                    let mut state = self.state.write();
                    // A newer refresh has started; this result is stale.
                    if self.refresh_generation.load(Ordering::SeqCst) != generation {
                        false
                    } else {
                        state.working.replace_all(trends);
                        true
                    }
                };
                if installed {
                    self.subscriptions
                        .broadcast(StoreEvent::TrendsRefreshed { count });
                } else {
                    tracing::debug!(generation, "stale trend refresh discarded");
                }
                installed
            }
            Err(e) => {
                tracing::warn!(error = %e, "trend refresh failed; keeping previous list");
                self.subscriptions.broadcast(StoreEvent::RefreshFailed {
                    error: e.to_string(),
                });
                false
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        replaced
    }

    /// Whether a fetch is currently outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Synchronous lookup in the working list; `None` on a missing id.
    pub fn trend(&self, id: &str) -> Option<Trend> {
        self.state.read().working.get(id).cloned()
    }

    // --- Saved Subset ---

    /// Snapshot of the saved trends, in save order.
    pub fn saved(&self) -> Vec<SavedTrend> {
        self.state.read().saved.snapshot()
    }

    /// Whether a trend id is in the saved subset.
    pub fn is_saved(&self, id: &str) -> bool {
        self.state.read().saved.contains(id)
    }

    /// Save a trend. Idempotent: saving an already-saved id is a no-op and
    /// returns `false`.
    pub fn save(&self, trend: &Trend) -> bool {
        let saved = SavedTrend::from_trend(trend, Utc::now());

        let snapshot = {
            let mut state = self.state.write();
            if !state.saved.push_back(saved.clone()) {
                return false;
            }
            encode_snapshot(&state)
        };

        self.persist(snapshot);
        self.subscriptions
            .broadcast(StoreEvent::TrendSaved { trend: saved });
        true
    }

    /// Remove a trend from the saved subset. Silent no-op when absent.
    pub fn unsave(&self, id: &str) -> bool {
        let snapshot = {
            let mut state = self.state.write();
            if state.saved.remove(id).is_none() {
                return false;
            }
            encode_snapshot(&state)
        };

        self.persist(snapshot);
        self.subscriptions.broadcast(StoreEvent::SavedTrendRemoved {
            id: id.to_string(),
        });
        true
    }

    // --- Category Preference ---

    /// The persisted category selection.
    pub fn selected_category(&self) -> CategoryFilter {
        self.state.read().selected
    }

    /// Change the category selection. Persisted with the saved subset.
    pub fn select_category(&self, selected: CategoryFilter) {
        let snapshot = {
            let mut state = self.state.write();
            state.selected = selected;
            encode_snapshot(&state)
        };

        self.persist(snapshot);
        self.subscriptions
            .broadcast(StoreEvent::CategorySelected { selected });
    }

    fn persist(&self, snapshot: Option<Vec<u8>>) {
        if let Some(bytes) = snapshot {
            self.writer.submit(STORE_KEY, bytes);
        }
    }
}

/// Serialize the persisted subset. Encoding these plain structs cannot
/// realistically fail, but a mutation must never fail its caller, so a
/// failure is logged instead of propagated.
fn encode_snapshot(state: &TrendState) -> Option<Vec<u8>> {
    let snapshot = TrendSnapshot {
        saved: state.saved.snapshot(),
        selected_category: state.selected,
    };
    match serde_json::to_vec(&snapshot) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode trend snapshot");
            None
        }
    }
}
