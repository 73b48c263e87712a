//! Subscription types for live store updates.

use crate::types::{CategoryFilter, Draft, SavedTrend};
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before the subscriber is dropped.
    /// Default: 256
    pub buffer_size: usize,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 256,
            filter: SubscriptionFilter::all(),
        }
    }
}

/// Which event families a subscription receives.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Trend events: refreshes, saves, category selection.
    pub include_trend_events: bool,

    /// Draft events: create, update, delete.
    pub include_draft_events: bool,
}

impl SubscriptionFilter {
    /// Subscribe to trend events only.
    pub fn trends() -> Self {
        Self {
            include_trend_events: true,
            ..Default::default()
        }
    }

    /// Subscribe to draft events only.
    pub fn drafts() -> Self {
        Self {
            include_draft_events: true,
            ..Default::default()
        }
    }

    /// Subscribe to everything.
    pub fn all() -> Self {
        Self {
            include_trend_events: true,
            include_draft_events: true,
        }
    }
}

/// Events emitted after committed mutations.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    // --- Trend Events ---
    /// The working list was replaced by a successful refresh.
    TrendsRefreshed {
        count: usize,
    },

    /// A refresh failed; the working list is unchanged.
    RefreshFailed {
        error: String,
    },

    /// A trend was added to the saved subset.
    TrendSaved {
        trend: SavedTrend,
    },

    /// A trend was removed from the saved subset.
    SavedTrendRemoved {
        id: String,
    },

    /// The category preference changed.
    CategorySelected {
        selected: CategoryFilter,
    },

    // --- Draft Events ---
    /// A draft was created.
    DraftCreated {
        draft: Draft,
    },

    /// A draft was updated.
    DraftUpdated {
        draft: Draft,
    },

    /// A draft was deleted.
    DraftDeleted {
        id: String,
    },

    // --- Lifecycle Events ---
    /// Subscription was dropped.
    Dropped {
        reason: DropReason,
    },
}

impl StoreEvent {
    /// Whether this event belongs to the trend family.
    pub(crate) fn is_trend_event(&self) -> bool {
        matches!(
            self,
            StoreEvent::TrendsRefreshed { .. }
                | StoreEvent::RefreshFailed { .. }
                | StoreEvent::TrendSaved { .. }
                | StoreEvent::SavedTrendRemoved { .. }
                | StoreEvent::CategorySelected { .. }
        )
    }

    /// Whether this event belongs to the draft family.
    pub(crate) fn is_draft_event(&self) -> bool {
        matches!(
            self,
            StoreEvent::DraftCreated { .. }
                | StoreEvent::DraftUpdated { .. }
                | StoreEvent::DraftDeleted { .. }
        )
    }
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to manage a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<StoreEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<StoreEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<StoreEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<StoreEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}
