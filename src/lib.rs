//! # Trendline
//!
//! Client-side state core for a content-trend-discovery app.
//!
//! ## Core Concepts
//!
//! - **Trend store**: fetched working list, persisted saved subset, and
//!   the category preference
//! - **Draft store**: persisted draft posts, newest first
//! - **Selectors**: pure category/search derivations for screens
//! - **Subscriptions**: re-render signals after every committed mutation
//!
//! Mutations commit in memory synchronously; a background writer mirrors
//! each store's persisted subset into a pluggable backing store without
//! the caller waiting.
//!
//! ## Example
//!
//! ```ignore
//! use trendline::{DraftInput, Session, SessionConfig};
//! use std::sync::Arc;
//!
//! let session = Session::open(SessionConfig::default(), Arc::new(feed))?;
//!
//! // Pull the working list and save a trend
//! session.trends().refresh();
//! if let Some(trend) = session.trends().trending().first() {
//!     session.trends().save(trend);
//! }
//!
//! // Draft a post
//! session.drafts().create(
//!     DraftInput::new("New reel idea").with_hashtags(vec!["#trending".into()]),
//! );
//!
//! // Durable before exit
//! session.flush();
//! ```

pub mod backing;
pub mod collection;
pub mod drafts;
pub mod error;
pub mod feed;
pub mod persist;
pub mod selectors;
pub mod session;
pub mod subscriptions;
pub mod trends;
pub mod types;

// Re-exports
pub use backing::{BackingStore, FileBacking, MemoryBacking};
pub use drafts::DraftStore;
pub use error::{Result, StoreError};
pub use feed::TrendFeed;
pub use persist::SnapshotWriter;
pub use selectors::{filter_by_category, filter_trends, search_drafts, search_trends};
pub use session::{Session, SessionConfig};
pub use subscriptions::{
    DropReason, StoreEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, SubscriptionManager,
};
pub use trends::TrendStore;
pub use types::*;
