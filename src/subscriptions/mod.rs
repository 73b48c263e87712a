//! Live store updates for UI consumers.
//!
//! The only read-path the presentation layer gets besides the stores'
//! synchronous snapshot accessors: subscribe, receive an event after every
//! committed mutation, re-render. Slow consumers are dropped rather than
//! allowed to stall mutations.

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, StoreEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId,
};
