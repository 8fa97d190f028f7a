//! Application layer: the checklist service
//!
//! This layer owns tree and selection state and publishes snapshots to observers.

pub mod checklist;
pub mod error;

pub use checklist::{Checklist, Snapshot, SubscriptionId};
pub use error::{ApplicationError, ApplicationResult};
