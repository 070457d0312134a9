//! The Write Coordinator: cross-store write ordering, per-id
//! striping, and coherence-repair bookkeeping.

mod coordinator;
mod lock;

pub use coordinator::{CoherenceRepairEntry, WriteCoordinator};
