//! Scroll synchronization engine.
//!
//! The coordinator is the only owner of session state. Everything else in
//! this module is a building block it drives.

pub mod coordinator;
pub mod debounce;
pub mod mirror;
pub mod session;

// Re-export for convenience
pub use coordinator::{EligibilityPolicy, PendingSync, SyncCoordinator, SyncOptions};
pub use debounce::Debouncer;
pub use mirror::{CopyEdit, JumpLocation, JumpTarget};
pub use session::SyncSession;
