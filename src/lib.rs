//! # gradebook
//!
//! An in-memory grade book mapping student names to grades, with validation,
//! a CSV snapshot export and a small command shell to drive it.
//!
//! ```
//! use gradebook::{RecordStore, events::MemorySink};
//!
//! let mut store = RecordStore::with_sink(MemorySink::new());
//! store.add("Alice", 90).unwrap();
//! store.update("Alice", "70").unwrap();
//! assert_eq!(store.get("Alice").map(|g| g.value()), Some(70));
//! assert!(store.delete("Bob").is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Runtime settings, read from the environment
pub mod config;
/// The error type shared by all store operations
pub mod error;
/// Events reported by the store, and the sinks that receive them
pub mod events;
/// Writing grade book snapshots as CSV
pub mod export;
/// Grades, student names and records
pub mod record;
/// The command shell
pub mod shell;
/// The record store itself
pub mod store;

pub use error::{StoreError, StoreResult};
pub use record::{Grade, StudentName, StudentRecord};
pub use store::{AddOutcome, RecordStore};
