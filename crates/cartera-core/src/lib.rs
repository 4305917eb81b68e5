//! Core types and trait definitions for the Cartera client record store.
//!
//! This crate is deliberately free of HTTP, filesystem and spreadsheet
//! dependencies. All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod best_effort;
pub mod file;
pub mod record;
pub mod store;

pub use best_effort::BestEffort;
pub use file::{Format, SavedUpload, StoredFile};
pub use record::{RECOMMENDED_FIELDS, Record};
pub use store::{Classify, FailureKind, RecordStore};
