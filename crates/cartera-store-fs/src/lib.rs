//! Filesystem backend for the Cartera record store.
//!
//! One [`FsStore`] per upload format, all sharing a single data directory.
//! Files are told apart by extension.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::FsStore;
