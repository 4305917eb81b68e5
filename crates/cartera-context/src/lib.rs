//! Read side of the Cartera record store.
//!
//! - [`Aggregator`] merges every store into one dataset and searches it.
//! - [`display`] renders records as text blocks for the assistant.
//! - [`ContextEnricher`] appends that text to a conversation's system prompt.

pub mod aggregator;
pub mod display;
pub mod enrich;
pub mod message;

pub use aggregator::{Aggregator, DEFAULT_CATEGORY_FIELD};
pub use enrich::ContextEnricher;
pub use message::{ChatMessage, Role};

#[cfg(test)]
pub(crate) mod test_support;
