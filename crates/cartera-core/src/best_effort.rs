//! Collapse failures on read paths to a neutral value.
//!
//! Reads that feed the chat assistant must never stop it from answering. Every
//! place that degrades a failure goes through [`BestEffort`] and logs it.

use std::fmt::Display;

pub trait BestEffort<T> {
  /// Return the success value, or log the error and return `T::default()`.
  fn or_neutral(self, context: &str) -> T
  where
    T: Default;
}

impl<T, E: Display> BestEffort<T> for Result<T, E> {
  fn or_neutral(self, context: &str) -> T
  where
    T: Default,
  {
    match self {
      Ok(value) => value,
      Err(e) => {
        tracing::warn!(error = %e, "{context}; continuing without it");
        T::default()
      }
    }
  }
}
