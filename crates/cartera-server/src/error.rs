//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::completion::CompletionError;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error(transparent)]
  Completion(#[from] CompletionError),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res =
          (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"cartera\""),
        );
        res
      }
      Error::Completion(e) => {
        tracing::error!(error = %e, "chat completion failed");
        let message = match e {
          CompletionError::Authentication => "authentication error with chat provider",
          CompletionError::Request(_) => "error generating AI response",
        };
        (StatusCode::BAD_GATEWAY, Json(json!({ "error": message }))).into_response()
      }
    }
  }
}
