//! Handlers for `/files` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/files/{format}` | multipart; the file field is named after the format |
//! | `GET`    | `/files/{format}` | newest first |
//! | `DELETE` | `/files/{format}/{filename}` | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Multipart, Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use cartera_context::Aggregator;
use cartera_core::{Classify, FailureKind, Format, RecordStore, SavedUpload, StoredFile};
use serde::Serialize;

use crate::error::ApiError;

fn store_for<S: RecordStore>(
  aggregator: &Aggregator<S>,
  format: Format,
) -> Result<&S, ApiError> {
  aggregator
    .store(format)
    .ok_or_else(|| ApiError::NotFound(format!("no store configured for {format}")))
}

// ─── Upload ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
  pub success: bool,
  #[serde(flatten)]
  pub saved:   SavedUpload,
}

/// `POST /files/{format}` — multipart body with a `csv` or `xlsx` file field.
pub async fn upload<S>(
  State(aggregator): State<Arc<Aggregator<S>>>,
  Path(format): Path<Format>,
  mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let store = store_for(&aggregator, format)?;

  let (original_name, bytes) = loop {
    let field = multipart
      .next_field()
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?
      .ok_or_else(|| ApiError::BadRequest(format!("missing `{format}` file field")))?;

    if field.name() == Some(format.as_str()) {
      let name = field.file_name().unwrap_or_default().to_owned();
      let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
      break (name, bytes);
    }
  };

  let saved = store
    .save(&original_name, &bytes)
    .await
    .map_err(|e| match e.kind() {
      FailureKind::Rejected => ApiError::Rejected(e.to_string()),
      _ => ApiError::Store(Box::new(e)),
    })?;

  Ok((
    StatusCode::CREATED,
    Json(UploadResponse { success: true, saved }),
  ))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ListResponse {
  pub files: Vec<StoredFile>,
}

/// `GET /files/{format}`
pub async fn list<S>(
  State(aggregator): State<Arc<Aggregator<S>>>,
  Path(format): Path<Format>,
) -> Result<Json<ListResponse>, ApiError>
where
  S: RecordStore,
{
  let files = store_for(&aggregator, format)?
    .list_files()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(ListResponse { files }))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
  pub success: bool,
  pub message: String,
}

/// `DELETE /files/{format}/{filename}`
pub async fn delete<S>(
  State(aggregator): State<Arc<Aggregator<S>>>,
  Path((format, filename)): Path<(Format, String)>,
) -> Result<Json<DeleteResponse>, ApiError>
where
  S: RecordStore,
{
  store_for(&aggregator, format)?
    .delete(&filename)
    .await
    .map_err(|e| ApiError::Delete(Box::new(e)))?;
  Ok(Json(DeleteResponse {
    success: true,
    message: format!("file {filename} deleted"),
  }))
}
