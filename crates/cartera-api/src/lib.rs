//! JSON admin API for Cartera.
//!
//! Exposes an axum [`Router`] backed by an [`Aggregator`] over any
//! [`cartera_core::RecordStore`]. Auth, TLS, and body-size limits are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", cartera_api::api_router(aggregator.clone()))
//! ```

pub mod error;
pub mod files;
pub mod records;

use std::sync::Arc;

use axum::{Router, routing::get};
use cartera_context::Aggregator;
use cartera_core::RecordStore;

pub use error::ApiError;

/// Build the admin API router for `aggregator`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(aggregator: Arc<Aggregator<S>>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    // Uploads
    .route("/files/{format}", get(files::list::<S>).post(files::upload::<S>))
    .route("/files/{format}/{filename}", axum::routing::delete(files::delete::<S>))
    // Dataset
    .route("/records", get(records::all::<S>))
    .route("/search", get(records::search::<S>))
    .route("/fields", get(records::recommended_fields))
    .with_state(aggregator)
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use cartera_store_fs::FsStore;
  use serde_json::Value;
  use tempfile::TempDir;
  use tower::ServiceExt as _;

  use super::*;

  const BOUNDARY: &str = "cartera-test-boundary";

  async fn app() -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let stores = FsStore::open_all(dir.path()).await.unwrap();
    let router = api_router(Arc::new(Aggregator::new(stores)));
    (dir, router)
  }

  fn multipart(field: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = format!(
      "--{BOUNDARY}\r\n\
       Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
       Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
  }

  async fn upload(app: &Router, format: &str, field: &str, content: &[u8]) -> Response {
    let req = Request::builder()
      .method("POST")
      .uri(format!("/files/{format}"))
      .header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
      )
      .body(Body::from(multipart(field, "subida.csv", content)))
      .unwrap();
    app.clone().oneshot(req).await.unwrap()
  }

  async fn send(app: &Router, method: &str, uri: &str) -> Response {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .body(Body::empty())
      .unwrap();
    app.clone().oneshot(req).await.unwrap()
  }

  async fn json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  const CLIENTES: &[u8] = b"LLAVE,CLIENTE,DEUDA\nA1,Juan,1000\nA2,Ana,0\n";

  // ── Upload ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn upload_returns_stored_name_and_rows() {
    let (_dir, app) = app().await;
    let resp = upload(&app, "csv", "csv", CLIENTES).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["rowsProcessed"], 2);
    assert!(body["filename"].as_str().unwrap().starts_with("clientes_"));
  }

  #[tokio::test]
  async fn unparseable_upload_is_rejected() {
    let (_dir, app) = app().await;
    let resp = upload(&app, "csv", "csv", b"LLAVE,CLIENTE\n").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json(resp).await;
    assert_eq!(body["error"], "document is empty or has no data rows");
  }

  #[tokio::test]
  async fn upload_without_matching_field_is_bad_request() {
    let (_dir, app) = app().await;
    let resp = upload(&app, "xlsx", "csv", CLIENTES).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn unknown_format_is_rejected_by_path() {
    let (_dir, app) = app().await;
    let resp = send(&app, "GET", "/files/ods").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── List / delete ───────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_then_delete() {
    let (_dir, app) = app().await;
    upload(&app, "csv", "csv", CLIENTES).await;

    let body = json(send(&app, "GET", "/files/csv").await).await;
    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["records"], 2);
    let name = files[0]["name"].as_str().unwrap().to_owned();

    let resp = send(&app, "DELETE", &format!("/files/csv/{name}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json(resp).await["success"], true);

    let body = json(send(&app, "GET", "/files/csv").await).await;
    assert!(body["files"].as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn delete_missing_file_is_a_deletion_error() {
    let (_dir, app) = app().await;
    let resp = send(&app, "DELETE", "/files/csv/clientes_1999-01-01.csv").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("error deleting file"));
  }

  // ── Records / search ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn records_and_search() {
    let (_dir, app) = app().await;
    upload(&app, "csv", "csv", CLIENTES).await;

    let all = json(send(&app, "GET", "/records").await).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
    assert_eq!(all[0]["CLIENTE"], "Juan");

    let found = json(send(&app, "GET", "/search?q=ANA").await).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["LLAVE"], "A2");

    let by_field = json(send(&app, "GET", "/search?q=1000&field=CLIENTE").await).await;
    assert!(by_field.as_array().unwrap().is_empty());

    let resp = send(&app, "GET", "/search").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn recommended_fields_are_listed() {
    let (_dir, app) = app().await;
    let fields = json(send(&app, "GET", "/fields").await).await;
    assert_eq!(fields[0], "LLAVE");
    assert!(fields.as_array().unwrap().iter().any(|f| f == "ESTATUS_CM"));
  }
}
