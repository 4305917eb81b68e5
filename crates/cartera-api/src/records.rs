//! Read-only handlers over the aggregated dataset.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use cartera_context::Aggregator;
use cartera_core::{RECOMMENDED_FIELDS, Record, RecordStore};
use serde::Deserialize;

use crate::error::ApiError;

/// `GET /records`
pub async fn all<S>(State(aggregator): State<Arc<Aggregator<S>>>) -> Json<Vec<Record>>
where
  S: RecordStore,
{
  Json(aggregator.all_records().await)
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub q:     Option<String>,
  /// Restrict matching to this column.
  pub field: Option<String>,
}

/// `GET /search?q=<text>[&field=<column>]`
pub async fn search<S>(
  State(aggregator): State<Arc<Aggregator<S>>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Record>>, ApiError>
where
  S: RecordStore,
{
  let query = params
    .q
    .ok_or_else(|| ApiError::BadRequest("missing `q` parameter".to_owned()))?;

  let records = match params.field {
    Some(field) => aggregator.search_by_field(&field, &query).await,
    None => aggregator.search(&query).await,
  };
  Ok(Json(records))
}

/// `GET /fields` — the columns the upload template suggests.
pub async fn recommended_fields() -> Json<&'static [&'static str]> {
  Json(RECOMMENDED_FIELDS)
}
