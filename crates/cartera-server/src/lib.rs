//! HTTP server wiring for Cartera.
//!
//! Mounts the admin API under `/api` and a `/chat` endpoint that enriches a
//! conversation with the client dataset before forwarding it to the
//! chat-completion provider.

pub mod auth;
pub mod completion;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  extract::{DefaultBodyLimit, State},
  middleware,
  routing::post,
};
use cartera_context::{Aggregator, ChatMessage, ContextEnricher, DEFAULT_CATEGORY_FIELD};
use cartera_core::RecordStore;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
use completion::CompletionClient;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CARTERA_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  /// Directory holding the uploaded files.
  #[serde(default = "default_data_dir")]
  pub data_dir:            PathBuf,
  #[serde(default)]
  pub auth_username:       String,
  /// Argon2 PHC string. Without it the server runs unauthenticated.
  #[serde(default)]
  pub auth_password_hash:  Option<String>,
  #[serde(default = "default_category_field")]
  pub category_field:      String,
  /// Character cap for the records appended to the system prompt.
  #[serde(default)]
  pub knowledge_max_chars: Option<usize>,
  #[serde(default = "default_max_upload_bytes")]
  pub max_upload_bytes:    usize,
  #[serde(default)]
  pub chat:                ChatConfig,
}

/// Chat-completion provider settings.
#[derive(Deserialize, Clone)]
pub struct ChatConfig {
  #[serde(default = "default_api_url")]
  pub api_url:      String,
  #[serde(default)]
  pub api_key:      String,
  #[serde(default = "default_model")]
  pub model:        String,
  #[serde(default = "default_max_tokens")]
  pub max_tokens:   u32,
  #[serde(default = "default_temperature")]
  pub temperature:  f32,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl Default for ChatConfig {
  fn default() -> Self {
    Self {
      api_url:      default_api_url(),
      api_key:      String::new(),
      model:        default_model(),
      max_tokens:   default_max_tokens(),
      temperature:  default_temperature(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

fn default_host() -> String { "0.0.0.0".to_owned() }
fn default_port() -> u16 { 3000 }
fn default_data_dir() -> PathBuf { PathBuf::from("data/clientes") }
fn default_category_field() -> String { DEFAULT_CATEGORY_FIELD.to_owned() }
fn default_max_upload_bytes() -> usize { 10 * 1024 * 1024 }
fn default_api_url() -> String { "https://api.deepseek.com/v1/chat/completions".to_owned() }
fn default_model() -> String { "deepseek-chat".to_owned() }
fn default_max_tokens() -> u32 { 1000 }
fn default_temperature() -> f32 { 0.5 }
fn default_timeout_secs() -> u64 { 60 }

impl ServerConfig {
  /// Basic-auth credentials, if a password hash is configured.
  pub fn auth(&self) -> Option<AuthConfig> {
    self.auth_password_hash.as_ref().map(|hash| AuthConfig {
      username:      self.auth_username.clone(),
      password_hash: hash.clone(),
    })
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub aggregator: Arc<Aggregator<S>>,
  pub enricher:   Arc<ContextEnricher<S>>,
  pub completion: Arc<CompletionClient>,
  pub auth:       Option<Arc<AuthConfig>>,
  pub config:     Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      aggregator: self.aggregator.clone(),
      enricher:   self.enricher.clone(),
      completion: self.completion.clone(),
      auth:       self.auth.clone(),
      config:     self.config.clone(),
    }
  }
}

impl<S: RecordStore> AppState<S> {
  /// Assemble the state from `stores` (in priority order) and `config`.
  pub fn new(stores: Vec<S>, config: ServerConfig) -> anyhow::Result<Self> {
    let aggregator =
      Arc::new(Aggregator::new(stores).with_category_field(config.category_field.clone()));
    let enricher = Arc::new(
      ContextEnricher::new(aggregator.clone()).with_max_block_chars(config.knowledge_max_chars),
    );
    let completion = Arc::new(CompletionClient::new(config.chat.clone())?);

    Ok(Self {
      aggregator,
      enricher,
      completion,
      auth: config.auth().map(Arc::new),
      config: Arc::new(config),
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: RecordStore + 'static,
{
  let api = cartera_api::api_router(state.aggregator.clone())
    .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

  let app = Router::new()
    .route("/chat", post(chat::<S>))
    .with_state(state.clone())
    .nest("/api", api);

  let app = match state.auth {
    Some(credentials) => {
      app.layer(middleware::from_fn_with_state(credentials, auth::require_auth))
    }
    None => app,
  };
  app.layer(TraceLayer::new_for_http())
}

// ─── Chat ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
  pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
  pub content: String,
}

/// `POST /chat` — body: `{"messages":[{"role":"system","content":"…"},…]}`
async fn chat<S>(
  State(state): State<AppState<S>>,
  Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, Error>
where
  S: RecordStore + 'static,
{
  let messages = state.enricher.enrich(req.messages).await;
  let content = state.completion.complete(&messages).await?;
  Ok(Json(ChatResponse { content }))
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use cartera_store_fs::FsStore;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tempfile::TempDir;
  use tokio::net::TcpListener;
  use tower::ServiceExt as _;

  use super::*;

  type Seen = Arc<Mutex<Option<Value>>>;

  /// Serve a fake provider that records the request and answers with
  /// `status` and `body`.
  async fn fake_provider(status: StatusCode, body: Value) -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(None));
    let recorder = seen.clone();
    let app = Router::new().route(
      "/v1/chat/completions",
      post(move |Json(req): Json<Value>| {
        let recorder = recorder.clone();
        let body = body.clone();
        async move {
          *recorder.lock().unwrap() = Some(req);
          (status, Json(body))
        }
      }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (format!("http://{addr}/v1/chat/completions"), seen)
  }

  fn config(dir: &TempDir, api_url: &str, password_hash: Option<String>) -> ServerConfig {
    ServerConfig {
      host:                "127.0.0.1".to_owned(),
      port:                0,
      data_dir:            dir.path().to_path_buf(),
      auth_username:       "admin".to_owned(),
      auth_password_hash:  password_hash,
      category_field:      default_category_field(),
      knowledge_max_chars: None,
      max_upload_bytes:    default_max_upload_bytes(),
      chat:                ChatConfig {
        api_url: api_url.to_owned(),
        api_key: "test-key".to_owned(),
        ..ChatConfig::default()
      },
    }
  }

  async fn app(dir: &TempDir, api_url: &str, password_hash: Option<String>) -> Router {
    let stores = FsStore::open_all(dir.path()).await.unwrap();
    stores[0]
      .save("c.csv", b"LLAVE,CLIENTE,DEUDA\nA1,Juan,1000\n")
      .await
      .unwrap();
    let state = AppState::new(stores, config(dir, api_url, password_hash)).unwrap();
    router(state)
  }

  async fn post_chat(app: Router, auth: Option<&str>) -> Response {
    let body = json!({
      "messages": [
        { "role": "system", "content": "Eres un asistente." },
        { "role": "user", "content": "¿Cuánto debe Juan?" }
      ]
    });
    let mut builder = Request::builder()
      .method("POST")
      .uri("/chat")
      .header(header::CONTENT_TYPE, "application/json");
    if let Some(a) = auth {
      builder = builder.header(header::AUTHORIZATION, a);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(req).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn completion(content: &str) -> Value {
    json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
  }

  // ── Chat ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn chat_forwards_enriched_conversation() {
    let dir = tempfile::tempdir().unwrap();
    let (url, seen) = fake_provider(StatusCode::OK, completion("Juan debe $1,000.00")).await;

    let resp = post_chat(app(&dir, &url, None).await, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["content"], "Juan debe $1,000.00");

    let sent = seen.lock().unwrap().clone().unwrap();
    assert_eq!(sent["model"], "deepseek-chat");
    assert_eq!(sent["max_tokens"], 1000);
    let system = sent["messages"][0]["content"].as_str().unwrap();
    assert!(system.starts_with("Eres un asistente."));
    assert!(system.contains("(1 registros)"));
    assert!(system.contains("⚠️ Deuda: $1,000.00"));
    assert_eq!(sent["messages"][1]["content"], "¿Cuánto debe Juan?");
  }

  #[tokio::test]
  async fn provider_auth_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let (url, _) = fake_provider(
      StatusCode::BAD_REQUEST,
      json!({ "error": { "type": "authentication_error" } }),
    )
    .await;

    let resp = post_chat(app(&dir, &url, None).await, None).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
      json_body(resp).await["error"],
      "authentication error with chat provider"
    );
  }

  #[tokio::test]
  async fn provider_failure_is_generic() {
    let dir = tempfile::tempdir().unwrap();
    let (url, _) =
      fake_provider(StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "boom" })).await;

    let resp = post_chat(app(&dir, &url, None).await, None).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(json_body(resp).await["error"], "error generating AI response");
  }

  // ── Auth ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn configured_auth_guards_every_route() {
    let dir = tempfile::tempdir().unwrap();
    let (url, _) = fake_provider(StatusCode::OK, completion("hola")).await;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(b"secret", &salt)
      .unwrap()
      .to_string();
    let app = app(&dir, &url, Some(hash)).await;

    let resp = post_chat(app.clone(), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let req = Request::builder().uri("/api/records").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let creds = format!("Basic {}", B64.encode("admin:secret"));
    let req = Request::builder()
      .uri("/api/records")
      .header(header::AUTHORIZATION, &creds)
      .body(Body::empty())
      .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await[0]["LLAVE"], "A1");

    let resp = post_chat(app, Some(&creds)).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[test]
  fn config_defaults_fill_missing_keys() {
    let cfg: ServerConfig = serde_json::from_value(json!({ "port": 8080 })).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.data_dir, PathBuf::from("data/clientes"));
    assert_eq!(cfg.category_field, "Parque Industrial");
    assert_eq!(cfg.chat.model, "deepseek-chat");
    assert_eq!(cfg.max_upload_bytes, 10 * 1024 * 1024);
    assert!(cfg.auth().is_none());
  }
}
