//! Router tests against an in-memory store and a canned generator.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use scriptgo_genai::{GeminiConfig, ResponseFormat, TextGenerator};
use scriptgo_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use super::*;

const COFFEE_REPLY: &str = r#"Here's your script:
```json
{"title":"Brew Better","script":[{"visual":"kettle","audio":"Let's talk coffee."}]}
```"#;

/// Answers every prompt with the same reply, or fails as the backend would.
struct Canned(Result<&'static str, u16>);

impl TextGenerator for Canned {
  async fn generate<'a>(&'a self, _prompt: &'a str) -> scriptgo_genai::Result<String> {
    match self.0 {
      Ok(text) => Ok(text.to_owned()),
      Err(status) => Err(scriptgo_genai::Error::Api {
        status,
        message: "quota exceeded".into(),
      }),
    }
  }
}

type State = AppState<SqliteStore, Canned>;

async fn make_state(reply: Result<&'static str, u16>) -> State {
  let store = SqliteStore::open_in_memory().await.unwrap();
  AppState {
    store:     Arc::new(store),
    generator: Arc::new(Canned(reply)),
    mailer:    Mailer::disabled("http://localhost:3000"),
    config:    Arc::new(ServerConfig {
      host:            "127.0.0.1".to_string(),
      port:            8080,
      app_url:         "http://localhost:3000".to_string(),
      store_path:      PathBuf::from(":memory:"),
      response_format: ResponseFormat::ScriptRows,
      gemini:          GeminiConfig::new("test-key"),
      email:           None,
    }),
  }
}

fn auth_header(email: &str, pass: &str) -> String {
  format!("Basic {}", B64.encode(format!("{email}:{pass}")))
}

async fn oneshot_raw(
  state:  State,
  method: &str,
  uri:    &str,
  auth:   Option<&str>,
  body:   Option<Value>,
) -> axum::response::Response {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(auth) = auth {
    builder = builder.header(header::AUTHORIZATION, auth);
  }
  let body = match body {
    Some(json) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(json.to_string())
    }
    None => Body::empty(),
  };
  router(state).oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

/// Sign up `email` with password `secret` and return its auth header.
async fn sign_up(state: &State, email: &str) -> String {
  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/api/accounts",
    None,
    Some(json!({ "email": email, "password": "secret", "full_name": "Test User" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  auth_header(email, "secret")
}

fn script_body() -> Value {
  json!({
    "title": "Brew Better",
    "topic": "home coffee brewing",
    "platform": "TikTok",
    "content": {
      "kind": "script",
      "rows": [{ "visual": "kettle", "audio": "Let's talk coffee." }]
    }
  })
}

async fn create_script(state: &State, auth: &str) -> Value {
  let resp = oneshot_raw(state.clone(), "POST", "/api/scripts", Some(auth), Some(script_body()))
    .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  json_body(resp).await
}

// ── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn healthz_is_open() {
  let state = make_state(Ok(COFFEE_REPLY)).await;
  let resp = oneshot_raw(state, "GET", "/healthz", None, None).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

// ── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn sign_up_then_me() {
  let state = make_state(Ok(COFFEE_REPLY)).await;
  let auth = sign_up(&state, "alice@example.com").await;

  let resp = oneshot_raw(state, "GET", "/api/me", Some(&auth), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let me = json_body(resp).await;
  assert_eq!(me["email"], "alice@example.com");
  assert_eq!(me["full_name"], "Test User");
  assert!(me.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_sign_up_conflicts() {
  let state = make_state(Ok(COFFEE_REPLY)).await;
  sign_up(&state, "alice@example.com").await;

  let resp = oneshot_raw(
    state,
    "POST",
    "/api/accounts",
    None,
    Some(json!({ "email": "ALICE@example.com", "password": "other" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn blank_sign_up_is_rejected() {
  let state = make_state(Ok(COFFEE_REPLY)).await;
  let resp = oneshot_raw(
    state,
    "POST",
    "/api/accounts",
    None,
    Some(json!({ "email": "  ", "password": "secret" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_credentials_get_401() {
  let state = make_state(Ok(COFFEE_REPLY)).await;
  let resp = oneshot_raw(state, "GET", "/api/scripts", None, None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
}

#[tokio::test]
async fn wrong_password_gets_401() {
  let state = make_state(Ok(COFFEE_REPLY)).await;
  sign_up(&state, "alice@example.com").await;
  let auth = auth_header("alice@example.com", "wrong");
  let resp = oneshot_raw(state, "GET", "/api/me", Some(&auth), None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ── Generate ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn generate_returns_normalized_script() {
  let state = make_state(Ok(COFFEE_REPLY)).await;
  let auth = sign_up(&state, "alice@example.com").await;

  let resp = oneshot_raw(
    state,
    "POST",
    "/api/generate",
    Some(&auth),
    Some(json!({ "topic": "home coffee brewing" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let generated = json_body(resp).await;
  assert_eq!(generated["title"], "Brew Better");
  assert_eq!(generated["content"]["kind"], "script");
  assert_eq!(generated["content"]["rows"][0]["audio"], "Let's talk coffee.");
}

#[tokio::test]
async fn generate_requires_a_topic() {
  let state = make_state(Ok(COFFEE_REPLY)).await;
  let auth = sign_up(&state, "alice@example.com").await;
  let resp = oneshot_raw(
    state,
    "POST",
    "/api/generate",
    Some(&auth),
    Some(json!({ "topic": "   " })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upstream_failure_is_a_generic_502() {
  let state = make_state(Err(429)).await;
  let auth = sign_up(&state, "alice@example.com").await;

  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/api/generate",
    Some(&auth),
    Some(json!({ "topic": "tea" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
  let body = json_body(resp).await;
  assert_eq!(body["error"], "Failed to generate script with AI");

  // Nothing was persisted.
  let resp = oneshot_raw(state, "GET", "/api/scripts", Some(&auth), None).await;
  assert_eq!(json_body(resp).await["scripts"], json!([]));
}

#[tokio::test]
async fn unparseable_calendar_is_422() {
  let state = make_state(Ok("Here is your week of content, enjoy!")).await;
  let auth = sign_up(&state, "alice@example.com").await;
  let resp = oneshot_raw(
    state,
    "POST",
    "/api/generate",
    Some(&auth),
    Some(json!({ "topic": "coffee", "calendar_days": 7 })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn non_json_single_reply_falls_back() {
  let state = make_state(Ok("I'm sorry, I can't help with that.")).await;
  let auth = sign_up(&state, "alice@example.com").await;
  let resp = oneshot_raw(
    state,
    "POST",
    "/api/generate",
    Some(&auth),
    Some(json!({ "topic": "tea" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let generated = json_body(resp).await;
  assert_eq!(generated["title"], "tea");
  assert_eq!(
    generated["content"]["rows"][0]["visual"],
    "Error: AI failed to return JSON"
  );
}

// ── Scripts ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_creates_then_updates_in_place() {
  let state = make_state(Ok(COFFEE_REPLY)).await;
  let auth = sign_up(&state, "alice@example.com").await;

  let created = create_script(&state, &auth).await;
  assert_eq!(created["platform"], "TikTok");
  assert_eq!(created["tone"], "Professional");

  let mut body = script_body();
  body["id"] = created["id"].clone();
  body["title"] = json!("Brew Even Better");
  let resp = oneshot_raw(state.clone(), "POST", "/api/scripts", Some(&auth), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let updated = json_body(resp).await;
  assert_eq!(updated["id"], created["id"]);
  assert_eq!(updated["title"], "Brew Even Better");

  let resp = oneshot_raw(state, "GET", "/api/scripts", Some(&auth), None).await;
  let listing = json_body(resp).await;
  assert_eq!(listing["scripts"].as_array().unwrap().len(), 1);
  assert!(listing.get("missing_columns").is_none());
}

#[tokio::test]
async fn script_with_day_count_reads_back_unchanged() {
  let state = make_state(Ok(COFFEE_REPLY)).await;
  let auth = sign_up(&state, "alice@example.com").await;

  let mut body = script_body();
  body["calendar_days"] = json!(3);
  let resp = oneshot_raw(state.clone(), "POST", "/api/scripts", Some(&auth), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created = json_body(resp).await;
  assert_eq!(created["calendar_days"], 0);

  let uri = format!("/api/scripts/{}", created["id"].as_str().unwrap());
  let resp = oneshot_raw(state, "GET", &uri, Some(&auth), None).await;
  let fetched = json_body(resp).await;
  assert_eq!(fetched["content"], created["content"]);
  assert_eq!(fetched["content"]["kind"], "script");
}

#[tokio::test]
async fn calendar_without_day_count_takes_entry_count() {
  let state = make_state(Ok(COFFEE_REPLY)).await;
  let auth = sign_up(&state, "alice@example.com").await;

  let body = json!({
    "title": "Coffee week",
    "topic": "coffee",
    "content": {
      "kind": "calendar",
      "days": [
        { "day": 1, "title": "Beans", "script": [{ "visual": "bag", "audio": "Fresh." }] },
        { "day": 2, "title": "Grind", "script": [] }
      ]
    }
  });
  let resp = oneshot_raw(state.clone(), "POST", "/api/scripts", Some(&auth), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let created = json_body(resp).await;
  assert_eq!(created["calendar_days"], 2);

  let uri = format!("/api/scripts/{}", created["id"].as_str().unwrap());
  let fetched = json_body(oneshot_raw(state, "GET", &uri, Some(&auth), None).await).await;
  assert_eq!(fetched["content"], created["content"]);
}

#[tokio::test]
async fn empty_content_is_rejected() {
  let state = make_state(Ok(COFFEE_REPLY)).await;
  let auth = sign_up(&state, "alice@example.com").await;
  let resp = oneshot_raw(
    state,
    "POST",
    "/api/scripts",
    Some(&auth),
    Some(json!({ "title": "Empty", "topic": "tea" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_title_uses_topic() {
  let state = make_state(Ok(COFFEE_REPLY)).await;
  let auth = sign_up(&state, "alice@example.com").await;
  let mut body = script_body();
  body["title"] = json!("");
  let resp = oneshot_raw(state, "POST", "/api/scripts", Some(&auth), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  assert_eq!(json_body(resp).await["title"], "home coffee brewing");
}

#[tokio::test]
async fn get_put_delete_roundtrip() {
  let state = make_state(Ok(COFFEE_REPLY)).await;
  let auth = sign_up(&state, "alice@example.com").await;
  let created = create_script(&state, &auth).await;
  let uri = format!("/api/scripts/{}", created["id"].as_str().unwrap());

  let resp = oneshot_raw(state.clone(), "GET", &uri, Some(&auth), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["title"], "Brew Better");

  let mut body = script_body();
  body["tone"] = json!("Humorous");
  let resp = oneshot_raw(state.clone(), "PUT", &uri, Some(&auth), Some(body)).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["tone"], "Humorous");

  let resp = oneshot_raw(state.clone(), "DELETE", &uri, Some(&auth), None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);

  let resp = oneshot_raw(state, "GET", &uri, Some(&auth), None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn other_users_script_is_forbidden() {
  let state = make_state(Ok(COFFEE_REPLY)).await;
  let alice = sign_up(&state, "alice@example.com").await;
  let mallory = sign_up(&state, "mallory@example.com").await;
  let created = create_script(&state, &alice).await;
  let uri = format!("/api/scripts/{}", created["id"].as_str().unwrap());

  let resp = oneshot_raw(state.clone(), "GET", &uri, Some(&mallory), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  assert_eq!(json_body(resp).await["error"], "access denied");

  let resp = oneshot_raw(state.clone(), "PUT", &uri, Some(&mallory), Some(script_body())).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let resp = oneshot_raw(state.clone(), "DELETE", &uri, Some(&mallory), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let resp = oneshot_raw(state.clone(), "GET", "/api/scripts", Some(&mallory), None).await;
  assert_eq!(json_body(resp).await["scripts"], json!([]));

  // Alice's script is untouched.
  let resp = oneshot_raw(state, "GET", &uri, Some(&alice), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_script_is_404() {
  let state = make_state(Ok(COFFEE_REPLY)).await;
  let auth = sign_up(&state, "alice@example.com").await;
  let uri = format!("/api/scripts/{}", uuid::Uuid::new_v4());
  let resp = oneshot_raw(state, "GET", &uri, Some(&auth), None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
