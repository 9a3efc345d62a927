pub mod accounts;
pub mod generate;
pub mod scripts;

/// `GET /healthz`
pub async fn healthz() -> &'static str { "ok" }
