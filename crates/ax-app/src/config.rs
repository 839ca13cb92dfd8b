use std::env;

/// Environment-driven configuration. A `.env` file next to the binary
/// is honored when present.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_url: String,
}

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

impl AppConfig {
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();

        let backend_url =
            env::var("AX_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());

        Self { backend_url }
    }
}
