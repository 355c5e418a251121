use payloads::APIClient;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Where the LMC backend lives.
///
/// Environment variables can be set directly or loaded from a .env file:
/// - BACKEND_URL: base address of the backend, without the `/api` suffix
///   (defaults to http://localhost:8080)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_owned(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        let backend_url = std::env::var("BACKEND_URL")
            .map(|url| url.trim_end_matches('/').to_owned())
            .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_owned());
        Self { backend_url }
    }

    pub fn api_client(&self) -> APIClient {
        APIClient {
            address: self.backend_url.clone(),
            inner_client: reqwest::Client::new(),
        }
    }
}
