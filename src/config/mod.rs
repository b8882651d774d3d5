use serde::{Deserialize, Serialize};

/// Connection settings for the remote repository-management API.
///
/// The URL and the credentials are separate fields so the URL can show up in
/// logs without ever dragging the credentials along.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the remote API, e.g. "https://repo.example.com/api/".
    pub api_url: String,
    /// Username for HTTP basic auth. Leave both credential fields empty to
    /// send unauthenticated requests (trusted internal deployments only).
    pub username: String,
    pub password: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8085/api/".to_string(),
            username: String::new(),
            password: String::new(),
        }
    }
}
