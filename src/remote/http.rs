use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use super::RemoteRepos;
use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use crate::types::{CreateRepo, RepoDescriptor};

/// Connection-level failures are retried this many times before the error
/// reaches the caller. Distinct from the provisioning-level conflict retry.
const TRANSPORT_RETRIES: usize = 10;

/// Reqwest-backed client for the remote repository-management API.
///
/// One instance holds one connection pool and is safe to share between
/// threads; all methods are blocking.
pub struct HttpRemote {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct CreatedRepo {
    repo_id: String,
}

#[derive(Serialize)]
struct GrantEntry<'a> {
    username: &'a str,
    password: String,
}

#[derive(Serialize)]
struct AccessModification<'a> {
    grant: Vec<GrantEntry<'a>>,
    revoke: &'a [String],
}

/// Maps a non-2xx remote status to its taxonomy error. Unknown codes fall
/// into the catch-all so new server statuses degrade instead of crashing.
fn map_status(code: u16) -> Error {
    match code {
        400 => Error::BadRequest,
        404 => Error::NotFound,
        500 => Error::InternalError,
        other => Error::Remote(other),
    }
}

/// Runs `op` until it yields anything other than a connection or timeout
/// failure, allowing up to `retries` retries beyond the first attempt.
fn retry_transport<T>(
    retries: usize,
    mut op: impl FnMut() -> reqwest::Result<T>,
) -> Result<T> {
    let mut attempt = 0;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if attempt < retries && (e.is_connect() || e.is_timeout()) => {
                attempt += 1;
                tracing::warn!("transport failure (attempt {attempt}), retrying: {e}");
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Rewrites generic bcrypt scheme markers (`$2a$`, `$2b$`) to the `$2y$`
/// variant the remote authentication module expects. Everything after the
/// marker passes through untouched, and non-bcrypt strings are left alone.
fn normalize_bcrypt_marker(hash: &str) -> String {
    if let Some(rest) = hash
        .strip_prefix("$2a$")
        .or_else(|| hash.strip_prefix("$2b$"))
    {
        format!("$2y${rest}")
    } else {
        hash.to_string()
    }
}

impl HttpRemote {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            username: config.username,
            password: config.password,
        })
    }

    fn request(&self, method: Method, rel_url: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, rel_url);
        // The URL never contains credentials, so it is safe to log.
        tracing::info!("{} {}", method, url);
        let req = self.client.request(method, url);
        if self.username.is_empty() && self.password.is_empty() {
            // Trusted internal deployments run without authentication.
            req
        } else {
            req.basic_auth(&self.username, Some(&self.password))
        }
    }

    /// Sends a request, retrying connection and timeout failures. Any
    /// response, success or error status, ends the retry loop.
    fn send(&self, build: impl Fn() -> RequestBuilder) -> Result<Response> {
        retry_transport(TRANSPORT_RETRIES, || build().send())
    }

    fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T> {
        let body = resp.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl RemoteRepos for HttpRemote {
    fn fetch_repo(&self, repo_id: &str) -> Result<RepoDescriptor> {
        let resp = self.send(|| self.request(Method::GET, &format!("repo/{repo_id}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(map_status(status.as_u16()));
        }
        Self::decode(resp)
    }

    fn create_repo(&self, info: &CreateRepo) -> Result<String> {
        let resp = self.send(|| self.request(Method::POST, "repo").json(info))?;
        let status = resp.status();
        if status.as_u16() == 409 {
            return Err(Error::AlreadyExists(info.repo_id.clone()));
        }
        if !status.is_success() {
            return Err(map_status(status.as_u16()));
        }
        let created: CreatedRepo = Self::decode(resp)?;
        Ok(created.repo_id)
    }

    fn delete_repo(&self, repo_id: &str) -> Result<()> {
        let resp = self.send(|| self.request(Method::DELETE, &format!("repo/{repo_id}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(map_status(status.as_u16()));
        }
        Ok(())
    }

    fn modify_access(
        &self,
        repo_id: &str,
        grant: &[(String, String)],
        revoke: &[String],
    ) -> Result<()> {
        let body = AccessModification {
            grant: grant
                .iter()
                .map(|(username, hash)| GrantEntry {
                    username,
                    password: normalize_bcrypt_marker(hash),
                })
                .collect(),
            revoke,
        };
        let resp = self.send(|| {
            self.request(Method::POST, &format!("repo/{repo_id}/access"))
                .json(&body)
        })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(map_status(status.as_u16()));
        }
        Ok(())
    }
}
