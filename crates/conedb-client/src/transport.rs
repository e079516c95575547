//! HTTP transport
//!
//! Thin wrapper around `reqwest` owning the base URL, authentication header
//! and timeout. Endpoint wrappers in [`crate::api`] build on the typed
//! helpers here; nothing outside this module touches `reqwest` responses.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Maximum error body bytes to read (prevent unbounded allocation)
const MAX_ERROR_BODY_BYTES: usize = 4096;

pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl Transport {
    pub(crate) fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.controller_url().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("Api-Key", self.api_key.expose_secret())
            .header("Accept", "application/json")
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, &[]).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(path);
        debug!(method = "GET", url = %url, "api request");
        let resp = self.authed(self.http.get(&url)).query(query).send().await?;
        self.read_json(resp, path).await
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        debug!(method = "POST", url = %url, "api request");
        let resp = self.authed(self.http.post(&url)).json(body).send().await?;
        self.read_json(resp, path).await
    }

    /// POST where the response body is not interesting (e.g. `accepted`).
    pub(crate) async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        debug!(method = "POST", url = %url, "api request");
        let resp = self.authed(self.http.post(&url)).json(body).send().await?;
        self.check_status(resp).await
    }

    pub(crate) async fn patch_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let url = self.url(path);
        debug!(method = "PATCH", url = %url, "api request");
        let resp = self.authed(self.http.patch(&url)).json(body).send().await?;
        self.check_status(resp).await
    }

    pub(crate) async fn delete_unit(&self, path: &str, query: &[(&str, String)]) -> Result<()> {
        let url = self.url(path);
        debug!(method = "DELETE", url = %url, "api request");
        let resp = self
            .authed(self.http.delete(&url))
            .query(query)
            .send()
            .await?;
        self.check_status(resp).await
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        path: &str,
    ) -> Result<T> {
        if !resp.status().is_success() {
            return Err(error_response(resp).await);
        }
        resp.json()
            .await
            .map_err(|e| Error::Serialization(format!("failed to parse response from {path}: {e}")))
    }

    async fn check_status(&self, resp: reqwest::Response) -> Result<()> {
        if !resp.status().is_success() {
            return Err(error_response(resp).await);
        }
        Ok(())
    }
}

/// Map a non-success response to an [`Error`], reading at most
/// [`MAX_ERROR_BODY_BYTES`] of the body.
async fn error_response(resp: reqwest::Response) -> Error {
    let status = resp.status().as_u16();

    let body = match resp.bytes().await {
        Ok(b) => {
            if b.len() > MAX_ERROR_BODY_BYTES {
                String::from_utf8_lossy(&b[..MAX_ERROR_BODY_BYTES]).to_string()
            } else {
                String::from_utf8_lossy(&b).to_string()
            }
        }
        Err(_) => String::new(),
    };

    match status {
        401 | 403 => Error::Auth(body),
        _ => Error::Api {
            status,
            message: body,
        },
    }
}
