//! HTTP plumbing shared by every client: one configured
//! `reqwest::Client`, endpoint joining, and uniform response handling.
//!
//! Non-2xx responses become [`SyncError::Request`] carrying the body
//! text untouched — callers surface that text verbatim.

use reqwest::{Client, header};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::errors::SyncError;

#[derive(Debug)]
pub struct ApiTransport {
    base_url: String,
    client: Client,
}

impl ApiTransport {
    pub fn new(config: &Config) -> Result<Self, SyncError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json, text/plain"),
        );
        if let Some(token) = &config.api_token {
            let value = header::HeaderValue::from_str(&format!("Token {token}"))
                .map_err(|_| SyncError::validation("api_token contains invalid header bytes"))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(SyncError::Transport)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST url-encoded form fields, returning the raw body on 2xx.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<String, SyncError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(SyncError::Transport)?;
        Self::read(response).await
    }

    /// POST a form and parse the 2xx body as JSON.
    pub async fn post_form_json<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, String)],
    ) -> Result<T, SyncError> {
        let body = self.post_form(path, form).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Body-less PUT, for idempotent workflow transitions.
    pub async fn put(&self, path: &str) -> Result<String, SyncError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "PUT");
        let response = self
            .client
            .put(&url)
            .header(header::CONTENT_LENGTH, 0)
            .send()
            .await
            .map_err(SyncError::Transport)?;
        Self::read(response).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SyncError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(SyncError::Transport)?;
        let body = Self::read(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn read(response: reqwest::Response) -> Result<String, SyncError> {
        let status = response.status();
        let body = response.text().await.map_err(SyncError::Transport)?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "request rejected: {}", body.trim());
            return Err(SyncError::Request {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> ApiTransport {
        let config = Config {
            base_url: base.to_string(),
            ..Config::default()
        };
        ApiTransport::new(&config).unwrap()
    }

    #[test]
    fn endpoint_joins_without_doubled_slashes() {
        let api = transport("http://localhost:8000/");
        assert_eq!(
            api.endpoint("/api/channels/abc/control/"),
            "http://localhost:8000/api/channels/abc/control/"
        );
        assert_eq!(
            api.endpoint("services/trello/abc/add_item/"),
            "http://localhost:8000/services/trello/abc/add_item/"
        );
    }

    #[test]
    fn bad_token_bytes_are_a_validation_error() {
        let config = Config {
            api_token: Some("line\nbreak".to_string()),
            ..Config::default()
        };
        let err = ApiTransport::new(&config).unwrap_err();
        assert!(err.is_validation());
    }
}
