//! HTTP seam between the adapters and the network.

use crate::error::TransportError;
use async_trait::async_trait;
use oauth2::url::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// A provider's HTTP answer, reduced to what the adapters inspect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Sends the two kinds of request the provider protocols need.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POSTs a form-encoded body.
    async fn post_form(
        &self,
        url: &Url,
        form: &[(&str, &str)],
    ) -> idbridge_core::Result<HttpResponse, TransportError>;

    /// GETs a resource with `Authorization: Bearer <token>`.
    async fn get_bearer(
        &self,
        url: &Url,
        token: &str,
    ) -> idbridge_core::Result<HttpResponse, TransportError>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a client with the given per-request timeout and redirects disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> idbridge_core::Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| TransportError::ClientBuild {
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    async fn send(
        &self,
        url: &Url,
        request: reqwest::RequestBuilder,
    ) -> idbridge_core::Result<HttpResponse, TransportError> {
        let response = request.send().await.map_err(|e| request_error(url, &e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| request_error(url, &e))?;
        Ok(HttpResponse { status, body })
    }
}

fn request_error(url: &Url, e: &reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransportError::RequestFailed {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_form(
        &self,
        url: &Url,
        form: &[(&str, &str)],
    ) -> idbridge_core::Result<HttpResponse, TransportError> {
        let request = self.client.post(url.clone()).form(form);
        self.send(url, request).await
    }

    async fn get_bearer(
        &self,
        url: &Url,
        token: &str,
    ) -> idbridge_core::Result<HttpResponse, TransportError> {
        let request = self.client.get(url.clone()).bearer_auth(token);
        self.send(url, request).await
    }
}
