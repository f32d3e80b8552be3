//! Scripted transport for adapter tests.

use crate::error::TransportError;
use crate::transport::{HttpResponse, HttpTransport};
use async_trait::async_trait;
use oauth2::url::Url;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A request the scripted transport received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Recorded {
    Form {
        url: String,
        form: Vec<(String, String)>,
    },
    Bearer {
        url: String,
        token: String,
    },
}

impl Recorded {
    pub(crate) fn form_value(&self, key: &str) -> Option<&str> {
        match self {
            Self::Form { form, .. } => form
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            Self::Bearer { .. } => None,
        }
    }

    pub(crate) fn url(&self) -> &str {
        match self {
            Self::Form { url, .. } | Self::Bearer { url, .. } => url,
        }
    }
}

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub(crate) fn fail(self, error: TransportError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub(crate) fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn next(&self) -> idbridge_core::Result<HttpResponse, TransportError> {
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(error)) => Err(error.into()),
            None => Err(TransportError::RequestFailed {
                url: "scripted".to_string(),
                reason: "no scripted response left".to_string(),
            }
            .into()),
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_form(
        &self,
        url: &Url,
        form: &[(&str, &str)],
    ) -> idbridge_core::Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(Recorded::Form {
            url: url.to_string(),
            form: form
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        });
        self.next()
    }

    async fn get_bearer(
        &self,
        url: &Url,
        token: &str,
    ) -> idbridge_core::Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(Recorded::Bearer {
            url: url.to_string(),
            token: token.to_string(),
        });
        self.next()
    }
}
