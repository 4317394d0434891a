pub mod chat;
pub mod summary;

pub use chat::{ChatClient, ChatRequest};
pub use summary::SummaryClient;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};

use crate::config::Config;
use crate::error::ApiError;

/// Connection settings shared by both backend clients
#[derive(Clone)]
pub(crate) struct Backend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl Backend {
    pub(crate) fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(|t| t.to_string()),
        })
    }

    pub(crate) fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            &config.api_base_url(),
            config.api_token.as_deref(),
            config.request_timeout(),
        )
    }

    pub(crate) fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.get(self.url(path)))
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.post(self.url(path)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Turn a non-success response into `ApiError::Status`, otherwise hand back
/// the body text for decoding
pub(crate) async fn read_body(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status,
            body: text.chars().take(200).collect(),
        });
    }
    Ok(response.text().await?)
}
