use super::{read_body, Backend};
use crate::config::Config;
use crate::error::ApiError;
use crate::summary::{SummaryEnvelope, SummaryPayload};

#[derive(Clone)]
pub struct SummaryClient {
    backend: Backend,
    path: String,
}

impl SummaryClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Ok(Self {
            backend: Backend::from_config(config)?,
            path: config.summary_path().to_string(),
        })
    }

    /// Fetch the structured summary for one document
    pub async fn fetch(&self, document: &str) -> Result<SummaryPayload, ApiError> {
        let response = self
            .backend
            .get(&self.path)
            .query(&[("documentKey", document)])
            .send()
            .await?;

        let body = read_body(response).await?;
        let envelope: SummaryEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.into_payload())
    }
}
