//! The seam where a retrieval backend attaches.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{Answer, Citation},
    error::RetrievalError,
    protocol::{AnswerQueryRequest, AnswerQueryResponse},
};
use tracing::{debug, info};
use url::Url;

use crate::config::Settings;

pub const DEFAULT_CANNED_LATENCY: Duration = Duration::from_millis(2000);

#[async_trait]
pub trait AnswerProvider: Send + Sync {
    async fn answer_query(&self, query: &str) -> Result<Answer, RetrievalError>;
}

/// Bounds a provider call; expiry becomes [`RetrievalError::Timeout`].
pub async fn answer_with_timeout<P>(
    provider: &P,
    query: &str,
    timeout: Duration,
) -> Result<Answer, RetrievalError>
where
    P: AnswerProvider + ?Sized,
{
    match tokio::time::timeout(timeout, provider.answer_query(query)).await {
        Ok(result) => result,
        Err(_) => Err(RetrievalError::Timeout(timeout)),
    }
}

pub fn build_provider(settings: &Settings) -> Arc<dyn AnswerProvider> {
    match &settings.answer_endpoint {
        Some(endpoint) => {
            info!(%endpoint, "using http answer provider");
            Arc::new(HttpAnswerProvider::new(endpoint.clone()))
        }
        None => {
            info!(
                latency_ms = settings.canned_latency.as_millis() as u64,
                "using canned answer provider"
            );
            Arc::new(CannedAnswerProvider::new(settings.canned_latency))
        }
    }
}

pub fn canned_answer() -> Answer {
    Answer {
        answer: "Yes, under Section 166 of the Motor Vehicles Act, 1988, the claimants are entitled to an addition for future prospects even when the deceased was self-employed and aged 54–55 years at the time of the accident. In Dani Devi v. Pritam Singh, the Court held that 10% of the deceased's annual income should be added as future prospects.".to_string(),
        citations: vec![Citation {
            text: "as the age of the deceased at the time of accident was held to be about 54-55 years by the learned Tribunal, being self-employed, as such, 10% of annual income should have been awarded on account of future prospects.".to_string(),
            source: "Dani_Devi_v_Pritam_Singh.pdf".to_string(),
            link: "https://lexisingapore-my.sharepoint.com/:b:/g/personal/harshit_lexi_sg/EdOegeiR_gdBvQxdyW4xE6oBCDgj5E4Bo5wjvhPHpqgIuQ?e=TEu4vz".to_string(),
            paragraph: Some("Para 7".to_string()),
        }],
    }
}

/// Waits a fixed latency and returns [`canned_answer`] whatever the query.
#[derive(Debug, Clone, Copy)]
pub struct CannedAnswerProvider {
    latency: Duration,
}

impl CannedAnswerProvider {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for CannedAnswerProvider {
    fn default() -> Self {
        Self::new(DEFAULT_CANNED_LATENCY)
    }
}

#[async_trait]
impl AnswerProvider for CannedAnswerProvider {
    async fn answer_query(&self, _query: &str) -> Result<Answer, RetrievalError> {
        tokio::time::sleep(self.latency).await;
        Ok(canned_answer())
    }
}

/// POSTs `{"query": ...}` to an answer service and decodes the JSON reply.
#[derive(Debug, Clone)]
pub struct HttpAnswerProvider {
    client: Client,
    endpoint: Url,
}

impl HttpAnswerProvider {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl AnswerProvider for HttpAnswerProvider {
    async fn answer_query(&self, query: &str) -> Result<Answer, RetrievalError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&AnswerQueryRequest {
                query: query.to_string(),
            })
            .send()
            .await
            .map_err(|err| RetrievalError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| RetrievalError::Transport(format!("failed to read body: {err}")))?;
        debug!(status = status.as_u16(), bytes = body.len(), "answer service replied");

        match serde_json::from_slice::<AnswerQueryResponse>(&body) {
            Ok(AnswerQueryResponse::Answer(answer)) if status.is_success() => Ok(answer),
            Ok(AnswerQueryResponse::Error(api)) => Err(RetrievalError::Service {
                status: status.as_u16(),
                code: Some(api.code),
                message: api.message,
            }),
            Err(err) if status.is_success() => Err(RetrievalError::InvalidResponse(err.to_string())),
            Ok(AnswerQueryResponse::Answer(_)) | Err(_) => {
                let text = String::from_utf8_lossy(&body).trim().to_string();
                let message = if text.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                } else {
                    text
                };
                Err(RetrievalError::Service {
                    status: status.as_u16(),
                    code: None,
                    message,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/provider_tests.rs"]
mod tests;
