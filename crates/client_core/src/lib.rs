use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::SentimentResult,
    protocol::{PredictRequest, PredictResponse},
};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

pub mod config;
mod controller;
pub mod view;

pub use config::{load_settings, ClientSettings, SettingsError};
pub use controller::{
    ControllerSnapshot, RequestState, SentimentRequestController, SubmitOutcome,
    REQUEST_CANCELLED_MESSAGE,
};

/// User-facing message for any non-2xx answer from the classifier.
pub const ANALYZE_FAILED_MESSAGE: &str = "Failed to analyze sentiment";

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("{}", ANALYZE_FAILED_MESSAGE)]
    Status(StatusCode),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("malformed sentiment response: {0}")]
    Parse(String),
    #[error("sentiment backend is unavailable: {0}")]
    Unavailable(String),
}

impl PredictError {
    /// HTTP status behind the failure, when the service answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status(status) => Some(*status),
            Self::Transport(err) => err.status(),
            Self::Parse(_) | Self::Unavailable(_) => None,
        }
    }
}

#[async_trait]
pub trait SentimentBackend: Send + Sync {
    async fn predict(&self, text: &str) -> Result<SentimentResult, PredictError>;
}

#[async_trait]
impl<T> SentimentBackend for Box<T>
where
    T: SentimentBackend + ?Sized,
{
    async fn predict(&self, text: &str) -> Result<SentimentResult, PredictError> {
        (**self).predict(text).await
    }
}

#[async_trait]
impl<T> SentimentBackend for Arc<T>
where
    T: SentimentBackend + ?Sized,
{
    async fn predict(&self, text: &str) -> Result<SentimentResult, PredictError> {
        (**self).predict(text).await
    }
}

/// Stand-in used when no usable endpoint could be configured, so front ends
/// still start and report the problem on submit.
pub struct MissingSentimentBackend {
    reason: String,
}

impl MissingSentimentBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SentimentBackend for MissingSentimentBackend {
    async fn predict(&self, _text: &str) -> Result<SentimentResult, PredictError> {
        Err(PredictError::Unavailable(self.reason.clone()))
    }
}

pub struct HttpSentimentBackend {
    http: Client,
    endpoint: Url,
}

impl HttpSentimentBackend {
    pub fn new(endpoint: Url, request_timeout: Option<Duration>) -> Result<Self, PredictError> {
        let mut builder = Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint,
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, PredictError> {
        Self::new(settings.endpoint.clone(), settings.request_timeout)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SentimentBackend for HttpSentimentBackend {
    async fn predict(&self, text: &str) -> Result<SentimentResult, PredictError> {
        let result = self.post_predict(text).await;
        match &result {
            Ok(result) => info!(
                endpoint = %self.endpoint,
                sentiment = %result.sentiment(),
                confidence = result.confidence(),
                "sentiment classified"
            ),
            Err(err) => warn!(
                endpoint = %self.endpoint,
                status = ?err.status(),
                error = %err,
                "sentiment request failed"
            ),
        }
        result
    }
}

impl HttpSentimentBackend {
    async fn post_predict(&self, text: &str) -> Result<SentimentResult, PredictError> {
        debug!(endpoint = %self.endpoint, "posting sentiment request");
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&PredictRequest {
                text: text.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictError::Status(status));
        }

        let body = response.bytes().await?;
        let parsed: PredictResponse =
            serde_json::from_slice(&body).map_err(|err| PredictError::Parse(err.to_string()))?;
        SentimentResult::try_from(parsed).map_err(|err| PredictError::Parse(err.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
