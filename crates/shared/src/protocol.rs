use serde::{Deserialize, Serialize};

use crate::{
    domain::{Sentiment, SentimentResult},
    error::ResponseValidationError,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictRequest {
    pub text: String,
}

/// Success body of `POST /predict`. Extra fields (the service also sends a
/// numeric `label`) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub sentiment: Sentiment,
    pub confidence: f64,
}

impl TryFrom<PredictResponse> for SentimentResult {
    type Error = ResponseValidationError;

    fn try_from(value: PredictResponse) -> Result<Self, Self::Error> {
        SentimentResult::new(value.sentiment, value.confidence)
    }
}
