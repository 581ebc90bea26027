use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ResponseValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classification accepted from the remote service.
///
/// Only constructible through [`SentimentResult::new`], so `confidence` is
/// always finite and within `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentResult {
    sentiment: Sentiment,
    confidence: f64,
}

impl SentimentResult {
    pub fn new(sentiment: Sentiment, confidence: f64) -> Result<Self, ResponseValidationError> {
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(ResponseValidationError::ConfidenceOutOfRange(confidence));
        }
        Ok(Self {
            sentiment,
            confidence,
        })
    }

    pub fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}
