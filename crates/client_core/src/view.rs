//! Presentation rules shared by the desktop window and the terminal client.

use shared::domain::{Sentiment, SentimentResult};

pub const TITLE: &str = "Sentiment Analyzer";
pub const SUBTITLE: &str = "Enter text to detect if it's Positive or Negative...";
pub const INPUT_PLACEHOLDER: &str = "Type something here... (e.g., 'I love this product!')";
pub const INPUT_ROWS: usize = 4;

pub fn submit_enabled(text: &str, pending: bool) -> bool {
    !pending && !text.trim().is_empty()
}

pub fn submit_label(pending: bool) -> &'static str {
    if pending {
        "Analyzing..."
    } else {
        "Analyze Sentiment"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub headline: &'static str,
    pub tone: &'static str,
    /// Width of the confidence bar as a fraction of its track.
    pub fill: f32,
    pub confidence_text: String,
}

impl From<&SentimentResult> for ResultView {
    fn from(result: &SentimentResult) -> Self {
        let (headline, tone) = match result.sentiment() {
            Sentiment::Positive => ("Positive 😄", "positive"),
            Sentiment::Negative => ("Negative 😩", "negative"),
        };
        Self {
            headline,
            tone,
            fill: result.confidence().clamp(0.0, 1.0) as f32,
            confidence_text: format!("Confidence: {:.1}%", result.confidence() * 100.0),
        }
    }
}

/// Text rendition of the confidence bar, `width` cells wide.
pub fn confidence_bar(fill: f32, width: usize) -> String {
    let filled = ((fill.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
