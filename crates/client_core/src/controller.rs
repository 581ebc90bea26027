//! Request state holder behind the text box and the analyze action.

use shared::domain::SentimentResult;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{PredictError, SentimentBackend};

pub const REQUEST_CANCELLED_MESSAGE: &str = "Sentiment request was cancelled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// Owned copy of the controller state handed to views.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControllerSnapshot {
    pub text: String,
    pub request_state: RequestState,
    pub result: Option<SentimentResult>,
    pub error: Option<String>,
    in_flight: usize,
    submissions: u64,
}

impl ControllerSnapshot {
    pub fn is_pending(&self) -> bool {
        self.request_state == RequestState::Pending
    }

    /// Number of submits that have started (blank submits excluded).
    pub fn submissions(&self) -> u64 {
        self.submissions
    }

    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.in_flight
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Trimmed input was empty; nothing was sent.
    Skipped,
    Succeeded(SentimentResult),
    Failed(String),
    /// This request settled while another was still outstanding; its outcome
    /// was dropped in favour of whichever settles last.
    Superseded,
}

pub struct SentimentRequestController<B: SentimentBackend> {
    backend: B,
    state: watch::Sender<ControllerSnapshot>,
}

impl<B: SentimentBackend> SentimentRequestController<B> {
    pub fn new(backend: B) -> Self {
        let (state, _) = watch::channel(ControllerSnapshot::default());
        Self { backend, state }
    }

    #[cfg(test)]
    fn backend(&self) -> &B {
        &self.backend
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ControllerSnapshot> {
        self.state.subscribe()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_if_modified(|state| {
            if state.text == text {
                return false;
            }
            state.text = text;
            true
        });
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let mut request_text = None;
        self.state.send_if_modified(|state| {
            if state.text.trim().is_empty() {
                return false;
            }
            state.request_state = RequestState::Pending;
            state.result = None;
            state.error = None;
            state.in_flight += 1;
            state.submissions += 1;
            request_text = Some(state.text.clone());
            true
        });

        let Some(text) = request_text else {
            debug!("ignoring submit with blank input");
            return SubmitOutcome::Skipped;
        };

        let guard = InFlightGuard {
            state: &self.state,
            settled: false,
        };
        let settled = self.backend.predict(&text).await;
        if let Err(err) = &settled {
            debug!(error = %err, "sentiment request failed");
        }
        guard.settle(settled)
    }
}

/// Holds one `in_flight` slot for the duration of a request. Dropping it
/// without `settle` (the submit future was cancelled) releases the slot and,
/// if it was the last one, moves the state to `Failed`.
struct InFlightGuard<'a> {
    state: &'a watch::Sender<ControllerSnapshot>,
    settled: bool,
}

impl InFlightGuard<'_> {
    fn settle(mut self, settled: Result<SentimentResult, PredictError>) -> SubmitOutcome {
        self.settled = true;
        let mut outcome = SubmitOutcome::Superseded;
        self.state.send_modify(|state| {
            state.in_flight = state.in_flight.saturating_sub(1);
            if state.in_flight > 0 {
                return;
            }
            match settled {
                Ok(result) => {
                    state.request_state = RequestState::Succeeded;
                    state.result = Some(result);
                    state.error = None;
                    outcome = SubmitOutcome::Succeeded(result);
                }
                Err(err) => {
                    let message = err.to_string();
                    state.request_state = RequestState::Failed;
                    state.result = None;
                    state.error = Some(message.clone());
                    outcome = SubmitOutcome::Failed(message);
                }
            }
        });
        outcome
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("sentiment request cancelled before it settled");
        self.state.send_modify(|state| {
            state.in_flight = state.in_flight.saturating_sub(1);
            if state.in_flight == 0 {
                state.request_state = RequestState::Failed;
                state.result = None;
                state.error = Some(REQUEST_CANCELLED_MESSAGE.to_string());
            }
        });
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
