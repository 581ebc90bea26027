use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResponseValidationError {
    #[error("confidence {0} is outside the range [0, 1]")]
    ConfidenceOutOfRange(f64),
}
