use thiserror::Error;

/// A request payload failed its schema checks.
///
/// The message is meant for humans and is returned verbatim in 400 responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Validation error: {message} at \"{field}\"")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
