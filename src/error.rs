use thiserror::Error;

pub type SfcResult<T> = Result<T, SfcError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SfcError {
    #[error("Malformed input at byte {offset}: {message}")]
    MalformedInput { offset: usize, message: String },

    // --- synthesis / execution errors ---

    #[error("Cannot synthesize '{method}': {message}")]
    SynthesisError { method: String, message: String },

    #[error("'{method}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        method: String,
        expected: usize,
        got: usize,
    },

    #[error("Script runtime error in '{method}': {message}")]
    ScriptRuntimeError { method: String, message: String },

    #[error("Call to '{method}' timed out after {timeout_ms}ms")]
    CallTimeout { method: String, timeout_ms: u64 },

    // --- ambient errors ---

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl SfcError {
    pub(crate) fn malformed(offset: usize, message: impl Into<String>) -> Self {
        SfcError::MalformedInput {
            offset,
            message: message.into(),
        }
    }

    /// True for errors caused by the component text itself. Retrying with the
    /// same text always fails the same way.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, SfcError::MalformedInput { .. })
    }
}

impl From<serde_yaml::Error> for SfcError {
    fn from(err: serde_yaml::Error) -> Self {
        SfcError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for SfcError {
    fn from(err: std::io::Error) -> Self {
        SfcError::Io(err.to_string())
    }
}
