use thiserror::Error;

/// Errors raised by the observation pipeline.
///
/// Every failure surfaces to the caller as one of these variants. Nothing in the
/// pipeline retries, and logging a failure never replaces returning it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AtlasError {
    /// An operation needs state that was never set (time, location).
    #[error("Precondition failed for {operation}: {missing} is not set")]
    Precondition {
        operation: &'static str,
        missing: &'static str,
    },
    /// Unrecognised alias or an impossible combination of settings.
    #[error("Invalid {kind}: {value}. Valid values: {valid:?}")]
    Configuration {
        kind: &'static str,
        value: String,
        valid: Vec<String>,
    },
    #[error("Unknown target: {name}")]
    UnknownTarget { name: String },
    /// The engine returned a tuple of unexpected arity.
    #[error("Shape mismatch for {context}: expected {expected} values, got {found}")]
    Shape {
        context: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{field} is not set for celestial state: {body}")]
    UnsetField { field: &'static str, body: String },
    #[error("Swiss Ephemeris error-code {code} from {operation} (body {body:?}, time index {time_index:.6})")]
    Engine {
        code: i32,
        operation: &'static str,
        body: Option<i32>,
        time_index: f64,
    },
}

impl AtlasError {
    pub(crate) fn configuration(kind: &'static str, value: &str, valid: &[&str]) -> Self {
        AtlasError::Configuration {
            kind,
            value: value.to_string(),
            valid: valid.iter().map(|v| v.to_string()).collect(),
        }
    }
}
