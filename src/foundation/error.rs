/// Convenience result type used across Aurascope.
pub type AuraResult<T> = Result<T, AuraError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only construction paths return these. Frame computation, hashing and table lookups are total
/// and never fail for well-typed inputs.
#[derive(thiserror::Error, Debug)]
pub enum AuraError {
    /// Unknown enum names or malformed static tables.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed numeric input supplied at construction.
    #[error("validation error: {0}")]
    Validation(String),

    /// A computed frame left its documented interval.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AuraError {
    /// Build a [`AuraError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`AuraError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`AuraError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`AuraError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for AuraError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
