//! Error types for portcheck
//!
//! All fallible operations return `Result<T, Error>`.
//! An adapter that lacks operations is a normal verification result,
//! not an error; see [`crate::verifier::VerificationResult`].

use thiserror::Error;

/// Portcheck error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Port definition is malformed or is the abstract base itself
    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    /// Adapter is missing operations required by a port
    #[error("Adapter does not implement {port}: missing {}", .missing.join(", "))]
    NotImplemented { port: String, missing: Vec<String> },

    /// Operation invoked on an adapter that does not expose it
    #[error("Adapter '{adapter}' does not respond to '{operation}'")]
    UnknownOperation { adapter: String, operation: String },

    /// Port or adapter manifest could not be read
    #[error("Manifest error: {0}")]
    Manifest(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Manifest(err.to_string())
    }
}

/// Result type alias for portcheck operations
pub type Result<T> = std::result::Result<T, Error>;
