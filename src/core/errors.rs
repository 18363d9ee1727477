//! Shared error types for the crate

use thiserror::Error;

/// Main error type for analysis operations
#[derive(Debug, Error)]
pub enum Error {
    /// The submitted root node is not an analyzable syntax tree
    #[error("invalid syntax tree: {0}")]
    InvalidTree(&'static str),

    /// A module was submitted with an empty path
    #[error("invalid module path")]
    InvalidPath,

    /// Mean cyclomatic complexity of zero cannot occur when every scope
    /// starts at one; reaching this means the accumulator is defective
    #[error("encountered function with cyclomatic complexity zero")]
    ZeroCyclomatic,

    /// A module failed during batch analysis, annotated with its path
    #[error("{path}: {source}")]
    Module {
        path: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap an error with the path of the module it occurred in
    pub fn for_module(self, path: impl Into<String>) -> Self {
        Self::Module {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
