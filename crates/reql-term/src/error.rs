//! Error types for reql-term

use crate::term_type::TermType;
use thiserror::Error;

/// The result type for term construction and compilation
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or compiling a term tree
#[derive(Debug, Error)]
pub enum Error {
    /// A tag's argument-count contract was violated
    #[error("Arity error: {tag} expects {expected} argument(s) but got {actual}")]
    Arity {
        tag: String,
        expected: String,
        actual: usize,
    },

    /// A host value could not be normalized into a term
    #[error("Coercion error at {path}: cannot coerce {shape}: {reason}")]
    Coercion {
        shape: &'static str,
        path: String,
        reason: String,
    },

    /// A tag outside the catalog in use
    #[error("Unknown term type: {tag}")]
    UnknownTag { tag: TermType },

    /// Rendering the compiled payload to bytes failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Create an arity error
    pub fn arity(tag: impl Into<String>, expected: impl Into<String>, actual: usize) -> Self {
        Error::Arity {
            tag: tag.into(),
            expected: expected.into(),
            actual,
        }
    }

    /// Create a coercion error
    pub fn coercion(
        shape: &'static str,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::Coercion {
            shape,
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown-tag error
    pub fn unknown_tag(tag: TermType) -> Self {
        Error::UnknownTag { tag }
    }

    /// Re-anchor a coercion path under `outer`, for errors raised while a
    /// function body was being built.
    pub(crate) fn within(self, outer: &str) -> Self {
        match self {
            Error::Coercion {
                shape,
                path,
                reason,
            } => Error::Coercion {
                shape,
                path: format!("{outer}.{path}"),
                reason,
            },
            other => other,
        }
    }

    /// Whether the error signals an internally inconsistent tree.
    ///
    /// Callers should not retry or recover from these.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::UnknownTag { .. })
    }
}
