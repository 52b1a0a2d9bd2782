//! Resource resolution port interface

use thiserror::Error;

/// Resource resolution errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Empty resource reference")]
    Empty,

    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Malformed resource reference: {0}")]
    Malformed(String),
}

/// Port for normalizing caller-supplied references into loadable ones
pub trait ResourceResolver {
    /// Remap a reference.
    ///
    /// # Returns
    /// The concrete reference, or an error if it cannot be resolved. Callers
    /// fall back to the raw reference on error.
    fn remap(&self, reference: &str) -> Result<String, ResolveError>;
}
