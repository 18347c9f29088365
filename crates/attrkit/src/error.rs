use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttrError {
    /// A name is absent and nothing supplied a fallback.
    #[error("Name not found: {0}")]
    NotFound(String),

    /// A strict getter could not resolve a name.
    #[error("Attribute missing: {0}")]
    AttributeMissing(String),

    #[error("Target does not accept writes: {0}")]
    ImmutableTarget(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// One or more attribute restorations failed when a scope closed.
    #[error("Failed to restore attributes: {0}")]
    Restoration(RestorationFailures),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Invalid delegation: {0}")]
    InvalidDelegation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] confique::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Every failure collected while restoring a scope, in restoration order.
#[derive(Debug)]
pub struct RestorationFailures(pub Vec<AttrError>);

impl RestorationFailures {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttrError> {
        self.0.iter()
    }
}

impl fmt::Display for RestorationFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, AttrError>;
