use crate::foundation::ids::NodeId;

/// Convenience result type used across the crate.
pub type UndanganResult<T> = Result<T, UndanganError>;

/// Top-level error taxonomy.
#[derive(thiserror::Error, Debug)]
pub enum UndanganError {
    /// A variant bundle that cannot be animated reversibly.
    #[error("invalid variant set: {0}")]
    InvalidVariantSet(String),

    /// A node handle that no longer refers to a mounted node.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// Invalid user-provided content or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UndanganError {
    /// Build a [`UndanganError::InvalidVariantSet`] value.
    pub fn invalid_variant_set(msg: impl Into<String>) -> Self {
        Self::InvalidVariantSet(msg.into())
    }

    /// Build a [`UndanganError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`UndanganError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for UndanganError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
