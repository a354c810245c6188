use thiserror::Error;

/// Failures reported by root growth operations.
///
/// None of these are fatal: the engine stays in its previous state.
#[derive(Debug, Error)]
pub enum RootError {
    /// An anchor reference was never set or has been dropped by its owner
    #[error("{0} anchor reference is not valid")]
    InvalidEndpoint(&'static str),

    #[error("roots have not been initialized with anchors")]
    NotInitialized,

    #[error("invalid growth config: {field} must be positive and finite, got {value}")]
    InvalidConfig { field: &'static str, value: f32 },

    #[error("anchor {endpoint} reported a non-finite position")]
    NonFinitePosition { endpoint: String },

    #[error("config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, RootError>;
