use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Fatal failure classes of the sampling pipeline.
///
/// Every variant aborts the whole build or split call; no partial learning
/// set is ever exposed. Per-candidate match rejection is *not* an error;
/// see [`crate::sampling::trim::TrimOutcome`].
#[derive(Debug, Error)]
pub enum SamplerError {
    /// A missing or invalid setting, detected before any work starts.
    #[error("configuration error: {0}")]
    Config(String),

    /// A caller-supplied argument outside its accepted domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A mandatory query returned zero rows.
    #[error("empty result: {0}")]
    EmptyResult(String),

    /// The selected matching policy has no defined acceptance semantics.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// A storage row did not have the expected shape or column types.
    #[error("row decode error: {0}")]
    Decode(String),

    /// Any failure inside the storage engine.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl SamplerError {
    pub fn config(msg: impl Into<String>) -> Self {
        SamplerError::Config(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        SamplerError::InvalidArgument(msg.into())
    }

    pub fn empty_result(msg: impl Into<String>) -> Self {
        SamplerError::EmptyResult(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        SamplerError::Decode(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SamplerError>;
