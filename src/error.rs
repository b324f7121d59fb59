//! Crate-level error types.
//!
//! The response extractor never returns these; they cover the generation
//! client, the desk and trade-setup decoding when called directly.

pub type Result<T> = std::result::Result<T, NexusError>;

#[derive(Debug, thiserror::Error)]
pub enum NexusError {
    /// Transport-level failure talking to the model endpoint.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("model api returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("chat message is empty")]
    EmptyMessage,

    /// JSON decoded but does not describe a usable trade setup.
    #[error("invalid trade setup: {0}")]
    InvalidSetup(String),

    #[error("model returned no content")]
    EmptyResponse,
}
