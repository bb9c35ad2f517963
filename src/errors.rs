use thiserror::Error;

/// Errors that can occur while serving symbol queries.
///
/// These are protocol- and infrastructure-level failures. Domain
/// outcomes such as "symbol not found" are not errors at this tier;
/// they are modeled by [`crate::ops::ToolError`] and reported to the
/// client as successful replies flagged as error results.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error("snapshot error: {message} (path: {path})")]
    Snapshot { message: String, path: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `ServerError`.
pub type Result<T> = std::result::Result<T, ServerError>;
