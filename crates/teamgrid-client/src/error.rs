//! Client error types for the Teamgrid SDK

/// Error type for Teamgrid client operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned error: status={status}, message={message}")]
    ServerError { status: u16, message: String },

    #[error("range overlaps assignment group {existing_group_id}")]
    Conflict { existing_group_id: i64 },

    #[error("optimistic update rolled back: {0}")]
    RolledBack(#[source] Box<ClientError>),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
