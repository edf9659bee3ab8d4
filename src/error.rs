use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, JuzuError>;

#[derive(Error, Debug)]
pub enum JuzuError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Unable to create a client: {0}")]
    Connect(#[from] tonic::transport::Error),

    #[error("Timed out connecting to {addr} after {timeout:?}")]
    ConnectTimeout { addr: String, timeout: Duration },

    #[error("RPC failed: {0}")]
    Status(#[from] tonic::Status),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The outbound half can no longer deliver messages because the call has
    /// already ended. The call's actual status is reported on the inbound half.
    #[error("Stream closed by peer")]
    StreamClosed,

    #[error("Streaming task failed: {0}")]
    Task(String),

    #[error("Unable to start streaming diarization: {0}")]
    OpenFailed(Box<JuzuError>),

    #[error("Streaming diarization failed: {0}")]
    StreamingFailed(Box<JuzuError>),
}

impl JuzuError {
    pub fn is_stream_closed(&self) -> bool {
        matches!(self, JuzuError::StreamClosed)
    }

    /// The innermost error, with the session wrappers removed.
    pub fn root_cause(&self) -> &JuzuError {
        match self {
            JuzuError::OpenFailed(inner) | JuzuError::StreamingFailed(inner) => inner.root_cause(),
            other => other,
        }
    }
}

impl From<tokio::task::JoinError> for JuzuError {
    fn from(err: tokio::task::JoinError) -> Self {
        JuzuError::Task(err.to_string())
    }
}
