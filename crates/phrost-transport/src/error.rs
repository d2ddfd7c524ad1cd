use std::io::ErrorKind;
use std::path::PathBuf;

/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to bind to the specified address.
    #[error("failed to bind to {path}: {source}")]
    Bind {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The engine endpoint could not be reached.
    #[error("engine endpoint {path} unavailable ({reason}): {source}")]
    EndpointUnavailable {
        path: PathBuf,
        reason: &'static str,
        source: std::io::Error,
    },

    /// Failed to accept an incoming connection.
    #[error("failed to accept connection: {0}")]
    Accept(std::io::Error),

    /// An I/O error occurred on the transport stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The socket path is too long for the platform.
    #[error("socket path too long ({len} bytes, max {max}): {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },

    /// The peer closed the channel before the transfer completed.
    #[error("channel closed ({transferred} of {expected} bytes transferred)")]
    Closed { transferred: usize, expected: usize },
}

impl TransportError {
    /// Build an [`TransportError::EndpointUnavailable`] with a cause derived
    /// from the I/O error kind.
    pub fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let reason = match source.kind() {
            ErrorKind::NotFound => "endpoint not found; is the engine running?",
            ErrorKind::ConnectionRefused => "connection refused; is the engine running?",
            ErrorKind::PermissionDenied => "permission denied",
            _ => "connect failed",
        };
        Self::EndpointUnavailable {
            path: path.into(),
            reason,
            source,
        }
    }

    /// True when the error means the channel is closed.
    pub fn is_closed(&self) -> bool {
        match self {
            Self::Closed { .. } => true,
            Self::Io(err) => matches!(
                err.kind(),
                ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::UnexpectedEof
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
