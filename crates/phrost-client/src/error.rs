/// Errors that can occur while talking to the engine.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level error (connect, shutdown).
    #[error("transport error: {0}")]
    Transport(#[from] phrost_transport::TransportError),

    /// Frame-level error (closure, short frame, oversized payload).
    #[error("frame error: {0}")]
    Frame(#[from] phrost_frame::FrameError),
}

impl ClientError {
    /// True when the engine side of the channel has gone away.
    pub fn is_closed(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_closed(),
            Self::Frame(err) => err.is_closed(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
