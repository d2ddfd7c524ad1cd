use phrost_transport::TransportError;

/// Errors that can occur while moving tick frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The channel closed before a complete frame moved.
    #[error("connection closed (incomplete frame)")]
    Closed,

    /// An inbound tick frame declared a length shorter than its timestep.
    #[error("tick frame too short ({len} bytes, need at least 8 for dt)")]
    TooShort { len: u32 },

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Any other transport failure.
    #[error("frame transport error: {0}")]
    Transport(TransportError),
}

impl FrameError {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl From<TransportError> for FrameError {
    fn from(err: TransportError) -> Self {
        if err.is_closed() {
            Self::Closed
        } else {
            Self::Transport(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
