use phrost_frame::FrameConfig;
use phrost_transport::Endpoint;

/// Connection settings for [`connect_with_config`](crate::connect_with_config).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Where the engine listens. Defaults to [`Endpoint::resolve`].
    pub endpoint: Endpoint,
    /// Payload limits for both directions.
    pub frame: FrameConfig,
}

impl ClientConfig {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            frame: FrameConfig::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Endpoint::resolve())
    }
}
