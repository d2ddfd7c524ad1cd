//! Wire protocol between a Phrost simulation and the Phrost engine.
//!
//! # Crate Structure
//!
//! - [`transport`]: duplex byte channel (Unix socket, Windows named pipe)
//! - [`frame`]: per-tick length-prefixed framing
//! - [`pack`]: event catalog, command encoder, channel multiplexer, decoder
//! - [`client`]: simulation-side tick loop (behind the `client` feature)

/// Re-export transport types.
pub mod transport {
    pub use phrost_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use phrost_frame::*;
}

/// Re-export the binary event format.
pub mod pack {
    pub use phrost_pack::*;
}

/// Re-export client types (requires `client` feature).
#[cfg(feature = "client")]
pub mod client {
    pub use phrost_client::*;
}

pub use phrost_pack::{args, ChannelEncoder, CommandEncoder, EntityId, EventKind, Value};
