//! Per-tick framing between the simulation process and the engine.
//!
//! Each tick exchanges exactly one frame in each direction:
//! - inbound (engine to simulation): `u32 length` + `f64 dt` + `length - 8`
//!   bytes of event blob
//! - outbound (simulation to engine): `u32 length` + `length` bytes of
//!   command blob
//!
//! All integers and floats are little-endian. Reads and writes block until
//! the whole frame has moved; closure of the channel is a distinct error.

pub mod codec;
pub mod error;
pub mod stream;

pub use codec::{
    encode_command_frame, encode_tick_frame, FrameConfig, TickFrame, DEFAULT_MAX_PAYLOAD,
    DT_SIZE, LENGTH_PREFIX_SIZE, WIRE_MAX_PAYLOAD,
};
pub use error::{FrameError, Result};
pub use stream::FrameStream;
