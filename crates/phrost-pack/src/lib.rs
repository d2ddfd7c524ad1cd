//! Binary command/event format shared by the simulation and the engine.
//!
//! - [`catalog`]: the layout of every [`EventKind`]
//! - [`CommandEncoder`]: packs commands into a count-prefixed blob
//! - [`ChannelEncoder`]: groups encoders by logical channel into one
//!   indexed blob
//! - [`unpack`] / [`unpack_channels`]: decode blobs back into events
//!
//! ```
//! use phrost_pack::{args, unpack, CommandEncoder, EventKind};
//!
//! let mut encoder = CommandEncoder::new();
//! encoder.add(EventKind::SpriteRemove, args![42i64, 7i64]).unwrap();
//! let blob = encoder.finalize();
//! assert_eq!(blob.len(), 4 + 12 + 16);
//!
//! let unpacked = unpack(&blob);
//! assert_eq!(unpacked.events[0].kind, EventKind::SpriteRemove);
//! ```

pub mod catalog;
pub mod channel;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod id;
pub mod kind;
pub mod value;

mod codec;

pub use catalog::{Field, FieldType, Layout, Segment};
pub use channel::{
    channel_name, decode_channels, unpack_channels, Channel, ChannelEncoder, ChannelSection,
};
pub use codec::EVENT_HEADER_SIZE;
pub use decoder::{unpack, DecodedEvent, Unpacked};
pub use encoder::CommandEncoder;
pub use error::{DecodeError, EncodeError};
pub use id::EntityId;
pub use kind::EventKind;
pub use value::Value;
