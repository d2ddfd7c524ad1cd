//! Channel multiplexer: one encoder per logical channel, finalized into a
//! single indexed blob.
//!
//! ```text
//! ┌────────────┬──────────────────────────────┬──────────────────────────┐
//! │ count (u32)│ count × (id u32, size u32)   │ channel blobs, same order│
//! └────────────┴──────────────────────────────┴──────────────────────────┘
//! ```
//!
//! Ids are sorted ascending; that order is part of the wire contract.

use std::collections::BTreeMap;

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

use crate::codec::Reader;
use crate::decoder::{unpack, Unpacked};
use crate::encoder::CommandEncoder;
use crate::error::{DecodeError, EncodeError};
use crate::kind::EventKind;
use crate::value::Value;

/// Well-known logical channels. Any `u32` id may be used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum Channel {
    Renderer = 0,
    Input = 1,
    Physics = 2,
    Audio = 3,
    Gui = 4,
    Window = 5,
    Script = 6,
}

impl Channel {
    pub const ALL: [Channel; 7] = [
        Channel::Renderer,
        Channel::Input,
        Channel::Physics,
        Channel::Audio,
        Channel::Gui,
        Channel::Window,
        Channel::Script,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Channel::Renderer => "RENDERER",
            Channel::Input => "INPUT",
            Channel::Physics => "PHYSICS",
            Channel::Audio => "AUDIO",
            Channel::Gui => "GUI",
            Channel::Window => "WINDOW",
            Channel::Script => "SCRIPT",
        }
    }
}

impl From<Channel> for u32 {
    fn from(channel: Channel) -> Self {
        channel.id()
    }
}

/// Human-readable name for a channel id.
pub fn channel_name(id: u32) -> &'static str {
    Channel::from_id(id).map_or("USER", Channel::name)
}

/// Groups commands by channel for one tick.
#[derive(Debug, Default)]
pub struct ChannelEncoder {
    channels: BTreeMap<u32, CommandEncoder>,
}

impl ChannelEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route one command to `channel`, creating its encoder on first use.
    pub fn add(
        &mut self,
        channel: impl Into<u32>,
        kind: EventKind,
        args: Vec<Value>,
    ) -> Result<(), EncodeError> {
        self.channels
            .entry(channel.into())
            .or_default()
            .add(kind, args)
    }

    /// Direct access to one channel's encoder, creating it on first use.
    pub fn channel(&mut self, channel: impl Into<u32>) -> &mut CommandEncoder {
        self.channels.entry(channel.into()).or_default()
    }

    /// Encoded plus pending commands across every channel.
    pub fn total_event_count(&self) -> usize {
        self.channels.values().map(CommandEncoder::total_event_count).sum()
    }

    /// Channels touched since the last finalize, ascending.
    pub fn channel_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.channels.keys().copied()
    }

    /// Build the indexed blob and discard every per-channel encoder.
    ///
    /// Zero bytes when no channel was used this tick.
    pub fn finalize(&mut self) -> Bytes {
        let channels = std::mem::take(&mut self.channels);
        if channels.is_empty() {
            return Bytes::new();
        }

        let mut index = BytesMut::with_capacity(4 + channels.len() * 8);
        let mut data = BytesMut::new();
        index.put_u32_le(channels.len() as u32);
        for (id, mut encoder) in channels {
            let blob = encoder.finalize();
            index.put_u32_le(id);
            index.put_u32_le(blob.len() as u32);
            data.extend_from_slice(&blob);
        }
        index.unsplit(data);
        index.freeze()
    }
}

/// One channel's region of a channel blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSection<'a> {
    pub id: u32,
    pub data: &'a [u8],
}

/// Split a channel blob into its per-channel command blobs.
///
/// Checks that ids are strictly ascending, that every declared region lies
/// inside the blob, and that the regions cover the data exactly.
pub fn decode_channels(blob: &[u8]) -> Result<Vec<ChannelSection<'_>>, DecodeError> {
    if blob.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = Reader::new(blob);
    let count = reader.u32()?;
    let mut index = Vec::with_capacity(count.min(1024) as usize);
    let mut previous: Option<u32> = None;
    for _ in 0..count {
        let id = reader.u32()?;
        let size = reader.u32()?;
        if let Some(previous) = previous {
            if id <= previous {
                return Err(DecodeError::ChannelOrder { previous, id });
            }
        }
        previous = Some(id);
        index.push((id, size));
    }

    let declared: u64 = index.iter().map(|&(_, size)| u64::from(size)).sum();
    if declared != reader.remaining() as u64 {
        // Sizes running past the end are a truncation; slack is a sizing bug.
        if declared > reader.remaining() as u64 {
            return Err(DecodeError::truncated(
                reader.offset(),
                usize::try_from(declared).unwrap_or(usize::MAX),
                reader.remaining(),
            ));
        }
        return Err(DecodeError::ChannelSizes {
            declared,
            actual: reader.remaining(),
        });
    }

    index
        .into_iter()
        .map(|(id, size)| {
            let data = reader.take(size as usize)?;
            Ok(ChannelSection { id, data })
        })
        .collect()
}

/// Decode every channel of a channel blob with [`unpack`].
pub fn unpack_channels(blob: &[u8]) -> Result<Vec<(u32, Unpacked)>, DecodeError> {
    Ok(decode_channels(blob)?
        .into_iter()
        .map(|section| (section.id, unpack(section.data)))
        .collect())
}
