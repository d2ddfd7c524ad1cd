use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Size of the `u32` length prefix on every frame.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Size of the `f64` timestep that opens every inbound frame.
pub const DT_SIZE: usize = 8;

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Largest payload a tick frame's length prefix can describe.
pub const WIRE_MAX_PAYLOAD: usize = u32::MAX as usize - DT_SIZE;

/// One inbound tick: the engine's timestep and the raw event blob.
#[derive(Debug, Clone, PartialEq)]
pub struct TickFrame {
    /// Seconds elapsed since the previous tick.
    pub dt: f64,
    /// Encoded events (a command blob or channel blob, possibly empty).
    pub payload: Bytes,
}

impl TickFrame {
    pub fn new(dt: f64, payload: impl Into<Bytes>) -> Self {
        Self {
            dt,
            payload: payload.into(),
        }
    }

    /// The value written in the length prefix.
    pub fn declared_len(&self) -> usize {
        DT_SIZE + self.payload.len()
    }

    /// Total wire size including the length prefix.
    pub fn wire_size(&self) -> usize {
        LENGTH_PREFIX_SIZE + self.declared_len()
    }
}

/// Encode an inbound tick frame.
///
/// ```text
/// ┌──────────────┬───────────┬────────────────────────┐
/// │ Length (4B)  │ dt (8B)   │ Payload                │
/// │ u32 LE       │ f64 LE    │ (Length - 8 bytes)     │
/// └──────────────┴───────────┴────────────────────────┘
/// ```
pub fn encode_tick_frame(dt: f64, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let declared = DT_SIZE + payload.len();
    let len = u32::try_from(declared).map_err(|_| FrameError::PayloadTooLarge {
        size: payload.len(),
        max: WIRE_MAX_PAYLOAD,
    })?;
    dst.reserve(LENGTH_PREFIX_SIZE + declared);
    dst.put_u32_le(len);
    dst.put_f64_le(dt);
    dst.put_slice(payload);
    Ok(())
}

/// Encode an outbound command frame: `u32 length` then the payload.
pub fn encode_command_frame(payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let len = u32::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge {
        size: payload.len(),
        max: u32::MAX as usize,
    })?;
    dst.reserve(LENGTH_PREFIX_SIZE + payload.len());
    dst.put_u32_le(len);
    dst.put_slice(payload);
    Ok(())
}

/// Configuration for frame streams.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Largest payload accepted in either direction. Default: 16 MiB.
    pub max_payload_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}
