use bytes::{Bytes, BytesMut};
use phrost_transport::Duplex;
use tracing::{trace, warn};

use crate::codec::{
    encode_command_frame, encode_tick_frame, FrameConfig, TickFrame, DT_SIZE, LENGTH_PREFIX_SIZE,
};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Inbound payloads grow the buffer at most this much per receive.
const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Blocking tick-frame I/O over any [`Duplex`] channel.
///
/// The simulation side calls [`read_tick`](Self::read_tick) then
/// [`write_command`](Self::write_command) once per tick. The engine side
/// (mock engine, tests) uses the mirror pair
/// [`write_tick`](Self::write_tick) / [`read_command`](Self::read_command).
#[derive(Debug)]
pub struct FrameStream<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Duplex> FrameStream<T> {
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read one inbound tick frame (blocking).
    ///
    /// A declared length below 8 consumes those bytes and fails with
    /// [`FrameError::TooShort`], leaving the stream at the next frame.
    pub fn read_tick(&mut self) -> Result<TickFrame> {
        let len = self.read_len()?;
        if (len as usize) < DT_SIZE {
            self.discard(len as usize)?;
            warn!(len, "tick frame shorter than its timestep");
            return Err(FrameError::TooShort { len });
        }

        let mut dt = [0u8; DT_SIZE];
        self.inner.recv_exact(&mut dt)?;
        let dt = f64::from_le_bytes(dt);

        let payload = self.read_payload(len as usize - DT_SIZE)?;
        trace!(dt, payload_len = payload.len(), "tick frame received");
        Ok(TickFrame { dt, payload })
    }

    /// Read one outbound command frame (blocking). Engine side.
    pub fn read_command(&mut self) -> Result<Bytes> {
        let len = self.read_len()? as usize;
        let payload = self.read_payload(len)?;
        trace!(payload_len = payload.len(), "command frame received");
        Ok(payload)
    }

    /// Send `payload` as one command frame, then flush.
    pub fn write_command(&mut self, payload: &[u8]) -> Result<()> {
        self.check_size(payload.len())?;
        self.buf.clear();
        encode_command_frame(payload, &mut self.buf)?;
        self.inner.send_all(&self.buf)?;
        trace!(payload_len = payload.len(), "command frame sent");
        Ok(())
    }

    /// Send one tick frame, then flush. Engine side.
    pub fn write_tick(&mut self, dt: f64, payload: &[u8]) -> Result<()> {
        self.check_size(payload.len())?;
        self.buf.clear();
        encode_tick_frame(dt, payload, &mut self.buf)?;
        self.inner.send_all(&self.buf)?;
        trace!(dt, payload_len = payload.len(), "tick frame sent");
        Ok(())
    }

    /// Close the underlying channel.
    pub fn close(&mut self) -> Result<()> {
        self.inner.close().map_err(Into::into)
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    fn read_len(&mut self) -> Result<u32> {
        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        self.inner.recv_exact(&mut prefix)?;
        Ok(u32::from_le_bytes(prefix))
    }

    fn read_payload(&mut self, len: usize) -> Result<Bytes> {
        self.check_size(len)?;
        self.buf.clear();
        while self.buf.len() < len {
            let start = self.buf.len();
            let chunk = (len - start).min(READ_CHUNK_SIZE);
            self.buf.resize(start + chunk, 0);
            self.inner.recv_exact(&mut self.buf[start..])?;
        }
        Ok(self.buf.split().freeze())
    }

    fn discard(&mut self, len: usize) -> Result<()> {
        let mut scratch = [0u8; DT_SIZE];
        self.inner.recv_exact(&mut scratch[..len])?;
        Ok(())
    }

    fn check_size(&self, size: usize) -> Result<()> {
        if size > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size,
                max: self.config.max_payload_size,
            });
        }
        Ok(())
    }
}
