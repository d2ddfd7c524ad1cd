use std::path::Path;

use bytes::Bytes;
use phrost_frame::{FrameConfig, FrameError, FrameStream, TickFrame};
use phrost_pack::{unpack, unpack_channels, DecodeError, Unpacked};
use phrost_transport::{Duplex, IpcStream};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::Result;

/// Connect to the engine listening at `path`.
pub fn connect(path: impl AsRef<Path>) -> Result<EngineClient> {
    let path = path.as_ref();
    let stream = phrost_transport::connect(path)?;
    info!(path = %path.display(), transport = stream.transport_name(), "connected to engine");
    Ok(EngineClient::new(stream))
}

/// Connect using an explicit [`ClientConfig`].
pub fn connect_with_config(config: &ClientConfig) -> Result<EngineClient> {
    let stream = config.endpoint.connect()?;
    info!(
        endpoint = %config.endpoint,
        transport = stream.transport_name(),
        "connected to engine"
    );
    Ok(EngineClient::with_config(stream, config.frame.clone()))
}

/// One engine tick handed to the update callback.
#[derive(Debug, Clone)]
pub struct Tick {
    /// Ticks completed before this one.
    pub elapsed: u64,
    /// Seconds since the previous tick, as reported by the engine.
    pub dt: f64,
    /// Raw event blob for this tick (possibly empty).
    pub events: Bytes,
}

impl Tick {
    /// Decode the events as a command blob.
    pub fn unpack(&self) -> Unpacked {
        unpack(&self.events)
    }

    /// Decode the events as a channel blob.
    pub fn unpack_channels(&self) -> std::result::Result<Vec<(u32, Unpacked)>, DecodeError> {
        unpack_channels(&self.events)
    }
}

/// What the update callback wants to happen after a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickResponse {
    /// Send these command bytes as this tick's outbound frame.
    Commands(Bytes),
    /// Stop the loop without answering this tick.
    Quit,
}

impl From<Bytes> for TickResponse {
    fn from(commands: Bytes) -> Self {
        Self::Commands(commands)
    }
}

/// Why [`EngineClient::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndedBy {
    /// The update callback returned [`TickResponse::Quit`].
    Quit,
    /// The channel closed during a read or write.
    PeerClosed,
}

/// Outcome of a completed [`EngineClient::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks answered with a command frame.
    pub ticks: u64,
    pub ended_by: EndedBy,
}

/// Simulation side of one engine connection.
///
/// Strictly request/response: read one tick frame, answer with one command
/// frame. Every call blocks; there is no timeout. Use
/// [`close_handle`](EngineClient::close_handle) to unblock from another
/// thread.
#[derive(Debug)]
pub struct EngineClient<T = IpcStream> {
    frames: FrameStream<T>,
    ticks: u64,
}

impl<T: Duplex> EngineClient<T> {
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            frames: FrameStream::with_config(inner, config),
            ticks: 0,
        }
    }

    /// Read the next tick frame (blocking).
    pub fn read_frame(&mut self) -> Result<TickFrame> {
        Ok(self.frames.read_tick()?)
    }

    /// Send one command frame (blocking until every byte is written).
    pub fn write_frame(&mut self, payload: &[u8]) -> Result<()> {
        Ok(self.frames.write_command(payload)?)
    }

    /// Ticks answered so far, across every call to [`run`](Self::run).
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Drive the tick loop until the callback quits or the engine hangs up.
    ///
    /// Closure on either direction ends the loop normally with
    /// [`EndedBy::PeerClosed`]. Any other error is returned; a
    /// [`FrameError::TooShort`] frame has already been consumed, so calling
    /// `run` again resumes at the next frame.
    pub fn run<F>(&mut self, mut update: F) -> Result<RunSummary>
    where
        F: FnMut(Tick) -> TickResponse,
    {
        let started = self.ticks;
        let ended_by = loop {
            let frame = match self.frames.read_tick() {
                Ok(frame) => frame,
                Err(FrameError::Closed) => {
                    debug!(ticks = self.ticks, "engine closed the channel on read");
                    break EndedBy::PeerClosed;
                }
                Err(err) => return Err(err.into()),
            };

            let tick = Tick {
                elapsed: self.ticks,
                dt: frame.dt,
                events: frame.payload,
            };
            let commands = match update(tick) {
                TickResponse::Commands(commands) => commands,
                TickResponse::Quit => {
                    debug!(ticks = self.ticks, "update requested quit");
                    break EndedBy::Quit;
                }
            };

            match self.frames.write_command(&commands) {
                Ok(()) => self.ticks += 1,
                Err(FrameError::Closed) => {
                    debug!(ticks = self.ticks, "engine closed the channel on write");
                    break EndedBy::PeerClosed;
                }
                Err(err) => return Err(err.into()),
            }
        };

        let summary = RunSummary {
            ticks: self.ticks - started,
            ended_by,
        };
        info!(ticks = summary.ticks, ended_by = ?summary.ended_by, "tick loop finished");
        Ok(summary)
    }

    pub fn get_ref(&self) -> &T {
        self.frames.get_ref()
    }

    pub fn into_inner(self) -> T {
        self.frames.into_inner()
    }

    /// Close the channel.
    pub fn disconnect(mut self) -> Result<()> {
        self.frames.close()?;
        debug!(ticks = self.ticks, "disconnected from engine");
        Ok(())
    }
}

impl EngineClient<IpcStream> {
    /// A handle that can close this connection from another thread.
    pub fn close_handle(&self) -> Result<CloseHandle> {
        Ok(CloseHandle {
            stream: self.frames.get_ref().try_clone()?,
        })
    }
}

/// Closes an [`EngineClient`]'s channel from outside the tick loop.
///
/// A blocked read or write on the client observes closure and `run` returns
/// with [`EndedBy::PeerClosed`].
#[derive(Debug)]
pub struct CloseHandle {
    stream: IpcStream,
}

impl CloseHandle {
    pub fn close(&self) -> Result<()> {
        self.stream.shutdown()?;
        debug!("engine channel closed by handle");
        Ok(())
    }
}
