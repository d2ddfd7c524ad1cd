//! Duplex byte channel between the simulation process and the engine.
//!
//! Provides a unified interface over the platform's local transport:
//! - Unix domain sockets (Linux/macOS)
//! - Named pipes (Windows)
//!
//! This is the lowest layer of phrost-wire. Everything else builds on top of
//! the [`IpcStream`] type and the [`Duplex`] capability provided here.

pub mod duplex;
pub mod endpoint;
pub mod error;
pub mod memory;
pub mod traits;

#[cfg(windows)]
pub mod pipe;
#[cfg(unix)]
pub mod uds;

pub use duplex::{read_exact_or_closed, write_all_or_closed, Duplex};
pub use endpoint::{connect, Endpoint, DEFAULT_ENDPOINT, ENDPOINT_ENV};
pub use error::{Result, TransportError};
pub use memory::MemoryDuplex;
pub use traits::IpcStream;

#[cfg(windows)]
pub use pipe::NamedPipe;
#[cfg(unix)]
pub use uds::UnixDomainSocket;
