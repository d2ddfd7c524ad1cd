//! Simulation-side connection to the Phrost engine.
//!
//! Connect to the engine's endpoint, then exchange exactly one frame in each
//! direction per tick:
//!
//! ```no_run
//! use bytes::Bytes;
//! use phrost_client::{connect_with_config, ClientConfig, TickResponse};
//!
//! let mut client = connect_with_config(&ClientConfig::default())?;
//! let summary = client.run(|tick| {
//!     let _events = tick.unpack();
//!     TickResponse::Commands(Bytes::new())
//! })?;
//! println!("{} ticks, ended by {:?}", summary.ticks, summary.ended_by);
//! # Ok::<(), phrost_client::ClientError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::{
    connect, connect_with_config, CloseHandle, EndedBy, EngineClient, RunSummary, Tick,
    TickResponse,
};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
