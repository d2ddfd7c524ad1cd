use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod catalog;
pub mod decode;
pub mod engine;
pub mod probe;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the event layout catalog.
    Catalog,
    /// Decode a command blob or channel blob file.
    Decode(DecodeArgs),
    /// Run a mock engine that ticks one simulation client.
    Engine(EngineArgs),
    /// Connect as a simulation, answer one tick and print it.
    Probe(ProbeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Catalog => catalog::run(format),
        Command::Decode(args) => decode::run(args, format),
        Command::Engine(args) => engine::run(args, format),
        Command::Probe(args) => probe::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Blob file to decode.
    pub file: PathBuf,
    /// Treat the file as a channel blob.
    #[arg(long)]
    pub channels: bool,
}

#[derive(Args, Debug)]
pub struct EngineArgs {
    /// Socket path to bind.
    pub path: PathBuf,
    /// Number of tick frames to send before exiting.
    #[arg(long, default_value_t = 1)]
    pub frames: u64,
    /// Timestep carried by every tick frame, in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub dt: f64,
    /// Event blob to send with every tick (default: empty).
    #[arg(long, value_name = "FILE")]
    pub events: Option<PathBuf>,
    /// Decode received commands as channel blobs.
    #[arg(long)]
    pub channels: bool,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Engine endpoint (default: platform endpoint).
    #[arg(long, env = "PHROST_ENDPOINT")]
    pub endpoint: Option<PathBuf>,
    /// Decode the tick's events as a channel blob.
    #[arg(long)]
    pub channels: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Decode and print one frame payload; false if decoding halted early.
fn print_payload(
    frame: Option<u64>,
    dt: Option<f64>,
    payload: &[u8],
    channels: bool,
    format: OutputFormat,
) -> CliResult<bool> {
    use phrost_pack::{decode_channels, unpack};

    use crate::exit::decode_error;
    use crate::output::{print_batch, EventBatch};

    if !channels {
        let unpacked = unpack(payload);
        print_batch(
            &EventBatch {
                frame,
                dt,
                channel: None,
                payload_size: payload.len(),
                unpacked: &unpacked,
            },
            format,
        );
        return Ok(unpacked.is_complete());
    }

    let sections =
        decode_channels(payload).map_err(|err| decode_error("invalid channel blob", &err))?;
    let mut complete = true;
    for section in sections {
        let unpacked = unpack(section.data);
        complete &= unpacked.is_complete();
        print_batch(
            &EventBatch {
                frame,
                dt,
                channel: Some(section.id),
                payload_size: section.data.len(),
                unpacked: &unpacked,
            },
            format,
        );
    }
    Ok(complete)
}
