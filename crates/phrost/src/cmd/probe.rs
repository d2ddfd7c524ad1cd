use phrost_client::{connect_with_config, ClientConfig, ClientError};
use phrost_frame::FrameError;
use phrost_transport::Endpoint;
use tracing::info;

use crate::cmd::{print_payload, ProbeArgs};
use crate::exit::{client_error, CliError, CliResult, DATA_INVALID, FAILURE, SUCCESS};
use crate::output::OutputFormat;

pub fn run(args: ProbeArgs, format: OutputFormat) -> CliResult<i32> {
    let endpoint = args.endpoint.map_or_else(Endpoint::resolve, Endpoint::new);
    let config = ClientConfig::new(endpoint);
    let mut client =
        connect_with_config(&config).map_err(|err| client_error("connect failed", err))?;

    let tick = match client.read_frame() {
        Ok(tick) => tick,
        Err(ClientError::Frame(FrameError::Closed)) => {
            return Err(CliError::new(
                FAILURE,
                format!("engine at {} closed before the first tick", config.endpoint),
            ));
        }
        Err(err) => return Err(client_error("read tick failed", err)),
    };
    let complete = print_payload(Some(0), Some(tick.dt), &tick.payload, args.channels, format)?;

    client
        .write_frame(&[])
        .map_err(|err| client_error("write commands failed", err))?;
    client
        .disconnect()
        .map_err(|err| client_error("disconnect failed", err))?;
    info!(endpoint = %config.endpoint, "probe answered one tick");

    Ok(if complete { SUCCESS } else { DATA_INVALID })
}
