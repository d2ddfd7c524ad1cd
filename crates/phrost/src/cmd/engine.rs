use crate::cmd::EngineArgs;
use crate::exit::CliResult;
use crate::output::OutputFormat;

#[cfg(not(unix))]
pub fn run(args: EngineArgs, _format: OutputFormat) -> CliResult<i32> {
    Err(crate::exit::CliError::new(
        crate::exit::USAGE,
        format!(
            "cannot serve {}: the mock engine needs Unix domain sockets",
            args.path.display()
        ),
    ))
}

#[cfg(unix)]
pub fn run(args: EngineArgs, format: OutputFormat) -> CliResult<i32> {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use phrost_frame::{FrameError, FrameStream};
    use phrost_transport::UnixDomainSocket;
    use tracing::info;

    use crate::cmd::print_payload;
    use crate::exit::{frame_error, io_error, transport_error, DATA_INVALID, SUCCESS};

    let events = match &args.events {
        Some(path) => std::fs::read(path)
            .map_err(|err| io_error(&format!("read {}", path.display()), err))?,
        None => Vec::new(),
    };

    let listener =
        UnixDomainSocket::bind(&args.path).map_err(|err| transport_error("bind failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let stream = listener
        .accept()
        .map_err(|err| transport_error("accept failed", err))?;
    info!(path = %args.path.display(), "simulation connected");
    let mut frames = FrameStream::new(stream);

    let mut complete = true;
    for frame in 0..args.frames {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        match frames.write_tick(args.dt, &events) {
            Ok(()) => {}
            Err(FrameError::Closed) => {
                info!(frame, "simulation disconnected");
                break;
            }
            Err(err) => return Err(frame_error("send tick failed", err)),
        }
        let commands = match frames.read_command() {
            Ok(commands) => commands,
            Err(FrameError::Closed) => {
                info!(frame, "simulation disconnected");
                break;
            }
            Err(err) => return Err(frame_error("receive commands failed", err)),
        };
        complete &= print_payload(Some(frame), None, &commands, args.channels, format)?;
    }

    let _ = frames.close();
    Ok(if complete { SUCCESS } else { DATA_INVALID })
}

#[cfg(unix)]
fn install_ctrlc_handler(running: std::sync::Arc<std::sync::atomic::AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, std::sync::atomic::Ordering::SeqCst);
    })
    .map_err(|err| {
        crate::exit::CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
