use crate::cmd::{print_payload, DecodeArgs};
use crate::exit::{io_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::OutputFormat;

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let blob = std::fs::read(&args.file)
        .map_err(|err| io_error(&format!("read {}", args.file.display()), err))?;

    // Events before a halt are still printed; the exit code flags it.
    if print_payload(None, None, &blob, args.channels, format)? {
        Ok(SUCCESS)
    } else {
        Ok(DATA_INVALID)
    }
}
