use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_catalog, OutputFormat};

pub fn run(format: OutputFormat) -> CliResult<i32> {
    print_catalog(format);
    Ok(SUCCESS)
}
