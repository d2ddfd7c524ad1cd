use std::fs::OpenOptions;
use std::path::Path;

use tracing::info;

use crate::error::{Result, TransportError};
use crate::traits::IpcStream;

/// Client side of a Windows named pipe created by the engine.
pub struct NamedPipe;

impl NamedPipe {
    /// Open `path` (e.g. `\\.\pipe\PhrostEngine`) for reading and writing.
    ///
    /// Single attempt; a missing pipe or a pipe with no free instance is
    /// reported as [`TransportError::EndpointUnavailable`].
    pub fn connect(path: impl AsRef<Path>) -> Result<IpcStream> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|err| TransportError::unavailable(path, err))?;
        info!(?path, "connected to engine pipe");
        Ok(IpcStream::from_pipe(file))
    }
}
