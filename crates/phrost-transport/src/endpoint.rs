use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::traits::IpcStream;

/// Environment variable that overrides the engine endpoint.
pub const ENDPOINT_ENV: &str = "PHROST_ENDPOINT";

/// Well-known engine endpoint for this platform.
#[cfg(unix)]
pub const DEFAULT_ENDPOINT: &str = "/tmp/PhrostEngine.socket";
#[cfg(windows)]
pub const DEFAULT_ENDPOINT: &str = r"\\.\pipe\PhrostEngine";

/// Location of the engine's listening channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    path: PathBuf,
}

impl Endpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `PHROST_ENDPOINT` when set and non-empty, else [`DEFAULT_ENDPOINT`].
    pub fn resolve() -> Self {
        Self::from_override(std::env::var_os(ENDPOINT_ENV))
    }

    fn from_override(value: Option<OsString>) -> Self {
        match value {
            Some(path) if !path.is_empty() => Self::new(path),
            _ => Self::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection to the engine (blocking, single attempt).
    pub fn connect(&self) -> Result<IpcStream> {
        connect(&self.path)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Connect to the engine at `path` using the platform transport.
pub fn connect(path: impl AsRef<Path>) -> Result<IpcStream> {
    #[cfg(unix)]
    {
        crate::uds::UnixDomainSocket::connect(path)
    }
    #[cfg(windows)]
    {
        crate::pipe::NamedPipe::connect(path)
    }
}
