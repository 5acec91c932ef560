use std::{io, path::PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

/// An error while tuning a USB-serial adapter
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The path does not exist; callers usually treat this as "skip"
    #[error("`{}` does not exist", .0.display())]
    NotFound(PathBuf),

    /// The OS refused access to the path, usually because the tool was not run as root
    #[error("permission denied on `{}` (run as root)", .0.display())]
    PermissionDenied(PathBuf),

    /// The write went through but the driver reports a different value
    #[error("driver reports `{found}`, expected `{expected}`")]
    WriteRejected { expected: u8, found: String },

    /// The fallback helper is not on `PATH`
    #[error("`{0}` not found on PATH")]
    ToolUnavailable(String),

    /// Any other I/O failure on a latency attribute
    #[error("IO error on `{}`: `{source}`", .path.display())]
    Attribute { path: PathBuf, source: io::Error },

    /// Failure writing the report or spawning a helper
    #[error("IO error: `{0:?}`")]
    IO(io::Error),

    #[cfg(feature = "serialport_comm")]
    #[error("Serial port error: `{0:?}`")]
    SerialPort(serialport::Error),
}

impl Error {
    /// Classify an I/O error that happened on `path`
    pub fn from_io(path: impl Into<PathBuf>, e: io::Error) -> Self {
        let path = path.into();
        match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound(path),
            io::ErrorKind::PermissionDenied => Error::PermissionDenied(path),
            _ => Error::Attribute { path, source: e },
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IO(e)
    }
}

#[cfg(feature = "serialport_comm")]
impl From<serialport::Error> for Error {
    fn from(e: serialport::Error) -> Self {
        Error::SerialPort(e)
    }
}
