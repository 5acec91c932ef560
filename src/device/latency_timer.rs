use log::{debug, trace};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{Error, Result};

/// The latency timer attribute of one USB-serial device
///
/// The value is the number of milliseconds the adapter may hold received data before flushing it
/// to the host. The driver may reject or clamp a write, so every write is checked by reading the
/// attribute back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyAttribute {
    device: String,
    path: PathBuf,
}

/// Result of one write-and-verify cycle
#[derive(Debug)]
pub enum Outcome {
    Success,
    Failure(Error),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// What happened to one device
#[derive(Debug)]
pub struct DeviceReport {
    pub device: String,
    /// Value before the write, if it could be read
    pub before: Option<String>,
    pub outcome: Outcome,
}

impl LatencyAttribute {
    pub fn new(device_dir: impl AsRef<Path>, path: impl Into<PathBuf>) -> Self {
        let device = device_dir
            .as_ref()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| device_dir.as_ref().display().to_string());
        LatencyAttribute {
            device,
            path: path.into(),
        }
    }

    /// Name of the device directory, e.g. `ttyUSB0`
    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw attribute content with surrounding whitespace removed
    pub fn read(&self) -> Result<String> {
        let raw = fs::read_to_string(&self.path).map_err(|e| Error::from_io(&self.path, e))?;
        trace!("read: {} = {:?}", self.path.display(), raw);
        Ok(raw.trim().to_owned())
    }

    pub fn write(&self, latency_ms: u8) -> Result<()> {
        debug!("write: {} <- {}", self.path.display(), latency_ms);
        fs::write(&self.path, latency_ms.to_string()).map_err(|e| Error::from_io(&self.path, e))
    }

    /// Check that the attribute now holds `latency_ms`
    pub fn verify(&self, latency_ms: u8) -> Result<()> {
        let found = self.read()?;
        check_readback(latency_ms, &found)
    }

    /// Read, write `latency_ms`, then read back
    ///
    /// Never fails as a whole: every error is folded into the returned [Outcome] so that one bad
    /// device does not stop the others from being tuned.
    pub fn tune(&self, latency_ms: u8) -> DeviceReport {
        let before = match self.read() {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("tune: could not read current value: {}", e);
                None
            }
        };

        let outcome = match self.write(latency_ms).and_then(|_| self.verify(latency_ms)) {
            Ok(()) => Outcome::Success,
            Err(e) => Outcome::Failure(e),
        };

        DeviceReport {
            device: self.device.clone(),
            before,
            outcome,
        }
    }
}

/// Parse an attribute value, ignoring surrounding whitespace
pub fn parse_latency(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}

fn check_readback(expected: u8, found: &str) -> Result<()> {
    if parse_latency(found) == Some(u32::from(expected)) {
        Ok(())
    } else {
        Err(Error::WriteRejected {
            expected,
            found: found.to_owned(),
        })
    }
}
