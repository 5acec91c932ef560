use std::path::PathBuf;

/// sysfs directory listing devices bound to a USB-serial driver
pub const DEFAULT_CLASS_ROOT: &str = "/sys/bus/usb-serial/devices";

/// Directory holding the serial character device nodes
pub const DEFAULT_DEV_DIR: &str = "/dev";

/// The lowest latency timer setting the FTDI driver accepts, in milliseconds
pub const DEFAULT_LATENCY_MS: u8 = 1;

/// Helper used when no device exposes a latency attribute
pub const DEFAULT_TOOL: &str = "setserial";

/// Where and what to tune
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub class_root: PathBuf,
    pub dev_dir: PathBuf,
    pub latency_ms: u8,
    pub tool: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            class_root: PathBuf::from(DEFAULT_CLASS_ROOT),
            dev_dir: PathBuf::from(DEFAULT_DEV_DIR),
            latency_ms: DEFAULT_LATENCY_MS,
            tool: DEFAULT_TOOL.to_owned(),
        }
    }
}
