//! Discovery and tuning of USB-serial devices through sysfs

mod latency_timer;
pub use latency_timer::{parse_latency, DeviceReport, LatencyAttribute, Outcome};

#[cfg(feature = "serialport_comm")]
mod serialport_comm;
#[cfg(feature = "serialport_comm")]
pub use serialport_comm::{list_ports, PortSummary};

use log::{debug, trace};
use std::{fs, path::Path};

/// Name of the tunable exposed by `ftdi_sio` under each device directory
pub const LATENCY_ATTRIBUTE: &str = "latency_timer";

/// Find every device under `class_root` that exposes a latency attribute
///
/// Only immediate subdirectories are considered; sysfs entries are symlinks, which are followed.
/// A device qualifies only when its attribute is a regular file.
/// A missing or unreadable root yields an empty list rather than an error, since that simply
/// means no USB-serial driver is loaded. The result is sorted by device name.
pub fn scan(class_root: &Path) -> Vec<LatencyAttribute> {
    let entries = match fs::read_dir(class_root) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("scan: cannot list {}: {}", class_root.display(), e);
            return Vec::new();
        }
    };

    let mut found: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter_map(|dir| {
            let attribute = dir.join(LATENCY_ATTRIBUTE);
            if attribute.is_file() {
                Some(LatencyAttribute::new(dir, attribute))
            } else {
                trace!("scan: {} has no {}", dir.display(), LATENCY_ATTRIBUTE);
                None
            }
        })
        .collect();

    found.sort_by(|a, b| a.device().cmp(b.device()));
    debug!("scan: found {} tunable device(s)", found.len());
    found
}
