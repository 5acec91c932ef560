//! Human-readable progress output

use std::{io::Write, path::Path};

use crate::{device::DeviceReport, device::Outcome, Error, Result};

/// Rule file the persistence hint points at
pub const UDEV_RULE_FILE: &str = "/etc/udev/rules.d/99-usb-serial-latency.rules";

/// udev rule that applies `latency_ms` whenever an `ftdi_sio` adapter is plugged in
pub fn udev_rule(latency_ms: u8) -> String {
    format!(
        "ACTION==\"add\", SUBSYSTEM==\"usb-serial\", DRIVER==\"ftdi_sio\", ATTR{{latency_timer}}=\"{}\"",
        latency_ms
    )
}

/// Writes progress lines as the run happens
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Reporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn start(&mut self, class_root: &Path, latency_ms: u8) -> Result<()> {
        writeln!(
            self.out,
            "Setting USB-serial latency timer to {} ms (scanning {})",
            latency_ms,
            class_root.display()
        )?;
        Ok(())
    }

    pub fn device(&mut self, report: &DeviceReport, latency_ms: u8) -> Result<()> {
        let before = report.before.as_deref().unwrap_or("unknown");
        match &report.outcome {
            Outcome::Success => writeln!(
                self.out,
                "  {}: latency_timer {} -> {} ms [OK]",
                report.device, before, latency_ms
            )?,
            Outcome::Failure(e) => writeln!(
                self.out,
                "  {}: latency_timer {} -> FAILED: {}",
                report.device, before, e
            )?,
        }
        Ok(())
    }

    pub fn no_devices(&mut self, class_root: &Path) -> Result<()> {
        writeln!(
            self.out,
            "No device under {} exposes latency_timer",
            class_root.display()
        )?;
        Ok(())
    }

    pub fn fallback_start(&mut self, tool: &str, node_count: usize) -> Result<()> {
        writeln!(
            self.out,
            "Falling back to `{} <node> low_latency` for {} serial node(s)",
            tool, node_count
        )?;
        Ok(())
    }

    pub fn no_nodes(&mut self, dev_dir: &Path) -> Result<()> {
        writeln!(
            self.out,
            "  No ttyUSB/ttyACM nodes under {}; nothing to do",
            dev_dir.display()
        )?;
        Ok(())
    }

    pub fn tool_unavailable(&mut self, tool: &str) -> Result<()> {
        writeln!(
            self.out,
            "  {}; fallback unavailable (install the {} package)",
            Error::ToolUnavailable(tool.to_owned()),
            tool
        )?;
        Ok(())
    }

    pub fn fallback_node(
        &mut self,
        node: &Path,
        result: &std::result::Result<bool, Error>,
    ) -> Result<()> {
        match result {
            Ok(true) => writeln!(self.out, "  {}: low_latency requested", node.display())?,
            Ok(false) => writeln!(self.out, "  {}: helper reported failure", node.display())?,
            Err(e) => writeln!(self.out, "  {}: could not run helper: {}", node.display(), e)?,
        }
        Ok(())
    }

    /// Closing banner and the rule the operator would add to keep the setting across replugs
    pub fn finish(&mut self, latency_ms: u8) -> Result<()> {
        writeln!(self.out, "Done.")?;
        writeln!(self.out)?;
        writeln!(
            self.out,
            "This setting is lost when the adapter is unplugged or the system reboots."
        )?;
        writeln!(self.out, "To make it persistent, add this line to {}:", UDEV_RULE_FILE)?;
        writeln!(self.out, "  {}", udev_rule(latency_ms))?;
        writeln!(
            self.out,
            "then run: udevadm control --reload-rules && udevadm trigger"
        )?;
        self.out.flush()?;
        Ok(())
    }
}
