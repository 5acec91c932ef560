use log::debug;
use std::fmt;

use crate::Result;

/// One entry of the system's serial port list
///
/// Adapters bound to `ftdi_sio` or `cdc_acm` show up here with their USB ids, which helps tell
/// which `ttyUSB`/`ttyACM` node belongs to which controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSummary {
    pub name: String,
    /// USB vendor and product id, for ports behind a USB adapter
    pub usb_id: Option<(u16, u16)>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

impl fmt::Display for PortSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some((vid, pid)) = self.usb_id {
            write!(f, " [{:04x}:{:04x}]", vid, pid)?;
        }
        for text in [&self.manufacturer, &self.product].into_iter().flatten() {
            write!(f, " {}", text)?;
        }
        Ok(())
    }
}

/// List the serial ports present on the system
pub fn list_ports() -> Result<Vec<PortSummary>> {
    let mut ports: Vec<_> = serialport::available_ports()?
        .into_iter()
        .map(|info| match info.port_type {
            serialport::SerialPortType::UsbPort(usb) => PortSummary {
                name: info.port_name,
                usb_id: Some((usb.vid, usb.pid)),
                manufacturer: usb.manufacturer,
                product: usb.product,
            },
            _ => PortSummary {
                name: info.port_name,
                usb_id: None,
                manufacturer: None,
                product: None,
            },
        })
        .collect();
    ports.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("list_ports: {} port(s)", ports.len());
    Ok(ports)
}
