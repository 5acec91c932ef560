use clap::Parser;
use log::error;
use std::{io, path::PathBuf};

use usb_serial_latency::{report::Reporter, Config, Tuner};

/// Lower the latency timer of USB-to-serial adapters (run as root)
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// sysfs directory listing USB-serial devices
    #[arg(long, env = "USB_SERIAL_CLASS_ROOT", default_value = usb_serial_latency::DEFAULT_CLASS_ROOT)]
    class_root: PathBuf,

    /// Directory searched for ttyUSB*/ttyACM* nodes when falling back
    #[arg(long, env = "USB_SERIAL_DEV_DIR", default_value = usb_serial_latency::DEFAULT_DEV_DIR)]
    dev_dir: PathBuf,

    /// Target latency timer in milliseconds
    #[arg(
        long,
        env = "USB_SERIAL_LATENCY",
        default_value_t = usb_serial_latency::DEFAULT_LATENCY_MS,
        value_parser = clap::value_parser!(u8).range(1..)
    )]
    latency: u8,

    /// Helper program used to request low-latency mode on device nodes
    #[arg(long, env = "USB_SERIAL_TOOL", default_value = usb_serial_latency::DEFAULT_TOOL)]
    tool: String,

    /// List serial ports before tuning
    #[cfg(feature = "serialport_comm")]
    #[arg(long)]
    list_ports: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            class_root: cli.class_root,
            dev_dir: cli.dev_dir,
            latency_ms: cli.latency,
            tool: cli.tool,
        }
    }
}

#[cfg(feature = "serialport_comm")]
fn print_ports() {
    match usb_serial_latency::device::list_ports() {
        Ok(ports) => {
            println!("Serial ports:");
            for port in ports {
                println!("  - {}", port);
            }
        }
        Err(e) => error!("Could not list serial ports: {}", e),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    #[cfg(feature = "serialport_comm")]
    if cli.list_ports {
        print_ports();
    }

    let mut tuner = Tuner::new(Config::from(cli));
    let mut reporter = Reporter::new(io::stdout().lock());
    if let Err(e) = tuner.run(&mut reporter) {
        error!("Could not write report: {}", e);
    }
}
