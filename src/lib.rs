//! Crate for lowering the latency timer of USB-to-serial adapters on Linux
//!
//! FTDI-style adapters buffer received data for up to 16 ms before handing it to the host. For
//! latency-sensitive links such as robot controllers this crate sets the `latency_timer` sysfs
//! attribute of every such adapter, verifies the value stuck, and falls back to `setserial`'s
//! low-latency mode when no adapter exposes the attribute.
//!
//! # Usage
//! ```no_run
//! use usb_serial_latency::{report::Reporter, Config, Tuner};
//!
//! fn main() -> Result<(), usb_serial_latency::Error> {
//!     let mut tuner = Tuner::new(Config::default());
//!     let summary = tuner.run(&mut Reporter::new(std::io::stdout()))?;
//!     println!("{} device(s) handled", summary.devices.len());
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod config;
pub use config::Config;
pub use config::{DEFAULT_CLASS_ROOT, DEFAULT_DEV_DIR, DEFAULT_LATENCY_MS, DEFAULT_TOOL};

pub mod device;

mod error;
pub use error::{Error, Result};

pub mod fallback;

pub mod report;

mod tuner;
pub use tuner::{RunSummary, Tuner};
