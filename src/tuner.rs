use log::{debug, info, warn};
use std::io::Write;

use crate::{
    device::{self, DeviceReport, LatencyAttribute},
    fallback::{self, CommandRunner, FallbackOutcome, SystemRunner},
    report::Reporter,
    Config, Result,
};

/// Everything a run did, in the order it happened
#[derive(Debug)]
pub struct RunSummary {
    pub devices: Vec<DeviceReport>,
    /// `None` when at least one device exposed a latency attribute
    pub fallback: Option<FallbackOutcome>,
}

/// Tunes all USB-serial adapters according to a [Config]
///
/// Wraps an implementer of [CommandRunner], which is only used when no device can be tuned
/// through sysfs.
pub struct Tuner<R: CommandRunner> {
    config: Config,
    runner: R,
}

impl Tuner<SystemRunner> {
    pub fn new(config: Config) -> Self {
        Tuner::with_runner(config, SystemRunner)
    }
}

impl<R: CommandRunner> Tuner<R> {
    pub fn with_runner(config: Config, runner: R) -> Self {
        Tuner { config, runner }
    }

    /// Scan, tune every device found, and fall back to the helper if none was found
    ///
    /// Per-device problems are reported and recorded in the summary; only a failure to write
    /// the report itself is returned as an error.
    pub fn run<W: Write>(&mut self, reporter: &mut Reporter<W>) -> Result<RunSummary> {
        let latency_ms = self.config.latency_ms;
        reporter.start(&self.config.class_root, latency_ms)?;

        let attributes = device::scan(&self.config.class_root);
        let devices = self.tune_devices(&attributes, reporter)?;

        let fallback = if devices.is_empty() {
            Some(self.fallback(reporter)?)
        } else {
            None
        };

        reporter.finish(latency_ms)?;
        Ok(RunSummary { devices, fallback })
    }

    /// Tune each device in turn; a failure on one never stops the rest
    fn tune_devices<W: Write>(
        &self,
        attributes: &[LatencyAttribute],
        reporter: &mut Reporter<W>,
    ) -> Result<Vec<DeviceReport>> {
        let latency_ms = self.config.latency_ms;
        let mut devices = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            let report = attribute.tune(latency_ms);
            if report.outcome.is_success() {
                info!("{} tuned to {} ms", report.device, latency_ms);
            } else {
                warn!("{} was not tuned: {:?}", report.device, report.outcome);
            }
            reporter.device(&report, latency_ms)?;
            devices.push(report);
        }
        Ok(devices)
    }

    fn fallback<W: Write>(&mut self, reporter: &mut Reporter<W>) -> Result<FallbackOutcome> {
        reporter.no_devices(&self.config.class_root)?;

        let nodes = fallback::serial_nodes(&self.config.dev_dir);
        debug!("fallback: candidate nodes {:?}", nodes);
        reporter.fallback_start(&self.config.tool, nodes.len())?;
        if nodes.is_empty() {
            reporter.no_nodes(&self.config.dev_dir)?;
        }

        // progress lines are written from inside the loop; keep the first write error
        let mut write_result = Ok(());
        let outcome = fallback::invoke(
            &mut self.runner,
            &self.config.tool,
            &nodes,
            |node, result| {
                if write_result.is_ok() {
                    write_result = reporter.fallback_node(node, result);
                }
            },
        );
        write_result?;

        if let FallbackOutcome::ToolUnavailable(tool) = &outcome {
            reporter.tool_unavailable(tool)?;
        }
        Ok(outcome)
    }
}
