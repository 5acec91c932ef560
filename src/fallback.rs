//! Low-latency mode through an external helper, for adapters without a latency attribute

use log::{debug, info};
use std::{
    env,
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use crate::{Error, Result};

/// Device node prefixes of USB-serial character devices
pub const NODE_PREFIXES: [&str; 2] = ["ttyUSB", "ttyACM"];

/// Argument asking `setserial` to enable low-latency mode
pub const LOW_LATENCY_ARG: &str = "low_latency";

/// An API to look up and run external programs
///
/// Implemented by [SystemRunner] for real use; tests substitute a recording fake.
pub trait CommandRunner {
    /// Whether `program` can be found on the executable search path
    fn is_available(&self, program: &str) -> bool;

    /// Run `program` to completion and return whether it exited successfully
    fn run(&mut self, program: &str, args: &[&str]) -> Result<bool>;
}

/// Runs programs with [std::process::Command], inheriting stdout and stderr
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn is_available(&self, program: &str) -> bool {
        let found = find_program(program, env::var_os("PATH").as_deref());
        debug!("is_available: {} -> {:?}", program, found);
        found.is_some()
    }

    fn run(&mut self, program: &str, args: &[&str]) -> Result<bool> {
        info!("Running {} {:?}", program, args);
        let status = Command::new(program).args(args).status()?;
        debug!("run: {} exited with {}", program, status);
        Ok(status.success())
    }
}

/// `which`-style lookup of `program`, the way [Command] resolves it
///
/// A name containing a `/` is taken as a path and checked directly. Otherwise every non-empty
/// entry of `path` is searched; an unset `PATH` finds nothing.
fn find_program(program: &str, path: Option<&OsStr>) -> Option<PathBuf> {
    if program.contains('/') {
        let candidate = PathBuf::from(program);
        return is_executable(&candidate).then_some(candidate);
    }

    path.and_then(|paths| {
        env::split_paths(paths)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(|dir| dir.join(program))
            .find(|candidate| is_executable(candidate))
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Whether `name` is one of the [NODE_PREFIXES] followed by a device number
fn is_serial_node(name: &str) -> bool {
    NODE_PREFIXES.iter().any(|prefix| {
        name.strip_prefix(prefix)
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
    })
}

/// Existing USB-serial device nodes under `dev_dir`, sorted by path
pub fn serial_nodes(dev_dir: &Path) -> Vec<PathBuf> {
    let mut nodes: Vec<_> = match fs::read_dir(dev_dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| is_serial_node(&entry.file_name().to_string_lossy()))
            .map(|entry| entry.path())
            .collect(),
        Err(e) => {
            debug!("serial_nodes: cannot list {}: {}", dev_dir.display(), e);
            Vec::new()
        }
    };
    nodes.sort();
    nodes
}

/// Result of the fallback phase
#[derive(Debug)]
pub enum FallbackOutcome {
    /// The helper is not installed; nothing was attempted
    ToolUnavailable(String),
    /// The helper ran once per node; `true` means it exited successfully
    ///
    /// The device state is not read back, so success only reflects the helper's exit status.
    Invoked(Vec<(PathBuf, std::result::Result<bool, Error>)>),
}

/// Run `tool <node> low_latency` for every node, if the tool is available
///
/// `on_node` is called after each invocation so that progress can be reported as it happens.
pub fn invoke<R, F>(
    runner: &mut R,
    tool: &str,
    nodes: &[PathBuf],
    mut on_node: F,
) -> FallbackOutcome
where
    R: CommandRunner + ?Sized,
    F: FnMut(&Path, &std::result::Result<bool, Error>),
{
    if !runner.is_available(tool) {
        return FallbackOutcome::ToolUnavailable(tool.to_owned());
    }

    let results = nodes
        .iter()
        .map(|node| {
            let node_arg = node.to_string_lossy();
            let result = runner.run(tool, &[&*node_arg, LOW_LATENCY_ARG]);
            on_node(node, &result);
            (node.clone(), result)
        })
        .collect();

    FallbackOutcome::Invoked(results)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records invocations instead of running anything
    #[derive(Default)]
    pub(crate) struct FakeRunner {
        pub available: bool,
        pub calls: Vec<(String, Vec<String>)>,
    }

    impl CommandRunner for FakeRunner {
        fn is_available(&self, _program: &str) -> bool {
            self.available
        }

        fn run(&mut self, program: &str, args: &[&str]) -> Result<bool> {
            self.calls.push((
                program.to_owned(),
                args.iter().map(|a| a.to_string()).collect(),
            ));
            Ok(true)
        }
    }

    #[test]
    fn node_names() {
        assert!(is_serial_node("ttyUSB0"));
        assert!(is_serial_node("ttyACM12"));
        assert!(!is_serial_node("ttyUSB"));
        assert!(!is_serial_node("ttyUSB0.lock"));
        assert!(!is_serial_node("ttyS0"));
    }

    #[test]
    fn nodes_are_filtered_and_sorted() {
        let dev = tempfile::tempdir().unwrap();
        for name in ["ttyUSB1", "ttyACM0", "ttyUSB0", "ttyS0", "null"] {
            fs::write(dev.path().join(name), "").unwrap();
        }
        let names: Vec<_> = serial_nodes(dev.path())
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["ttyACM0", "ttyUSB0", "ttyUSB1"]);
    }

    #[test]
    fn absent_tool_runs_nothing() {
        let mut runner = FakeRunner::default();
        let nodes = vec![PathBuf::from("/dev/ttyUSB0")];
        let outcome = invoke(&mut runner, "setserial", &nodes, |_, _| {});

        assert!(matches!(outcome, FallbackOutcome::ToolUnavailable(t) if t == "setserial"));
        assert!(runner.calls.is_empty());
    }

    #[test]
    fn present_tool_runs_once_per_node() {
        let mut runner = FakeRunner {
            available: true,
            ..Default::default()
        };
        let nodes = vec![PathBuf::from("/dev/ttyACM0"), PathBuf::from("/dev/ttyUSB0")];
        let mut seen = 0;
        let outcome = invoke(&mut runner, "setserial", &nodes, |_, _| seen += 1);

        assert_eq!(seen, 2);
        assert!(matches!(outcome, FallbackOutcome::Invoked(ref r) if r.len() == 2));
        assert_eq!(
            runner.calls[1],
            (
                "setserial".to_owned(),
                vec!["/dev/ttyUSB0".to_owned(), "low_latency".to_owned()]
            )
        );
    }

    #[test]
    fn path_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("setserial");
        fs::write(&tool, "#!/bin/sh\n").unwrap();
        let search = Some(dir.path().as_os_str());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            assert!(find_program("setserial", search).is_none());
            fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        }

        assert_eq!(find_program("setserial", search), Some(tool));
        assert!(find_program("missing", search).is_none());
    }

    #[test]
    fn unset_or_empty_path_finds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("setserial");
        fs::write(&tool, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let with_tool = env::join_paths([dir.path()]).unwrap();
        assert!(find_program("setserial", Some(with_tool.as_os_str())).is_some());

        assert!(find_program("setserial", None).is_none());
        // an empty entry must not turn into a search of the working directory
        assert!(find_program("setserial", Some(OsStr::new(""))).is_none());
        assert!(find_program("setserial", Some(OsStr::new(":"))).is_none());
    }

    #[test]
    fn name_with_slash_is_checked_directly() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("setserial");
        fs::write(&tool, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let program = tool.to_string_lossy();
        assert_eq!(
            find_program(&program, Some(OsStr::new("/usr/bin"))),
            Some(tool.clone())
        );
        assert_eq!(find_program(&program, None), Some(tool.clone()));
        assert!(find_program(&format!("{}.missing", program), None).is_none());
    }
}
