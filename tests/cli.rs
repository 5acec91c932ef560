use assert_cmd::Command;
use predicates::prelude::*;
use std::{fs, path::Path};

fn tool_cmd(class_root: &Path, dev_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("usb-serial-latency").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("--class-root")
        .arg(class_root)
        .arg("--dev-dir")
        .arg(dev_dir);
    cmd
}

#[test]
fn tunes_device_and_prints_rule() {
    let sys = tempfile::tempdir().unwrap();
    let dev = tempfile::tempdir().unwrap();
    let device = sys.path().join("deviceA");
    fs::create_dir(&device).unwrap();
    fs::write(device.join("latency_timer"), "16\n").unwrap();

    tool_cmd(sys.path(), dev.path())
        .arg("--tool")
        .arg("no-such-helper-xyz")
        .assert()
        .success()
        .stdout(predicate::str::contains("deviceA: latency_timer 16 -> 1 ms [OK]"))
        .stdout(predicate::str::contains("Falling back").not())
        .stdout(predicate::str::contains(
            r#"DRIVER=="ftdi_sio", ATTR{latency_timer}="1""#,
        ));

    assert_eq!(fs::read_to_string(device.join("latency_timer")).unwrap(), "1");
}

#[test]
fn missing_helper_still_succeeds() {
    let sys = tempfile::tempdir().unwrap();
    let dev = tempfile::tempdir().unwrap();
    fs::write(dev.path().join("ttyUSB0"), "").unwrap();

    tool_cmd(sys.path(), dev.path())
        .arg("--tool")
        .arg("no-such-helper-xyz")
        .assert()
        .success()
        .stdout(predicate::str::contains("`no-such-helper-xyz` not found on PATH"))
        .stdout(predicate::str::contains("Done."));
}

#[cfg(unix)]
#[test]
fn helper_runs_once_per_existing_node() {
    use std::os::unix::fs::PermissionsExt;

    let sys = tempfile::tempdir().unwrap();
    let dev = tempfile::tempdir().unwrap();
    let bin = tempfile::tempdir().unwrap();
    fs::write(dev.path().join("ttyUSB0"), "").unwrap();

    let log = bin.path().join("calls.log");
    let helper = bin.path().join("fake-setserial");
    fs::write(
        &helper,
        format!("#!/bin/sh\necho \"$@\" >> '{}'\n", log.display()),
    )
    .unwrap();
    fs::set_permissions(&helper, fs::Permissions::from_mode(0o755)).unwrap();

    tool_cmd(sys.path(), dev.path())
        .env("PATH", bin.path())
        .arg("--tool")
        .arg("fake-setserial")
        .assert()
        .success()
        .stdout(predicate::str::contains("ttyUSB0: low_latency requested"));

    let calls = fs::read_to_string(&log).unwrap();
    assert_eq!(
        calls,
        format!("{} low_latency\n", dev.path().join("ttyUSB0").display())
    );
}

#[test]
fn rejects_zero_latency() {
    let sys = tempfile::tempdir().unwrap();
    tool_cmd(sys.path(), sys.path())
        .arg("--latency")
        .arg("0")
        .assert()
        .failure();
}
