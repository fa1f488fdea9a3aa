//! Integration tests against real `systemd-nspawn` containers.
//!
//! These require root, systemd, a booted machine named by
//! `POSTROJ_TEST_MACHINE`, and a container root directory named by
//! `POSTROJ_TEST_ROOTFS`. They are marked `#[ignore]`.
//! Run with: `cargo test -- --ignored`

use postroj::config::ProbeConfig;
use postroj::{CommandRunner, Error, RunOptions};

fn machine() -> String {
    std::env::var("POSTROJ_TEST_MACHINE").expect("POSTROJ_TEST_MACHINE must be set")
}

fn rootfs() -> String {
    std::env::var("POSTROJ_TEST_ROOTFS").expect("POSTROJ_TEST_ROOTFS must be set")
}

#[test]
#[ignore]
fn echo_inside_running_machine() {
    let out = CommandRunner::default()
        .run_in_container(&machine(), "echo hi", &RunOptions::new())
        .unwrap();
    assert_eq!(out, "hi\n");
}

#[test]
#[ignore]
fn failure_inside_running_machine() {
    let err = CommandRunner::default()
        .run_in_container(&machine(), "false", &RunOptions::new())
        .unwrap_err();
    assert!(
        matches!(err, Error::ContainerCommandFailure { .. }),
        "got: {err:?}"
    );
}

#[test]
#[ignore]
fn resolver_config_is_visible_in_ephemeral_root() {
    let out = CommandRunner::default()
        .run_in_container_root(rootfs(), "cat /etc/resolv.conf")
        .unwrap();
    let host = std::fs::read_to_string("/etc/resolv.conf").unwrap();
    assert_eq!(out, host);
}

#[test]
#[ignore]
fn machine_ssh_becomes_reachable() {
    let cfg = ProbeConfig {
        timeout_secs: 30,
        ..ProbeConfig::default()
    };
    postroj::wait_until_up(&machine(), 22, &cfg).unwrap();
}
