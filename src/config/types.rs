use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How the external container manager is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Runs a command inside an already-booted machine.
    pub run_program: String,
    /// Boots an ephemeral environment from a root directory.
    pub nspawn_program: String,
    /// Host resolver config, bind-mounted read-only into ephemeral environments.
    pub resolv_conf: PathBuf,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            run_program: "systemd-run".to_string(),
            nspawn_program: "systemd-nspawn".to_string(),
            resolv_conf: PathBuf::from("/etc/resolv.conf"),
        }
    }
}

/// Polling behaviour for [`crate::probe::wait_until_up`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub interval_ms: u64,
    pub timeout_secs: u64,
}

impl ProbeConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            interval_ms: 250,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub manager: ManagerConfig,
    /// Seconds before a command is killed, unless the call sets its own timeout.
    pub command_timeout: Option<u64>,
    pub probe: ProbeConfig,
}

impl Config {
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_systemd() {
        let cfg = Config::default();
        assert_eq!(cfg.manager.run_program, "systemd-run");
        assert_eq!(cfg.manager.nspawn_program, "systemd-nspawn");
        assert_eq!(cfg.manager.resolv_conf, PathBuf::from("/etc/resolv.conf"));
        assert_eq!(cfg.command_timeout(), None);
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let cfg: Config = serde_yaml::from_str(
            "command_timeout: 90\nprobe:\n  interval_ms: 100\nmanager:\n  run_program: /usr/bin/systemd-run\n",
        )
        .unwrap();
        assert_eq!(cfg.command_timeout(), Some(Duration::from_secs(90)));
        assert_eq!(cfg.probe.interval(), Duration::from_millis(100));
        assert_eq!(cfg.probe.timeout_secs, 60);
        assert_eq!(cfg.manager.run_program, "/usr/bin/systemd-run");
        assert_eq!(cfg.manager.nspawn_program, "systemd-nspawn");
    }

    #[test]
    fn empty_mapping_is_default() {
        let cfg: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, Config::default());
    }
}
