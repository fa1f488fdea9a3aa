//! TCP readiness checks for booting hosts and containers.

use std::net::TcpStream;
use std::thread;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::ProbeConfig;
use crate::error::{Error, Result};

/// Whether `host:port` accepts a TCP connection right now.
///
/// One connect attempt with the OS default timeout; the connection is
/// closed straight away. Every failure, including name resolution, is
/// reported as `false`.
pub fn is_up(host: &str, port: u16) -> bool {
    match TcpStream::connect((host, port)) {
        Ok(_stream) => true,
        Err(e) => {
            debug!("{host}:{port} not accepting connections: {e}");
            false
        }
    }
}

/// Poll [`is_up`] until it succeeds or the configured timeout elapses.
pub fn wait_until_up(host: &str, port: u16, cfg: &ProbeConfig) -> Result<()> {
    let start = Instant::now();
    loop {
        if is_up(host, port) {
            info!("{host}:{port} is up after {:?}", start.elapsed());
            return Ok(());
        }

        let waited = start.elapsed();
        if waited >= cfg.timeout() {
            return Err(Error::NotReady {
                host: host.to_string(),
                port,
                waited,
            });
        }

        thread::sleep(cfg.interval());
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    /// A loopback port with nothing listening on it.
    fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn up_when_listener_is_bound() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!(is_up("127.0.0.1", port));
    }

    #[test]
    fn down_when_nothing_listens() {
        assert!(!is_up("127.0.0.1", closed_port()));
    }

    #[test]
    fn unresolvable_host_is_down() {
        assert!(!is_up("postroj.invalid", 80));
    }

    #[test]
    fn wait_returns_once_listener_is_up() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        wait_until_up("127.0.0.1", port, &ProbeConfig::default()).unwrap();
    }

    #[test]
    fn wait_gives_up_after_timeout() {
        let cfg = ProbeConfig {
            interval_ms: 10,
            timeout_secs: 0,
        };
        let port = closed_port();
        match wait_until_up("127.0.0.1", port, &cfg) {
            Err(Error::NotReady { host, port: p, .. }) => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(p, port);
            }
            other => panic!("expected NotReady, got: {other:?}"),
        }
    }
}
