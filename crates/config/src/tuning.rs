//! Socket tuning snapshot for transport listener setup

use crate::resolver::ConfigResolver;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tuning_types::keys;

/// Listener socket options resolved in one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuningParameters {
    /// Read timeout in milliseconds, zero or less disables it
    pub so_timeout_ms: i32,
    pub keep_alive: bool,
    pub tcp_nodelay: bool,
    pub so_reuseaddr: bool,
    /// Linger on close in seconds, unset or negative disables it
    pub so_linger_secs: Option<i32>,
    pub so_rcvbuf: Option<i32>,
    pub so_sndbuf: Option<i32>,
    pub connect_timeout_ms: i32,
    pub backlog: i32,
    /// Worker threads, unset means the runtime decides
    pub io_threads: Option<i32>,
}

impl Default for TuningParameters {
    fn default() -> Self {
        Self {
            so_timeout_ms: 60_000,
            keep_alive: true,
            tcp_nodelay: true,
            so_reuseaddr: true,
            so_linger_secs: None,
            so_rcvbuf: None,
            so_sndbuf: None,
            connect_timeout_ms: 30_000,
            backlog: 1024,
            io_threads: None,
        }
    }
}

impl TuningParameters {
    /// Resolve every well-known key, falling back to [`TuningParameters::default`]
    pub fn resolve(config: &ConfigResolver) -> Self {
        let defaults = Self::default();
        Self {
            so_timeout_ms: config.get_int_or(keys::SO_TIMEOUT, defaults.so_timeout_ms),
            keep_alive: config.get_bool_or(keys::KEEP_ALIVE, defaults.keep_alive),
            tcp_nodelay: config.get_bool_or(keys::TCP_NODELAY, defaults.tcp_nodelay),
            so_reuseaddr: config.get_bool_or(keys::SO_REUSEADDR, defaults.so_reuseaddr),
            so_linger_secs: config.get_int(keys::SO_LINGER),
            so_rcvbuf: config.get_int(keys::SO_RCVBUF),
            so_sndbuf: config.get_int(keys::SO_SNDBUF),
            connect_timeout_ms: config
                .get_int_or(keys::CONNECT_TIMEOUT, defaults.connect_timeout_ms),
            backlog: config.get_int_or(keys::BACKLOG, defaults.backlog),
            io_threads: config.get_int(keys::IO_THREADS),
        }
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        positive_millis(self.so_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        positive_millis(self.connect_timeout_ms)
    }

    pub fn linger(&self) -> Option<Duration> {
        self.so_linger_secs
            .and_then(|secs| u64::try_from(secs).ok())
            .map(Duration::from_secs)
    }
}

fn positive_millis(ms: i32) -> Option<Duration> {
    u64::try_from(ms)
        .ok()
        .filter(|&ms| ms > 0)
        .map(Duration::from_millis)
}
