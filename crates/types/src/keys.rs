//! Well-known tuning keys
//!
//! Names are shared by the override source and the properties file.

/// Override key naming a directory that holds the tuning file
pub const CONF_LOCATION_KEY: &str = "conf.location";

/// Name of the tuning properties file
pub const TUNING_FILE_NAME: &str = "tcp.properties";

/// Subdirectory probed on the resource search path after the root
pub const CONF_DIRECTORY: &str = "conf";

/// Socket read timeout in milliseconds
pub const SO_TIMEOUT: &str = "so_timeout";

/// Enable TCP keep-alive probes
pub const KEEP_ALIVE: &str = "keep_alive";

/// Disable Nagle's algorithm
pub const TCP_NODELAY: &str = "tcp_nodelay";

/// Allow rebinding a listener address in TIME_WAIT
pub const SO_REUSEADDR: &str = "so_reuseaddr";

/// Linger time in seconds on close
pub const SO_LINGER: &str = "so_linger";

/// Receive buffer size in bytes
pub const SO_RCVBUF: &str = "so_rcvbuf";

/// Send buffer size in bytes
pub const SO_SNDBUF: &str = "so_sndbuf";

/// Outbound connect timeout in milliseconds
pub const CONNECT_TIMEOUT: &str = "connect_timeout";

/// Listen backlog
pub const BACKLOG: &str = "backlog";

/// Number of I/O worker threads
pub const IO_THREADS: &str = "io_threads";

/// Every tuning key read by the parameter snapshot
pub const ALL: &[&str] = &[
    SO_TIMEOUT,
    KEEP_ALIVE,
    TCP_NODELAY,
    SO_REUSEADDR,
    SO_LINGER,
    SO_RCVBUF,
    SO_SNDBUF,
    CONNECT_TIMEOUT,
    BACKLOG,
    IO_THREADS,
];
