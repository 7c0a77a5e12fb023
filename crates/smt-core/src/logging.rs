//! Structured logging setup.
//!
//! All log output goes to stderr; stdout is reserved for command payloads.
//! The default level is `warn` so routine runs only surface skipped files
//! and other anomalies. `-v`/`-vv` raise it, `--quiet` lowers it, and the
//! `SMT_LOG` environment variable overrides everything with a full
//! `EnvFilter` directive string.

use tracing_subscriber::EnvFilter;

/// Environment variable carrying an `EnvFilter` directive.
pub const ENV_LOG: &str = "SMT_LOG";

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_env(ENV_LOG)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
