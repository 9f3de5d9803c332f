use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};

/// Log to stderr. `RUST_LOG` wins; otherwise `-v` raises the level.
pub fn init(verbose: u8) -> Result<LoggerHandle> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    Logger::try_with_env_or_str(default_level)
        .context("Invalid log specification")?
        .log_to_stderr()
        .start()
        .context("Failed to start logger")
}
