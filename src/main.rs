//! go-ape - Self-extracting Go toolchain launcher
//!
//! Binary entry point. Takes no flags of its own: every argument belongs to
//! the toolchain.

use console::style;
use go_ape::config::{LogFormat, LoggingConfig};
use go_ape::LauncherConfig;
use std::ffi::OsString;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = LauncherConfig::from_env();
    init_logging(&config.logging);

    let args: Vec<OsString> = std::env::args_os().collect();
    let code = match go_ape::run(&config, &args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            e.exit_code()
        }
    };
    std::process::exit(code);
}

/// Initialize logging to stderr; stdout belongs to the toolchain.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.filter)
        .unwrap_or_else(|_| EnvFilter::new(LoggingConfig::default().filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // A second subscriber can only come from embedding; keep the first.
    let _ = match logging.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.without_time().try_init(),
    };
}
