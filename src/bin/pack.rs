//! go-ape-pack - bundle a launcher with its toolchain payload
//!
//! Writes `<launcher><payload.zip><trailer>` so the launcher can find the
//! archive inside its own executable.

use clap::Parser;
use console::style;
use go_ape::payload::bundle;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Append a toolchain payload to a go-ape launcher
#[derive(Parser, Debug)]
#[command(name = "go-ape-pack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Launcher executable (target/release/go)
    launcher: PathBuf,

    /// Zip archive with go.common and every go.<os>-<arch> tree
    payload: PathBuf,

    /// Bundle to write
    #[arg(short, long, default_value = "go-ape")]
    output: PathBuf,

    /// Increase verbosity
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "go_ape=debug" } else { "go_ape=warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();

    match bundle::write_bundle(&cli.launcher, &cli.payload, &cli.output) {
        Ok(offset) => {
            eprintln!(
                "{} {} (payload at offset {})",
                style("Wrote").green().bold(),
                cli.output.display(),
                offset
            );
        }
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }
}
