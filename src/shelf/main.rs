//! # Shelf CLI
//!
//! The binary is intentionally thin: argument parsing, rendering and context
//! wiring live in `cli/`, this file only sets up logging, invokes `cli::run()`
//! and handles process termination.
//!
//! Logs go to stderr. The level comes from `SHELF_LOG` (an `EnvFilter`
//! directive such as `shelf=debug`), `-v` raises the default to `debug`.

mod cli;

use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "shelf=debug" } else { "shelf=warn" };
    let filter = EnvFilter::try_from_env("SHELF_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = cli::run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
