//! kfpwd - local password tool
//!
//! Commands:
//! - create [LENGTH]: Generate a random password (default 12, minimum 6)
//! - list: Show saved passwords, newest first
//! - save <NAME> <PASSWORD> [URL]: Save a password
//! - delete <ID>: Delete a saved password
//! - show <ID>: Show one saved password

mod cli;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match cli::parse_args(std::env::args_os()) {
        Ok(Some(cli)) => cli,
        // Unknown commands get the usage text and a clean exit
        Ok(None) => return cli::print_usage(),
        Err(e) => e.exit(),
    };

    cli::run(cli)
}
