//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use super::handlers::ServeCommandHandler;
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;

/// Ports below this need elevated privileges on most systems
const PRIVILEGED_PORT_LIMIT: u16 = 1024;

/// Execute a CLI command with the given settings
///
/// `serve` is the default when no subcommand is given.
///
/// # Arguments
/// * `cli` - Parsed CLI arguments
/// * `settings` - Merged and validated settings
///
/// # Errors
/// Returns errors from command handlers
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    warn_on_serve_args(&settings);

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => ServeCommandHandler::new(settings).execute(false).await,
    }
}

/// Logs bind settings that are legal but likely unintended
fn warn_on_serve_args(settings: &Settings) {
    let server = &settings.server;
    if server.port < PRIVILEGED_PORT_LIMIT {
        tracing::warn!(
            port = server.port,
            "Binding to a privileged port typically requires root privileges"
        );
    }

    let binds_everywhere = server.host == "0.0.0.0" || server.host == "::";
    if binds_everywhere && settings.links.base_url.contains("127.0.0.1") {
        tracing::warn!(
            host = %server.host,
            base_url = %settings.links.base_url,
            "Server accepts remote clients but generated links point at the loopback address"
        );
    }
}
