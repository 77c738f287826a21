//! fiska-mcp: MCP server giving AI assistants tool access to the Fiska
//! accounting API.
//!
//! Credentials and tenant scope come from the `FISKA_*` environment
//! variables (a `.env` file is honored). Logging goes to stderr; stdout
//! is reserved for protocol messages.

use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use fiska::{Client, ClientConfig};
use fiska_mcp::server::McpServer;
use fiska_mcp::tools::Toolbox;

/// MCP server for the Fiska accounting API.
#[derive(Parser, Debug)]
#[command(name = "fiska-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn log_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(log_level(args.verbose, args.quiet));

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            eprintln!("Set FISKA_ACCESS_TOKEN and FISKA_COMPANY_ID (a .env file works too).");
            return ExitCode::FAILURE;
        }
    };

    let client = match Client::from_config(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            eprintln!("Set FISKA_ACCESS_TOKEN and FISKA_COMPANY_ID (a .env file works too).");
            return ExitCode::FAILURE;
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        company_id = client.company_id(),
        "starting fiska-mcp server"
    );

    let mut server = McpServer::new(Toolbox::new(client));

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(server.run()) {
        Ok(()) => {
            info!("server shut down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "server error");
            ExitCode::FAILURE
        }
    }
}
