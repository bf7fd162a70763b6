//! engconv MCP Server
//!
//! Line-delimited JSON-RPC over stdio. stdout carries protocol messages
//! only; logs go to stderr.
//!
//! Tools:
//! - list_categories: Categories with their units and negative-input policy
//! - list_units: Units of one category
//! - convert: Convert a value between two units of a category

mod config;
mod handlers;

use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use handlers::{process_line, McpResponse, PROTOCOL_VERSION, SERVER_VERSION};

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

fn write_response(response: &McpResponse) -> io::Result<()> {
    let response_json = serde_json::to_string(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", response_json)?;
    stdout.flush()
}

fn main() -> ExitCode {
    let config = Config::from_env();
    init_logging(&config);

    let registry = config.registry();
    if let Err(e) = registry.validate() {
        error!(error = %e, "unit table failed validation");
        return ExitCode::FAILURE;
    }

    info!(
        version = SERVER_VERSION,
        protocol = PROTOCOL_VERSION,
        legacy_kelvin = config.legacy_kelvin,
        categories = registry.list_categories().len(),
        "engconv MCP server started"
    );
    if config.legacy_kelvin {
        warn!("legacy Kelvin to Fahrenheit formula enabled");
    }

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let Some(response) = process_line(&registry, &line) else {
                    continue;
                };
                if let Err(e) = write_response(&response) {
                    error!(error = %e, "error writing response");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        }
    }

    info!("server shutting down");
    ExitCode::SUCCESS
}
