//! CLI command implementations
//!
//! `serve` runs the HTTP listener until SIGINT/SIGTERM. `dump` is a one-shot
//! read of a single store.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::StatusPolicy;
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::init_tracing;
use crate::storage::{PurchaseOrder, RecordKind, RecordStore, Stores, Supplier};

use super::args::{Command, Overrides, StoreArg};
use super::errors::{CliError, CliResult};
use super::io::{write_json, write_pretty};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the store files (default "data")
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Emit logs as JSON lines (default false)
    #[serde(default)]
    pub log_json: bool,

    /// HTTP listener settings
    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_data_dir() -> String {
    "data".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_json: false,
            http: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load the optional config file, then apply command-line overrides
    pub fn resolve(overrides: &Overrides) -> CliResult<Self> {
        let mut config = match &overrides.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(data_dir) = &overrides.data_dir {
            config.data_dir = data_dir.to_string_lossy().into_owned();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if self.http.host.trim().is_empty() {
            return Err(CliError::config_error("http.host must not be empty"));
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            overrides,
            port,
            status_codes,
        } => serve(&overrides, port, status_codes.map(StatusPolicy::from)),
        Command::Dump { store, overrides } => dump(store, &overrides),
    }
}

/// Start the HTTP server
///
/// 1. Resolve configuration (file, then flags)
/// 2. Install the tracing subscriber
/// 3. Serve on a tokio runtime until a shutdown signal
pub fn serve(
    overrides: &Overrides,
    port: Option<u16>,
    status_codes: Option<StatusPolicy>,
) -> CliResult<()> {
    let mut config = Config::resolve(overrides)?;
    if port == Some(0) {
        return Err(CliError::config_error("--port must be > 0"));
    }
    if let Some(port) = port {
        config.http.port = port;
    }
    if let Some(policy) = status_codes {
        config.http.status_codes = policy;
    }

    init_tracing(config.log_json)
        .map_err(|e| CliError::boot_failed(format!("Failed to initialize logging: {}", e)))?;

    let stores = Arc::new(Stores::open(config.data_path()));
    tracing::info!(
        suppliers = %stores.path(RecordKind::Supplier).display(),
        orders = %stores.path(RecordKind::PurchaseOrder).display(),
        "record stores configured"
    );

    let server = HttpServer::new(stores, config.http.clone());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print one store as JSON to stdout
pub fn dump(store: StoreArg, overrides: &Overrides) -> CliResult<()> {
    let config = Config::resolve(overrides)?;
    let value = load_store_json(RecordKind::from(store), config.data_path())?;
    write_json(&value)
}

/// Write one store as JSON to `writer`
pub fn dump_to<W: Write>(kind: RecordKind, data_dir: &Path, writer: &mut W) -> CliResult<()> {
    let value = load_store_json(kind, data_dir)?;
    write_pretty(writer, &value)
}

fn load_store_json(kind: RecordKind, data_dir: &Path) -> CliResult<serde_json::Value> {
    let value = match kind {
        RecordKind::Supplier => serde_json::to_value(
            RecordStore::<Supplier>::new(data_dir).load_all()?,
        )?,
        RecordKind::PurchaseOrder => serde_json::to_value(
            RecordStore::<PurchaseOrder>::new(data_dir).load_all()?,
        )?,
    };
    Ok(value)
}
