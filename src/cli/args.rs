//! CLI argument definitions using clap
//!
//! Commands:
//! - compras serve [--config <path>] [--port <port>] [--data-dir <dir>]
//! - compras dump <fornecedores|ordens> [--config <path>] [--data-dir <dir>]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::api::StatusPolicy;
use crate::storage::RecordKind;

/// Compras - HTTP facade over supplier and purchase-order record files
#[derive(Parser, Debug)]
#[command(name = "compras")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Settings that override the configuration file
#[derive(clap::Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding fornecedores.txt and ordens.txt
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        overrides: Overrides,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Status code policy
        #[arg(long, value_enum)]
        status_codes: Option<StatusCodesArg>,
    },

    /// Print every record of one store as JSON and exit
    Dump {
        /// Store to print
        #[arg(value_enum)]
        store: StoreArg,

        #[command(flatten)]
        overrides: Overrides,
    },
}

/// Store selector for `dump`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreArg {
    Fornecedores,
    Ordens,
}

/// Status code policy selector for `serve`
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCodesArg {
    /// Always 200; errors only in the body
    Compatible,
    /// 201/204/400/404/500 as appropriate
    Conventional,
}

impl From<StatusCodesArg> for StatusPolicy {
    fn from(arg: StatusCodesArg) -> Self {
        match arg {
            StatusCodesArg::Compatible => StatusPolicy::Compatible,
            StatusCodesArg::Conventional => StatusPolicy::Conventional,
        }
    }
}

impl From<StoreArg> for RecordKind {
    fn from(arg: StoreArg) -> Self {
        match arg {
            StoreArg::Fornecedores => RecordKind::Supplier,
            StoreArg::Ordens => RecordKind::PurchaseOrder,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
