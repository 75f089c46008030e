//! CLI definition using clap

use clap::{Parser, Subcommand};
use frete_domain::model::FreightStatus;
use frete_domain::normalize::FreightField;
use frete_domain::FailurePolicy;
use frete_types::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "frete")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Publish multi-destination freight offers and render stored freights")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Store directory override
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create one freight per destination from a submission JSON file
    Create {
        /// Path to submission JSON
        submission: PathBuf,

        /// CSV with city,state[,cep,neighborhood,address]; replaces the JSON destinations
        #[arg(long)]
        destinations_csv: Option<PathBuf>,

        /// Failure policy (keep-partial, compensate). Uses config value if not specified.
        #[arg(long)]
        policy: Option<FailurePolicy>,
    },

    /// List stored freights
    List {
        /// Only freights with this status
        #[arg(long, short = 's')]
        status: Option<FreightStatus>,
    },

    /// Show one freight by id or code
    Show {
        /// Freight id or code (e.g. FRT-000012)
        freight: String,
    },

    /// Move a freight to a new status
    Status {
        /// Freight id or code
        freight: String,

        /// Target status (ativo, aceito, em_andamento, concluido, cancelado)
        status: FreightStatus,
    },

    /// Delete a freight (price rows are kept)
    Delete {
        /// Freight id or code
        freight: String,
    },

    /// Normalize a raw field value and show the labelled entries
    Normalize {
        /// JSON value; text that is not JSON is taken as a string
        value: String,

        /// Stored field the value came from (destinos, tipos_veiculos, ...)
        #[arg(long)]
        field: Option<FreightField>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set store directory
        #[arg(long)]
        set_store_dir: Option<PathBuf>,

        /// Set failure policy (keep-partial, compensate)
        #[arg(long)]
        set_policy: Option<FailurePolicy>,

        /// Set default output format (json, table)
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set log level filter (error, warn, info, debug)
        #[arg(long)]
        set_log_level: Option<String>,

        /// Reset to default configuration
        #[arg(long)]
        reset: bool,
    },
}
