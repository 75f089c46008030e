//! Frete - multi-destination freight offers
//!
//! A CLI tool that publishes one freight per destination and renders
//! stored freights whatever shape their list fields were saved in.

mod cli;
mod commands;
mod logging;
mod output;

use clap::Parser;
use cli::Cli;
use frete_app::Config;

fn main() {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    if let Err(e) = logging::init(level) {
        eprintln!("Warning: {}", e);
    }

    if let Err(e) = commands::execute(cli, config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
