//! Command handlers

use crate::cli::{Cli, Commands};
use crate::output::{
    output_created, output_list, output_normalized, output_partial, output_record, output_view,
};
use frete_app::app::freight_service::{inspect_value, load_submission};
use frete_app::config::Config;
use frete_app::repository::{open_directory_repo, open_freight_repo};
use frete_app::FreightService;
use frete_domain::model::FreightStatus;
use frete_domain::normalize::FreightField;
use frete_domain::FailurePolicy;
use frete_types::{OutputFormat, Result};
use serde_json::Value;
use std::path::PathBuf;

pub fn execute(cli: Cli, mut config: Config) -> Result<()> {
    // Override from CLI args
    if let Some(ref dir) = cli.store_dir {
        config.store_dir = Some(dir.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);

    match cli.command {
        Commands::Create {
            submission,
            destinations_csv,
            policy,
        } => cmd_create(
            &config,
            submission,
            destinations_csv,
            policy.unwrap_or(config.failure_policy),
            output_format,
        ),

        Commands::List { status } => cmd_list(&config, status, output_format),

        Commands::Show { freight } => cmd_show(&config, &freight, output_format),

        Commands::Status { freight, status } => {
            cmd_status(&config, &freight, status, output_format)
        }

        Commands::Delete { freight } => cmd_delete(&config, &freight, output_format),

        Commands::Normalize { value, field } => cmd_normalize(&value, field, output_format),

        Commands::Config {
            show,
            set_store_dir,
            set_policy,
            set_output,
            set_log_level,
            reset,
        } => cmd_config(
            show,
            set_store_dir,
            set_policy,
            set_output,
            set_log_level,
            reset,
        ),
    }
}

fn cmd_create(
    config: &Config,
    submission_path: PathBuf,
    destinations_csv: Option<PathBuf>,
    policy: FailurePolicy,
    output_format: OutputFormat,
) -> Result<()> {
    let submission = load_submission(&submission_path, destinations_csv.as_deref())?;
    let freights = open_freight_repo(config)?;
    let directory = open_directory_repo(config)?;
    let service = FreightService::new(&freights, &directory).with_policy(policy);

    match service.create(&submission) {
        Ok(created) => output_created(output_format, &created),
        Err(err) => {
            output_partial(&err);
            Err(err.source)
        }
    }
}

fn cmd_list(config: &Config, status: Option<FreightStatus>, output_format: OutputFormat) -> Result<()> {
    let freights = open_freight_repo(config)?;
    let directory = open_directory_repo(config)?;
    let service = FreightService::new(&freights, &directory);
    output_list(output_format, &service.list(status)?)
}

fn cmd_show(config: &Config, freight: &str, output_format: OutputFormat) -> Result<()> {
    let freights = open_freight_repo(config)?;
    let directory = open_directory_repo(config)?;
    let service = FreightService::new(&freights, &directory);
    output_view(output_format, &service.show(freight)?)
}

fn cmd_status(
    config: &Config,
    freight: &str,
    status: FreightStatus,
    output_format: OutputFormat,
) -> Result<()> {
    let freights = open_freight_repo(config)?;
    let directory = open_directory_repo(config)?;
    let service = FreightService::new(&freights, &directory);
    let record = service.transition(freight, status)?;
    output_record(output_format, "Status updated", &record)
}

fn cmd_delete(config: &Config, freight: &str, output_format: OutputFormat) -> Result<()> {
    let freights = open_freight_repo(config)?;
    let directory = open_directory_repo(config)?;
    let service = FreightService::new(&freights, &directory);
    let record = service.delete(freight)?;
    output_record(output_format, "Freight deleted", &record)
}

fn cmd_normalize(raw: &str, field: Option<FreightField>, output_format: OutputFormat) -> Result<()> {
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    output_normalized(output_format, &inspect_value(field, &value))
}

fn cmd_config(
    show: bool,
    set_store_dir: Option<PathBuf>,
    set_policy: Option<FailurePolicy>,
    set_output: Option<OutputFormat>,
    set_log_level: Option<String>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(dir) = set_store_dir {
        config.store_dir = Some(dir);
        modified = true;
    }

    if let Some(policy) = set_policy {
        config.failure_policy = policy;
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(level) = set_log_level {
        config.log_level = level;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
