use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;

use rutc_registry::utils::fixtures::sample_entry_form;
use rutc_registry::{
    DerivedInputs, EntryForm, EntrySession, ParquetRecordStore, RecordStore, RegistryConfig,
    compute_derived,
};

/// Registry entry command line interface
#[derive(Parser, Debug)]
#[command(author, version, about = "Renal and upper tract cancer registry entry", long_about = None)]
#[command(propagate_version = true)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,

    /// Parquet file holding the registry table
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Reference date for age calculation (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Log filter, e.g. "info" or "debug"
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the form defaults for an MRN
    Defaults { mrn: String },
    /// Look up, compute and save an entry read from a JSON form
    Submit { mrn: String, form: PathBuf },
    /// Print the derived fields for a JSON form without saving
    Compute { form: PathBuf },
    /// Print every stored row for an MRN
    History { mrn: String },
    /// Print a sample JSON form to start from
    Template,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level.as_str()))
        .init();

    let mut config = RegistryConfig::from_env();
    if let Some(path) = &args.store {
        config = config.with_store_path(path);
    }
    if let Some(date) = args.today {
        config = config.with_reference_date(date);
    }

    match &args.command {
        Commands::Defaults { mrn } => {
            let mut session = open_session(&config);
            let defaults = session.get_defaults(mrn)?;
            print_json(&defaults)
        }
        Commands::Submit { mrn, form } => {
            let form = read_form(form)?;
            let mut session = open_session(&config);
            session.lookup(mrn)?;
            let results = session.compute(&form)?;
            print_json(&results)?;
            session
                .save(&form)
                .with_context(|| format!("Entry for MRN {mrn} was not saved"))?;
            info!("Entry for MRN {} saved", mrn.trim());
            Ok(())
        }
        Commands::Compute { form } => {
            let form = read_form(form)?;
            let today = config.today();
            form.validate(today)?;
            let results = compute_derived(&DerivedInputs::from(&form), today)?;
            print_json(&results)
        }
        Commands::History { mrn } => {
            let store = ParquetRecordStore::from_config(&config);
            let rows = store
                .find_all_by_key(mrn)
                .with_context(|| format!("Failed to read record store {}", store.location()))?;
            info!("Found {} rows for MRN {}", rows.len(), mrn.trim());
            print_json(&rows)
        }
        Commands::Template => print_json(&sample_entry_form()),
    }
}

fn open_session(config: &RegistryConfig) -> EntrySession<ParquetRecordStore> {
    EntrySession::new(ParquetRecordStore::from_config(config), config.clone())
}

fn read_form(path: &Path) -> Result<EntryForm> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read form {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid form {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
