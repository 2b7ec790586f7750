use std::fs;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quayside::config::DataConfig;
use quayside::seed;
use quayside::store::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "quayside")]
#[command(about = "Registry metadata store bootstrap", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed an empty store: constraints, default roles and identities,
    /// the library project, and the schema version marker
    Seed {
        /// Data directory for the store database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Print the seed summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the schema version and row counts of an existing store
    Status {
        /// Data directory for the store database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },
}

fn run_seed(data_dir: String, json: bool) -> anyhow::Result<()> {
    let config = DataConfig::new(data_dir);
    fs::create_dir_all(&config.data_dir)?;

    let store = SqliteStore::new(config.db_path())?;
    let summary = seed::run(&store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Seeded store at {}", config.db_path().display());
        println!("  schema version: {}", summary.schema_version);
        println!(
            "  admin user id: {} (username '{}')",
            summary.admin_user_id,
            seed::ADMIN_USERNAME
        );
        println!(
            "  default project id: {} (name '{}')",
            summary.project_id,
            seed::DEFAULT_PROJECT
        );
        println!(
            "  rows: {} access levels, {} roles, {} users, {} projects, {} members",
            summary.counts.access_levels,
            summary.counts.roles,
            summary.counts.users,
            summary.counts.projects,
            summary.counts.project_members,
        );
    }

    Ok(())
}

fn run_status(data_dir: String, json: bool) -> anyhow::Result<()> {
    let config = DataConfig::new(data_dir);
    if !config.db_path().exists() {
        bail!("no store found at {}", config.db_path().display());
    }

    let store = SqliteStore::new(config.db_path())?;
    let version = store.schema_version()?;
    let counts = store.counts()?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "schema_version": version,
                "counts": counts,
            }))?
        );
    } else {
        match &version {
            Some(v) => println!("schema version: {v}"),
            None => println!("schema version: none (store not seeded)"),
        }
        println!(
            "rows: {} access levels, {} roles, {} users, {} projects, {} members, \
             {} access logs, {} repositories, {} properties",
            counts.access_levels,
            counts.roles,
            counts.users,
            counts.projects,
            counts.project_members,
            counts.access_logs,
            counts.repositories,
            counts.properties,
        );
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("quayside=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Seed { data_dir, json } => run_seed(data_dir, json),
        Commands::Status { data_dir, json } => run_status(data_dir, json),
    }
}
