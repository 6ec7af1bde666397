//! eproc-scraper CLI
//!
//! Looks up parties on the eproc portal and manages the local store.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use eproc_scraper::db::{self, create_pool, parties};
use eproc_scraper::{normalize_query_name, LookupOutcome, LookupService, ScraperConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "eproc-scraper")]
#[command(about = "Look up judicial parties and their cases on the TJMG eproc portal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a party name, collect its cases, store them and write a snapshot
    Lookup {
        /// Party name (normalized to upper case)
        #[arg(short, long)]
        name: String,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the database is reachable
    Health,

    /// Create the data directory and database schema
    InitDb,

    /// Show a stored party and its case count
    Party {
        #[arg(short, long)]
        name: String,
    },

    /// Delete a stored party together with all of its cases
    DeleteParty {
        #[arg(short, long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load .env file if present
    dotenvy::dotenv().ok();
    let config = ScraperConfig::from_env()?;

    std::fs::create_dir_all(&config.data_dir)?;
    let pool = create_pool(&config.database_url).await?;

    match cli.command {
        Commands::Lookup { name, json } => {
            let name = normalize_query_name(&name);
            info!("🔎 Looking up cases for: {}", name);

            let service = LookupService::new(pool, config);
            let outcome = match service.lookup(&name).await {
                Ok(outcome) => outcome,
                Err(e) => bail!("Lookup failed: {}", e.user_message()),
            };

            match outcome {
                LookupOutcome::NotFound { queried_name } => {
                    bail!("No cases found for '{}'", queried_name);
                }
                LookupOutcome::Found { report, .. } => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        println!("\n=== {} ===", report.queried_name);
                        println!("Parties: {}", report.total_parties);
                        println!("Cases:   {}", report.total_cases);
                        println!();
                        for row in &report.cases {
                            println!(
                                "  - {} | {} x {} | {} ({})",
                                row.case.case_number,
                                row.case.plaintiff,
                                row.case.defendant,
                                row.case.subject,
                                row.party
                            );
                        }
                        println!(
                            "\nSnapshot: {}",
                            service.exporter().path_for(&report.queried_name).display()
                        );
                    }
                }
            }
        }

        Commands::Health => match db::health_check(&pool).await {
            Ok(()) => println!("healthy: database connection OK"),
            Err(e) => bail!("unhealthy: {}", e),
        },

        Commands::InitDb => {
            println!("Database ready at {}", config.database_url);
            println!("Data directory: {}", config.data_dir.display());
        }

        Commands::Party { name } => {
            let name = normalize_query_name(&name);
            match parties::party_summary(&pool, &name).await? {
                Some(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
                None => bail!("Party '{}' not found", name),
            }
        }

        Commands::DeleteParty { name } => {
            let name = normalize_query_name(&name);
            match parties::delete_party(&pool, &name).await? {
                Some(deleted) => println!(
                    "Deleted party '{}' and {} case(s)",
                    deleted.party.name, deleted.cases_removed
                ),
                None => bail!("Party '{}' not found", name),
            }
        }
    }

    Ok(())
}
