//! Sockshop CLI - Session-table migrations and catalog seeding.
//!
//! # Usage
//!
//! ```bash
//! # Create the storefront session table
//! sockshop-cli migrate storefront
//!
//! # Create the admin session table
//! sockshop-cli migrate admin
//!
//! # Create both session tables
//! sockshop-cli migrate all
//!
//! # Seed the document store with a starter sock catalog
//! sockshop-cli seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create tower-sessions tables
//! - `seed` - Seed the `products` collection with fixtures

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sockshop-cli")]
#[command(author, version, about = "Sockshop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create session tables
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Seed the document store with a starter catalog
    Seed,
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Create the storefront session table
    Storefront,
    /// Create the admin session table
    Admin,
    /// Create both session tables
    All,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Storefront => commands::migrate::storefront().await?,
            MigrateTarget::Admin => commands::migrate::admin().await?,
            MigrateTarget::All => {
                commands::migrate::storefront().await?;
                commands::migrate::admin().await?;
            }
        },
        Commands::Seed => commands::seed::run().await?,
    }

    Ok(())
}
