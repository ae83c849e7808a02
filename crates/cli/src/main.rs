//! Trustify CLI - database migrations and admin bootstrap.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! trustify migrate
//!
//! # Create the bootstrap admin account (idempotent)
//! trustify seed admin -p 'Trustify@2025'
//!
//! # With a custom identity
//! trustify seed admin -e root@example.com -n "Platform Admin" -p 'S3cret!pw'
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed admin` - Ensure the ADMIN account exists

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "trustify")]
#[command(author, version, about = "Trustify CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Ensure the bootstrap ADMIN account exists
    Admin {
        /// Admin email address
        #[arg(short, long, default_value = trustify_platform::seed::DEFAULT_ADMIN_EMAIL)]
        email: String,

        /// Admin display name
        #[arg(short, long, default_value = trustify_platform::seed::DEFAULT_ADMIN_NAME)]
        name: String,

        /// Admin password (only used when the account is created)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Admin {
                email,
                name,
                password,
            } => {
                commands::seed::admin(&name, &email, &password).await?;
            }
        },
    }
    Ok(())
}
