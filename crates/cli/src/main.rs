//! Loja CLI - database migrations and store management.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! loja-cli migrate
//!
//! # Insert demo customers and products
//! loja-cli seed
//!
//! # Record a sale (customer 1 buys 2 units of product 3)
//! loja-cli sale --customer 1 --product 3 --quantity 2
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed an empty database with demo data
//! - `sale` - Record a sale through the stock-checked transaction

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "loja-cli")]
#[command(author, version, about = "Loja admin CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert demo customers and products into an empty database
    Seed,
    /// Record a sale, decrementing product stock
    Sale {
        /// Customer id
        #[arg(short, long)]
        customer: i64,

        /// Product id
        #[arg(short, long)]
        product: i64,

        /// Units sold
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed => commands::seed::run().await,
        Commands::Sale {
            customer,
            product,
            quantity,
        } => commands::sale::run(customer, product, quantity).await,
    }
}
