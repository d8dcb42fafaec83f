//! Sales Ledger CLI
//!
//! Runs one ledger operation against a storage directory and prints the
//! response as JSON.
//!
//! # Usage
//!
//! ```bash
//! sales-ledger register alice secret1 --full-name "Alice A" --business-name "Alice's Shop"
//! sales-ledger add alice --product Widget --category Tools --amount 10.00 --quantity 2
//! sales-ledger analytics alice
//! ```
//!
//! # Environment Variables
//!
//! - `SALES_DATA_DIR`: storage directory when `--data-dir` is not given (default `data`)
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use clap::{Parser, Subcommand};
use sales_ledger::{Amount, NewTransaction, Result, SalesService, StoreConfig};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "sales-ledger", version, about = "Per-user sales ledger and analytics")]
struct Cli {
    /// Directory holding users.txt and the per-user sales files.
    /// Overrides `SALES_DATA_DIR`.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account.
    Register {
        username: String,
        password: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        business_name: Option<String>,
    },
    /// Check a username and password.
    Login { username: String, password: String },
    /// Record a sale; the id is assigned automatically.
    Add {
        username: String,
        #[arg(long)]
        product: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        amount: Amount,
        #[arg(long)]
        quantity: u32,
        /// `YYYY-MM-DD HH:MM:SS`; defaults to now.
        #[arg(long)]
        timestamp: Option<String>,
        #[arg(long)]
        customer: String,
    },
    /// List a user's sales in insertion order.
    List { username: String },
    /// Print the analytics summary for a user.
    Analytics { username: String },
    /// Delete a sale by id.
    Delete { username: String, id: u32 },
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli
        .data_dir
        .map(StoreConfig::new)
        .unwrap_or_else(StoreConfig::from_env);
    config.init()?;
    let service = SalesService::new(config);

    match cli.command {
        Command::Register {
            username,
            password,
            full_name,
            business_name,
        } => print_json(&service.register(
            &username,
            &password,
            &full_name,
            business_name.as_deref(),
        )),
        Command::Login { username, password } => print_json(&service.login(&username, &password)),
        Command::Add {
            username,
            product,
            category,
            amount,
            quantity,
            timestamp,
            customer,
        } => print_json(&service.add_transaction(
            &username,
            NewTransaction {
                product_name: product,
                category,
                amount,
                quantity,
                timestamp,
                customer_name: customer,
            },
        )),
        Command::List { username } => print_json(&service.list_transactions(&username)?),
        Command::Analytics { username } => print_json(&service.analytics(&username)?),
        Command::Delete { username, id } => print_json(&service.delete_transaction(&username, id)),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}
