pub mod commands;
pub mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

#[derive(Debug, Parser)]
#[command(
    name = "fleetfare",
    about = "Fleetfare pricing CLI",
    long_about = "Price quotation requests, tier changes, and inspect effective pricing defaults.",
    after_help = "Examples:\n  fleetfare price request.json\n  fleetfare tier --previous 8000 --new 12000 --free-upgrade\n  fleetfare config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Price a request file (JSON or TOML) and print the full breakdown")]
    Price {
        #[arg(help = "Path to the pricing request file")]
        file: PathBuf,
        #[arg(long, help = "Emit the breakdown as machine-readable JSON")]
        json: bool,
    },
    #[command(about = "Price a service-tier upgrade or downgrade")]
    Tier {
        #[arg(long = "previous", help = "Pre-tax, pre-discount price of the current tier")]
        previous_price: Decimal,
        #[arg(long = "new", help = "Pre-tax, pre-discount price of the target tier")]
        new_price: Decimal,
        #[arg(long, help = "Charge the previous tier's price (complimentary upgrade)")]
        free_upgrade: bool,
        #[arg(long, help = "Override the configured default tax percentage")]
        tax_percent: Option<Decimal>,
        #[arg(long, help = "Override the configured default discount percentage")]
        discount_percent: Option<Decimal>,
        #[arg(long, help = "Emit the breakdown as machine-readable JSON")]
        json: bool,
    },
    #[command(about = "Inspect effective pricing defaults with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Price { file, json } => commands::price::run(&file, json),
        Command::Tier { previous_price, new_price, free_upgrade, tax_percent, discount_percent, json } => {
            commands::tier::run(commands::tier::TierArgs {
                previous_price,
                new_price,
                free_upgrade,
                tax_percent,
                regular_discount_percent: discount_percent,
                json,
            })
        }
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
