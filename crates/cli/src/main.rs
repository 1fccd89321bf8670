use std::process::ExitCode;

use clap::Parser;
use stock_tracker_core::StockTracker;

use crate::args::{Args, Command};

mod actions;
mod args;
mod logging;
mod menu;
mod render;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logging::init(&args.log_level);

    let mut tracker = StockTracker::open(args.settings());
    tracing::debug!(?tracker, "Tracker ready");

    let outcome = match args.command {
        None => {
            menu::run(&mut tracker).await?;
            Ok(())
        }
        Some(Command::Add { symbol, shares, price }) => {
            actions::add(&mut tracker, &symbol, shares, price).await
        }
        Some(Command::Remove { symbol }) => actions::remove(&mut tracker, &symbol),
        Some(Command::Update { symbol, shares, price }) => {
            actions::update(&mut tracker, &symbol, shares, price)
        }
        Some(Command::View { offline }) => {
            actions::view(&mut tracker, offline).await;
            Ok(())
        }
    };

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(msg) => {
            eprintln!("{msg}");
            Ok(ExitCode::FAILURE)
        }
    }
}
