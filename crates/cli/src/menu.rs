use std::io::{self, BufRead, Write};
use std::str::FromStr;

use stock_tracker_core::StockTracker;

use crate::actions;

/// Run the interactive menu until the user exits or stdin closes.
pub(crate) async fn run(tracker: &mut StockTracker) -> io::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        println!("\nStock Portfolio Tracker");
        println!("1. Add Stock");
        println!("2. Remove Stock");
        println!("3. View Portfolio");
        println!("4. Update Stock");
        println!("5. Exit");

        let Some(choice) = prompt(&mut input, "\nEnter your choice (1-5): ")? else {
            break;
        };

        match choice.as_str() {
            "1" => {
                let Some((symbol, shares, price)) = read_position(&mut input, "Enter stock symbol: ")? else {
                    break;
                };
                if let Err(msg) = actions::add(tracker, &symbol, shares, price).await {
                    println!("{msg}");
                }
            }
            "2" => {
                let Some(symbol) = prompt(&mut input, "Enter stock symbol to remove: ")? else {
                    break;
                };
                if let Err(msg) = actions::remove(tracker, &symbol) {
                    println!("{msg}");
                }
            }
            "3" => actions::view(tracker, false).await,
            "4" => {
                let Some((symbol, shares, price)) =
                    read_position(&mut input, "Enter stock symbol to update: ")?
                else {
                    break;
                };
                if let Err(msg) = actions::update(tracker, &symbol, shares, price) {
                    println!("{msg}");
                }
            }
            "5" => {
                println!("Exiting...");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }

    if tracker.has_unsaved_changes() {
        tracing::debug!("Refreshed prices were not saved");
    }
    Ok(())
}

/// Symbol, share count and purchase price. `None` means stdin closed.
fn read_position(
    input: &mut impl BufRead,
    symbol_label: &str,
) -> io::Result<Option<(String, u64, f64)>> {
    let Some(symbol) = prompt(input, symbol_label)? else {
        return Ok(None);
    };
    let Some(shares) = prompt_parse::<u64>(input, "Enter number of shares: ")? else {
        return Ok(None);
    };
    let Some(price) = prompt_parse::<f64>(input, "Enter purchase price per share: ")? else {
        return Ok(None);
    };
    Ok(Some((symbol, shares, price)))
}

/// Print `label` and read one trimmed line. `None` on end of input.
fn prompt(input: &mut impl BufRead, label: &str) -> io::Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Keep asking until the answer parses as `T`.
fn prompt_parse<T: FromStr>(input: &mut impl BufRead, label: &str) -> io::Result<Option<T>> {
    loop {
        let Some(answer) = prompt(input, label)? else {
            return Ok(None);
        };
        match answer.parse::<T>() {
            Ok(value) => return Ok(Some(value)),
            Err(_) => println!("Invalid number '{answer}'. Please try again."),
        }
    }
}
