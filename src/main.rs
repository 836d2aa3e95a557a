//! split-ledger CLI
//!
//! Record shared expenses and see who owes whom from the command line.
//!
//! # Usage
//!
//! ```bash
//! split-ledger set-currency --group trip --currency SGD
//! split-ledger add --group trip --name Dinner --payer A --amount 90 --participants A,B,C
//! split-ledger balances --group trip
//! split-ledger balances --group trip --currency EUR --rates rates.json --format json
//! ```

use log::error;
use rust_decimal::Decimal;
use split_ledger::config::Config;
use split_ledger::core::currency::CurrencyCode;
use split_ledger::core::expense::ExpenseDraft;
use split_ledger::core::participant::GroupId;
use split_ledger::error::LedgerError;
use split_ledger::fx::snapshot::RateSnapshot;
use split_ledger::fx::{NoRates, RateProvider};
use split_ledger::report::render_outcome;
use split_ledger::service::LedgerService;
use split_ledger::store::file::{JsonFileCurrencySettings, JsonFileExpenseStore};
use std::collections::HashMap;
use std::process;
use std::str::FromStr;

type FileLedger = LedgerService<JsonFileExpenseStore, JsonFileCurrencySettings>;

fn print_usage() {
    eprintln!(
        r#"split-ledger — shared expenses and debt settlement

USAGE:
    split-ledger [--config <FILE>] <COMMAND> [OPTIONS]

COMMANDS:
    set-currency    Set the home currency of a group
    show-currency   Show the home currency of a group
    add             Record an expense
    balances        Show who owes whom
    help            Show this message

OPTIONS (set-currency):
    --group <ID>            Group identifier
    --currency <CODE>       Currency code, e.g. SGD

OPTIONS (show-currency):
    --group <ID>            Group identifier

OPTIONS (add):
    --group <ID>            Group identifier
    --name <TEXT>           What the expense was for
    --payer <NAME>          Who paid
    --amount <AMOUNT>       How much, in the group currency
    --participants <LIST>   Comma-separated people sharing the cost

OPTIONS (balances):
    --group <ID>            Group identifier
    --currency <CODE>       Convert figures into this currency
    --rates <FILE>          Rate snapshot to convert with
    --format <FORMAT>       Output format: text (default) or json

ENVIRONMENT:
    SPLIT_LEDGER_DATA_DIR   Data directory (default: ./data)
    SPLIT_LEDGER_RATES      Default rate snapshot file
    RUST_LOG                Log level (default: info)"#
    );
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Parse `--key value` pairs, accepting only the listed keys.
fn parse_options(args: &[String], allowed: &[&str]) -> HashMap<String, String> {
    let mut options = HashMap::new();
    let mut i = 0;
    while i < args.len() {
        let key = args[i].as_str();
        if !allowed.contains(&key) {
            eprintln!("Unknown option: {}", key);
            process::exit(1);
        }
        i += 1;
        let value = args.get(i).cloned().unwrap_or_else(|| {
            eprintln!("{} requires a value", key);
            process::exit(1);
        });
        options.insert(key.trim_start_matches("--").to_string(), value);
        i += 1;
    }
    options
}

fn required<'a>(options: &'a HashMap<String, String>, key: &str) -> &'a str {
    options
        .get(key)
        .map(String::as_str)
        .unwrap_or_else(|| fail(format!("--{} is required", key)))
}

fn open_ledger(config: &Config) -> Result<FileLedger, LedgerError> {
    let expenses = JsonFileExpenseStore::open(config.expenses_path())?;
    let currencies = JsonFileCurrencySettings::open(config.currencies_path())?;
    Ok(LedgerService::with_engine(
        expenses,
        currencies,
        config.settlement.engine(),
    ))
}

fn cmd_set_currency(ledger: &FileLedger, args: &[String]) -> Result<(), LedgerError> {
    let options = parse_options(args, &["--group", "--currency"]);
    let group = GroupId::new(required(&options, "group"));
    let currency = ledger.set_currency(&group, required(&options, "currency"))?;
    println!(
        "Currency set to {}. All expenses in this group will now follow this currency.",
        currency
    );
    Ok(())
}

fn cmd_show_currency(ledger: &FileLedger, args: &[String]) -> Result<(), LedgerError> {
    let options = parse_options(args, &["--group"]);
    let group = GroupId::new(required(&options, "group"));
    match ledger.currency(&group)? {
        Some(currency) => println!("Current group currency is set to: {}", currency),
        None => println!("No currency set. Use set-currency before adding expenses."),
    }
    Ok(())
}

fn cmd_add(ledger: &FileLedger, args: &[String]) -> Result<(), LedgerError> {
    let options = parse_options(
        args,
        &["--group", "--name", "--payer", "--amount", "--participants"],
    );
    let group = GroupId::new(required(&options, "group"));
    let raw_amount = required(&options, "amount");
    let amount = Decimal::from_str(raw_amount.trim())
        .unwrap_or_else(|_| fail(format!("Invalid amount '{}'", raw_amount)));
    let participants: Vec<String> = required(&options, "participants")
        .split(',')
        .map(str::to_string)
        .collect();

    let draft = ExpenseDraft::new(
        required(&options, "name"),
        required(&options, "payer"),
        amount,
        participants,
    );
    let id = ledger.record_expense(&group, draft.clone())?;
    let currency = ledger
        .currency(&group)?
        .map(|c| c.to_string())
        .unwrap_or_default();
    println!(
        "Expense {} '{}' of {} {} paid by {} for {} added!",
        id,
        draft.name.trim(),
        currency,
        split_ledger::report::format_amount(amount),
        draft.payer.trim(),
        draft.participants.join(", ")
    );
    Ok(())
}

fn cmd_balances(ledger: &FileLedger, config: &Config, args: &[String]) -> Result<(), LedgerError> {
    let options = parse_options(args, &["--group", "--currency", "--rates", "--format"]);
    let group = GroupId::new(required(&options, "group"));
    let format = options.get("format").map(String::as_str).unwrap_or("text");
    if format != "text" && format != "json" {
        fail(format!("--format must be 'text' or 'json', got '{}'", format));
    }

    let target = options
        .get("currency")
        .map(|c| CurrencyCode::parse(c))
        .transpose()?;

    let rates_path = options
        .get("rates")
        .map(Into::into)
        .or_else(|| config.rates.snapshot_path.clone());
    let snapshot = match (&target, rates_path) {
        (Some(_), Some(path)) => Some(RateSnapshot::from_path(path)?),
        _ => None,
    };
    let rates: &dyn RateProvider = match &snapshot {
        Some(snapshot) => snapshot,
        None => &NoRates,
    };

    let outcome = ledger.compute_balances(&group, target.as_ref(), rates)?;
    if format == "json" {
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|e| LedgerError::Config(format!("cannot serialize output: {}", e)))?;
        println!("{}", json);
    } else {
        println!("{}", render_outcome(&outcome));
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let mut config_path = None;
    if let Some(pos) = args.iter().position(|a| a == "--config") {
        if pos + 1 >= args.len() {
            fail("--config requires a file path");
        }
        config_path = Some(args.remove(pos + 1));
        args.remove(pos);
    }

    if args.is_empty() {
        print_usage();
        process::exit(1);
    }

    let command = args[0].as_str();
    let rest = &args[1..];

    if matches!(command, "help" | "--help" | "-h") {
        print_usage();
        return;
    }

    let config = match config_path {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    }
    .unwrap_or_else(|e| fail(e));

    let ledger = open_ledger(&config).unwrap_or_else(|e| fail(e));

    let result = match command {
        "set-currency" => cmd_set_currency(&ledger, rest),
        "show-currency" => cmd_show_currency(&ledger, rest),
        "add" => cmd_add(&ledger, rest),
        "balances" => cmd_balances(&ledger, &config, rest),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        fail(e);
    }
}
