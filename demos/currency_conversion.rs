//! Settlement in a foreign currency.
//!
//! Expenses are recorded in the group's home currency. A balance query
//! can re-express every figure in another currency using a rate provider.

use rust_decimal_macros::dec;
use split_ledger::fx::snapshot::RateSnapshot;
use split_ledger::prelude::*;
use split_ledger::report::render_outcome;

fn main() -> Result<(), LedgerError> {
    println!("╔══════════════════════════════════════════════╗");
    println!("║  split-ledger: Currency Conversion Example   ║");
    println!("╚══════════════════════════════════════════════╝\n");

    let ledger = LedgerService::new(InMemoryExpenseStore::new(), InMemoryCurrencySettings::new());
    let group = GroupId::new("flatmates");

    ledger.set_currency(&group, "SGD")?;
    ledger.record_expense(
        &group,
        ExpenseDraft::new("Groceries", "mei", dec!(120), ["mei", "raj", "tom"]),
    )?;
    ledger.record_expense(
        &group,
        ExpenseDraft::new("Internet", "raj", dec!(45), ["mei", "raj", "tom"]),
    )?;

    // --- Home currency ---
    println!("━━━ In SGD ━━━\n");
    let outcome = ledger.compute_balances(&group, None, &NoRates)?;
    println!("{}\n", render_outcome(&outcome));

    // --- Fixed rate table ---
    println!("━━━ In EUR (fixed table) ━━━\n");
    let table = FxRateTable::new().with_rate("SGD", "EUR", dec!(0.68))?;
    let eur = CurrencyCode::new("EUR");
    let outcome = ledger.compute_balances(&group, Some(&eur), &table)?;
    println!("{}\n", render_outcome(&outcome));

    // --- Provider snapshot ---
    println!("━━━ In USD (rate snapshot) ━━━\n");
    let snapshot = RateSnapshot::from_json(
        r#"{"data": {"USD": 1.0, "SGD": 1.35, "EUR": 0.92, "JPY": 151.2}}"#,
    )?;
    let usd = CurrencyCode::new("USD");
    let outcome = ledger.compute_balances(&group, Some(&usd), &snapshot)?;
    println!("{}\n", render_outcome(&outcome));

    // --- Unknown currency ---
    println!("━━━ Unknown currency ━━━\n");
    match ledger.compute_balances(&group, Some(&CurrencyCode::new("XYZ")), &snapshot) {
        Err(e) => println!("Query failed: {}", e),
        Ok(outcome) => println!("{}", render_outcome(&outcome)),
    }

    Ok(())
}
