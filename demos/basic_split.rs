//! Basic expense splitting example.
//!
//! Records a few shared expenses for a group and prints who owes whom.

use rust_decimal_macros::dec;
use split_ledger::prelude::*;
use split_ledger::report::render_outcome;

fn main() -> Result<(), LedgerError> {
    println!("╔══════════════════════════════════════╗");
    println!("║  split-ledger: Basic Split Example   ║");
    println!("╚══════════════════════════════════════╝\n");

    let ledger = LedgerService::new(InMemoryExpenseStore::new(), InMemoryCurrencySettings::new());
    let trip = GroupId::new("weekend-trip");

    // --- Scenario 1: One dinner, three people ---
    println!("━━━ Scenario 1: Dinner for Three ━━━\n");

    ledger.set_currency(&trip, "SGD")?;
    ledger.record_expense(
        &trip,
        ExpenseDraft::new("Dinner", "alice", dec!(90), ["alice", "bob", "carol"]),
    )?;

    let outcome = ledger.compute_balances(&trip, None, &NoRates)?;
    println!("{}\n", render_outcome(&outcome));

    // --- Scenario 2: More expenses pile up ---
    println!("━━━ Scenario 2: A Full Weekend ━━━\n");

    ledger.record_expense(
        &trip,
        ExpenseDraft::new("Hotel", "bob", dec!(420), ["alice", "bob", "carol", "dave"]),
    )?;
    ledger.record_expense(
        &trip,
        ExpenseDraft::new("Taxi", "carol", dec!(36.50), ["carol", "dave"]),
    )?;
    ledger.record_expense(
        &trip,
        ExpenseDraft::new("Museum", "dave", dec!(60), ["alice", "bob"]),
    )?;

    let outcome = ledger.compute_balances(&trip, None, &NoRates)?;
    if let Some(summary) = outcome.summary() {
        println!("Net balances:");
        for (participant, balance) in summary.balances.iter() {
            println!("  {:<8} {:>10}", participant, split_ledger::report::format_amount(balance));
        }
        println!();
    }
    println!("{}\n", render_outcome(&outcome));

    // --- Scenario 3: Bad input is rejected ---
    println!("━━━ Scenario 3: Validation ━━━\n");

    let rejected = ledger.record_expense(
        &trip,
        ExpenseDraft::new("Nothing", "alice", dec!(0), ["alice", "bob"]),
    );
    match rejected {
        Err(e) => println!("Rejected: {}", e),
        Ok(id) => println!("Unexpectedly recorded {}", id),
    }

    Ok(())
}
