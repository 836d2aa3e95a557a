use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use split_ledger::core::currency::CurrencyCode;
use split_ledger::core::expense::{ExpenseDraft, ExpenseId};
use split_ledger::core::participant::{GroupId, ParticipantId};
use split_ledger::error::{LedgerError, ValidationError};
use split_ledger::fx::snapshot::RateSnapshot;
use split_ledger::fx::table::FxRateTable;
use split_ledger::fx::NoRates;
use split_ledger::report::render_outcome;
use split_ledger::service::{BalanceOutcome, LedgerService};
use split_ledger::session::SessionRegistry;
use split_ledger::settlement::engine::{MatchingPolicy, SettlementEngine, DEFAULT_TOLERANCE};
use split_ledger::store::file::{JsonFileCurrencySettings, JsonFileExpenseStore};
use split_ledger::store::memory::{InMemoryCurrencySettings, InMemoryExpenseStore};
use std::sync::Arc;
use std::thread;

fn p(id: &str) -> ParticipantId {
    ParticipantId::new(id)
}

fn memory_ledger() -> LedgerService<InMemoryExpenseStore, InMemoryCurrencySettings> {
    LedgerService::new(InMemoryExpenseStore::new(), InMemoryCurrencySettings::new())
}

/// Full pipeline: settings → expenses → balances → settlement → report.
#[test]
fn weekend_trip_scenario() {
    let ledger = memory_ledger();
    let group = GroupId::new("-1001234");
    ledger.set_currency(&group, "sgd").unwrap();

    let everyone = ["@alice", "@bob", "@carol"];
    ledger
        .record_expense(&group, ExpenseDraft::new("Hotel", "@alice", dec!(300), everyone))
        .unwrap();
    ledger
        .record_expense(&group, ExpenseDraft::new("Dinner", "@bob", dec!(90), everyone))
        .unwrap();
    ledger
        .record_expense(&group, ExpenseDraft::new("Taxi", "@carol", dec!(24), ["@bob", "@carol"]))
        .unwrap();

    let outcome = ledger.compute_balances(&group, None, &NoRates).unwrap();
    let summary = outcome.summary().unwrap();

    // alice: +200 - 30 = 170; bob: -100 + 60 - 12 = -52; carol: -100 - 30 + 12 = -118
    assert_eq!(summary.balances.balance(&p("@alice")), dec!(170));
    assert_eq!(summary.balances.balance(&p("@bob")), dec!(-52));
    assert_eq!(summary.balances.balance(&p("@carol")), dec!(-118));
    assert_eq!(summary.balances.total(), Decimal::ZERO);

    assert_eq!(summary.instructions.len(), 2);
    assert_eq!(summary.instructions[0].from, p("@carol"));
    assert_eq!(summary.instructions[0].amount, dec!(118));
    assert_eq!(summary.instructions[1].from, p("@bob"));
    assert_eq!(summary.instructions[1].amount, dec!(52));

    let residual = SettlementEngine::residual(&summary.balances, &summary.instructions).unwrap();
    assert!(residual.is_settled(DEFAULT_TOLERANCE));

    let text = render_outcome(&outcome);
    assert!(text.contains("@carol owes @alice SGD 118.00"));
    assert!(text.contains("@bob owes @alice SGD 52.00"));
    assert!(text.contains(
        "Total Expenditures:\n@alice: SGD 300.00\n@bob: SGD 90.00\n@carol: SGD 24.00"
    ));
}

#[test]
fn two_expenses_single_instruction() {
    let ledger = memory_ledger();
    let group = GroupId::new("G");
    ledger.set_currency(&group, "USD").unwrap();
    ledger
        .record_expense(&group, ExpenseDraft::new("Groceries", "A", dec!(60), ["A", "B"]))
        .unwrap();
    ledger
        .record_expense(&group, ExpenseDraft::new("Fuel", "B", dec!(40), ["A", "B"]))
        .unwrap();

    let outcome = ledger.compute_balances(&group, None, &NoRates).unwrap();
    let instructions = &outcome.summary().unwrap().instructions;
    assert_eq!(instructions.len(), 1);
    assert_eq!(instructions[0].to_string(), "B owes A 10.00");
}

#[test]
fn groups_are_independent() {
    let ledger = memory_ledger();
    let g1 = GroupId::new("one");
    let g2 = GroupId::new("two");
    ledger.set_currency(&g1, "EUR").unwrap();

    ledger
        .record_expense(&g1, ExpenseDraft::new("Lunch", "A", dec!(20), ["A", "B"]))
        .unwrap();

    let err = ledger
        .record_expense(&g2, ExpenseDraft::new("Lunch", "A", dec!(20), ["A", "B"]))
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Validation(ValidationError::CurrencyNotSet(_))
    ));
    assert_eq!(
        ledger.compute_balances(&g2, None, &NoRates).unwrap(),
        BalanceOutcome::NoExpenses
    );
}

#[test]
fn all_settled_group_reports_expenditures() {
    let ledger = memory_ledger();
    let group = GroupId::new("G");
    ledger.set_currency(&group, "SGD").unwrap();
    ledger
        .record_expense(&group, ExpenseDraft::new("Coffee", "A", dec!(10), ["A", "B"]))
        .unwrap();
    ledger
        .record_expense(&group, ExpenseDraft::new("Cake", "B", dec!(10), ["A", "B"]))
        .unwrap();

    let outcome = ledger.compute_balances(&group, None, &NoRates).unwrap();
    let summary = outcome.summary().unwrap();
    assert!(summary.instructions.is_empty());
    assert_eq!(summary.expenditures.len(), 2);
    assert!(render_outcome(&outcome).starts_with("All settled up."));
}

#[test]
fn conversion_with_rate_snapshot() {
    let ledger = memory_ledger();
    let group = GroupId::new("G");
    ledger.set_currency(&group, "USD").unwrap();
    ledger
        .record_expense(&group, ExpenseDraft::new("Dinner", "A", dec!(90), ["A", "B", "C"]))
        .unwrap();

    let rates =
        RateSnapshot::from_json(r#"{"data": {"USD": 1, "EUR": 0.5, "SGD": 1.35}}"#).unwrap();
    let eur = CurrencyCode::new("EUR");
    let outcome = ledger.compute_balances(&group, Some(&eur), &rates).unwrap();
    let summary = outcome.summary().unwrap();

    assert_eq!(summary.currency, eur);
    assert!(summary.instructions.iter().all(|i| i.amount == dec!(15)));
    assert_eq!(summary.expenditures[&p("A")], dec!(45));

    let text = render_outcome(&outcome);
    assert!(text.contains("B owes A EUR 15.00 (at 1 USD = 0.50 EUR)"));
    assert!(text.contains("Total Expenditures (converted to EUR):\nA: EUR 45.00"));
}

#[test]
fn unknown_currency_fails_without_output() {
    let ledger = memory_ledger();
    let group = GroupId::new("G");
    ledger.set_currency(&group, "SGD").unwrap();
    ledger
        .record_expense(&group, ExpenseDraft::new("Dinner", "A", dec!(90), ["A", "B"]))
        .unwrap();

    let rates = RateSnapshot::from_json(r#"{"data": {"SGD": 1.35, "EUR": 0.92}}"#).unwrap();
    let result = ledger.compute_balances(&group, Some(&CurrencyCode::new("XYZ")), &rates);
    assert!(matches!(result, Err(LedgerError::RateUnavailable(_))));
}

#[test]
fn file_backed_ledger_persists_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let expenses = dir.path().join("expenses.json");
    let currencies = dir.path().join("config.json");
    let group = GroupId::new("G");

    {
        let ledger = LedgerService::new(
            JsonFileExpenseStore::open(&expenses).unwrap(),
            JsonFileCurrencySettings::open(&currencies).unwrap(),
        );
        ledger.set_currency(&group, "SGD").unwrap();
        let id = ledger
            .record_expense(&group, ExpenseDraft::new("Dinner", "A", dec!(90), ["A", "B", "C"]))
            .unwrap();
        assert_eq!(id, ExpenseId::new(1));
    }

    let ledger = LedgerService::new(
        JsonFileExpenseStore::open(&expenses).unwrap(),
        JsonFileCurrencySettings::open(&currencies).unwrap(),
    );
    assert_eq!(ledger.currency(&group).unwrap(), Some(CurrencyCode::new("SGD")));
    let outcome = ledger.compute_balances(&group, None, &NoRates).unwrap();
    assert_eq!(outcome.summary().unwrap().balances.balance(&p("A")), dec!(60));
}

#[test]
fn session_feeds_ledger() {
    let ledger = memory_ledger();
    let sessions: SessionRegistry<u64> = SessionRegistry::new();
    let group = GroupId::new("G");
    ledger.set_currency(&group, "SGD").unwrap();

    sessions.start(42, group.clone());
    sessions
        .with_session(&42, |s| {
            s.provide_name("Movie")?;
            s.choose_payer("@dan")?;
            s.provide_amount("36")?;
            s.toggle_participant("@dan")?;
            s.toggle_participant("@erin")?;
            s.toggle_participant("@fay").map(|_| ())
        })
        .unwrap()
        .unwrap();

    let (group, draft) = sessions.complete(&42).unwrap().unwrap();
    ledger.record_expense(&group, draft).unwrap();

    let outcome = ledger.compute_balances(&group, None, &NoRates).unwrap();
    let summary = outcome.summary().unwrap();
    assert_eq!(summary.balances.balance(&p("@dan")), dec!(24));
    assert_eq!(summary.instructions.len(), 2);
}

#[test]
fn concurrent_groups() {
    let ledger = Arc::new(memory_ledger());
    let handles: Vec<_> = (0..4)
        .map(|g| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                let group = GroupId::new(format!("group-{}", g));
                ledger.set_currency(&group, "SGD").unwrap();
                for _ in 0..25 {
                    ledger
                        .record_expense(&group, ExpenseDraft::new("x", "A", dec!(4), ["A", "B"]))
                        .unwrap();
                }
                group
            })
        })
        .collect();

    for handle in handles {
        let group = handle.join().unwrap();
        let outcome = ledger.compute_balances(&group, None, &NoRates).unwrap();
        let summary = outcome.summary().unwrap();
        assert_eq!(summary.balances.balance(&p("A")), dec!(50));
        assert_eq!(summary.expenditures[&p("A")], dec!(100));
    }
}

#[test]
fn last_in_first_out_policy_through_service() {
    let ledger = LedgerService::with_engine(
        InMemoryExpenseStore::new(),
        InMemoryCurrencySettings::new(),
        SettlementEngine::with_policy(MatchingPolicy::LastInFirstOut),
    );
    let group = GroupId::new("G");
    ledger.set_currency(&group, "SGD").unwrap();
    ledger
        .record_expense(&group, ExpenseDraft::new("Dinner", "A", dec!(90), ["A", "B", "C"]))
        .unwrap();

    let outcome = ledger.compute_balances(&group, None, &FxRateTable::new()).unwrap();
    let instructions = &outcome.summary().unwrap().instructions;
    assert_eq!(instructions[0].from, p("C"));
    assert_eq!(instructions[1].from, p("B"));
}

#[test]
fn outcome_serializes_to_json() {
    let ledger = memory_ledger();
    let group = GroupId::new("G");
    ledger.set_currency(&group, "SGD").unwrap();
    ledger
        .record_expense(&group, ExpenseDraft::new("Dinner", "A", dec!(90), ["A", "B", "C"]))
        .unwrap();

    let outcome = ledger.compute_balances(&group, None, &NoRates).unwrap();
    let json = serde_json::to_string(&outcome).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["status"], "computed");
    assert_eq!(parsed["currency"], "SGD");
    let a_balance: Decimal = parsed["balances"]["A"].as_str().unwrap().parse().unwrap();
    assert_eq!(a_balance, dec!(60));
    assert_eq!(parsed["instructions"].as_array().unwrap().len(), 2);

    let empty = serde_json::to_value(&BalanceOutcome::NoExpenses).unwrap();
    assert_eq!(empty["status"], "no_expenses");
}
