//! Human-readable rendering of balance queries.
//!
//! This is the only place figures are rounded: two fractional digits,
//! midpoints away from zero.

use crate::service::{BalanceOutcome, BalanceSummary};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write;

/// Format an amount with exactly two fractional digits.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Render a balance query outcome as plain text.
pub fn render_outcome(outcome: &BalanceOutcome) -> String {
    match outcome {
        BalanceOutcome::NoExpenses => "No expenses recorded for this group yet.".to_string(),
        BalanceOutcome::Computed(summary) => render_summary(summary),
    }
}

/// Render settlement instructions followed by per-payer expenditures.
///
/// ```text
/// B owes A SGD 30.00
/// C owes A SGD 30.00
///
/// Total Expenditures:
/// A: SGD 90.00
/// ```
pub fn render_summary(summary: &BalanceSummary) -> String {
    let mut out = String::new();
    let currency = &summary.currency;

    if summary.instructions.is_empty() {
        out.push_str("All settled up.\n");
    }
    for instruction in &summary.instructions {
        let _ = write!(
            out,
            "{} owes {} {} {}",
            instruction.from,
            instruction.to,
            currency,
            format_amount(instruction.amount)
        );
        if let Some(conversion) = &summary.conversion {
            let _ = write!(
                out,
                " (at 1 {} = {} {})",
                conversion.from,
                format_amount(conversion.rate),
                conversion.to
            );
        }
        out.push('\n');
    }

    match &summary.conversion {
        Some(conversion) => {
            let _ = writeln!(out, "\nTotal Expenditures (converted to {}):", conversion.to);
        }
        None => out.push_str("\nTotal Expenditures:\n"),
    }
    for (payer, amount) in &summary.expenditures {
        let _ = writeln!(out, "{}: {} {}", payer, currency, format_amount(*amount));
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::balance::Balances;
    use crate::core::currency::{Conversion, CurrencyCode};
    use crate::core::participant::ParticipantId;
    use crate::settlement::engine::SettlementInstruction;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn summary(conversion: Option<Conversion>) -> BalanceSummary {
        let currency = conversion
            .as_ref()
            .map(|c| c.to.clone())
            .unwrap_or_else(|| CurrencyCode::new("SGD"));
        BalanceSummary {
            currency,
            conversion,
            balances: Balances::new(),
            instructions: vec![SettlementInstruction {
                from: ParticipantId::new("B"),
                to: ParticipantId::new("A"),
                amount: dec!(30),
            }],
            expenditures: BTreeMap::from([(ParticipantId::new("A"), dec!(90))]),
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(30)), "30.00");
        assert_eq!(format_amount(dec!(2.005)), "2.01");
        assert_eq!(format_amount(dec!(-2.005)), "-2.01");
        assert_eq!(format_amount(dec!(33.333333333333)), "33.33");
    }

    #[test]
    fn test_render_home_currency() {
        let text = render_summary(&summary(None));
        assert_eq!(text, "B owes A SGD 30.00\n\nTotal Expenditures:\nA: SGD 90.00");
    }

    #[test]
    fn test_render_converted() {
        let text = render_summary(&summary(Some(Conversion {
            from: CurrencyCode::new("SGD"),
            to: CurrencyCode::new("EUR"),
            rate: dec!(0.7),
        })));
        assert!(text.starts_with("B owes A EUR 30.00 (at 1 SGD = 0.70 EUR)"));
        assert!(text.contains("Total Expenditures (converted to EUR):\nA: EUR 90.00"));
    }

    #[test]
    fn test_render_settled_group() {
        let mut s = summary(None);
        s.instructions.clear();
        let text = render_summary(&s);
        assert!(text.starts_with("All settled up."));
        assert!(text.ends_with("A: SGD 90.00"));
    }

    #[test]
    fn test_render_no_expenses() {
        assert_eq!(
            render_outcome(&BalanceOutcome::NoExpenses),
            "No expenses recorded for this group yet."
        );
    }
}
