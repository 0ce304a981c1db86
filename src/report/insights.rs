use crate::model::{Category, Transaction, TransactionType};
use crate::report::{breakdown_by_category, totals};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Savings rate thresholds, checked in order. The first threshold the rate exceeds picks the
/// message.
const SAVINGS_RULES: [(i64, &str); 3] = [
    (20, "Great job! You are saving more than 20% of your income."),
    (10, "Good work. You are saving between 10% and 20% of your income."),
    (0, "You are saving less than 10% of your income. Look for expenses you can cut."),
];

const OVERSPENDING: &str = "You are spending as much as or more than you earn.";

/// Short written observations about `rows`.
///
/// There is one message for the savings rate, left out when there is no income, and one naming the
/// largest expense category when there are expenses. Categories with equal totals are broken
/// alphabetically.
pub fn insights(rows: &[Transaction]) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(rate) = totals(rows).savings_rate {
        let message = SAVINGS_RULES
            .iter()
            .find(|(threshold, _)| rate > Decimal::from(*threshold))
            .map_or(OVERSPENDING, |(_, message)| *message);
        out.push(message.to_string());
    }

    let spent = breakdown_by_category(rows, TransactionType::Expense);
    let total: Decimal = spent.values().sum();
    if let Some((category, amount)) = top(&spent) {
        if !total.is_zero() {
            let share = (amount / total * Decimal::ONE_HUNDRED).round_dp(1);
            out.push(format!(
                "Your top expense category is {category} at {share:.1}% of total expenses."
            ));
        }
    }

    out
}

/// The largest entry. Iteration is in name order and only a strictly larger amount replaces the
/// current pick, so ties go to the first name alphabetically.
fn top(spent: &BTreeMap<Category, Decimal>) -> Option<(&Category, Decimal)> {
    let mut best: Option<(&Category, Decimal)> = None;
    for (category, amount) in spent {
        match best {
            Some((_, current)) if *amount <= current => {}
            _ => best = Some((category, *amount)),
        }
    }
    best
}
