use crate::model::{Transaction, PLACES};
use crate::report::{filter_by_range, DateRange};
use rust_decimal::Decimal;
use serde::Serialize;

/// Income, expenses and what is left over for a set of transactions.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct Totals {
    /// The sum of all income.
    pub income: Decimal,
    /// The sum of all expenses, as a positive number.
    pub expenses: Decimal,
    /// `income - expenses`.
    pub net_balance: Decimal,
    /// `net_balance / income * 100`, or `None` when there is no income.
    pub savings_rate: Option<Decimal>,
}

/// Sums the rows into a [`Totals`].
pub fn totals(rows: &[Transaction]) -> Totals {
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    for t in rows {
        if t.is_income() {
            income += t.amount().value();
        } else {
            expenses += t.amount().value();
        }
    }
    let net_balance = income - expenses;
    let savings_rate = percent_of(net_balance, income);
    Totals {
        income,
        expenses,
        net_balance,
        savings_rate,
    }
}

/// Totals for a range and for the window just before it, with the percentage change of each.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct PeriodDelta {
    pub current: Totals,
    pub previous: Totals,
    /// The window compared against, `None` when the range is a single day.
    pub previous_range: Option<DateRange>,
    pub income_delta: Option<Decimal>,
    pub expense_delta: Option<Decimal>,
    pub balance_delta: Option<Decimal>,
}

/// Compares `range` with the window of equal length just before it.
///
/// Each delta is `(current - previous) / |previous| * 100`, rounded to two places, and is `None`
/// when the previous value is zero. Dividing by the magnitude keeps the sign meaningful when the
/// previous balance was negative: a positive delta always means the value went up.
pub fn period_delta(rows: &[Transaction], range: &DateRange) -> PeriodDelta {
    let current = totals(&filter_by_range(rows, range));
    let previous_range = range.previous();
    let previous = match &previous_range {
        Some(prev) => totals(&filter_by_range(rows, prev)),
        None => Totals::default(),
    };
    PeriodDelta {
        income_delta: change(current.income, previous.income),
        expense_delta: change(current.expenses, previous.expenses),
        balance_delta: change(current.net_balance, previous.net_balance),
        current,
        previous,
        previous_range,
    }
}

fn change(current: Decimal, previous: Decimal) -> Option<Decimal> {
    percent_of(current - previous, previous.abs())
}

/// `part / whole * 100` rounded to two places, `None` when `whole` is zero.
fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    if whole.is_zero() {
        return None;
    }
    Some((part / whole * Decimal::ONE_HUNDRED).round_dp(PLACES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{date, expense, income};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_totals_empty() {
        let t = totals(&[]);
        assert_eq!(t.income, Decimal::ZERO);
        assert_eq!(t.expenses, Decimal::ZERO);
        assert_eq!(t.net_balance, Decimal::ZERO);
        assert_eq!(t.savings_rate, None);
    }

    #[test]
    fn test_totals_income_and_expense() {
        let rows = vec![
            income(date(2024, 1, 1), "Salary", "1000"),
            expense(date(2024, 1, 2), "Rent", "400"),
        ];
        let t = totals(&rows);
        assert_eq!(t.income, dec("1000"));
        assert_eq!(t.expenses, dec("400"));
        assert_eq!(t.net_balance, dec("600"));
        assert_eq!(t.savings_rate, Some(dec("60.0")));
    }

    #[test]
    fn test_totals_balance_identity() {
        let rows = vec![
            income(date(2024, 1, 1), "Salary", "123.45"),
            expense(date(2024, 1, 2), "Rent", "999.99"),
            expense(date(2024, 1, 3), "Bills", "0.01"),
            income(date(2024, 1, 4), "Gift", "10"),
        ];
        for n in 0..=rows.len() {
            let t = totals(&rows[..n]);
            assert_eq!(t.net_balance, t.income - t.expenses);
            assert_eq!(t.savings_rate.is_none(), t.income.is_zero());
        }
    }

    #[test]
    fn test_savings_rate_rounding_and_sign() {
        let rows = vec![
            income(date(2024, 1, 1), "Salary", "300"),
            expense(date(2024, 1, 2), "Rent", "200"),
        ];
        assert_eq!(totals(&rows).savings_rate, Some(dec("33.33")));

        let overspent = vec![
            income(date(2024, 1, 1), "Salary", "100"),
            expense(date(2024, 1, 2), "Rent", "150"),
        ];
        assert_eq!(totals(&overspent).savings_rate, Some(dec("-50")));

        let only_expenses = vec![expense(date(2024, 1, 2), "Rent", "150")];
        let t = totals(&only_expenses);
        assert_eq!(t.net_balance, dec("-150"));
        assert_eq!(t.savings_rate, None);
    }

    #[test]
    fn test_period_delta() {
        let rows = vec![
            // previous window: 2024-01-01 ..= 2024-01-09
            income(date(2024, 1, 5), "Salary", "1000"),
            expense(date(2024, 1, 6), "Rent", "500"),
            // current window: 2024-01-10 ..= 2024-01-19
            income(date(2024, 1, 10), "Salary", "1500"),
            expense(date(2024, 1, 19), "Rent", "250"),
            // after the range
            income(date(2024, 1, 20), "Salary", "99999"),
        ];
        let range = DateRange::new(date(2024, 1, 10), date(2024, 1, 19)).unwrap();
        let delta = period_delta(&rows, &range);

        assert_eq!(
            delta.previous_range,
            Some(DateRange::new(date(2024, 1, 1), date(2024, 1, 9)).unwrap())
        );
        assert_eq!(delta.current.income, dec("1500"));
        assert_eq!(delta.previous.income, dec("1000"));
        assert_eq!(delta.income_delta, Some(dec("50")));
        assert_eq!(delta.expense_delta, Some(dec("-50")));
        // 1250 vs 500
        assert_eq!(delta.balance_delta, Some(dec("150")));
    }

    #[test]
    fn test_period_delta_not_applicable_when_previous_is_zero() {
        let rows = vec![
            expense(date(2024, 1, 5), "Rent", "500"),
            income(date(2024, 1, 10), "Salary", "1500"),
        ];
        let range = DateRange::new(date(2024, 1, 10), date(2024, 1, 19)).unwrap();
        let delta = period_delta(&rows, &range);
        assert_eq!(delta.income_delta, None);
        assert_eq!(delta.expense_delta, Some(dec("-100")));
        // previous balance -500, current 1500: up by 400% of the magnitude
        assert_eq!(delta.balance_delta, Some(dec("400")));
    }

    #[test]
    fn test_period_delta_single_day() {
        let rows = vec![income(date(2024, 1, 9), "Salary", "10")];
        let range = DateRange::new(date(2024, 1, 10), date(2024, 1, 10)).unwrap();
        let delta = period_delta(&rows, &range);
        assert_eq!(delta.previous_range, None);
        assert_eq!(delta.previous, Totals::default());
        assert_eq!(delta.income_delta, None);
        assert_eq!(delta.expense_delta, None);
        assert_eq!(delta.balance_delta, None);
    }
}
