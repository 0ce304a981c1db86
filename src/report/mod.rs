//! Summaries computed from the ledger: totals, period-over-period changes, breakdowns by
//! category, month and tag, and a handful of written insights.
//!
//! Everything here is a pure function of the rows passed in. Nothing reads or writes the ledger.

mod breakdown;
mod insights;
mod totals;

pub use breakdown::{
    breakdown_by_category, monthly_summary, tag_breakdown, tag_totals, MonthlyRow, TagRow,
    TagTotal,
};
pub use insights::insights;
pub use totals::{period_delta, totals, PeriodDelta, Totals};

use crate::error::{Error, ErrorType};
use crate::model::{Category, Transaction, TransactionType};
use crate::Result;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// An inclusive range of dates. `start` is never after `end`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// # Errors
    /// - Returns a `Request` error when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::msg(
                ErrorType::Request,
                format!("The start date {start} is after the end date {end}"),
            ));
        }
        Ok(Self { start, end })
    }

    /// Fills in missing bounds: `end` defaults to `today` and `start` to the earliest transaction
    /// date (or `end` when there are no earlier transactions).
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        rows: &[Transaction],
        today: NaiveDate,
    ) -> Result<Self> {
        let end = end.unwrap_or(today);
        let start = match start {
            Some(start) => start,
            None => rows
                .iter()
                .map(Transaction::date)
                .min()
                .map_or(end, |earliest| earliest.min(end)),
        };
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The window immediately before this one, `[start - (end - start), start)`.
    ///
    /// Returns `None` when the range is a single day, since the window is then empty.
    pub fn previous(&self) -> Option<DateRange> {
        let length = self.end - self.start;
        if length <= Duration::zero() {
            return None;
        }
        let start = self
            .start
            .checked_sub_signed(length)
            .unwrap_or(NaiveDate::MIN);
        let end = self.start.checked_sub_signed(Duration::days(1))?;
        Some(DateRange { start, end })
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Returns the rows dated within `range`, both ends included, in ledger order.
pub fn filter_by_range(rows: &[Transaction], range: &DateRange) -> Vec<Transaction> {
    rows.iter()
        .filter(|t| range.contains(t.date()))
        .cloned()
        .collect()
}

/// Everything the dashboard shows for one date range.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub range: DateRange,
    pub transaction_count: usize,
    pub totals: Totals,
    pub change: PeriodDelta,
    pub income_by_category: BTreeMap<Category, Decimal>,
    pub expenses_by_category: BTreeMap<Category, Decimal>,
    pub monthly: Vec<MonthlyRow>,
    pub tags: Vec<TagTotal>,
    pub insights: Vec<String>,
}

impl Dashboard {
    /// Computes the dashboard for `range` from the whole ledger. The whole ledger is needed
    /// because the period comparison looks at rows before `range`.
    pub fn build(rows: &[Transaction], range: DateRange) -> Self {
        let view = filter_by_range(rows, &range);
        Self {
            range,
            transaction_count: view.len(),
            totals: totals(&view),
            change: period_delta(rows, &range),
            income_by_category: breakdown_by_category(&view, TransactionType::Income),
            expenses_by_category: breakdown_by_category(&view, TransactionType::Expense),
            monthly: monthly_summary(&view),
            tags: tag_totals(&view),
            insights: insights(&view),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{date, expense, income};

    #[test]
    fn test_new_rejects_inverted_range() {
        let err = DateRange::new(date(2024, 2, 1), date(2024, 1, 1)).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Request);
        assert!(DateRange::new(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
    }

    #[test]
    fn test_filter_is_inclusive() {
        let rows = vec![
            income(date(2024, 1, 9), "Salary", "1"),
            income(date(2024, 1, 10), "Salary", "2"),
            income(date(2024, 1, 15), "Salary", "3"),
            income(date(2024, 1, 20), "Salary", "4"),
            income(date(2024, 1, 21), "Salary", "5"),
        ];
        let range = DateRange::new(date(2024, 1, 10), date(2024, 1, 20)).unwrap();
        let view = filter_by_range(&rows, &range);
        let amounts: Vec<String> = view.iter().map(|t| t.amount().to_string()).collect();
        assert_eq!(amounts, vec!["2.00", "3.00", "4.00"]);
    }

    #[test]
    fn test_previous_window() {
        let range = DateRange::new(date(2024, 1, 10), date(2024, 1, 20)).unwrap();
        let prev = range.previous().unwrap();
        assert_eq!(prev.start(), date(2023, 12, 31));
        assert_eq!(prev.end(), date(2024, 1, 9));

        let single = DateRange::new(date(2024, 1, 10), date(2024, 1, 10)).unwrap();
        assert_eq!(single.previous(), None);
    }

    #[test]
    fn test_resolve_defaults() {
        let today = date(2024, 6, 30);
        let rows = vec![
            expense(date(2024, 3, 5), "Bills", "1"),
            expense(date(2024, 2, 1), "Bills", "1"),
        ];
        let range = DateRange::resolve(None, None, &rows, today).unwrap();
        assert_eq!(range, DateRange::new(date(2024, 2, 1), today).unwrap());

        let empty = DateRange::resolve(None, None, &[], today).unwrap();
        assert_eq!(empty, DateRange::new(today, today).unwrap());

        // An explicit end before every transaction still yields a valid range.
        let early = DateRange::resolve(None, Some(date(2024, 1, 1)), &rows, today).unwrap();
        assert_eq!(early.start(), date(2024, 1, 1));

        let err = DateRange::resolve(Some(date(2024, 7, 1)), None, &rows, today).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Request);
    }

    #[test]
    fn test_dashboard_on_empty_ledger() {
        let today = date(2024, 6, 30);
        let range = DateRange::resolve(None, None, &[], today).unwrap();
        let dashboard = Dashboard::build(&[], range);
        assert_eq!(dashboard.transaction_count, 0);
        assert_eq!(dashboard.totals, Totals::default());
        assert_eq!(dashboard.totals.savings_rate, None);
        assert_eq!(dashboard.change.income_delta, None);
        assert!(dashboard.income_by_category.is_empty());
        assert!(dashboard.expenses_by_category.is_empty());
        assert!(dashboard.monthly.is_empty());
        assert!(dashboard.tags.is_empty());
        assert!(dashboard.insights.is_empty());
        assert!(serde_json::to_string(&dashboard).is_ok());
    }

    #[test]
    fn test_dashboard_counts_only_the_range() {
        let rows = vec![
            income(date(2024, 1, 15), "Salary", "1000"),
            income(date(2024, 2, 1), "Salary", "1000"),
            expense(date(2024, 2, 2), "Rent", "400"),
        ];
        let range = DateRange::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap();
        let dashboard = Dashboard::build(&rows, range);
        assert_eq!(dashboard.transaction_count, 2);
        assert_eq!(dashboard.totals.income, Decimal::from(1000));
        assert_eq!(dashboard.totals.expenses, Decimal::from(400));
        // January falls in the previous window.
        assert_eq!(dashboard.change.previous.income, Decimal::from(1000));
        assert_eq!(dashboard.change.income_delta, Some(Decimal::ZERO));
    }
}
