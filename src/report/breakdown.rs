use crate::model::{Category, Month, Transaction, TransactionType};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Sums the amounts of rows of `transaction_type` per category. Categories are ordered by name.
pub fn breakdown_by_category(
    rows: &[Transaction],
    transaction_type: TransactionType,
) -> BTreeMap<Category, Decimal> {
    let mut out: BTreeMap<Category, Decimal> = BTreeMap::new();
    for t in rows.iter().filter(|t| t.transaction_type() == transaction_type) {
        *out.entry(t.category().clone()).or_default() += t.amount().value();
    }
    out
}

/// The signed sum of one type of transaction in one calendar month.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct MonthlyRow {
    pub month: Month,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Positive for income, negative for expenses.
    pub sum: Decimal,
}

/// Groups rows by month and type. Rows come out in chronological order with income before
/// expenses within a month. Months with no transactions are omitted.
pub fn monthly_summary(rows: &[Transaction]) -> Vec<MonthlyRow> {
    let mut groups: BTreeMap<(Month, TransactionType), Decimal> = BTreeMap::new();
    for t in rows {
        *groups.entry((t.month(), t.transaction_type())).or_default() += t.signed_amount();
    }
    groups
        .into_iter()
        .map(|((month, transaction_type), sum)| MonthlyRow {
            month,
            transaction_type,
            sum,
        })
        .collect()
}

/// One (transaction, tag) pair.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct TagRow {
    pub tag: String,
    /// The full amount of the transaction, never split between its tags.
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// Emits one row for every tag of every transaction, in ledger order. A transaction with three
/// tags yields three rows that each carry the whole amount, so the rows do not sum to the ledger
/// total when transactions share more than one tag.
pub fn tag_breakdown(rows: &[Transaction]) -> Vec<TagRow> {
    rows.iter()
        .flat_map(|t| {
            t.tags().iter().map(move |tag| TagRow {
                tag: tag.to_string(),
                amount: t.amount().value(),
                transaction_type: t.transaction_type(),
            })
        })
        .collect()
}

/// The sum of [`tag_breakdown`] rows for one tag and type.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct TagTotal {
    pub tag: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub total: Decimal,
    /// The number of transactions carrying the tag.
    pub count: usize,
}

/// Totals per tag and type, ordered by tag.
pub fn tag_totals(rows: &[Transaction]) -> Vec<TagTotal> {
    let mut groups: BTreeMap<(String, TransactionType), (Decimal, usize)> = BTreeMap::new();
    for row in tag_breakdown(rows) {
        let entry = groups
            .entry((row.tag, row.transaction_type))
            .or_insert((Decimal::ZERO, 0));
        entry.0 += row.amount;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|((tag, transaction_type), (total, count))| TagTotal {
            tag,
            transaction_type,
            total,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{date, expense, income, transaction};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_breakdown_by_category() {
        let rows = vec![
            expense(date(2024, 1, 1), "Rent", "1000"),
            expense(date(2024, 1, 2), "Groceries", "50.25"),
            expense(date(2024, 1, 9), "Groceries", "20"),
            income(date(2024, 1, 3), "Salary", "3000"),
            income(date(2024, 1, 4), "Investment", "10"),
            expense(date(2024, 1, 5), "Investment", "500"),
        ];

        let spent = breakdown_by_category(&rows, TransactionType::Expense);
        let names: Vec<&str> = spent.keys().map(Category::as_str).collect();
        assert_eq!(names, vec!["Groceries", "Investment", "Rent"]);
        assert_eq!(spent[&Category::new("Groceries")], dec("70.25"));
        assert_eq!(spent[&Category::new("Investment")], dec("500"));

        let earned = breakdown_by_category(&rows, TransactionType::Income);
        assert_eq!(earned.len(), 2);
        assert_eq!(earned[&Category::new("Investment")], dec("10"));

        assert!(breakdown_by_category(&[], TransactionType::Expense).is_empty());
    }

    #[test]
    fn test_monthly_summary_is_chronological_and_signed() {
        let rows = vec![
            expense(date(2024, 2, 10), "Rent", "400"),
            income(date(2024, 1, 31), "Salary", "1000"),
            expense(date(2023, 12, 1), "Bills", "30"),
            income(date(2024, 2, 1), "Salary", "1000"),
            expense(date(2024, 2, 20), "Bills", "100"),
        ];
        let summary = monthly_summary(&rows);
        let got: Vec<(String, TransactionType, Decimal)> = summary
            .iter()
            .map(|r| (r.month.to_string(), r.transaction_type, r.sum))
            .collect();
        assert_eq!(
            got,
            vec![
                ("2023-12".to_string(), TransactionType::Expense, dec("-30")),
                ("2024-01".to_string(), TransactionType::Income, dec("1000")),
                ("2024-02".to_string(), TransactionType::Income, dec("1000")),
                ("2024-02".to_string(), TransactionType::Expense, dec("-500")),
            ]
        );
    }

    #[test]
    fn test_tag_breakdown_fans_out() {
        let rows = vec![
            transaction(
                date(2024, 1, 1),
                TransactionType::Expense,
                "Groceries",
                "30",
                "food, weekly ,essential",
            ),
            transaction(date(2024, 1, 2), TransactionType::Expense, "Rent", "900", ""),
            transaction(date(2024, 1, 3), TransactionType::Income, "Salary", "100", "work"),
        ];
        let out = tag_breakdown(&rows);
        assert_eq!(out.len(), 4);
        let tags: Vec<&str> = out.iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(tags, vec!["food", "weekly", "essential", "work"]);
        assert!(out[..3].iter().all(|r| r.amount == dec("30")));
        assert_eq!(out[3].transaction_type, TransactionType::Income);
    }

    #[test]
    fn test_tag_totals() {
        let rows = vec![
            transaction(date(2024, 1, 1), TransactionType::Expense, "Groceries", "30", "food,essential"),
            transaction(date(2024, 1, 2), TransactionType::Expense, "Health", "20", "essential"),
            transaction(date(2024, 1, 3), TransactionType::Income, "Gift", "5", "essential"),
        ];
        let out = tag_totals(&rows);
        assert_eq!(
            out,
            vec![
                TagTotal {
                    tag: "essential".to_string(),
                    transaction_type: TransactionType::Income,
                    total: dec("5"),
                    count: 1,
                },
                TagTotal {
                    tag: "essential".to_string(),
                    transaction_type: TransactionType::Expense,
                    total: dec("50"),
                    count: 2,
                },
                TagTotal {
                    tag: "food".to_string(),
                    transaction_type: TransactionType::Expense,
                    total: dec("30"),
                    count: 1,
                },
            ]
        );
    }
}
