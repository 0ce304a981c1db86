//! Commands that summarize the ledger over a date range.

use crate::args::{BreakdownArgs, RangeArgs};
use crate::commands::{load_range, plural, Out};
use crate::model::{money, Category, TransactionType};
use crate::report::{self, filter_by_range, Dashboard, MonthlyRow, PeriodDelta, TagTotal};
use crate::{Config, Result};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Income, expenses, net balance and savings rate, compared with the previous period.
pub async fn summary(config: Config, args: &RangeArgs) -> Result<Out<PeriodDelta>> {
    let (rows, range) = load_range(&config, args).await?;
    let delta = report::period_delta(&rows, &range);
    let message = format!("Summary for {range}\n{}", render_totals(&delta));
    Ok(Out::new(message, delta))
}

/// Totals per category for one type of transaction.
pub async fn breakdown(
    config: Config,
    args: &BreakdownArgs,
) -> Result<Out<BTreeMap<Category, Decimal>>> {
    let (rows, range) = load_range(&config, args.range()).await?;
    let view = filter_by_range(&rows, &range);
    let by_category = report::breakdown_by_category(&view, args.transaction_type());
    let message = format!(
        "{} by category for {range}\n{}",
        args.transaction_type(),
        render_breakdown(&by_category)
    );
    Ok(Out::new(message, by_category))
}

/// Income and expenses per calendar month.
pub async fn monthly(config: Config, args: &RangeArgs) -> Result<Out<Vec<MonthlyRow>>> {
    let (rows, range) = load_range(&config, args).await?;
    let summary = report::monthly_summary(&filter_by_range(&rows, &range));
    let message = format!("Monthly summary for {range}\n{}", render_monthly(&summary));
    Ok(Out::new(message, summary))
}

/// Totals per tag. A transaction counts toward each of its tags.
pub async fn tags(config: Config, args: &RangeArgs) -> Result<Out<Vec<TagTotal>>> {
    let (rows, range) = load_range(&config, args).await?;
    let totals = report::tag_totals(&filter_by_range(&rows, &range));
    let message = format!("Tags for {range}\n{}", render_tags(&totals));
    Ok(Out::new(message, totals))
}

/// Observations about savings and spending.
pub async fn insights(config: Config, args: &RangeArgs) -> Result<Out<Vec<String>>> {
    let (rows, range) = load_range(&config, args).await?;
    let insights = report::insights(&filter_by_range(&rows, &range));
    let message = format!("Insights for {range}\n{}", render_insights(&insights));
    Ok(Out::new(message, insights))
}

/// All of the above in one go.
pub async fn dashboard(config: Config, args: &RangeArgs) -> Result<Out<Dashboard>> {
    let (rows, range) = load_range(&config, args).await?;
    let dashboard = Dashboard::build(&rows, range);
    let message = format!(
        "Dashboard for {range}, {}\n\n\
        {}\n\n\
        Income by category\n{}\n\n\
        Expenses by category\n{}\n\n\
        Monthly\n{}\n\n\
        Tags\n{}\n\n\
        Insights\n{}",
        plural(dashboard.transaction_count, "transaction"),
        render_totals(&dashboard.change),
        render_breakdown(&dashboard.income_by_category),
        render_breakdown(&dashboard.expenses_by_category),
        render_monthly(&dashboard.monthly),
        render_tags(&dashboard.tags),
        render_insights(&dashboard.insights),
    );
    Ok(Out::new(message, dashboard))
}

const NOTHING: &str = "  (nothing to show)";

fn render_totals(delta: &PeriodDelta) -> String {
    let t = &delta.current;
    let compared = match &delta.previous_range {
        Some(prev) => format!("change from {prev}"),
        None => String::from("no previous period"),
    };
    format!(
        "  {:<13} {:>14}  {}\n  {:<13} {:>14}  {}\n  {:<13} {:>14}  {}\n  {:<13} {:>14}\n  ({compared})",
        "Income",
        money(t.income),
        change(delta.income_delta),
        "Expenses",
        money(t.expenses),
        change(delta.expense_delta),
        "Net balance",
        money(t.net_balance),
        change(delta.balance_delta),
        "Savings rate",
        percent(t.savings_rate),
    )
}

fn render_breakdown(by_category: &BTreeMap<Category, Decimal>) -> String {
    if by_category.is_empty() {
        return NOTHING.to_string();
    }
    let total: Decimal = by_category.values().sum();
    let lines: Vec<String> = by_category
        .iter()
        .map(|(category, amount)| {
            let share = if total.is_zero() {
                None
            } else {
                Some((amount / total * Decimal::ONE_HUNDRED).round_dp(1))
            };
            format!(
                "  {:<13} {:>14}  {}",
                category.as_str(),
                money(*amount),
                percent(share)
            )
        })
        .collect();
    lines.join("\n")
}

fn render_monthly(rows: &[MonthlyRow]) -> String {
    if rows.is_empty() {
        return NOTHING.to_string();
    }
    rows.iter()
        .map(|r| {
            format!(
                "  {}  {:<7} {:>14}",
                r.month,
                r.transaction_type.to_string(),
                money(r.sum)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_tags(rows: &[TagTotal]) -> String {
    if rows.is_empty() {
        return NOTHING.to_string();
    }
    rows.iter()
        .map(|r| {
            let amount = match r.transaction_type {
                TransactionType::Income => money(r.total),
                TransactionType::Expense => money(-r.total),
            };
            format!(
                "  {:<13} {:<7} {:>14}  ({})",
                r.tag,
                r.transaction_type.to_string(),
                amount,
                plural(r.count, "transaction")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_insights(insights: &[String]) -> String {
    if insights.is_empty() {
        return NOTHING.to_string();
    }
    insights
        .iter()
        .map(|s| format!("  - {s}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn percent(value: Option<Decimal>) -> String {
    match value {
        Some(v) => format!("{v:.1}%"),
        None => String::from("n/a"),
    }
}

fn change(value: Option<Decimal>) -> String {
    match value {
        Some(v) if v > Decimal::ZERO => format!("+{v:.2}%"),
        Some(v) => format!("{v:.2}%"),
        None => String::from("n/a"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{date, expense, income, transaction, TestEnv};

    fn january() -> RangeArgs {
        RangeArgs::new(Some(date(2024, 1, 1)), Some(date(2024, 1, 31)))
    }

    async fn seeded() -> TestEnv {
        let env = TestEnv::new().await;
        env.seed(&[
            income(date(2023, 12, 15), "Salary", "800"),
            income(date(2024, 1, 15), "Salary", "1000"),
            transaction(
                date(2024, 1, 20),
                TransactionType::Expense,
                "Groceries",
                "100",
                "food,weekly",
            ),
            expense(date(2024, 1, 25), "Rent", "300"),
            expense(date(2024, 2, 1), "Rent", "300"),
        ])
        .await;
        env
    }

    #[tokio::test]
    async fn test_summary() {
        let env = seeded().await;
        let out = summary(env.config(), &january()).await.unwrap();
        let delta = out.structure().unwrap();
        assert_eq!(delta.current.income, Decimal::from(1000));
        assert_eq!(delta.current.expenses, Decimal::from(400));
        assert_eq!(delta.current.savings_rate, Some(Decimal::from(60)));
        assert_eq!(delta.previous.income, Decimal::from(800));
        assert_eq!(delta.income_delta, Some(Decimal::from(25)));
        assert_eq!(delta.expense_delta, None);
        assert!(out.message().contains("$1,000.00"));
        assert!(out.message().contains("+25.00%"));
        assert!(out.message().contains("60.0%"));
    }

    #[tokio::test]
    async fn test_breakdown() {
        let env = seeded().await;
        let args = BreakdownArgs::new(TransactionType::Expense, january());
        let out = breakdown(env.config(), &args).await.unwrap();
        let map = out.structure().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&Category::new("Rent")], Decimal::from(300));
        assert!(out.message().starts_with("Expense by category for 2024-01-01 to 2024-01-31"));
        assert!(out.message().contains("75.0%"));
    }

    #[tokio::test]
    async fn test_monthly_and_tags() {
        let env = seeded().await;
        let out = monthly(env.config(), &RangeArgs::new(None, Some(date(2024, 2, 29))))
            .await
            .unwrap();
        let months: Vec<String> = out
            .structure()
            .unwrap()
            .iter()
            .map(|r| r.month.to_string())
            .collect();
        assert_eq!(months, vec!["2023-12", "2024-01", "2024-01", "2024-02"]);

        let out = tags(env.config(), &january()).await.unwrap();
        let names: Vec<&str> = out
            .structure()
            .unwrap()
            .iter()
            .map(|t| t.tag.as_str())
            .collect();
        assert_eq!(names, vec!["food", "weekly"]);
        assert!(out.message().contains("-$100.00"));
    }

    #[tokio::test]
    async fn test_insights_and_dashboard() {
        let env = seeded().await;
        let out = insights(env.config(), &january()).await.unwrap();
        assert_eq!(out.structure().unwrap().len(), 2);
        assert!(out.message().contains("Rent at 75.0%"));

        let out = dashboard(env.config(), &january()).await.unwrap();
        let d = out.structure().unwrap();
        assert_eq!(d.transaction_count, 3);
        assert_eq!(d.income_by_category.len(), 1);
        assert!(out.message().starts_with("Dashboard for 2024-01-01 to 2024-01-31, 3 transactions"));
    }

    #[tokio::test]
    async fn test_reports_on_empty_ledger() {
        let env = TestEnv::new().await;
        let out = dashboard(env.config(), &RangeArgs::default()).await.unwrap();
        assert_eq!(out.structure().unwrap().transaction_count, 0);
        assert!(out.message().contains(NOTHING));
        assert!(out.message().contains("n/a"));

        let out = summary(env.config(), &RangeArgs::default()).await.unwrap();
        assert_eq!(out.structure().unwrap().current.savings_rate, None);
    }

    #[tokio::test]
    async fn test_inverted_range_is_a_request_error() {
        let env = TestEnv::new().await;
        let args = RangeArgs::new(Some(date(2024, 2, 1)), Some(date(2024, 1, 1)));
        let err = summary(env.config(), &args).await.unwrap_err();
        assert_eq!(err.error_type(), crate::ErrorType::Request);
    }
}
