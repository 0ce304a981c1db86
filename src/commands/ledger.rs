//! Commands that read or change individual ledger rows.

use crate::args::{AddArgs, DeleteArgs, ExportArgs, RangeArgs};
use crate::commands::{load_range, plural, resolve_range, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{money, Amount, Category, Tags, Transaction};
use crate::report::{filter_by_range, DateRange};
use crate::{store, utils, Config, LedgerStore, Result};
use anyhow::Context;
use chrono::Local;
use serde::Serialize;
use std::str::FromStr;

/// A transaction along with its position in the ledger. The position is what `delete` takes.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Positioned {
    pub position: usize,
    #[serde(flatten)]
    pub transaction: Transaction,
}

impl Positioned {
    /// One line of the text listing.
    fn line(&self) -> String {
        let t = &self.transaction;
        let mut s = format!(
            "{:>5}  {}  {:<7}  {:<13}  {:>12}",
            self.position,
            t.date(),
            t.transaction_type().to_string(),
            t.category().as_str(),
            money(t.signed_amount()),
        );
        if !t.description().is_empty() {
            s.push_str(&format!("  {}", t.description()));
        }
        if !t.tags().is_empty() {
            s.push_str(&format!("  [{}]", t.tags()));
        }
        s
    }
}

/// Records a transaction. The date defaults to today.
///
/// # Errors
/// - Returns a `Validation` error for a bad amount, an unknown category or a future date.
/// - Returns a `Storage` error if the ledger cannot be read, backed up or written.
pub async fn add(config: Config, args: &AddArgs) -> Result<Out<Positioned>> {
    let amount = Amount::from_str(args.amount())
        .with_context(|| format!("Invalid amount '{}'", args.amount()))
        .pub_result(ErrorType::Validation)?;
    let category = Category::for_entry(args.transaction_type(), args.category())
        .pub_result(ErrorType::Validation)?;
    let date = args.date().unwrap_or_else(|| Local::now().date_naive());
    let transaction = Transaction::new(
        date,
        args.transaction_type(),
        category,
        amount,
        args.description().trim(),
        Tags::new(args.tags().split(',')),
    );

    let position = LedgerStore::new(&config)
        .append(transaction.clone())
        .await?;
    let added = Positioned {
        position,
        transaction,
    };
    Ok(Out::new(
        format!("Added transaction\n{}", added.line()),
        added,
    ))
}

/// Deletes the transaction at the position shown by `list`.
///
/// # Errors
/// - Returns a `NotFound` error if there is no transaction at that position.
/// - Returns a `Storage` error if the ledger cannot be read, backed up or written.
pub async fn delete(config: Config, args: &DeleteArgs) -> Result<Out<Positioned>> {
    let position = args.position();
    let transaction = LedgerStore::new(&config).delete(position).await?;
    let deleted = Positioned {
        position,
        transaction,
    };
    Ok(Out::new(
        format!("Deleted transaction\n{}", deleted.line()),
        deleted,
    ))
}

/// Lists the transactions in a range, newest first.
pub async fn list(config: Config, args: &RangeArgs) -> Result<Out<Vec<Positioned>>> {
    let (rows, range) = load_range(&config, args).await?;
    let mut listed: Vec<Positioned> = rows
        .into_iter()
        .enumerate()
        .filter(|(_, t)| range.contains(t.date()))
        .map(|(position, transaction)| Positioned {
            position,
            transaction,
        })
        .collect();
    listed.sort_by(|a, b| {
        b.transaction
            .date()
            .cmp(&a.transaction.date())
            .then(b.position.cmp(&a.position))
    });

    let mut message = format!("{} from {range}", plural(listed.len(), "transaction"));
    for p in &listed {
        message.push('\n');
        message.push_str(&p.line());
    }
    Ok(Out::new(message, listed))
}

/// What `export` wrote.
#[derive(Debug, Clone, Serialize)]
pub struct Exported {
    pub range: DateRange,
    pub output: Option<String>,
}

/// Writes the transactions in a range as a ledger CSV, either to `--output` or, when it is not
/// given, as the message itself.
///
/// # Errors
/// - Returns a `Storage` error if the ledger cannot be read or the output cannot be written.
pub async fn export(config: Config, args: &ExportArgs) -> Result<Out<Exported>> {
    let rows = LedgerStore::new(&config).load_report().await?.transactions;
    let range = resolve_range(args.range(), &rows)?;
    let view = filter_by_range(&rows, &range);
    let text = store::write_view(&view)?;
    let count = view.len();

    match args.output() {
        Some(path) => {
            utils::write(path, &text)
                .await
                .pub_result(ErrorType::Storage)?;
            let exported = Exported {
                range,
                output: Some(path.display().to_string()),
            };
            Ok(Out::new(
                format!(
                    "Exported {} from {range} to {}",
                    plural(count, "transaction"),
                    path.display()
                ),
                exported,
            ))
        }
        None => Ok(Out::new(
            text,
            Exported {
                range,
                output: None,
            },
        )),
    }
}
