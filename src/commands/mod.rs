//! Command handlers for the fintrack CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod init;
mod ledger;
mod report;

use crate::args::{OutputFormat, RangeArgs};
use crate::error::{ErrorType, IntoResult};
use crate::model::Transaction;
use crate::report::DateRange;
use crate::{Config, LedgerStore, Result};
use chrono::Local;
use serde::Serialize;
use std::fmt::Debug;
use std::path::Path;
use tracing::debug;

pub use init::init;
pub use ledger::{add, delete, export, list, Exported, Positioned};
pub use report::{breakdown, dashboard, insights, monthly, summary, tags};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the output to stdout. `Text` prints the message. `Json` prints the whole `Out` object.
    pub fn print(&self, format: OutputFormat) {
        match format {
            OutputFormat::Text => println!("{}", self.message.trim_end()),
            OutputFormat::Json => match serde_json::to_string_pretty(self) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    debug!("Unable to serialize the command output: {e}");
                    println!("{}", self.message.trim_end());
                }
            },
        }
    }
}

/// Loads the configuration from `finance_home`.
///
/// # Errors
/// - Returns a `Config` error if the finance home has not been initialized or the config file
///   cannot be read.
pub async fn load_config(finance_home: &Path) -> Result<Config> {
    Config::load(finance_home)
        .await
        .pub_result(ErrorType::Config)
}

/// Loads the ledger and resolves the requested date range against it.
async fn load_range(config: &Config, range: &RangeArgs) -> Result<(Vec<Transaction>, DateRange)> {
    let rows = LedgerStore::new(config).load().await;
    let range = resolve_range(range, &rows)?;
    debug!("Using {} of the ledger for {range}", rows.len());
    Ok((rows, range))
}

/// Fills in the bounds that were not given, with today as the default end.
fn resolve_range(range: &RangeArgs, rows: &[Transaction]) -> Result<DateRange> {
    let today = Local::now().date_naive();
    DateRange::resolve(range.start(), range.end(), rows, today)
}

/// `"1 transaction"` or `"3 transactions"`.
fn plural(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", if count == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_serializes_message_and_structure() {
        let out = Out::new("Listed 2", vec![1, 2]);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["message"], "Listed 2");
        assert_eq!(json["structure"], serde_json::json!([1, 2]));

        let bare: Out<()> = "Done".into();
        assert_eq!(bare.message(), "Done");
        assert!(bare.structure().is_none());
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "transaction"), "1 transaction");
        assert_eq!(plural(0, "transaction"), "0 transactions");
    }
}
