//! Reading and writing the flat ledger table.
//!
//! The table is a CSV file with the header `Date,Type,Category,Amount,Description,Tags`. The same
//! format is used for the ledger file itself, for backups and for exports.

use crate::error::Res;
use crate::model::{parse_decimal, Amount, Category, Tags, Transaction, TransactionType};
use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::trace;

/// The header row of the ledger table.
pub const HEADERS: [&str; 6] = ["Date", "Type", "Category", "Amount", "Description", "Tags"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of the table exactly as it appears in the file. Every field is kept as text so that a
/// bad value in one column can be reported instead of failing the whole read.
// Date,Type,Category,Amount,Description,Tags
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Record {
    date: String,
    #[serde(rename = "Type", default)]
    transaction_type: String,
    #[serde(default)]
    category: String,
    amount: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: String,
}

impl From<&Transaction> for Record {
    fn from(t: &Transaction) -> Self {
        Self {
            date: t.date().format(DATE_FORMAT).to_string(),
            transaction_type: t.transaction_type().to_string(),
            category: t.category().to_string(),
            amount: format!("{:.2}", t.signed_amount()),
            description: t.description().to_string(),
            tags: t.tags().to_string(),
        }
    }
}

impl Record {
    /// Coerces the text fields into a `Transaction`, or explains why that is not possible.
    fn into_transaction(self) -> Result<Transaction, String> {
        let date = parse_date(&self.date)
            .ok_or_else(|| format!("unreadable date '{}'", self.date))?;
        let signed = parse_decimal(&self.amount)
            .map_err(|e| format!("unreadable amount '{}': {e}", self.amount))?;

        // The Type column wins when it can be read, otherwise the sign of the amount decides.
        let transaction_type = match TransactionType::from_str(&self.transaction_type) {
            Ok(t) => t,
            Err(_) => TransactionType::from_sign(signed)
                .ok_or_else(|| String::from("the amount is zero"))?,
        };
        let amount = Amount::new(signed.abs()).map_err(|e| e.to_string())?;

        Ok(Transaction::new(
            date,
            transaction_type,
            Category::new(self.category),
            amount,
            self.description,
            Tags::from_str(&self.tags).unwrap_or_default(),
        ))
    }
}

/// A row that could not be turned into a `Transaction` and was left out of the ledger view.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct RejectedRow {
    /// The line in the file where the row starts.
    pub line: u64,
    /// Why the row was rejected.
    pub reason: String,
}

/// The outcome of reading a table: the rows that could be read, and those that could not.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct LoadReport {
    pub transactions: Vec<Transaction>,
    pub rejected: Vec<RejectedRow>,
}

/// Reads a table from CSV text.
///
/// Rows whose date or amount cannot be read are dropped and listed in `rejected`. Missing
/// `Description` and `Tags` columns are tolerated. Text without a header row yields an empty
/// report.
pub fn read_table(text: &str) -> Res<LoadReport> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());
    let headers = rdr.headers().context("Unable to read the table header")?.clone();

    let mut report = LoadReport::default();
    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                report.rejected.push(RejectedRow {
                    line,
                    reason: format!("malformed record: {e}"),
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let parsed = fold_trailing_tags(&headers, record)
            .and_then(|record| {
                record
                    .deserialize::<Record>(Some(&headers))
                    .map_err(|e| format!("malformed record: {e}"))
            })
            .and_then(Record::into_transaction);
        match parsed {
            Ok(t) => report.transactions.push(t),
            Err(reason) => {
                trace!("Dropping row at line {line}: {reason}");
                report.rejected.push(RejectedRow { line, reason });
            }
        }
    }
    Ok(report)
}

/// Writes `rows` as CSV text. The header is always written, even when there are no rows.
pub fn write_table<'a>(rows: impl IntoIterator<Item = &'a Transaction>) -> Res<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(HEADERS)
        .context("Unable to write the table header")?;
    for t in rows {
        wtr.serialize(Record::from(t))
            .context("Unable to write a table row")?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Unable to flush the table: {e}"))?;
    String::from_utf8(bytes).context("The table is not valid UTF-8")
}

/// Puts the fields of a row that runs past the header back together when the last column is
/// `Tags`, so that `food,essential` written without quotes stays two tags. A row that runs past any
/// other last column is rejected.
fn fold_trailing_tags(headers: &StringRecord, record: StringRecord) -> Result<StringRecord, String> {
    if record.len() <= headers.len() {
        return Ok(record);
    }
    let last = headers.len().saturating_sub(1);
    if headers.get(last) != Some(HEADERS[5]) {
        return Err(format!(
            "expected {} fields, found {}",
            headers.len(),
            record.len()
        ));
    }
    let mut folded: StringRecord = record.iter().take(last).collect();
    let tags: Vec<&str> = record.iter().skip(last).collect();
    folded.push_field(&tags.join(","));
    Ok(folded)
}

/// Reads a date, ignoring any time of day that may follow it.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|datetime| datetime.date_naive())
}
