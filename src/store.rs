//! The ledger store: the on-disk table of transactions.
//!
//! The ledger is read fresh from disk for every operation. Appends and deletes rewrite the whole
//! file, after a backup snapshot of the previous state has been taken. When the snapshot cannot be
//! written, the change is not made.

use crate::backup::Backup;
use crate::error::{Error, ErrorType, IntoResult, Res};
use crate::model::{Category, Transaction};
use crate::report::{filter_by_range, DateRange};
use crate::table::{self, LoadReport};
use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Reads and writes the ledger file named in a `Config`.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    data_path: PathBuf,
    backup: Backup,
}

impl LedgerStore {
    pub fn new(config: &Config) -> Self {
        Self {
            data_path: config.data_path().to_path_buf(),
            backup: config.backup(),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Loads the ledger. This never fails: rows that cannot be read are dropped, and if the file
    /// cannot be read at all the failure is logged and an empty ledger is returned. A missing file
    /// is an empty ledger.
    pub async fn load(&self) -> Vec<Transaction> {
        match self.load_report().await {
            Ok(report) => report.transactions,
            Err(e) => {
                error!("Unable to load the ledger, showing no transactions: {e}");
                Vec::new()
            }
        }
    }

    /// Loads the ledger along with the list of rows that had to be dropped.
    ///
    /// # Errors
    /// - Returns a `Storage` error when the file exists but cannot be read.
    pub async fn load_report(&self) -> Result<LoadReport> {
        let report = self.read().await.pub_result(ErrorType::Storage)?;
        if !report.rejected.is_empty() {
            warn!(
                "Dropped {} unreadable row(s) from {}",
                report.rejected.len(),
                self.data_path.display()
            );
        }
        Ok(report)
    }

    /// Appends a transaction dated no later than today. See [`LedgerStore::append_on`].
    pub async fn append(&self, transaction: Transaction) -> Result<usize> {
        self.append_on(transaction, Local::now().date_naive()).await
    }

    /// Appends a transaction to the end of the ledger and returns its position.
    ///
    /// # Errors
    /// - Returns a `Validation` error, without touching the ledger, when the transaction is dated
    ///   after `today` or its category is not allowed for its type.
    /// - Returns a `Storage` error when the ledger cannot be read, backed up or written.
    pub async fn append_on(&self, transaction: Transaction, today: NaiveDate) -> Result<usize> {
        if transaction.date() > today {
            return Err(Error::msg(
                ErrorType::Validation,
                format!(
                    "The transaction date {} is in the future, today is {today}",
                    transaction.date()
                ),
            ));
        }
        let category = Category::for_entry(
            transaction.transaction_type(),
            transaction.category().as_str(),
        )
        .pub_result(ErrorType::Validation)?;
        let transaction = Transaction::new(
            transaction.date(),
            transaction.transaction_type(),
            category,
            transaction.amount(),
            transaction.description(),
            transaction.tags().clone(),
        );

        let mut rows = self.load_for_write().await?;
        rows.push(transaction);
        self.save(&rows).await.pub_result(ErrorType::Storage)?;
        let position = rows.len() - 1;
        info!("Appended transaction at position {position}");
        Ok(position)
    }

    /// Removes the row at `position` and returns it.
    ///
    /// # Errors
    /// - Returns a `NotFound` error, without touching the ledger, when `position` is out of range.
    /// - Returns a `Storage` error when the ledger cannot be read, backed up or written.
    pub async fn delete(&self, position: usize) -> Result<Transaction> {
        let mut rows = self.load_for_write().await?;
        if position >= rows.len() {
            return Err(Error::msg(
                ErrorType::NotFound,
                format!(
                    "There is no transaction at position {position}, the ledger has {} row(s)",
                    rows.len()
                ),
            ));
        }
        let removed = rows.remove(position);
        self.save(&rows).await.pub_result(ErrorType::Storage)?;
        info!("Deleted transaction at position {position}");
        Ok(removed)
    }

    /// Writes the rows dated within `range` as a ledger table, header included. The result can be
    /// read back with the same codec.
    ///
    /// # Errors
    /// - Returns a `Storage` error when the ledger cannot be read.
    pub async fn export(&self, range: &DateRange) -> Result<String> {
        let rows = self.load_report().await?.transactions;
        let view = filter_by_range(&rows, range);
        debug!("Exporting {} of {} row(s) for {range}", view.len(), rows.len());
        write_view(&view)
    }

    /// Loads the ledger for a change. Unlike `load`, a read failure is returned so that an
    /// unreadable file is never overwritten with an empty ledger.
    async fn load_for_write(&self) -> Result<Vec<Transaction>> {
        Ok(self.load_report().await?.transactions)
    }

    async fn read(&self) -> Res<LoadReport> {
        match utils::read_if_exists(&self.data_path).await? {
            Some(text) => table::read_table(&text)
                .with_context(|| format!("Unable to parse {}", self.data_path.display())),
            None => {
                debug!(
                    "No ledger file at {}, starting empty",
                    self.data_path.display()
                );
                Ok(LoadReport::default())
            }
        }
    }

    /// Backs up the current file, then replaces it with `rows`.
    async fn save(&self, rows: &[Transaction]) -> Res<()> {
        self.backup
            .snapshot()
            .await
            .context("Unable to back up the ledger, no changes were made")?;
        let text = table::write_table(rows)?;
        let tmp = self.data_path.with_extension("csv.tmp");
        utils::write(&tmp, text).await?;
        utils::rename(&tmp, &self.data_path).await
    }
}

/// Writes already filtered rows as a ledger table.
pub(crate) fn write_view(rows: &[Transaction]) -> Result<String> {
    table::write_table(rows).pub_result(ErrorType::Storage)
}
