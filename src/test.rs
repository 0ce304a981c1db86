//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Amount, Category, Tags, Transaction, TransactionType};
use crate::store::LedgerStore;
use crate::Config;
use chrono::NaiveDate;
use std::str::FromStr;
use tempfile::TempDir;

/// Test environment that sets up a finance home directory with a Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with the default configuration.
    pub async fn new() -> Self {
        Self::create(None).await
    }

    /// Creates a test environment that keeps `backup_copies` backups.
    pub async fn with_backup_copies(backup_copies: u32) -> Self {
        Self::create(Some(backup_copies)).await
    }

    async fn create(backup_copies: Option<u32>) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("finance");
        let config = Config::create(&root, None, backup_copies).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    pub fn store(&self) -> LedgerStore {
        LedgerStore::new(&self.config)
    }

    /// Appends `rows` to the ledger file, dated as of a day far in the future so that no row is
    /// rejected.
    pub async fn seed(&self, rows: &[Transaction]) {
        let store = self.store();
        let far_future = date(2999, 12, 31);
        for t in rows {
            store.append_on(t.clone(), far_future).await.unwrap();
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn income(date: NaiveDate, category: &str, amount: &str) -> Transaction {
    transaction(date, TransactionType::Income, category, amount, "")
}

pub fn expense(date: NaiveDate, category: &str, amount: &str) -> Transaction {
    transaction(date, TransactionType::Expense, category, amount, "")
}

/// Builds a transaction with the given comma-separated tags.
pub fn transaction(
    date: NaiveDate,
    transaction_type: TransactionType,
    category: &str,
    amount: &str,
    tags: &str,
) -> Transaction {
    Transaction::new(
        date,
        transaction_type,
        Category::new(category),
        Amount::from_str(amount).unwrap(),
        "",
        Tags::from_str(tags).unwrap(),
    )
}
