//! Backup management for the ledger file.
//!
//! A snapshot of the ledger is taken before every write. Snapshot names carry the date, a sequence
//! number and a random suffix, e.g. `finance_data.2024-01-15-003-9f1c2ab4.csv`, so two snapshots
//! never share a name.

use crate::error::Res;
use crate::{table, utils, Config};
use anyhow::Context;
use chrono::Local;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

/// Extension of snapshot files.
const EXTENSION: &str = "csv";

/// Manages backup file creation and rotation.
///
/// The `Backup` struct is immutable and owns copies of the paths and settings it needs.
/// Create a new instance via `Config::backup()` or `Backup::new()`.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
    data_path: PathBuf,
}

impl Backup {
    /// Creates a new `Backup` instance from a `Config`.
    pub fn new(config: &Config) -> Self {
        Self {
            backups_dir: config.backups().to_path_buf(),
            backup_copies: config.backup_copies(),
            data_path: config.data_path().to_path_buf(),
        }
    }

    /// Copies the current ledger file into the backups directory.
    ///
    /// When the ledger file does not exist yet, the snapshot holds an empty table so that every
    /// write still has a matching snapshot. Automatically rotates old backups, keeping only
    /// `backup_copies` files (all of them when `backup_copies` is 0).
    ///
    /// Returns the path to the created backup file.
    pub async fn snapshot(&self) -> Res<PathBuf> {
        let prefix = self.prefix();
        let date = today();
        let seq = self.next_sequence_number(&prefix, &date).await?;
        let id = Uuid::new_v4().simple().to_string();
        let filename = format!("{prefix}.{date}-{seq:03}-{}.{EXTENSION}", &id[..8]);
        let path = self.backups_dir.join(&filename);

        if self.data_path.is_file() {
            utils::copy(&self.data_path, &path).await?;
        } else {
            let empty = table::write_table(std::iter::empty())?;
            utils::write(&path, empty).await?;
        }
        debug!("Saved backup to {}", path.display());

        self.rotate().await?;

        Ok(path)
    }

    /// Lists the backups of the ledger file, oldest first.
    pub async fn list(&self) -> Res<Vec<PathBuf>> {
        let prefix = self.prefix();
        let mut files: Vec<(BackupKey, PathBuf)> = Vec::new();

        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(key) = parse_backup_name(&name, &prefix) {
                files.push((key, entry.path()));
            }
        }

        // The sequence number is compared as a number, so -1000- comes after -999-.
        files.sort();
        Ok(files.into_iter().map(|(_, path)| path).collect())
    }

    /// The ledger file name without its extension, e.g. `finance_data`.
    fn prefix(&self) -> String {
        self.data_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| String::from("ledger"))
    }

    /// Scans the backups directory for existing files with the given prefix and date,
    /// and returns the next sequence number.
    async fn next_sequence_number(&self, prefix: &str, date: &str) -> Res<u32> {
        let mut max_seq: u32 = 0;

        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(seq) = parse_sequence_number(&name, prefix, date) {
                max_seq = max_seq.max(seq);
            }
        }

        Ok(max_seq + 1)
    }

    /// Rotates old backup files, keeping only the newest `backup_copies` files.
    async fn rotate(&self) -> Res<()> {
        if self.backup_copies == 0 {
            return Ok(());
        }
        let files = self.list().await?;
        let to_delete = files.len().saturating_sub(self.backup_copies as usize);
        for path in files.into_iter().take(to_delete) {
            debug!("Removing old backup {}", path.display());
            utils::remove(&path).await?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn dir(&self) -> &std::path::Path {
        &self.backups_dir
    }
}

/// Returns today's date in YYYY-MM-DD format.
fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Orders backups by date, then sequence number, then file name.
type BackupKey = (String, u32, String);

/// Parses the sequence number from a backup filename.
/// Returns None if the filename doesn't match the expected pattern.
fn parse_sequence_number(filename: &str, prefix: &str, date: &str) -> Option<u32> {
    parse_backup_name(filename, prefix)
        .filter(|(d, _, _)| d == date)
        .map(|(_, seq, _)| seq)
}

/// Splits a backup filename into its date and sequence number.
/// Returns None if the filename doesn't match the expected pattern.
fn parse_backup_name(filename: &str, prefix: &str) -> Option<BackupKey> {
    // Pattern: {prefix}.{YYYY-MM-DD}-{NNN}-{id}.{ext}
    let remainder = filename.strip_prefix(&format!("{prefix}."))?;
    let remainder = remainder.strip_suffix(&format!(".{EXTENSION}"))?;
    let date = remainder.get(..10)?;
    let rest = remainder.get(10..)?;
    let (seq, _id) = rest.strip_prefix('-')?.split_once('-')?;
    let seq = seq.parse().ok()?;
    Some((date.to_string(), seq, filename.to_string()))
}
