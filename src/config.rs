//! Configuration file handling.
//!
//! The configuration file is stored at `$FINANCE_HOME/config.json` and names the ledger file and
//! how many backup copies of it to keep.

use crate::backup::Backup;
use crate::error::Res;
use crate::utils;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "fintrack";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 10;
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";
const DATA_FILE: &str = "finance_data.csv";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$FINANCE_HOME` and from there it loads `$FINANCE_HOME/config.json`. It provides
/// the paths of the ledger file and the backups directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    data_path: PathBuf,
}

impl Config {
    /// Creates the data directory, its backups subdirectory and an initial `config.json`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the data directory, e.g. `$HOME/finance`
    /// - `data_file` - The ledger file name, relative to `dir` unless absolute. Defaults to
    ///   `finance_data.csv`.
    /// - `backup_copies` - How many backups to keep. `0` keeps every backup. Defaults to 10.
    ///
    /// # Errors
    /// - Returns an error if the directory already holds a `config.json`.
    /// - Returns an error if any file operations fail.
    pub async fn create(
        dir: impl Into<PathBuf>,
        data_file: Option<PathBuf>,
        backup_copies: Option<u32>,
    ) -> Res<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the finance home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "The finance home is already initialized, found '{}'",
                config_path.display()
            )
        }

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;

        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            data_file: data_file.unwrap_or_else(|| PathBuf::from(DATA_FILE)),
            backup_copies: backup_copies.unwrap_or(BACKUP_COPIES),
        };
        config_file.save(&config_path).await?;

        let data_path = resolve(&root, &config_file.data_file);
        Ok(Self {
            root,
            backups,
            config_path,
            config_file,
            data_path,
        })
    }

    /// This will
    /// - validate that the `finance_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the backups directory exists
    /// - return the loaded configuration object
    pub async fn load(finance_home: impl Into<PathBuf>) -> Res<Self> {
        let maybe_relative = finance_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The finance home directory is missing, run 'fintrack init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'fintrack init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            root: root.clone(),
            backups: root.join(BACKUPS),
            data_path: resolve(&root, &config_file.data_file),
            config_path,
            config_file,
        };
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    /// The path of the ledger file.
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }
}

/// Returns `p` if it is absolute, otherwise joins it onto `root`.
fn resolve(root: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        return p.to_path_buf();
    }
    root.join(p)
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "fintrack",
///   "config_version": 1,
///   "data_file": "finance_data.csv",
///   "backup_copies": 10
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "fintrack"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Path to the ledger file, relative to the finance home or absolute
    #[serde(default = "default_data_file")]
    data_file: PathBuf,

    /// Number of backup copies to keep, 0 keeps them all
    #[serde(default = "default_backup_copies")]
    backup_copies: u32,
}

fn default_data_file() -> PathBuf {
    PathBuf::from(DATA_FILE)
}

fn default_backup_copies() -> u32 {
    BACKUP_COPIES
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            data_file: default_data_file(),
            backup_copies: BACKUP_COPIES,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if `app_name` is wrong.
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
