use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;
use tracing::debug;

/// Creates the data directory, its backups subdirectory and an initial `config.json`.
///
/// # Arguments
/// - `finance_home` - The directory that will be the root of the data directory, e.g.
///   `$HOME/finance`
/// - `data_file` - The ledger file name. Defaults to `finance_data.csv`.
/// - `backup_copies` - How many backups to keep. Defaults to 10.
///
/// # Errors
/// - Returns a `Config` error if the directory is already initialized or any file operation
///   fails.
pub async fn init(
    finance_home: &Path,
    data_file: Option<&Path>,
    backup_copies: Option<u32>,
) -> Result<Out<()>> {
    let config = Config::create(finance_home, data_file.map(Path::to_path_buf), backup_copies)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    debug!("Created {}", config.config_path().display());
    Ok(format!(
        "Successfully created the finance home at {}. Transactions will be stored in {}",
        config.root().display(),
        config.data_path().display()
    )
    .into())
}
