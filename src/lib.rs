//! fintrack: a personal finance tracker that keeps income and expenses in a CSV ledger and
//! summarizes them over date ranges.

pub mod args;
mod backup;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod report;
mod store;
mod table;
mod utils;

#[cfg(test)]
mod test;

pub use backup::Backup;
pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use store::LedgerStore;
pub use table::{LoadReport, RejectedRow, HEADERS};
