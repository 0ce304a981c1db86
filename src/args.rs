//! These structs provide the CLI interface for the fintrack CLI.

use crate::model::TransactionType;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// fintrack: Record income and expenses in a CSV ledger and see where the money goes.
///
/// The ledger is a plain CSV file with the columns Date, Type, Category, Amount, Description and
/// Tags. It lives in the finance home directory along with a small config file and a directory of
/// backups. A backup of the ledger is taken before every change.
///
/// Start with `fintrack init`, then `fintrack add` transactions and look at them with `list`,
/// `summary` or `dashboard`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the finance home directory and its config file.
    ///
    /// By default the finance home is $HOME/finance. Pass --finance-home or set FINANCE_HOME to
    /// put it somewhere else.
    Init(InitArgs),
    /// Record an income or expense.
    Add(AddArgs),
    /// Delete the transaction at a position, as shown by `list`.
    Delete(DeleteArgs),
    /// List transactions, newest first, with their positions.
    List(RangeArgs),
    /// Show total income, expenses, net balance and savings rate, with the change from the
    /// previous period of the same length.
    Summary(RangeArgs),
    /// Show the totals per category for income or expenses.
    Breakdown(BreakdownArgs),
    /// Show income and expenses per calendar month.
    Monthly(RangeArgs),
    /// Show the totals per tag.
    Tags(RangeArgs),
    /// Show a few observations about savings and spending.
    Insights(RangeArgs),
    /// Show everything at once.
    Dashboard(RangeArgs),
    /// Write the transactions in a date range as CSV.
    Export(ExportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the ledger and configuration are held. Defaults to ~/finance
    #[arg(long, env = "FINANCE_HOME", default_value_t = default_finance_home())]
    finance_home: DisplayPath,

    /// How to print results: text or json.
    #[arg(long, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn finance_home(&self) -> &DisplayPath {
        &self.finance_home
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

serde_plain::derive_display_from_serialize!(OutputFormat);
serde_plain::derive_fromstr_from_deserialize!(OutputFormat);

/// (Not shown): Args for the `fintrack init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The name of the ledger file, relative to the finance home. Defaults to finance_data.csv
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// How many backups of the ledger to keep. 0 keeps all of them. Defaults to 10.
    #[arg(long)]
    backup_copies: Option<u32>,
}

impl InitArgs {
    pub fn data_file(&self) -> Option<&Path> {
        self.data_file.as_deref()
    }

    pub fn backup_copies(&self) -> Option<u32> {
        self.backup_copies
    }
}

/// (Not shown): Args for the `fintrack add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// Income or Expense.
    #[arg(long = "type")]
    transaction_type: TransactionType,

    /// The category, e.g. Salary or Groceries. Run `fintrack add --help` to see the list.
    ///
    /// Income: Salary, Freelance, Investment, Gift, Other.
    /// Expense: Groceries, Rent, Bills, Transport, Entertainment, Health, Shopping, Investment,
    /// Other.
    #[arg(long)]
    category: String,

    /// The amount, greater than zero, e.g. 85.50. Do not give expenses a minus sign.
    #[arg(long)]
    amount: String,

    /// The date in YYYY-MM-DD format. Defaults to today. Cannot be in the future.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// A free text note.
    #[arg(long, default_value = "")]
    description: String,

    /// Comma-separated tags, e.g. "food,weekly".
    #[arg(long, default_value = "")]
    tags: String,
}

impl AddArgs {
    pub fn new(
        transaction_type: TransactionType,
        category: impl Into<String>,
        amount: impl Into<String>,
        date: Option<NaiveDate>,
        description: impl Into<String>,
        tags: impl Into<String>,
    ) -> Self {
        Self {
            transaction_type,
            category: category.into(),
            amount: amount.into(),
            date,
            description: description.into(),
            tags: tags.into(),
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &str {
        &self.tags
    }
}

/// (Not shown): Args for the `fintrack delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The position of the transaction in the ledger, as shown by `fintrack list`.
    position: usize,
}

impl DeleteArgs {
    pub fn new(position: usize) -> Self {
        Self { position }
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

/// (Not shown): A date range for the reporting commands.
#[derive(Debug, Default, Parser, Clone)]
pub struct RangeArgs {
    /// The first day to include, YYYY-MM-DD. Defaults to the date of the earliest transaction.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// The last day to include, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    end: Option<NaiveDate>,
}

impl RangeArgs {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }
}

/// (Not shown): Args for the `fintrack breakdown` command.
#[derive(Debug, Parser, Clone)]
pub struct BreakdownArgs {
    /// Income or Expense.
    #[arg(long = "type", default_value_t = TransactionType::Expense)]
    transaction_type: TransactionType,

    #[clap(flatten)]
    range: RangeArgs,
}

impl BreakdownArgs {
    pub fn new(transaction_type: TransactionType, range: RangeArgs) -> Self {
        Self {
            transaction_type,
            range,
        }
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn range(&self) -> &RangeArgs {
        &self.range
    }
}

/// (Not shown): Args for the `fintrack export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    #[clap(flatten)]
    range: RangeArgs,

    /// Where to write the CSV. Printed to stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn new(range: RangeArgs, output: Option<PathBuf>) -> Self {
        Self { range, output }
    }

    pub fn range(&self) -> &RangeArgs {
        &self.range
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

fn default_finance_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("finance"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --finance-home or FINANCE_HOME instead of relying on the \
                default finance home directory. If you continue using the program right now, you \
                may have problems!",
            );
            PathBuf::from("finance")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["fintrack", "--finance-home", "/tmp/finance"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_parse_add() {
        let args = parse(&[
            "add",
            "--type",
            "expense",
            "--category",
            "Groceries",
            "--amount",
            "85.50",
            "--date",
            "2024-01-20",
            "--tags",
            "food,weekly",
        ]);
        let Command::Add(add) = args.command() else {
            panic!("expected add, got {:?}", args.command());
        };
        assert_eq!(add.transaction_type(), TransactionType::Expense);
        assert_eq!(add.category(), "Groceries");
        assert_eq!(add.amount(), "85.50");
        assert_eq!(add.date(), NaiveDate::from_ymd_opt(2024, 1, 20));
        assert_eq!(add.description(), "");
        assert_eq!(add.tags(), "food,weekly");
        assert_eq!(args.common().format(), OutputFormat::Text);
        assert_eq!(args.common().finance_home().path(), Path::new("/tmp/finance"));
    }

    #[test]
    fn test_parse_range_and_format() {
        let args = parse(&["--format", "json", "summary", "--start", "2024-01-01"]);
        assert_eq!(args.common().format(), OutputFormat::Json);
        let Command::Summary(range) = args.command() else {
            panic!("expected summary, got {:?}", args.command());
        };
        assert_eq!(range.start(), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(range.end(), None);
    }

    #[test]
    fn test_parse_breakdown_defaults_to_expenses() {
        let args = parse(&["breakdown"]);
        let Command::Breakdown(b) = args.command() else {
            panic!("expected breakdown, got {:?}", args.command());
        };
        assert_eq!(b.transaction_type(), TransactionType::Expense);
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        let full = [
            "fintrack",
            "add",
            "--type",
            "income",
            "--category",
            "Salary",
            "--amount",
            "1",
            "--date",
            "2024-13-40",
        ];
        assert!(Args::try_parse_from(full).is_err());
    }
}
