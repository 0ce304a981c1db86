use crate::model::TransactionType;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The categories that may be chosen when recording income.
pub const INCOME_CATEGORIES: &[&str] = &["Salary", "Freelance", "Investment", "Gift", "Other"];

/// The categories that may be chosen when recording an expense.
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Groceries",
    "Rent",
    "Bills",
    "Transport",
    "Entertainment",
    "Health",
    "Shopping",
    "Investment",
    "Other",
];

/// The category of a transaction, e.g. `Groceries`.
///
/// Categories are checked against the list for the transaction's type only when a transaction is
/// entered. Rows read back from the ledger file keep whatever category string they carry.
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Wraps a category string without checking it against the allowed lists.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    /// Looks `name` up, case-insensitively, in the allowed list for `transaction_type` and returns
    /// the canonical spelling.
    pub fn for_entry(
        transaction_type: TransactionType,
        name: &str,
    ) -> Result<Self, UnknownCategory> {
        let wanted = name.trim();
        allowed(transaction_type)
            .iter()
            .find(|c| c.eq_ignore_ascii_case(wanted))
            .map(|c| Self((*c).to_string()))
            .ok_or_else(|| UnknownCategory {
                transaction_type,
                name: wanted.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns the allowed categories for `transaction_type`.
pub fn allowed(transaction_type: TransactionType) -> &'static [&'static str] {
    match transaction_type {
        TransactionType::Income => INCOME_CATEGORIES,
        TransactionType::Expense => EXPENSE_CATEGORIES,
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Returned when a category is not in the allowed list for its transaction type.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnknownCategory {
    transaction_type: TransactionType,
    name: String,
}

impl Display for UnknownCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' is not a valid {} category, expected one of: {}",
            self.name,
            self.transaction_type,
            allowed(self.transaction_type).join(", ")
        )
    }
}

impl std::error::Error for UnknownCategory {}
