use crate::model::{Amount, Category, Month, Tags};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);

impl TransactionType {
    /// Applies the sign for this type to a magnitude: positive for income, negative for expenses.
    pub fn signed(&self, magnitude: Decimal) -> Decimal {
        match self {
            TransactionType::Income => magnitude,
            TransactionType::Expense => -magnitude,
        }
    }

    /// The type implied by the sign of a stored amount. Zero has no type.
    pub fn from_sign(value: Decimal) -> Option<Self> {
        if value.is_zero() {
            None
        } else if value.is_sign_negative() {
            Some(TransactionType::Expense)
        } else {
            Some(TransactionType::Income)
        }
    }
}

impl FromStr for TransactionType {
    type Err = TransactionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(TransactionTypeError(s.to_string())),
        }
    }
}

/// Returned when a string is neither `Income` nor `Expense`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TransactionTypeError(String);

impl Display for TransactionTypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' is not a transaction type, expected 'Income' or 'Expense'",
            self.0
        )
    }
}

impl std::error::Error for TransactionTypeError {}

/// Represents a single row of the ledger.
///
/// The stored amount is a magnitude. The signed value seen in the ledger file comes from
/// [`Transaction::signed_amount`], so a row can never disagree with its own type.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    date: NaiveDate,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    category: Category,
    amount: Amount,
    description: String,
    tags: Tags,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        transaction_type: TransactionType,
        category: Category,
        amount: Amount,
        description: impl Into<String>,
        tags: Tags,
    ) -> Self {
        Self {
            date,
            transaction_type,
            category,
            amount,
            description: description.into(),
            tags,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    /// The absolute amount of the transaction.
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// The amount with its sign: positive for income, negative for expenses.
    pub fn signed_amount(&self) -> Decimal {
        self.transaction_type.signed(self.amount.value())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// The calendar month the transaction falls in.
    pub fn month(&self) -> Month {
        Month::from(self.date)
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }
}
