//! Types that represent the core data model, such as `Transaction` and `Category`.
mod amount;
mod category;
mod month;
mod tags;
mod transaction;

pub use amount::{money, Amount, AmountError};
pub(crate) use amount::{parse_decimal, PLACES};
pub use category::{allowed, Category, UnknownCategory, EXPENSE_CATEGORIES, INCOME_CATEGORIES};
pub use month::Month;
pub use tags::Tags;
pub use transaction::{Transaction, TransactionType, TransactionTypeError};
