use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// A calendar month bucket, e.g. `2024-01`. Orders chronologically.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl From<NaiveDate> for Month {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for Month {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[test]
fn test_month_order_and_display() {
    let dec = Month::from(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    let jan = Month::from(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert!(dec < jan);
    assert_eq!(dec.to_string(), "2023-12");
    assert_eq!(jan.to_string(), "2024-01");
}
