//! This file defines the type `Transaction`, the core type of the application.

use std::fmt::Display;

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    models::{DatabaseID, UserID},
};

/// Whether a transaction brings money in or takes money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money earned, e.g. a salary payment.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionKind {
    /// The lowercase string used on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("{other} is not a valid transaction kind").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Every transaction belongs to exactly one user and is only ever visible or
/// mutable by that user.
///
/// To describe a transaction that is not yet in the database, use
/// [TransactionBuilder]. The stores assign `id`, `created_at` and `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseID,
    /// The ID of the user that owns this transaction.
    pub user_id: UserID,
    /// The amount of money spent or earned, always non-negative.
    pub amount: f64,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// A label describing what kind of income/expense this was.
    pub category: String,
    /// Free-form text attached by the user.
    pub note: String,
    /// When the transaction happened (UTC calendar date).
    pub date: Date,
    /// When the record was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the record was last modified.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A validated description of a transaction that is not yet in the database.
///
/// The finalizing functions are on the stores, e.g.
/// [TransactionStore::create](crate::stores::TransactionStore::create).
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    pub(crate) amount: f64,
    pub(crate) kind: TransactionKind,
    pub(crate) category: String,
    pub(crate) note: String,
    pub(crate) date: Date,
}

impl TransactionBuilder {
    /// Create a builder with the required fields.
    ///
    /// The note defaults to an empty string and the date defaults to the
    /// current UTC date.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidAmount] if `amount` is negative or not finite,
    /// - or [Error::EmptyCategory] if `category` is empty after trimming.
    pub fn new(amount: f64, kind: TransactionKind, category: &str) -> Result<Self, Error> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount);
        }

        let category = category.trim();
        if category.is_empty() {
            return Err(Error::EmptyCategory);
        }

        Ok(Self {
            amount,
            kind,
            category: category.to_owned(),
            note: String::new(),
            date: OffsetDateTime::now_utc().date(),
        })
    }

    /// Set the note for the transaction. Leading and trailing whitespace is trimmed.
    pub fn note(mut self, note: &str) -> Self {
        self.note = note.trim().to_owned();
        self
    }

    /// Set the date for the transaction.
    pub fn date(mut self, date: Date) -> Self {
        self.date = date;
        self
    }
}

#[cfg(test)]
mod transaction_kind_tests {
    use crate::models::TransactionKind;

    #[test]
    fn serializes_as_lowercase_string() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::Income).unwrap(),
            r#""income""#
        );
        assert_eq!(
            serde_json::to_string(&TransactionKind::Expense).unwrap(),
            r#""expense""#
        );
    }

    #[test]
    fn deserializes_from_lowercase_string() {
        let kind: TransactionKind = serde_json::from_str(r#""expense""#).unwrap();

        assert_eq!(kind, TransactionKind::Expense);
    }

    #[test]
    fn rejects_unknown_kind() {
        let result = serde_json::from_str::<TransactionKind>(r#""transfer""#);

        assert!(result.is_err());
    }
}

#[cfg(test)]
mod transaction_builder_tests {
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error,
        models::{TransactionBuilder, TransactionKind},
    };

    #[test]
    fn new_fails_on_negative_amount() {
        let result = TransactionBuilder::new(-1.0, TransactionKind::Expense, "Food");

        assert_eq!(result, Err(Error::InvalidAmount));
    }

    #[test]
    fn new_fails_on_non_finite_amount() {
        for amount in [f64::NAN, f64::INFINITY] {
            let result = TransactionBuilder::new(amount, TransactionKind::Income, "Salary");

            assert_eq!(result, Err(Error::InvalidAmount));
        }
    }

    #[test]
    fn new_fails_on_blank_category() {
        let result = TransactionBuilder::new(1.0, TransactionKind::Expense, "   ");

        assert_eq!(result, Err(Error::EmptyCategory));
    }

    #[test]
    fn new_defaults_date_to_today_and_note_to_empty() {
        let builder = TransactionBuilder::new(1.0, TransactionKind::Expense, "Food").unwrap();

        assert_eq!(builder.date, OffsetDateTime::now_utc().date());
        assert_eq!(builder.note, "");
    }

    #[test]
    fn builder_sets_optional_fields() {
        let yesterday = OffsetDateTime::now_utc().date() - Duration::days(1);

        let builder = TransactionBuilder::new(1.0, TransactionKind::Expense, " Food ")
            .unwrap()
            .note("  lunch  ")
            .date(yesterday);

        assert_eq!(builder.category, "Food");
        assert_eq!(builder.note, "lunch");
        assert_eq!(builder.date, yesterday);
    }
}
