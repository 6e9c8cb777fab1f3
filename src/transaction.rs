//! The route handlers for creating, retrieving, updating and deleting
//! transactions, plus the summary statistics computed over them.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    app_state::TransactionState,
    models::{DatabaseID, Transaction, TransactionBuilder, TransactionKind, UserID},
    stores::TransactionStore,
};

/// The request body for creating or updating a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionForm {
    /// The amount of money spent or earned, must be non-negative.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The category the transaction belongs to.
    pub category: String,
    /// An optional free-form note, defaults to an empty string.
    #[serde(default)]
    pub note: String,
    /// When the transaction occurred, defaults to today if omitted.
    #[serde(default)]
    pub date: Option<Date>,
}

impl TransactionForm {
    fn into_builder(self) -> Result<TransactionBuilder, Error> {
        let mut builder = TransactionBuilder::new(self.amount, self.kind, &self.category)?;
        builder = builder.note(&self.note);

        if let Some(date) = self.date {
            builder = builder.date(date);
        }

        Ok(builder)
    }
}

/// A route handler for listing the signed-in user's transactions,
/// newest first.
pub async fn get_transactions_endpoint<T>(
    State(state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Transaction>>, Error>
where
    T: TransactionStore + Clone + Send + Sync,
{
    state.transaction_store.get_by_user(user_id).map(Json)
}

/// A route handler for getting a transaction by its database ID.
///
/// This function will return the status code 404 if the requested resource
/// does not exist or belongs to another user.
pub async fn get_transaction_endpoint<T>(
    State(state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<Json<Transaction>, Error>
where
    T: TransactionStore + Clone + Send + Sync,
{
    state.transaction_store.get(transaction_id, user_id).map(Json)
}

/// A route handler for creating a new transaction.
pub async fn create_transaction_endpoint<T>(
    State(state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
    Json(form): Json<TransactionForm>,
) -> Result<(StatusCode, Json<Transaction>), Error>
where
    T: TransactionStore + Clone + Send + Sync,
{
    let builder = form.into_builder()?;

    let mut store = state.transaction_store;
    let transaction = store.create(user_id, builder)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// A route handler for replacing a transaction's details.
///
/// This function will return the status code 404 if the requested resource
/// does not exist or belongs to another user.
pub async fn update_transaction_endpoint<T>(
    State(state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<DatabaseID>,
    Json(form): Json<TransactionForm>,
) -> Result<Json<Transaction>, Error>
where
    T: TransactionStore + Clone + Send + Sync,
{
    let builder = form.into_builder()?;

    let mut store = state.transaction_store;
    let transaction = store.update(transaction_id, user_id, builder)?;

    Ok(Json(transaction))
}

/// A route handler for deleting a transaction.
///
/// This function will return the status code 404 if the requested resource
/// does not exist or belongs to another user.
pub async fn delete_transaction_endpoint<T>(
    State(state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<Json<serde_json::Value>, Error>
where
    T: TransactionStore + Clone + Send + Sync,
{
    let mut store = state.transaction_store;
    store.delete(transaction_id, user_id)?;

    Ok(Json(json!({ "message": "Transaction deleted" })))
}

/// A route handler for computing summary statistics over the signed-in
/// user's transactions.
pub async fn get_summary_endpoint<T>(
    State(state): State<TransactionState<T>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Summary>, Error>
where
    T: TransactionStore + Clone + Send + Sync,
{
    let transactions = state.transaction_store.get_by_user(user_id)?;
    let today = OffsetDateTime::now_utc().date();

    Ok(Json(summarize(&transactions, today)))
}

/// Summary statistics over all of a user's transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Total income minus total expenses across all transactions.
    pub total_balance: f64,
    /// The sum of all income transactions.
    pub total_income: f64,
    /// The sum of all expense transactions.
    pub total_expense: f64,
    /// The same statistics restricted to the current calendar month.
    pub current_month: MonthSummary,
}

/// Summary statistics restricted to a single calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    /// A human readable label for the month, e.g. "August 2026".
    pub month: String,
    /// The sum of the month's income transactions.
    pub income: f64,
    /// The sum of the month's expense transactions.
    pub expense: f64,
    /// The month's income minus the month's expenses.
    pub balance: f64,
}

/// Compute summary statistics over `transactions` in a single pass.
///
/// The current month window contains the transactions whose date falls in
/// the same calendar month (UTC) as `today`.
pub fn summarize(transactions: &[Transaction], today: Date) -> Summary {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut month_income = 0.0;
    let mut month_expense = 0.0;

    for transaction in transactions {
        let in_current_month = transaction.date.year() == today.year()
            && transaction.date.month() == today.month();

        match transaction.kind {
            TransactionKind::Income => {
                total_income += transaction.amount;

                if in_current_month {
                    month_income += transaction.amount;
                }
            }
            TransactionKind::Expense => {
                total_expense += transaction.amount;

                if in_current_month {
                    month_expense += transaction.amount;
                }
            }
        }
    }

    Summary {
        total_balance: total_income - total_expense,
        total_income,
        total_expense,
        current_month: MonthSummary {
            month: format!("{} {}", today.month(), today.year()),
            income: month_income,
            expense: month_expense,
            balance: month_income - month_expense,
        },
    }
}
