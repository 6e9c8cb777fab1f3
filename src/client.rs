//! A typed HTTP client for the REST API plus the form state used when
//! composing a new transaction.

use axum::http::StatusCode;
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    auth::{AuthResponse, Credentials, RegisterForm},
    models::{DatabaseID, Transaction, TransactionKind},
    transaction::{Summary, TransactionForm},
};

/// The categories offered when recording an income.
pub const INCOME_CATEGORIES: [&str; 5] =
    ["Salary", "Freelance", "Investment", "Gift", "Other Income"];

/// The categories offered when recording an expense.
pub const EXPENSE_CATEGORIES: [&str; 7] = [
    "Food",
    "Transport",
    "Shopping",
    "Bills",
    "Entertainment",
    "Health",
    "Other Expense",
];

/// The categories offered for transactions of `kind`.
pub fn category_options(kind: TransactionKind) -> &'static [&'static str] {
    match kind {
        TransactionKind::Income => &INCOME_CATEGORIES,
        TransactionKind::Expense => &EXPENSE_CATEGORIES,
    }
}

/// The errors the API client can produce.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server responded with an error status and a message.
    #[error("the server responded with {status}: {message}")]
    Api {
        /// The HTTP status code of the response.
        status: StatusCode,
        /// The message taken from the response body.
        message: String,
    },
    /// The request could not be sent or the response could not be read.
    #[error("the request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// Whether the error means the stored token is no longer valid and the
    /// user should be signed out.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ClientError::Api {
                status: StatusCode::UNAUTHORIZED,
                ..
            }
        )
    }
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

/// The transactions and summary shown together on the overview screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    /// The user's transactions, newest first.
    pub transactions: Vec<Transaction>,
    /// Summary statistics over the user's transactions.
    pub summary: Summary,
}

/// A typed client for the REST API.
///
/// Holds the bearer token once the user has registered or logged in and
/// attaches it to every subsequent request.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the API at `base_url`, e.g. `http://localhost:5001`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: None,
            http: reqwest::Client::new(),
        }
    }

    /// Create a client that already holds a bearer token, e.g. one restored
    /// from persistent storage.
    pub fn with_token(base_url: &str, token: &str) -> Self {
        let mut client = Self::new(base_url);
        client.token = Some(token.to_owned());
        client
    }

    /// Replace the stored bearer token, or clear it to sign out.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Send `request`, attaching the bearer token if one is stored, and map
    /// error statuses to [ClientError::Api].
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ApiMessage>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| status.to_string());

        Err(ClientError::Api { status, message })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register a new user account and store the returned bearer token.
    pub async fn register(&mut self, form: &RegisterForm) -> Result<AuthResponse, ClientError> {
        let response = self
            .send(self.http.post(self.url(crate::endpoints::REGISTER)).json(form))
            .await?
            .json::<AuthResponse>()
            .await?;

        self.token = Some(response.token.clone());

        Ok(response)
    }

    /// Log in an existing user and store the returned bearer token.
    pub async fn log_in(&mut self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        let response = self
            .send(self.http.post(self.url(crate::endpoints::LOG_IN)).json(credentials))
            .await?
            .json::<AuthResponse>()
            .await?;

        self.token = Some(response.token.clone());

        Ok(response)
    }

    /// Fetch the signed-in user's transactions, newest first.
    pub async fn transactions(&self) -> Result<Vec<Transaction>, ClientError> {
        Ok(self
            .send(self.http.get(self.url(crate::endpoints::TRANSACTIONS)))
            .await?
            .json()
            .await?)
    }

    /// Fetch a single transaction by its ID.
    pub async fn transaction(&self, id: DatabaseID) -> Result<Transaction, ClientError> {
        let path = crate::endpoints::format_endpoint(crate::endpoints::TRANSACTION, id);

        Ok(self.send(self.http.get(self.url(&path))).await?.json().await?)
    }

    /// Create a new transaction.
    pub async fn create_transaction(
        &self,
        form: &TransactionForm,
    ) -> Result<Transaction, ClientError> {
        Ok(self
            .send(
                self.http
                    .post(self.url(crate::endpoints::TRANSACTIONS))
                    .json(form),
            )
            .await?
            .json()
            .await?)
    }

    /// Replace a transaction's details.
    pub async fn update_transaction(
        &self,
        id: DatabaseID,
        form: &TransactionForm,
    ) -> Result<Transaction, ClientError> {
        let path = crate::endpoints::format_endpoint(crate::endpoints::TRANSACTION, id);

        Ok(self
            .send(self.http.put(self.url(&path)).json(form))
            .await?
            .json()
            .await?)
    }

    /// Delete a transaction.
    pub async fn delete_transaction(&self, id: DatabaseID) -> Result<(), ClientError> {
        let path = crate::endpoints::format_endpoint(crate::endpoints::TRANSACTION, id);

        self.send(self.http.delete(self.url(&path))).await?;

        Ok(())
    }

    /// Fetch summary statistics over the signed-in user's transactions.
    pub async fn summary(&self) -> Result<Summary, ClientError> {
        Ok(self
            .send(self.http.get(self.url(crate::endpoints::SUMMARY)))
            .await?
            .json()
            .await?)
    }

    /// Fetch the transactions and the summary concurrently for the overview
    /// screen.
    pub async fn fetch_overview(&self) -> Result<Overview, ClientError> {
        let (transactions, summary) = tokio::join!(self.transactions(), self.summary());

        Ok(Overview {
            transactions: transactions?,
            summary: summary?,
        })
    }
}

/// The errors reported while validating a [TransactionDraft].
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DraftError {
    /// The amount field was empty or not a number.
    #[error("the amount must be a number")]
    AmountNotANumber,
    /// The amount was negative, NaN or infinite.
    #[error("the amount must be zero or more")]
    AmountOutOfRange,
    /// No category was chosen.
    #[error("a category must be selected")]
    MissingCategory,
}

/// The in-progress state of the new transaction form.
///
/// The amount is kept as the raw text the user typed so that invalid input
/// can be shown back to them. [TransactionDraft::validate] converts the draft
/// into a request body.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// The raw text in the amount field.
    pub amount: String,
    /// The selected transaction kind.
    pub kind: TransactionKind,
    /// The selected category, empty until the user picks one.
    pub category: String,
    /// The free-form note field.
    pub note: String,
    /// The selected date.
    pub date: Date,
}

impl Default for TransactionDraft {
    fn default() -> Self {
        Self {
            amount: String::new(),
            kind: TransactionKind::Expense,
            category: String::new(),
            note: String::new(),
            date: OffsetDateTime::now_utc().date(),
        }
    }
}

impl TransactionDraft {
    /// Validate the draft and convert it into a request body.
    ///
    /// # Errors
    /// This function will return a [DraftError] describing the first invalid
    /// field.
    pub fn validate(&self) -> Result<TransactionForm, DraftError> {
        let amount = self
            .amount
            .trim()
            .parse::<f64>()
            .map_err(|_| DraftError::AmountNotANumber)?;

        if !amount.is_finite() || amount < 0.0 {
            return Err(DraftError::AmountOutOfRange);
        }

        if self.category.trim().is_empty() {
            return Err(DraftError::MissingCategory);
        }

        Ok(TransactionForm {
            amount,
            kind: self.kind,
            category: self.category.trim().to_owned(),
            note: self.note.trim().to_owned(),
            date: Some(self.date),
        })
    }
}

#[cfg(test)]
mod draft_tests {
    use time::OffsetDateTime;

    use crate::models::TransactionKind;

    use super::{DraftError, TransactionDraft, category_options};

    #[test]
    fn default_draft_is_an_expense_dated_today() {
        let draft = TransactionDraft::default();

        assert_eq!(draft.kind, TransactionKind::Expense);
        assert_eq!(draft.date, OffsetDateTime::now_utc().date());
        assert!(draft.amount.is_empty());
    }

    #[test]
    fn validate_accepts_a_complete_draft() {
        let draft = TransactionDraft {
            amount: " 12.50 ".to_owned(),
            category: "Food".to_owned(),
            note: " lunch ".to_owned(),
            ..Default::default()
        };

        let form = draft.validate().unwrap();

        assert_eq!(form.amount, 12.5);
        assert_eq!(form.category, "Food");
        assert_eq!(form.note, "lunch");
        assert_eq!(form.date, Some(draft.date));
    }

    #[test]
    fn validate_rejects_non_numeric_amount() {
        let draft = TransactionDraft {
            amount: "twelve".to_owned(),
            category: "Food".to_owned(),
            ..Default::default()
        };

        assert_eq!(draft.validate(), Err(DraftError::AmountNotANumber));
    }

    #[test]
    fn validate_rejects_negative_amount() {
        let draft = TransactionDraft {
            amount: "-5".to_owned(),
            category: "Food".to_owned(),
            ..Default::default()
        };

        assert_eq!(draft.validate(), Err(DraftError::AmountOutOfRange));
    }

    #[test]
    fn validate_rejects_missing_category() {
        let draft = TransactionDraft {
            amount: "5".to_owned(),
            ..Default::default()
        };

        assert_eq!(draft.validate(), Err(DraftError::MissingCategory));
    }

    #[test]
    fn category_options_differ_by_kind() {
        assert_eq!(
            category_options(TransactionKind::Income),
            ["Salary", "Freelance", "Investment", "Gift", "Other Income"]
        );
        assert_eq!(
            category_options(TransactionKind::Expense),
            [
                "Food",
                "Transport",
                "Shopping",
                "Bills",
                "Entertainment",
                "Health",
                "Other Expense"
            ]
        );
    }
}
