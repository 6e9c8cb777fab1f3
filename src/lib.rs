//! Pocketledger is a personal finance tracker.
//!
//! This library provides a JSON REST API for managing income and expense
//! transactions, an auth layer that resolves bearer tokens to user IDs, and a
//! typed HTTP client for driving the API from a dashboard.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod client;
mod db;
pub mod endpoints;
mod models;
mod routing;
pub mod stores;
mod transaction;

pub use app_state::{AppState, AuthState, JwtKeys, TokenState, TransactionState};
pub use auth::{AuthResponse, Credentials, RegisterForm, auth_guard, log_in, register_user};
pub use client::{
    ApiClient, ClientError, DraftError, Overview, TransactionDraft, category_options,
};
pub use db::initialize as initialize_db;
pub use endpoints::format_endpoint;
pub use models::{
    DatabaseID, PasswordHash, Transaction, TransactionBuilder, TransactionKind, User, UserID,
    UserProfile, ValidatedPassword,
};
pub use routing::build_router;
pub use transaction::{MonthSummary, Summary, TransactionForm};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid email and password combination.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The bearer token is missing from the request, could not be decoded, or
    /// has expired.
    #[error("the bearer token is missing or invalid")]
    Unauthorized,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A bearer token could not be created for a new session.
    #[error("could not create bearer token: {0}")]
    TokenCreation(String),

    /// The email used to register is already taken by another user.
    #[error("the email is already in use")]
    DuplicateEmail,

    /// The string used to register could not be parsed as an email address.
    #[error("{0} is not a valid email address")]
    InvalidEmail(String),

    /// An empty string was used for the user's display name.
    #[error("name must not be empty")]
    EmptyName,

    /// A transaction amount was negative or not a finite number.
    #[error("amount must be a non-negative number")]
    InvalidAmount,

    /// An empty string was used for a transaction category.
    #[error("category must not be empty")]
    EmptyCategory,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created. A
    /// resource owned by another user produces this same error.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::NotFound => (StatusCode::NOT_FOUND, "Transaction not found".to_owned()),
            Error::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            Error::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            Error::TooWeak(_)
            | Error::DuplicateEmail
            | Error::InvalidEmail(_)
            | Error::EmptyName
            | Error::InvalidAmount
            | Error::EmptyCategory => (StatusCode::BAD_REQUEST, self.to_string()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_owned())
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
