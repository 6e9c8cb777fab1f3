/*! This module defines and implements the data structures, response handlers
and middleware for registering and authenticating a user with bearer tokens. */

mod middleware;
mod token;

pub use middleware::auth_guard;
pub use token::{Claims, DEFAULT_TOKEN_DURATION, decode_token, encode_token};

use std::str::FromStr;

use axum::{Json, extract::State, http::StatusCode};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    app_state::AuthState,
    models::{PasswordHash, UserProfile},
    stores::UserStore,
};

/// The form data for registering a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    /// The display name for the new user.
    pub name: String,
    /// The email address for the new user, must not be in use.
    pub email: String,
    /// The plain-text password, checked for strength before hashing.
    pub password: String,
}

/// The form data for logging in an existing user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Email entered during log-in.
    pub email: EmailAddress,
    /// Password entered during log-in.
    pub password: String,
}

/// The response for a successful registration or log-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The bearer token to send with subsequent requests.
    pub token: String,
    /// The profile of the authenticated user.
    pub user: UserProfile,
}

/// Handler for registration requests. Creates the user and signs them in.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The display name is empty.
/// - The email is malformed or already in use.
/// - The password is too weak.
/// - An internal error occurred while hashing the password or signing the token.
pub async fn register_user<U>(
    State(state): State<AuthState<U>>,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, Json<AuthResponse>), Error>
where
    U: UserStore + Clone + Send + Sync,
{
    let name = form.name.trim();
    if name.is_empty() {
        return Err(Error::EmptyName);
    }

    let email =
        EmailAddress::from_str(&form.email).map_err(|_| Error::InvalidEmail(form.email.clone()))?;
    let password_hash = PasswordHash::from_raw_password(&form.password, PasswordHash::DEFAULT_COST)?;

    let mut user_store = state.user_store;
    let user = user_store.create(name.to_owned(), email, password_hash)?;

    let token = encode_token(user.id(), &state.encoding_key, DEFAULT_TOKEN_DURATION)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.profile(),
        }),
    ))
}

/// Handler for log-in requests.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password.
pub async fn log_in<U>(
    State(state): State<AuthState<U>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<AuthResponse>, Error>
where
    U: UserStore + Clone + Send + Sync,
{
    let user = state
        .user_store
        .get_by_email(&credentials.email)
        .map_err(|error| match error {
            // The client must not learn whether the email or the password was wrong.
            Error::NotFound => Error::InvalidCredentials,
            error => error,
        })?;

    let password_is_correct = user
        .password_hash()
        .verify(&credentials.password)
        .map_err(|error| {
            tracing::error!("Error verifying password: {}", error);
            Error::HashingError(error.to_string())
        })?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let token = encode_token(user.id(), &state.encoding_key, DEFAULT_TOKEN_DURATION)?;

    Ok(Json(AuthResponse {
        token,
        user: user.profile(),
    }))
}
