//! Implements the structs that hold the state of the REST server.

use axum::extract::FromRef;
use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::stores::{TransactionStore, UserStore};

/// The keys used to sign and verify bearer tokens.
#[derive(Clone)]
pub struct JwtKeys {
    /// The key for signing new tokens.
    pub encoding: EncodingKey,
    /// The key for verifying presented tokens.
    pub decoding: DecodingKey,
}

impl JwtKeys {
    /// Derive the signing and verification keys from a shared `secret`.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_ref()),
            decoding: DecodingKey::from_secret(secret.as_ref()),
        }
    }
}

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState<T, U>
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    /// The keys used to sign and verify bearer tokens.
    pub jwt_keys: JwtKeys,
    /// The store for managing user [transactions](crate::models::Transaction).
    pub transaction_store: T,
    /// The store for managing [users](crate::models::User).
    pub user_store: U,
}

impl<T, U> AppState<T, U>
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    /// Create a new [AppState].
    pub fn new(token_secret: &str, transaction_store: T, user_store: U) -> Self {
        Self {
            jwt_keys: JwtKeys::from_secret(token_secret),
            transaction_store,
            user_store,
        }
    }
}

/// The state needed for the auth middleware.
#[derive(Clone)]
pub struct TokenState {
    /// The key for verifying presented tokens.
    pub decoding_key: DecodingKey,
}

impl<T, U> FromRef<AppState<T, U>> for TokenState
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<T, U>) -> Self {
        Self {
            decoding_key: state.jwt_keys.decoding.clone(),
        }
    }
}

/// The state needed to register or log in a user.
#[derive(Clone)]
pub struct AuthState<U>
where
    U: UserStore + Clone + Send + Sync,
{
    /// The store for managing [users](crate::models::User).
    pub user_store: U,
    /// The key for signing new tokens.
    pub encoding_key: EncodingKey,
}

impl<T, U> FromRef<AppState<T, U>> for AuthState<U>
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<T, U>) -> Self {
        Self {
            user_store: state.user_store.clone(),
            encoding_key: state.jwt_keys.encoding.clone(),
        }
    }
}

/// The state needed to get or modify a transaction.
#[derive(Clone)]
pub struct TransactionState<T>
where
    T: TransactionStore + Clone + Send + Sync,
{
    /// The store for managing user [transactions](crate::models::Transaction).
    pub transaction_store: T,
}

impl<T, U> FromRef<AppState<T, U>> for TransactionState<T>
where
    T: TransactionStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<T, U>) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}
