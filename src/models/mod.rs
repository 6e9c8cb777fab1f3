//! This module defines the domain data types.

pub use password::{PasswordHash, ValidatedPassword};
pub use transaction::{Transaction, TransactionBuilder, TransactionKind};
pub use user::{User, UserID, UserProfile};

mod password;
mod transaction;
mod user;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
