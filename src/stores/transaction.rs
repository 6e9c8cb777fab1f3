//! Defines the transaction store trait.

use crate::{
    Error,
    models::{DatabaseID, Transaction, TransactionBuilder, UserID},
};

/// Handles the creation and retrieval of transactions.
///
/// Every operation is scoped to the owning user: an ID that exists but belongs
/// to another user must behave exactly like an ID that does not exist.
pub trait TransactionStore {
    /// Create a new transaction owned by `user_id`.
    fn create(
        &mut self,
        user_id: UserID,
        builder: TransactionBuilder,
    ) -> Result<Transaction, Error>;

    /// Retrieve the transaction with `id` owned by `user_id`.
    ///
    /// Returns [Error::NotFound] if no such transaction exists or it is owned
    /// by another user.
    fn get(&self, id: DatabaseID, user_id: UserID) -> Result<Transaction, Error>;

    /// Retrieve all transactions owned by `user_id`, newest date first.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;

    /// Replace all user-editable fields of the transaction with `id` owned by
    /// `user_id` and refresh its update timestamp.
    ///
    /// Returns [Error::NotFound] if no such transaction exists or it is owned
    /// by another user.
    fn update(
        &mut self,
        id: DatabaseID,
        user_id: UserID,
        builder: TransactionBuilder,
    ) -> Result<Transaction, Error>;

    /// Delete the transaction with `id` owned by `user_id`.
    ///
    /// Returns [Error::NotFound] if no such transaction exists or it is owned
    /// by another user.
    fn delete(&mut self, id: DatabaseID, user_id: UserID) -> Result<(), Error>;
}
