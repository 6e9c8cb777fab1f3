//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Transaction, TransactionBuilder, UserID},
    stores::TransactionStore,
};

const TRANSACTION_COLUMNS: &str =
    "id, user_id, amount, kind, category, note, date, created_at, updated_at";

/// Stores transactions in a SQLite database.
///
/// Note that because a transaction depends on the [User](crate::models::User)
/// model, the user table must be set up in the database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn create(
        &mut self,
        user_id: UserID,
        builder: TransactionBuilder,
    ) -> Result<Transaction, Error> {
        let now = OffsetDateTime::now_utc();

        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "INSERT INTO \"transaction\" (user_id, amount, kind, category, note, date, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                (
                    user_id.as_i64(),
                    builder.amount,
                    builder.kind,
                    &builder.category,
                    &builder.note,
                    builder.date,
                    now,
                ),
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Retrieve a transaction in the database by its `id`, scoped to `user_id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID, user_id: UserID) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id AND user_id = :user_id"
            ))?
            .query_row(
                &[(":id", &id), (":user_id", &user_id.as_i64())],
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Retrieve the transactions in the database owned by `user_id`, newest
    /// date first.
    ///
    /// An empty vector is returned if the specified user has no transactions.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                // The ID breaks ties between transactions on the same date.
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
                 WHERE user_id = :user_id
                 ORDER BY date DESC, id DESC"
            ))?
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    /// Replace the user-editable fields of a transaction and refresh its
    /// update timestamp.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(
        &mut self,
        id: DatabaseID,
        user_id: UserID,
        builder: TransactionBuilder,
    ) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "UPDATE \"transaction\"
                 SET amount = ?1, kind = ?2, category = ?3, note = ?4, date = ?5, updated_at = ?6
                 WHERE id = ?7 AND user_id = ?8
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                (
                    builder.amount,
                    builder.kind,
                    &builder.category,
                    &builder.note,
                    builder.date,
                    OffsetDateTime::now_utc(),
                    id,
                    user_id.as_i64(),
                ),
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Delete a transaction in the database by its `id`, scoped to `user_id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID, user_id: UserID) -> Result<(), Error> {
        let rows_deleted = self.connection.lock().unwrap().execute(
            "DELETE FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
            &[(":id", &id), (":user_id", &user_id.as_i64())],
        )?;

        if rows_deleted == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    amount REAL NOT NULL,
                    kind TEXT NOT NULL CHECK(kind IN ('income', 'expense')),
                    category TEXT NOT NULL,
                    note TEXT NOT NULL DEFAULT '',
                    date TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Transaction {
            id: row.get(offset)?,
            user_id: UserID::new(row.get(offset + 1)?),
            amount: row.get(offset + 2)?,
            kind: row.get(offset + 3)?,
            category: row.get(offset + 4)?,
            note: row.get(offset + 5)?,
            date: row.get(offset + 6)?,
            created_at: row.get(offset + 7)?,
            updated_at: row.get(offset + 8)?,
        })
    }
}

#[cfg(test)]
mod sqlite_transaction_store_tests {
    use std::sync::{Arc, Mutex};

    use email_address::EmailAddress;
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error,
        db::initialize,
        models::{PasswordHash, TransactionBuilder, TransactionKind, UserID},
        stores::{TransactionStore, UserStore, sqlite::SQLiteUserStore},
    };

    use super::SQLiteTransactionStore;

    fn get_store_and_user() -> (SQLiteTransactionStore, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let connection = Arc::new(Mutex::new(connection));
        let user = SQLiteUserStore::new(connection.clone())
            .create(
                "Test".to_owned(),
                "foo@bar.baz".parse::<EmailAddress>().unwrap(),
                PasswordHash::new_unchecked("hunter2hash"),
            )
            .unwrap();

        (SQLiteTransactionStore::new(connection), user.id())
    }

    fn expense(amount: f64, category: &str) -> TransactionBuilder {
        TransactionBuilder::new(amount, TransactionKind::Expense, category).unwrap()
    }

    #[test]
    fn create_succeeds() {
        let (mut store, user_id) = get_store_and_user();

        let transaction = store
            .create(user_id, expense(12.3, "Food").note("lunch"))
            .unwrap();

        assert_eq!(transaction.user_id, user_id);
        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.category, "Food");
        assert_eq!(transaction.note, "lunch");
        assert_eq!(transaction.created_at, transaction.updated_at);
    }

    #[test]
    fn get_succeeds() {
        let (mut store, user_id) = get_store_and_user();
        let created = store.create(user_id, expense(12.3, "Food")).unwrap();

        let selected = store.get(created.id, user_id).unwrap();

        assert_eq!(selected, created);
    }

    #[test]
    fn get_fails_on_invalid_id() {
        let (mut store, user_id) = get_store_and_user();
        let created = store.create(user_id, expense(12.3, "Food")).unwrap();

        let result = store.get(created.id + 654, user_id);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_fails_on_foreign_user() {
        let (mut store, user_id) = get_store_and_user();
        let created = store.create(user_id, expense(12.3, "Food")).unwrap();

        let result = store.get(created.id, UserID::new(user_id.as_i64() + 1));

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_by_user_returns_empty_vec_for_no_transactions() {
        let (store, user_id) = get_store_and_user();

        let transactions = store.get_by_user(user_id).unwrap();

        assert_eq!(transactions, vec![]);
    }

    #[test]
    fn get_by_user_sorts_by_date_descending() {
        let (mut store, user_id) = get_store_and_user();
        let today = OffsetDateTime::now_utc().date();

        let oldest = store
            .create(user_id, expense(1.0, "Food").date(today - Duration::days(2)))
            .unwrap();
        let newest = store.create(user_id, expense(2.0, "Food").date(today)).unwrap();
        let middle = store
            .create(user_id, expense(3.0, "Food").date(today - Duration::days(1)))
            .unwrap();

        let transactions = store.get_by_user(user_id).unwrap();

        assert_eq!(transactions, vec![newest, middle, oldest]);
    }

    #[test]
    fn get_by_user_excludes_other_users() {
        let (mut store, user_id) = get_store_and_user();
        store.create(user_id, expense(12.3, "Food")).unwrap();

        let transactions = store.get_by_user(UserID::new(user_id.as_i64() + 1)).unwrap();

        assert_eq!(transactions, vec![]);
    }

    #[test]
    fn update_replaces_all_fields() {
        let (mut store, user_id) = get_store_and_user();
        let created = store.create(user_id, expense(12.3, "Food").note("lunch")).unwrap();
        let new_date = OffsetDateTime::now_utc().date() - Duration::days(7);

        let replacement = TransactionBuilder::new(99.9, TransactionKind::Income, "Salary")
            .unwrap()
            .date(new_date);
        let updated = store.update(created.id, user_id, replacement).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.amount, 99.9);
        assert_eq!(updated.kind, TransactionKind::Income);
        assert_eq!(updated.category, "Salary");
        assert_eq!(updated.note, "");
        assert_eq!(updated.date, new_date);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn update_fails_on_invalid_id() {
        let (mut store, user_id) = get_store_and_user();

        let result = store.update(999, user_id, expense(1.0, "Food"));

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn update_fails_on_foreign_user() {
        let (mut store, user_id) = get_store_and_user();
        let created = store.create(user_id, expense(12.3, "Food")).unwrap();

        let result = store.update(
            created.id,
            UserID::new(user_id.as_i64() + 1),
            expense(1.0, "Food"),
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_succeeds() {
        let (mut store, user_id) = get_store_and_user();
        let created = store.create(user_id, expense(12.3, "Food")).unwrap();

        store.delete(created.id, user_id).unwrap();

        assert_eq!(store.get(created.id, user_id), Err(Error::NotFound));
    }

    #[test]
    fn delete_fails_on_invalid_id() {
        let (mut store, user_id) = get_store_and_user();

        let result = store.delete(999, user_id);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_fails_on_foreign_user() {
        let (mut store, user_id) = get_store_and_user();
        let created = store.create(user_id, expense(12.3, "Food")).unwrap();

        let result = store.delete(created.id, UserID::new(user_id.as_i64() + 1));

        assert_eq!(result, Err(Error::NotFound));
        assert!(store.get(created.id, user_id).is_ok());
    }
}
