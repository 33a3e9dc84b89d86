use crate::errors::{LedgerError, Result};
use crate::models::{Account, Transfer};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{PgConnection, Postgres, Transaction};
use std::time::Duration;
use uuid::Uuid;

/// Postgres unique_violation; raised by the idempotency-key unique index.
const PG_UNIQUE_VIOLATION: &str = "23505";

pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        Ok(Database { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Open a transaction. Row locks taken inside it are held until commit
    /// or rollback; dropping the transaction rolls back.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }

    /// Point read without locking, for the query path.
    pub async fn get_account(&self, id: Uuid) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, balance_value, balance_currency_code, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Acquire a row-level exclusive lock on the account.
    ///
    /// Must run on a transaction's connection; the lock is released when
    /// that transaction commits or rolls back.
    pub async fn lock_account(conn: &mut PgConnection, id: Uuid) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, balance_value, balance_currency_code, created_at, updated_at
            FROM accounts
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(account)
    }

    /// Persist a mutated balance. Zero rows affected means the account
    /// vanished under us and surfaces as not-found.
    pub async fn update_account(conn: &mut PgConnection, account: &Account) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET balance_value = $2,
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(account.id)
        .bind(account.balance_value)
        .bind(account.updated_at)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::AccountNotFound(account.id));
        }

        Ok(())
    }

    /// Insert a transfer row. A collision on the idempotency-key unique
    /// index surfaces as `DuplicateIdempotencyKey`.
    pub async fn create_transfer(conn: &mut PgConnection, transfer: &Transfer) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO transfers (
                id, sender_id, recipient_id,
                amount_value, amount_currency_code,
                idempotency_key, status, message,
                created_at, completed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(transfer.id)
        .bind(transfer.sender_id)
        .bind(transfer.recipient_id)
        .bind(transfer.amount_value)
        .bind(&transfer.amount_currency_code)
        .bind(&transfer.idempotency_key)
        .bind(transfer.status)
        .bind(&transfer.message)
        .bind(transfer.created_at)
        .bind(transfer.completed_at)
        .execute(&mut *conn)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) =>
            {
                Err(LedgerError::DuplicateIdempotencyKey)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a transfer by idempotency key. Absence is not an error.
    pub async fn get_transfer_by_idempotency_key(
        &self,
        idempotency_key: &str,
    ) -> Result<Option<Transfer>> {
        let transfer = sqlx::query_as::<_, Transfer>(
            r#"
            SELECT id, sender_id, recipient_id,
                   amount_value, amount_currency_code,
                   idempotency_key, status, message,
                   created_at, completed_at
            FROM transfers
            WHERE idempotency_key = $1
            "#,
        )
        .bind(idempotency_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transfer)
    }

    pub async fn get_transfer_by_id(&self, id: Uuid) -> Result<Option<Transfer>> {
        let transfer = sqlx::query_as::<_, Transfer>(
            r#"
            SELECT id, sender_id, recipient_id,
                   amount_value, amount_currency_code,
                   idempotency_key, status, message,
                   created_at, completed_at
            FROM transfers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transfer)
    }
}
