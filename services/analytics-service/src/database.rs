use crate::errors::Result;
use crate::models::Operation;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use uuid::Uuid;

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

    /// Insert every row of one event atomically; a failure leaves nothing
    /// behind so the message can be redelivered safely.
    pub async fn insert_operations(&self, operations: &[Operation]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for op in operations {
            sqlx::query(
                r#"
                INSERT INTO operations (
                    id, account_id, operation_type, "timestamp",
                    amount_value, amount_currency, sender_id, recipient_id
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(op.id)
            .bind(op.account_id)
            .bind(op.operation_type)
            .bind(op.timestamp)
            .bind(op.amount_value)
            .bind(&op.amount_currency)
            .bind(op.sender_id)
            .bind(op.recipient_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Operation history for one account, most recent first.
    ///
    /// `after_id` restricts to ids strictly greater than the cursor;
    /// `limit = 0` returns all matching rows. Redelivered events may leave
    /// duplicate rows, so the scan deduplicates on id per account.
    pub async fn list_account_operations(
        &self,
        account_id: Uuid,
        limit: i32,
        after_id: Option<Uuid>,
    ) -> Result<Vec<Operation>> {
        let operations = if limit > 0 {
            sqlx::query_as::<_, Operation>(
                r#"
                SELECT id, account_id, operation_type, "timestamp",
                       amount_value, amount_currency, sender_id, recipient_id
                FROM (
                    SELECT DISTINCT ON (id)
                           id, account_id, operation_type, "timestamp",
                           amount_value, amount_currency, sender_id, recipient_id
                    FROM operations
                    WHERE account_id = $1
                      AND ($2::uuid IS NULL OR id > $2)
                    ORDER BY id, "timestamp" DESC
                ) deduplicated
                ORDER BY "timestamp" DESC
                LIMIT $3
                "#,
            )
            .bind(account_id)
            .bind(after_id)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Operation>(
                r#"
                SELECT id, account_id, operation_type, "timestamp",
                       amount_value, amount_currency, sender_id, recipient_id
                FROM (
                    SELECT DISTINCT ON (id)
                           id, account_id, operation_type, "timestamp",
                           amount_value, amount_currency, sender_id, recipient_id
                    FROM operations
                    WHERE account_id = $1
                      AND ($2::uuid IS NULL OR id > $2)
                    ORDER BY id, "timestamp" DESC
                ) deduplicated
                ORDER BY "timestamp" DESC
                "#,
            )
            .bind(account_id)
            .bind(after_id)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(operations)
    }
}
