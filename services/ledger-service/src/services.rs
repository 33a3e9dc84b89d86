use crate::database::Database;
use crate::errors::{LedgerError, Result};
use crate::events::EventPublisher;
use crate::models::{Account, Money, Transfer, TransferStatus};
use crate::validation;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Business logic for money movement.
///
/// Transfers run inside a database transaction with pessimistic row locks
/// on the touched accounts; the idempotency key deduplicates retries at
/// this boundary. Events are published only after the transaction commits.
pub struct TransferService {
    db: Arc<Database>,
    publisher: Arc<EventPublisher>,
}

impl TransferService {
    pub fn new(db: Arc<Database>, publisher: Arc<EventPublisher>) -> Self {
        TransferService { db, publisher }
    }

    /// Execute a money transfer from sender to recipient.
    ///
    /// Idempotent: replaying the same key returns the stored transfer
    /// verbatim without executing again.
    pub async fn execute_transfer(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        amount: Money,
        idempotency_key: &str,
    ) -> Result<Transfer> {
        validation::validate_transfer_request(sender_id, recipient_id, idempotency_key)?;

        if let Some(existing) = self
            .db
            .get_transfer_by_idempotency_key(idempotency_key)
            .await?
        {
            info!(
                operation_id = %existing.id,
                "idempotency key already processed, returning stored transfer"
            );
            return Ok(existing);
        }

        let result = self
            .run_transfer(sender_id, recipient_id, &amount, idempotency_key)
            .await;

        match result {
            Ok(transfer) => {
                self.spawn_publish(&transfer);
                Ok(transfer)
            }
            // Lost the insert race against a concurrent request with the
            // same key; the winner's row carries the authoritative result.
            Err(LedgerError::DuplicateIdempotencyKey) => self
                .db
                .get_transfer_by_idempotency_key(idempotency_key)
                .await?
                .ok_or_else(|| {
                    LedgerError::Internal(
                        "duplicate idempotency key without a stored transfer".to_string(),
                    )
                }),
            Err(e) => Err(e),
        }
    }

    async fn run_transfer(
        &self,
        sender_id: Uuid,
        recipient_id: Uuid,
        amount: &Money,
        idempotency_key: &str,
    ) -> Result<Transfer> {
        let mut tx = self.db.begin().await?;

        // Lock in ascending id order so opposing transfers between the
        // same pair never hold each other's first lock.
        let (first_id, second_id) = lock_order(sender_id, recipient_id);
        let first = Database::lock_account(&mut tx, first_id).await?;
        let second = Database::lock_account(&mut tx, second_id).await?;
        let (sender, recipient) = if first_id == sender_id {
            (first, second)
        } else {
            (second, first)
        };

        let mut sender = sender.ok_or(LedgerError::AccountNotFound(sender_id))?;
        let mut recipient = recipient.ok_or(LedgerError::AccountNotFound(recipient_id))?;

        check_currency(&sender, amount)?;
        check_currency(&recipient, amount)?;

        let mut transfer = Transfer::pending(Some(sender_id), recipient_id, amount, idempotency_key);

        if !sender.has_sufficient_funds(amount.value) {
            transfer.mark_failed("Insufficient funds");
            Database::create_transfer(&mut tx, &transfer).await?;
            tx.commit()
                .await
                .map_err(|e| LedgerError::Internal(format!("transaction commit failed: {e}")))?;
            return Err(LedgerError::InsufficientFunds);
        }

        sender.debit(amount.value);
        recipient.credit(amount.value);

        Database::update_account(&mut tx, &sender).await?;
        Database::update_account(&mut tx, &recipient).await?;

        transfer.mark_success("Transfer completed successfully");
        Database::create_transfer(&mut tx, &transfer).await?;

        tx.commit()
            .await
            .map_err(|e| LedgerError::Internal(format!("transaction commit failed: {e}")))?;

        info!(
            operation_id = %transfer.id,
            sender = %sender_id,
            recipient = %recipient_id,
            amount = %amount.value,
            currency = %amount.currency,
            "transfer committed"
        );

        Ok(transfer)
    }

    /// Credit an account from an external funding source.
    ///
    /// The card top-up adapter calls this once the payment gateway has
    /// confirmed the charge. Same idempotency contract as transfers; only
    /// the credited account is locked and there is no debit leg.
    pub async fn execute_deposit(
        &self,
        account_id: Uuid,
        amount: Money,
        idempotency_key: &str,
    ) -> Result<Transfer> {
        validation::validate_idempotency_key(idempotency_key)?;

        if let Some(existing) = self
            .db
            .get_transfer_by_idempotency_key(idempotency_key)
            .await?
        {
            info!(
                operation_id = %existing.id,
                "idempotency key already processed, returning stored top-up"
            );
            return Ok(existing);
        }

        let result = self.run_deposit(account_id, &amount, idempotency_key).await;

        match result {
            Ok(transfer) => {
                self.spawn_publish(&transfer);
                Ok(transfer)
            }
            Err(LedgerError::DuplicateIdempotencyKey) => self
                .db
                .get_transfer_by_idempotency_key(idempotency_key)
                .await?
                .ok_or_else(|| {
                    LedgerError::Internal(
                        "duplicate idempotency key without a stored transfer".to_string(),
                    )
                }),
            Err(e) => Err(e),
        }
    }

    async fn run_deposit(
        &self,
        account_id: Uuid,
        amount: &Money,
        idempotency_key: &str,
    ) -> Result<Transfer> {
        let mut tx = self.db.begin().await?;

        let mut account = Database::lock_account(&mut tx, account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))?;

        check_currency(&account, amount)?;

        account.credit(amount.value);
        Database::update_account(&mut tx, &account).await?;

        let mut transfer = Transfer::pending(None, account_id, amount, idempotency_key);
        transfer.mark_success("Top-up completed successfully");
        Database::create_transfer(&mut tx, &transfer).await?;

        tx.commit()
            .await
            .map_err(|e| LedgerError::Internal(format!("transaction commit failed: {e}")))?;

        info!(
            operation_id = %transfer.id,
            account = %account_id,
            amount = %amount.value,
            "top-up committed"
        );

        Ok(transfer)
    }

    /// Current balance; unlocked point read.
    pub async fn get_account(&self, account_id: Uuid) -> Result<Account> {
        self.db
            .get_account(account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))
    }

    /// Publish after commit, detached from the client reply. Failures are
    /// logged and swallowed: the ledger state is already durable.
    fn spawn_publish(&self, transfer: &Transfer) {
        debug_assert_eq!(transfer.status, TransferStatus::Success);

        let publisher = self.publisher.clone();
        let transfer = transfer.clone();
        tokio::spawn(async move {
            if let Err(e) = publisher.publish_operation_completed(&transfer).await {
                warn!(
                    operation_id = %transfer.id,
                    "failed to publish operation completed event: {e}"
                );
            }
        });
    }
}

fn check_currency(account: &Account, amount: &Money) -> Result<()> {
    if account.balance_currency_code != amount.currency {
        return Err(LedgerError::CurrencyMismatch);
    }
    Ok(())
}

/// Deterministic lock order: smaller account id first.
fn lock_order(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
