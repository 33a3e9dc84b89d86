use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Transfer status enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Pending, // Created, not yet terminal
    Success, // Debit and credit both applied
    Failed,  // Rejected; balances untouched
}

/// A validated monetary amount used inside the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    pub value: Decimal,
    pub currency: String,
}

/// A holder of a single-currency balance, the unit of locking.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub balance_value: Decimal,
    pub balance_currency_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Subtract the amount from the balance. Callers check funds first.
    pub fn debit(&mut self, amount: Decimal) {
        self.balance_value -= amount;
        self.updated_at = Utc::now();
    }

    /// Add the amount to the balance.
    pub fn credit(&mut self, amount: Decimal) {
        self.balance_value += amount;
        self.updated_at = Utc::now();
    }

    pub fn has_sufficient_funds(&self, amount: Decimal) -> bool {
        self.balance_value >= amount
    }
}

/// A debit-credit pair between two accounts, or the credit leg of a top-up
/// when `sender_id` is absent. Atomic and idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transfer {
    pub id: Uuid,
    pub sender_id: Option<Uuid>,
    pub recipient_id: Uuid,
    pub amount_value: Decimal,
    pub amount_currency_code: String,
    pub idempotency_key: String,
    pub status: TransferStatus,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Transfer {
    /// Create a new transfer in Pending status.
    pub fn pending(
        sender_id: Option<Uuid>,
        recipient_id: Uuid,
        amount: &Money,
        idempotency_key: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id,
            recipient_id,
            amount_value: amount.value,
            amount_currency_code: amount.currency.clone(),
            idempotency_key: idempotency_key.to_string(),
            status: TransferStatus::Pending,
            message: String::new(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Transition to the Success terminal state.
    pub fn mark_success(&mut self, message: &str) {
        self.status = TransferStatus::Success;
        self.message = message.to_string();
        self.completed_at = Some(Utc::now());
    }

    /// Transition to the Failed terminal state.
    pub fn mark_failed(&mut self, message: &str) {
        self.status = TransferStatus::Failed;
        self.message = message.to_string();
        self.completed_at = Some(Utc::now());
    }

    /// A top-up row carries no debit leg.
    pub fn is_topup(&self) -> bool {
        self.sender_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(value: Decimal) -> Money {
        Money {
            value,
            currency: "RUB".to_string(),
        }
    }

    #[test]
    fn test_debit_and_credit_are_exact() {
        let mut account = Account {
            id: Uuid::new_v4(),
            balance_value: dec!(1000.00),
            balance_currency_code: "RUB".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        account.debit(dec!(100.50));
        assert_eq!(account.balance_value, dec!(899.50));

        account.credit(dec!(0.01));
        assert_eq!(account.balance_value, dec!(899.51));
    }

    #[test]
    fn test_sufficient_funds_at_exact_balance() {
        let account = Account {
            id: Uuid::new_v4(),
            balance_value: dec!(300.00),
            balance_currency_code: "RUB".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(account.has_sufficient_funds(dec!(300.00)));
        assert!(!account.has_sufficient_funds(dec!(300.01)));
    }

    #[test]
    fn test_transfer_starts_pending() {
        let transfer = Transfer::pending(
            Some(Uuid::new_v4()),
            Uuid::new_v4(),
            &money(dec!(10.00)),
            "K1",
        );
        assert_eq!(transfer.status, TransferStatus::Pending);
        assert!(transfer.completed_at.is_none());
        assert!(!transfer.is_topup());
    }

    #[test]
    fn test_mark_success_sets_completion() {
        let mut transfer =
            Transfer::pending(Some(Uuid::new_v4()), Uuid::new_v4(), &money(dec!(5.00)), "K2");
        transfer.mark_success("Transfer completed successfully");

        assert_eq!(transfer.status, TransferStatus::Success);
        assert_eq!(transfer.message, "Transfer completed successfully");
        assert!(transfer.completed_at.is_some());
    }

    #[test]
    fn test_topup_has_no_sender() {
        let transfer = Transfer::pending(None, Uuid::new_v4(), &money(dec!(5.00)), "K3");
        assert!(transfer.is_topup());
    }
}
