use crate::errors::{LedgerError, Result};
use crate::models::Transfer;
use chrono::{SecondsFormat, Utc};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;
use wallet_contracts::events::{EventAmount, STATUS_SUCCESS, TOPUP_COMPLETED, TRANSFER_COMPLETED};
use wallet_contracts::{amount, subjects, OperationCompletedEvent};

/// Publishes operation events after the ledger transaction commits.
///
/// Delivery is at-most-once best-effort: a failed publish is logged by the
/// caller and never retried, and the committed ledger state is unaffected.
pub struct EventPublisher {
    client: async_nats::Client,
    publish_timeout: Duration,
}

impl EventPublisher {
    pub async fn connect(url: &str, publish_timeout: Duration) -> Result<Self> {
        let client = async_nats::connect(url)
            .await
            .map_err(|e| LedgerError::Publish(e.to_string()))?;

        info!("Connected to NATS at {}", url);
        Ok(Self {
            client,
            publish_timeout,
        })
    }

    /// Publish the completion event for a successful transfer or top-up.
    pub async fn publish_operation_completed(&self, transfer: &Transfer) -> Result<()> {
        let event = build_event(transfer);
        let subject = subjects::subject_for(&event.event_type);
        let payload =
            serde_json::to_vec(&event).map_err(|e| LedgerError::Publish(e.to_string()))?;

        tokio::time::timeout(self.publish_timeout, async {
            self.client
                .publish(subject.clone(), payload.into())
                .await
                .map_err(|e| LedgerError::Publish(e.to_string()))?;
            self.client
                .flush()
                .await
                .map_err(|e| LedgerError::Publish(e.to_string()))
        })
        .await
        .map_err(|_| LedgerError::Publish("publish timed out".to_string()))??;

        info!(
            operation_id = %event.operation_id,
            subject = %subject,
            "published operation completed event"
        );

        Ok(())
    }
}

/// Assemble the wire event for a committed Success row.
pub fn build_event(transfer: &Transfer) -> OperationCompletedEvent {
    let event_type = if transfer.is_topup() {
        TOPUP_COMPLETED
    } else {
        TRANSFER_COMPLETED
    };

    let completed_at = transfer.completed_at.unwrap_or(transfer.created_at);

    OperationCompletedEvent {
        event_id: Uuid::new_v4(),
        event_type: event_type.to_string(),
        event_timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        operation_id: transfer.id,
        sender_id: transfer.sender_id,
        recipient_id: transfer.recipient_id,
        amount: EventAmount {
            value: amount::format_value(transfer.amount_value),
            currency_code: transfer.amount_currency_code.clone(),
        },
        idempotency_key: transfer.idempotency_key.clone(),
        status: STATUS_SUCCESS.to_string(),
        timestamp: completed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        message: (!transfer.message.is_empty()).then(|| transfer.message.clone()),
    }
}
