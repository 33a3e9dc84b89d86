// NATS consumer for the analytics ingester
// Binds a durable JetStream consumer to the operations stream and fans
// each event out into per-account history rows.

use crate::database::Database;
use crate::errors::AnalyticsError;
use crate::models;
use async_nats::jetstream::{self, consumer};
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use wallet_contracts::{subjects, OperationCompletedEvent};

/// Consumer tuning knobs; the durable name doubles as the consumer group,
/// so parallel instances share the work.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    pub durable_name: String,
    pub ack_wait: Duration,
    pub max_deliver: i64,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            durable_name: "analytics-operations".to_string(),
            ack_wait: Duration::from_secs(30),
            max_deliver: 5,
        }
    }
}

/// Connect to NATS and start consuming operation events in a background
/// task. Returns once the subscription is established.
pub async fn start_operations_consumer(
    nats_url: &str,
    config: ConsumerConfig,
    db: Arc<Database>,
) -> anyhow::Result<()> {
    info!("Starting analytics NATS consumer...");

    let client = async_nats::connect(nats_url).await?;
    info!("Connected to NATS: {}", nats_url);

    let js = jetstream::new(client);

    // The stream is the durable topic: it captures every subject under
    // the operations prefix regardless of which side starts first.
    let stream = get_or_create_stream(&js).await?;

    let consumer: consumer::PullConsumer = stream
        .create_consumer(consumer::pull::Config {
            durable_name: Some(config.durable_name.clone()),
            filter_subject: subjects::BINDING.to_string(),
            ack_policy: consumer::AckPolicy::Explicit,
            ack_wait: config.ack_wait,
            max_deliver: config.max_deliver,
            deliver_policy: consumer::DeliverPolicy::All,
            ..Default::default()
        })
        .await?;

    info!(
        "Subscribed to {} (durable: {})",
        subjects::BINDING,
        config.durable_name
    );

    let mut messages = consumer.messages().await?;

    tokio::spawn(async move {
        info!("Analytics consumer task started");

        while let Some(msg) = messages.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    error!("Failed to receive message: {}", e);
                    continue;
                }
            };

            match handle_message(&db, &msg.payload).await {
                Ok(operation_id) => {
                    info!(%operation_id, "operation rows stored");
                    if let Err(e) = msg.ack().await {
                        error!("Failed to ack message: {}", e);
                    }
                }
                Err(AnalyticsError::InvalidEvent(reason)) => {
                    // Poison message: acknowledge terminally so it never
                    // loops back through the queue.
                    warn!("Dropping unprocessable event: {}", reason);
                    if let Err(e) = msg.ack_with(jetstream::AckKind::Term).await {
                        error!("Failed to terminate message: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to process event, requeueing: {}", e);
                    if let Err(nak_err) = msg.ack_with(jetstream::AckKind::Nak(None)).await {
                        error!("Failed to nak message: {}", nak_err);
                    }
                }
            }
        }

        warn!("Analytics consumer task ended");
    });

    info!("Analytics consumer started successfully");

    Ok(())
}

async fn get_or_create_stream(
    js: &jetstream::Context,
) -> anyhow::Result<jetstream::stream::Stream> {
    match js.get_stream(subjects::STREAM_NAME).await {
        Ok(stream) => {
            info!("Using existing JetStream stream: {}", subjects::STREAM_NAME);
            Ok(stream)
        }
        Err(_) => {
            info!("Creating JetStream stream: {}", subjects::STREAM_NAME);
            let stream = js
                .create_stream(jetstream::stream::Config {
                    name: subjects::STREAM_NAME.to_string(),
                    subjects: vec![subjects::BINDING.to_string()],
                    retention: jetstream::stream::RetentionPolicy::Limits,
                    storage: jetstream::stream::StorageType::File,
                    max_age: Duration::from_secs(7 * 24 * 60 * 60),
                    num_replicas: 1,
                    ..Default::default()
                })
                .await?;
            Ok(stream)
        }
    }
}

/// Process one delivery: parse, validate, fan out, store. Returns the
/// operation id for logging.
async fn handle_message(
    db: &Database,
    payload: &[u8],
) -> Result<uuid::Uuid, AnalyticsError> {
    let event: OperationCompletedEvent = serde_json::from_slice(payload)
        .map_err(|e| AnalyticsError::InvalidEvent(format!("failed to parse event: {e}")))?;

    let rows = models::rows_from_event(&event)?;

    db.insert_operations(&rows).await?;

    Ok(event.operation_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumer_config_default() {
        let config = ConsumerConfig::default();
        assert_eq!(config.durable_name, "analytics-operations");
        assert_eq!(config.max_deliver, 5);
    }

    #[test]
    fn test_garbage_payload_classified_as_poison() {
        // Classification only; no I/O happens before validation fails.
        let event: Result<OperationCompletedEvent, _> = serde_json::from_slice(b"not json");
        assert!(event.is_err());
    }
}
