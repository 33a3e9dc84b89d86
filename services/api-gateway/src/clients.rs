use crate::error::GatewayError;
use reqwest::Client;
use std::time::Duration;
use tracing::error;
use uuid::Uuid;
use wallet_contracts::analytics::ListAccountOperationsResponse;
use wallet_contracts::bank::{GetAccountResponse, TransferMoneyRequest, TransferMoneyResponse};
use wallet_contracts::RpcError;

/// Decode an upstream error response into the RPC envelope; anything that
/// is not a well-formed envelope counts as a transport failure.
async fn decode_error(response: reqwest::Response) -> GatewayError {
    let status = response.status();
    match response.json::<RpcError>().await {
        Ok(err) => GatewayError::Rpc(err),
        Err(e) => GatewayError::Upstream(format!(
            "upstream returned {status} with unreadable body: {e}"
        )),
    }
}

pub struct BankClient {
    base_url: String,
    client: Client,
}

impl BankClient {
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap();

        BankClient { base_url, client }
    }

    /// Execute a transfer through the ledger.
    pub async fn transfer_money(
        &self,
        request: &TransferMoneyRequest,
    ) -> Result<TransferMoneyResponse, GatewayError> {
        let url = format!("{}/rpc/v1/bank/transfer-money", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to call ledger service: {}", e);
                GatewayError::Upstream(format!("transfer request failed: {e}"))
            })?;

        if !response.status().is_success() {
            return Err(decode_error(response).await);
        }

        response
            .json::<TransferMoneyResponse>()
            .await
            .map_err(|e| GatewayError::Upstream(format!("failed to parse response: {e}")))
    }

    /// Fetch account state from the ledger.
    pub async fn get_account(&self, account_id: Uuid) -> Result<GetAccountResponse, GatewayError> {
        let url = format!("{}/rpc/v1/bank/accounts/{}", self.base_url, account_id);

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!("Failed to call ledger service: {}", e);
            GatewayError::Upstream(format!("account request failed: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(decode_error(response).await);
        }

        response
            .json::<GetAccountResponse>()
            .await
            .map_err(|e| GatewayError::Upstream(format!("failed to parse response: {e}")))
    }

    /// Health check
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/rpc/v1/bank/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

pub struct AnalyticsClient {
    base_url: String,
    client: Client,
}

impl AnalyticsClient {
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap();

        AnalyticsClient { base_url, client }
    }

    /// Paginated operation history for an account.
    pub async fn list_account_operations(
        &self,
        account_id: Uuid,
        limit: Option<i32>,
        after_id: Option<Uuid>,
    ) -> Result<ListAccountOperationsResponse, GatewayError> {
        let url = format!(
            "{}/rpc/v1/analytics/accounts/{}/operations",
            self.base_url, account_id
        );

        let mut request = self.client.get(&url);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit.to_string())]);
        }
        if let Some(after_id) = after_id {
            request = request.query(&[("after_id", after_id.to_string())]);
        }

        let response = request.send().await.map_err(|e| {
            error!("Failed to call analytics service: {}", e);
            GatewayError::Upstream(format!("operations request failed: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(decode_error(response).await);
        }

        response
            .json::<ListAccountOperationsResponse>()
            .await
            .map_err(|e| GatewayError::Upstream(format!("failed to parse response: {e}")))
    }

    /// Health check
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/rpc/v1/analytics/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
