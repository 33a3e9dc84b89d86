use crate::errors::AnalyticsError;
use crate::service::AnalyticsService;
use actix_web::{web, HttpResponse};
use serde_json::json;
use std::sync::Arc;
use wallet_contracts::analytics::ListAccountOperationsQuery;

/// Health check endpoint
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": crate::SERVICE_NAME,
        "version": crate::VERSION
    }))
}

/// Paginated operation history for an account.
pub async fn list_account_operations(
    service: web::Data<Arc<AnalyticsService>>,
    account_id: web::Path<String>,
    query: web::Query<ListAccountOperationsQuery>,
) -> Result<HttpResponse, AnalyticsError> {
    let response = service
        .list_account_operations(&account_id, query.limit, query.after_id)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Configure routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rpc/v1/analytics")
            .route("/health", web::get().to(health_check))
            .route(
                "/accounts/{account_id}/operations",
                web::get().to(list_account_operations),
            ),
    );
}
