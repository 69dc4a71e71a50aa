//! # REST Routes
//!
//! Router configuration for the REST API.

use crate::api::rest::handlers::{
    AppState, health_check, list_packages, preview_proposal, submit_proposal,
};
use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Creates the API router with permissive CORS.
///
/// # Routes
///
/// - `POST /api/v1/proposals` - Price, render and deliver a proposal
/// - `POST /api/v1/proposals/preview` - Price and render, returning the PDF
/// - `GET /api/v1/packages` - List the package catalog
/// - `GET /api/v1/health` - Health check
pub fn create_router(state: AppState) -> Router {
    create_router_with_origins(state, &[])
}

/// Creates the API router, restricting CORS to `origins` when non-empty.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn create_router_with_origins(state: AppState, origins: &[String]) -> Router {
    let api_routes = Router::new()
        .route("/proposals", post(submit_proposal))
        .route("/proposals/preview", post(preview_proposal))
        .route("/packages", get(list_packages))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors_layer(origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| warn!(origin = %origin, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();
    layer.allow_origin(allowed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::rest::handlers::{DeliveryResponse, HealthResponse, PackageResponse};
    use crate::application::services::{DeliveryOrchestrator, ProposalService};
    use crate::domain::entities::catalog::PackageCatalog;
    use crate::domain::entities::proposal::PricedProposal;
    use crate::domain::value_objects::{EmailAddress, ProviderId};
    use crate::infrastructure::delivery::error::{ProviderError, ProviderResult};
    use crate::infrastructure::delivery::traits::{DeliveryProvider, ProviderReceipt};
    use crate::infrastructure::rendering::{PdfRenderer, RenderOptions, RenderedDocument};
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    #[derive(Debug)]
    struct StubProvider {
        id: ProviderId,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DeliveryProvider for StubProvider {
        fn provider_id(&self) -> &ProviderId {
            &self.id
        }

        async fn send(
            &self,
            proposal: &PricedProposal,
            _recipient: &EmailAddress,
            _document: &RenderedDocument,
        ) -> ProviderResult<ProviderReceipt> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ProviderError::rejected(503, "unavailable"))
            } else {
                Ok(ProviderReceipt::new(proposal.id().to_string()))
            }
        }
    }

    fn router(fail: &[bool]) -> (Router, Vec<Arc<StubProvider>>) {
        let stubs: Vec<Arc<StubProvider>> = fail
            .iter()
            .enumerate()
            .map(|(i, fail)| {
                Arc::new(StubProvider {
                    id: ProviderId::new(format!("p{i}")),
                    fail: *fail,
                    calls: AtomicUsize::new(0),
                })
            })
            .collect();
        let providers = stubs
            .iter()
            .map(|s| Arc::clone(s) as Arc<dyn DeliveryProvider>)
            .collect();
        let service = ProposalService::new(
            Arc::new(PackageCatalog::standard().unwrap()),
            Arc::new(PdfRenderer::new(RenderOptions::default())),
            DeliveryOrchestrator::new(providers).unwrap(),
        );
        (create_router(AppState::new(Arc::new(service))), stubs)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn valid_body() -> serde_json::Value {
        serde_json::json!({
            "recipientEmail": "client@example.com",
            "selectedPackage": "growth",
            "selectedPayment": "quarterly",
            "company": "Acme"
        })
    }

    async fn read<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn submit_returns_ok_from_primary() {
        let (app, stubs) = router(&[false, false]);
        let response = app
            .oneshot(post_json("/api/v1/proposals", valid_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: DeliveryResponse = read(response).await;
        assert!(body.success);
        assert_eq!(body.service.as_deref(), Some("p0"));
        assert!(body.errors.is_none());
        assert_eq!(stubs[1].calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn submit_reports_exhausted_failure_as_500() {
        let (app, stubs) = router(&[true, true]);
        let response = app
            .oneshot(post_json("/api/v1/proposals", valid_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: DeliveryResponse = read(response).await;
        assert!(!body.success);
        assert!(body.service.is_none());
        assert_eq!(body.errors.unwrap().len(), 2);
        assert!(stubs.iter().all(|s| s.calls.load(Ordering::SeqCst) == 1));
    }

    #[tokio::test]
    async fn invalid_email_is_400_without_sending() {
        let (app, stubs) = router(&[false]);
        let mut body = valid_body();
        body["recipientEmail"] = "not-an-email".into();
        let response = app.oneshot(post_json("/api/v1/proposals", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: DeliveryResponse = read(response).await;
        assert!(body.errors.unwrap().contains_key("recipientEmail"));
        assert_eq!(stubs[0].calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (app, _) = router(&[false]);
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/proposals")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn preview_returns_pdf() {
        let (app, stubs) = router(&[false]);
        let response = app
            .oneshot(post_json("/api/v1/proposals/preview", valid_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(stubs[0].calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn packages_and_health() {
        let (app, _) = router(&[false, false]);
        let response = app
            .clone()
            .oneshot(Request::get("/api/v1/packages").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let packages: Vec<PackageResponse> = read(response).await;
        assert!(packages.iter().any(|p| p.id == "growth"));

        let response = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let health: HealthResponse = read(response).await;
        assert_eq!(health.status, "healthy");
        assert_eq!(health.providers, vec!["p0", "p1"]);
    }
}
