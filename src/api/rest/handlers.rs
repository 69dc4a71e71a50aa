//! # REST Handlers
//!
//! Request handlers for the REST API endpoints.
//!
//! Handlers translate between JSON and the application layer. Every
//! outcome of `POST /proposals` is reported in the same
//! [`DeliveryResponse`] envelope so clients only parse one shape.

use crate::application::dto::ProposalRequest;
use crate::application::error::ApplicationError;
use crate::application::services::ProposalService;
use crate::domain::entities::delivery::DeliveryResult;
use crate::domain::entities::package::Package;
use crate::domain::services::prospects::estimate_prospects;
use crate::domain::value_objects::Money;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, warn};

// ============================================================================
// Application State
// ============================================================================

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The proposal pipeline.
    pub service: Arc<ProposalService>,
}

impl AppState {
    /// Wraps a service.
    #[must_use]
    pub fn new(service: Arc<ProposalService>) -> Self {
        Self { service }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Outcome envelope for proposal submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResponse {
    /// Whether a provider accepted the proposal.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Provider that delivered, if any.
    pub service: Option<String>,
    /// Delivering provider's message id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Failure detail keyed by provider id, or by request field on
    /// validation failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl DeliveryResponse {
    /// Builds the envelope for a delivery outcome.
    #[must_use]
    pub fn from_result(result: &DeliveryResult) -> Self {
        match result.provider() {
            Some(provider) => Self {
                success: true,
                message: format!("Proposal sent via {provider}"),
                service: Some(provider.to_string()),
                message_id: result.message_id().map(str::to_string),
                errors: failures(result),
            },
            None => Self {
                success: false,
                message: "All delivery providers failed".to_string(),
                service: None,
                message_id: None,
                errors: failures(result),
            },
        }
    }

    fn rejected(message: impl Into<String>, field: &str, detail: String) -> Self {
        Self {
            success: false,
            message: message.into(),
            service: None,
            message_id: None,
            errors: Some(BTreeMap::from([(field.to_string(), detail)])),
        }
    }
}

fn failures(result: &DeliveryResult) -> Option<BTreeMap<String, String>> {
    let errors: BTreeMap<String, String> = result
        .errors()
        .into_iter()
        .map(|(provider, detail)| (provider.to_string(), detail.to_string()))
        .collect();
    (!errors.is_empty()).then_some(errors)
}

/// A catalog package as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageResponse {
    /// Catalog id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Base monthly price.
    pub price: Money,
    /// Deliverables.
    pub deliverables: Vec<String>,
    /// Monthly prospect estimate.
    pub estimated_prospects: u32,
}

impl From<&Package> for PackageResponse {
    fn from(package: &Package) -> Self {
        Self {
            id: package.id().to_string(),
            name: package.name().to_string(),
            price: package.monthly_price(),
            deliverables: package.deliverables().to_vec(),
            estimated_prospects: estimate_prospects(package),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Configured provider ids in attempt order.
    pub providers: Vec<String>,
}

// ============================================================================
// Error Handling
// ============================================================================

/// API error wrapper mapping application errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(ApplicationError);

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            ApplicationError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                DeliveryResponse::rejected("Invalid proposal request", e.field(), e.to_string()),
            ),
            ApplicationError::Render(e) => {
                error!(error = %e, "Proposal document could not be rendered");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    DeliveryResponse::rejected("Failed to generate proposal document", "document", e.to_string()),
                )
            }
            ApplicationError::Configuration(e) => {
                error!(error = %e, "Service misconfigured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    DeliveryResponse::rejected("Service misconfigured", "configuration", self.0.detail()),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

fn malformed_body(rejection: &JsonRejection) -> Response {
    warn!(error = %rejection.body_text(), "Malformed proposal request body");
    (
        StatusCode::BAD_REQUEST,
        Json(DeliveryResponse::rejected(
            "Malformed request body",
            "body",
            rejection.body_text(),
        )),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// Submit a proposal for pricing, rendering and delivery.
///
/// `POST /api/v1/proposals`
///
/// # Errors
///
/// Returns 400 on invalid input and 500 when rendering fails.
pub async fn submit_proposal(
    State(state): State<AppState>,
    payload: Result<Json<ProposalRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return Ok(malformed_body(&rejection)),
    };

    let result = state.service.submit(request).await?;
    let status = if result.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok((status, Json(DeliveryResponse::from_result(&result))).into_response())
}

/// Render a proposal without sending it.
///
/// `POST /api/v1/proposals/preview`
///
/// # Errors
///
/// Returns 400 on invalid input and 500 when rendering fails.
pub async fn preview_proposal(
    State(state): State<AppState>,
    payload: Result<Json<ProposalRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => return Ok(malformed_body(&rejection)),
    };

    let (_, document) = state.service.preview(request)?;
    let disposition = HeaderValue::from_str(&format!("inline; filename=\"{}\"", document.filename()))
        .unwrap_or_else(|_| HeaderValue::from_static("inline"));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(document.content_type())),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.into_bytes(),
    )
        .into_response())
}

/// List the package catalog.
///
/// `GET /api/v1/packages`
pub async fn list_packages(State(state): State<AppState>) -> Json<Vec<PackageResponse>> {
    Json(state.service.catalog().iter().map(PackageResponse::from).collect())
}

/// Health check.
///
/// `GET /api/v1/health`
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        providers: state
            .service
            .provider_ids()
            .into_iter()
            .map(ToString::to_string)
            .collect(),
    })
}
