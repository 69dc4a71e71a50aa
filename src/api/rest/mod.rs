//! # REST API
//!
//! REST endpoints using axum.
//!
//! # Endpoints
//!
//! ## Proposals
//! - `POST /api/v1/proposals` - Price, render and deliver a proposal
//! - `POST /api/v1/proposals/preview` - Render a proposal and return the PDF
//!
//! ## Catalog
//! - `GET /api/v1/packages` - List packages
//!
//! ## Health
//! - `GET /api/v1/health` - Health check endpoint
//!
//! # Usage
//!
//! ```ignore
//! use proposal_dispatch::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let router = create_router(AppState::new(Arc::new(service)));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{ApiError, AppState, DeliveryResponse, HealthResponse, PackageResponse};
pub use routes::{create_router, create_router_with_origins};
