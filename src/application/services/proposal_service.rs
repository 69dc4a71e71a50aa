//! # Proposal Service
//!
//! The request pipeline: validate, price, render, deliver.
//!
//! Stages run strictly in sequence for one request. A validation failure
//! stops the pipeline before pricing, and a render failure stops it before
//! any provider is contacted. Delivery failures are not errors here: they
//! come back inside the [`DeliveryResult`].

use crate::application::dto::ProposalRequest;
use crate::application::error::ApplicationResult;
use crate::application::services::delivery_orchestrator::DeliveryOrchestrator;
use crate::domain::entities::catalog::PackageCatalog;
use crate::domain::entities::delivery::DeliveryResult;
use crate::domain::entities::proposal::PricedProposal;
use crate::domain::entities::selection::SelectionRequest;
use crate::domain::services::pricing::PricingEngine;
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::delivery::traits::DeliveryProvider;
use crate::infrastructure::rendering::traits::{DocumentRenderer, RenderedDocument};
use std::sync::Arc;
use tracing::{info, warn};

/// Prices, renders and delivers proposals.
#[derive(Debug, Clone)]
pub struct ProposalService {
    catalog: Arc<PackageCatalog>,
    pricing: PricingEngine,
    renderer: Arc<dyn DocumentRenderer>,
    orchestrator: DeliveryOrchestrator,
}

impl ProposalService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        catalog: Arc<PackageCatalog>,
        renderer: Arc<dyn DocumentRenderer>,
        orchestrator: DeliveryOrchestrator,
    ) -> Self {
        Self {
            catalog,
            pricing: PricingEngine::new(),
            renderer,
            orchestrator,
        }
    }

    /// Creates the service, building the fail-over chain from `providers`.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if the provider list is
    /// empty or repeats an id.
    pub fn try_new(
        catalog: Arc<PackageCatalog>,
        renderer: Arc<dyn DocumentRenderer>,
        providers: Vec<Arc<dyn DeliveryProvider>>,
    ) -> ApplicationResult<Self> {
        let orchestrator = DeliveryOrchestrator::new(providers)?;
        Ok(Self::new(catalog, renderer, orchestrator))
    }

    /// Returns the package catalog.
    #[must_use]
    pub fn catalog(&self) -> &PackageCatalog {
        &self.catalog
    }

    /// Returns the configured provider ids in attempt order.
    #[must_use]
    pub fn provider_ids(&self) -> Vec<&ProviderId> {
        self.orchestrator
            .providers()
            .iter()
            .map(|p| p.provider_id())
            .collect()
    }

    /// Validates a request against the catalog.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Validation` for bad input.
    pub fn validate(&self, request: ProposalRequest) -> ApplicationResult<SelectionRequest> {
        request.into_selection(&self.catalog).map_err(|e| {
            warn!(field = e.field(), error = %e, "Rejected proposal request");
            e.into()
        })
    }

    /// Validates, prices and renders without delivering.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Validation` or `ApplicationError::Render`.
    pub fn preview(
        &self,
        request: ProposalRequest,
    ) -> ApplicationResult<(PricedProposal, RenderedDocument)> {
        let selection = self.validate(request)?;
        let proposal = self.pricing.price(&selection);
        let document = self.renderer.render(&proposal)?;
        Ok((proposal, document))
    }

    /// Runs the full pipeline and returns the delivery outcome.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Validation` before anything is rendered or
    /// sent, and `ApplicationError::Render` before any provider is called.
    pub async fn submit(&self, request: ProposalRequest) -> ApplicationResult<DeliveryResult> {
        let (proposal, document) = self.preview(request)?;

        info!(
            proposal = %proposal.id(),
            package = proposal.package_name(),
            term = %proposal.payment_term(),
            first_payment = %proposal.first_payment(),
            document_bytes = document.len(),
            "Proposal priced and rendered"
        );

        let result = self
            .orchestrator
            .deliver(&proposal, proposal.recipient(), &document)
            .await;

        info!(proposal = %proposal.id(), outcome = %result, "Proposal pipeline finished");
        Ok(result)
    }
}
