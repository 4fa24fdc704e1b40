//! Business logic services

pub mod catalog;
pub mod loans;

use std::sync::Arc;

use crate::{
    ledger::{Clock, LoanPolicy},
    repository::LibraryStore,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    store: Arc<dyn LibraryStore>,
}

impl Services {
    /// Create all services over the given store
    pub fn new(store: Arc<dyn LibraryStore>, policy: LoanPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog: catalog::CatalogService::new(store.clone()),
            loans: loans::LoansService::new(store.clone(), policy, clock),
            store,
        }
    }

    /// Whether the backing store answers queries
    pub async fn store_ready(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Store readiness check failed: {}", e);
                false
            }
        }
    }
}
