//! # Registrar Engine
//!
//! Reconciles asset definition requests with their ledger confirmations.
//!
//! A definition is written to the [`ContentStore`](registrar_core::traits::ContentStore),
//! its digest submitted to the [`LedgerGateway`](registrar_core::traits::LedgerGateway)
//! and recorded as pending. The ledger later confirms it through an independent event
//! stream, possibly out of order and possibly racing another definition with the same
//! name. The ledger's confirmation order decides who wins a name:
//!
//! * The first definition confirmed for a name becomes the active one.
//! * Any later confirmation for that name is marked conflicted.
//! * A second, different confirmation for an already confirmed identifier is rejected.
//!
//! ## Example
//!
//! ```no_run
//! use registrar_core::prelude::*;
//! use registrar_engine::prelude::*;
//! use registrar_memory::*;
//!
//! # async fn run() -> Result<(), DefinitionError> {
//! let services = CoreServices {
//!     content: MemoryContentStore::default(),
//!     ledger: MemoryLedger::default(),
//!     registry: MemoryRegistry::default(),
//!     members: NoMemberDirectory,
//!     validator: JsonSchemaValidator,
//! };
//! let engine = ReconciliationEngine::new(services, EngineConfig::default());
//!
//! let id = engine
//!     .request_definition_creation(CreateDefinitionRequest::new("widget", "0xauthor"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod confirm;
mod consumer;
mod request;
mod validation;

pub use confirm::Reconciliation;
pub use consumer::ConfirmationConsumer;
pub use request::CreateDefinitionRequest;
pub use validation::JsonSchemaValidator;

use registrar_core::prelude::*;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReconciliationEngine<S: RegistrarServices> {
    services: S,
    config: Arc<EngineConfig>,
}

impl<S: RegistrarServices> ReconciliationEngine<S> {
    pub fn new(services: S, config: EngineConfig) -> Self {
        Self {
            services,
            config: Arc::new(config),
        }
    }

    pub fn services(&self) -> &S {
        &self.services
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn get(&self, id: &DefinitionId) -> Result<Option<DefinitionRecord>, RegistryError> {
        self.services.registry().find_by_id(id).await
    }

    pub async fn list(&self, skip: usize, limit: usize) -> Result<Vec<DefinitionRecord>, RegistryError> {
        self.services.registry().list(skip, limit).await
    }

    pub async fn count(&self) -> Result<usize, RegistryError> {
        self.services.registry().count().await
    }
}

pub mod prelude {
    pub use crate::{
        ConfirmationConsumer, CreateDefinitionRequest, JsonSchemaValidator, Reconciliation,
        ReconciliationEngine,
    };
}
