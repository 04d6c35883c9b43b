//! # Registrar Server
//!
//! An Axum-based HTTP surface for the registrar.
//!
//! Provides the [`RegistrarServer`] builder, which exposes a
//! [`ReconciliationEngine`](registrar_engine::ReconciliationEngine) over HTTP:
//!
//! * **`POST /asset-definitions`**: request a new definition (`?sync=true` to submit synchronously).
//! * **`GET /asset-definitions`**: list definitions (`?skip=&limit=`).
//! * **`GET /asset-definitions/count`**: count definitions.
//! * **`GET /asset-definitions/{id}`**: fetch a definition and its lifecycle state.
//!
//! Rejected requests answer with `{"error": "<reason>", "message": "<details>"}`.
//!
//! ## Example
//!
//! ```no_run
//! use registrar_core::prelude::*;
//! use registrar_engine::prelude::*;
//! use registrar_memory::*;
//! use registrar_server::prelude::*;
//!
//! # async fn run() {
//! let services = CoreServices {
//!     content: MemoryContentStore::default(),
//!     ledger: MemoryLedger::default(),
//!     registry: MemoryRegistry::default(),
//!     members: NoMemberDirectory,
//!     validator: JsonSchemaValidator,
//! };
//! let engine = ReconciliationEngine::new(services, EngineConfig::default());
//!
//! let app = RegistrarServer::default().build(engine);
//! # }
//! ```

mod api;
mod server;

pub mod state;

pub use api::ApiError;
pub use server::{RegistrarServer, RegistrarServerConfig};

pub mod prelude {
    pub use crate::state::*;
    pub use crate::{ApiError, RegistrarServer, RegistrarServerConfig};
}
