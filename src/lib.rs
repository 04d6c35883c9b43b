//! # Registrar
//!
//! Reconciles off-chain asset definition requests with on-chain confirmation events.
//!
//! Clients register asset definitions (schemas, index rules, visibility flags). Each
//! definition is written to a content-addressed store, its digest submitted to a
//! distributed ledger, and it only becomes active once the ledger confirms it. The
//! ledger's confirmation order decides, exactly once, which definition owns a name.
//!
//! This crate serves as an entry point, re-exporting the core types and
//! optionally including the engine, server and collaborator implementations via feature flags.
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | **`engine`** | Includes the reconciliation engine (`registrar_engine`). |
//! | **`server`** | Includes the Axum-based HTTP server (`registrar_server`). |
//! | **`fs`** | Content store backed by the local filesystem (`registrar_fs`). |
//! | **`memory`** | In-memory collaborators for development and tests (`registrar_memory`). |
//!
//! ## Example: In-Memory Server
//!
//! ```toml
//! [dependencies]
//! registrar = { version = "0.1", features = ["server", "memory"] }
//! ```
//!
//! ```rust,ignore
//! use registrar::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let services = CoreServices {
//!         content: MemoryContentStore::default(),
//!         ledger: MemoryLedger::default(),
//!         registry: MemoryRegistry::default(),
//!         members: NoMemberDirectory,
//!         validator: JsonSchemaValidator,
//!     };
//!     let engine = ReconciliationEngine::new(services, EngineConfig::default());
//!
//!     // Build
//!     let app = RegistrarServer::default().build(engine);
//!
//!     // Serve
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub use registrar_core::*;

#[cfg(feature = "engine")]
pub mod engine {
    pub use registrar_engine::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use registrar_server::*;
}

#[cfg(feature = "fs")]
pub mod fs {
    pub use registrar_fs::*;
}

#[cfg(feature = "memory")]
pub mod memory {
    pub use registrar_memory::*;
}

pub mod prelude {
    pub use registrar_core::prelude::*;

    #[cfg(feature = "engine")]
    pub use registrar_engine::prelude::*;

    #[cfg(feature = "server")]
    pub use registrar_server::prelude::*;

    #[cfg(feature = "fs")]
    pub use registrar_fs::FileSystemContentStore;

    #[cfg(feature = "memory")]
    pub use registrar_memory::{
        MemoryContentStore, MemoryLedger, MemoryMemberDirectory, MemoryRegistry,
    };
}
