//! # Memory Server Example
//!
//! Showcases a [`RegistrarServer`] wired to in-memory collaborators. The in-memory ledger
//! confirms every submission immediately and its events are fed back through a
//! [`ConfirmationConsumer`], so definitions move from pending to confirmed on their own.
//!
//! ## Usage
//!
//! ```sh
//! cargo run --example memory_server --features "server memory"
//! ```
//!
//! `PORT` (default `3000`) and `LEDGER_MODEL` (`broadcast` or `participants`) are read
//! from the environment.

use registrar::prelude::*;
use std::env;
use tokio_stream::wrappers::UnboundedReceiverStream;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let ledger_model = env::var("LEDGER_MODEL")
        .ok()
        .map(|model| model.parse::<LedgerModel>().unwrap())
        .unwrap_or_default();

    // Collaborators
    let (ledger, events) = MemoryLedger::with_events();

    // Participant resolution is only used by the `participants` ledger model.
    let members = MemoryMemberDirectory::default();
    members
        .register(Member {
            address: "0x0000000000000000000000000000000000000001".to_string(),
            name: "node-1".to_string(),
        })
        .await;

    let services = CoreServices {
        content: MemoryContentStore::default(),
        ledger,
        registry: MemoryRegistry::default(),
        members,
        validator: JsonSchemaValidator,
    };

    let engine = ReconciliationEngine::new(
        services,
        EngineConfig::default().with_ledger_model(ledger_model),
    );

    // Confirmations
    let consumer = ConfirmationConsumer::new(engine.clone());
    tokio::spawn(consumer.run(UnboundedReceiverStream::new(events)));

    // Build App
    let app = RegistrarServer::default().build(engine);

    // Serve
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");
    println!("Server listening on http://{addr} ({ledger_model:?} ledger)");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
