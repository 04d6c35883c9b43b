//! # Registrar Core
//!
//! Types and traits for the ecosystem.
//!
//! Defines the data model shared by the engine, the collaborators and the HTTP surface.
//!
//! - **[`AssetDefinition`](definition::AssetDefinition)**: The canonical, content-addressed payload of an asset type.
//! - **[`DefinitionRecord`](record::DefinitionRecord)**: The registry's projection of a definition, including its lifecycle [`DefinitionState`](record::DefinitionState).
//! - **[`ContentStore`](traits::ContentStore)**: Trait for implementing content-addressed blob stores.
//! - **[`LedgerGateway`](traits::LedgerGateway)**: Trait for submitting digests to a distributed ledger.
//! - **[`DefinitionRegistry`](traits::DefinitionRegistry)**: Trait for the persistent record store.

pub mod config;
pub mod constants;
pub mod definition;
pub mod digest;
pub mod error;
pub mod event;
pub mod record;
pub mod services;
pub mod traits;

pub mod prelude {
    pub use super::config::*;
    pub use super::constants::*;
    pub use super::definition::*;
    pub use super::digest::*;
    pub use super::error::*;
    pub use super::event::*;
    pub use super::record::*;
    pub use super::services::*;
    pub use super::traits::*;
}
