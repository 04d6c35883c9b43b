//! # Registrar Memory
//!
//! In-memory implementations of every registrar collaborator.
//!
//! **WARNING**: Nothing is persisted. Meant for development, demos and tests.
//!
//! ## Usage
//!
//! ```rust
//! # use registrar_memory::*;
//! let registry = MemoryRegistry::default();
//! let content = MemoryContentStore::default();
//! let members = MemoryMemberDirectory::default();
//! let (ledger, events) = MemoryLedger::with_events();
//! # drop((registry, content, members, ledger, events));
//! ```

mod content;
mod ledger;
mod members;
mod registry;

pub use content::MemoryContentStore;
pub use ledger::{LedgerSubmission, MemoryLedger};
pub use members::MemoryMemberDirectory;
pub use registry::MemoryRegistry;
