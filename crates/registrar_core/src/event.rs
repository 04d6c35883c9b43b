use crate::digest::ContentDigest;
use crate::record::LedgerConfirmation;

use serde::{Deserialize, Serialize};

/// The fields of a ledger "asset definition created" event consumed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionConfirmed {
    pub content_digest: ContentDigest,
    pub author: String,
    /// Unix seconds.
    pub timestamp: i64,
    pub block_number: u64,
    pub transaction_hash: String,
}

impl DefinitionConfirmed {
    pub fn confirmation(&self) -> LedgerConfirmation {
        LedgerConfirmation {
            timestamp: self.timestamp,
            block_number: self.block_number,
            transaction_hash: self.transaction_hash.clone(),
        }
    }
}

/// How a submission should be sent to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmitMode {
    /// Wait for the ledger to accept the transaction.
    Sync,
    /// Return a receipt handle immediately.
    #[default]
    Async,
}

/// The result of [`LedgerGateway::submit`](crate::traits::LedgerGateway::submit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmitOutcome {
    /// Accepted asynchronously. The handle correlates later receipts.
    Receipt(String),
    /// Completed synchronously.
    Confirmed,
}

impl SubmitOutcome {
    pub fn receipt(&self) -> Option<&str> {
        match self {
            Self::Receipt(handle) => Some(handle),
            Self::Confirmed => None,
        }
    }
}

/// A registered member of the ledger network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub address: String,
    pub name: String,
}
