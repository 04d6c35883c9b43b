use crate::constants::COLLECTION_PREFIX;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the ledger distributes transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerModel {
    /// Every transaction is visible to every member (e.g., Ethereum).
    #[default]
    Broadcast,
    /// Transactions only reach explicitly listed participants (e.g., Corda).
    Participants,
}

impl LedgerModel {
    pub fn requires_participants(&self) -> bool {
        matches!(self, Self::Participants)
    }
}

impl FromStr for LedgerModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "broadcast" | "ethereum" => Ok(Self::Broadcast),
            "participants" | "corda" => Ok(Self::Participants),
            other => Err(format!("unknown ledger model '{other}'")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Decides whether requests must name their participants.
    ///
    /// Defaults to [`LedgerModel::Broadcast`].
    pub ledger_model: LedgerModel,
    /// Prefix of instance collection names.
    ///
    /// Defaults to `asset-definition-`.
    pub collection_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ledger_model: LedgerModel::default(),
            collection_prefix: COLLECTION_PREFIX.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_ledger_model(mut self, ledger_model: LedgerModel) -> Self {
        self.ledger_model = ledger_model;
        self
    }
}
