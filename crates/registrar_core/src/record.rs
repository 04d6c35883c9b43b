use crate::definition::{AssetDefinition, DefinitionId};
use crate::digest::ContentDigest;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ledger coordinates of the event that confirmed a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerConfirmation {
    /// Event timestamp in unix seconds.
    pub timestamp: i64,
    pub block_number: u64,
    pub transaction_hash: String,
}

/// Lifecycle state of a [`DefinitionRecord`].
///
/// `Pending -> Confirmed | Conflicted`, both terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DefinitionState {
    /// Submitted to the ledger, waiting for its confirmation event.
    Pending,
    /// Confirmed on the ledger. The active definition for its name.
    Confirmed(LedgerConfirmation),
    /// Lost the race for its name against a definition that confirmed first.
    Conflicted {
        /// Timestamp of the losing confirmation event.
        timestamp: i64,
    },
}

impl DefinitionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }

    pub fn is_conflicted(&self) -> bool {
        matches!(self, Self::Conflicted { .. })
    }

    pub fn confirmation(&self) -> Option<&LedgerConfirmation> {
        match self {
            Self::Confirmed(confirmation) => Some(confirmation),
            _ => None,
        }
    }
}

/// The registry's mutable projection of an [`AssetDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionRecord {
    #[serde(flatten)]
    pub definition: AssetDefinition,
    pub author: String,
    pub content_digest: ContentDigest,
    /// When the local request was accepted. [`None`] for definitions created elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted: Option<DateTime<Utc>>,
    /// Opaque ledger handle of an asynchronous submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<String>>,
    #[serde(flatten)]
    pub state: DefinitionState,
}

impl DefinitionRecord {
    /// A freshly submitted, locally requested definition.
    pub fn pending(
        definition: AssetDefinition,
        author: String,
        content_digest: ContentDigest,
        receipt: Option<String>,
        participants: Option<Vec<String>>,
    ) -> Self {
        Self {
            definition,
            author,
            content_digest,
            submitted: Some(Utc::now()),
            receipt,
            participants,
            state: DefinitionState::Pending,
        }
    }

    pub fn id(&self) -> DefinitionId {
        self.definition.id
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }
}
