use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::constants::{COLLECTION_PREFIX, INSTANCE_ID_FIELD};

/// Globally unique identifier of an asset definition, generated at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefinitionId(Uuid);

impl DefinitionId {
    /// Generates a fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Name of the instance collection owned by this definition.
    pub fn collection_name(&self) -> String {
        self.collection_name_with(COLLECTION_PREFIX)
    }

    pub fn collection_name_with(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.0)
    }
}

impl From<Uuid> for DefinitionId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for DefinitionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An index declared on the instance collection of a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexSpec {
    /// Ordered list of indexed field names. Never empty.
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
}

impl IndexSpec {
    /// The unique index on the instance identifier every collection carries.
    pub fn instance_id() -> Self {
        Self {
            fields: vec![INSTANCE_ID_FIELD.to_string()],
            unique: Some(true),
        }
    }

    pub fn is_unique(&self) -> bool {
        self.unique.unwrap_or(false)
    }
}

/// The canonical asset definition payload.
///
/// This is exactly what gets written to the content store and referenced on the ledger,
/// so the field names are part of the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetDefinition {
    #[serde(rename = "assetDefinitionID")]
    pub id: DefinitionId,
    pub name: String,
    #[serde(rename = "isContentPrivate")]
    pub content_private: bool,
    #[serde(rename = "isContentUnique")]
    pub content_unique: bool,
    #[serde(
        rename = "descriptionSchema",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description_schema: Option<Value>,
    #[serde(
        rename = "contentSchema",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexes: Option<Vec<IndexSpec>>,
}

impl AssetDefinition {
    /// The full index set of the instance collection: the mandatory instance id index
    /// followed by every declared index.
    pub fn collection_indexes(&self) -> Vec<IndexSpec> {
        std::iter::once(IndexSpec::instance_id())
            .chain(self.indexes.iter().flatten().cloned())
            .collect()
    }
}
