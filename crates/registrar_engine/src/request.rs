use crate::ReconciliationEngine;

use bytes::Bytes;
use registrar_core::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// A client request to register a new asset definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDefinitionRequest {
    pub name: String,
    #[serde(rename = "isContentPrivate", default)]
    pub content_private: bool,
    #[serde(rename = "isContentUnique", default)]
    pub content_unique: bool,
    pub author: String,
    #[serde(default)]
    pub description_schema: Option<Value>,
    #[serde(default)]
    pub content_schema: Option<Value>,
    /// Raw index specifications, shape-checked by the engine.
    #[serde(default)]
    pub indexes: Option<Value>,
    /// Only used when the ledger model requires participants.
    #[serde(default)]
    pub participants: Option<Vec<String>>,
    #[serde(skip)]
    pub mode: SubmitMode,
}

impl CreateDefinitionRequest {
    pub fn new(name: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            ..Default::default()
        }
    }
}

impl<S: RegistrarServices> ReconciliationEngine<S> {
    /// Validates a request, writes the definition to the content store, submits its
    /// digest to the ledger and records it as pending.
    ///
    /// Every precondition is checked before the first side effect.
    pub async fn request_definition_creation(
        &self,
        request: CreateDefinitionRequest,
    ) -> Result<DefinitionId, DefinitionError> {
        if request.name.trim().is_empty() {
            return Err(DefinitionError::MissingField("asset definition name"));
        }
        if request.author.trim().is_empty() {
            return Err(DefinitionError::MissingField("author"));
        }

        let validator = self.services.validator();
        if let Some(schema) = &request.description_schema {
            validator
                .validate_schema(schema)
                .map_err(|reason| DefinitionError::InvalidSchema {
                    field: "description schema",
                    reason,
                })?;
        }
        if let Some(schema) = &request.content_schema {
            validator
                .validate_schema(schema)
                .map_err(|reason| DefinitionError::InvalidSchema {
                    field: "content schema",
                    reason,
                })?;
        }
        let indexes = request
            .indexes
            .as_ref()
            .map(|raw| validator.validate_indexes(raw))
            .transpose()
            .map_err(DefinitionError::InvalidIndexSpec)?;

        let registry = self.services.registry();
        if registry.find_by_name(&request.name).await?.is_some() {
            return Err(DefinitionError::NameConflict(request.name));
        }

        let participants = self.resolve_participants(request.participants).await?;

        let definition = AssetDefinition {
            id: DefinitionId::generate(),
            name: request.name,
            content_private: request.content_private,
            content_unique: request.content_unique,
            description_schema: request.description_schema,
            content_schema: request.content_schema,
            indexes,
        };
        let id = definition.id;

        let payload = serde_json::to_vec(&definition).map_err(ContentError::from)?;
        let address = self.services.content().upload(Bytes::from(payload)).await?;
        let digest = ContentDigest::from_address(&address)?;
        debug!(%id, %address, "Asset definition uploaded");

        let outcome = self
            .services
            .ledger()
            .submit(&request.author, &digest, participants.as_deref(), request.mode)
            .await?;

        let name = definition.name.clone();
        let record = DefinitionRecord::pending(
            definition,
            request.author,
            digest,
            outcome.receipt().map(str::to_string),
            participants,
        );
        let stored = registry.record_submission(record).await?;
        if !stored.state.is_pending() {
            debug!(%id, "Confirmation processed before the submission returned");
        }

        info!(%id, name = %name, %digest, "Asset definition submitted");
        Ok(id)
    }

    async fn resolve_participants(
        &self,
        participants: Option<Vec<String>>,
    ) -> Result<Option<Vec<String>>, DefinitionError> {
        if !self.config.ledger_model.requires_participants() {
            return Ok(None);
        }

        let participants = participants
            .filter(|participants| !participants.is_empty())
            .ok_or(DefinitionError::MissingParticipants)?;

        let members = self.services.members();
        for participant in &participants {
            if members.resolve_address(participant).await?.is_none() {
                return Err(DefinitionError::UnknownParticipant(participant.clone()));
            }
        }

        Ok(Some(participants))
    }
}
