use crate::ReconciliationEngine;

use registrar_core::prelude::*;
use tracing::{debug, error, info, warn};

/// What a confirmation event did to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The definition is now the confirmed definition for its name.
    Finalized(DefinitionId),
    /// The event was already applied. Nothing changed.
    Redelivered(DefinitionId),
    /// The definition lost its name to `winner` and is marked conflicted.
    Conflicted {
        id: DefinitionId,
        winner: DefinitionId,
    },
}

impl<S: RegistrarServices> ReconciliationEngine<S> {
    /// Applies a ledger confirmation event.
    ///
    /// The first confirmed definition for a name wins. Later confirmations for the same
    /// name end conflicted, redelivered events are no-ops, and a different confirmation
    /// for an already confirmed identifier fails with
    /// [`DefinitionError::IdentifierConflict`].
    ///
    /// The record is confirmed before its instance collection is provisioned. If
    /// provisioning fails, the error is returned with the record left confirmed, and
    /// redelivering the same event provisions the collection.
    pub async fn handle_definition_confirmed(
        &self,
        event: DefinitionConfirmed,
    ) -> Result<Reconciliation, DefinitionError> {
        let definition = self.fetch_definition(&event.content_digest).await?;
        let id = definition.id;
        let registry = self.services.registry();

        if let Some(existing) = registry.find_by_id(&id).await? {
            match &existing.state {
                DefinitionState::Confirmed(confirmation) => {
                    if existing.content_digest == event.content_digest
                        && confirmation.transaction_hash == event.transaction_hash
                    {
                        self.provision_collection(&existing.definition).await?;
                        debug!(%id, "Confirmation already applied");
                        return Ok(Reconciliation::Redelivered(id));
                    }
                    error!(
                        %id,
                        confirmed_tx = %confirmation.transaction_hash,
                        event_tx = %event.transaction_hash,
                        "Asset definition ID conflict"
                    );
                    return Err(DefinitionError::IdentifierConflict(id));
                }
                DefinitionState::Conflicted { .. } => {
                    debug!(%id, "Conflicted definition confirmed again");
                    return Ok(Reconciliation::Redelivered(id));
                }
                DefinitionState::Pending => {}
            }
        } else if let Some(holder) = registry.find_by_name(&definition.name).await? {
            if holder.state.is_confirmed() {
                return self.conflict(definition, &event, holder.id()).await;
            }
            // The holder is only pending: its own event will find the name taken.
        }

        self.finalize(definition, event).await
    }

    async fn fetch_definition(
        &self,
        digest: &ContentDigest,
    ) -> Result<AssetDefinition, DefinitionError> {
        let data = self.services.content().download(&digest.to_address()).await?;

        let definition: AssetDefinition = serde_json::from_slice(&data)
            .map_err(|e| DefinitionError::InvalidDefinitionContent(e.to_string()))?;

        if definition.name.trim().is_empty() {
            return Err(DefinitionError::InvalidDefinitionContent(
                "empty name".to_string(),
            ));
        }

        let validator = self.services.validator();
        for schema in [&definition.description_schema, &definition.content_schema]
            .into_iter()
            .flatten()
        {
            validator
                .validate_schema(schema)
                .map_err(DefinitionError::InvalidDefinitionContent)?;
        }

        for spec in definition.indexes.iter().flatten() {
            if spec.fields.is_empty() || spec.fields.iter().any(|f| f.trim().is_empty()) {
                return Err(DefinitionError::InvalidDefinitionContent(format!(
                    "malformed index {:?}",
                    spec.fields
                )));
            }
        }

        Ok(definition)
    }

    async fn finalize(
        &self,
        definition: AssetDefinition,
        event: DefinitionConfirmed,
    ) -> Result<Reconciliation, DefinitionError> {
        let id = definition.id;
        let record = DefinitionRecord {
            definition: definition.clone(),
            author: event.author.clone(),
            content_digest: event.content_digest,
            submitted: None,
            receipt: None,
            participants: None,
            state: DefinitionState::Confirmed(event.confirmation()),
        };

        match self.services.registry().confirm(record).await? {
            ConfirmOutcome::Confirmed => {
                if let Err(e) = self.provision_collection(&definition).await {
                    error!(
                        %id,
                        tx = %event.transaction_hash,
                        "Confirmed without instance collection, event needs redelivery: {e}"
                    );
                    return Err(e);
                }
                info!(
                    %id,
                    name = %definition.name,
                    block = event.block_number,
                    tx = %event.transaction_hash,
                    "Asset definition confirmed"
                );
                Ok(Reconciliation::Finalized(id))
            }
            ConfirmOutcome::NameTaken(winner) => self.conflict(definition, &event, winner).await,
            ConfirmOutcome::AlreadyConfirmed(existing) => {
                error!(
                    %id,
                    confirmed_tx = ?existing.state.confirmation().map(|c| &c.transaction_hash),
                    event_tx = %event.transaction_hash,
                    "Asset definition ID conflict"
                );
                Err(DefinitionError::IdentifierConflict(id))
            }
        }
    }

    async fn conflict(
        &self,
        definition: AssetDefinition,
        event: &DefinitionConfirmed,
        winner: DefinitionId,
    ) -> Result<Reconciliation, DefinitionError> {
        let id = definition.id;
        let registry = self.services.registry();

        if !registry.mark_conflicted(&id, event.timestamp).await? {
            // Created elsewhere, keep the losing definition for the record.
            registry
                .upsert(DefinitionRecord {
                    definition,
                    author: event.author.clone(),
                    content_digest: event.content_digest,
                    submitted: None,
                    receipt: None,
                    participants: None,
                    state: DefinitionState::Conflicted {
                        timestamp: event.timestamp,
                    },
                })
                .await?;
        }

        warn!(%id, %winner, tx = %event.transaction_hash, "Asset definition name conflict");
        Ok(Reconciliation::Conflicted { id, winner })
    }

    async fn provision_collection(&self, definition: &AssetDefinition) -> Result<(), DefinitionError> {
        let name = definition
            .id
            .collection_name_with(&self.config.collection_prefix);
        let created = self
            .services
            .registry()
            .create_collection(&name, &definition.collection_indexes())
            .await?;
        if created {
            debug!(collection = %name, "Instance collection created");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CreateDefinitionRequest;
    use crate::testing::*;
    use bytes::Bytes;
    use serde_json::json;

    fn remote_event(digest: ContentDigest, tx: &str) -> DefinitionConfirmed {
        DefinitionConfirmed {
            content_digest: digest,
            author: "0xremote".into(),
            timestamp: 1_700_000_000,
            block_number: 99,
            transaction_hash: tx.into(),
        }
    }

    async fn upload<T: serde::Serialize>(
        engine: &ReconciliationEngine<MemoryServices>,
        value: &T,
    ) -> ContentDigest {
        let address = engine
            .services()
            .content
            .upload(Bytes::from(serde_json::to_vec(value).unwrap()))
            .await
            .unwrap();
        ContentDigest::from_address(&address).unwrap()
    }

    #[tokio::test]
    async fn test_confirmation_finalizes_pending() {
        let engine = engine(EngineConfig::default());
        let mut request = CreateDefinitionRequest::new("widget", "A");
        request.content_unique = true;
        let id = engine.request_definition_creation(request).await.unwrap();

        let event = event_for(&engine, &id).await;
        let outcome = engine.handle_definition_confirmed(event.clone()).await.unwrap();
        assert_eq!(outcome, Reconciliation::Finalized(id));

        let record = engine.get(&id).await.unwrap().unwrap();
        assert_eq!(record.state, DefinitionState::Confirmed(event.confirmation()));
        assert_eq!(record.content_digest, event.content_digest);
        assert!(record.submitted.is_some());
        assert!(record.receipt.is_some());

        let indexes = engine
            .services()
            .registry
            .collection(&id.collection_name())
            .await
            .unwrap();
        assert_eq!(indexes, vec![IndexSpec::instance_id()]);
    }

    #[tokio::test]
    async fn test_declared_indexes_are_provisioned() {
        let engine = engine(EngineConfig::default());
        let mut request = CreateDefinitionRequest::new("widget", "A");
        request.indexes = Some(json!([{"fields": ["owner", "serial"], "unique": true}]));
        let id = engine.request_definition_creation(request).await.unwrap();

        let event = event_for(&engine, &id).await;
        engine.handle_definition_confirmed(event).await.unwrap();

        let indexes = engine
            .services()
            .registry
            .collection(&id.collection_name())
            .await
            .unwrap();
        assert_eq!(indexes.len(), 2);
        assert_eq!(indexes[1].fields, vec!["owner", "serial"]);
    }

    #[tokio::test]
    async fn test_redelivery_is_noop() {
        let engine = engine(EngineConfig::default());
        let id = engine
            .request_definition_creation(CreateDefinitionRequest::new("widget", "A"))
            .await
            .unwrap();
        let event = event_for(&engine, &id).await;

        engine.handle_definition_confirmed(event.clone()).await.unwrap();
        let before = engine.get(&id).await.unwrap().unwrap();

        let outcome = engine.handle_definition_confirmed(event).await.unwrap();
        assert_eq!(outcome, Reconciliation::Redelivered(id));
        assert_eq!(engine.get(&id).await.unwrap().unwrap(), before);
        assert_eq!(engine.services().registry.collection_count().await, 1);
    }

    #[tokio::test]
    async fn test_second_confirmation_for_identifier_is_rejected() {
        let engine = engine(EngineConfig::default());
        let id = engine
            .request_definition_creation(CreateDefinitionRequest::new("widget", "A"))
            .await
            .unwrap();
        let event = event_for(&engine, &id).await;
        engine.handle_definition_confirmed(event.clone()).await.unwrap();
        let before = engine.get(&id).await.unwrap().unwrap();

        let mut replay = event;
        replay.transaction_hash = "0xother".into();
        let err = engine.handle_definition_confirmed(replay).await.unwrap_err();
        assert!(matches!(err, DefinitionError::IdentifierConflict(conflict) if conflict == id));
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        assert_eq!(engine.get(&id).await.unwrap().unwrap(), before);
    }

    #[tokio::test]
    async fn test_name_race_first_confirmation_wins() {
        let engine = engine(EngineConfig::default());

        let x = engine
            .request_definition_creation(CreateDefinitionRequest::new("widget", "A"))
            .await
            .unwrap();
        let y = racing_request(&engine, "widget", "B").await;

        let event_x = event_for(&engine, &x).await;
        let event_y = event_for(&engine, &y).await;

        assert_eq!(
            engine.handle_definition_confirmed(event_y).await.unwrap(),
            Reconciliation::Finalized(y)
        );
        assert_eq!(
            engine.handle_definition_confirmed(event_x.clone()).await.unwrap(),
            Reconciliation::Conflicted { id: x, winner: y }
        );

        let loser = engine.get(&x).await.unwrap().unwrap();
        assert_eq!(
            loser.state,
            DefinitionState::Conflicted {
                timestamp: event_x.timestamp
            }
        );
        let winner = engine.get(&y).await.unwrap().unwrap();
        assert!(winner.state.is_confirmed());
        assert!(engine
            .services()
            .registry
            .collection(&x.collection_name())
            .await
            .is_none());

        // The loser's event again changes nothing.
        assert_eq!(
            engine.handle_definition_confirmed(event_x).await.unwrap(),
            Reconciliation::Redelivered(x)
        );
    }

    #[tokio::test]
    async fn test_name_race_any_delivery_order() {
        for reversed in [false, true] {
            let engine = engine(EngineConfig::default());
            let x = racing_request(&engine, "widget", "A").await;
            let y = racing_request(&engine, "widget", "B").await;

            let mut events = vec![event_for(&engine, &x).await, event_for(&engine, &y).await];
            if reversed {
                events.reverse();
            }
            for event in events {
                engine.handle_definition_confirmed(event).await.unwrap();
            }

            let x = engine.get(&x).await.unwrap().unwrap();
            let y = engine.get(&y).await.unwrap().unwrap();
            let (first, second) = if reversed { (y, x) } else { (x, y) };
            assert!(first.state.is_confirmed());
            assert!(second.state.is_conflicted());
        }
    }

    #[tokio::test]
    async fn test_remote_definition_is_finalized() {
        let engine = engine(EngineConfig::default());
        let definition = AssetDefinition {
            id: DefinitionId::generate(),
            name: "remote".into(),
            content_private: true,
            content_unique: false,
            description_schema: None,
            content_schema: Some(json!({"type": "object"})),
            indexes: None,
        };
        let digest = upload(&engine, &definition).await;

        let outcome = engine
            .handle_definition_confirmed(remote_event(digest, "0xabc"))
            .await
            .unwrap();
        assert_eq!(outcome, Reconciliation::Finalized(definition.id));

        let record = engine.get(&definition.id).await.unwrap().unwrap();
        assert_eq!(record.author, "0xremote");
        assert_eq!(record.submitted, None);
        assert_eq!(record.definition, definition);
    }

    #[tokio::test]
    async fn test_remote_definition_beats_local_pending() {
        let engine = engine(EngineConfig::default());
        let local = engine
            .request_definition_creation(CreateDefinitionRequest::new("widget", "A"))
            .await
            .unwrap();

        let remote = AssetDefinition {
            id: DefinitionId::generate(),
            name: "widget".into(),
            content_private: false,
            content_unique: false,
            description_schema: None,
            content_schema: None,
            indexes: None,
        };
        let digest = upload(&engine, &remote).await;
        assert_eq!(
            engine
                .handle_definition_confirmed(remote_event(digest, "0xremote-tx"))
                .await
                .unwrap(),
            Reconciliation::Finalized(remote.id)
        );

        // The local pending record is untouched until its own event arrives.
        let pending = engine.get(&local).await.unwrap().unwrap();
        assert!(pending.state.is_pending());

        let event = event_for(&engine, &local).await;
        assert_eq!(
            engine.handle_definition_confirmed(event).await.unwrap(),
            Reconciliation::Conflicted {
                id: local,
                winner: remote.id
            }
        );
    }

    #[tokio::test]
    async fn test_remote_loser_is_recorded_conflicted() {
        let engine = engine(EngineConfig::default());
        let id = engine
            .request_definition_creation(CreateDefinitionRequest::new("widget", "A"))
            .await
            .unwrap();
        engine
            .handle_definition_confirmed(event_for(&engine, &id).await)
            .await
            .unwrap();

        let remote = AssetDefinition {
            id: DefinitionId::generate(),
            name: "widget".into(),
            content_private: false,
            content_unique: true,
            description_schema: None,
            content_schema: None,
            indexes: None,
        };
        let digest = upload(&engine, &remote).await;
        let outcome = engine
            .handle_definition_confirmed(remote_event(digest, "0xlate"))
            .await
            .unwrap();
        assert_eq!(outcome, Reconciliation::Conflicted { id: remote.id, winner: id });

        let record = engine.get(&remote.id).await.unwrap().unwrap();
        assert!(record.state.is_conflicted());
    }

    #[tokio::test]
    async fn test_malformed_content_mutates_nothing() {
        let engine = engine(EngineConfig::default());

        let digest = upload(&engine, &json!({"name": "widget", "color": "blue"})).await;
        let err = engine
            .handle_definition_confirmed(remote_event(digest, "0x1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedContent);

        let digest = upload(
            &engine,
            &json!({
                "assetDefinitionID": DefinitionId::generate().to_string(),
                "name": "widget",
                "isContentPrivate": false,
                "isContentUnique": false,
                "contentSchema": {"type": "banana"}
            }),
        )
        .await;
        let err = engine
            .handle_definition_confirmed(remote_event(digest, "0x2"))
            .await
            .unwrap_err();
        assert!(matches!(err, DefinitionError::InvalidDefinitionContent(_)));

        assert_eq!(engine.count().await.unwrap(), 0);
        assert_eq!(engine.services().registry.collection_count().await, 0);
    }

    #[tokio::test]
    async fn test_missing_content_is_collaborator_error() {
        let engine = engine(EngineConfig::default());
        let err = engine
            .handle_definition_confirmed(remote_event(ContentDigest::of(b"absent"), "0x1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Collaborator);
        assert_eq!(engine.count().await.unwrap(), 0);
    }

    /// A registry whose collection provisioning can be switched off.
    #[derive(Clone, Default)]
    struct UnprovisionedRegistry {
        inner: registrar_memory::MemoryRegistry,
        failing: std::sync::Arc<std::sync::atomic::AtomicBool>,
    }

    impl DefinitionRegistry for UnprovisionedRegistry {
        async fn find_by_id(&self, id: &DefinitionId) -> Result<Option<DefinitionRecord>, RegistryError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<DefinitionRecord>, RegistryError> {
            self.inner.find_by_name(name).await
        }

        async fn upsert(&self, record: DefinitionRecord) -> Result<(), RegistryError> {
            self.inner.upsert(record).await
        }

        async fn record_submission(&self, record: DefinitionRecord) -> Result<DefinitionRecord, RegistryError> {
            self.inner.record_submission(record).await
        }

        async fn confirm(&self, record: DefinitionRecord) -> Result<ConfirmOutcome, RegistryError> {
            self.inner.confirm(record).await
        }

        async fn mark_conflicted(&self, id: &DefinitionId, timestamp: i64) -> Result<bool, RegistryError> {
            self.inner.mark_conflicted(id, timestamp).await
        }

        async fn create_collection(&self, name: &str, indexes: &[IndexSpec]) -> Result<bool, RegistryError> {
            if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(RegistryError::System("collection store unavailable".into()));
            }
            self.inner.create_collection(name, indexes).await
        }

        async fn list(&self, skip: usize, limit: usize) -> Result<Vec<DefinitionRecord>, RegistryError> {
            self.inner.list(skip, limit).await
        }

        async fn count(&self) -> Result<usize, RegistryError> {
            self.inner.count().await
        }
    }

    #[tokio::test]
    async fn test_redelivery_provisions_missing_collection() {
        let registry = UnprovisionedRegistry::default();
        let ledger = registrar_memory::MemoryLedger::default();
        let services = CoreServices {
            content: registrar_memory::MemoryContentStore::default(),
            ledger: ledger.clone(),
            registry: registry.clone(),
            members: NoMemberDirectory,
            validator: crate::JsonSchemaValidator,
        };
        let engine = ReconciliationEngine::new(services, EngineConfig::default());

        let id = engine
            .request_definition_creation(CreateDefinitionRequest::new("widget", "A"))
            .await
            .unwrap();
        let record = engine.get(&id).await.unwrap().unwrap();
        let event = ledger.event_for(&record.content_digest).await.unwrap();

        registry.failing.store(true, std::sync::atomic::Ordering::SeqCst);
        let err = engine.handle_definition_confirmed(event.clone()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Collaborator);
        assert!(engine.get(&id).await.unwrap().unwrap().state.is_confirmed());
        assert_eq!(registry.inner.collection_count().await, 0);

        registry.failing.store(false, std::sync::atomic::Ordering::SeqCst);
        let outcome = engine.handle_definition_confirmed(event).await.unwrap();
        assert_eq!(outcome, Reconciliation::Redelivered(id));
        assert!(registry.inner.collection(&id.collection_name()).await.is_some());
    }
}
