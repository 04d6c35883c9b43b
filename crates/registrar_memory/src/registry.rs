use registrar_core::prelude::*;

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct RegistryState {
    records: HashMap<DefinitionId, DefinitionRecord>,
    collections: HashMap<String, Vec<IndexSpec>>,
}

impl RegistryState {
    fn confirmed_holder(&self, name: &str) -> Option<&DefinitionRecord> {
        self.records
            .values()
            .find(|record| record.name() == name && record.state.is_confirmed())
    }
}

/// A [`DefinitionRegistry`] kept in process memory.
///
/// All mutations take the single write lock, which makes the confirm check-then-write
/// atomic per name.
#[derive(Clone, Default)]
pub struct MemoryRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl MemoryRegistry {
    /// Index set of a provisioned collection.
    pub async fn collection(&self, name: &str) -> Option<Vec<IndexSpec>> {
        self.state.read().await.collections.get(name).cloned()
    }

    pub async fn collection_count(&self) -> usize {
        self.state.read().await.collections.len()
    }
}

impl DefinitionRegistry for MemoryRegistry {
    async fn find_by_id(&self, id: &DefinitionId) -> Result<Option<DefinitionRecord>, RegistryError> {
        Ok(self.state.read().await.records.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<DefinitionRecord>, RegistryError> {
        let state = self.state.read().await;
        if let Some(record) = state.confirmed_holder(name) {
            return Ok(Some(record.clone()));
        }

        Ok(state
            .records
            .values()
            .filter(|record| record.name() == name)
            .min_by_key(|record| (record.submitted, record.id()))
            .cloned())
    }

    async fn upsert(&self, mut record: DefinitionRecord) -> Result<(), RegistryError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.records.get(&record.id()) {
            if !existing.state.is_pending() && existing.state != record.state {
                return Err(RegistryError::IllegalTransition {
                    id: record.id(),
                    reason: "record is in a terminal state".into(),
                });
            }
            record.submitted = record.submitted.or(existing.submitted);
            if record.receipt.is_none() {
                record.receipt = existing.receipt.clone();
            }
            if record.participants.is_none() {
                record.participants = existing.participants.clone();
            }
        }
        state.records.insert(record.id(), record);
        Ok(())
    }

    async fn record_submission(&self, record: DefinitionRecord) -> Result<DefinitionRecord, RegistryError> {
        let mut state = self.state.write().await;
        let id = record.id();

        let Some(existing) = state.records.get_mut(&id) else {
            state.records.insert(id, record.clone());
            return Ok(record);
        };

        if existing.content_digest != record.content_digest {
            return Err(RegistryError::IllegalTransition {
                id,
                reason: "stored record has different content".into(),
            });
        }

        existing.submitted = existing.submitted.or(record.submitted);
        if existing.receipt.is_none() {
            existing.receipt = record.receipt;
        }
        if existing.participants.is_none() {
            existing.participants = record.participants;
        }
        debug!(%id, "Submission merged into existing record");
        Ok(existing.clone())
    }

    async fn confirm(&self, mut record: DefinitionRecord) -> Result<ConfirmOutcome, RegistryError> {
        let id = record.id();
        let Some(confirmation) = record.state.confirmation().cloned() else {
            return Err(RegistryError::IllegalTransition {
                id,
                reason: "confirm requires a confirmed state".into(),
            });
        };

        let mut state = self.state.write().await;

        if let Some(holder) = state.confirmed_holder(record.name()) {
            if holder.id() != id {
                return Ok(ConfirmOutcome::NameTaken(holder.id()));
            }
        }

        if let Some(existing) = state.records.get(&id) {
            match &existing.state {
                DefinitionState::Confirmed(current) => {
                    if current == &confirmation && existing.content_digest == record.content_digest
                    {
                        return Ok(ConfirmOutcome::Confirmed);
                    }
                    return Ok(ConfirmOutcome::AlreadyConfirmed(Box::new(existing.clone())));
                }
                DefinitionState::Conflicted { .. } => {
                    return Err(RegistryError::IllegalTransition {
                        id,
                        reason: "conflicted records cannot be confirmed".into(),
                    });
                }
                DefinitionState::Pending => {
                    record.submitted = record.submitted.or(existing.submitted);
                    record.receipt = record.receipt.take().or_else(|| existing.receipt.clone());
                    record.participants = record
                        .participants
                        .take()
                        .or_else(|| existing.participants.clone());
                }
            }
        }

        debug!(%id, block = confirmation.block_number, "Record confirmed");
        state.records.insert(id, record);
        Ok(ConfirmOutcome::Confirmed)
    }

    async fn mark_conflicted(&self, id: &DefinitionId, timestamp: i64) -> Result<bool, RegistryError> {
        let mut state = self.state.write().await;
        let Some(record) = state.records.get_mut(id) else {
            return Ok(false);
        };

        match record.state {
            DefinitionState::Confirmed(_) => Err(RegistryError::IllegalTransition {
                id: *id,
                reason: "confirmed records cannot be marked conflicted".into(),
            }),
            DefinitionState::Conflicted { .. } => Ok(true),
            DefinitionState::Pending => {
                record.state = DefinitionState::Conflicted { timestamp };
                Ok(true)
            }
        }
    }

    async fn create_collection(&self, name: &str, indexes: &[IndexSpec]) -> Result<bool, RegistryError> {
        let mut state = self.state.write().await;
        if state.collections.contains_key(name) {
            return Ok(false);
        }
        state.collections.insert(name.to_string(), indexes.to_vec());
        Ok(true)
    }

    async fn list(&self, skip: usize, limit: usize) -> Result<Vec<DefinitionRecord>, RegistryError> {
        let state = self.state.read().await;
        let mut records: Vec<_> = state.records.values().cloned().collect();
        records.sort_by(|a, b| b.submitted.cmp(&a.submitted).then(a.id().cmp(&b.id())));
        Ok(records.into_iter().skip(skip).take(limit).collect())
    }

    async fn count(&self) -> Result<usize, RegistryError> {
        Ok(self.state.read().await.records.len())
    }
}
