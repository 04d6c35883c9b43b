use crate::definition::{DefinitionId, IndexSpec};
use crate::digest::{ContentAddress, ContentDigest};
use crate::error::*;
use crate::event::{Member, SubmitMode, SubmitOutcome};
use crate::record::DefinitionRecord;

use bytes::Bytes;
use serde_json::Value;

/// A trait for injecting the content-addressed blob store.
///
/// Uploads are idempotent: identical bytes always yield the same address.
pub trait ContentStore: Send + Sync + 'static + Clone {
    /// Stores a blob and returns its content address.
    fn upload(&self, data: Bytes)
    -> impl Future<Output = Result<ContentAddress, ContentError>> + Send;

    /// Reads the blob stored under `address`.
    fn download(
        &self,
        address: &ContentAddress,
    ) -> impl Future<Output = Result<Bytes, ContentError>> + Send;
}

/// A trait for injecting the distributed ledger.
pub trait LedgerGateway: Send + Sync + 'static + Clone {
    /// Submits a definition digest on behalf of `author`.
    ///
    /// `participants` is only [`Some`] when the ledger model requires them.
    fn submit(
        &self,
        author: &str,
        digest: &ContentDigest,
        participants: Option<&[String]>,
        mode: SubmitMode,
    ) -> impl Future<Output = Result<SubmitOutcome, LedgerError>> + Send;
}

/// Result of [`DefinitionRegistry::confirm`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    /// The record is now (or already was, identically) confirmed.
    Confirmed,
    /// The identifier was already confirmed with different ledger coordinates or content.
    AlreadyConfirmed(Box<DefinitionRecord>),
    /// Another identifier holds the name in confirmed state. Nothing was written.
    NameTaken(DefinitionId),
}

/// A trait for injecting the persistent definition store.
///
/// Every method must be safe under concurrent invocation.
pub trait DefinitionRegistry: Send + Sync + 'static + Clone {
    fn find_by_id(
        &self,
        id: &DefinitionId,
    ) -> impl Future<Output = Result<Option<DefinitionRecord>, RegistryError>> + Send;

    /// Looks up a record by name, preferring the confirmed record holding the name
    /// over pending or conflicted ones.
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<DefinitionRecord>, RegistryError>> + Send;

    /// Inserts or replaces the record with the same identifier.
    fn upsert(
        &self,
        record: DefinitionRecord,
    ) -> impl Future<Output = Result<(), RegistryError>> + Send;

    /// Records a submitted pending record.
    ///
    /// If a record for the same identifier already exists, because its confirmation
    /// was processed before the submission returned, its state is kept and only the
    /// missing submission metadata is filled in. Returns the stored record.
    fn record_submission(
        &self,
        record: DefinitionRecord,
    ) -> impl Future<Output = Result<DefinitionRecord, RegistryError>> + Send;

    /// Writes a confirmed record, unless another identifier already holds its name in
    /// confirmed state. The check and the write are atomic per name.
    fn confirm(
        &self,
        record: DefinitionRecord,
    ) -> impl Future<Output = Result<ConfirmOutcome, RegistryError>> + Send;

    /// Moves an existing record to the conflicted state.
    ///
    /// Returns `false` if no record exists for `id`. Fails on confirmed records.
    fn mark_conflicted(
        &self,
        id: &DefinitionId,
        timestamp: i64,
    ) -> impl Future<Output = Result<bool, RegistryError>> + Send;

    /// Creates an instance collection with its indexes. Idempotent.
    ///
    /// Returns `true` if the collection was created by this call.
    fn create_collection(
        &self,
        name: &str,
        indexes: &[IndexSpec],
    ) -> impl Future<Output = Result<bool, RegistryError>> + Send;

    /// Lists records, most recently submitted first.
    fn list(
        &self,
        skip: usize,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<DefinitionRecord>, RegistryError>> + Send;

    fn count(&self) -> impl Future<Output = Result<usize, RegistryError>> + Send;
}

/// A trait for resolving ledger member addresses.
pub trait MemberDirectory: Send + Sync + 'static + Clone {
    fn resolve_address(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Option<Member>, DirectoryError>> + Send;
}

/// A process-wide, side-effect-free validation service.
pub trait SchemaValidator: Send + Sync + 'static + Clone {
    /// Checks that `schema` is a structurally valid schema document.
    fn validate_schema(&self, schema: &Value) -> Result<(), String>;

    /// Parses and checks a list of index specifications.
    fn validate_indexes(&self, indexes: &Value) -> Result<Vec<IndexSpec>, String> {
        let specs: Vec<IndexSpec> =
            serde_json::from_value(indexes.clone()).map_err(|e| e.to_string())?;

        for (i, spec) in specs.iter().enumerate() {
            if spec.fields.is_empty() {
                return Err(format!("index {i} has no fields"));
            }
            if spec.fields.iter().any(|field| field.trim().is_empty()) {
                return Err(format!("index {i} has an empty field name"));
            }
        }

        Ok(specs)
    }
}

/// A [`MemberDirectory`] that knows no members, for broadcast ledgers.
#[derive(Clone, Debug, Default)]
pub struct NoMemberDirectory;

impl MemberDirectory for NoMemberDirectory {
    async fn resolve_address(&self, _address: &str) -> Result<Option<Member>, DirectoryError> {
        Ok(None)
    }
}
