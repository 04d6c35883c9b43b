use crate::constants::reasons;
use crate::definition::DefinitionId;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    /// Low-level I/O error.
    /// Maps to **HTTP 500 Internal Server Error**.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    /// Maps to **HTTP 500 Internal Server Error**.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The requested blob does not exist in the store.
    /// Maps to **HTTP 404 Not Found**.
    #[error("Content not found: {0}")]
    NotFound(String),

    /// The content address could not be parsed or uses an unsupported hash.
    /// Maps to **HTTP 400 Bad Request**.
    #[error("Invalid content address: {0}")]
    InvalidAddress(String),

    /// The digest is not 32 bytes of hex.
    /// Maps to **HTTP 400 Bad Request**.
    #[error("Invalid content digest: {0}")]
    InvalidDigest(String),

    /// Generic system or backend-specific failure (e.g., IPFS gateway error).
    /// Maps to **HTTP 500 Internal Server Error**.
    #[error("Content store failure: {0}")]
    System(String),
}

#[derive(Error, Debug)]
pub enum LedgerError {
    /// The ledger refused the submission.
    /// Maps to **HTTP 502 Bad Gateway**.
    #[error("Submission rejected: {0}")]
    Rejected(String),

    /// Transport or signing failure.
    /// Maps to **HTTP 500 Internal Server Error**.
    #[error("Ledger system failure: {0}")]
    System(String),
}

#[derive(Error, Debug)]
pub enum RegistryError {
    /// JSON serialization error.
    /// Maps to **HTTP 500 Internal Server Error**.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A state transition was attempted on a record in a terminal state.
    /// Maps to **HTTP 409 Conflict**.
    #[error("Illegal transition for {id}: {reason}")]
    IllegalTransition { id: DefinitionId, reason: String },

    /// Generic system or backend-specific failure (e.g., database error).
    /// Maps to **HTTP 500 Internal Server Error**.
    #[error("Registry system failure: {0}")]
    System(String),
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    /// Generic system or backend-specific failure.
    /// Maps to **HTTP 500 Internal Server Error**.
    #[error("Member directory failure: {0}")]
    System(String),
}

/// Errors of the two reconciliation operations.
#[derive(Error, Debug)]
pub enum DefinitionError {
    /// A mandatory request field is missing or blank.
    /// Maps to **HTTP 400 Bad Request**.
    #[error("Missing {0}")]
    MissingField(&'static str),

    /// A description or content schema is not a valid JSON schema.
    /// Maps to **HTTP 400 Bad Request**.
    #[error("Invalid {field}: {reason}")]
    InvalidSchema { field: &'static str, reason: String },

    /// The index specifications do not have the expected shape.
    /// Maps to **HTTP 400 Bad Request**.
    #[error("Invalid index specification: {0}")]
    InvalidIndexSpec(String),

    /// A definition with this name already exists.
    /// Maps to **HTTP 409 Conflict**.
    #[error("Asset definition name conflict: {0}")]
    NameConflict(String),

    /// The ledger requires participants but none were given.
    /// Maps to **HTTP 400 Bad Request**.
    #[error("Missing asset participants")]
    MissingParticipants,

    /// A participant is not a registered member.
    /// Maps to **HTTP 400 Bad Request**.
    #[error("One or more participants are not registered: {0}")]
    UnknownParticipant(String),

    /// Content referenced by a confirmation event is not a valid asset definition.
    /// Logged and dropped by the event consumer.
    #[error("Invalid asset definition content: {0}")]
    InvalidDefinitionContent(String),

    /// A second, different confirmation for an already confirmed identifier.
    /// Surfaced to the operator.
    #[error("Asset definition ID conflict: {0}")]
    IdentifierConflict(DefinitionId),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Error taxonomy used to decide how an error is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input, not retried.
    Validation,
    /// Name or identifier already taken at request time.
    Conflict,
    /// Missing or unknown participants.
    Participant,
    /// Immutable content failing validation, dropped.
    MalformedContent,
    /// Two confirmations for one identifier. Fatal.
    InvariantViolation,
    /// A collaborator failed.
    Collaborator,
}

impl DefinitionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField(_) | Self::InvalidSchema { .. } | Self::InvalidIndexSpec(_) => {
                ErrorKind::Validation
            }
            Self::NameConflict(_) => ErrorKind::Conflict,
            Self::MissingParticipants | Self::UnknownParticipant(_) => ErrorKind::Participant,
            Self::InvalidDefinitionContent(_) => ErrorKind::MalformedContent,
            Self::IdentifierConflict(_) => ErrorKind::InvariantViolation,
            Self::Content(_) | Self::Ledger(_) | Self::Registry(_) | Self::Directory(_) => {
                ErrorKind::Collaborator
            }
        }
    }

    /// Machine-readable reason code.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingField(_) => reasons::MISSING_FIELD,
            Self::InvalidSchema { .. } => reasons::INVALID_SCHEMA,
            Self::InvalidIndexSpec(_) => reasons::INVALID_INDEX_SPEC,
            Self::NameConflict(_) => reasons::NAME_CONFLICT,
            Self::MissingParticipants => reasons::MISSING_PARTICIPANTS,
            Self::UnknownParticipant(_) => reasons::UNKNOWN_PARTICIPANT,
            Self::InvalidDefinitionContent(_) => reasons::INVALID_DEFINITION_CONTENT,
            Self::IdentifierConflict(_) => reasons::IDENTIFIER_CONFLICT,
            Self::Content(ContentError::NotFound(_)) => reasons::NOT_FOUND,
            Self::Content(_) | Self::Ledger(_) | Self::Registry(_) | Self::Directory(_) => {
                reasons::INTERNAL
            }
        }
    }
}
