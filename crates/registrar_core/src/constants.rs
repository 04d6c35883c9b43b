/// Prefix of the per-definition instance collection, followed by the definition id.
pub const COLLECTION_PREFIX: &str = "asset-definition-";

/// Field every asset instance carries, indexed uniquely in its collection.
pub const INSTANCE_ID_FIELD: &str = "assetInstanceID";

pub mod routes {
    pub const HEALTH: &str = "/health";

    pub const DEFINITIONS: &str = "/asset-definitions";
    pub const DEFINITIONS_COUNT: &str = "/asset-definitions/count";
    pub const DEFINITION_BY_ID: &str = "/asset-definitions/{id}";
}

pub mod reasons {
    pub const MISSING_FIELD: &str = "missing_field";
    pub const INVALID_SCHEMA: &str = "invalid_schema";
    pub const INVALID_INDEX_SPEC: &str = "invalid_index_spec";
    pub const NAME_CONFLICT: &str = "name_conflict";
    pub const MISSING_PARTICIPANTS: &str = "missing_participants";
    pub const UNKNOWN_PARTICIPANT: &str = "unknown_participant";
    pub const INVALID_DEFINITION_CONTENT: &str = "invalid_definition_content";
    pub const IDENTIFIER_CONFLICT: &str = "identifier_conflict";
    pub const INVALID_ID: &str = "invalid_id";
    pub const NOT_FOUND: &str = "not_found";
    pub const INTERNAL: &str = "internal";
}
