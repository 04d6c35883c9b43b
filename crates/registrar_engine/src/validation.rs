use registrar_core::traits::SchemaValidator;

use serde_json::Value;

/// Validates schemas against the JSON Schema meta-schema.
#[derive(Clone, Debug, Default)]
pub struct JsonSchemaValidator;

impl SchemaValidator for JsonSchemaValidator {
    fn validate_schema(&self, schema: &Value) -> Result<(), String> {
        if !schema.is_object() {
            return Err("schema must be a JSON object".to_string());
        }
        jsonschema::meta::validate(schema).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_schema() {
        let schema = json!({
            "type": "object",
            "required": ["serial"],
            "properties": { "serial": { "type": "string" } }
        });
        assert!(JsonSchemaValidator.validate_schema(&schema).is_ok());
    }

    #[test]
    fn test_invalid_schema() {
        let validator = JsonSchemaValidator;
        assert!(validator.validate_schema(&json!({"type": "banana"})).is_err());
        assert!(validator.validate_schema(&json!({"required": "serial"})).is_err());
        assert!(validator.validate_schema(&json!("object")).is_err());
    }

    #[test]
    fn test_declared_draft() {
        let validator = JsonSchemaValidator;

        let draft7 = json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "definitions": { "serial": { "type": "string", "minLength": 1 } },
            "properties": { "serial": { "$ref": "#/definitions/serial" } }
        });
        assert!(validator.validate_schema(&draft7).is_ok());

        let draft7 = json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "minLength": -1
        });
        assert!(validator.validate_schema(&draft7).is_err());
    }

    #[test]
    fn test_index_shape() {
        let validator = JsonSchemaValidator;

        let specs = validator
            .validate_indexes(&json!([{"fields": ["owner"], "unique": true}, {"fields": ["a", "b"]}]))
            .unwrap();
        assert_eq!(specs.len(), 2);
        assert!(specs[0].is_unique());

        assert!(validator.validate_indexes(&json!({"fields": ["owner"]})).is_err());
        assert!(validator.validate_indexes(&json!([{"fields": []}])).is_err());
        assert!(validator.validate_indexes(&json!([{"fields": [""]}])).is_err());
        assert!(validator
            .validate_indexes(&json!([{"fields": ["a"], "sparse": true}]))
            .is_err());
    }
}
