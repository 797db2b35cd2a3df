//! DAML module generation entry points.
//!
//! Thin wrappers around the conversion pipeline:
//! 1. Parse: schema JSON -> RosettaSchema
//! 2. Normalize: RosettaSchema -> Module (all schema logic resolved)
//! 3. Emit: Module -> String (via the Emit trait)

use tracing::debug;

use crate::error::GenError;
use crate::model::{Emit, RenderConfig};
use crate::normalize::normalize_schema;
use crate::schema::RosettaSchema;

/// Convert a parsed schema into DAML source for one module.
pub fn generate(module_name: &str, schema: &RosettaSchema) -> Result<String, GenError> {
    generate_with_config(module_name, schema, &RenderConfig::default())
}

/// Convert a parsed schema into DAML source with explicit render settings.
pub fn generate_with_config(
    module_name: &str,
    schema: &RosettaSchema,
    cfg: &RenderConfig,
) -> Result<String, GenError> {
    let module = normalize_schema(module_name, schema)?;
    let text = module.emit(cfg)?;
    debug!(
        module = module_name,
        output_len = text.len(),
        "rendered DAML module"
    );
    Ok(text)
}

/// Convert a schema JSON document into DAML source for one module.
pub fn generate_from_json(module_name: &str, json: &str) -> Result<String, GenError> {
    let schema = RosettaSchema::from_json(json)?;
    generate(module_name, &schema)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    const TEST_SCHEMA_JSON: &str = r#"{
  "declarations": [
    {
      "kind": "enum",
      "name": "Common",
      "values": [{ "name": "Pending", "definition": "Awaiting confirmation." }]
    },
    {
      "kind": "enum",
      "name": "Status",
      "superType": "Common",
      "values": [{ "name": "Closed" }]
    },
    {
      "kind": "class",
      "name": "Trade",
      "annotations": ["key"],
      "definition": "A single trade.",
      "fields": [
        { "name": "amount", "type": "number", "cardinality": { "lower": 1, "upper": 1 } },
        { "name": "tags", "type": "string", "cardinality": { "lower": 0, "upper": null } },
        { "name": "status", "type": "Status", "cardinality": { "lower": 0, "upper": 1 } },
        { "name": "type", "type": "eventType", "cardinality": { "lower": 1, "upper": 1 } },
        { "name": "internal", "type": "string", "cardinality": { "lower": 0, "upper": 0 } }
      ]
    },
    {
      "kind": "class",
      "name": "Party",
      "fields": [
        { "name": "name", "type": "string", "cardinality": { "lower": 1, "upper": 1 } }
      ]
    },
    { "kind": "rule", "name": "SomeRule" }
  ]
}"#;

    #[test]
    fn test_generate_from_json() {
        let daml = generate_from_json("Org.Demo", TEST_SCHEMA_JSON).unwrap();

        assert!(daml.starts_with("daml 1.2\n"));
        assert!(daml.contains("module Org.Demo where\n"));

        // Inherited enum tag comes first, own tag second
        let pending = daml.find("Status_Pending ()").unwrap();
        let closed = daml.find("Status_Closed ()").unwrap();
        assert!(pending < closed);

        // Keyed class gains the synthetic key before its own fields
        let key = daml.find("rosettaKey : Text").unwrap();
        let amount = daml.find("amount : Decimal").unwrap();
        assert!(key < amount);

        // List wrapper takes precedence over optionality
        assert!(daml.contains("tags : [Text]"));
        assert!(daml.contains("status : Optional Status"));

        // Reserved field name renamed, calculation-like type textual
        assert!(daml.contains("typ : Text"));
        assert!(!daml.contains("\n    type :"));

        // (0, 0) field contributes nothing
        assert!(!daml.contains("internal"));

        // Party class renamed and augmented
        assert!(daml.contains("data PartyData = PartyData with"));
        assert!(daml.contains("party : Party"));

        // Uninterpreted declaration kinds leave no trace
        assert!(!daml.contains("SomeRule"));
    }

    #[test]
    fn test_generated_module_carries_provenance_comment() {
        let daml = generate_from_json("Org.Demo", TEST_SCHEMA_JSON).unwrap();
        assert!(daml.contains("-- | Generated by rosetta-daml"));
        assert!(daml.contains("-- ^ Field added by the Rosetta to DAML converter."));
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = generate_from_json("Org.Demo", "not json").unwrap_err();
        assert!(matches!(err, GenError::Parse(_)));
    }

    #[test]
    fn test_declarations_render_in_schema_order() {
        let daml = generate_from_json("Org.Demo", TEST_SCHEMA_JSON).unwrap();
        let status = daml.find("data Status").unwrap();
        let trade = daml.find("data Trade").unwrap();
        let party = daml.find("data PartyData").unwrap();
        assert!(status < trade && trade < party);
    }

    #[test]
    fn test_custom_render_config() {
        let schema = RosettaSchema::from_json(TEST_SCHEMA_JSON).unwrap();
        let narrow = RenderConfig {
            width: 30,
            line_spacing: 1,
        };
        let daml = generate_with_config("Org.Demo", &schema, &narrow).unwrap();
        // The module comment no longer fits on one line
        assert!(daml.contains(
            "-- | Generated by rosetta-daml\n\
             --   from a Rosetta schema. Do\n\
             --   not edit by hand.\n"
        ));
    }
}
