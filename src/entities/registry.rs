//! Node-type registry: wire type strings mapped to typed property variants.
//!
//! The persisted format distinguishes nodes at two levels: the node-level
//! `type` (`event-node` / `common-node`) and, for common nodes, the
//! `properties.type` discriminator. The registry owns both directions of
//! that mapping so (de)serialization stays in one place.

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::FlowError;

use super::properties::{
    DataConvertProps, DataSourceProps, EventProps, NodeProperties, PageJumpProps,
};

/// Node-level wire type for event triggers.
pub const WIRE_EVENT_NODE: &str = "event-node";
/// Node-level wire type for every non-trigger node.
pub const WIRE_COMMON_NODE: &str = "common-node";
/// Edge-level wire type.
pub const WIRE_EDGE: &str = "logic-line";

/// Inner `properties.type` discriminators for common nodes.
pub const INNER_DATA_SOURCE: &str = "dataSource";
pub const INNER_PAGE_JUMP: &str = "pageJump";
pub const INNER_DATA_CONVERT: &str = "dataConvert";

#[derive(Debug, Clone, Copy)]
pub struct NodeTypeDef {
    pub wire_type: &'static str,
    /// `properties.type` for common nodes, None for event nodes.
    pub inner_type: Option<&'static str>,
    pub label: &'static str,
}

static BUILTIN_TYPES: &[NodeTypeDef] = &[
    NodeTypeDef { wire_type: WIRE_EVENT_NODE, inner_type: None, label: "event trigger" },
    NodeTypeDef { wire_type: WIRE_COMMON_NODE, inner_type: Some(INNER_DATA_SOURCE), label: "data source" },
    NodeTypeDef { wire_type: WIRE_COMMON_NODE, inner_type: Some(INNER_PAGE_JUMP), label: "page jump" },
    NodeTypeDef { wire_type: WIRE_COMMON_NODE, inner_type: Some(INNER_DATA_CONVERT), label: "data conversion" },
];

#[derive(Debug)]
pub struct NodeRegistry {
    defs: &'static [NodeTypeDef],
}

static BUILTIN: Lazy<NodeRegistry> = Lazy::new(|| NodeRegistry { defs: BUILTIN_TYPES });

impl NodeRegistry {
    /// Registry with the built-in node types.
    pub fn builtin() -> &'static NodeRegistry {
        &BUILTIN
    }

    pub fn defs(&self) -> &[NodeTypeDef] {
        self.defs
    }

    /// Parse a wire `type` + raw `properties` payload into a typed variant.
    ///
    /// The inner `type` discriminator of common nodes is left in the
    /// payload (it lands in the variant's extras), which keeps re-
    /// serialization byte-for-byte faithful.
    pub fn parse(&self, wire_type: &str, properties: &Value) -> Result<NodeProperties, FlowError> {
        match wire_type {
            WIRE_EVENT_NODE => {
                let props: EventProps = serde_json::from_value(properties.clone())
                    .map_err(|e| FlowError::InvalidSpec(format!("event-node properties: {e}")))?;
                Ok(NodeProperties::Event(props))
            }
            WIRE_COMMON_NODE => {
                let inner = properties
                    .get("type")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        FlowError::InvalidSpec("common-node properties missing 'type'".into())
                    })?;
                match inner {
                    INNER_DATA_SOURCE => {
                        let props: DataSourceProps = serde_json::from_value(properties.clone())
                            .map_err(|e| FlowError::InvalidSpec(format!("dataSource properties: {e}")))?;
                        Ok(NodeProperties::DataSource(props))
                    }
                    INNER_PAGE_JUMP => {
                        let props: PageJumpProps = serde_json::from_value(properties.clone())
                            .map_err(|e| FlowError::InvalidSpec(format!("pageJump properties: {e}")))?;
                        Ok(NodeProperties::PageJump(props))
                    }
                    INNER_DATA_CONVERT => {
                        let props: DataConvertProps = serde_json::from_value(properties.clone())
                            .map_err(|e| FlowError::InvalidSpec(format!("dataConvert properties: {e}")))?;
                        Ok(NodeProperties::DataConvert(props))
                    }
                    other => Err(FlowError::InvalidSpec(format!(
                        "unrecognized common-node type '{other}'"
                    ))),
                }
            }
            other => Err(FlowError::InvalidSpec(format!(
                "unrecognized node type '{other}'"
            ))),
        }
    }

    /// Serialize a typed variant back to (wire type, raw properties),
    /// making sure common nodes carry their inner `type` discriminator.
    pub fn to_wire(&self, properties: &NodeProperties) -> (String, Value) {
        let (wire_type, inner, value) = match properties {
            NodeProperties::Event(p) => {
                (WIRE_EVENT_NODE, None, serde_json::to_value(p))
            }
            NodeProperties::DataSource(p) => {
                (WIRE_COMMON_NODE, Some(INNER_DATA_SOURCE), serde_json::to_value(p))
            }
            NodeProperties::PageJump(p) => {
                (WIRE_COMMON_NODE, Some(INNER_PAGE_JUMP), serde_json::to_value(p))
            }
            NodeProperties::DataConvert(p) => {
                (WIRE_COMMON_NODE, Some(INNER_DATA_CONVERT), serde_json::to_value(p))
            }
        };
        // Serialization of these structs cannot fail; fall back to an
        // empty object all the same rather than panicking.
        let mut value = value.unwrap_or_else(|_| Value::Object(Default::default()));
        if let (Some(inner), Value::Object(map)) = (inner, &mut value) {
            map.entry("type").or_insert_with(|| Value::String(inner.into()));
        }
        (wire_type.to_string(), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_event_node() {
        let props = json!({ "componentId": "page_init", "componentName": "pageInit", "name": "init" });
        let parsed = NodeRegistry::builtin().parse(WIRE_EVENT_NODE, &props).unwrap();
        assert!(matches!(parsed, NodeProperties::Event(_)));
        assert_eq!(parsed.display_name(), Some("init"));
    }

    #[test]
    fn test_parse_common_variants() {
        let reg = NodeRegistry::builtin();
        let ds = reg
            .parse(WIRE_COMMON_NODE, &json!({ "type": "dataSource", "name": "fetch" }))
            .unwrap();
        assert!(matches!(ds, NodeProperties::DataSource(_)));

        let pj = reg
            .parse(WIRE_COMMON_NODE, &json!({ "type": "pageJump" }))
            .unwrap();
        assert!(matches!(pj, NodeProperties::PageJump(_)));

        let dc = reg
            .parse(
                WIRE_COMMON_NODE,
                &json!({ "type": "dataConvert", "dc": { "convertList": [], "convertCode": "return 1" } }),
            )
            .unwrap();
        assert_eq!(dc.as_convert().unwrap().convert_code, "return 1");
    }

    #[test]
    fn test_parse_rejects_unknown_types() {
        let reg = NodeRegistry::builtin();
        assert!(matches!(
            reg.parse("mystery-node", &json!({})),
            Err(FlowError::InvalidSpec(_))
        ));
        assert!(matches!(
            reg.parse(WIRE_COMMON_NODE, &json!({ "type": "teleport" })),
            Err(FlowError::InvalidSpec(_))
        ));
        assert!(matches!(
            reg.parse(WIRE_COMMON_NODE, &json!({})),
            Err(FlowError::InvalidSpec(_))
        ));
    }

    #[test]
    fn test_to_wire_injects_inner_type() {
        let reg = NodeRegistry::builtin();
        let props = NodeProperties::DataSource(Default::default());
        let (wire_type, value) = reg.to_wire(&props);
        assert_eq!(wire_type, WIRE_COMMON_NODE);
        assert_eq!(value.get("type"), Some(&json!("dataSource")));

        // Round-tripped payloads keep their original discriminator untouched
        let original = json!({ "type": "dataConvert", "name": "c", "dc": {} });
        let parsed = reg.parse(WIRE_COMMON_NODE, &original).unwrap();
        let (_, back) = reg.to_wire(&parsed);
        assert_eq!(back.get("type"), Some(&json!("dataConvert")));
    }
}
