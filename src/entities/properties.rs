//! Typed per-node property payloads and conversion bindings.
//!
//! The persisted format carries a free-form `properties` object per node.
//! Each node type gets its own struct here; a flattened extras map keeps
//! props this crate does not model intact across a load/save round trip.
//! Wire (de)serialization of the variants is owned by the node-type
//! registry, not derived on the enum.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Unmodeled wire props, preserved verbatim. BTreeMap keeps output
/// ordering deterministic.
pub type Extras = BTreeMap<String, Value>;

/// Event-trigger payload (wire: `event-node`, e.g. page init).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extras: Extras,
}

/// Data-source fetch payload (wire: `common-node` + `type: dataSource`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extras: Extras,
}

/// Page-jump payload (wire: `common-node` + `type: pageJump`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageJumpProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extras: Extras,
}

/// Data-conversion payload (wire: `common-node` + `type: dataConvert`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataConvertProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub dc: DataConvert,
    #[serde(flatten)]
    pub extras: Extras,
}

/// Ordered binding list plus the user-authored expression body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataConvert {
    #[serde(default)]
    pub convert_list: Vec<ConvertEntry>,
    #[serde(default)]
    pub convert_code: String,
}

/// One named input to a conversion body. Entries without a value occur in
/// real documents (a key reserved in the UI but never bound).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertEntry {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ConvertValue>,
}

/// Binding value: a reference (tagged object) or a bare JSON literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConvertValue {
    Ref(ConvertRef),
    Literal(Value),
}

/// Tagged reference forms a binding value can take on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConvertRef {
    /// Output of another conversion node. `node_id` is optional on the
    /// wire; a missing id is an unresolvable binding.
    #[serde(rename = "dataConvert")]
    NodeOutput {
        #[serde(rename = "nodeId", default, skip_serializing_if = "Option::is_none")]
        node_id: Option<String>,
        #[serde(flatten)]
        extras: Extras,
    },
    /// Live property of a rendered widget, read through the injected
    /// widget-property source.
    #[serde(rename = "componentProp")]
    ComponentProp {
        #[serde(rename = "componentId")]
        component_id: String,
        prop: String,
        #[serde(flatten)]
        extras: Extras,
    },
}

/// Tagged per-type property variant held by every node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeProperties {
    Event(EventProps),
    DataSource(DataSourceProps),
    PageJump(PageJumpProps),
    DataConvert(DataConvertProps),
}

impl NodeProperties {
    /// Short type label, matching the inner wire `type` values.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeProperties::Event(_) => "event",
            NodeProperties::DataSource(_) => "dataSource",
            NodeProperties::PageJump(_) => "pageJump",
            NodeProperties::DataConvert(_) => "dataConvert",
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            NodeProperties::Event(p) => p.name.as_deref(),
            NodeProperties::DataSource(p) => p.name.as_deref(),
            NodeProperties::PageJump(p) => p.name.as_deref(),
            NodeProperties::DataConvert(p) => p.name.as_deref(),
        }
    }

    pub fn is_convert(&self) -> bool {
        matches!(self, NodeProperties::DataConvert(_))
    }

    pub fn as_convert(&self) -> Option<&DataConvert> {
        match self {
            NodeProperties::DataConvert(p) => Some(&p.dc),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_entry_forms() {
        // Bare key, no value
        let bare: ConvertEntry = serde_json::from_value(json!({ "key": "key2" })).unwrap();
        assert_eq!(bare.key, "key2");
        assert!(bare.value.is_none());

        // Node-output reference
        let node_ref: ConvertEntry = serde_json::from_value(json!({
            "key": "key1",
            "value": { "type": "dataConvert", "nodeId": "logic_abc" }
        }))
        .unwrap();
        match node_ref.value.unwrap() {
            ConvertValue::Ref(ConvertRef::NodeOutput { node_id, .. }) => {
                assert_eq!(node_id.as_deref(), Some("logic_abc"));
            }
            other => panic!("expected node-output ref, got {:?}", other),
        }

        // Component property reference with extra wire fields
        let comp_ref: ConvertEntry = serde_json::from_value(json!({
            "key": "key2",
            "value": {
                "type": "componentProp",
                "componentId": "InputNumber_azsj",
                "prop": "value",
                "dataType": "number",
                "propName": "current value"
            }
        }))
        .unwrap();
        match comp_ref.value.unwrap() {
            ConvertValue::Ref(ConvertRef::ComponentProp { component_id, prop, extras }) => {
                assert_eq!(component_id, "InputNumber_azsj");
                assert_eq!(prop, "value");
                assert_eq!(extras.get("dataType"), Some(&json!("number")));
            }
            other => panic!("expected component-prop ref, got {:?}", other),
        }

        // Bare literal
        let lit: ConvertEntry =
            serde_json::from_value(json!({ "key": "k", "value": 3 })).unwrap();
        assert_eq!(lit.value, Some(ConvertValue::Literal(json!(3))));
    }

    #[test]
    fn test_ref_without_node_id_round_trips() {
        let raw = json!({ "type": "dataConvert", "dataType": "string" });
        let parsed: ConvertValue = serde_json::from_value(raw.clone()).unwrap();
        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_data_convert_props_preserve_extras() {
        let raw = json!({
            "type": "dataConvert",
            "name": "conversion",
            "componentName": "dataConvert",
            "dc": { "convertList": [], "convertCode": "return [3, 4, 5]" },
            "customFlag": true
        });
        let props: DataConvertProps = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(props.dc.convert_code, "return [3, 4, 5]");
        assert_eq!(props.extras.get("customFlag"), Some(&json!(true)));
        // Inner "type" tag rides along in extras untouched
        assert_eq!(props.extras.get("type"), Some(&json!("dataConvert")));
        assert_eq!(serde_json::to_value(&props).unwrap(), raw);
    }
}
