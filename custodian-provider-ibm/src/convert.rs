//! Schema-driven conversion between configuration maps and wire JSON
//!
//! Each attribute is looked up on the wire under `AttributeSchema::wire_name`.
//! Outbound, the JSON is then deserialized into a typed request; inbound,
//! a typed response is serialized and walked back through the schema so the
//! state map only ever carries attributes the schema declares.

use std::collections::HashMap;

use custodian_core::resource::Value;
use custodian_core::schema::{AttributeSchema, AttributeType, types};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::BackupRecoveryError;

type Fields = HashMap<String, AttributeSchema>;

/// Configuration map -> JSON object
///
/// Read-only attributes and names in `skip` are left out.
pub fn attributes_to_json(
    fields: &Fields,
    attributes: &HashMap<String, Value>,
    skip: &[&str],
) -> Result<serde_json::Value, BackupRecoveryError> {
    let mut obj = serde_json::Map::new();
    for (name, value) in attributes {
        let Some(field) = fields.get(name) else {
            continue;
        };
        if field.is_read_only() || skip.contains(&name.as_str()) {
            continue;
        }
        let json = value_to_wire(&field.attr_type, value).map_err(|e| {
            BackupRecoveryError::conversion(format!("attribute '{}': {}", name, e))
        })?;
        obj.insert(field.wire_name(), json);
    }
    Ok(serde_json::Value::Object(obj))
}

/// JSON object -> state map (nulls and undeclared fields dropped)
pub fn json_to_attributes(fields: &Fields, json: &serde_json::Value) -> HashMap<String, Value> {
    let Some(obj) = json.as_object() else {
        return HashMap::new();
    };
    fields
        .iter()
        .filter_map(|(name, field)| {
            obj.get(&field.wire_name())
                .and_then(|v| wire_to_value(&field.attr_type, v))
                .map(|v| (name.clone(), v))
        })
        .collect()
}

/// Configuration map -> typed request
pub fn map_to_request<T: DeserializeOwned>(
    fields: &Fields,
    attributes: &HashMap<String, Value>,
    skip: &[&str],
) -> Result<T, BackupRecoveryError> {
    let json = attributes_to_json(fields, attributes, skip)?;
    Ok(serde_json::from_value(json)?)
}

/// Typed response -> state map
pub fn response_to_map<T: Serialize>(
    fields: &Fields,
    response: &T,
) -> Result<HashMap<String, Value>, BackupRecoveryError> {
    let json = serde_json::to_value(response)?;
    Ok(json_to_attributes(fields, &json))
}

fn value_to_wire(ty: &AttributeType, value: &Value) -> Result<serde_json::Value, String> {
    match (ty, value) {
        (_, Value::ResourceRef(binding, attr)) => Err(format!(
            "unresolved reference to {}.{}",
            binding, attr
        )),
        (AttributeType::Custom { name, .. }, Value::String(s)) if name == types::INT64_STRING => s
            .parse::<i64>()
            .map(serde_json::Value::from)
            .map_err(|_| format!("'{}' is not a 64-bit integer", s)),
        (AttributeType::Enum(_), Value::String(s)) => {
            let variant = s.split('.').next_back().unwrap_or(s);
            Ok(serde_json::Value::String(variant.to_string()))
        }
        (AttributeType::Struct { fields, .. }, Value::Map(map)) => {
            attributes_to_json(fields, map, &[]).map_err(|e| e.to_string())
        }
        (AttributeType::List(inner), Value::List(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| value_to_wire(inner, item).map_err(|e| format!("[{}]: {}", i, e)))
            .collect::<Result<Vec<_>, _>>()
            .map(serde_json::Value::Array),
        (AttributeType::Map(inner), Value::Map(map)) => {
            let mut obj = serde_json::Map::new();
            for (k, v) in map {
                obj.insert(k.clone(), value_to_wire(inner, v)?);
            }
            Ok(serde_json::Value::Object(obj))
        }
        (_, v) => Ok(v.to_json()),
    }
}

fn wire_to_value(ty: &AttributeType, json: &serde_json::Value) -> Option<Value> {
    match (ty, json) {
        (_, serde_json::Value::Null) => None,
        (AttributeType::Struct { fields, .. }, serde_json::Value::Object(_)) => {
            Some(Value::Map(json_to_attributes(fields, json)))
        }
        (AttributeType::List(inner), serde_json::Value::Array(items)) => Some(Value::List(
            items.iter().filter_map(|v| wire_to_value(inner, v)).collect(),
        )),
        (AttributeType::Map(inner), serde_json::Value::Object(obj)) => Some(Value::Map(
            obj.iter()
                .filter_map(|(k, v)| wire_to_value(inner, v).map(|v| (k.clone(), v)))
                .collect(),
        )),
        (AttributeType::Custom { name, .. }, serde_json::Value::Number(n))
            if name == types::INT64_STRING =>
        {
            Some(Value::String(n.to_string()))
        }
        (_, v) => Value::from_json(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    fn fields(list: Vec<AttributeSchema>) -> Fields {
        list.into_iter().map(|a| (a.name.clone(), a)).collect()
    }

    fn sample_fields() -> Fields {
        fields(vec![
            AttributeSchema::new("name", AttributeType::String).optional(),
            AttributeSchema::new(
                "environment",
                AttributeType::Enum(vec!["kPhysical".to_string(), "kSQL".to_string()]),
            )
            .required(),
            AttributeSchema::new("connection_id", types::int64_string()).optional(),
            AttributeSchema::new("source_id", AttributeType::Int).read_only(),
            AttributeSchema::new(
                "physical_params",
                AttributeType::structure(
                    "PhysicalParams",
                    vec![
                        AttributeSchema::new("endpoint", AttributeType::String).required(),
                        AttributeSchema::new("applications", AttributeType::string_list())
                            .optional(),
                    ],
                ),
            )
            .optional(),
        ])
    }

    #[test]
    fn attributes_to_json_uses_wire_names() {
        let mut params = HashMap::new();
        params.insert("endpoint".to_string(), s("10.0.0.5"));
        params.insert(
            "applications".to_string(),
            Value::List(vec![s("kSQL")]),
        );

        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), s("host-1"));
        attrs.insert("environment".to_string(), s("Environment.kPhysical"));
        attrs.insert("connection_id".to_string(), s("9876543210"));
        attrs.insert("physical_params".to_string(), Value::Map(params));
        attrs.insert("unknown".to_string(), s("ignored"));

        let json = attributes_to_json(&sample_fields(), &attrs, &[]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "host-1",
                "environment": "kPhysical",
                "connectionId": 9876543210i64,
                "physicalParams": { "endpoint": "10.0.0.5", "applications": ["kSQL"] }
            })
        );
    }

    #[test]
    fn attributes_to_json_skips_read_only_and_named() {
        let mut attrs = HashMap::new();
        attrs.insert("source_id".to_string(), Value::Int(7));
        attrs.insert("name".to_string(), s("host-1"));
        attrs.insert("environment".to_string(), s("kSQL"));

        let json = attributes_to_json(&sample_fields(), &attrs, &["name"]).unwrap();
        assert_eq!(json, serde_json::json!({ "environment": "kSQL" }));
    }

    #[test]
    fn bad_int64_string_is_conversion_error() {
        let mut attrs = HashMap::new();
        attrs.insert("connection_id".to_string(), s("abc"));
        let err = attributes_to_json(&sample_fields(), &attrs, &[]).unwrap_err();
        assert!(matches!(err, BackupRecoveryError::Conversion { .. }));
        assert!(err.to_string().contains("connection_id"));
    }

    #[test]
    fn unresolved_reference_is_conversion_error() {
        let mut attrs = HashMap::new();
        attrs.insert(
            "name".to_string(),
            Value::ResourceRef("data_source_connection.main".to_string(), "connection_name".to_string()),
        );
        assert!(attributes_to_json(&sample_fields(), &attrs, &[]).is_err());
    }

    #[test]
    fn json_to_attributes_follows_schema() {
        let json = serde_json::json!({
            "name": "host-1",
            "environment": "kPhysical",
            "connectionId": 9876543210i64,
            "sourceId": 12,
            "physicalParams": { "endpoint": "10.0.0.5", "hostType": "kLinux" },
            "notInSchema": true,
            "description": null
        });

        let attrs = json_to_attributes(&sample_fields(), &json);
        assert_eq!(attrs.get("name"), Some(&s("host-1")));
        assert_eq!(attrs.get("connection_id"), Some(&s("9876543210")));
        assert_eq!(attrs.get("source_id"), Some(&Value::Int(12)));
        assert!(!attrs.contains_key("notInSchema"));

        let params = attrs.get("physical_params").and_then(|v| v.as_map()).unwrap();
        assert_eq!(params.get("endpoint"), Some(&s("10.0.0.5")));
        // host_type is not declared in this field set
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn dotted_enum_is_unchanged_after_read_back() {
        let f = sample_fields();
        let desired = HashMap::from([
            ("name".to_string(), s("host")),
            ("environment".to_string(), s("Environment.kPhysical")),
        ]);

        let wire = attributes_to_json(&f, &desired, &[]).unwrap();
        assert_eq!(wire["environment"], "kPhysical");
        let read_back = json_to_attributes(&f, &wire);

        let desired = custodian_core::schema::normalize_fields(&f, &desired);
        let changed = custodian_core::resource::changed_attributes(&desired, &read_back);
        assert!(changed.is_empty(), "changed: {:?}", changed);
    }

    #[test]
    fn list_of_blocks_converts_both_ways() {
        let f = fields(vec![AttributeSchema::new(
            "advanced_configs",
            AttributeType::list_of(
                "KeyValuePair",
                vec![
                    AttributeSchema::new("key", AttributeType::String).required(),
                    AttributeSchema::new("value", AttributeType::String).required(),
                ],
            ),
        )
        .optional()]);

        let mut kv = HashMap::new();
        kv.insert("key".to_string(), s("retries"));
        kv.insert("value".to_string(), s("3"));
        let mut attrs = HashMap::new();
        attrs.insert("advanced_configs".to_string(), Value::List(vec![Value::Map(kv)]));

        let json = attributes_to_json(&f, &attrs, &[]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "advancedConfigs": [{ "key": "retries", "value": "3" }] })
        );
        assert_eq!(json_to_attributes(&f, &json), attrs);
    }
}
