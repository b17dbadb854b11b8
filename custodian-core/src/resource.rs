//! Resource - Representing resources and their state

use std::collections::HashMap;

/// Unique identifier for a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    /// Resource type (e.g., "protection_policy", "source_registration")
    pub resource_type: String,
    /// Resource name (identifier given in configuration)
    pub name: String,
}

impl ResourceId {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }

    /// Binding used by references: `<type>.<name>`
    pub fn binding(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.resource_type, self.name)
    }
}

/// Attribute value of a resource
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    List(Vec<Value>),
    Map(HashMap<String, Value>),
    /// Reference to another resource's attribute (binding, attribute_name).
    /// The binding has the form `<type>.<name>`.
    ResourceRef(String, String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Convert a JSON value into a Value.
    ///
    /// `null` has no representation and yields `None`; floats are truncated.
    pub fn from_json(value: &serde_json::Value) -> Option<Value> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(Value::String(s.clone())),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Value::Int(i))
                } else {
                    n.as_f64().map(|f| Value::Int(f as i64))
                }
            }
            serde_json::Value::Array(arr) => {
                Some(Value::List(arr.iter().filter_map(Value::from_json).collect()))
            }
            serde_json::Value::Object(obj) => Some(Value::Map(
                obj.iter()
                    .filter_map(|(k, v)| Value::from_json(v).map(|v| (k.clone(), v)))
                    .collect(),
            )),
        }
    }

    /// Convert a Value into JSON. References are rendered as `${binding.attribute}`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::ResourceRef(binding, attr) => {
                serde_json::Value::String(format!("${{{}.{}}}", binding, attr))
            }
        }
    }
}

/// Desired state declared in configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: ResourceId,
    pub attributes: HashMap<String, Value>,
    /// If true, this is a data source (read-only) that won't be modified
    pub read_only: bool,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ResourceId::new(resource_type, name),
            attributes: HashMap::new(),
            read_only: false,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Returns true if this resource is a data source (read-only)
    pub fn is_data_source(&self) -> bool {
        self.read_only
    }
}

/// Current state fetched from the remote API
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub id: ResourceId,
    /// Provider identifier (e.g., "tenant-a/::42")
    pub identifier: Option<String>,
    pub attributes: HashMap<String, Value>,
    /// Whether this state exists
    pub exists: bool,
}

impl State {
    pub fn not_found(id: ResourceId) -> Self {
        Self {
            id,
            identifier: None,
            attributes: HashMap::new(),
            exists: false,
        }
    }

    pub fn existing(id: ResourceId, attributes: HashMap<String, Value>) -> Self {
        Self {
            id,
            identifier: None,
            attributes,
            exists: true,
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }
}

/// Names of configured attributes whose value differs from the current state
///
/// Keys starting with `_` are internal and never reported. Nested maps only
/// compare the keys that are configured, since the API echoes computed
/// fields inside blocks.
pub fn changed_attributes(
    desired: &HashMap<String, Value>,
    current: &HashMap<String, Value>,
) -> Vec<String> {
    let mut changed: Vec<String> = desired
        .iter()
        .filter(|(key, _)| !key.starts_with('_'))
        .filter(|(key, value)| {
            !current
                .get(key.as_str())
                .is_some_and(|current| value.matches(current))
        })
        .map(|(key, _)| key.clone())
        .collect();
    changed.sort();
    changed
}

impl Value {
    /// True when `current` carries everything `self` configures
    fn matches(&self, current: &Value) -> bool {
        match (self, current) {
            (Value::Map(desired), Value::Map(current)) => desired.iter().all(|(k, v)| {
                current.get(k).is_some_and(|c| v.matches(c))
            }),
            (Value::List(desired), Value::List(current)) => {
                desired.len() == current.len()
                    && desired.iter().zip(current).all(|(d, c)| d.matches(c))
            }
            _ => self == current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_joins_type_and_name() {
        let id = ResourceId::new("protection_policy", "daily");
        assert_eq!(id.binding(), "protection_policy.daily");
        assert_eq!(id.to_string(), "protection_policy.daily");
    }

    #[test]
    fn from_json_drops_nulls() {
        let json = serde_json::json!({
            "name": "gold",
            "description": null,
            "retries": 3,
            "tags": ["a", null, "b"]
        });
        let value = Value::from_json(&json).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.get("name"), Some(&Value::String("gold".to_string())));
        assert_eq!(map.get("retries"), Some(&Value::Int(3)));
        assert!(!map.contains_key("description"));
        assert_eq!(
            map.get("tags"),
            Some(&Value::List(vec![
                Value::String("a".to_string()),
                Value::String("b".to_string())
            ]))
        );
    }

    #[test]
    fn to_json_renders_references() {
        let value = Value::ResourceRef(
            "data_source_connection.main".to_string(),
            "connection_id".to_string(),
        );
        assert_eq!(
            value.to_json(),
            serde_json::json!("${data_source_connection.main.connection_id}")
        );
    }

    #[test]
    fn changed_attributes_reports_differences_only() {
        let mut desired = HashMap::new();
        desired.insert("name".to_string(), Value::String("new".to_string()));
        desired.insert("environment".to_string(), Value::String("kPhysical".to_string()));
        desired.insert("_binding".to_string(), Value::String("x".to_string()));

        let mut current = HashMap::new();
        current.insert("name".to_string(), Value::String("old".to_string()));
        current.insert("environment".to_string(), Value::String("kPhysical".to_string()));

        assert_eq!(changed_attributes(&desired, &current), vec!["name".to_string()]);
    }

    #[test]
    fn changed_attributes_ignores_computed_nested_fields() {
        let block = |pairs: &[(&str, &str)]| {
            Value::Map(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                    .collect(),
            )
        };
        let mut desired = HashMap::new();
        desired.insert("physical_params".to_string(), block(&[("endpoint", "10.0.0.5")]));
        let mut current = HashMap::new();
        current.insert(
            "physical_params".to_string(),
            block(&[("endpoint", "10.0.0.5"), ("host_type", "kLinux")]),
        );
        assert!(changed_attributes(&desired, &current).is_empty());

        current.insert("physical_params".to_string(), block(&[("endpoint", "10.0.0.6")]));
        assert_eq!(
            changed_attributes(&desired, &current),
            vec!["physical_params".to_string()]
        );
    }

    #[test]
    fn changed_attributes_compares_list_lengths() {
        let mut desired = HashMap::new();
        desired.insert(
            "applications".to_string(),
            Value::List(vec![Value::String("kSQL".to_string())]),
        );
        let mut current = HashMap::new();
        current.insert("applications".to_string(), Value::List(vec![]));
        assert_eq!(
            changed_attributes(&desired, &current),
            vec!["applications".to_string()]
        );
    }

    #[test]
    fn changed_attributes_includes_missing_current() {
        let mut desired = HashMap::new();
        desired.insert("description".to_string(), Value::String("d".to_string()));
        let current = HashMap::new();
        assert_eq!(
            changed_attributes(&desired, &current),
            vec!["description".to_string()]
        );
    }
}
