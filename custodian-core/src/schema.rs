//! Schema - Define type schemas for resources
//!
//! Providers declare one schema tree per resource type. The tree drives
//! configuration validation, the mapping between configuration maps and wire
//! JSON, and the `schema` command output.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use heck::ToLowerCamelCase;

use crate::resource::Value;

/// Attribute type
#[derive(Debug, Clone)]
pub enum AttributeType {
    /// String
    String,
    /// Integer
    Int,
    /// Boolean
    Bool,
    /// Enum (list of allowed values)
    Enum(Vec<String>),
    /// Custom type (with validation function)
    Custom {
        name: String,
        base: Box<AttributeType>,
        validate: fn(&Value) -> Result<(), String>,
    },
    /// List
    List(Box<AttributeType>),
    /// Map
    Map(Box<AttributeType>),
    /// Nested block with its own fields
    Struct {
        name: String,
        fields: HashMap<String, AttributeSchema>,
    },
}

impl AttributeType {
    /// Build a nested block type from a list of fields
    pub fn structure(name: impl Into<String>, fields: Vec<AttributeSchema>) -> Self {
        AttributeType::Struct {
            name: name.into(),
            fields: fields.into_iter().map(|f| (f.name.clone(), f)).collect(),
        }
    }

    /// List of nested blocks
    pub fn list_of(name: impl Into<String>, fields: Vec<AttributeSchema>) -> Self {
        AttributeType::List(Box::new(Self::structure(name, fields)))
    }

    /// List of strings
    pub fn string_list() -> Self {
        AttributeType::List(Box::new(AttributeType::String))
    }

    /// List of integers
    pub fn int_list() -> Self {
        AttributeType::List(Box::new(AttributeType::Int))
    }

    /// Check if a value conforms to this type
    pub fn validate(&self, value: &Value) -> Result<(), TypeError> {
        match (self, value) {
            // References are resolved against state before they reach a provider
            (_, Value::ResourceRef(_, _)) => Ok(()),
            (AttributeType::String, Value::String(_)) => Ok(()),
            (AttributeType::Int, Value::Int(_)) => Ok(()),
            (AttributeType::Bool, Value::Bool(_)) => Ok(()),

            (AttributeType::Enum(variants), Value::String(s)) => {
                // Extract variant from "Type.variant" format
                let variant = s.split('.').next_back().unwrap_or(s);
                if variants.iter().any(|v| v == variant || s == v) {
                    Ok(())
                } else {
                    Err(TypeError::InvalidEnumVariant {
                        value: s.clone(),
                        expected: variants.clone(),
                    })
                }
            }

            (AttributeType::Custom { validate, .. }, v) => {
                validate(v).map_err(|msg| TypeError::ValidationFailed { message: msg })
            }

            (AttributeType::List(inner), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    inner.validate(item).map_err(|e| TypeError::ListItemError {
                        index: i,
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            (AttributeType::Map(inner), Value::Map(map)) => {
                for (k, v) in map {
                    inner.validate(v).map_err(|e| TypeError::MapValueError {
                        key: k.clone(),
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            (AttributeType::Struct { fields, .. }, Value::Map(map)) => {
                match validate_fields(fields, map).into_iter().next() {
                    Some(e) => Err(e),
                    None => Ok(()),
                }
            }

            _ => Err(TypeError::TypeMismatch {
                expected: self.type_name(),
                got: value.type_name(),
            }),
        }
    }

    /// Fields of a nested block, looking through lists and maps
    pub fn struct_fields(&self) -> Option<&HashMap<String, AttributeSchema>> {
        match self {
            AttributeType::Struct { fields, .. } => Some(fields),
            AttributeType::List(inner) | AttributeType::Map(inner) => inner.struct_fields(),
            _ => None,
        }
    }

    /// Name of the custom type, if any (looking through lists)
    pub fn custom_name(&self) -> Option<&str> {
        match self {
            AttributeType::Custom { name, .. } => Some(name),
            AttributeType::List(inner) => inner.custom_name(),
            _ => None,
        }
    }

    fn type_name(&self) -> String {
        match self {
            AttributeType::String => "String".to_string(),
            AttributeType::Int => "Int".to_string(),
            AttributeType::Bool => "Bool".to_string(),
            AttributeType::Enum(variants) => format!("Enum({})", variants.join(" | ")),
            AttributeType::Custom { name, .. } => name.clone(),
            AttributeType::List(inner) => format!("List<{}>", inner.type_name()),
            AttributeType::Map(inner) => format!("Map<{}>", inner.type_name()),
            AttributeType::Struct { name, .. } => name.clone(),
        }
    }

    fn to_read_only(&self) -> AttributeType {
        match self {
            AttributeType::Struct { name, fields } => AttributeType::Struct {
                name: name.clone(),
                fields: read_only_fields(fields),
            },
            AttributeType::List(inner) => AttributeType::List(Box::new(inner.to_read_only())),
            AttributeType::Map(inner) => AttributeType::Map(Box::new(inner.to_read_only())),
            other => other.clone(),
        }
    }

    /// Value in the form the API echoes it back: `Type.variant` enum strings
    /// become `variant`
    pub fn normalize(&self, value: &Value) -> Value {
        match (self, value) {
            (AttributeType::Enum(variants), Value::String(s)) if !variants.contains(s) => {
                Value::String(s.split('.').next_back().unwrap_or(s).to_string())
            }
            (AttributeType::Custom { base, .. }, v) => base.normalize(v),
            (AttributeType::List(inner), Value::List(items)) => {
                Value::List(items.iter().map(|v| inner.normalize(v)).collect())
            }
            (AttributeType::Map(inner), Value::Map(map)) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), inner.normalize(v)))
                    .collect(),
            ),
            (AttributeType::Struct { fields, .. }, Value::Map(map)) => {
                Value::Map(normalize_fields(fields, map))
            }
            _ => value.clone(),
        }
    }
}

/// Normalize every known field of a configuration map
pub fn normalize_fields(
    fields: &HashMap<String, AttributeSchema>,
    attributes: &HashMap<String, Value>,
) -> HashMap<String, Value> {
    attributes
        .iter()
        .map(|(name, value)| {
            let value = match fields.get(name) {
                Some(schema) => schema.attr_type.normalize(value),
                None => value.clone(),
            };
            (name.clone(), value)
        })
        .collect()
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Type error
#[derive(Debug, Clone, thiserror::Error)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Invalid enum variant '{value}', expected one of: {}", expected.join(", "))]
    InvalidEnumVariant {
        value: String,
        expected: Vec<String>,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Required attribute '{name}' is missing")]
    MissingRequired { name: String },

    #[error("Attribute '{name}' is computed and cannot be set")]
    ReadOnlyAttribute { name: String },

    #[error("Attributes '{name}' and '{other}' conflict with each other")]
    ConflictingAttributes { name: String, other: String },

    #[error("Attribute '{name}' accepts at most {max} items, got {got}")]
    TooManyItems { name: String, max: usize, got: usize },

    #[error("List item at index {index}: {inner}")]
    ListItemError { index: usize, inner: Box<TypeError> },

    #[error("Map value for key '{key}': {inner}")]
    MapValueError { key: String, inner: Box<TypeError> },

    #[error("In '{field}': {inner}")]
    FieldError { field: String, inner: Box<TypeError> },
}

impl Value {
    fn type_name(&self) -> String {
        match self {
            Value::String(_) => "String".to_string(),
            Value::Int(_) => "Int".to_string(),
            Value::Bool(_) => "Bool".to_string(),
            Value::List(_) => "List".to_string(),
            Value::Map(_) => "Map".to_string(),
            Value::ResourceRef(binding, attr) => format!("ResourceRef({}.{})", binding, attr),
        }
    }
}

/// Attribute schema
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub name: String,
    pub attr_type: AttributeType,
    pub required: bool,
    pub optional: bool,
    /// Filled in by the remote API
    pub computed: bool,
    /// Changing the value replaces the resource
    pub force_new: bool,
    /// Masked in command output
    pub sensitive: bool,
    pub conflicts_with: Vec<String>,
    pub max_items: Option<usize>,
    pub default: Option<Value>,
    pub description: Option<String>,
    /// Wire field name when it is not the lowerCamelCase of `name`
    pub provider_name: Option<String>,
}

impl AttributeSchema {
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            sensitive: false,
            conflicts_with: Vec::new(),
            max_items: None,
            default: None,
            description: None,
            provider_name: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.optional = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self.required = false;
        self
    }

    /// Mark as computed; combine with `optional()` for values the API may fill in
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Computed only: configuration may not set it
    pub fn read_only(mut self) -> Self {
        self.computed = true;
        self.required = false;
        self.optional = false;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn conflicts_with(mut self, names: &[&str]) -> Self {
        self.conflicts_with = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = Some(name.into());
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.computed && !self.required && !self.optional
    }

    /// Field name used on the wire
    pub fn wire_name(&self) -> String {
        match &self.provider_name {
            Some(name) => name.clone(),
            None => self.name.to_lower_camel_case(),
        }
    }

    fn to_read_only(&self) -> AttributeSchema {
        AttributeSchema {
            name: self.name.clone(),
            attr_type: self.attr_type.to_read_only(),
            required: false,
            optional: false,
            computed: true,
            force_new: false,
            sensitive: self.sensitive,
            conflicts_with: Vec::new(),
            max_items: None,
            default: None,
            description: self.description.clone(),
            provider_name: self.provider_name.clone(),
        }
    }
}

/// Copy of a field set with every field (recursively) computed only
pub fn read_only_fields(fields: &HashMap<String, AttributeSchema>) -> HashMap<String, AttributeSchema> {
    fields
        .iter()
        .map(|(name, schema)| (name.clone(), schema.to_read_only()))
        .collect()
}

/// Validate a configuration map against a field set
fn validate_fields(
    fields: &HashMap<String, AttributeSchema>,
    attributes: &HashMap<String, Value>,
) -> Vec<TypeError> {
    let mut errors = Vec::new();

    // Check required attributes
    for (name, schema) in fields {
        if schema.required && !attributes.contains_key(name) && schema.default.is_none() {
            errors.push(TypeError::MissingRequired { name: name.clone() });
        }
    }

    let mut conflicts = BTreeSet::new();
    for (name, value) in attributes {
        // Unknown attributes are allowed (for flexibility)
        let Some(schema) = fields.get(name) else {
            continue;
        };

        if schema.is_read_only() {
            errors.push(TypeError::ReadOnlyAttribute { name: name.clone() });
            continue;
        }

        for other in &schema.conflicts_with {
            if attributes.contains_key(other) {
                let pair = if name < other {
                    (name.clone(), other.clone())
                } else {
                    (other.clone(), name.clone())
                };
                conflicts.insert(pair);
            }
        }

        if let (Some(max), Value::List(items)) = (schema.max_items, value)
            && items.len() > max
        {
            errors.push(TypeError::TooManyItems {
                name: name.clone(),
                max,
                got: items.len(),
            });
        }

        if let Err(e) = schema.attr_type.validate(value) {
            let e = match schema.attr_type {
                AttributeType::Struct { .. } | AttributeType::List(_) => TypeError::FieldError {
                    field: name.clone(),
                    inner: Box::new(e),
                },
                _ => e,
            };
            errors.push(e);
        }
    }

    errors.extend(
        conflicts
            .into_iter()
            .map(|(name, other)| TypeError::ConflictingAttributes { name, other }),
    );
    errors
}

/// Resource schema
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub resource_type: String,
    pub attributes: HashMap<String, AttributeSchema>,
    pub description: Option<String>,
}

impl ResourceSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            attributes: HashMap::new(),
            description: None,
        }
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    pub fn attributes(mut self, schemas: Vec<AttributeSchema>) -> Self {
        for schema in schemas {
            self.attributes.insert(schema.name.clone(), schema);
        }
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Attribute names that replace the resource when changed
    pub fn force_new_attributes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .attributes
            .values()
            .filter(|a| a.force_new)
            .map(|a| a.name.as_str())
            .collect();
        names.sort();
        names
    }

    /// Configured attributes in the form they are read back
    pub fn normalize(&self, attributes: &HashMap<String, Value>) -> HashMap<String, Value> {
        normalize_fields(&self.attributes, attributes)
    }

    /// Validate resource attributes
    pub fn validate(&self, attributes: &HashMap<String, Value>) -> Result<(), Vec<TypeError>> {
        let errors = validate_fields(&self.attributes, attributes);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Helper functions for common types
pub mod types {
    use super::*;

    /// Positive integer type
    pub fn positive_int() -> AttributeType {
        AttributeType::Custom {
            name: "PositiveInt".to_string(),
            base: Box::new(AttributeType::Int),
            validate: |value| {
                if let Value::Int(n) = value {
                    if *n > 0 {
                        Ok(())
                    } else {
                        Err("Value must be positive".to_string())
                    }
                } else {
                    Err("Expected integer".to_string())
                }
            },
        }
    }

    /// Zero or positive integer type
    pub fn non_negative_int() -> AttributeType {
        AttributeType::Custom {
            name: "NonNegativeInt".to_string(),
            base: Box::new(AttributeType::Int),
            validate: |value| match value {
                Value::Int(n) if *n >= 0 => Ok(()),
                Value::Int(_) => Err("Value must not be negative".to_string()),
                _ => Err("Expected integer".to_string()),
            },
        }
    }

    /// Name of the int64-as-string custom type
    pub const INT64_STRING: &str = "Int64String";

    /// 64-bit integer carried as a decimal string (e.g., "9876543210")
    pub fn int64_string() -> AttributeType {
        AttributeType::Custom {
            name: INT64_STRING.to_string(),
            base: Box::new(AttributeType::String),
            validate: |value| {
                if let Value::String(s) = value {
                    s.parse::<i64>()
                        .map(|_| ())
                        .map_err(|_| format!("'{}' is not a 64-bit integer", s))
                } else {
                    Err("Expected string".to_string())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    #[test]
    fn validate_string_type() {
        let t = AttributeType::String;
        assert!(t.validate(&s("hello")).is_ok());
        assert!(t.validate(&Value::Int(42)).is_err());
    }

    #[test]
    fn validate_enum_type() {
        let t = AttributeType::Enum(vec!["kPhysical".to_string(), "kSQL".to_string()]);
        assert!(t.validate(&s("kPhysical")).is_ok());
        assert!(t.validate(&s("Environment.kSQL")).is_ok());
        assert!(t.validate(&s("kVMware")).is_err());
    }

    #[test]
    fn conflicting_attributes_are_reported_once() {
        let schema = ResourceSchema::new("source_registration").attributes(vec![
            AttributeSchema::new("endpoint", AttributeType::String)
                .optional()
                .conflicts_with(&["hostname"]),
            AttributeSchema::new("hostname", AttributeType::String)
                .optional()
                .conflicts_with(&["endpoint"]),
        ]);
        let attributes = HashMap::from([
            ("endpoint".to_string(), s("10.0.0.5")),
            ("hostname".to_string(), s("edge")),
        ]);

        let errors = schema.validate(&attributes).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], TypeError::ConflictingAttributes { .. }));
    }

    #[test]
    fn normalize_strips_enum_prefix_in_nested_blocks() {
        let unit = AttributeType::Enum(vec!["Days".to_string(), "Weeks".to_string()]);
        let schema = ResourceSchema::new("protection_policy").attributes(vec![
            AttributeSchema::new("name", AttributeType::String).required(),
            AttributeSchema::new(
                "retention",
                AttributeType::structure(
                    "Retention",
                    vec![
                        AttributeSchema::new("unit", unit).required(),
                        AttributeSchema::new("duration", AttributeType::Int).required(),
                    ],
                ),
            )
            .optional(),
        ]);
        let attributes = HashMap::from([
            ("name".to_string(), s("Policy.gold")),
            (
                "retention".to_string(),
                Value::Map(HashMap::from([
                    ("unit".to_string(), s("RetentionUnit.Days")),
                    ("duration".to_string(), Value::Int(7)),
                ])),
            ),
        ]);

        let normalized = schema.normalize(&attributes);
        assert_eq!(normalized.get("name"), Some(&s("Policy.gold")));
        let retention = normalized.get("retention").and_then(Value::as_map).unwrap();
        assert_eq!(retention.get("unit"), Some(&s("Days")));
        assert_eq!(retention.get("duration"), Some(&Value::Int(7)));
    }

    #[test]
    fn references_are_accepted_for_any_type() {
        let r = Value::ResourceRef("protection_policy.gold".to_string(), "id".to_string());
        assert!(AttributeType::Int.validate(&r).is_ok());
        assert!(types::int64_string().validate(&r).is_ok());
    }

    #[test]
    fn validate_positive_int() {
        let t = types::positive_int();
        assert!(t.validate(&Value::Int(1)).is_ok());
        assert!(t.validate(&Value::Int(0)).is_err());
        assert!(t.validate(&Value::Int(-1)).is_err());
    }

    #[test]
    fn validate_non_negative_int() {
        let t = types::non_negative_int();
        assert!(t.validate(&Value::Int(0)).is_ok());
        assert!(t.validate(&Value::Int(-1)).is_err());
        assert!(t.validate(&s("0")).is_err());
    }

    #[test]
    fn validate_int64_string() {
        let t = types::int64_string();
        assert!(t.validate(&s("9223372036854775807")).is_ok());
        assert!(t.validate(&s("-5")).is_ok());
        assert!(t.validate(&s("12abc")).is_err());
        assert!(t.validate(&Value::Int(5)).is_err());
    }

    #[test]
    fn validate_resource_schema() {
        let schema = ResourceSchema::new("resource")
            .attribute(AttributeSchema::new("name", AttributeType::String).required())
            .attribute(AttributeSchema::new("count", types::positive_int()).optional())
            .attribute(AttributeSchema::new("enabled", AttributeType::Bool).optional());

        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), s("my-resource"));
        attrs.insert("count".to_string(), Value::Int(5));
        attrs.insert("enabled".to_string(), Value::Bool(true));

        assert!(schema.validate(&attrs).is_ok());
    }

    #[test]
    fn missing_required_attribute() {
        let schema = ResourceSchema::new("policy")
            .attribute(AttributeSchema::new("name", AttributeType::String).required());

        let errors = schema.validate(&HashMap::new()).unwrap_err();
        assert!(matches!(&errors[0], TypeError::MissingRequired { name } if name == "name"));
    }

    #[test]
    fn read_only_attribute_cannot_be_set() {
        let schema = ResourceSchema::new("policy")
            .attribute(AttributeSchema::new("is_usable", AttributeType::Bool).read_only());

        let mut attrs = HashMap::new();
        attrs.insert("is_usable".to_string(), Value::Bool(true));
        let errors = schema.validate(&attrs).unwrap_err();
        assert!(matches!(&errors[0], TypeError::ReadOnlyAttribute { .. }));
    }

    #[test]
    fn optional_computed_attribute_can_be_set() {
        let schema = ResourceSchema::new("registration").attribute(
            AttributeSchema::new("name", AttributeType::String)
                .optional()
                .computed(),
        );
        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), s("host-1"));
        assert!(schema.validate(&attrs).is_ok());
    }

    #[test]
    fn conflicting_attributes_reported_once() {
        let schema = ResourceSchema::new("registration")
            .attribute(
                AttributeSchema::new("connection_id", types::int64_string())
                    .optional()
                    .conflicts_with(&["data_source_connection_id"]),
            )
            .attribute(
                AttributeSchema::new("data_source_connection_id", AttributeType::String)
                    .optional()
                    .conflicts_with(&["connection_id"]),
            );

        let mut attrs = HashMap::new();
        attrs.insert("connection_id".to_string(), s("12"));
        attrs.insert("data_source_connection_id".to_string(), s("abc"));
        let errors = schema.validate(&attrs).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(&errors[0], TypeError::ConflictingAttributes { .. }));
    }

    #[test]
    fn max_items_exceeded() {
        let schema = ResourceSchema::new("policy").attribute(
            AttributeSchema::new("ids", AttributeType::string_list())
                .optional()
                .max_items(1),
        );
        let mut attrs = HashMap::new();
        attrs.insert("ids".to_string(), Value::List(vec![s("a"), s("b")]));
        let errors = schema.validate(&attrs).unwrap_err();
        assert!(matches!(&errors[0], TypeError::TooManyItems { max: 1, got: 2, .. }));
    }

    #[test]
    fn nested_struct_errors_carry_path() {
        let schema = ResourceSchema::new("registration").attribute(
            AttributeSchema::new(
                "physical_params",
                AttributeType::structure(
                    "PhysicalParams",
                    vec![
                        AttributeSchema::new("endpoint", AttributeType::String).required(),
                        AttributeSchema::new("force_register", AttributeType::Bool).optional(),
                    ],
                ),
            )
            .optional(),
        );

        let mut params = HashMap::new();
        params.insert("force_register".to_string(), Value::Bool(true));
        let mut attrs = HashMap::new();
        attrs.insert("physical_params".to_string(), Value::Map(params));

        let errors = schema.validate(&attrs).unwrap_err();
        assert_eq!(
            errors[0].to_string(),
            "In 'physical_params': Required attribute 'endpoint' is missing"
        );
    }

    #[test]
    fn wire_name_defaults_to_lower_camel_case() {
        let a = AttributeSchema::new("registration_time_msecs", AttributeType::Int);
        assert_eq!(a.wire_name(), "registrationTimeMsecs");
        let b = AttributeSchema::new("is_cbs_enabled", AttributeType::Bool)
            .with_provider_name("isCBSEnabled");
        assert_eq!(b.wire_name(), "isCBSEnabled");
    }

    #[test]
    fn read_only_fields_recurse_into_blocks() {
        let fields: HashMap<String, AttributeSchema> = vec![AttributeSchema::new(
            "connections",
            AttributeType::list_of(
                "Connection",
                vec![AttributeSchema::new("entity_id", AttributeType::Int).required()],
            ),
        )
        .optional()
        .force_new()]
        .into_iter()
        .map(|a| (a.name.clone(), a))
        .collect();

        let ro = read_only_fields(&fields);
        let connections = &ro["connections"];
        assert!(connections.is_read_only());
        assert!(!connections.force_new);
        let inner = connections.attr_type.struct_fields().unwrap();
        assert!(inner["entity_id"].is_read_only());
    }

    #[test]
    fn force_new_attributes_sorted() {
        let schema = ResourceSchema::new("registration")
            .attribute(AttributeSchema::new("x_ibm_tenant_id", AttributeType::String).required().force_new())
            .attribute(AttributeSchema::new("environment", AttributeType::String).required().force_new())
            .attribute(AttributeSchema::new("name", AttributeType::String).optional());
        assert_eq!(
            schema.force_new_attributes(),
            vec!["environment", "x_ibm_tenant_id"]
        );
    }
}
