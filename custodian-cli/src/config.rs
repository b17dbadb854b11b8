//! Configuration file loading
//!
//! The configuration is a JSON document:
//!
//! ```json
//! {
//!   "provider": { "region": "us-east", "instance_id": "..." },
//!   "backend": { "type": "local", "path": "custodian.state.json" },
//!   "resources": [ { "type": "protection_policy", "name": "gold", "attributes": { ... } } ],
//!   "data": [ { "type": "protection_policies", "name": "all", "attributes": { ... } } ]
//! }
//! ```
//!
//! String values of the form `${type.name.attribute}` become references.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use custodian_core::resource::{Resource, Value};
use custodian_provider_ibm::ProviderConfig;
use custodian_state::BackendConfig;
use regex::Regex;
use serde::Deserialize;

const REFERENCE_PATTERN: &str = r"^\$\{([a-z][a-z0-9_]*)\.([A-Za-z0-9_-]+)\.([a-z][a-z0-9_]*)\}$";

/// Parsed configuration file
pub struct Configuration {
    pub provider: ProviderConfig,
    pub backend: BackendConfig,
    pub resources: Vec<Resource>,
    pub data: Vec<Resource>,
}

impl Configuration {
    /// Managed resources followed by data sources
    pub fn blocks(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter().chain(self.data.iter())
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfiguration {
    #[serde(default)]
    provider: ProviderConfig,
    #[serde(default)]
    backend: Option<RawBackend>,
    #[serde(default)]
    resources: Vec<RawBlock>,
    #[serde(default)]
    data: Vec<RawBlock>,
}

#[derive(Deserialize)]
struct RawBackend {
    #[serde(rename = "type", default = "default_backend")]
    backend_type: String,
    #[serde(flatten)]
    attributes: serde_json::Map<String, serde_json::Value>,
}

fn default_backend() -> String {
    "local".to_string()
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBlock {
    #[serde(rename = "type")]
    resource_type: String,
    name: String,
    #[serde(default)]
    attributes: serde_json::Map<String, serde_json::Value>,
}

pub fn load(path: &Path) -> Result<Configuration, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    parse(&content).map_err(|e| format!("{}: {}", path.display(), e))
}

pub fn parse(content: &str) -> Result<Configuration, String> {
    let raw: RawConfiguration =
        serde_json::from_str(content).map_err(|e| format!("Parse error: {}", e))?;
    let reference = Regex::new(REFERENCE_PATTERN).map_err(|e| e.to_string())?;

    let mut seen = HashSet::new();
    let mut block = |raw: RawBlock, read_only: bool| -> Result<Resource, String> {
        if !seen.insert((raw.resource_type.clone(), raw.name.clone())) {
            return Err(format!(
                "Duplicate block {}.{}",
                raw.resource_type, raw.name
            ));
        }
        let mut resource = Resource::new(raw.resource_type, raw.name).with_read_only(read_only);
        for (key, value) in &raw.attributes {
            if let Some(value) = convert(value, &reference) {
                resource.attributes.insert(key.clone(), value);
            }
        }
        Ok(resource)
    };

    let resources = raw
        .resources
        .into_iter()
        .map(|b| block(b, false))
        .collect::<Result<Vec<_>, _>>()?;
    let data = raw
        .data
        .into_iter()
        .map(|b| block(b, true))
        .collect::<Result<Vec<_>, _>>()?;

    let backend = match raw.backend {
        Some(b) => BackendConfig {
            backend_type: b.backend_type,
            attributes: b
                .attributes
                .iter()
                .filter_map(|(k, v)| Value::from_json(v).map(|v| (k.clone(), v)))
                .collect(),
        },
        None => BackendConfig::local(),
    };

    Ok(Configuration {
        provider: raw.provider,
        backend,
        resources,
        data,
    })
}

/// JSON to Value, turning `${type.name.attr}` strings into references
fn convert(value: &serde_json::Value, reference: &Regex) -> Option<Value> {
    match value {
        serde_json::Value::String(s) => Some(match reference.captures(s) {
            Some(caps) => Value::ResourceRef(
                format!("{}.{}", &caps[1], &caps[2]),
                caps[3].to_string(),
            ),
            None => Value::String(s.clone()),
        }),
        serde_json::Value::Array(items) => Some(Value::List(
            items.iter().filter_map(|v| convert(v, reference)).collect(),
        )),
        serde_json::Value::Object(map) => Some(Value::Map(
            map.iter()
                .filter_map(|(k, v)| convert(v, reference).map(|v| (k.clone(), v)))
                .collect::<HashMap<_, _>>(),
        )),
        other => Value::from_json(other),
    }
}
