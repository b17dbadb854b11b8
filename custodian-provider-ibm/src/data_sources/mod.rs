//! Data sources
//!
//! Each list data source turns its filter attributes into a list call and
//! stores the result under one computed list attribute; its state identifier
//! is the tenant. `source_registration_info` reads a single registration and
//! is identified by `<tenant>::<id>`.

pub mod data_source_connections;
pub mod data_source_connectors;
pub mod protection_policies;
pub mod source_registration_info;
pub mod source_registrations;

use std::collections::HashMap;

use custodian_core::provider::ProviderResult;
use custodian_core::resource::{Resource, State, Value};
use custodian_core::schema::ResourceSchema;
use serde::Serialize;

use crate::convert::response_to_map;
use crate::utils::Operation;

fn string_list(attributes: &HashMap<String, Value>, name: &str) -> Vec<String> {
    attributes
        .get(name)
        .and_then(Value::as_list)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn int_list(attributes: &HashMap<String, Value>, name: &str) -> Vec<i64> {
    attributes
        .get(name)
        .and_then(Value::as_list)
        .map(|items| items.iter().filter_map(Value::as_int).collect())
        .unwrap_or_default()
}

fn string(attributes: &HashMap<String, Value>, name: &str) -> Option<String> {
    attributes.get(name).and_then(Value::as_str).map(str::to_string)
}

/// Enum filter values may be written as `Type.variant`
fn enum_variant(value: String) -> String {
    match value.rsplit_once('.') {
        Some((_, variant)) => variant.to_string(),
        None => value,
    }
}

fn flag(attributes: &HashMap<String, Value>, name: &str) -> Option<bool> {
    attributes.get(name).and_then(Value::as_bool)
}

/// Data-source state: the configured filters plus the listed items
fn list_state<T: Serialize>(
    op: &Operation<'_>,
    resource: &Resource,
    tenant: &str,
    schema: ResourceSchema,
    output: &str,
    items: &[T],
) -> ProviderResult<State> {
    let fields = schema
        .attributes
        .get(output)
        .and_then(|attr| attr.attr_type.struct_fields())
        .ok_or_else(|| {
            op.failed_at(
                "response-to-map",
                format!("no element schema for '{}'", output),
            )
        })?;

    let elements = items
        .iter()
        .map(|item| response_to_map(fields, item).map(Value::Map))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| op.failed_at("response-to-map", e))?;

    log::debug!("{}: {} {}", op.id, elements.len(), output);
    let mut attributes = resource.attributes.clone();
    attributes.insert(output.to_string(), Value::List(elements));
    Ok(State::existing(resource.id.clone(), attributes).with_identifier(tenant))
}
