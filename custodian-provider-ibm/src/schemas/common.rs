//! Building blocks shared by several schema trees

use std::collections::HashMap;

use custodian_core::schema::{AttributeSchema, AttributeType, ResourceSchema, read_only_fields};

pub const TENANT_ID: &str = "x_ibm_tenant_id";

/// Tenant header value; replacing it moves the resource to another tenant
pub fn tenant_id() -> AttributeSchema {
    AttributeSchema::new(TENANT_ID, AttributeType::String)
        .required()
        .force_new()
        .with_description("Tenant ID sent as the X-IBM-Tenant-Id header")
}

pub fn enum_of(variants: &[&str]) -> AttributeType {
    AttributeType::Enum(variants.iter().map(|v| v.to_string()).collect())
}

pub fn key_value_pair() -> AttributeType {
    AttributeType::structure(
        "KeyValuePair",
        vec![
            AttributeSchema::new("key", AttributeType::String).required(),
            AttributeSchema::new("value", AttributeType::String).required(),
        ],
    )
}

pub fn time_range_usecs() -> AttributeType {
    AttributeType::structure(
        "TimeRangeUsecs",
        vec![
            AttributeSchema::new("start_time_usecs", AttributeType::Int).optional(),
            AttributeSchema::new("end_time_usecs", AttributeType::Int).optional(),
        ],
    )
}

/// Nested block reported by the API only
pub fn computed_block(name: &str, type_name: &str, fields: Vec<AttributeSchema>) -> AttributeSchema {
    AttributeSchema::new(name, computed_struct(type_name, fields)).read_only()
}

fn computed_struct(type_name: &str, fields: Vec<AttributeSchema>) -> AttributeType {
    let fields: HashMap<String, AttributeSchema> =
        fields.into_iter().map(|f| (f.name.clone(), f)).collect();
    AttributeType::Struct {
        name: type_name.to_string(),
        fields: read_only_fields(&fields),
    }
}

/// Schema of a list data source
///
/// Each element of `output` mirrors the resource schema with every field
/// computed; the tenant header stays a top-level input.
pub fn list_data_source(
    data_source_type: &str,
    resource: ResourceSchema,
    element_name: &str,
    output: &str,
    filters: Vec<AttributeSchema>,
) -> ResourceSchema {
    let mut element = resource.attributes;
    element.remove(TENANT_ID);

    let tenant = AttributeSchema::new(TENANT_ID, AttributeType::String)
        .required()
        .with_description("Tenant ID sent as the X-IBM-Tenant-Id header");

    ResourceSchema::new(data_source_type)
        .attribute(tenant)
        .attributes(filters)
        .attribute(
            AttributeSchema::new(
                output,
                AttributeType::List(Box::new(AttributeType::Struct {
                    name: element_name.to_string(),
                    fields: read_only_fields(&element),
                })),
            )
            .read_only(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computed_block_marks_nested_fields() {
        let block = computed_block(
            "connectivity_status",
            "ConnectivityStatus",
            vec![AttributeSchema::new("is_connected", AttributeType::Bool).optional()],
        );
        assert!(block.is_read_only());
        let fields = block.attr_type.struct_fields().unwrap();
        assert!(fields["is_connected"].is_read_only());
    }

    #[test]
    fn list_data_source_drops_tenant_from_elements() {
        let resource = ResourceSchema::new("thing")
            .attribute(tenant_id())
            .attribute(AttributeSchema::new("name", AttributeType::String).required());
        let ds = list_data_source(
            "things",
            resource,
            "Thing",
            "things",
            vec![AttributeSchema::new("names", AttributeType::string_list()).optional()],
        );

        assert!(ds.attributes[TENANT_ID].required);
        assert!(!ds.attributes[TENANT_ID].force_new);
        let element = ds.attributes["things"].attr_type.struct_fields().unwrap();
        assert!(!element.contains_key(TENANT_ID));
        assert!(element["name"].is_read_only());
    }
}
