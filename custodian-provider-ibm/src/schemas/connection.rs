//! data_source_connection schema

use custodian_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::common::{list_data_source, tenant_id};

pub const RESOURCE_TYPE: &str = "data_source_connection";
pub const DATA_SOURCE_TYPE: &str = "data_source_connections";

pub fn schema() -> ResourceSchema {
    ResourceSchema::new(RESOURCE_TYPE)
        .with_description("Connection between a tenant and its data-source connectors")
        .attribute(tenant_id())
        .attribute(
            AttributeSchema::new("connection_name", AttributeType::String)
                .required()
                .with_description("Name of the connection"),
        )
        .attribute(AttributeSchema::new("connection_id", AttributeType::String).read_only())
        .attribute(AttributeSchema::new("connector_ids", AttributeType::string_list()).read_only())
        .attribute(
            AttributeSchema::new("registration_token", AttributeType::String)
                .read_only()
                .sensitive()
                .with_description("Token a connector presents when it first registers"),
        )
        .attribute(AttributeSchema::new("tenant_id", AttributeType::String).read_only())
        .attribute(AttributeSchema::new("upgrading_connector_id", AttributeType::String).read_only())
}

pub fn list_schema() -> ResourceSchema {
    list_data_source(
        DATA_SOURCE_TYPE,
        schema(),
        "DataSourceConnection",
        "connections",
        vec![
            AttributeSchema::new("connection_ids", AttributeType::string_list()).optional(),
            AttributeSchema::new("connection_names", AttributeType::string_list()).optional(),
        ],
    )
    .with_description("Lists the data-source connections of a tenant")
}
