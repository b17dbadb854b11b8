//! data_source_connector schema
//!
//! Connectors come into existence when a host registers with a connection
//! token, so the resource only adopts an existing connector and renames it.

use custodian_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::common::{computed_block, list_data_source, tenant_id};

pub const RESOURCE_TYPE: &str = "data_source_connector";
pub const DATA_SOURCE_TYPE: &str = "data_source_connectors";

pub fn schema() -> ResourceSchema {
    ResourceSchema::new(RESOURCE_TYPE)
        .with_description("Data-source connector adopted by ID")
        .attribute(tenant_id())
        .attribute(
            AttributeSchema::new("connector_id", AttributeType::String)
                .required()
                .force_new(),
        )
        .attribute(AttributeSchema::new("connector_name", AttributeType::String).required())
        .attribute(AttributeSchema::new("cluster_side_ip", AttributeType::String).read_only())
        .attribute(AttributeSchema::new("connection_id", AttributeType::String).read_only())
        .attribute(computed_block(
            "connectivity_status",
            "ConnectivityStatus",
            vec![
                AttributeSchema::new("is_connected", AttributeType::Bool),
                AttributeSchema::new("last_connected_timestamp_secs", AttributeType::Int),
                AttributeSchema::new("message", AttributeType::String),
            ],
        ))
        .attribute(AttributeSchema::new("software_version", AttributeType::String).read_only())
        .attribute(AttributeSchema::new("tenant_side_ip", AttributeType::String).read_only())
        .attribute(computed_block(
            "upgrade_status",
            "ConnectorUpgradeStatus",
            vec![
                AttributeSchema::new("last_status_fetched_timestamp_msecs", AttributeType::Int),
                AttributeSchema::new("message", AttributeType::String),
                AttributeSchema::new("start_timestamp_msecs", AttributeType::Int),
                AttributeSchema::new("status", AttributeType::String),
            ],
        ))
}

pub fn list_schema() -> ResourceSchema {
    list_data_source(
        DATA_SOURCE_TYPE,
        schema(),
        "DataSourceConnector",
        "connectors",
        vec![
            AttributeSchema::new("connector_ids", AttributeType::string_list()).optional(),
            AttributeSchema::new("connector_names", AttributeType::string_list()).optional(),
            AttributeSchema::new("connection_id", AttributeType::String).optional(),
        ],
    )
    .with_description("Lists the data-source connectors of a tenant")
}
