//! Resource type definitions and CRUD entry points
//!
//! This module defines:
//! - Resource and data-source types (implementing the ResourceType trait)
//! - One submodule per managed resource with its create/read/update/delete

pub mod data_source_connection;
pub mod data_source_connector;
pub mod protection_policy;
pub mod source_registration;

use custodian_core::provider::ResourceType;
use custodian_core::schema::ResourceSchema;

use crate::schemas::{
    connection, connector, protection_policy as policy_schema,
    source_registration as registration_schema,
};

// =============================================================================
// Resource Type Definitions
// =============================================================================

macro_rules! define_resource_type {
    ($name:ident, $type_name:expr, $schema:expr) => {
        define_resource_type!($name, $type_name, $schema, false);
    };
    ($name:ident, $type_name:expr, $schema:expr, $data_source:expr) => {
        pub struct $name;
        impl ResourceType for $name {
            fn name(&self) -> &'static str {
                $type_name
            }
            fn schema(&self) -> ResourceSchema {
                $schema()
            }
            fn is_data_source(&self) -> bool {
                $data_source
            }
        }
    };
}

define_resource_type!(
    DataSourceConnectionType,
    connection::RESOURCE_TYPE,
    connection::schema
);
define_resource_type!(
    DataSourceConnectorType,
    connector::RESOURCE_TYPE,
    connector::schema
);
define_resource_type!(
    SourceRegistrationType,
    registration_schema::RESOURCE_TYPE,
    registration_schema::schema
);
define_resource_type!(
    ProtectionPolicyType,
    policy_schema::RESOURCE_TYPE,
    policy_schema::schema
);

define_resource_type!(
    DataSourceConnectionsType,
    connection::DATA_SOURCE_TYPE,
    connection::list_schema,
    true
);
define_resource_type!(
    DataSourceConnectorsType,
    connector::DATA_SOURCE_TYPE,
    connector::list_schema,
    true
);
define_resource_type!(
    SourceRegistrationsType,
    registration_schema::DATA_SOURCE_TYPE,
    registration_schema::list_schema,
    true
);
define_resource_type!(
    ProtectionPoliciesType,
    policy_schema::DATA_SOURCE_TYPE,
    policy_schema::list_schema,
    true
);
define_resource_type!(
    SourceRegistrationInfoType,
    registration_schema::LOOKUP_DATA_SOURCE_TYPE,
    registration_schema::lookup_schema,
    true
);

/// Returns all resource and data-source types supported by this provider
pub fn resource_types() -> Vec<Box<dyn ResourceType>> {
    vec![
        Box::new(DataSourceConnectionType),
        Box::new(DataSourceConnectorType),
        Box::new(SourceRegistrationType),
        Box::new(ProtectionPolicyType),
        Box::new(DataSourceConnectionsType),
        Box::new(DataSourceConnectorsType),
        Box::new(SourceRegistrationsType),
        Box::new(ProtectionPoliciesType),
        Box::new(SourceRegistrationInfoType),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_match_schemas() {
        for rt in resource_types() {
            assert_eq!(rt.name(), rt.schema().resource_type);
        }
    }

    #[test]
    fn data_sources_are_flagged() {
        let data_sources: Vec<_> = resource_types()
            .into_iter()
            .filter(|rt| rt.is_data_source())
            .map(|rt| rt.name())
            .collect();
        assert_eq!(
            data_sources,
            vec![
                "data_source_connections",
                "data_source_connectors",
                "source_registrations",
                "protection_policies",
                "source_registration_info"
            ]
        );
    }
}
