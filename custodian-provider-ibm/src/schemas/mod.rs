//! Schema trees for every resource and data source

pub mod common;
pub mod connection;
pub mod connector;
pub mod protection_policy;
pub mod source_registration;

use custodian_core::schema::ResourceSchema;

/// Every resource and data-source schema the provider exposes
pub fn all() -> Vec<ResourceSchema> {
    vec![
        connection::schema(),
        connector::schema(),
        source_registration::schema(),
        protection_policy::schema(),
        connection::list_schema(),
        connector::list_schema(),
        source_registration::list_schema(),
        protection_policy::list_schema(),
        source_registration::lookup_schema(),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use custodian_core::resource::Value;
    use custodian_core::schema::TypeError;

    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    fn map(pairs: Vec<(&str, Value)>) -> Value {
        Value::Map(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn every_resource_has_force_new_tenant() {
        let resources = [
            connection::RESOURCE_TYPE,
            connector::RESOURCE_TYPE,
            source_registration::RESOURCE_TYPE,
            protection_policy::RESOURCE_TYPE,
        ];
        for schema in all() {
            let tenant = &schema.attributes[common::TENANT_ID];
            assert!(tenant.required, "{}", schema.resource_type);
            let is_resource = resources.contains(&schema.resource_type.as_str());
            assert_eq!(tenant.force_new, is_resource, "{}", schema.resource_type);
        }
    }

    #[test]
    fn schema_type_names_are_unique() {
        let mut names: Vec<_> = all().into_iter().map(|s| s.resource_type).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 9);
    }

    #[test]
    fn registration_accepts_both_connection_ids() {
        let schema = source_registration::schema();
        let mut attrs = HashMap::new();
        attrs.insert("x_ibm_tenant_id".to_string(), s("tenant-a/"));
        attrs.insert("environment".to_string(), s("kPhysical"));
        attrs.insert("connection_id".to_string(), s("123"));
        attrs.insert("data_source_connection_id".to_string(), s("dsc-1"));

        assert!(schema.validate(&attrs).is_ok());
    }

    #[test]
    fn registration_lookup_needs_only_tenant_and_id() {
        let schema = source_registration::lookup_schema();
        let mut attrs = HashMap::new();
        attrs.insert("x_ibm_tenant_id".to_string(), s("tenant-a/"));
        attrs.insert("source_registration_id".to_string(), Value::Int(42));
        attrs.insert("request_initiator_type".to_string(), s("UIUser"));
        assert!(schema.validate(&attrs).is_ok());

        assert!(schema.attributes["environment"].is_read_only());
        assert!(schema.attributes["physical_params"].is_read_only());

        attrs.insert("name".to_string(), s("host"));
        let errors = schema.validate(&attrs).unwrap_err();
        assert!(matches!(errors[0], TypeError::ReadOnlyAttribute { .. }));
    }

    #[test]
    fn registration_rejects_unknown_environment() {
        let schema = source_registration::schema();
        let mut attrs = HashMap::new();
        attrs.insert("x_ibm_tenant_id".to_string(), s("tenant-a/"));
        attrs.insert("environment".to_string(), s("kVMware"));

        let errors = schema.validate(&attrs).unwrap_err();
        assert!(matches!(errors[0], TypeError::InvalidEnumVariant { .. }));
    }

    #[test]
    fn registration_source_info_is_read_only() {
        let schema = source_registration::schema();
        let mut attrs = HashMap::new();
        attrs.insert("x_ibm_tenant_id".to_string(), s("tenant-a/"));
        attrs.insert("environment".to_string(), s("kPhysical"));
        attrs.insert("source_info".to_string(), map(vec![("name", s("x"))]));

        let errors = schema.validate(&attrs).unwrap_err();
        assert!(matches!(errors[0], TypeError::ReadOnlyAttribute { .. }));
    }

    #[test]
    fn policy_validates_nested_schedule() {
        let schema = protection_policy::schema();
        let retention = map(vec![("unit", s("Days")), ("duration", Value::Int(7))]);
        let backup_policy = map(vec![(
            "regular",
            map(vec![
                (
                    "incremental",
                    map(vec![(
                        "schedule",
                        map(vec![
                            ("unit", s("Hours")),
                            ("hour_schedule", map(vec![("frequency", Value::Int(0))])),
                        ]),
                    )]),
                ),
                ("retention", retention),
            ]),
        )]);

        let mut attrs = HashMap::new();
        attrs.insert("x_ibm_tenant_id".to_string(), s("tenant-a/"));
        attrs.insert("name".to_string(), s("gold"));
        attrs.insert("backup_policy".to_string(), backup_policy);

        let errors = schema.validate(&attrs).unwrap_err();
        assert_eq!(errors.len(), 1);
        let message = errors[0].to_string();
        assert!(message.contains("backup_policy"), "{}", message);
        assert!(message.contains("hour_schedule"), "{}", message);
    }

    #[test]
    fn policy_wire_names_match_models() {
        let schema = protection_policy::schema();
        assert_eq!(schema.attributes["is_cbs_enabled"].wire_name(), "isCBSEnabled");
        assert_eq!(schema.attributes["policy_id"].wire_name(), "id");
        assert_eq!(
            schema.attributes["cascaded_targets_config"].wire_name(),
            "cascadedTargetsConfig"
        );
    }

    #[test]
    fn list_schemas_expose_computed_outputs() {
        for (schema, output) in [
            (connection::list_schema(), "connections"),
            (connector::list_schema(), "connectors"),
            (source_registration::list_schema(), "registrations"),
            (protection_policy::list_schema(), "policies"),
        ] {
            let attr = &schema.attributes[output];
            assert!(attr.is_read_only(), "{}", output);
            let element = attr.attr_type.struct_fields().unwrap();
            assert!(element.values().all(|f| f.is_read_only()), "{}", output);
        }
    }
}
