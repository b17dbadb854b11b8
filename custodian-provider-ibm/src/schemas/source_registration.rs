//! source_registration schema

use custodian_core::schema::{
    AttributeSchema, AttributeType, ResourceSchema, read_only_fields, types,
};

use super::common::{
    TENANT_ID, computed_block, enum_of, key_value_pair, list_data_source, tenant_id,
    time_range_usecs,
};

pub const RESOURCE_TYPE: &str = "source_registration";
pub const DATA_SOURCE_TYPE: &str = "source_registrations";
pub const LOOKUP_DATA_SOURCE_TYPE: &str = "source_registration_info";

pub const ENVIRONMENTS: &[&str] = &["kPhysical", "kSQL"];

const HOST_TYPES: &[&str] = &[
    "kLinux",
    "kWindows",
    "kAix",
    "kSolaris",
    "kSapHana",
    "kSapOracle",
    "kCockroachDB",
    "kMySQL",
    "kOther",
    "kSapSybase",
    "kSapMaxDB",
    "kSapSybaseIQ",
    "kDB2",
    "kSapASE",
    "kMariaDB",
    "kPostgreSQL",
    "kVOS",
    "kHPUX",
];

const PHYSICAL_TYPES: &[&str] = &[
    "kGroup",
    "kHost",
    "kWindowsCluster",
    "kOracleRACCluster",
    "kOracleAPCluster",
    "kUnixCluster",
];

pub fn schema() -> ResourceSchema {
    ResourceSchema::new(RESOURCE_TYPE)
        .with_description("Registration of a physical or SQL protection source")
        .attribute(tenant_id())
        .attribute(
            AttributeSchema::new("environment", enum_of(ENVIRONMENTS))
                .required()
                .with_description("Source environment; changed in place with PATCH"),
        )
        .attribute(AttributeSchema::new("name", AttributeType::String).optional())
        .attribute(AttributeSchema::new("is_internal_encrypted", AttributeType::Bool).optional())
        .attribute(
            AttributeSchema::new("encryption_key", AttributeType::String)
                .optional()
                .sensitive(),
        )
        .attribute(
            AttributeSchema::new("connection_id", types::int64_string())
                .optional()
                .with_description("Legacy numeric connection ID"),
        )
        .attribute(
            AttributeSchema::new("connections", connection_config())
                .optional()
                .computed(),
        )
        .attribute(AttributeSchema::new("connector_group_id", AttributeType::Int).optional())
        .attribute(
            AttributeSchema::new("advanced_configs", AttributeType::List(Box::new(key_value_pair())))
                .optional(),
        )
        .attribute(
            AttributeSchema::new("data_source_connection_id", AttributeType::String)
                .optional()
                .computed(),
        )
        .attribute(AttributeSchema::new("physical_params", physical_params()).optional())
        .attribute(
            AttributeSchema::new("registration_id", AttributeType::Int)
                .read_only()
                .with_provider_name("id"),
        )
        .attribute(AttributeSchema::new("source_id", AttributeType::Int).read_only())
        .attribute(source_info())
        .attribute(AttributeSchema::new("authentication_status", AttributeType::String).read_only())
        .attribute(AttributeSchema::new("registration_time_msecs", AttributeType::Int).read_only())
        .attribute(AttributeSchema::new("last_refreshed_time_msecs", AttributeType::Int).read_only())
        .attribute(external_metadata())
}

pub fn list_schema() -> ResourceSchema {
    list_data_source(
        DATA_SOURCE_TYPE,
        schema(),
        "SourceRegistration",
        "registrations",
        vec![
            AttributeSchema::new("ids", AttributeType::int_list()).optional(),
            AttributeSchema::new("include_source_credentials", AttributeType::Bool).optional(),
            AttributeSchema::new("encryption_key", AttributeType::String)
                .optional()
                .sensitive(),
            AttributeSchema::new("use_cached_data", AttributeType::Bool).optional(),
            AttributeSchema::new("include_external_metadata", AttributeType::Bool).optional(),
            AttributeSchema::new("ignore_tenant_migration_in_progress_check", AttributeType::Bool)
                .optional(),
        ],
    )
    .with_description("Lists the source registrations of a tenant")
}

/// One registration looked up by id; every registration field is read-only
pub fn lookup_schema() -> ResourceSchema {
    let mut fields = schema().attributes;
    fields.remove(TENANT_ID);

    ResourceSchema::new(LOOKUP_DATA_SOURCE_TYPE)
        .with_description("Reads one source registration by id")
        .attribute(
            AttributeSchema::new(TENANT_ID, AttributeType::String)
                .required()
                .with_description("Tenant ID sent as the X-IBM-Tenant-Id header"),
        )
        .attribute(
            AttributeSchema::new("source_registration_id", types::positive_int())
                .required()
                .with_description("ID of the protection source registration"),
        )
        .attribute(
            AttributeSchema::new(
                "request_initiator_type",
                enum_of(&["UIUser", "UIAuto", "Helios"]),
            )
            .optional(),
        )
        .attributes(read_only_fields(&fields).into_values().collect())
}

fn connection_config() -> AttributeType {
    AttributeType::list_of(
        "ConnectionConfig",
        vec![
            AttributeSchema::new("connection_id", types::int64_string())
                .optional()
                .computed(),
            AttributeSchema::new("entity_id", AttributeType::Int)
                .optional()
                .computed(),
            AttributeSchema::new("connector_group_id", AttributeType::Int)
                .optional()
                .computed(),
            AttributeSchema::new("data_source_connection_id", AttributeType::String)
                .optional()
                .computed(),
        ],
    )
}

fn physical_params() -> AttributeType {
    AttributeType::structure(
        "PhysicalSourceRegistrationParams",
        vec![
            AttributeSchema::new("endpoint", AttributeType::String).required(),
            AttributeSchema::new("force_register", AttributeType::Bool).optional(),
            AttributeSchema::new("host_type", enum_of(HOST_TYPES)).optional(),
            AttributeSchema::new("physical_type", enum_of(PHYSICAL_TYPES)).optional(),
            AttributeSchema::new(
                "applications",
                AttributeType::List(Box::new(enum_of(&["kSQL", "kOracle"]))),
            )
            .optional(),
        ],
    )
}

fn source_info() -> AttributeSchema {
    let protection_stats = vec![
        AttributeSchema::new("environment", AttributeType::String),
        AttributeSchema::new("protected_count", AttributeType::Int),
        AttributeSchema::new("unprotected_count", AttributeType::Int),
        AttributeSchema::new("deleted_protected_count", AttributeType::Int),
        AttributeSchema::new("protected_size_bytes", AttributeType::Int),
        AttributeSchema::new("unprotected_size_bytes", AttributeType::Int),
    ];
    let mssql_params = vec![
        AttributeSchema::new(
            "aag_info",
            AttributeType::structure(
                "AagInfo",
                vec![
                    AttributeSchema::new("name", AttributeType::String),
                    AttributeSchema::new("object_id", AttributeType::Int),
                ],
            ),
        ),
        AttributeSchema::new(
            "host_info",
            AttributeType::structure(
                "HostInformation",
                vec![
                    AttributeSchema::new("id", AttributeType::String),
                    AttributeSchema::new("name", AttributeType::String),
                    AttributeSchema::new("environment", AttributeType::String),
                ],
            ),
        ),
        AttributeSchema::new("is_encrypted", AttributeType::Bool),
    ];

    computed_block(
        "source_info",
        "SourceObject",
        vec![
            AttributeSchema::new("id", AttributeType::Int),
            AttributeSchema::new("name", AttributeType::String),
            AttributeSchema::new("source_id", AttributeType::Int),
            AttributeSchema::new("source_name", AttributeType::String),
            AttributeSchema::new("environment", AttributeType::String),
            AttributeSchema::new("object_hash", AttributeType::String),
            AttributeSchema::new("object_type", AttributeType::String),
            AttributeSchema::new("logical_size_bytes", AttributeType::Int),
            AttributeSchema::new("uuid", AttributeType::String),
            AttributeSchema::new("global_id", AttributeType::String),
            AttributeSchema::new("protection_type", AttributeType::String),
            AttributeSchema::new("os_type", AttributeType::String),
            AttributeSchema::new(
                "sharepoint_site_summary",
                AttributeType::structure(
                    "SharepointObjectParams",
                    vec![AttributeSchema::new("site_web_url", AttributeType::String)],
                ),
            ),
            AttributeSchema::new(
                "v_center_summary",
                AttributeType::structure(
                    "VCenterSummary",
                    vec![AttributeSchema::new("is_cloud_env", AttributeType::Bool)],
                ),
            ),
            AttributeSchema::new(
                "windows_cluster_summary",
                AttributeType::structure(
                    "WindowsClusterSummary",
                    vec![AttributeSchema::new("cluster_source_type", AttributeType::String)],
                ),
            ),
            AttributeSchema::new(
                "protection_stats",
                AttributeType::list_of("ObjectProtectionStats", protection_stats),
            ),
            AttributeSchema::new(
                "mssql_params",
                AttributeType::structure("ObjectMssqlParams", mssql_params),
            ),
            AttributeSchema::new(
                "physical_params",
                AttributeType::structure(
                    "ObjectPhysicalParams",
                    vec![AttributeSchema::new("enable_system_backup", AttributeType::Bool)],
                ),
            ),
        ],
    )
}

fn external_metadata() -> AttributeSchema {
    let time = || {
        AttributeType::structure(
            "Time",
            vec![
                AttributeSchema::new("hour", AttributeType::Int),
                AttributeSchema::new("minute", AttributeType::Int),
            ],
        )
    };
    let maintenance_schedule = vec![
        AttributeSchema::new(
            "periodic_time_windows",
            AttributeType::list_of(
                "TimeWindow",
                vec![
                    AttributeSchema::new("day_of_the_week", AttributeType::String),
                    AttributeSchema::new("start_time", time()),
                    AttributeSchema::new("end_time", time()),
                ],
            ),
        ),
        AttributeSchema::new("schedule_type", AttributeType::String),
        AttributeSchema::new("time_ranges", AttributeType::List(Box::new(time_range_usecs()))),
        AttributeSchema::new("timezone", AttributeType::String),
    ];

    computed_block(
        "external_metadata",
        "EntityExternalMetadata",
        vec![AttributeSchema::new(
            "maintenance_mode_config",
            AttributeType::structure(
                "MaintenanceModeConfig",
                vec![
                    AttributeSchema::new(
                        "activation_time_intervals",
                        AttributeType::List(Box::new(time_range_usecs())),
                    ),
                    AttributeSchema::new(
                        "maintenance_schedule",
                        AttributeType::structure("MaintenanceSchedule", maintenance_schedule),
                    ),
                    AttributeSchema::new("user_message", AttributeType::String),
                    AttributeSchema::new(
                        "workflow_intervention_spec_list",
                        AttributeType::list_of(
                            "WorkflowInterventionSpec",
                            vec![
                                AttributeSchema::new("intervention", AttributeType::String),
                                AttributeSchema::new("workflow_type", AttributeType::String),
                            ],
                        ),
                    ),
                ],
            ),
        )],
    )
}

