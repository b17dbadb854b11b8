//! protection_policy schema
//!
//! The policy tree is deep but regular: every schedule, retention and
//! target block is built from the helpers below so the resource, its
//! request struct and the list data source stay in step.

use custodian_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::common::{enum_of, key_value_pair, list_data_source, tenant_id};

pub const RESOURCE_TYPE: &str = "protection_policy";
pub const DATA_SOURCE_TYPE: &str = "protection_policies";

const RETENTION_UNITS: &[&str] = &["Days", "Weeks", "Months", "Years"];
const DATA_LOCK_MODES: &[&str] = &["Compliance", "Administrative"];
const DAYS_OF_WEEK: &[&str] = &[
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub fn schema() -> ResourceSchema {
    ResourceSchema::new(RESOURCE_TYPE)
        .with_description("Protection policy: backup schedules, retention and copy targets")
        .attribute(tenant_id())
        .attribute(AttributeSchema::new("name", AttributeType::String).required())
        .attribute(
            AttributeSchema::new("backup_policy", backup_policy())
                .required()
                .with_description("Schedules and retention of the primary backups"),
        )
        .attribute(AttributeSchema::new("description", AttributeType::String).optional())
        .attribute(
            AttributeSchema::new("blackout_window", AttributeType::list_of("BlackoutWindow", blackout_window()))
                .optional(),
        )
        .attribute(
            AttributeSchema::new("extended_retention", extended_retention())
                .optional(),
        )
        .attribute(
            AttributeSchema::new("remote_target_policy", targets_configuration("TargetsConfiguration"))
                .optional(),
        )
        .attribute(
            AttributeSchema::new(
                "cascaded_targets_config",
                AttributeType::list_of(
                    "CascadedTargetConfiguration",
                    vec![
                        AttributeSchema::new("source_cluster_id", AttributeType::Int).required(),
                        AttributeSchema::new(
                            "remote_targets",
                            targets_configuration("RemoteTargets"),
                        )
                        .required(),
                    ],
                ),
            )
            .optional(),
        )
        .attribute(
            AttributeSchema::new(
                "retry_options",
                AttributeType::structure(
                    "RetryOptions",
                    vec![
                        AttributeSchema::new("retries", types::non_negative_int()).optional(),
                        AttributeSchema::new("retry_interval_mins", types::positive_int())
                            .optional(),
                    ],
                ),
            )
            .optional(),
        )
        .attribute(AttributeSchema::new("data_lock", enum_of(DATA_LOCK_MODES)).optional())
        .attribute(
            AttributeSchema::new("version", AttributeType::Int)
                .optional()
                .computed(),
        )
        .attribute(
            AttributeSchema::new("is_cbs_enabled", AttributeType::Bool)
                .optional()
                .with_provider_name("isCBSEnabled"),
        )
        .attribute(AttributeSchema::new("template_id", AttributeType::String).optional())
        .attribute(
            AttributeSchema::new("policy_id", AttributeType::String)
                .read_only()
                .with_provider_name("id"),
        )
        .attribute(
            AttributeSchema::new("last_modification_time_usecs", AttributeType::Int).read_only(),
        )
        .attribute(AttributeSchema::new("is_usable", AttributeType::Bool).read_only())
        .attribute(AttributeSchema::new("is_replicated", AttributeType::Bool).read_only())
        .attribute(AttributeSchema::new("num_protection_groups", AttributeType::Int).read_only())
        .attribute(AttributeSchema::new("num_protected_objects", AttributeType::Int).read_only())
}

pub fn list_schema() -> ResourceSchema {
    list_data_source(
        DATA_SOURCE_TYPE,
        schema(),
        "ProtectionPolicy",
        "policies",
        vec![
            AttributeSchema::new("ids", AttributeType::string_list()).optional(),
            AttributeSchema::new("policy_names", AttributeType::string_list()).optional(),
            AttributeSchema::new(
                "types",
                AttributeType::List(Box::new(enum_of(&["Regular", "Internal"]))),
            )
            .optional(),
            AttributeSchema::new("exclude_linked_policies", AttributeType::Bool).optional(),
            AttributeSchema::new("include_replicated_policies", AttributeType::Bool).optional(),
            AttributeSchema::new("include_stats", AttributeType::Bool).optional(),
            AttributeSchema::new(
                "request_initiator_type",
                enum_of(&["UIUser", "UIAuto", "Helios"]),
            )
            .optional(),
        ],
    )
    .with_description("Lists the protection policies of a tenant")
}

// =============================================================================
// Backup policy
// =============================================================================

fn backup_policy() -> AttributeType {
    let regular = vec![
        AttributeSchema::new(
            "incremental",
            AttributeType::structure(
                "IncrementalBackupPolicy",
                vec![
                    AttributeSchema::new(
                        "schedule",
                        schedule(&["Minutes", "Hours", "Days", "Weeks", "Months", "ProtectOnce"]),
                    )
                    .required(),
                ],
            ),
        )
        .optional(),
        AttributeSchema::new(
            "full",
            AttributeType::structure(
                "FullBackupPolicy",
                vec![AttributeSchema::new("schedule", full_schedule()).optional()],
            ),
        )
        .optional(),
        AttributeSchema::new(
            "full_backups",
            AttributeType::list_of(
                "FullScheduleAndRetention",
                vec![
                    AttributeSchema::new("schedule", full_schedule()).required(),
                    AttributeSchema::new("retention", retention()).required(),
                ],
            ),
        )
        .optional(),
        AttributeSchema::new("retention", retention()).optional(),
        AttributeSchema::new("primary_backup_target", primary_backup_target()).optional(),
    ];

    AttributeType::structure(
        "BackupPolicy",
        vec![
            AttributeSchema::new("regular", AttributeType::structure("RegularBackupPolicy", regular))
                .required(),
            AttributeSchema::new(
                "log",
                AttributeType::structure(
                    "LogBackupPolicy",
                    vec![
                        AttributeSchema::new("schedule", schedule(&["Minutes", "Hours"])).required(),
                        AttributeSchema::new("retention", retention()).required(),
                    ],
                ),
            )
            .optional(),
            AttributeSchema::new(
                "bmr",
                AttributeType::structure(
                    "BmrBackupPolicy",
                    vec![
                        AttributeSchema::new("schedule", schedule(&["Days", "Weeks", "Months", "Years"]))
                            .required(),
                        AttributeSchema::new("retention", retention()).required(),
                    ],
                ),
            )
            .optional(),
            AttributeSchema::new(
                "cdp",
                AttributeType::structure(
                    "CdpBackupPolicy",
                    vec![
                        AttributeSchema::new(
                            "retention",
                            retention_with_units("CdpRetention", &["Minutes", "Hours", "Days"]),
                        )
                        .required(),
                    ],
                ),
            )
            .optional(),
            AttributeSchema::new(
                "storage_array_snapshot",
                AttributeType::structure(
                    "StorageArraySnapshotBackupPolicy",
                    vec![
                        AttributeSchema::new(
                            "schedule",
                            schedule(&["Minutes", "Hours", "Days", "Weeks", "Months", "Years"]),
                        )
                        .required(),
                        AttributeSchema::new("retention", retention()).required(),
                    ],
                ),
            )
            .optional(),
            AttributeSchema::new("run_timeouts", run_timeouts()).optional(),
        ],
    )
}

fn full_schedule() -> AttributeType {
    schedule(&["Days", "Weeks", "Months", "Years", "ProtectOnce"])
}

fn primary_backup_target() -> AttributeType {
    AttributeType::structure(
        "PrimaryBackupTarget",
        vec![
            AttributeSchema::new("target_type", enum_of(&["Local", "Archival"])).optional(),
            AttributeSchema::new(
                "archival_target_settings",
                AttributeType::structure(
                    "PrimaryArchivalTarget",
                    vec![
                        AttributeSchema::new("target_id", AttributeType::Int).required(),
                        AttributeSchema::new("target_name", AttributeType::String)
                            .optional()
                            .computed(),
                        AttributeSchema::new("tier_settings", tier_settings()).optional(),
                    ],
                ),
            )
            .optional(),
            AttributeSchema::new("use_default_backup_target", AttributeType::Bool).optional(),
        ],
    )
}

fn run_timeouts() -> AttributeType {
    AttributeType::list_of(
        "CancellationTimeoutParams",
        vec![
            AttributeSchema::new("timeout_mins", AttributeType::Int).optional(),
            AttributeSchema::new("backup_type", enum_of(&["kRegular", "kFull", "kLog", "kSystem"]))
                .optional(),
        ],
    )
}

/// Schedule block; `units` lists the values the API accepts at this position
fn schedule(units: &[&str]) -> AttributeType {
    let frequency = || {
        AttributeType::structure(
            "FrequencySchedule",
            vec![AttributeSchema::new("frequency", types::positive_int()).required()],
        )
    };

    AttributeType::structure(
        "Schedule",
        vec![
            AttributeSchema::new("unit", enum_of(units)).required(),
            AttributeSchema::new("minute_schedule", frequency()).optional(),
            AttributeSchema::new("hour_schedule", frequency()).optional(),
            AttributeSchema::new("day_schedule", frequency()).optional(),
            AttributeSchema::new(
                "week_schedule",
                AttributeType::structure(
                    "WeekSchedule",
                    vec![
                        AttributeSchema::new("day_of_week", AttributeType::List(Box::new(enum_of(DAYS_OF_WEEK))))
                            .required(),
                    ],
                ),
            )
            .optional(),
            AttributeSchema::new(
                "month_schedule",
                AttributeType::structure(
                    "MonthSchedule",
                    vec![
                        AttributeSchema::new("day_of_week", AttributeType::List(Box::new(enum_of(DAYS_OF_WEEK))))
                            .optional(),
                        AttributeSchema::new(
                            "week_of_month",
                            enum_of(&["First", "Second", "Third", "Fourth", "Last"]),
                        )
                        .optional(),
                        AttributeSchema::new("day_of_month", AttributeType::Int).optional(),
                    ],
                ),
            )
            .optional(),
            AttributeSchema::new(
                "year_schedule",
                AttributeType::structure(
                    "YearSchedule",
                    vec![AttributeSchema::new("day_of_year", enum_of(&["First", "Last"])).required()],
                ),
            )
            .optional(),
        ],
    )
}

// =============================================================================
// Retention and data lock
// =============================================================================

fn retention() -> AttributeType {
    retention_with_units("Retention", RETENTION_UNITS)
}

fn retention_with_units(name: &str, units: &[&str]) -> AttributeType {
    AttributeType::structure(
        name,
        vec![
            AttributeSchema::new("unit", enum_of(units)).required(),
            AttributeSchema::new("duration", types::positive_int()).required(),
            AttributeSchema::new("data_lock_config", data_lock_config()).optional(),
        ],
    )
}

fn data_lock_config() -> AttributeType {
    AttributeType::structure(
        "DataLockConfig",
        vec![
            AttributeSchema::new("mode", enum_of(DATA_LOCK_MODES)).required(),
            AttributeSchema::new("unit", enum_of(RETENTION_UNITS)).required(),
            AttributeSchema::new("duration", types::positive_int()).required(),
            AttributeSchema::new("enable_worm_on_external_target", AttributeType::Bool).optional(),
        ],
    )
}

fn blackout_window() -> Vec<AttributeSchema> {
    let time_of_day = || {
        AttributeType::structure(
            "TimeOfDay",
            vec![
                AttributeSchema::new("hour", types::non_negative_int()).required(),
                AttributeSchema::new("minute", types::non_negative_int()).required(),
                AttributeSchema::new("time_zone", AttributeType::String)
                    .optional()
                    .computed(),
            ],
        )
    };

    vec![
        AttributeSchema::new("day", enum_of(DAYS_OF_WEEK)).required(),
        AttributeSchema::new("start_time", time_of_day()).required(),
        AttributeSchema::new("end_time", time_of_day()).required(),
        AttributeSchema::new("config_id", AttributeType::String)
            .optional()
            .computed(),
    ]
}

fn extended_retention() -> AttributeType {
    AttributeType::list_of(
        "ExtendedRetentionPolicy",
        vec![
            AttributeSchema::new(
                "schedule",
                AttributeType::structure(
                    "ExtendedRetentionSchedule",
                    vec![
                        AttributeSchema::new(
                            "unit",
                            enum_of(&["Runs", "Days", "Weeks", "Months", "Years"]),
                        )
                        .required(),
                        AttributeSchema::new("frequency", types::positive_int()).optional(),
                    ],
                ),
            )
            .required(),
            AttributeSchema::new("retention", retention()).required(),
            AttributeSchema::new(
                "run_type",
                enum_of(&["Regular", "Full", "Log", "System", "StorageArraySnapshot"]),
            )
            .optional(),
            AttributeSchema::new("config_id", AttributeType::String)
                .optional()
                .computed(),
        ],
    )
}

// =============================================================================
// Copy targets
// =============================================================================

fn targets_configuration(name: &str) -> AttributeType {
    AttributeType::structure(
        name,
        vec![
            AttributeSchema::new("replication_targets", replication_targets()).optional(),
            AttributeSchema::new("archival_targets", archival_targets()).optional(),
            AttributeSchema::new("cloud_spin_targets", cloud_spin_targets()).optional(),
            AttributeSchema::new("onprem_deploy_targets", onprem_deploy_targets()).optional(),
            AttributeSchema::new("rpaas_targets", rpaas_targets()).optional(),
        ],
    )
}

/// Fields every copy target shares, followed by the target-specific ones
fn target(name: &str, specific: Vec<AttributeSchema>) -> AttributeType {
    let mut fields = vec![
        AttributeSchema::new(
            "schedule",
            AttributeType::structure(
                "TargetSchedule",
                vec![
                    AttributeSchema::new(
                        "unit",
                        enum_of(&["Runs", "Hours", "Days", "Weeks", "Months", "Years"]),
                    )
                    .required(),
                    AttributeSchema::new("frequency", types::positive_int()).optional(),
                ],
            ),
        )
        .required(),
        AttributeSchema::new("retention", retention()).required(),
        AttributeSchema::new("copy_on_run_success", AttributeType::Bool).optional(),
        AttributeSchema::new("config_id", AttributeType::String)
            .optional()
            .computed(),
        AttributeSchema::new("backup_run_type", enum_of(&["Regular", "Full"])).optional(),
        AttributeSchema::new("run_timeouts", run_timeouts()).optional(),
        AttributeSchema::new("log_retention", retention_with_units("LogRetention", RETENTION_UNITS))
            .optional(),
    ];
    fields.extend(specific);
    AttributeType::List(Box::new(AttributeType::structure(name, fields)))
}

fn replication_targets() -> AttributeType {
    target(
        "ReplicationTargetConfiguration",
        vec![
            AttributeSchema::new("target_type", enum_of(&["RemoteCluster", "AWS", "Azure"]))
                .required(),
            AttributeSchema::new(
                "aws_target_config",
                AttributeType::structure(
                    "AwsTargetConfig",
                    vec![
                        AttributeSchema::new("name", AttributeType::String)
                            .optional()
                            .computed(),
                        AttributeSchema::new("region", AttributeType::Int).required(),
                        AttributeSchema::new("region_name", AttributeType::String)
                            .optional()
                            .computed(),
                        AttributeSchema::new("source_id", AttributeType::Int).required(),
                    ],
                ),
            )
            .optional(),
            AttributeSchema::new(
                "azure_target_config",
                AttributeType::structure(
                    "AzureTargetConfig",
                    vec![
                        AttributeSchema::new("name", AttributeType::String)
                            .optional()
                            .computed(),
                        AttributeSchema::new("resource_group", AttributeType::Int).optional(),
                        AttributeSchema::new("resource_group_name", AttributeType::String)
                            .optional()
                            .computed(),
                        AttributeSchema::new("source_id", AttributeType::Int).required(),
                    ],
                ),
            )
            .optional(),
            AttributeSchema::new(
                "remote_target_config",
                AttributeType::structure(
                    "RemoteTargetConfig",
                    vec![
                        AttributeSchema::new("cluster_id", AttributeType::Int).required(),
                        AttributeSchema::new("cluster_name", AttributeType::String)
                            .optional()
                            .computed(),
                    ],
                ),
            )
            .optional(),
        ],
    )
}

fn archival_targets() -> AttributeType {
    target(
        "ArchivalTargetConfiguration",
        vec![
            AttributeSchema::new("target_id", AttributeType::Int).required(),
            AttributeSchema::new("target_name", AttributeType::String)
                .optional()
                .computed(),
            AttributeSchema::new("target_type", enum_of(&["Tape", "Cloud", "Nas"]))
                .optional()
                .computed(),
            AttributeSchema::new("tier_settings", tier_settings()).optional(),
            AttributeSchema::new("extended_retention", extended_retention()).optional(),
        ],
    )
}

fn tier_settings() -> AttributeType {
    let tiering = |name: &str| {
        AttributeType::structure(
            name,
            vec![
                AttributeSchema::new(
                    "tiers",
                    AttributeType::list_of(
                        "Tier",
                        vec![
                            AttributeSchema::new(
                                "move_after_unit",
                                enum_of(&["Days", "Weeks", "Months", "Years"]),
                            )
                            .optional(),
                            AttributeSchema::new("move_after", AttributeType::Int).optional(),
                            AttributeSchema::new("tier_type", AttributeType::String).required(),
                        ],
                    ),
                )
                .required(),
            ],
        )
    };

    AttributeType::structure(
        "TierLevelSettings",
        vec![
            AttributeSchema::new("cloud_platform", enum_of(&["AWS", "Azure", "Oracle", "Google"]))
                .required(),
            AttributeSchema::new("aws_tiering", tiering("AWSTiers")).optional(),
            AttributeSchema::new("azure_tiering", tiering("AzureTiers")).optional(),
            AttributeSchema::new("google_tiering", tiering("GoogleTiers")).optional(),
            AttributeSchema::new("oracle_tiering", tiering("OracleTiers")).optional(),
        ],
    )
}

fn cloud_spin_targets() -> AttributeType {
    let optional_id = |name: &str| AttributeSchema::new(name, AttributeType::Int).optional();

    target(
        "CloudSpinTargetConfiguration",
        vec![
            AttributeSchema::new(
                "target",
                AttributeType::structure(
                    "CloudSpinTarget",
                    vec![
                        AttributeSchema::new(
                            "aws_params",
                            AttributeType::structure(
                                "AwsCloudSpinParams",
                                vec![
                                    AttributeSchema::new(
                                        "custom_tag_list",
                                        AttributeType::List(Box::new(key_value_pair())),
                                    )
                                    .optional(),
                                    AttributeSchema::new("region", AttributeType::Int).required(),
                                    optional_id("subnet_id"),
                                    optional_id("vpc_id"),
                                ],
                            ),
                        )
                        .optional(),
                        AttributeSchema::new(
                            "azure_params",
                            AttributeType::structure(
                                "AzureCloudSpinParams",
                                vec![
                                    optional_id("availability_set_id"),
                                    optional_id("network_resource_group_id"),
                                    optional_id("resource_group_id"),
                                    optional_id("storage_account_id"),
                                    optional_id("storage_container_id"),
                                    optional_id("storage_resource_group_id"),
                                ],
                            ),
                        )
                        .optional(),
                        AttributeSchema::new("id", AttributeType::Int).optional(),
                        AttributeSchema::new("name", AttributeType::String)
                            .optional()
                            .computed(),
                    ],
                ),
            )
            .required(),
        ],
    )
}

fn onprem_deploy_targets() -> AttributeType {
    target(
        "OnpremDeployTargetConfiguration",
        vec![
            AttributeSchema::new(
                "params",
                AttributeType::structure(
                    "OnpremDeployParams",
                    vec![AttributeSchema::new("id", AttributeType::Int).optional()],
                ),
            )
            .optional(),
        ],
    )
}

fn rpaas_targets() -> AttributeType {
    target(
        "RpaasTargetConfiguration",
        vec![
            AttributeSchema::new("target_id", AttributeType::Int).required(),
            AttributeSchema::new("target_name", AttributeType::String)
                .optional()
                .computed(),
            AttributeSchema::new("target_type", enum_of(&["Tape", "Cloud", "Nas"]))
                .optional()
                .computed(),
        ],
    )
}
