use serde::{Deserialize, Serialize};

use super::common::{KeyValuePair, Time, TimeRangeUsecs};

// =============================================================================
// Requests
// =============================================================================

/// Body of register (POST) and update (PUT) calls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRegistrationRequest {
    pub environment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_internal_encrypted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<ConnectionConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_group_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_configs: Option<Vec<KeyValuePair>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source_connection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_params: Option<PhysicalSourceRegistrationParams>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchSourceRegistrationRequest {
    pub environment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_group_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source_connection_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalSourceRegistrationParams {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_register: Option<bool>,
    /// kLinux, kWindows, kAix, kSolaris, kSapHana, kSapOracle, kCockroachDB, kMySQL, kOther
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_type: Option<String>,
    /// kGroup, kHost, kWindowsCluster, kOracleRACCluster, kOracleAPCluster, kUnixCluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applications: Option<Vec<String>>,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRegistration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_info: Option<SourceObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_internal_encrypted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<ConnectionConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_group_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source_connection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_configs: Option<Vec<KeyValuePair>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_params: Option<PhysicalSourceRegistrationParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_time_msecs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_refreshed_time_msecs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_metadata: Option<EntityExternalMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRegistrationList {
    #[serde(default)]
    pub registrations: Vec<SourceRegistration>,
}

/// Protection source object the registration points at
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_size_bytes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharepoint_site_summary: Option<SharepointObjectParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_center_summary: Option<VCenterSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows_cluster_summary: Option<WindowsClusterSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection_stats: Option<Vec<ObjectProtectionStats>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mssql_params: Option<ObjectMssqlParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_params: Option<ObjectPhysicalParams>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharepointObjectParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_web_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VCenterSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_cloud_env: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowsClusterSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_source_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectProtectionStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protected_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unprotected_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_protected_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protected_size_bytes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unprotected_size_bytes: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMssqlParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aag_info: Option<AagInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_info: Option<HostInformation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_encrypted: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AagInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostInformation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPhysicalParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_system_backup: Option<bool>,
}

// =============================================================================
// External metadata
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityExternalMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_mode_config: Option<MaintenanceModeConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceModeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_time_intervals: Option<Vec<TimeRangeUsecs>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance_schedule: Option<MaintenanceSchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_intervention_spec_list: Option<Vec<WorkflowInterventionSpec>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periodic_time_windows: Option<Vec<TimeWindow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_ranges: Option<Vec<TimeRangeUsecs>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_the_week: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Time>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Time>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInterventionSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervention: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_type: Option<String>,
}

/// Filters for listing registrations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationFilter {
    pub ids: Vec<i64>,
    pub include_source_credentials: Option<bool>,
    pub encryption_key: Option<String>,
    pub use_cached_data: Option<bool>,
    pub include_external_metadata: Option<bool>,
    pub ignore_tenant_migration_in_progress_check: Option<bool>,
}
