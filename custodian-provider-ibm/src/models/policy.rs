//! Protection policy tree
//!
//! A policy bundles when to back up (schedules), how long to keep copies
//! (retention and WORM data lock), and where else copies go (replication,
//! archival, cloud spin, on-prem deploy and RPaaS targets).

use serde::{Deserialize, Serialize};

use super::common::TimeOfDay;

// =============================================================================
// Policy
// =============================================================================

/// Body of create (POST) and update (PUT) calls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionPolicyRequest {
    pub name: String,
    pub backup_policy: BackupPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blackout_window: Option<Vec<BlackoutWindow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_retention: Option<Vec<ExtendedRetentionPolicy>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_target_policy: Option<TargetsConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cascaded_targets_config: Option<Vec<CascadedTargetConfiguration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_options: Option<RetryOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_lock: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(
        rename = "isCBSEnabled",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_cbs_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub spec: ProtectionPolicyRequest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modification_time_usecs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_usable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_replicated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_protection_groups: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_protected_objects: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionPolicyList {
    #[serde(default)]
    pub policies: Vec<ProtectionPolicy>,
}

/// Filters for listing policies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyFilter {
    pub ids: Vec<String>,
    pub policy_names: Vec<String>,
    pub types: Vec<String>,
    pub exclude_linked_policies: Option<bool>,
    pub include_replicated_policies: Option<bool>,
    pub include_stats: Option<bool>,
    pub request_initiator_type: Option<String>,
}

// =============================================================================
// Backup policy
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPolicy {
    pub regular: RegularBackupPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<LogBackupPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmr: Option<BmrBackupPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdp: Option<CdpBackupPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_array_snapshot: Option<StorageArraySnapshotBackupPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_timeouts: Option<Vec<CancellationTimeoutParams>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegularBackupPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incremental: Option<IncrementalBackupPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full: Option<FullBackupPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_backups: Option<Vec<FullScheduleAndRetention>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention: Option<Retention>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_backup_target: Option<PrimaryBackupTarget>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncrementalBackupPolicy {
    pub schedule: Schedule,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullBackupPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullScheduleAndRetention {
    pub schedule: Schedule,
    pub retention: Retention,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogBackupPolicy {
    pub schedule: Schedule,
    pub retention: Retention,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmrBackupPolicy {
    pub schedule: Schedule,
    pub retention: Retention,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpBackupPolicy {
    pub retention: CdpRetention,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageArraySnapshotBackupPolicy {
    pub schedule: Schedule,
    pub retention: Retention,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryBackupTarget {
    /// Local or Archival
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archival_target_settings: Option<PrimaryArchivalTarget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_default_backup_target: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryArchivalTarget {
    pub target_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_settings: Option<TierLevelSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationTimeoutParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_mins: Option<i64>,
    /// kRegular, kFull, kLog, kSystem, kHydrateCDP, kStorageArraySnapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_type: Option<String>,
}

// =============================================================================
// Schedules
// =============================================================================

/// Backup schedule; `unit` selects which of the sub-schedules applies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute_schedule: Option<FrequencySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour_schedule: Option<FrequencySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_schedule: Option<FrequencySchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_schedule: Option<WeekSchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_schedule: Option<MonthSchedule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_schedule: Option<YearSchedule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencySchedule {
    pub frequency: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSchedule {
    pub day_of_week: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<Vec<String>>,
    /// First, Second, Third, Fourth, Last
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_of_month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSchedule {
    /// First or Last
    pub day_of_year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackoutWindow {
    pub day: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<String>,
}

// =============================================================================
// Retention
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Retention {
    /// Days, Weeks, Months or Years
    pub unit: String,
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_lock_config: Option<DataLockConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpRetention {
    /// Minutes, Hours or Days
    pub unit: String,
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_lock_config: Option<DataLockConfig>,
}

/// WORM lock applied to backup copies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataLockConfig {
    /// Compliance or Administrative
    pub mode: String,
    pub unit: String,
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_worm_on_external_target: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedRetentionPolicy {
    pub schedule: ExtendedRetentionSchedule,
    pub retention: Retention,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedRetentionSchedule {
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_interval_mins: Option<i64>,
}

// =============================================================================
// Remote targets
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetsConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_targets: Option<Vec<ReplicationTargetConfiguration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archival_targets: Option<Vec<ArchivalTargetConfiguration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_spin_targets: Option<Vec<CloudSpinTargetConfiguration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onprem_deploy_targets: Option<Vec<OnpremDeployTargetConfiguration>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpaas_targets: Option<Vec<RpaasTargetConfiguration>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadedTargetConfiguration {
    pub source_cluster_id: i64,
    pub remote_targets: TargetsConfiguration,
}

/// Fields shared by every kind of remote target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetCommon {
    pub schedule: TargetSchedule,
    pub retention: Retention,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_on_run_success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<String>,
    /// Regular or Full
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_run_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_timeouts: Option<Vec<CancellationTimeoutParams>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_retention: Option<LogRetention>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSchedule {
    /// Runs, Hours, Days, Weeks, Months or Years
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRetention {
    pub unit: String,
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_lock_config: Option<DataLockConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationTargetConfiguration {
    #[serde(flatten)]
    pub common: TargetCommon,
    /// RemoteCluster, AWS or Azure
    pub target_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_target_config: Option<AwsTargetConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_target_config: Option<AzureTargetConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_target_config: Option<RemoteTargetConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsTargetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub region: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
    pub source_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureTargetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group_name: Option<String>,
    pub source_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTargetConfig {
    pub cluster_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivalTargetConfiguration {
    #[serde(flatten)]
    pub common: TargetCommon,
    pub target_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
    /// Tape, Cloud or Nas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_settings: Option<TierLevelSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_retention: Option<Vec<ExtendedRetentionPolicy>>,
}

/// Cloud tiering: move archived copies to colder tiers over time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierLevelSettings {
    /// AWS, Azure, Oracle or Google
    pub cloud_platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_tiering: Option<Tiering>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_tiering: Option<Tiering>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_tiering: Option<Tiering>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_tiering: Option<Tiering>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tiering {
    pub tiers: Vec<Tier>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_after_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_after: Option<i64>,
    /// e.g. kAmazonS3Standard, kAzureTierHot, kGoogleStandard, kOracleTierStandard
    pub tier_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudSpinTargetConfiguration {
    #[serde(flatten)]
    pub common: TargetCommon,
    pub target: CloudSpinTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudSpinTarget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_params: Option<AwsCloudSpinParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_params: Option<AzureCloudSpinParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsCloudSpinParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_tag_list: Option<Vec<super::common::KeyValuePair>>,
    pub region: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureCloudSpinParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_set_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_resource_group_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_account_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_container_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_resource_group_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnpremDeployTargetConfiguration {
    #[serde(flatten)]
    pub common: TargetCommon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<OnpremDeployParams>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnpremDeployParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpaasTargetConfiguration {
    #[serde(flatten)]
    pub common: TargetCommon,
    pub target_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_name: Option<String>,
    /// Tape, Cloud or Nas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_flattens_request_fields() {
        let json = serde_json::json!({
            "id": "4421:1700000000:12",
            "name": "gold",
            "isCBSEnabled": true,
            "backupPolicy": {
                "regular": {
                    "incremental": { "schedule": { "unit": "Hours", "hourSchedule": { "frequency": 6 } } },
                    "retention": { "unit": "Days", "duration": 30 }
                }
            },
            "isUsable": true,
            "numProtectionGroups": 2
        });

        let policy: ProtectionPolicy = serde_json::from_value(json).unwrap();
        assert_eq!(policy.id.as_deref(), Some("4421:1700000000:12"));
        assert_eq!(policy.spec.name, "gold");
        assert_eq!(policy.spec.is_cbs_enabled, Some(true));
        assert_eq!(policy.num_protection_groups, Some(2));
        let schedule = &policy
            .spec
            .backup_policy
            .regular
            .incremental
            .as_ref()
            .unwrap()
            .schedule;
        assert_eq!(schedule.hour_schedule, Some(FrequencySchedule { frequency: 6 }));
    }

    #[test]
    fn unset_fields_are_not_serialized() {
        let request = ProtectionPolicyRequest {
            name: "bronze".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&request).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("name"));
        assert!(obj.contains_key("backupPolicy"));
        assert!(!obj.contains_key("description"));
        assert!(!obj.contains_key("isCBSEnabled"));
    }

    #[test]
    fn target_common_fields_are_flattened() {
        let json = serde_json::json!({
            "schedule": { "unit": "Runs" },
            "retention": { "unit": "Weeks", "duration": 4 },
            "copyOnRunSuccess": true,
            "targetType": "RemoteCluster",
            "remoteTargetConfig": { "clusterId": 99 }
        });
        let target: ReplicationTargetConfiguration = serde_json::from_value(json).unwrap();
        assert_eq!(target.common.schedule.unit, "Runs");
        assert_eq!(target.common.copy_on_run_success, Some(true));
        assert_eq!(target.remote_target_config.unwrap().cluster_id, 99);
    }
}
