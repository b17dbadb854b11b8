//! protection_policy CRUD

use custodian_core::provider::ProviderResult;
use custodian_core::resource::{Resource, ResourceId, State, Value};

use crate::client::BackupRecoveryClient;
use crate::convert::{map_to_request, response_to_map};
use crate::error::BackupRecoveryError;
use crate::models::{ProtectionPolicy, ProtectionPolicyRequest};
use crate::schemas::common::TENANT_ID;
use crate::schemas::protection_policy;
use crate::utils::{Operation, compose_identifier, split_identifier, tenant_attribute};

pub async fn create(client: &BackupRecoveryClient, resource: &Resource) -> ProviderResult<State> {
    let op = Operation::new(&resource.id, "create");
    let tenant = tenant_attribute(&resource.attributes).map_err(|e| op.failed_at("get-tenant", e))?;
    let request = policy_request(&op, resource)?;

    log::info!("Creating protection policy '{}'", request.name);
    let created = client
        .create_policy(tenant, &request)
        .await
        .map_err(|e| op.api_error("CreateProtectionPolicy", e))?;

    let policy_id = created.id.ok_or_else(|| {
        op.failed_at(
            "create",
            BackupRecoveryError::conversion("response carries no policy id"),
        )
    })?;

    read(client, &resource.id, &compose_identifier(tenant, &policy_id)).await
}

pub async fn read(
    client: &BackupRecoveryClient,
    id: &ResourceId,
    identifier: &str,
) -> ProviderResult<State> {
    let op = Operation::new(id, "read");
    let (tenant, policy_id) =
        split_identifier(identifier, None).map_err(|e| op.failed_at("parse-id", e))?;

    let policy = match client.get_policy(tenant, policy_id).await {
        Ok(policy) => policy,
        Err(e) if e.is_not_found() => {
            log::info!("Protection policy {} is gone", policy_id);
            return Ok(State::not_found(id.clone()));
        }
        Err(e) => return Err(op.api_error("GetProtectionPolicyById", e)),
    };

    policy_state(&op, tenant, policy_id, &policy)
}

/// Policies are always replaced as a whole
pub async fn update(
    client: &BackupRecoveryClient,
    id: &ResourceId,
    identifier: &str,
    to: &Resource,
) -> ProviderResult<State> {
    let op = Operation::new(id, "update");
    let (tenant, policy_id) = split_identifier(identifier, tenant_attribute(&to.attributes).ok())
        .map_err(|e| op.failed_at("parse-id", e))?;
    let request = policy_request(&op, to)?;

    log::info!("Updating protection policy {}", policy_id);
    let updated = client
        .update_policy(tenant, policy_id, &request)
        .await
        .map_err(|e| op.api_error("UpdateProtectionPolicy", e))?;

    policy_state(&op, tenant, policy_id, &updated)
}

pub async fn delete(
    client: &BackupRecoveryClient,
    id: &ResourceId,
    identifier: &str,
) -> ProviderResult<()> {
    let op = Operation::new(id, "delete");
    let (tenant, policy_id) =
        split_identifier(identifier, None).map_err(|e| op.failed_at("parse-id", e))?;

    log::info!("Deleting protection policy {}", policy_id);
    match client.delete_policy(tenant, policy_id).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(op.api_error("DeleteProtectionPolicy", e)),
    }
}

fn policy_request(op: &Operation<'_>, resource: &Resource) -> ProviderResult<ProtectionPolicyRequest> {
    map_to_request(
        &protection_policy::schema().attributes,
        &resource.attributes,
        &[TENANT_ID],
    )
    .map_err(|e| op.failed_at("map-to-request", e))
}

fn policy_state(
    op: &Operation<'_>,
    tenant: &str,
    policy_id: &str,
    policy: &ProtectionPolicy,
) -> ProviderResult<State> {
    let mut attributes = response_to_map(&protection_policy::schema().attributes, policy)
        .map_err(|e| op.failed_at("response-to-map", e))?;
    attributes.insert(TENANT_ID.to_string(), Value::String(tenant.to_string()));

    Ok(State::existing(op.id.clone(), attributes)
        .with_identifier(compose_identifier(tenant, policy_id)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    fn map(pairs: Vec<(&str, Value)>) -> Value {
        Value::Map(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    fn sample_response() -> serde_json::Value {
        serde_json::json!({
            "id": "4421:1700000000:12",
            "name": "gold",
            "description": "daily with weekly archive",
            "backupPolicy": {
                "regular": {
                    "incremental": {
                        "schedule": { "unit": "Hours", "hourSchedule": { "frequency": 6 } }
                    },
                    "retention": {
                        "unit": "Days",
                        "duration": 14,
                        "dataLockConfig": { "mode": "Compliance", "unit": "Days", "duration": 7 }
                    }
                },
                "runTimeouts": [{ "timeoutMins": 120, "backupType": "kRegular" }]
            },
            "blackoutWindow": [{
                "day": "Sunday",
                "startTime": { "hour": 1, "minute": 0, "timeZone": "UTC" },
                "endTime": { "hour": 3, "minute": 30, "timeZone": "UTC" },
                "configId": "bw-1"
            }],
            "remoteTargetPolicy": {
                "archivalTargets": [{
                    "schedule": { "unit": "Weeks", "frequency": 1 },
                    "retention": { "unit": "Years", "duration": 1 },
                    "copyOnRunSuccess": true,
                    "targetId": 77,
                    "targetName": "cos-vault",
                    "targetType": "Cloud",
                    "tierSettings": {
                        "cloudPlatform": "AWS",
                        "awsTiering": { "tiers": [{ "moveAfterUnit": "Days", "moveAfter": 30, "tierType": "kAmazonS3Glacier" }] }
                    }
                }]
            },
            "retryOptions": { "retries": 3, "retryIntervalMins": 5 },
            "dataLock": "Administrative",
            "version": 2,
            "isCBSEnabled": true,
            "lastModificationTimeUsecs": 1700000000000000i64,
            "isUsable": true,
            "numProtectionGroups": 4
        })
    }

    #[test]
    fn response_maps_to_state_and_back() {
        let policy: ProtectionPolicy = serde_json::from_value(sample_response()).unwrap();
        let id = ResourceId::new("protection_policy", "gold");
        let op = Operation::new(&id, "read");

        let state = policy_state(&op, "tenant-a/", "4421:1700000000:12", &policy).unwrap();
        assert_eq!(
            state.identifier.as_deref(),
            Some("tenant-a/::4421:1700000000:12")
        );
        let attrs = &state.attributes;
        assert_eq!(attrs.get("policy_id"), Some(&s("4421:1700000000:12")));
        assert_eq!(attrs.get("is_cbs_enabled"), Some(&Value::Bool(true)));
        assert_eq!(attrs.get("num_protection_groups"), Some(&Value::Int(4)));
        assert_eq!(attrs.get(TENANT_ID), Some(&s("tenant-a/")));

        let schedule = attrs["backup_policy"].as_map().unwrap()["regular"]
            .as_map()
            .unwrap()["incremental"]
            .as_map()
            .unwrap()["schedule"]
            .as_map()
            .unwrap();
        assert_eq!(schedule.get("unit"), Some(&s("Hours")));
        assert_eq!(
            schedule.get("hour_schedule"),
            Some(&map(vec![("frequency", Value::Int(6))]))
        );

        // Feeding the state back as configuration yields the same request
        let resource = Resource {
            id: id.clone(),
            attributes: state.attributes.clone(),
            read_only: false,
        };
        let request = policy_request(&op, &resource).unwrap();
        assert_eq!(request, policy.spec);
    }

    #[test]
    fn request_normalizes_enum_prefixes() {
        let retention = map(vec![("unit", s("RetentionUnit.Days")), ("duration", Value::Int(7))]);
        let backup_policy = map(vec![(
            "regular",
            map(vec![
                (
                    "incremental",
                    map(vec![(
                        "schedule",
                        map(vec![
                            ("unit", s("Days")),
                            ("day_schedule", map(vec![("frequency", Value::Int(1))])),
                        ]),
                    )]),
                ),
                ("retention", retention),
            ]),
        )]);

        let mut attributes = HashMap::new();
        attributes.insert(TENANT_ID.to_string(), s("tenant-a/"));
        attributes.insert("name".to_string(), s("bronze"));
        attributes.insert("backup_policy".to_string(), backup_policy);
        let resource = Resource {
            id: ResourceId::new("protection_policy", "bronze"),
            attributes,
            read_only: false,
        };
        let op = Operation::new(&resource.id, "create");

        let request = policy_request(&op, &resource).unwrap();
        assert_eq!(request.name, "bronze");
        let retention = request.backup_policy.regular.retention.unwrap();
        assert_eq!(retention.unit, "Days");
        assert_eq!(retention.duration, 7);
    }

    #[test]
    fn missing_required_block_is_map_to_request_error() {
        let mut attributes = HashMap::new();
        attributes.insert("name".to_string(), s("empty"));
        let resource = Resource {
            id: ResourceId::new("protection_policy", "empty"),
            attributes,
            read_only: false,
        };
        let op = Operation::new(&resource.id, "create");

        let err = policy_request(&op, &resource).unwrap_err();
        assert_eq!(err.discriminator.as_deref(), Some("map-to-request"));
    }
}
