//! source_registration CRUD

use custodian_core::provider::ProviderResult;
use custodian_core::resource::{Resource, ResourceId, State, Value, changed_attributes};

use crate::client::BackupRecoveryClient;
use crate::convert::{map_to_request, response_to_map};
use crate::error::BackupRecoveryError;
use crate::models::{PatchSourceRegistrationRequest, SourceRegistrationRequest};
use crate::schemas::common::TENANT_ID;
use crate::schemas::source_registration;
use crate::utils::{
    Operation, compose_identifier, parse_numeric_id, split_identifier, tenant_attribute,
};

/// Attributes that only a full PUT can change
const PUT_ATTRIBUTES: &[&str] = &[
    "name",
    "is_internal_encrypted",
    "encryption_key",
    "connection_id",
    "connections",
    "connector_group_id",
    "advanced_configs",
    "data_source_connection_id",
    "physical_params",
];

pub async fn create(client: &BackupRecoveryClient, resource: &Resource) -> ProviderResult<State> {
    let op = Operation::new(&resource.id, "create");
    let tenant = tenant_attribute(&resource.attributes).map_err(|e| op.failed_at("get-tenant", e))?;
    let request: SourceRegistrationRequest = map_to_request(
        &source_registration::schema().attributes,
        &resource.attributes,
        &[TENANT_ID],
    )
    .map_err(|e| op.failed_at("map-to-request", e))?;

    log::info!(
        "Registering {} source '{}'",
        request.environment,
        request.name.as_deref().unwrap_or("")
    );
    let created = client
        .register_source(tenant, &request)
        .await
        .map_err(|e| op.api_error("RegisterProtectionSource", e))?;

    let registration_id = created.id.ok_or_else(|| {
        op.failed_at(
            "create",
            BackupRecoveryError::conversion("response carries no registration id"),
        )
    })?;

    read(client, &resource.id, &compose_identifier(tenant, &registration_id.to_string())).await
}

pub async fn read(
    client: &BackupRecoveryClient,
    id: &ResourceId,
    identifier: &str,
) -> ProviderResult<State> {
    let op = Operation::new(id, "read");
    let (tenant, raw_id) =
        split_identifier(identifier, None).map_err(|e| op.failed_at("parse-id", e))?;
    let registration_id =
        parse_numeric_id(identifier, raw_id).map_err(|e| op.failed_at("parse-id", e))?;

    let registration = match client.get_registration(tenant, registration_id, None).await {
        Ok(registration) => registration,
        Err(e) if e.is_not_found() => {
            log::info!("Source registration {} is gone", registration_id);
            return Ok(State::not_found(id.clone()));
        }
        Err(e) => return Err(op.api_error("GetProtectionSourceRegistration", e)),
    };

    let mut attributes = response_to_map(&source_registration::schema().attributes, &registration)
        .map_err(|e| op.failed_at("response-to-map", e))?;
    attributes.insert(TENANT_ID.to_string(), Value::String(tenant.to_string()));

    Ok(State::existing(id.clone(), attributes)
        .with_identifier(compose_identifier(tenant, raw_id)))
}

/// PATCH when only the environment changed, PUT otherwise
pub async fn update(
    client: &BackupRecoveryClient,
    id: &ResourceId,
    identifier: &str,
    from: &State,
    to: &Resource,
) -> ProviderResult<State> {
    let op = Operation::new(id, "update");
    let (tenant, raw_id) = split_identifier(identifier, tenant_attribute(&to.attributes).ok())
        .map_err(|e| op.failed_at("parse-id", e))?;
    let registration_id =
        parse_numeric_id(identifier, raw_id).map_err(|e| op.failed_at("parse-id", e))?;

    let changed = changed_attributes(&to.attributes, &from.attributes);
    let has_change = |name: &str| changed.iter().any(|c| c == name);
    let schema = source_registration::schema();

    if PUT_ATTRIBUTES.iter().any(|name| has_change(name)) {
        // Only one of the two connection fields goes out
        let skip = if has_change("data_source_connection_id") {
            [TENANT_ID, "connection_id"]
        } else {
            [TENANT_ID, "data_source_connection_id"]
        };
        let request: SourceRegistrationRequest =
            map_to_request(&schema.attributes, &to.attributes, &skip)
                .map_err(|e| op.failed_at("map-to-request", e))?;

        log::info!("Updating source registration {}", registration_id);
        client
            .update_registration(tenant, registration_id, &request)
            .await
            .map_err(|e| op.api_error("UpdateProtectionSourceRegistration", e))?;
    } else if has_change("environment") {
        let patch_op = Operation::new(id, "patch");
        let request: PatchSourceRegistrationRequest =
            map_to_request(&schema.attributes, &to.attributes, &[TENANT_ID])
                .map_err(|e| patch_op.failed_at("map-to-request", e))?;

        log::info!(
            "Patching source registration {} to environment {}",
            registration_id,
            request.environment
        );
        client
            .patch_registration(tenant, registration_id, &request)
            .await
            .map_err(|e| patch_op.api_error("PatchProtectionSourceRegistration", e))?;
    }

    read(client, id, &compose_identifier(tenant, raw_id)).await
}

pub async fn delete(
    client: &BackupRecoveryClient,
    id: &ResourceId,
    identifier: &str,
) -> ProviderResult<()> {
    let op = Operation::new(id, "delete");
    let (tenant, raw_id) =
        split_identifier(identifier, None).map_err(|e| op.failed_at("parse-id", e))?;
    let registration_id =
        parse_numeric_id(identifier, raw_id).map_err(|e| op.failed_at("parse-id", e))?;

    log::info!("Deleting source registration {}", registration_id);
    match client.delete_registration(tenant, registration_id).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(op.api_error("DeleteProtectionSourceRegistration", e)),
    }
}
