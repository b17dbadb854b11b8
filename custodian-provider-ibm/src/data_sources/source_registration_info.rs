//! source_registration_info data source

use custodian_core::provider::ProviderResult;
use custodian_core::resource::{Resource, State};

use super::{enum_variant, string};
use crate::client::BackupRecoveryClient;
use crate::convert::response_to_map;
use crate::error::BackupRecoveryError;
use crate::schemas::source_registration;
use crate::utils::{Operation, compose_identifier, tenant_attribute};

pub async fn read(client: &BackupRecoveryClient, resource: &Resource) -> ProviderResult<State> {
    let op = Operation::new(&resource.id, "read");
    let attrs = &resource.attributes;
    let tenant = tenant_attribute(attrs).map_err(|e| op.failed_at("get-tenant", e))?;
    let registration_id = attrs
        .get("source_registration_id")
        .and_then(|v| v.as_int())
        .ok_or_else(|| {
            op.failed_at(
                "get-source_registration_id",
                BackupRecoveryError::conversion("'source_registration_id' is not set"),
            )
        })?;
    let initiator = string(attrs, "request_initiator_type").map(enum_variant);

    let registration = client
        .get_registration(tenant, registration_id, initiator.as_deref())
        .await
        .map_err(|e| op.api_error("GetProtectionSourceRegistration", e))?;

    let read = response_to_map(&source_registration::lookup_schema().attributes, &registration)
        .map_err(|e| op.failed_at("response-to-map", e))?;
    let mut attributes = resource.attributes.clone();
    attributes.extend(read);

    let id = registration.id.unwrap_or(registration_id);
    Ok(State::existing(resource.id.clone(), attributes)
        .with_identifier(compose_identifier(tenant, &id.to_string())))
}
