//! data_source_connection CRUD
//!
//! There is no single-connection GET, so reads list connections filtered by
//! ID and pick the match.

use custodian_core::provider::ProviderResult;
use custodian_core::resource::{Resource, ResourceId, State, Value, changed_attributes};

use crate::client::BackupRecoveryClient;
use crate::convert::{map_to_request, response_to_map};
use crate::error::BackupRecoveryError;
use crate::models::{ConnectionFilter, CreateConnectionRequest, PatchConnectionRequest};
use crate::schemas::common::TENANT_ID;
use crate::schemas::connection;
use crate::utils::{Operation, compose_identifier, split_identifier, tenant_attribute};

pub async fn create(client: &BackupRecoveryClient, resource: &Resource) -> ProviderResult<State> {
    let op = Operation::new(&resource.id, "create");
    let tenant = tenant_attribute(&resource.attributes).map_err(|e| op.failed_at("get-tenant", e))?;
    let request: CreateConnectionRequest =
        map_to_request(&connection::schema().attributes, &resource.attributes, &[TENANT_ID])
            .map_err(|e| op.failed_at("map-to-request", e))?;

    log::info!("Creating data-source connection '{}'", request.connection_name);
    let created = client
        .create_connection(tenant, &request)
        .await
        .map_err(|e| op.api_error("CreateDataSourceConnection", e))?;

    let connection_id = created.connection_id.clone().ok_or_else(|| {
        op.failed_at(
            "create",
            BackupRecoveryError::conversion("response carries no connectionId"),
        )
    })?;

    let mut state = read(client, &resource.id, &compose_identifier(tenant, &connection_id)).await?;

    // The token is only handed out once; the list call may leave it empty
    if !state.attributes.contains_key("registration_token")
        && let Some(token) = created.registration_token
    {
        state
            .attributes
            .insert("registration_token".to_string(), Value::String(token));
    }
    Ok(state)
}

pub async fn read(
    client: &BackupRecoveryClient,
    id: &ResourceId,
    identifier: &str,
) -> ProviderResult<State> {
    let op = Operation::new(id, "read");
    let (tenant, connection_id) =
        split_identifier(identifier, None).map_err(|e| op.failed_at("parse-id", e))?;

    let filter = ConnectionFilter {
        connection_ids: vec![connection_id.to_string()],
        ..Default::default()
    };
    let list = match client.list_connections(tenant, &filter).await {
        Ok(list) => list,
        Err(e) if e.is_not_found() => return Ok(State::not_found(id.clone())),
        Err(e) => return Err(op.api_error("GetDataSourceConnections", e)),
    };

    let Some(found) = list
        .connections
        .into_iter()
        .find(|c| c.connection_id.as_deref() == Some(connection_id))
    else {
        log::info!("Data-source connection {} is gone", connection_id);
        return Ok(State::not_found(id.clone()));
    };

    let mut attributes = response_to_map(&connection::schema().attributes, &found)
        .map_err(|e| op.failed_at("response-to-map", e))?;
    attributes.insert(TENANT_ID.to_string(), Value::String(tenant.to_string()));

    Ok(State::existing(id.clone(), attributes)
        .with_identifier(compose_identifier(tenant, connection_id)))
}

pub async fn update(
    client: &BackupRecoveryClient,
    id: &ResourceId,
    identifier: &str,
    from: &State,
    to: &Resource,
) -> ProviderResult<State> {
    let op = Operation::new(id, "update");
    let (tenant, connection_id) =
        split_identifier(identifier, tenant_attribute(&to.attributes).ok())
            .map_err(|e| op.failed_at("parse-id", e))?;

    let changed = changed_attributes(&to.attributes, &from.attributes);
    if changed.iter().any(|name| name == "connection_name") {
        let request: PatchConnectionRequest =
            map_to_request(&connection::schema().attributes, &to.attributes, &[TENANT_ID])
                .map_err(|e| op.failed_at("map-to-request", e))?;

        log::info!(
            "Renaming data-source connection {} to '{}'",
            connection_id,
            request.connection_name
        );
        client
            .patch_connection(tenant, connection_id, &request)
            .await
            .map_err(|e| op.api_error("PatchDataSourceConnection", e))?;
    }

    read(client, id, &compose_identifier(tenant, connection_id)).await
}

pub async fn delete(
    client: &BackupRecoveryClient,
    id: &ResourceId,
    identifier: &str,
) -> ProviderResult<()> {
    let op = Operation::new(id, "delete");
    let (tenant, connection_id) =
        split_identifier(identifier, None).map_err(|e| op.failed_at("parse-id", e))?;

    log::info!("Deleting data-source connection {}", connection_id);
    match client.delete_connection(tenant, connection_id).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(op.api_error("DeleteDataSourceConnection", e)),
    }
}
