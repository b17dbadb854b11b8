//! data_source_connector CRUD
//!
//! Connectors cannot be created or deleted through the API. Create adopts
//! an existing connector by renaming it; delete only drops it from state.

use custodian_core::provider::ProviderResult;
use custodian_core::resource::{Resource, ResourceId, State, Value, changed_attributes};

use crate::client::BackupRecoveryClient;
use crate::convert::{map_to_request, response_to_map};
use crate::error::BackupRecoveryError;
use crate::models::{ConnectorFilter, PatchConnectorRequest};
use crate::schemas::common::TENANT_ID;
use crate::schemas::connector;
use crate::utils::{Operation, compose_identifier, split_identifier, tenant_attribute};

const CONNECTOR_ID: &str = "connector_id";

pub async fn create(client: &BackupRecoveryClient, resource: &Resource) -> ProviderResult<State> {
    let op = Operation::new(&resource.id, "create");
    let tenant = tenant_attribute(&resource.attributes).map_err(|e| op.failed_at("get-tenant", e))?;
    let connector_id = resource
        .attributes
        .get(CONNECTOR_ID)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            op.failed_at(
                "get-connector-id",
                BackupRecoveryError::conversion("'connector_id' is not set"),
            )
        })?;

    rename(client, &op, tenant, connector_id, resource).await?;
    read(client, &resource.id, &compose_identifier(tenant, connector_id)).await
}

pub async fn read(
    client: &BackupRecoveryClient,
    id: &ResourceId,
    identifier: &str,
) -> ProviderResult<State> {
    let op = Operation::new(id, "read");
    let (tenant, connector_id) =
        split_identifier(identifier, None).map_err(|e| op.failed_at("parse-id", e))?;

    let filter = ConnectorFilter {
        connector_ids: vec![connector_id.to_string()],
        ..Default::default()
    };
    let list = match client.list_connectors(tenant, &filter).await {
        Ok(list) => list,
        Err(e) if e.is_not_found() => return Ok(State::not_found(id.clone())),
        Err(e) => return Err(op.api_error("GetDataSourceConnectors", e)),
    };

    let Some(found) = list
        .connectors
        .into_iter()
        .find(|c| c.connector_id.as_deref() == Some(connector_id))
    else {
        log::info!("Data-source connector {} is gone", connector_id);
        return Ok(State::not_found(id.clone()));
    };

    let mut attributes = response_to_map(&connector::schema().attributes, &found)
        .map_err(|e| op.failed_at("response-to-map", e))?;
    attributes.insert(TENANT_ID.to_string(), Value::String(tenant.to_string()));

    Ok(State::existing(id.clone(), attributes)
        .with_identifier(compose_identifier(tenant, connector_id)))
}

pub async fn update(
    client: &BackupRecoveryClient,
    id: &ResourceId,
    identifier: &str,
    from: &State,
    to: &Resource,
) -> ProviderResult<State> {
    let op = Operation::new(id, "update");
    let (tenant, connector_id) =
        split_identifier(identifier, tenant_attribute(&to.attributes).ok())
            .map_err(|e| op.failed_at("parse-id", e))?;

    let changed = changed_attributes(&to.attributes, &from.attributes);
    if changed.iter().any(|name| name == "connector_name") {
        rename(client, &op, tenant, connector_id, to).await?;
    }

    read(client, id, &compose_identifier(tenant, connector_id)).await
}

pub async fn delete(id: &ResourceId, identifier: &str) -> ProviderResult<()> {
    log::warn!(
        "{}: connectors cannot be deleted through the API; {} is only removed from state",
        id,
        identifier
    );
    Ok(())
}

async fn rename(
    client: &BackupRecoveryClient,
    op: &Operation<'_>,
    tenant: &str,
    connector_id: &str,
    resource: &Resource,
) -> ProviderResult<()> {
    let request: PatchConnectorRequest = map_to_request(
        &connector::schema().attributes,
        &resource.attributes,
        &[TENANT_ID, CONNECTOR_ID],
    )
    .map_err(|e| op.failed_at("map-to-request", e))?;

    log::info!(
        "Renaming data-source connector {} to '{}'",
        connector_id,
        request.connector_name
    );
    client
        .patch_connector(tenant, connector_id, &request)
        .await
        .map_err(|e| op.api_error("PatchDataSourceConnector", e))?;
    Ok(())
}
