//! data_source_connectors data source

use custodian_core::provider::ProviderResult;
use custodian_core::resource::{Resource, State};

use super::{list_state, string, string_list};
use crate::client::BackupRecoveryClient;
use crate::models::ConnectorFilter;
use crate::schemas::connector;
use crate::utils::{Operation, tenant_attribute};

pub async fn read(client: &BackupRecoveryClient, resource: &Resource) -> ProviderResult<State> {
    let op = Operation::new(&resource.id, "read");
    let tenant = tenant_attribute(&resource.attributes).map_err(|e| op.failed_at("get-tenant", e))?;

    let filter = ConnectorFilter {
        connector_ids: string_list(&resource.attributes, "connector_ids"),
        connector_names: string_list(&resource.attributes, "connector_names"),
        connection_id: string(&resource.attributes, "connection_id"),
    };
    let list = client
        .list_connectors(tenant, &filter)
        .await
        .map_err(|e| op.api_error("GetDataSourceConnectors", e))?;

    list_state(
        &op,
        resource,
        tenant,
        connector::list_schema(),
        "connectors",
        &list.connectors,
    )
}
