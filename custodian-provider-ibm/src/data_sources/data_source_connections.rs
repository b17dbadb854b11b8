//! data_source_connections data source

use custodian_core::provider::ProviderResult;
use custodian_core::resource::{Resource, State};

use super::{list_state, string_list};
use crate::client::BackupRecoveryClient;
use crate::models::ConnectionFilter;
use crate::schemas::connection;
use crate::utils::{Operation, tenant_attribute};

pub async fn read(client: &BackupRecoveryClient, resource: &Resource) -> ProviderResult<State> {
    let op = Operation::new(&resource.id, "read");
    let tenant = tenant_attribute(&resource.attributes).map_err(|e| op.failed_at("get-tenant", e))?;

    let filter = ConnectionFilter {
        connection_ids: string_list(&resource.attributes, "connection_ids"),
        connection_names: string_list(&resource.attributes, "connection_names"),
    };
    let list = client
        .list_connections(tenant, &filter)
        .await
        .map_err(|e| op.api_error("GetDataSourceConnections", e))?;

    list_state(
        &op,
        resource,
        tenant,
        connection::list_schema(),
        "connections",
        &list.connections,
    )
}
