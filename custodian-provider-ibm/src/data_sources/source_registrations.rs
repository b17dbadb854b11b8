//! source_registrations data source

use custodian_core::provider::ProviderResult;
use custodian_core::resource::{Resource, State};

use super::{flag, int_list, list_state, string};
use crate::client::BackupRecoveryClient;
use crate::models::RegistrationFilter;
use crate::schemas::source_registration;
use crate::utils::{Operation, tenant_attribute};

pub async fn read(client: &BackupRecoveryClient, resource: &Resource) -> ProviderResult<State> {
    let op = Operation::new(&resource.id, "read");
    let attrs = &resource.attributes;
    let tenant = tenant_attribute(attrs).map_err(|e| op.failed_at("get-tenant", e))?;

    let filter = RegistrationFilter {
        ids: int_list(attrs, "ids"),
        include_source_credentials: flag(attrs, "include_source_credentials"),
        encryption_key: string(attrs, "encryption_key"),
        use_cached_data: flag(attrs, "use_cached_data"),
        include_external_metadata: flag(attrs, "include_external_metadata"),
        ignore_tenant_migration_in_progress_check: flag(
            attrs,
            "ignore_tenant_migration_in_progress_check",
        ),
    };
    let list = client
        .list_registrations(tenant, &filter)
        .await
        .map_err(|e| op.api_error("GetSourceRegistrations", e))?;

    list_state(
        &op,
        resource,
        tenant,
        source_registration::list_schema(),
        "registrations",
        &list.registrations,
    )
}
