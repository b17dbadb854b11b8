//! protection_policies data source

use custodian_core::provider::ProviderResult;
use custodian_core::resource::{Resource, State};

use super::{enum_variant, flag, list_state, string, string_list};
use crate::client::BackupRecoveryClient;
use crate::models::PolicyFilter;
use crate::schemas::protection_policy;
use crate::utils::{Operation, tenant_attribute};

pub async fn read(client: &BackupRecoveryClient, resource: &Resource) -> ProviderResult<State> {
    let op = Operation::new(&resource.id, "read");
    let attrs = &resource.attributes;
    let tenant = tenant_attribute(attrs).map_err(|e| op.failed_at("get-tenant", e))?;

    let filter = PolicyFilter {
        ids: string_list(attrs, "ids"),
        policy_names: string_list(attrs, "policy_names"),
        types: string_list(attrs, "types")
            .into_iter()
            .map(enum_variant)
            .collect(),
        exclude_linked_policies: flag(attrs, "exclude_linked_policies"),
        include_replicated_policies: flag(attrs, "include_replicated_policies"),
        include_stats: flag(attrs, "include_stats"),
        request_initiator_type: string(attrs, "request_initiator_type").map(enum_variant),
    };
    let list = client
        .list_policies(tenant, &filter)
        .await
        .map_err(|e| op.api_error("GetProtectionPolicies", e))?;

    list_state(
        &op,
        resource,
        tenant,
        protection_policy::list_schema(),
        "policies",
        &list.policies,
    )
}
