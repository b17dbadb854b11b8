//! IBM Backup Recovery provider implementation
//!
//! Dispatches each operation to the resource or data-source module that
//! owns the resource type.

use custodian_core::provider::{ProviderError, ProviderResult};
use custodian_core::resource::{Resource, ResourceId, State};

use crate::client::BackupRecoveryClient;
use crate::config::ProviderConfig;
use crate::data_sources::{
    data_source_connections, data_source_connectors, protection_policies, source_registration_info,
    source_registrations,
};
use crate::error::BackupRecoveryError;
use crate::resources::{
    data_source_connection, data_source_connector, protection_policy, source_registration,
};
use crate::schemas;
use crate::utils::Operation;

/// IBM Backup Recovery provider
///
/// A client that failed to initialize is kept as its error so every
/// operation reports it through the usual diagnostics.
pub struct IbmProvider {
    client: Result<BackupRecoveryClient, BackupRecoveryError>,
}

impl IbmProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        let client = BackupRecoveryClient::new(config);
        if let Err(e) = &client {
            log::debug!("Backup Recovery client unavailable: {}", e);
        }
        Self { client }
    }

    pub fn with_client(client: BackupRecoveryClient) -> Self {
        Self { client: Ok(client) }
    }

    fn client(&self, op: &Operation<'_>) -> ProviderResult<&BackupRecoveryClient> {
        self.client
            .as_ref()
            .map_err(|e| op.failed_at("initialize-client", e))
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    pub async fn read_resource(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> ProviderResult<State> {
        let Some(identifier) = identifier else {
            return Ok(State::not_found(id.clone()));
        };
        let client = self.client(&Operation::new(id, "read"))?;

        match id.resource_type.as_str() {
            schemas::connection::RESOURCE_TYPE => {
                data_source_connection::read(client, id, identifier).await
            }
            schemas::connector::RESOURCE_TYPE => {
                data_source_connector::read(client, id, identifier).await
            }
            schemas::source_registration::RESOURCE_TYPE => {
                source_registration::read(client, id, identifier).await
            }
            schemas::protection_policy::RESOURCE_TYPE => {
                protection_policy::read(client, id, identifier).await
            }
            other => Err(unknown_type(id, other)),
        }
    }

    pub async fn list_data_source(&self, resource: &Resource) -> ProviderResult<State> {
        let client = self.client(&Operation::new(&resource.id, "read"))?;

        match resource.id.resource_type.as_str() {
            schemas::connection::DATA_SOURCE_TYPE => {
                data_source_connections::read(client, resource).await
            }
            schemas::connector::DATA_SOURCE_TYPE => {
                data_source_connectors::read(client, resource).await
            }
            schemas::source_registration::DATA_SOURCE_TYPE => {
                source_registrations::read(client, resource).await
            }
            schemas::protection_policy::DATA_SOURCE_TYPE => {
                protection_policies::read(client, resource).await
            }
            schemas::source_registration::LOOKUP_DATA_SOURCE_TYPE => {
                source_registration_info::read(client, resource).await
            }
            other => Err(unknown_type(&resource.id, other)),
        }
    }

    pub async fn create_resource(&self, resource: &Resource) -> ProviderResult<State> {
        let client = self.client(&Operation::new(&resource.id, "create"))?;

        match resource.id.resource_type.as_str() {
            schemas::connection::RESOURCE_TYPE => {
                data_source_connection::create(client, resource).await
            }
            schemas::connector::RESOURCE_TYPE => data_source_connector::create(client, resource).await,
            schemas::source_registration::RESOURCE_TYPE => {
                source_registration::create(client, resource).await
            }
            schemas::protection_policy::RESOURCE_TYPE => {
                protection_policy::create(client, resource).await
            }
            other => Err(unknown_type(&resource.id, other)),
        }
    }

    pub async fn update_resource(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> ProviderResult<State> {
        let client = self.client(&Operation::new(id, "update"))?;

        match id.resource_type.as_str() {
            schemas::connection::RESOURCE_TYPE => {
                data_source_connection::update(client, id, identifier, from, to).await
            }
            schemas::connector::RESOURCE_TYPE => {
                data_source_connector::update(client, id, identifier, from, to).await
            }
            schemas::source_registration::RESOURCE_TYPE => {
                source_registration::update(client, id, identifier, from, to).await
            }
            schemas::protection_policy::RESOURCE_TYPE => {
                protection_policy::update(client, id, identifier, to).await
            }
            other => Err(unknown_type(id, other)),
        }
    }

    pub async fn delete_resource(&self, id: &ResourceId, identifier: &str) -> ProviderResult<()> {
        if id.resource_type == schemas::connector::RESOURCE_TYPE {
            return data_source_connector::delete(id, identifier).await;
        }
        let client = self.client(&Operation::new(id, "delete"))?;

        match id.resource_type.as_str() {
            schemas::connection::RESOURCE_TYPE => {
                data_source_connection::delete(client, id, identifier).await
            }
            schemas::source_registration::RESOURCE_TYPE => {
                source_registration::delete(client, id, identifier).await
            }
            schemas::protection_policy::RESOURCE_TYPE => {
                protection_policy::delete(client, id, identifier).await
            }
            other => Err(unknown_type(id, other)),
        }
    }
}

fn unknown_type(id: &ResourceId, resource_type: &str) -> ProviderError {
    ProviderError::new(format!("Unknown resource type: {}", resource_type)).for_resource(id.clone())
}
