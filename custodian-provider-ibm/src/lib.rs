//! Custodian IBM Backup Recovery Provider
//!
//! Manages data-source connections and connectors, protection source
//! registrations and protection policies through the Backup Recovery REST API.
//!
//! ## Module Structure
//!
//! - `config` - Provider settings from configuration file and environment
//! - `auth` - IAM API-key to bearer-token exchange
//! - `client` - Typed REST client
//! - `models` - Request and response shapes
//! - `schemas` - Attribute schema trees
//! - `convert` - Schema-driven map <-> request/response conversion
//! - `resources` - Resource types and CRUD entry points
//! - `data_sources` - List data sources
//! - `provider` - IbmProvider implementation

pub mod auth;
pub mod client;
pub mod config;
pub mod convert;
pub mod data_sources;
pub mod error;
pub mod models;
pub mod provider;
pub mod resources;
pub mod schemas;
pub mod utils;

// Re-export main types
pub use client::BackupRecoveryClient;
pub use config::{EndpointType, ProviderConfig};
pub use error::BackupRecoveryError;
pub use provider::IbmProvider;

use custodian_core::provider::{BoxFuture, Provider, ProviderResult, ResourceType};
use custodian_core::resource::{Resource, ResourceId, State};

use resources::resource_types;

// =============================================================================
// Provider Trait Implementation
// =============================================================================

impl Provider for IbmProvider {
    fn name(&self) -> &'static str {
        "ibm"
    }

    fn resource_types(&self) -> Vec<Box<dyn ResourceType>> {
        resource_types()
    }

    fn read(
        &self,
        id: &ResourceId,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.map(|s| s.to_string());
        Box::pin(async move { self.read_resource(&id, identifier.as_deref()).await })
    }

    fn read_data_source(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.list_data_source(&resource).await })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.create_resource(&resource).await })
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let from = from.clone();
        let to = to.clone();
        Box::pin(async move { self.update_resource(&id, &identifier, &from, &to).await })
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        Box::pin(async move { self.delete_resource(&id, &identifier).await })
    }
}
