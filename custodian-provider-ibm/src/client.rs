//! Backup Recovery HTTP client
//!
//! Thin typed wrapper over the REST API. Every call carries the bearer token
//! and the tenant header; non-2xx responses become `BackupRecoveryError::Api`.

use std::sync::Arc;

use reqwest::{Method, Url};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::IamAuthenticator;
use crate::config::ProviderConfig;
use crate::error::BackupRecoveryError;
use crate::models::*;

const TENANT_HEADER: &str = "X-IBM-Tenant-Id";

const CONNECTIONS_PATH: &str = "/connection-bff/v2/connections";
const CONNECTORS_PATH: &str = "/connection-bff/v2/connectors";
const REGISTRATIONS_PATH: &str = "/data-protect/sources/registrations";
const POLICIES_PATH: &str = "/data-protect/policies";

#[derive(Clone)]
pub struct BackupRecoveryClient {
    http: reqwest::Client,
    base_url: String,
    auth: Arc<IamAuthenticator>,
}

impl BackupRecoveryClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, BackupRecoveryError> {
        let base_url = config.service_url()?;
        let api_key = config.api_key()?.to_string();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(BackupRecoveryError::Network)?;

        let auth = IamAuthenticator::new(http.clone(), api_key, config.iam_url().to_string());

        Ok(Self {
            http,
            base_url,
            auth: Arc::new(auth),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =========================================================================
    // Connections
    // =========================================================================

    pub async fn create_connection(
        &self,
        tenant: &str,
        request: &CreateConnectionRequest,
    ) -> Result<DataSourceConnection, BackupRecoveryError> {
        self.send(Method::POST, &[CONNECTIONS_PATH], tenant, &[], Some(request))
            .await
    }

    pub async fn list_connections(
        &self,
        tenant: &str,
        filter: &ConnectionFilter,
    ) -> Result<DataSourceConnectionList, BackupRecoveryError> {
        let mut query = Vec::new();
        push_list(&mut query, "connectionIds", &filter.connection_ids);
        push_list(&mut query, "connectionNames", &filter.connection_names);
        self.send(Method::GET, &[CONNECTIONS_PATH], tenant, &query, None::<&()>)
            .await
    }

    pub async fn patch_connection(
        &self,
        tenant: &str,
        connection_id: &str,
        request: &PatchConnectionRequest,
    ) -> Result<DataSourceConnection, BackupRecoveryError> {
        self.send(Method::PATCH, &[CONNECTIONS_PATH, connection_id], tenant, &[], Some(request))
            .await
    }

    pub async fn delete_connection(
        &self,
        tenant: &str,
        connection_id: &str,
    ) -> Result<(), BackupRecoveryError> {
        self.send_no_content(Method::DELETE, &[CONNECTIONS_PATH, connection_id], tenant, None::<&()>)
            .await
    }

    // =========================================================================
    // Connectors
    // =========================================================================

    pub async fn list_connectors(
        &self,
        tenant: &str,
        filter: &ConnectorFilter,
    ) -> Result<DataSourceConnectorList, BackupRecoveryError> {
        let mut query = Vec::new();
        push_list(&mut query, "connectorIds", &filter.connector_ids);
        push_list(&mut query, "connectorNames", &filter.connector_names);
        if let Some(connection_id) = &filter.connection_id {
            query.push(("connectionId", connection_id.clone()));
        }
        self.send(Method::GET, &[CONNECTORS_PATH], tenant, &query, None::<&()>)
            .await
    }

    pub async fn patch_connector(
        &self,
        tenant: &str,
        connector_id: &str,
        request: &PatchConnectorRequest,
    ) -> Result<DataSourceConnector, BackupRecoveryError> {
        self.send(Method::PATCH, &[CONNECTORS_PATH, connector_id], tenant, &[], Some(request))
            .await
    }

    // =========================================================================
    // Source registrations
    // =========================================================================

    pub async fn register_source(
        &self,
        tenant: &str,
        request: &SourceRegistrationRequest,
    ) -> Result<SourceRegistration, BackupRecoveryError> {
        self.send(Method::POST, &[REGISTRATIONS_PATH], tenant, &[], Some(request))
            .await
    }

    pub async fn list_registrations(
        &self,
        tenant: &str,
        filter: &RegistrationFilter,
    ) -> Result<SourceRegistrationList, BackupRecoveryError> {
        let mut query = Vec::new();
        let ids: Vec<String> = filter.ids.iter().map(|id| id.to_string()).collect();
        push_list(&mut query, "ids", &ids);
        push_flag(
            &mut query,
            "includeSourceCredentials",
            filter.include_source_credentials,
        );
        if let Some(key) = &filter.encryption_key {
            query.push(("encryptionKey", key.clone()));
        }
        push_flag(&mut query, "useCachedData", filter.use_cached_data);
        push_flag(
            &mut query,
            "includeExternalMetadata",
            filter.include_external_metadata,
        );
        push_flag(
            &mut query,
            "ignoreTenantMigrationInProgressCheck",
            filter.ignore_tenant_migration_in_progress_check,
        );
        self.send(Method::GET, &[REGISTRATIONS_PATH], tenant, &query, None::<&()>)
            .await
    }

    pub async fn get_registration(
        &self,
        tenant: &str,
        id: i64,
        request_initiator_type: Option<&str>,
    ) -> Result<SourceRegistration, BackupRecoveryError> {
        let id = id.to_string();
        let query: Vec<_> = request_initiator_type
            .map(|initiator| ("requestInitiatorType", initiator.to_string()))
            .into_iter()
            .collect();
        self.send(Method::GET, &[REGISTRATIONS_PATH, &id], tenant, &query, None::<&()>)
            .await
    }

    pub async fn update_registration(
        &self,
        tenant: &str,
        id: i64,
        request: &SourceRegistrationRequest,
    ) -> Result<(), BackupRecoveryError> {
        let id = id.to_string();
        self.send_no_content(Method::PUT, &[REGISTRATIONS_PATH, &id], tenant, Some(request))
            .await
    }

    pub async fn patch_registration(
        &self,
        tenant: &str,
        id: i64,
        request: &PatchSourceRegistrationRequest,
    ) -> Result<(), BackupRecoveryError> {
        let id = id.to_string();
        self.send_no_content(Method::PATCH, &[REGISTRATIONS_PATH, &id], tenant, Some(request))
            .await
    }

    pub async fn delete_registration(&self, tenant: &str, id: i64) -> Result<(), BackupRecoveryError> {
        let id = id.to_string();
        self.send_no_content(Method::DELETE, &[REGISTRATIONS_PATH, &id], tenant, None::<&()>)
            .await
    }

    // =========================================================================
    // Protection policies
    // =========================================================================

    pub async fn create_policy(
        &self,
        tenant: &str,
        request: &ProtectionPolicyRequest,
    ) -> Result<ProtectionPolicy, BackupRecoveryError> {
        self.send(Method::POST, &[POLICIES_PATH], tenant, &[], Some(request))
            .await
    }

    pub async fn list_policies(
        &self,
        tenant: &str,
        filter: &PolicyFilter,
    ) -> Result<ProtectionPolicyList, BackupRecoveryError> {
        let mut query = Vec::new();
        push_list(&mut query, "ids", &filter.ids);
        push_list(&mut query, "policyNames", &filter.policy_names);
        push_list(&mut query, "types", &filter.types);
        push_flag(
            &mut query,
            "excludeLinkedPolicies",
            filter.exclude_linked_policies,
        );
        push_flag(
            &mut query,
            "includeReplicatedPolicies",
            filter.include_replicated_policies,
        );
        push_flag(&mut query, "includeStats", filter.include_stats);
        if let Some(initiator) = &filter.request_initiator_type {
            query.push(("requestInitiatorType", initiator.clone()));
        }
        self.send(Method::GET, &[POLICIES_PATH], tenant, &query, None::<&()>)
            .await
    }

    pub async fn get_policy(
        &self,
        tenant: &str,
        id: &str,
    ) -> Result<ProtectionPolicy, BackupRecoveryError> {
        self.send(Method::GET, &[POLICIES_PATH, id], tenant, &[], None::<&()>)
            .await
    }

    pub async fn update_policy(
        &self,
        tenant: &str,
        id: &str,
        request: &ProtectionPolicyRequest,
    ) -> Result<ProtectionPolicy, BackupRecoveryError> {
        self.send(Method::PUT, &[POLICIES_PATH, id], tenant, &[], Some(request))
            .await
    }

    pub async fn delete_policy(&self, tenant: &str, id: &str) -> Result<(), BackupRecoveryError> {
        self.send_no_content(Method::DELETE, &[POLICIES_PATH, id], tenant, None::<&()>)
            .await
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    async fn send<T, B>(
        &self,
        method: Method,
        path: &[&str],
        tenant: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, BackupRecoveryError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.execute(method, path, tenant, query, body).await?;
        let status = response.status().as_u16();
        response
            .json::<T>()
            .await
            .map_err(|e| BackupRecoveryError::Decode {
                message: format!("{} ({}): {}", path.join("/"), status, e),
            })
    }

    async fn send_no_content<B>(
        &self,
        method: Method,
        path: &[&str],
        tenant: &str,
        body: Option<&B>,
    ) -> Result<(), BackupRecoveryError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(method, path, tenant, &[], body).await?;
        Ok(())
    }

    /// Base URL plus the collection path, with every id pushed as one
    /// encoded segment
    fn url(&self, path: &[&str]) -> Result<Url, BackupRecoveryError> {
        let Some((collection, ids)) = path.split_first() else {
            return Err(BackupRecoveryError::Config {
                message: "empty request path".to_string(),
            });
        };
        if let Some(id) = ids.iter().find(|id| matches!(**id, "" | "." | "..")) {
            return Err(BackupRecoveryError::InvalidIdentifier {
                identifier: id.to_string(),
                message: "not a usable path segment".to_string(),
            });
        }

        let invalid = || BackupRecoveryError::Config {
            message: format!("invalid service URL '{}'", self.base_url),
        };
        let mut url = Url::parse(&format!("{}{}", self.base_url, collection)).map_err(|_| invalid())?;
        url.path_segments_mut().map_err(|_| invalid())?.extend(ids);
        Ok(url)
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &[&str],
        tenant: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<reqwest::Response, BackupRecoveryError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let token = self.auth.token().await?;
        log::info!("{} {}", method, url);

        let bearer = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            BackupRecoveryError::Auth {
                message: "Invalid token format".to_string(),
            }
        })?;

        let mut request = self
            .http
            .request(method, url)
            .header(AUTHORIZATION, bearer)
            .header(TENANT_HEADER, tenant);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.header(CONTENT_TYPE, "application/json").json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let message = body
            .get("message")
            .or_else(|| body.get("errorMessage"))
            .or_else(|| body.get("error"))
            .and_then(|m| m.as_str())
            .map(|m| m.to_string())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        Err(BackupRecoveryError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Lists go on the wire comma-separated
fn push_list(query: &mut Vec<(&'static str, String)>, key: &'static str, values: &[String]) {
    if !values.is_empty() {
        query.push((key, values.join(",")));
    }
}

fn push_flag(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<bool>) {
    if let Some(v) = value {
        query.push((key, v.to_string()));
    }
}

impl std::fmt::Debug for BackupRecoveryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackupRecoveryClient")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .finish()
    }
}
