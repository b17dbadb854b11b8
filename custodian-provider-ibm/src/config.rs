//! Provider configuration
//!
//! Settings come from three layers: the `provider` block of the
//! configuration file, the environment, and command-line flags. Each layer
//! is a `ProviderConfig`; `merge` lets the higher layer win field by field.

use std::time::Duration;

use serde::Deserialize;

use crate::error::BackupRecoveryError;

pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Public or private service endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointType {
    #[default]
    Public,
    Private,
}

impl std::str::FromStr for EndpointType {
    type Err = BackupRecoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(EndpointType::Public),
            "private" => Ok(EndpointType::Private),
            other => Err(BackupRecoveryError::Config {
                message: format!(
                    "invalid endpoint type '{}', expected 'public' or 'private'",
                    other
                ),
            }),
        }
    }
}

#[derive(Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub region: Option<String>,
    pub instance_id: Option<String>,
    pub endpoint_type: Option<EndpointType>,
    /// Explicit service URL; wins over region/instance_id
    pub endpoint: Option<String>,
    pub iam_url: Option<String>,
    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

impl ProviderConfig {
    /// Read the environment
    pub fn from_env() -> Result<Self, BackupRecoveryError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary variable lookup
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, BackupRecoveryError> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let endpoint_type = match get("IBMCLOUD_ENDPOINT_TYPE") {
            Some(s) => Some(s.parse()?),
            None => None,
        };

        Ok(Self {
            api_key: get("IBMCLOUD_API_KEY").or_else(|| get("IC_API_KEY")),
            region: get("IBMCLOUD_REGION"),
            instance_id: get("BACKUP_RECOVERY_INSTANCE_ID"),
            endpoint_type,
            endpoint: get("IBMCLOUD_BACKUP_RECOVERY_ENDPOINT"),
            iam_url: get("IBMCLOUD_IAM_API_ENDPOINT"),
            timeout: None,
        })
    }

    /// Overlay `higher` on top of `self`
    pub fn merge(self, higher: ProviderConfig) -> ProviderConfig {
        ProviderConfig {
            api_key: higher.api_key.or(self.api_key),
            region: higher.region.or(self.region),
            instance_id: higher.instance_id.or(self.instance_id),
            endpoint_type: higher.endpoint_type.or(self.endpoint_type),
            endpoint: higher.endpoint.or(self.endpoint),
            iam_url: higher.iam_url.or(self.iam_url),
            timeout: higher.timeout.or(self.timeout),
        }
    }

    pub fn api_key(&self) -> Result<&str, BackupRecoveryError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| BackupRecoveryError::Config {
                message: "missing API key (set IBMCLOUD_API_KEY)".to_string(),
            })
    }

    pub fn iam_url(&self) -> &str {
        self.iam_url
            .as_deref()
            .unwrap_or(DEFAULT_IAM_URL)
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Base URL of the Backup Recovery service
    pub fn service_url(&self) -> Result<String, BackupRecoveryError> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(endpoint.trim_end_matches('/').to_string());
        }

        let (Some(instance_id), Some(region)) = (&self.instance_id, &self.region) else {
            return Err(BackupRecoveryError::Config {
                message: "cannot resolve service URL: set endpoint, or instance_id and region"
                    .to_string(),
            });
        };

        let visibility = match self.endpoint_type.unwrap_or_default() {
            EndpointType::Public => "",
            EndpointType::Private => "private.",
        };
        Ok(format!(
            "https://{}.{}{}.backup-recovery.cloud.ibm.com/v2",
            instance_id, visibility, region
        ))
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("region", &self.region)
            .field("instance_id", &self.instance_id)
            .field("endpoint_type", &self.endpoint_type)
            .field("endpoint", &self.endpoint)
            .field("iam_url", &self.iam_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
