//! Identifier handling and error diagnostics shared by all resources

use std::collections::HashMap;

use custodian_core::provider::ProviderError;
use custodian_core::resource::{ResourceId, Value};

use crate::error::BackupRecoveryError;
use crate::schemas::common::TENANT_ID;

const ID_SEPARATOR: &str = "::";

/// Identifier stored in state: `<tenant>::<id>`
pub fn compose_identifier(tenant: &str, id: &str) -> String {
    format!("{}{}{}", tenant, ID_SEPARATOR, id)
}

/// Split `<tenant>::<id>`
///
/// A bare id is accepted when a fallback tenant is known. Only the first
/// separator splits, so ids that themselves contain colons survive.
pub fn split_identifier<'a>(
    identifier: &'a str,
    fallback_tenant: Option<&'a str>,
) -> Result<(&'a str, &'a str), BackupRecoveryError> {
    let invalid = |message: &str| BackupRecoveryError::InvalidIdentifier {
        identifier: identifier.to_string(),
        message: message.to_string(),
    };

    let (tenant, id) = match identifier.split_once(ID_SEPARATOR) {
        Some(parts) => parts,
        None => match fallback_tenant {
            Some(tenant) => (tenant, identifier),
            None => return Err(invalid("expected <tenant>::<id>")),
        },
    };

    if tenant.is_empty() {
        return Err(invalid("tenant is empty"));
    }
    if id.is_empty() {
        return Err(invalid("id is empty"));
    }
    Ok((tenant, id))
}

/// Configured tenant of a resource
pub fn tenant_attribute(attributes: &HashMap<String, Value>) -> Result<&str, BackupRecoveryError> {
    attributes
        .get(TENANT_ID)
        .and_then(Value::as_str)
        .ok_or_else(|| BackupRecoveryError::conversion(format!("'{}' is not set", TENANT_ID)))
}

/// Parse the numeric part of a registration identifier
pub fn parse_numeric_id(identifier: &str, id: &str) -> Result<i64, BackupRecoveryError> {
    id.parse::<i64>()
        .map_err(|_| BackupRecoveryError::InvalidIdentifier {
            identifier: identifier.to_string(),
            message: format!("'{}' is not a numeric id", id),
        })
}

/// One CRUD operation on one resource, used to build diagnostics
#[derive(Debug, Clone, Copy)]
pub struct Operation<'a> {
    pub id: &'a ResourceId,
    pub name: &'static str,
}

impl<'a> Operation<'a> {
    pub fn new(id: &'a ResourceId, name: &'static str) -> Self {
        Self { id, name }
    }

    /// A remote API call failed
    pub fn api_error(&self, call: &str, err: BackupRecoveryError) -> ProviderError {
        let error = ProviderError::new(format!("{} failed", call))
            .for_resource(self.id.clone())
            .during(self.name)
            .with_cause(err);
        log::debug!("\n{}", error.debug_message());
        error
    }

    /// A local step failed; `tag` tells the failure sites apart
    pub fn failed_at(&self, tag: &str, err: impl std::fmt::Display) -> ProviderError {
        let error = ProviderError::new(err.to_string())
            .for_resource(self.id.clone())
            .during(self.name)
            .discriminated(tag);
        log::debug!("\n{}", error.debug_message());
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_and_split() {
        let identifier = compose_identifier("tenant-a/", "42");
        assert_eq!(identifier, "tenant-a/::42");
        assert_eq!(
            split_identifier(&identifier, None).unwrap(),
            ("tenant-a/", "42")
        );
    }

    #[test]
    fn split_keeps_colons_in_id() {
        assert_eq!(
            split_identifier("tenant-a/::4421:1700000000:12", None).unwrap(),
            ("tenant-a/", "4421:1700000000:12")
        );
    }

    #[test]
    fn bare_id_uses_fallback_tenant() {
        assert_eq!(
            split_identifier("42", Some("tenant-b/")).unwrap(),
            ("tenant-b/", "42")
        );
        assert!(split_identifier("42", None).is_err());
    }

    #[test]
    fn empty_parts_rejected() {
        assert!(split_identifier("::42", None).is_err());
        assert!(split_identifier("tenant-a/::", None).is_err());
    }

    #[test]
    fn tenant_from_attributes() {
        let mut attrs = HashMap::new();
        assert!(tenant_attribute(&attrs).is_err());
        attrs.insert(TENANT_ID.to_string(), Value::String("tenant-a/".to_string()));
        assert_eq!(tenant_attribute(&attrs).unwrap(), "tenant-a/");
    }

    #[test]
    fn numeric_id() {
        assert_eq!(parse_numeric_id("t::42", "42").unwrap(), 42);
        assert!(parse_numeric_id("t::x", "x").is_err());
    }

    #[test]
    fn diagnostics_carry_operation_and_tag() {
        let id = ResourceId::new("source_registration", "host");
        let op = Operation::new(&id, "read");

        let err = op.failed_at(
            "parse-id",
            BackupRecoveryError::InvalidIdentifier {
                identifier: "x".to_string(),
                message: "expected <tenant>::<id>".to_string(),
            },
        );
        assert_eq!(err.operation.as_deref(), Some("read"));
        assert_eq!(err.discriminator.as_deref(), Some("parse-id"));

        let err = op.api_error(
            "GetProtectionSourceRegistration",
            BackupRecoveryError::Api {
                status: 500,
                message: "boom".to_string(),
            },
        );
        assert_eq!(err.message, "GetProtectionSourceRegistration failed");
        assert!(err.debug_message().contains("API error (500): boom"));
    }
}
