//! State lock records
//!
//! A lock is written next to the state before any command that changes it
//! (`apply`, `refresh`, `destroy`, `import`) and removed afterwards. Locks
//! left behind by a crashed run expire and may be taken over.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, BackendResult};

/// Default lock timeout in seconds (15 minutes)
pub const DEFAULT_LOCK_TIMEOUT_SECS: i64 = 900;

/// Who holds the state lock, for which command, and until when
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Random id; release and force-unlock must name it
    pub id: String,
    /// The command holding the lock (e.g., "apply", "destroy")
    pub operation: String,
    /// username@hostname
    pub who: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    /// Version of the binary that took the lock; empty for older lock files
    #[serde(default)]
    pub custodian_version: String,
}

impl LockInfo {
    pub fn new(operation: impl Into<String>) -> Self {
        Self::with_timeout(operation, DEFAULT_LOCK_TIMEOUT_SECS)
    }

    pub fn with_timeout(operation: impl Into<String>, timeout_secs: i64) -> Self {
        let created = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            operation: operation.into(),
            who: lock_owner(),
            created,
            expires: created + Duration::seconds(timeout_secs),
            custodian_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires
    }

    pub fn time_remaining(&self) -> Duration {
        self.expires - Utc::now()
    }

    /// Whole minutes until expiry, rounded up; zero once expired
    pub fn minutes_remaining(&self) -> i64 {
        let seconds = self.time_remaining().num_seconds().max(0);
        (seconds + 59) / 60
    }

    /// Contents of a lock file
    pub fn to_json(&self) -> BackendResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BackendError::Serialization(format!("Failed to serialize lock: {}", e)))
    }

    /// Parse a lock file
    pub fn from_json(content: &str) -> BackendResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| BackendError::InvalidState(format!("Failed to parse lock file: {}", e)))
    }
}

fn lock_owner() -> String {
    let username = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let hostname = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string());

    format!("{}@{}", username, hostname)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lock_lasts_fifteen_minutes() {
        let lock = LockInfo::new("apply");
        assert_eq!(lock.operation, "apply");
        assert!(!lock.id.is_empty());
        assert!(lock.who.contains('@'));
        assert!(!lock.is_expired());
        assert_eq!(
            (lock.expires - lock.created).num_seconds(),
            DEFAULT_LOCK_TIMEOUT_SECS
        );
        assert_eq!(lock.minutes_remaining(), 15);
        assert_eq!(lock.custodian_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn custom_timeout() {
        let lock = LockInfo::with_timeout("destroy", 60);
        let remaining = lock.time_remaining();
        assert!(remaining.num_seconds() > 55);
        assert!(remaining.num_seconds() <= 60);
        assert_eq!(lock.minutes_remaining(), 1);
    }

    #[test]
    fn expired_lock_has_no_minutes_left() {
        let lock = LockInfo::with_timeout("apply", -1);
        assert!(lock.is_expired());
        assert_eq!(lock.minutes_remaining(), 0);
    }

    #[test]
    fn lock_file_without_version_still_parses() {
        let content = r#"{
            "id": "l-1",
            "operation": "refresh",
            "who": "ops@edge",
            "created": "2026-01-01T00:00:00Z",
            "expires": "2026-01-01T00:15:00Z"
        }"#;
        let lock = LockInfo::from_json(content).unwrap();
        assert_eq!(lock.who, "ops@edge");
        assert!(lock.custodian_version.is_empty());
        assert!(lock.is_expired());
    }

    #[test]
    fn garbage_lock_file_is_invalid_state() {
        assert!(matches!(
            LockInfo::from_json("not json"),
            Err(BackendError::InvalidState(_))
        ));
    }

    #[test]
    fn lock_file_keeps_identity() {
        let lock = LockInfo::new("import");
        let parsed = LockInfo::from_json(&lock.to_json().unwrap()).unwrap();
        assert_eq!(parsed.id, lock.id);
        assert_eq!(parsed.who, lock.who);
    }
}
