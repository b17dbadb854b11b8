//! Custodian State Management
//!
//! Persists what Custodian knows about managed Backup Recovery objects: the
//! identifier returned at creation and the attributes last read back.
//!
//! - **StateFile**: all managed resources plus lineage and serial
//! - **StateBackend**: storage trait with locking for concurrent runs
//! - **LockInfo**: who holds the state lock and until when
//!
//! # Example
//!
//! ```ignore
//! use custodian_state::{create_backend, BackendConfig};
//!
//! let backend = create_backend(&BackendConfig::local()).await?;
//! let lock = backend.acquire_lock("apply").await?;
//! let mut state = backend.read_state().await?.unwrap_or_default();
//! // ... create, update, delete ...
//! state.increment_serial();
//! backend.write_state(&state).await?;
//! backend.release_lock(&lock).await?;
//! ```

pub mod backend;
pub mod backends;
pub mod lock;
pub mod state;

pub use backend::{BackendConfig, BackendError, BackendResult, StateBackend};
pub use backends::{LocalBackend, create_backend};
pub use lock::LockInfo;
pub use state::{ResourceState, StateFile};
