//! Persistence seam for the certificate collection.
//!
//! The wallet keeps its canonical state in memory and hands a snapshot to a
//! [`WalletStorage`] after every committed change. A storage failure never
//! invalidates the in-memory state.

use thiserror::Error;

use crate::common_models::collection::CertificateCollection;

pub mod in_memory;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait WalletStorage: Send + Sync {
    /// Returns the previously persisted collection, or `None` on first run.
    async fn load(&self) -> Result<Option<CertificateCollection>, WalletStorageError>;

    async fn save(&self, collection: &CertificateCollection) -> Result<(), WalletStorageError>;
}

#[derive(Clone, Debug, Error)]
pub enum WalletStorageError {
    #[error("Load error: `{0}`")]
    Load(String),
    #[error("Save error: `{0}`")]
    Save(String),
}
