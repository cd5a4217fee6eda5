use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::common_models::collection::CertificateCollection;
use crate::wallet_storage::{WalletStorage, WalletStorageError};

/// Non-durable reference implementation, also used as the test backend.
#[derive(Default)]
pub struct InMemoryWalletStorage {
    storage: Arc<Mutex<Option<CertificateCollection>>>,
}

impl InMemoryWalletStorage {
    pub fn new(initial: Option<CertificateCollection>) -> Self {
        Self {
            storage: Arc::new(Mutex::new(initial)),
        }
    }
}

#[async_trait]
impl WalletStorage for InMemoryWalletStorage {
    async fn load(&self) -> Result<Option<CertificateCollection>, WalletStorageError> {
        let handle = self.storage.lock().await;

        Ok(handle.clone())
    }

    async fn save(&self, collection: &CertificateCollection) -> Result<(), WalletStorageError> {
        let mut handle = self.storage.lock().await;

        *handle = Some(collection.clone());

        Ok(())
    }
}
