//! The **Certificate Wallet Core** is a library for holding, classifying and
//! observing a person's health certificates.
//!
//! The wallet keeps every scanned certificate in a single
//! [`CertificateCollection`](wallet_providers::common_models::collection::CertificateCollection):
//! records belonging to the same person form a group, each record carries the
//! revocation, reissue and notification-acknowledgment bookkeeping around its
//! immutable certificate, and validity is re-derived from the certificate
//! dates on every read.
//!
//! ## Repository structure
//!
//! The library consists of two crates:
//!
//! * **Providers**: data models, the pure status classifier, and the
//!   pluggable seams of the wallet
//!   * Certificate decoder provider
//!   * Wallet storage provider
//! * **Core**: the service layer
//!
//! The **Core** owns the canonical collection state. All mutation is
//! serialized through the [`CollectionService`] commit path; observers
//! subscribe to immutable snapshots and UI layers render from those.
//!
//! ## Getting started
//!
//! ```ignore rust
//! /// `None` initializes the Core with the default configuration
//! let core = WalletCore::new_in_memory(None).await.unwrap();
//!
//! let group_id = core
//!     .collection_service
//!     .scan_certificate(payload)
//!     .await?;
//! ```

use std::sync::Arc;

use wallet_providers::certificate_decoder::{
    imp::json::JsonCertificateDecoder, CertificateDecoder,
};
use wallet_providers::wallet_storage::{in_memory::InMemoryWalletStorage, WalletStorage};

use config::WalletCoreConfig;
use service::{collection_service::CollectionService, error::CollectionServiceError};

pub mod config;
pub mod model;
pub mod service;

pub struct WalletCore {
    pub collection_service: CollectionService,
}

impl WalletCore {
    pub async fn new(
        config: Option<WalletCoreConfig>,
        storage: Arc<dyn WalletStorage>,
        decoder: Arc<dyn CertificateDecoder>,
    ) -> Result<Self, CollectionServiceError> {
        let config = config.unwrap_or_default();

        let collection_service =
            CollectionService::new(decoder, storage, config.collection_config).await?;

        Ok(Self { collection_service })
    }

    /// Default wiring: the JSON payload decoder and the non-durable
    /// in-memory storage backend.
    pub async fn new_in_memory(
        config: Option<WalletCoreConfig>,
    ) -> Result<Self, CollectionServiceError> {
        Self::new(
            config,
            Arc::new(InMemoryWalletStorage::default()),
            Arc::new(JsonCertificateDecoder),
        )
        .await
    }
}
