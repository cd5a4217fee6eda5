use thiserror::Error;
use wallet_providers::certificate_decoder::error::DecodeError;
use wallet_providers::common_models::collection::CollectionError;
use wallet_providers::wallet_storage::WalletStorageError;

#[derive(Debug, Error)]
pub enum CollectionServiceError {
    #[error("Decode error: `{0}`")]
    Decode(#[from] DecodeError),
    #[error("Collection error: `{0}`")]
    Collection(#[from] CollectionError),
    #[error("Persistence error: `{0}`")]
    Persistence(#[from] WalletStorageError),
}
