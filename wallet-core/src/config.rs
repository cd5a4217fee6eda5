use time::Duration;

use crate::model::RemovalPolicy;

pub struct WalletCoreConfig {
    pub collection_config: CollectionConfig,
}

#[derive(Clone, Debug)]
pub struct CollectionConfig {
    /// How long before technical expiry a certificate is reported as
    /// expiring soon.
    pub expiry_window: Duration,
    pub removal_policy: RemovalPolicy,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            expiry_window: Duration::days(28),
            removal_policy: RemovalPolicy::Lenient,
        }
    }
}

impl Default for WalletCoreConfig {
    fn default() -> Self {
        Self {
            collection_config: CollectionConfig::default(),
        }
    }
}
