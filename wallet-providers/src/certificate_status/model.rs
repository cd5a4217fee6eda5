//! `struct`s and `enum`s for certificate status classification.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Validity of a certificate relative to an evaluation instant. Derived
/// from the certificate dates on every read, never stored.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidityStatus {
    Valid,
    ExpiringSoon,
    Expired,
}

/// The notification categories a record can owe to the user.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Expiry,
    ExpiredReissue,
    Revoked,
    Booster,
    BoosterDetail,
    Reissue,
    ReissueDetail,
}

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReissueState {
    #[default]
    None,
    Pending,
    Completed,
}

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReissueType {
    #[default]
    None,
    Booster,
    Expiry,
}
