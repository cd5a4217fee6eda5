use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::certificate_status::model::{NotificationKind, ReissueState, ReissueType};
use crate::common_models::certificate::Certificate;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CertificateRecordId(Uuid);

impl std::fmt::Display for CertificateRecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for CertificateRecordId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<CertificateRecordId> for Uuid {
    fn from(value: CertificateRecordId) -> Self {
        value.0
    }
}

impl CertificateRecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CertificateRecordId {
    fn default() -> Self {
        Self::new()
    }
}

/// One certificate plus the wallet's bookkeeping around it: revocation and
/// reissue state, and the per-notification acknowledgment flags.
///
/// Validity status is intentionally not a field here. It is re-derived from
/// the certificate dates on every read (see
/// [`certificate_status`](crate::certificate_status)), so a certificate that
/// expires while sitting in the collection is reclassified without a write.
#[serde_as]
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    pub id: CertificateRecordId,
    pub certificate: Certificate,
    /// The original scanned payload, kept for re-validation and display.
    pub raw_payload: String,
    #[serde_as(as = "serde_with::TimestampMilliSeconds<i64>")]
    pub imported_at: OffsetDateTime,

    pub is_revoked: bool,
    pub reissue_state: ReissueState,
    pub reissue_type: ReissueType,
    /// Rule ids that already triggered a booster notification, kept to avoid
    /// alerting twice for the same rule.
    pub booster_rule_ids: BTreeSet<String>,

    has_seen_expiry_notification: bool,
    has_seen_expired_reissue_notification: bool,
    has_seen_revoked_notification: bool,
    has_seen_booster_notification: bool,
    has_seen_booster_detail_notification: bool,
    has_seen_reissue_notification: bool,
    has_seen_reissue_detail_notification: bool,
}

impl CertificateRecord {
    /// A freshly imported record: nothing acknowledged, nothing revoked, no
    /// reissue in progress.
    pub fn new(certificate: Certificate, raw_payload: String, imported_at: OffsetDateTime) -> Self {
        Self {
            id: CertificateRecordId::new(),
            certificate,
            raw_payload,
            imported_at,
            is_revoked: false,
            reissue_state: ReissueState::None,
            reissue_type: ReissueType::None,
            booster_rule_ids: BTreeSet::new(),
            has_seen_expiry_notification: false,
            has_seen_expired_reissue_notification: false,
            has_seen_revoked_notification: false,
            has_seen_booster_notification: false,
            has_seen_booster_detail_notification: false,
            has_seen_reissue_notification: false,
            has_seen_reissue_detail_notification: false,
        }
    }

    pub fn has_seen(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Expiry => self.has_seen_expiry_notification,
            NotificationKind::ExpiredReissue => self.has_seen_expired_reissue_notification,
            NotificationKind::Revoked => self.has_seen_revoked_notification,
            NotificationKind::Booster => self.has_seen_booster_notification,
            NotificationKind::BoosterDetail => self.has_seen_booster_detail_notification,
            NotificationKind::Reissue => self.has_seen_reissue_notification,
            NotificationKind::ReissueDetail => self.has_seen_reissue_detail_notification,
        }
    }

    /// Acknowledges a notification. One-way: a seen flag never reverts for
    /// the lifetime of the record, and repeating the call changes nothing.
    pub fn mark_seen(&mut self, kind: NotificationKind) {
        let flag = match kind {
            NotificationKind::Expiry => &mut self.has_seen_expiry_notification,
            NotificationKind::ExpiredReissue => &mut self.has_seen_expired_reissue_notification,
            NotificationKind::Revoked => &mut self.has_seen_revoked_notification,
            NotificationKind::Booster => &mut self.has_seen_booster_notification,
            NotificationKind::BoosterDetail => &mut self.has_seen_booster_detail_notification,
            NotificationKind::Reissue => &mut self.has_seen_reissue_notification,
            NotificationKind::ReissueDetail => &mut self.has_seen_reissue_detail_notification,
        };
        *flag = true;
    }
}
