//! Pure classification of certificate validity and pending notifications.
//!
//! Nothing in this module holds state or performs I/O. The functions are
//! total over decoded certificates: classification itself cannot fail, and
//! callers decide what to do with the result. Whether a notification is
//! *pending* combines the underlying condition (expired, revoked, reissue
//! offered, booster rule matched) with the record's acknowledgment flag;
//! an acknowledged notification is never reported again.

use time::{Duration, OffsetDateTime};

use crate::certificate_status::model::{
    NotificationKind, ReissueState, ReissueType, ValidityStatus,
};
use crate::common_models::{certificate::Certificate, record::CertificateRecord};

pub mod model;


pub fn is_expired(certificate: &Certificate, now: OffsetDateTime) -> bool {
    certificate.expires_at <= now
}

/// True while the certificate is still valid but inside the configured
/// expiry window before `expires_at`.
pub fn is_in_expiry_period(
    certificate: &Certificate,
    now: OffsetDateTime,
    expiry_window: Duration,
) -> bool {
    !is_expired(certificate, now) && certificate.expires_at - expiry_window <= now
}

pub fn classify(
    certificate: &Certificate,
    now: OffsetDateTime,
    expiry_window: Duration,
) -> ValidityStatus {
    if is_expired(certificate, now) {
        ValidityStatus::Expired
    } else if is_in_expiry_period(certificate, now, expiry_window) {
        ValidityStatus::ExpiringSoon
    } else {
        ValidityStatus::Valid
    }
}

/// Returns every notification kind the record currently owes the user,
/// i.e. the condition holds and the matching seen flag is still false.
///
/// The order of the returned kinds carries no meaning; presentation order
/// and at-most-once display per session are the observer's concern.
pub fn pending_notifications(
    record: &CertificateRecord,
    now: OffsetDateTime,
    expiry_window: Duration,
) -> Vec<NotificationKind> {
    let status = classify(&record.certificate, now, expiry_window);
    let reissue_pending = record.reissue_state == ReissueState::Pending;

    let conditions = [
        (
            NotificationKind::Expiry,
            status != ValidityStatus::Valid,
        ),
        (
            NotificationKind::ExpiredReissue,
            status == ValidityStatus::Expired
                && reissue_pending
                && record.reissue_type == ReissueType::Expiry,
        ),
        (NotificationKind::Revoked, record.is_revoked),
        (
            NotificationKind::Booster,
            !record.booster_rule_ids.is_empty(),
        ),
        (
            NotificationKind::BoosterDetail,
            !record.booster_rule_ids.is_empty(),
        ),
        (
            NotificationKind::Reissue,
            reissue_pending && record.reissue_type == ReissueType::Booster,
        ),
        (
            NotificationKind::ReissueDetail,
            reissue_pending && record.reissue_type == ReissueType::Booster,
        ),
    ];

    conditions
        .into_iter()
        .filter(|(kind, condition)| *condition && !record.has_seen(*kind))
        .map(|(kind, _)| kind)
        .collect()
}
