use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use time::OffsetDateTime;

use crate::common_models::group::GroupId;

/// Name of the certificate holder as printed on the certificate, together
/// with the ICAO 9303 transliterated forms used for identity matching.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standardized_given_name: Option<String>,
    pub standardized_family_name: String,
}

/// One immutable decoded health certificate plus its envelope validity window.
///
/// A certificate carries exactly the data extracted from the scanned payload;
/// all mutable bookkeeping lives on the surrounding
/// [`CertificateRecord`](crate::common_models::record::CertificateRecord).
#[serde_as]
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub name: PersonName,
    /// ISO 8601, may be reduced to year or year-month on some certificates.
    pub date_of_birth: String,
    pub entries: Vec<CertificateEntry>,
    pub issuer_country: String,
    #[serde_as(as = "serde_with::TimestampSeconds<i64>")]
    pub issued_at: OffsetDateTime,
    #[serde_as(as = "serde_with::TimestampSeconds<i64>")]
    pub expires_at: OffsetDateTime,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum CertificateEntry {
    Vaccination(VaccinationEntry),
    Test(TestEntry),
    Recovery(RecoveryEntry),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationEntry {
    /// Unique certificate identifier (UVCI).
    pub id: String,
    pub vaccine_product: String,
    pub dose_number: u32,
    pub total_series_of_doses: u32,
    /// ISO 8601 calendar date of this dose.
    pub occurrence_date: String,
}

#[serde_as]
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEntry {
    pub id: String,
    pub test_type: String,
    pub result_positive: bool,
    #[serde_as(as = "serde_with::TimestampSeconds<i64>")]
    pub sample_collected_at: OffsetDateTime,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryEntry {
    pub id: String,
    pub first_positive_result_date: String,
    pub valid_from: String,
    pub valid_until: String,
}

impl CertificateEntry {
    /// Unique certificate identifier (UVCI) of this entry.
    pub fn id(&self) -> &str {
        match self {
            CertificateEntry::Vaccination(entry) => &entry.id,
            CertificateEntry::Test(entry) => &entry.id,
            CertificateEntry::Recovery(entry) => &entry.id,
        }
    }
}

impl Certificate {
    /// Identity key used to group certificates belonging to the same person.
    pub fn group_id(&self) -> GroupId {
        GroupId::new(
            self.name.standardized_family_name.as_str(),
            self.name.standardized_given_name.as_deref(),
            &self.date_of_birth,
        )
    }
}
