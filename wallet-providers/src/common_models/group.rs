use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::common_models::record::{CertificateRecord, CertificateRecordId};

/// Stable identity of a certificate group, derived from the person's
/// transliterated name and date of birth rather than from any single
/// certificate.
///
/// Two certificates land in the same group exactly when their normalized
/// identity fields compare equal.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupId {
    standardized_family_name: String,
    standardized_given_name: Option<String>,
    date_of_birth: String,
}

impl GroupId {
    pub fn new(
        standardized_family_name: &str,
        standardized_given_name: Option<&str>,
        date_of_birth: &str,
    ) -> Self {
        Self {
            standardized_family_name: normalize(standardized_family_name),
            standardized_given_name: standardized_given_name
                .map(normalize)
                .filter(|name| !name.is_empty()),
            date_of_birth: date_of_birth.trim().to_owned(),
        }
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut hasher = Sha256::new();
        hasher.update(self.standardized_family_name.as_bytes());
        hasher.update(b"<");
        hasher.update(self.standardized_given_name.as_deref().unwrap_or("").as_bytes());
        hasher.update(b"<");
        hasher.update(self.date_of_birth.as_bytes());
        let digest = hasher.finalize();
        for byte in &digest[..8] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

/// All certificates belonging to one person, in insertion order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateGroup {
    pub id: GroupId,
    records: Vec<CertificateRecord>,
    favorite_record_id: CertificateRecordId,
}

impl CertificateGroup {
    /// A group only ever exists around at least one record.
    pub fn new(id: GroupId, record: CertificateRecord) -> Self {
        let favorite_record_id = record.id;
        Self {
            id,
            records: vec![record],
            favorite_record_id,
        }
    }

    pub fn records(&self) -> &[CertificateRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get_record(&self, record_id: &CertificateRecordId) -> Option<&CertificateRecord> {
        self.records.iter().find(|record| record.id == *record_id)
    }

    pub fn get_record_mut(
        &mut self,
        record_id: &CertificateRecordId,
    ) -> Option<&mut CertificateRecord> {
        self.records
            .iter_mut()
            .find(|record| record.id == *record_id)
    }

    /// The record representing this group in collapsed views.
    pub fn favorite(&self) -> &CertificateRecord {
        self.records
            .iter()
            .find(|record| record.id == self.favorite_record_id)
            .unwrap_or(&self.records[0])
    }

    pub fn favorite_record_id(&self) -> CertificateRecordId {
        self.favorite_record_id
    }

    /// Returns false if the record is not a member of this group.
    pub fn set_favorite(&mut self, record_id: CertificateRecordId) -> bool {
        if self.records.iter().any(|record| record.id == record_id) {
            self.favorite_record_id = record_id;
            true
        } else {
            false
        }
    }

    pub(crate) fn push_record(&mut self, record: CertificateRecord) {
        self.records.push(record);
    }

    /// Removes the record and repairs the favorite pointer. Returns whether
    /// the record was present.
    pub(crate) fn remove_record(&mut self, record_id: &CertificateRecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != *record_id);
        let removed = self.records.len() != before;

        if removed && self.favorite_record_id == *record_id {
            if let Some(first) = self.records.first() {
                self.favorite_record_id = first.id;
            }
        }
        removed
    }
}
