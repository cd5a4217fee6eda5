use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common_models::{
    group::{CertificateGroup, GroupId},
    record::{CertificateRecord, CertificateRecordId},
};

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CollectionError {
    #[error("An identical certificate payload is already stored")]
    DuplicateCertificate,
    #[error("Record not found: `{0}`")]
    RecordNotFound(CertificateRecordId),
    #[error("Group not found: `{0}`")]
    GroupNotFound(GroupId),
}

/// The full set of certificate groups held by the wallet, in first-added
/// order. This is the root persisted state; all mutation goes through the
/// methods here so the invariants (unique group ids, no empty groups, no
/// duplicate payloads) hold at every return.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateCollection {
    groups: Vec<CertificateGroup>,
}

impl CertificateCollection {
    pub fn groups(&self) -> &[CertificateGroup] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|group| group.records().len()).sum()
    }

    pub fn records(&self) -> impl Iterator<Item = &CertificateRecord> {
        self.groups.iter().flat_map(|group| group.records().iter())
    }

    pub fn get_group(&self, group_id: &GroupId) -> Option<&CertificateGroup> {
        self.groups.iter().find(|group| group.id == *group_id)
    }

    pub fn get_group_mut(&mut self, group_id: &GroupId) -> Option<&mut CertificateGroup> {
        self.groups.iter_mut().find(|group| group.id == *group_id)
    }

    pub fn get_record(&self, record_id: &CertificateRecordId) -> Option<&CertificateRecord> {
        self.groups
            .iter()
            .find_map(|group| group.get_record(record_id))
    }

    pub fn get_record_mut(
        &mut self,
        record_id: &CertificateRecordId,
    ) -> Option<&mut CertificateRecord> {
        self.groups
            .iter_mut()
            .find_map(|group| group.get_record_mut(record_id))
    }

    pub fn contains_payload(&self, raw_payload: &str) -> bool {
        self.records()
            .any(|record| record.raw_payload == raw_payload)
    }

    /// Appends the record to the group matching the certificate's identity
    /// fields, creating the group if the person is new to the wallet.
    pub fn add_record(&mut self, record: CertificateRecord) -> Result<GroupId, CollectionError> {
        if self.contains_payload(&record.raw_payload) {
            return Err(CollectionError::DuplicateCertificate);
        }

        let group_id = record.certificate.group_id();
        match self.get_group_mut(&group_id) {
            Some(group) => group.push_record(record),
            None => self
                .groups
                .push(CertificateGroup::new(group_id.clone(), record)),
        }
        Ok(group_id)
    }

    /// Removes one record; the group disappears with its last record.
    pub fn remove_record(
        &mut self,
        group_id: &GroupId,
        record_id: &CertificateRecordId,
    ) -> Result<(), CollectionError> {
        let group = self
            .get_group_mut(group_id)
            .ok_or_else(|| CollectionError::GroupNotFound(group_id.clone()))?;

        if !group.remove_record(record_id) {
            return Err(CollectionError::RecordNotFound(*record_id));
        }

        self.groups.retain(|group| !group.is_empty());
        Ok(())
    }
}
