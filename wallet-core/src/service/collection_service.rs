//! The single writer over the holder's certificate collection.
//!
//! Every mutation goes through [`CollectionService::transaction`]-style
//! commits: the current collection is cloned, the mutation is applied to the
//! clone, and only a fully successful result replaces the canonical state
//! and reaches observers. A failed mutation leaves state and observers
//! exactly as they were.

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::{watch, Mutex};

use wallet_providers::certificate_decoder::CertificateDecoder;
use wallet_providers::certificate_status::{
    self,
    model::{NotificationKind, ReissueState, ReissueType, ValidityStatus},
};
use wallet_providers::common_models::{
    certificate::Certificate,
    collection::{CertificateCollection, CollectionError},
    group::GroupId,
    record::{CertificateRecord, CertificateRecordId},
};
use wallet_providers::wallet_storage::WalletStorage;

use crate::config::CollectionConfig;
use crate::model::RemovalPolicy;
use crate::service::error::CollectionServiceError;

pub struct CollectionService {
    decoder: Arc<dyn CertificateDecoder>,
    storage: Arc<dyn WalletStorage>,
    config: CollectionConfig,
    state: Mutex<CertificateCollection>,
    publisher: watch::Sender<CertificateCollection>,
}

impl CollectionService {
    /// Restores the collection from storage; an empty wallet on first run.
    pub async fn new(
        decoder: Arc<dyn CertificateDecoder>,
        storage: Arc<dyn WalletStorage>,
        config: CollectionConfig,
    ) -> Result<Self, CollectionServiceError> {
        let collection = storage.load().await?.unwrap_or_default();
        let (publisher, _) = watch::channel(collection.clone());

        Ok(Self {
            decoder,
            storage,
            config,
            state: Mutex::new(collection),
            publisher,
        })
    }

    /// Decodes a scanned payload and adds it to the collection.
    pub async fn scan_certificate(
        &self,
        raw_payload: &str,
    ) -> Result<GroupId, CollectionServiceError> {
        let certificate = self.decoder.decode(raw_payload)?;
        self.add_certificate(raw_payload, certificate).await
    }

    /// Adds an already decoded certificate. The record starts with every
    /// notification flag unacknowledged and no reissue in progress; it joins
    /// the group of the person it was issued to, or opens a new one.
    ///
    /// Fails with [`CollectionError::DuplicateCertificate`] when the exact
    /// payload is already stored.
    pub async fn add_certificate(
        &self,
        raw_payload: &str,
        certificate: Certificate,
    ) -> Result<GroupId, CollectionServiceError> {
        let record = CertificateRecord::new(
            certificate,
            raw_payload.to_owned(),
            OffsetDateTime::now_utc(),
        );
        let record_id = record.id;

        let group_id = self
            .commit(move |collection| collection.add_record(record).map_err(Into::into))
            .await?;

        tracing::debug!(record = %record_id, group = %group_id, "certificate added");
        Ok(group_id)
    }

    /// Applies an atomic mutation to the whole collection. Observers see
    /// either the previous snapshot or the fully mutated one, never an
    /// intermediate state; an `Err` from the mutator discards every change
    /// it made.
    pub async fn transaction<F>(&self, mutator: F) -> Result<(), CollectionServiceError>
    where
        F: FnOnce(&mut CertificateCollection) -> Result<(), CollectionServiceError>,
    {
        self.commit(mutator).await
    }

    /// Removes one record; the group disappears with its last record.
    /// Under [`RemovalPolicy::Lenient`] a missing target is a silent no-op
    /// and nothing is published.
    pub async fn remove_certificate(
        &self,
        group_id: &GroupId,
        record_id: &CertificateRecordId,
    ) -> Result<(), CollectionServiceError> {
        let result = self
            .commit(|collection| {
                collection
                    .remove_record(group_id, record_id)
                    .map_err(Into::into)
            })
            .await;

        match (result, self.config.removal_policy) {
            (
                Err(CollectionServiceError::Collection(
                    CollectionError::RecordNotFound(_) | CollectionError::GroupNotFound(_),
                )),
                RemovalPolicy::Lenient,
            ) => Ok(()),
            (other, _) => other,
        }
    }

    /// Acknowledges a notification for a record. Idempotent; a seen flag
    /// never reverts.
    pub async fn mark_seen(
        &self,
        record_id: &CertificateRecordId,
        kind: NotificationKind,
    ) -> Result<(), CollectionServiceError> {
        self.commit(|collection| {
            let record = collection
                .get_record_mut(record_id)
                .ok_or(CollectionError::RecordNotFound(*record_id))?;
            record.mark_seen(kind);
            Ok(())
        })
        .await
    }

    /// Applies an authority revocation decision to a record.
    pub async fn set_revocation_status(
        &self,
        record_id: &CertificateRecordId,
        is_revoked: bool,
    ) -> Result<(), CollectionServiceError> {
        self.commit(|collection| {
            let record = collection
                .get_record_mut(record_id)
                .ok_or(CollectionError::RecordNotFound(*record_id))?;
            record.is_revoked = is_revoked;
            Ok(())
        })
        .await
    }

    pub async fn set_reissue_state(
        &self,
        record_id: &CertificateRecordId,
        state: ReissueState,
        reissue_type: ReissueType,
    ) -> Result<(), CollectionServiceError> {
        self.commit(|collection| {
            let record = collection
                .get_record_mut(record_id)
                .ok_or(CollectionError::RecordNotFound(*record_id))?;
            record.reissue_state = state;
            record.reissue_type = reissue_type;
            Ok(())
        })
        .await
    }

    /// Records booster rule matches. Already known rule ids are kept, so a
    /// rule triggers at most one notification over the record's lifetime.
    pub async fn add_booster_rule_ids(
        &self,
        record_id: &CertificateRecordId,
        rule_ids: Vec<String>,
    ) -> Result<(), CollectionServiceError> {
        self.commit(|collection| {
            let record = collection
                .get_record_mut(record_id)
                .ok_or(CollectionError::RecordNotFound(*record_id))?;
            record.booster_rule_ids.extend(rule_ids);
            Ok(())
        })
        .await
    }

    /// Chooses which record represents its group in collapsed views.
    pub async fn set_favorite(
        &self,
        group_id: &GroupId,
        record_id: &CertificateRecordId,
    ) -> Result<(), CollectionServiceError> {
        self.commit(|collection| {
            let group = collection
                .get_group_mut(group_id)
                .ok_or_else(|| CollectionError::GroupNotFound(group_id.clone()))?;
            if !group.set_favorite(*record_id) {
                return Err(CollectionError::RecordNotFound(*record_id).into());
            }
            Ok(())
        })
        .await
    }

    /// Records that are valid right now and not revoked, re-classified at
    /// call time.
    pub fn get_valid_certificates(&self) -> Vec<CertificateRecord> {
        let now = OffsetDateTime::now_utc();
        self.publisher
            .borrow()
            .records()
            .filter(|record| {
                !record.is_revoked
                    && certificate_status::classify(
                        &record.certificate,
                        now,
                        self.config.expiry_window,
                    ) == ValidityStatus::Valid
            })
            .cloned()
            .collect()
    }

    pub fn validity_status(
        &self,
        record_id: &CertificateRecordId,
    ) -> Result<ValidityStatus, CollectionServiceError> {
        let collection = self.publisher.borrow();
        let record = collection
            .get_record(record_id)
            .ok_or(CollectionError::RecordNotFound(*record_id))?;

        Ok(certificate_status::classify(
            &record.certificate,
            OffsetDateTime::now_utc(),
            self.config.expiry_window,
        ))
    }

    /// The notification kinds a record currently owes the user.
    pub fn pending_notifications(
        &self,
        record_id: &CertificateRecordId,
    ) -> Result<Vec<NotificationKind>, CollectionServiceError> {
        let collection = self.publisher.borrow();
        let record = collection
            .get_record(record_id)
            .ok_or(CollectionError::RecordNotFound(*record_id))?;

        Ok(certificate_status::pending_notifications(
            record,
            OffsetDateTime::now_utc(),
            self.config.expiry_window,
        ))
    }

    /// Every committed snapshot is delivered to subscribers.
    pub fn subscribe(&self) -> watch::Receiver<CertificateCollection> {
        self.publisher.subscribe()
    }

    /// The latest committed snapshot.
    pub fn collection(&self) -> CertificateCollection {
        self.publisher.borrow().clone()
    }

    /// Clone-apply-swap commit. The canonical state only advances when the
    /// mutation succeeds; observers are notified before persistence so a
    /// slow or failing storage backend cannot hold back reads.
    async fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut CertificateCollection) -> Result<T, CollectionServiceError>,
    ) -> Result<T, CollectionServiceError> {
        let mut state = self.state.lock().await;

        let mut draft = state.clone();
        let value = mutate(&mut draft)?;

        *state = draft.clone();
        self.publisher.send_replace(draft);

        if let Err(error) = self.storage.save(&state).await {
            tracing::warn!(%error, "persisting certificate collection failed");
            return Err(error.into());
        }

        Ok(value)
    }
}
