use std::sync::Arc;

use time::{Duration, OffsetDateTime};

use wallet_providers::certificate_decoder::{
    error::DecodeError, imp::json::JsonCertificateDecoder, MockCertificateDecoder,
};
use wallet_providers::certificate_status::model::{NotificationKind, ValidityStatus};
use wallet_providers::common_models::certificate::{
    Certificate, CertificateEntry, PersonName, VaccinationEntry,
};
use wallet_providers::common_models::collection::CollectionError;
use wallet_providers::common_models::record::CertificateRecordId;
use wallet_providers::wallet_storage::{
    in_memory::InMemoryWalletStorage, MockWalletStorage, WalletStorageError,
};

use crate::config::CollectionConfig;
use crate::model::RemovalPolicy;
use crate::service::collection_service::CollectionService;
use crate::service::error::CollectionServiceError;

fn certificate(family_name: &str, entry_id: &str, expires_at: OffsetDateTime) -> Certificate {
    Certificate {
        name: PersonName {
            given_name: Some("Erika".to_string()),
            family_name: Some(family_name.to_string()),
            standardized_given_name: Some("ERIKA".to_string()),
            standardized_family_name: family_name.to_uppercase(),
        },
        date_of_birth: "1964-08-12".to_string(),
        entries: vec![CertificateEntry::Vaccination(VaccinationEntry {
            id: entry_id.to_string(),
            vaccine_product: "EU/1/20/1528".to_string(),
            dose_number: 2,
            total_series_of_doses: 2,
            occurrence_date: "2021-06-01".to_string(),
        })],
        issuer_country: "DE".to_string(),
        issued_at: expires_at - Duration::days(365),
        expires_at,
    }
}

async fn service_with_config(config: CollectionConfig) -> CollectionService {
    CollectionService::new(
        Arc::new(JsonCertificateDecoder),
        Arc::new(InMemoryWalletStorage::default()),
        config,
    )
    .await
    .unwrap()
}

async fn service() -> CollectionService {
    service_with_config(CollectionConfig::default()).await
}

fn far_future() -> OffsetDateTime {
    OffsetDateTime::now_utc() + Duration::days(400)
}

#[tokio::test]
async fn test_add_certificate_rejects_duplicate_payload() {
    let service = service().await;
    let certificate = certificate("Mustermann", "URN:UVCI:01:DE:1", far_future());

    service
        .add_certificate("payload-1", certificate.clone())
        .await
        .unwrap();
    let result = service.add_certificate("payload-1", certificate).await;

    assert!(matches!(
        result,
        Err(CollectionServiceError::Collection(
            CollectionError::DuplicateCertificate
        ))
    ));
    assert_eq!(service.collection().record_count(), 1);
}

#[tokio::test]
async fn test_get_valid_certificates_excludes_expired_and_revoked() {
    let service = service().await;
    let now = OffsetDateTime::now_utc();

    let valid = certificate("Mustermann", "URN:UVCI:01:DE:1", far_future());
    service.add_certificate("payload-1", valid).await.unwrap();

    let expired = certificate("Musterfrau", "URN:UVCI:01:DE:2", now - Duration::days(1));
    service.add_certificate("payload-2", expired).await.unwrap();

    let revoked = certificate("Beispiel", "URN:UVCI:01:DE:3", far_future());
    let revoked_group = service.add_certificate("payload-3", revoked).await.unwrap();
    let revoked_id = service
        .collection()
        .get_group(&revoked_group)
        .unwrap()
        .favorite()
        .id;
    service
        .set_revocation_status(&revoked_id, true)
        .await
        .unwrap();

    let valid_records = service.get_valid_certificates();

    assert_eq!(valid_records.len(), 1);
    assert_eq!(valid_records[0].raw_payload, "payload-1");
}

#[tokio::test]
async fn test_validity_status_classification() {
    let service = service().await;
    let now = OffsetDateTime::now_utc();

    let expired_group = service
        .add_certificate(
            "payload-1",
            certificate("Mustermann", "URN:UVCI:01:DE:1", now - Duration::days(1)),
        )
        .await
        .unwrap();
    let expired_id = service
        .collection()
        .get_group(&expired_group)
        .unwrap()
        .favorite()
        .id;

    assert_eq!(
        service.validity_status(&expired_id).unwrap(),
        ValidityStatus::Expired
    );
}

#[tokio::test]
async fn test_mark_seen_is_idempotent() {
    let service = service().await;
    let now = OffsetDateTime::now_utc();

    let group_id = service
        .add_certificate(
            "payload-1",
            certificate("Mustermann", "URN:UVCI:01:DE:1", now - Duration::days(1)),
        )
        .await
        .unwrap();
    let record_id = service
        .collection()
        .get_group(&group_id)
        .unwrap()
        .favorite()
        .id;

    assert_eq!(
        service.pending_notifications(&record_id).unwrap(),
        vec![NotificationKind::Expiry]
    );

    service
        .mark_seen(&record_id, NotificationKind::Expiry)
        .await
        .unwrap();
    let after_first = service.collection();

    service
        .mark_seen(&record_id, NotificationKind::Expiry)
        .await
        .unwrap();
    let after_second = service.collection();

    assert_eq!(after_first, after_second);
    assert!(service.pending_notifications(&record_id).unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_last_record_removes_group() {
    let service = service().await;

    let group_id = service
        .add_certificate(
            "payload-1",
            certificate("Mustermann", "URN:UVCI:01:DE:1", far_future()),
        )
        .await
        .unwrap();
    let record_id = service
        .collection()
        .get_group(&group_id)
        .unwrap()
        .favorite()
        .id;
    assert_eq!(service.collection().group_count(), 1);

    service
        .remove_certificate(&group_id, &record_id)
        .await
        .unwrap();

    assert_eq!(service.collection().group_count(), 0);
}

#[tokio::test]
async fn test_remove_missing_record_lenient_is_noop() {
    let service = service().await;

    let group_id = service
        .add_certificate(
            "payload-1",
            certificate("Mustermann", "URN:UVCI:01:DE:1", far_future()),
        )
        .await
        .unwrap();

    let result = service
        .remove_certificate(&group_id, &CertificateRecordId::new())
        .await;

    assert!(result.is_ok());
    assert_eq!(service.collection().record_count(), 1);
}

#[tokio::test]
async fn test_remove_missing_record_strict_fails() {
    let service = service_with_config(CollectionConfig {
        removal_policy: RemovalPolicy::Strict,
        ..CollectionConfig::default()
    })
    .await;

    let group_id = service
        .add_certificate(
            "payload-1",
            certificate("Mustermann", "URN:UVCI:01:DE:1", far_future()),
        )
        .await
        .unwrap();

    let missing = CertificateRecordId::new();
    let result = service.remove_certificate(&group_id, &missing).await;

    assert!(matches!(
        result,
        Err(CollectionServiceError::Collection(
            CollectionError::RecordNotFound(id)
        )) if id == missing
    ));
}

#[tokio::test]
async fn test_failed_transaction_leaves_state_and_observers_untouched() {
    let service = service().await;

    let group_id = service
        .add_certificate(
            "payload-1",
            certificate("Mustermann", "URN:UVCI:01:DE:1", far_future()),
        )
        .await
        .unwrap();
    let record_id = service
        .collection()
        .get_group(&group_id)
        .unwrap()
        .favorite()
        .id;

    let mut receiver = service.subscribe();
    receiver.borrow_and_update();
    let before = service.collection();

    let result = service
        .transaction(|collection| {
            let record = collection
                .get_record_mut(&record_id)
                .ok_or(CollectionError::RecordNotFound(record_id))?;
            record.is_revoked = true;
            Err(CollectionServiceError::Collection(
                CollectionError::DuplicateCertificate,
            ))
        })
        .await;

    assert!(result.is_err());
    assert_eq!(service.collection(), before);
    assert!(!service.collection().get_record(&record_id).unwrap().is_revoked);
    assert!(!receiver.has_changed().unwrap());
}

#[tokio::test]
async fn test_bulk_transaction_commits_atomically() {
    let service = service().await;
    let now = OffsetDateTime::now_utc();

    for (index, payload) in ["payload-1", "payload-2"].iter().enumerate() {
        service
            .add_certificate(
                payload,
                certificate(
                    "Mustermann",
                    &format!("URN:UVCI:01:DE:{index}"),
                    now - Duration::days(1),
                ),
            )
            .await
            .unwrap();
    }

    // Mark every stored record as seen in one transaction.
    service
        .transaction(|collection| {
            let record_ids: Vec<_> = collection.records().map(|record| record.id).collect();
            for record_id in record_ids {
                if let Some(record) = collection.get_record_mut(&record_id) {
                    record.mark_seen(NotificationKind::Expiry);
                }
            }
            Ok(())
        })
        .await
        .unwrap();

    for record in service.collection().records() {
        assert!(record.has_seen(NotificationKind::Expiry));
    }
}

#[tokio::test]
async fn test_observer_receives_committed_snapshot() {
    let service = service().await;
    let mut receiver = service.subscribe();
    receiver.borrow_and_update();

    service
        .add_certificate(
            "payload-1",
            certificate("Mustermann", "URN:UVCI:01:DE:1", far_future()),
        )
        .await
        .unwrap();

    assert!(receiver.has_changed().unwrap());
    assert_eq!(receiver.borrow_and_update().record_count(), 1);
}

#[tokio::test]
async fn test_scan_failure_leaves_collection_unchanged() {
    let mut decoder = MockCertificateDecoder::default();
    decoder
        .expect_decode()
        .return_once(|_| Err(DecodeError::EmptyPayload));

    let service = CollectionService::new(
        Arc::new(decoder),
        Arc::new(InMemoryWalletStorage::default()),
        CollectionConfig::default(),
    )
    .await
    .unwrap();

    let result = service.scan_certificate("").await;

    assert!(matches!(result, Err(CollectionServiceError::Decode(_))));
    assert_eq!(service.collection().record_count(), 0);
}

#[tokio::test]
async fn test_persistence_failure_keeps_memory_state() {
    let mut storage = MockWalletStorage::default();
    storage.expect_load().return_once(|| Ok(None));
    storage
        .expect_save()
        .returning(|_| Err(WalletStorageError::Save("disk full".to_string())));

    let service = CollectionService::new(
        Arc::new(JsonCertificateDecoder),
        Arc::new(storage),
        CollectionConfig::default(),
    )
    .await
    .unwrap();

    let result = service
        .add_certificate(
            "payload-1",
            certificate("Mustermann", "URN:UVCI:01:DE:1", far_future()),
        )
        .await;

    assert!(matches!(
        result,
        Err(CollectionServiceError::Persistence(_))
    ));
    // The commit itself stands; retrying persistence is the caller's call.
    assert_eq!(service.collection().record_count(), 1);
}

#[tokio::test]
async fn test_new_restores_persisted_collection() {
    let storage = Arc::new(InMemoryWalletStorage::default());

    let first = CollectionService::new(
        Arc::new(JsonCertificateDecoder),
        storage.clone(),
        CollectionConfig::default(),
    )
    .await
    .unwrap();
    first
        .add_certificate(
            "payload-1",
            certificate("Mustermann", "URN:UVCI:01:DE:1", far_future()),
        )
        .await
        .unwrap();

    let reopened = CollectionService::new(
        Arc::new(JsonCertificateDecoder),
        storage,
        CollectionConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(reopened.collection(), first.collection());
}

#[tokio::test]
async fn test_set_favorite_requires_group_member() {
    let service = service().await;

    let group_id = service
        .add_certificate(
            "payload-1",
            certificate("Mustermann", "URN:UVCI:01:DE:1", far_future()),
        )
        .await
        .unwrap();
    service
        .add_certificate(
            "payload-2",
            certificate("Mustermann", "URN:UVCI:01:DE:2", far_future()),
        )
        .await
        .unwrap();

    let second_id = service
        .collection()
        .get_group(&group_id)
        .unwrap()
        .records()[1]
        .id;

    service.set_favorite(&group_id, &second_id).await.unwrap();
    assert_eq!(
        service
            .collection()
            .get_group(&group_id)
            .unwrap()
            .favorite_record_id(),
        second_id
    );

    let result = service
        .set_favorite(&group_id, &CertificateRecordId::new())
        .await;
    assert!(matches!(
        result,
        Err(CollectionServiceError::Collection(
            CollectionError::RecordNotFound(_)
        ))
    ));
}

#[tokio::test]
async fn test_booster_rule_ids_deduplicate() {
    let service = service().await;

    let group_id = service
        .add_certificate(
            "payload-1",
            certificate("Mustermann", "URN:UVCI:01:DE:1", far_future()),
        )
        .await
        .unwrap();
    let record_id = service
        .collection()
        .get_group(&group_id)
        .unwrap()
        .favorite()
        .id;

    service
        .add_booster_rule_ids(&record_id, vec!["BNR-DE-0200".to_string()])
        .await
        .unwrap();
    service
        .add_booster_rule_ids(
            &record_id,
            vec!["BNR-DE-0200".to_string(), "BNR-DE-0300".to_string()],
        )
        .await
        .unwrap();

    let record = service.collection().get_record(&record_id).unwrap().clone();
    assert_eq!(record.booster_rule_ids.len(), 2);
    assert_eq!(
        service.pending_notifications(&record_id).unwrap(),
        vec![NotificationKind::Booster, NotificationKind::BoosterDetail]
    );
}
