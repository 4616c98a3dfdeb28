use super::{create_test_service, date, rupees};
use crate::core::errors::RupeeError;
use crate::core::models::friend::{EntryType, NewFriend, NewFriendEntry};
use crate::core::models::split::{NewSplitExpense, NewSplitGroup};
use crate::core::money::Money;
use crate::core::services::RupeeService;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use serde_json::{Value, json};

async fn seeded_export() -> Value {
    let service = create_test_service();
    let alice = service
        .add_friend(NewFriend {
            name: "Alice".to_string(),
            phone: Some("+91 98765 43210".to_string()),
            avatar: None,
        })
        .await
        .unwrap();
    service
        .add_friend_entry(NewFriendEntry {
            friend_id: alice.id.clone(),
            entry_type: EntryType::Lent,
            amount: rupees(750),
            date: date(4),
            description: Some("Concert tickets".to_string()),
        })
        .await
        .unwrap();
    let trip = service
        .create_split_group(NewSplitGroup {
            name: "Goa".to_string(),
            description: None,
            members: vec!["A".to_string(), "B".to_string()],
        })
        .await
        .unwrap();
    service
        .add_split_expense(NewSplitExpense {
            split_group_id: trip.id.clone(),
            description: "Villa".to_string(),
            amount: rupees(9_000),
            paid_by: "A".to_string(),
            split_among: vec!["A".to_string(), "B".to_string()],
            date: date(10),
        })
        .await
        .unwrap();
    serde_json::to_value(service.export_snapshot().await).unwrap()
}

#[tokio::test]
async fn test_export_then_import_restores_everything() {
    let _ = env_logger::try_init();
    let document = seeded_export().await;
    assert_eq!(document["version"], "1.0.0");

    let service = create_test_service();
    let report = service.import_snapshot(&document.to_string(), false).await.unwrap();
    assert!(report.applied);
    assert_eq!(report.total_dropped(), 0);

    let friends = service.get_friends().await;
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].total_balance, rupees(750));
    let group_id = service.get_split_groups().await[0].id.clone();
    assert_eq!(service.get_net_positions(&group_id).await.unwrap().get("B"), Some(rupees(-4_500)));
}

#[tokio::test]
async fn test_import_ignores_stale_cached_totals() {
    let _ = env_logger::try_init();
    let mut document = seeded_export().await;
    document["friends"][0]["totalBalance"] = json!(123456.78);
    document["splitGroups"][0]["totalAmount"] = json!(1);

    let service = create_test_service();
    service.import_snapshot(&document.to_string(), false).await.unwrap();
    assert_eq!(service.get_friends().await[0].total_balance, rupees(750));
    assert_eq!(service.get_split_groups().await[0].total_amount, rupees(9_000));
}

#[tokio::test]
async fn test_partial_import_requires_confirmation() {
    let _ = env_logger::try_init();
    let mut document = seeded_export().await;
    document["friendTransactions"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "id": "broken", "friendId": "nobody", "amount": "lots" }));

    let service = create_test_service();
    let refused = service.import_snapshot(&document.to_string(), false).await;
    assert_eq!(
        refused,
        Err(RupeeError::MalformedImport {
            reason: "some records failed validation".to_string(),
            valid: 4,
            dropped: 1,
        })
    );
    assert!(service.get_friends().await.is_empty());

    let report = service.import_snapshot(&document.to_string(), true).await.unwrap();
    assert!(report.applied);
    assert_eq!(report.dropped["friendTransactions"], 1);
    assert_eq!(service.get_all_friend_entries().await.len(), 1);
}

#[tokio::test]
async fn test_import_rejects_documents_missing_arrays() {
    let _ = env_logger::try_init();
    let service = create_test_service();
    let result = service
        .import_snapshot(r#"{"transactions": [], "version": "1.0.0"}"#, true)
        .await;
    assert!(matches!(result, Err(RupeeError::MalformedImport { .. })));
}

#[tokio::test]
async fn test_clear_all_and_reload_from_storage() {
    let _ = env_logger::try_init();
    let storage = InMemoryStorage::new();
    let service = RupeeService::new(storage.clone(), InMemoryLogging::new());
    let document = seeded_export().await;
    service.import_snapshot(&document.to_string(), false).await.unwrap();

    let reloaded = RupeeService::load(storage.clone(), InMemoryLogging::new()).await.unwrap();
    assert_eq!(reloaded.get_friends().await[0].total_balance, rupees(750));

    service.clear_all().await.unwrap();
    assert!(service.get_friends().await.is_empty());
    let empty = RupeeService::load(storage, InMemoryLogging::new()).await.unwrap();
    assert!(empty.get_split_groups().await.is_empty());
    assert_eq!(empty.get_summary().await.balance, Money::ZERO);
}
