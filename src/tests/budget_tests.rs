use super::{FailingKeyStorage, create_test_service, date, rupees};
use crate::constants::TRANSACTIONS_KEY;
use crate::core::errors::RupeeError;
use crate::core::models::budget::{NewBudget, NewBudgetTransaction};
use crate::core::models::transaction::{NewTransaction, TransactionType};
use crate::core::money::Money;
use crate::core::services::RupeeService;
use crate::infrastructure::logging::in_memory::InMemoryLogging;

fn budget(target: Money) -> NewBudget {
    NewBudget {
        name: "Groceries June".to_string(),
        description: Some("Monthly cap".to_string()),
        target_amount: target,
        category: "Groceries".to_string(),
        start_date: date(1),
        end_date: date(30),
    }
}

fn transaction(kind: TransactionType, amount: Money, category: &str) -> NewTransaction {
    NewTransaction {
        transaction_type: kind,
        amount,
        category: category.to_string(),
        note: None,
        date: date(5),
    }
}

#[tokio::test]
async fn test_budget_spending_is_mirrored_as_expense() {
    let _ = env_logger::try_init();
    let service = create_test_service();
    let groceries = service.add_budget(budget(rupees(5_000))).await.unwrap();

    service
        .add_budget_transaction(NewBudgetTransaction {
            budget_id: groceries.id.clone(),
            amount: rupees(1_250),
            description: "Big basket".to_string(),
            date: date(3),
        })
        .await
        .unwrap();

    let progress = service.get_budget_progress(&groceries.id).await.unwrap();
    assert_eq!(progress.spent, rupees(1_250));
    assert_eq!(progress.remaining, rupees(3_750));
    assert_eq!(progress.percent_used, 25.0);

    let transactions = service.get_transactions().await;
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].transaction_type, TransactionType::Expense);
    assert_eq!(transactions[0].category, "Groceries");
    assert_eq!(
        transactions[0].note.as_deref(),
        Some("Budget: Groceries June - Big basket")
    );
}

#[tokio::test]
async fn test_budget_transaction_for_missing_budget_changes_nothing() {
    let _ = env_logger::try_init();
    let service = create_test_service();
    let result = service
        .add_budget_transaction(NewBudgetTransaction {
            budget_id: "gone".to_string(),
            amount: rupees(10),
            description: "Milk".to_string(),
            date: date(3),
        })
        .await;

    assert_eq!(result, Err(RupeeError::BudgetNotFound("gone".to_string())));
    assert!(service.get_transactions().await.is_empty());
}

#[tokio::test]
async fn test_summary_reports_savings_rate_and_breakdown() {
    let _ = env_logger::try_init();
    let service = create_test_service();
    service
        .add_transaction(transaction(TransactionType::Income, rupees(40_000), "Salary"))
        .await
        .unwrap();
    service
        .add_transaction(transaction(TransactionType::Expense, rupees(6_000), "Groceries"))
        .await
        .unwrap();
    service
        .add_transaction(transaction(TransactionType::Expense, rupees(14_000), "Bills & Utilities"))
        .await
        .unwrap();

    let summary = service.get_summary().await;
    assert_eq!(summary.balance, rupees(20_000));
    assert_eq!(summary.savings_rate, 50.0);
    assert_eq!(summary.expense_breakdown[0].category, "Bills & Utilities");
    assert_eq!(summary.expense_breakdown[0].percent, 70.0);

    let totals = service.get_category_totals(Some(TransactionType::Expense)).await;
    assert_eq!(totals.len(), 2);
    assert_eq!(service.search_transactions("salary").await.len(), 1);
    assert_eq!(service.filter_transactions_by_date(Some(date(6)), None).await.len(), 0);
}

#[tokio::test]
async fn test_default_categories_cannot_be_removed() {
    let _ = env_logger::try_init();
    let service = create_test_service();
    assert!(matches!(
        service.delete_category("9").await,
        Err(RupeeError::Validation(..))
    ));
    assert_eq!(service.get_categories(Some(TransactionType::Income)).await.len(), 6);
    assert_eq!(service.get_categories(None).await.len(), 16);
}

#[tokio::test]
async fn test_budget_spending_is_not_stored_without_its_expense() {
    let _ = env_logger::try_init();
    let storage = FailingKeyStorage::default();
    let service = RupeeService::new(storage.clone(), InMemoryLogging::new());
    let groceries = service.add_budget(budget(rupees(5_000))).await.unwrap();

    storage.fail_writes_to(TRANSACTIONS_KEY);
    let result = service
        .add_budget_transaction(NewBudgetTransaction {
            budget_id: groceries.id.clone(),
            amount: rupees(400),
            description: "Vegetables".to_string(),
            date: date(8),
        })
        .await;
    assert!(matches!(result, Err(RupeeError::StorageError(_))));
    assert!(service.get_budget_transactions(&groceries.id).await.unwrap().is_empty());
    assert!(service.get_transactions().await.is_empty());

    let reloaded = RupeeService::load(storage.inner.clone(), InMemoryLogging::new()).await.unwrap();
    assert_eq!(reloaded.get_budget(&groceries.id).await.unwrap().spent_amount, Money::ZERO);
    assert!(reloaded.get_budget_transactions(&groceries.id).await.unwrap().is_empty());
    assert!(reloaded.get_transactions().await.is_empty());
}
