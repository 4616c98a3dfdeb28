//! Validation of backup documents. Each record is decoded and checked against the same
//! invariants the aggregates enforce on insert, so a single bad entry is dropped and
//! counted rather than failing the whole document.

use crate::core::budgets::{BudgetBook, check_budget, check_transaction};
use crate::core::errors::RupeeError;
use crate::core::expenses::ExpenseBook;
use crate::core::ledger::{FriendLedger, check_entry};
use crate::core::models::budget::{Budget, BudgetTransaction};
use crate::core::models::friend::{Friend, FriendTransaction};
use crate::core::models::split::{SplitExpense, SplitGroup};
use crate::core::models::snapshot::{EXPORT_VERSION, ImportReport};
use crate::core::models::transaction::Transaction;
use crate::core::settlement::{SplitBook, check_expense, check_group};
use crate::core::validation::validate_amount_input;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

const REQUIRED_ARRAYS: [&str; 7] = [
    "transactions",
    "budgets",
    "budgetTransactions",
    "splitGroups",
    "splitExpenses",
    "friends",
    "friendTransactions",
];

/// Everything a valid document decodes into, with caches already recomputed.
#[derive(Clone, Debug, Default)]
pub struct ImportedData {
    pub expenses: ExpenseBook,
    pub budgets: BudgetBook,
    pub splits: SplitBook,
    pub ledger: FriendLedger,
}

fn malformed(reason: impl Into<String>) -> RupeeError {
    RupeeError::MalformedImport {
        reason: reason.into(),
        valid: 0,
        dropped: 0,
    }
}

fn has_id(record: &Value) -> bool {
    record
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.trim().is_empty())
}

/// Decodes one array, keeping records that carry an id and match the record type.
fn decode_array<T: DeserializeOwned>(
    document: &Map<String, Value>,
    key: &str,
    report: &mut ImportReport,
) -> Result<Vec<T>, RupeeError> {
    let records = match document.get(key) {
        Some(Value::Array(records)) => records,
        Some(Value::Null) | None if key == "customCategories" => {
            report.kept.insert(key.to_string(), 0);
            return Ok(Vec::new());
        }
        _ => return Err(malformed(format!("`{}` must be an array", key))),
    };

    let mut kept = Vec::with_capacity(records.len());
    let mut dropped = 0;
    for (index, record) in records.iter().enumerate() {
        if !has_id(record) {
            debug!("{}[{}] has no id", key, index);
            dropped += 1;
            continue;
        }
        match serde_json::from_value::<T>(record.clone()) {
            Ok(value) => kept.push(value),
            Err(err) => {
                debug!("{}[{}] rejected: {}", key, index, err);
                dropped += 1;
            }
        }
    }
    report.kept.insert(key.to_string(), kept.len());
    report.dropped.insert(key.to_string(), dropped);
    Ok(kept)
}

/// Drops records that break an invariant or whose parent did not survive, moving their
/// count from kept to dropped.
fn drop_failing<T>(
    records: &mut Vec<T>,
    key: &str,
    report: &mut ImportReport,
    check: impl Fn(&T) -> Result<(), RupeeError>,
) {
    let before = records.len();
    records.retain(|record| match check(record) {
        Ok(()) => true,
        Err(err) => {
            debug!("{} record rejected: {}", key, err);
            false
        }
    });
    let failed = before - records.len();
    if failed > 0 {
        warn!("Dropping {} {} that failed validation", failed, key);
        *report.kept.entry(key.to_string()).or_default() -= failed;
        *report.dropped.entry(key.to_string()).or_default() += failed;
    }
}

/// Parses and validates a backup. Structural problems (bad JSON, a missing array) fail
/// outright; individual bad records are dropped and counted in the report.
pub fn parse_document(raw: &str) -> Result<(ImportedData, ImportReport), RupeeError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;
    let Value::Object(document) = value else {
        return Err(malformed("document must be a JSON object"));
    };
    if let Some(missing) = REQUIRED_ARRAYS.iter().find(|key| !document.contains_key(**key)) {
        return Err(malformed(format!("missing required array `{}`", missing)));
    }
    match document.get("version").and_then(Value::as_str) {
        Some(EXPORT_VERSION) => {}
        Some(other) => warn!("Importing document version {} (expected {})", other, EXPORT_VERSION),
        None => warn!("Importing document without a version"),
    }

    let mut report = ImportReport::default();
    let mut transactions: Vec<Transaction> = decode_array(&document, "transactions", &mut report)?;
    let mut budgets: Vec<Budget> = decode_array(&document, "budgets", &mut report)?;
    let mut budget_transactions: Vec<BudgetTransaction> =
        decode_array(&document, "budgetTransactions", &mut report)?;
    let mut groups: Vec<SplitGroup> = decode_array(&document, "splitGroups", &mut report)?;
    let mut split_expenses: Vec<SplitExpense> =
        decode_array(&document, "splitExpenses", &mut report)?;
    let friends: Vec<Friend> = decode_array(&document, "friends", &mut report)?;
    let mut friend_transactions: Vec<FriendTransaction> =
        decode_array(&document, "friendTransactions", &mut report)?;
    let custom_categories = decode_array(&document, "customCategories", &mut report)?;

    drop_failing(&mut transactions, "transactions", &mut report, |t| {
        validate_amount_input("amount", t.amount)
    });
    drop_failing(&mut budgets, "budgets", &mut report, check_budget);
    drop_failing(&mut groups, "splitGroups", &mut report, check_group);

    drop_failing(&mut budget_transactions, "budgetTransactions", &mut report, |t| {
        budgets
            .iter()
            .find(|b| b.id == t.budget_id)
            .ok_or_else(|| RupeeError::BudgetNotFound(t.budget_id.clone()))?;
        check_transaction(t)
    });
    drop_failing(&mut split_expenses, "splitExpenses", &mut report, |e| {
        let group = groups
            .iter()
            .find(|g| g.id == e.split_group_id)
            .ok_or_else(|| RupeeError::GroupNotFound(e.split_group_id.clone()))?;
        check_expense(group, e)
    });
    drop_failing(&mut friend_transactions, "friendTransactions", &mut report, |t| {
        friends
            .iter()
            .find(|f| f.id == t.friend_id)
            .ok_or_else(|| RupeeError::FriendNotFound(t.friend_id.clone()))?;
        check_entry(t)
    });

    let data = ImportedData {
        expenses: ExpenseBook::from_parts(transactions, custom_categories),
        budgets: BudgetBook::from_parts(budgets, budget_transactions),
        splits: SplitBook::from_parts(groups, split_expenses),
        ledger: FriendLedger::from_parts(friends, friend_transactions),
    };
    Ok((data, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::money::Money;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "transactions": [
                {"id": "t1", "type": "expense", "amount": 120.5, "category": "Food",
                 "date": "2024-02-01", "createdAt": "2024-02-01T10:00:00Z"}
            ],
            "budgets": [],
            "budgetTransactions": [],
            "splitGroups": [
                {"id": "g1", "name": "Flat", "members": ["a", "b"], "totalAmount": 999,
                 "createdAt": "2024-02-01T10:00:00Z"}
            ],
            "splitExpenses": [
                {"id": "e1", "splitGroupId": "g1", "description": "Rent", "amount": 200,
                 "paidBy": "a", "splitAmong": ["a", "b"], "date": "2024-02-01T00:00:00.000Z",
                 "createdAt": "2024-02-01T10:00:00Z"}
            ],
            "friends": [
                {"id": "f1", "name": "Alice", "totalBalance": 0, "createdAt": "2024-02-01T10:00:00Z"}
            ],
            "friendTransactions": [
                {"id": "ft1", "friendId": "f1", "type": "lent", "amount": 500,
                 "date": "2024-02-01", "createdAt": "2024-02-01T10:00:00Z"},
                {"id": "ft2", "friendId": "f1", "type": "borrowed", "amount": 200,
                 "date": "2024-02-02", "createdAt": "2024-02-02T10:00:00Z"}
            ],
            "exportDate": "2024-02-03T10:00:00Z",
            "version": "1.0.0"
        })
    }

    #[test]
    fn valid_document_recomputes_caches() {
        let (data, report) = parse_document(&document().to_string()).unwrap();
        assert_eq!(report.total_dropped(), 0);
        assert_eq!(report.total_kept(), 6);
        assert_eq!(data.ledger.friend("f1").unwrap().total_balance, Money::from_minor(30_000));
        assert_eq!(data.splits.group("g1").unwrap().total_amount, Money::from_minor(20_000));
        assert_eq!(data.expenses.total_expense(), Money::from_minor(12_050));
    }

    #[test]
    fn bad_records_and_orphans_are_counted() {
        let mut doc = document();
        doc["friendTransactions"]
            .as_array_mut()
            .unwrap()
            .push(json!({"id": "ft3", "friendId": "ghost", "type": "lent", "amount": 10,
                         "date": "2024-02-01", "createdAt": "2024-02-01T10:00:00Z"}));
        doc["transactions"]
            .as_array_mut()
            .unwrap()
            .push(json!({"type": "income", "amount": 10}));

        let (data, report) = parse_document(&doc.to_string()).unwrap();
        assert_eq!(report.dropped["friendTransactions"], 1);
        assert_eq!(report.kept["friendTransactions"], 2);
        assert_eq!(report.dropped["transactions"], 1);
        assert_eq!(data.ledger.entries().len(), 2);
    }

    #[test]
    fn records_breaking_invariants_are_dropped() {
        let mut doc = document();
        doc["friendTransactions"][0]["amount"] = json!(-500);
        let expenses = doc["splitExpenses"].as_array_mut().unwrap();
        expenses.push(json!({"id": "e2", "splitGroupId": "g1", "description": "Ghost", "amount": 50,
                             "paidBy": "zed", "splitAmong": [], "date": "2024-02-01",
                             "createdAt": "2024-02-01T10:00:00Z"}));
        expenses.push(json!({"id": "e3", "splitGroupId": "g1", "description": "Refund", "amount": -50,
                             "paidBy": "b", "splitAmong": ["a"], "date": "2024-02-01",
                             "createdAt": "2024-02-01T10:00:00Z"}));
        doc["splitGroups"].as_array_mut().unwrap().push(
            json!({"id": "g2", "name": "Twins", "members": ["a", "a"], "createdAt": "2024-02-01T10:00:00Z"}),
        );
        doc["budgets"].as_array_mut().unwrap().push(
            json!({"id": "b1", "name": "Trip", "targetAmount": 100, "category": "Travel",
                   "startDate": "2024-03-10", "endDate": "2024-03-01", "createdAt": "2024-02-01T10:00:00Z"}),
        );

        let (data, report) = parse_document(&doc.to_string()).unwrap();
        assert_eq!(report.dropped["friendTransactions"], 1);
        assert_eq!(report.dropped["splitExpenses"], 2);
        assert_eq!(report.kept["splitExpenses"], 1);
        assert_eq!(report.dropped["splitGroups"], 1);
        assert_eq!(report.dropped["budgets"], 1);

        assert_eq!(data.ledger.friend("f1").unwrap().total_balance, Money::from_minor(-20_000));
        assert_eq!(data.splits.group("g1").unwrap().total_amount, Money::from_minor(20_000));
        assert!(data.splits.group("g2").is_err());
        let plan = data.splits.settle("g1").unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].from_friend, "b");
        assert_eq!(plan[0].amount, Money::from_minor(10_000));
    }

    #[test]
    fn structural_problems_fail() {
        assert!(matches!(parse_document("not json"), Err(RupeeError::MalformedImport { .. })));
        assert!(matches!(parse_document("[]"), Err(RupeeError::MalformedImport { .. })));

        let mut doc = document();
        doc.as_object_mut().unwrap().remove("friends");
        let err = parse_document(&doc.to_string()).unwrap_err();
        assert!(err.to_string().contains("friends"));
    }
}
