use super::{
    budget::{Budget, BudgetTransaction},
    category::Category,
    friend::{Friend, FriendTransaction},
    split::{SplitExpense, SplitGroup},
    transaction::Transaction,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

pub const EXPORT_VERSION: &str = "1.0.0";

/// Backup document exchanged with the settings/IO layer.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub budget_transactions: Vec<BudgetTransaction>,
    pub split_groups: Vec<SplitGroup>,
    pub split_expenses: Vec<SplitExpense>,
    pub friends: Vec<Friend>,
    pub friend_transactions: Vec<FriendTransaction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_categories: Vec<Category>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

#[derive(Clone, Debug, Default, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Records kept per document array.
    pub kept: BTreeMap<String, usize>,
    /// Records dropped per document array.
    pub dropped: BTreeMap<String, usize>,
    pub applied: bool,
}

impl ImportReport {
    pub fn total_kept(&self) -> usize {
        self.kept.values().sum()
    }

    pub fn total_dropped(&self) -> usize {
        self.dropped.values().sum()
    }
}
