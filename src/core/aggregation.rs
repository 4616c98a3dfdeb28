//! Read-only folds over transaction lists: totals, category grouping, search, date ranges
//! and the dashboard summary.

use crate::core::models::transaction::{CategoryTotal, Transaction, TransactionType};
use crate::core::money::Money;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

pub fn total_of(transactions: &[Transaction], transaction_type: TransactionType) -> Money {
    transactions
        .iter()
        .filter(|t| t.transaction_type == transaction_type)
        .map(|t| t.amount)
        .sum()
}

/// Income minus expense.
pub fn balance(transactions: &[Transaction]) -> Money {
    total_of(transactions, TransactionType::Income) - total_of(transactions, TransactionType::Expense)
}

/// Totals and counts per category, optionally restricted to one transaction type.
pub fn category_totals(
    transactions: &[Transaction],
    only: Option<TransactionType>,
) -> BTreeMap<String, CategoryTotal> {
    let mut totals: BTreeMap<String, CategoryTotal> = BTreeMap::new();
    for transaction in transactions
        .iter()
        .filter(|t| only.is_none_or(|kind| t.transaction_type == kind))
    {
        let entry = totals.entry(transaction.category.clone()).or_default();
        entry.total += transaction.amount;
        entry.count += 1;
    }
    totals
}

/// Case-insensitive match on category and note, or a substring of the amount.
/// A blank query returns everything.
pub fn search(transactions: &[Transaction], query: &str) -> Vec<Transaction> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return transactions.to_vec();
    }
    transactions
        .iter()
        .filter(|t| {
            t.category.to_lowercase().contains(&query)
                || t.note.as_ref().is_some_and(|n| n.to_lowercase().contains(&query))
                || t.amount.to_string().contains(&query)
        })
        .cloned()
        .collect()
}

/// Inclusive on both ends; a missing bound is open.
pub fn filter_by_date(
    transactions: &[Transaction],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| start.is_none_or(|s| t.date >= s) && end.is_none_or(|e| t.date <= e))
        .cloned()
        .collect()
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: String,
    pub total: Money,
    pub count: usize,
    pub percent: f64,
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_income: Money,
    pub total_expense: Money,
    pub balance: Money,
    /// `(income − expense) / income × 100`, zero without income.
    pub savings_rate: f64,
    /// Expense categories, largest first.
    pub expense_breakdown: Vec<CategoryShare>,
}

pub fn summary(transactions: &[Transaction]) -> Summary {
    let total_income = total_of(transactions, TransactionType::Income);
    let total_expense = total_of(transactions, TransactionType::Expense);
    let balance = total_income - total_expense;

    let mut expense_breakdown: Vec<CategoryShare> = category_totals(transactions, Some(TransactionType::Expense))
        .into_iter()
        .map(|(category, t)| CategoryShare {
            category,
            total: t.total,
            count: t.count,
            percent: t.total.percent_of(total_expense),
        })
        .collect();
    expense_breakdown.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));

    Summary {
        total_income,
        total_expense,
        balance,
        savings_rate: balance.percent_of(total_income),
        expense_breakdown,
    }
}
