//! Personal income/expense transactions and the category catalogue.

use crate::core::aggregation;
use crate::core::errors::RupeeError;
use crate::core::models::category::{
    Category, CategoryPatch, NewCategory, default_categories, is_default_category,
};
use crate::core::models::new_id;
use crate::core::models::transaction::{
    CategoryTotal, NewTransaction, Transaction, TransactionPatch, TransactionType,
};
use crate::core::money::Money;
use crate::core::validation::{validate_amount_input, validate_name, validate_optional_text};
use chrono::{NaiveDate, Utc};
use log::debug;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseBook {
    /// Newest first.
    transactions: Vec<Transaction>,
    custom_categories: Vec<Category>,
}

impl ExpenseBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom categories that collide with a built-in id are ignored.
    pub fn from_parts(transactions: Vec<Transaction>, custom_categories: Vec<Category>) -> Self {
        let custom_categories = custom_categories
            .into_iter()
            .filter(|c| !is_default_category(&c.id))
            .collect();
        ExpenseBook {
            transactions,
            custom_categories,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn custom_categories(&self) -> &[Category] {
        &self.custom_categories
    }

    pub fn transaction(&self, transaction_id: &str) -> Result<&Transaction, RupeeError> {
        self.transactions
            .iter()
            .find(|t| t.id == transaction_id)
            .ok_or_else(|| RupeeError::TransactionNotFound(transaction_id.to_string()))
    }

    pub fn add_transaction(&mut self, new_transaction: NewTransaction) -> Result<Transaction, RupeeError> {
        validate_amount_input("amount", new_transaction.amount)?;
        validate_name("category", &new_transaction.category)?;
        validate_optional_text("note", new_transaction.note.as_deref())?;

        let transaction = Transaction {
            id: new_id(),
            transaction_type: new_transaction.transaction_type,
            amount: new_transaction.amount,
            category: new_transaction.category.trim().to_string(),
            note: new_transaction.note.filter(|n| !n.trim().is_empty()),
            date: new_transaction.date,
            created_at: Utc::now(),
        };
        self.transactions.insert(0, transaction.clone());
        debug!("Transaction {} added", transaction.id);
        Ok(transaction)
    }

    pub fn update_transaction(
        &mut self,
        transaction_id: &str,
        patch: TransactionPatch,
    ) -> Result<Transaction, RupeeError> {
        if let Some(amount) = patch.amount {
            validate_amount_input("amount", amount)?;
        }
        if let Some(ref category) = patch.category {
            validate_name("category", category)?;
        }
        validate_optional_text("note", patch.note.as_deref())?;

        let transaction = self
            .transactions
            .iter_mut()
            .find(|t| t.id == transaction_id)
            .ok_or_else(|| RupeeError::TransactionNotFound(transaction_id.to_string()))?;
        if let Some(kind) = patch.transaction_type {
            transaction.transaction_type = kind;
        }
        if let Some(amount) = patch.amount {
            transaction.amount = amount;
        }
        if let Some(category) = patch.category {
            transaction.category = category.trim().to_string();
        }
        if let Some(note) = patch.note {
            transaction.note = Some(note).filter(|n| !n.trim().is_empty());
        }
        if let Some(date) = patch.date {
            transaction.date = date;
        }
        Ok(transaction.clone())
    }

    pub fn delete_transaction(&mut self, transaction_id: &str) -> Result<Transaction, RupeeError> {
        let position = self
            .transactions
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or_else(|| RupeeError::TransactionNotFound(transaction_id.to_string()))?;
        Ok(self.transactions.remove(position))
    }

    pub fn search(&self, query: &str) -> Vec<Transaction> {
        aggregation::search(&self.transactions, query)
    }

    pub fn filter_by_date(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Vec<Transaction> {
        aggregation::filter_by_date(&self.transactions, start, end)
    }

    pub fn total_income(&self) -> Money {
        aggregation::total_of(&self.transactions, TransactionType::Income)
    }

    pub fn total_expense(&self) -> Money {
        aggregation::total_of(&self.transactions, TransactionType::Expense)
    }

    pub fn balance(&self) -> Money {
        aggregation::balance(&self.transactions)
    }

    pub fn category_totals(&self, only: Option<TransactionType>) -> BTreeMap<String, CategoryTotal> {
        aggregation::category_totals(&self.transactions, only)
    }

    /// Built-in categories followed by custom ones.
    pub fn all_categories(&self) -> Vec<Category> {
        let mut categories = default_categories();
        categories.extend(self.custom_categories.iter().cloned());
        categories
    }

    pub fn categories_for(&self, transaction_type: TransactionType) -> Vec<Category> {
        self.all_categories()
            .into_iter()
            .filter(|c| c.kind.applies_to(transaction_type))
            .collect()
    }

    pub fn add_category(&mut self, new_category: NewCategory) -> Result<Category, RupeeError> {
        validate_name("name", &new_category.name)?;
        validate_name("icon", &new_category.icon)?;
        validate_name("color", &new_category.color)?;
        let category = Category {
            id: new_id(),
            name: new_category.name.trim().to_string(),
            icon: new_category.icon,
            color: new_category.color,
            kind: new_category.kind,
        };
        self.custom_categories.push(category.clone());
        Ok(category)
    }

    pub fn update_category(&mut self, category_id: &str, patch: CategoryPatch) -> Result<Category, RupeeError> {
        if is_default_category(category_id) {
            return Err(RupeeError::validation(
                "id",
                "Immutable Category",
                "Default categories cannot be edited",
            ));
        }
        for (field, value) in [("name", &patch.name), ("icon", &patch.icon), ("color", &patch.color)] {
            if let Some(value) = value {
                validate_name(field, value)?;
            }
        }
        let category = self
            .custom_categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or_else(|| RupeeError::CategoryNotFound(category_id.to_string()))?;
        if let Some(name) = patch.name {
            category.name = name.trim().to_string();
        }
        if let Some(icon) = patch.icon {
            category.icon = icon;
        }
        if let Some(color) = patch.color {
            category.color = color;
        }
        if let Some(kind) = patch.kind {
            category.kind = kind;
        }
        Ok(category.clone())
    }

    pub fn delete_category(&mut self, category_id: &str) -> Result<Category, RupeeError> {
        if is_default_category(category_id) {
            return Err(RupeeError::validation(
                "id",
                "Immutable Category",
                "Default categories cannot be deleted",
            ));
        }
        let position = self
            .custom_categories
            .iter()
            .position(|c| c.id == category_id)
            .ok_or_else(|| RupeeError::CategoryNotFound(category_id.to_string()))?;
        Ok(self.custom_categories.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::category::CategoryKind;

    fn new_tx(kind: TransactionType, minor: i64, category: &str, note: Option<&str>) -> NewTransaction {
        NewTransaction {
            transaction_type: kind,
            amount: Money::from_minor(minor),
            category: category.to_string(),
            note: note.map(String::from),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    #[test]
    fn newest_transaction_comes_first() {
        let mut book = ExpenseBook::new();
        book.add_transaction(new_tx(TransactionType::Income, 50_000, "Salary", None))
            .unwrap();
        let latest = book
            .add_transaction(new_tx(TransactionType::Expense, 12_000, "Groceries", Some("veg")))
            .unwrap();
        assert_eq!(book.transactions()[0].id, latest.id);
        assert_eq!(book.balance(), Money::from_minor(38_000));
    }

    #[test]
    fn rejects_non_positive_amounts_and_blank_categories() {
        let mut book = ExpenseBook::new();
        assert!(matches!(
            book.add_transaction(new_tx(TransactionType::Expense, 0, "Food", None)),
            Err(RupeeError::Validation(..))
        ));
        assert!(matches!(
            book.add_transaction(new_tx(TransactionType::Expense, 100, "  ", None)),
            Err(RupeeError::Validation(..))
        ));
        assert!(book.transactions().is_empty());
    }

    #[test]
    fn update_and_delete_transaction() {
        let mut book = ExpenseBook::new();
        let tx = book
            .add_transaction(new_tx(TransactionType::Expense, 1_000, "Food", Some("lunch")))
            .unwrap();
        let updated = book
            .update_transaction(
                &tx.id,
                TransactionPatch {
                    amount: Some(Money::from_minor(2_500)),
                    note: Some(String::new()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount, Money::from_minor(2_500));
        assert_eq!(updated.note, None);
        assert_eq!(book.total_expense(), Money::from_minor(2_500));

        book.delete_transaction(&tx.id).unwrap();
        assert_eq!(
            book.delete_transaction(&tx.id),
            Err(RupeeError::TransactionNotFound(tx.id.clone()))
        );
    }

    #[test]
    fn default_categories_are_immutable() {
        let mut book = ExpenseBook::new();
        assert_eq!(book.all_categories().len(), 16);
        assert!(matches!(book.delete_category("1"), Err(RupeeError::Validation(..))));
        assert!(matches!(
            book.update_category("11", CategoryPatch::default()),
            Err(RupeeError::Validation(..))
        ));
    }

    #[test]
    fn custom_category_lifecycle() {
        let mut book = ExpenseBook::new();
        let pets = book
            .add_category(NewCategory {
                name: "Pets".to_string(),
                icon: "🐶".to_string(),
                color: "#123456".to_string(),
                kind: CategoryKind::Expense,
            })
            .unwrap();
        assert_eq!(book.all_categories().len(), 17);
        assert!(book.categories_for(TransactionType::Expense).iter().any(|c| c.id == pets.id));
        assert!(!book.categories_for(TransactionType::Income).iter().any(|c| c.id == pets.id));

        let both = book
            .update_category(
                &pets.id,
                CategoryPatch {
                    kind: Some(CategoryKind::Both),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(both.kind, CategoryKind::Both);
        assert!(book.categories_for(TransactionType::Income).iter().any(|c| c.id == pets.id));

        book.delete_category(&pets.id).unwrap();
        assert_eq!(
            book.delete_category(&pets.id),
            Err(RupeeError::CategoryNotFound(pets.id.clone()))
        );
    }

    #[test]
    fn from_parts_ignores_shadowed_defaults() {
        let shadow = Category {
            id: "3".to_string(),
            name: "Not Shopping".to_string(),
            icon: "x".to_string(),
            color: "#000".to_string(),
            kind: CategoryKind::Both,
        };
        let book = ExpenseBook::from_parts(Vec::new(), vec![shadow]);
        assert!(book.custom_categories().is_empty());
    }
}
