//! Spending budgets. `Budget::spent_amount` caches the sum of the budget's own transactions.

use crate::core::errors::RupeeError;
use crate::core::models::budget::{
    Budget, BudgetPatch, BudgetProgress, BudgetTransaction, BudgetTransactionPatch, NewBudget,
    NewBudgetTransaction,
};
use crate::core::models::new_id;
use crate::core::models::transaction::{NewTransaction, TransactionType};
use crate::core::money::Money;
use crate::core::validation::{
    validate_amount_input, validate_description, validate_name, validate_optional_text,
};
use chrono::{NaiveDate, Utc};
use log::{debug, warn};

fn validate_period(start: NaiveDate, end: NaiveDate) -> Result<(), RupeeError> {
    if end < start {
        return Err(RupeeError::validation(
            "endDate",
            "Invalid Period",
            "End date cannot be before start date",
        ));
    }
    Ok(())
}

pub fn check_budget(budget: &Budget) -> Result<(), RupeeError> {
    validate_amount_input("targetAmount", budget.target_amount)?;
    validate_period(budget.start_date, budget.end_date)
}

pub fn check_transaction(transaction: &BudgetTransaction) -> Result<(), RupeeError> {
    validate_amount_input("amount", transaction.amount)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BudgetBook {
    budgets: Vec<Budget>,
    transactions: Vec<BudgetTransaction>,
}

impl BudgetBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(budgets: Vec<Budget>, transactions: Vec<BudgetTransaction>) -> Self {
        let (transactions, orphans): (Vec<_>, Vec<_>) = transactions
            .into_iter()
            .partition(|t| budgets.iter().any(|b| b.id == t.budget_id));
        if !orphans.is_empty() {
            warn!("Discarding {} budget transactions with no budget", orphans.len());
        }
        let mut book = BudgetBook { budgets, transactions };
        let ids: Vec<String> = book.budgets.iter().map(|b| b.id.clone()).collect();
        for id in &ids {
            book.recompute_spent(id);
        }
        book
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn transactions(&self) -> &[BudgetTransaction] {
        &self.transactions
    }

    pub fn budget(&self, budget_id: &str) -> Result<&Budget, RupeeError> {
        self.budgets
            .iter()
            .find(|b| b.id == budget_id)
            .ok_or_else(|| RupeeError::BudgetNotFound(budget_id.to_string()))
    }

    pub fn transactions_of(&self, budget_id: &str) -> Vec<BudgetTransaction> {
        self.transactions
            .iter()
            .filter(|t| t.budget_id == budget_id)
            .cloned()
            .collect()
    }

    pub fn progress(&self, budget_id: &str) -> Result<BudgetProgress, RupeeError> {
        let budget = self.budget(budget_id)?;
        Ok(BudgetProgress {
            budget_id: budget.id.clone(),
            target: budget.target_amount,
            spent: budget.spent_amount,
            remaining: budget.target_amount - budget.spent_amount,
            percent_used: budget.spent_amount.percent_of(budget.target_amount),
        })
    }

    pub fn add_budget(&mut self, new_budget: NewBudget) -> Result<Budget, RupeeError> {
        validate_name("name", &new_budget.name)?;
        validate_name("category", &new_budget.category)?;
        validate_amount_input("targetAmount", new_budget.target_amount)?;
        validate_optional_text("description", new_budget.description.as_deref())?;
        validate_period(new_budget.start_date, new_budget.end_date)?;

        let budget = Budget {
            id: new_id(),
            name: new_budget.name.trim().to_string(),
            description: new_budget.description.filter(|d| !d.trim().is_empty()),
            target_amount: new_budget.target_amount,
            spent_amount: Money::ZERO,
            category: new_budget.category.trim().to_string(),
            start_date: new_budget.start_date,
            end_date: new_budget.end_date,
            created_at: Utc::now(),
        };
        self.budgets.push(budget.clone());
        debug!("Budget {} added", budget.id);
        Ok(budget)
    }

    pub fn update_budget(&mut self, budget_id: &str, patch: BudgetPatch) -> Result<Budget, RupeeError> {
        let current = self.budget(budget_id)?.clone();
        if let Some(ref name) = patch.name {
            validate_name("name", name)?;
        }
        if let Some(ref category) = patch.category {
            validate_name("category", category)?;
        }
        if let Some(target) = patch.target_amount {
            validate_amount_input("targetAmount", target)?;
        }
        validate_optional_text("description", patch.description.as_deref())?;

        let updated = Budget {
            name: patch.name.map(|n| n.trim().to_string()).unwrap_or(current.name.clone()),
            description: match patch.description {
                Some(d) => Some(d).filter(|d| !d.trim().is_empty()),
                None => current.description.clone(),
            },
            target_amount: patch.target_amount.unwrap_or(current.target_amount),
            category: patch
                .category
                .map(|c| c.trim().to_string())
                .unwrap_or(current.category.clone()),
            start_date: patch.start_date.unwrap_or(current.start_date),
            end_date: patch.end_date.unwrap_or(current.end_date),
            ..current
        };
        validate_period(updated.start_date, updated.end_date)?;
        if let Some(slot) = self.budgets.iter_mut().find(|b| b.id == budget_id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Removes the budget and its transactions. Returns how many transactions went.
    pub fn delete_budget(&mut self, budget_id: &str) -> Result<usize, RupeeError> {
        self.budget(budget_id)?;
        let before = self.transactions.len();
        self.transactions.retain(|t| t.budget_id != budget_id);
        self.budgets.retain(|b| b.id != budget_id);
        Ok(before - self.transactions.len())
    }

    /// Records spending against a budget. The returned [`NewTransaction`] is the matching
    /// expense for the personal transaction list.
    pub fn add_transaction(
        &mut self,
        new_transaction: NewBudgetTransaction,
    ) -> Result<(BudgetTransaction, NewTransaction), RupeeError> {
        validate_amount_input("amount", new_transaction.amount)?;
        validate_description("description", &new_transaction.description)?;
        let budget = self.budget(&new_transaction.budget_id)?.clone();

        let transaction = BudgetTransaction {
            id: new_id(),
            budget_id: budget.id.clone(),
            amount: new_transaction.amount,
            description: new_transaction.description.trim().to_string(),
            date: new_transaction.date,
            created_at: Utc::now(),
        };
        let expense = NewTransaction {
            transaction_type: TransactionType::Expense,
            amount: transaction.amount,
            category: budget.category.clone(),
            note: Some(format!("Budget: {} - {}", budget.name, transaction.description)),
            date: transaction.date,
        };
        self.transactions.push(transaction.clone());
        self.recompute_spent(&budget.id);
        Ok((transaction, expense))
    }

    pub fn update_transaction(
        &mut self,
        transaction_id: &str,
        patch: BudgetTransactionPatch,
    ) -> Result<BudgetTransaction, RupeeError> {
        let current = self
            .transactions
            .iter()
            .find(|t| t.id == transaction_id)
            .cloned()
            .ok_or_else(|| RupeeError::BudgetTransactionNotFound(transaction_id.to_string()))?;
        if let Some(amount) = patch.amount {
            validate_amount_input("amount", amount)?;
        }
        if let Some(ref description) = patch.description {
            validate_description("description", description)?;
        }
        if let Some(ref budget_id) = patch.budget_id {
            self.budget(budget_id)?;
        }

        let updated = BudgetTransaction {
            budget_id: patch.budget_id.unwrap_or(current.budget_id.clone()),
            amount: patch.amount.unwrap_or(current.amount),
            description: patch
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or(current.description.clone()),
            date: patch.date.unwrap_or(current.date),
            ..current.clone()
        };
        if let Some(slot) = self.transactions.iter_mut().find(|t| t.id == transaction_id) {
            *slot = updated.clone();
        }
        self.recompute_spent(&current.budget_id);
        if updated.budget_id != current.budget_id {
            self.recompute_spent(&updated.budget_id);
        }
        Ok(updated)
    }

    pub fn delete_transaction(&mut self, transaction_id: &str) -> Result<BudgetTransaction, RupeeError> {
        let position = self
            .transactions
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or_else(|| RupeeError::BudgetTransactionNotFound(transaction_id.to_string()))?;
        let removed = self.transactions.remove(position);
        self.recompute_spent(&removed.budget_id);
        Ok(removed)
    }

    fn recompute_spent(&mut self, budget_id: &str) {
        let spent: Money = self
            .transactions
            .iter()
            .filter(|t| t.budget_id == budget_id)
            .map(|t| t.amount)
            .sum();
        if let Some(budget) = self.budgets.iter_mut().find(|b| b.id == budget_id) {
            budget.spent_amount = spent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn trip(book: &mut BudgetBook) -> Budget {
        book.add_budget(NewBudget {
            name: "Goa Trip".to_string(),
            description: None,
            target_amount: Money::from_minor(1_000_000),
            category: "Travel".to_string(),
            start_date: day(1),
            end_date: day(31),
        })
        .unwrap()
    }

    fn spend(budget_id: &str, minor: i64, description: &str) -> NewBudgetTransaction {
        NewBudgetTransaction {
            budget_id: budget_id.to_string(),
            amount: Money::from_minor(minor),
            description: description.to_string(),
            date: day(10),
        }
    }

    #[test]
    fn spending_updates_progress_and_mirrors_an_expense() {
        let mut book = BudgetBook::new();
        let budget = trip(&mut book);
        let (_, expense) = book.add_transaction(spend(&budget.id, 250_000, "Flights")).unwrap();

        assert_eq!(expense.transaction_type, TransactionType::Expense);
        assert_eq!(expense.category, "Travel");
        assert_eq!(expense.note.as_deref(), Some("Budget: Goa Trip - Flights"));

        let progress = book.progress(&budget.id).unwrap();
        assert_eq!(progress.spent, Money::from_minor(250_000));
        assert_eq!(progress.remaining, Money::from_minor(750_000));
        assert_eq!(progress.percent_used, 25.0);
    }

    #[test]
    fn rejects_inverted_period() {
        let mut book = BudgetBook::new();
        let result = book.add_budget(NewBudget {
            name: "Backwards".to_string(),
            description: None,
            target_amount: Money::from_minor(100),
            category: "Travel".to_string(),
            start_date: day(20),
            end_date: day(2),
        });
        assert!(matches!(result, Err(RupeeError::Validation(..))));
    }

    #[test]
    fn moving_a_transaction_recomputes_both_budgets() {
        let mut book = BudgetBook::new();
        let first = trip(&mut book);
        let second = trip(&mut book);
        let (tx, _) = book.add_transaction(spend(&first.id, 40_000, "Hotel")).unwrap();

        book.update_transaction(
            &tx.id,
            BudgetTransactionPatch {
                budget_id: Some(second.id.clone()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(book.budget(&first.id).unwrap().spent_amount, Money::ZERO);
        assert_eq!(book.budget(&second.id).unwrap().spent_amount, Money::from_minor(40_000));

        book.delete_transaction(&tx.id).unwrap();
        assert_eq!(book.budget(&second.id).unwrap().spent_amount, Money::ZERO);
    }

    #[test]
    fn deleting_a_budget_cascades() {
        let mut book = BudgetBook::new();
        let budget = trip(&mut book);
        book.add_transaction(spend(&budget.id, 100, "Snacks")).unwrap();
        book.add_transaction(spend(&budget.id, 200, "Taxi")).unwrap();
        assert_eq!(book.delete_budget(&budget.id), Ok(2));
        assert!(book.transactions().is_empty());
        assert!(book.budget(&budget.id).unwrap_err().is_not_found());
    }

    #[test]
    fn from_parts_recomputes_spent() {
        let mut book = BudgetBook::new();
        let budget = trip(&mut book);
        book.add_transaction(spend(&budget.id, 5_000, "Tickets")).unwrap();
        let mut stale = book.budgets().to_vec();
        stale[0].spent_amount = Money::from_minor(1);
        let rebuilt = BudgetBook::from_parts(stale, book.transactions().to_vec());
        assert_eq!(rebuilt.budgets()[0].spent_amount, Money::from_minor(5_000));
    }
}
