use crate::constants::{
    BUDGET_ADDED, BUDGET_DELETED, BUDGET_TRANSACTION_ADDED, BUDGET_TRANSACTION_DELETED,
    BUDGET_TRANSACTION_UPDATED, BUDGET_TRANSACTIONS_KEY, BUDGET_UPDATED, BUDGETS_KEY, CATEGORY_ADDED,
    CATEGORY_DELETED, CATEGORY_UPDATED, CUSTOM_CATEGORIES_KEY, DATA_CLEARED, DATA_IMPORTED,
    EXPENSE_ADDED, EXPENSE_DELETED, EXPENSE_UPDATED, FRIEND_ADDED, FRIEND_DELETED,
    FRIEND_ENTRY_ADDED, FRIEND_ENTRY_DELETED, FRIEND_ENTRY_UPDATED, FRIEND_TRANSACTIONS_KEY,
    FRIEND_UPDATED, FRIENDS_KEY, GROUP_CREATED, GROUP_DELETED, GROUP_UPDATED, SPLIT_EXPENSES_KEY,
    SPLIT_GROUPS_KEY, TRANSACTION_ADDED, TRANSACTION_DELETED, TRANSACTION_UPDATED, TRANSACTIONS_KEY,
    ALL_COLLECTIONS,
};
use crate::core::aggregation::{self, Summary};
use crate::core::budgets::BudgetBook;
use crate::core::errors::RupeeError;
use crate::core::expenses::ExpenseBook;
use crate::core::import::{ImportedData, parse_document};
use crate::core::ledger::FriendLedger;
use crate::core::models::{
    audit::AppLog,
    budget::{
        Budget, BudgetPatch, BudgetProgress, BudgetTransaction, BudgetTransactionPatch, NewBudget,
        NewBudgetTransaction,
    },
    category::{Category, CategoryPatch, NewCategory},
    friend::{Friend, FriendEntryPatch, FriendPatch, FriendTransaction, NewFriend, NewFriendEntry},
    snapshot::{EXPORT_VERSION, ExportDocument, ImportReport},
    split::{
        NetPositions, NewSplitExpense, NewSplitGroup, SplitBalance, SplitExpense, SplitExpensePatch,
        SplitGroup, SplitGroupPatch,
    },
    transaction::{CategoryTotal, NewTransaction, Transaction, TransactionPatch, TransactionType},
};
use crate::core::money::Money;
use crate::core::settlement::SplitBook;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::{Storage, read_collection, write_collection};
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use serde_json::json;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Owns the four aggregates. Locks are always taken in the order expenses, budgets, splits,
/// ledger. Each mutation edits a copy, persists it, and only then replaces the live state.
pub struct RupeeService<L: LoggingService, S: Storage> {
    storage: S,
    logging: L,
    expenses: RwLock<ExpenseBook>,
    budgets: RwLock<BudgetBook>,
    splits: RwLock<SplitBook>,
    ledger: RwLock<FriendLedger>,
}

impl<L: LoggingService, S: Storage> RupeeService<L, S> {
    pub fn new(storage: S, logging: L) -> Self {
        RupeeService {
            storage,
            logging,
            expenses: RwLock::new(ExpenseBook::new()),
            budgets: RwLock::new(BudgetBook::new()),
            splits: RwLock::new(SplitBook::new()),
            ledger: RwLock::new(FriendLedger::new()),
        }
    }

    /// Builds the service from whatever the storage already holds, recomputing every
    /// cached total from the stored logs.
    pub async fn load(storage: S, logging: L) -> Result<Self, RupeeError> {
        let (transactions, custom_categories, budgets, budget_transactions) = futures::try_join!(
            read_collection(&storage, TRANSACTIONS_KEY),
            read_collection(&storage, CUSTOM_CATEGORIES_KEY),
            read_collection(&storage, BUDGETS_KEY),
            read_collection(&storage, BUDGET_TRANSACTIONS_KEY),
        )?;
        let (groups, split_expenses, friends, friend_transactions) = futures::try_join!(
            read_collection(&storage, SPLIT_GROUPS_KEY),
            read_collection(&storage, SPLIT_EXPENSES_KEY),
            read_collection(&storage, FRIENDS_KEY),
            read_collection(&storage, FRIEND_TRANSACTIONS_KEY),
        )?;
        let service = RupeeService {
            expenses: RwLock::new(ExpenseBook::from_parts(transactions, custom_categories)),
            budgets: RwLock::new(BudgetBook::from_parts(budgets, budget_transactions)),
            splits: RwLock::new(SplitBook::from_parts(groups, split_expenses)),
            ledger: RwLock::new(FriendLedger::from_parts(friends, friend_transactions)),
            storage,
            logging,
        };
        info!("Loaded stored data");
        Ok(service)
    }

    /// Runs after the change is persisted, so a failed audit write is reported but does not
    /// turn an applied mutation into an error.
    async fn log_and_audit(&self, action: &str, log_details: serde_json::Value, entity_id: Option<&str>) {
        info!("{} {}", action, entity_id.unwrap_or("-"));
        if let Err(err) = self.logging.log_action(action, log_details, entity_id).await {
            warn!("Audit record for {} was not written: {}", action, err);
        }
    }

    async fn persist_expenses(&self, book: &ExpenseBook) -> Result<(), RupeeError> {
        futures::try_join!(
            write_collection(&self.storage, TRANSACTIONS_KEY, book.transactions()),
            write_collection(&self.storage, CUSTOM_CATEGORIES_KEY, book.custom_categories()),
        )?;
        Ok(())
    }

    async fn persist_budgets(&self, book: &BudgetBook) -> Result<(), RupeeError> {
        futures::try_join!(
            write_collection(&self.storage, BUDGETS_KEY, book.budgets()),
            write_collection(&self.storage, BUDGET_TRANSACTIONS_KEY, book.transactions()),
        )?;
        Ok(())
    }

    async fn persist_splits(&self, book: &SplitBook) -> Result<(), RupeeError> {
        futures::try_join!(
            write_collection(&self.storage, SPLIT_GROUPS_KEY, book.groups()),
            write_collection(&self.storage, SPLIT_EXPENSES_KEY, book.expenses()),
        )?;
        Ok(())
    }

    async fn persist_ledger(&self, ledger: &FriendLedger) -> Result<(), RupeeError> {
        futures::try_join!(
            write_collection(&self.storage, FRIENDS_KEY, ledger.friends()),
            write_collection(&self.storage, FRIEND_TRANSACTIONS_KEY, ledger.entries()),
        )?;
        Ok(())
    }

    async fn mutate_expenses<T, F>(&self, change: F) -> Result<T, RupeeError>
    where
        F: FnOnce(&mut ExpenseBook) -> Result<T, RupeeError> + Send,
        T: Send,
    {
        let mut live = self.expenses.write().await;
        let mut draft = live.clone();
        let out = change(&mut draft)?;
        self.persist_expenses(&draft).await?;
        *live = draft;
        Ok(out)
    }

    async fn mutate_budgets<T, F>(&self, change: F) -> Result<T, RupeeError>
    where
        F: FnOnce(&mut BudgetBook) -> Result<T, RupeeError> + Send,
        T: Send,
    {
        let mut live = self.budgets.write().await;
        let mut draft = live.clone();
        let out = change(&mut draft)?;
        self.persist_budgets(&draft).await?;
        *live = draft;
        Ok(out)
    }

    async fn mutate_splits<T, F>(&self, change: F) -> Result<T, RupeeError>
    where
        F: FnOnce(&mut SplitBook) -> Result<T, RupeeError> + Send,
        T: Send,
    {
        let mut live = self.splits.write().await;
        let mut draft = live.clone();
        let out = change(&mut draft)?;
        self.persist_splits(&draft).await?;
        *live = draft;
        Ok(out)
    }

    async fn mutate_ledger<T, F>(&self, change: F) -> Result<T, RupeeError>
    where
        F: FnOnce(&mut FriendLedger) -> Result<T, RupeeError> + Send,
        T: Send,
    {
        let mut live = self.ledger.write().await;
        let mut draft = live.clone();
        let out = change(&mut draft)?;
        self.persist_ledger(&draft).await?;
        *live = draft;
        Ok(out)
    }

    // Friend ledger

    pub async fn get_friends(&self) -> Vec<Friend> {
        self.ledger.read().await.friends().to_vec()
    }

    pub async fn get_friend(&self, friend_id: &str) -> Result<Friend, RupeeError> {
        self.ledger.read().await.friend(friend_id).cloned()
    }

    pub async fn add_friend(&self, new_friend: NewFriend) -> Result<Friend, RupeeError> {
        let friend = self.mutate_ledger(|ledger| ledger.add_friend(new_friend)).await?;
        self.log_and_audit(
            FRIEND_ADDED,
            json!({ "friend_id": friend.id, "name": friend.name }),
            Some(&friend.id),
        )
        .await;
        Ok(friend)
    }

    pub async fn update_friend(&self, friend_id: &str, patch: FriendPatch) -> Result<Friend, RupeeError> {
        let friend = self
            .mutate_ledger(|ledger| ledger.update_friend(friend_id, patch))
            .await?;
        self.log_and_audit(
            FRIEND_UPDATED,
            json!({ "friend_id": friend.id, "name": friend.name }),
            Some(friend_id),
        )
        .await;
        Ok(friend)
    }

    /// Deletes the friend together with every entry recorded against them.
    pub async fn delete_friend(&self, friend_id: &str) -> Result<(), RupeeError> {
        let removed = self.mutate_ledger(|ledger| ledger.delete_friend(friend_id)).await?;
        self.log_and_audit(
            FRIEND_DELETED,
            json!({ "friend_id": friend_id, "entries_removed": removed }),
            Some(friend_id),
        )
        .await;
        Ok(())
    }

    pub async fn get_friend_entries(&self, friend_id: &str) -> Result<Vec<FriendTransaction>, RupeeError> {
        let ledger = self.ledger.read().await;
        ledger.friend(friend_id)?;
        Ok(ledger.entries_of(friend_id))
    }

    pub async fn get_all_friend_entries(&self) -> Vec<FriendTransaction> {
        self.ledger.read().await.entries().to_vec()
    }

    pub async fn add_friend_entry(&self, new_entry: NewFriendEntry) -> Result<FriendTransaction, RupeeError> {
        let entry = self.mutate_ledger(|ledger| ledger.add_entry(new_entry)).await?;
        self.log_and_audit(
            FRIEND_ENTRY_ADDED,
            json!({
                "entry_id": entry.id,
                "friend_id": entry.friend_id,
                "type": entry.entry_type,
                "amount": entry.amount
            }),
            Some(&entry.id),
        )
        .await;
        Ok(entry)
    }

    pub async fn update_friend_entry(
        &self,
        entry_id: &str,
        patch: FriendEntryPatch,
    ) -> Result<FriendTransaction, RupeeError> {
        let entry = self
            .mutate_ledger(|ledger| ledger.update_entry(entry_id, patch))
            .await?;
        self.log_and_audit(
            FRIEND_ENTRY_UPDATED,
            json!({
                "entry_id": entry.id,
                "friend_id": entry.friend_id,
                "type": entry.entry_type,
                "amount": entry.amount
            }),
            Some(entry_id),
        )
        .await;
        Ok(entry)
    }

    pub async fn delete_friend_entry(&self, entry_id: &str) -> Result<(), RupeeError> {
        let removed = self.mutate_ledger(|ledger| ledger.delete_entry(entry_id)).await?;
        self.log_and_audit(
            FRIEND_ENTRY_DELETED,
            json!({ "entry_id": entry_id, "friend_id": removed.friend_id }),
            Some(entry_id),
        )
        .await;
        Ok(())
    }

    pub async fn get_friend_balance(&self, friend_id: &str) -> Result<Money, RupeeError> {
        let ledger = self.ledger.read().await;
        ledger.friend(friend_id)?;
        Ok(ledger.balance_of(friend_id))
    }

    pub async fn get_friend_balances(&self) -> BTreeMap<String, Money> {
        self.ledger.read().await.balances()
    }

    // Split groups

    pub async fn get_split_groups(&self) -> Vec<SplitGroup> {
        self.splits.read().await.groups().to_vec()
    }

    pub async fn get_split_group(&self, group_id: &str) -> Result<SplitGroup, RupeeError> {
        self.splits.read().await.group(group_id).cloned()
    }

    pub async fn create_split_group(&self, new_group: NewSplitGroup) -> Result<SplitGroup, RupeeError> {
        let group = self.mutate_splits(|book| book.add_group(new_group)).await?;
        self.log_and_audit(
            GROUP_CREATED,
            json!({ "group_id": group.id, "name": group.name, "members": group.members }),
            Some(&group.id),
        )
        .await;
        Ok(group)
    }

    pub async fn update_split_group(&self, group_id: &str, patch: SplitGroupPatch) -> Result<SplitGroup, RupeeError> {
        let group = self
            .mutate_splits(|book| book.update_group(group_id, patch))
            .await?;
        self.log_and_audit(
            GROUP_UPDATED,
            json!({ "group_id": group.id, "name": group.name, "members": group.members }),
            Some(group_id),
        )
        .await;
        Ok(group)
    }

    /// Deletes the group together with its expenses.
    pub async fn delete_split_group(&self, group_id: &str) -> Result<(), RupeeError> {
        let removed = self.mutate_splits(|book| book.delete_group(group_id)).await?;
        self.log_and_audit(
            GROUP_DELETED,
            json!({ "group_id": group_id, "expenses_removed": removed }),
            Some(group_id),
        )
        .await;
        Ok(())
    }

    pub async fn get_split_expenses(&self, group_id: &str) -> Result<Vec<SplitExpense>, RupeeError> {
        let book = self.splits.read().await;
        book.group(group_id)?;
        Ok(book.expenses_of(group_id))
    }

    pub async fn add_split_expense(&self, new_expense: NewSplitExpense) -> Result<SplitExpense, RupeeError> {
        let expense = self.mutate_splits(|book| book.add_expense(new_expense)).await?;
        self.log_and_audit(
            EXPENSE_ADDED,
            json!({
                "expense_id": expense.id,
                "group_id": expense.split_group_id,
                "description": expense.description,
                "amount": expense.amount,
                "paid_by": expense.paid_by,
                "split_among": expense.split_among
            }),
            Some(&expense.id),
        )
        .await;
        Ok(expense)
    }

    pub async fn update_split_expense(
        &self,
        expense_id: &str,
        patch: SplitExpensePatch,
    ) -> Result<SplitExpense, RupeeError> {
        let expense = self
            .mutate_splits(|book| book.update_expense(expense_id, patch))
            .await?;
        self.log_and_audit(
            EXPENSE_UPDATED,
            json!({
                "expense_id": expense.id,
                "group_id": expense.split_group_id,
                "amount": expense.amount,
                "paid_by": expense.paid_by,
                "split_among": expense.split_among
            }),
            Some(expense_id),
        )
        .await;
        Ok(expense)
    }

    pub async fn delete_split_expense(&self, expense_id: &str) -> Result<(), RupeeError> {
        let removed = self.mutate_splits(|book| book.delete_expense(expense_id)).await?;
        self.log_and_audit(
            EXPENSE_DELETED,
            json!({ "expense_id": expense_id, "group_id": removed.split_group_id }),
            Some(expense_id),
        )
        .await;
        Ok(())
    }

    pub async fn get_net_positions(&self, group_id: &str) -> Result<NetPositions, RupeeError> {
        self.splits.read().await.net_positions(group_id)
    }

    /// Transfers that settle the group, largest creditors matched in member order.
    pub async fn settle_group(&self, group_id: &str) -> Result<Vec<SplitBalance>, RupeeError> {
        self.splits.read().await.settle(group_id)
    }

    // Personal transactions and categories

    pub async fn get_transactions(&self) -> Vec<Transaction> {
        self.expenses.read().await.transactions().to_vec()
    }

    pub async fn get_transaction(&self, transaction_id: &str) -> Result<Transaction, RupeeError> {
        self.expenses.read().await.transaction(transaction_id).cloned()
    }

    pub async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction, RupeeError> {
        let transaction = self
            .mutate_expenses(|book| book.add_transaction(new_transaction))
            .await?;
        self.log_and_audit(
            TRANSACTION_ADDED,
            json!({
                "transaction_id": transaction.id,
                "type": transaction.transaction_type,
                "amount": transaction.amount,
                "category": transaction.category
            }),
            Some(&transaction.id),
        )
        .await;
        Ok(transaction)
    }

    pub async fn update_transaction(
        &self,
        transaction_id: &str,
        patch: TransactionPatch,
    ) -> Result<Transaction, RupeeError> {
        let transaction = self
            .mutate_expenses(|book| book.update_transaction(transaction_id, patch))
            .await?;
        self.log_and_audit(
            TRANSACTION_UPDATED,
            json!({
                "transaction_id": transaction.id,
                "type": transaction.transaction_type,
                "amount": transaction.amount,
                "category": transaction.category
            }),
            Some(transaction_id),
        )
        .await;
        Ok(transaction)
    }

    pub async fn delete_transaction(&self, transaction_id: &str) -> Result<(), RupeeError> {
        let removed = self
            .mutate_expenses(|book| book.delete_transaction(transaction_id))
            .await?;
        self.log_and_audit(
            TRANSACTION_DELETED,
            json!({ "transaction_id": transaction_id, "amount": removed.amount }),
            Some(transaction_id),
        )
        .await;
        Ok(())
    }

    pub async fn search_transactions(&self, query: &str) -> Vec<Transaction> {
        self.expenses.read().await.search(query)
    }

    pub async fn filter_transactions_by_date(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<Transaction> {
        self.expenses.read().await.filter_by_date(start, end)
    }

    pub async fn get_category_totals(&self, only: Option<TransactionType>) -> BTreeMap<String, CategoryTotal> {
        self.expenses.read().await.category_totals(only)
    }

    pub async fn get_summary(&self) -> Summary {
        aggregation::summary(self.expenses.read().await.transactions())
    }

    pub async fn get_categories(&self, only: Option<TransactionType>) -> Vec<Category> {
        let book = self.expenses.read().await;
        match only {
            Some(kind) => book.categories_for(kind),
            None => book.all_categories(),
        }
    }

    pub async fn add_category(&self, new_category: NewCategory) -> Result<Category, RupeeError> {
        let category = self.mutate_expenses(|book| book.add_category(new_category)).await?;
        self.log_and_audit(
            CATEGORY_ADDED,
            json!({ "category_id": category.id, "name": category.name, "type": category.kind }),
            Some(&category.id),
        )
        .await;
        Ok(category)
    }

    pub async fn update_category(&self, category_id: &str, patch: CategoryPatch) -> Result<Category, RupeeError> {
        let category = self
            .mutate_expenses(|book| book.update_category(category_id, patch))
            .await?;
        self.log_and_audit(
            CATEGORY_UPDATED,
            json!({ "category_id": category.id, "name": category.name, "type": category.kind }),
            Some(category_id),
        )
        .await;
        Ok(category)
    }

    pub async fn delete_category(&self, category_id: &str) -> Result<(), RupeeError> {
        let removed = self
            .mutate_expenses(|book| book.delete_category(category_id))
            .await?;
        self.log_and_audit(
            CATEGORY_DELETED,
            json!({ "category_id": category_id, "name": removed.name }),
            Some(category_id),
        )
        .await;
        Ok(())
    }

    // Budgets

    pub async fn get_budgets(&self) -> Vec<Budget> {
        self.budgets.read().await.budgets().to_vec()
    }

    pub async fn get_budget(&self, budget_id: &str) -> Result<Budget, RupeeError> {
        self.budgets.read().await.budget(budget_id).cloned()
    }

    pub async fn add_budget(&self, new_budget: NewBudget) -> Result<Budget, RupeeError> {
        let budget = self.mutate_budgets(|book| book.add_budget(new_budget)).await?;
        self.log_and_audit(
            BUDGET_ADDED,
            json!({
                "budget_id": budget.id,
                "name": budget.name,
                "target_amount": budget.target_amount,
                "category": budget.category
            }),
            Some(&budget.id),
        )
        .await;
        Ok(budget)
    }

    pub async fn update_budget(&self, budget_id: &str, patch: BudgetPatch) -> Result<Budget, RupeeError> {
        let budget = self
            .mutate_budgets(|book| book.update_budget(budget_id, patch))
            .await?;
        self.log_and_audit(
            BUDGET_UPDATED,
            json!({ "budget_id": budget.id, "name": budget.name, "target_amount": budget.target_amount }),
            Some(budget_id),
        )
        .await;
        Ok(budget)
    }

    /// Deletes the budget and its own transactions. Expenses already mirrored into the
    /// personal transaction list stay.
    pub async fn delete_budget(&self, budget_id: &str) -> Result<(), RupeeError> {
        let removed = self.mutate_budgets(|book| book.delete_budget(budget_id)).await?;
        self.log_and_audit(
            BUDGET_DELETED,
            json!({ "budget_id": budget_id, "transactions_removed": removed }),
            Some(budget_id),
        )
        .await;
        Ok(())
    }

    pub async fn get_budget_transactions(&self, budget_id: &str) -> Result<Vec<BudgetTransaction>, RupeeError> {
        let book = self.budgets.read().await;
        book.budget(budget_id)?;
        Ok(book.transactions_of(budget_id))
    }

    pub async fn get_budget_progress(&self, budget_id: &str) -> Result<BudgetProgress, RupeeError> {
        self.budgets.read().await.progress(budget_id)
    }

    /// Records spending against a budget and the matching personal expense in one step.
    pub async fn add_budget_transaction(
        &self,
        new_transaction: NewBudgetTransaction,
    ) -> Result<BudgetTransaction, RupeeError> {
        let mut live_expenses = self.expenses.write().await;
        let mut live_budgets = self.budgets.write().await;
        let mut expenses = live_expenses.clone();
        let mut budgets = live_budgets.clone();

        let (transaction, expense) = budgets.add_transaction(new_transaction)?;
        let mirrored = expenses.add_transaction(expense)?;
        // Expenses go first: if the budget write then fails, storage holds an ordinary
        // expense and never budget spending without its mirror.
        self.persist_expenses(&expenses).await?;
        self.persist_budgets(&budgets).await?;
        *live_budgets = budgets;
        *live_expenses = expenses;
        drop(live_budgets);
        drop(live_expenses);

        self.log_and_audit(
            BUDGET_TRANSACTION_ADDED,
            json!({
                "budget_transaction_id": transaction.id,
                "budget_id": transaction.budget_id,
                "amount": transaction.amount,
                "transaction_id": mirrored.id
            }),
            Some(&transaction.id),
        )
        .await;
        Ok(transaction)
    }

    pub async fn update_budget_transaction(
        &self,
        transaction_id: &str,
        patch: BudgetTransactionPatch,
    ) -> Result<BudgetTransaction, RupeeError> {
        let transaction = self
            .mutate_budgets(|book| book.update_transaction(transaction_id, patch))
            .await?;
        self.log_and_audit(
            BUDGET_TRANSACTION_UPDATED,
            json!({
                "budget_transaction_id": transaction.id,
                "budget_id": transaction.budget_id,
                "amount": transaction.amount
            }),
            Some(transaction_id),
        )
        .await;
        Ok(transaction)
    }

    pub async fn delete_budget_transaction(&self, transaction_id: &str) -> Result<(), RupeeError> {
        let removed = self
            .mutate_budgets(|book| book.delete_transaction(transaction_id))
            .await?;
        self.log_and_audit(
            BUDGET_TRANSACTION_DELETED,
            json!({ "budget_transaction_id": transaction_id, "budget_id": removed.budget_id }),
            Some(transaction_id),
        )
        .await;
        Ok(())
    }

    // Data management

    pub async fn export_snapshot(&self) -> ExportDocument {
        let expenses = self.expenses.read().await;
        let budgets = self.budgets.read().await;
        let splits = self.splits.read().await;
        let ledger = self.ledger.read().await;
        ExportDocument {
            transactions: expenses.transactions().to_vec(),
            budgets: budgets.budgets().to_vec(),
            budget_transactions: budgets.transactions().to_vec(),
            split_groups: splits.groups().to_vec(),
            split_expenses: splits.expenses().to_vec(),
            friends: ledger.friends().to_vec(),
            friend_transactions: ledger.entries().to_vec(),
            custom_categories: expenses.custom_categories().to_vec(),
            export_date: Utc::now(),
            version: EXPORT_VERSION.to_string(),
        }
    }

    /// Replaces all data with the document's content. When records had to be dropped the
    /// import is refused unless `allow_partial` is set.
    pub async fn import_snapshot(&self, raw: &str, allow_partial: bool) -> Result<ImportReport, RupeeError> {
        let (data, mut report) = parse_document(raw)?;
        if report.total_dropped() > 0 && !allow_partial {
            warn!(
                "Import refused: {} records kept, {} dropped",
                report.total_kept(),
                report.total_dropped()
            );
            return Err(RupeeError::MalformedImport {
                reason: "some records failed validation".to_string(),
                valid: report.total_kept(),
                dropped: report.total_dropped(),
            });
        }

        self.replace_all(data).await?;
        report.applied = true;
        self.log_and_audit(
            DATA_IMPORTED,
            json!({ "kept": report.kept, "dropped": report.dropped }),
            None,
        )
        .await;
        Ok(report)
    }

    pub async fn clear_all(&self) -> Result<(), RupeeError> {
        let mut expenses = self.expenses.write().await;
        let mut budgets = self.budgets.write().await;
        let mut splits = self.splits.write().await;
        let mut ledger = self.ledger.write().await;
        futures::future::try_join_all(ALL_COLLECTIONS.iter().map(|key| self.storage.remove_item(key))).await?;
        *expenses = ExpenseBook::new();
        *budgets = BudgetBook::new();
        *splits = SplitBook::new();
        *ledger = FriendLedger::new();
        drop((expenses, budgets, splits, ledger));
        self.log_and_audit(DATA_CLEARED, json!({}), None).await;
        Ok(())
    }

    async fn replace_all(&self, data: ImportedData) -> Result<(), RupeeError> {
        let mut expenses = self.expenses.write().await;
        let mut budgets = self.budgets.write().await;
        let mut splits = self.splits.write().await;
        let mut ledger = self.ledger.write().await;
        futures::try_join!(
            self.persist_expenses(&data.expenses),
            self.persist_budgets(&data.budgets),
            self.persist_splits(&data.splits),
            self.persist_ledger(&data.ledger),
        )?;
        *expenses = data.expenses;
        *budgets = data.budgets;
        *splits = data.splits;
        *ledger = data.ledger;
        Ok(())
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, RupeeError> {
        self.logging.get_logs().await
    }
}
