use utoipa::OpenApi;

use crate::{
    api::models::{BalanceResponse, ErrorResponse, ImportRequest},
    core::{
        aggregation::{CategoryShare, Summary},
        models::{
            audit::AppLog,
            budget::{
                Budget, BudgetPatch, BudgetProgress, BudgetTransaction, BudgetTransactionPatch, NewBudget,
                NewBudgetTransaction,
            },
            category::{Category, CategoryKind, CategoryPatch, NewCategory},
            friend::{EntryType, Friend, FriendEntryPatch, FriendPatch, FriendTransaction, NewFriend, NewFriendEntry},
            snapshot::{ExportDocument, ImportReport},
            split::{
                NetPositions, NewSplitExpense, NewSplitGroup, SplitBalance, SplitExpense, SplitExpensePatch,
                SplitGroup, SplitGroupPatch,
            },
            transaction::{CategoryTotal, NewTransaction, Transaction, TransactionPatch, TransactionType},
        },
        money::Money,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::get_friends,
        super::handlers::add_friend,
        super::handlers::get_friend,
        super::handlers::update_friend,
        super::handlers::delete_friend,
        super::handlers::get_friend_entries,
        super::handlers::get_friend_balance,
        super::handlers::get_friend_balances,
        super::handlers::get_all_friend_entries,
        super::handlers::add_friend_entry,
        super::handlers::update_friend_entry,
        super::handlers::delete_friend_entry,
        super::handlers::get_split_groups,
        super::handlers::create_split_group,
        super::handlers::get_split_group,
        super::handlers::update_split_group,
        super::handlers::delete_split_group,
        super::handlers::get_split_expenses,
        super::handlers::get_net_positions,
        super::handlers::settle_group,
        super::handlers::add_split_expense,
        super::handlers::update_split_expense,
        super::handlers::delete_split_expense,
        super::handlers::get_transactions,
        super::handlers::add_transaction,
        super::handlers::get_transaction,
        super::handlers::update_transaction,
        super::handlers::delete_transaction,
        super::handlers::search_transactions,
        super::handlers::filter_transactions_by_date,
        super::handlers::get_categories,
        super::handlers::get_category_totals,
        super::handlers::add_category,
        super::handlers::update_category,
        super::handlers::delete_category,
        super::handlers::get_budgets,
        super::handlers::add_budget,
        super::handlers::get_budget,
        super::handlers::update_budget,
        super::handlers::delete_budget,
        super::handlers::get_budget_transactions,
        super::handlers::get_budget_progress,
        super::handlers::add_budget_transaction,
        super::handlers::update_budget_transaction,
        super::handlers::delete_budget_transaction,
        super::handlers::get_summary,
        super::handlers::export_snapshot,
        super::handlers::import_snapshot,
        super::handlers::clear_all,
        super::handlers::get_app_logs
    ),
    components(schemas(
        ImportRequest,
        BalanceResponse,
        ErrorResponse,
        Money,
        EntryType,
        Friend,
        FriendTransaction,
        NewFriend,
        FriendPatch,
        NewFriendEntry,
        FriendEntryPatch,
        SplitGroup,
        SplitExpense,
        SplitBalance,
        NetPositions,
        NewSplitGroup,
        SplitGroupPatch,
        NewSplitExpense,
        SplitExpensePatch,
        TransactionType,
        Transaction,
        NewTransaction,
        TransactionPatch,
        CategoryTotal,
        CategoryKind,
        Category,
        NewCategory,
        CategoryPatch,
        Budget,
        BudgetTransaction,
        NewBudget,
        BudgetPatch,
        NewBudgetTransaction,
        BudgetTransactionPatch,
        BudgetProgress,
        Summary,
        CategoryShare,
        ExportDocument,
        ImportReport,
        AppLog
    )),
    info(
        title = "Rupeecraft API",
        description = "API for personal transactions, budgets, split groups and friend ledgers",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
