use crate::{
    api::models::*,
    core::{
        aggregation::Summary,
        errors::RupeeError,
        models::{
            audit::AppLog,
            budget::{
                Budget, BudgetPatch, BudgetProgress, BudgetTransaction, BudgetTransactionPatch, NewBudget,
                NewBudgetTransaction,
            },
            category::{Category, CategoryPatch, NewCategory},
            flexible_date,
            friend::{Friend, FriendEntryPatch, FriendPatch, FriendTransaction, NewFriend, NewFriendEntry},
            snapshot::{ExportDocument, ImportReport},
            split::{
                NetPositions, NewSplitExpense, NewSplitGroup, SplitBalance, SplitExpense, SplitExpensePatch,
                SplitGroup, SplitGroupPatch,
            },
            transaction::{CategoryTotal, NewTransaction, Transaction, TransactionPatch},
        },
        money::Money,
        services::RupeeService,
    },
    infrastructure::{logging::in_memory::InMemoryLogging, storage::Storage},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

pub type AppService = RupeeService<InMemoryLogging, Box<dyn Storage>>;
type AppState = State<Arc<AppService>>;

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/friends", get(get_friends).post(add_friend))
        .route("/friends/balances", get(get_friend_balances))
        .route(
            "/friends/{friend_id}",
            get(get_friend).put(update_friend).delete(delete_friend),
        )
        .route("/friends/{friend_id}/entries", get(get_friend_entries))
        .route("/friends/{friend_id}/balance", get(get_friend_balance))
        .route("/friend-entries", get(get_all_friend_entries).post(add_friend_entry))
        .route(
            "/friend-entries/{entry_id}",
            put(update_friend_entry).delete(delete_friend_entry),
        )
        .route("/split-groups", get(get_split_groups).post(create_split_group))
        .route(
            "/split-groups/{group_id}",
            get(get_split_group).put(update_split_group).delete(delete_split_group),
        )
        .route("/split-groups/{group_id}/expenses", get(get_split_expenses))
        .route("/split-groups/{group_id}/positions", get(get_net_positions))
        .route("/split-groups/{group_id}/settlement", get(settle_group))
        .route("/split-expenses", post(add_split_expense))
        .route(
            "/split-expenses/{expense_id}",
            put(update_split_expense).delete(delete_split_expense),
        )
        .route("/transactions", get(get_transactions).post(add_transaction))
        .route("/transactions/search", get(search_transactions))
        .route("/transactions/range", get(filter_transactions_by_date))
        .route(
            "/transactions/{transaction_id}",
            get(get_transaction).put(update_transaction).delete(delete_transaction),
        )
        .route("/categories", get(get_categories).post(add_category))
        .route("/categories/totals", get(get_category_totals))
        .route(
            "/categories/{category_id}",
            put(update_category).delete(delete_category),
        )
        .route("/budgets", get(get_budgets).post(add_budget))
        .route(
            "/budgets/{budget_id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route("/budgets/{budget_id}/transactions", get(get_budget_transactions))
        .route("/budgets/{budget_id}/progress", get(get_budget_progress))
        .route("/budget-transactions", post(add_budget_transaction))
        .route(
            "/budget-transactions/{transaction_id}",
            put(update_budget_transaction).delete(delete_budget_transaction),
        )
        .route("/summary", get(get_summary))
        .route("/export", get(export_snapshot))
        .route("/import", post(import_snapshot))
        .route("/data", axum::routing::delete(clear_all))
        .route("/logs", get(get_app_logs))
        .with_state(service)
}

fn parse_query_date(field: &str, raw: Option<String>) -> Result<Option<NaiveDate>, RupeeError> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => flexible_date::parse(&raw).map(Some).ok_or_else(|| {
            RupeeError::validation(field, "Invalid Date", format!("`{}` is not a valid date", raw))
        }),
        _ => Ok(None),
    }
}

// Friends

#[utoipa::path(
    get,
    path = "/api/friends",
    responses((status = 200, description = "All friends with cached balances", body = Vec<Friend>))
)]
pub async fn get_friends(State(service): AppState) -> Json<Vec<Friend>> {
    Json(service.get_friends().await)
}

#[utoipa::path(
    post,
    path = "/api/friends",
    request_body = NewFriend,
    responses(
        (status = 201, description = "Friend created", body = Friend),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn add_friend(
    State(service): AppState,
    Json(req): Json<NewFriend>,
) -> Result<(StatusCode, Json<Friend>), ApiError> {
    let friend = service.add_friend(req).await?;
    Ok((StatusCode::CREATED, Json(friend)))
}

#[utoipa::path(
    get,
    path = "/api/friends/{friend_id}",
    params(("friend_id" = String, Path, description = "Friend ID")),
    responses(
        (status = 200, description = "Friend found", body = Friend),
        (status = 404, description = "Friend not found", body = ErrorResponse)
    )
)]
pub async fn get_friend(State(service): AppState, Path(friend_id): Path<String>) -> Result<Json<Friend>, ApiError> {
    Ok(Json(service.get_friend(&friend_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/friends/{friend_id}",
    params(("friend_id" = String, Path, description = "Friend ID")),
    request_body = FriendPatch,
    responses(
        (status = 200, description = "Friend updated", body = Friend),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Friend not found", body = ErrorResponse)
    )
)]
pub async fn update_friend(
    State(service): AppState,
    Path(friend_id): Path<String>,
    Json(req): Json<FriendPatch>,
) -> Result<Json<Friend>, ApiError> {
    Ok(Json(service.update_friend(&friend_id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/api/friends/{friend_id}",
    params(("friend_id" = String, Path, description = "Friend ID")),
    responses(
        (status = 204, description = "Friend and their entries deleted"),
        (status = 404, description = "Friend not found", body = ErrorResponse)
    )
)]
pub async fn delete_friend(State(service): AppState, Path(friend_id): Path<String>) -> Result<StatusCode, ApiError> {
    service.delete_friend(&friend_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/friends/{friend_id}/entries",
    params(("friend_id" = String, Path, description = "Friend ID")),
    responses(
        (status = 200, description = "Entries recorded with the friend", body = Vec<FriendTransaction>),
        (status = 404, description = "Friend not found", body = ErrorResponse)
    )
)]
pub async fn get_friend_entries(
    State(service): AppState,
    Path(friend_id): Path<String>,
) -> Result<Json<Vec<FriendTransaction>>, ApiError> {
    Ok(Json(service.get_friend_entries(&friend_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/friends/{friend_id}/balance",
    params(("friend_id" = String, Path, description = "Friend ID")),
    responses(
        (status = 200, description = "Signed balance with the friend", body = BalanceResponse),
        (status = 404, description = "Friend not found", body = ErrorResponse)
    )
)]
pub async fn get_friend_balance(
    State(service): AppState,
    Path(friend_id): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = service.get_friend_balance(&friend_id).await?;
    Ok(Json(BalanceResponse { friend_id, balance }))
}

#[utoipa::path(
    get,
    path = "/api/friends/balances",
    responses((status = 200, description = "Balance per friend id", body = BTreeMap<String, f64>))
)]
pub async fn get_friend_balances(State(service): AppState) -> Json<BTreeMap<String, Money>> {
    Json(service.get_friend_balances().await)
}

#[utoipa::path(
    get,
    path = "/api/friend-entries",
    responses((status = 200, description = "Every friend entry", body = Vec<FriendTransaction>))
)]
pub async fn get_all_friend_entries(State(service): AppState) -> Json<Vec<FriendTransaction>> {
    Json(service.get_all_friend_entries().await)
}

#[utoipa::path(
    post,
    path = "/api/friend-entries",
    request_body = NewFriendEntry,
    responses(
        (status = 201, description = "Entry recorded", body = FriendTransaction),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Friend not found", body = ErrorResponse)
    )
)]
pub async fn add_friend_entry(
    State(service): AppState,
    Json(req): Json<NewFriendEntry>,
) -> Result<(StatusCode, Json<FriendTransaction>), ApiError> {
    let entry = service.add_friend_entry(req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    put,
    path = "/api/friend-entries/{entry_id}",
    params(("entry_id" = String, Path, description = "Entry ID")),
    request_body = FriendEntryPatch,
    responses(
        (status = 200, description = "Entry updated", body = FriendTransaction),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Entry or friend not found", body = ErrorResponse)
    )
)]
pub async fn update_friend_entry(
    State(service): AppState,
    Path(entry_id): Path<String>,
    Json(req): Json<FriendEntryPatch>,
) -> Result<Json<FriendTransaction>, ApiError> {
    Ok(Json(service.update_friend_entry(&entry_id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/api/friend-entries/{entry_id}",
    params(("entry_id" = String, Path, description = "Entry ID")),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 404, description = "Entry not found", body = ErrorResponse)
    )
)]
pub async fn delete_friend_entry(State(service): AppState, Path(entry_id): Path<String>) -> Result<StatusCode, ApiError> {
    service.delete_friend_entry(&entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Split groups

#[utoipa::path(
    get,
    path = "/api/split-groups",
    responses((status = 200, description = "All split groups", body = Vec<SplitGroup>))
)]
pub async fn get_split_groups(State(service): AppState) -> Json<Vec<SplitGroup>> {
    Json(service.get_split_groups().await)
}

#[utoipa::path(
    post,
    path = "/api/split-groups",
    request_body = NewSplitGroup,
    responses(
        (status = 201, description = "Group created", body = SplitGroup),
        (status = 400, description = "Bad request", body = ErrorResponse)
    )
)]
pub async fn create_split_group(
    State(service): AppState,
    Json(req): Json<NewSplitGroup>,
) -> Result<(StatusCode, Json<SplitGroup>), ApiError> {
    let group = service.create_split_group(req).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    get,
    path = "/api/split-groups/{group_id}",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group found", body = SplitGroup),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn get_split_group(State(service): AppState, Path(group_id): Path<String>) -> Result<Json<SplitGroup>, ApiError> {
    Ok(Json(service.get_split_group(&group_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/split-groups/{group_id}",
    params(("group_id" = String, Path, description = "Group ID")),
    request_body = SplitGroupPatch,
    responses(
        (status = 200, description = "Group updated", body = SplitGroup),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn update_split_group(
    State(service): AppState,
    Path(group_id): Path<String>,
    Json(req): Json<SplitGroupPatch>,
) -> Result<Json<SplitGroup>, ApiError> {
    Ok(Json(service.update_split_group(&group_id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/api/split-groups/{group_id}",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 204, description = "Group and its expenses deleted"),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn delete_split_group(State(service): AppState, Path(group_id): Path<String>) -> Result<StatusCode, ApiError> {
    service.delete_split_group(&group_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/split-groups/{group_id}/expenses",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Expenses of the group", body = Vec<SplitExpense>),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn get_split_expenses(
    State(service): AppState,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<SplitExpense>>, ApiError> {
    Ok(Json(service.get_split_expenses(&group_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/split-groups/{group_id}/positions",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Net position per member", body = NetPositions),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn get_net_positions(
    State(service): AppState,
    Path(group_id): Path<String>,
) -> Result<Json<NetPositions>, ApiError> {
    Ok(Json(service.get_net_positions(&group_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/split-groups/{group_id}/settlement",
    params(("group_id" = String, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Transfers that settle the group", body = Vec<SplitBalance>),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn settle_group(
    State(service): AppState,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<SplitBalance>>, ApiError> {
    Ok(Json(service.settle_group(&group_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/split-expenses",
    request_body = NewSplitExpense,
    responses(
        (status = 201, description = "Expense recorded", body = SplitExpense),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    )
)]
pub async fn add_split_expense(
    State(service): AppState,
    Json(req): Json<NewSplitExpense>,
) -> Result<(StatusCode, Json<SplitExpense>), ApiError> {
    let expense = service.add_split_expense(req).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    put,
    path = "/api/split-expenses/{expense_id}",
    params(("expense_id" = String, Path, description = "Expense ID")),
    request_body = SplitExpensePatch,
    responses(
        (status = 200, description = "Expense updated", body = SplitExpense),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    )
)]
pub async fn update_split_expense(
    State(service): AppState,
    Path(expense_id): Path<String>,
    Json(req): Json<SplitExpensePatch>,
) -> Result<Json<SplitExpense>, ApiError> {
    Ok(Json(service.update_split_expense(&expense_id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/api/split-expenses/{expense_id}",
    params(("expense_id" = String, Path, description = "Expense ID")),
    responses(
        (status = 204, description = "Expense deleted"),
        (status = 404, description = "Expense not found", body = ErrorResponse)
    )
)]
pub async fn delete_split_expense(
    State(service): AppState,
    Path(expense_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete_split_expense(&expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Personal transactions

#[utoipa::path(
    get,
    path = "/api/transactions",
    responses((status = 200, description = "All transactions, newest first", body = Vec<Transaction>))
)]
pub async fn get_transactions(State(service): AppState) -> Json<Vec<Transaction>> {
    Json(service.get_transactions().await)
}

#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = NewTransaction,
    responses(
        (status = 201, description = "Transaction recorded", body = Transaction),
        (status = 400, description = "Bad request", body = ErrorResponse)
    )
)]
pub async fn add_transaction(
    State(service): AppState,
    Json(req): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let transaction = service.add_transaction(req).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[utoipa::path(
    get,
    path = "/api/transactions/{transaction_id}",
    params(("transaction_id" = String, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Transaction found", body = Transaction),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    )
)]
pub async fn get_transaction(
    State(service): AppState,
    Path(transaction_id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    Ok(Json(service.get_transaction(&transaction_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/transactions/{transaction_id}",
    params(("transaction_id" = String, Path, description = "Transaction ID")),
    request_body = TransactionPatch,
    responses(
        (status = 200, description = "Transaction updated", body = Transaction),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    )
)]
pub async fn update_transaction(
    State(service): AppState,
    Path(transaction_id): Path<String>,
    Json(req): Json<TransactionPatch>,
) -> Result<Json<Transaction>, ApiError> {
    Ok(Json(service.update_transaction(&transaction_id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/api/transactions/{transaction_id}",
    params(("transaction_id" = String, Path, description = "Transaction ID")),
    responses(
        (status = 204, description = "Transaction deleted"),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    )
)]
pub async fn delete_transaction(
    State(service): AppState,
    Path(transaction_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete_transaction(&transaction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/transactions/search",
    params(("q" = String, Query, description = "Matches category, note or amount")),
    responses((status = 200, description = "Matching transactions", body = Vec<Transaction>))
)]
pub async fn search_transactions(State(service): AppState, Query(query): Query<SearchQuery>) -> Json<Vec<Transaction>> {
    Json(service.search_transactions(&query.q).await)
}

#[utoipa::path(
    get,
    path = "/api/transactions/range",
    params(
        ("start" = Option<String>, Query, description = "First day, inclusive"),
        ("end" = Option<String>, Query, description = "Last day, inclusive")
    ),
    responses(
        (status = 200, description = "Transactions dated within the range", body = Vec<Transaction>),
        (status = 400, description = "Invalid date", body = ErrorResponse)
    )
)]
pub async fn filter_transactions_by_date(
    State(service): AppState,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let start = parse_query_date("start", query.start)?;
    let end = parse_query_date("end", query.end)?;
    Ok(Json(service.filter_transactions_by_date(start, end).await))
}

// Categories

#[utoipa::path(
    get,
    path = "/api/categories",
    params(("type" = Option<String>, Query, description = "`income` or `expense`")),
    responses((status = 200, description = "Built-in and custom categories", body = Vec<Category>))
)]
pub async fn get_categories(State(service): AppState, Query(query): Query<TypeQuery>) -> Json<Vec<Category>> {
    Json(service.get_categories(query.transaction_type).await)
}

#[utoipa::path(
    get,
    path = "/api/categories/totals",
    params(("type" = Option<String>, Query, description = "`income` or `expense`")),
    responses((status = 200, description = "Total and count per category", body = BTreeMap<String, CategoryTotal>))
)]
pub async fn get_category_totals(
    State(service): AppState,
    Query(query): Query<TypeQuery>,
) -> Json<BTreeMap<String, CategoryTotal>> {
    Json(service.get_category_totals(query.transaction_type).await)
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = NewCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Bad request", body = ErrorResponse)
    )
)]
pub async fn add_category(
    State(service): AppState,
    Json(req): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = service.add_category(req).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/api/categories/{category_id}",
    params(("category_id" = String, Path, description = "Category ID")),
    request_body = CategoryPatch,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Built-in categories are read-only", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn update_category(
    State(service): AppState,
    Path(category_id): Path<String>,
    Json(req): Json<CategoryPatch>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(service.update_category(&category_id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{category_id}",
    params(("category_id" = String, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Built-in categories are read-only", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
pub async fn delete_category(State(service): AppState, Path(category_id): Path<String>) -> Result<StatusCode, ApiError> {
    service.delete_category(&category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Budgets

#[utoipa::path(
    get,
    path = "/api/budgets",
    responses((status = 200, description = "All budgets", body = Vec<Budget>))
)]
pub async fn get_budgets(State(service): AppState) -> Json<Vec<Budget>> {
    Json(service.get_budgets().await)
}

#[utoipa::path(
    post,
    path = "/api/budgets",
    request_body = NewBudget,
    responses(
        (status = 201, description = "Budget created", body = Budget),
        (status = 400, description = "Bad request", body = ErrorResponse)
    )
)]
pub async fn add_budget(
    State(service): AppState,
    Json(req): Json<NewBudget>,
) -> Result<(StatusCode, Json<Budget>), ApiError> {
    let budget = service.add_budget(req).await?;
    Ok((StatusCode::CREATED, Json(budget)))
}

#[utoipa::path(
    get,
    path = "/api/budgets/{budget_id}",
    params(("budget_id" = String, Path, description = "Budget ID")),
    responses(
        (status = 200, description = "Budget found", body = Budget),
        (status = 404, description = "Budget not found", body = ErrorResponse)
    )
)]
pub async fn get_budget(State(service): AppState, Path(budget_id): Path<String>) -> Result<Json<Budget>, ApiError> {
    Ok(Json(service.get_budget(&budget_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/budgets/{budget_id}",
    params(("budget_id" = String, Path, description = "Budget ID")),
    request_body = BudgetPatch,
    responses(
        (status = 200, description = "Budget updated", body = Budget),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Budget not found", body = ErrorResponse)
    )
)]
pub async fn update_budget(
    State(service): AppState,
    Path(budget_id): Path<String>,
    Json(req): Json<BudgetPatch>,
) -> Result<Json<Budget>, ApiError> {
    Ok(Json(service.update_budget(&budget_id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/api/budgets/{budget_id}",
    params(("budget_id" = String, Path, description = "Budget ID")),
    responses(
        (status = 204, description = "Budget and its transactions deleted"),
        (status = 404, description = "Budget not found", body = ErrorResponse)
    )
)]
pub async fn delete_budget(State(service): AppState, Path(budget_id): Path<String>) -> Result<StatusCode, ApiError> {
    service.delete_budget(&budget_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/budgets/{budget_id}/transactions",
    params(("budget_id" = String, Path, description = "Budget ID")),
    responses(
        (status = 200, description = "Spending recorded against the budget", body = Vec<BudgetTransaction>),
        (status = 404, description = "Budget not found", body = ErrorResponse)
    )
)]
pub async fn get_budget_transactions(
    State(service): AppState,
    Path(budget_id): Path<String>,
) -> Result<Json<Vec<BudgetTransaction>>, ApiError> {
    Ok(Json(service.get_budget_transactions(&budget_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/budgets/{budget_id}/progress",
    params(("budget_id" = String, Path, description = "Budget ID")),
    responses(
        (status = 200, description = "Spent, remaining and percentage used", body = BudgetProgress),
        (status = 404, description = "Budget not found", body = ErrorResponse)
    )
)]
pub async fn get_budget_progress(
    State(service): AppState,
    Path(budget_id): Path<String>,
) -> Result<Json<BudgetProgress>, ApiError> {
    Ok(Json(service.get_budget_progress(&budget_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/budget-transactions",
    request_body = NewBudgetTransaction,
    responses(
        (status = 201, description = "Spending recorded and mirrored as an expense", body = BudgetTransaction),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Budget not found", body = ErrorResponse)
    )
)]
pub async fn add_budget_transaction(
    State(service): AppState,
    Json(req): Json<NewBudgetTransaction>,
) -> Result<(StatusCode, Json<BudgetTransaction>), ApiError> {
    let transaction = service.add_budget_transaction(req).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

#[utoipa::path(
    put,
    path = "/api/budget-transactions/{transaction_id}",
    params(("transaction_id" = String, Path, description = "Budget transaction ID")),
    request_body = BudgetTransactionPatch,
    responses(
        (status = 200, description = "Budget transaction updated", body = BudgetTransaction),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Budget transaction not found", body = ErrorResponse)
    )
)]
pub async fn update_budget_transaction(
    State(service): AppState,
    Path(transaction_id): Path<String>,
    Json(req): Json<BudgetTransactionPatch>,
) -> Result<Json<BudgetTransaction>, ApiError> {
    Ok(Json(service.update_budget_transaction(&transaction_id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/api/budget-transactions/{transaction_id}",
    params(("transaction_id" = String, Path, description = "Budget transaction ID")),
    responses(
        (status = 204, description = "Budget transaction deleted"),
        (status = 404, description = "Budget transaction not found", body = ErrorResponse)
    )
)]
pub async fn delete_budget_transaction(
    State(service): AppState,
    Path(transaction_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete_budget_transaction(&transaction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Analytics and data management

#[utoipa::path(
    get,
    path = "/api/summary",
    responses((status = 200, description = "Income, expense, savings rate and breakdown", body = Summary))
)]
pub async fn get_summary(State(service): AppState) -> Json<Summary> {
    Json(service.get_summary().await)
}

#[utoipa::path(
    get,
    path = "/api/export",
    responses((status = 200, description = "Backup document", body = ExportDocument))
)]
pub async fn export_snapshot(State(service): AppState) -> Json<ExportDocument> {
    Json(service.export_snapshot().await)
}

#[utoipa::path(
    post,
    path = "/api/import",
    request_body = ImportRequest,
    responses(
        (status = 200, description = "Data replaced", body = ImportReport),
        (status = 400, description = "Malformed document or records dropped", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn import_snapshot(
    State(service): AppState,
    Json(req): Json<ImportRequest>,
) -> Result<Json<ImportReport>, ApiError> {
    let report = service
        .import_snapshot(&req.document.to_string(), req.allow_partial)
        .await?;
    Ok(Json(report))
}

#[utoipa::path(
    delete,
    path = "/api/data",
    responses(
        (status = 204, description = "All data cleared"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn clear_all(State(service): AppState) -> Result<StatusCode, ApiError> {
    service.clear_all().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Audit log", body = Vec<AppLog>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_app_logs(State(service): AppState) -> Result<Json<Vec<AppLog>>, ApiError> {
    Ok(Json(service.get_app_logs().await?))
}
