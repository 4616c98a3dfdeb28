// Audit actions
pub const FRIEND_ADDED: &str = "FRIEND_ADDED";
pub const FRIEND_UPDATED: &str = "FRIEND_UPDATED";
pub const FRIEND_DELETED: &str = "FRIEND_DELETED";
pub const FRIEND_ENTRY_ADDED: &str = "FRIEND_ENTRY_ADDED";
pub const FRIEND_ENTRY_UPDATED: &str = "FRIEND_ENTRY_UPDATED";
pub const FRIEND_ENTRY_DELETED: &str = "FRIEND_ENTRY_DELETED";
pub const GROUP_CREATED: &str = "GROUP_CREATED";
pub const GROUP_UPDATED: &str = "GROUP_UPDATED";
pub const GROUP_DELETED: &str = "GROUP_DELETED";
pub const EXPENSE_ADDED: &str = "EXPENSE_ADDED";
pub const EXPENSE_UPDATED: &str = "EXPENSE_UPDATED";
pub const EXPENSE_DELETED: &str = "EXPENSE_DELETED";
pub const TRANSACTION_ADDED: &str = "TRANSACTION_ADDED";
pub const TRANSACTION_UPDATED: &str = "TRANSACTION_UPDATED";
pub const TRANSACTION_DELETED: &str = "TRANSACTION_DELETED";
pub const CATEGORY_ADDED: &str = "CATEGORY_ADDED";
pub const CATEGORY_UPDATED: &str = "CATEGORY_UPDATED";
pub const CATEGORY_DELETED: &str = "CATEGORY_DELETED";
pub const BUDGET_ADDED: &str = "BUDGET_ADDED";
pub const BUDGET_UPDATED: &str = "BUDGET_UPDATED";
pub const BUDGET_DELETED: &str = "BUDGET_DELETED";
pub const BUDGET_TRANSACTION_ADDED: &str = "BUDGET_TRANSACTION_ADDED";
pub const BUDGET_TRANSACTION_UPDATED: &str = "BUDGET_TRANSACTION_UPDATED";
pub const BUDGET_TRANSACTION_DELETED: &str = "BUDGET_TRANSACTION_DELETED";
pub const DATA_IMPORTED: &str = "DATA_IMPORTED";
pub const DATA_CLEARED: &str = "DATA_CLEARED";

// Storage collections
pub const TRANSACTIONS_KEY: &str = "transactions";
pub const BUDGETS_KEY: &str = "budgets";
pub const BUDGET_TRANSACTIONS_KEY: &str = "budget-transactions";
pub const SPLIT_GROUPS_KEY: &str = "split-groups";
pub const SPLIT_EXPENSES_KEY: &str = "split-expenses";
pub const FRIENDS_KEY: &str = "friends";
pub const FRIEND_TRANSACTIONS_KEY: &str = "friend-transactions";
pub const CUSTOM_CATEGORIES_KEY: &str = "custom-categories";

pub const ALL_COLLECTIONS: [&str; 8] = [
    TRANSACTIONS_KEY,
    BUDGETS_KEY,
    BUDGET_TRANSACTIONS_KEY,
    SPLIT_GROUPS_KEY,
    SPLIT_EXPENSES_KEY,
    FRIENDS_KEY,
    FRIEND_TRANSACTIONS_KEY,
    CUSTOM_CATEGORIES_KEY,
];
