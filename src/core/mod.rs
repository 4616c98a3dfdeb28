pub mod aggregation;
pub mod budgets;
pub mod errors;
pub mod expenses;
pub mod import;
pub mod ledger;
pub mod models;
pub mod money;
pub mod services;
pub mod settlement;
pub mod validation;
