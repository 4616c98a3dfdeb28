use super::flexible_date;
use crate::core::money::Money;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_amount: Money,
    #[serde(default)]
    pub spent_amount: Money,
    pub category: String,
    #[serde(with = "flexible_date")]
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[serde(with = "flexible_date")]
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTransaction {
    pub id: String,
    pub budget_id: String,
    pub amount: Money,
    pub description: String,
    #[serde(with = "flexible_date")]
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub name: String,
    pub description: Option<String>,
    pub target_amount: Money,
    pub category: String,
    #[serde(with = "flexible_date")]
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[serde(with = "flexible_date")]
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<Money>,
    pub category: Option<String>,
    #[serde(default, with = "flexible_date::option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "flexible_date::option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBudgetTransaction {
    pub budget_id: String,
    pub amount: Money,
    pub description: String,
    #[serde(with = "flexible_date")]
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTransactionPatch {
    pub budget_id: Option<String>,
    pub amount: Option<Money>,
    pub description: Option<String>,
    #[serde(default, with = "flexible_date::option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub budget_id: String,
    pub target: Money,
    pub spent: Money,
    /// Negative once the budget is overspent.
    pub remaining: Money,
    pub percent_used: f64,
}
