use super::transaction::TransactionType;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
    Both,
}

impl CategoryKind {
    pub fn applies_to(self, transaction_type: TransactionType) -> bool {
        match self {
            CategoryKind::Both => true,
            CategoryKind::Income => transaction_type == TransactionType::Income,
            CategoryKind::Expense => transaction_type == TransactionType::Expense,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<CategoryKind>,
}

const DEFAULTS: [(&str, &str, &str, &str, CategoryKind); 16] = [
    ("1", "Food & Dining", "🍽️", "#FF6B6B", CategoryKind::Expense),
    ("2", "Transportation", "🚗", "#4ECDC4", CategoryKind::Expense),
    ("3", "Shopping", "🛍️", "#45B7D1", CategoryKind::Expense),
    ("4", "Entertainment", "🎬", "#96CEB4", CategoryKind::Expense),
    ("5", "Bills & Utilities", "💡", "#FECA57", CategoryKind::Expense),
    ("6", "Healthcare", "🏥", "#FF9FF3", CategoryKind::Expense),
    ("7", "Education", "📚", "#54A0FF", CategoryKind::Expense),
    ("8", "Travel", "✈️", "#5F27CD", CategoryKind::Expense),
    ("9", "Groceries", "🛒", "#00D2D3", CategoryKind::Expense),
    ("10", "Personal Care", "💄", "#FF9FF3", CategoryKind::Expense),
    ("11", "Salary", "💼", "#26de81", CategoryKind::Income),
    ("12", "Freelance", "💻", "#2bcbba", CategoryKind::Income),
    ("13", "Investment", "📈", "#0fb9b1", CategoryKind::Income),
    ("14", "Business", "🏢", "#20bf6b", CategoryKind::Income),
    ("15", "Gift", "🎁", "#26de81", CategoryKind::Income),
    ("16", "Other Income", "💰", "#2bcbba", CategoryKind::Income),
];

/// Built-in categories; these cannot be edited or removed.
pub fn default_categories() -> Vec<Category> {
    DEFAULTS
        .iter()
        .map(|(id, name, icon, color, kind)| Category {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            kind: *kind,
        })
        .collect()
}

pub fn is_default_category(id: &str) -> bool {
    DEFAULTS.iter().any(|(default_id, ..)| *default_id == id)
}
