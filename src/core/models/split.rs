use super::flexible_date;
use crate::core::money::Money;
use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SplitGroup {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Member ids in insertion order; settlement walks them in this order.
    pub members: Vec<String>,
    #[serde(default)]
    pub total_amount: Money,
    pub created_at: DateTime<Utc>,
}

impl SplitGroup {
    pub fn has_member(&self, member_id: &str) -> bool {
        self.members.iter().any(|m| m == member_id)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SplitExpense {
    pub id: String,
    pub split_group_id: String,
    pub description: String,
    pub amount: Money,
    pub paid_by: String,
    pub split_among: Vec<String>,
    #[serde(with = "flexible_date")]
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// One transfer instruction of a settlement plan.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SplitBalance {
    pub from_friend: String,
    pub to_friend: String,
    pub amount: Money,
}

/// Net position per member, in `group.members` order. Serializes as a JSON object.
#[derive(Clone, Debug, Default, PartialEq, Eq, ToSchema)]
#[schema(value_type = std::collections::HashMap<String, f64>)]
pub struct NetPositions(Vec<(String, Money)>);

impl NetPositions {
    pub fn new(positions: Vec<(String, Money)>) -> Self {
        NetPositions(positions)
    }

    pub fn get(&self, member_id: &str) -> Option<Money> {
        self.0.iter().find(|(id, _)| id == member_id).map(|(_, m)| *m)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> {
        self.0.iter().map(|(id, m)| (id.as_str(), *m))
    }

    pub fn total(&self) -> Money {
        self.0.iter().map(|(_, m)| *m).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for NetPositions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, position) in &self.0 {
            map.serialize_entry(id, position)?;
        }
        map.end()
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSplitGroup {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SplitGroupPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub members: Option<Vec<String>>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSplitExpense {
    pub split_group_id: String,
    pub description: String,
    pub amount: Money,
    pub paid_by: String,
    pub split_among: Vec<String>,
    #[serde(with = "flexible_date")]
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SplitExpensePatch {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub paid_by: Option<String>,
    pub split_among: Option<Vec<String>>,
    #[serde(default, with = "flexible_date::option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
}
