use super::flexible_date;
use crate::core::money::Money;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// The user gave money; the friend owes it back.
    Lent,
    /// The user received money; the user owes it back.
    Borrowed,
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EntryType::Lent => "lent",
            EntryType::Borrowed => "borrowed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Positive when the friend owes the user.
    #[serde(default)]
    pub total_balance: Money,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FriendTransaction {
    pub id: String,
    pub friend_id: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "flexible_date")]
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl FriendTransaction {
    /// Contribution to the friend's balance.
    pub fn signed_amount(&self) -> Money {
        match self.entry_type {
            EntryType::Lent => self.amount,
            EntryType::Borrowed => -self.amount,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewFriend {
    pub name: String,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FriendPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewFriendEntry {
    pub friend_id: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub amount: Money,
    #[serde(with = "flexible_date")]
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FriendEntryPatch {
    pub friend_id: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: Option<EntryType>,
    pub amount: Option<Money>,
    #[serde(default, with = "flexible_date::option")]
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}
