//! Friend ledger: bilateral lent/borrowed entries and the signed balance per friend.
//!
//! `Friend::total_balance` is a cache of [`balance_of`]. Every mutation that touches an
//! entry recomputes the cache for each friend whose entry set changed, in the same call.

use crate::core::errors::RupeeError;
use crate::core::models::friend::{
    Friend, FriendEntryPatch, FriendPatch, FriendTransaction, NewFriend, NewFriendEntry,
};
use crate::core::models::new_id;
use crate::core::money::Money;
use crate::core::validation::{validate_amount_input, validate_name, validate_optional_text};
use chrono::Utc;
use log::{debug, warn};
use std::collections::BTreeMap;

/// `Σ lent − Σ borrowed` over one friend's entries. Positive means the friend owes the user.
pub fn balance_of(entries: &[FriendTransaction], friend_id: &str) -> Money {
    entries
        .iter()
        .filter(|e| e.friend_id == friend_id)
        .fold(Money::ZERO, |balance, e| balance + e.signed_amount())
}

/// A stored entry must carry a positive amount; its direction comes from `entry_type`.
pub fn check_entry(entry: &FriendTransaction) -> Result<(), RupeeError> {
    validate_amount_input("amount", entry.amount)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FriendLedger {
    friends: Vec<Friend>,
    entries: Vec<FriendTransaction>,
}

impl FriendLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from stored collections. Entries pointing at unknown friends are
    /// discarded and every cached balance is recomputed from the remaining log.
    pub fn from_parts(friends: Vec<Friend>, entries: Vec<FriendTransaction>) -> Self {
        let (entries, orphans): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .partition(|e| friends.iter().any(|f| f.id == e.friend_id));
        if !orphans.is_empty() {
            warn!("Discarding {} friend transactions with no friend", orphans.len());
        }
        let mut ledger = FriendLedger { friends, entries };
        ledger.recompute_all();
        ledger
    }

    pub fn friends(&self) -> &[Friend] {
        &self.friends
    }

    pub fn entries(&self) -> &[FriendTransaction] {
        &self.entries
    }

    pub fn friend(&self, friend_id: &str) -> Result<&Friend, RupeeError> {
        self.friends
            .iter()
            .find(|f| f.id == friend_id)
            .ok_or_else(|| RupeeError::FriendNotFound(friend_id.to_string()))
    }

    pub fn entry(&self, entry_id: &str) -> Result<&FriendTransaction, RupeeError> {
        self.entries
            .iter()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| RupeeError::EntryNotFound(entry_id.to_string()))
    }

    /// Entries for one friend in insertion order; empty for unknown friends.
    pub fn entries_of(&self, friend_id: &str) -> Vec<FriendTransaction> {
        self.entries
            .iter()
            .filter(|e| e.friend_id == friend_id)
            .cloned()
            .collect()
    }

    pub fn balance_of(&self, friend_id: &str) -> Money {
        balance_of(&self.entries, friend_id)
    }

    pub fn balances(&self) -> BTreeMap<String, Money> {
        self.friends
            .iter()
            .map(|f| (f.id.clone(), self.balance_of(&f.id)))
            .collect()
    }

    pub fn add_friend(&mut self, new_friend: NewFriend) -> Result<Friend, RupeeError> {
        validate_name("name", &new_friend.name)?;
        let friend = Friend {
            id: new_id(),
            name: new_friend.name.trim().to_string(),
            phone: new_friend.phone.filter(|p| !p.trim().is_empty()),
            avatar: new_friend.avatar.filter(|a| !a.trim().is_empty()),
            total_balance: Money::ZERO,
            created_at: Utc::now(),
        };
        self.friends.push(friend.clone());
        debug!("Friend {} added", friend.id);
        Ok(friend)
    }

    pub fn update_friend(&mut self, friend_id: &str, patch: FriendPatch) -> Result<Friend, RupeeError> {
        if let Some(ref name) = patch.name {
            validate_name("name", name)?;
        }
        let friend = self
            .friends
            .iter_mut()
            .find(|f| f.id == friend_id)
            .ok_or_else(|| RupeeError::FriendNotFound(friend_id.to_string()))?;
        if let Some(name) = patch.name {
            friend.name = name.trim().to_string();
        }
        if let Some(phone) = patch.phone {
            friend.phone = Some(phone).filter(|p| !p.trim().is_empty());
        }
        if let Some(avatar) = patch.avatar {
            friend.avatar = Some(avatar).filter(|a| !a.trim().is_empty());
        }
        Ok(friend.clone())
    }

    /// Removes the friend's entries first, then the friend. Returns how many entries went.
    pub fn delete_friend(&mut self, friend_id: &str) -> Result<usize, RupeeError> {
        self.friend(friend_id)?;
        let before = self.entries.len();
        self.entries.retain(|e| e.friend_id != friend_id);
        let removed = before - self.entries.len();
        self.friends.retain(|f| f.id != friend_id);
        debug!("Friend {} deleted with {} entries", friend_id, removed);
        Ok(removed)
    }

    pub fn add_entry(&mut self, new_entry: NewFriendEntry) -> Result<FriendTransaction, RupeeError> {
        validate_amount_input("amount", new_entry.amount)?;
        validate_optional_text("description", new_entry.description.as_deref())?;
        self.friend(&new_entry.friend_id)?;

        let entry = FriendTransaction {
            id: new_id(),
            friend_id: new_entry.friend_id,
            entry_type: new_entry.entry_type,
            amount: new_entry.amount,
            description: new_entry.description.filter(|d| !d.trim().is_empty()),
            date: new_entry.date,
            created_at: Utc::now(),
        };
        self.entries.push(entry.clone());
        self.recompute(&entry.friend_id);
        Ok(entry)
    }

    pub fn update_entry(
        &mut self,
        entry_id: &str,
        patch: FriendEntryPatch,
    ) -> Result<FriendTransaction, RupeeError> {
        let current = self.entry(entry_id)?.clone();
        if let Some(amount) = patch.amount {
            validate_amount_input("amount", amount)?;
        }
        validate_optional_text("description", patch.description.as_deref())?;
        if let Some(ref friend_id) = patch.friend_id {
            self.friend(friend_id)?;
        }

        let updated = FriendTransaction {
            friend_id: patch.friend_id.unwrap_or_else(|| current.friend_id.clone()),
            entry_type: patch.entry_type.unwrap_or(current.entry_type),
            amount: patch.amount.unwrap_or(current.amount),
            description: match patch.description {
                Some(d) => Some(d).filter(|d| !d.trim().is_empty()),
                None => current.description.clone(),
            },
            date: patch.date.unwrap_or(current.date),
            ..current.clone()
        };
        if let Some(slot) = self.entries.iter_mut().find(|e| e.id == entry_id) {
            *slot = updated.clone();
        }

        self.recompute(&current.friend_id);
        if updated.friend_id != current.friend_id {
            self.recompute(&updated.friend_id);
        }
        Ok(updated)
    }

    pub fn delete_entry(&mut self, entry_id: &str) -> Result<FriendTransaction, RupeeError> {
        let position = self
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or_else(|| RupeeError::EntryNotFound(entry_id.to_string()))?;
        let removed = self.entries.remove(position);
        self.recompute(&removed.friend_id);
        Ok(removed)
    }

    fn recompute(&mut self, friend_id: &str) {
        let balance = balance_of(&self.entries, friend_id);
        if let Some(friend) = self.friends.iter_mut().find(|f| f.id == friend_id) {
            friend.total_balance = balance;
            debug!("Friend {} balance recomputed: {}", friend_id, balance);
        }
    }

    fn recompute_all(&mut self) {
        let ids: Vec<String> = self.friends.iter().map(|f| f.id.clone()).collect();
        for id in ids {
            self.recompute(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::friend::EntryType;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn rupees(r: i64) -> Money {
        Money::from_minor(r * 100)
    }

    fn entry(friend_id: &str, entry_type: EntryType, amount: Money, d: u32) -> NewFriendEntry {
        NewFriendEntry {
            friend_id: friend_id.to_string(),
            entry_type,
            amount,
            date: day(d),
            description: None,
        }
    }

    fn ledger_with(name: &str) -> (FriendLedger, String) {
        let mut ledger = FriendLedger::new();
        let friend = ledger
            .add_friend(NewFriend {
                name: name.to_string(),
                ..Default::default()
            })
            .unwrap();
        (ledger, friend.id)
    }

    #[test]
    fn lent_minus_borrowed() {
        let (mut ledger, alice) = ledger_with("Alice");
        ledger.add_entry(entry(&alice, EntryType::Lent, rupees(500), 1)).unwrap();
        ledger.add_entry(entry(&alice, EntryType::Borrowed, rupees(200), 2)).unwrap();

        assert_eq!(ledger.balance_of(&alice), rupees(300));
        assert_eq!(ledger.friend(&alice).unwrap().total_balance, rupees(300));
    }

    #[test]
    fn balance_ignores_insertion_order() {
        let (mut forward, a) = ledger_with("A");
        let (mut backward, b) = ledger_with("B");
        let amounts = [(EntryType::Lent, 120), (EntryType::Borrowed, 75), (EntryType::Lent, 3)];
        for (t, r) in amounts {
            forward.add_entry(entry(&a, t, rupees(r), 1)).unwrap();
        }
        for (t, r) in amounts.iter().rev() {
            backward.add_entry(entry(&b, *t, rupees(*r), 1)).unwrap();
        }
        assert_eq!(forward.balance_of(&a), backward.balance_of(&b));
        assert_eq!(forward.balance_of(&a), forward.balance_of(&a));
    }

    #[test]
    fn non_positive_amount_leaves_ledger_unchanged() {
        let (mut ledger, alice) = ledger_with("Alice");
        let before = ledger.clone();
        for amount in [Money::ZERO, rupees(-10)] {
            let result = ledger.add_entry(entry(&alice, EntryType::Lent, amount, 1));
            assert!(matches!(result, Err(RupeeError::Validation(..))));
        }
        assert_eq!(ledger, before);
    }

    #[test]
    fn entry_for_unknown_friend_is_not_found() {
        let mut ledger = FriendLedger::new();
        let result = ledger.add_entry(entry("ghost", EntryType::Lent, rupees(1), 1));
        assert_eq!(result, Err(RupeeError::FriendNotFound("ghost".to_string())));
    }

    #[test]
    fn moving_an_entry_recomputes_both_friends() {
        let (mut ledger, alice) = ledger_with("Alice");
        let bob = ledger
            .add_friend(NewFriend {
                name: "Bob".to_string(),
                ..Default::default()
            })
            .unwrap()
            .id;
        let lent = ledger.add_entry(entry(&alice, EntryType::Lent, rupees(40), 1)).unwrap();

        ledger
            .update_entry(
                &lent.id,
                FriendEntryPatch {
                    friend_id: Some(bob.clone()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(ledger.friend(&alice).unwrap().total_balance, Money::ZERO);
        assert_eq!(ledger.friend(&bob).unwrap().total_balance, rupees(40));
    }

    #[test]
    fn update_unknown_entry_is_not_found() {
        let (mut ledger, _) = ledger_with("Alice");
        let result = ledger.update_entry("nope", FriendEntryPatch::default());
        assert_eq!(result, Err(RupeeError::EntryNotFound("nope".to_string())));
    }

    #[test]
    fn delete_entry_recomputes() {
        let (mut ledger, alice) = ledger_with("Alice");
        let lent = ledger.add_entry(entry(&alice, EntryType::Lent, rupees(10), 1)).unwrap();
        ledger.add_entry(entry(&alice, EntryType::Borrowed, rupees(4), 2)).unwrap();

        ledger.delete_entry(&lent.id).unwrap();
        assert_eq!(ledger.friend(&alice).unwrap().total_balance, rupees(-4));
    }

    #[test]
    fn deleting_friend_cascades() {
        let (mut ledger, alice) = ledger_with("Alice");
        ledger.add_entry(entry(&alice, EntryType::Lent, rupees(500), 1)).unwrap();
        ledger.add_entry(entry(&alice, EntryType::Borrowed, rupees(200), 2)).unwrap();

        assert_eq!(ledger.delete_friend(&alice).unwrap(), 2);
        assert!(ledger.entries_of(&alice).is_empty());
        assert!(ledger.entries().is_empty());
        assert!(ledger.friend(&alice).is_err());
    }

    #[test]
    fn from_parts_drops_orphans_and_recomputes() {
        let (mut ledger, alice) = ledger_with("Alice");
        ledger.add_entry(entry(&alice, EntryType::Lent, rupees(9), 1)).unwrap();
        let mut friends = ledger.friends().to_vec();
        friends[0].total_balance = rupees(1_000);
        let mut entries = ledger.entries().to_vec();
        let mut orphan = entries[0].clone();
        orphan.id = "orphan".to_string();
        orphan.friend_id = "gone".to_string();
        entries.push(orphan);

        let rebuilt = FriendLedger::from_parts(friends, entries);
        assert_eq!(rebuilt.entries().len(), 1);
        assert_eq!(rebuilt.friend(&alice).unwrap().total_balance, rupees(9));
    }
}
