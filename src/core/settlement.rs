//! Split groups: shared expenses, per-member net positions and the transfer plan that
//! settles them.
//!
//! Iteration order everywhere is `SplitGroup::members` insertion order. It decides which
//! creditor/debtor pairs the greedy plan matches, never the total amount moved.

use crate::core::errors::RupeeError;
use crate::core::models::new_id;
use crate::core::models::split::{
    NetPositions, NewSplitExpense, NewSplitGroup, SplitBalance, SplitExpense, SplitExpensePatch, SplitGroup,
    SplitGroupPatch,
};
use crate::core::money::{Money, TOLERANCE_MINOR};
use crate::core::validation::{validate_amount_input, validate_description, validate_name, validate_optional_text};
use chrono::Utc;
use log::{debug, warn};
use std::collections::HashSet;

/// Payer is credited the full amount, every splitter is debited an equal share.
/// Shares are whole paise; leftover paise go to the leading splitters so the positions
/// always add up to exactly zero.
pub fn net_positions(group: &SplitGroup, expenses: &[SplitExpense]) -> NetPositions {
    let mut positions: Vec<(String, Money)> = group.members.iter().map(|m| (m.clone(), Money::ZERO)).collect();

    let mut apply = |member: &str, delta: Money| match positions.iter_mut().find(|(id, _)| id == member) {
        Some((_, position)) => *position += delta,
        None => positions.push((member.to_string(), delta)),
    };

    for expense in expenses.iter().filter(|e| e.split_group_id == group.id) {
        if expense.split_among.is_empty() {
            warn!("Skipping expense {} with an empty split set", expense.id);
            continue;
        }
        apply(expense.paid_by.as_str(), expense.amount);
        let shares = expense.amount.split_evenly(expense.split_among.len());
        for (member, share) in expense.split_among.iter().zip(shares) {
            apply(member.as_str(), -share);
        }
    }

    debug!("Net positions for group {}: {:?}", group.id, positions);
    NetPositions::new(positions)
}

/// Greedy debt netting. Each creditor, in order, is paid by the debtors in order until
/// one side runs out. Transfers of a paisa or less are not emitted.
pub fn settle(positions: &NetPositions) -> Vec<SplitBalance> {
    let mut creditors: Vec<(&str, Money)> = positions.iter().filter(|(_, p)| p.is_positive()).collect();
    let mut debtors: Vec<(&str, Money)> = positions
        .iter()
        .filter(|(_, p)| p.is_negative())
        .map(|(id, p)| (id, -p))
        .collect();

    let mut transfers = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < creditors.len() && j < debtors.len() {
        let (creditor_id, credit) = creditors[i];
        let (debtor_id, debt) = debtors[j];
        let amount = credit.min(debt);

        if amount.minor() > TOLERANCE_MINOR {
            transfers.push(SplitBalance {
                from_friend: debtor_id.to_string(),
                to_friend: creditor_id.to_string(),
                amount,
            });
        }

        creditors[i].1 -= amount;
        debtors[j].1 -= amount;

        if creditors[i].1 == Money::ZERO {
            i += 1;
        }
        if debtors[j].1 == Money::ZERO {
            j += 1;
        }
    }

    debug!("Settlement plan: {:?}", transfers);
    transfers
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SplitBook {
    groups: Vec<SplitGroup>,
    expenses: Vec<SplitExpense>,
}

impl SplitBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds from stored collections, discarding expenses whose group is gone and
    /// recomputing every group total.
    pub fn from_parts(groups: Vec<SplitGroup>, expenses: Vec<SplitExpense>) -> Self {
        let (expenses, orphans): (Vec<_>, Vec<_>) = expenses
            .into_iter()
            .partition(|e| groups.iter().any(|g| g.id == e.split_group_id));
        if !orphans.is_empty() {
            warn!("Discarding {} split expenses with no group", orphans.len());
        }
        let mut book = SplitBook { groups, expenses };
        let ids: Vec<String> = book.groups.iter().map(|g| g.id.clone()).collect();
        for id in ids {
            book.recompute_total(&id);
        }
        book
    }

    pub fn groups(&self) -> &[SplitGroup] {
        &self.groups
    }

    pub fn expenses(&self) -> &[SplitExpense] {
        &self.expenses
    }

    pub fn group(&self, group_id: &str) -> Result<&SplitGroup, RupeeError> {
        self.groups
            .iter()
            .find(|g| g.id == group_id)
            .ok_or_else(|| RupeeError::GroupNotFound(group_id.to_string()))
    }

    pub fn expense(&self, expense_id: &str) -> Result<&SplitExpense, RupeeError> {
        self.expenses
            .iter()
            .find(|e| e.id == expense_id)
            .ok_or_else(|| RupeeError::ExpenseNotFound(expense_id.to_string()))
    }

    pub fn expenses_of(&self, group_id: &str) -> Vec<SplitExpense> {
        self.expenses
            .iter()
            .filter(|e| e.split_group_id == group_id)
            .cloned()
            .collect()
    }

    pub fn net_positions(&self, group_id: &str) -> Result<NetPositions, RupeeError> {
        let group = self.group(group_id)?;
        Ok(net_positions(group, &self.expenses))
    }

    pub fn settle(&self, group_id: &str) -> Result<Vec<SplitBalance>, RupeeError> {
        let positions = self.net_positions(group_id)?;
        Ok(settle(&positions))
    }

    pub fn add_group(&mut self, new_group: NewSplitGroup) -> Result<SplitGroup, RupeeError> {
        validate_name("name", &new_group.name)?;
        validate_optional_text("description", new_group.description.as_deref())?;
        validate_members(&new_group.members)?;

        let group = SplitGroup {
            id: new_id(),
            name: new_group.name.trim().to_string(),
            description: new_group.description.filter(|d| !d.trim().is_empty()),
            members: new_group.members,
            total_amount: Money::ZERO,
            created_at: Utc::now(),
        };
        self.groups.push(group.clone());
        debug!("Split group {} added with {} members", group.id, group.members.len());
        Ok(group)
    }

    pub fn update_group(&mut self, group_id: &str, patch: SplitGroupPatch) -> Result<SplitGroup, RupeeError> {
        self.group(group_id)?;
        if let Some(ref name) = patch.name {
            validate_name("name", name)?;
        }
        validate_optional_text("description", patch.description.as_deref())?;
        if let Some(ref members) = patch.members {
            validate_members(members)?;
            for expense in self.expenses.iter().filter(|e| e.split_group_id == group_id) {
                let referenced = std::iter::once(&expense.paid_by).chain(expense.split_among.iter());
                for member in referenced {
                    if !members.contains(member) {
                        return Err(RupeeError::validation(
                            "members",
                            "Member Still Referenced",
                            format!("{} is referenced by expense {}", member, expense.id),
                        ));
                    }
                }
            }
        }

        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| RupeeError::GroupNotFound(group_id.to_string()))?;
        if let Some(name) = patch.name {
            group.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            group.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        if let Some(members) = patch.members {
            group.members = members;
        }
        Ok(group.clone())
    }

    /// Removes the group's expenses first, then the group. Returns how many expenses went.
    pub fn delete_group(&mut self, group_id: &str) -> Result<usize, RupeeError> {
        self.group(group_id)?;
        let before = self.expenses.len();
        self.expenses.retain(|e| e.split_group_id != group_id);
        let removed = before - self.expenses.len();
        self.groups.retain(|g| g.id != group_id);
        debug!("Split group {} deleted with {} expenses", group_id, removed);
        Ok(removed)
    }

    pub fn add_expense(&mut self, new_expense: NewSplitExpense) -> Result<SplitExpense, RupeeError> {
        let group = self.group(&new_expense.split_group_id)?;
        validate_description("description", &new_expense.description)?;
        validate_amount_input("amount", new_expense.amount)?;
        validate_split(group, &new_expense.paid_by, &new_expense.split_among)?;

        let expense = SplitExpense {
            id: new_id(),
            split_group_id: new_expense.split_group_id,
            description: new_expense.description.trim().to_string(),
            amount: new_expense.amount,
            paid_by: new_expense.paid_by,
            split_among: new_expense.split_among,
            date: new_expense.date,
            created_at: Utc::now(),
        };
        self.expenses.push(expense.clone());
        self.recompute_total(&expense.split_group_id);
        Ok(expense)
    }

    pub fn update_expense(
        &mut self,
        expense_id: &str,
        patch: SplitExpensePatch,
    ) -> Result<SplitExpense, RupeeError> {
        let current = self.expense(expense_id)?.clone();
        let updated = SplitExpense {
            description: patch.description.unwrap_or_else(|| current.description.clone()),
            amount: patch.amount.unwrap_or(current.amount),
            paid_by: patch.paid_by.unwrap_or_else(|| current.paid_by.clone()),
            split_among: patch.split_among.unwrap_or_else(|| current.split_among.clone()),
            date: patch.date.unwrap_or(current.date),
            ..current.clone()
        };

        let group = self.group(&updated.split_group_id)?;
        validate_description("description", &updated.description)?;
        validate_amount_input("amount", updated.amount)?;
        validate_split(group, &updated.paid_by, &updated.split_among)?;

        if let Some(slot) = self.expenses.iter_mut().find(|e| e.id == expense_id) {
            *slot = updated.clone();
        }
        self.recompute_total(&updated.split_group_id);
        Ok(updated)
    }

    pub fn delete_expense(&mut self, expense_id: &str) -> Result<SplitExpense, RupeeError> {
        let position = self
            .expenses
            .iter()
            .position(|e| e.id == expense_id)
            .ok_or_else(|| RupeeError::ExpenseNotFound(expense_id.to_string()))?;
        let removed = self.expenses.remove(position);
        self.recompute_total(&removed.split_group_id);
        Ok(removed)
    }

    fn recompute_total(&mut self, group_id: &str) {
        let total: Money = self
            .expenses
            .iter()
            .filter(|e| e.split_group_id == group_id)
            .map(|e| e.amount)
            .sum();
        if let Some(group) = self.groups.iter_mut().find(|g| g.id == group_id) {
            group.total_amount = total;
        }
    }
}

/// Invariants a stored group must hold: a non-empty, duplicate-free member list.
pub fn check_group(group: &SplitGroup) -> Result<(), RupeeError> {
    validate_members(&group.members)
}

/// Invariants a stored expense must hold against its group: a positive amount, a payer
/// and splitters drawn from the members, and no splitter listed twice.
pub fn check_expense(group: &SplitGroup, expense: &SplitExpense) -> Result<(), RupeeError> {
    validate_amount_input("amount", expense.amount)?;
    validate_split(group, &expense.paid_by, &expense.split_among)
}

fn validate_members(members: &[String]) -> Result<(), RupeeError> {
    if members.is_empty() {
        return Err(RupeeError::validation(
            "members",
            "No Members",
            "A split group needs at least one member",
        ));
    }
    let mut seen = HashSet::new();
    for member in members {
        if member.trim().is_empty() {
            return Err(RupeeError::validation("members", "Invalid members", "Member id cannot be empty"));
        }
        if !seen.insert(member.as_str()) {
            return Err(RupeeError::validation(
                "members",
                "Duplicate Member",
                format!("{} is listed more than once", member),
            ));
        }
    }
    Ok(())
}

fn validate_split(group: &SplitGroup, paid_by: &str, split_among: &[String]) -> Result<(), RupeeError> {
    if split_among.is_empty() {
        return Err(RupeeError::validation(
            "splitAmong",
            "Empty Split",
            "An expense must be split among at least one member",
        ));
    }
    if !group.has_member(paid_by) {
        return Err(RupeeError::validation(
            "paidBy",
            "Not A Member",
            format!("{} is not a member of group {}", paid_by, group.id),
        ));
    }
    let mut seen = HashSet::new();
    for member in split_among {
        if !group.has_member(member) {
            return Err(RupeeError::validation(
                "splitAmong",
                "Not A Member",
                format!("{} is not a member of group {}", member, group.id),
            ));
        }
        if !seen.insert(member.as_str()) {
            return Err(RupeeError::validation(
                "splitAmong",
                "Duplicate Member",
                format!("{} is listed more than once", member),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rupees(r: i64) -> Money {
        Money::from_minor(r * 100)
    }

    fn ids(members: &[&str]) -> Vec<String> {
        members.iter().map(|m| m.to_string()).collect()
    }

    fn book_with(members: &[&str]) -> (SplitBook, String) {
        let mut book = SplitBook::new();
        let group = book
            .add_group(NewSplitGroup {
                name: "Trip".to_string(),
                description: None,
                members: ids(members),
            })
            .unwrap();
        (book, group.id)
    }

    fn expense(group_id: &str, amount: Money, paid_by: &str, split_among: &[&str]) -> NewSplitExpense {
        NewSplitExpense {
            split_group_id: group_id.to_string(),
            description: "Dinner".to_string(),
            amount,
            paid_by: paid_by.to_string(),
            split_among: ids(split_among),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    fn transfer(from: &str, to: &str, amount: Money) -> SplitBalance {
        SplitBalance {
            from_friend: from.to_string(),
            to_friend: to.to_string(),
            amount,
        }
    }

    #[test]
    fn three_way_split_paid_by_one() {
        let (mut book, g) = book_with(&["A", "B", "C"]);
        book.add_expense(expense(&g, rupees(300), "A", &["A", "B", "C"])).unwrap();

        let positions = book.net_positions(&g).unwrap();
        assert_eq!(positions.get("A"), Some(rupees(200)));
        assert_eq!(positions.get("B"), Some(rupees(-100)));
        assert_eq!(positions.get("C"), Some(rupees(-100)));
        assert_eq!(
            book.settle(&g).unwrap(),
            vec![transfer("B", "A", rupees(100)), transfer("C", "A", rupees(100))]
        );
    }

    #[test]
    fn payer_outside_split_set() {
        let (mut book, g) = book_with(&["A", "B"]);
        book.add_expense(expense(&g, rupees(100), "A", &["B"])).unwrap();

        let positions = book.net_positions(&g).unwrap();
        assert_eq!(positions.get("A"), Some(rupees(100)));
        assert_eq!(positions.get("B"), Some(rupees(-100)));
        assert_eq!(book.settle(&g).unwrap(), vec![transfer("B", "A", rupees(100))]);
    }

    #[test]
    fn single_member_group_never_transfers() {
        let (mut book, g) = book_with(&["solo"]);
        book.add_expense(expense(&g, rupees(42), "solo", &["solo"])).unwrap();

        assert_eq!(book.net_positions(&g).unwrap().get("solo"), Some(Money::ZERO));
        assert!(book.settle(&g).unwrap().is_empty());
    }

    #[test]
    fn residue_within_tolerance_is_not_transferred() {
        let (mut book, g) = book_with(&["A", "B", "C"]);
        // 2 paise split three ways: B and A carry a paisa each, C nothing.
        book.add_expense(expense(&g, Money::from_minor(2), "A", &["B", "A", "C"])).unwrap();

        let positions = book.net_positions(&g).unwrap();
        assert_eq!(positions.get("A"), Some(Money::from_minor(1)));
        assert_eq!(positions.get("B"), Some(Money::from_minor(-1)));
        assert!(book.settle(&g).unwrap().is_empty());
    }

    #[test]
    fn uneven_division_still_sums_to_zero() {
        let (mut book, g) = book_with(&["A", "B", "C", "D"]);
        book.add_expense(expense(&g, rupees(100), "A", &["A", "B", "C"])).unwrap();
        book.add_expense(expense(&g, Money::from_minor(1001), "D", &["A", "B", "C", "D"])).unwrap();
        book.add_expense(expense(&g, Money::from_minor(777), "B", &["C", "D"])).unwrap();

        let positions = book.net_positions(&g).unwrap();
        assert_eq!(positions.total(), Money::ZERO);

        let mut after: Vec<(String, Money)> = positions.iter().map(|(id, p)| (id.to_string(), p)).collect();
        for t in book.settle(&g).unwrap() {
            after.iter_mut().find(|entry| entry.0 == t.to_friend).unwrap().1 -= t.amount;
            after.iter_mut().find(|entry| entry.0 == t.from_friend).unwrap().1 += t.amount;
        }
        assert!(after.iter().all(|(_, p)| p.is_settled()), "{:?}", after);
    }

    #[test]
    fn creditors_are_matched_in_member_order() {
        let positions = NetPositions::new(vec![
            ("D1".to_string(), rupees(-30)),
            ("C1".to_string(), rupees(50)),
            ("D2".to_string(), rupees(-40)),
            ("C2".to_string(), rupees(20)),
        ]);
        assert_eq!(
            settle(&positions),
            vec![
                transfer("D1", "C1", rupees(30)),
                transfer("D2", "C1", rupees(20)),
                transfer("D2", "C2", rupees(20)),
            ]
        );
    }

    #[test]
    fn expense_validation_rejects_before_mutation() {
        let (mut book, g) = book_with(&["A", "B"]);
        let before = book.clone();

        let cases = [
            expense(&g, Money::ZERO, "A", &["A"]),
            expense(&g, rupees(10), "A", &[]),
            expense(&g, rupees(10), "X", &["A"]),
            expense(&g, rupees(10), "A", &["A", "Z"]),
            expense(&g, rupees(10), "A", &["B", "B"]),
        ];
        for case in cases {
            assert!(matches!(book.add_expense(case), Err(RupeeError::Validation(..))));
        }
        assert_eq!(book, before);
        assert!(matches!(
            book.add_expense(expense("missing", rupees(1), "A", &["A"])),
            Err(RupeeError::GroupNotFound(_))
        ));
    }

    #[test]
    fn totals_follow_the_expense_log() {
        let (mut book, g) = book_with(&["A", "B"]);
        let first = book.add_expense(expense(&g, rupees(10), "A", &["A", "B"])).unwrap();
        book.add_expense(expense(&g, rupees(5), "B", &["A"])).unwrap();
        assert_eq!(book.group(&g).unwrap().total_amount, rupees(15));

        book.update_expense(
            &first.id,
            SplitExpensePatch {
                amount: Some(rupees(20)),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(book.group(&g).unwrap().total_amount, rupees(25));

        book.delete_expense(&first.id).unwrap();
        assert_eq!(book.group(&g).unwrap().total_amount, rupees(5));
    }

    #[test]
    fn deleting_group_cascades() {
        let (mut book, g) = book_with(&["A", "B"]);
        book.add_expense(expense(&g, rupees(10), "A", &["B"])).unwrap();
        book.add_expense(expense(&g, rupees(20), "B", &["A"])).unwrap();

        assert_eq!(book.delete_group(&g).unwrap(), 2);
        assert!(book.expenses_of(&g).is_empty());
        assert!(matches!(book.settle(&g), Err(RupeeError::GroupNotFound(_))));
    }

    #[test]
    fn cannot_drop_a_member_with_expenses() {
        let (mut book, g) = book_with(&["A", "B", "C"]);
        book.add_expense(expense(&g, rupees(10), "A", &["B"])).unwrap();

        let result = book.update_group(
            &g,
            SplitGroupPatch {
                members: Some(ids(&["A", "C"])),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(RupeeError::Validation(..))));

        let group = book
            .update_group(
                &g,
                SplitGroupPatch {
                    members: Some(ids(&["B", "A"])),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(group.members, ids(&["B", "A"]));
    }

    #[test]
    fn thousands_of_largest_expenses_total_exactly() {
        let (mut book, g) = book_with(&["A", "B"]);
        let largest = Money::from_rupees(crate::core::money::MAX_ABS_RUPEES).unwrap();
        for _ in 0..3_000 {
            book.add_expense(expense(&g, largest, "A", &["A", "B"])).unwrap();
        }

        assert_eq!(book.group(&g).unwrap().total_amount.minor(), 300_000_000_000_000);
        let positions = book.net_positions(&g).unwrap();
        assert_eq!(positions.get("B"), Some(Money::from_minor(-150_000_000_000_000)));
        assert_eq!(positions.total(), Money::ZERO);
    }
}
