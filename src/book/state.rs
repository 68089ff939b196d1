use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    account::{Account, AccountId, ROOT_ACCOUNT_NAME, TEMPLATE_ROOT_NAME},
    balance::fold_balance,
    commodity::{Commodity, CommodityId},
    split::Split,
    transaction::Transaction,
};

/// Commodities, accounts and transactions of a book at one point in its lifecycle.
///
/// A book keeps one of these for its committed data and, while changes are
/// pending, a second working copy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookState {
    #[serde(default)]
    pub(crate) commodities: Vec<Commodity>,
    #[serde(default)]
    pub(crate) accounts: Vec<Account>,
    #[serde(default)]
    pub(crate) transactions: Vec<Transaction>,
}

impl BookState {
    pub fn commodities(&self) -> &[Commodity] {
        &self.commodities
    }

    pub fn commodity(&self, id: CommodityId) -> Option<&Commodity> {
        self.commodities.iter().find(|commodity| commodity.id == id)
    }

    pub fn find_commodity(&self, namespace: &str, mnemonic: &str) -> Option<&Commodity> {
        self.commodities
            .iter()
            .find(|c| c.namespace == namespace && c.mnemonic == mnemonic)
    }

    /// Every account, tree roots included.
    pub fn all_accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// User accounts: everything except the tree roots and the template tree.
    pub fn accounts(&self) -> Vec<&Account> {
        self.accounts
            .iter()
            .filter(|account| account.parent_id.is_some() && !self.is_template(account.id))
            .collect()
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub(crate) fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| account.id == id)
    }

    /// First user account with the given name.
    pub fn find_account(&self, name: &str) -> Option<&Account> {
        self.accounts().into_iter().find(|account| account.name == name)
    }

    pub fn children(&self, id: AccountId) -> Vec<&Account> {
        self.accounts
            .iter()
            .filter(|account| account.parent_id == Some(id))
            .collect()
    }

    pub fn root_account(&self) -> Option<&Account> {
        self.top_level(ROOT_ACCOUNT_NAME)
    }

    pub fn template_root(&self) -> Option<&Account> {
        self.top_level(TEMPLATE_ROOT_NAME)
    }

    fn top_level(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| {
            account.parent_id.is_none() && account.account_type.is_root() && account.name == name
        })
    }

    /// The account followed by its parent chain, stopping at a missing parent
    /// or at the first repeated account.
    pub fn ancestry(&self, id: AccountId) -> Vec<&Account> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = self.account(id);
        while let Some(account) = cursor {
            if !seen.insert(account.id) {
                break;
            }
            chain.push(account);
            cursor = account.parent_id.and_then(|parent| self.account(parent));
        }
        chain
    }

    /// Colon-joined path from just below the ROOT account down to `id`.
    pub fn fullname(&self, id: AccountId) -> Option<String> {
        let mut chain = self.ancestry(id);
        if chain.is_empty() {
            return None;
        }
        if let Some(top) = chain.last() {
            if top.parent_id.is_none() && top.account_type.is_root() {
                chain.pop();
            }
        }
        let names: Vec<&str> = chain.iter().rev().map(|account| account.name.as_str()).collect();
        Some(names.join(":"))
    }

    pub fn is_template(&self, id: AccountId) -> bool {
        match self.template_root() {
            Some(template) => self
                .ancestry(id)
                .iter()
                .any(|account| account.id == template.id),
            None => false,
        }
    }

    /// The account and everything below it.
    pub fn descendants(&self, id: AccountId) -> HashSet<AccountId> {
        let mut found = HashSet::new();
        let mut frontier = vec![id];
        while let Some(current) = frontier.pop() {
            if !found.insert(current) {
                continue;
            }
            frontier.extend(self.children(current).into_iter().map(|child| child.id));
        }
        found
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Sum of split values on `id` for transactions posted on or before `at_date`.
    pub fn get_balance(&self, id: AccountId, at_date: Option<NaiveDate>) -> Decimal {
        fold_balance(&self.transactions, |account| account == id, at_date)
    }

    /// Same fold as [`BookState::get_balance`] over the account and its descendants.
    pub fn get_subtree_balance(&self, id: AccountId, at_date: Option<NaiveDate>) -> Decimal {
        let subtree = self.descendants(id);
        fold_balance(&self.transactions, |account| subtree.contains(&account), at_date)
    }

    /// Splits on `id`, ordered by the post date of their transaction.
    pub fn splits_for(&self, id: AccountId) -> Vec<(&Transaction, &Split)> {
        let mut rows: Vec<_> = self
            .transactions
            .iter()
            .flat_map(|txn| txn.splits().iter().map(move |split| (txn, split)))
            .filter(|(_, split)| split.account_id == id)
            .collect();
        rows.sort_by_key(|(txn, _)| txn.post_date);
        rows
    }
}
