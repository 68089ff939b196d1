//! Balance folding over recorded transactions.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{account::AccountId, transaction::Transaction};

/// Sums split values on accounts accepted by `matches`, limited to transactions
/// posted on or before `at_date` when one is given.
pub fn fold_balance<'a, I, F>(transactions: I, matches: F, at_date: Option<NaiveDate>) -> Decimal
where
    I: IntoIterator<Item = &'a Transaction>,
    F: Fn(AccountId) -> bool,
{
    transactions
        .into_iter()
        .filter(|txn| at_date.map_or(true, |limit| txn.post_date <= limit))
        .flat_map(|txn| txn.splits())
        .filter(|split| matches(split.account_id))
        .map(|split| split.value)
        .sum()
}
