//! Book-level invariant checks.
//!
//! Every check reads the state and the control mode it is given and never
//! mutates, so running validation twice yields the same errors.

use std::collections::{HashMap, HashSet};

use super::{
    account::{Account, AccountId, ROOT_ACCOUNT_NAME, TEMPLATE_ROOT_NAME},
    commodity::CommodityId,
    control::ControlMode,
    state::BookState,
    transaction::{check_splits, Transaction},
    BookId,
};
use crate::errors::ValidationError;

/// Runs every check and returns all violations in a stable order.
pub fn validate_book(
    state: &BookState,
    book_id: BookId,
    mode: &ControlMode,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    check_commodities(state, &mut errors);
    check_roots(state, &mut errors);
    for account in &state.accounts {
        check_account(state, book_id, mode, account, &mut errors);
    }
    check_sibling_names(state, &mut errors);
    let accounts: HashMap<AccountId, &Account> =
        state.accounts.iter().map(|account| (account.id, account)).collect();
    for txn in &state.transactions {
        check_transaction(state, &accounts, book_id, txn, &mut errors);
    }
    errors
}

fn check_commodities(state: &BookState, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for commodity in &state.commodities {
        let key = (commodity.namespace.as_str(), commodity.mnemonic.as_str());
        if !seen.insert(key) && reported.insert(key) {
            errors.push(ValidationError::DuplicateCommodity {
                namespace: commodity.namespace.clone(),
                mnemonic: commodity.mnemonic.clone(),
            });
        }
    }
}

fn check_roots(state: &BookState, errors: &mut Vec<ValidationError>) {
    let mut main_roots = 0usize;
    let mut template_roots = 0usize;
    for account in state
        .accounts
        .iter()
        .filter(|account| account.parent_id.is_none() && account.account_type.is_root())
    {
        match account.name.as_str() {
            ROOT_ACCOUNT_NAME => main_roots += 1,
            TEMPLATE_ROOT_NAME => template_roots += 1,
            other => errors.push(ValidationError::InvalidHierarchy(format!(
                "top-level ROOT account must be named `{ROOT_ACCOUNT_NAME}`, found `{other}`"
            ))),
        }
    }
    if main_roots != 1 {
        errors.push(ValidationError::InvalidHierarchy(format!(
            "book must have exactly one `{ROOT_ACCOUNT_NAME}`, found {main_roots}"
        )));
    }
    if template_roots > 1 {
        errors.push(ValidationError::InvalidHierarchy(format!(
            "book has {template_roots} `{TEMPLATE_ROOT_NAME}` accounts"
        )));
    }
}

fn check_account(
    state: &BookState,
    book_id: BookId,
    mode: &ControlMode,
    account: &Account,
    errors: &mut Vec<ValidationError>,
) {
    if !account.account_type.is_recognized() {
        errors.push(ValidationError::InvalidType {
            account: account.name.clone(),
            value: account.account_type.to_string(),
        });
    }

    match account.parent_id {
        None if !account.account_type.is_root() => {
            errors.push(ValidationError::InvalidHierarchy(format!(
                "account `{}` of type {} has no parent",
                account.name, account.account_type
            )));
        }
        None => {}
        Some(parent_id) => {
            if state.account(parent_id).is_none() {
                errors.push(ValidationError::InvalidHierarchy(format!(
                    "parent of account `{}` is not part of this book",
                    account.name
                )));
            } else if in_cycle(state, account) {
                errors.push(ValidationError::InvalidHierarchy(format!(
                    "account `{}` has a cyclic parent chain",
                    account.name
                )));
            }
            if account.account_type.is_root() && !mode.allows_root_subaccounts() {
                errors.push(ValidationError::InvalidHierarchy(format!(
                    "ROOT account `{}` cannot have a parent",
                    account.name
                )));
            }
        }
    }

    let owned = state
        .commodity(account.commodity_id)
        .filter(|commodity| commodity.book_id == Some(book_id));
    match owned {
        None => errors.push(ValidationError::CrossBookReference {
            entity: account.name.clone(),
            commodity: commodity_label(state, account.commodity_id),
        }),
        Some(commodity) if commodity.fraction != account.commodity_fraction() => {
            errors.push(ValidationError::InconsistentScu {
                account: account.name.clone(),
                commodity: commodity.qualified_name(),
                expected: commodity.fraction,
                found: account.commodity_fraction(),
            });
        }
        Some(_) => {}
    }
}

fn in_cycle(state: &BookState, account: &Account) -> bool {
    let chain = state.ancestry(account.id);
    chain
        .last()
        .and_then(|top| top.parent_id)
        .is_some_and(|parent| chain.iter().any(|member| member.id == parent))
}

fn check_sibling_names(state: &BookState, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for account in &state.accounts {
        let Some(parent_id) = account.parent_id else {
            continue;
        };
        let key = (parent_id, account.name.as_str());
        if !seen.insert(key) && reported.insert(key) {
            let parent = state
                .account(parent_id)
                .map(|parent| parent.name.clone())
                .unwrap_or_else(|| parent_id.to_string());
            errors.push(ValidationError::DuplicateName {
                parent,
                name: account.name.clone(),
            });
        }
    }
}

fn check_transaction(
    state: &BookState,
    accounts: &HashMap<AccountId, &Account>,
    book_id: BookId,
    txn: &Transaction,
    errors: &mut Vec<ValidationError>,
) {
    if let Err(err) = check_splits(txn.splits()) {
        errors.push(err);
    }

    let owned = state
        .commodity(txn.currency)
        .filter(|commodity| commodity.book_id == Some(book_id));
    if owned.is_none() {
        let entity = if txn.description.is_empty() {
            format!("transaction {}", txn.id)
        } else {
            format!("transaction `{}`", txn.description)
        };
        errors.push(ValidationError::CrossBookReference {
            entity,
            commodity: commodity_label(state, txn.currency),
        });
    }

    for split in txn.splits() {
        match accounts.get(&split.account_id) {
            None => errors.push(ValidationError::InvalidReference(format!(
                "transaction {} has a split on unknown account {}",
                txn.id, split.account_id
            ))),
            Some(account) => {
                if account.commodity_id == txn.currency && split.quantity != split.value {
                    errors.push(ValidationError::InconsistentQuantity {
                        account: account.name.clone(),
                        value: split.value,
                        quantity: split.quantity,
                    });
                }
            }
        }
    }
}

fn commodity_label(state: &BookState, id: CommodityId) -> String {
    state
        .commodity(id)
        .map(|commodity| commodity.qualified_name())
        .unwrap_or_else(|| id.to_string())
}
