use std::{collections::HashSet, fmt};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{commodity::CommodityId, split::Split};
use crate::errors::ValidationError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TransactionId(pub Uuid);

impl TransactionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A balanced set of splits posted on a given date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub currency: CommodityId,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num: Option<String>,
    pub post_date: NaiveDate,
    pub enter_date: DateTime<Utc>,
    splits: Vec<Split>,
}

impl Transaction {
    /// Builds a transaction, rejecting split sets that break the double-entry invariant.
    pub fn new(
        currency: CommodityId,
        post_date: NaiveDate,
        splits: Vec<Split>,
    ) -> Result<Self, ValidationError> {
        check_splits(&splits)?;
        Ok(Self {
            id: TransactionId::new(),
            currency,
            description: String::new(),
            notes: None,
            num: None,
            post_date,
            enter_date: Utc::now(),
            splits,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_num(mut self, num: impl Into<String>) -> Self {
        self.num = Some(num.into());
        self
    }

    pub fn with_enter_date(mut self, enter_date: DateTime<Utc>) -> Self {
        self.enter_date = enter_date;
        self
    }

    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    /// Sum of split values; zero for every transaction that passed construction.
    pub fn imbalance(&self) -> Decimal {
        self.splits.iter().map(|split| split.value).sum()
    }
}

/// Double-entry checks that need nothing but the splits themselves.
pub(crate) fn check_splits(splits: &[Split]) -> Result<(), ValidationError> {
    let accounts: HashSet<_> = splits.iter().map(|split| split.account_id).collect();
    if splits.len() < 2 || accounts.len() < 2 {
        return Err(ValidationError::InsufficientSplits);
    }
    let imbalance: Decimal = splits.iter().map(|split| split.value).sum();
    if !imbalance.is_zero() {
        return Err(ValidationError::Unbalanced { imbalance });
    }
    Ok(())
}
