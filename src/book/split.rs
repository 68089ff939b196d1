use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::AccountId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SplitId(pub Uuid);

impl SplitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SplitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SplitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One debit or credit leg of a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Split {
    pub id: SplitId,
    pub account_id: AccountId,
    /// Amount in the transaction currency.
    pub value: Decimal,
    /// Amount in the account commodity.
    pub quantity: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl Split {
    /// Creates a split whose quantity equals its value.
    pub fn new(account_id: AccountId, value: impl Into<Decimal>) -> Self {
        let value = value.into();
        Self {
            id: SplitId::new(),
            account_id,
            value,
            quantity: value,
            memo: None,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Overrides the quantity for splits on accounts in a foreign commodity.
    pub fn with_quantity(mut self, quantity: impl Into<Decimal>) -> Self {
        self.quantity = quantity.into();
        self
    }
}
