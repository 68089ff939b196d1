use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BookId;

pub const CURRENCY_NAMESPACE: &str = "CURRENCY";

/// Identifier of a commodity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CommodityId(pub Uuid);

impl CommodityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CommodityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommodityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A currency or security an account can be denominated in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Commodity {
    pub id: CommodityId,
    pub namespace: String,
    pub mnemonic: String,
    pub fullname: String,
    /// Smallest-unit denominator, e.g. 100 for cents.
    pub fraction: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<BookId>,
}

impl Commodity {
    /// Creates a commodity that is not yet attached to any book.
    pub fn new(
        namespace: impl Into<String>,
        mnemonic: impl Into<String>,
        fullname: impl Into<String>,
        fraction: u32,
    ) -> Self {
        Self {
            id: CommodityId::new(),
            namespace: namespace.into(),
            mnemonic: mnemonic.into(),
            fullname: fullname.into(),
            fraction,
            book_id: None,
        }
    }

    /// Shorthand for an ISO currency in the `CURRENCY` namespace.
    pub fn currency(mnemonic: impl Into<String>, fraction: u32) -> Self {
        let mnemonic = mnemonic.into().to_uppercase();
        Self::new(CURRENCY_NAMESPACE, mnemonic.clone(), mnemonic, fraction)
    }

    pub fn is_currency(&self) -> bool {
        self.namespace == CURRENCY_NAMESPACE
    }

    /// `namespace:mnemonic`, used in messages and lookups.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.namespace, self.mnemonic)
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mnemonic)
    }
}
