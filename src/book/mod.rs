//! Book domain models: commodities, the account tree, transactions and splits.

pub mod account;
pub mod balance;
#[allow(clippy::module_inception)]
pub mod book;
pub mod commodity;
pub mod control;
pub mod split;
pub mod state;
pub mod transaction;
pub mod validate;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use account::{Account, AccountId, AccountType, ROOT_ACCOUNT_NAME, TEMPLATE_ROOT_NAME};
pub use book::Book;
pub use commodity::{Commodity, CommodityId, CURRENCY_NAMESPACE};
pub use control::{ControlFlag, ControlMode};
pub use split::{Split, SplitId};
pub use state::BookState;
pub use transaction::{Transaction, TransactionId};

/// Identifier of a book; commodities remember the book that owns them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct BookId(pub Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
