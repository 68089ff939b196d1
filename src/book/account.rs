use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::commodity::{Commodity, CommodityId};

pub const ROOT_ACCOUNT_NAME: &str = "Root Account";
pub const TEMPLATE_ROOT_NAME: &str = "Template Root";

/// Identifier of an account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct AccountId(pub Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// GnuCash account classifications.
///
/// Unknown names are kept as [`AccountType::Unrecognized`] so an account can be
/// built from arbitrary input and rejected later by book validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountType {
    Root,
    Asset,
    Bank,
    Cash,
    Credit,
    Equity,
    Expense,
    Income,
    Liability,
    Mutual,
    Payable,
    Receivable,
    Stock,
    Trading,
    Unrecognized(String),
}

impl AccountType {
    pub const ALL: [AccountType; 14] = [
        AccountType::Root,
        AccountType::Asset,
        AccountType::Bank,
        AccountType::Cash,
        AccountType::Credit,
        AccountType::Equity,
        AccountType::Expense,
        AccountType::Income,
        AccountType::Liability,
        AccountType::Mutual,
        AccountType::Payable,
        AccountType::Receivable,
        AccountType::Stock,
        AccountType::Trading,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            AccountType::Root => "ROOT",
            AccountType::Asset => "ASSET",
            AccountType::Bank => "BANK",
            AccountType::Cash => "CASH",
            AccountType::Credit => "CREDIT",
            AccountType::Equity => "EQUITY",
            AccountType::Expense => "EXPENSE",
            AccountType::Income => "INCOME",
            AccountType::Liability => "LIABILITY",
            AccountType::Mutual => "MUTUAL",
            AccountType::Payable => "PAYABLE",
            AccountType::Receivable => "RECEIVABLE",
            AccountType::Stock => "STOCK",
            AccountType::Trading => "TRADING",
            AccountType::Unrecognized(raw) => raw,
        }
    }

    /// Accounting sign: +1 for debit-normal types, -1 for credit-normal ones.
    pub fn sign(&self) -> Option<i8> {
        match self {
            AccountType::Stock
            | AccountType::Mutual
            | AccountType::Expense
            | AccountType::Bank
            | AccountType::Trading
            | AccountType::Cash
            | AccountType::Asset
            | AccountType::Receivable => Some(1),
            AccountType::Equity
            | AccountType::Payable
            | AccountType::Liability
            | AccountType::Credit
            | AccountType::Income => Some(-1),
            AccountType::Root | AccountType::Unrecognized(_) => None,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, AccountType::Root)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, AccountType::Unrecognized(_))
    }
}

impl FromStr for AccountType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let known = AccountType::ALL
            .iter()
            .find(|kind| kind.as_str() == normalized)
            .cloned();
        Ok(known.unwrap_or_else(|| AccountType::Unrecognized(s.to_string())))
    }
}

impl From<&str> for AccountType {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<String> for AccountType {
    fn from(value: String) -> Self {
        AccountType::from(value.as_str())
    }
}

impl From<AccountType> for String {
    fn from(value: AccountType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the account tree.
///
/// The book owns every account; `parent_id` is a plain back reference and the
/// children of an account are derived from the book's collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub account_type: AccountType,
    pub commodity_id: CommodityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub placeholder: bool,
    #[serde(default)]
    pub hidden: bool,
    commodity_fraction: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scu_override: Option<u32>,
    #[serde(skip)]
    pending_children: Vec<Account>,
}

impl Account {
    /// Creates a parentless account denominated in `commodity`.
    pub fn new(
        name: impl Into<String>,
        account_type: impl Into<AccountType>,
        commodity: &Commodity,
    ) -> Self {
        Self {
            id: AccountId::new(),
            name: name.into(),
            account_type: account_type.into(),
            commodity_id: commodity.id,
            parent_id: None,
            description: None,
            code: None,
            placeholder: false,
            hidden: false,
            commodity_fraction: commodity.fraction,
            scu_override: None,
            pending_children: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: AccountId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    /// Child accounts attached beneath this one when it is added to a book.
    pub fn with_children(mut self, children: Vec<Account>) -> Self {
        self.pending_children.extend(children);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn sign(&self) -> Option<i8> {
        self.account_type.sign()
    }

    /// Smallest currency unit: the override when set, else the commodity fraction.
    pub fn commodity_scu(&self) -> u32 {
        self.scu_override.unwrap_or(self.commodity_fraction)
    }

    pub fn set_commodity_scu(&mut self, scu: Option<u32>) {
        self.scu_override = scu;
    }

    pub fn non_std_scu(&self) -> bool {
        self.scu_override.is_some()
    }

    /// Re-denominates the account; an SCU override is kept.
    pub fn set_commodity(&mut self, commodity: &Commodity) {
        self.commodity_id = commodity.id;
        self.commodity_fraction = commodity.fraction;
    }

    /// The fraction of the commodity this account was denominated in.
    pub(crate) fn commodity_fraction(&self) -> u32 {
        self.commodity_fraction
    }

    pub(crate) fn sync_commodity_fraction(&mut self, fraction: u32) {
        self.commodity_fraction = fraction;
    }

    pub(crate) fn take_children(&mut self) -> Vec<Account> {
        std::mem::take(&mut self.pending_children)
    }
}
