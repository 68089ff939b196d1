use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    account::{Account, AccountId, AccountType, ROOT_ACCOUNT_NAME, TEMPLATE_ROOT_NAME},
    commodity::{Commodity, CommodityId},
    control::ControlMode,
    state::BookState,
    transaction::{Transaction, TransactionId},
    validate::validate_book,
    BookId,
};
use crate::{config::Config, errors::ValidationError};

pub(crate) const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Aggregate root owning one set of accounts, commodities and transactions.
///
/// Additions go to a pending working copy. [`Book::flush`] validates it and
/// makes it the committed state seen by [`Book::query`]; [`Book::cancel`]
/// throws it away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    #[serde(default)]
    control_mode: ControlMode,
    default_currency: CommodityId,
    committed: BookState,
    #[serde(skip)]
    pending: Option<BookState>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Book::schema_version_default")]
    pub schema_version: u8,
}

impl Book {
    /// Creates a book holding `currency`, a `Root Account` and a `Template Root`.
    pub fn new(name: impl Into<String>, mut currency: Commodity) -> Self {
        let id = BookId::new();
        currency.book_id = Some(id);
        let root = Account::new(ROOT_ACCOUNT_NAME, AccountType::Root, &currency);
        let template = Account::new(TEMPLATE_ROOT_NAME, AccountType::Root, &currency);
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            control_mode: ControlMode::default(),
            default_currency: currency.id,
            committed: BookState {
                commodities: vec![currency],
                accounts: vec![root, template],
                transactions: Vec::new(),
            },
            pending: None,
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Creates a book using the configured default currency and control mode.
    pub fn with_config(name: impl Into<String>, config: &Config) -> Self {
        let currency =
            Commodity::currency(config.default_currency.clone(), config.currency_fraction);
        let mut book = Self::new(name, currency);
        book.control_mode = config.control_mode.clone();
        book
    }

    pub fn control_mode(&self) -> &ControlMode {
        &self.control_mode
    }

    pub fn control_mode_mut(&mut self) -> &mut ControlMode {
        &mut self.control_mode
    }

    fn working_mut(&mut self) -> &mut BookState {
        self.pending.get_or_insert_with(|| self.committed.clone())
    }

    /// The state validation runs against: pending changes if any, else committed data.
    pub fn working(&self) -> &BookState {
        self.pending.as_ref().unwrap_or(&self.committed)
    }

    /// Committed data only.
    pub fn query(&self) -> &BookState {
        &self.committed
    }

    pub fn has_pending_changes(&self) -> bool {
        self.pending.is_some()
    }

    /// Attaches a commodity; one that already belongs to another book keeps its owner.
    pub fn add_commodity(&mut self, mut commodity: Commodity) -> CommodityId {
        let id = commodity.id;
        if commodity.book_id.is_none() {
            commodity.book_id = Some(self.id);
        }
        tracing::debug!(
            book = %self.name,
            commodity = %commodity.qualified_name(),
            "commodity added"
        );
        self.working_mut().commodities.push(commodity);
        id
    }

    /// Adds an account and any children it was built with.
    ///
    /// The account's default SCU follows the fraction of the book's copy of
    /// its commodity.
    pub fn add_account(&mut self, mut account: Account) -> AccountId {
        let id = account.id;
        let children = account.take_children();
        if let Some(commodity) = self.working().commodity(account.commodity_id) {
            account.sync_commodity_fraction(commodity.fraction);
        }
        tracing::debug!(book = %self.name, account = %account.name, "account added");
        self.working_mut().accounts.push(account);
        for child in children {
            self.add_account(child.with_parent(id));
        }
        id
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> TransactionId {
        let id = transaction.id;
        tracing::debug!(book = %self.name, transaction = %id, "transaction added");
        self.working_mut().transactions.push(transaction);
        id
    }

    /// Mutable access to an account in the pending state.
    pub fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.working_mut().account_mut(id)
    }

    /// Drops an account that was added since the last flush.
    pub fn remove_pending_account(&mut self, id: AccountId) -> Option<Account> {
        if self.committed.account(id).is_some() {
            return None;
        }
        let pending = self.pending.as_mut()?;
        let index = pending.accounts.iter().position(|account| account.id == id)?;
        Some(pending.accounts.remove(index))
    }

    /// Every invariant violation in the working state.
    pub fn validation_errors(&self) -> Vec<ValidationError> {
        validate_book(self.working(), self.id, &self.control_mode)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = self.validation_errors().into_iter();
        match errors.next() {
            None => Ok(()),
            Some(first) => {
                tracing::warn!(
                    book = %self.name,
                    error = %first,
                    additional = errors.len(),
                    "book validation failed"
                );
                Err(first)
            }
        }
    }

    /// Validates pending changes and promotes them to committed state.
    pub fn flush(&mut self) -> Result<(), ValidationError> {
        self.validate()?;
        if let Some(pending) = self.pending.take() {
            self.committed = pending;
            self.touch();
            tracing::info!(book = %self.name, "pending changes flushed");
        }
        Ok(())
    }

    /// Discards pending changes.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            tracing::info!(book = %self.name, "pending changes cancelled");
        }
    }

    pub fn root_account(&self) -> Option<&Account> {
        self.committed.root_account()
    }

    pub fn default_currency(&self) -> Option<&Commodity> {
        self.committed.commodity(self.default_currency)
    }

    pub fn get_balance(&self, account: AccountId, at_date: Option<NaiveDate>) -> Decimal {
        self.committed.get_balance(account, at_date)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
