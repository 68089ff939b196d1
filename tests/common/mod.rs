#![allow(dead_code)]

use std::sync::Mutex;

use cashbook_core::{
    book::{Account, AccountId, AccountType, Book, Commodity},
    config::ConfigManager,
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated store and config manager backed by a unique directory.
pub fn setup_test_env() -> (JsonStorage, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let storage = JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage");
    let config = ConfigManager::with_base_dir(base).expect("create config manager");
    (storage, config)
}

/// Empty EUR book: root accounts only.
pub fn new_book() -> Book {
    Book::new("test book", Commodity::currency("EUR", 100))
}

pub fn eur(book: &Book) -> Commodity {
    book.default_currency().cloned().expect("default currency")
}

pub fn root(book: &Book) -> AccountId {
    book.root_account().expect("root account").id
}

/// EUR book with flushed `asset` (ASSET) and `exp` (EXPENSE) accounts under the root.
pub fn book_basic() -> (Book, AccountId, AccountId) {
    let mut book = new_book();
    let eur = eur(&book);
    let racc = root(&book);
    let asset = book.add_account(Account::new("asset", AccountType::Asset, &eur).with_parent(racc));
    let exp = book.add_account(Account::new("exp", AccountType::Expense, &eur).with_parent(racc));
    book.flush().expect("flush basic book");
    (book, asset, exp)
}
