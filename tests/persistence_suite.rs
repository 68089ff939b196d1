mod common;

use cashbook_core::{
    book::{Account, AccountType, Book, ControlFlag, Split, Transaction},
    config::Config,
    storage::StorageBackend,
    BookError,
};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::fs;

use common::{book_basic, eur, setup_test_env};

fn posted_book() -> Book {
    let (mut book, asset, exp) = book_basic();
    let currency = eur(&book).id;
    let txn = Transaction::new(
        currency,
        NaiveDate::from_ymd_opt(2014, 1, 1).unwrap(),
        vec![Split::new(asset, 100), Split::new(exp, -100)],
    )
    .unwrap();
    book.add_transaction(txn);
    book.flush().unwrap();
    book
}

#[test]
fn flushed_book_survives_reload() {
    let (storage, _) = setup_test_env();
    let book = posted_book();
    storage.save(&book, "household").expect("save");

    let loaded = storage.load("household").expect("load");
    let asset = loaded.query().find_account("asset").expect("asset account").id;
    assert_eq!(loaded.query().accounts().len(), 2);
    assert_eq!(loaded.get_balance(asset, None), dec!(100));
    assert_eq!(loaded.query(), book.query());
}

#[test]
fn pending_changes_are_not_written() {
    let (storage, _) = setup_test_env();
    let mut book = posted_book();
    let eur = eur(&book);
    let root = book.root_account().unwrap().id;
    book.add_account(Account::new("draft", AccountType::Cash, &eur).with_parent(root));

    storage.save(&book, "household").expect("save");
    let loaded = storage.load("household").expect("load");
    assert!(!loaded.has_pending_changes());
    assert!(loaded.query().find_account("draft").is_none());
}

#[test]
fn second_save_creates_a_restorable_backup() {
    let (storage, _) = setup_test_env();
    let mut book = posted_book();
    storage.save(&book, "family").expect("first save");

    let eur = eur(&book);
    let root = book.root_account().unwrap().id;
    book.add_account(Account::new("later", AccountType::Cash, &eur).with_parent(root));
    book.flush().unwrap();
    storage.save(&book, "family").expect("second save");

    let backups = storage.list_backups("family").unwrap();
    assert_eq!(backups.len(), 1);
    let restored = storage.restore("family", &backups[0]).expect("restore");
    assert!(restored.query().find_account("later").is_none());
    let reloaded = storage.load("family").unwrap();
    assert_eq!(reloaded.query().accounts().len(), 2);
}

#[test]
fn invalid_snapshot_is_refused_on_load() {
    let (storage, _) = setup_test_env();
    let book = posted_book();
    storage.save(&book, "broken").unwrap();

    let path = storage.book_path("broken");
    let raw = fs::read_to_string(&path).unwrap();
    let tampered = raw.replace("\"name\": \"asset\"", "\"name\": \"exp\"");
    assert_ne!(raw, tampered);
    fs::write(&path, tampered).unwrap();

    let err = storage.load("broken").unwrap_err();
    assert!(err.is_validation(), "unexpected error: {err}");
}

#[test]
fn config_drives_new_books() {
    let (_, manager) = setup_test_env();
    assert_eq!(manager.load().unwrap(), Config::default());

    let mut config = Config {
        default_currency: "usd".into(),
        ..Config::default()
    };
    config.control_mode.insert(ControlFlag::AllowRootSubaccounts);
    manager.save(&config).unwrap();

    let book = Book::with_config("configured", &manager.load().unwrap());
    assert_eq!(book.default_currency().unwrap().mnemonic, "USD");
    assert!(book.control_mode().allows_root_subaccounts());
}

#[test]
fn malformed_config_is_a_serde_error() {
    let (_, manager) = setup_test_env();
    fs::write(manager.path(), "{ not json").unwrap();
    assert!(matches!(manager.load(), Err(BookError::Serde(_))));
}
