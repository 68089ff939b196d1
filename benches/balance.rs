use cashbook_core::book::{Account, AccountId, AccountType, Book, Commodity, Split, Transaction};
use cashbook_core::storage::json_backend::{load_book_from_path, save_book_to_path};
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;

fn build_sample_book(txn_count: usize) -> (Book, AccountId) {
    let mut book = Book::new("Benchmark", Commodity::currency("EUR", 100));
    let eur = book.default_currency().cloned().expect("currency");
    let root = book.root_account().expect("root").id;

    let checking = book.add_account(
        Account::new("Checking", AccountType::Bank, &eur).with_parent(root),
    );
    let groceries =
        book.add_account(Account::new("Groceries", AccountType::Expense, &eur).with_parent(root));

    let start_date = NaiveDate::from_ymd_opt(2025, 1, 1).expect("date");
    for idx in 0..txn_count {
        let posted = start_date + Duration::days((idx % 365) as i64);
        let amount = 50 + (idx % 100) as i64;
        let txn = Transaction::new(
            eur.id,
            posted,
            vec![Split::new(groceries, amount), Split::new(checking, -amount)],
        )
        .expect("balanced");
        book.add_transaction(txn);
    }
    book.flush().expect("flush");
    (book, checking)
}

fn bench_balance(c: &mut Criterion) {
    let (book, checking) = build_sample_book(black_box(10_000));
    let mid_year = NaiveDate::from_ymd_opt(2025, 7, 1).expect("date");

    c.bench_function("balance_10k", |b| {
        b.iter(|| black_box(book.get_balance(checking, Some(mid_year))))
    });

    c.bench_function("validate_10k", |b| b.iter(|| black_box(book.validation_errors())));
}

fn bench_book_io(c: &mut Criterion) {
    let (book, _) = build_sample_book(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("book.json");

    c.bench_function("book_save_10k", |b| {
        b.iter(|| save_book_to_path(&book, &file_path).expect("save book"))
    });

    save_book_to_path(&book, &file_path).expect("seed");
    c.bench_function("book_load_10k", |b| {
        b.iter(|| black_box(load_book_from_path(&file_path).expect("load book")))
    });
}

criterion_group!(benches, bench_balance, bench_book_io);
criterion_main!(benches);
