pub mod json_backend;

use std::path::Path;

use crate::{book::Book, errors::BookError};

pub type Result<T> = std::result::Result<T, BookError>;

/// Abstraction over persistence backends capable of storing books and snapshots.
///
/// Only committed book state is ever written; pending changes stay in memory.
pub trait StorageBackend: Send + Sync {
    fn save(&self, book: &Book, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Book>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn backup(&self, book: &Book, name: &str, note: Option<&str>) -> Result<()>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Book>;

    /// Optional helpers for ad-hoc file operations. Default implementations forward to
    /// the JSON helpers when not overridden.
    fn save_to_path(&self, book: &Book, path: &Path) -> Result<()> {
        json_backend::save_book_to_path(book, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<Book> {
        json_backend::load_book_from_path(path)
    }
}

pub use json_backend::JsonStorage;
