#![doc(test(attr(deny(warnings))))]

//! Cashbook Core models double-entry accounting books: a tree of accounts,
//! commodities, and balanced transactions, with hierarchy validation and
//! balance queries over committed data.

pub mod book;
pub mod config;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use book::{
    Account, AccountId, AccountType, Book, BookState, Commodity, CommodityId, ControlFlag,
    ControlMode, Split, Transaction,
};
pub use errors::{BookError, ValidationError};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Cashbook Core tracing initialized.");
    });
}
