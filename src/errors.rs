use rust_decimal::Decimal;
use thiserror::Error;

/// Invariant violations detected while validating a book or building a transaction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid account hierarchy: {0}")]
    InvalidHierarchy(String),
    #[error("Account `{name}` already exists under `{parent}`")]
    DuplicateName { parent: String, name: String },
    #[error("Account `{account}` has unknown type `{value}`")]
    InvalidType { account: String, value: String },
    #[error("`{entity}` references commodity `{commodity}` that does not belong to this book")]
    CrossBookReference { entity: String, commodity: String },
    #[error("Commodity `{namespace}:{mnemonic}` is defined more than once")]
    DuplicateCommodity { namespace: String, mnemonic: String },
    #[error("Transaction needs at least two splits on two distinct accounts")]
    InsufficientSplits,
    #[error("Transaction is unbalanced by {imbalance}")]
    Unbalanced { imbalance: Decimal },
    #[error("Split on `{account}` has quantity {quantity} but value {value} in the same commodity")]
    InconsistentQuantity {
        account: String,
        value: Decimal,
        quantity: Decimal,
    },
    #[error("Account `{account}` uses fraction {found} but commodity `{commodity}` has {expected}")]
    InconsistentScu {
        account: String,
        commodity: String,
        expected: u32,
        found: u32,
    },
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
}

/// Error type that captures common book failures.
#[derive(Debug, Error)]
pub enum BookError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid reference: {0}")]
    InvalidRef(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BookError {
    /// True when the failure is a domain invariant violation rather than an IO problem.
    pub fn is_validation(&self) -> bool {
        matches!(self, BookError::Validation(_))
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            BookError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BookError>;
