//! Opt-in relaxations of the book validation rules.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::BookError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum ControlFlag {
    /// Lets ROOT-typed accounts live below the book's root account.
    AllowRootSubaccounts,
}

impl ControlFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlFlag::AllowRootSubaccounts => "allow-root-subaccounts",
        }
    }
}

impl FromStr for ControlFlag {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "allow-root-subaccounts" => Ok(ControlFlag::AllowRootSubaccounts),
            other => Err(BookError::Config(format!("unknown control mode `{other}`"))),
        }
    }
}

impl fmt::Display for ControlFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of [`ControlFlag`]s handed to the validator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ControlMode(BTreeSet<ControlFlag>);

impl ControlMode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the flag was not already present.
    pub fn insert(&mut self, flag: ControlFlag) -> bool {
        self.0.insert(flag)
    }

    pub fn remove(&mut self, flag: ControlFlag) -> bool {
        self.0.remove(&flag)
    }

    pub fn contains(&self, flag: ControlFlag) -> bool {
        self.0.contains(&flag)
    }

    pub fn allows_root_subaccounts(&self) -> bool {
        self.contains(ControlFlag::AllowRootSubaccounts)
    }

    pub fn iter(&self) -> impl Iterator<Item = ControlFlag> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ControlFlag> for ControlMode {
    fn from_iter<I: IntoIterator<Item = ControlFlag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
