// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::ops::Deref;
use std::sync::Arc;

/// Opaque identifier of an on-chain account. Comparison is case-sensitive.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Address(String);

impl Address {
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Address(value.to_owned())
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Address(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum AccountSetKind {
    /// Accounts whose balances never count towards the circulating supply.
    Locked,

    /// Accounts that are circulating but have not finished distributing their tokens.
    Distributing,
}

impl Display for AccountSetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AccountSetKind::Locked => write!(f, "locked"),
            AccountSetKind::Distributing => write!(f, "distributing"),
        }
    }
}

/// Ordered, immutable list of accounts loaded once at startup.
/// Cloning is cheap as the underlying list is shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AddressSet {
    kind: AccountSetKind,
    addresses: Arc<[Address]>,
}

impl AddressSet {
    pub(crate) fn new<I, A>(kind: AccountSetKind, addresses: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Address>,
    {
        AddressSet {
            kind,
            addresses: addresses.into_iter().map(Into::into).collect(),
        }
    }

    pub(crate) fn locked<I, A>(addresses: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Address>,
    {
        Self::new(AccountSetKind::Locked, addresses)
    }

    pub(crate) fn distributing<I, A>(addresses: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Address>,
    {
        Self::new(AccountSetKind::Distributing, addresses)
    }

    pub(crate) fn kind(&self) -> AccountSetKind {
        self.kind
    }

    pub(crate) fn to_strings(&self) -> Vec<String> {
        self.addresses.iter().map(ToString::to_string).collect()
    }
}

impl Deref for AddressSet {
    type Target = [Address];

    fn deref(&self) -> &Self::Target {
        &self.addresses
    }
}
