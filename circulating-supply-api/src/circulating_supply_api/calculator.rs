// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::node_client::AtomicBalance;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

// percentages are kept in hundredths, i.e. 10000 == 100.00%
const PERCENT_SCALE: u128 = 100 * 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum CalculationError {
    #[error("the locked balance ({locked}) exceeds the total issuance ({issuance})")]
    LockedExceedsIssuance {
        locked: AtomicBalance,
        issuance: AtomicBalance,
    },

    #[error("the distributing balance ({distributing}) exceeds the circulating supply ({circulating})")]
    DistributingExceedsCirculating {
        distributing: AtomicBalance,
        circulating: AtomicBalance,
    },

    #[error("the total issuance is zero")]
    ZeroIssuance,

    #[error("arithmetic overflow while deriving the supply figures")]
    ArithmeticOverflow,
}

/// Total issuance of the token alongside its display precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Issuance {
    total: AtomicBalance,
    decimals: u32,
}

impl Issuance {
    pub(crate) fn new(total: AtomicBalance, decimals: u32) -> Self {
        Issuance { total, decimals }
    }

    pub(crate) fn total(&self) -> TokenAmount {
        TokenAmount::new(self.total, self.decimals)
    }
}

/// Fixed-point token amount. Formatting is exact, there is no floating point involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TokenAmount {
    atomic: AtomicBalance,
    decimals: u32,
}

impl TokenAmount {
    pub(crate) fn new(atomic: AtomicBalance, decimals: u32) -> Self {
        TokenAmount { atomic, decimals }
    }
}

impl Display for TokenAmount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.decimals == 0 {
            return write!(f, "{}", self.atomic);
        }

        // decimals are capped by the config validation, so the scale always fits
        let scale = 10u128.pow(self.decimals);
        let whole = self.atomic / scale;
        let fraction = self.atomic % scale;
        write!(
            f,
            "{whole}.{fraction:0width$}",
            width = self.decimals as usize
        )
    }
}

/// Percentage with two decimal places of precision, always within [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Percentage {
    hundredths: u32,
}

impl Percentage {
    /// Ratio of `part` to `whole`, rounded half up to two decimal places.
    fn from_ratio(part: AtomicBalance, whole: AtomicBalance) -> Result<Self, CalculationError> {
        if whole == 0 {
            return Err(CalculationError::ZeroIssuance);
        }

        let doubled = part
            .checked_mul(PERCENT_SCALE * 2)
            .ok_or(CalculationError::ArithmeticOverflow)?;
        let denominator = whole
            .checked_mul(2)
            .ok_or(CalculationError::ArithmeticOverflow)?;
        let rounded = doubled
            .checked_add(whole)
            .ok_or(CalculationError::ArithmeticOverflow)?
            / denominator;

        // PERCENT_SCALE fits comfortably in u32
        Ok(Percentage {
            hundredths: rounded.min(PERCENT_SCALE) as u32,
        })
    }
}

impl Display for Percentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.hundredths / 100, self.hundredths % 100)
    }
}

/// Supply metrics derived from the account balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SupplyFigures {
    pub(crate) circulating_supply: TokenAmount,
    pub(crate) distributed_supply: TokenAmount,
    pub(crate) percent_distributed: Percentage,
}

/// Derives the circulating and distributed supply.
///
/// circulating = issuance - locked
/// distributed = circulating - distributing
///
/// Balances exceeding what they are subtracted from are reported rather than clamped,
/// as they indicate a misconfigured issuance or account list.
pub(crate) fn compute_snapshot(
    locked_total: AtomicBalance,
    distributing_total: AtomicBalance,
    issuance: Issuance,
) -> Result<SupplyFigures, CalculationError> {
    if issuance.total == 0 {
        return Err(CalculationError::ZeroIssuance);
    }

    let circulating = issuance.total.checked_sub(locked_total).ok_or(
        CalculationError::LockedExceedsIssuance {
            locked: locked_total,
            issuance: issuance.total,
        },
    )?;

    let distributed = circulating.checked_sub(distributing_total).ok_or(
        CalculationError::DistributingExceedsCirculating {
            distributing: distributing_total,
            circulating,
        },
    )?;

    Ok(SupplyFigures {
        circulating_supply: TokenAmount::new(circulating, issuance.decimals),
        distributed_supply: TokenAmount::new(distributed, issuance.decimals),
        percent_distributed: Percentage::from_ratio(distributed, issuance.total)?,
    })
}
