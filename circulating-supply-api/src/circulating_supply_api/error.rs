// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::circulating_supply_api::aggregator::AggregationError;
use crate::circulating_supply_api::calculator::CalculationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum SupplyError {
    #[error("failed to aggregate account balances: {0}")]
    AggregationFailed(#[from] AggregationError),

    #[error("failed to compute the supply figures: {0}")]
    ComputationFailed(#[from] CalculationError),
}
