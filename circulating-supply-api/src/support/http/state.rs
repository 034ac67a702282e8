// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::circulating_supply_api::SupplyService;
use crate::status::ApiStatusState;

#[derive(Clone)]
pub(crate) struct AppState {
    /// Computes and caches the supply figures.
    supply_service: SupplyService,

    /// Information about this api, i.e. its startup time.
    api_status: ApiStatusState,
}

impl AppState {
    pub(crate) fn new(supply_service: SupplyService) -> Self {
        AppState {
            supply_service,
            api_status: ApiStatusState::new(),
        }
    }

    pub(crate) fn supply_service(&self) -> &SupplyService {
        &self.supply_service
    }

    pub(crate) fn api_status(&self) -> &ApiStatusState {
        &self.api_status
    }
}
