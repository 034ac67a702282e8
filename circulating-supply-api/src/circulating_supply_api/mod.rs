// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

pub(crate) mod aggregator;
pub(crate) mod cache;
pub(crate) mod calculator;
pub(crate) mod error;
pub(crate) mod handlers;
pub(crate) mod service;

pub(crate) use service::SupplyService;
