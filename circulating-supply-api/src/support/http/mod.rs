// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

pub(crate) mod error;
pub(crate) mod openapi;
pub(crate) mod router;
pub(crate) mod server;
pub(crate) mod state;

pub(crate) use router::RouterBuilder;
