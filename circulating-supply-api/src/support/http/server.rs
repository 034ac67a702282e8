// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use anyhow::anyhow;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::WaitForCancellationFutureOwned;
use tracing::{error, info};

pub(crate) struct ApiHttpServer {
    router: Router,
    listener: TcpListener,
}

impl ApiHttpServer {
    pub(crate) async fn build(bind_address: &SocketAddr, router: Router) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(bind_address)
            .await
            .map_err(|err| anyhow!("Couldn't bind to address {bind_address} due to {err}"))?;

        Ok(ApiHttpServer { router, listener })
    }

    pub(crate) fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub(crate) async fn run(self, receiver: WaitForCancellationFutureOwned) {
        // into_make_service_with_connect_info allows us to see client ip address
        // in middleware, for logging, TLS, routing etc.
        let inner = axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(receiver);

        if let Err(err) = inner.await {
            error!("the HTTP server has terminated with the error: {err}");
        } else {
            info!("the HTTP server has terminated without errors");
        }
    }
}
