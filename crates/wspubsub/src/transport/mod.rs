// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Duplex-socket implementations the multiplexer can connect through.

pub mod ws;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;

use crate::error::MuxError;
use crate::event::ChannelEvent;

pub use ws::WsTransport;

/// Inbound side of one live connection, already mapped to channel events.
///
/// The stream ends when the connection is gone. A `Closed` or `Error` item
/// is terminal; anything after it is ignored.
pub type EventStream = BoxStream<'static, ChannelEvent>;

/// A way to open a duplex connection to an endpoint URL.
pub trait Transport: Send + Sync {
    /// Implementation name, for logs.
    fn name(&self) -> &'static str;

    /// Whether this implementation can run in the current environment.
    fn available(&self) -> bool {
        true
    }

    /// Open a connection. Failures are reported to subscribers, not retried.
    fn connect(&self, url: String) -> BoxFuture<'static, anyhow::Result<EventStream>>;
}

/// Pick the primary implementation if usable, else the fallback.
pub fn select_transport(
    primary: Option<Arc<dyn Transport>>,
    fallback: Option<Arc<dyn Transport>>,
) -> Result<Arc<dyn Transport>, MuxError> {
    for candidate in [primary, fallback].into_iter().flatten() {
        if candidate.available() {
            return Ok(candidate);
        }
        tracing::debug!(transport = candidate.name(), "transport unavailable, skipping");
    }
    Err(MuxError::UnsupportedEnvironment("no duplex socket implementation available".to_owned()))
}

/// The default selection: `tokio-tungstenite` with no fallback.
pub fn default_transport() -> Result<Arc<dyn Transport>, MuxError> {
    select_transport(Some(Arc::new(WsTransport::new())), None)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
