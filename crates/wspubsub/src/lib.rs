// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! wspubsub: channel-scoped WebSocket multiplexing for the management server.
//!
//! Callers ask for a named channel (`management`, `configure`, `iam`) and a
//! callback. One connection is kept per endpoint URL
//! (`<scheme>://<host>/vc/ws/<token>/<channel>`); every inbound message,
//! transport error, and close is fanned out to all callbacks registered on it.

pub mod channel;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod event;
pub mod mux;
pub mod socket;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use channel::Channel;
pub use endpoint::{Endpoint, Origin};
pub use error::MuxError;
pub use event::{ChannelEvent, Payload};
pub use mux::Multiplexer;
pub use socket::Subscription;
pub use transport::{Transport, WsTransport};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

use crate::config::WsPubSubConfig;

/// Subscribe to the configured channels and print each event as one JSON
/// line on stdout until every channel has closed or Ctrl-C.
pub async fn run(config: WsPubSubConfig) -> anyhow::Result<()> {
    let channels = config.channels()?;
    let mut mux = Multiplexer::new(config.origin()?);
    if let Some(ref token) = config.token {
        mux.set_authorization(token.clone());
    }

    let open = Arc::new(AtomicUsize::new(channels.len()));
    let all_closed = Arc::new(Notify::new());

    for channel in channels {
        let open = Arc::clone(&open);
        let all_closed = Arc::clone(&all_closed);
        let _subscription = mux.open_channel(channel, move |event: &ChannelEvent| {
            let line = serde_json::json!({ "channel": channel, "event": event });
            println!("{line}");
            if event.is_closed() && open.fetch_sub(1, Ordering::AcqRel) == 1 {
                all_closed.notify_one();
            }
        })?;
        tracing::info!(channel = %channel, "subscribed");
    }

    tokio::select! {
        _ = all_closed.notified() => tracing::info!("all channels closed"),
        _ = tokio::signal::ctrl_c() => tracing::info!("interrupted"),
    }
    Ok(())
}
