// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel multiplexer: deduplicated, multi-subscriber access to the
//! management server's WebSocket channels.
//!
//! The multiplexer is an explicit context object, not a global. Mutation goes
//! through `&mut self`, so a single owner drives it; callbacks run on the
//! per-socket reader tasks.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::channel::Channel;
use crate::endpoint::{Endpoint, EndpointKey, Origin};
use crate::error::MuxError;
use crate::event::ChannelEvent;
use crate::socket::{SocketWrapper, Subscription};
use crate::transport::{default_transport, select_transport, Transport};

/// Registry of live sockets keyed by endpoint URL, plus the session token.
pub struct Multiplexer {
    origin: Origin,
    token: Option<String>,
    transport: Result<Arc<dyn Transport>, MuxError>,
    sockets: HashMap<EndpointKey, SocketWrapper>,
    /// Parent of every reader's token; cancelled on drop.
    shutdown: CancellationToken,
}

impl Multiplexer {
    /// Multiplexer using the default WebSocket transport.
    pub fn new(origin: Origin) -> Self {
        Self::from_selection(origin, default_transport())
    }

    /// Multiplexer using `primary`, or `fallback` when the primary is missing
    /// or unavailable. With neither, every `open_channel` fails.
    pub fn with_transports(
        origin: Origin,
        primary: Option<Arc<dyn Transport>>,
        fallback: Option<Arc<dyn Transport>>,
    ) -> Self {
        Self::from_selection(origin, select_transport(primary, fallback))
    }

    fn from_selection(origin: Origin, transport: Result<Arc<dyn Transport>, MuxError>) -> Self {
        match transport {
            Ok(ref t) => tracing::debug!(transport = t.name(), host = %origin.host, "multiplexer ready"),
            Err(ref e) => tracing::warn!(err = %e, "realtime messaging unavailable"),
        }
        Self {
            origin,
            token: None,
            transport,
            sockets: HashMap::new(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Replace the session token. Open sockets are left alone; only later
    /// `open_channel` calls see the new value.
    pub fn set_authorization(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Back to the "not yet authorized" state.
    pub fn clear_authorization(&mut self) {
        self.token = None;
    }

    pub fn authorization(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Endpoint `open_channel` would use right now for `channel`.
    pub fn endpoint(&self, channel: Channel) -> Endpoint {
        Endpoint::new(self.origin.clone(), self.token.clone().unwrap_or_default(), channel)
    }

    /// Register `callback` on `channel`, connecting first if no socket exists
    /// for the current endpoint.
    ///
    /// Never blocks: the connection is opened on a spawned task and all
    /// results (messages, errors, close) arrive through the callback. The same
    /// callback registered twice fires twice per event.
    ///
    /// Fails only when the environment cannot host a socket at all (no
    /// transport, or called outside a tokio runtime).
    pub fn open_channel<F>(&mut self, channel: Channel, callback: F) -> Result<Subscription, MuxError>
    where
        F: Fn(&ChannelEvent) + Send + Sync + 'static,
    {
        let transport = self.transport.clone()?;
        let runtime = Handle::try_current()
            .map_err(|e| MuxError::UnsupportedEnvironment(format!("no async runtime: {e}")))?;

        let endpoint = self.endpoint(channel);
        let subscription = match self.sockets.entry(endpoint.key()) {
            Entry::Occupied(entry) => entry.get().subscribe(Arc::new(callback)),
            Entry::Vacant(entry) => {
                tracing::debug!(endpoint = %endpoint.redacted(), "opening socket");
                let socket = SocketWrapper::new(endpoint, self.shutdown.child_token());
                let subscription = socket.subscribe(Arc::new(callback));
                socket.start(transport, &runtime);
                entry.insert(socket);
                subscription
            }
        };
        Ok(subscription)
    }
}

impl Drop for Multiplexer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl std::fmt::Debug for Multiplexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Multiplexer")
            .field("origin", &self.origin)
            .field("authorized", &self.token.is_some())
            .field("sockets", &self.sockets.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "mux_tests.rs"]
mod tests;
