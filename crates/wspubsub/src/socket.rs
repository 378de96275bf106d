// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket wrapper: one upstream connection fanned out to many callbacks.

use std::sync::{Arc, Weak};

use futures_util::StreamExt;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::channel::Channel;
use crate::endpoint::Endpoint;
use crate::event::{ChannelEvent, ABNORMAL_CLOSURE};
use crate::transport::Transport;

/// Subscriber callback. Invoked on the socket's reader task.
pub type Callback = Arc<dyn Fn(&ChannelEvent) + Send + Sync>;

struct Subscriber {
    id: u64,
    callback: Callback,
}

/// Ordered, add-only (unless a [`Subscription`] is used) callback list.
///
/// `closed` holds the terminal event once the socket is dead, so late
/// registrations still learn about it.
#[derive(Default)]
pub(crate) struct SubscriberList {
    next_id: u64,
    entries: Vec<Subscriber>,
    closed: Option<ChannelEvent>,
}

impl SubscriberList {
    fn push(&mut self, callback: Callback) -> u64 {
        self.next_id += 1;
        self.entries.push(Subscriber { id: self.next_id, callback });
        self.next_id
    }

    fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|s| s.id != id);
        self.entries.len() != before
    }

    fn snapshot(&self) -> Vec<Callback> {
        self.entries.iter().map(|s| Arc::clone(&s.callback)).collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Invoke every callback, in registration order, with the same event.
///
/// The list is snapshotted first so callbacks may unsubscribe (themselves or
/// others) without deadlocking; removals take effect from the next event.
pub(crate) fn fan_out(subscribers: &Mutex<SubscriberList>, event: &ChannelEvent) {
    let callbacks = subscribers.lock().snapshot();
    for callback in callbacks {
        callback(event);
    }
}

/// Record `event` as terminal, then fan it out.
///
/// Marking and snapshotting happen under one lock: a concurrent `subscribe`
/// lands either in the snapshot or after the mark, never both.
pub(crate) fn close_out(subscribers: &Mutex<SubscriberList>, event: ChannelEvent) {
    let callbacks = {
        let mut list = subscribers.lock();
        list.closed = Some(event.clone());
        list.snapshot()
    };
    for callback in callbacks {
        callback(&event);
    }
}

/// Handle for one registration returned by `open_channel`.
///
/// Dropping the handle leaves the callback registered.
#[must_use = "dropping a Subscription keeps the callback registered; call unsubscribe() to remove it"]
pub struct Subscription {
    id: u64,
    channel: Channel,
    subscribers: Weak<Mutex<SubscriberList>>,
}

impl Subscription {
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Remove this registration. Returns `false` if it was already gone.
    pub fn unsubscribe(self) -> bool {
        match self.subscribers.upgrade() {
            Some(list) => list.lock().remove(self.id),
            None => false,
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).field("channel", &self.channel).finish()
    }
}

/// Owns one connection to one endpoint plus the callbacks listening on it.
pub(crate) struct SocketWrapper {
    endpoint: Endpoint,
    subscribers: Arc<Mutex<SubscriberList>>,
    cancel: CancellationToken,
}

impl SocketWrapper {
    /// `cancel` stops the reader; pass a child of the multiplexer's token.
    pub(crate) fn new(endpoint: Endpoint, cancel: CancellationToken) -> Self {
        Self { endpoint, subscribers: Arc::new(Mutex::new(SubscriberList::default())), cancel }
    }

    /// Append `callback`. On a socket that already closed, the stored
    /// `Closed` is delivered to it immediately, on the caller's thread.
    pub(crate) fn subscribe(&self, callback: Callback) -> Subscription {
        let (id, closed) = {
            let mut list = self.subscribers.lock();
            let id = list.push(Arc::clone(&callback));
            (id, list.closed.clone())
        };
        if let Some(event) = closed {
            callback(&event);
        }
        Subscription {
            id,
            channel: self.endpoint.channel,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Spawn the reader task. Called once, after the first subscriber is in.
    pub(crate) fn start(&self, transport: Arc<dyn Transport>, runtime: &Handle) {
        let endpoint = self.endpoint.clone();
        let subscribers = Arc::clone(&self.subscribers);
        let cancel = self.cancel.clone();
        runtime.spawn(run_socket(endpoint, transport, subscribers, cancel));
    }
}

impl Drop for SocketWrapper {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Connect, then forward every inbound event until the connection ends.
///
/// Guarantees exactly one trailing `Closed` unless cancelled first. There is
/// no reconnect: a closed socket stays closed.
async fn run_socket(
    endpoint: Endpoint,
    transport: Arc<dyn Transport>,
    subscribers: Arc<Mutex<SubscriberList>>,
    cancel: CancellationToken,
) {
    let redacted = endpoint.redacted();
    let connect = tokio::select! {
        _ = cancel.cancelled() => return,
        result = transport.connect(endpoint.url()) => result,
    };

    let mut events = match connect {
        Ok(events) => {
            tracing::debug!(endpoint = %redacted, transport = transport.name(), "socket connected");
            events
        }
        Err(e) => {
            tracing::warn!(endpoint = %redacted, err = %e, "socket connect failed");
            fan_out(&subscribers, &ChannelEvent::error(format!("{e:#}")));
            close_out(&subscribers, ChannelEvent::closed(Some(ABNORMAL_CLOSURE), ""));
            return;
        }
    };

    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(endpoint = %redacted, "socket cancelled");
                return;
            }
            next = events.next() => next,
        };

        match next {
            Some(event @ ChannelEvent::Closed { .. }) => {
                tracing::debug!(endpoint = %redacted, "socket closed by peer");
                close_out(&subscribers, event);
                return;
            }
            Some(event @ ChannelEvent::Error { .. }) => {
                tracing::debug!(endpoint = %redacted, ?event, "socket error");
                fan_out(&subscribers, &event);
                close_out(&subscribers, ChannelEvent::closed(Some(ABNORMAL_CLOSURE), ""));
                return;
            }
            Some(event) => fan_out(&subscribers, &event),
            None => {
                tracing::debug!(endpoint = %redacted, "socket stream ended");
                close_out(&subscribers, ChannelEvent::closed(Some(ABNORMAL_CLOSURE), ""));
                return;
            }
        }
    }
}

#[cfg(test)]
#[path = "socket_tests.rs"]
mod tests;
