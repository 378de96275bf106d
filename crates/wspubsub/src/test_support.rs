// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test infrastructure: scripted transport and callback recorder.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::StreamExt;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::event::ChannelEvent;
use crate::transport::{EventStream, Transport};

/// Poll `check` until it holds or two seconds pass.
pub async fn wait_until(what: &str, check: impl Fn() -> bool) -> anyhow::Result<()> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !check() {
        if tokio::time::Instant::now() >= deadline {
            anyhow::bail!("timed out waiting for {what}");
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    Ok(())
}

/// Transport whose connections are driven by the test.
///
/// Each `connect` records the URL and hands back a stream fed by an
/// unbounded channel; the test pushes events with [`MockTransport::push`].
pub struct MockTransport {
    name: &'static str,
    available: bool,
    fail_with: Option<String>,
    urls: Mutex<Vec<String>>,
    senders: Mutex<Vec<mpsc::UnboundedSender<ChannelEvent>>>,
}

impl MockTransport {
    fn build(name: &'static str, available: bool, fail_with: Option<String>) -> Arc<Self> {
        Arc::new(Self {
            name,
            available,
            fail_with,
            urls: Mutex::new(Vec::new()),
            senders: Mutex::new(Vec::new()),
        })
    }

    pub fn new() -> Arc<Self> {
        Self::build("mock", true, None)
    }

    pub fn named(name: &'static str) -> Arc<Self> {
        Self::build(name, true, None)
    }

    pub fn unavailable() -> Arc<Self> {
        Self::build("unavailable", false, None)
    }

    /// Every connect attempt fails with `message`.
    pub fn failing(message: &str) -> Arc<Self> {
        Self::build("failing", true, Some(message.to_owned()))
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }

    pub fn connect_count(&self) -> usize {
        self.urls.lock().len()
    }

    pub async fn wait_for_connects(&self, n: usize) -> anyhow::Result<()> {
        wait_until("connects", || self.senders.lock().len() >= n).await
    }

    /// Deliver `event` on the `conn`-th connection.
    pub fn push(&self, conn: usize, event: ChannelEvent) -> anyhow::Result<()> {
        let senders = self.senders.lock();
        let tx = senders.get(conn).ok_or_else(|| anyhow::anyhow!("no connection {conn}"))?;
        tx.send(event).map_err(|_| anyhow::anyhow!("connection {conn} is gone"))
    }

    /// End the `conn`-th connection's stream without a close frame.
    pub fn hang_up(&self, conn: usize) {
        let mut senders = self.senders.lock();
        if let Some(tx) = senders.get_mut(conn) {
            let (dead, _) = mpsc::unbounded_channel();
            *tx = dead;
        }
    }

    /// Whether the reader for the `conn`-th connection has gone away.
    pub fn is_dropped(&self, conn: usize) -> bool {
        self.senders.lock().get(conn).is_some_and(|tx| tx.is_closed())
    }
}

impl Transport for MockTransport {
    fn name(&self) -> &'static str {
        self.name
    }

    fn available(&self) -> bool {
        self.available
    }

    fn connect(&self, url: String) -> BoxFuture<'static, anyhow::Result<EventStream>> {
        self.urls.lock().push(url);
        if let Some(ref message) = self.fail_with {
            let message = message.clone();
            return Box::pin(async move { Err(anyhow::anyhow!(message)) });
        }
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.lock().push(tx);
        let stream = futures_util::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        });
        Box::pin(async move { Ok(stream.boxed()) })
    }
}

/// Collects `(label, event)` pairs from callbacks in invocation order.
#[derive(Clone, Default)]
pub struct Recorder {
    seen: Arc<Mutex<Vec<(String, ChannelEvent)>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn callback(&self, label: &str) -> impl Fn(&ChannelEvent) + Clone + Send + Sync + 'static {
        let seen = Arc::clone(&self.seen);
        let label = label.to_owned();
        move |event: &ChannelEvent| seen.lock().push((label.clone(), event.clone()))
    }

    pub fn events(&self) -> Vec<(String, ChannelEvent)> {
        self.seen.lock().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.seen.lock().iter().map(|(label, _)| label.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub async fn wait_for(&self, n: usize) -> anyhow::Result<()> {
        wait_until("callbacks", || self.len() >= n).await
    }
}
