// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket transport over `tokio-tungstenite`.

use futures_util::future::BoxFuture;
use futures_util::StreamExt;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use super::{EventStream, Transport};
use crate::event::{ChannelEvent, Payload};

/// Primary transport: RFC 6455 WebSocket client, `ws://` and `wss://`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsTransport;

impl WsTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for WsTransport {
    fn name(&self) -> &'static str {
        "tungstenite"
    }

    fn connect(&self, url: String) -> BoxFuture<'static, anyhow::Result<EventStream>> {
        Box::pin(async move {
            let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
            let events = ws_stream.filter_map(|msg| std::future::ready(map_message(msg)));
            Ok(events.boxed())
        })
    }
}

/// Map one upstream frame to a channel event. Control frames are dropped.
fn map_message(msg: Result<Message, WsError>) -> Option<ChannelEvent> {
    match msg {
        Ok(Message::Text(text)) => Some(ChannelEvent::text(text.as_str())),
        Ok(Message::Binary(data)) => Some(ChannelEvent::Message { payload: Payload::from(data) }),
        Ok(Message::Close(Some(frame))) => {
            Some(ChannelEvent::closed(Some(u16::from(frame.code)), frame.reason.as_str()))
        }
        Ok(Message::Close(None)) => Some(ChannelEvent::closed(None, "")),
        Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => None,
        Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => None,
        Err(e) => Some(ChannelEvent::error(e.to_string())),
    }
}

#[cfg(test)]
#[path = "ws_tests.rs"]
mod tests;
