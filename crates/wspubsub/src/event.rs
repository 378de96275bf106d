// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events fanned out to channel subscribers.
//!
//! Messages, transport errors, and closes all travel down the same ordered
//! subscriber list; the variant tells them apart.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Close code used when the peer went away without a close frame.
pub const ABNORMAL_CLOSURE: u16 = 1006;

/// Raw inbound payload. Parsing is the subscriber's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

impl Payload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(data) => data,
        }
    }
}

impl From<Bytes> for Payload {
    fn from(data: Bytes) -> Self {
        Self::Binary(data.to_vec())
    }
}

/// One event delivered to every subscriber of a socket, in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelEvent {
    /// Inbound frame from the server.
    Message { payload: Payload },
    /// Transport-level failure (connect refused, protocol error, ...).
    Error { message: String },
    /// Connection ended. Delivered at most once per socket, always last.
    Closed {
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<u16>,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        reason: String,
    },
}

impl ChannelEvent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Message { payload: Payload::Text(text.into()) }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }

    pub fn closed(code: Option<u16>, reason: impl Into<String>) -> Self {
        Self::Closed { code, reason: reason.into() }
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Self::Message { payload } => Some(payload),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }

    /// Decode a message payload as JSON.
    ///
    /// Returns `None` for error/close events, `Some(Err)` when the payload is
    /// not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Option<serde_json::Result<T>> {
        self.payload().map(|p| serde_json::from_slice(p.as_bytes()))
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
