// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Endpoint derivation: page origin + authorization token + channel → URL.
//!
//! The URL string doubles as the registry key, so two endpoints compare equal
//! exactly when they would connect to the same place.

use std::fmt;

use crate::channel::Channel;
use crate::error::MuxError;

/// Fixed path prefix served by the management server.
pub const PATH_PREFIX: &str = "vc/ws";

/// Scheme and host of the page the multiplexer runs on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// Page was loaded over a secure transport (`https`).
    pub secure: bool,
    /// Host, including port when non-default (`central.example.org:8443`).
    pub host: String,
}

impl Origin {
    pub fn new(host: impl Into<String>, secure: bool) -> Self {
        Self { secure, host: host.into() }
    }

    /// Derive the origin from an `http(s)://host[:port][/path]` page URL.
    pub fn from_page_url(page_url: &str) -> Result<Self, MuxError> {
        let (secure, rest) = if let Some(rest) = page_url.strip_prefix("https://") {
            (true, rest)
        } else if let Some(rest) = page_url.strip_prefix("http://") {
            (false, rest)
        } else {
            return Err(MuxError::InvalidOrigin(page_url.to_owned()));
        };

        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if host.is_empty() {
            return Err(MuxError::InvalidOrigin(page_url.to_owned()));
        }
        Ok(Self { secure, host: host.to_owned() })
    }

    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "wss"
        } else {
            "ws"
        }
    }
}

/// Registry key: the fully-qualified endpoint URL.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EndpointKey(String);

impl EndpointKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keys embed the token; keep it out of debug output.
        f.write_str("EndpointKey(..)")
    }
}

/// One logical duplex channel: where to connect, as whom, for which stream.
#[derive(Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub origin: Origin,
    /// Authorization token. Empty when no token has been set.
    pub token: String,
    pub channel: Channel,
}

impl Endpoint {
    pub fn new(origin: Origin, token: impl Into<String>, channel: Channel) -> Self {
        Self { origin, token: token.into(), channel }
    }

    /// `<scheme>://<host>/vc/ws/<token>/<channel>`, token percent-encoded
    /// so it always stays one path segment.
    pub fn url(&self) -> String {
        format!(
            "{}://{}/{PATH_PREFIX}/{}/{}",
            self.origin.scheme(),
            self.origin.host,
            encode_segment(&self.token),
            self.channel
        )
    }

    pub fn key(&self) -> EndpointKey {
        EndpointKey(self.url())
    }

    /// URL with the token elided, safe for logs.
    pub fn redacted(&self) -> String {
        let token = if self.token.is_empty() { "" } else { "***" };
        format!(
            "{}://{}/{PATH_PREFIX}/{token}/{}",
            self.origin.scheme(),
            self.origin.host,
            self.channel
        )
    }
}

/// Percent-encode everything outside RFC 3986 unreserved characters.
fn encode_segment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(char::from(b))
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Endpoint").field(&self.redacted()).finish()
    }
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod tests;
