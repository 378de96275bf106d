// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// Errors surfaced synchronously by the multiplexer.
///
/// Transport-level failures are never returned here; they reach subscribers
/// as [`ChannelEvent::Error`](crate::event::ChannelEvent::Error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MuxError {
    /// No usable duplex-socket implementation (or no async runtime) exists in
    /// this environment. Permanent: retrying will not help.
    UnsupportedEnvironment(String),
    /// Channel name outside `management`, `configure`, `iam`.
    UnknownChannel(String),
    /// Page origin could not be interpreted as a scheme + host.
    InvalidOrigin(String),
}

impl MuxError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedEnvironment(_) => "UNSUPPORTED_ENVIRONMENT",
            Self::UnknownChannel(_) => "UNKNOWN_CHANNEL",
            Self::InvalidOrigin(_) => "INVALID_ORIGIN",
        }
    }

    /// Whether the failure is permanent for this process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnsupportedEnvironment(_))
    }
}

impl fmt::Display for MuxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedEnvironment(detail) => {
                write!(f, "{}: {detail}", self.as_str())
            }
            Self::UnknownChannel(name) => write!(f, "{}: {name:?}", self.as_str()),
            Self::InvalidOrigin(origin) => write!(f, "{}: {origin:?}", self.as_str()),
        }
    }
}

impl std::error::Error for MuxError {}
