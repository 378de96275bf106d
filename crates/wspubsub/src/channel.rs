// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MuxError;

/// Named logical stream served under `/vc/ws/<token>/<channel>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Management,
    Configure,
    Iam,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Management, Channel::Configure, Channel::Iam];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Management => "management",
            Self::Configure => "configure",
            Self::Iam => "iam",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = MuxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| MuxError::UnknownChannel(s.to_owned()))
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
