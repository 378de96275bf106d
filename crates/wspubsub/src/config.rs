// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;

use crate::channel::Channel;
use crate::endpoint::Origin;

/// Configuration for the wspubsub channel listener.
#[derive(Debug, Clone, Parser)]
#[command(name = "wspubsub", version, about = "Listen on management server WebSocket channels.")]
pub struct WsPubSubConfig {
    /// Management server host, with port if non-default.
    #[arg(long, env = "WSPUBSUB_HOST", required_unless_present = "page_url")]
    pub host: Option<String>,

    /// Connect with `wss://` (page served over https). Only used with --host.
    #[arg(long, env = "WSPUBSUB_SECURE", conflicts_with = "page_url")]
    pub secure: bool,

    /// Dashboard page URL (`http(s)://host[:port]/...`); scheme and host are
    /// taken from it instead of --host/--secure.
    #[arg(long, env = "WSPUBSUB_PAGE_URL", conflicts_with = "host")]
    pub page_url: Option<String>,

    /// Authorization token. Unset connects with an empty token segment.
    #[arg(long, env = "WSPUBSUB_TOKEN")]
    pub token: Option<String>,

    /// Channel to listen on (repeatable): management, configure, iam.
    #[arg(long = "channel", default_value = "management", env = "WSPUBSUB_CHANNELS", value_delimiter = ',')]
    pub channel: Vec<String>,

    /// Log filter (tracing `EnvFilter` syntax).
    #[arg(long, default_value = "info", env = "WSPUBSUB_LOG_LEVEL")]
    pub log_level: String,

    /// Log format: text or json.
    #[arg(long, default_value = "text", env = "WSPUBSUB_LOG_FORMAT")]
    pub log_format: String,
}

impl WsPubSubConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.origin()?;
        self.channels()?;
        match self.log_format.as_str() {
            "text" | "json" => Ok(()),
            other => anyhow::bail!("invalid --log-format: {other} (expected text or json)"),
        }
    }

    /// Origin from `--page-url`, or from `--host` and `--secure`.
    pub fn origin(&self) -> anyhow::Result<Origin> {
        if let Some(ref page_url) = self.page_url {
            return Ok(Origin::from_page_url(page_url)?);
        }
        let host = self.host.as_deref().unwrap_or_default().trim();
        if host.is_empty() {
            anyhow::bail!("--host must not be empty");
        }
        if host.contains('/') {
            anyhow::bail!("--host takes a host[:port], not a URL (use --page-url): {host}");
        }
        Ok(Origin::new(host, self.secure))
    }

    /// Requested channels, deduplicated, in first-seen order.
    pub fn channels(&self) -> anyhow::Result<Vec<Channel>> {
        let mut out = Vec::new();
        for name in &self.channel {
            let channel: Channel = name.trim().parse()?;
            if !out.contains(&channel) {
                out.push(channel);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
