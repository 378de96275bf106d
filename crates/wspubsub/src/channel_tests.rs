// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::Channel;
use crate::error::MuxError;

#[yare::parameterized(
    management = { "management", Channel::Management },
    configure  = { "configure", Channel::Configure },
    iam        = { "iam", Channel::Iam },
)]
fn parses_known_names(name: &str, expected: Channel) -> anyhow::Result<()> {
    let parsed: Channel = name.parse()?;
    assert_eq!(parsed, expected);
    assert_eq!(parsed.to_string(), name);
    Ok(())
}

#[yare::parameterized(
    empty      = { "" },
    uppercase  = { "Management" },
    unknown    = { "status" },
    whitespace = { " iam" },
)]
fn rejects_unknown_names(name: &str) {
    let result: Result<Channel, MuxError> = name.parse();
    assert_eq!(result, Err(MuxError::UnknownChannel(name.to_owned())));
}

#[test]
fn serde_uses_lowercase_names() -> anyhow::Result<()> {
    let json = serde_json::to_string(&Channel::Iam)?;
    assert_eq!(json, "\"iam\"");
    let back: Channel = serde_json::from_str("\"configure\"")?;
    assert_eq!(back, Channel::Configure);
    Ok(())
}
