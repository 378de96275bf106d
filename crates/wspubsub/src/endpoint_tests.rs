// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use proptest::prelude::*;

use super::{Endpoint, Origin};
use crate::channel::Channel;
use crate::error::MuxError;

#[test]
fn secure_page_uses_wss() {
    let ep = Endpoint::new(Origin::new("central.example.org", true), "abc123", Channel::Management);
    assert_eq!(ep.url(), "wss://central.example.org/vc/ws/abc123/management");
}

#[test]
fn insecure_page_without_token_keeps_empty_segment() {
    let ep = Endpoint::new(Origin::new("localhost:8080", false), "", Channel::Configure);
    assert_eq!(ep.url(), "ws://localhost:8080/vc/ws//configure");
}

#[yare::parameterized(
    slash    = { "a/b", "a%2Fb" },
    query    = { "a?b=1", "a%3Fb%3D1" },
    fragment = { "a#b", "a%23b" },
    space    = { "a b", "a%20b" },
    unicode  = { "\u{e9}", "%C3%A9" },
    safe     = { "Ab0-_.~", "Ab0-_.~" },
)]
fn token_is_percent_encoded(token: &str, encoded: &str) {
    let ep = Endpoint::new(Origin::new("h", false), token, Channel::Iam);
    assert_eq!(ep.url(), format!("ws://h/vc/ws/{encoded}/iam"));
}

#[test]
fn redacted_hides_token() {
    let ep = Endpoint::new(Origin::new("h", true), "secret-token", Channel::Iam);
    let redacted = ep.redacted();
    assert_eq!(redacted, "wss://h/vc/ws/***/iam");
    assert!(!format!("{ep:?}").contains("secret-token"));
    assert!(!format!("{:?}", ep.key()).contains("secret-token"));
}

#[test]
fn token_change_changes_key() {
    let origin = Origin::new("h", false);
    let a = Endpoint::new(origin.clone(), "one", Channel::Management);
    let b = Endpoint::new(origin, "two", Channel::Management);
    assert_ne!(a.key(), b.key());
}

#[yare::parameterized(
    https_with_path = { "https://central.example.org/index.html", true, "central.example.org" },
    http_with_port  = { "http://127.0.0.1:8080", false, "127.0.0.1:8080" },
    https_query     = { "https://h:8443?x=1", true, "h:8443" },
    http_fragment   = { "http://h#top", false, "h" },
)]
fn origin_from_page_url(url: &str, secure: bool, host: &str) -> anyhow::Result<()> {
    let origin = Origin::from_page_url(url)?;
    assert_eq!(origin, Origin::new(host, secure));
    Ok(())
}

#[yare::parameterized(
    no_scheme  = { "central.example.org" },
    ws_scheme  = { "ws://central.example.org" },
    empty_host = { "https:///path" },
)]
fn origin_rejects_bad_page_url(url: &str) {
    assert_eq!(Origin::from_page_url(url), Err(MuxError::InvalidOrigin(url.to_owned())));
}

proptest! {
    #[test]
    fn url_shape_holds_for_any_token(
        host in "[a-z0-9.-]{1,24}(:[0-9]{1,5})?",
        token in "[A-Za-z0-9_-]{0,40}",
        secure in any::<bool>(),
        idx in 0usize..3,
    ) {
        let channel = Channel::ALL[idx];
        let ep = Endpoint::new(Origin::new(host.clone(), secure), token.clone(), channel);
        let scheme = if secure { "wss" } else { "ws" };
        prop_assert_eq!(ep.url(), format!("{scheme}://{host}/vc/ws/{token}/{channel}"));
        let key = ep.key();
        prop_assert_eq!(key.as_str(), ep.url());
    }
}
