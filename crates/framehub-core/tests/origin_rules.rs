//! Origin parsing and normalization rules.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use framehub_core::error::ErrorCode;
use framehub_core::Origin;

#[test]
fn parses_scheme_host() {
    let o = Origin::parse("https://portal.acme.com").unwrap();
    assert_eq!(o.scheme, "https");
    assert_eq!(o.host, "portal.acme.com");
    assert_eq!(o.port, None);
    assert_eq!(o.to_string(), "https://portal.acme.com");
}

#[test]
fn parses_explicit_port() {
    let o = Origin::parse("http://localhost:8080").unwrap();
    assert_eq!(o.host, "localhost");
    assert_eq!(o.port, Some(8080));
    assert_eq!(o.to_string(), "http://localhost:8080");
}

#[test]
fn drops_path_query_and_fragment() {
    let o = Origin::parse("https://widgets.acme.com/embed/map?z=4#pin").unwrap();
    assert_eq!(o.host, "widgets.acme.com");
    assert_eq!(o.port, None);
}

#[test]
fn lowercases_scheme_and_host() {
    let o = Origin::parse("HTTPS://Widgets.Acme.COM:443").unwrap();
    assert_eq!(o.scheme, "https");
    assert_eq!(o.host, "widgets.acme.com");
    assert_eq!(o.port, Some(443));
}

#[test]
fn port_is_identity_relevant() {
    let a = Origin::parse("https://w.acme.com").unwrap();
    let b = Origin::parse("https://w.acme.com:8443").unwrap();
    assert_ne!(a, b);
}

#[test]
fn rejects_malformed_origins() {
    for bad in [
        "",
        "portal.acme.com",
        "://no-scheme.com",
        "https://",
        "https:///path-only",
        "https://host:notaport",
    ] {
        let err = Origin::parse(bad).unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest, "input {bad:?}");
    }
}
