#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use framehub_core::Origin;
use framehub_host::policy::OriginPolicy;

fn policy(entries: &[&str]) -> OriginPolicy {
    let raw: Vec<String> = entries.iter().map(|s| s.to_string()).collect();
    OriginPolicy::compile(&raw).expect("must compile")
}

fn origin(s: &str) -> Origin {
    Origin::parse(s).unwrap()
}

#[test]
fn exact_host_match() {
    let p = policy(&["https://widgets.acme.com"]);
    assert!(p.is_allowed(&origin("https://widgets.acme.com")));
    assert!(!p.is_allowed(&origin("https://other.acme.com")));
}

#[test]
fn scheme_is_enforced() {
    let p = policy(&["https://widgets.acme.com"]);
    assert!(!p.is_allowed(&origin("http://widgets.acme.com")));
}

#[test]
fn portless_rule_matches_any_port() {
    let p = policy(&["https://widgets.acme.com"]);
    assert!(p.is_allowed(&origin("https://widgets.acme.com:8443")));
}

#[test]
fn explicit_port_is_exact() {
    let p = policy(&["http://localhost:8080"]);
    assert!(p.is_allowed(&origin("http://localhost:8080")));
    assert!(!p.is_allowed(&origin("http://localhost:9090")));
    assert!(!p.is_allowed(&origin("http://localhost")));
}

#[test]
fn wildcard_matches_subdomains_only() {
    let p = policy(&["https://*.acme.com"]);
    assert!(p.is_allowed(&origin("https://widgets.acme.com")));
    assert!(p.is_allowed(&origin("https://a.b.acme.com")));
    // The apex itself is not a subdomain.
    assert!(!p.is_allowed(&origin("https://acme.com")));
    // Suffix tricks must not pass.
    assert!(!p.is_allowed(&origin("https://evilacme.com")));
}

#[test]
fn empty_policy_is_strict_deny() {
    let p = OriginPolicy::compile(&[]).unwrap();
    assert_eq!(p.rule_count(), 0);
    assert!(!p.is_allowed(&origin("https://widgets.acme.com")));
}

#[test]
fn entries_are_case_insensitive() {
    let p = policy(&["HTTPS://Widgets.Acme.COM"]);
    assert!(p.is_allowed(&origin("https://widgets.acme.com")));
}

#[test]
fn rejects_malformed_entries() {
    for bad in [
        "widgets.acme.com",      // no scheme
        "https://",              // no host
        "https://host:badport",  // bad port
        "https://*",             // bare wildcard
        "https://w*.acme.com",   // infix wildcard
    ] {
        let raw = vec![bad.to_string()];
        assert!(OriginPolicy::compile(&raw).is_err(), "entry {bad:?}");
    }
}
