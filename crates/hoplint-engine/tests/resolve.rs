//! Per-rule resolution behavior against a scripted site.

mod support;

use hoplint_core::{MAX_REDIRECT_HOPS, ProbeStatus, RedirectRule};
use hoplint_engine::{ResolveOptions, resolve_all, resolve_rule};
use support::{Page, ScriptedProber};
use url::Url;

fn rule(source: &str, destination: &str) -> RedirectRule {
    RedirectRule {
        source_path: source.to_string(),
        destination_path: destination.to_string(),
        is_duplicate_source: false,
        duplicate_ordinal: 0,
        is_over_qualified: false,
        has_identical_endpoints: false,
    }
}

fn base() -> Url {
    Url::parse("https://example.com").unwrap()
}

#[tokio::test]
async fn test_single_hop_redirect_resolves_cleanly() {
    let prober = ScriptedProber::new()
        .page("https://example.com/old-page", Page::redirect(301, "/new-page"))
        .page("https://example.com/new-page", Page::ok());

    let result = resolve_rule(&prober, &base(), &rule("/old-page", "/new-page")).await;

    assert_eq!(result.status, ProbeStatus::Http(200));
    assert_eq!(result.final_url, "https://example.com/new-page");
    assert!(result.was_redirected);
    assert_eq!(result.hop_count, 1);
    assert!(result.matches_destination);
    assert_eq!(
        result.chain,
        vec![
            "https://example.com/old-page".to_string(),
            "https://example.com/new-page".to_string(),
        ]
    );
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_source_that_never_redirects() {
    let prober = ScriptedProber::new().page("https://example.com/stay", Page::ok());

    let result = resolve_rule(&prober, &base(), &rule("/stay", "/elsewhere")).await;

    assert_eq!(result.status, ProbeStatus::Http(200));
    assert!(!result.was_redirected);
    assert_eq!(result.hop_count, 0);
    assert_eq!(result.final_url, "https://example.com/stay");
    assert!(!result.matches_destination);
    assert_eq!(result.chain, vec!["https://example.com/stay".to_string()]);
}

#[tokio::test]
async fn test_http_error_carries_descriptive_message() {
    let prober = ScriptedProber::new().page("https://example.com/gone", Page::status(404));

    let result = resolve_rule(&prober, &base(), &rule("/gone", "/new")).await;

    assert_eq!(result.status, ProbeStatus::Http(404));
    assert_eq!(
        result.error.as_deref(),
        Some("HTTP error 404 for https://example.com/gone")
    );
    assert_eq!(result.hop_count, 0);
}

#[tokio::test]
async fn test_transport_failure_becomes_data_not_error() {
    // Nothing scripted: the host is unreachable.
    let prober = ScriptedProber::new();

    let result = resolve_rule(&prober, &base(), &rule("/old", "/new")).await;

    assert_eq!(result.status, ProbeStatus::TransportFailed);
    assert_eq!(result.final_url, "https://example.com/old");
    assert_eq!(result.chain, vec!["https://example.com/old".to_string()]);
    assert!(result.error.as_deref().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_chain_that_dies_after_the_first_hop() {
    // The source redirects off-site and the target host never answers.
    let prober = ScriptedProber::new()
        .page(
            "https://example.com/moved",
            Page::redirect(302, "https://gone.example/x"),
        )
        .page("https://gone.example/x", Page::Fail("dns error".to_string()));

    let result = resolve_rule(&prober, &base(), &rule("/moved", "/new")).await;

    assert_eq!(result.status, ProbeStatus::TransportFailed);
    // The one hop that was observed stays on the record.
    assert_eq!(result.hop_count, 1);
    assert!(result.was_redirected);
    assert_eq!(result.final_url, "https://gone.example/x");
    assert_eq!(
        result.chain,
        vec![
            "https://example.com/moved".to_string(),
            "https://gone.example/x".to_string(),
        ]
    );
    assert!(result.error.as_deref().unwrap().contains("dns error"));
}

#[tokio::test]
async fn test_redirect_back_to_source_counts_one_hop() {
    // First probe sees the redirect-to-self; later probes get a plain 200,
    // like a server whose redirect depends on request state.
    let prober = ScriptedProber::new().page_sequence(
        "https://example.com/loop",
        vec![Page::redirect(301, "/loop"), Page::ok()],
    );

    let result = resolve_rule(&prober, &base(), &rule("/loop", "/new")).await;

    assert_eq!(result.status, ProbeStatus::Http(200));
    assert_eq!(result.final_url, "https://example.com/loop");
    // The outcome is "you end up where you started".
    assert!(!result.was_redirected);
    // But the observed redirect is still on the books.
    assert_eq!(result.hop_count, 1);
}

#[tokio::test]
async fn test_hop_counting_stops_at_the_cap() {
    let mut prober = ScriptedProber::new().page("https://example.com/done", Page::ok());
    for hop in 0..7 {
        prober = prober.page(
            &format!("https://example.com/hop{}", hop),
            Page::redirect(301, &format!("/hop{}", hop + 1)),
        );
    }
    let prober = prober.page("https://example.com/hop7", Page::redirect(301, "/done"));

    let result = resolve_rule(&prober, &base(), &rule("/hop0", "/done")).await;

    assert_eq!(result.status, ProbeStatus::Http(200));
    assert_eq!(result.final_url, "https://example.com/done");
    assert_eq!(result.hop_count, MAX_REDIRECT_HOPS);
    // The trace records the capped chain and stops fetching there.
    assert_eq!(result.chain.len(), (MAX_REDIRECT_HOPS + 1) as usize);
    assert_eq!(result.chain.last().unwrap(), "https://example.com/hop5");
    assert!(!prober.requested("head", "https://example.com/hop5"));
    assert!(!prober.requested("head", "https://example.com/hop6"));
}

#[tokio::test]
async fn test_unparseable_source_fails_without_probing() {
    let prober = ScriptedProber::new();

    let result = resolve_rule(&prober, &base(), &rule("http://[bad", "/new")).await;

    assert_eq!(result.status, ProbeStatus::TransportFailed);
    assert!(result.error.as_deref().unwrap().contains("invalid source URL"));
    assert_eq!(prober.request_count(), 0);
}

#[tokio::test]
async fn test_duplicate_rules_are_answered_without_probing() {
    let prober = ScriptedProber::new().page("https://example.com/dup", Page::ok());

    let rules = vec![
        rule("/dup", "/a"),
        {
            let mut dup = rule("/dup", "/b");
            dup.is_duplicate_source = true;
            dup.duplicate_ordinal = 1;
            dup
        },
    ];

    let results = resolve_all(&prober, &base(), &rules, &ResolveOptions::default()).await;

    assert_eq!(results.len(), 2);
    // Only the first occurrence generated traffic.
    assert_eq!(prober.request_count(), 1);
    assert_eq!(results[1].status, ProbeStatus::Http(200));
    assert_eq!(results[1].hop_count, 0);
    assert!(results[1].error.is_none());
    assert_eq!(results[1].chain, vec!["https://example.com/dup".to_string()]);
}

#[tokio::test]
async fn test_results_line_up_with_rules() {
    let prober = ScriptedProber::new()
        .page("https://example.com/a", Page::redirect(301, "/a-new"))
        .page("https://example.com/a-new", Page::ok())
        .page("https://example.com/b", Page::status(404));
    // "/c" is not scripted and fails at the transport level.

    let rules = vec![rule("/a", "/a-new"), rule("/b", "/b-new"), rule("/c", "/c-new")];
    let options = ResolveOptions { concurrency: 3 };

    let results = resolve_all(&prober, &base(), &rules, &options).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].source_url, "https://example.com/a");
    assert_eq!(results[0].status, ProbeStatus::Http(200));
    assert_eq!(results[1].source_url, "https://example.com/b");
    assert_eq!(results[1].status, ProbeStatus::Http(404));
    assert_eq!(results[2].source_url, "https://example.com/c");
    assert_eq!(results[2].status, ProbeStatus::TransportFailed);
}
