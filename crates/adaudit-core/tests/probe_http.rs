//! Integration test: CurlProber and the probe batch against a local HTTP server.

mod common;

use adaudit_core::findings::{self, AuditContext, Severity};
use adaudit_core::model::AdRecord;
use adaudit_core::probe::{self, CurlProber, ProbeConfig, ProbeOutcome, ProbeTarget, Prober};
use adaudit_core::utm::UtmPolicy;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use common::status_server;

const TIMEOUT: Duration = Duration::from_secs(5);

fn status_of(outcome: &ProbeOutcome) -> u32 {
    match outcome {
        ProbeOutcome::Responded { status, .. } => *status,
        ProbeOutcome::Failed { reason } => panic!("probe failed: {reason}"),
    }
}

#[test]
fn head_success_uses_head_only() {
    let (base, log) = status_server::start();
    let url = format!("{base}/ok");
    let outcome = CurlProber.probe(&url, TIMEOUT);
    assert_eq!(status_of(&outcome), 200);
    assert!(outcome.finding("1", &url).is_none());
    assert_eq!(log.lines(), vec!["HEAD /ok"]);
}

#[test]
fn redirect_is_followed() {
    let (base, _log) = status_server::start();
    let outcome = CurlProber.probe(&format!("{base}/redirect"), TIMEOUT);
    match outcome {
        ProbeOutcome::Responded { status, final_url } => {
            assert_eq!(status, 200);
            assert_eq!(final_url, format!("{base}/ok"));
        }
        other => panic!("expected response, got {other:?}"),
    }
}

#[test]
fn redirect_loop_past_limit_is_check_failed() {
    let (base, log) = status_server::start();
    let url = format!("{base}/loop");
    let outcome = CurlProber.probe(&url, TIMEOUT);
    assert!(matches!(outcome, ProbeOutcome::Failed { .. }), "{outcome:?}");
    let hops = log.lines().iter().filter(|l| *l == "HEAD /loop").count();
    assert_eq!(hops, probe::MAX_REDIRECTS as usize + 1);
    let finding = outcome.finding("4", &url).unwrap();
    assert_eq!(finding.issue, "HTTP check failed");
}

#[test]
fn head_405_falls_back_to_get() {
    let (base, log) = status_server::start();
    let outcome = CurlProber.probe(&format!("{base}/no-head"), TIMEOUT);
    assert_eq!(status_of(&outcome), 200);
    assert!(log.contains("HEAD /no-head"));
    assert!(log.contains("GET /no-head"));
}

#[test]
fn head_403_that_allows_head_is_not_retried() {
    let (base, log) = status_server::start();
    let url = format!("{base}/forbidden-head");
    let outcome = CurlProber.probe(&url, TIMEOUT);
    assert_eq!(status_of(&outcome), 403);
    assert!(!log.contains("GET /forbidden-head"));
    let finding = outcome.finding("9", &url).unwrap();
    assert_eq!(finding.issue, "HTTP non-2xx");
    assert_eq!(finding.detail, format!("{url} status=403"));
}

#[test]
fn not_found_is_non_2xx_finding() {
    let (base, _log) = status_server::start();
    let url = format!("{base}/missing");
    let finding = CurlProber.probe(&url, TIMEOUT).finding("7", &url).unwrap();
    assert_eq!(finding.severity, Severity::Error);
    assert_eq!(finding.detail, format!("{url} status=404"));
}

#[test]
fn unreachable_is_check_failed() {
    let url = status_server::unreachable_url();
    let outcome = CurlProber.probe(&url, Duration::from_secs(2));
    assert!(matches!(outcome, ProbeOutcome::Failed { .. }));
    let finding = outcome.finding("3", &url).unwrap();
    assert_eq!(finding.issue, "HTTP check failed");
    assert!(finding.detail.starts_with(&format!("{url} error=")));
}

#[tokio::test]
async fn batch_probe_feeds_audit_findings() {
    let (base, _log) = status_server::start();
    let tagged = |path: &str| {
        format!("{base}{path}?utm_source=google&utm_medium=cpc&utm_campaign=spring")
    };
    let ads = vec![
        AdRecord {
            ad_id: "1".into(),
            final_urls: vec![tagged("/ok"), tagged("/missing")],
            final_mobile_urls: vec![tagged("/ok")],
            ..Default::default()
        },
        AdRecord {
            ad_id: "2".into(),
            final_urls: vec![tagged("/no-head")],
            final_mobile_urls: vec![tagged("/ok")],
            ..Default::default()
        },
    ];
    let cfg = ProbeConfig {
        enabled: true,
        timeout_secs: 5,
        concurrency: 2,
    };
    let results = probe::probe_all(
        Arc::new(CurlProber),
        ProbeTarget::from_ads(&ads),
        &cfg,
        Arc::new(AtomicBool::new(false)),
    )
    .await;
    assert_eq!(results.len(), 3);

    let policy = UtmPolicy::default().compile();
    let found = findings::audit_ads(
        &ads,
        &AuditContext {
            policy: &policy,
            probes: Some(&results),
        },
    );
    let issues: Vec<(&str, &str)> = found
        .iter()
        .map(|f| (f.ad_id.as_str(), f.issue.as_str()))
        .collect();
    // Plain http from the local server, then the 404 probe for the second URL.
    assert_eq!(
        issues,
        vec![
            ("1", "Non-HTTPS final URL"),
            ("1", "Non-HTTPS final URL"),
            ("1", "HTTP non-2xx"),
            ("2", "Non-HTTPS final URL"),
        ]
    );
}

#[tokio::test]
async fn cancelled_batch_starts_nothing() {
    let (base, log) = status_server::start();
    let ads = vec![AdRecord {
        ad_id: "1".into(),
        final_urls: vec![format!("{base}/ok")],
        ..Default::default()
    }];
    let results = probe::probe_all(
        Arc::new(CurlProber),
        ProbeTarget::from_ads(&ads),
        &ProbeConfig::default(),
        Arc::new(AtomicBool::new(true)),
    )
    .await;
    assert!(results.is_empty());
    assert!(log.lines().is_empty());
}
