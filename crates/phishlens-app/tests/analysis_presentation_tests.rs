//! Integration tests for verdict presentation through a full session.

mod common;

use common::{PHISHING_BODY, SAFE_MINIMAL_BODY, Scripted, ScriptedTransport, session};
use phishlens_analysis_contract::Verdict;
use phishlens_app::SubmitOutcome;
use phishlens_projection::{DnsSection, NO_DOMAIN_INFO, Tone};
use phishlens_ui::{IconGlyph, PHISHING_TITLE, RenderOptions, SAFE_TITLE, Theme};

const PLAIN: RenderOptions = RenderOptions { color: false };

#[test]
fn analysis_presentation_tests_minimal_phishing_reply() {
    let transport = ScriptedTransport::new([Scripted::Reply(
        200,
        r#"{"result":"Phishing","probability":0.8734,"reasons":["Suspicious TLD"],
            "features":{"URLLength":75,"IsHTTPS":0}}"#,
    )]);
    let mut session = session(&transport);

    assert_eq!(
        session.submit("paypa1.example"),
        SubmitOutcome::Presented(Verdict::Phishing)
    );

    let view = session.view();
    assert!(!view.loading);
    assert!(view.error.is_none());
    assert!(view.result_visible);
    assert_eq!(view.theme, Theme::Phishing);

    let panel = view.verdict.as_ref().expect("verdict panel");
    assert_eq!(panel.probability_text, "87.3%");
    assert_eq!(panel.icon, IconGlyph::AlertOctagon);
    assert_eq!(panel.title, PHISHING_TITLE);

    assert_eq!(view.reasons.as_ref().map(Vec::len), Some(1));
    let rows: Vec<(&str, &str)> = view
        .features
        .iter()
        .map(|row| (row.label, row.value.as_str()))
        .collect();
    assert_eq!(rows, vec![("Length", "75"), ("HTTPS", "No")]);
}

#[test]
fn analysis_presentation_tests_minimal_safe_reply_shows_placeholders() {
    let transport = ScriptedTransport::new([Scripted::Reply(200, SAFE_MINIMAL_BODY)]);
    let mut session = session(&transport);

    assert_eq!(
        session.submit("https://example.org"),
        SubmitOutcome::Presented(Verdict::Safe)
    );

    let view = session.view();
    assert_eq!(view.theme, Theme::Safe);
    let panel = view.verdict.as_ref().expect("verdict panel");
    assert_eq!(panel.icon, IconGlyph::ShieldCheck);
    assert_eq!(panel.title, SAFE_TITLE);
    assert_eq!(panel.probability_text, "2.0%");

    assert!(!view.reasons_visible());
    assert!(view.features.is_empty());
    assert_eq!(view.domain_info.len(), 1);
    assert_eq!(view.domain_info[0].label, None);
    assert_eq!(view.domain_info[0].value, NO_DOMAIN_INFO);
    assert_eq!(view.dns, DnsSection::Empty);
    assert!(view.site_data.is_empty());

    let chart = session.presenter().chart().expect("chart should be mounted");
    assert!(chart.values[2].is_nan());
    assert_eq!(chart.values[4], 1.0);
}

#[test]
fn analysis_presentation_tests_full_reply_fills_every_section() {
    let transport = ScriptedTransport::new([Scripted::Reply(200, PHISHING_BODY)]);
    let mut session = session(&transport);
    session.submit("http://paypa1-login.example/verify");

    let view = session.view();
    let features: Vec<(&str, &str)> = view
        .features
        .iter()
        .map(|row| (row.label, row.value.as_str()))
        .collect();
    assert_eq!(
        features,
        vec![("Length", "75"), ("Entropy", "4.12"), ("HTTPS", "No")]
    );

    let domain: Vec<&str> = view.domain_info.iter().map(|row| row.value.as_str()).collect();
    assert_eq!(domain, vec!["NameCheap", "(not provided)", "IS", "2024-01-02"]);

    let DnsSection::Blocks(blocks) = &view.dns else {
        panic!("expected DNS blocks");
    };
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].record_type, "A");
    assert_eq!(blocks[0].records, vec!["203.0.113.7", "203.0.113.8"]);

    let login = view.site_data.last().expect("login form row");
    assert_eq!(login.value, "DETECTED");
    assert_eq!(login.tone, Tone::Warning);
}

#[test]
fn analysis_presentation_tests_render_hides_deep_scan_until_expanded() {
    let transport = ScriptedTransport::new([Scripted::Reply(200, PHISHING_BODY)]);
    let mut session = session(&transport);
    session.submit("http://paypa1-login.example/verify");

    let collapsed = session.render(PLAIN);
    assert!(collapsed.contains("[!] THREAT DETECTED"));
    assert!(collapsed.contains("Confidence: 87.3%"));
    assert!(collapsed.contains("  - Login form on new domain"));
    assert!(collapsed.contains("  Length    ########.. 7.5"));
    assert!(collapsed.contains("Deep scan [+]"));
    assert!(!collapsed.contains("203.0.113.7"));
    assert!(!collapsed.contains('\x1b'));

    assert!(session.toggle_deep_scan());
    let expanded = session.render(PLAIN);
    assert!(expanded.contains("Deep scan [-]"));
    assert!(expanded.contains("203.0.113.7"));
    assert!(!expanded.contains("203.0.113.9"));
    assert!(expanded.contains("Login Form: DETECTED"));
}

#[test]
fn analysis_presentation_tests_color_render_wraps_verdict() {
    let transport = ScriptedTransport::new([Scripted::Reply(200, SAFE_MINIMAL_BODY)]);
    let mut session = session(&transport);
    session.submit("example.org");

    let rendered = session.render(RenderOptions { color: true });
    assert!(rendered.contains("\x1b[32m[ok] SAFE DESTINATION\x1b[0m"));
    assert!(rendered.contains("  Length    .......... n/a"));
}

#[test]
fn analysis_presentation_tests_mistyped_domain_field_keeps_verdict() {
    let transport = ScriptedTransport::new([Scripted::Reply(
        200,
        r#"{"result":"Phishing","probability":0.97,"reasons":["IP Address detected"],
            "domain_info":{"registrar":"X","creation_date":1700000000}}"#,
    )]);
    let mut session = session(&transport);

    assert_eq!(
        session.submit("198.51.100.4/login"),
        SubmitOutcome::Presented(Verdict::Phishing)
    );

    let view = session.view();
    assert!(view.error.is_none());
    assert_eq!(
        view.verdict.as_ref().expect("verdict panel").probability_text,
        "97.0%"
    );
    assert!(view.reasons_visible());
    let domain: Vec<&str> = view.domain_info.iter().map(|row| row.value.as_str()).collect();
    assert_eq!(domain, vec!["X", "(not provided)", "(not provided)", "1700000000"]);
}
