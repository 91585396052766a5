//! Sanitizer and series naming tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use gaexporter_core::naming::{
    help_text, is_valid_series_name, sanitize, series_name, NAMESPACE,
};

const SAMPLES: &[&str] = &[
    "",
    "mobile",
    "DESKTOP",
    "smart tv",
    "  leading and trailing  ",
    "Tablet/Phone (beta)",
    "São Paulo",
    "日本",
    "a_b-c.d:e",
    "1234",
    "(not set)",
    "tab\tand\nnewline",
];

#[test]
fn sanitize_keeps_only_prefix_underscore_and_alphanumerics_in_order() {
    for raw in SAMPLES {
        let out = sanitize(raw);
        let rest = out
            .strip_prefix(NAMESPACE)
            .and_then(|s| s.strip_prefix('_'))
            .unwrap_or_else(|| panic!("missing prefix for {raw:?}: {out}"));

        let expected: String = raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        assert_eq!(rest, expected, "input {raw:?}");
        assert!(!out.contains(' '), "space left in {out:?}");
    }
}

#[test]
fn sanitize_empty_is_prefix_only() {
    assert_eq!(sanitize(""), "rt:_");
}

#[test]
fn sanitize_strips_spaces_and_punctuation() {
    assert_eq!(sanitize("smart tv"), "rt:_smarttv");
    assert_eq!(sanitize("Tablet/Phone (beta)"), "rt:_TabletPhonebeta");
    assert_eq!(sanitize("São Paulo"), "rt:_SoPaulo");
}

#[test]
fn series_name_replaces_first_colon_only() {
    assert_eq!(series_name("rt:activeUsers"), "ga_rt_activeUsers");
    assert_eq!(series_name(&sanitize("mobile")), "ga_rt__mobile");
    assert_eq!(series_name("a:b:c"), "ga_a_b:c");
    assert_eq!(series_name("plain"), "ga_plain");
}

#[test]
fn help_text_names_the_source_metric() {
    assert_eq!(help_text("rt:pageviews"), "Google Analytics rt:pageviews");
}

#[test]
fn derived_series_names_are_always_valid() {
    for raw in SAMPLES {
        let name = series_name(&sanitize(raw));
        assert!(is_valid_series_name(&name), "{name}");
    }
}

#[test]
fn invalid_series_names_are_rejected() {
    assert!(!is_valid_series_name(""));
    assert!(!is_valid_series_name("9lives"));
    assert!(!is_valid_series_name("ga_rt_page-views"));
    assert!(!is_valid_series_name("ga_rt_active users"));
    assert!(is_valid_series_name("ga_rt_activeUsers"));
    assert!(is_valid_series_name(":ok_1"));
}
