//! Series naming rules.
//!
//! Realtime metric names look like `rt:activeUsers`. Exported series names are
//! derived from them by prefixing `ga_` and replacing the first `:` with `_`.
//! Dimension values returned by the API are turned into derived names with
//! [`sanitize`] before they go through the same rule.

/// Namespace prefix for derived (per-dimension-value) names.
pub const NAMESPACE: &str = "rt:";

/// Prefix of every exported series.
pub const SERIES_PREFIX: &str = "ga_";

/// Constant label carried by every exported series.
pub const JOB_LABEL: (&str, &str) = ("job", "googleAnalytics");

/// Variable label of vector series.
pub const CATEGORY_LABEL: &str = "category";

/// Category marker the API uses for missing values. Rows carrying it are dropped.
pub const NOT_SET: &str = "(not set)";

/// Turn an arbitrary API string into a derived name.
///
/// Non-alphanumeric ASCII characters are stripped, the result is joined to
/// [`NAMESPACE`] with `_`, and any space left over becomes `_`.
pub fn sanitize(raw: &str) -> String {
    let stripped: String = raw.chars().filter(char::is_ascii_alphanumeric).collect();
    [NAMESPACE, stripped.as_str()].join("_").replace(' ', "_")
}

/// Exported series name for a metric or derived name.
pub fn series_name(name: &str) -> String {
    format!("{SERIES_PREFIX}{}", name.replacen(':', "_", 1))
}

/// HELP text for a metric or derived name.
pub fn help_text(name: &str) -> String {
    format!("Google Analytics {name}")
}

/// Prometheus metric name grammar: `[a-zA-Z_:][a-zA-Z0-9_:]*`.
pub fn is_valid_series_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}
