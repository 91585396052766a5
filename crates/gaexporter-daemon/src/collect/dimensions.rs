use std::collections::HashMap;

/// Per-metric dimension expressions from the `dimensions` config list.
///
/// Entries are applied in order, so when several entries define the same
/// metric the last one wins.
#[derive(Debug, Default)]
pub struct DimensionResolver {
    by_metric: HashMap<String, String>,
}

impl DimensionResolver {
    pub fn new(entries: &[HashMap<String, Vec<String>>]) -> Self {
        let mut by_metric = HashMap::new();
        for entry in entries {
            for (metric, dims) in entry {
                by_metric.insert(metric.clone(), dims.join(","));
            }
        }
        Self { by_metric }
    }

    /// Comma-joined dimensions for `metric`, or `""` when none are configured.
    pub fn dimensions_for(&self, metric: &str) -> &str {
        self.by_metric.get(metric).map(String::as_str).unwrap_or("")
    }
}
