use indexmap::IndexMap;

use crate::model::Spec;

/// Specs grouped by source id, in first-appearance order.
pub fn group_specs<'a>(specs: &'a [Spec], source: Option<&str>) -> IndexMap<&'a str, Vec<&'a Spec>> {
    let mut groups: IndexMap<&str, Vec<&Spec>> = IndexMap::new();
    for spec in specs {
        if source.is_some_and(|s| s != spec.source_id) {
            continue;
        }
        groups.entry(spec.source_id.as_str()).or_default().push(spec);
    }
    groups
}

/// Message for an empty spec list
pub fn empty_message(source: Option<&str>) -> &'static str {
    if source.is_some() {
        "No specs found for selected project"
    } else {
        "No specs found"
    }
}

/// Display name of a spec: its path without the trailing `spec.md` segment.
pub fn spec_title(spec: &Spec) -> &str {
    let path = spec.path.trim_end_matches('/');
    let trimmed = path
        .strip_suffix("/spec.md")
        .or_else(|| path.strip_suffix("spec.md"))
        .unwrap_or(path)
        .trim_end_matches('/');
    if trimmed.is_empty() { &spec.id } else { trimmed }
}
