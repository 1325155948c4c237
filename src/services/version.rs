//! Loose version ordering.
//!
//! Versions such as `10.0`, `10.0.1`, `10.0b3` and `3.6-esr` are split into
//! numeric runs, lowercase alphabetic runs and any leftover characters. Dots
//! only separate. Numbers compare numerically and sort before text; a version
//! that is a prefix of another sorts first.

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

static COMPONENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+|[a-z]+|\.").expect("Invalid version component regex"));

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Component {
    Number(u64),
    Text(String),
}

/// A version string with loose component-wise ordering.
#[derive(Debug, Clone)]
pub struct LooseVersion {
    raw: String,
    components: Vec<Component>,
}

impl LooseVersion {
    pub fn parse(raw: &str) -> Self {
        let mut components = Vec::new();
        let mut last_end = 0;

        for m in COMPONENT_PATTERN.find_iter(raw) {
            push_component(&raw[last_end..m.start()], &mut components);
            push_component(m.as_str(), &mut components);
            last_end = m.end();
        }
        push_component(&raw[last_end..], &mut components);

        Self {
            raw: raw.to_string(),
            components,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn push_component(piece: &str, components: &mut Vec<Component>) {
    if piece.is_empty() || piece == "." {
        return;
    }
    match piece.parse::<u64>() {
        Ok(n) => components.push(Component::Number(n)),
        Err(_) => components.push(Component::Text(piece.to_string())),
    }
}

impl PartialEq for LooseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for LooseVersion {}

impl PartialOrd for LooseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LooseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components.cmp(&other.components)
    }
}

impl fmt::Display for LooseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Sort version strings newest first. Ties keep their input order.
///
/// Distinct spellings of the same version, such as `10.0` and `10.00`, tie
/// and are logged since they would both end up in the matrix.
pub fn sort_descending<I, S>(versions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parsed: Vec<LooseVersion> = versions
        .into_iter()
        .map(|v| LooseVersion::parse(&v.into()))
        .collect();
    parsed.sort_by(|a, b| b.cmp(a));
    for pair in parsed.windows(2) {
        if pair[0] == pair[1] && pair[0].raw != pair[1].raw {
            tracing::warn!(
                "Versions {} and {} compare equal, keeping both",
                pair[0].raw,
                pair[1].raw
            );
        }
    }
    parsed.into_iter().map(|v| v.raw).collect()
}
