//! Reference classifier for pull request descriptions.
//!
//! [`classify`] turns free-form description text into exactly one
//! [`Verdict`]: the work items it cites, an explicit `no-ab` exemption, or
//! neither. Work item references win over the exemption marker.

use std::sync::OnceLock;

use abref_state::CheckConclusion;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Literal prefix of an Azure Boards work item reference.
pub const REFERENCE_PREFIX: &str = "AB#";

/// Keyword that waives the reference requirement.
pub const EXEMPTION_MARKER: &str = "no-ab";

// ASCII word boundaries: `XAB#12` does not match, but `修正AB#42` and
// `更新no-ab` do. The digit run may be followed by anything.
const REFERENCE_PATTERN: &str = r"(?-u:\b)AB#[0-9]+";
const EXEMPTION_PATTERN: &str = r"(?i)(?-u:\b)no-ab(?-u:\b)";

fn reference_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(REFERENCE_PATTERN).expect("reference pattern is valid"))
}

fn exemption_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EXEMPTION_PATTERN).expect("exemption pattern is valid"))
}

/// A work item citation such as `AB#123456`, exactly as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkItemRef(String);

impl WorkItemRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric work item id (digits after the prefix).
    pub fn number(&self) -> &str {
        self.0.strip_prefix(REFERENCE_PREFIX).unwrap_or(&self.0)
    }
}

impl std::fmt::Display for WorkItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of classifying one description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "references", rename_all = "snake_case")]
pub enum Verdict {
    /// One or more references, in order of appearance, duplicates kept.
    References(Vec<WorkItemRef>),
    /// No reference, but the author opted out with `no-ab`.
    Exempted,
    /// Neither a reference nor the exemption marker.
    Missing,
}

impl Verdict {
    /// Whether the description satisfies the policy.
    pub fn passed(&self) -> bool {
        !matches!(self, Verdict::Missing)
    }

    /// References to publish downstream; empty unless `References`.
    pub fn references(&self) -> &[WorkItemRef] {
        match self {
            Verdict::References(refs) => refs,
            Verdict::Exempted | Verdict::Missing => &[],
        }
    }

    /// Check run conclusion for this verdict.
    pub fn conclusion(&self) -> CheckConclusion {
        match self {
            Verdict::References(_) | Verdict::Exempted => CheckConclusion::Success,
            Verdict::Missing => CheckConclusion::Failure,
        }
    }

    /// Stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Verdict::References(_) => "references",
            Verdict::Exempted => "exempted",
            Verdict::Missing => "missing",
        }
    }
}

/// Classify a pull request description.
pub fn classify(description: &str) -> Verdict {
    let references: Vec<WorkItemRef> = reference_regex()
        .find_iter(description)
        .map(|m| WorkItemRef(m.as_str().to_string()))
        .collect();
    let exempted = exemption_regex().is_match(description);

    match (references.is_empty(), exempted) {
        (false, _) => Verdict::References(references),
        (true, true) => Verdict::Exempted,
        (true, false) => Verdict::Missing,
    }
}
