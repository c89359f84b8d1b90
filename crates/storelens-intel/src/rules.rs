//! Per-source insight rules. Each rule appends to the shared insight list in
//! a fixed order so the resulting diagnosis is deterministic.

pub(crate) mod reputation;
pub(crate) mod social;
pub(crate) mod web;

use storelens_core::{Insight, InsightCategory, InsightKind};

/// Insight under construction; description and evidence default to empty.
pub(crate) struct Finding {
    kind: InsightKind,
    category: InsightCategory,
    severity: u8,
    title: String,
    description: String,
    evidence: String,
    action: Option<String>,
}

impl Finding {
    pub(crate) fn new(
        kind: InsightKind,
        category: InsightCategory,
        severity: u8,
        title: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            category,
            severity,
            title: title.into(),
            description: String::new(),
            evidence: String::new(),
            action: None,
        }
    }

    pub(crate) fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub(crate) fn evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = evidence.into();
        self
    }

    pub(crate) fn action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    pub(crate) fn from_source(self, source: &str) -> Insight {
        Insight {
            kind: self.kind,
            category: self.category,
            title: self.title,
            description: self.description,
            evidence: self.evidence,
            source: source.to_string(),
            severity: self.severity.clamp(1, 10),
            recommended_action: self.action,
        }
    }
}
