//! Recommended actions attached to insights.

use storelens_core::{Insight, InsightCategory};

/// Upper bound on the recommended solution list.
pub const MAX_SOLUTIONS: usize = 7;

/// Action for catalogs whose products mostly lack descriptions.
pub const GENERATED_DESCRIPTIONS: &str =
    "AI-generated product descriptions with automatic SEO optimization";

/// Default action for insights in `category`.
#[must_use]
pub fn action_for(category: InsightCategory) -> &'static str {
    match category {
        InsightCategory::CustomerService => "AI-powered WhatsApp assistant answering customers 24/7",
        InsightCategory::ResponseTime => "Automatic lead notifications and assignment",
        InsightCategory::DigitalPresence => "Automated content strategy with an integrated CRM",
        InsightCategory::Reputation => "Post-sale follow-up and automated review requests",
        InsightCategory::Operations => "Process automation with workflow integrations",
        InsightCategory::Technology => "Modern technology stack implementation",
        InsightCategory::SalesProcess => "CRM with a visual pipeline and automatic follow-ups",
    }
}

/// Distinct recommended actions in first-occurrence order, capped at
/// [`MAX_SOLUTIONS`].
#[must_use]
pub fn recommended_solutions(insights: &[Insight]) -> Vec<String> {
    let mut solutions: Vec<String> = Vec::new();
    for action in insights.iter().filter_map(|i| i.recommended_action.as_deref()) {
        if solutions.len() == MAX_SOLUTIONS {
            break;
        }
        if !solutions.iter().any(|s| s == action) {
            solutions.push(action.to_string());
        }
    }
    solutions
}

#[cfg(test)]
mod tests {
    use storelens_core::InsightKind;

    use super::*;

    fn with_action(action: Option<&str>) -> Insight {
        Insight {
            kind: InsightKind::Problem,
            category: InsightCategory::Reputation,
            title: "t".to_string(),
            description: String::new(),
            evidence: String::new(),
            source: "test".to_string(),
            severity: 5,
            recommended_action: action.map(str::to_string),
        }
    }

    #[test]
    fn duplicates_keep_first_occurrence_order() {
        let insights = [
            with_action(Some("b")),
            with_action(None),
            with_action(Some("a")),
            with_action(Some("b")),
        ];
        assert_eq!(recommended_solutions(&insights), ["b", "a"]);
    }

    #[test]
    fn capped_at_seven() {
        let actions: Vec<String> = (0..12).map(|i| format!("action {i}")).collect();
        let insights: Vec<Insight> = actions.iter().map(|a| with_action(Some(a))).collect();
        let solutions = recommended_solutions(&insights);
        assert_eq!(solutions.len(), MAX_SOLUTIONS);
        assert_eq!(solutions[6], "action 6");
    }
}
