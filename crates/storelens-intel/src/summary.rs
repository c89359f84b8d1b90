//! Executive summary bullets.

use storelens_core::{Insight, InsightKind};

pub const MAX_BULLETS: usize = 5;

/// Builds at most [`MAX_BULLETS`] bullets: score framing, top problem, top
/// opportunity, first strength and the count of improvement areas.
#[must_use]
pub fn executive_summary(business_name: &str, score: u8, insights: &[Insight]) -> Vec<String> {
    let mut bullets = vec![framing(business_name, score)];

    if let Some(problem) = most_severe(insights, InsightKind::Problem) {
        bullets.push(format!("Critical problem: {}", problem.title));
    }
    if let Some(opportunity) = most_severe(insights, InsightKind::Opportunity) {
        bullets.push(format!("Biggest opportunity: {}", opportunity.title));
    }
    if let Some(strength) = insights.iter().find(|i| i.kind == InsightKind::Strength) {
        bullets.push(format!("Key strength: {}", strength.title));
    }

    let improvement_areas = insights
        .iter()
        .filter(|i| matches!(i.kind, InsightKind::Problem | InsightKind::Opportunity))
        .count();
    if improvement_areas > 0 {
        bullets.push(format!(
            "{improvement_areas} improvement areas identified, with potential conversion gains of 20-40%"
        ));
    }

    bullets.truncate(MAX_BULLETS);
    bullets
}

fn framing(business_name: &str, score: u8) -> String {
    match score {
        70.. => format!("{business_name} has a solid base (score {score}/100)"),
        40..=69 => format!("{business_name} has critical areas that need attention (score {score}/100)"),
        _ => format!("{business_name} needs urgent intervention (score {score}/100)"),
    }
}

/// Highest severity of `kind`; the earliest insight wins a tie.
fn most_severe(insights: &[Insight], kind: InsightKind) -> Option<&Insight> {
    let mut best: Option<&Insight> = None;
    for insight in insights.iter().filter(|i| i.kind == kind) {
        if best.is_none_or(|b| insight.severity > b.severity) {
            best = Some(insight);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use storelens_core::InsightCategory;

    use super::*;

    fn insight(kind: InsightKind, severity: u8, title: &str) -> Insight {
        Insight {
            kind,
            category: InsightCategory::Reputation,
            title: title.to_string(),
            description: String::new(),
            evidence: String::new(),
            source: "test".to_string(),
            severity,
            recommended_action: None,
        }
    }

    #[test]
    fn framing_bands() {
        assert!(executive_summary("Tano", 70, &[])[0].contains("solid base"));
        assert!(executive_summary("Tano", 69, &[])[0].contains("need attention"));
        assert!(executive_summary("Tano", 40, &[])[0].contains("need attention"));
        assert!(executive_summary("Tano", 39, &[])[0].contains("urgent"));
    }

    #[test]
    fn ties_go_to_the_first_inserted() {
        let insights = [
            insight(InsightKind::Problem, 7, "first seven"),
            insight(InsightKind::Problem, 9, "first nine"),
            insight(InsightKind::Problem, 9, "second nine"),
            insight(InsightKind::Opportunity, 4, "opp a"),
            insight(InsightKind::Opportunity, 4, "opp b"),
        ];
        let summary = executive_summary("Tano", 50, &insights);
        assert_eq!(summary[1], "Critical problem: first nine");
        assert_eq!(summary[2], "Biggest opportunity: opp a");
    }

    #[test]
    fn never_more_than_five_bullets() {
        let insights: Vec<Insight> = (0..150)
            .map(|i| {
                let kind = match i % 3 {
                    0 => InsightKind::Problem,
                    1 => InsightKind::Opportunity,
                    _ => InsightKind::Strength,
                };
                insight(kind, 5, &format!("insight {i}"))
            })
            .collect();
        let summary = executive_summary("Tano", 0, &insights);
        assert_eq!(summary.len(), MAX_BULLETS);
        assert_eq!(summary[3], "Key strength: insight 2");
        assert!(summary[4].starts_with("100 improvement areas"));
    }

    #[test]
    fn only_framing_without_insights() {
        assert_eq!(executive_summary("Tano", 70, &[]).len(), 1);
    }
}
