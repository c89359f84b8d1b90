use storelens_core::{Insight, InsightCategory, InsightKind, ReputationSignal};

use super::Finding;
use crate::solutions::action_for;

const SOURCE_LISTING: &str = "Map listing";
const SOURCE_REVIEWS: &str = "Map reviews";

const LOW_RATING: f32 = 4.0;
const HIGH_RATING: f32 = 4.5;
const MAX_PAIN_INSIGHTS: usize = 5;
const MAX_PRAISE_INSIGHTS: usize = 3;

/// Ordered keyword → category map for pain labels. First match wins.
const PAIN_CATEGORIES: &[(&[&str], InsightCategory)] = &[
    (&["response", "respuesta", "contestan"], InsightCategory::ResponseTime),
    (&["delay", "slow", "demora", "lento"], InsightCategory::Operations),
    (&["service", "attention", "atención"], InsightCategory::CustomerService),
];

/// Callers only pass signals with status `found`.
pub(crate) fn analyze(signal: &ReputationSignal, insights: &mut Vec<Insight>) {
    if let Some(rating) = signal.rating {
        let evidence = format!("Map listing: {rating:.1} stars ({} reviews)", signal.total_reviews);
        if rating < LOW_RATING {
            insights.push(
                Finding::new(
                    InsightKind::Problem,
                    InsightCategory::Reputation,
                    9,
                    format!("Low map rating ({rating:.1} stars)"),
                )
                .describe(format!(
                    "The business is rated {rating:.1}/5 across {} reviews, which directly \
                     affects new customers' decisions.",
                    signal.total_reviews
                ))
                .evidence(evidence)
                .action(action_for(InsightCategory::Reputation))
                .from_source(SOURCE_LISTING),
            );
        } else if rating >= HIGH_RATING {
            insights.push(
                Finding::new(
                    InsightKind::Strength,
                    InsightCategory::Reputation,
                    1,
                    format!("Excellent reputation ({rating:.1} stars)"),
                )
                .describe(format!("A {rating:.1}/5 rating is a valuable sales asset."))
                .evidence(evidence)
                .from_source(SOURCE_LISTING),
            );
        }
    }

    for pain in signal.pain_signals.iter().take(MAX_PAIN_INSIGHTS) {
        let category = pain_category(pain);
        insights.push(
            Finding::new(InsightKind::Problem, category, 7, pain.as_str())
                .describe(format!("Recurring complaints in map reviews about: {pain}"))
                .evidence("Text analysis of negative reviews")
                .action(action_for(category))
                .from_source(SOURCE_REVIEWS),
        );
    }

    for praise in signal.praise_signals.iter().take(MAX_PRAISE_INSIGHTS) {
        insights.push(
            Finding::new(InsightKind::Strength, InsightCategory::Reputation, 1, praise.as_str())
                .describe(format!("Customers highlight: {praise}"))
                .evidence("Text analysis of positive reviews")
                .from_source(SOURCE_REVIEWS),
        );
    }
}

pub(crate) fn pain_category(label: &str) -> InsightCategory {
    let label = label.to_lowercase();
    PAIN_CATEGORIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| label.contains(k)))
        .map_or(InsightCategory::Reputation, |&(_, category)| category)
}
