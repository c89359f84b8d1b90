//! Overall diagnosis score.

use storelens_core::{Insight, InsightKind};

pub const BASE_SCORE: i32 = 70;
pub const STRENGTH_BONUS: i32 = 3;

/// Scores a list of insights from [`BASE_SCORE`], clamped to `0..=100`.
///
/// Problems subtract their full severity, opportunities and risks half of it
/// (floored), and every strength adds a flat [`STRENGTH_BONUS`].
#[must_use]
pub fn overall_score(insights: &[Insight]) -> u8 {
    let total = insights.iter().fold(BASE_SCORE, |score, insight| {
        let severity = i32::from(insight.severity);
        match insight.kind {
            InsightKind::Problem => score - severity,
            InsightKind::Opportunity | InsightKind::Risk => score - severity / 2,
            InsightKind::Strength => score + STRENGTH_BONUS,
        }
    });
    u8::try_from(total.clamp(0, 100)).unwrap_or(0)
}
