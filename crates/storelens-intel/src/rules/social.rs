use storelens_core::{Insight, InsightCategory, InsightKind, SocialSignal};

use super::Finding;
use crate::solutions::action_for;

const SOURCE: &str = "Social media analysis";
const NEGATION_WORDS: &[&str] = &["no", "not", "without", "sin", "missing"];
const LARGE_AUDIENCE: u64 = 10_000;

/// Callers only pass signals with status `found`.
pub(crate) fn analyze(signal: &SocialSignal, insights: &mut Vec<Insight>) {
    for issue in &signal.issues {
        let kind = if is_negative(issue) {
            InsightKind::Problem
        } else {
            InsightKind::Opportunity
        };
        insights.push(
            Finding::new(kind, InsightCategory::DigitalPresence, 5, issue.as_str())
                .describe(format!("Digital presence issue: {issue}"))
                .evidence("Social profile analysis")
                .action(action_for(InsightCategory::DigitalPresence))
                .from_source(SOURCE),
        );
    }

    for strength in &signal.strengths {
        insights.push(
            Finding::new(
                InsightKind::Strength,
                InsightCategory::DigitalPresence,
                1,
                strength.as_str(),
            )
            .describe(format!("Digital presence strength: {strength}"))
            .evidence("Social profile analysis")
            .from_source(SOURCE),
        );
    }

    for profile in signal.profiles.iter().filter(|p| p.status.is_found()) {
        let Some(followers) = profile.followers.filter(|&f| f > LARGE_AUDIENCE) else {
            continue;
        };
        let platform = profile.platform.label();
        let followers = group_thousands(followers);
        insights.push(
            Finding::new(
                InsightKind::Strength,
                InsightCategory::DigitalPresence,
                1,
                format!("{platform} audience of {followers} followers"),
            )
            .describe("A sizeable audience that automation can monetize further.")
            .evidence(format!("{platform}: {followers} followers"))
            .from_source(platform),
        );
    }
}

/// Whole-word match against [`NEGATION_WORDS`], so "now" or "notice" do not
/// count.
pub(crate) fn is_negative(text: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .any(|word| NEGATION_WORDS.contains(&word.as_str()))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_is_whole_word() {
        assert!(is_negative("No Instagram presence detected"));
        assert!(is_negative("Facebook page is not accessible"));
        assert!(is_negative("Perfil sin publicaciones"));
        assert!(!is_negative("Low Instagram activity (fewer than 10 posts)"));
        assert!(!is_negative("Nothing to report"));
        assert!(!is_negative("Notice: posting now"));
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(12_500), "12,500");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }
}
