use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Problem,
    Opportunity,
    Risk,
    Strength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsightCategory {
    CustomerService,
    ResponseTime,
    DigitalPresence,
    Reputation,
    Operations,
    Technology,
    SalesProcess,
}

impl InsightCategory {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            InsightCategory::CustomerService => "Customer Service",
            InsightCategory::ResponseTime => "Response Time",
            InsightCategory::DigitalPresence => "Digital Presence",
            InsightCategory::Reputation => "Reputation",
            InsightCategory::Operations => "Operations",
            InsightCategory::Technology => "Technology",
            InsightCategory::SalesProcess => "Sales Process",
        }
    }
}

/// A single classified finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub category: InsightCategory,
    pub title: String,
    pub description: String,
    pub evidence: String,
    pub source: String,
    /// 1–10, 10 being the most severe.
    pub severity: u8,
    pub recommended_action: Option<String>,
}

/// Scored output of one investigation.
///
/// Built once by the synthesis engine and read-only afterwards. The
/// per-kind views are filters over `insights`, so they can never drift from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    business_name: String,
    url: String,
    score: u8,
    insights: Vec<Insight>,
    executive_summary: Vec<String>,
    recommended_solutions: Vec<String>,
}

impl Diagnosis {
    #[must_use]
    pub fn new(
        business_name: String,
        url: String,
        score: u8,
        insights: Vec<Insight>,
        executive_summary: Vec<String>,
        recommended_solutions: Vec<String>,
    ) -> Self {
        Self {
            business_name,
            url,
            score: score.min(100),
            insights,
            executive_summary,
            recommended_solutions,
        }
    }

    #[must_use]
    pub fn business_name(&self) -> &str {
        &self.business_name
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn score(&self) -> u8 {
        self.score
    }

    #[must_use]
    pub fn insights(&self) -> &[Insight] {
        &self.insights
    }

    #[must_use]
    pub fn executive_summary(&self) -> &[String] {
        &self.executive_summary
    }

    #[must_use]
    pub fn recommended_solutions(&self) -> &[String] {
        &self.recommended_solutions
    }

    #[must_use]
    pub fn problems(&self) -> Vec<&Insight> {
        self.of_kind(InsightKind::Problem)
    }

    #[must_use]
    pub fn opportunities(&self) -> Vec<&Insight> {
        self.of_kind(InsightKind::Opportunity)
    }

    #[must_use]
    pub fn risks(&self) -> Vec<&Insight> {
        self.of_kind(InsightKind::Risk)
    }

    #[must_use]
    pub fn strengths(&self) -> Vec<&Insight> {
        self.of_kind(InsightKind::Strength)
    }

    fn of_kind(&self, kind: InsightKind) -> Vec<&Insight> {
        self.insights.iter().filter(|i| i.kind == kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insight(kind: InsightKind, title: &str) -> Insight {
        Insight {
            kind,
            category: InsightCategory::Reputation,
            title: title.to_string(),
            description: String::new(),
            evidence: String::new(),
            source: "test".to_string(),
            severity: 5,
            recommended_action: None,
        }
    }

    #[test]
    fn views_preserve_insertion_order() {
        let diagnosis = Diagnosis::new(
            "Shop".to_string(),
            "https://shop.example".to_string(),
            60,
            vec![
                insight(InsightKind::Problem, "p1"),
                insight(InsightKind::Strength, "s1"),
                insight(InsightKind::Problem, "p2"),
                insight(InsightKind::Opportunity, "o1"),
                insight(InsightKind::Risk, "r1"),
            ],
            Vec::new(),
            Vec::new(),
        );
        let titles = |v: Vec<&Insight>| v.iter().map(|i| i.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(diagnosis.problems()), ["p1", "p2"]);
        assert_eq!(titles(diagnosis.opportunities()), ["o1"]);
        assert_eq!(titles(diagnosis.risks()), ["r1"]);
        assert_eq!(titles(diagnosis.strengths()), ["s1"]);
    }

    #[test]
    fn score_is_capped_at_100() {
        let diagnosis = Diagnosis::new(
            String::new(),
            String::new(),
            180,
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(diagnosis.score(), 100);
    }

    #[test]
    fn category_serializes_kebab_case() {
        let json = serde_json::to_string(&InsightCategory::ResponseTime).unwrap();
        assert_eq!(json, "\"response-time\"");
    }
}
