use storelens_core::{Insight, InsightCategory, InsightKind, ProductRecord, WebObservation};

use super::Finding;
use crate::solutions::{action_for, GENERATED_DESCRIPTIONS};

const SOURCE_SITE: &str = "Website scraping";
const SOURCE_CATALOG: &str = "Catalog analysis";

const MESSAGING_KEYWORDS: &[&str] = &["whatsapp", "wa.me"];

pub(crate) const MAX_IMAGE_SEVERITY: usize = 7;
pub(crate) const MAX_DESCRIPTION_SEVERITY: usize = 5;

pub(crate) fn analyze(web: &WebObservation, insights: &mut Vec<Insight>) {
    let context = &web.context;

    let has_messaging = context
        .contact
        .phones
        .iter()
        .chain(&context.contact.emails)
        .map(|channel| channel.to_lowercase())
        .any(|channel| MESSAGING_KEYWORDS.iter().any(|k| channel.contains(k)));
    if !has_messaging {
        insights.push(
            Finding::new(
                InsightKind::Opportunity,
                InsightCategory::CustomerService,
                8,
                "No WhatsApp Business channel detected",
            )
            .describe(
                "The website offers no WhatsApp contact. Customers expect to reach \
                 businesses through messaging apps.",
            )
            .evidence("No wa.me links or WhatsApp buttons on the site")
            .action(action_for(InsightCategory::CustomerService))
            .from_source(SOURCE_SITE),
        );
    }

    if !context.has_any_social() {
        insights.push(
            Finding::new(
                InsightKind::Problem,
                InsightCategory::DigitalPresence,
                6,
                "No linked social media profiles",
            )
            .describe("The website links no social profiles, limiting reach and trust.")
            .evidence("No Instagram, Facebook, Twitter or LinkedIn links found")
            .action(action_for(InsightCategory::DigitalPresence))
            .from_source(SOURCE_SITE),
        );
    }

    catalog_coverage(&web.products, insights);

    if context.policies.shipping.trim().is_empty() && context.policies.returns.trim().is_empty() {
        insights.push(
            Finding::new(
                InsightKind::Risk,
                InsightCategory::SalesProcess,
                4,
                "Shipping and returns policies not visible",
            )
            .describe("Buyers cannot find shipping or returns terms, adding friction to purchases.")
            .evidence("No policy links detected on the site")
            .from_source(SOURCE_SITE),
        );
    }
}

fn catalog_coverage(products: &[ProductRecord], insights: &mut Vec<Insight>) {
    let total = products.len();
    if total == 0 {
        return;
    }

    let with_images = products.iter().filter(|p| p.has_images()).count();
    if with_images * 2 < total {
        insights.push(
            Finding::new(
                InsightKind::Problem,
                InsightCategory::SalesProcess,
                coverage_severity(MAX_IMAGE_SEVERITY, with_images, total),
                "Incomplete catalog (missing images)",
            )
            .describe(format!(
                "Only {}% of products have images, which significantly lowers conversion.",
                with_images * 100 / total
            ))
            .evidence(format!("{with_images} of {total} products have an image"))
            .from_source(SOURCE_CATALOG),
        );
    }

    let with_descriptions = products.iter().filter(|p| p.has_description()).count();
    if with_descriptions * 2 < total {
        insights.push(
            Finding::new(
                InsightKind::Opportunity,
                InsightCategory::SalesProcess,
                coverage_severity(MAX_DESCRIPTION_SEVERITY, with_descriptions, total),
                "Missing product descriptions",
            )
            .describe("Most products lack a detailed description.")
            .evidence(format!("{with_descriptions} of {total} products have a description"))
            .action(GENERATED_DESCRIPTIONS)
            .from_source(SOURCE_CATALOG),
        );
    }
}

/// `ceil(max × missing / total)`, at least 1.
pub(crate) fn coverage_severity(max: usize, covered: usize, total: usize) -> u8 {
    let missing = total.saturating_sub(covered);
    let severity = (max * missing).div_ceil(total.max(1)).max(1);
    u8::try_from(severity).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_scales_with_deficiency() {
        assert_eq!(coverage_severity(7, 0, 10), 7);
        assert_eq!(coverage_severity(7, 4, 10), 5);
        assert_eq!(coverage_severity(5, 1, 3), 4);
        assert_eq!(coverage_severity(5, 10, 10), 1);
    }
}
