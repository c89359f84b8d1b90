//! Keyword lexicon for review pain and praise detection.
//!
//! Keys are lowercase substrings matched against lowercased review text in
//! Spanish and English. Several keywords may map to the same label; labels
//! are reported once, in first-seen order.

use storelens_core::Review;

/// Reviews at or below this star count are scanned for pain.
pub const PAIN_MAX_STARS: u8 = 3;

/// Reviews at or above this star count are scanned for praise.
pub const PRAISE_MIN_STARS: u8 = 4;

pub(crate) const PAIN_LEXICON: &[(&str, &str)] = &[
    // Delays
    ("demora", "Delays in service or delivery"),
    ("tarda", "Delays in service or delivery"),
    ("delay", "Delays in service or delivery"),
    ("took forever", "Delays in service or delivery"),
    ("lento", "Slow service"),
    ("slow", "Slow service"),
    // Unanswered customers
    ("no contestan", "Lack of response to customers"),
    ("no responden", "Lack of response to customers"),
    ("sin respuesta", "Lack of response to customers"),
    ("no response", "Lack of response to customers"),
    ("never answered", "Lack of response to customers"),
    ("never replied", "Lack of response to customers"),
    // Treatment
    ("mala atención", "Poor customer attention"),
    ("mala atencion", "Poor customer attention"),
    ("bad service", "Poor customer attention"),
    ("poor service", "Poor customer attention"),
    ("rude", "Poor customer attention"),
    // Overall experience
    ("pésimo", "Very negative experience"),
    ("pesimo", "Very negative experience"),
    ("horrible", "Very negative experience"),
    ("terrible", "Very negative experience"),
    ("awful", "Very negative experience"),
    ("nunca más", "Customers lost for good"),
    ("nunca mas", "Customers lost for good"),
    ("never again", "Customers lost for good"),
    ("no recomiendo", "Customers advise against the business"),
    ("do not recommend", "Customers advise against the business"),
    ("don't recommend", "Customers advise against the business"),
    ("perdí tiempo", "Customers feel their time was wasted"),
    ("waste of time", "Customers feel their time was wasted"),
    // Price and trust
    ("caro", "Prices perceived as high"),
    ("expensive", "Prices perceived as high"),
    ("overpriced", "Prices perceived as high"),
    ("estafa", "Distrust or perceived fraud"),
    ("scam", "Distrust or perceived fraud"),
    ("mentira", "Misleading communication"),
    ("misleading", "Misleading communication"),
    // Fulfilment
    ("incompleto", "Incomplete orders"),
    ("incomplete", "Incomplete orders"),
    ("equivocado", "Order mistakes"),
    ("wrong order", "Order mistakes"),
    ("roto", "Damaged products"),
    ("broken", "Damaged products"),
    ("damaged", "Damaged products"),
    ("sucio", "Hygiene or cleanliness problems"),
    ("dirty", "Hygiene or cleanliness problems"),
];

pub(crate) const PRAISE_LEXICON: &[(&str, &str)] = &[
    ("excelente", "Excellent service"),
    ("excellent", "Excellent service"),
    ("rápido", "Fast service"),
    ("rapido", "Fast service"),
    ("fast", "Fast service"),
    ("amable", "Friendly staff"),
    ("friendly", "Friendly staff"),
    ("recomiendo", "Customers recommend the business"),
    ("recommend", "Customers recommend the business"),
    ("volvería", "High repurchase intent"),
    ("volveria", "High repurchase intent"),
    ("will be back", "High repurchase intent"),
    ("calidad", "Good perceived quality"),
    ("quality", "Good perceived quality"),
    ("profesional", "Professionalism"),
    ("professional", "Professionalism"),
    ("puntual", "Punctuality"),
    ("on time", "Punctuality"),
    ("limpio", "Good hygiene and presentation"),
    ("clean", "Good hygiene and presentation"),
];

/// Labels of complaints found in reviews with at most [`PAIN_MAX_STARS`].
#[must_use]
pub fn detect_pain_signals(reviews: &[Review]) -> Vec<String> {
    detect(reviews, PAIN_LEXICON, |stars| stars <= PAIN_MAX_STARS)
}

/// Labels of praise found in reviews with at least [`PRAISE_MIN_STARS`].
#[must_use]
pub fn detect_praise_signals(reviews: &[Review]) -> Vec<String> {
    detect(reviews, PRAISE_LEXICON, |stars| stars >= PRAISE_MIN_STARS)
}

fn detect(
    reviews: &[Review],
    lexicon: &[(&str, &str)],
    eligible: impl Fn(u8) -> bool,
) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for review in reviews.iter().filter(|r| eligible(r.stars)) {
        let text = review.text.to_lowercase();
        for &(keyword, label) in lexicon {
            if text.contains(keyword) && !labels.iter().any(|l| l == label) {
                labels.push(label.to_string());
            }
        }
    }
    labels
}
