use super::super::domain::TagClass;
use super::normalizer::{contains_phrase, normalize_phrase};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Canonical tag a vocabulary alias resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub class: TagClass,
    pub tag: &'static str,
}

const DOMAIN: TagClass = TagClass::Domain;
const SIMILARITY: TagClass = TagClass::Similarity;

const TERMS: &[(&str, TagClass, &str)] = &[
    // Credit & infrastructure
    ("infrastructure credit", DOMAIN, "infrastructure-credit"),
    ("infrastructure debt", DOMAIN, "infrastructure-credit"),
    ("infra debt", DOMAIN, "infrastructure-credit"),
    ("infrastructure", DOMAIN, "infrastructure"),
    ("project finance", DOMAIN, "project-finance"),
    ("leveraged finance", DOMAIN, "leveraged-finance"),
    ("levfin", DOMAIN, "leveraged-finance"),
    ("distressed debt", DOMAIN, "distressed-debt"),
    ("special situations", DOMAIN, "distressed-debt"),
    ("structured credit", DOMAIN, "structured-credit"),
    ("private credit", DOMAIN, "private-credit"),
    ("direct lending", DOMAIN, "private-credit"),
    // Energy
    ("renewables", DOMAIN, "renewables"),
    ("renewable energy", DOMAIN, "renewables"),
    ("solar", DOMAIN, "renewables"),
    ("wind", DOMAIN, "renewables"),
    ("energy transition", DOMAIN, "energy-transition"),
    ("decarbonisation", DOMAIN, "energy-transition"),
    ("decarbonization", DOMAIN, "energy-transition"),
    ("esg", DOMAIN, "esg"),
    ("sustainability", DOMAIN, "esg"),
    // Private markets
    ("private equity", DOMAIN, "private-equity"),
    ("buyout", DOMAIN, "private-equity"),
    ("buyouts", DOMAIN, "private-equity"),
    ("venture capital", DOMAIN, "venture-capital"),
    ("real estate", DOMAIN, "real-estate"),
    ("mergers and acquisitions", DOMAIN, "mergers-and-acquisitions"),
    ("m and a", DOMAIN, "mergers-and-acquisitions"),
    ("capital markets", DOMAIN, "capital-markets"),
    ("asset management", DOMAIN, "asset-management"),
    ("portfolio management", DOMAIN, "portfolio-management"),
    ("portfolio manager", DOMAIN, "portfolio-management"),
    ("risk management", DOMAIN, "risk-management"),
    ("fintech", DOMAIN, "fintech"),
    ("healthcare", DOMAIN, "healthcare"),
    // Leadership titles
    ("chief financial officer", DOMAIN, "finance-leadership"),
    ("cfo", DOMAIN, "finance-leadership"),
    ("chief investment officer", DOMAIN, "investment-leadership"),
    ("cio", DOMAIN, "investment-leadership"),
    ("head of credit", DOMAIN, "credit-leadership"),
    ("general counsel", DOMAIN, "legal"),
    // Relational affinity
    ("same firm", SIMILARITY, "shared-firm"),
    ("former colleague", SIMILARITY, "shared-firm"),
    ("ex colleague", SIMILARITY, "shared-firm"),
    ("worked together", SIMILARITY, "shared-firm"),
    ("alumni", SIMILARITY, "shared-school"),
    ("alumnus", SIMILARITY, "shared-school"),
    ("same school", SIMILARITY, "shared-school"),
    ("same university", SIMILARITY, "shared-school"),
    ("classmate", SIMILARITY, "shared-school"),
    ("personal referral", SIMILARITY, "personal-referral"),
    ("referred by", SIMILARITY, "personal-referral"),
    ("family friend", SIMILARITY, "personal-referral"),
    ("friend of", SIMILARITY, "personal-referral"),
    ("golf", SIMILARITY, "shared-network"),
    ("same club", SIMILARITY, "shared-network"),
    ("club member", SIMILARITY, "shared-network"),
    ("board connection", SIMILARITY, "shared-board"),
    ("sits on board with", SIMILARITY, "shared-board"),
];

/// Tag assigned when the structured record lists a shared employer.
pub const SHARED_FIRM_TAG: &str = "shared-firm";
/// Tag assigned when the structured record lists a shared school.
pub const SHARED_SCHOOL_TAG: &str = "shared-school";
/// Tag assigned when the structured record names a referrer.
pub const PERSONAL_REFERRAL_TAG: &str = "personal-referral";

static VOCABULARY: OnceLock<Vec<(String, VocabularyEntry)>> = OnceLock::new();
static VOCABULARY_INDEX: OnceLock<HashMap<String, VocabularyEntry>> = OnceLock::new();

fn vocabulary() -> &'static [(String, VocabularyEntry)] {
    VOCABULARY.get_or_init(|| {
        TERMS
            .iter()
            .map(|(alias, class, tag)| {
                (
                    normalize_phrase(alias),
                    VocabularyEntry {
                        class: *class,
                        tag: *tag,
                    },
                )
            })
            .collect()
    })
}

fn vocabulary_index() -> &'static HashMap<String, VocabularyEntry> {
    VOCABULARY_INDEX.get_or_init(|| vocabulary().iter().cloned().collect())
}

/// Resolve a single structured term (skill, sector, title) exactly.
pub fn lookup(term: &str) -> Option<VocabularyEntry> {
    vocabulary_index().get(&normalize_phrase(term)).copied()
}

/// Every vocabulary entry whose alias occurs in `text` on word boundaries, in
/// table order.
pub fn scan(text: &str) -> Vec<VocabularyEntry> {
    let normalized = normalize_phrase(text);
    if normalized.is_empty() {
        return Vec::new();
    }

    vocabulary()
        .iter()
        .filter(|(alias, _)| contains_phrase(&normalized, alias))
        .map(|(_, entry)| *entry)
        .collect()
}

/// Resolve a structured term, falling back to phrase scanning for longer
/// values such as "Senior infrastructure credit analyst".
pub fn resolve(term: &str) -> Vec<VocabularyEntry> {
    match lookup(term) {
        Some(entry) => vec![entry],
        None => scan(term),
    }
}
