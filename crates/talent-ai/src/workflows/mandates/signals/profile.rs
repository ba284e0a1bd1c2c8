use std::collections::BTreeSet;

use super::super::domain::{
    CandidateContext, CandidateId, CandidateRecord, EvidenceRecord, InvalidInputError, MandateId,
    MandateRecord, MandateRequirements, SignalType, SourceSignal, TagClass,
};
use super::normalizer::canonical_tag;
use super::vocabulary::{
    self, VocabularyEntry, PERSONAL_REFERRAL_TAG, SHARED_FIRM_TAG, SHARED_SCHOOL_TAG,
};

/// Candidate context plus the structured terms the vocabulary could not map.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceProfile {
    pub context: CandidateContext,
    pub dropped_terms: Vec<String>,
}

/// Turn a raw candidate row into the canonical signal set for one mandate.
pub fn build_source_profile(
    mandate_id: &MandateId,
    record: &CandidateRecord,
) -> Result<CandidateContext, InvalidInputError> {
    extract_profile(mandate_id, record).map(|profile| profile.context)
}

/// Same as [`build_source_profile`], additionally reporting dropped terms.
pub fn extract_profile(
    mandate_id: &MandateId,
    record: &CandidateRecord,
) -> Result<SourceProfile, InvalidInputError> {
    if mandate_id.0.trim().is_empty() {
        return Err(InvalidInputError::MissingMandateId);
    }

    let candidate_id = record
        .candidate_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(InvalidInputError::MissingCandidateId)?
        .to_string();

    let mut dropped_terms = Vec::new();
    let mut signals = vec![cv_signal(&candidate_id, record, &mut dropped_terms)];

    let evidence_sets = [
        (SignalType::Notes, &record.notes),
        (SignalType::Voice, &record.voice_transcripts),
        (SignalType::Market, &record.market_intel),
    ];
    for (signal_type, items) in evidence_sets {
        for (index, item) in items.iter().enumerate() {
            if let Some(signal) = evidence_signal(&candidate_id, signal_type, index, item) {
                signals.push(signal);
            }
        }
    }

    let name = record
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    Ok(SourceProfile {
        context: CandidateContext {
            candidate_id: CandidateId(candidate_id),
            mandate_id: mandate_id.clone(),
            name,
            signals,
        },
        dropped_terms,
    })
}

/// Canonicalize a mandate's requirement terms.
///
/// Known aliases resolve through the vocabulary; unknown terms keep their
/// kebab-case form so the requirement still counts against every candidate.
pub fn mandate_requirements(record: &MandateRecord) -> Result<MandateRequirements, InvalidInputError> {
    let mandate_id = record
        .mandate_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(InvalidInputError::MissingMandateId)?;

    let required_tags = record
        .required_terms
        .iter()
        .flat_map(|term| {
            let resolved = vocabulary::resolve(term);
            if resolved.is_empty() {
                canonical_tag(term).into_iter().collect::<Vec<_>>()
            } else {
                domain_only(resolved)
            }
        })
        .collect();

    Ok(MandateRequirements {
        mandate_id: MandateId(mandate_id.to_string()),
        title: record.title.clone(),
        required_tags,
    })
}

fn cv_signal(
    candidate_id: &str,
    record: &CandidateRecord,
    dropped_terms: &mut Vec<String>,
) -> SourceSignal {
    let mut domain_tags = BTreeSet::new();
    let mut similarity_tags = BTreeSet::new();

    let structured = record
        .skills
        .iter()
        .map(String::as_str)
        .chain(record.sector.as_deref())
        .chain(record.current_title.as_deref());
    for term in structured {
        if term.trim().is_empty() {
            continue;
        }
        let resolved = domain_only(vocabulary::resolve(term));
        if resolved.is_empty() {
            dropped_terms.push(term.trim().to_string());
        }
        domain_tags.extend(resolved);
    }

    if let Some(text) = record.cv_text.as_deref() {
        absorb(vocabulary::scan(text), &mut domain_tags, &mut similarity_tags);
    }

    let relationships = &record.relationships;
    if has_value(&relationships.shared_employers) {
        similarity_tags.insert(SHARED_FIRM_TAG.to_string());
    }
    if has_value(&relationships.shared_schools) {
        similarity_tags.insert(SHARED_SCHOOL_TAG.to_string());
    }
    if relationships
        .referred_by
        .as_deref()
        .is_some_and(|referrer| !referrer.trim().is_empty())
    {
        similarity_tags.insert(PERSONAL_REFERRAL_TAG.to_string());
    }
    for term in relationships.network.iter().filter(|term| !term.trim().is_empty()) {
        let resolved: Vec<String> = vocabulary::resolve(term)
            .into_iter()
            .filter(|entry| entry.class == TagClass::Similarity)
            .map(|entry| entry.tag.to_string())
            .collect();
        if resolved.is_empty() {
            dropped_terms.push(term.trim().to_string());
        }
        similarity_tags.extend(resolved);
    }

    SourceSignal::new(
        format!("{candidate_id}:cv"),
        SignalType::Cv,
        domain_tags,
        similarity_tags,
        record.cv_outcomes.clone(),
    )
}

fn evidence_signal(
    candidate_id: &str,
    signal_type: SignalType,
    index: usize,
    item: &EvidenceRecord,
) -> Option<SourceSignal> {
    let mut domain_tags = BTreeSet::new();
    let mut similarity_tags = BTreeSet::new();
    absorb(vocabulary::scan(&item.text), &mut domain_tags, &mut similarity_tags);

    let id = item
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{candidate_id}:{}:{}", signal_type.label(), index + 1));

    let signal = SourceSignal::new(
        id,
        signal_type,
        domain_tags,
        similarity_tags,
        item.outcomes.clone(),
    );

    if signal.is_empty() {
        None
    } else {
        Some(signal)
    }
}

fn absorb(
    entries: Vec<VocabularyEntry>,
    domain_tags: &mut BTreeSet<String>,
    similarity_tags: &mut BTreeSet<String>,
) {
    for entry in entries {
        match entry.class {
            TagClass::Domain => domain_tags.insert(entry.tag.to_string()),
            TagClass::Similarity => similarity_tags.insert(entry.tag.to_string()),
        };
    }
}

fn domain_only(entries: Vec<VocabularyEntry>) -> Vec<String> {
    entries
        .into_iter()
        .filter(|entry| entry.class == TagClass::Domain)
        .map(|entry| entry.tag.to_string())
        .collect()
}

fn has_value(values: &[String]) -> bool {
    values.iter().any(|value| !value.trim().is_empty())
}
