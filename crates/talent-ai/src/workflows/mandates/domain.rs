use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for candidates tracked by the CRM.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for client search mandates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MandateId(pub String);

impl fmt::Display for MandateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of source material a signal was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    Cv,
    Notes,
    Voice,
    Market,
}

impl SignalType {
    pub const fn ordered() -> [Self; 4] {
        [Self::Cv, Self::Notes, Self::Voice, Self::Market]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Cv => "cv",
            Self::Notes => "notes",
            Self::Voice => "voice",
            Self::Market => "market",
        }
    }
}

/// Whether a tag describes subject expertise or relational affinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagClass {
    Domain,
    Similarity,
}

/// Historical verdict on something a source asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOutcome {
    Correct,
    Incorrect,
}

impl SourceOutcome {
    pub const fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

impl From<bool> for SourceOutcome {
    fn from(value: bool) -> Self {
        if value {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }
}

/// One piece of evidence about a candidate.
///
/// Domain and similarity tags are kept disjoint: a tag asserted in both sets is
/// retained as a domain tag only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SourceSignalFields")]
pub struct SourceSignal {
    id: String,
    #[serde(rename = "type")]
    signal_type: SignalType,
    domain_tags: BTreeSet<String>,
    similarity_tags: BTreeSet<String>,
    source_reliability_history: Vec<SourceOutcome>,
}

impl SourceSignal {
    pub fn new(
        id: impl Into<String>,
        signal_type: SignalType,
        domain_tags: BTreeSet<String>,
        similarity_tags: BTreeSet<String>,
        source_reliability_history: Vec<SourceOutcome>,
    ) -> Self {
        let similarity_tags = similarity_tags
            .into_iter()
            .filter(|tag| !domain_tags.contains(tag))
            .collect();

        Self {
            id: id.into(),
            signal_type,
            domain_tags,
            similarity_tags,
            source_reliability_history,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn signal_type(&self) -> SignalType {
        self.signal_type
    }

    pub fn domain_tags(&self) -> &BTreeSet<String> {
        &self.domain_tags
    }

    pub fn similarity_tags(&self) -> &BTreeSet<String> {
        &self.similarity_tags
    }

    pub fn source_reliability_history(&self) -> &[SourceOutcome] {
        &self.source_reliability_history
    }

    /// Adds a domain tag, removing it from the similarity set if present.
    pub fn with_domain_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        self.similarity_tags.remove(&tag);
        self.domain_tags.insert(tag);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.domain_tags.is_empty()
            && self.similarity_tags.is_empty()
            && self.source_reliability_history.is_empty()
    }
}

#[derive(Deserialize)]
struct SourceSignalFields {
    id: String,
    #[serde(rename = "type")]
    signal_type: SignalType,
    #[serde(default)]
    domain_tags: BTreeSet<String>,
    #[serde(default)]
    similarity_tags: BTreeSet<String>,
    #[serde(default)]
    source_reliability_history: Vec<SourceOutcome>,
}

impl From<SourceSignalFields> for SourceSignal {
    fn from(fields: SourceSignalFields) -> Self {
        Self::new(
            fields.id,
            fields.signal_type,
            fields.domain_tags,
            fields.similarity_tags,
            fields.source_reliability_history,
        )
    }
}

/// Aggregate evidence for one candidate with respect to one mandate.
///
/// Scores are derived on demand by the scoring engine and never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateContext {
    pub candidate_id: CandidateId,
    pub mandate_id: MandateId,
    #[serde(default)]
    pub name: Option<String>,
    pub signals: Vec<SourceSignal>,
}

impl CandidateContext {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.candidate_id.0)
    }
}

/// Canonical tag requirements for a mandate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandateRequirements {
    pub mandate_id: MandateId,
    #[serde(default)]
    pub title: Option<String>,
    pub required_tags: BTreeSet<String>,
}

/// Raw mandate row as supplied by the data-access layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MandateRecord {
    #[serde(default)]
    pub mandate_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub required_terms: Vec<String>,
}

/// Raw candidate row plus attached evidence, as supplied by the data-access layer.
///
/// Every field other than `candidate_id` is optional; missing values are
/// treated as empty evidence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(default)]
    pub candidate_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub current_title: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub cv_text: Option<String>,
    #[serde(default)]
    pub cv_outcomes: Vec<SourceOutcome>,
    #[serde(default)]
    pub relationships: RelationshipFields,
    #[serde(default)]
    pub notes: Vec<EvidenceRecord>,
    #[serde(default)]
    pub voice_transcripts: Vec<EvidenceRecord>,
    #[serde(default)]
    pub market_intel: Vec<EvidenceRecord>,
}

/// Non-expertise connections between the candidate and the firm or client.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelationshipFields {
    #[serde(default)]
    pub shared_employers: Vec<String>,
    #[serde(default)]
    pub shared_schools: Vec<String>,
    #[serde(default)]
    pub referred_by: Option<String>,
    #[serde(default)]
    pub network: Vec<String>,
}

/// Free-text evidence item (consultant note, voice transcript, market intel).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EvidenceRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub outcomes: Vec<SourceOutcome>,
}

/// Raised when a record lacks the identity fields ranking depends on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInputError {
    #[error("candidate record is missing a candidate id")]
    MissingCandidateId,
    #[error("mandate record is missing a mandate id")]
    MissingMandateId,
}
