use crate::workflows::mandates::domain::{
    CandidateRecord, EvidenceRecord, RelationshipFields, SourceOutcome,
};
use serde::{Deserialize, Deserializer};
use std::io::Read;

const LIST_SEPARATOR: char = ';';

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<CandidateRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<CandidateRow>() {
        let row = record?;
        records.push(row.into_record());
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct CandidateRow {
    #[serde(rename = "Candidate ID", default, deserialize_with = "empty_string_as_none")]
    candidate_id: Option<String>,
    #[serde(rename = "Name", default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(rename = "Title", default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(rename = "Sector", default, deserialize_with = "empty_string_as_none")]
    sector: Option<String>,
    #[serde(rename = "Skills", default)]
    skills: String,
    #[serde(rename = "CV Text", default, deserialize_with = "empty_string_as_none")]
    cv_text: Option<String>,
    #[serde(rename = "Shared Employers", default)]
    shared_employers: String,
    #[serde(rename = "Shared Schools", default)]
    shared_schools: String,
    #[serde(rename = "Referred By", default, deserialize_with = "empty_string_as_none")]
    referred_by: Option<String>,
    #[serde(rename = "Network", default)]
    network: String,
    #[serde(rename = "Notes", default)]
    notes: String,
    #[serde(rename = "Voice Transcripts", default)]
    voice_transcripts: String,
    #[serde(rename = "Market Intel", default)]
    market_intel: String,
    #[serde(rename = "Source Outcomes", default)]
    source_outcomes: String,
}

impl CandidateRow {
    fn into_record(self) -> CandidateRecord {
        CandidateRecord {
            candidate_id: self.candidate_id,
            name: self.name,
            current_title: self.title,
            sector: self.sector,
            skills: split_list(&self.skills),
            cv_text: self.cv_text,
            cv_outcomes: parse_outcomes(&self.source_outcomes),
            relationships: RelationshipFields {
                shared_employers: split_list(&self.shared_employers),
                shared_schools: split_list(&self.shared_schools),
                referred_by: self.referred_by,
                network: split_list(&self.network),
            },
            notes: evidence(&self.notes),
            voice_transcripts: evidence(&self.voice_transcripts),
            market_intel: evidence(&self.market_intel),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn split_list(cell: &str) -> Vec<String> {
    cell.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn evidence(cell: &str) -> Vec<EvidenceRecord> {
    split_list(cell)
        .into_iter()
        .map(|text| EvidenceRecord {
            id: None,
            text,
            outcomes: Vec::new(),
        })
        .collect()
}

/// Outcome tokens in recorded order; unrecognised tokens are skipped.
fn parse_outcomes(cell: &str) -> Vec<SourceOutcome> {
    split_list(cell)
        .iter()
        .filter_map(|token| parse_outcome(token))
        .collect()
}

fn parse_outcome(token: &str) -> Option<SourceOutcome> {
    match token.to_ascii_lowercase().as_str() {
        "1" | "correct" | "true" => Some(SourceOutcome::Correct),
        "0" | "incorrect" | "false" => Some(SourceOutcome::Incorrect),
        _ => None,
    }
}
