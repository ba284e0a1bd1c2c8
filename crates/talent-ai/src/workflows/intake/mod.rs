//! CSV intake for CRM candidate exports.

mod parser;

use crate::workflows::mandates::domain::CandidateRecord;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum CandidateImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for CandidateImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateImportError::Io(err) => write!(f, "failed to read candidate export: {}", err),
            CandidateImportError::Csv(err) => write!(f, "invalid candidate CSV data: {}", err),
        }
    }
}

impl std::error::Error for CandidateImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CandidateImportError::Io(err) => Some(err),
            CandidateImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CandidateImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CandidateImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads candidate exports into raw records ready for tag extraction.
pub struct CandidateCsvImporter;

impl CandidateCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CandidateRecord>, CandidateImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CandidateRecord>, CandidateImportError> {
        Ok(parser::parse_records(reader)?)
    }
}
