//! Tag extraction from raw candidate rows into canonical `SourceSignal`s.

mod normalizer;
mod profile;
pub mod vocabulary;

pub use profile::{build_source_profile, extract_profile, mandate_requirements, SourceProfile};
