use crate::infra::{InMemoryCandidateSource, InMemoryResultRepository};
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Args;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use talent_ai::config::scoring_from_file;
use talent_ai::error::AppError;
use talent_ai::workflows::intake::CandidateCsvImporter;
use talent_ai::workflows::mandates::{
    MandateId, MandateRecord, MandateScoringResult, MandateScoringService, ScoringConfig,
    ScoringServiceError, WeekWindow, WeeklyBiasSummary,
};

const INFRASTRUCTURE_LONGLIST: &str = "\
Candidate ID,Name,Title,Sector,Skills,Shared Employers,Shared Schools,Referred By,Notes,Source Outcomes
cand-001,Avery Stone,Portfolio Manager,Renewable Energy,Infrastructure Credit; Private Credit; ESG,,,,Led solar portfolio refinancing,1;1;1;1;1
cand-002,Blake Harrow,Associate,,Renewables,Harbor Capital,LSE,Managing partner,Family friend of the client; former colleague at Harbor,
cand-003,Casey Lund,Director,,Infrastructure Credit; Renewables,,LSE,,,1;1;0
cand-004,Drew Park,Analyst,Fintech,Private Credit,,,,Covered direct lending desk,0;1
";

const OPERATING_PARTNER_LONGLIST: &str = "\
Candidate ID,Name,Title,Sector,Skills,Shared Employers,Shared Schools,Referred By,Notes,Source Outcomes
pe-101,Emery Quinn,Operating Partner,Healthcare,Private Equity; Mergers and Acquisitions,,,,Ran buyout integration for two hospital groups,1;1;1
pe-102,Finley Shaw,Vice President,,Private Equity,Northgate Partners,INSEAD,Senior partner,Golf with the client chair; former colleague at Northgate,
pe-103,Harper Cole,Principal,Healthcare,Mergers and Acquisitions,,,,Alumni of the same MBA cohort as the deal team,1;0
";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// First day of the reporting week (YYYY-MM-DD). Defaults to the current ISO week.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) week_start: Option<NaiveDate>,
    /// Omit the per-candidate reasoning from the ranking output.
    #[arg(long)]
    pub(crate) brief: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Candidate CSV export to rank
    #[arg(long)]
    pub(crate) candidates: PathBuf,
    /// Comma-separated mandate requirements, e.g. "Infra Debt,Renewables"
    #[arg(long, value_delimiter = ',', required = true)]
    pub(crate) terms: Vec<String>,
    /// Identifier stamped on the result
    #[arg(long, default_value = "adhoc")]
    pub(crate) mandate_id: String,
    /// Optional mandate title
    #[arg(long)]
    pub(crate) title: Option<String>,
    /// JSON scoring config replacing the default weights
    #[arg(long)]
    pub(crate) scoring_config: Option<PathBuf>,
    /// Print the full result as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        candidates,
        terms,
        mandate_id,
        title,
        scoring_config,
        json,
    } = args;

    let config = match scoring_config {
        Some(path) => scoring_from_file(&path)?,
        None => ScoringConfig::default(),
    };
    let records = CandidateCsvImporter::from_path(&candidates)?;
    let mandate = MandateRecord {
        mandate_id: Some(mandate_id),
        title,
        required_terms: terms,
    };

    let service = MandateScoringService::new(
        Arc::new(InMemoryCandidateSource::default()),
        Arc::new(InMemoryResultRepository::default()),
        config,
    );
    let result = service.rank_records(&mandate, &records)?;

    if json {
        let rendered = serde_json::to_string_pretty(&result).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        println!(
            "Ranked {} candidate(s) from {}",
            result.candidates.len(),
            candidates.display()
        );
        render_ranking(&result, true);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { week_start, brief } = args;

    let window = match week_start {
        Some(start) => WeekWindow::starting(start),
        None => WeekWindow::current(),
    };

    let source = Arc::new(InMemoryCandidateSource::default());
    let mandate_ids = seed_demo_mandates(&source)?;
    let service = MandateScoringService::new(
        source,
        Arc::new(InMemoryResultRepository::default()),
        ScoringConfig::default(),
    );

    println!("Bias-aware ranking demo");
    for (offset, mandate_id) in mandate_ids.iter().enumerate() {
        let scored_at = demo_timestamp(window.start, offset);
        let result = service.score_mandate_at(mandate_id, scored_at)?;
        render_ranking(&result, !brief);
    }

    let summary = service.weekly_summary(window)?;
    render_weekly_summary(&summary);
    Ok(())
}

/// Load the bundled longlists into `source`, returning their mandate ids.
pub(crate) fn seed_demo_mandates(
    source: &InMemoryCandidateSource,
) -> Result<Vec<MandateId>, AppError> {
    let mandates = [
        (
            MandateRecord {
                mandate_id: Some("M-IC-7".to_string()),
                title: Some("Infrastructure credit portfolio manager".to_string()),
                required_terms: vec![
                    "Infra Debt".to_string(),
                    "Renewables".to_string(),
                    "Direct Lending".to_string(),
                    "Sustainability".to_string(),
                ],
            },
            INFRASTRUCTURE_LONGLIST,
        ),
        (
            MandateRecord {
                mandate_id: Some("M-PE-3".to_string()),
                title: Some("Healthcare operating partner".to_string()),
                required_terms: vec![
                    "Private Equity".to_string(),
                    "Mergers and Acquisitions".to_string(),
                    "Healthcare".to_string(),
                ],
            },
            OPERATING_PARTNER_LONGLIST,
        ),
    ];

    let mut ids = Vec::with_capacity(mandates.len());
    for (mandate, csv) in mandates {
        let records = CandidateCsvImporter::from_reader(Cursor::new(csv.as_bytes()))?;
        let id = source
            .register(mandate, records)
            .map_err(ScoringServiceError::from)?;
        ids.push(id);
    }
    Ok(ids)
}

fn demo_timestamp(day: NaiveDate, offset: usize) -> chrono::DateTime<Utc> {
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN);
    let at = day.and_time(nine) + Duration::hours(offset as i64);
    Utc.from_utc_datetime(&at)
}

fn render_ranking(result: &MandateScoringResult, with_reasoning: bool) {
    println!(
        "\nMandate {} (scored {})",
        result.mandate_id,
        result.scored_at.format("%Y-%m-%d %H:%M UTC")
    );

    if result.candidates.is_empty() {
        println!("  No candidates to rank.");
        return;
    }

    println!(
        "  {:<4} {:<12} {:<18} {:>7} {:>9} {:>10} {:>11} {:>5}  Risk",
        "#", "Candidate", "Name", "Overall", "Expertise", "Similarity", "Reliability", "Sim#"
    );
    for summary in &result.candidates {
        println!(
            "  {:<4} {:<12} {:<18} {:>7.1} {:>9.1} {:>10.1} {:>11.1} {:>5}  {}",
            summary.expertise_rank,
            summary.candidate_id.to_string(),
            summary.name,
            summary.overall_score,
            summary.expertise_score,
            summary.similarity_score,
            summary.reliability_score,
            summary.similarity_rank,
            summary.bias_risk.label()
        );
    }

    let flagged: Vec<_> = result.flagged_divergences().collect();
    if !flagged.is_empty() {
        println!("\n  Divergence flags:");
        for entry in flagged {
            println!(
                "  - {} climbs {} place(s) on similarity alone (#{} -> #{})",
                entry.candidate_id, -entry.movement, entry.expertise_rank, entry.similarity_rank
            );
        }
    }

    if with_reasoning {
        println!("\n  Reasoning:");
        for summary in &result.candidates {
            println!("  - {}", summary.reasoning);
        }
    }
}

fn render_weekly_summary(summary: &WeeklyBiasSummary) {
    println!(
        "\nWeekly bias summary ({} to {})",
        summary.window_start, summary.window_end
    );

    if summary.is_empty() {
        println!("  No mandates were scored in this window.");
        return;
    }

    println!("  Mandates scored: {}", summary.mandates_scored);
    println!("  Candidates scored: {}", summary.candidates_scored);
    println!(
        "  High-risk decisions: {} ({:.0}% of candidates)",
        summary.high_risk_decisions,
        summary.high_risk_rate() * 100.0
    );
    println!("  Moderate-risk decisions: {}", summary.moderate_risk_decisions);
    println!("  Mandates with high-risk candidates: {}", summary.affected_mandates);
    println!(
        "  Top similarity driver: {}",
        summary.top_similarity_driver.as_deref().unwrap_or("none")
    );
    println!(
        "  Average rank divergence: {:.2} place(s)",
        summary.average_divergence
    );

    println!("\n  By mandate:");
    for entry in &summary.mandates {
        println!(
            "  - {}: {} run(s), {} candidate(s), {} high risk, {} flagged, driver {}",
            entry.mandate_id,
            entry.runs,
            entry.candidates,
            entry.high_risk,
            entry.flagged_divergences,
            entry.top_similarity_driver.as_deref().unwrap_or("none")
        );
    }

    println!("\n  By source type:");
    for entry in &summary.source_types {
        println!(
            "  - {:<7} domain {:>3}  similarity {:>3}  high-risk similarity {:>3}",
            entry.signal_label,
            entry.domain_credits,
            entry.similarity_credits,
            entry.high_risk_similarity_credits
        );
    }
}
