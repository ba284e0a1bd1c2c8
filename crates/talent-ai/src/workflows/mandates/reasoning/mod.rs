mod explanation;
pub mod views;
mod weekly;

pub use explanation::{attach_reasoning, summarise_candidate_scores};
pub use views::{MandateBiasBreakdown, SourceTypeBreakdown, WeeklyBiasSummary};
pub use weekly::{build_weekly_bias_summary, WeekWindow};
