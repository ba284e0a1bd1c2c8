use super::super::ranking::{CandidateScoreSummary, RankedMandate};
use super::super::scoring::BiasRisk;

/// Plain-language account of how a candidate's rank was reached.
///
/// Numbers are printed with one decimal place so identical summaries always
/// produce identical text.
pub fn summarise_candidate_scores(summary: &CandidateScoreSummary) -> String {
    let mut sentences = Vec::with_capacity(5);

    sentences.push(format!(
        "{} ranks #{} on the composite with an overall score of {:.1}.",
        summary.name, summary.expertise_rank, summary.overall_score
    ));

    let gap = (summary.expertise_score - summary.similarity_score).abs();
    sentences.push(if summary.expertise_score >= summary.similarity_score {
        format!(
            "Expertise ({:.1}) leads similarity ({:.1}) by {:.1} points; source reliability is {:.1}.",
            summary.expertise_score, summary.similarity_score, gap, summary.reliability_score
        )
    } else {
        format!(
            "Similarity ({:.1}) outweighs expertise ({:.1}) by {:.1} points; source reliability is {:.1}.",
            summary.similarity_score, summary.expertise_score, gap, summary.reliability_score
        )
    });

    let gained = summary.places_gained_on_similarity();
    let movement = match gained {
        0 => "unchanged".to_string(),
        n if n > 0 => format!("up {} place{}", n, plural(n)),
        n => format!("down {} place{}", -n, plural(n)),
    };
    sentences.push(format!(
        "Ranked on similarity alone they would place #{} ({movement}).",
        summary.similarity_rank
    ));

    let drivers: Vec<&str> = summary
        .similarity_tags()
        .map(|entry| entry.tag.as_str())
        .collect();
    let risk = match summary.bias_risk {
        BiasRisk::High if !drivers.is_empty() => format!(
            "Bias risk is high, driven by {}.",
            drivers.join(", ")
        ),
        risk => format!("Bias risk is {}.", risk.label()),
    };
    sentences.push(risk);

    if !summary.missing_tags.is_empty() {
        sentences.push(format!(
            "No evidence found for: {}.",
            summary.missing_tags.join(", ")
        ));
    }

    sentences.join(" ")
}

/// Fill in `reasoning` for every summary of a ranked mandate.
pub fn attach_reasoning(ranked: &mut RankedMandate) {
    for summary in &mut ranked.summaries {
        summary.reasoning = summarise_candidate_scores(summary);
    }
}

fn plural(count: i64) -> &'static str {
    if count.abs() == 1 {
        ""
    } else {
        "s"
    }
}
