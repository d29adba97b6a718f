//! Cross-response statistics for the analytics views.
//!
//! Per-question statistics are positional: answer `i` of every response is
//! assumed to belong to the same question as answer `i` of the newest
//! response. Responses to an edited questionnaire, or partial submissions that
//! answered different questions, are tallied against the wrong question.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Questionnaire, ResponseRecord};
use crate::scorer::score_record;

/// Summary of every response to one questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStats {
    pub total_responses: usize,
    /// Mean score over scored responses only; 0 when none are scored.
    pub average_score: f64,
    pub question_stats: Vec<QuestionStat>,
}

impl ResponseStats {
    pub fn empty() -> Self {
        Self {
            total_responses: 0,
            average_score: 0.0,
            question_stats: Vec::new(),
        }
    }

    /// Format the statistics as markdown.
    pub fn to_markdown(&self, title: &str) -> String {
        let mut md = String::new();

        md.push_str(&format!("## {title}\n\n"));
        md.push_str(&format!(
            "**Summary:** {} responses, average score {:.2}\n\n",
            self.total_responses, self.average_score
        ));

        for (i, stat) in self.question_stats.iter().enumerate() {
            let heading = if stat.question_text.is_empty() {
                stat.question_id.as_str()
            } else {
                stat.question_text.as_str()
            };
            md.push_str(&format!("### {}. {}\n\n", i + 1, heading));
            md.push_str("| Option | Count | Share |\n");
            md.push_str("|--------|-------|-------|\n");
            for (option, count) in &stat.option_counts {
                md.push_str(&format!(
                    "| {} | {} | {:.1}% |\n",
                    escape_cell(option),
                    count,
                    stat.share(option) * 100.0
                ));
            }
            md.push('\n');
        }

        md
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Option distribution at one answer position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStat {
    /// Question id at this position in the newest response.
    pub question_id: String,
    pub question_text: String,
    /// Number of responses with an answer at this position.
    pub total_answers: usize,
    /// Selected option text to number of times it was picked.
    pub option_counts: BTreeMap<String, usize>,
}

impl QuestionStat {
    /// Fraction of answers at this position that picked `option`.
    pub fn share(&self, option: &str) -> f64 {
        if self.total_answers == 0 {
            return 0.0;
        }
        let count = self.option_counts.get(option).copied().unwrap_or(0);
        count as f64 / self.total_answers as f64
    }
}

/// Compute statistics for `questionnaire_id` over `records` (newest first).
pub fn compute_response_stats(
    questionnaire_id: &str,
    records: &[ResponseRecord],
) -> ResponseStats {
    let matching: Vec<&ResponseRecord> = records
        .iter()
        .filter(|r| r.questionnaire_id == questionnaire_id)
        .collect();

    let Some(first) = matching.first() else {
        return ResponseStats::empty();
    };

    let scores: Vec<u32> = matching.iter().filter_map(|r| r.score).collect();
    let average_score = if scores.is_empty() {
        0.0
    } else {
        scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64
    };

    let question_stats = first
        .answers
        .iter()
        .enumerate()
        .map(|(i, reference)| {
            let mut option_counts = BTreeMap::new();
            let mut total_answers = 0usize;
            for answer in matching.iter().filter_map(|r| r.answers.get(i)) {
                total_answers += 1;
                *option_counts
                    .entry(answer.selected_option.clone())
                    .or_insert(0) += 1;
            }
            QuestionStat {
                question_id: reference.question_id.clone(),
                question_text: reference.question_text.clone(),
                total_answers,
                option_counts,
            }
        })
        .collect();

    ResponseStats {
        total_responses: matching.len(),
        average_score,
        question_stats,
    }
}

/// Like [`compute_response_stats`], but records without a score are scored
/// against `questionnaire` first. Already scored records keep their score.
pub fn compute_scored_response_stats(
    questionnaire: &Questionnaire,
    records: &[ResponseRecord],
) -> ResponseStats {
    let scored: Vec<ResponseRecord> = records
        .iter()
        .filter(|r| r.questionnaire_id == questionnaire.id)
        .map(|r| {
            if r.is_scored() {
                r.clone()
            } else {
                // ids already match here
                score_record(r, questionnaire).unwrap_or_else(|_| r.clone())
            }
        })
        .collect();

    compute_response_stats(&questionnaire.id, &scored)
}
