//! The `quiztally submit` command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use quiztally_core::config::load_config_from;
use quiztally_core::{Submission, Submitter};

use super::resolve_questionnaire;

/// Parse `question=option` pairs. Later pairs for the same question win.
fn parse_answers(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            let (question, option) = pair.split_once('=').ok_or_else(|| {
                anyhow::anyhow!("invalid answer '{pair}', expected QUESTION=OPTION")
            })?;
            let question = question.trim();
            anyhow::ensure!(!question.is_empty(), "invalid answer '{pair}': empty question id");
            Ok((question.to_string(), option.trim().to_string()))
        })
        .collect()
}

pub async fn execute(
    questionnaire_path: Option<PathBuf>,
    questionnaire_id: Option<String>,
    submitter_id: String,
    submitter_name: String,
    answers: Vec<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        questionnaire_path.is_some() || questionnaire_id.is_some(),
        "either --questionnaire or --questionnaire-id is required"
    );

    let config = load_config_from(config_path.as_deref())?;
    let answers = parse_answers(&answers)?;

    let questionnaire = resolve_questionnaire(
        questionnaire_path.as_deref(),
        questionnaire_id.as_deref(),
        &config.questionnaire_dir,
    )?;

    let id = match (&questionnaire, questionnaire_id) {
        (Some(q), _) => q.id.clone(),
        (None, Some(id)) => {
            tracing::info!("questionnaire '{id}' not found, recording unscored");
            id
        }
        (None, None) => anyhow::bail!("no questionnaire to submit to"),
    };

    let submission = Submission::new(id, answers, Utc::now()).with_submitter(Submitter {
        id: submitter_id,
        name: submitter_name,
    });

    let service = config.open_service();
    let record = service.submit(&submission, questionnaire.as_ref()).await?;

    println!("Recorded response {}", record.id);
    match (record.score, record.total_questions) {
        (Some(score), Some(total)) => println!("Score: {score}/{total}"),
        _ => println!("Score: not scored"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_answer_pairs() {
        let answers = parse_answers(&[
            "capital=Paris".to_string(),
            "planets = 8".to_string(),
            "capital=Lyon".to_string(),
            "note=a=b".to_string(),
        ])
        .unwrap();
        assert_eq!(answers["capital"], "Lyon");
        assert_eq!(answers["planets"], "8");
        assert_eq!(answers["note"], "a=b");
    }

    #[test]
    fn reject_malformed_pairs() {
        assert!(parse_answers(&["no-separator".to_string()]).is_err());
        assert!(parse_answers(&["=Paris".to_string()]).is_err());
    }
}
