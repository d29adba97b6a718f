//! The `quiztally validate` command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Result};
use quiztally_core::parser::{load_questionnaires, validate_questionnaire};
use quiztally_core::Questionnaire;

fn unscored_ids(questionnaire: &Questionnaire) -> Vec<&str> {
    questionnaire
        .questions
        .iter()
        .filter(|q| q.answer_key.index().is_none())
        .map(|q| q.id.as_str())
        .collect()
}

pub fn execute(questionnaire_path: PathBuf) -> Result<()> {
    let questionnaires = load_questionnaires(&questionnaire_path)?;

    let mut total_warnings = 0;
    let mut files_per_id: BTreeMap<&str, usize> = BTreeMap::new();

    for questionnaire in &questionnaires {
        *files_per_id.entry(questionnaire.id.as_str()).or_insert(0) += 1;

        println!(
            "{}: {} ({} questions, {} scored)",
            questionnaire.id,
            questionnaire.title,
            questionnaire.questions.len(),
            questionnaire.scored_question_count()
        );

        let unscored = unscored_ids(questionnaire);
        if !unscored.is_empty() {
            println!("  unscored: {}", unscored.join(", "));
        }

        let warnings = validate_questionnaire(questionnaire);
        for w in &warnings {
            match &w.question_id {
                Some(id) => println!("  [{id}] WARNING: {}", w.message),
                None => println!("  WARNING: {}", w.message),
            }
        }
        total_warnings += warnings.len();
    }

    // Lookup by id takes the first file it finds, so ids must be unique.
    for (id, files) in files_per_id.iter().filter(|&(_, &n)| n > 1) {
        println!("WARNING: questionnaire id '{id}' is used by {files} files");
        total_warnings += 1;
    }

    if total_warnings > 0 {
        bail!("{total_warnings} warning(s) found");
    }

    println!("All questionnaires valid.");
    Ok(())
}
