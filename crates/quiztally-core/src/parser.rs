//! TOML questionnaire parser.
//!
//! Loads questionnaires from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{AnswerKey, Question, Questionnaire};

/// Intermediate TOML structure for parsing questionnaire files.
#[derive(Debug, Deserialize)]
struct TomlQuestionnaireFile {
    questionnaire: TomlQuestionnaireHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestionnaireHeader {
    id: String,
    title: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    text: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_answer_index: Option<usize>,
}

/// Parse a single TOML file into a `Questionnaire`.
pub fn parse_questionnaire(path: &Path) -> Result<Questionnaire> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read questionnaire file: {}", path.display()))?;

    parse_questionnaire_str(&content, path)
}

/// Parse a TOML string into a `Questionnaire` (useful for testing).
pub fn parse_questionnaire_str(content: &str, source_path: &Path) -> Result<Questionnaire> {
    let parsed: TomlQuestionnaireFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    anyhow::ensure!(
        !parsed.questionnaire.id.trim().is_empty(),
        "questionnaire id is empty in {}",
        source_path.display()
    );

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| Question {
            id: q.id,
            text: q.text,
            options: q.options,
            answer_key: AnswerKey::from(q.correct_answer_index),
        })
        .collect();

    Ok(Questionnaire {
        id: parsed.questionnaire.id,
        title: parsed.questionnaire.title,
        questions,
    })
}

/// Recursively load all `.toml` questionnaire files from a directory.
pub fn load_questionnaire_directory(dir: &Path) -> Result<Vec<Questionnaire>> {
    let mut questionnaires = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            questionnaires.extend(load_questionnaire_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_questionnaire(&path) {
                Ok(q) => questionnaires.push(q),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(questionnaires)
}

/// Load one file, or every questionnaire under a directory.
pub fn load_questionnaires(path: &Path) -> Result<Vec<Questionnaire>> {
    if path.is_dir() {
        load_questionnaire_directory(path)
    } else {
        Ok(vec![parse_questionnaire(path)?])
    }
}

/// Find the questionnaire with `id` under a directory.
pub fn find_questionnaire(dir: &Path, id: &str) -> Result<Option<Questionnaire>> {
    Ok(load_questionnaire_directory(dir)?
        .into_iter()
        .find(|q| q.id == id))
}

/// A warning from questionnaire validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a questionnaire for common authoring mistakes.
pub fn validate_questionnaire(questionnaire: &Questionnaire) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if questionnaire.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "questionnaire has no questions".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for question in &questionnaire.questions {
        let warn = |message: String| ValidationWarning {
            question_id: Some(question.id.clone()),
            message,
        };

        if !seen_ids.insert(&question.id) {
            warnings.push(warn(format!("duplicate question ID: {}", question.id)));
        }

        if question.text.trim().is_empty() {
            warnings.push(warn("question text is empty".into()));
        }

        if question.options.len() < 2 {
            warnings.push(warn(format!(
                "question has {} option(s), expected at least 2",
                question.options.len()
            )));
        }

        // Answers are stored as option text, so repeated texts cannot be told apart.
        let mut seen_options = HashSet::new();
        for option in &question.options {
            if !seen_options.insert(option) {
                warnings.push(warn(format!("duplicate option: {option}")));
            }
        }

        if let Some(index) = question.answer_key.index() {
            if index >= question.options.len() {
                warnings.push(warn(format!(
                    "correct_answer_index {index} is out of range for {} option(s)",
                    question.options.len()
                )));
            }
        }
    }

    warnings
}
