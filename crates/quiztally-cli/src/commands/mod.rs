pub mod init;
pub mod list;
pub mod stats;
pub mod submit;
pub mod validate;

use std::path::Path;

use anyhow::Result;

use quiztally_core::parser;
use quiztally_core::Questionnaire;

/// Load the questionnaire from an explicit file, or look `id` up in `dir`.
///
/// Returns `None` when neither finds one; the caller then works unscored.
pub(crate) fn resolve_questionnaire(
    file: Option<&Path>,
    id: Option<&str>,
    dir: &Path,
) -> Result<Option<Questionnaire>> {
    if let Some(file) = file {
        let questionnaire = parser::parse_questionnaire(file)?;
        if let Some(id) = id {
            anyhow::ensure!(
                questionnaire.id == id,
                "{} defines questionnaire '{}', not '{}'",
                file.display(),
                questionnaire.id,
                id
            );
        }
        return Ok(Some(questionnaire));
    }

    match id {
        Some(id) if dir.is_dir() => parser::find_questionnaire(dir, id),
        _ => Ok(None),
    }
}
