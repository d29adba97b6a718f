//! The `quiztally list` command.

use std::path::PathBuf;

use anyhow::Result;

use quiztally_core::config::load_config_from;
use quiztally_core::ResponseRecord;

pub async fn execute(
    questionnaire_id: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let service = config.open_service();

    let records = match &questionnaire_id {
        Some(id) => service.get_responses_by_questionnaire(id).await?,
        None => service.get_all_responses().await?,
    };

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        _ => {
            if records.is_empty() {
                println!("No responses recorded.");
            } else {
                print_table(&records);
            }
        }
    }

    Ok(())
}

fn print_table(records: &[ResponseRecord]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Submitted",
        "Questionnaire",
        "Submitter",
        "Answers",
        "Score",
        "Id",
    ]);

    for r in records {
        let submitter = if r.submitter_name.is_empty() {
            r.submitter_id.clone()
        } else {
            format!("{} ({})", r.submitter_name, r.submitter_id)
        };
        let score = match (r.score, r.total_questions) {
            (Some(s), Some(t)) => format!("{s}/{t}"),
            (Some(s), None) => s.to_string(),
            _ => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(r.submitted_at.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(&r.questionnaire_id),
            Cell::new(submitter),
            Cell::new(r.answers.len()),
            Cell::new(score),
            Cell::new(r.id),
        ]);
    }

    println!("{table}");
    println!("{} response(s)", records.len());
}
