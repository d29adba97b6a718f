//! The `quiztally stats` command.

use std::path::PathBuf;

use anyhow::Result;

use quiztally_core::config::load_config_from;
use quiztally_core::ResponseStats;

use super::resolve_questionnaire;

pub async fn execute(
    questionnaire_id: String,
    questionnaire_path: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let service = config.open_service();

    let questionnaire = resolve_questionnaire(
        questionnaire_path.as_deref(),
        Some(&questionnaire_id),
        &config.questionnaire_dir,
    )?;

    let (stats, title) = match &questionnaire {
        Some(q) => (service.get_scored_response_stats(q).await?, q.title.clone()),
        None => (
            service.get_response_stats(&questionnaire_id).await?,
            questionnaire_id.clone(),
        ),
    };

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", stats.to_markdown(&title));
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        _ => print_text(&title, &stats),
    }

    Ok(())
}

fn print_text(title: &str, stats: &ResponseStats) {
    use comfy_table::{Cell, Table};

    println!(
        "{title}: {} responses, average score {:.2}",
        stats.total_responses, stats.average_score
    );

    for (i, stat) in stats.question_stats.iter().enumerate() {
        let heading = if stat.question_text.is_empty() {
            &stat.question_id
        } else {
            &stat.question_text
        };
        println!("\n{}. {} ({} answers)", i + 1, heading, stat.total_answers);

        let mut table = Table::new();
        table.set_header(vec!["Option", "Count", "Share"]);
        for (option, count) in &stat.option_counts {
            table.add_row(vec![
                Cell::new(option),
                Cell::new(count),
                Cell::new(format!("{:.1}%", stat.share(option) * 100.0)),
            ]);
        }
        println!("{table}");
    }
}
