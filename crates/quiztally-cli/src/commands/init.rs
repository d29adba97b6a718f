//! The `quiztally init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quiztally.toml
    if std::path::Path::new("quiztally.toml").exists() {
        println!("quiztally.toml already exists, skipping.");
    } else {
        std::fs::write("quiztally.toml", SAMPLE_CONFIG)?;
        println!("Created quiztally.toml");
    }

    // Create example questionnaire
    std::fs::create_dir_all("questionnaires")?;
    let example_path = std::path::Path::new("questionnaires/example.toml");
    if example_path.exists() {
        println!("questionnaires/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUESTIONNAIRE)?;
        println!("Created questionnaires/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: quiztally validate --questionnaire questionnaires/example.toml");
    println!("  2. Run: quiztally submit --questionnaire-id example --answer capital=Paris");
    println!("  3. Run: quiztally stats --questionnaire-id example");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quiztally configuration

store_dir = "./quiztally-data"
questionnaire_dir = "./questionnaires"
# max_store_bytes = 5242880
"#;

const EXAMPLE_QUESTIONNAIRE: &str = r#"[questionnaire]
id = "example"
title = "Example Questionnaire"

[[questions]]
id = "capital"
text = "What is the capital of France?"
options = ["Lyon", "Paris", "Marseille"]
correct_answer_index = 1

[[questions]]
id = "planets"
text = "How many planets are in the solar system?"
options = ["7", "8", "9"]
correct_answer_index = 1

[[questions]]
id = "feedback"
text = "How did you find this quiz?"
options = ["Easy", "Just right", "Hard"]
"#;
