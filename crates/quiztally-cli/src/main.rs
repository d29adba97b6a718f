//! quiztally CLI — record questionnaire responses and inspect their statistics.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "quiztally",
    version,
    about = "Questionnaire response recording and analytics"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one response
    Submit {
        /// Questionnaire TOML file to resolve and score against
        #[arg(long)]
        questionnaire: Option<PathBuf>,

        /// Questionnaire id (looked up in the questionnaire directory when no file is given)
        #[arg(long)]
        questionnaire_id: Option<String>,

        /// Submitter id
        #[arg(long, default_value = "anonymous")]
        submitter_id: String,

        /// Submitter display name
        #[arg(long, default_value = "")]
        submitter_name: String,

        /// Answers as question_id=option text (repeatable)
        #[arg(long = "answer", value_name = "QUESTION=OPTION")]
        answers: Vec<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List recorded responses, newest first
    List {
        /// Only responses to this questionnaire
        #[arg(long)]
        questionnaire_id: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show statistics for one questionnaire
    Stats {
        /// Questionnaire id
        #[arg(long)]
        questionnaire_id: String,

        /// Questionnaire TOML file used to score unscored responses
        #[arg(long)]
        questionnaire: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate questionnaire TOML files
    Validate {
        /// Path to questionnaire file or directory
        #[arg(long)]
        questionnaire: PathBuf,
    },

    /// Create starter config and example questionnaire
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quiztally=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Submit {
            questionnaire,
            questionnaire_id,
            submitter_id,
            submitter_name,
            answers,
            config,
        } => {
            commands::submit::execute(
                questionnaire,
                questionnaire_id,
                submitter_id,
                submitter_name,
                answers,
                config,
            )
            .await
        }
        Commands::List {
            questionnaire_id,
            format,
            config,
        } => commands::list::execute(questionnaire_id, format, config).await,
        Commands::Stats {
            questionnaire_id,
            questionnaire,
            format,
            config,
        } => commands::stats::execute(questionnaire_id, questionnaire, format, config).await,
        Commands::Validate { questionnaire } => commands::validate::execute(questionnaire),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
