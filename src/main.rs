use clap::Parser;
use quizdeck::Provider;
use quizdeck::core::config::{self, CliOverrides, QuizConfig};
use quizdeck::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quizdeck", about = "Flashcard quizzes in the terminal, with an AI tutor")]
struct Args {
    /// Tutor provider (overrides config and QUIZDECK_PROVIDER)
    #[arg(short, long, value_enum)]
    provider: Option<Provider>,

    /// Question bank file to use instead of ~/.quizdeck/bank.json
    #[arg(short, long)]
    bank: Option<PathBuf>,

    /// Shuffle questions when a quiz starts
    #[arg(short, long)]
    random: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to quizdeck.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("quizdeck.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("{}, falling back to defaults", e);
        eprintln!("quizdeck: {e}; using defaults");
        QuizConfig::default()
    });
    let overrides = CliOverrides {
        provider: args.provider.map(|p| p.as_str().to_string()),
        bank_path: args.bank,
        randomize: args.random,
    };
    let resolved = config::resolve(&file_config, &overrides);

    log::info!(
        "quizdeck starting up with provider: {} (model {}), bank {}",
        resolved.provider,
        resolved.model_name,
        resolved.bank_path.display()
    );

    tui::run(resolved)
}
