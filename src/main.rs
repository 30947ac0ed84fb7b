use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::{info, Level};

use calendar_agent::agent::Agent;
use calendar_agent::backend::google::{GmailClient, GoogleCalendarClient};
use calendar_agent::dispatcher::Dispatcher;
use calendar_agent::gateway::ModelGateway;
use calendar_agent::prompt::cliclack::CliclackPrompt;
use calendar_agent::providers::configs::base::ProviderConfig;
use calendar_agent::providers::configs::google::GoogleConfig;
use calendar_agent::providers::configs::openai::OpenAiProviderConfig;
use calendar_agent::providers::openai::OpenAiProvider;
use calendar_agent::session::Session;
use calendar_agent::settings::AgentSettings;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// OpenAI API Key (can also be set via OPENAI_API_KEY environment variable)
    #[arg(short, long)]
    api_key: Option<String>,

    /// Model to use (defaults to MODEL_NAME or gpt-4o)
    #[arg(short, long)]
    model: Option<String>,

    /// Log level: error, warn, info, debug or trace (defaults to LOG_LEVEL or info)
    #[arg(short, long)]
    log_level: Option<Level>,
}

fn init_logging(settings: &AgentSettings) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.log_file)
        .with_context(|| format!("cannot open log file {}", settings.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_max_level(settings.log_level)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let settings = AgentSettings::from_env()?.with_log_level(cli.log_level);
    init_logging(&settings)?;

    let mut openai = OpenAiProviderConfig::from_env_with_key(cli.api_key).context(
        "API key must be provided via --api-key or OPENAI_API_KEY environment variable",
    )?;
    if let Some(model) = cli.model {
        openai = openai.with_model(model);
    }
    let max_tokens = openai.max_tokens;
    info!("Using model {} at {}", openai.model, openai.host);
    let provider = OpenAiProvider::new(openai)?;

    let google = GoogleConfig::from_env()?;
    let mail = GmailClient::new(google.clone())?;
    let calendar = GoogleCalendarClient::new(google)?;

    let dispatcher = Dispatcher::new(
        ModelGateway::new(Box::new(provider), max_tokens),
        Box::new(mail),
        Box::new(calendar),
    );
    let agent = Agent::new(dispatcher, settings.max_history);

    let mut session = Session::new(agent, CliclackPrompt::new());
    session.start()
}
