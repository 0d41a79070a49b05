//! Command-line interface for the equity research agent
//!
//! # Usage
//!
//! ```bash
//! export GROQ_API_KEY="..."
//! export ALPHA_VANTAGE_API_KEY="..."   # fundamentals only
//!
//! equity ask "Get latest news about NVDA, analyze sentiment and provide a market interpretation."
//! equity analyze AAPL
//! equity research "NVDA earnings" --fetch-content
//! ```

mod output;

use anyhow::Context as _;
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use equity_core::Agent;
use equity_llm::providers::OpenAICompatProvider;
use equity_react::{ReactAgent, ReactEventHandler, SimpleAgent, SimpleConfig, ToolFailurePolicy};
use equity_research::{
    FinanceSnapshotAgent, FinancialAnalysisAgent, ResearchConfig, WebResearchAgent,
    default_registry,
};
use equity_utils::{LogFormat, Settings, init_tracing, init_tracing_with};
use std::sync::Arc;
use tracing::info;

const DEFAULT_QUERY: &str =
    "Get latest news about NVDA, analyze sentiment and provide a market interpretation.";

#[derive(Parser, Debug)]
#[command(name = "equity", version)]
#[command(about = "Equity research agent: ReAct loop over market data, news and search tools")]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer a research question with the ReAct loop (default)
    Ask(AskArgs),

    /// Send a prompt straight to the model, without tools
    Chat {
        prompt: String,

        /// Model override
        #[arg(long)]
        model: Option<String>,
    },

    /// Price history, overview and statements for a ticker
    Snapshot { ticker: String },

    /// Valuation ratios and score for a ticker
    Analyze {
        ticker: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// News and web search for a query
    Research {
        query: String,

        /// Attach the text of each news article
        #[arg(long)]
        fetch_content: bool,
    },

    /// List the tools available to the agent
    Tools,
}

#[derive(Args, Debug, Default)]
struct AskArgs {
    /// Research question
    query: Option<String>,

    /// Model turns before giving up
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Model override
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Truncate tool observations to this many characters
    #[arg(long)]
    observation_limit: Option<usize>,

    /// End the run when a tool fails instead of showing the error to the model
    #[arg(long)]
    abort_on_tool_error: bool,

    /// Print only the final answer
    #[arg(short, long)]
    quiet: bool,
}

/// Prints every model turn as it arrives
struct StepPrinter;

#[async_trait]
impl ReactEventHandler for StepPrinter {
    async fn on_model_turn(&self, _iteration: usize, text: &str) {
        println!("\n--- LLM Step ---");
        println!("{text}");
    }

    async fn on_tool_done(&self, name: &str, result: Result<&serde_json::Value, &str>, duration_ms: u64) {
        if let Err(e) = result {
            eprintln!("[{name}] failed after {duration_ms}ms: {e}");
        }
    }

    async fn on_exhausted(&self, iterations: usize) {
        eprintln!("No final answer after {iterations} iterations");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    if cli.log_json {
        init_tracing_with(&settings.log_filter, LogFormat::Json);
    } else {
        init_tracing(&settings.log_filter);
    }

    let research = ResearchConfig::from_env();

    match cli.command.unwrap_or(Command::Ask(AskArgs::default())) {
        Command::Ask(args) => ask(args, &settings, &research).await,
        Command::Chat { prompt, model } => chat(&prompt, model, &settings).await,
        Command::Snapshot { ticker } => {
            let snapshot = FinanceSnapshotAgent::from_config(&research)?
                .run(&ticker)
                .await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
        Command::Analyze { ticker, json } => {
            let report = FinancialAnalysisAgent::from_config(&research)?
                .run(&ticker)
                .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", output::analysis_table(&report));
            }
            Ok(())
        }
        Command::Research {
            query,
            fetch_content,
        } => {
            let digest = WebResearchAgent::from_config(&research)?
                .run(&query, fetch_content)
                .await?;
            println!("{}", serde_json::to_string_pretty(&digest)?);
            Ok(())
        }
        Command::Tools => {
            let registry = default_registry(&research)?;
            println!("{}", output::tools_table(&registry));
            Ok(())
        }
    }
}

async fn ask(args: AskArgs, settings: &Settings, research: &ResearchConfig) -> anyhow::Result<()> {
    let provider = Arc::new(
        OpenAICompatProvider::from_env().context("set GROQ_API_KEY or OPENAI_API_KEY")?,
    );
    let registry = Arc::new(default_registry(research)?);

    let policy = if args.abort_on_tool_error {
        ToolFailurePolicy::Abort
    } else {
        ToolFailurePolicy::Observe
    };

    let mut builder = ReactAgent::builder()
        .provider(provider)
        .tool_registry(registry)
        .model(args.model.unwrap_or_else(|| settings.model_name.clone()))
        .max_iterations(args.max_iterations.unwrap_or(settings.max_iterations))
        .temperature(args.temperature.unwrap_or(settings.temperature))
        .tool_failure(policy);

    if let Some(limit) = args.observation_limit {
        builder = builder.observation_char_limit(limit);
    }
    if !args.quiet {
        builder = builder.event_handler(Arc::new(StepPrinter));
    }
    let agent = builder.build()?;

    let query = args.query.as_deref().unwrap_or(DEFAULT_QUERY);
    info!(model = %agent.config().model, "Running ReAct agent");
    let answer = agent.run(query).await?;

    println!("\n====== FINAL ANSWER ======");
    println!("{answer}");
    Ok(())
}

async fn chat(prompt: &str, model: Option<String>, settings: &Settings) -> anyhow::Result<()> {
    let provider = Arc::new(
        OpenAICompatProvider::from_env().context("set GROQ_API_KEY or OPENAI_API_KEY")?,
    );

    let agent = SimpleAgent::new(
        provider,
        SimpleConfig {
            model: model.unwrap_or_else(|| settings.model_name.clone()),
            temperature: settings.temperature,
            ..SimpleConfig::default()
        },
    );

    println!("{}", agent.run(prompt).await?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_flags() {
        let cli = Cli::parse_from([
            "equity",
            "ask",
            "What about AMD?",
            "--max-iterations",
            "3",
            "--abort-on-tool-error",
            "-q",
        ]);

        let Some(Command::Ask(args)) = cli.command else {
            panic!("expected ask");
        };
        assert_eq!(args.query.as_deref(), Some("What about AMD?"));
        assert_eq!(args.max_iterations, Some(3));
        assert!(args.abort_on_tool_error);
        assert!(args.quiet);
    }

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["equity"]);
        assert!(cli.command.is_none());

        let cli = Cli::parse_from(["equity", "research", "NVDA", "--fetch-content", "--log-json"]);
        assert!(cli.log_json);
        assert!(matches!(
            cli.command,
            Some(Command::Research { fetch_content: true, .. })
        ));
    }
}
