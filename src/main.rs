//! reagent - Main entry point.

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use reagent::{
    agent::{Agent, RunOutcome},
    catalog::ToolCatalog,
    config::{Config, PlannerStrategy},
    llm::create_llm_provider,
    planner::create_planner,
};

#[derive(Parser, Debug)]
#[command(
    name = "reagent",
    about = "Minimal ReAct agent that drives external script tools",
    version
)]
struct Cli {
    /// Goal to accomplish. Prompts interactively when omitted.
    #[arg(short, long)]
    goal: Option<String>,

    /// Path to the tool catalog JSON (default: tools/tools.json).
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Maximum plan/act cycles before giving up.
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Planner strategy: "tools" (native function calling) or "json".
    #[arg(long)]
    planner: Option<PlannerStrategy>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env if present
    let _ = dotenvy::dotenv();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reagent=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(reagent::error::ConfigError::MissingRequired { key, hint }) => {
            eprintln!("Configuration error: Missing required setting '{}'", key);
            eprintln!("  {}", hint);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    // CLI flags override the environment
    if let Some(catalog) = cli.catalog {
        config.agent.catalog_path = catalog;
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.agent.max_attempts = max_attempts;
    }
    if let Some(strategy) = cli.planner {
        config.llm.strategy = strategy;
    }

    let catalog = ToolCatalog::load(&config.agent.catalog_path)?;
    tracing::info!(
        "Loaded {} tools from {}",
        catalog.len(),
        config.agent.catalog_path.display()
    );

    let llm = create_llm_provider(&config.llm)?;
    let planner = create_planner(&config.llm, llm);
    let agent = Agent::new(planner, catalog, config.agent.clone());

    let goal = match cli.goal {
        Some(goal) => goal,
        None => prompt_for_goal()?,
    };
    if goal.trim().is_empty() {
        anyhow::bail!("no goal given");
    }

    let outcome = agent.run(goal.trim()).await;
    match &outcome {
        RunOutcome::Completed { attempts, .. } => {
            tracing::info!(attempts, "run completed");
        }
        RunOutcome::Exhausted { attempts } => {
            tracing::warn!(attempts, "run did not complete");
        }
    }
    println!("{}", outcome.message());

    Ok(())
}

/// Read the goal from an interactive prompt.
fn prompt_for_goal() -> anyhow::Result<String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "Goal: ")?;
    stdout.flush()?;

    let mut goal = String::new();
    std::io::stdin().read_line(&mut goal)?;
    Ok(goal)
}
