//! Cypher Advisor CLI
//!
//! Usage:
//!   cypher-advisor serve
//!   cypher-advisor analyze --plan <plan.json> --query <cypher> [--format markdown|json]
//!   cypher-advisor rewrite <cypher>
//!   cypher-advisor compare --original <plan.json> --optimized <plan.json>
//!
//! Examples:
//!   NEO4J_URI=http://localhost:7474 NEO4J_PASSWORD=secret cypher-advisor serve
//!   cypher-advisor analyze --plan saved/explain.json --query "MATCH (n) RETURN n"
//!   cypher-advisor rewrite "MATCH (n) RETURN n"

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use cypher_advisor::advisor::Advisor;
use cypher_advisor::analyzer::analyze_plan;
use cypher_advisor::compare::compare;
use cypher_advisor::config::{ConnectionConfig, Settings};
use cypher_advisor::logging;
use cypher_advisor::neo4j::{Neo4jHttpClient, PlanProvider, Unconfigured};
use cypher_advisor::plan::{normalize_value, PlanNode};
use cypher_advisor::report;
use cypher_advisor::rewrite::rewrite;
use cypher_advisor::server::{self, Handler};

#[derive(Parser)]
#[command(name = "cypher-advisor")]
#[command(about = "Cypher Advisor - rule-based analysis of Neo4j execution plans")]
#[command(version)]
struct Cli {
    /// Path to a config file (overrides the default search)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the JSON-RPC tool server on stdin/stdout
    Serve,

    /// Analyze a saved execution plan
    Analyze {
        /// Path to the plan JSON (EXPLAIN/PROFILE output)
        #[arg(short, long)]
        plan: PathBuf,

        /// The query the plan belongs to
        #[arg(short, long)]
        query: String,

        /// Output format
        #[arg(short, long, default_value = "markdown")]
        format: OutputFormat,
    },

    /// Print the naive rewrite of a query
    Rewrite {
        /// The Cypher query
        query: String,
    },

    /// Compare two saved execution plans
    Compare {
        /// Plan of the original query
        #[arg(long)]
        original: PathBuf,

        /// Plan of the optimized query
        #[arg(long)]
        optimized: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "markdown")]
        format: OutputFormat,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Markdown report
    Markdown,
    /// Pretty-printed JSON
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::init_with_level(&settings.logging.level);

    match cli.command {
        Commands::Serve => cmd_serve(settings),
        Commands::Analyze { plan, query, format } => cmd_analyze(&plan, &query, format),
        Commands::Rewrite { query } => {
            println!("{}", rewrite(&query));
            ExitCode::SUCCESS
        }
        Commands::Compare {
            original,
            optimized,
            format,
        } => cmd_compare(&original, &optimized, format),
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings, cypher_advisor::config::SettingsError> {
    match path {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
}

fn cmd_serve(settings: Settings) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(async move {
        let provider = connect(&settings).await;
        let handler = Handler::new(Advisor::new(provider, settings.analysis));

        match server::serve_stdio(handler).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "server stopped");
                ExitCode::FAILURE
            }
        }
    })
}

/// Build the plan provider. The server starts even without a database and
/// reports the connection problem on each tool call.
async fn connect(settings: &Settings) -> Arc<dyn PlanProvider> {
    let client = ConnectionConfig::resolve(&settings.neo4j)
        .map_err(Into::into)
        .and_then(Neo4jHttpClient::new);

    let client = match client {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "Neo4j connection not configured");
            return Arc::new(Unconfigured::new(e.to_string()));
        }
    };

    if let Err(e) = client.verify().await {
        tracing::warn!(error = %e, "Neo4j connection check failed");
    }
    Arc::new(client)
}

fn read_plan(path: &Path) -> Result<PlanNode, String> {
    let source = fs::read_to_string(path)
        .map_err(|e| format!("Error reading file '{}': {}", path.display(), e))?;
    let value: serde_json::Value = serde_json::from_str(&source)
        .map_err(|e| format!("Error parsing plan '{}': {}", path.display(), e))?;
    Ok(normalize_value(&value))
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing result: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_analyze(plan_path: &Path, query: &str, format: OutputFormat) -> ExitCode {
    let plan = match read_plan(plan_path) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let analysis = analyze_plan(query, &plan);

    match format {
        OutputFormat::Markdown => {
            print!("{}", report::render_analysis(&analysis));
            ExitCode::SUCCESS
        }
        OutputFormat::Json => print_json(&analysis),
    }
}

fn cmd_compare(original: &Path, optimized: &Path, format: OutputFormat) -> ExitCode {
    let plans = read_plan(original).and_then(|a| read_plan(optimized).map(|b| (a, b)));
    let (original, optimized) = match plans {
        Ok(plans) => plans,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let comparison = compare(&original, &optimized);

    match format {
        OutputFormat::Markdown => {
            print!("{}", report::render_comparison(&comparison));
            ExitCode::SUCCESS
        }
        OutputFormat::Json => print_json(&comparison),
    }
}
