use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use detective_core::LevelCatalog;
use detective_events::QueryOutcome;
use detective_graph::{GraphModel, Rect, Vec2, compute_layout};
use detective_progress::ProgressStore;
use detective_storage::{
    DatabaseConfig, Evaluation, GraphDatabase, GraphLoader, Neo4jClient, QueryEvaluator,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play Cypher Detective levels from the terminal", long_about = None)]
struct Cli {
    /// Database HTTP endpoint, e.g. http://localhost:7474
    #[arg(long, global = true)]
    uri: Option<String>,

    #[arg(long, global = true)]
    user: Option<String>,

    #[arg(long, global = true)]
    password: Option<String>,

    /// Database name
    #[arg(long, global = true)]
    database: Option<String>,

    /// Progress file to read and update instead of the default location
    #[arg(long, global = true)]
    progress_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every level with its lock and completion state
    Levels,
    /// Check a query against a level's ground truth
    Check {
        #[arg(short, long)]
        level: u32,
        #[arg(short, long)]
        query: String,
        /// Update progress the way the game does
        #[arg(long)]
        record: bool,
    },
    /// Load a level's visible graph, lay it out and print it as JSON
    Graph {
        #[arg(short, long)]
        level: u32,
        #[arg(long, default_value_t = 1200.0)]
        width: f32,
        #[arg(long, default_value_t = 800.0)]
        height: f32,
    },
    /// Show saved progress
    Progress {
        /// Start over from level 1
        #[arg(long)]
        reset: bool,
    },
}

impl Cli {
    /// Settings file, then environment, then flags.
    fn database_config(&self) -> DatabaseConfig {
        let mut config = stored_database_config().with_env_overrides();
        if let Some(uri) = &self.uri {
            config.uri = uri.clone();
        }
        if let Some(user) = &self.user {
            config.user = user.clone();
        }
        if let Some(password) = &self.password {
            config.password = password.clone();
        }
        if let Some(database) = &self.database {
            config.database = database.clone();
        }
        config
    }

    fn connect(&self) -> Result<Arc<dyn GraphDatabase>> {
        let client = Neo4jClient::connect(self.database_config())
            .context("Failed to create database client")?;
        Ok(Arc::new(client))
    }
}

/// The `database` section of the game's settings file, if there is one.
fn stored_database_config() -> DatabaseConfig {
    let Some(path) = dirs::config_dir().map(|d| d.join("cypher-detective").join("settings.json"))
    else {
        return DatabaseConfig::default();
    };
    let Ok(content) = std::fs::read_to_string(&path) else {
        return DatabaseConfig::default();
    };
    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(value) => value
            .get("database")
            .cloned()
            .and_then(|db| serde_json::from_value(db).ok())
            .unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Ignoring unreadable settings file {:?}: {}", path, e);
            DatabaseConfig::default()
        }
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let catalog = LevelCatalog::builtin();

    match &cli.command {
        Command::Levels => {
            let progress = ProgressStore::open(cli.progress_file.clone());
            print!("{}", render_levels(&catalog, &progress));
        }
        Command::Check {
            level,
            query,
            record,
        } => {
            let mut progress = ProgressStore::open(cli.progress_file.clone());
            let evaluator = QueryEvaluator::new(cli.connect()?);
            let evaluation = check(&evaluator, &catalog, *level, query)?;
            println!("{}", evaluation.message(*level));
            for line in result_lines(&evaluation) {
                println!("  {line}");
            }
            if *record {
                record_outcome(&mut progress, *level, evaluation.clone().into())?;
            }
            if !evaluation.is_match() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Graph {
            level,
            width,
            height,
        } => {
            let loader = GraphLoader::new(cli.connect()?);
            let dump = graph_dump(&loader, *level, *width, *height)?;
            println!("{}", serde_json::to_string_pretty(&dump)?);
        }
        Command::Progress { reset } => {
            let mut progress = ProgressStore::open(cli.progress_file.clone());
            if *reset {
                progress.reset().context("Failed to reset progress")?;
                println!("Progress reset.");
            }
            println!("{}", serde_json::to_string_pretty(progress.state())?);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn render_levels(catalog: &LevelCatalog, progress: &ProgressStore) -> String {
    let mut out = String::new();
    for level in catalog.iter() {
        let marker = if progress.is_completed(level.number) {
            "[solved]"
        } else if progress.is_unlocked(level.number) {
            ""
        } else {
            "[locked]"
        };
        let line = format!("{:>3}  {:<40} {}", level.number, level.title, marker);
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn check(
    evaluator: &QueryEvaluator,
    catalog: &LevelCatalog,
    level: u32,
    query: &str,
) -> Result<Evaluation> {
    let Some(level) = catalog.get(level) else {
        bail!("No level {level}; run `detective levels` to list them");
    };
    Ok(evaluator.check_level(level, query))
}

fn result_lines(evaluation: &Evaluation) -> Vec<String> {
    match evaluation {
        Evaluation::Match { records } | Evaluation::Mismatch { records } => {
            records.iter().map(ToString::to_string).collect()
        }
        Evaluation::QueryError(_) => Vec::new(),
    }
}

fn record_outcome(progress: &mut ProgressStore, level: u32, outcome: QueryOutcome) -> Result<()> {
    if !progress.is_unlocked(level) {
        bail!("Level {level} is locked; solve the earlier levels first");
    }
    if outcome.counts_as_attempt() {
        progress
            .record_attempt(outcome.is_match())
            .context("Failed to save progress")?;
    }
    if outcome.is_match() {
        progress
            .complete_level(level)
            .context("Failed to save progress")?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct GraphDump {
    level: u32,
    nodes: Vec<detective_core::GraphNode>,
    edges: Vec<detective_core::GraphEdge>,
    positions: BTreeMap<String, [f32; 2]>,
}

fn graph_dump(loader: &GraphLoader, level: u32, width: f32, height: f32) -> Result<GraphDump> {
    if width <= 0.0 || height <= 0.0 {
        bail!("Canvas size must be positive, got {width}x{height}");
    }
    let graph = loader
        .fetch(level)
        .with_context(|| format!("Failed to load the graph for level {level}"))?;
    let model = GraphModel::from_parts(graph.nodes.clone(), graph.edges.clone());
    let viewport = Rect::from_min_max(Vec2::ZERO, Vec2::new(width, height));
    let positions = compute_layout(&model, viewport)
        .into_iter()
        .map(|(id, p)| (id.to_string(), [p.x, p.y]))
        .collect();
    Ok(GraphDump {
        level,
        nodes: graph.nodes,
        edges: graph.edges,
        positions,
    })
}
