use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use shadow_core::OutputRecord;
use shadow_mapping::{
    match_description, process_text, process_with_learning, ConfidenceMode, LearnReport,
    MatchConfig, ReferenceStore, SharedReferenceTable,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod resolver;
mod state;

use config::Config;
use resolver::TerminalResolver;

#[derive(Parser, Debug)]
#[command(
    name = "shadow-hours",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("SHADOW_HOURS_BUILD_SHA"), ")"),
    about = "Map shadow-calendar logs to ERP subtasks"
)]
struct Cli {
    /// Reference CSV (overrides config reference.path)
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a shadow calendar and print ERP-ready JSON rows
    Map {
        /// Calendar text file, or `-` for stdin
        input: PathBuf,

        /// Employee name on every row (overrides config export.employee)
        #[arg(long)]
        employee: Option<String>,

        /// Prompt for UNMAPPED entries and append answers to the reference CSV
        /// (created with a header row if missing)
        #[arg(long, default_value_t = false)]
        learn: bool,

        #[command(flatten)]
        scoring: ScoringArgs,

        /// Print a row/unmapped summary to stderr
        #[arg(long, default_value_t = false)]
        summary: bool,
    },

    /// Show how a single description is matched
    Match {
        description: String,

        #[command(flatten)]
        scoring: ScoringArgs,
    },

    /// List the distinct subtask codes in the reference CSV
    Tasks,

    /// Create an empty reference CSV (header only)
    InitTable,

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Matcher overrides shared by `map` and `match`.
#[derive(Args, Debug, Clone, Default)]
struct ScoringArgs {
    /// Report similarity scores instead of 1/0 confidence
    #[arg(long, default_value_t = false)]
    graded: bool,

    /// Similarity floor in [0, 1] (overrides config matching.threshold)
    #[arg(long)]
    threshold: Option<f64>,
}

impl ScoringArgs {
    fn apply(&self, mut cfg: MatchConfig) -> MatchConfig {
        if self.graded {
            cfg.confidence = ConfidenceMode::Graded;
        }
        if let Some(t) = self.threshold {
            cfg.threshold = t.clamp(0.0, 1.0);
        }
        cfg
    }
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write default ~/.shadow-hours/config.toml if missing
    Init,
    /// Print the effective config
    Show,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "shadow_hours=info,shadow_mapping=info".into()),
    );
    // stderr keeps stdout clean for JSON output
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    let csv_path = cli.csv.clone().unwrap_or_else(|| cfg.reference.path.clone());

    match cli.command {
        Command::Map {
            input,
            employee,
            learn,
            scoring,
            summary,
        } => {
            let match_cfg = scoring.apply(cfg.matching.to_match_config());
            let employee = employee.unwrap_or_else(|| cfg.export.employee.clone());
            map(&cfg, &csv_path, &input, &employee, &match_cfg, learn, summary).await?;
        }

        Command::Match {
            description,
            scoring,
        } => {
            let (_, table) = load_table(&csv_path)?;
            let match_cfg = scoring.apply(cfg.matching.to_match_config());
            let out = match_description(&description, &table, &match_cfg);
            println!("normalized: {}", shadow_core::normalize(&description));
            println!("candidate:  {}", out.candidate.as_deref().unwrap_or("(none)"));
            println!("subtask:    {}", out.task_code);
            println!("score:      {:.3}", out.score);
            println!("confidence: {:.3}", out.confidence);
        }

        Command::Tasks => {
            let (_, table) = load_table(&csv_path)?;
            for code in table.task_codes() {
                println!("{}", code);
            }
        }

        Command::InitTable => {
            ReferenceStore::create(&csv_path)
                .with_context(|| format!("creating {}", csv_path.display()))?;
            println!("Wrote {}", csv_path.display());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn load_table(csv_path: &Path) -> Result<(ReferenceStore, shadow_mapping::ReferenceTable)> {
    if !csv_path.exists() {
        bail!(
            "reference CSV not found: {} (pass --csv <path> or run: shadow-hours init-table)",
            csv_path.display()
        );
    }
    ReferenceStore::load(csv_path).with_context(|| format!("loading {}", csv_path.display()))
}

async fn map(
    cfg: &Config,
    csv_path: &Path,
    input: &Path,
    employee: &str,
    match_cfg: &MatchConfig,
    learn: bool,
    summary: bool,
) -> Result<()> {
    if learn && input == Path::new("-") {
        bail!("--learn reads answers from stdin; pass the calendar as a file");
    }

    let text = state::read_input(input)?;

    let (records, unmapped) = if learn {
        let (store, table) = ReferenceStore::open_for_learning(csv_path)
            .with_context(|| format!("opening {}", csv_path.display()))?;
        let shared = SharedReferenceTable::persisted(table, store.with_filler(cfg.reference.filler.clone()));
        let run = process_with_learning(&text, employee, &shared, match_cfg, &TerminalResolver)
            .await
            .context("mapping calendar")?;
        if let Some(msg) = saved_message(&run.learn) {
            eprintln!("{}", msg);
        }
        info!(learned = run.learn.learned, "reference table now has {} rows", shared.len());
        let unmapped = run.unmapped_count();
        (run.records, unmapped)
    } else {
        let (_, table) = load_table(csv_path)?;
        let records = process_text(&text, employee, &table, match_cfg).context("mapping calendar")?;
        let unmapped = records
            .iter()
            .filter(|r| r.task_code == shadow_core::UNMAPPED)
            .count();
        (records, unmapped)
    };

    print_records(&records, cfg.export.pretty)?;

    if summary {
        eprintln!("rows={} unmapped={}", records.len(), unmapped);
    }
    Ok(())
}

/// Confirmation shown only after the learning pass (and its appends) succeeded.
fn saved_message(report: &LearnReport) -> Option<String> {
    match report.learned {
        0 => None,
        1 => Some("✓ Saved 1 new mapping.".to_string()),
        n => Some(format!("✓ Saved {} new mappings.", n)),
    }
}

fn print_records(records: &[OutputRecord], pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(records)?
    } else {
        serde_json::to_string(records)?
    };
    println!("{}", json);
    Ok(())
}
