use anyhow::Context;
use bugtrail::{
    config::Config,
    search::{Aggregation, DateRange, SearchFilter, SearchQuery, SearchResults},
    service::SearchService,
    state::InMemoryStore,
    stats::{self, ErrorLogFilter, SnippetFilter},
    AppError,
};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "bugtrail")]
#[command(about = "Search and export recorded debugging sessions", long_about = None)]
struct Cli {
    /// JSON snapshot with `sessions`, `snippets` and `errors` arrays
    #[arg(short, long, env = "BUGTRAIL_DATA")]
    data: PathBuf,

    /// User whose records are searched
    #[arg(short, long, env = "BUGTRAIL_USER")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search sessions, snippets and error logs
    Search {
        #[arg(value_name = "QUERY")]
        query: String,

        /// Restrict to sessions, snippets or errors
        #[arg(short = 'T', long = "type")]
        content_type: Option<String>,

        #[arg(short, long)]
        status: Option<String>,

        #[arg(short = 'S', long)]
        severity: Option<String>,

        /// Earliest creation date (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Latest creation date (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Print facet counts
        #[arg(long)]
        facets: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show dashboard figures
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// List error logs
    Errors {
        #[arg(short = 'T', long = "type")]
        error_type: Option<String>,

        #[arg(short = 'S', long)]
        severity: Option<String>,

        #[arg(short, long)]
        status: Option<String>,
    },

    /// List code snippets
    Snippets {
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Export a session as Markdown
    Export {
        #[arg(value_name = "SESSION_ID")]
        session_id: String,

        /// Write to this file instead of stdout
        #[arg(short, long, conflicts_with = "save")]
        output: Option<PathBuf>,

        /// Write to a file named after the session title
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() {
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });
    bugtrail::telemetry::init(&config.observability);

    let cli = Cli::parse();
    if let Err(e) = run(cli, config).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<AppError>()
            .map(AppError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting bugtrail v{}", env!("CARGO_PKG_VERSION"));

    let snapshot = std::fs::read_to_string(&cli.data)
        .map_err(AppError::from)
        .with_context(|| format!("reading {}", cli.data.display()))?;
    let records = serde_json::from_str(&snapshot)
        .map_err(AppError::from)
        .with_context(|| format!("parsing {}", cli.data.display()))?;
    let store = InMemoryStore::from_records(records)?;

    let (sessions, snippets, errors) = store.counts();
    tracing::info!(sessions, snippets, errors, "Snapshot loaded");

    let service = SearchService::new(Arc::new(store));

    match cli.command {
        Commands::Search {
            query,
            content_type,
            status,
            severity,
            from,
            to,
            facets,
            json,
        } => {
            let filters = SearchFilter {
                content_type,
                status,
                severity,
                date_range: date_range(from.as_deref(), to.as_deref())?,
            };
            let query = SearchQuery::new(query).with_filters(filters);
            let results = service.search(&cli.user, &query).await?;

            if json {
                let mut body = json!({
                    "sessions": results.sessions,
                    "snippets": results.snippets,
                    "errors": results.errors,
                    "totalCount": results.total_count(),
                });
                if facets {
                    body["facets"] = json!(results.facets(&all_aggregations()));
                }
                println!("{}", to_pretty_json(&body)?);
            } else {
                print_results(&results);
                if facets {
                    print_facets(&results);
                }
            }
        }

        Commands::Stats { json } => {
            let dashboard = service
                .dashboard(&cli.user, config.dashboard.recent_limit)
                .await?;

            if json {
                println!("{}", to_pretty_json(&dashboard)?);
            } else {
                let stats = dashboard.stats;
                println!("Sessions:        {}", stats.total_sessions);
                println!("Code snippets:   {}", stats.total_snippets);
                println!("Error logs:      {}", stats.total_errors);
                println!("Resolution rate: {}%", stats.resolution_rate());
                println!();
                println!("Recent sessions:");
                for session in &dashboard.recent_sessions {
                    println!(
                        "  {}  {}  [{}]",
                        session.created_at.format("%Y-%m-%d"),
                        session.title,
                        session.status
                    );
                }
            }
        }

        Commands::Errors {
            error_type,
            severity,
            status,
        } => {
            let records = service.load(&cli.user).await?;
            let filter = ErrorLogFilter {
                error_type,
                severity,
                status,
            };
            for error in filter.apply(&records.errors) {
                println!(
                    "{}  {:<8}  {:<13}  {}: {}",
                    error.created_at.format("%Y-%m-%d"),
                    error.severity.as_str(),
                    error.status.as_str(),
                    error.title,
                    error.message
                );
            }
        }

        Commands::Snippets { language } => {
            let records = service.load(&cli.user).await?;
            let filter = SnippetFilter { language };
            for snippet in filter.apply(&records.snippets) {
                let location = match (&snippet.file_path, snippet.line_number) {
                    (Some(path), Some(line)) => format!("{}:{}", path, line),
                    (Some(path), None) => path.clone(),
                    _ => String::new(),
                };
                println!("{:<12}  {}  {}", snippet.language, snippet.title, location);
            }
            println!();
            println!("Languages: {}", stats::languages(&records.snippets).join(", "));
        }

        Commands::Export {
            session_id,
            output,
            save,
        } => {
            let export = service.export_session(&cli.user, &session_id).await?;
            let target = match output {
                Some(path) => Some(path),
                None if save => Some(PathBuf::from(&export.file_name)),
                None => None,
            };
            match target {
                Some(path) => {
                    std::fs::write(&path, export.markdown)
                        .map_err(AppError::from)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Session exported to {}", path.display());
                }
                None => print!("{}", export.markdown),
            }
        }
    }

    Ok(())
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn all_aggregations() -> [Aggregation; 5] {
    [
        Aggregation::BySessionStatus,
        Aggregation::BySeverity,
        Aggregation::ByErrorStatus,
        Aggregation::ByErrorType,
        Aggregation::ByLanguage,
    ]
}

fn print_results(results: &SearchResults) {
    println!("{} results", results.total_count());

    if !results.sessions.is_empty() {
        println!();
        println!("Sessions ({})", results.sessions.len());
        for session in &results.sessions {
            println!("  {}  {}  [{}]", session.id, session.title, session.status);
        }
    }

    if !results.snippets.is_empty() {
        println!();
        println!("Code snippets ({})", results.snippets.len());
        for snippet in &results.snippets {
            println!("  {}  {}  ({})", snippet.id, snippet.title, snippet.language);
        }
    }

    if !results.errors.is_empty() {
        println!();
        println!("Error logs ({})", results.errors.len());
        for error in &results.errors {
            println!(
                "  {}  {}  [{} / {}]",
                error.id, error.title, error.severity, error.status
            );
        }
    }
}

fn print_facets(results: &SearchResults) {
    for aggregation in all_aggregations() {
        let counts = results.aggregate(aggregation);
        if counts.is_empty() {
            continue;
        }
        let line: Vec<String> = counts
            .iter()
            .map(|f| format!("{}={}", f.name, f.count))
            .collect();
        println!("{}: {}", aggregation.name(), line.join(" "));
    }
}

/// Build the date window from optional bounds; a missing bound is open
fn date_range(from: Option<&str>, to: Option<&str>) -> Result<Option<DateRange>, AppError> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }

    let start = from.map(parse_date).transpose()?.unwrap_or(DateTime::<Utc>::MIN_UTC);
    let end = to.map(parse_date).transpose()?.unwrap_or(DateTime::<Utc>::MAX_UTC);

    Ok(Some(DateRange::new(start, end)))
}

/// RFC 3339, or a bare `YYYY-MM-DD` meaning midnight UTC
fn parse_date(value: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::InvalidFilter(format!("unrecognised date '{}'", value)))
}
