//! leetboard - Personal LeetCode practice tracker

mod cli;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use leetboard_core::api::{AssistantClient, CatalogClient, CatalogProblem};
use leetboard_core::config::AppConfig;
use leetboard_core::models::{Difficulty, ProblemDraft, ProblemPatch, Status, UserId};
use leetboard_core::preferences::ViewPreferences;
use leetboard_core::{
    export_problems_to_csv, export_problems_to_json, AnalysisCache, AuthSession, ProblemStore,
    RemoteStore, StoreWatcher,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "leetboard",
    version,
    about = "Personal LeetCode practice tracker",
    long_about = "Track LeetCode practice from the command line.\n\
                  \n\
                  Problems live in a local SQLite store, scoped to one user per session.\n\
                  Every change is recorded in an append-only per-problem history; stats\n\
                  (solved counts, time invested, solve streak) are derived on every change.\n\
                  AI analyses come from a local llama.cpp-compatible server and are cached.\n\
                  \n\
                  Examples:\n\
                    leetboard --user alice add \"Two Sum\" --id 1 --difficulty easy\n\
                    leetboard --user alice import --daily\n\
                    leetboard --user alice list --status attempted --tag graph\n\
                    leetboard --user alice update 1 --status solved --time 35\n\
                    leetboard --user alice analyze two-sum-id-or-prefix\n\
                    leetboard --user alice stats\n\
                    leetboard --user alice watch\n\
                  \n\
                  Environment Variables:\n\
                    LEETBOARD_DATA_DIR               # Override data directory\n\
                    LEETBOARD_USER                   # User to sign in as\n\
                    LEETBOARD_NO_COLOR               # Disable ANSI color output\n\
                    RUST_LOG                         # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to the data directory (default: platform data dir)
    #[arg(long, env = "LEETBOARD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// User to sign in as (falls back to defaultUser in config.json)
    #[arg(long, env = "LEETBOARD_USER")]
    user: Option<String>,

    /// Disable ANSI color output
    #[arg(long, env = "LEETBOARD_NO_COLOR")]
    no_color: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Add a problem by hand
    Add {
        /// Problem title
        title: String,
        /// Numeric catalog id
        #[arg(long)]
        id: Option<u32>,
        /// Catalog slug (enables the problem URL)
        #[arg(long)]
        slug: Option<String>,
        /// easy|medium|hard
        #[arg(long)]
        difficulty: Option<String>,
        /// not-attempted|attempted|solved|reviewed
        #[arg(long)]
        status: Option<String>,
        /// Comma-separated topic tags
        #[arg(long)]
        tags: Option<String>,
        /// Comma-separated company tags
        #[arg(long)]
        companies: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List tracked problems
    List {
        /// Filter: not-attempted|attempted|solved|reviewed
        #[arg(long)]
        status: Option<String>,
        /// Filter: easy|medium|hard
        #[arg(long)]
        difficulty: Option<String>,
        /// Filter: topic tag (case-insensitive)
        #[arg(long)]
        tag: Option<String>,
        /// Filter: company tag (case-insensitive)
        #[arg(long)]
        company: Option<String>,
        /// Comma-separated column keys for this invocation
        #[arg(long)]
        columns: Option<String>,
        /// Persist --columns as the default layout
        #[arg(long)]
        save_columns: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one problem with its change history
    Show {
        /// Problem id, id prefix (min 8 chars), or catalog id
        selector: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update fields on a problem
    Update {
        /// Problem id, id prefix (min 8 chars), or catalog id
        selector: String,
        #[arg(long)]
        title: Option<String>,
        /// easy|medium|hard
        #[arg(long)]
        difficulty: Option<String>,
        /// not-attempted|attempted|solved|reviewed
        #[arg(long)]
        status: Option<String>,
        /// Comma-separated topic tags (replaces the list)
        #[arg(long)]
        tags: Option<String>,
        /// Comma-separated company tags (replaces the list)
        #[arg(long)]
        companies: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Attempt count
        #[arg(long)]
        attempts: Option<u32>,
        /// Total minutes spent
        #[arg(long)]
        time: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a problem
    Delete {
        /// Problem id, id prefix (min 8 chars), or catalog id
        selector: String,
        /// Also drop stored analyses for the problem
        #[arg(long)]
        purge_analyses: bool,
    },
    /// Print stats summary and exit
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Import problems from the catalog
    Import {
        /// Catalog slug, e.g. two-sum
        #[arg(long)]
        slug: Option<String>,
        /// Numeric catalog id
        #[arg(long)]
        id: Option<u32>,
        /// Import today's daily challenge
        #[arg(long)]
        daily: bool,
        /// Import a random problem (honors --difficulty/--tag)
        #[arg(long)]
        random: bool,
        /// Search the catalog and list candidates without importing
        #[arg(long)]
        search: Option<String>,
        /// Filter: easy|medium|hard
        #[arg(long)]
        difficulty: Option<String>,
        /// Filter: topic tag (repeatable)
        #[arg(long)]
        tag: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate or fetch the AI analysis for a problem
    Analyze {
        /// Problem id, id prefix (min 8 chars), or catalog id
        selector: String,
        /// Regenerate even when a cached analysis exists
        #[arg(long)]
        refresh: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export the problem list to a file
    Export {
        /// Output format
        #[arg(long, default_value = "csv", value_parser = ["csv", "json"])]
        format: String,
        /// Output file path
        #[arg(long)]
        out: PathBuf,
    },
    /// Watch the store and print change lines until Ctrl-C
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load();
    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| config.data_dir.clone())
        .unwrap_or_else(AppConfig::default_data_dir);

    let no_color = cli.no_color;
    let app = App::open(config, data_dir, cli.user.clone()).await?;

    match cli.command {
        Command::Add {
            title,
            id,
            slug,
            difficulty,
            status,
            tags,
            companies,
            notes,
        } => {
            run_add(
                &app, title, id, slug, difficulty, status, tags, companies, notes,
            )
            .await?;
        }
        Command::List {
            status,
            difficulty,
            tag,
            company,
            columns,
            save_columns,
            json,
        } => {
            run_list(
                &app,
                status,
                difficulty,
                tag,
                company,
                columns,
                save_columns,
                json,
                no_color,
            )
            .await?;
        }
        Command::Show { selector, json } => {
            run_show(&app, &selector, json).await?;
        }
        Command::Update {
            selector,
            title,
            difficulty,
            status,
            tags,
            companies,
            notes,
            attempts,
            time,
            json,
        } => {
            run_update(
                &app, &selector, title, difficulty, status, tags, companies, notes, attempts,
                time, json,
            )
            .await?;
        }
        Command::Delete {
            selector,
            purge_analyses,
        } => {
            run_delete(&app, &selector, purge_analyses).await?;
        }
        Command::Stats { json } => {
            run_stats(&app, json).await?;
        }
        Command::Import {
            slug,
            id,
            daily,
            random,
            search,
            difficulty,
            tag,
            json,
        } => {
            run_import(&app, slug, id, daily, random, search, difficulty, tag, json, no_color)
                .await?;
        }
        Command::Analyze {
            selector,
            refresh,
            json,
        } => {
            run_analyze(&app, &selector, refresh, json).await?;
        }
        Command::Export { format, out } => {
            run_export(&app, &format, &out).await?;
        }
        Command::Watch => {
            run_watch(&app).await?;
        }
    }

    Ok(())
}

/// Shared handles for all subcommands; opening signs the user in and loads
/// their problems
struct App {
    store: Arc<ProblemStore>,
    remote: Arc<RemoteStore>,
    auth: Arc<AuthSession>,
    config: AppConfig,
    data_dir: PathBuf,
    user: UserId,
}

impl App {
    async fn open(config: AppConfig, data_dir: PathBuf, user: Option<String>) -> Result<Self> {
        let user = user.or_else(|| config.default_user.clone()).context(
            "No user selected: pass --user, set LEETBOARD_USER, or set defaultUser in config.json",
        )?;
        let user = UserId::from(user);

        let remote = Arc::new(
            RemoteStore::open(&data_dir)
                .with_context(|| format!("Failed to open store in {}", data_dir.display()))?,
        );
        let auth = Arc::new(AuthSession::new());
        let store = Arc::new(ProblemStore::new(Arc::clone(&remote), Arc::clone(&auth)));
        store.sign_in(user.clone()).await;

        Ok(Self {
            store,
            remote,
            auth,
            config,
            data_dir,
            user,
        })
    }

    fn analysis_cache(&self) -> AnalysisCache {
        AnalysisCache::with_config(
            Arc::clone(&self.remote),
            Arc::clone(&self.auth),
            self.config.cache_config(),
        )
    }
}

// ============================================================================
// Subcommand Handlers
// ============================================================================

#[allow(clippy::too_many_arguments)]
async fn run_add(
    app: &App,
    title: String,
    id: Option<u32>,
    slug: Option<String>,
    difficulty: Option<String>,
    status: Option<String>,
    tags: Option<String>,
    companies: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let draft = ProblemDraft {
        leetcode_id: id,
        title: Some(title),
        title_slug: slug,
        difficulty: difficulty.as_deref().map(parse_difficulty).transpose()?,
        status: status.as_deref().map(parse_status).transpose()?,
        tags: tags.as_deref().map(split_list),
        companies: companies.as_deref().map(split_list),
        notes,
        ..Default::default()
    };

    let problem = app.store.add_problem(draft).await?;
    println!(
        "Added {} ({})",
        problem.title,
        &problem.id.as_str()[..8.min(problem.id.as_str().len())]
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_list(
    app: &App,
    status: Option<String>,
    difficulty: Option<String>,
    tag: Option<String>,
    company: Option<String>,
    columns: Option<String>,
    save_columns: bool,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let status = status.as_deref().map(parse_status).transpose()?;
    let difficulty = difficulty.as_deref().map(parse_difficulty).transpose()?;

    let mut prefs = ViewPreferences::load(&app.data_dir);
    if let Some(ref keys) = columns {
        prefs.set_visible_columns(&split_list(keys));
        if save_columns {
            prefs.save(&app.data_dir)?;
            eprintln!("Saved column layout.");
        }
    } else if save_columns {
        anyhow::bail!("--save-columns requires --columns");
    }

    let all = app.store.problems();
    let filtered = cli::filter_problems(&all, status, difficulty, tag.as_deref(), company.as_deref());

    println!(
        "{}",
        cli::format_problem_table(&filtered, &prefs, json, no_color)
    );

    if !json {
        eprintln!("\n{} of {} problems", filtered.len(), all.len());
    }

    Ok(())
}

async fn run_show(app: &App, selector: &str, json: bool) -> Result<()> {
    let problem = cli::find_problem(&app.store.problems(), selector)?;
    println!("{}", cli::format_problem_detail(&problem, json));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_update(
    app: &App,
    selector: &str,
    title: Option<String>,
    difficulty: Option<String>,
    status: Option<String>,
    tags: Option<String>,
    companies: Option<String>,
    notes: Option<String>,
    attempts: Option<u32>,
    time: Option<u32>,
    json: bool,
) -> Result<()> {
    let problem = cli::find_problem(&app.store.problems(), selector)?;

    let patch = ProblemPatch {
        title,
        difficulty: difficulty.as_deref().map(parse_difficulty).transpose()?,
        status: status.as_deref().map(parse_status).transpose()?,
        tags: tags.as_deref().map(split_list),
        companies: companies.as_deref().map(split_list),
        notes,
        attempts,
        time_spent_minutes: time,
        ..Default::default()
    };

    let updated = app.store.update_problem(&problem.id, patch).await?;
    println!("{}", cli::format_problem_detail(&updated, json));
    Ok(())
}

async fn run_delete(app: &App, selector: &str, purge_analyses: bool) -> Result<()> {
    let problem = cli::find_problem(&app.store.problems(), selector)?;

    app.store.delete_problem(&problem.id).await?;
    println!(
        "Deleted {} ({})",
        problem.title,
        &problem.id.as_str()[..8.min(problem.id.as_str().len())]
    );

    if purge_analyses {
        let removed = app.analysis_cache().invalidate_problem(&problem)?;
        println!("Removed {} stored analyses.", removed);
    }

    Ok(())
}

async fn run_stats(app: &App, json: bool) -> Result<()> {
    let stats = app.store.stats();
    let counts = app.remote.collection_counts(&app.user)?;

    if json {
        let document = serde_json::json!({
            "stats": stats,
            "collections": {
                "problems": counts.problems,
                "analyses": counts.analyses,
            },
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&document).unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(());
    }

    println!("leetboard - Practice Statistics");
    println!("===============================");
    println!();
    println!("{}", cli::format_stats(&stats));
    println!();
    println!("Stored problems:  {}", counts.problems);
    println!("Stored analyses:  {}", counts.analyses);

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_import(
    app: &App,
    slug: Option<String>,
    id: Option<u32>,
    daily: bool,
    random: bool,
    search: Option<String>,
    difficulty: Option<String>,
    tags: Vec<String>,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let difficulty = difficulty.as_deref().map(parse_difficulty).transpose()?;
    let modes =
        [slug.is_some(), id.is_some(), daily, random, search.is_some()]
            .iter()
            .filter(|set| **set)
            .count();
    if modes != 1 {
        anyhow::bail!("Pick exactly one of --slug, --id, --daily, --random, --search");
    }

    let client = CatalogClient::new(app.config.catalog_endpoint());
    let spinner = network_spinner("Querying catalog...", json);

    if let Some(keyword) = search {
        let results = client.search(&keyword, difficulty, &tags).await?;
        spinner.finish_and_clear();
        println!("{}", cli::format_catalog_table(&results, json, no_color));
        if !json && !results.is_empty() {
            eprintln!("\nImport one with: leetboard import --slug <slug>");
        }
        return Ok(());
    }

    let fetched: CatalogProblem = if let Some(slug) = slug {
        client.by_slug(&slug).await?
    } else if let Some(id) = id {
        client.by_id(id).await?
    } else if daily {
        client.daily().await?
    } else {
        client.random(difficulty, &tags).await?
    };
    spinner.finish_and_clear();

    // Manual drafts carry catalog id 0, which is never an identity
    if fetched.leetcode_id > 0 {
        if let Some(existing) = app
            .store
            .problems()
            .iter()
            .find(|p| p.leetcode_id == fetched.leetcode_id)
        {
            anyhow::bail!(
                "Already tracking #{} {} ({})",
                existing.leetcode_id,
                existing.title,
                &existing.id.as_str()[..8.min(existing.id.as_str().len())]
            );
        }
    }

    let problem = app.store.add_problem(fetched.into_draft()).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&problem).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        println!(
            "Imported #{} {} ({}, {})",
            problem.leetcode_id,
            problem.title,
            problem.difficulty,
            &problem.id.as_str()[..8.min(problem.id.as_str().len())]
        );
    }

    Ok(())
}

async fn run_analyze(app: &App, selector: &str, refresh: bool, json: bool) -> Result<()> {
    let problem = cli::find_problem(&app.store.problems(), selector)?;
    let cache = app.analysis_cache();

    if !refresh {
        if let Some(cached) = cache.get(&problem)? {
            println!("{}", cli::format_analysis(&cached, json));
            return Ok(());
        }
    }

    let assistant_config = app.config.assistant_config();
    let endpoint = assistant_config.endpoint.clone();
    let assistant = AssistantClient::new(assistant_config);

    let spinner = network_spinner("Checking assistant health...", json);
    if !assistant.is_healthy().await {
        spinner.finish_and_clear();
        anyhow::bail!(
            "Assistant at {} is not responding (is the llama.cpp server running?)",
            endpoint
        );
    }

    spinner.set_message(format!("Analyzing {}...", problem.title));
    let body = assistant.analyze_problem(&problem).await?;
    spinner.finish_and_clear();

    // --refresh revises the existing record in place when there is one
    let stored = if refresh {
        match cache.get(&problem)? {
            Some(existing) => cache.update(&existing, body)?,
            None => cache.put(&problem, body)?,
        }
    } else {
        cache.put(&problem, body)?
    };

    println!("{}", cli::format_analysis(&stored, json));
    Ok(())
}

async fn run_export(app: &App, format: &str, out: &std::path::Path) -> Result<()> {
    let problems = app.store.problems();
    let stats = app.store.stats();

    match format {
        "json" => export_problems_to_json(&problems, &stats, out)?,
        _ => export_problems_to_csv(&problems, &stats, out)?,
    }

    println!("Exported {} problems to {}", problems.len(), out.display());
    Ok(())
}

async fn run_watch(app: &App) -> Result<()> {
    use tokio::sync::broadcast::error::RecvError;

    let mut rx = app.store.event_bus().subscribe();
    let watcher = StoreWatcher::start(
        Arc::clone(&app.store),
        app.remote.db_path().to_path_buf(),
        Default::default(),
    )
    .await
    .context("Failed to start store watcher")?;

    println!(
        "Watching {} (Ctrl-C to stop)",
        app.remote.db_path().display()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = rx.recv() => match event {
                Ok(event) => {
                    println!(
                        "{}  {}",
                        chrono::Local::now().format("%H:%M:%S"),
                        cli::describe_event(&event)
                    );
                }
                Err(RecvError::Lagged(missed)) => {
                    eprintln!("(skipped {} events)", missed);
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    watcher.stop().await;
    println!("Stopped.");
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_difficulty(s: &str) -> Result<Difficulty> {
    s.parse().map_err(|e: String| anyhow::anyhow!(e))
}

fn parse_status(s: &str) -> Result<Status> {
    s.parse().map_err(|e: String| anyhow::anyhow!(e))
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Spinner for network-bound commands; hidden in JSON mode so stdout stays
/// machine-readable
fn network_spinner(message: &str, json: bool) -> ProgressBar {
    if json {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner.set_message(message.to_string());
    spinner
}
