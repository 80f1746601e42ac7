use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use scholar_panels::SiteConfig;
use scholar_panels::loader::{load_page, open_source};
use scholar_panels::page::Page;
use scholar_panels::scholar::{Pagination, ScholarClient, UpdateOptions, UpdateOutcome, update};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Publication and citation panels for an academic profile site", long_about = None)]
struct Cli {
    /// Log debug output (RUST_LOG overrides)
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the panels from the CSV data files into a page template
    Render(RenderArgs),
    /// Refresh the CSV data files from a Google Scholar profile
    Update(UpdateArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Directory or base URL holding the CSV files
    #[arg(long, value_hint = ValueHint::AnyPath)]
    data: String,

    /// Page template with mount point markers; a bare skeleton if omitted
    #[arg(long, value_hint = ValueHint::FilePath)]
    template: Option<PathBuf>,

    /// Where to write the page; stdout if omitted
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// TOML site configuration
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct UpdateArgs {
    /// Public profile URL; defaults to the configured one
    #[arg(long)]
    profile_url: Option<String>,

    /// Output directory for the CSV files
    #[arg(long, default_value = "data", value_hint = ValueHint::DirPath)]
    out_dir: PathBuf,

    /// Local HTML snapshot of the profile page
    #[arg(long, value_hint = ValueHint::FilePath)]
    html_file: Option<PathBuf>,

    /// Read --html-file instead of fetching the profile
    #[arg(long, action = ArgAction::SetTrue, requires = "html_file")]
    prefer_html: bool,

    /// Fail when Scholar blocks the request or parsing fails
    #[arg(long, action = ArgAction::SetTrue)]
    strict: bool,

    /// Publications per listing page
    #[arg(long, default_value_t = 100)]
    pagesize: usize,

    /// Maximum listing pages to walk
    #[arg(long, default_value_t = 20)]
    max_pages: usize,

    /// Seconds to wait between listing pages
    #[arg(long, default_value_t = 1.5)]
    sleep: f64,

    /// TOML site configuration
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Render(args) => handle_render(args),
        Command::Update(args) => handle_update(args),
    }
}

fn load_config(path: Option<&Path>) -> Result<SiteConfig> {
    let Some(path) = path else {
        return Ok(SiteConfig::new());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: SiteConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config
        .validate()
        .map_err(|e| anyhow!("invalid config {}: {}", path.display(), e))?;
    Ok(config)
}

fn handle_render(args: RenderArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let mut page = match &args.template {
        Some(path) => Page::new(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read template {}", path.display()))?,
        ),
        None => Page::skeleton(),
    };

    let source = open_source(&args.data);
    let report = load_page(source.as_ref(), &mut page, &config);
    info!(
        rendered = report.rendered.len(),
        skipped = report.skipped.len(),
        failed = report.failures.len(),
        "panels loaded"
    );
    for (kind, error) in &report.failures {
        warn!(resource = %kind, "{}", error);
    }

    match &args.output {
        Some(path) => {
            fs::write(path, page.html())
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "page written");
        }
        None => io::stdout()
            .write_all(page.html().as_bytes())
            .context("failed to write page to stdout")?,
    }
    Ok(())
}

fn handle_update(args: UpdateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    if args.pagesize == 0 {
        return Err(anyhow!("--pagesize must be at least 1"));
    }

    let mut options = UpdateOptions::new(
        args.profile_url
            .unwrap_or_else(|| config.profile_url().to_string()),
    );
    options.out_dir = args.out_dir;
    options.html_file = args.html_file;
    options.prefer_html = args.prefer_html;
    options.strict = args.strict;
    options.pagination = Pagination {
        pagesize: args.pagesize,
        max_pages: args.max_pages,
        sleep: listing_pause(args.sleep)?,
    };

    let client = ScholarClient::http().context("failed to build HTTP client")?;
    match update(&client, &options).context("profile update failed")? {
        UpdateOutcome::Written(paths) => {
            for path in paths {
                println!("[ok] Wrote: {}", path.display());
            }
        }
        UpdateOutcome::Unchanged(_) => {
            info!("existing CSV files kept");
        }
    }
    Ok(())
}

fn listing_pause(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds)
        .with_context(|| format!("--sleep must be a non-negative number of seconds, got {}", seconds))
}
