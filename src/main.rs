use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use fxhash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use tracing::{info, warn};

use crate::page_scrapers::{HtmlPage, DEFAULT_SCRAPERS};
use crate::popup::{Session, SiteTable};

mod page_scrapers;
mod popup;

#[derive(Deserialize, Debug)]
#[serde(default)]
struct Config {
    /// Names of the sites to recognise. Pages from any other site are unsupported.
    enabled_sites: FxHashSet<String>,
    /// Where exported job files are written unless `--out` is given.
    output_dir: PathBuf,
    /// Replacement base URLs, keyed by site name.
    base_urls: FxHashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled_sites: DEFAULT_SCRAPERS.iter().map(|x| x.to_string()).collect(),
            output_dir: PathBuf::from("."),
            base_urls: FxHashMap::default(),
        }
    }
}

impl Config {
    /// Reads the config file, falling back to defaults if there is none.
    fn load(path: &Path) -> anyhow::Result<Self> {
        let config = match std::fs::read_to_string(path) {
            Ok(x) => x,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
        };
        toml::from_str(&config).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

#[derive(Parser)]
#[command(name = "job-snapshot", about = "Capture job postings from Seek, LinkedIn, and Indeed pages")]
struct Cli {
    /// Path to the config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PageArgs {
    /// The URL the page was open at
    #[arg(long)]
    url: String,
    /// A saved copy of the rendered page
    #[arg(long)]
    html: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what would be captured from a page
    Preview {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Capture a page and save it as JSON
    Export {
        #[command(flatten)]
        page: PageArgs,
        /// Directory to save into (default: output_dir from the config)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List the recognised sites
    Sites,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let table = SiteTable::new(&config.enabled_sites, &config.base_urls);

    match cli.command {
        Commands::Sites => {
            for site in table.profiles() {
                println!("{:<10} {}", site.name, site.base_url);
            }
        }
        Commands::Preview { page } => {
            let session = open_session(table, page).await?;
            println!("{}", session.preview());
        }
        Commands::Export { page, out } => {
            let session = open_session(table, page).await?;
            println!("{}", session.preview());

            match session.export(Utc::now())? {
                Some(download) => {
                    let dir = out.as_deref().unwrap_or(config.output_dir.as_path());
                    let path = download.save(dir).await?;
                    info!(site = session.site().map(|x| x.name), path = %path.display(), "Saved job");
                    println!("\nSaved {}", path.display());
                }
                None => warn!("Nothing to export from this page"),
            }
        }
    }

    Ok(())
}

/// Opens a popup session against a saved page.
async fn open_session(table: SiteTable, page: PageArgs) -> anyhow::Result<Session> {
    let html = tokio::fs::read_to_string(&page.html)
        .await
        .with_context(|| format!("Failed to read {}", page.html.display()))?;
    let url = page.url;

    // scraper::Html is not Send, so it has to be built and dropped on the same thread
    let session = tokio_rayon::spawn(move || {
        let page = HtmlPage::parse(&html, url);
        Session::open(&table, &page)
    })
    .await;
    Ok(session)
}
