use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::api::{API_TIMEOUT_ENV, API_URL_ENV, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use services::{AnalysisService, ApiConfig, AppServices, AuthSession, Clock, ProjectService};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_LOG_FILTER: &str = "app=info,services=info,storage=info,ui=info";

#[derive(Debug, Parser)]
#[command(name = "site-dashboard")]
#[command(about = "Construction site progress dashboard", long_about = None)]
struct Args {
    /// Backend base URL
    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = API_TIMEOUT_ENV, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// SQLite database for the stored session and local overrides
    #[arg(long = "db", env = "SITE_DB_URL", default_value = "sqlite://site-dashboard.sqlite3")]
    db_url: String,

    /// Where downloaded PDF reports are written
    #[arg(long, env = "SITE_DOWNLOAD_DIR")]
    download_dir: Option<PathBuf>,

    /// Wait between asking for a PDF and checking it again
    #[arg(long, default_value_t = 2000)]
    pdf_settle_ms: u64,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error("invalid --db value: {raw}")]
    InvalidDbUrl { raw: String },
    #[error("could not prepare database file {path}: {source}")]
    DbFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] services::ApiError),
    #[error(transparent)]
    Services(#[from] services::AppServicesError),
}

struct DesktopApp {
    services: AppServices,
    download_dir: PathBuf,
}

impl UiApp for DesktopApp {
    fn auth(&self) -> Arc<AuthSession> {
        self.services.auth()
    }

    fn projects(&self) -> Arc<ProjectService> {
        self.services.projects()
    }

    fn analyses(&self) -> Arc<AnalysisService> {
        self.services.analyses()
    }

    fn download_dir(&self) -> PathBuf {
        self.download_dir.clone()
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite:///") {
        return trimmed.to_string();
    }

    let path_str = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), StartupError> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let invalid = || StartupError::InvalidDbUrl {
        raw: db_url.to_string(),
    };
    let path = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(invalid());
    }

    let path = Path::new(path);
    let db_file_err = |source| StartupError::DbFile {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(db_file_err)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(db_file_err)?;
    }
    Ok(())
}

fn resolve_download_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(dirs::download_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

async fn run() -> Result<(), StartupError> {
    let args = Args::parse();
    init_logging();

    let api = ApiConfig::new(&args.api_url, Duration::from_secs(args.timeout_secs))?;
    if args.db_url.trim().is_empty() {
        return Err(StartupError::InvalidDbUrl { raw: args.db_url });
    }
    let db_url = normalize_sqlite_url(&args.db_url);
    prepare_sqlite_file(&db_url)?;

    let services = AppServices::new_sqlite(
        &db_url,
        api,
        Clock::default_clock(),
        Duration::from_millis(args.pdf_settle_ms),
    )
    .await?;
    let download_dir = resolve_download_dir(args.download_dir);
    info!(
        api = %args.api_url,
        db = %db_url,
        downloads = %download_dir.display(),
        "starting dashboard"
    );

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services,
        download_dir,
    });
    let context = build_app_context(&app);

    // tao can default to always-on-top in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Site Progress")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
