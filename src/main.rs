mod config;

/// Version injected at compile time via CLOAPI_VERSION env var (set by CI/CD),
/// or the crate version for local builds.
pub const VERSION: &str = match option_env!("CLOAPI_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use cloapi::api::{
    ApiClient, ApiError, CancellationToken, FilteringField, ListResponse, Paginator, PaginatorOptions,
    Request, RetryPolicy,
};
use cloapi::resource::{project, servers, storage};
use config::Config;
use futures::TryStreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Command-line client for the cloud API
#[derive(Parser, Debug)]
#[command(name = "cloapi", version = VERSION, about, long_about = None)]
struct Args {
    /// API base URL (falls back to CLO_BASE_URL, then the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// API auth key (falls back to CLO_AUTH_KEY, then the config file)
    #[arg(long, global = true)]
    auth_key: Option<String>,

    /// Total attempts per request
    #[arg(long, global = true, default_value_t = 3)]
    retries: u32,

    /// Pause between attempts, in milliseconds
    #[arg(long, global = true, default_value_t = 500)]
    retry_delay_ms: u64,

    /// Log level for debugging
    #[arg(long, global = true, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute servers
    Servers {
        #[command(subcommand)]
        action: ServerAction,
    },
    /// Project images
    Images {
        #[command(subcommand)]
        action: ImageAction,
    },
    /// S3 storage users
    S3Users {
        #[command(subcommand)]
        action: S3UserAction,
    },
}

#[derive(Subcommand, Debug)]
enum ServerAction {
    /// List servers of a project
    List(ListArgs),
    /// Show one server
    Show { id: String },
    Start { id: String },
    Stop { id: String },
    Reboot { id: String },
}

#[derive(Subcommand, Debug)]
enum ImageAction {
    /// List images available to a project
    List(ListArgs),
}

#[derive(Subcommand, Debug)]
enum S3UserAction {
    /// Issue a new access/secret key pair
    ResetKeys { id: String },
}

#[derive(ClapArgs, Debug)]
struct ListArgs {
    /// Project ID (remembered in the config file)
    #[arg(short, long)]
    project: Option<String>,

    /// Page size
    #[arg(long, default_value_t = 20)]
    limit: u32,

    /// Offset of the first item
    #[arg(long, default_value_t = 0)]
    offset: u64,

    /// Order by field, prefix with '-' for descending; repeatable
    #[arg(long, allow_hyphen_values = true)]
    order: Vec<String>,

    /// Filter as name:condition:value (gt, gte, lt, lte, range, in); repeatable
    #[arg(long)]
    filter: Vec<FilteringField>,

    /// Fetch every page instead of a single one
    #[arg(long)]
    all: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing_level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("cloapi {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("cloapi").join("cloapi.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".cloapi").join("cloapi.log");
    }
    PathBuf::from("cloapi.log")
}

fn build_client(args: &Args, config: &Config) -> Result<ApiClient> {
    let base_url = config
        .effective_base_url(args.base_url.as_deref())
        .context("No API base URL. Pass --base-url or set CLO_BASE_URL")?;
    let auth_key = config
        .effective_auth_key(args.auth_key.as_deref())
        .context("No API auth key. Pass --auth-key or set CLO_AUTH_KEY")?;

    ApiClient::new(&base_url, &auth_key).context("Failed to create API client")
}

/// Resolve the project for a list command and remember an explicit choice
fn resolve_project(list: &ListArgs, config: &mut Config) -> Result<String> {
    let project = config
        .effective_project(list.project.as_deref())
        .context("No project selected. Pass --project")?;

    if list.project.is_some() && config.project_id.as_deref() != Some(project.as_str()) {
        if let Err(e) = config.set_project(&project) {
            tracing::warn!("Failed to save project to config: {:#}", e);
        }
    }
    Ok(project)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_list<T>(
    client: &ApiClient,
    request: Request<(), ListResponse<T>>,
    list: &ListArgs,
    retry: RetryPolicy,
    cancel: &CancellationToken,
) -> Result<()>
where
    T: DeserializeOwned + Serialize,
{
    let mut request = request.with_retry_policy(retry);
    for name in &list.order {
        request = request.order_by(name.as_str());
    }
    for field in &list.filter {
        request = request
            .try_filter_by(field.clone())
            .with_context(|| format!("Invalid --filter {}:{}", field.field_name, field.condition))?;
    }

    let options = PaginatorOptions::new(list.limit).with_offset(list.offset);
    let mut paginator = Paginator::new(client, request, options).context("Invalid --limit")?;

    if !list.all {
        let page = paginator.next_page_with_cancel(cancel).await?;
        return print_json(&page);
    }

    let all = paginator
        .into_stream_with_cancel(cancel.clone())
        .try_fold(ListResponse::default(), |mut acc, page| async move {
            acc.count = page.count;
            acc.results.extend(page.results);
            Ok::<_, ApiError>(acc)
        })
        .await?;
    print_json(&all)
}

async fn run(args: Args, cancel: CancellationToken) -> Result<()> {
    let mut config = Config::load();
    let client = build_client(&args, &config)?;
    let retry = RetryPolicy::new(args.retries, Duration::from_millis(args.retry_delay_ms));

    match &args.command {
        Command::Servers { action } => match action {
            ServerAction::List(list) => {
                let project = resolve_project(list, &mut config)?;
                run_list(&client, servers::list(&project), list, retry, &cancel).await
            }
            ServerAction::Show { id } => {
                let server = servers::detail(id)
                    .with_retry_policy(retry)
                    .send_with_cancel(&client, &cancel)
                    .await
                    .with_context(|| format!("Failed to fetch server {}", id))?;
                print_json(&server.result)
            }
            ServerAction::Start { id } => {
                servers::start(id)
                    .with_retry_policy(retry)
                    .send_with_cancel(&client, &cancel)
                    .await
                    .with_context(|| format!("Failed to start server {}", id))?;
                Ok(())
            }
            ServerAction::Stop { id } => {
                servers::stop(id)
                    .with_retry_policy(retry)
                    .send_with_cancel(&client, &cancel)
                    .await
                    .with_context(|| format!("Failed to stop server {}", id))?;
                Ok(())
            }
            ServerAction::Reboot { id } => {
                servers::reboot(id)
                    .with_retry_policy(retry)
                    .send_with_cancel(&client, &cancel)
                    .await
                    .with_context(|| format!("Failed to reboot server {}", id))?;
                Ok(())
            }
        },
        Command::Images { action } => match action {
            ImageAction::List(list) => {
                let project = resolve_project(list, &mut config)?;
                run_list(&client, project::image_list(&project), list, retry, &cancel).await
            }
        },
        Command::S3Users { action } => match action {
            S3UserAction::ResetKeys { id } => {
                let keys = storage::reset_keys(id)
                    .with_retry_policy(retry)
                    .send_with_cancel(&client, &cancel)
                    .await
                    .with_context(|| format!("Failed to reset keys of S3 user {}", id))?;
                print_json(&keys.result)
            }
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = setup_logging(args.log_level)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling in-flight request");
            on_interrupt.cancel();
        }
    });

    run(args, cancel).await
}
