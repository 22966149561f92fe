use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use platctl::api::HttpCloudControllerClient;
use platctl::config::{Config, PluginRepo};
use platctl::{Actor, Outcome, Warnings};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Command-line actor for platform control-plane APIs
#[derive(Parser, Debug)]
#[command(name = "platctl", version, about, long_about = None)]
struct Args {
    /// API endpoint, e.g. https://api.example.com
    #[arg(long, global = true)]
    api: Option<String>,

    /// Bearer token for API requests
    #[arg(long, global = true)]
    token: Option<String>,

    /// Seconds to wait for asynchronous jobs before giving up
    #[arg(long, global = true)]
    polling_timeout: Option<u64>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the organization with the given name
    Org { name: String },
    /// Delete an organization and everything in it
    DeleteOrg { name: String },
    /// Show the space with the given name
    Space { name: String },
    /// Delete a space and everything in it
    DeleteSpace { name: String },
    /// List all the added plugin repositories
    ListPluginRepos,
    /// Add a new plugin repository
    AddPluginRepo { name: String, url: String },
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

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("platctl started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("platctl").join("platctl.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".platctl").join("platctl.log");
    }
    PathBuf::from("platctl.log")
}

/// Build the actor from config, environment and CLI overrides (CLI > env > file)
fn build_actor(args: &Args, mut config: Config) -> Result<Actor> {
    if let Some(api) = &args.api {
        config.api_endpoint = Some(api.clone());
    }
    if let Some(token) = &args.token {
        config.access_token = Some(token.clone());
    }
    if let Some(timeout) = args.polling_timeout {
        config.polling_timeout_secs = timeout;
    }

    let endpoint = config
        .api_endpoint
        .clone()
        .context("No API endpoint set. Use --api or PLATCTL_API")?;
    let token = config.access_token.clone().unwrap_or_default();

    let client = HttpCloudControllerClient::new(&endpoint, &token)?;
    Ok(Actor::new(Arc::new(client), Arc::new(config)))
}

fn print_warnings(warnings: &Warnings) {
    for warning in warnings {
        eprintln!("{}", warning);
    }
}

/// Print warnings unconditionally, then the result
fn finish<T>(outcome: Outcome<T>, on_success: impl FnOnce(T)) -> ExitCode {
    print_warnings(&outcome.warnings);
    match outcome.result {
        Ok(value) => {
            on_success(value);
            println!("OK");
            ExitCode::SUCCESS
        },
        Err(e) => {
            println!("FAILED");
            eprintln!("{}", e);
            ExitCode::FAILURE
        },
    }
}

fn render_plugin_repos(repos: &[PluginRepo]) -> String {
    let name_width = repos
        .iter()
        .map(|r| r.name.len())
        .chain(std::iter::once("Repo Name".len()))
        .max()
        .unwrap_or_default();

    let mut out = format!("{:<width$}   {}\n", "Repo Name", "Url", width = name_width);
    for repo in repos {
        out.push_str(&format!("{:<width$}   {}\n", repo.name, repo.url, width = name_width));
    }
    out
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = Config::load();

    let code = match &args.command {
        Command::Org { name } => {
            let actor = build_actor(&args, config)?;
            let outcome = actor.get_organization_by_name(name).await;
            finish(outcome, |org| println!("{}  {}", org.name, org.guid))
        },
        Command::DeleteOrg { name } => {
            let actor = build_actor(&args, config)?;
            println!("Deleting org {}...", name);
            finish(actor.delete_organization(name).await, |_| {})
        },
        Command::Space { name } => {
            let actor = build_actor(&args, config)?;
            let outcome = actor.get_space_by_name(name).await;
            finish(outcome, |space| println!("{}  {}", space.name, space.guid))
        },
        Command::DeleteSpace { name } => {
            let actor = build_actor(&args, config)?;
            println!("Deleting space {}...", name);
            finish(actor.delete_space(name).await, |_| {})
        },
        Command::ListPluginRepos => {
            println!("OK\n");
            print!("{}", render_plugin_repos(&config.plugin_repos));
            ExitCode::SUCCESS
        },
        Command::AddPluginRepo { name, url } => {
            // reload without environment overrides so they are not persisted
            let mut config = Config::config_path()
                .map(|path| Config::load_from(&path))
                .unwrap_or_default();
            config.add_plugin_repo(name, url)?;
            config.save()?;
            println!("{} added as '{}'", url, name);
            ExitCode::SUCCESS
        },
    };

    Ok(code)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            println!("FAILED");
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        },
    }
}
