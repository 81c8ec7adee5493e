//! Handle Scout CLI Application
//!
//! A command-line interface for checking whether a username is free across
//! popular platforms. Runs one-shot over the handles given as arguments, or
//! as an interactive prompt when none are given.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use handle_scout_lib::{
    load_env_config, parse_timeout, validate_handle, Catalog, CheckConfig, CheckReport,
    ConfigManager, EnvConfig, FileConfig, HandleChecker, PlatformDescriptor, ScoutError,
};
use std::io::BufRead;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Shown when the interactive prompt gets a handle that fails validation.
const INVALID_INPUT_HINT: &str = "Use 2-30 characters: letters, numbers, underscore, or dot.";

/// CLI arguments for handle-scout
#[derive(Parser, Debug)]
#[command(name = "handle-scout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Best-effort username checks across popular platforms")]
#[command(
    long_about = "Best-effort username checks across popular platforms.\n\nPass one or more handles to check them and exit, or run without arguments for an interactive prompt."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Handles to check (interactive prompt when omitted)
    #[arg(value_name = "HANDLES", help_heading = "Handle Selection")]
    pub handles: Vec<String>,

    /// Use a custom platform catalog (TOML with [[platform]] entries)
    #[arg(long = "catalog", value_name = "FILE", help_heading = "Handle Selection")]
    pub catalog: Option<String>,

    /// List the platforms in the active catalog and exit
    #[arg(long = "list-platforms", help_heading = "Handle Selection")]
    pub list_platforms: bool,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Add the reason column and a summary line
    #[arg(short = 'p', long = "pretty", help_heading = "Output Format")]
    pub pretty: bool,

    /// Do not propose alternate handles
    #[arg(long = "no-suggestions", help_heading = "Output Format")]
    pub no_suggestions: bool,

    /// Per-platform timeout (e.g. "6s", "500ms", "1m")
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Probing")]
    pub timeout: Option<String>,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show debug logs on stderr
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", help_heading = "Configuration")]
    pub verbose: bool,
}

/// Where the platform catalog comes from.
#[derive(Debug, Clone, PartialEq)]
enum CatalogSource {
    Builtin,
    File(String),
    Inline(Vec<PlatformDescriptor>),
}

impl CatalogSource {
    fn load(&self) -> Result<Catalog, ScoutError> {
        match self {
            CatalogSource::Builtin => Catalog::builtin().cloned(),
            CatalogSource::File(path) => Catalog::load_file(path),
            CatalogSource::Inline(platforms) => Catalog::from_descriptors(platforms.clone()),
        }
    }
}

/// Settings resolved from every configuration layer.
#[derive(Debug, Clone)]
struct Settings {
    check: CheckConfig,
    json: bool,
    pretty: bool,
    catalog: CatalogSource,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            check: CheckConfig::default(),
            json: false,
            pretty: false,
            catalog: CatalogSource::Builtin,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args);

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins over `--verbose`/`--debug` when set.
fn init_logging(args: &Args) {
    let default_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main entry once arguments are parsed
async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let env_config = load_env_config();
    let file_config = load_file_config(&args, &env_config)?;
    let settings = build_settings(&args, file_config, env_config)?;

    let catalog = settings.catalog.load()?;
    debug!(platforms = catalog.len(), source = ?settings.catalog, "catalog ready");

    if args.list_platforms {
        ui::print_platforms(&catalog);
        return Ok(());
    }

    let checker = HandleChecker::with_catalog(catalog, settings.check.clone());

    if args.handles.is_empty() {
        run_interactive(&checker, &settings).await
    } else {
        run_one_shot(&checker, &args.handles, &settings).await
    }
}

/// Check every handle given on the command line, then exit.
///
/// All handles are validated before the first probe is sent.
async fn run_one_shot(
    checker: &HandleChecker,
    handles: &[String],
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    for handle in handles {
        validate_handle(handle)?;
    }

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        info!(handle = %handle, "checking handle");
        reports.push(checker.check_handle(handle).await?);
    }

    if settings.json {
        // A single handle keeps the plain report shape
        let json = match reports.as_slice() {
            [report] => report.to_json_pretty()?,
            _ => serde_json::to_string_pretty(&reports)?,
        };
        println!("{}", json);
    } else {
        for report in &reports {
            ui::print_report(report, settings.pretty);
        }
    }

    Ok(())
}

/// Prompt for handles until the user quits or input ends.
async fn run_interactive(
    checker: &HandleChecker,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    ui::print_banner();

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        ui::print_prompt()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => {
                println!();
                break;
            }
        };

        let handle = line.trim();
        if handle.is_empty() {
            continue;
        }
        if is_quit_command(handle) {
            break;
        }
        if validate_handle(handle).is_err() {
            ui::print_hint(INVALID_INPUT_HINT);
            continue;
        }

        match checker.check_handle(handle).await {
            Ok(report) => display_report(&report, settings)?,
            Err(e) => ui::print_error(&e.to_string()),
        }
    }

    println!("Goodbye.");
    Ok(())
}

fn is_quit_command(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "q" | "quit" | "exit")
}

fn display_report(
    report: &CheckReport,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    if settings.json {
        println!("{}", report.to_json_pretty()?);
    } else {
        ui::print_report(report, settings.pretty);
    }
    Ok(())
}

/// Load the config file layer.
///
/// Priority: `--config`, then `HS_CONFIG`, then automatic discovery.
fn load_file_config(
    args: &Args,
    env_config: &EnvConfig,
) -> Result<FileConfig, Box<dyn std::error::Error>> {
    let config_manager = ConfigManager::new();

    if let Some(explicit_config_path) = &args.config {
        info!("Using explicit config file (CLI --config): {}", explicit_config_path);
        let file_config = config_manager
            .load_file(explicit_config_path)
            .map_err(|e| {
                format!(
                    "Failed to load config file '{}': {}",
                    explicit_config_path, e
                )
            })?;
        return Ok(file_config);
    }

    if let Some(env_config_path) = &env_config.config {
        info!("Using explicit config file (HS_CONFIG env var): {}", env_config_path);
        let file_config = config_manager
            .load_file(env_config_path)
            .map_err(|e| format!("Failed to load config file '{}': {}", env_config_path, e))?;
        return Ok(file_config);
    }

    debug!("Discovering config files...");
    Ok(config_manager.discover_and_load()?)
}

/// Build settings with proper precedence.
///
/// Precedence order (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables (HS_*)
/// 3. Config file (explicit or discovered)
/// 4. Built-in defaults
fn build_settings(
    args: &Args,
    file_config: FileConfig,
    env_config: EnvConfig,
) -> Result<Settings, Box<dyn std::error::Error>> {
    let settings = Settings::default();
    let settings = merge_file_config(settings, file_config);
    let settings = apply_environment_config(settings, &env_config);
    apply_cli_args(settings, args)
}

/// Merge FileConfig into Settings
fn merge_file_config(mut settings: Settings, file_config: FileConfig) -> Settings {
    if let Some(defaults) = file_config.defaults {
        if let Some(timeout) = defaults.timeout.as_deref().and_then(parse_timeout) {
            settings.check.timeout = timeout;
        }
        if let Some(json) = defaults.json {
            settings.json = json;
        }
        if let Some(pretty) = defaults.pretty {
            settings.pretty = pretty;
        }
        if let Some(suggestions) = defaults.suggestions {
            settings.check.suggestions = suggestions;
        }
        if let Some(user_agent) = defaults.user_agent {
            settings.check.user_agent = user_agent;
        }
        if let Some(path) = defaults.catalog {
            settings.catalog = CatalogSource::File(path);
        }
    }

    // Inline entries win over a catalog path from another file
    if let Some(platforms) = file_config.platforms {
        settings.catalog = CatalogSource::Inline(platforms);
    }

    settings
}

/// Apply HS_* environment variables to settings.
fn apply_environment_config(mut settings: Settings, env_config: &EnvConfig) -> Settings {
    if let Some(timeout) = env_config.timeout.as_deref().and_then(parse_timeout) {
        settings.check.timeout = timeout;
    }
    if let Some(json) = env_config.json {
        settings.json = json;
    }
    if let Some(pretty) = env_config.pretty {
        settings.pretty = pretty;
    }
    if let Some(suggestions) = env_config.suggestions {
        settings.check.suggestions = suggestions;
    }
    if let Some(user_agent) = &env_config.user_agent {
        settings.check.user_agent = user_agent.clone();
    }
    if let Some(path) = &env_config.catalog {
        settings.catalog = CatalogSource::File(path.clone());
    }

    settings
}

/// Apply CLI arguments to settings (highest precedence).
///
/// Boolean flags only ever switch a behavior on, so an absent flag keeps the
/// value from lower layers.
fn apply_cli_args(
    mut settings: Settings,
    args: &Args,
) -> Result<Settings, Box<dyn std::error::Error>> {
    if let Some(timeout_str) = &args.timeout {
        settings.check.timeout = parse_timeout(timeout_str).ok_or_else(|| {
            format!(
                "Invalid timeout '{}'. Use format like '6s', '500ms', '1m'",
                timeout_str
            )
        })?;
    }
    if args.json {
        settings.json = true;
    }
    if args.pretty {
        settings.pretty = true;
    }
    if args.no_suggestions {
        settings.check.suggestions = false;
    }
    if let Some(path) = &args.catalog {
        settings.catalog = CatalogSource::File(path.clone());
    }

    Ok(settings)
}
