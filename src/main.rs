// LogExc - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading
// 3. Logging initialisation (debug mode support)
// 4. Dispatch to the scan or table run and exit status mapping

use clap::{Parser, Subcommand};
use logexc::app::run::{self, ScanOptions};
use logexc::core::model::{OutputFormat, SortOrder};
use logexc::platform::config::{self, PlatformPaths};
use logexc::util::{self, constants};
use std::path::PathBuf;

/// LogExc - find exceptions, restarts and time span in application logs.
#[derive(Parser, Debug)]
#[command(name = "logexc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Config file to use instead of the platform default.
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a log file and print or save the event list.
    Scan(ScanArgs),

    /// Render a saved YAML event list as an HTML table (<file>.html).
    Table {
        /// YAML file written by `scan --file`.
        yaml_file: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct ScanArgs {
    /// Log file.
    log_file: PathBuf,

    /// Timestamp pattern, e.g. "yyyy-MM-dd HH:mm:ss,SSS". Repeat to add
    /// fallback patterns tried in order.
    #[arg(short = 't', long = "timestamp")]
    timestamp: Vec<String>,

    /// Characters to skip before the timestamp.
    #[arg(short = 's', long = "skip")]
    skip: Option<usize>,

    /// Literal marking a process restart.
    #[arg(short = 'r', long = "restart-marker")]
    restart_marker: Option<String>,

    /// Literal introducing a diagnostic comment.
    #[arg(short = 'c', long = "comment-marker")]
    comment_marker: Option<String>,

    /// Event order by line number: asc or desc.
    #[arg(short = 'o', long = "order")]
    order: Option<SortOrder>,

    /// Source encoding label (utf-8, latin1, utf-16le, ...).
    #[arg(short = 'e', long = "encoding")]
    encoding: Option<String>,

    /// Output format: yaml, json or csv.
    #[arg(short = 'F', long = "format")]
    format: Option<OutputFormat>,

    /// Write <log_file>.<ext> instead of printing.
    #[arg(short = 'f', long = "file")]
    file: bool,

    /// Also render <log_file>.html.
    #[arg(long = "html")]
    html: bool,
}

fn main() {
    let cli = Cli::parse();

    // Config is loaded before logging so its level can take part in the
    // filter; warnings are replayed once tracing is up.
    let (config_path, explicit) = match cli.config {
        Some(ref path) => (path.clone(), true),
        None => (PlatformPaths::resolve().config_file(), false),
    };
    let (app_config, warnings) = match config::load_config(&config_path, explicit) {
        Ok(loaded) => loaded,
        Err(e) => {
            util::logging::init(cli.debug, None);
            tracing::error!(error = %e, "Failed to load config");
            eprintln!("Error: Configuration error: {e}");
            std::process::exit(constants::EXIT_CONFIG_ERROR);
        }
    };

    util::logging::init(cli.debug, app_config.log_level.as_deref());
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "LogExc starting"
    );

    let stdout = std::io::stdout();
    let result = match cli.command {
        Command::Scan(args) => {
            let mut extract = app_config.extract;
            if !args.timestamp.is_empty() {
                extract.date_patterns = args.timestamp;
            }
            if let Some(skip) = args.skip {
                extract.skip_prefix = skip;
            }
            if let Some(marker) = args.restart_marker {
                extract.restart_marker = marker;
            }
            if let Some(marker) = args.comment_marker {
                extract.comment_marker = marker;
            }
            if let Some(order) = args.order {
                extract.order = order;
            }
            if let Some(encoding) = args.encoding {
                extract.encoding = encoding;
            }

            let options = ScanOptions {
                source: args.log_file,
                extract,
                format: args.format.unwrap_or(app_config.format),
                to_file: args.file,
                html: args.html,
            };
            run::run_scan(&options, stdout.lock()).map(|_| ())
        }
        Command::Table { yaml_file } => run::run_table(&yaml_file, stdout.lock()).map(|_| ()),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Run failed");
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
