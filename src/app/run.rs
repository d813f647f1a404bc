// LogExc - app/run.rs
//
// Run orchestration: validate the configuration, read and decode the source,
// scan it, and hand the event list to the selected sinks.
//
// Every failure here aborts the run; per-line misses never reach this layer.

use crate::core::export;
use crate::core::model::{Event, ExtractConfig, OutputFormat, ScanSummary};
use crate::core::processor;
use crate::core::timestamp;
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::{ExportError, InputError, Result};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Pseudo-path used in error messages for console output.
const CONSOLE: &str = "<stdout>";

/// Everything one `scan` run needs.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Source log file.
    pub source: PathBuf,
    /// Extraction parameters.
    pub extract: ExtractConfig,
    /// Serialisation of the event list.
    pub format: OutputFormat,
    /// Write `<source>.<ext>` instead of the console.
    pub to_file: bool,
    /// Also render `<source>.html`.
    pub html: bool,
}

/// Result of a successful `scan` run.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub events: Vec<Event>,
    pub summary: ScanSummary,
    /// Artifacts written to disk, in creation order.
    pub written: Vec<PathBuf>,
}

/// Scan `options.source` and emit its events.
///
/// `console` receives the serialised events (unless `to_file`) and the
/// "File created" notices.
pub fn run_scan<W: Write>(options: &ScanOptions, mut console: W) -> Result<ScanOutcome> {
    // Configuration problems are reported before touching the source.
    let encoding = fs::resolve_encoding(&options.extract.encoding)?;
    let mut timestamps = timestamp::build_extractor(&options.extract)?;

    tracing::info!(
        path = %options.source.display(),
        patterns = ?options.extract.date_patterns,
        skip = options.extract.skip_prefix,
        encoding = encoding.name(),
        "Scan started"
    );

    let text = fs::read_source(&options.source, encoding)?;
    let result = processor::process_text(&text, &options.extract, timestamps.as_mut());

    tracing::info!(
        path = %options.source.display(),
        lines = result.summary.lines_scanned,
        events = result.events.len(),
        exceptions = result.summary.exceptions,
        restarts = result.summary.restarts,
        "Scan finished"
    );

    let mut written = Vec::new();

    if options.to_file {
        let out = fs::output_path(&options.source, options.format.suffix());
        let mut writer = fs::create_output(&out)?;
        export::export(options.format, &result.events, &mut writer, &out)?;
        finish_output(writer, &out)?;
        announce(&mut console, &out)?;
        written.push(out);
    } else {
        let console_path = Path::new(CONSOLE);
        export::export(options.format, &result.events, &mut console, console_path)?;
        console.flush().map_err(|e| ExportError::Io {
            path: console_path.to_path_buf(),
            source: e,
        })?;
    }

    if options.html {
        let out = fs::output_path(&options.source, constants::HTML_SUFFIX);
        let mut writer = fs::create_output(&out)?;
        export::export_html(&result.events, &display_name(&options.source), &mut writer, &out)?;
        finish_output(writer, &out)?;
        announce(&mut console, &out)?;
        written.push(out);
    }

    Ok(ScanOutcome {
        events: result.events,
        summary: result.summary,
        written,
    })
}

/// Render a persisted YAML event list as `<yaml>.html`. Returns the path
/// written.
pub fn run_table<W: Write>(yaml_path: &Path, mut console: W) -> Result<PathBuf> {
    let file = std::fs::File::open(yaml_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            InputError::NotFound {
                path: yaml_path.to_path_buf(),
            }
        } else {
            InputError::Unreadable {
                path: yaml_path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let events = export::import_yaml(std::io::BufReader::new(file), yaml_path)?;
    tracing::info!(path = %yaml_path.display(), events = events.len(), "Event list loaded");

    let out = fs::output_path(yaml_path, constants::HTML_SUFFIX);
    let mut writer = fs::create_output(&out)?;
    export::export_html(&events, &display_name(yaml_path), &mut writer, &out)?;
    finish_output(writer, &out)?;
    announce(&mut console, &out)?;

    Ok(out)
}

fn finish_output(writer: BufWriter<std::fs::File>, path: &Path) -> Result<()> {
    writer.into_inner().map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e.into_error(),
    })?;
    tracing::info!(path = %path.display(), "File created");
    Ok(())
}

fn announce<W: Write>(console: &mut W, path: &Path) -> Result<()> {
    writeln!(console, "File created: {}", path.display()).map_err(|e| ExportError::Io {
        path: PathBuf::from(CONSOLE),
        source: e,
    })?;
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
