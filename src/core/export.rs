// LogExc - core/export.rs
//
// Event sinks: YAML, JSON and CSV serialisation plus the HTML table renderer.
// Core layer: writes to any Write trait object; the app layer chooses the
// destination (stdout or a file next to the source log).

use crate::core::model::{Event, OutputFormat};
use crate::util::error::{ExportError, InputError};
use std::io::{Read, Write};
use std::path::Path;

/// Column headings shared by the CSV and HTML sinks, in schema order.
const COLUMNS: [&str; 4] = ["line_number", "timestamp", "signature", "comment"];

/// Serialise `events` in the chosen format.
pub fn export<W: Write>(
    format: OutputFormat,
    events: &[Event],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    match format {
        OutputFormat::Yaml => export_yaml(events, writer, export_path),
        OutputFormat::Json => export_json(events, writer, export_path),
        OutputFormat::Csv => export_csv(events, writer, export_path),
    }
}

/// Export events as a YAML sequence of four-field mappings.
pub fn export_yaml<W: Write>(
    events: &[Event],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_yaml::to_writer(writer, events).map_err(|e| ExportError::Yaml {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(events.len())
}

/// Read back a YAML event list written by [`export_yaml`] (or by hand).
pub fn import_yaml<R: Read>(reader: R, source_path: &Path) -> Result<Vec<Event>, InputError> {
    serde_yaml::from_reader(reader).map_err(|e| InputError::Malformed {
        path: source_path.to_path_buf(),
        source: e,
    })
}

/// Export events to JSON format (array of objects).
pub fn export_json<W: Write>(
    events: &[Event],
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(&mut writer, events).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    writeln!(writer).map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(events.len())
}

/// Export events to CSV. The header row is always written.
pub fn export_csv<W: Write>(
    events: &[Event],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(COLUMNS).map_err(csv_err)?;

    let mut count = 0;
    for event in events {
        csv_writer
            .write_record([
                event.line_number.to_string().as_str(),
                event.timestamp.as_str(),
                event.signature.as_str(),
                event.comment.as_str(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Render events as a standalone HTML page holding one table.
///
/// Cells are HTML-escaped; an empty comment is an empty cell.
pub fn export_html<W: Write>(
    events: &[Event],
    title: &str,
    mut writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let page = render_html(events, title);
    writer
        .write_all(page.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| ExportError::Io {
            path: export_path.to_path_buf(),
            source: e,
        })?;
    Ok(events.len())
}

fn render_html(events: &[Event], title: &str) -> String {
    let mut html = String::with_capacity(512 + events.len() * 160);
    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("  <meta charset=\"utf-8\">\n");
    html.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
    html.push_str(
        "  <style>\n\
         \x20   body { font-family: sans-serif; margin: 2em; }\n\
         \x20   table { border-collapse: collapse; }\n\
         \x20   th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: left; }\n\
         \x20   th { background: #f0f0f0; }\n\
         \x20 </style>\n",
    );
    html.push_str("</head>\n<body>\n<table>\n<thead>\n  <tr>\n");
    for column in COLUMNS {
        html.push_str(&format!("    <th scope=\"col\">{column}</th>\n"));
    }
    html.push_str("  </tr>\n</thead>\n<tbody>\n");
    for event in events {
        html.push_str("  <tr>\n");
        html.push_str(&format!("    <td>{}</td>\n", event.line_number));
        html.push_str(&format!("    <td>{}</td>\n", escape_html(&event.timestamp)));
        html.push_str(&format!("    <td>{}</td>\n", escape_html(&event.signature)));
        html.push_str(&format!("    <td>{}</td>\n", escape_html(&event.comment)));
        html.push_str("  </tr>\n");
    }
    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
