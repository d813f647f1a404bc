// LogExc - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no platform
// dependencies. These types are the shared vocabulary across all layers.

use crate::util::constants;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Event (normalised output of a scan)
// =============================================================================

/// One recorded occurrence: log start, log end, restart, or exception.
///
/// The field set (and field order) is the persisted schema consumed by the
/// YAML/JSON/CSV sinks and by the HTML table renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// 1-based line in the source text where the event was recorded.
    pub line_number: u64,

    /// Most recent raw timestamp text at or before this line; empty if none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub timestamp: String,

    /// Exception type name or one of the sentinel labels. Never empty.
    pub signature: String,

    /// Most recent diagnostic comment at or before this line; empty if none.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comment: String,
}

impl Event {
    pub fn new(
        line_number: u64,
        timestamp: Option<&str>,
        signature: &str,
        comment: Option<&str>,
    ) -> Self {
        debug_assert!(!signature.is_empty(), "event signature must not be empty");
        Self {
            line_number,
            timestamp: timestamp.unwrap_or_default().to_string(),
            signature: signature.to_string(),
            comment: comment.unwrap_or_default().to_string(),
        }
    }

    /// Classify this event by its signature.
    pub fn kind(&self) -> EventKind {
        match self.signature.as_str() {
            constants::START_OF_LOG => EventKind::Start,
            constants::END_OF_LOG => EventKind::End,
            constants::RESTART_LABEL => EventKind::Restart,
            _ => EventKind::Exception,
        }
    }
}

/// Persisted files written by hand (or by older tools) may carry `null` or
/// omit the optional columns entirely; both read back as empty text.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// EventKind
// =============================================================================

/// Classification of an event. Derived from the signature, not serialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Start,
    End,
    Restart,
    Exception,
}

impl EventKind {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Start => "Start",
            EventKind::End => "End",
            EventKind::Restart => "Restart",
            EventKind::Exception => "Exception",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Sort order
// =============================================================================

/// Final ordering of the event list, always by line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(format!("expected \"asc\" or \"desc\", got \"{other}\"")),
        }
    }
}

// =============================================================================
// Output format
// =============================================================================

/// Serialisation used for the event list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
    Csv,
}

impl OutputFormat {
    /// Suffix appended to the source file name when writing to disk.
    pub fn suffix(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => constants::YAML_SUFFIX,
            OutputFormat::Json => constants::JSON_SUFFIX,
            OutputFormat::Csv => constants::CSV_SUFFIX,
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!(
                "expected \"yaml\", \"json\" or \"csv\", got \"{other}\""
            )),
        }
    }
}

// =============================================================================
// Extraction configuration
// =============================================================================

/// Immutable parameters of one extraction run.
///
/// Built once by the app layer from CLI flags over `config.toml`, then only
/// read during the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Date patterns in `yyyy-MM-dd HH:mm:ss,SSS` letter syntax. The first is
    /// primary; the rest are tried in order when it does not match.
    pub date_patterns: Vec<String>,

    /// Characters to skip at the start of each line before the timestamp.
    pub skip_prefix: usize,

    /// Literal whose presence on a timestamped line marks a process restart.
    pub restart_marker: String,

    /// Literal that introduces a diagnostic comment value.
    pub comment_marker: String,

    /// Final ordering of the event list.
    pub order: SortOrder,

    /// WHATWG label of the source text encoding.
    pub encoding: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            date_patterns: vec![constants::DEFAULT_DATE_PATTERN.to_string()],
            skip_prefix: 0,
            restart_marker: constants::DEFAULT_RESTART_MARKER.to_string(),
            comment_marker: constants::DEFAULT_COMMENT_MARKER.to_string(),
            order: SortOrder::Asc,
            encoding: constants::DEFAULT_ENCODING.to_string(),
        }
    }
}

// =============================================================================
// Scan summary
// =============================================================================

/// Statistics for a completed scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Lines read from the source text.
    pub lines_scanned: u64,

    /// Lines on which a timestamp was parsed.
    pub timestamped_lines: u64,

    /// Restart events emitted.
    pub restarts: usize,

    /// Exception events emitted.
    pub exceptions: usize,

    /// Earliest parsed instant seen (by value, for display only).
    pub earliest: Option<NaiveDateTime>,

    /// Latest parsed instant seen (by value, for display only).
    pub latest: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_from_signature() {
        assert_eq!(
            Event::new(1, Some("t"), constants::START_OF_LOG, None).kind(),
            EventKind::Start
        );
        assert_eq!(
            Event::new(9, Some("t"), constants::END_OF_LOG, None).kind(),
            EventKind::End
        );
        assert_eq!(
            Event::new(3, Some("t"), constants::RESTART_LABEL, None).kind(),
            EventKind::Restart
        );
        assert_eq!(
            Event::new(4, None, "java.io.IOException", Some("/api")).kind(),
            EventKind::Exception
        );
    }

    #[test]
    fn test_event_new_maps_none_to_empty() {
        let e = Event::new(2, None, "a.BError", None);
        assert_eq!(e.timestamp, "");
        assert_eq!(e.comment, "");
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert_eq!("DESC".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert!("sideways".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_output_format_parse_and_suffix() {
        assert_eq!("yml".parse::<OutputFormat>(), Ok(OutputFormat::Yaml));
        assert_eq!("json".parse::<OutputFormat>().unwrap().suffix(), "json");
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_event_deserialises_null_and_missing_comment() {
        let yaml = "- line_number: 3\n  timestamp: null\n  signature: a.b.CError\n";
        let events: Vec<Event> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp, "");
        assert_eq!(events[0].comment, "");
    }
}
