// LogExc - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogExc";

/// Application identifier used for the config directory.
pub const APP_ID: &str = "LogExc";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the optional configuration file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default tracing filter when neither RUST_LOG, --debug nor config set one.
/// Kept at `warn` so a console run prints nothing but the event stream.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

// =============================================================================
// Extraction defaults
// =============================================================================

/// Date pattern used when none is configured (log4j default layout).
pub const DEFAULT_DATE_PATTERN: &str = "yyyy-MM-dd HH:mm:ss,SSS";

/// Restart marker used when none is configured (Tomcat startup banner).
pub const DEFAULT_RESTART_MARKER: &str = "Server startup in";

/// Diagnostic tag written by the monitored application's request filter.
pub const DEFAULT_COMMENT_MARKER: &str = "[memoryInfo] uri=";

/// Character that terminates a comment value after the marker.
pub const COMMENT_DELIMITER: char = ',';

/// Encoding label used when none is configured.
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Upper bound on the prefix skip (characters before the timestamp).
pub const MAX_SKIP_PREFIX: usize = 4096;

/// Upper bound on the number of fallback date patterns.
pub const MAX_DATE_PATTERNS: usize = 16;

/// Year assumed when a date pattern has no year field.
pub const DEFAULT_PATTERN_YEAR: i32 = 1970;

// =============================================================================
// Sentinel signatures
// =============================================================================

/// Signature of the synthetic event on the first timestamped line.
pub const START_OF_LOG: &str = "START OF LOG";

/// Signature of the synthetic event closing the scan.
pub const END_OF_LOG: &str = "END OF LOG";

/// Signature of a restart event.
pub const RESTART_LABEL: &str = "RESTART";

// =============================================================================
// Output
// =============================================================================

/// Suffix appended to the source file name for the YAML artifact.
pub const YAML_SUFFIX: &str = "yml";

/// Suffix appended to the source file name for the JSON artifact.
pub const JSON_SUFFIX: &str = "json";

/// Suffix appended to the source file name for the CSV artifact.
pub const CSV_SUFFIX: &str = "csv";

/// Suffix appended for the rendered HTML table.
pub const HTML_SUFFIX: &str = "html";

/// Process exit codes.
pub const EXIT_INPUT_ERROR: i32 = 1;
pub const EXIT_OUTPUT_ERROR: i32 = 2;
pub const EXIT_CONFIG_ERROR: i32 = 3;
