// LogExc - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Per-line extraction misses are not errors and never appear here; only
// conditions that abort a run do.

use crate::util::constants;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogExc operations.
/// Errors are categorised by the stage of the run that produced them.
#[derive(Debug)]
pub enum LogExcError {
    /// The source log could not be located, read or decoded.
    Input(InputError),

    /// An output artifact could not be created or written.
    Export(ExportError),

    /// The extraction configuration is invalid.
    Config(ConfigError),
}

impl LogExcError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Input(_) => constants::EXIT_INPUT_ERROR,
            Self::Export(_) => constants::EXIT_OUTPUT_ERROR,
            Self::Config(_) => constants::EXIT_CONFIG_ERROR,
        }
    }
}

impl fmt::Display for LogExcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(e) => write!(f, "Input error: {e}"),
            Self::Export(e) => write!(f, "Output error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for LogExcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

/// Errors reading the source log. All of them abort the run before the scan.
#[derive(Debug)]
pub enum InputError {
    /// The source path does not exist.
    NotFound { path: PathBuf },

    /// The source exists but could not be read (permissions, is a directory...).
    Unreadable { path: PathBuf, source: io::Error },

    /// The bytes are malformed under the configured encoding.
    Undecodable { path: PathBuf, encoding: String },

    /// A saved event list is not valid YAML or not a list of events.
    Malformed {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "File not found: '{}'", path.display())
            }
            Self::Unreadable { path, source } => {
                write!(f, "Cannot read '{}': {source}", path.display())
            }
            Self::Undecodable { path, encoding } => write!(
                f,
                "Cannot decode '{}' as {encoding}. Pass --encoding with the log's charset.",
                path.display()
            ),
            Self::Malformed { path, source } => {
                write!(f, "Malformed event list '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unreadable { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<InputError> for LogExcError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors writing an event sink.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error creating or writing the destination.
    Io { path: PathBuf, source: io::Error },

    /// YAML serialisation error.
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Cannot write '{}': {source}", path.display())
            }
            Self::Yaml { path, source } => {
                write!(f, "YAML error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Yaml { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for LogExcError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors building the extraction configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A date pattern uses an unsupported field or is empty.
    InvalidDatePattern { pattern: String, reason: String },

    /// The encoding label is not a known WHATWG label.
    UnknownEncoding { label: String },

    /// A value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading an explicitly requested config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDatePattern { pattern, reason } => {
                write!(f, "Invalid date pattern '{pattern}': {reason}")
            }
            Self::UnknownEncoding { label } => {
                write!(f, "Unknown encoding '{label}'")
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "'{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LogExcError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for LogExc results.
pub type Result<T> = std::result::Result<T, LogExcError>;
