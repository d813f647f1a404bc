// LogExc - platform/config.rs
//
// Config directory resolution and config.toml loading with validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::{ExtractConfig, OutputFormat, SortOrder};
use crate::core::timestamp::DatePattern;
use crate::platform::fs::resolve_encoding;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogExc configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logexc/ or %APPDATA%\LogExc\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[extraction]` section.
    pub extraction: ExtractionSection,
    /// `[output]` section.
    pub output: OutputSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[extraction]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExtractionSection {
    /// Date patterns, primary first.
    pub date_patterns: Option<Vec<String>>,
    /// Characters to skip before the timestamp.
    pub skip_prefix: Option<usize>,
    /// Restart marker literal.
    pub restart_marker: Option<String>,
    /// Comment marker literal.
    pub comment_marker: Option<String>,
    /// "asc" or "desc".
    pub order: Option<String>,
    /// Source encoding label.
    pub encoding: Option<String>,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// "yaml", "json" or "csv".
    pub format: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Extraction defaults; CLI flags are layered on top by the app layer.
    pub extract: ExtractConfig,
    /// Default serialisation.
    pub format: OutputFormat,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

/// Load and validate a config file.
///
/// A missing file yields defaults with no warnings. When `explicit` is false
/// (the platform default location) an unreadable or unparseable file also
/// yields defaults, with a warning; when the user named the file with
/// `--config`, those are errors.
pub fn load_config(
    config_path: &Path,
    explicit: bool,
) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        if explicit {
            return Err(ConfigError::Io {
                path: config_path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        }
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return Ok((AppConfig::default(), warnings));
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) if explicit => {
            return Err(ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            })
        }
        Err(e) => {
            warnings.push(format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return Ok((AppConfig::default(), warnings));
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) if explicit => {
            return Err(ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            })
        }
        Err(e) => {
            warnings.push(format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return Ok((AppConfig::default(), warnings));
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let config = validate(raw, &mut warnings);
    Ok((config, warnings))
}

/// Validate each field, accumulating warnings for every rejected value.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();
    let section = raw.extraction;

    // -- Extraction: date_patterns --
    if let Some(patterns) = section.date_patterns {
        if patterns.is_empty() || patterns.len() > constants::MAX_DATE_PATTERNS {
            warnings.push(format!(
                "[extraction] date_patterns has {} entries; expected 1-{}. Using default (\"{}\").",
                patterns.len(),
                constants::MAX_DATE_PATTERNS,
                constants::DEFAULT_DATE_PATTERN,
            ));
        } else if let Some(err) = patterns.iter().find_map(|p| DatePattern::compile(p).err()) {
            warnings.push(format!(
                "[extraction] date_patterns: {err}. Using default (\"{}\").",
                constants::DEFAULT_DATE_PATTERN,
            ));
        } else {
            config.extract.date_patterns = patterns;
        }
    }

    // -- Extraction: skip_prefix --
    if let Some(skip) = section.skip_prefix {
        if skip <= constants::MAX_SKIP_PREFIX {
            config.extract.skip_prefix = skip;
        } else {
            warnings.push(format!(
                "[extraction] skip_prefix = {skip} is out of range (0-{}). Using default (0).",
                constants::MAX_SKIP_PREFIX,
            ));
        }
    }

    // -- Extraction: markers --
    if let Some(marker) = section.restart_marker {
        if marker.is_empty() {
            warnings.push(
                "[extraction] restart_marker is empty; restart detection is disabled.".to_string(),
            );
        }
        config.extract.restart_marker = marker;
    }
    if let Some(marker) = section.comment_marker {
        if marker.is_empty() {
            warnings.push(
                "[extraction] comment_marker is empty; comment extraction is disabled.".to_string(),
            );
        }
        config.extract.comment_marker = marker;
    }

    // -- Extraction: order --
    if let Some(ref order) = section.order {
        match order.parse::<SortOrder>() {
            Ok(o) => config.extract.order = o,
            Err(reason) => warnings.push(format!(
                "[extraction] order: {reason}. Using default (asc)."
            )),
        }
    }

    // -- Extraction: encoding --
    if let Some(label) = section.encoding {
        match resolve_encoding(&label) {
            Ok(_) => config.extract.encoding = label,
            Err(err) => warnings.push(format!(
                "[extraction] encoding: {err}. Using default ({}).",
                constants::DEFAULT_ENCODING,
            )),
        }
    }

    // -- Output: format --
    if let Some(ref format) = raw.output.format {
        match format.parse::<OutputFormat>() {
            Ok(f) => config.format = f,
            Err(reason) => warnings.push(format!(
                "[output] format: {reason}. Using default (yaml)."
            )),
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(constants::CONFIG_FILE_NAME);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_missing_implicit_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) =
            load_config(&dir.path().join(constants::CONFIG_FILE_NAME), false).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(&dir.path().join("custom.toml"), true);
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_full_config_is_applied() {
        let (_dir, path) = write_config(
            r#"
[extraction]
date_patterns = ["dd.MM.yyyy HH:mm:ss", "yyyy-MM-dd"]
skip_prefix = 1
restart_marker = "BOOT"
comment_marker = "req="
order = "desc"
encoding = "latin1"

[output]
format = "json"

[logging]
level = "debug"
"#,
        );
        let (config, warnings) = load_config(&path, false).unwrap();
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.extract.date_patterns.len(), 2);
        assert_eq!(config.extract.skip_prefix, 1);
        assert_eq!(config.extract.restart_marker, "BOOT");
        assert_eq!(config.extract.comment_marker, "req=");
        assert_eq!(config.extract.order, SortOrder::Desc);
        assert_eq!(config.extract.encoding, "latin1");
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_values_fall_back_with_warnings() {
        let (_dir, path) = write_config(
            r#"
[extraction]
date_patterns = ["yyyy-QQ"]
skip_prefix = 999999
order = "sideways"
encoding = "klingon"

[output]
format = "xml"

[logging]
level = "loud"
"#,
        );
        let (config, warnings) = load_config(&path, false).unwrap();
        assert_eq!(warnings.len(), 6, "warnings: {warnings:?}");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_unparseable_config() {
        let (_dir, path) = write_config("[extraction\nskip_prefix = ");
        let (config, warnings) = load_config(&path, false).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);

        assert!(matches!(
            load_config(&path, true),
            Err(ConfigError::TomlParse { .. })
        ));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (_dir, path) = write_config("[future]\nthing = 1\n[extraction]\nskip_prefix = 2\n");
        let (config, warnings) = load_config(&path, false).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(config.extract.skip_prefix, 2);
    }
}
