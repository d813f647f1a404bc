// LogExc - core/timestamp.rs
//
// Fixed-window timestamp extraction from the start of a log line.
//
// Date patterns use the letter syntax common to Java-family logging
// frameworks (`yyyy-MM-dd HH:mm:ss,SSS`) because that is what log4j/logback
// layouts are configured with; they are compiled once into a chrono format
// string plus the width in characters the rendered timestamp occupies.
//
// A line whose window does not parse simply has no timestamp. Nothing in this
// module returns an error for per-line input.

use crate::core::model::ExtractConfig;
use crate::util::constants;
use crate::util::error::ConfigError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

// =============================================================================
// Extraction capability
// =============================================================================

/// A strategy for locating and parsing the leading timestamp of a line.
///
/// The log processor only talks to this trait, so alternative strategies can
/// be dropped in without touching the state machine.
pub trait TimestampExtractor {
    /// Replace (single-pattern) or extend (multi-pattern) the date pattern.
    fn configure(&mut self, pattern: &str) -> Result<(), ConfigError>;

    /// Return the raw timestamp text at the start of `line`, or `None` when
    /// the line carries no parseable timestamp. On success the parsed instant
    /// is retained for [`last_timestamp`](Self::last_timestamp).
    fn extract<'l>(&mut self, line: &'l str) -> Option<&'l str>;

    /// Parse previously extracted text back into an instant.
    ///
    /// Returns `NaiveDateTime::MIN` when the text does not parse. The sentinel
    /// is only good for display; never order events by it.
    fn parse(&self, text: &str) -> NaiveDateTime;

    /// Instant parsed by the most recent successful `extract`.
    fn last_timestamp(&self) -> Option<NaiveDateTime>;
}

/// Build the extractor for a run: single pattern when one is configured,
/// ordered fallback otherwise.
pub fn build_extractor(config: &ExtractConfig) -> Result<Box<dyn TimestampExtractor>, ConfigError> {
    if config.date_patterns.is_empty() || config.date_patterns.len() > constants::MAX_DATE_PATTERNS
    {
        return Err(ConfigError::ValueOutOfRange {
            field: "date_patterns".to_string(),
            value: config.date_patterns.len().to_string(),
            expected: format!("1-{} patterns", constants::MAX_DATE_PATTERNS),
        });
    }
    if config.skip_prefix > constants::MAX_SKIP_PREFIX {
        return Err(ConfigError::ValueOutOfRange {
            field: "skip_prefix".to_string(),
            value: config.skip_prefix.to_string(),
            expected: format!("0-{}", constants::MAX_SKIP_PREFIX),
        });
    }

    if let [only] = config.date_patterns.as_slice() {
        Ok(Box::new(PatternTimestampExtractor::new(
            only,
            config.skip_prefix,
        )?))
    } else {
        Ok(Box::new(FallbackTimestampExtractor::new(
            &config.date_patterns,
            config.skip_prefix,
        )?))
    }
}

// =============================================================================
// Date pattern compilation
// =============================================================================

/// A compiled date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    format: String,
    width: usize,
    has_year: bool,
    has_date: bool,
    has_time: bool,
    has_twelve_hour: bool,
    has_meridiem: bool,
}

impl DatePattern {
    /// Compile a letter-syntax pattern.
    ///
    /// Fields must be fixed-width: the window cut from each line is exactly
    /// `width()` characters, so `M` or `MMMM` (variable width) are rejected.
    pub fn compile(pattern: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidDatePattern {
            pattern: pattern.to_string(),
            reason,
        };

        if pattern.is_empty() {
            return Err(invalid("pattern is empty".to_string()));
        }

        let mut compiled = DatePattern {
            source: pattern.to_string(),
            format: String::with_capacity(pattern.len() * 2),
            width: 0,
            has_year: false,
            has_date: false,
            has_time: false,
            has_twelve_hour: false,
            has_meridiem: false,
        };

        let chars: Vec<char> = pattern.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];

            if c == '\'' {
                // '' is a literal quote, anywhere.
                if chars.get(i + 1) == Some(&'\'') {
                    compiled.push_literal('\'');
                    i += 2;
                    continue;
                }
                let mut j = i + 1;
                let mut closed = false;
                while j < chars.len() {
                    if chars[j] == '\'' {
                        if chars.get(j + 1) == Some(&'\'') {
                            compiled.push_literal('\'');
                            j += 2;
                            continue;
                        }
                        closed = true;
                        break;
                    }
                    compiled.push_literal(chars[j]);
                    j += 1;
                }
                if !closed {
                    return Err(invalid("unterminated quoted literal".to_string()));
                }
                i = j + 1;
                continue;
            }

            if c.is_ascii_alphabetic() {
                let mut run = 1;
                while chars.get(i + run) == Some(&c) {
                    run += 1;
                }
                compiled.push_field(c, run).map_err(invalid)?;
                i += run;
                continue;
            }

            compiled.push_literal(c);
            i += 1;
        }

        if !compiled.has_date && !compiled.has_time {
            return Err(invalid("pattern has no date or time fields".to_string()));
        }

        tracing::debug!(
            pattern = %compiled.source,
            format = %compiled.format,
            width = compiled.width,
            "Date pattern compiled"
        );

        Ok(compiled)
    }

    fn push_literal(&mut self, c: char) {
        if c == '%' {
            self.format.push_str("%%");
        } else {
            self.format.push(c);
        }
        self.width += 1;
    }

    fn push_field(&mut self, letter: char, run: usize) -> Result<(), String> {
        let (directive, width) = match (letter, run) {
            ('y', 4) => ("%Y", 4),
            ('y', 2) => ("%y", 2),
            ('M', 2) => ("%m", 2),
            ('M', 3) => ("%b", 3),
            ('d', 2) => ("%d", 2),
            ('E', 3) => ("%a", 3),
            ('H', 2) => ("%H", 2),
            ('h', 2) => ("%I", 2),
            ('m', 2) => ("%M", 2),
            ('s', 2) => ("%S", 2),
            ('S', 3) => ("%3f", 3),
            ('S', 6) => ("%6f", 6),
            ('S', 9) => ("%9f", 9),
            ('a', 1) => ("%p", 2),
            ('Z', 1) => ("%z", 5),
            ('X', 3) => ("%:z", 6),
            ('y' | 'M' | 'd' | 'E' | 'H' | 'h' | 'm' | 's' | 'S' | 'a' | 'Z' | 'X', n) => {
                return Err(format!(
                    "field '{}' is not fixed-width; use a supported repetition",
                    letter.to_string().repeat(n)
                ));
            }
            (other, _) => return Err(format!("unsupported pattern letter '{other}'")),
        };

        match letter {
            'y' => {
                self.has_year = true;
                self.has_date = true;
            }
            'M' | 'd' | 'E' => self.has_date = true,
            'h' => {
                self.has_twelve_hour = true;
                self.has_time = true;
            }
            'a' => {
                self.has_meridiem = true;
                self.has_time = true;
            }
            'H' | 'm' | 's' | 'S' => self.has_time = true,
            _ => {}
        }

        self.format.push_str(directive);
        self.width += width;
        Ok(())
    }

    /// The pattern as configured.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The equivalent chrono format string.
    pub fn chrono_format(&self) -> &str {
        &self.format
    }

    /// Characters a timestamp in this pattern occupies.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Parse `text` with this pattern.
    ///
    /// Missing components default the way Java-family formatters do: no time
    /// means midnight, no date means 1970-01-01, no year means 1970, and a
    /// 12-hour field without an AM/PM marker reads as AM.
    pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        if self.has_twelve_hour && !self.has_meridiem {
            // chrono needs %p to resolve %I.
            let text = format!("{text} AM");
            let format = format!("{} %p", self.format);
            return self.parse_with(&text, &format);
        }
        self.parse_with(text, &self.format)
    }

    fn parse_with(&self, text: &str, format: &str) -> Option<NaiveDateTime> {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ndt);
        }

        if !self.has_time {
            if let Ok(nd) = NaiveDate::parse_from_str(text, format) {
                return nd.and_hms_opt(0, 0, 0);
            }
        }

        if !self.has_date {
            if let Ok(nt) = NaiveTime::parse_from_str(text, format) {
                return NaiveDate::from_ymd_opt(constants::DEFAULT_PATTERN_YEAR, 1, 1)
                    .map(|d| d.and_time(nt));
            }
            return None;
        }

        if !self.has_year {
            let with_year = format!("{} {text}", constants::DEFAULT_PATTERN_YEAR);
            let year_format = format!("%Y {format}");
            if let Ok(ndt) = NaiveDateTime::parse_from_str(&with_year, &year_format) {
                return Some(ndt);
            }
            if !self.has_time {
                if let Ok(nd) = NaiveDate::parse_from_str(&with_year, &year_format) {
                    return nd.and_hms_opt(0, 0, 0);
                }
            }
        }

        None
    }
}

/// Cut `width` characters starting at character `skip`. `None` when the line
/// is too short.
fn window(line: &str, skip: usize, width: usize) -> Option<&str> {
    let last = width.checked_sub(1)?;
    let mut bounds = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()));
    let start = bounds.nth(skip)?;
    let end = bounds.nth(last)?;
    Some(&line[start..end])
}

// =============================================================================
// Single-pattern extractor
// =============================================================================

/// The default strategy: one pattern, one fixed window.
#[derive(Debug, Clone)]
pub struct PatternTimestampExtractor {
    pattern: DatePattern,
    skip_prefix: usize,
    last: Option<NaiveDateTime>,
}

impl PatternTimestampExtractor {
    pub fn new(pattern: &str, skip_prefix: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            pattern: DatePattern::compile(pattern)?,
            skip_prefix,
            last: None,
        })
    }

    pub fn pattern(&self) -> &DatePattern {
        &self.pattern
    }

    fn try_parse(&self, text: &str) -> Option<NaiveDateTime> {
        self.pattern.parse(text)
    }
}

impl Default for PatternTimestampExtractor {
    fn default() -> Self {
        Self {
            pattern: DatePattern::compile(constants::DEFAULT_DATE_PATTERN)
                .expect("default date pattern compiles"),
            skip_prefix: 0,
            last: None,
        }
    }
}

impl TimestampExtractor for PatternTimestampExtractor {
    fn configure(&mut self, pattern: &str) -> Result<(), ConfigError> {
        self.pattern = DatePattern::compile(pattern)?;
        Ok(())
    }

    fn extract<'l>(&mut self, line: &'l str) -> Option<&'l str> {
        let text = window(line, self.skip_prefix, self.pattern.width())?;
        let parsed = self.try_parse(text)?;
        self.last = Some(parsed);
        Some(text)
    }

    fn parse(&self, text: &str) -> NaiveDateTime {
        self.try_parse(text).unwrap_or(NaiveDateTime::MIN)
    }

    fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.last
    }
}

// =============================================================================
// Multi-pattern fallback extractor
// =============================================================================

/// Tries each pattern in order; the first that parses wins.
///
/// Useful when an application changed its layout between releases, e.g.
/// `yyyy-MM-dd HH:mm:ss,SSS` falling back to `yyyy-MM-dd HH:mm:ss`.
#[derive(Debug, Clone)]
pub struct FallbackTimestampExtractor {
    candidates: Vec<PatternTimestampExtractor>,
    skip_prefix: usize,
    last: Option<NaiveDateTime>,
}

impl FallbackTimestampExtractor {
    pub fn new<S: AsRef<str>>(patterns: &[S], skip_prefix: usize) -> Result<Self, ConfigError> {
        let candidates = patterns
            .iter()
            .map(|p| PatternTimestampExtractor::new(p.as_ref(), skip_prefix))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            candidates,
            skip_prefix,
            last: None,
        })
    }
}

impl TimestampExtractor for FallbackTimestampExtractor {
    /// Appends `pattern` as the lowest-priority fallback.
    fn configure(&mut self, pattern: &str) -> Result<(), ConfigError> {
        self.candidates
            .push(PatternTimestampExtractor::new(pattern, self.skip_prefix)?);
        Ok(())
    }

    fn extract<'l>(&mut self, line: &'l str) -> Option<&'l str> {
        for candidate in &mut self.candidates {
            if let Some(text) = candidate.extract(line) {
                self.last = candidate.last_timestamp();
                return Some(text);
            }
        }
        None
    }

    fn parse(&self, text: &str) -> NaiveDateTime {
        self.candidates
            .iter()
            .find_map(|c| c.try_parse(text))
            .unwrap_or(NaiveDateTime::MIN)
    }

    fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(ndt: NaiveDateTime) -> String {
        ndt.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    }

    // -------------------------------------------------------------------------
    // Pattern compilation
    // -------------------------------------------------------------------------

    #[test]
    fn test_compile_default_pattern() {
        let p = DatePattern::compile("yyyy-MM-dd HH:mm:ss,SSS").unwrap();
        assert_eq!(p.chrono_format(), "%Y-%m-%d %H:%M:%S,%3f");
        assert_eq!(p.width(), 23);
    }

    #[test]
    fn test_compile_quoted_literal_and_escaped_quote() {
        let p = DatePattern::compile("yyyy-MM-dd'T'HH:mm:ss").unwrap();
        assert_eq!(p.chrono_format(), "%Y-%m-%dT%H:%M:%S");
        assert_eq!(p.width(), 19);

        let p = DatePattern::compile("''yy''").unwrap();
        assert_eq!(p.chrono_format(), "'%y'");
        assert_eq!(p.width(), 4);
    }

    #[test]
    fn test_compile_percent_is_escaped() {
        let p = DatePattern::compile("%yyyy").unwrap();
        assert_eq!(p.chrono_format(), "%%%Y");
        assert_eq!(p.width(), 5);
    }

    #[test]
    fn test_compile_rejects_unknown_and_variable_width() {
        assert!(matches!(
            DatePattern::compile("yyyy-QQ"),
            Err(ConfigError::InvalidDatePattern { .. })
        ));
        assert!(DatePattern::compile("MMMM dd").is_err());
        assert!(DatePattern::compile("d/M/yyyy").is_err());
        assert!(DatePattern::compile("'unterminated").is_err());
        assert!(DatePattern::compile("").is_err());
        assert!(DatePattern::compile("---").is_err());
    }

    // -------------------------------------------------------------------------
    // Parsing
    // -------------------------------------------------------------------------

    #[test]
    fn test_parse_full_datetime() {
        let p = DatePattern::compile("yyyy-MM-dd HH:mm:ss,SSS").unwrap();
        let ts = p.parse("2024-01-15 14:30:22,123").unwrap();
        assert_eq!(fmt(ts), "2024-01-15 14:30:22.123");
    }

    #[test]
    fn test_parse_date_only_is_midnight() {
        let p = DatePattern::compile("yyyy-MM-dd").unwrap();
        assert_eq!(fmt(p.parse("2024-01-15").unwrap()), "2024-01-15 00:00:00.000");
    }

    #[test]
    fn test_parse_time_only_lands_on_default_date() {
        let p = DatePattern::compile("HH:mm:ss").unwrap();
        assert_eq!(fmt(p.parse("14:30:22").unwrap()), "1970-01-01 14:30:22.000");
    }

    #[test]
    fn test_parse_yearless_syslog_style() {
        let p = DatePattern::compile("MMM dd HH:mm:ss").unwrap();
        assert_eq!(p.width(), 15);
        assert_eq!(
            fmt(p.parse("Jan 15 14:30:22").unwrap()),
            "1970-01-15 14:30:22.000"
        );
    }

    #[test]
    fn test_parse_twelve_hour_clock() {
        let p = DatePattern::compile("yyyy-MM-dd hh:mm:ss a").unwrap();
        assert_eq!(
            fmt(p.parse("2024-01-15 02:30:22 PM").unwrap()),
            "2024-01-15 14:30:22.000"
        );
    }

    #[test]
    fn test_parse_twelve_hour_clock_without_marker_is_am() {
        let p = DatePattern::compile("yyyy-MM-dd hh:mm:ss").unwrap();
        assert_eq!(p.width(), 19);
        assert_eq!(
            fmt(p.parse("2024-01-15 02:30:22").unwrap()),
            "2024-01-15 02:30:22.000"
        );
        assert_eq!(
            fmt(p.parse("2024-01-15 12:05:00").unwrap()),
            "2024-01-15 00:05:00.000"
        );
        assert!(p.parse("2024-01-15 13:05:00").is_none());

        let mut tse = PatternTimestampExtractor::new("hh:mm:ss", 0).unwrap();
        assert_eq!(tse.extract("09:15:00 started"), Some("09:15:00"));
        assert_eq!(
            fmt(tse.last_timestamp().unwrap()),
            "1970-01-01 09:15:00.000"
        );
    }

    #[test]
    fn test_parse_numeric_offset() {
        let p = DatePattern::compile("yyyy-MM-dd HH:mm:ss Z").unwrap();
        assert_eq!(p.chrono_format(), "%Y-%m-%d %H:%M:%S %z");
        assert_eq!(p.width(), 25);
        assert_eq!(
            fmt(p.parse("2024-01-15 14:30:22 +0100").unwrap()),
            "2024-01-15 14:30:22.000"
        );
    }

    #[test]
    fn test_parse_colon_offset() {
        let p = DatePattern::compile("yyyy-MM-dd'T'HH:mm:ssXXX").unwrap();
        assert_eq!(p.chrono_format(), "%Y-%m-%dT%H:%M:%S%:z");
        assert_eq!(p.width(), 25);
        assert_eq!(
            fmt(p.parse("2024-01-15T14:30:22+01:00").unwrap()),
            "2024-01-15 14:30:22.000"
        );
    }

    #[test]
    fn test_parse_weekday_name() {
        let p = DatePattern::compile("EEE, dd MMM yyyy HH:mm:ss").unwrap();
        assert_eq!(p.chrono_format(), "%a, %d %b %Y %H:%M:%S");
        assert_eq!(p.width(), 25);
        assert_eq!(
            fmt(p.parse("Mon, 15 Jan 2024 14:30:22").unwrap()),
            "2024-01-15 14:30:22.000"
        );
    }

    #[test]
    fn test_parse_two_digit_year() {
        let p = DatePattern::compile("yy-MM-dd").unwrap();
        assert_eq!(p.chrono_format(), "%y-%m-%d");
        assert_eq!(p.width(), 8);
        assert_eq!(fmt(p.parse("24-01-15").unwrap()), "2024-01-15 00:00:00.000");
    }

    #[test]
    fn test_parse_accepts_space_padded_hour() {
        let p = DatePattern::compile("yyyy-MM-dd HH:mm:ss,SSS").unwrap();
        assert_eq!(
            fmt(p.parse("2024-01-15  2:30:22,123").unwrap()),
            "2024-01-15 02:30:22.123"
        );
    }

    #[test]
    fn test_parse_rejects_wrong_separators() {
        let p = DatePattern::compile("yyyy-MM-dd HH:mm:ss,SSS").unwrap();
        assert!(p.parse("2024/01/15 14:30:22,123").is_none());
        assert!(p.parse("2024-01-15 14:30:22.123").is_none());
        assert!(p.parse("not a timestamp at all!").is_none());
    }

    // -------------------------------------------------------------------------
    // Window
    // -------------------------------------------------------------------------

    #[test]
    fn test_window_exact_and_short_lines() {
        assert_eq!(window("abcdef", 0, 6), Some("abcdef"));
        assert_eq!(window("abcdef", 2, 3), Some("cde"));
        assert_eq!(window("abcdef", 2, 5), None);
        assert_eq!(window("", 0, 1), None);
        assert_eq!(window("abc", 0, 0), None);
    }

    #[test]
    fn test_window_counts_characters_not_bytes() {
        assert_eq!(window("ééé2024", 3, 4), Some("2024"));
    }

    // -------------------------------------------------------------------------
    // Extractors
    // -------------------------------------------------------------------------

    #[test]
    fn test_extract_returns_raw_window_and_retains_instant() {
        let mut tse = PatternTimestampExtractor::default();
        let line = "2024-01-01 10:00:00,000 Starting up";
        assert_eq!(tse.extract(line), Some("2024-01-01 10:00:00,000"));
        assert_eq!(
            fmt(tse.last_timestamp().unwrap()),
            "2024-01-01 10:00:00.000"
        );
    }

    #[test]
    fn test_extract_miss_keeps_previous_instant() {
        let mut tse = PatternTimestampExtractor::default();
        tse.extract("2024-01-01 10:00:00,000 ok");
        assert_eq!(tse.extract(""), None);
        assert_eq!(tse.extract("\tat com.acme.Foo.bar(Foo.java:10)"), None);
        assert!(tse.last_timestamp().is_some());
    }

    #[test]
    fn test_extract_with_skip_prefix() {
        let mut tse = PatternTimestampExtractor::new("yyyy-MM-dd HH:mm:ss", 1).unwrap();
        assert_eq!(
            tse.extract("[2024-01-01 10:00:00] INFO x"),
            Some("2024-01-01 10:00:00")
        );
        assert_eq!(tse.extract("INFO 2024-01-01 10:00:00 x"), None);
    }

    #[test]
    fn test_parse_sentinel_on_failure() {
        let tse = PatternTimestampExtractor::default();
        assert_eq!(tse.parse("garbage"), NaiveDateTime::MIN);
        assert_eq!(tse.parse(""), NaiveDateTime::MIN);
        assert_ne!(tse.parse("2024-01-01 10:00:00,000"), NaiveDateTime::MIN);
    }

    #[test]
    fn test_configure_replaces_pattern() {
        let mut tse = PatternTimestampExtractor::default();
        tse.configure("dd.MM.yyyy").unwrap();
        assert_eq!(tse.extract("26.02.2026 rest"), Some("26.02.2026"));
        assert!(tse.configure("QQQ").is_err());
    }

    #[test]
    fn test_fallback_tries_patterns_in_order() {
        let mut tse = FallbackTimestampExtractor::new(
            &["yyyy-MM-dd HH:mm:ss,SSS", "yyyy-MM-dd HH:mm:ss"],
            0,
        )
        .unwrap();
        assert_eq!(
            tse.extract("2024-01-01 10:00:00,500 a"),
            Some("2024-01-01 10:00:00,500")
        );
        assert_eq!(
            tse.extract("2024-01-01 10:00:01 b"),
            Some("2024-01-01 10:00:01")
        );
        assert_eq!(
            fmt(tse.last_timestamp().unwrap()),
            "2024-01-01 10:00:01.000"
        );
        assert_eq!(tse.extract("no timestamp"), None);
    }

    #[test]
    fn test_fallback_configure_appends() {
        let mut tse = FallbackTimestampExtractor::new(&["yyyy-MM-dd"], 0).unwrap();
        assert_eq!(tse.extract("15.01.2024 x"), None);
        tse.configure("dd.MM.yyyy").unwrap();
        assert_eq!(tse.extract("15.01.2024 x"), Some("15.01.2024"));
        assert_eq!(
            fmt(tse.parse("15.01.2024")),
            "2024-01-15 00:00:00.000"
        );
    }

    #[test]
    fn test_build_extractor_validates_config() {
        let config = ExtractConfig::default();
        assert!(build_extractor(&config).is_ok());

        let config = ExtractConfig {
            date_patterns: vec![],
            ..ExtractConfig::default()
        };
        assert!(matches!(
            build_extractor(&config),
            Err(ConfigError::ValueOutOfRange { .. })
        ));

        let config = ExtractConfig {
            skip_prefix: constants::MAX_SKIP_PREFIX + 1,
            ..ExtractConfig::default()
        };
        assert!(build_extractor(&config).is_err());
    }
}
