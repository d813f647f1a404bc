// LogExc - core/comment.rs
//
// Diagnostic comment extraction.
//
// The monitored application logs a tagged line from its request filter, e.g.
//
//   [memoryInfo] uri=/orders/42, free=1024, total=2048, max=4096
//
// and the value between the tag and the next comma identifies which request
// was in flight when a later exception was logged.

use crate::util::constants;

/// Extracts the value following a fixed marker, up to the next delimiter.
#[derive(Debug, Clone)]
pub struct CommentExtractor {
    marker: String,
    delimiter: char,
}

impl CommentExtractor {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            delimiter: constants::COMMENT_DELIMITER,
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Returns the comment on this line, if any.
    ///
    /// `None` when the marker is absent, the marker is empty, or no delimiter
    /// follows the marker.
    pub fn extract<'l>(&self, line: &'l str) -> Option<&'l str> {
        if self.marker.is_empty() {
            return None;
        }
        let start = line.find(&self.marker)? + self.marker.len();
        let rest = &line[start..];
        let end = rest.find(self.delimiter)?;
        Some(&rest[..end])
    }
}

impl Default for CommentExtractor {
    fn default() -> Self {
        Self::new(constants::DEFAULT_COMMENT_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_value_up_to_comma() {
        let ce = CommentExtractor::default();
        let line = "2024-01-01 10:00:00,000 INFO [memoryInfo] uri=/orders/42, free=1, total=2, max=3";
        assert_eq!(ce.extract(line), Some("/orders/42"));
    }

    #[test]
    fn test_marker_absent() {
        let ce = CommentExtractor::default();
        assert_eq!(ce.extract("2024-01-01 10:00:00,000 INFO plain line"), None);
        assert_eq!(ce.extract(""), None);
    }

    #[test]
    fn test_no_delimiter_after_marker() {
        let ce = CommentExtractor::default();
        // The comma in the timestamp precedes the marker and must not count.
        assert_eq!(
            ce.extract("2024-01-01 10:00:00,000 [memoryInfo] uri=/orders/42"),
            None
        );
    }

    #[test]
    fn test_empty_value() {
        let ce = CommentExtractor::default();
        assert_eq!(ce.extract("[memoryInfo] uri=, free=1"), Some(""));
    }

    #[test]
    fn test_custom_marker() {
        let ce = CommentExtractor::new("reqId=");
        assert_eq!(ce.marker(), "reqId=");
        assert_eq!(ce.extract("GET reqId=ab12, user=x"), Some("ab12"));
    }

    #[test]
    fn test_empty_marker_never_matches() {
        let ce = CommentExtractor::new("");
        assert_eq!(ce.extract("anything, at all"), None);
    }
}
