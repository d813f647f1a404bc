// LogExc - core/restart.rs
//
// Process restart detection: a plain substring test against the configured
// marker (by default the Tomcat startup banner).

use crate::util::constants;

#[derive(Debug, Clone)]
pub struct RestartDetector {
    marker: String,
}

impl RestartDetector {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// True when `line` contains the marker. An empty marker matches nothing.
    pub fn detect(&self, line: &str) -> bool {
        !self.marker.is_empty() && line.contains(&self.marker)
    }
}

impl Default for RestartDetector {
    fn default() -> Self {
        Self::new(constants::DEFAULT_RESTART_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_marker() {
        let rd = RestartDetector::default();
        assert!(rd.detect(
            "2024-01-01 10:00:00,000 INFO [main] org.apache.catalina.startup.Catalina.start Server startup in [5123] milliseconds"
        ));
        assert!(!rd.detect("2024-01-01 10:00:00,000 INFO Server shutting down"));
    }

    #[test]
    fn test_custom_and_empty_marker() {
        assert!(RestartDetector::new("Application started").detect("x Application started y"));
        assert!(!RestartDetector::new("").detect("anything"));
    }
}
