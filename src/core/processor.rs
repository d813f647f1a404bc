// LogExc - core/processor.rs
//
// Single-pass log scanner. Owns the correlation state (last timestamp, last
// comment, line counter) and turns each line into zero or more events.
// Core layer: operates on an in-memory string, never touches the filesystem.
//
// Per line, in this order:
//   1. advance the line counter
//   2. timestamp: first one emits START OF LOG; a restart marker on a
//      timestamped line emits RESTART
//   3. comment: overwrite the last comment
//   4. signature: emit an exception event with the current timestamp/comment
//
// After the last line END OF LOG is emitted if any timestamp was seen. A scan
// that never sees a timestamp yields no events at all.

use crate::core::comment::CommentExtractor;
use crate::core::model::{Event, EventKind, ExtractConfig, ScanSummary, SortOrder};
use crate::core::restart::RestartDetector;
use crate::core::signature::SignatureDetector;
use crate::core::timestamp::TimestampExtractor;
use crate::util::constants;

/// Events and statistics of a completed scan.
#[derive(Debug, Clone, Default)]
pub struct ProcessResult {
    /// Events in the configured line-number order.
    pub events: Vec<Event>,
    pub summary: ScanSummary,
}

/// The extraction state machine.
#[derive(Debug)]
pub struct LogProcessor {
    comments: CommentExtractor,
    signatures: SignatureDetector,
    restarts: RestartDetector,
    order: SortOrder,

    last_timestamp: Option<String>,
    last_comment: Option<String>,
    line_number: u64,

    events: Vec<Event>,
    summary: ScanSummary,
}

impl LogProcessor {
    pub fn new(config: &ExtractConfig) -> Self {
        Self {
            comments: CommentExtractor::new(config.comment_marker.clone()),
            signatures: SignatureDetector::new(),
            restarts: RestartDetector::new(config.restart_marker.clone()),
            order: config.order,
            last_timestamp: None,
            last_comment: None,
            line_number: 0,
            events: Vec::new(),
            summary: ScanSummary::default(),
        }
    }

    /// Advance the state machine by one line.
    pub fn feed_line(&mut self, line: &str, timestamps: &mut dyn TimestampExtractor) {
        self.line_number += 1;

        if let Some(ts) = timestamps.extract(line) {
            if self.last_timestamp.is_none() {
                self.emit(Some(ts), constants::START_OF_LOG, None);
            }
            self.last_timestamp = Some(ts.to_string());
            self.summary.timestamped_lines += 1;
            if let Some(instant) = timestamps.last_timestamp() {
                self.summary.earliest = Some(self.summary.earliest.map_or(instant, |e| e.min(instant)));
                self.summary.latest = Some(self.summary.latest.map_or(instant, |l| l.max(instant)));
            }

            if self.restarts.detect(line) {
                let comment = self.last_comment.clone();
                self.emit(Some(ts), constants::RESTART_LABEL, comment.as_deref());
            }
        }

        if let Some(comment) = self.comments.extract(line) {
            self.last_comment = Some(comment.to_string());
        }

        if let Some(signature) = self.signatures.detect(line) {
            let event = Event::new(
                self.line_number,
                self.last_timestamp.as_deref(),
                signature,
                self.last_comment.as_deref(),
            );
            self.events.push(event);
        }
    }

    fn emit(&mut self, timestamp: Option<&str>, signature: &str, comment: Option<&str>) {
        self.events
            .push(Event::new(self.line_number, timestamp, signature, comment));
    }

    /// Most recent raw timestamp text, if any line has carried one.
    pub fn last_timestamp(&self) -> Option<&str> {
        self.last_timestamp.as_deref()
    }

    /// Most recent diagnostic comment, if any.
    pub fn last_comment(&self) -> Option<&str> {
        self.last_comment.as_deref()
    }

    /// Number of lines fed so far.
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    /// Events emitted so far, in emission order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Close the scan: emit END OF LOG, drop everything if no timestamp was
    /// ever seen, and apply the configured ordering.
    pub fn finish(mut self) -> ProcessResult {
        match self.last_timestamp.take() {
            Some(ts) => {
                self.emit(Some(&ts), constants::END_OF_LOG, None);
            }
            None => {
                if !self.events.is_empty() {
                    tracing::debug!(
                        dropped = self.events.len(),
                        "No timestamp found in input; discarding events"
                    );
                }
                self.events.clear();
            }
        }

        sort_events(&mut self.events, self.order);

        let mut summary = self.summary;
        summary.lines_scanned = self.line_number;
        for event in &self.events {
            match event.kind() {
                EventKind::Restart => summary.restarts += 1,
                EventKind::Exception => summary.exceptions += 1,
                EventKind::Start | EventKind::End => {}
            }
        }

        ProcessResult {
            events: self.events,
            summary,
        }
    }
}

/// Stable sort by line number. Events sharing a line keep their emission
/// order (START/RESTART before the exception on that line) in both
/// directions.
pub fn sort_events(events: &mut [Event], order: SortOrder) {
    match order {
        SortOrder::Asc => events.sort_by(|a, b| a.line_number.cmp(&b.line_number)),
        SortOrder::Desc => events.sort_by(|a, b| b.line_number.cmp(&a.line_number)),
    }
}

/// Scan a complete in-memory text.
pub fn process_text(
    text: &str,
    config: &ExtractConfig,
    timestamps: &mut dyn TimestampExtractor,
) -> ProcessResult {
    let mut processor = LogProcessor::new(config);
    for line in text.lines() {
        processor.feed_line(line, timestamps);
    }
    let result = processor.finish();

    tracing::debug!(
        lines = result.summary.lines_scanned,
        events = result.events.len(),
        exceptions = result.summary.exceptions,
        restarts = result.summary.restarts,
        "Scan complete"
    );

    result
}
