//! Observability events emitted during extraction.
//!
//! Recursive splitting is invisible to the caller otherwise, so extractors
//! report every fetch and every split decision to a sink handle passed in
//! at construction time. The handle is explicit by design: there is no
//! module-level logger to configure and no hidden initialization order.

use chrono::{DateTime, Utc};

/// Severity of an [`ExtractEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    /// Routine progress: a fetch completed.
    Info,
    /// A truncation-triggered split or a granularity-floor hit.
    Warn,
}

/// A structured event reported during extraction.
#[derive(Debug, Clone)]
pub struct ExtractEvent {
    /// Event severity.
    pub level: EventLevel,
    /// Human-readable description.
    pub message: String,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
}

impl ExtractEvent {
    /// Creates an info-level event stamped now.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: EventLevel::Info,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Creates a warning-level event stamped now.
    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: EventLevel::Warn,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Receives extraction events, fire-and-forget.
///
/// A sink must never fail the extraction; anything that can go wrong while
/// recording stays inside the implementation.
pub trait EventSink: Send + Sync {
    /// Records one event.
    fn record(&self, event: ExtractEvent);
}

/// Forwards events to the [`log`] facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&self, event: ExtractEvent) {
        match event.level {
            EventLevel::Info => log::info!("{}", event.message),
            EventLevel::Warn => log::warn!("{}", event.message),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: ExtractEvent) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Captures events for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink {
        events: Mutex<Vec<ExtractEvent>>,
    }

    impl RecordingSink {
        pub(crate) fn warnings(&self) -> Vec<String> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.level == EventLevel::Warn)
                .map(|e| e.message.clone())
                .collect()
        }

        pub(crate) fn len(&self) -> usize {
            self.events.lock().unwrap().len()
        }
    }

    impl EventSink for RecordingSink {
        fn record(&self, event: ExtractEvent) {
            self.events.lock().unwrap().push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testing::RecordingSink;

    #[test]
    fn test_event_constructors() {
        let info = ExtractEvent::info("fetched 12 rows");
        assert_eq!(info.level, EventLevel::Info);
        let warn = ExtractEvent::warn("possible truncation");
        assert_eq!(warn.level, EventLevel::Warn);
    }

    #[test]
    fn test_recording_sink_captures_levels() {
        let sink = RecordingSink::default();
        sink.record(ExtractEvent::info("a"));
        sink.record(ExtractEvent::warn("b"));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.warnings(), vec!["b".to_string()]);
    }
}
