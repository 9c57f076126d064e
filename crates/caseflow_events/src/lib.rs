//! Processing progress events.
//!
//! The pipeline reports progress through an injected [`EventSink`].
//! Publishing is infallible and non-blocking from the pipeline's point
//! of view: sinks queue or drop, and the pipeline never awaits
//! delivery. One event serializes to one JSON object.
//!
//! Within one case, events are emitted strictly in pipeline order:
//! `case_start` < all `document_*` < `case_complete`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

/// Kind of progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    CaseStart,
    DocumentStart,
    DocumentComplete,
    DocumentError,
    CaseComplete,
}

/// One progress event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingEvent {
    /// Event kind, serialized as `type` on the wire
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub case_id: String,
    /// ISO-8601 emission time
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingEvent {
    fn new(kind: EventKind, case_id: &str) -> Self {
        Self {
            kind,
            case_id: case_id.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            file_name: None,
            message: None,
            error: None,
        }
    }
}

/// Receiver of progress events.
///
/// `publish` must not block the pipeline; implementations queue or
/// drop. Failures stay inside the sink.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &ProcessingEvent);
}

/// Sink that discards every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: &ProcessingEvent) {}
}

/// Sink that collects events in memory. Intended for tests and for
/// callers that post-process a finished run.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ProcessingEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far.
    pub fn events(&self) -> Vec<ProcessingEvent> {
        self.events.lock().expect("event sink poisoned").clone()
    }
}

impl EventSink for MemorySink {
    fn publish(&self, event: &ProcessingEvent) {
        self.events
            .lock()
            .expect("event sink poisoned")
            .push(event.clone());
    }
}

/// Fixed-capacity queue sink that drops the oldest event on overflow.
///
/// Protects the pipeline from slow consumers: enqueueing never blocks,
/// and a consumer that falls behind loses history rather than stalling
/// extraction.
#[derive(Debug)]
pub struct BoundedSink {
    capacity: usize,
    queue: Mutex<VecDeque<ProcessingEvent>>,
    dropped: Mutex<u64>,
}

impl BoundedSink {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            queue: Mutex::new(VecDeque::new()),
            dropped: Mutex::new(0),
        }
    }

    /// Drain all queued events in publication order.
    pub fn drain(&self) -> Vec<ProcessingEvent> {
        self.queue
            .lock()
            .expect("event queue poisoned")
            .drain(..)
            .collect()
    }

    /// Number of events dropped due to overflow.
    pub fn dropped(&self) -> u64 {
        *self.dropped.lock().expect("drop counter poisoned")
    }
}

impl EventSink for BoundedSink {
    fn publish(&self, event: &ProcessingEvent) {
        let mut queue = self.queue.lock().expect("event queue poisoned");
        if queue.len() == self.capacity {
            queue.pop_front();
            *self.dropped.lock().expect("drop counter poisoned") += 1;
            debug!("event queue full, dropped oldest event");
        }
        queue.push_back(event.clone());
    }
}

/// Thin adapter that builds events for the documented progress points
/// and hands them to the sink.
pub struct EventBroadcaster<'a> {
    sink: &'a dyn EventSink,
    case_id: String,
}

impl<'a> EventBroadcaster<'a> {
    pub fn new(sink: &'a dyn EventSink, case_id: impl Into<String>) -> Self {
        Self {
            sink,
            case_id: case_id.into(),
        }
    }

    pub fn case_start(&self, message: impl Into<String>) {
        let mut event = ProcessingEvent::new(EventKind::CaseStart, &self.case_id);
        event.message = Some(message.into());
        self.sink.publish(&event);
    }

    pub fn case_complete(&self, message: impl Into<String>) {
        let mut event = ProcessingEvent::new(EventKind::CaseComplete, &self.case_id);
        event.message = Some(message.into());
        self.sink.publish(&event);
    }

    pub fn document_start(&self, file_name: &str) {
        let mut event = ProcessingEvent::new(EventKind::DocumentStart, &self.case_id);
        event.file_name = Some(file_name.to_string());
        self.sink.publish(&event);
    }

    pub fn document_complete(&self, file_name: &str, message: impl Into<String>) {
        let mut event = ProcessingEvent::new(EventKind::DocumentComplete, &self.case_id);
        event.file_name = Some(file_name.to_string());
        event.message = Some(message.into());
        self.sink.publish(&event);
    }

    pub fn document_error(&self, file_name: &str, error: impl Into<String>) {
        let mut event = ProcessingEvent::new(EventKind::DocumentError, &self.case_id);
        event.file_name = Some(file_name.to_string());
        event.error = Some(error.into());
        self.sink.publish(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_shape() {
        let broadcaster_sink = MemorySink::new();
        let broadcaster = EventBroadcaster::new(&broadcaster_sink, "youssef");
        broadcaster.document_error("bad.pdf", "decode failed");

        let events = broadcaster_sink.events();
        assert_eq!(events.len(), 1);
        let json = serde_json::to_value(&events[0]).unwrap();
        assert_eq!(json["type"], "document_error");
        assert_eq!(json["case_id"], "youssef");
        assert_eq!(json["file_name"], "bad.pdf");
        assert_eq!(json["error"], "decode failed");
        // Absent optional fields are omitted entirely
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_pipeline_event_order() {
        let sink = MemorySink::new();
        let broadcaster = EventBroadcaster::new(&sink, "case");
        broadcaster.case_start("2 documents");
        broadcaster.document_start("a.txt");
        broadcaster.document_complete("a.txt", "quality 80/100");
        broadcaster.case_complete("done");

        let kinds: Vec<EventKind> = sink.events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::CaseStart,
                EventKind::DocumentStart,
                EventKind::DocumentComplete,
                EventKind::CaseComplete,
            ]
        );
    }

    #[test]
    fn test_bounded_sink_drops_oldest() {
        let sink = BoundedSink::new(2);
        let broadcaster = EventBroadcaster::new(&sink, "case");
        broadcaster.document_start("a.txt");
        broadcaster.document_start("b.txt");
        broadcaster.document_start("c.txt");

        let queued = sink.drain();
        assert_eq!(queued.len(), 2);
        assert_eq!(queued[0].file_name.as_deref(), Some("b.txt"));
        assert_eq!(queued[1].file_name.as_deref(), Some("c.txt"));
        assert_eq!(sink.dropped(), 1);
    }
}
