//! Summary counts over a buffer snapshot

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::events::{EventType, TelemetryEvent};

/// Per-type counts and time span of the buffered events
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySummary {
    pub total: usize,
    pub by_type: BTreeMap<EventType, usize>,
    pub newest: Option<DateTime<Utc>>,
    pub oldest: Option<DateTime<Utc>>,
}

impl TelemetrySummary {
    pub fn count(&self, event_type: EventType) -> usize {
        self.by_type.get(&event_type).copied().unwrap_or(0)
    }
}

/// Summarize a newest-first snapshot
pub fn summarize(events: &[TelemetryEvent]) -> TelemetrySummary {
    let mut summary = TelemetrySummary {
        total: events.len(),
        newest: events.first().map(|e| e.timestamp),
        oldest: events.last().map(|e| e.timestamp),
        ..Default::default()
    };

    for event in events {
        *summary.by_type.entry(event.event_type()).or_insert(0) += 1;
    }

    summary
}
