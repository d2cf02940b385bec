// Copyright 2026 the Pinflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON event recording.
//!
//! [`JsonRecorder`] keeps every event as a [`serde_json::Value`] with a
//! sequence number, and [`JsonRecorder::export`] writes them as one pretty
//! JSON array.

use std::io::{self, Write};

use serde_json::{Value, json};

use pinflow_core::kurbo::Rect;
use pinflow_core::trace::{
    BoundsChangeEvent, CacheChange, CacheEvent, InvalidateEvent, PrepareEvent, QueryEvent,
    TraceSink,
};

/// Collects trace events as JSON values.
#[derive(Debug, Default)]
pub struct JsonRecorder {
    events: Vec<Value>,
}

impl JsonRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// Drops all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Writes the recorded events as a JSON array.
    pub fn export(&self, writer: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &self.events)?;
        Ok(())
    }

    fn push(&mut self, name: &str, args: Value) {
        let seq = self.events.len();
        self.events.push(json!({
            "seq": seq,
            "name": name,
            "args": args,
        }));
    }
}

fn rect(r: Rect) -> Value {
    json!([r.x0, r.y0, r.x1, r.y1])
}

impl TraceSink for JsonRecorder {
    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        self.push(
            "Invalidate",
            json!({
                "flags": e.flags.bits(),
                "invalidated_sections": e.invalidated_sections,
                "first_section": e.first_section,
                "backgrounds_dropped": e.backgrounds_dropped,
            }),
        );
    }

    fn on_cache(&mut self, e: &CacheEvent) {
        let change = match e.change {
            CacheChange::Filled => "filled",
            CacheChange::Cleared => "cleared",
        };
        self.push(
            "Cache",
            json!({
                "entry": e.entry.to_string(),
                "change": change,
            }),
        );
    }

    fn on_bounds_change(&mut self, e: &BoundsChangeEvent) {
        self.push(
            "BoundsChange",
            json!({
                "old": rect(e.old_bounds),
                "new": rect(e.new_bounds),
                "flags": e.flags.bits(),
            }),
        );
    }

    fn on_prepare(&mut self, e: &PrepareEvent) {
        self.push(
            "Prepare",
            json!({
                "sections": e.sections,
                "backgrounds_computed": e.backgrounds_computed,
            }),
        );
    }

    fn on_query(&mut self, e: &QueryEvent) {
        self.push(
            "Query",
            json!({
                "rect": rect(e.rect),
                "returned": e.returned,
            }),
        );
    }
}
