// Copyright 2026 the Pinflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use pinflow_core::kurbo::Rect;
use pinflow_core::trace::{
    BoundsChangeEvent, CacheChange, CacheEvent, InvalidateEvent, PrepareEvent, QueryEvent,
    TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    lines: u64,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer, lines: 0 }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Number of lines written so far.
    #[must_use]
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Consumes the sink and returns its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        let _ = self.writer.write_fmt(args);
        let _ = self.writer.write_all(b"\n");
        self.lines += 1;
    }
}

fn rect(r: Rect) -> String {
    format!("({:.1},{:.1})-({:.1},{:.1})", r.x0, r.y0, r.x1, r.y1)
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        let first = e
            .first_section
            .map_or_else(|| "-".to_owned(), |section| section.to_string());
        self.line(format_args!(
            "[invalidate] flags={:?} sections={} first={first} dropped={}",
            e.flags, e.invalidated_sections, e.backgrounds_dropped,
        ));
    }

    fn on_cache(&mut self, e: &CacheEvent) {
        let change = match e.change {
            CacheChange::Filled => "filled",
            CacheChange::Cleared => "cleared",
        };
        self.line(format_args!("[cache:{change}] {}", e.entry));
    }

    fn on_bounds_change(&mut self, e: &BoundsChangeEvent) {
        self.line(format_args!(
            "[bounds] {} -> {} flags={:?}",
            rect(e.old_bounds),
            rect(e.new_bounds),
            e.flags,
        ));
    }

    fn on_prepare(&mut self, e: &PrepareEvent) {
        self.line(format_args!(
            "[prepare] sections={} backgrounds={}",
            e.sections, e.backgrounds_computed,
        ));
    }

    fn on_query(&mut self, e: &QueryEvent) {
        self.line(format_args!(
            "[query] rect={} returned={}",
            rect(e.rect),
            e.returned,
        ));
    }
}
