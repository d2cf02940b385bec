// Copyright 2026 the Pinflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the layout engine.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! engine calls as it invalidates, prepares, and answers queries. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! Install a sink with
//! [`LayoutEngine::set_trace_sink`](crate::engine::LayoutEngine::set_trace_sink).

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use kurbo::Rect;

use crate::invalidation::InvalidationFlags;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// A cacheable quantity owned by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheEntry {
    /// Size of the global header.
    GlobalHeaderSize,
    /// Raw attributes of the global header.
    GlobalHeaderAttributes,
    /// Size of the global footer.
    GlobalFooterSize,
    /// Raw attributes of the global footer.
    GlobalFooterAttributes,
    /// Background attributes of one section.
    Background(usize),
}

impl fmt::Display for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GlobalHeaderSize => f.write_str("global-header-size"),
            Self::GlobalHeaderAttributes => f.write_str("global-header-attributes"),
            Self::GlobalFooterSize => f.write_str("global-footer-size"),
            Self::GlobalFooterAttributes => f.write_str("global-footer-attributes"),
            Self::Background(section) => write!(f, "background[{section}]"),
        }
    }
}

/// Direction of a cache transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheChange {
    /// absent → cached, during a prepare pass.
    Filled,
    /// cached → absent, during an invalidation.
    Cleared,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted once per applied [`InvalidationContext`](crate::invalidation::InvalidationContext).
#[derive(Clone, Copy, Debug)]
pub struct InvalidateEvent {
    /// Effective flags of the context.
    pub flags: InvalidationFlags,
    /// Number of distinct invalidated sections.
    pub invalidated_sections: usize,
    /// Lowest invalidated section, if any.
    pub first_section: Option<usize>,
    /// Number of background cache entries dropped.
    pub backgrounds_dropped: usize,
}

/// Emitted when a cache entry changes state.
#[derive(Clone, Copy, Debug)]
pub struct CacheEvent {
    /// Which entry.
    pub entry: CacheEntry,
    /// Which way it moved.
    pub change: CacheChange,
}

/// Emitted when the engine builds a context for a bounds change.
#[derive(Clone, Copy, Debug)]
pub struct BoundsChangeEvent {
    /// Bounds before the change.
    pub old_bounds: Rect,
    /// Proposed bounds.
    pub new_bounds: Rect,
    /// Flags of the derived context.
    pub flags: InvalidationFlags,
}

/// Emitted at the end of a prepare pass that filled at least one cache entry.
#[derive(Clone, Copy, Debug)]
pub struct PrepareEvent {
    /// Sections visited.
    pub sections: usize,
    /// Backgrounds computed during the pass.
    pub backgrounds_computed: usize,
}

/// Emitted after answering a rect query.
#[derive(Clone, Copy, Debug)]
pub struct QueryEvent {
    /// Queried region.
    pub rect: Rect,
    /// Number of attributes returned.
    pub returned: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after an invalidation context was applied.
    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        _ = e;
    }

    /// Called when a cache entry is filled or cleared.
    fn on_cache(&mut self, e: &CacheEvent) {
        _ = e;
    }

    /// Called when a bounds-change context is built.
    fn on_bounds_change(&mut self, e: &BoundsChangeEvent) {
        _ = e;
    }

    /// Called at the end of a prepare pass.
    fn on_prepare(&mut self, e: &PrepareEvent) {
        _ = e;
    }

    /// Called after a rect query.
    fn on_query(&mut self, e: &QueryEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

/// Shares one sink between the engine and its owner, so recorded events can
/// be read back while the engine still holds the sink.
impl<T: TraceSink + ?Sized> TraceSink for Rc<RefCell<T>> {
    fn on_invalidate(&mut self, e: &InvalidateEvent) {
        self.borrow_mut().on_invalidate(e);
    }

    fn on_cache(&mut self, e: &CacheEvent) {
        self.borrow_mut().on_cache(e);
    }

    fn on_bounds_change(&mut self, e: &BoundsChangeEvent) {
        self.borrow_mut().on_bounds_change(e);
    }

    fn on_prepare(&mut self, e: &PrepareEvent) {
        self.borrow_mut().on_prepare(e);
    }

    fn on_query(&mut self, e: &QueryEvent) {
        self.borrow_mut().on_query(e);
    }
}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits an [`InvalidateEvent`].
    #[inline]
    pub fn invalidate(&mut self, e: &InvalidateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_invalidate(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CacheEvent`].
    #[inline]
    pub fn cache(&mut self, e: &CacheEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cache(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`BoundsChangeEvent`].
    #[inline]
    pub fn bounds_change(&mut self, e: &BoundsChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_bounds_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PrepareEvent`].
    #[inline]
    pub fn prepare(&mut self, e: &PrepareEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_prepare(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`QueryEvent`].
    #[inline]
    pub fn query(&mut self, e: &QueryEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_query(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
