// Copyright 2026 the Pinflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinned global headers, global footers and section backgrounds layered over
//! a flow layout.
//!
//! `pinflow_core` does not lay out items. A host component owns the base flow
//! algorithm and reports raw geometry through [`FlowHost`](host::FlowHost);
//! the engine adds the elements a plain flow layout lacks and shifts every
//! element into its on-screen position. It is `no_std` compatible (with
//! `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   FlowHost (counts, raw frames, viewport, delegate)
//!       │
//!       ▼
//!   LayoutEngine::prepare() ──► caches (global sizes, backgrounds)
//!       │                            ▲
//!       ▼                            │ cleared by
//!   Adjuster::adjust() ──► LayoutAttributes     LayoutEngine::invalidate()
//!                                                    ▲
//!                 ┌──────────────────────────────────┘
//!                 │
//!   InvalidationContext (bounds change, updates, config, host requests)
//! ```
//!
//! **[`engine`]**: The [`LayoutEngine`](engine::LayoutEngine) orchestrator.
//! Owns every cache, runs the prepare pass, applies invalidations and answers
//! rect, item and supplementary queries.
//!
//! **[`invalidation`]**: [`InvalidationContext`](invalidation::InvalidationContext),
//! a cumulative set of flags and index paths. Flags imply each other and can
//! never be unset.
//!
//! **[`adjust`]**: Pure geometry. Pins the global header and footer and
//! pushes regular content below the header.
//!
//! **[`background`]**: Section background rectangles anchored on a section's
//! first and last items.
//!
//! **[`dirty`]**: Section-chained dirty tracking via `understory_dirty`, used
//! to cascade background invalidation to later sections.
//!
//! **[`host`]**, **[`viewport`]**, **[`element`]**, **[`config`]**: The host
//! contract and the value types that cross it.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub use kurbo;

pub mod adjust;
pub mod background;
pub mod config;
pub mod dirty;
pub mod element;
pub mod engine;
pub mod host;
pub mod invalidation;
pub mod trace;
pub mod viewport;

#[cfg(test)]
mod test_host;
