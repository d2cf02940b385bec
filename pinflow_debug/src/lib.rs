// Copyright 2026 the Pinflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON recording for pinflow diagnostics.
//!
//! This crate provides [`TraceSink`](pinflow_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`json::JsonRecorder`]: collects events as JSON values and writes them
//!   out as one array.
//!
//! Both can be installed directly with
//! [`LayoutEngine::set_trace_sink`](pinflow_core::engine::LayoutEngine::set_trace_sink),
//! or wrapped in `Rc<RefCell<_>>` to keep reading them while the engine runs.

pub mod json;
pub mod pretty;
