// Copyright 2026 the Pinflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The engine keys a [`understory_dirty`] tracker by section index. During
//! each prepare pass, section `s + 1` is given a dependency edge on section
//! `s` in the [`BACKGROUND`] channel. Marking a section with
//! [`EagerPolicy`](understory_dirty::EagerPolicy) therefore dirties that
//! section and every section after it: when an earlier section changes size,
//! the anchor items of every later section move.
//!
//! # Consumption
//!
//! Callers never query dirty state directly.
//! [`LayoutEngine::invalidate`](crate::engine::LayoutEngine::invalidate)
//! drains the channel immediately and drops the matching background cache
//! entries, so the next read recomputes them.

use understory_dirty::Channel;

/// Section background geometry changed; propagates to later sections.
pub const BACKGROUND: Channel = Channel::new(0);
