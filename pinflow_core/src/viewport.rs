// Copyright 2026 the Pinflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll viewport state read from the host.

use kurbo::{Insets, Point, Rect};

/// How the host folds safe-area insets into its content insets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContentInsetAdjustment {
    /// Vertical safe-area insets are added for a vertically scrolling view.
    #[default]
    Automatic,
    /// Safe-area insets are added along scrollable axes (vertical here).
    ScrollableAxes,
    /// Safe-area insets are never added.
    Never,
    /// All four safe-area insets are always added.
    Always,
}

/// A snapshot of the host's visible region.
///
/// `bounds.origin()` is the scroll offset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Visible region in layout coordinates.
    pub bounds: Rect,
    /// Safe-area insets of the hosting view.
    pub safe_area: Insets,
    /// Content insets configured on the hosting view.
    pub content_inset: Insets,
    /// How safe-area insets combine with `content_inset`.
    pub inset_adjustment: ContentInsetAdjustment,
}

impl Viewport {
    /// Creates a viewport with no insets.
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    /// Returns a copy with `safe_area` set.
    #[must_use]
    pub fn with_safe_area(mut self, safe_area: Insets) -> Self {
        self.safe_area = safe_area;
        self
    }

    /// Returns a copy with `content_inset` set.
    #[must_use]
    pub fn with_content_inset(mut self, content_inset: Insets) -> Self {
        self.content_inset = content_inset;
        self
    }

    /// Returns a copy with `inset_adjustment` set.
    #[must_use]
    pub fn with_inset_adjustment(mut self, inset_adjustment: ContentInsetAdjustment) -> Self {
        self.inset_adjustment = inset_adjustment;
        self
    }

    /// Current scroll offset.
    #[inline]
    #[must_use]
    pub fn content_offset(&self) -> Point {
        self.bounds.origin()
    }

    /// Content insets after folding in the safe area.
    #[must_use]
    pub fn adjusted_content_inset(&self) -> Insets {
        let c = self.content_inset;
        let s = self.safe_area;
        match self.inset_adjustment {
            ContentInsetAdjustment::Never => c,
            ContentInsetAdjustment::Automatic | ContentInsetAdjustment::ScrollableAxes => {
                Insets::new(c.x0, c.y0 + s.y0, c.x1, c.y1 + s.y1)
            }
            ContentInsetAdjustment::Always => {
                Insets::new(c.x0 + s.x0, c.y0 + s.y0, c.x1 + s.x1, c.y1 + s.y1)
            }
        }
    }
}
