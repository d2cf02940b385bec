// Copyright 2026 the Pinflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Global element and section background configuration.

use core::fmt;

use kurbo::Insets;

/// Behaviour of a global header or footer.
///
/// `prefers_follow_content` only has an effect together with
/// `pins_to_bounds`. Pinning to bounds and to content at the same time is
/// rejected by [`validate`](Self::validate).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobalElementConfig {
    /// Keep the element at the visible edge of the viewport while scrolling.
    pub pins_to_bounds: bool,
    /// Grow the element to fill the gap exposed by overscrolling past the
    /// start (header) or end (footer) of the content.
    pub pins_to_content: bool,
    /// While pinned to bounds, let the element scroll away with the content
    /// in the direction that moves it off-screen.
    pub prefers_follow_content: bool,
    /// Extra spacing between the element and the adjacent section.
    pub inset: f64,
    /// Position the element relative to the safe area. When false, the
    /// element extends under the safe-area inset on its edge.
    pub layout_from_safe_area: bool,
}

impl Default for GlobalElementConfig {
    fn default() -> Self {
        Self {
            pins_to_bounds: true,
            pins_to_content: false,
            prefers_follow_content: false,
            inset: 0.0,
            layout_from_safe_area: true,
        }
    }
}

impl GlobalElementConfig {
    /// A configuration that scrolls with the content and never pins.
    #[must_use]
    pub fn scrolling() -> Self {
        Self {
            pins_to_bounds: false,
            ..Self::default()
        }
    }

    /// Whether a bounds change can move or resize this element.
    #[inline]
    #[must_use]
    pub const fn pins(&self) -> bool {
        self.pins_to_bounds || self.pins_to_content
    }

    /// Checks that this configuration is supported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pins_to_bounds && self.pins_to_content {
            return Err(ConfigError::PinsToBoundsAndContent);
        }
        if !self.inset.is_finite() {
            return Err(ConfigError::NonFiniteInset);
        }
        Ok(())
    }
}

/// Rejected configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `pins_to_bounds` and `pins_to_content` were both enabled.
    PinsToBoundsAndContent,
    /// The inset was NaN or infinite.
    NonFiniteInset,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinsToBoundsAndContent => {
                f.write_str("global element cannot pin to both bounds and content")
            }
            Self::NonFiniteInset => f.write_str("global element inset must be finite"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// How a section background is sized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BackgroundLayoutStyle {
    /// No background.
    #[default]
    None,
    /// Span the items, the section header and footer, and the section insets.
    OuterBounds,
    /// Span the items and the section insets only.
    InnerBounds,
}

/// Per-section spacing reported by the host delegate.
///
/// The engine reads only [`insets`](Self::insets), to size section
/// backgrounds. The two spacing values are carried for the host's base flow
/// layout, which places the items; raw frames from the host already include
/// them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SectionMetrics {
    /// Insets around the section's items.
    pub insets: Insets,
    /// Minimum spacing between items on one line. Base layout only.
    pub interitem_spacing: f64,
    /// Minimum spacing between lines. Base layout only.
    pub line_spacing: f64,
}
