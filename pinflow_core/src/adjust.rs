// Copyright 2026 the Pinflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping raw element geometry to on-screen geometry.
//!
//! [`Adjuster`] is a pure snapshot of everything positioning depends on: the
//! viewport, both global element configurations, the cached global element
//! sizes, and the total content height. It has no access to the engine or
//! the host, so every rule here can be exercised with hand-built viewports.
//!
//! # Rules
//!
//! - **Global header** starts at `(0, additional_inset - top_inset)`. Pinning
//!   to bounds shifts it by the scroll offset (unless it prefers to follow
//!   content and the user scrolled down). Pinning to content grows it into an
//!   overscroll gap above the content.
//! - **Global footer** ends at the content height. Pinning to bounds keeps it
//!   at the viewport's bottom edge (unless it prefers to follow content and
//!   the content already reaches below the viewport). Pinning to content
//!   grows it into an overscroll gap below the content.
//! - **Everything else** is pushed down by the content start offset so it
//!   sits below the global header.

use kurbo::{Point, Rect, Size, Vec2};

use crate::config::GlobalElementConfig;
use crate::element::{ElementKind, LayoutAttributes};
use crate::viewport::{ContentInsetAdjustment, Viewport};

/// Inputs for positioning elements during one query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Adjuster {
    /// Viewport snapshot.
    pub viewport: Viewport,
    /// Global header configuration.
    pub header_config: GlobalElementConfig,
    /// Cached global header size, if a header is present.
    pub header_size: Option<Size>,
    /// Global footer configuration.
    pub footer_config: GlobalElementConfig,
    /// Cached global footer size, if a footer is present.
    pub footer_size: Option<Size>,
    /// Total content height, including global element heights.
    pub content_height: f64,
}

impl Adjuster {
    /// Extra top offset applied to the header when it lays out from the safe
    /// area.
    #[must_use]
    pub fn additional_content_inset(&self) -> f64 {
        if self.header_size.is_none() || !self.header_config.layout_from_safe_area {
            return 0.0;
        }

        let adjusted_top = self.viewport.adjusted_content_inset().y0;
        let safe_top = self.viewport.safe_area.y0;
        let safe_area_adjustment = adjusted_top - self.viewport.content_inset.y0;

        match self.viewport.inset_adjustment {
            ContentInsetAdjustment::Never => {
                let top_bar_hidden = safe_area_adjustment != safe_top;
                if top_bar_hidden { safe_top } else { adjusted_top }
            }
            _ => safe_area_adjustment,
        }
    }

    /// Unpinned origin of the global header.
    #[must_use]
    pub fn global_header_origin(&self) -> Point {
        if self.header_size.is_none() {
            return Point::ZERO;
        }
        let y = self.additional_content_inset() - self.viewport.adjusted_content_inset().y0;
        Point::new(0.0, y)
    }

    /// Unpinned size of the global header, including the top safe-area inset
    /// when it opts out of safe-area layout.
    #[must_use]
    pub fn global_header_size(&self) -> Size {
        let Some(size) = self.header_size else {
            return Size::ZERO;
        };
        let extra = if self.header_config.layout_from_safe_area {
            0.0
        } else {
            self.viewport.safe_area.y0
        };
        Size::new(size.width, size.height + extra)
    }

    /// Distance the header must move to stay at the top of the viewport.
    ///
    /// Negative while the user overscrolls above the content.
    #[must_use]
    pub fn global_header_offset(&self) -> f64 {
        self.viewport.content_offset().y + self.viewport.adjusted_content_inset().y0
    }

    /// Unpinned size of the global footer, including the bottom safe-area
    /// inset when it opts out of safe-area layout.
    #[must_use]
    pub fn global_footer_size(&self) -> Size {
        let Some(size) = self.footer_size else {
            return Size::ZERO;
        };
        let extra = if self.footer_config.layout_from_safe_area {
            0.0
        } else {
            self.viewport.safe_area.y1
        };
        Size::new(size.width, size.height + extra)
    }

    /// Unpinned origin of the global footer.
    #[must_use]
    pub fn global_footer_origin(&self) -> Point {
        let mut y = self.content_height - self.global_footer_size().height;
        if !self.footer_config.layout_from_safe_area {
            y += self.viewport.adjusted_content_inset().y1;
        }
        Point::new(0.0, y)
    }

    /// Distance the footer must move to stay at the bottom of the viewport.
    ///
    /// Positive while the user overscrolls below the content.
    #[must_use]
    pub fn global_footer_offset(&self) -> f64 {
        self.viewport.bounds.max_y()
            - self.content_height
            - self.viewport.adjusted_content_inset().y1
    }

    /// How far non-global elements are pushed down to clear the global header.
    #[must_use]
    pub fn content_start_offset(&self) -> f64 {
        if self.header_size.is_none() {
            return 0.0;
        }
        self.global_header_origin().y + self.global_header_size().height + self.header_config.inset
    }

    /// Final frame of the global header.
    #[must_use]
    pub fn global_header_frame(&self) -> Rect {
        let config = &self.header_config;
        let mut origin = self.global_header_origin();
        let mut size = self.global_header_size();
        let offset = self.global_header_offset();

        if config.pins_to_bounds && !(config.prefers_follow_content && offset > 0.0) {
            origin.y += offset;
        }
        if config.pins_to_content && offset < 0.0 {
            size.height -= offset;
        }
        Rect::from_origin_size(origin, size)
    }

    /// Final frame of the global footer.
    #[must_use]
    pub fn global_footer_frame(&self) -> Rect {
        let config = &self.footer_config;
        let mut origin = self.global_footer_origin();
        let mut size = self.global_footer_size();
        let offset = self.global_footer_offset();

        if config.pins_to_bounds && !(config.prefers_follow_content && offset < 0.0) {
            origin.y += offset;
        }
        if config.pins_to_content && offset > 0.0 {
            origin.y -= offset;
            size.height += offset;
        }
        Rect::from_origin_size(origin, size)
    }

    /// Returns the on-screen version of `attributes`.
    ///
    /// `items_in_section` is only consulted for items, to set the
    /// first/last-in-section markers.
    #[must_use]
    pub fn adjust(
        &self,
        mut attributes: LayoutAttributes,
        items_in_section: impl FnOnce(usize) -> usize,
    ) -> LayoutAttributes {
        attributes.z_index = attributes.kind.z_index();
        match attributes.kind {
            ElementKind::GlobalHeader => attributes.frame = self.global_header_frame(),
            ElementKind::GlobalFooter => attributes.frame = self.global_footer_frame(),
            kind => {
                if kind == ElementKind::Item {
                    let count = items_in_section(attributes.index_path.section);
                    attributes.mark_section_position(count);
                }
                attributes.frame = attributes.frame + Vec2::new(0.0, self.content_start_offset());
            }
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Insets;

    use super::*;
    use crate::element::IndexPath;

    const WIDTH: f64 = 320.0;

    fn viewport_at(offset_y: f64) -> Viewport {
        Viewport::new(Rect::new(0.0, offset_y, WIDTH, offset_y + 480.0))
    }

    fn header_only(config: GlobalElementConfig, offset_y: f64) -> Adjuster {
        Adjuster {
            viewport: viewport_at(offset_y),
            header_config: config,
            header_size: Some(Size::new(WIDTH, 44.0)),
            footer_config: GlobalElementConfig::default(),
            footer_size: None,
            content_height: 1044.0,
        }
    }

    fn footer_only(config: GlobalElementConfig, offset_y: f64, content_height: f64) -> Adjuster {
        Adjuster {
            viewport: viewport_at(offset_y),
            header_config: GlobalElementConfig::default(),
            header_size: None,
            footer_config: config,
            footer_size: Some(Size::new(WIDTH, 50.0)),
            content_height,
        }
    }

    #[test]
    fn unpinned_header_ignores_scroll() {
        let config = GlobalElementConfig::scrolling();
        for offset in [-80.0, 0.0, 20.0, 900.0] {
            let frame = header_only(config, offset).global_header_frame();
            assert_eq!(frame.origin(), Point::ZERO, "offset {offset}");
            assert_eq!(frame.height(), 44.0, "offset {offset}");
        }
    }

    #[test]
    fn unpinned_header_origin_follows_insets() {
        let mut adjuster = header_only(GlobalElementConfig::scrolling(), 35.0);
        adjuster.viewport = adjuster
            .viewport
            .with_content_inset(Insets::new(0.0, 12.0, 0.0, 0.0))
            .with_safe_area(Insets::new(0.0, 20.0, 0.0, 0.0));
        // Adjusted top = 12 + 20; additional = 32 - 12.
        let frame = adjuster.global_header_frame();
        assert_eq!(frame.origin(), Point::new(0.0, -12.0));
    }

    #[test]
    fn pinned_header_sticks_to_viewport_top() {
        let frame = header_only(GlobalElementConfig::default(), 20.0).global_header_frame();
        assert_eq!(frame.origin(), Point::new(0.0, 20.0));
        assert_eq!(frame.height(), 44.0);
    }

    #[test]
    fn following_header_scrolls_away() {
        let config = GlobalElementConfig {
            prefers_follow_content: true,
            ..GlobalElementConfig::default()
        };
        assert_eq!(header_only(config, 20.0).global_header_frame().y0, 0.0);
        // Overscroll still pins.
        assert_eq!(header_only(config, -30.0).global_header_frame().y0, -30.0);
    }

    #[test]
    fn content_pinned_header_fills_overscroll() {
        let config = GlobalElementConfig {
            pins_to_bounds: false,
            pins_to_content: true,
            ..GlobalElementConfig::default()
        };
        for overscroll in [0.0, 1.0, 25.0, 120.0] {
            let frame = header_only(config, -overscroll).global_header_frame();
            assert_eq!(frame.height(), 44.0 + overscroll, "overscroll {overscroll}");
            assert_eq!(frame.y0, 0.0, "overscroll {overscroll}");
        }
        assert_eq!(header_only(config, 60.0).global_header_frame().height(), 44.0);
    }

    #[test]
    fn header_outside_safe_area_grows() {
        let config = GlobalElementConfig {
            layout_from_safe_area: false,
            ..GlobalElementConfig::scrolling()
        };
        let mut adjuster = header_only(config, 0.0);
        adjuster.viewport = adjuster.viewport.with_safe_area(Insets::new(0.0, 20.0, 0.0, 0.0));
        let frame = adjuster.global_header_frame();
        assert_eq!(frame.height(), 64.0);
        assert_eq!(frame.y0, -20.0);
    }

    #[test]
    fn never_mode_uses_safe_top_when_bar_hidden() {
        let mut adjuster = header_only(GlobalElementConfig::scrolling(), 0.0);
        adjuster.viewport = adjuster
            .viewport
            .with_safe_area(Insets::new(0.0, 20.0, 0.0, 0.0))
            .with_inset_adjustment(ContentInsetAdjustment::Never);
        assert_eq!(adjuster.additional_content_inset(), 20.0);
        assert_eq!(adjuster.global_header_frame().y0, 20.0);
    }

    #[test]
    fn never_mode_uses_adjusted_top_when_bar_visible() {
        let mut adjuster = header_only(GlobalElementConfig::scrolling(), 0.0);
        adjuster.viewport = adjuster
            .viewport
            .with_content_inset(Insets::new(0.0, 10.0, 0.0, 0.0))
            .with_inset_adjustment(ContentInsetAdjustment::Never);
        assert_eq!(adjuster.additional_content_inset(), 10.0);
        assert_eq!(adjuster.global_header_frame().y0, 0.0);
    }

    #[test]
    fn always_mode_header_offsets_by_safe_top() {
        let mut adjuster = header_only(GlobalElementConfig::scrolling(), 0.0);
        adjuster.viewport = adjuster
            .viewport
            .with_safe_area(Insets::new(5.0, 20.0, 5.0, 34.0))
            .with_inset_adjustment(ContentInsetAdjustment::Always);
        assert_eq!(adjuster.additional_content_inset(), 20.0);
        assert_eq!(adjuster.global_header_frame().y0, 0.0);
    }

    #[test]
    fn footer_outside_safe_area_grows_into_bottom_inset() {
        let config = GlobalElementConfig {
            layout_from_safe_area: false,
            ..GlobalElementConfig::scrolling()
        };
        let mut adjuster = footer_only(config, 0.0, 1000.0);
        adjuster.viewport = adjuster.viewport.with_safe_area(Insets::new(0.0, 0.0, 0.0, 34.0));
        // Height 50 + 34; origin 1000 - 84 + 34.
        assert_eq!(adjuster.global_footer_frame(), Rect::new(0.0, 950.0, WIDTH, 1034.0));
    }

    #[test]
    fn pinned_footer_sits_above_bottom_inset() {
        let mut adjuster = footer_only(GlobalElementConfig::default(), 0.0, 1000.0);
        adjuster.viewport = adjuster
            .viewport
            .with_content_inset(Insets::new(0.0, 0.0, 0.0, 30.0));
        // Offset is 480 - 1000 - 30, so the footer ends 30 above the bottom edge.
        assert_eq!(adjuster.global_footer_frame(), Rect::new(0.0, 400.0, WIDTH, 450.0));
    }

    #[test]
    fn scrolling_footer_sits_at_content_end() {
        let adjuster = footer_only(GlobalElementConfig::scrolling(), 0.0, 1000.0);
        assert_eq!(adjuster.global_footer_frame(), Rect::new(0.0, 950.0, WIDTH, 1000.0));
    }

    #[test]
    fn pinned_footer_sticks_to_viewport_bottom() {
        // Content is taller than the viewport: bottom edge at 480.
        let adjuster = footer_only(GlobalElementConfig::default(), 0.0, 1000.0);
        assert_eq!(adjuster.global_footer_frame(), Rect::new(0.0, 430.0, WIDTH, 480.0));
    }

    #[test]
    fn following_footer_stays_with_content() {
        let config = GlobalElementConfig {
            prefers_follow_content: true,
            ..GlobalElementConfig::default()
        };
        // Content reaches below the viewport, so the footer does not pin.
        let adjuster = footer_only(config, 0.0, 1000.0);
        assert_eq!(adjuster.global_footer_frame().y0, 950.0);
        // Content ends above the viewport bottom, so it pins.
        let adjuster = footer_only(config, 0.0, 300.0);
        assert_eq!(adjuster.global_footer_frame().y0, 430.0);
    }

    #[test]
    fn content_pinned_footer_fills_overscroll() {
        let config = GlobalElementConfig {
            pins_to_bounds: false,
            pins_to_content: true,
            ..GlobalElementConfig::default()
        };
        // Scrolled 40 past the end of 1000 points of content.
        let adjuster = footer_only(config, 560.0, 1000.0);
        let frame = adjuster.global_footer_frame();
        assert_eq!(frame.height(), 90.0);
        assert_eq!(frame.y0, 910.0);
    }

    #[test]
    fn items_move_below_header() {
        let config = GlobalElementConfig {
            inset: 8.0,
            ..GlobalElementConfig::default()
        };
        let adjuster = header_only(config, 200.0);
        let raw = LayoutAttributes::item(IndexPath::new(1, 2), Rect::new(0.0, 100.0, 50.0, 150.0));
        let adjusted = adjuster.adjust(raw, |section| {
            assert_eq!(section, 1, "item count requested for wrong section");
            3
        });
        assert_eq!(adjusted.frame, Rect::new(0.0, 152.0, 50.0, 202.0));
        assert!(adjusted.is_last_in_section);
        assert!(!adjusted.is_first_in_section);
        // The caller's copy is untouched.
        assert_eq!(raw.frame.y0, 100.0);
    }

    #[test]
    fn adjust_assigns_z_tier() {
        let adjuster = header_only(GlobalElementConfig::default(), 0.0);
        let mut raw = LayoutAttributes::supplementary(
            ElementKind::SectionHeader,
            IndexPath::section(0),
            Rect::new(0.0, 0.0, WIDTH, 30.0),
        );
        raw.z_index = 7;
        let adjusted = adjuster.adjust(raw, |_| 0);
        assert_eq!(adjusted.z_index, ElementKind::SectionHeader.z_index());
    }
}
