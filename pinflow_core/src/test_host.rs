// Copyright 2026 the Pinflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixture host for unit tests.
//!
//! Each section is laid out as: header, top inset, one item per row, bottom
//! inset, footer. Sections follow each other with no gap.

use alloc::vec::Vec;
use core::cell::Cell;

use kurbo::{Insets, Rect, Size};

use crate::config::{BackgroundLayoutStyle, SectionMetrics};
use crate::element::{ElementKind, IndexPath, LayoutAttributes, intersects};
use crate::host::FlowHost;
use crate::viewport::Viewport;

#[derive(Debug)]
pub(crate) struct FixtureHost {
    pub(crate) counts: Vec<usize>,
    pub(crate) viewport: Viewport,
    pub(crate) header_height: Option<f64>,
    pub(crate) footer_height: Option<f64>,
    pub(crate) background: BackgroundLayoutStyle,
    pub(crate) background_insets: Insets,
    pub(crate) header_queries: Cell<usize>,
    pub(crate) footer_queries: Cell<usize>,
    pub(crate) background_queries: Cell<usize>,
}

impl FixtureHost {
    pub(crate) const WIDTH: f64 = 320.0;
    pub(crate) const HEIGHT: f64 = 480.0;
    pub(crate) const ITEM_HEIGHT: f64 = 50.0;
    pub(crate) const HEADER_HEIGHT: f64 = 30.0;
    pub(crate) const FOOTER_HEIGHT: f64 = 20.0;
    pub(crate) const SECTION_INSET: f64 = 10.0;

    pub(crate) fn new(counts: &[usize]) -> Self {
        Self {
            counts: counts.to_vec(),
            viewport: Viewport::new(Rect::new(0.0, 0.0, Self::WIDTH, Self::HEIGHT)),
            header_height: None,
            footer_height: None,
            background: BackgroundLayoutStyle::None,
            background_insets: Insets::ZERO,
            header_queries: Cell::new(0),
            footer_queries: Cell::new(0),
            background_queries: Cell::new(0),
        }
    }

    pub(crate) fn with_header(mut self, height: f64) -> Self {
        self.header_height = Some(height);
        self
    }

    pub(crate) fn with_footer(mut self, height: f64) -> Self {
        self.footer_height = Some(height);
        self
    }

    pub(crate) fn with_background(mut self, style: BackgroundLayoutStyle) -> Self {
        self.background = style;
        self
    }

    /// Scrolls to `y`, keeping the viewport size.
    pub(crate) fn scroll_to(&mut self, y: f64) {
        let size = self.viewport.bounds.size();
        self.viewport.bounds = Rect::from_origin_size((self.viewport.bounds.x0, y), size);
    }

    fn section_height(&self, section: usize) -> f64 {
        let rows = self.counts[section] as f64;
        Self::HEADER_HEIGHT + 2.0 * Self::SECTION_INSET + rows * Self::ITEM_HEIGHT + Self::FOOTER_HEIGHT
    }

    fn section_top(&self, section: usize) -> f64 {
        (0..section).map(|s| self.section_height(s)).sum()
    }

    pub(crate) fn item_frame(&self, index_path: IndexPath) -> Rect {
        let y = self.section_top(index_path.section)
            + Self::HEADER_HEIGHT
            + Self::SECTION_INSET
            + index_path.item as f64 * Self::ITEM_HEIGHT;
        Rect::new(0.0, y, Self::WIDTH, y + Self::ITEM_HEIGHT)
    }

    fn header_frame(&self, section: usize) -> Rect {
        let y = self.section_top(section);
        Rect::new(0.0, y, Self::WIDTH, y + Self::HEADER_HEIGHT)
    }

    fn footer_frame(&self, section: usize) -> Rect {
        let y = self.section_top(section) + self.section_height(section) - Self::FOOTER_HEIGHT;
        Rect::new(0.0, y, Self::WIDTH, y + Self::FOOTER_HEIGHT)
    }

    fn all_attributes(&self) -> impl Iterator<Item = LayoutAttributes> + '_ {
        (0..self.counts.len()).flat_map(move |section| {
            let index_path = IndexPath::section(section);
            let header = LayoutAttributes::supplementary(
                ElementKind::SectionHeader,
                index_path,
                self.header_frame(section),
            );
            let footer = LayoutAttributes::supplementary(
                ElementKind::SectionFooter,
                index_path,
                self.footer_frame(section),
            );
            let items = (0..self.counts[section]).map(move |item| {
                let index_path = IndexPath::new(section, item);
                LayoutAttributes::item(index_path, self.item_frame(index_path))
            });
            core::iter::once(header).chain(items).chain(core::iter::once(footer))
        })
    }
}

impl FlowHost for FixtureHost {
    fn number_of_sections(&self) -> usize {
        self.counts.len()
    }

    fn number_of_items(&self, section: usize) -> usize {
        self.counts.get(section).copied().unwrap_or(0)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn base_content_size(&self) -> Size {
        let height = (0..self.counts.len()).map(|s| self.section_height(s)).sum();
        Size::new(Self::WIDTH, height)
    }

    fn base_item_attributes(&self, index_path: IndexPath) -> Option<LayoutAttributes> {
        (index_path.item < self.number_of_items(index_path.section))
            .then(|| LayoutAttributes::item(index_path, self.item_frame(index_path)))
    }

    fn base_supplementary_attributes(
        &self,
        kind: ElementKind,
        index_path: IndexPath,
    ) -> Option<LayoutAttributes> {
        if index_path.section >= self.counts.len() {
            return None;
        }
        let frame = match kind {
            ElementKind::SectionHeader => self.header_frame(index_path.section),
            ElementKind::SectionFooter => self.footer_frame(index_path.section),
            _ => return None,
        };
        Some(LayoutAttributes::supplementary(kind, index_path, frame))
    }

    fn base_attributes_in(&self, rect: Rect) -> Vec<LayoutAttributes> {
        self.all_attributes()
            .filter(|attributes| intersects(attributes.frame, rect))
            .collect()
    }

    fn global_header_height(&self) -> Option<f64> {
        self.header_queries.set(self.header_queries.get() + 1);
        self.header_height
    }

    fn global_footer_height(&self) -> Option<f64> {
        self.footer_queries.set(self.footer_queries.get() + 1);
        self.footer_height
    }

    fn background_style(&self, section: usize) -> BackgroundLayoutStyle {
        self.background_queries.set(self.background_queries.get() + 1);
        _ = section;
        self.background
    }

    fn background_insets(&self, section: usize) -> Insets {
        _ = section;
        self.background_insets
    }

    fn section_metrics(&self, section: usize) -> SectionMetrics {
        _ = section;
        SectionMetrics {
            insets: Insets::new(0.0, Self::SECTION_INSET, 0.0, Self::SECTION_INSET),
            interitem_spacing: 0.0,
            line_spacing: 0.0,
        }
    }
}
