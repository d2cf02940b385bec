// Copyright 2026 the Pinflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Section background geometry.

use kurbo::{Insets, Rect};

use crate::config::BackgroundLayoutStyle;
use crate::element::{ElementKind, IndexPath, LayoutAttributes};
use crate::host::FlowHost;

/// Raw geometry a background is anchored to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionAnchors {
    /// Raw frame of the section's first item.
    pub first_item: Rect,
    /// Raw frame of the section's last item.
    pub last_item: Rect,
    /// Height of the section header, or zero.
    pub header_height: f64,
    /// Height of the section footer, or zero.
    pub footer_height: f64,
    /// The section's insets.
    pub section_insets: Insets,
}

/// Computes a background rectangle spanning `width` horizontally.
///
/// `extra_insets` contract the result as a final step. Returns `None` for
/// [`BackgroundLayoutStyle::None`].
#[must_use]
pub fn background_frame(
    style: BackgroundLayoutStyle,
    anchors: &SectionAnchors,
    width: f64,
    extra_insets: Insets,
) -> Option<Rect> {
    let insets = anchors.section_insets;
    let (above, below) = match style {
        BackgroundLayoutStyle::None => return None,
        BackgroundLayoutStyle::OuterBounds => (
            anchors.header_height + insets.y0,
            anchors.footer_height + insets.y1,
        ),
        BackgroundLayoutStyle::InnerBounds => (insets.y0, insets.y1),
    };

    let y0 = anchors.first_item.y0 - above;
    let y1 = anchors.last_item.y1 + below;
    Some(Rect::new(
        extra_insets.x0,
        y0 + extra_insets.y0,
        width - extra_insets.x1,
        y1 - extra_insets.y1,
    ))
}

/// Builds raw background attributes for `section` from host geometry.
///
/// Returns `None` when the style is [`BackgroundLayoutStyle::None`], the
/// section is empty, or the host has no geometry for its first or last item.
#[must_use]
pub fn section_background<H: FlowHost + ?Sized>(
    host: &H,
    section: usize,
    item_count: usize,
    style: BackgroundLayoutStyle,
    extra_insets: Insets,
) -> Option<LayoutAttributes> {
    if style == BackgroundLayoutStyle::None {
        return None;
    }
    let last = item_count.checked_sub(1)?;
    let first_item = host.base_item_attributes(IndexPath::new(section, 0))?.frame;
    let last_item = host.base_item_attributes(IndexPath::new(section, last))?.frame;

    let index_path = IndexPath::section(section);
    let height_of = |kind| {
        host.base_supplementary_attributes(kind, index_path)
            .map_or(0.0, |attributes| attributes.frame.height())
    };
    let anchors = SectionAnchors {
        first_item,
        last_item,
        header_height: height_of(ElementKind::SectionHeader),
        footer_height: height_of(ElementKind::SectionFooter),
        section_insets: host.section_metrics(section).insets,
    };

    let width = host.viewport().bounds.width();
    let frame = background_frame(style, &anchors, width, extra_insets)?;
    Some(LayoutAttributes::supplementary(
        ElementKind::SectionBackground,
        index_path,
        frame,
    ))
}
