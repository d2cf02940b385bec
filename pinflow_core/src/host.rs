// Copyright 2026 the Pinflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract.
//!
//! Pinflow does not lay out items itself. The *host* (the grid/list
//! component together with its data source, delegate, and base flow
//! layout) owns:
//!
//! - **Data**: the number of sections and the number of items per section.
//! - **Base geometry**: raw frames for items and section headers/footers as
//!   produced by the base flow algorithm, in unshifted layout coordinates.
//! - **Viewport**: bounds, scroll offset, safe area, and content insets.
//! - **Delegate answers**: global header/footer heights, background style
//!   and insets, and per-section metrics. Every delegate method has a
//!   default that means "feature absent".
//!
//! The engine only reads from the host. It is passed into each engine call
//! rather than stored, so the engine holds no back-reference to its owner.
//!
//! # Call sequence
//!
//! ```rust,ignore
//! fn on_scroll(engine: &mut LayoutEngine, host: &MyHost, new_bounds: Rect) {
//!     if engine.should_invalidate_for_bounds_change(host, new_bounds) {
//!         let ctx = engine.invalidation_context_for_bounds_change(host, new_bounds);
//!         engine.invalidate(&ctx);
//!     }
//!     host.set_bounds(new_bounds);
//!     let visible = engine.attributes_in_rect(host, new_bounds);
//!     // hand `visible` to the view layer
//! }
//! ```

use alloc::vec::Vec;

use kurbo::{Insets, Rect, Size};

use crate::config::{BackgroundLayoutStyle, SectionMetrics};
use crate::element::{ElementKind, IndexPath, LayoutAttributes};
use crate::viewport::Viewport;

/// Read-only access to the host component, its data source and delegate.
pub trait FlowHost {
    /// Number of sections.
    fn number_of_sections(&self) -> usize;

    /// Number of items in `section`.
    fn number_of_items(&self, section: usize) -> usize;

    /// Current viewport state.
    fn viewport(&self) -> Viewport;

    /// Size of the content laid out by the base flow algorithm.
    fn base_content_size(&self) -> Size;

    /// Raw attributes for the item at `index_path`.
    fn base_item_attributes(&self, index_path: IndexPath) -> Option<LayoutAttributes>;

    /// Raw attributes for a section header or footer.
    ///
    /// Only called with [`ElementKind::SectionHeader`] or
    /// [`ElementKind::SectionFooter`].
    fn base_supplementary_attributes(
        &self,
        kind: ElementKind,
        index_path: IndexPath,
    ) -> Option<LayoutAttributes>;

    /// Raw attributes of every item, section header and section footer whose
    /// frame intersects `rect`.
    fn base_attributes_in(&self, rect: Rect) -> Vec<LayoutAttributes>;

    /// Height of the global header. `None` or zero hides it.
    fn global_header_height(&self) -> Option<f64> {
        None
    }

    /// Height of the global footer. `None` or zero hides it.
    fn global_footer_height(&self) -> Option<f64> {
        None
    }

    /// Background style for `section`.
    fn background_style(&self, section: usize) -> BackgroundLayoutStyle {
        _ = section;
        BackgroundLayoutStyle::None
    }

    /// Insets applied inwards to the background of `section`.
    fn background_insets(&self, section: usize) -> Insets {
        _ = section;
        Insets::ZERO
    }

    /// Spacing overrides for `section`.
    ///
    /// Only the insets reach the engine, through section backgrounds.
    fn section_metrics(&self, section: usize) -> SectionMetrics {
        _ = section;
        SectionMetrics::default()
    }
}
