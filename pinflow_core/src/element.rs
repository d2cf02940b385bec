// Copyright 2026 the Pinflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positioned element model.
//!
//! Every element the engine hands back to the host is a [`LayoutAttributes`]
//! value: a kind, an [`IndexPath`], a frame in layout coordinates, a stacking
//! order and, for items, whether the item opens or closes its section.
//!
//! Attributes are plain `Copy` values. Handing one to a caller can never alias
//! the engine's cached state, so callers are free to mutate what they receive.

use core::fmt;

use kurbo::Rect;

/// Addresses an element by section and item.
///
/// Supplementary elements use `item == 0`. Global elements always live at
/// [`IndexPath::GLOBAL`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct IndexPath {
    /// Section index.
    pub section: usize,
    /// Item index within the section.
    pub item: usize,
}

impl IndexPath {
    /// The index path used by the global header and global footer.
    pub const GLOBAL: Self = Self::new(0, 0);

    /// Creates an index path.
    #[inline]
    #[must_use]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }

    /// The index path used by supplementary elements of `section`.
    #[inline]
    #[must_use]
    pub const fn section(section: usize) -> Self {
        Self::new(section, 0)
    }
}

impl fmt::Debug for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

/// The kind of a positioned element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementKind {
    /// A regular item (cell).
    Item,
    /// A per-section header produced by the base layout.
    SectionHeader,
    /// A per-section footer produced by the base layout.
    SectionFooter,
    /// The full-width header placed above all sections.
    GlobalHeader,
    /// The full-width footer placed below all sections.
    GlobalFooter,
    /// A decorative rectangle drawn behind one section.
    SectionBackground,
}

impl ElementKind {
    /// Stacking order for elements of this kind. Lower values render behind.
    #[must_use]
    pub const fn z_index(self) -> i32 {
        match self {
            Self::SectionBackground => ZIndex::BACKGROUND,
            Self::Item => ZIndex::ITEM,
            Self::SectionFooter => ZIndex::SECTION_FOOTER,
            Self::SectionHeader => ZIndex::SECTION_HEADER,
            Self::GlobalFooter => ZIndex::GLOBAL_FOOTER,
            Self::GlobalHeader => ZIndex::GLOBAL_HEADER,
        }
    }

    /// Whether this kind is a global element (header or footer).
    #[inline]
    #[must_use]
    pub const fn is_global(self) -> bool {
        matches!(self, Self::GlobalHeader | Self::GlobalFooter)
    }

    /// Whether this kind is a supplementary element (anything but an item).
    #[inline]
    #[must_use]
    pub const fn is_supplementary(self) -> bool {
        !matches!(self, Self::Item)
    }

    /// Short lowercase name, used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::SectionHeader => "section-header",
            Self::SectionFooter => "section-footer",
            Self::GlobalHeader => "global-header",
            Self::GlobalFooter => "global-footer",
            Self::SectionBackground => "background",
        }
    }
}

/// Fixed stacking tiers.
#[derive(Clone, Copy, Debug)]
pub struct ZIndex;

impl ZIndex {
    /// Section backgrounds.
    pub const BACKGROUND: i32 = -100;
    /// Items.
    pub const ITEM: i32 = 0;
    /// Section footers.
    pub const SECTION_FOOTER: i32 = 100;
    /// Section headers.
    pub const SECTION_HEADER: i32 = 200;
    /// The global footer.
    pub const GLOBAL_FOOTER: i32 = 300;
    /// The global header.
    pub const GLOBAL_HEADER: i32 = 400;
}

/// Geometry and metadata for one positioned element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutAttributes {
    /// What this element is.
    pub kind: ElementKind,
    /// Where this element lives.
    pub index_path: IndexPath,
    /// Frame in layout coordinates.
    pub frame: Rect,
    /// Stacking order; see [`ZIndex`].
    pub z_index: i32,
    /// For items: whether this is the first item of its section.
    pub is_first_in_section: bool,
    /// For items: whether this is the last item of its section.
    pub is_last_in_section: bool,
}

impl LayoutAttributes {
    /// Creates attributes with the default stacking tier for `kind`.
    #[must_use]
    pub const fn new(kind: ElementKind, index_path: IndexPath, frame: Rect) -> Self {
        Self {
            kind,
            index_path,
            frame,
            z_index: kind.z_index(),
            is_first_in_section: false,
            is_last_in_section: false,
        }
    }

    /// Creates item attributes.
    #[must_use]
    pub const fn item(index_path: IndexPath, frame: Rect) -> Self {
        Self::new(ElementKind::Item, index_path, frame)
    }

    /// Creates supplementary attributes for `kind` at `index_path`.
    #[must_use]
    pub const fn supplementary(kind: ElementKind, index_path: IndexPath, frame: Rect) -> Self {
        Self::new(kind, index_path, frame)
    }

    /// Updates the first/last-in-section markers from the section's item count.
    pub fn mark_section_position(&mut self, items_in_section: usize) {
        self.is_first_in_section = self.index_path.item == 0;
        self.is_last_in_section = items_in_section > 0 && self.index_path.item == items_in_section - 1;
    }
}

/// Returns whether two rectangles share a non-empty area.
#[inline]
#[must_use]
pub(crate) fn intersects(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}
