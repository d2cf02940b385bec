// Copyright 2026 the Pinflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batched invalidation requests.
//!
//! An [`InvalidationContext`] accumulates everything a client (or the engine
//! itself, in response to a bounds change) wants recomputed before the next
//! read. Requests only ever accumulate: a flag that has been set cannot be
//! cleared on the same context, and setting a composite flag also sets every
//! flag it implies.
//!
//! # Implications
//!
//! ```text
//!   GLOBAL_HEADER ──► GLOBAL_HEADER_METRICS ──► GLOBAL_HEADER_ATTRIBUTES
//!   GLOBAL_FOOTER ──► GLOBAL_FOOTER_METRICS ──► GLOBAL_FOOTER_ATTRIBUTES
//!   BASE_METRICS  ──► BASE_ATTRIBUTES
//! ```
//!
//! [`EVERYTHING`](InvalidationFlags::EVERYTHING) overrides every query: a
//! context that invalidates everything reports every flag as set.

use alloc::collections::{BTreeMap, BTreeSet};
use core::fmt;

use crate::element::{ElementKind, IndexPath};

bitflags::bitflags! {
    /// Named invalidation flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InvalidationFlags: u16 {
        /// Drop every cache.
        const EVERYTHING = 1 << 0;
        /// Section or item counts changed.
        const DATA_SOURCE_COUNTS = 1 << 1;
        /// The base layout must reposition its elements.
        const BASE_ATTRIBUTES = 1 << 2;
        /// The base layout must re-query sizes and spacing from its delegate.
        const BASE_METRICS = 1 << 3;
        /// Reposition the global header.
        const GLOBAL_HEADER_ATTRIBUTES = 1 << 4;
        /// Re-query the global header's size and reposition it.
        const GLOBAL_HEADER_METRICS = 1 << 5;
        /// Drop every cached value of the global header.
        const GLOBAL_HEADER = 1 << 6;
        /// Reposition the global footer.
        const GLOBAL_FOOTER_ATTRIBUTES = 1 << 7;
        /// Re-query the global footer's size and reposition it.
        const GLOBAL_FOOTER_METRICS = 1 << 8;
        /// Drop every cached value of the global footer.
        const GLOBAL_FOOTER = 1 << 9;
        /// Drop every cached section background.
        const BACKGROUNDS = 1 << 10;
    }
}

impl InvalidationFlags {
    /// Returns `self` together with every flag it implies.
    #[must_use]
    pub const fn implied(self) -> Self {
        let mut bits = self.bits();
        if bits & Self::GLOBAL_HEADER.bits() != 0 {
            bits |= Self::GLOBAL_HEADER_METRICS.bits();
        }
        if bits & Self::GLOBAL_HEADER_METRICS.bits() != 0 {
            bits |= Self::GLOBAL_HEADER_ATTRIBUTES.bits();
        }
        if bits & Self::GLOBAL_FOOTER.bits() != 0 {
            bits |= Self::GLOBAL_FOOTER_METRICS.bits();
        }
        if bits & Self::GLOBAL_FOOTER_METRICS.bits() != 0 {
            bits |= Self::GLOBAL_FOOTER_ATTRIBUTES.bits();
        }
        if bits & Self::BASE_METRICS.bits() != 0 {
            bits |= Self::BASE_ATTRIBUTES.bits();
        }
        Self::from_bits_retain(bits)
    }
}

/// A cumulative set of invalidation requests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvalidationContext {
    flags: InvalidationFlags,
    items: BTreeSet<IndexPath>,
    supplementary: BTreeMap<ElementKind, BTreeSet<IndexPath>>,
}

impl InvalidationContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that invalidates everything.
    #[must_use]
    pub fn everything() -> Self {
        let mut ctx = Self::new();
        ctx.insert(InvalidationFlags::EVERYTHING);
        ctx
    }

    /// Sets `flags` and everything they imply.
    pub fn insert(&mut self, flags: InvalidationFlags) {
        let flags = flags.implied();
        if flags.contains(InvalidationFlags::GLOBAL_HEADER) {
            self.record_supplementary(ElementKind::GlobalHeader, IndexPath::GLOBAL);
        }
        if flags.contains(InvalidationFlags::GLOBAL_FOOTER) {
            self.record_supplementary(ElementKind::GlobalFooter, IndexPath::GLOBAL);
        }
        self.flags |= flags;
    }

    /// Sets `flags` when `value` is true. Passing `false` does nothing:
    /// requests cannot be retracted.
    pub fn set(&mut self, flags: InvalidationFlags, value: bool) {
        if value {
            self.insert(flags);
        }
    }

    /// Whether every flag in `flags` is set, either directly, by implication,
    /// or because the context invalidates everything.
    #[must_use]
    pub fn contains(&self, flags: InvalidationFlags) -> bool {
        self.invalidates_everything() || self.flags.contains(flags)
    }

    /// Whether any flag in `flags` is set.
    #[must_use]
    pub fn intersects(&self, flags: InvalidationFlags) -> bool {
        self.invalidates_everything() || self.flags.intersects(flags)
    }

    /// The effective flag set.
    #[must_use]
    pub fn flags(&self) -> InvalidationFlags {
        if self.invalidates_everything() {
            InvalidationFlags::all()
        } else {
            self.flags
        }
    }

    /// Whether this context drops every cache.
    #[inline]
    #[must_use]
    pub fn invalidates_everything(&self) -> bool {
        self.flags.contains(InvalidationFlags::EVERYTHING)
    }

    /// Requests that every cache be dropped.
    pub fn invalidate_everything(&mut self) {
        self.insert(InvalidationFlags::EVERYTHING);
    }

    /// Requests that every cached value of the global header be dropped.
    pub fn invalidate_global_header(&mut self) {
        self.insert(InvalidationFlags::GLOBAL_HEADER);
    }

    /// Requests that every cached value of the global footer be dropped.
    pub fn invalidate_global_footer(&mut self) {
        self.insert(InvalidationFlags::GLOBAL_FOOTER);
    }

    /// Marks items as invalid.
    pub fn invalidate_items(&mut self, index_paths: impl IntoIterator<Item = IndexPath>) {
        self.items.extend(index_paths);
    }

    /// Marks supplementary elements of `kind` as invalid.
    ///
    /// Passing [`ElementKind::Item`] is the same as calling
    /// [`invalidate_items`](Self::invalidate_items).
    pub fn invalidate_supplementary(
        &mut self,
        kind: ElementKind,
        index_paths: impl IntoIterator<Item = IndexPath>,
    ) {
        if kind == ElementKind::Item {
            self.invalidate_items(index_paths);
            return;
        }
        self.supplementary.entry(kind).or_default().extend(index_paths);
    }

    /// Marks the background of `section` as invalid.
    pub fn invalidate_background(&mut self, section: usize) {
        self.record_supplementary(ElementKind::SectionBackground, IndexPath::section(section));
    }

    /// Items marked invalid.
    #[must_use]
    pub fn invalidated_items(&self) -> &BTreeSet<IndexPath> {
        &self.items
    }

    /// Supplementary elements of `kind` marked invalid.
    #[must_use]
    pub fn invalidated_supplementary(&self, kind: ElementKind) -> Option<&BTreeSet<IndexPath>> {
        self.supplementary.get(&kind)
    }

    /// Sections touched by any invalidated item, section header, section
    /// footer, or section background.
    #[must_use]
    pub fn invalidated_sections(&self) -> BTreeSet<usize> {
        let supplementary = [
            ElementKind::SectionHeader,
            ElementKind::SectionFooter,
            ElementKind::SectionBackground,
        ]
        .into_iter()
        .filter_map(|kind| self.supplementary.get(&kind))
        .flatten();

        self.items
            .iter()
            .chain(supplementary)
            .map(|index_path| index_path.section)
            .collect()
    }

    /// Folds every request of `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        self.flags |= other.flags;
        self.items.extend(other.items.iter().copied());
        for (kind, paths) in &other.supplementary {
            self.supplementary
                .entry(*kind)
                .or_default()
                .extend(paths.iter().copied());
        }
    }

    /// Whether this context requests nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.items.is_empty() && self.supplementary.is_empty()
    }

    fn record_supplementary(&mut self, kind: ElementKind, index_path: IndexPath) {
        self.supplementary.entry(kind).or_default().insert(index_path);
    }
}

impl fmt::Display for InvalidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const ROWS: [(&str, InvalidationFlags); 10] = [
            ("data source", InvalidationFlags::DATA_SOURCE_COUNTS),
            ("global header", InvalidationFlags::GLOBAL_HEADER),
            ("global header metrics", InvalidationFlags::GLOBAL_HEADER_METRICS),
            ("global header attributes", InvalidationFlags::GLOBAL_HEADER_ATTRIBUTES),
            ("global footer", InvalidationFlags::GLOBAL_FOOTER),
            ("global footer metrics", InvalidationFlags::GLOBAL_FOOTER_METRICS),
            ("global footer attributes", InvalidationFlags::GLOBAL_FOOTER_ATTRIBUTES),
            ("all backgrounds", InvalidationFlags::BACKGROUNDS),
            ("all attributes", InvalidationFlags::BASE_ATTRIBUTES),
            ("all metrics", InvalidationFlags::BASE_METRICS),
        ];

        writeln!(f, "everything: {}", self.invalidates_everything())?;
        for (label, flag) in ROWS {
            writeln!(f, "{label}: {}", self.contains(flag))?;
        }
        writeln!(f, "items: {:?}", self.items)?;
        write!(f, "supplementary: {{")?;
        for (i, (kind, paths)) in self.supplementary.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {paths:?}", kind.name())?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    #[test]
    fn metrics_imply_attributes() {
        let mut ctx = InvalidationContext::new();
        ctx.insert(InvalidationFlags::GLOBAL_HEADER_METRICS);
        assert!(ctx.contains(InvalidationFlags::GLOBAL_HEADER_ATTRIBUTES));
        assert!(!ctx.contains(InvalidationFlags::GLOBAL_HEADER));
        assert!(!ctx.contains(InvalidationFlags::GLOBAL_FOOTER_ATTRIBUTES));
    }

    #[test]
    fn whole_element_implies_metrics_and_attributes() {
        let mut ctx = InvalidationContext::new();
        ctx.invalidate_global_footer();
        assert!(ctx.contains(
            InvalidationFlags::GLOBAL_FOOTER_METRICS | InvalidationFlags::GLOBAL_FOOTER_ATTRIBUTES
        ));
        let footers = ctx.invalidated_supplementary(ElementKind::GlobalFooter);
        assert!(footers.is_some_and(|paths| paths.contains(&IndexPath::GLOBAL)));
    }

    #[test]
    fn flags_are_monotonic() {
        let mut ctx = InvalidationContext::new();
        ctx.set(InvalidationFlags::BACKGROUNDS, true);
        ctx.set(InvalidationFlags::BACKGROUNDS, false);
        ctx.set(InvalidationFlags::BASE_METRICS, false);
        assert!(ctx.contains(InvalidationFlags::BACKGROUNDS));
        assert!(!ctx.contains(InvalidationFlags::BASE_METRICS));

        let other = InvalidationContext::new();
        ctx.merge(&other);
        assert!(ctx.contains(InvalidationFlags::BACKGROUNDS));
    }

    #[test]
    fn everything_overrides_every_query() {
        let ctx = InvalidationContext::everything();
        assert!(ctx.contains(InvalidationFlags::all()));
        assert!(ctx.contains(InvalidationFlags::GLOBAL_FOOTER_ATTRIBUTES));
        assert_eq!(ctx.flags(), InvalidationFlags::all());
    }

    #[test]
    fn invalidated_sections_union() {
        let mut ctx = InvalidationContext::new();
        ctx.invalidate_items(vec![IndexPath::new(4, 2), IndexPath::new(4, 3)]);
        ctx.invalidate_supplementary(ElementKind::SectionHeader, [IndexPath::section(1)]);
        ctx.invalidate_supplementary(ElementKind::SectionFooter, [IndexPath::section(7)]);
        ctx.invalidate_background(2);
        // Global elements do not belong to a section.
        ctx.invalidate_global_header();

        let sections: alloc::vec::Vec<usize> = ctx.invalidated_sections().into_iter().collect();
        assert_eq!(sections, [1, 2, 4, 7]);
    }

    #[test]
    fn item_kind_routes_to_items() {
        let mut ctx = InvalidationContext::new();
        ctx.invalidate_supplementary(ElementKind::Item, [IndexPath::new(3, 0)]);
        assert!(ctx.invalidated_items().contains(&IndexPath::new(3, 0)));
        assert!(ctx.invalidated_supplementary(ElementKind::Item).is_none());
    }

    #[test]
    fn display_lists_flags() {
        let mut ctx = InvalidationContext::new();
        ctx.insert(InvalidationFlags::BACKGROUNDS);
        ctx.invalidate_background(3);
        let text = ctx.to_string();
        assert!(text.contains("all backgrounds: true"), "got: {text}");
        assert!(text.contains("background: {[3, 0]}"), "got: {text}");
    }
}
