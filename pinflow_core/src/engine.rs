// Copyright 2026 the Pinflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layout engine.
//!
//! [`LayoutEngine`] owns every cache Pinflow keeps: the global header and
//! footer sizes and raw attributes, and one background per section. Each
//! entry is either absent or cached.
//!
//! - **absent → cached** happens in [`prepare`](LayoutEngine::prepare),
//!   which every query runs first.
//! - **cached → absent** happens in [`invalidate`](LayoutEngine::invalidate)
//!   when the matching flag is set, or for every entry when the context
//!   invalidates everything.
//!
//! Invalidating any section drops the background of that section and every
//! later section. The cascade is driven by a [`DirtyTracker`] in which each
//! section depends on the one before it; see [`dirty`](crate::dirty).

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Rect, Size, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use crate::adjust::Adjuster;
use crate::background::section_background;
use crate::config::{ConfigError, GlobalElementConfig};
use crate::dirty;
use crate::element::{ElementKind, IndexPath, LayoutAttributes, intersects};
use crate::host::FlowHost;
use crate::invalidation::{InvalidationContext, InvalidationFlags};
use crate::trace::{
    BoundsChangeEvent, CacheChange, CacheEntry, CacheEvent, InvalidateEvent, PrepareEvent,
    QueryEvent, TraceSink, Tracer,
};

/// A change to the host's data, reported after it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Update {
    /// Items were inserted at these index paths.
    InsertItems(Vec<IndexPath>),
    /// Items were deleted from these index paths.
    DeleteItems(Vec<IndexPath>),
    /// Items at these index paths changed content.
    ReloadItems(Vec<IndexPath>),
    /// A section was inserted at this index.
    InsertSection(usize),
    /// The section at this index was deleted.
    DeleteSection(usize),
    /// The section at this index changed content.
    ReloadSection(usize),
    /// An item moved.
    MoveItem {
        /// Index path before the move.
        from: IndexPath,
        /// Index path after the move.
        to: IndexPath,
    },
}

impl Update {
    /// Whether this update changes item or section counts.
    #[must_use]
    pub fn changes_counts(&self) -> bool {
        matches!(
            self,
            Self::InsertItems(_)
                | Self::DeleteItems(_)
                | Self::InsertSection(_)
                | Self::DeleteSection(_)
        )
    }
}

/// Positions global headers, global footers and section backgrounds over a
/// host's base flow layout.
pub struct LayoutEngine {
    header_config: GlobalElementConfig,
    footer_config: GlobalElementConfig,
    header_size: Option<Size>,
    header_attributes: Option<LayoutAttributes>,
    footer_size: Option<Size>,
    footer_attributes: Option<LayoutAttributes>,
    backgrounds: BTreeMap<usize, LayoutAttributes>,
    /// Sections chained in the `BACKGROUND` channel.
    dirty: DirtyTracker<usize>,
    linked_sections: usize,
    section_headers_pin_to_visible_bounds: bool,
    section_footers_pin_to_visible_bounds: bool,
    sink: Option<Box<dyn TraceSink>>,
}

impl fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("header_config", &self.header_config)
            .field("footer_config", &self.footer_config)
            .field("header_size", &self.header_size)
            .field("footer_size", &self.footer_size)
            .field("backgrounds", &self.backgrounds.len())
            .field("linked_sections", &self.linked_sections)
            .finish_non_exhaustive()
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

const fn filled(entry: CacheEntry) -> CacheEvent {
    CacheEvent {
        entry,
        change: CacheChange::Filled,
    }
}

const fn cleared(entry: CacheEntry) -> CacheEvent {
    CacheEvent {
        entry,
        change: CacheChange::Cleared,
    }
}

fn height_of(size: Option<Size>) -> f64 {
    size.map_or(0.0, |size| size.height)
}

impl LayoutEngine {
    /// Creates an engine with default global element configurations and
    /// empty caches.
    #[must_use]
    pub fn new() -> Self {
        Self {
            header_config: GlobalElementConfig::default(),
            footer_config: GlobalElementConfig::default(),
            header_size: None,
            header_attributes: None,
            footer_size: None,
            footer_attributes: None,
            backgrounds: BTreeMap::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            linked_sections: 0,
            section_headers_pin_to_visible_bounds: false,
            section_footers_pin_to_visible_bounds: false,
            sink: None,
        }
    }

    fn tracer(sink: &mut Option<Box<dyn TraceSink>>) -> Tracer<'_> {
        match sink {
            Some(sink) => Tracer::new(&mut **sink),
            None => Tracer::none(),
        }
    }

    // ---------------------------------------------------------------------------
    // Configuration
    // ---------------------------------------------------------------------------

    /// Installs a trace sink, replacing any previous one.
    ///
    /// Events are only delivered when the `trace` feature is enabled.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.sink = Some(sink);
    }

    /// Removes and returns the installed trace sink.
    pub fn take_trace_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        self.sink.take()
    }

    /// Global header configuration.
    #[must_use]
    pub fn global_header_config(&self) -> GlobalElementConfig {
        self.header_config
    }

    /// Global footer configuration.
    #[must_use]
    pub fn global_footer_config(&self) -> GlobalElementConfig {
        self.footer_config
    }

    /// Replaces the global header configuration.
    ///
    /// A changed configuration invalidates the whole global header.
    pub fn set_global_header_config(
        &mut self,
        config: GlobalElementConfig,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        if self.header_config != config {
            self.header_config = config;
            let mut ctx = InvalidationContext::new();
            ctx.invalidate_global_header();
            self.invalidate(&ctx);
        }
        Ok(())
    }

    /// Replaces the global footer configuration.
    ///
    /// A changed configuration invalidates the whole global footer.
    pub fn set_global_footer_config(
        &mut self,
        config: GlobalElementConfig,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        if self.footer_config != config {
            self.footer_config = config;
            let mut ctx = InvalidationContext::new();
            ctx.invalidate_global_footer();
            self.invalidate(&ctx);
        }
        Ok(())
    }

    /// Whether the base layout pins section headers to the visible bounds.
    #[must_use]
    pub fn section_headers_pin_to_visible_bounds(&self) -> bool {
        self.section_headers_pin_to_visible_bounds
    }

    /// Tells the engine the base layout pins section headers.
    pub fn set_section_headers_pin_to_visible_bounds(&mut self, pins: bool) {
        self.section_headers_pin_to_visible_bounds = pins;
    }

    /// Whether the base layout pins section footers to the visible bounds.
    #[must_use]
    pub fn section_footers_pin_to_visible_bounds(&self) -> bool {
        self.section_footers_pin_to_visible_bounds
    }

    /// Tells the engine the base layout pins section footers.
    pub fn set_section_footers_pin_to_visible_bounds(&mut self, pins: bool) {
        self.section_footers_pin_to_visible_bounds = pins;
    }

    // ---------------------------------------------------------------------------
    // Cache inspection
    // ---------------------------------------------------------------------------

    /// Cached global header size, if any.
    #[must_use]
    pub fn cached_header_size(&self) -> Option<Size> {
        self.header_size
    }

    /// Cached global footer size, if any.
    #[must_use]
    pub fn cached_footer_size(&self) -> Option<Size> {
        self.footer_size
    }

    /// Cached raw global header attributes, if any.
    #[must_use]
    pub fn cached_header_attributes(&self) -> Option<LayoutAttributes> {
        self.header_attributes
    }

    /// Cached raw global footer attributes, if any.
    #[must_use]
    pub fn cached_footer_attributes(&self) -> Option<LayoutAttributes> {
        self.footer_attributes
    }

    /// Sections that currently have a cached background, ascending.
    pub fn cached_background_sections(&self) -> impl Iterator<Item = usize> + '_ {
        self.backgrounds.keys().copied()
    }

    // ---------------------------------------------------------------------------
    // Prepare
    // ---------------------------------------------------------------------------

    /// Fills every absent cache entry the host can supply.
    ///
    /// Queries call this first, so hosts rarely need to.
    pub fn prepare<H: FlowHost + ?Sized>(&mut self, host: &H) {
        let mut tracer = Self::tracer(&mut self.sink);
        let viewport = host.viewport();
        let width = viewport.bounds.width();
        let mut any_filled = false;

        if self.header_size.is_none()
            && let Some(height) = host.global_header_height().filter(|h| *h > 0.0)
        {
            self.header_size = Some(Size::new(width, height));
            tracer.cache(&filled(CacheEntry::GlobalHeaderSize));
            any_filled = true;
        }
        if self.header_attributes.is_none()
            && let Some(size) = self.header_size
        {
            let frame = Rect::from_origin_size(Point::ZERO, size);
            self.header_attributes = Some(LayoutAttributes::supplementary(
                ElementKind::GlobalHeader,
                IndexPath::GLOBAL,
                frame,
            ));
            tracer.cache(&filled(CacheEntry::GlobalHeaderAttributes));
            any_filled = true;
        }

        if self.footer_size.is_none()
            && let Some(height) = host.global_footer_height().filter(|h| *h > 0.0)
        {
            self.footer_size = Some(Size::new(width, height));
            tracer.cache(&filled(CacheEntry::GlobalFooterSize));
            any_filled = true;
        }
        if self.footer_attributes.is_none()
            && let Some(size) = self.footer_size
        {
            let content_height = host.base_content_size().height
                + height_of(self.header_size)
                + size.height;
            let y = viewport.bounds.max_y().max(content_height) - size.height;
            let frame = Rect::from_origin_size(Point::new(0.0, y), size);
            self.footer_attributes = Some(LayoutAttributes::supplementary(
                ElementKind::GlobalFooter,
                IndexPath::GLOBAL,
                frame,
            ));
            tracer.cache(&filled(CacheEntry::GlobalFooterAttributes));
            any_filled = true;
        }

        let sections = host.number_of_sections();
        while self.linked_sections < sections {
            let section = self.linked_sections;
            if section > 0 {
                let _ = self
                    .dirty
                    .add_dependency(section, section - 1, dirty::BACKGROUND);
            }
            self.linked_sections += 1;
        }
        while self.linked_sections > sections {
            self.linked_sections -= 1;
            self.dirty.remove_key(self.linked_sections);
        }
        for section in self.backgrounds.split_off(&sections).into_keys() {
            tracer.cache(&cleared(CacheEntry::Background(section)));
        }

        let mut backgrounds_computed = 0;
        for section in 0..sections {
            if self.backgrounds.contains_key(&section) {
                continue;
            }
            let style = host.background_style(section);
            let count = host.number_of_items(section);
            let insets = host.background_insets(section);
            if let Some(background) = section_background(host, section, count, style, insets) {
                self.backgrounds.insert(section, background);
                tracer.cache(&filled(CacheEntry::Background(section)));
                backgrounds_computed += 1;
            }
        }

        if any_filled || backgrounds_computed > 0 {
            tracer.prepare(&PrepareEvent {
                sections,
                backgrounds_computed,
            });
        }
    }

    // ---------------------------------------------------------------------------
    // Invalidation
    // ---------------------------------------------------------------------------

    /// Applies `context`, dropping every cache entry it covers.
    ///
    /// The caches are cleared before this returns; the next query recomputes
    /// them.
    pub fn invalidate(&mut self, context: &InvalidationContext) {
        let mut tracer = Self::tracer(&mut self.sink);
        let flags = context.flags();
        let sections = context.invalidated_sections();

        if flags.contains(InvalidationFlags::GLOBAL_HEADER_METRICS)
            && self.header_size.take().is_some()
        {
            tracer.cache(&cleared(CacheEntry::GlobalHeaderSize));
        }
        if flags.contains(InvalidationFlags::GLOBAL_HEADER_ATTRIBUTES)
            && self.header_attributes.take().is_some()
        {
            tracer.cache(&cleared(CacheEntry::GlobalHeaderAttributes));
        }
        if flags.contains(InvalidationFlags::GLOBAL_FOOTER_METRICS)
            && self.footer_size.take().is_some()
        {
            tracer.cache(&cleared(CacheEntry::GlobalFooterSize));
        }
        if flags.contains(InvalidationFlags::GLOBAL_FOOTER_ATTRIBUTES)
            && self.footer_attributes.take().is_some()
        {
            tracer.cache(&cleared(CacheEntry::GlobalFooterAttributes));
        }

        let mut backgrounds_dropped = 0;
        let wholesale = InvalidationFlags::BACKGROUNDS
            | InvalidationFlags::BASE_METRICS
            | InvalidationFlags::DATA_SOURCE_COUNTS;
        if flags.intersects(wholesale) {
            for section in core::mem::take(&mut self.backgrounds).into_keys() {
                tracer.cache(&cleared(CacheEntry::Background(section)));
                backgrounds_dropped += 1;
            }
        } else if let Some(&first) = sections.first() {
            self.dirty.mark_with(first, dirty::BACKGROUND, &EagerPolicy);
            let affected: Vec<usize> = self
                .dirty
                .drain(dirty::BACKGROUND)
                .affected()
                .deterministic()
                .run()
                .collect();
            for section in affected {
                if self.backgrounds.remove(&section).is_some() {
                    tracer.cache(&cleared(CacheEntry::Background(section)));
                    backgrounds_dropped += 1;
                }
            }
        }

        tracer.invalidate(&InvalidateEvent {
            flags,
            invalidated_sections: sections.len(),
            first_section: sections.first().copied(),
            backgrounds_dropped,
        });
    }

    /// Turns a batch of data updates into an invalidation and applies it.
    ///
    /// Returns the applied context so the host can forward it to its base
    /// layout.
    pub fn apply_updates(&mut self, updates: &[Update]) -> InvalidationContext {
        let mut ctx = InvalidationContext::new();
        for update in updates {
            ctx.set(InvalidationFlags::DATA_SOURCE_COUNTS, update.changes_counts());
            match update {
                Update::InsertItems(paths)
                | Update::DeleteItems(paths)
                | Update::ReloadItems(paths) => {
                    ctx.invalidate_items(paths.iter().copied());
                }
                Update::InsertSection(section)
                | Update::DeleteSection(section)
                | Update::ReloadSection(section) => {
                    ctx.invalidate_supplementary(
                        ElementKind::SectionHeader,
                        [IndexPath::section(*section)],
                    );
                    ctx.invalidate_supplementary(
                        ElementKind::SectionFooter,
                        [IndexPath::section(*section)],
                    );
                }
                Update::MoveItem { from, to } => ctx.invalidate_items([*from, *to]),
            }
        }
        self.invalidate(&ctx);
        ctx
    }

    // ---------------------------------------------------------------------------
    // Bounds changes
    // ---------------------------------------------------------------------------

    /// Whether moving the viewport to `new_bounds` requires an invalidation.
    #[must_use]
    pub fn should_invalidate_for_bounds_change<H: FlowHost + ?Sized>(
        &self,
        host: &H,
        new_bounds: Rect,
    ) -> bool {
        let old_bounds = host.viewport().bounds;
        old_bounds.width() != new_bounds.width()
            || (self.header_size.is_some() && self.header_config.pins())
            || (self.footer_size.is_some() && self.footer_config.pins())
            || self.section_headers_pin_to_visible_bounds
            || self.section_footers_pin_to_visible_bounds
    }

    /// Builds the context to apply when the viewport moves to `new_bounds`.
    ///
    /// A width change recomputes metrics and backgrounds. Otherwise only the
    /// attributes of a pinned global element whose edge moved are dropped.
    pub fn invalidation_context_for_bounds_change<H: FlowHost + ?Sized>(
        &mut self,
        host: &H,
        new_bounds: Rect,
    ) -> InvalidationContext {
        let old_bounds = host.viewport().bounds;
        let mut ctx = InvalidationContext::new();

        if old_bounds.width() != new_bounds.width() {
            ctx.insert(
                InvalidationFlags::BASE_METRICS
                    | InvalidationFlags::GLOBAL_HEADER_METRICS
                    | InvalidationFlags::GLOBAL_FOOTER_METRICS
                    | InvalidationFlags::BACKGROUNDS,
            );
        } else {
            ctx.set(
                InvalidationFlags::GLOBAL_HEADER_ATTRIBUTES,
                self.header_size.is_some()
                    && self.header_config.pins()
                    && old_bounds.min_y() != new_bounds.min_y(),
            );
            ctx.set(
                InvalidationFlags::GLOBAL_FOOTER_ATTRIBUTES,
                self.footer_size.is_some()
                    && self.footer_config.pins()
                    && old_bounds.max_y() != new_bounds.max_y(),
            );
        }

        Self::tracer(&mut self.sink).bounds_change(&BoundsChangeEvent {
            old_bounds,
            new_bounds,
            flags: ctx.flags(),
        });
        ctx
    }

    // ---------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------

    fn adjuster<H: FlowHost + ?Sized>(&self, host: &H) -> Adjuster {
        Adjuster {
            viewport: host.viewport(),
            header_config: self.header_config,
            header_size: self.header_size,
            footer_config: self.footer_config,
            footer_size: self.footer_size,
            content_height: self.content_height(host),
        }
    }

    fn content_height<H: FlowHost + ?Sized>(&self, host: &H) -> f64 {
        host.base_content_size().height + height_of(self.header_size) + height_of(self.footer_size)
    }

    /// Total content size, including the global header and footer.
    pub fn content_size<H: FlowHost + ?Sized>(&mut self, host: &H) -> Size {
        self.prepare(host);
        Size::new(host.base_content_size().width, self.content_height(host))
    }

    /// Every positioned element whose on-screen frame intersects `rect`.
    pub fn attributes_in_rect<H: FlowHost + ?Sized>(
        &mut self,
        host: &H,
        rect: Rect,
    ) -> Vec<LayoutAttributes> {
        self.prepare(host);
        let adjuster = self.adjuster(host);
        // Non-global elements move down by the content start offset, so the
        // base layout is asked about the region they come from.
        let base_rect = rect - Vec2::new(0.0, adjuster.content_start_offset());

        let attributes: Vec<LayoutAttributes> = host
            .base_attributes_in(base_rect)
            .into_iter()
            .chain(self.header_attributes)
            .chain(self.footer_attributes)
            .chain(self.backgrounds.values().copied())
            .map(|raw| adjuster.adjust(raw, |section| host.number_of_items(section)))
            .filter(|adjusted| intersects(adjusted.frame, rect))
            .collect();

        Self::tracer(&mut self.sink).query(&QueryEvent {
            rect,
            returned: attributes.len(),
        });
        attributes
    }

    /// The positioned item at `index_path`.
    pub fn attributes_for_item<H: FlowHost + ?Sized>(
        &mut self,
        host: &H,
        index_path: IndexPath,
    ) -> Option<LayoutAttributes> {
        self.prepare(host);
        let raw = host.base_item_attributes(index_path)?;
        Some(self.adjuster(host).adjust(raw, |section| host.number_of_items(section)))
    }

    /// The positioned supplementary element of `kind` at `index_path`.
    ///
    /// Global elements ignore `index_path`. Passing [`ElementKind::Item`]
    /// behaves like [`attributes_for_item`](Self::attributes_for_item).
    pub fn attributes_for_supplementary<H: FlowHost + ?Sized>(
        &mut self,
        host: &H,
        kind: ElementKind,
        index_path: IndexPath,
    ) -> Option<LayoutAttributes> {
        self.prepare(host);
        let raw = match kind {
            ElementKind::GlobalHeader => self.header_attributes,
            ElementKind::GlobalFooter => self.footer_attributes,
            ElementKind::SectionBackground => self.backgrounds.get(&index_path.section).copied(),
            ElementKind::Item => host.base_item_attributes(index_path),
            ElementKind::SectionHeader | ElementKind::SectionFooter => {
                host.base_supplementary_attributes(kind, index_path)
            }
        }?;
        Some(self.adjuster(host).adjust(raw, |section| host.number_of_items(section)))
    }

    /// Sections whose backgrounds would be dropped by invalidating `section`.
    ///
    /// Only sections linked by a previous prepare pass are reported.
    #[must_use]
    pub fn downstream_sections(&self, section: usize) -> BTreeSet<usize> {
        (section..self.linked_sections).collect()
    }
}
