//! View host - the shared base component.
//!
//! One `ViewHost` runs one view on one monitor. It owns everything the
//! descriptor doesn't: the back surface, the frame diff, scroll and
//! selection state, the touch map, cached entries, and the error
//! state. The render pass is phased: clear → chrome → body (by
//! strategy) → zone rebuild → diff flush. Fetches run under a guard;
//! a failing peripheral turns the body into a fault panel and the next
//! good fetch turns it back.

use std::io;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::ViewConfig;
use crate::flush::FrameDiff;
use crate::monitor::{Monitor, Touch};
use crate::peripheral::PeripheralBus;
use crate::surface::Surface;
use crate::touch::{TouchMap, ZoneAction};
use crate::types::{palette, Rect};
use crate::view::chrome::{self, FOOTER_ROWS, HEADER_ROWS};
use crate::view::{Entry, Strategy, ViewError, ViewSpec};

// =============================================================================
// Scroll state
// =============================================================================

/// Page-aligned scroll state.
///
/// The offset is an entry index; paging moves it by one viewport. All
/// movement is clamped, and movement ops report whether anything
/// happened so boundary taps don't trigger repaints.
#[derive(Debug, Default)]
pub struct ScrollState {
    offset: usize,
    viewport: usize,
    total: usize,
}

impl ScrollState {
    /// Update viewport size and entry count, re-clamping the offset.
    ///
    /// Called every render pass - data shrinking under the scroll
    /// position must not leave the view past the end.
    pub fn set_extent(&mut self, viewport: usize, total: usize) {
        self.viewport = viewport.max(1);
        self.total = total;

        let last_page_start = if total == 0 {
            0
        } else {
            ((total - 1) / self.viewport) * self.viewport
        };
        self.offset = self.offset.min(last_page_start);
        // Keep the offset page-aligned after viewport changes.
        self.offset -= self.offset % self.viewport;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn viewport(&self) -> usize {
        self.viewport.max(1)
    }

    /// Current page, zero-based.
    pub fn page(&self) -> usize {
        self.offset / self.viewport.max(1)
    }

    /// Total pages, at least 1.
    pub fn pages(&self) -> usize {
        if self.total == 0 {
            1
        } else {
            self.total.div_ceil(self.viewport.max(1))
        }
    }

    /// Advance one page. Returns false at the last page.
    pub fn page_forward(&mut self) -> bool {
        if self.offset + self.viewport < self.total {
            self.offset += self.viewport;
            true
        } else {
            false
        }
    }

    /// Go back one page. Returns false at the first page.
    pub fn page_back(&mut self) -> bool {
        if self.offset == 0 {
            false
        } else {
            self.offset = self.offset.saturating_sub(self.viewport);
            true
        }
    }
}

// =============================================================================
// View host
// =============================================================================

/// A running view instance.
pub struct ViewHost {
    spec: ViewSpec,
    config: ViewConfig,
    refresh_every: Duration,
    surface: Surface,
    diff: FrameDiff,
    scroll: ScrollState,
    zones: TouchMap,
    entries: Vec<Entry>,
    selected: Option<String>,
    error: Option<String>,
    dirty: bool,
    next_refresh: Option<Instant>,
}

impl ViewHost {
    /// Validate the descriptor and build a host sized to a monitor.
    pub fn new(spec: ViewSpec, config: ViewConfig, size: (u16, u16)) -> Result<Self, ViewError> {
        spec.validate()?;

        let refresh_every = spec.default_refresh;
        Ok(Self {
            spec,
            config,
            refresh_every,
            surface: Surface::new(size.0, size.1),
            diff: FrameDiff::new(),
            scroll: ScrollState::default(),
            zones: TouchMap::new(),
            entries: Vec::new(),
            selected: None,
            error: None,
            dirty: true,
            next_refresh: None,
        })
    }

    /// Override the refresh interval (from a config assignment).
    pub fn set_refresh_interval(&mut self, interval: Duration) {
        self.refresh_every = interval.max(super::MIN_REFRESH);
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a refresh is due at `now`.
    pub fn due(&self, now: Instant) -> bool {
        self.next_refresh.is_none_or(|t| now >= t)
    }

    /// Deadline of the next refresh, if one is scheduled.
    pub fn next_refresh(&self) -> Option<Instant> {
        self.next_refresh
    }

    /// Poll the peripherals through the view's fetch, under the guard.
    pub fn refresh(&mut self, bus: &PeripheralBus, now: Instant) {
        self.next_refresh = Some(now + self.refresh_every);

        let result = match &mut self.spec.strategy {
            Strategy::Grid { fetch, .. }
            | Strategy::List { fetch, .. }
            | Strategy::InteractiveList { fetch, .. } => {
                fetch(bus, &self.config).map(FetchOutcome::Entries)
            }
            Strategy::Custom(view) => {
                view.refresh(bus, &self.config).map(FetchOutcome::Changed)
            }
        };

        match result {
            Ok(FetchOutcome::Entries(entries)) => {
                let recovered = self.error.take().is_some();
                if recovered || entries != self.entries {
                    self.entries = entries;
                    self.dirty = true;
                }
            }
            Ok(FetchOutcome::Changed(changed)) => {
                let recovered = self.error.take().is_some();
                if recovered || changed {
                    self.dirty = true;
                }
            }
            Err(err) => {
                warn!(view = self.spec.name, error = %err, "fetch failed");
                let message = err.to_string();
                if self.error.as_deref() != Some(message.as_str()) {
                    self.error = Some(message);
                    self.dirty = true;
                }
            }
        }
    }

    /// Route a touch through the zone map.
    ///
    /// Returns true if the view needs a repaint.
    pub fn handle_touch(&mut self, touch: Touch, bus: &PeripheralBus) -> bool {
        let Some(action) = self.zones.hit(touch.x, touch.y) else {
            return false;
        };
        debug!(view = self.spec.name, ?action, x = touch.x, y = touch.y, "touch");

        match action {
            ZoneAction::PageBack => {
                if self.scroll.page_back() {
                    self.dirty = true;
                }
            }
            ZoneAction::PageForward => {
                if self.scroll.page_forward() {
                    self.dirty = true;
                }
            }
            ZoneAction::Row(index) => self.touch_row(index, bus),
            ZoneAction::Custom(tag) => {
                if let Strategy::Custom(view) = &mut self.spec.strategy {
                    match view.on_touch(tag, bus) {
                        Ok(changed) => self.dirty |= changed,
                        Err(err) => {
                            warn!(view = self.spec.name, error = %err, "touch action failed");
                            self.error = Some(err.to_string());
                            self.dirty = true;
                        }
                    }
                }
            }
        }

        self.dirty
    }

    fn touch_row(&mut self, index: usize, bus: &PeripheralBus) {
        let Strategy::InteractiveList { on_select, .. } = &mut self.spec.strategy else {
            return;
        };
        let Some(entry) = self.entries.get(index) else {
            return;
        };

        self.selected = Some(entry.key.clone());
        self.dirty = true;

        if let Err(err) = on_select(bus, entry) {
            warn!(view = self.spec.name, key = %entry.key, error = %err, "select failed");
            self.error = Some(err.to_string());
            return;
        }

        // The action usually changes what the next fetch reports;
        // pull it forward instead of waiting out the interval.
        self.next_refresh = None;
    }

    /// Render to the monitor if anything changed.
    ///
    /// Returns true if cells were flushed.
    pub fn render(&mut self, monitor: &mut dyn Monitor) -> io::Result<bool> {
        let size = monitor.size();
        if size != (self.surface.width(), self.surface.height()) {
            self.surface.resize(size.0, size.1);
            self.diff.invalidate();
            self.dirty = true;
        }

        if !self.dirty && self.diff.has_previous() {
            return Ok(false);
        }

        self.zones.clear();
        self.surface.clear(palette::BLACK);

        let body = self.body_rect();
        self.draw_body(body);

        if self.spec.show_header {
            let status = if self.error.is_some() {
                Some("fault")
            } else {
                None
            };
            chrome::draw_header(&mut self.surface, &self.spec.title, status);
        }
        if self.spec.show_footer {
            let hint = self.footer_hint();
            chrome::draw_footer(
                &mut self.surface,
                &hint,
                self.scroll.page(),
                self.scroll.pages(),
                &mut self.zones,
            );
        }

        let flushed = self.diff.flush(&self.surface, monitor)?;
        self.dirty = false;
        Ok(flushed)
    }

    fn body_rect(&self) -> Rect {
        let top = if self.spec.show_header { HEADER_ROWS } else { 0 };
        let bottom = if self.spec.show_footer { FOOTER_ROWS } else { 0 };
        let height = self.surface.height().saturating_sub(top + bottom);
        Rect::new(0, top, self.surface.width(), height)
    }

    fn footer_hint(&self) -> String {
        if self.error.is_some() {
            return "check peripheral".to_string();
        }
        match &self.spec.strategy {
            Strategy::Custom(_) => String::new(),
            _ => format!("{} entries", self.entries.len()),
        }
    }

    fn draw_body(&mut self, body: Rect) {
        if body.is_empty() {
            return;
        }

        if let Some(message) = self.error.clone() {
            self.scroll.set_extent(1, 0);
            chrome::draw_error_panel(&mut self.surface, body, &message);
            return;
        }

        // Split borrows: the strategy's closures draw on the surface
        // while scroll/zones update alongside.
        let Self {
            spec,
            config,
            surface,
            scroll,
            zones,
            entries,
            selected,
            ..
        } = self;

        match &mut spec.strategy {
            Strategy::Grid {
                columns,
                cell_height,
                paint,
                ..
            } => {
                let columns = config.get_int("columns", *columns as i64).max(1) as u16;
                let columns = columns.min(body.width.max(1));
                let cell_height = (*cell_height).max(1);

                let rows = (body.height / cell_height).max(1);
                let viewport = columns as usize * rows as usize;
                scroll.set_extent(viewport, entries.len());

                let cell_width = body.width / columns;
                for (slot, entry) in entries
                    .iter()
                    .skip(scroll.offset())
                    .take(viewport)
                    .enumerate()
                {
                    let col = (slot as u16) % columns;
                    let row = (slot as u16) / columns;
                    let rect = Rect::new(
                        body.x + col * cell_width,
                        body.y + row * cell_height,
                        cell_width.saturating_sub(1),
                        cell_height,
                    );
                    paint(&mut surface.pane(rect), entry, false);
                }
            }

            Strategy::List { paint, .. } => {
                let rows = body.height as usize;
                scroll.set_extent(rows, entries.len());

                for (i, entry) in entries.iter().skip(scroll.offset()).take(rows).enumerate() {
                    let rect = Rect::new(body.x, body.y + i as u16, body.width, 1);
                    paint(&mut surface.pane(rect), entry, false);
                }
            }

            Strategy::InteractiveList { paint, .. } => {
                let rows = body.height as usize;
                scroll.set_extent(rows, entries.len());

                for (i, entry) in entries.iter().skip(scroll.offset()).take(rows).enumerate() {
                    let rect = Rect::new(body.x, body.y + i as u16, body.width, 1);
                    let is_selected = selected.as_deref() == Some(entry.key.as_str());
                    paint(&mut surface.pane(rect), entry, is_selected);
                    zones.add(rect, ZoneAction::Row(scroll.offset() + i));
                }
            }

            Strategy::Custom(view) => {
                scroll.set_extent(1, 1);
                let local_zones = view.draw(&mut surface.pane(body), config);
                for (local, tag) in local_zones {
                    let global = Rect::new(
                        body.x.saturating_add(local.x),
                        body.y.saturating_add(local.y),
                        local.width,
                        local.height,
                    );
                    if let Some(clipped) = global.intersect(&body) {
                        zones.add(clipped, ZoneAction::Custom(tag));
                    }
                }
            }
        }
    }
}

enum FetchOutcome {
    Entries(Vec<Entry>),
    Changed(bool),
}

// =============================================================================
// Tests
// =============================================================================
