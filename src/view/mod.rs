//! View descriptors.
//!
//! A view declares *what* a monitor shows; the host in [`base`]
//! handles *how*. The descriptor bundles a fetch function (peripherals
//! → entries), a paint function (entry → cells), chrome flags, the
//! settings schema, the peripherals the view needs to mount, and one
//! of four render strategies.
//!
//! Fetch and paint are plain closures rather than a trait because most
//! views are a data transform plus a draw routine; the `Custom`
//! strategy carries a trait object for the few views that keep their
//! own state (history buffers, bespoke layouts).

use std::time::Duration;

use thiserror::Error;

use crate::config::{ConfigSchema, ViewConfig};
use crate::peripheral::{PeripheralBus, PeripheralError, PeripheralKind};
use crate::surface::Pane;
use crate::types::{Rect, Tone};

pub mod base;
pub mod chrome;

pub use base::{ScrollState, ViewHost};

// =============================================================================
// Errors
// =============================================================================

/// Descriptor and registry failures.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("view descriptor has an empty name")]
    EmptyName,

    #[error("view '{0}' has an empty title")]
    EmptyTitle(String),

    #[error("view '{view}' declares setting '{key}' twice")]
    DuplicateSchemaKey { view: String, key: &'static str },

    #[error("view '{view}' refresh interval {got_ms}ms is below the {min_ms}ms minimum")]
    RefreshTooFast {
        view: String,
        got_ms: u64,
        min_ms: u64,
    },

    #[error("a view named '{0}' is already registered")]
    DuplicateView(String),

    #[error("no view named '{0}' is registered")]
    UnknownView(String),
}

/// Fastest refresh a view may ask for; peripherals are polled, not
/// event-driven, and sub-100ms polling starves the rest of the wall.
pub const MIN_REFRESH: Duration = Duration::from_millis(100);

// =============================================================================
// Entries
// =============================================================================

/// One unit of view data: a grid cell or a list row.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Stable identity - selection follows this across refreshes, and
    /// interactive actions receive it.
    pub key: String,
    pub label: String,
    /// Secondary text: a reading, a count, a state.
    pub detail: String,
    /// Fill fraction in 0..=1 when the entry carries a bar.
    pub fill: Option<f32>,
    pub tone: Tone,
}

impl Entry {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            detail: String::new(),
            fill: None,
            tone: Tone::Normal,
        }
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn fill(mut self, fill: f32) -> Self {
        self.fill = Some(fill.clamp(0.0, 1.0));
        self
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }
}

// =============================================================================
// Function types
// =============================================================================

/// Peripheral poll: bus + settings → entries.
pub type FetchFn = Box<dyn FnMut(&PeripheralBus, &ViewConfig) -> Result<Vec<Entry>, PeripheralError>>;

/// Draw one entry into its pane. The flag marks the selected row of an
/// interactive list.
pub type PaintFn = Box<dyn Fn(&mut Pane<'_>, &Entry, bool)>;

/// Row tap handler of an interactive list.
pub type SelectFn = Box<dyn FnMut(&PeripheralBus, &Entry) -> Result<(), PeripheralError>>;

// =============================================================================
// Custom views
// =============================================================================

/// A view that owns its state and layout.
///
/// `refresh` reports whether anything changed so the host can skip
/// repaints; `draw` returns tap zones in pane-local coordinates, each
/// tagged with a view-defined id that `on_touch` receives back.
pub trait CustomView {
    fn refresh(&mut self, bus: &PeripheralBus, cfg: &ViewConfig) -> Result<bool, PeripheralError>;

    fn draw(&mut self, pane: &mut Pane<'_>, cfg: &ViewConfig) -> Vec<(Rect, u16)>;

    fn on_touch(&mut self, _tag: u16, _bus: &PeripheralBus) -> Result<bool, PeripheralError> {
        Ok(false)
    }
}

// =============================================================================
// Strategies
// =============================================================================

/// How the host turns entries into cells.
pub enum Strategy {
    /// Entries painted into equal cells of a column grid; pages.
    ///
    /// `columns` is the default; a view may expose a `columns` setting
    /// in its schema, which the host reads as an override.
    Grid {
        columns: u16,
        cell_height: u16,
        fetch: FetchFn,
        paint: PaintFn,
    },

    /// One entry per row; scrolls by page.
    List { fetch: FetchFn, paint: PaintFn },

    /// List whose rows are tap targets.
    InteractiveList {
        fetch: FetchFn,
        paint: PaintFn,
        on_select: SelectFn,
    },

    /// The view draws its body itself.
    Custom(Box<dyn CustomView>),
}

impl Strategy {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Strategy::Grid { .. } => "grid",
            Strategy::List { .. } => "list",
            Strategy::InteractiveList { .. } => "interactive-list",
            Strategy::Custom(_) => "custom",
        }
    }
}

// =============================================================================
// Descriptor
// =============================================================================

/// A complete view declaration.
pub struct ViewSpec {
    /// Registry name, used in config assignments.
    pub name: &'static str,
    /// Header title.
    pub title: String,
    /// Peripheral kinds that must be on the bus for the view to mount.
    pub requires: Vec<PeripheralKind>,
    pub schema: ConfigSchema,
    pub default_refresh: Duration,
    pub show_header: bool,
    pub show_footer: bool,
    pub strategy: Strategy,
}

impl ViewSpec {
    /// Check the descriptor before a host is built around it.
    pub fn validate(&self) -> Result<(), ViewError> {
        if self.name.trim().is_empty() {
            return Err(ViewError::EmptyName);
        }
        if self.show_header && self.title.trim().is_empty() {
            return Err(ViewError::EmptyTitle(self.name.to_string()));
        }
        if let Some(key) = self.schema.has_duplicate_keys() {
            return Err(ViewError::DuplicateSchemaKey {
                view: self.name.to_string(),
                key,
            });
        }
        if self.default_refresh < MIN_REFRESH {
            return Err(ViewError::RefreshTooFast {
                view: self.name.to_string(),
                got_ms: self.default_refresh.as_millis() as u64,
                min_ms: MIN_REFRESH.as_millis() as u64,
            });
        }
        Ok(())
    }

    /// Whether every required peripheral is present on the bus.
    pub fn mountable(&self, bus: &PeripheralBus) -> bool {
        self.requires.iter().all(|kind| bus.has(*kind))
    }

    /// Required kinds missing from the bus.
    pub fn missing(&self, bus: &PeripheralBus) -> Vec<PeripheralKind> {
        self.requires
            .iter()
            .copied()
            .filter(|kind| !bus.has(*kind))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
