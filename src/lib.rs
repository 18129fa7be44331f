//! # gridwatch
//!
//! Declarative view framework for wall-mounted automation-network
//! monitors.
//!
//! A view declares *what* to show - a fetch function over the
//! peripheral bus, a paint function, a settings schema, the
//! peripherals it needs - and the shared host handles *how*: chrome,
//! pagination, touch zones, and flicker-free double-buffered updates.
//!
//! ## Pipeline
//!
//! ```text
//! peripherals → fetch → entries → strategy body → Surface → FrameDiff → Monitor
//!                                      ↑                                   │
//!                                      └────────── touch zones ←───────────┘
//! ```
//!
//! The runtime is single-threaded and cooperative: refreshes are
//! served by deadline under a per-tick poll budget, in rotating
//! order, so one slow peripheral cannot freeze the wall.
//!
//! ## Modules
//!
//! - [`types`] - cells, colors, rects, the monitor palette
//! - [`surface`] - the window buffer and drawing primitives
//! - [`flush`] - frame diffing onto monitors
//! - [`monitor`] - the display seam (terminal and in-memory backends)
//! - [`peripheral`] - the polled hardware seam and simulated devices
//! - [`view`] - descriptors, the view host, chrome
//! - [`views`] - the built-in content views
//! - [`manager`] - registry, mount checks, assignment
//! - [`runtime`] - the tick loop

pub mod config;
pub mod flush;
pub mod fmt;
pub mod manager;
pub mod monitor;
pub mod peripheral;
pub mod runtime;
pub mod surface;
pub mod text;
pub mod touch;
pub mod types;
pub mod view;
pub mod views;
pub mod widgets;

// Re-export commonly used items

pub use types::{palette, Attr, BorderStyle, Cell, Rect, Rgb, Tone};

pub use surface::{Pane, Surface};

pub use flush::FrameDiff;

pub use monitor::{BufferMonitor, CellRun, Monitor, TerminalMonitor, Touch};

pub use peripheral::{
    EnergyReading, EnergyStorage, MachineRack, MachineState, MachineStatus, MeBridge,
    PeripheralBus, PeripheralError, PeripheralKind,
};

pub use touch::{TouchMap, ZoneAction};

pub use view::{
    chrome, CustomView, Entry, ScrollState, Strategy, ViewError, ViewHost, ViewSpec,
};

pub use config::{Config, ConfigError, ConfigSchema, SettingValue, ViewConfig};

pub use manager::{Manager, ManagerError, Station, ViewRegistry};

pub use runtime::{Runtime, TickReport};
