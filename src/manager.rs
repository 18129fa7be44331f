//! View manager.
//!
//! Owns the view registry, runs mount checks against the peripheral
//! bus, and turns a config plus a set of monitors into running
//! stations. Assignment policy:
//!
//! 1. Explicit config assignments are honored first. Unknown view
//!    names and failed mount checks are logged and the monitor falls
//!    through to step 2 - a bad config line should cost one monitor,
//!    not the whole wall. Bad *settings* are a hard error: a typo in a
//!    value table means the operator's intent can't be honored.
//! 2. Monitors without an assignment get the first registered view
//!    that mounts and isn't already on another monitor.
//! 3. Anything left over shows the idle panel.

use std::time::Duration;

use tracing::{info, warn};

use crate::config::{Config, ConfigError, ViewConfig};
use crate::monitor::Monitor;
use crate::peripheral::PeripheralBus;
use crate::view::{ViewError, ViewHost, ViewSpec};
use crate::views;

// =============================================================================
// Errors
// =============================================================================

/// Assignment failures that abort setup.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// =============================================================================
// Registry
// =============================================================================

type Factory = Box<dyn Fn() -> ViewSpec>;

/// Named view factories.
///
/// Specs hold closures, so the registry stores builders rather than
/// prototypes; building a spec is cheap.
pub struct ViewRegistry {
    factories: Vec<(String, Factory)>,
}

impl ViewRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// A registry pre-loaded with the built-in views.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, build) in views::builtin() {
            // Builtins are validated by their own tests; duplicates
            // can't happen within one builtin table.
            registry
                .register(name, move || build())
                .unwrap_or_else(|e| unreachable!("builtin '{}': {}", name, e));
        }
        registry
    }

    /// Register a view factory under a unique name.
    ///
    /// The factory is probed once so a broken descriptor fails here,
    /// at startup, instead of when a monitor first mounts it.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn() -> ViewSpec + 'static,
    ) -> Result<(), ViewError> {
        let name = name.into();
        if self.factories.iter().any(|(n, _)| *n == name) {
            return Err(ViewError::DuplicateView(name));
        }

        factory().validate()?;
        self.factories.push((name, Box::new(factory)));
        Ok(())
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.factories.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Build a fresh spec by name.
    pub fn build(&self, name: &str) -> Result<ViewSpec, ViewError> {
        self.factories
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f())
            .ok_or_else(|| ViewError::UnknownView(name.to_string()))
    }

    /// Names of views whose mount check passes on this bus.
    pub fn mountable(&self, bus: &PeripheralBus) -> Vec<&str> {
        self.factories
            .iter()
            .filter(|(_, f)| f().mountable(bus))
            .map(|(n, _)| n.as_str())
            .collect()
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

// =============================================================================
// Stations
// =============================================================================

/// A monitor with its running view host.
pub struct Station {
    pub monitor: Box<dyn Monitor>,
    pub host: ViewHost,
}

impl std::fmt::Debug for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Station")
            .field("monitor", &self.monitor.id())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Manager
// =============================================================================

pub struct Manager {
    registry: ViewRegistry,
}

impl Manager {
    pub fn new(registry: ViewRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    /// Resolve config + bus + monitors into running stations.
    pub fn assign(
        &self,
        config: &Config,
        bus: &PeripheralBus,
        monitors: Vec<Box<dyn Monitor>>,
    ) -> Result<Vec<Station>, ManagerError> {
        let mut stations = Vec::with_capacity(monitors.len());
        let mut used: Vec<String> = config
            .monitors
            .values()
            .map(|a| a.view.clone())
            .collect();

        for monitor in monitors {
            let host = match config.assignment(monitor.id()) {
                Some(assignment) => self.host_for_assignment(monitor.as_ref(), assignment, bus)?,
                None => self.auto_host(monitor.as_ref(), bus, &mut used),
            };

            let host = match host {
                Some(host) => {
                    info!(monitor = monitor.id(), view = host.name(), "station up");
                    host
                }
                None => idle_host(monitor.as_ref()),
            };

            stations.push(Station { monitor, host });
        }

        Ok(stations)
    }

    /// Build the host for an explicit assignment, or `None` to fall
    /// back to the idle panel.
    fn host_for_assignment(
        &self,
        monitor: &dyn Monitor,
        assignment: &crate::config::Assignment,
        bus: &PeripheralBus,
    ) -> Result<Option<ViewHost>, ManagerError> {
        let spec = match self.registry.build(&assignment.view) {
            Ok(spec) => spec,
            Err(err) => {
                warn!(monitor = monitor.id(), error = %err, "assignment skipped");
                return Ok(None);
            }
        };

        if !spec.mountable(bus) {
            warn!(
                monitor = monitor.id(),
                view = spec.name,
                missing = ?spec.missing(bus),
                "assignment not mountable"
            );
            return Ok(None);
        }

        let view_config = spec.schema.resolve(spec.name, &assignment.settings)?;
        let mut host = ViewHost::new(spec, view_config, monitor.size())?;
        if let Some(ms) = assignment.refresh_ms {
            host.set_refresh_interval(Duration::from_millis(ms));
        }
        Ok(Some(host))
    }

    /// Pick the first mountable, not-yet-used view for a bare monitor.
    fn auto_host(
        &self,
        monitor: &dyn Monitor,
        bus: &PeripheralBus,
        used: &mut Vec<String>,
    ) -> Option<ViewHost> {
        for name in self.registry.names() {
            if used.iter().any(|u| u == name) {
                continue;
            }
            let Ok(spec) = self.registry.build(name) else {
                continue;
            };
            if !spec.mountable(bus) {
                continue;
            }

            let Ok(view_config) = spec.schema.resolve(spec.name, &toml::value::Table::new()) else {
                continue;
            };
            match ViewHost::new(spec, view_config, monitor.size()) {
                Ok(host) => {
                    used.push(name.to_string());
                    return Some(host);
                }
                Err(err) => {
                    warn!(view = name, error = %err, "auto-assignment failed");
                }
            }
        }
        None
    }
}

fn idle_host(monitor: &dyn Monitor) -> ViewHost {
    // The idle spec is static and always validates.
    ViewHost::new(
        views::idle::spec(monitor.id()),
        ViewConfig::empty(),
        monitor.size(),
    )
    .unwrap_or_else(|e| unreachable!("idle spec: {}", e))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::BufferMonitor;
    use crate::peripheral::sim::{SimEnergyCell, SimMachineRack, SimMeBridge};
    use std::rc::Rc;

    fn full_bus() -> PeripheralBus {
        let mut bus = PeripheralBus::new();
        bus.attach_me_bridge(Rc::new(SimMeBridge::with_demo_contents("me_0")));
        bus.attach_energy(Rc::new(SimEnergyCell::new("cell_0", 8_000_000)));
        bus.attach_rack(Rc::new(SimMachineRack::with_demo_contents("rack_0")));
        bus
    }

    fn monitors(ids: &[&str]) -> Vec<Box<dyn Monitor>> {
        ids.iter()
            .map(|id| Box::new(BufferMonitor::new(*id, 30, 10)) as Box<dyn Monitor>)
            .collect()
    }

    #[test]
    fn test_registry_builtins() {
        let registry = ViewRegistry::with_builtins();
        assert!(registry.names().contains(&"items"));
        assert!(registry.build("items").is_ok());
        assert!(matches!(
            registry.build("nope"),
            Err(ViewError::UnknownView(_))
        ));
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = ViewRegistry::with_builtins();
        let err = registry
            .register("items", crate::views::items::spec)
            .unwrap_err();
        assert!(matches!(err, ViewError::DuplicateView(_)));
    }

    #[test]
    fn test_mountable_filtering() {
        let registry = ViewRegistry::with_builtins();

        let mut bus = PeripheralBus::new();
        assert!(registry.mountable(&bus).is_empty());

        bus.attach_energy(Rc::new(SimEnergyCell::new("cell_0", 1_000)));
        assert_eq!(registry.mountable(&bus), vec!["energy"]);
    }

    #[test]
    fn test_explicit_assignment() {
        let config = Config::from_str(
            r#"
            [monitors.lobby]
            view = "energy"
            refresh_ms = 250
            "#,
        )
        .unwrap();

        let manager = Manager::new(ViewRegistry::with_builtins());
        let stations = manager
            .assign(&config, &full_bus(), monitors(&["lobby"]))
            .unwrap();

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].host.name(), "energy");
    }

    #[test]
    fn test_unknown_view_falls_back_to_idle() {
        let config = Config::from_str("[monitors.lobby]\nview = \"frobnicator\"").unwrap();

        let manager = Manager::new(ViewRegistry::with_builtins());
        let stations = manager
            .assign(&config, &full_bus(), monitors(&["lobby"]))
            .unwrap();
        assert_eq!(stations[0].host.name(), "idle");
    }

    #[test]
    fn test_unmountable_assignment_falls_back_to_idle() {
        let config = Config::from_str("[monitors.lobby]\nview = \"items\"").unwrap();

        // No ME bridge on the bus.
        let mut bus = PeripheralBus::new();
        bus.attach_energy(Rc::new(SimEnergyCell::new("cell_0", 1_000)));

        let manager = Manager::new(ViewRegistry::with_builtins());
        let stations = manager.assign(&config, &bus, monitors(&["lobby"])).unwrap();
        assert_eq!(stations[0].host.name(), "idle");
    }

    #[test]
    fn test_bad_settings_abort() {
        let config = Config::from_str(
            "[monitors.lobby]\nview = \"items\"\n[monitors.lobby.settings]\nsort = \"size\"",
        )
        .unwrap();

        let manager = Manager::new(ViewRegistry::with_builtins());
        let err = manager
            .assign(&config, &full_bus(), monitors(&["lobby"]))
            .unwrap_err();
        assert!(matches!(err, ManagerError::Config(_)));
    }

    #[test]
    fn test_auto_fill_spreads_views() {
        let manager = Manager::new(ViewRegistry::with_builtins());
        let stations = manager
            .assign(&Config::default(), &full_bus(), monitors(&["a", "b", "c"]))
            .unwrap();

        let names: Vec<_> = stations.iter().map(|s| s.host.name()).collect();
        assert_eq!(names, vec!["items", "cells", "crafting"]);
    }

    #[test]
    fn test_auto_fill_skips_view_used_by_assignment() {
        let config = Config::from_str("[monitors.b]\nview = \"items\"").unwrap();

        let manager = Manager::new(ViewRegistry::with_builtins());
        let stations = manager
            .assign(&config, &full_bus(), monitors(&["a", "b"]))
            .unwrap();

        let names: Vec<_> = stations.iter().map(|s| s.host.name()).collect();
        // "a" auto-fills, but not with the view "b" explicitly claims.
        assert_eq!(names, vec!["cells", "items"]);
    }

    #[test]
    fn test_idle_when_nothing_mountable() {
        let manager = Manager::new(ViewRegistry::with_builtins());
        let stations = manager
            .assign(&Config::default(), &PeripheralBus::new(), monitors(&["a"]))
            .unwrap();
        assert_eq!(stations[0].host.name(), "idle");
    }
}
