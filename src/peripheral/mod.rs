//! Peripheral seam.
//!
//! Peripherals are the simulated hardware the views poll: storage
//! bridges, energy stores, machine racks. Drivers live outside this
//! crate; here they are trait objects registered on a `PeripheralBus`.
//! Every call can fail - a peripheral may detach between polls - so
//! everything returns `Result` and the view host guards each fetch.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

mod energy;
mod machine;
mod me;
pub mod sim;

pub use energy::{EnergyReading, EnergyStorage};
pub use machine::{MachineRack, MachineState, MachineStatus};
pub use me::{CellStatus, CraftingCpu, CraftingJob, FluidStack, ItemStack, MeBridge, StorageTotals};

// =============================================================================
// Errors
// =============================================================================

/// Failure modes of a peripheral call.
#[derive(Debug, Error)]
pub enum PeripheralError {
    /// The peripheral disappeared from the network.
    #[error("peripheral '{0}' is detached")]
    Detached(String),

    /// The peripheral answered, but with something unusable.
    #[error("protocol error from '{peripheral}': {message}")]
    Protocol {
        peripheral: String,
        message: String,
    },

    /// The peripheral does not implement the requested operation.
    #[error("peripheral '{peripheral}' does not support {op}")]
    Unsupported {
        peripheral: String,
        op: &'static str,
    },
}

// =============================================================================
// Kinds
// =============================================================================

/// Peripheral capability classes, used by view mount checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeripheralKind {
    MeBridge,
    EnergyStorage,
    MachineRack,
}

impl fmt::Display for PeripheralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PeripheralKind::MeBridge => "me_bridge",
            PeripheralKind::EnergyStorage => "energy_storage",
            PeripheralKind::MachineRack => "machine_rack",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Bus
// =============================================================================

/// Registry of attached peripherals.
///
/// The manager consults it for mount checks; fetch functions read the
/// first attachment of the kind they need. Attachments are `Rc` trait
/// objects - the whole stack is single-threaded.
#[derive(Default)]
pub struct PeripheralBus {
    me_bridges: Vec<Rc<dyn MeBridge>>,
    energy: Vec<Rc<dyn EnergyStorage>>,
    racks: Vec<Rc<dyn MachineRack>>,
}

impl PeripheralBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach_me_bridge(&mut self, p: Rc<dyn MeBridge>) {
        self.me_bridges.push(p);
    }

    pub fn attach_energy(&mut self, p: Rc<dyn EnergyStorage>) {
        self.energy.push(p);
    }

    pub fn attach_rack(&mut self, p: Rc<dyn MachineRack>) {
        self.racks.push(p);
    }

    /// First ME bridge on the bus.
    pub fn me_bridge(&self) -> Option<&dyn MeBridge> {
        self.me_bridges.first().map(Rc::as_ref)
    }

    /// First energy store on the bus.
    pub fn energy(&self) -> Option<&dyn EnergyStorage> {
        self.energy.first().map(Rc::as_ref)
    }

    /// First machine rack on the bus.
    pub fn rack(&self) -> Option<&dyn MachineRack> {
        self.racks.first().map(Rc::as_ref)
    }

    /// All energy stores, for aggregate readouts.
    pub fn energy_all(&self) -> impl Iterator<Item = &dyn EnergyStorage> {
        self.energy.iter().map(Rc::as_ref)
    }

    /// Capability probe used by mount checks.
    pub fn has(&self, kind: PeripheralKind) -> bool {
        match kind {
            PeripheralKind::MeBridge => !self.me_bridges.is_empty(),
            PeripheralKind::EnergyStorage => !self.energy.is_empty(),
            PeripheralKind::MachineRack => !self.racks.is_empty(),
        }
    }

    /// Kinds currently present on the bus.
    pub fn present(&self) -> Vec<PeripheralKind> {
        [
            PeripheralKind::MeBridge,
            PeripheralKind::EnergyStorage,
            PeripheralKind::MachineRack,
        ]
        .into_iter()
        .filter(|k| self.has(*k))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::sim::{SimEnergyCell, SimMeBridge};
    use super::*;

    #[test]
    fn test_empty_bus() {
        let bus = PeripheralBus::new();
        assert!(!bus.has(PeripheralKind::MeBridge));
        assert!(bus.me_bridge().is_none());
        assert!(bus.present().is_empty());
    }

    #[test]
    fn test_attach_and_probe() {
        let mut bus = PeripheralBus::new();
        bus.attach_me_bridge(Rc::new(SimMeBridge::with_demo_contents("me_0")));
        bus.attach_energy(Rc::new(SimEnergyCell::new("cell_0", 8_000_000)));

        assert!(bus.has(PeripheralKind::MeBridge));
        assert!(bus.has(PeripheralKind::EnergyStorage));
        assert!(!bus.has(PeripheralKind::MachineRack));
        assert_eq!(
            bus.present(),
            vec![PeripheralKind::MeBridge, PeripheralKind::EnergyStorage]
        );
        assert!(bus.me_bridge().is_some());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(PeripheralKind::MeBridge.to_string(), "me_bridge");
        assert_eq!(PeripheralKind::EnergyStorage.to_string(), "energy_storage");
    }
}
