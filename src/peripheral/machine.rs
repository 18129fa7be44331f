//! Machine rack peripheral.
//!
//! A rack groups processing machines behind one peripheral: status
//! polling plus an enable switch per machine. `set_enabled` is the
//! only mutating call in the whole peripheral surface - the machines
//! view exposes it as a tap target.

use super::PeripheralError;

/// Operating state of one machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    Idle,
    Active,
    /// Output full, missing input, or similar stall.
    Blocked,
    Disabled,
}

impl MachineState {
    pub const fn label(self) -> &'static str {
        match self {
            MachineState::Idle => "idle",
            MachineState::Active => "active",
            MachineState::Blocked => "blocked",
            MachineState::Disabled => "off",
        }
    }
}

/// Status of one machine in the rack.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineStatus {
    /// Stable id used for `set_enabled`.
    pub id: String,
    pub label: String,
    pub state: MachineState,
    /// Recipe progress in 0..=1 while active.
    pub progress: Option<f32>,
    /// Current draw in FE per tick.
    pub energy_per_tick: u64,
}

/// The machine rack peripheral.
pub trait MachineRack {
    fn id(&self) -> &str;

    /// Status of every machine in the rack.
    fn machines(&self) -> Result<Vec<MachineStatus>, PeripheralError>;

    /// Enable or disable a machine by id.
    fn set_enabled(&self, machine_id: &str, enabled: bool) -> Result<(), PeripheralError>;
}
