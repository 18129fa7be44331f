//! Simulated peripherals.
//!
//! Deterministic stand-ins for the real network hardware, used by the
//! demos and the test suite. They hold their state in `RefCell`s so
//! the trait methods can stay `&self` like real peripheral calls, and
//! they expose `advance()` hooks the demo loop uses to make the data
//! move. Tests can also script failures to exercise the error path.

use std::cell::RefCell;

use super::{
    CellStatus, CraftingCpu, CraftingJob, EnergyReading, EnergyStorage, FluidStack, ItemStack,
    MachineRack, MachineState, MachineStatus, MeBridge, PeripheralError, StorageTotals,
};

// =============================================================================
// ME bridge
// =============================================================================

/// A scripted ME bridge.
pub struct SimMeBridge {
    id: String,
    state: RefCell<MeState>,
}

struct MeState {
    items: Vec<ItemStack>,
    fluids: Vec<FluidStack>,
    cpus: Vec<CraftingCpu>,
    cells: Vec<CellStatus>,
    totals: StorageTotals,
    fail_next: Option<PeripheralError>,
}

impl SimMeBridge {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: RefCell::new(MeState {
                items: Vec::new(),
                fluids: Vec::new(),
                cpus: Vec::new(),
                cells: Vec::new(),
                totals: StorageTotals::default(),
                fail_next: None,
            }),
        }
    }

    /// A bridge pre-loaded with a plausible mid-game network.
    pub fn with_demo_contents(id: impl Into<String>) -> Self {
        let bridge = Self::new(id);
        {
            let mut s = bridge.state.borrow_mut();
            s.items = vec![
                item("minecraft:cobblestone", "Cobblestone", 1_482_130, false),
                item("minecraft:iron_ingot", "Iron Ingot", 84_211, true),
                item("minecraft:gold_ingot", "Gold Ingot", 12_040, true),
                item("ae2:certus_quartz_crystal", "Certus Quartz Crystal", 9_318, true),
                item("minecraft:redstone", "Redstone Dust", 310_774, false),
                item("ae2:silicon", "Silicon", 44_091, true),
                item("minecraft:diamond", "Diamond", 1_206, false),
                item("ae2:logic_processor", "Logic Processor", 732, true),
            ];
            s.fluids = vec![
                FluidStack {
                    id: "minecraft:water".into(),
                    display_name: "Water".into(),
                    amount_mb: 64_000,
                },
                FluidStack {
                    id: "minecraft:lava".into(),
                    display_name: "Lava".into(),
                    amount_mb: 23_500,
                },
            ];
            s.cpus = vec![
                CraftingCpu {
                    name: "cpu_main".into(),
                    storage: 65_536,
                    busy: true,
                    job: Some(CraftingJob {
                        output: "Logic Processor".into(),
                        crafted: 192,
                        total: 256,
                    }),
                },
                CraftingCpu {
                    name: "cpu_aux".into(),
                    storage: 16_384,
                    busy: false,
                    job: None,
                },
            ];
            s.cells = vec![
                cell("cell_64k_a", 49_152, 65_536, 54, 63),
                cell("cell_64k_b", 65_536, 65_536, 63, 63),
                cell("cell_16k", 2_048, 16_384, 9, 63),
            ];
            s.totals = StorageTotals {
                bytes_used: 116_736,
                bytes_total: 147_456,
                item_types: s.items.len() as u32,
            };
        }
        bridge
    }

    pub fn set_items(&self, items: Vec<ItemStack>) {
        self.state.borrow_mut().items = items;
    }

    pub fn set_cpus(&self, cpus: Vec<CraftingCpu>) {
        self.state.borrow_mut().cpus = cpus;
    }

    pub fn set_cells(&self, cells: Vec<CellStatus>) {
        self.state.borrow_mut().cells = cells;
    }

    pub fn set_totals(&self, totals: StorageTotals) {
        self.state.borrow_mut().totals = totals;
    }

    /// Make the next call fail with `err`; subsequent calls succeed.
    pub fn fail_next(&self, err: PeripheralError) {
        self.state.borrow_mut().fail_next = Some(err);
    }

    /// Nudge the scripted counts so demo screens visibly change.
    pub fn advance(&self, step: u64) {
        let mut s = self.state.borrow_mut();
        for (i, stack) in s.items.iter_mut().enumerate() {
            let wobble = ((step + i as u64) % 7) as u64 * 13;
            stack.count = stack.count.saturating_add(wobble).saturating_sub(39);
        }
        if let Some(cpu) = s.cpus.first_mut() {
            if let Some(job) = cpu.job.as_mut() {
                job.crafted = (job.crafted + 4).min(job.total);
                if job.crafted == job.total {
                    cpu.busy = false;
                    cpu.job = None;
                }
            }
        }
    }

    fn take_failure(&self) -> Option<PeripheralError> {
        self.state.borrow_mut().fail_next.take()
    }
}

impl MeBridge for SimMeBridge {
    fn id(&self) -> &str {
        &self.id
    }

    fn items(&self) -> Result<Vec<ItemStack>, PeripheralError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(self.state.borrow().items.clone())
    }

    fn fluids(&self) -> Result<Vec<FluidStack>, PeripheralError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(self.state.borrow().fluids.clone())
    }

    fn crafting_cpus(&self) -> Result<Vec<CraftingCpu>, PeripheralError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(self.state.borrow().cpus.clone())
    }

    fn cells(&self) -> Result<Vec<CellStatus>, PeripheralError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(self.state.borrow().cells.clone())
    }

    fn totals(&self) -> Result<StorageTotals, PeripheralError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        Ok(self.state.borrow().totals)
    }
}

fn item(id: &str, name: &str, count: u64, craftable: bool) -> ItemStack {
    ItemStack {
        id: id.into(),
        display_name: name.into(),
        count,
        craftable,
    }
}

fn cell(id: &str, used: u64, total: u64, types_used: u32, types_total: u32) -> CellStatus {
    CellStatus {
        id: id.into(),
        bytes_used: used,
        bytes_total: total,
        types_used,
        types_total,
    }
}

// =============================================================================
// Energy cell
// =============================================================================

/// A scripted energy store that charges and drains on `advance()`.
pub struct SimEnergyCell {
    id: String,
    state: RefCell<EnergyReading>,
}

impl SimEnergyCell {
    pub fn new(id: impl Into<String>, capacity: u64) -> Self {
        Self {
            id: id.into(),
            state: RefCell::new(EnergyReading {
                stored: capacity / 2,
                capacity,
                flow: 0,
            }),
        }
    }

    pub fn set_reading(&self, reading: EnergyReading) {
        *self.state.borrow_mut() = reading;
    }

    /// Apply a flow for one poll interval (one second of game time).
    pub fn advance(&self, flow: i64) {
        let mut r = self.state.borrow_mut();
        r.flow = flow;
        let delta = flow.saturating_mul(20);
        if delta >= 0 {
            r.stored = r.stored.saturating_add(delta as u64).min(r.capacity);
        } else {
            r.stored = r.stored.saturating_sub(delta.unsigned_abs());
        }
    }
}

impl EnergyStorage for SimEnergyCell {
    fn id(&self) -> &str {
        &self.id
    }

    fn reading(&self) -> Result<EnergyReading, PeripheralError> {
        Ok(*self.state.borrow())
    }
}

// =============================================================================
// Machine rack
// =============================================================================

/// A scripted machine rack with a working enable switch.
pub struct SimMachineRack {
    id: String,
    machines: RefCell<Vec<MachineStatus>>,
}

impl SimMachineRack {
    pub fn new(id: impl Into<String>, machines: Vec<MachineStatus>) -> Self {
        Self {
            id: id.into(),
            machines: RefCell::new(machines),
        }
    }

    /// A rack pre-loaded with a small processing line.
    pub fn with_demo_contents(id: impl Into<String>) -> Self {
        Self::new(
            id,
            vec![
                machine("pulverizer_0", "Pulverizer", MachineState::Active, Some(0.62), 40),
                machine("smelter_0", "Induction Smelter", MachineState::Active, Some(0.18), 80),
                machine("smelter_1", "Induction Smelter", MachineState::Idle, None, 0),
                machine("press_0", "Inscriber Press", MachineState::Blocked, None, 8),
                machine("charger_0", "Charger", MachineState::Disabled, None, 0),
            ],
        )
    }
}

impl MachineRack for SimMachineRack {
    fn id(&self) -> &str {
        &self.id
    }

    fn machines(&self) -> Result<Vec<MachineStatus>, PeripheralError> {
        Ok(self.machines.borrow().clone())
    }

    fn set_enabled(&self, machine_id: &str, enabled: bool) -> Result<(), PeripheralError> {
        let mut machines = self.machines.borrow_mut();
        let m = machines
            .iter_mut()
            .find(|m| m.id == machine_id)
            .ok_or_else(|| PeripheralError::Protocol {
                peripheral: self.id.clone(),
                message: format!("no machine '{}'", machine_id),
            })?;

        m.state = if enabled {
            MachineState::Idle
        } else {
            MachineState::Disabled
        };
        if !enabled {
            m.progress = None;
            m.energy_per_tick = 0;
        }
        Ok(())
    }
}

fn machine(
    id: &str,
    label: &str,
    state: MachineState,
    progress: Option<f32>,
    energy_per_tick: u64,
) -> MachineStatus {
    MachineStatus {
        id: id.into(),
        label: label.into(),
        state,
        progress,
        energy_per_tick,
    }
}
