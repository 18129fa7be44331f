//! ME storage network bridge.
//!
//! The bridge exposes what the storage network knows: item and fluid
//! indexes, crafting CPUs, storage cell health, capacity totals. The
//! views only read; crafting orders and inventory mutation belong to
//! the automation layer, not the monitors.

use super::PeripheralError;

/// One item type in the network index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    /// Registry id, e.g. `minecraft:iron_ingot`.
    pub id: String,
    /// Human-readable name shown on monitors.
    pub display_name: String,
    pub count: u64,
    /// Whether the network has a pattern to craft more.
    pub craftable: bool,
}

/// One fluid type in the network index, amount in millibuckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FluidStack {
    pub id: String,
    pub display_name: String,
    pub amount_mb: u64,
}

/// A crafting CPU and whatever job it is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftingCpu {
    pub name: String,
    /// Co-processor storage in bytes.
    pub storage: u64,
    pub busy: bool,
    pub job: Option<CraftingJob>,
}

/// Progress of an active crafting job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftingJob {
    /// Display name of the job's primary output.
    pub output: String,
    pub crafted: u64,
    pub total: u64,
}

impl CraftingJob {
    /// Completion fraction in 0..=1.
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.crafted as f32 / self.total as f32).clamp(0.0, 1.0)
    }
}

/// Health of one storage cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellStatus {
    pub id: String,
    pub bytes_used: u64,
    pub bytes_total: u64,
    pub types_used: u32,
    pub types_total: u32,
}

impl CellStatus {
    pub fn byte_fill(&self) -> f32 {
        if self.bytes_total == 0 {
            return 0.0;
        }
        (self.bytes_used as f32 / self.bytes_total as f32).clamp(0.0, 1.0)
    }

    pub fn type_fill(&self) -> f32 {
        if self.types_total == 0 {
            return 0.0;
        }
        (self.types_used as f32 / self.types_total as f32).clamp(0.0, 1.0)
    }
}

/// Network-wide storage totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StorageTotals {
    pub bytes_used: u64,
    pub bytes_total: u64,
    pub item_types: u32,
}

/// The ME bridge peripheral.
pub trait MeBridge {
    /// Stable peripheral id, e.g. `me_bridge_0`.
    fn id(&self) -> &str;

    /// Full item index, unsorted.
    fn items(&self) -> Result<Vec<ItemStack>, PeripheralError>;

    /// Full fluid index, unsorted.
    fn fluids(&self) -> Result<Vec<FluidStack>, PeripheralError>;

    /// All crafting CPUs.
    fn crafting_cpus(&self) -> Result<Vec<CraftingCpu>, PeripheralError>;

    /// All storage cells.
    fn cells(&self) -> Result<Vec<CellStatus>, PeripheralError>;

    /// Network capacity totals.
    fn totals(&self) -> Result<StorageTotals, PeripheralError>;
}
