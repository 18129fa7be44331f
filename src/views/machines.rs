//! Machine rack view.
//!
//! Interactive list of the rack's machines. Tapping a row toggles the
//! machine through the rack peripheral: disabled machines come back
//! up, anything else is shut down. The fetch pulled forward by the
//! host after a tap makes the new state visible within a tick.

use std::time::Duration;

use crate::config::ConfigSchema;
use crate::fmt;
use crate::peripheral::{MachineState, MachineStatus, PeripheralError, PeripheralKind};
use crate::types::Tone;
use crate::view::{chrome, Entry, Strategy, ViewSpec};

pub fn spec() -> ViewSpec {
    ViewSpec {
        name: "machines",
        title: "Machines".to_string(),
        requires: vec![PeripheralKind::MachineRack],
        schema: ConfigSchema::new().bool("show_idle", true),
        default_refresh: Duration::from_secs(1),
        show_header: true,
        show_footer: true,
        strategy: Strategy::InteractiveList {
            fetch: Box::new(|bus, cfg| {
                let rack = bus
                    .rack()
                    .ok_or_else(|| PeripheralError::Detached("machine_rack".into()))?;

                let show_idle = cfg.get_bool("show_idle", true);
                Ok(rack
                    .machines()?
                    .into_iter()
                    .filter(|m| show_idle || m.state != MachineState::Idle)
                    .map(entry_for)
                    .collect())
            }),
            paint: chrome::standard_row(),
            on_select: Box::new(|bus, entry| {
                let rack = bus
                    .rack()
                    .ok_or_else(|| PeripheralError::Detached("machine_rack".into()))?;

                let machines = rack.machines()?;
                let machine = machines
                    .iter()
                    .find(|m| m.id == entry.key)
                    .ok_or_else(|| PeripheralError::Protocol {
                        peripheral: rack.id().to_string(),
                        message: format!("no machine '{}'", entry.key),
                    })?;

                rack.set_enabled(&entry.key, machine.state == MachineState::Disabled)
            }),
        },
    }
}

fn entry_for(m: MachineStatus) -> Entry {
    let tone = match m.state {
        MachineState::Active => Tone::Good,
        MachineState::Idle => Tone::Normal,
        MachineState::Blocked => Tone::Bad,
        MachineState::Disabled => Tone::Muted,
    };

    let detail = match (m.state, m.progress) {
        (MachineState::Active, Some(p)) => {
            format!("{} · {} {}", fmt::rate(m.energy_per_tick as i64), fmt::percent(p), m.state.label())
        }
        _ => m.state.label().to_string(),
    };

    Entry::new(m.id, m.label).detail(detail).tone(tone)
}
