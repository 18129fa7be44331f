//! Crafting CPU view.
//!
//! One grid cell per CPU: what it is crafting and how far along it is.
//! Idle CPUs are shown muted rather than hidden - a wall of monitors
//! is also an inventory of capacity.

use std::time::Duration;

use crate::config::ConfigSchema;
use crate::fmt;
use crate::peripheral::{CraftingCpu, PeripheralError, PeripheralKind};
use crate::types::Tone;
use crate::view::{chrome, Entry, Strategy, ViewSpec};

pub fn spec() -> ViewSpec {
    ViewSpec {
        name: "crafting",
        title: "Crafting CPUs".to_string(),
        requires: vec![PeripheralKind::MeBridge],
        schema: ConfigSchema::new().int("columns", 2, 1, 4),
        default_refresh: Duration::from_secs(1),
        show_header: true,
        show_footer: true,
        strategy: Strategy::Grid {
            columns: 2,
            cell_height: 4,
            fetch: Box::new(|bus, _cfg| {
                let bridge = bus
                    .me_bridge()
                    .ok_or_else(|| PeripheralError::Detached("me_bridge".into()))?;

                Ok(bridge.crafting_cpus()?.into_iter().map(entry_for).collect())
            }),
            paint: chrome::bar_cell(),
        },
    }
}

fn entry_for(cpu: CraftingCpu) -> Entry {
    match cpu.job {
        Some(job) => {
            let detail = format!(
                "{} {}/{}",
                job.output,
                fmt::compact(job.crafted),
                fmt::compact(job.total)
            );
            Entry::new(cpu.name.clone(), cpu.name)
                .detail(detail)
                .fill(job.progress())
                .tone(Tone::Good)
        }
        None => {
            let detail = format!("idle · {}", fmt::compact(cpu.storage));
            Entry::new(cpu.name.clone(), cpu.name)
                .detail(detail)
                .tone(Tone::Muted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peripheral::CraftingJob;

    #[test]
    fn test_busy_cpu() {
        let e = entry_for(CraftingCpu {
            name: "cpu_main".into(),
            storage: 65_536,
            busy: true,
            job: Some(CraftingJob {
                output: "Logic Processor".into(),
                crafted: 192,
                total: 256,
            }),
        });

        assert_eq!(e.tone, Tone::Good);
        assert_eq!(e.detail, "Logic Processor 192/256");
        assert!((e.fill.unwrap() - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn test_idle_cpu() {
        let e = entry_for(CraftingCpu {
            name: "cpu_aux".into(),
            storage: 16_384,
            busy: false,
            job: None,
        });

        assert_eq!(e.tone, Tone::Muted);
        assert_eq!(e.detail, "idle · 16.4K");
        assert_eq!(e.fill, None);
    }
}
