//! Storage cell utilization view.
//!
//! One grid cell per storage cell: byte fill bar plus a type count.
//! Cells close to full flip to warning colors - a network whose cells
//! run out of types silently stops accepting new items, which is
//! exactly what this wall panel exists to catch.

use std::time::Duration;

use crate::config::ConfigSchema;
use crate::fmt;
use crate::peripheral::{CellStatus, PeripheralError, PeripheralKind};
use crate::types::Tone;
use crate::view::{chrome, Entry, Strategy, ViewSpec};

/// Byte fill above this is a warning, above `BAD_FILL` a fault color.
const WARN_FILL: f32 = 0.75;
const BAD_FILL: f32 = 0.95;

pub fn spec() -> ViewSpec {
    ViewSpec {
        name: "cells",
        title: "Storage Cells".to_string(),
        requires: vec![PeripheralKind::MeBridge],
        schema: ConfigSchema::new().int("columns", 2, 1, 6),
        default_refresh: Duration::from_secs(5),
        show_header: true,
        show_footer: true,
        strategy: Strategy::Grid {
            columns: 2,
            cell_height: 4,
            fetch: Box::new(|bus, _cfg| {
                let bridge = bus
                    .me_bridge()
                    .ok_or_else(|| PeripheralError::Detached("me_bridge".into()))?;

                // Network totals lead the grid, then the individual cells.
                let mut entries = vec![totals_entry(bridge.totals()?)];
                entries.extend(bridge.cells()?.into_iter().map(entry_for));
                Ok(entries)
            }),
            paint: chrome::bar_cell(),
        },
    }
}

fn totals_entry(totals: crate::peripheral::StorageTotals) -> Entry {
    let fill = if totals.bytes_total == 0 {
        0.0
    } else {
        (totals.bytes_used as f32 / totals.bytes_total as f32).clamp(0.0, 1.0)
    };
    let tone = if fill >= BAD_FILL {
        Tone::Bad
    } else if fill >= WARN_FILL {
        Tone::Warn
    } else {
        Tone::Good
    };

    Entry::new("network", "network")
        .detail(format!(
            "{}/{} · {} types",
            fmt::compact(totals.bytes_used),
            fmt::compact(totals.bytes_total),
            totals.item_types
        ))
        .fill(fill)
        .tone(tone)
}

fn entry_for(cell: CellStatus) -> Entry {
    let fill = cell.byte_fill();
    let tone = if fill >= BAD_FILL || cell.type_fill() >= 1.0 {
        Tone::Bad
    } else if fill >= WARN_FILL {
        Tone::Warn
    } else {
        Tone::Good
    };

    let detail = format!(
        "{}/{} · {}/{} types",
        fmt::compact(cell.bytes_used),
        fmt::compact(cell.bytes_total),
        cell.types_used,
        cell.types_total
    );

    Entry::new(cell.id.clone(), cell.id)
        .detail(detail)
        .fill(fill)
        .tone(tone)
}
