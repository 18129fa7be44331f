//! Item index view.
//!
//! The network's item list, sorted and compacted. Craftable items get
//! a marker so operators can tell at a glance what the network can
//! make more of.

use std::time::Duration;

use crate::config::ConfigSchema;
use crate::fmt;
use crate::peripheral::{PeripheralError, PeripheralKind};
use crate::types::Tone;
use crate::view::{chrome, Entry, Strategy, ViewSpec};

pub fn spec() -> ViewSpec {
    ViewSpec {
        name: "items",
        title: "Item Index".to_string(),
        requires: vec![PeripheralKind::MeBridge],
        schema: ConfigSchema::new()
            .choice("sort", "count", &["count", "name"])
            .int("min_count", 0, 0, i64::MAX),
        default_refresh: Duration::from_secs(2),
        show_header: true,
        show_footer: true,
        strategy: Strategy::List {
            fetch: Box::new(|bus, cfg| {
                let bridge = bus
                    .me_bridge()
                    .ok_or_else(|| PeripheralError::Detached("me_bridge".into()))?;

                let min_count = cfg.get_int("min_count", 0).max(0) as u64;
                let mut items: Vec<_> = bridge
                    .items()?
                    .into_iter()
                    .filter(|i| i.count >= min_count)
                    .collect();

                match cfg.get_text("sort", "count") {
                    "name" => items.sort_by(|a, b| a.display_name.cmp(&b.display_name)),
                    _ => items.sort_by(|a, b| b.count.cmp(&a.count)),
                }

                Ok(items
                    .into_iter()
                    .map(|item| {
                        let detail = if item.craftable {
                            format!("{} ⚒", fmt::compact(item.count))
                        } else {
                            fmt::compact(item.count)
                        };
                        Entry::new(item.id, item.display_name)
                            .detail(detail)
                            .tone(if item.craftable { Tone::Good } else { Tone::Normal })
                    })
                    .collect())
            }),
            paint: chrome::standard_row(),
        },
    }
}
