//! Energy wall view.
//!
//! A custom-strategy view: big gauge of the aggregate stored level,
//! net flow rate, time-to-full/empty estimate, and a sparkline of the
//! recent history. Keeps its own state (the history ring), which is
//! what the custom strategy exists for.

use std::collections::VecDeque;
use std::time::Duration;

use crate::config::{ConfigSchema, ViewConfig};
use crate::fmt;
use crate::peripheral::{EnergyReading, PeripheralBus, PeripheralError, PeripheralKind};
use crate::surface::Pane;
use crate::types::{palette, Attr, Rect, Rgb, Tone};
use crate::view::{CustomView, Strategy, ViewSpec};
use crate::widgets;

/// Samples kept for the sparkline.
const HISTORY: usize = 64;

/// Stored fraction under which the gauge turns warning colors.
const LOW_WATER: f32 = 0.2;

pub fn spec() -> ViewSpec {
    ViewSpec {
        name: "energy",
        title: "Energy".to_string(),
        requires: vec![PeripheralKind::EnergyStorage],
        schema: ConfigSchema::new().bool("show_history", true),
        default_refresh: Duration::from_secs(1),
        show_header: true,
        show_footer: true,
        strategy: Strategy::Custom(Box::new(EnergyView::new())),
    }
}

/// State of one energy wall panel.
pub struct EnergyView {
    last: Option<EnergyReading>,
    history: VecDeque<f32>,
}

impl EnergyView {
    pub fn new() -> Self {
        Self {
            last: None,
            history: VecDeque::with_capacity(HISTORY),
        }
    }

    /// Sum every store on the bus into one reading.
    fn aggregate(bus: &PeripheralBus) -> Result<EnergyReading, PeripheralError> {
        let mut total = EnergyReading::default();
        let mut seen = false;

        for store in bus.energy_all() {
            let r = store.reading()?;
            total.stored += r.stored;
            total.capacity += r.capacity;
            total.flow += r.flow;
            seen = true;
        }

        if !seen {
            return Err(PeripheralError::Detached("energy_storage".into()));
        }
        Ok(total)
    }

    fn bar_color(fill: f32, flow: i64) -> Rgb {
        if fill < LOW_WATER && flow < 0 {
            Tone::Bad.color()
        } else if fill < LOW_WATER {
            Tone::Warn.color()
        } else {
            palette::GREEN
        }
    }
}

impl Default for EnergyView {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomView for EnergyView {
    fn refresh(&mut self, bus: &PeripheralBus, _cfg: &ViewConfig) -> Result<bool, PeripheralError> {
        let reading = Self::aggregate(bus)?;

        if self.history.len() == HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(reading.fill());

        let changed = self.last != Some(reading);
        self.last = Some(reading);
        // The sparkline shifts every sample, so a repaint is due even
        // when the reading itself is stable.
        Ok(changed || self.history.len() > 1)
    }

    fn draw(&mut self, pane: &mut Pane<'_>, cfg: &ViewConfig) -> Vec<(Rect, u16)> {
        let Some(reading) = self.last else {
            pane.draw_text_centered(pane.height() / 2, "no reading yet", palette::GRAY, None, Attr::NONE);
            return vec![];
        };

        let width = pane.width();
        let fill = reading.fill();
        let color = Self::bar_color(fill, reading.flow);

        // Gauge across the top of the body.
        let gauge_area = Rect::new(1, 1, width.saturating_sub(2), 3);
        let caption = format!(
            "{} / {}",
            fmt::energy(reading.stored),
            fmt::energy(reading.capacity)
        );
        widgets::gauge(pane, gauge_area, fill, &caption, color);

        // Flow line: rate plus the limit estimate.
        let flow_tone = if reading.flow > 0 {
            Tone::Good
        } else if reading.flow < 0 {
            Tone::Warn
        } else {
            Tone::Muted
        };
        let mut line = fmt::rate(reading.flow);
        if let Some(t) = reading.time_to_limit() {
            let word = if reading.flow > 0 { "full" } else { "empty" };
            line = format!("{} · {} in {}", line, word, fmt::eta(t));
        }
        pane.draw_text(1, 5, &line, flow_tone.color(), None, Attr::NONE);

        if cfg.get_bool("show_history", true) && pane.height() > 7 {
            let samples: Vec<f32> = self.history.iter().copied().collect();
            let mut strip = pane.sub(Rect::new(1, 7, width.saturating_sub(2), 1));
            widgets::sparkline(&mut strip, 0, &samples, palette::CYAN);
        }

        vec![]
    }
}
