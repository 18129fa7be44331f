//! Idle placeholder view.
//!
//! Assigned by the manager to monitors it found nothing mountable
//! for. Keeps the monitor in the station list (so it still reports
//! touches and closure) and shows the operator which monitor this is.

use std::time::Duration;

use crate::config::{ConfigSchema, ViewConfig};
use crate::peripheral::{PeripheralBus, PeripheralError};
use crate::surface::Pane;
use crate::types::Rect;
use crate::view::chrome;
use crate::view::{CustomView, Strategy, ViewSpec};

pub fn spec(monitor_id: &str) -> ViewSpec {
    ViewSpec {
        name: "idle",
        title: String::new(),
        requires: vec![],
        schema: ConfigSchema::new(),
        // Nothing to poll; the long interval keeps it out of the way.
        default_refresh: Duration::from_secs(60),
        show_header: false,
        show_footer: false,
        strategy: Strategy::Custom(Box::new(IdleView {
            monitor_id: monitor_id.to_string(),
        })),
    }
}

struct IdleView {
    monitor_id: String,
}

impl CustomView for IdleView {
    fn refresh(&mut self, _: &PeripheralBus, _: &ViewConfig) -> Result<bool, PeripheralError> {
        Ok(false)
    }

    fn draw(&mut self, pane: &mut Pane<'_>, _: &ViewConfig) -> Vec<(Rect, u16)> {
        chrome::draw_idle_panel(pane, &self.monitor_id);
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{BufferMonitor, Monitor};
    use crate::view::ViewHost;

    #[test]
    fn test_idle_renders_monitor_id() {
        let mut mon = BufferMonitor::new("lobby_east", 30, 8);
        let mut host = ViewHost::new(spec("lobby_east"), ViewConfig::empty(), mon.size()).unwrap();

        let bus = PeripheralBus::new();
        host.refresh(&bus, std::time::Instant::now());
        host.render(&mut mon).unwrap();

        assert!(mon.contains_text("lobby_east"));
        assert!(mon.contains_text("no view assigned"));
    }
}
