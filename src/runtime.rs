//! Runtime loop.
//!
//! Single-threaded and cooperative. Each tick: dispatch touches,
//! refresh the stations whose deadline passed, render what changed,
//! drop stations whose monitor went away. Peripheral polling is the
//! expensive part - a slow bridge call can eat tens of milliseconds -
//! so refreshes are served under a per-tick time budget, in rotating
//! order. A station that doesn't get served keeps its deadline and
//! goes first next tick; touches are handled every tick regardless,
//! which is what keeps the wall responsive next to a slow peripheral.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::manager::Station;
use crate::peripheral::PeripheralBus;

/// Upper bound on the tick sleep, so touches stay responsive even
/// when every refresh deadline is far away.
const MAX_IDLE_SLEEP: Duration = Duration::from_millis(50);

/// What one tick did, for logs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Touches dispatched to views.
    pub touches: usize,
    /// Stations whose fetch ran.
    pub refreshed: usize,
    /// Stations that were due but deferred by the poll budget.
    pub deferred: usize,
    /// Stations that flushed cells to their monitor.
    pub rendered: usize,
    /// Stations dropped because their monitor closed.
    pub closed: usize,
}

/// The station scheduler.
pub struct Runtime {
    stations: Vec<Station>,
    bus: PeripheralBus,
    poll_budget: Duration,
    /// Index of the next station to serve first, for rotation.
    resume_at: usize,
    running: bool,
}

impl Runtime {
    pub fn new(stations: Vec<Station>, bus: PeripheralBus, poll_budget: Duration) -> Self {
        Self {
            stations,
            bus,
            poll_budget,
            resume_at: 0,
            running: true,
        }
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn bus(&self) -> &PeripheralBus {
        &self.bus
    }

    pub fn is_running(&self) -> bool {
        self.running && !self.stations.is_empty()
    }

    /// Ask the loop to wind down after the current tick.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Run one tick at `now`.
    pub fn tick(&mut self, now: Instant) -> io::Result<TickReport> {
        let mut report = TickReport::default();

        // Touches first: they are cheap, and a tap must not wait out
        // a wall of slow refreshes.
        for station in &mut self.stations {
            for touch in station.monitor.drain_touches() {
                report.touches += 1;
                station.host.handle_touch(touch, &self.bus);
            }
        }

        // Refresh due stations under the poll budget, starting where
        // the last tick left off.
        let started = Instant::now();
        let count = self.stations.len();
        for i in 0..count {
            let idx = (self.resume_at + i) % count;
            if !self.stations[idx].host.due(now) {
                continue;
            }

            if report.refreshed > 0 && started.elapsed() >= self.poll_budget {
                report.deferred += 1;
                continue;
            }

            self.stations[idx].host.refresh(&self.bus, now);
            report.refreshed += 1;
            self.resume_at = (idx + 1) % count;
        }

        // Render whatever changed.
        for station in &mut self.stations {
            if station.host.render(station.monitor.as_mut())? {
                report.rendered += 1;
            }
        }

        // Drop closed monitors.
        let before = self.stations.len();
        self.stations.retain(|s| !s.monitor.should_close());
        report.closed = before - self.stations.len();

        if report != TickReport::default() {
            debug!(?report, "tick");
        }
        Ok(report)
    }

    /// Earliest scheduled refresh across all stations.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.stations
            .iter()
            .filter_map(|s| s.host.next_refresh())
            .min()
    }

    /// Block until every monitor closes or `stop()` is observed.
    pub fn run(&mut self) -> io::Result<()> {
        while self.is_running() {
            let now = Instant::now();
            self.tick(now)?;

            let sleep = match self.next_deadline() {
                Some(deadline) => deadline
                    .saturating_duration_since(Instant::now())
                    .min(MAX_IDLE_SLEEP),
                None => MAX_IDLE_SLEEP,
            };
            if !sleep.is_zero() {
                thread::sleep(sleep);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::manager::{Manager, ViewRegistry};
    use crate::monitor::{BufferMonitor, Monitor};
    use crate::peripheral::sim::{SimEnergyCell, SimMeBridge};
    use std::rc::Rc;

    fn bus() -> PeripheralBus {
        let mut bus = PeripheralBus::new();
        bus.attach_me_bridge(Rc::new(SimMeBridge::with_demo_contents("me_0")));
        bus.attach_energy(Rc::new(SimEnergyCell::new("cell_0", 8_000_000)));
        bus
    }

    fn runtime(monitor_ids: &[&str], config: &str) -> Runtime {
        let config = Config::from_str(config).unwrap();
        let bus = bus();
        let monitors: Vec<Box<dyn Monitor>> = monitor_ids
            .iter()
            .map(|id| Box::new(BufferMonitor::new(*id, 30, 10)) as Box<dyn Monitor>)
            .collect();

        let manager = Manager::new(ViewRegistry::with_builtins());
        let stations = manager.assign(&config, &bus, monitors).unwrap();
        Runtime::new(
            stations,
            bus,
            Duration::from_millis(config.poll_budget_ms.max(1)),
        )
    }

    #[test]
    fn test_first_tick_refreshes_and_renders() {
        let mut rt = runtime(&["a", "b"], "");
        let report = rt.tick(Instant::now()).unwrap();

        assert_eq!(report.refreshed, 2);
        assert_eq!(report.rendered, 2);
        assert_eq!(report.closed, 0);
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let mut rt = runtime(&["a"], "");
        rt.tick(Instant::now()).unwrap();

        // Immediately after, nothing is due and nothing changed.
        let report = rt.tick(Instant::now()).unwrap();
        assert_eq!(report.refreshed, 0);
        assert_eq!(report.rendered, 0);
    }

    #[test]
    fn test_deadline_scheduling() {
        let mut rt = runtime(&["a"], "[monitors.a]\nview = \"items\"\nrefresh_ms = 200");
        let t0 = Instant::now();
        rt.tick(t0).unwrap();

        let deadline = rt.next_deadline().unwrap();
        assert!(deadline > t0);

        // Well before the deadline: not due.
        let report = rt.tick(t0 + Duration::from_millis(50)).unwrap();
        assert_eq!(report.refreshed, 0);

        // Past the deadline: due again.
        let report = rt.tick(t0 + Duration::from_millis(250)).unwrap();
        assert_eq!(report.refreshed, 1);
    }

    #[test]
    fn test_poll_budget_defers_but_serves_at_least_one() {
        // A zero-ish budget forces one refresh per tick; rotation
        // still gets every station served across consecutive ticks.
        let mut rt = runtime(&["a", "b", "c"], "poll_budget_ms = 0");
        // Budget floor in the harness is 1ms; make ordering explicit
        // by using a budget the test controls.
        rt.poll_budget = Duration::ZERO;

        let t0 = Instant::now();
        let r1 = rt.tick(t0).unwrap();
        assert_eq!(r1.refreshed, 1);
        assert_eq!(r1.deferred, 2);

        let r2 = rt.tick(t0).unwrap();
        assert_eq!(r2.refreshed, 1);

        let r3 = rt.tick(t0).unwrap();
        assert_eq!(r3.refreshed, 1);

        // All three got their turn; nothing is due at t0 anymore.
        let r4 = rt.tick(t0).unwrap();
        assert_eq!(r4.refreshed, 0);
    }

    #[test]
    fn test_touch_dispatch_through_tick() {
        // items on a tiny monitor: 8 demo items, 7 body rows -> 2 pages.
        let config = "[monitors.a]\nview = \"items\"";
        let bus = bus();
        let mut monitor = BufferMonitor::new("a", 24, 8);
        monitor.push_touch(21, 7); // page-forward button

        let manager = Manager::new(ViewRegistry::with_builtins());
        let stations = manager
            .assign(
                &Config::from_str(config).unwrap(),
                &bus,
                vec![Box::new(monitor) as Box<dyn Monitor>],
            )
            .unwrap();
        let mut rt = Runtime::new(stations, bus, Duration::from_millis(30));

        // The queued touch is drained and dispatched on the first
        // tick (before the first render it lands on no zone).
        let report = rt.tick(Instant::now()).unwrap();
        assert_eq!(report.touches, 1);
        assert_eq!(report.rendered, 1);
    }

    #[test]
    fn test_closed_monitor_drops_station() {
        let bus = bus();
        let mut monitor = BufferMonitor::new("a", 24, 8);
        monitor.close();

        let manager = Manager::new(ViewRegistry::with_builtins());
        let stations = manager
            .assign(
                &Config::default(),
                &bus,
                vec![Box::new(monitor) as Box<dyn Monitor>],
            )
            .unwrap();
        let mut rt = Runtime::new(stations, bus, Duration::from_millis(30));

        assert!(rt.is_running());
        let report = rt.tick(Instant::now()).unwrap();
        assert_eq!(report.closed, 1);
        assert_eq!(rt.station_count(), 0);
        assert!(!rt.is_running());
    }

    #[test]
    fn test_stop() {
        let mut rt = runtime(&["a"], "");
        assert!(rt.is_running());
        rt.stop();
        assert!(!rt.is_running());
        rt.run().unwrap();
    }
}
