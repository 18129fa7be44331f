//! End-to-end wall scenarios: simulated peripherals, in-memory
//! monitors, manager assignment, and the runtime loop.

use std::rc::Rc;
use std::time::{Duration, Instant};

use gridwatch::config::Config;
use gridwatch::manager::{Manager, ViewRegistry};
use gridwatch::monitor::{BufferMonitor, Monitor};
use gridwatch::peripheral::sim::{SimEnergyCell, SimMachineRack, SimMeBridge};
use gridwatch::peripheral::{
    EnergyReading, MachineRack, MeBridge, PeripheralBus, PeripheralError,
};
use gridwatch::runtime::Runtime;

struct Wall {
    runtime: Runtime,
    monitors: Vec<BufferMonitor>,
    me: Rc<SimMeBridge>,
    rack: Rc<SimMachineRack>,
    energy: Rc<SimEnergyCell>,
}

/// Build a three-monitor wall over a full simulated bus.
fn wall(config: &str, monitor_ids: &[&str]) -> Wall {
    let me = Rc::new(SimMeBridge::with_demo_contents("me_0"));
    let rack = Rc::new(SimMachineRack::with_demo_contents("rack_0"));
    let energy = Rc::new(SimEnergyCell::new("cell_0", 8_000_000));
    energy.set_reading(EnergyReading {
        stored: 2_000_000,
        capacity: 8_000_000,
        flow: 150,
    });

    let mut bus = PeripheralBus::new();
    bus.attach_me_bridge(me.clone());
    bus.attach_rack(rack.clone());
    bus.attach_energy(energy.clone());

    let monitors: Vec<BufferMonitor> = monitor_ids
        .iter()
        .map(|id| BufferMonitor::new(*id, 36, 12))
        .collect();
    let boxed: Vec<Box<dyn Monitor>> = monitors
        .iter()
        .map(|m| Box::new(m.clone()) as Box<dyn Monitor>)
        .collect();

    let config = Config::from_str(config).expect("config");
    let manager = Manager::new(ViewRegistry::with_builtins());
    let stations = manager.assign(&config, &bus, boxed).expect("assign");

    Wall {
        runtime: Runtime::new(stations, bus, Duration::from_millis(config.poll_budget_ms)),
        monitors,
        me,
        rack,
        energy,
    }
}

#[test]
fn wall_comes_up_with_configured_views() {
    let mut w = wall(
        r#"
        [monitors.storage]
        view = "items"

        [monitors.power]
        view = "energy"

        [monitors.line]
        view = "machines"
        "#,
        &["storage", "power", "line"],
    );

    let report = w.runtime.tick(Instant::now()).unwrap();
    assert_eq!(report.refreshed, 3);
    assert_eq!(report.rendered, 3);

    // Storage monitor: item index sorted by count.
    assert!(w.monitors[0].contains_text("Item Index"));
    assert!(w.monitors[0].contains_text("Cobblestone"));
    assert!(w.monitors[0].contains_text("1.5M"));

    // Power monitor: gauge caption and flow line.
    assert!(w.monitors[1].contains_text("Energy"));
    assert!(w.monitors[1].contains_text("2 MFE / 8 MFE"));
    assert!(w.monitors[1].contains_text("+150 FE/t"));

    // Line monitor: machine list with states.
    assert!(w.monitors[2].contains_text("Machines"));
    assert!(w.monitors[2].contains_text("Pulverizer"));
    assert!(w.monitors[2].contains_text("blocked"));
}

#[test]
fn auto_assignment_fills_bare_monitors() {
    let mut w = wall("", &["a", "b"]);
    w.runtime.tick(Instant::now()).unwrap();

    // Registry order: items first, then cells.
    assert!(w.monitors[0].contains_text("Item Index"));
    assert!(w.monitors[1].contains_text("Storage Cells"));
}

#[test]
fn touch_pages_through_a_list() {
    let mut w = wall("[monitors.storage]\nview = \"items\"", &["storage"]);

    let t0 = Instant::now();
    w.runtime.tick(t0).unwrap();
    // 36x12: header 2 + footer 1 -> 9 rows; 8 demo items fit on one page.
    assert!(w.monitors[0].contains_text("8 entries"));

    // Grow the index past one page via the sim.
    let mut items = w.me.items().unwrap();
    for i in 0..20 {
        items.push(gridwatch::peripheral::ItemStack {
            id: format!("mod:extra_{i}"),
            display_name: format!("Extra Widget {i}"),
            count: 5 + i,
            craftable: false,
        });
    }
    w.me.set_items(items);

    // Next refresh picks up the bigger index and pagination appears.
    let t1 = t0 + Duration::from_secs(3);
    w.runtime.tick(t1).unwrap();
    assert!(w.monitors[0].contains_text("28 entries"));
    assert!(w.monitors[0].contains_text("1/4"));

    // Tap the page-forward button: footer row, width-4.
    w.monitors[0].push_touch(33, 11);
    w.runtime.tick(t1 + Duration::from_millis(10)).unwrap();
    assert!(w.monitors[0].contains_text("2/4"));
}

#[test]
fn tapping_a_machine_toggles_it_through_the_rack() {
    let mut w = wall("[monitors.line]\nview = \"machines\"", &["line"]);

    let t0 = Instant::now();
    w.runtime.tick(t0).unwrap();
    assert!(w.monitors[0].contains_text("Charger"));

    // Demo rack order: charger is the 5th machine -> body row 4.
    // Header is 2 rows, so it sits at y = 6.
    assert!(w.monitors[0].row_text(6).contains("Charger"));
    w.monitors[0].push_touch(4, 6);

    // The tap runs set_enabled and pulls the refresh forward; the
    // same tick's render shows the machine back as idle.
    w.runtime.tick(t0 + Duration::from_millis(10)).unwrap();
    let machines = w.rack.machines().unwrap();
    let charger = machines.iter().find(|m| m.id == "charger_0").unwrap();
    assert_eq!(charger.state, gridwatch::peripheral::MachineState::Idle);
    assert!(w.monitors[0].row_text(6).contains("idle"));
}

#[test]
fn peripheral_fault_shows_panel_and_recovers() {
    let mut w = wall("[monitors.storage]\nview = \"items\"", &["storage"]);

    let t0 = Instant::now();
    w.runtime.tick(t0).unwrap();
    assert!(w.monitors[0].contains_text("Cobblestone"));

    w.me.fail_next(PeripheralError::Detached("me_0".into()));
    w.runtime.tick(t0 + Duration::from_secs(3)).unwrap();
    assert!(w.monitors[0].contains_text("peripheral fault"));
    assert!(w.monitors[0].contains_text("fault")); // header badge
    assert!(!w.monitors[0].contains_text("Cobblestone"));

    // The sim fails once; the next poll recovers.
    w.runtime.tick(t0 + Duration::from_secs(6)).unwrap();
    assert!(w.monitors[0].contains_text("Cobblestone"));
    assert!(!w.monitors[0].contains_text("peripheral fault"));
}

#[test]
fn energy_history_builds_a_sparkline() {
    let mut w = wall("[monitors.power]\nview = \"energy\"", &["power"]);

    let t0 = Instant::now();
    for i in 0..5 {
        w.energy.advance(500);
        w.runtime.tick(t0 + Duration::from_secs(2 * i)).unwrap();
    }

    // Some block characters from the history strip.
    let strip = w.monitors[0].row_text(9);
    assert!(strip.chars().any(|c| ('▁'..='█').contains(&c)));
}

#[test]
fn closing_a_monitor_winds_the_wall_down() {
    let mut w = wall("", &["a", "b"]);

    let t0 = Instant::now();
    w.runtime.tick(t0).unwrap();
    assert_eq!(w.runtime.station_count(), 2);

    w.monitors[0].close();
    let report = w.runtime.tick(t0 + Duration::from_millis(20)).unwrap();
    assert_eq!(report.closed, 1);
    assert_eq!(w.runtime.station_count(), 1);

    w.monitors[1].close();
    w.runtime.tick(t0 + Duration::from_millis(40)).unwrap();
    assert!(!w.runtime.is_running());
}

#[test]
fn unmountable_wall_idles_instead_of_crashing() {
    // A bus with nothing on it: every monitor gets the idle panel.
    let monitors = vec![BufferMonitor::new("alone", 30, 8)];
    let boxed: Vec<Box<dyn Monitor>> = monitors
        .iter()
        .map(|m| Box::new(m.clone()) as Box<dyn Monitor>)
        .collect();

    let manager = Manager::new(ViewRegistry::with_builtins());
    let stations = manager
        .assign(&Config::default(), &PeripheralBus::new(), boxed)
        .unwrap();
    let mut rt = Runtime::new(stations, PeripheralBus::new(), Duration::from_millis(30));

    rt.tick(Instant::now()).unwrap();
    assert!(monitors[0].contains_text("no view assigned"));
    assert!(monitors[0].contains_text("alone"));
}
