//! Showroom - drive the view stack on the local terminal.
//!
//! Wires simulated peripherals to a terminal monitor so layouts can
//! be previewed without hardware. The sims are nudged every second so
//! the screens visibly live. Click the footer buttons to page; click
//! machine rows to toggle them; press `q` to quit.
//!
//! Run with: cargo run --example showroom -- --view machines

use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gridwatch::config::Config;
use gridwatch::manager::{Manager, ViewRegistry};
use gridwatch::monitor::{Monitor, TerminalMonitor};
use gridwatch::peripheral::sim::{SimEnergyCell, SimMachineRack, SimMeBridge};
use gridwatch::peripheral::PeripheralBus;
use gridwatch::runtime::Runtime;

#[derive(Parser)]
#[command(about = "Preview gridwatch views on the local terminal")]
struct Args {
    /// View to show (items, cells, crafting, machines, energy).
    #[arg(long, default_value = "items")]
    view: String,

    /// Refresh interval in milliseconds.
    #[arg(long, default_value_t = 1000)]
    refresh_ms: u64,
}

fn main() -> anyhow::Result<()> {
    // Log to stderr; the alternate screen owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let me = Rc::new(SimMeBridge::with_demo_contents("me_0"));
    let energy = Rc::new(SimEnergyCell::new("cell_0", 8_000_000));
    let rack = Rc::new(SimMachineRack::with_demo_contents("rack_0"));

    let mut bus = PeripheralBus::new();
    bus.attach_me_bridge(me.clone());
    bus.attach_energy(energy.clone());
    bus.attach_rack(rack.clone());

    let config = Config::from_str(&format!(
        "[monitors.terminal]\nview = \"{}\"\nrefresh_ms = {}",
        args.view, args.refresh_ms
    ))
    .context("demo config")?;

    let monitor = TerminalMonitor::new("terminal").context("terminal takeover")?;
    let manager = Manager::new(ViewRegistry::with_builtins());
    let stations = manager.assign(
        &config,
        &bus,
        vec![Box::new(monitor) as Box<dyn Monitor>],
    )?;

    let mut runtime = Runtime::new(
        stations,
        bus,
        Duration::from_millis(config.poll_budget_ms),
    );

    // Manual tick loop so the sims can be advanced between frames.
    let mut step: u64 = 0;
    let mut last_advance = Instant::now();
    while runtime.is_running() {
        let now = Instant::now();
        runtime.tick(now)?;

        if last_advance.elapsed() >= Duration::from_secs(1) {
            step += 1;
            me.advance(step);
            // Charge for a while, then let the wall watch it drain.
            energy.advance(if step % 20 < 12 { 900 } else { -1400 });
            last_advance = now;
        }

        std::thread::sleep(Duration::from_millis(25));
    }

    Ok(())
}
