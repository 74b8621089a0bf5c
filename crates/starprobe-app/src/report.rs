//! End-of-run summary output.

use crate::settings::SummarySettings;
use starprobe_core::{RunOutcome, Simulation};

/// Print the run report to stdout: optional per-probe lines for every
/// probe that traveled and replicated, then the aggregate footer.
pub fn print(sim: &Simulation, summary: &SummarySettings, seed: u64, outcome: RunOutcome) {
    println!("-----------------");
    println!("Simulation Summary");
    println!("-----------------");

    if summary.show_per_probe {
        for (_, probe) in sim.probes().iter() {
            if probe.total_distance() <= 0.0 || probe.replication_count() == 0 {
                continue;
            }
            let visited: Vec<String> = probe
                .memory()
                .iter()
                .filter(|entry| entry.visited_by_probe)
                .map(|entry| format!("[{}]", entry.star.0))
                .collect();
            println!(
                "- Probe [{}] traveled [{:.1}], replicated [{}] times, visiting {}",
                probe.name(),
                probe.total_distance(),
                probe.replication_count(),
                visited.join(";"),
            );
        }
    }

    if summary.show_footer {
        let star_count = sim.catalog().len();
        let probe_count = sim.probes().len();
        let explored = sim.catalog().explored_count();
        // Deterministic analogue of the original wall-clock ratio:
        // coverage per tick per probe.
        let efficiency = if outcome.ticks_run > 0 && probe_count > 0 {
            explored as f64 / (outcome.ticks_run as f64 * probe_count as f64)
        } else {
            0.0
        };
        println!("World seed [{seed}], ran [{}] ticks", outcome.ticks_run);
        println!("Total stars: {star_count}");
        println!("Total probes: {probe_count}");
        println!("Stars explored: {explored}");
        if outcome.stopped_early {
            println!("Stopped early: all probes shut down");
        }
        println!("Efficiency ratio: {efficiency:.6}");
        println!("-----------------");
    }
}
