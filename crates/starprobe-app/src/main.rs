use anyhow::Result;
use rand::{SeedableRng, rngs::SmallRng};
use starprobe_core::{Simulation, StarCatalog, StarId, TickSink, TickSummary};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

mod report;
mod settings;
mod starfield;

use settings::AppSettings;

/// Forwards interval summaries to the tracing layer while a run is live.
struct ProgressSink;

impl TickSink for ProgressSink {
    fn on_tick(&mut self, summary: &TickSummary) {
        info!(
            tick = summary.tick.0,
            probes = summary.probe_count,
            active = summary.active_probes,
            explored = summary.explored_stars,
            births = summary.births,
            "simulation progress",
        );
    }
}

fn main() -> Result<()> {
    init_tracing();

    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("config.json"), PathBuf::from);
    let settings = load_settings(&config_path);

    let seed = settings.world_seed.unwrap_or_else(rand::random);
    let config = settings.simulation_config(seed);

    let mut field_rng = SmallRng::seed_from_u64(seed);
    let records = starfield::generate(settings.star_count(), config.universe_rect(), &mut field_rng);
    let catalog = StarCatalog::new(records)?;
    info!(stars = catalog.len(), seed, "starfield generated");

    let mut sim = Simulation::with_sink(config, catalog, Box::new(ProgressSink))?;
    let stats = sim.build_stats();
    if stats.dropped_out_of_bounds > 0 {
        warn!(
            dropped = stats.dropped_out_of_bounds,
            "stars outside the universe boundary were not indexed"
        );
    }

    // The first probe launches from Sol at the universe center, its own
    // system already visited.
    sim.seed_probe("SOL-SOL-AAA", StarId(0))?;
    info!(
        iterations = sim.config().iterations,
        radius = sim.config().seek_radius,
        replication_limit = sim.config().replication_limit,
        "starting probe simulation"
    );

    let outcome = sim.run();
    info!(
        ticks = outcome.ticks_run,
        probes = sim.probes().len(),
        explored = sim.catalog().explored_count(),
        stopped_early = outcome.stopped_early,
        "simulation finished"
    );

    report::print(&sim, &settings.summary, seed, outcome);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_settings(path: &Path) -> AppSettings {
    if path.exists() {
        match AppSettings::load(path) {
            Ok(settings) => {
                info!(path = %path.display(), "loaded configuration");
                return settings;
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "config file unusable, using defaults");
            }
        }
    } else {
        warn!(path = %path.display(), "no config file found, using defaults");
    }
    AppSettings::default()
}
