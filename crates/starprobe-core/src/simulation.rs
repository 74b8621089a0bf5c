//! The simulation driver: probe population, per-tick update protocol,
//! and tick summaries.
//!
//! Each tick runs a fixed pipeline: scan a pre-tick snapshot for probes
//! in Replicate mode, spawn their children, append the children to the
//! population, then move every probe (children included) exactly once in
//! population order.

use crate::{
    Probe, ProbeMode, QuadTree, SimulationConfig, SimulationError, StarCatalog, StarId, Tick,
    TickContext, Vec2, naming,
};
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

new_key_type! {
    /// Stable handle for probes backed by a generational slot map.
    pub struct ProbeId;
}

/// Probe population. Handles are generational; iteration follows
/// insertion order, which is the tick driver's movement order.
#[derive(Debug, Default)]
pub struct ProbeArena {
    probes: SlotMap<ProbeId, Probe>,
    order: Vec<ProbeId>,
}

impl ProbeArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a probe to the population, returning its handle.
    pub fn insert(&mut self, probe: Probe) -> ProbeId {
        let id = self.probes.insert(probe);
        self.order.push(id);
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: ProbeId) -> bool {
        self.probes.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: ProbeId) -> Option<&Probe> {
        self.probes.get(id)
    }

    #[must_use]
    pub fn get_mut(&mut self, id: ProbeId) -> Option<&mut Probe> {
        self.probes.get_mut(id)
    }

    /// Handles in population (insertion) order.
    pub fn iter_handles(&self) -> impl Iterator<Item = ProbeId> + '_ {
        self.order.iter().copied()
    }

    /// Probes in population order.
    pub fn iter(&self) -> impl Iterator<Item = (ProbeId, &Probe)> {
        self.order.iter().filter_map(|&id| {
            self.probes.get(id).map(|probe| (id, probe))
        })
    }
}

/// Events emitted by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvents {
    pub tick: Tick,
    /// Children appended to the population this tick.
    pub births: usize,
    /// Whether every probe is now in Shutdown.
    pub all_shutdown: bool,
}

/// Aggregate state of the population after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSummary {
    pub tick: Tick,
    pub probe_count: usize,
    pub births: usize,
    /// Probes not in Shutdown.
    pub active_probes: usize,
    pub explored_stars: usize,
    /// Cumulative distance traveled across the whole population.
    pub total_distance: f32,
}

/// Observer notified with tick summaries on the configured interval.
/// The default [`NullSink`] drops them.
pub trait TickSink {
    fn on_tick(&mut self, summary: &TickSummary);
}

/// Sink that ignores every summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TickSink for NullSink {
    fn on_tick(&mut self, _summary: &TickSummary) {}
}

/// Outcome of the spatial index build at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IndexBuildStats {
    pub inserted: usize,
    /// Stars whose coordinates fell outside the universe boundary.
    pub dropped_out_of_bounds: usize,
}

/// Result of [`Simulation::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub ticks_run: u64,
    /// Whether the run ended before the tick budget because every probe
    /// had shut down.
    pub stopped_early: bool,
}

/// Owns the catalog, index, probe population, and RNG; drives ticks.
pub struct Simulation {
    config: SimulationConfig,
    tick: Tick,
    rng: SmallRng,
    catalog: StarCatalog,
    index: QuadTree,
    probes: ProbeArena,
    history: VecDeque<TickSummary>,
    sink: Box<dyn TickSink>,
    build_stats: IndexBuildStats,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.tick)
            .field("probe_count", &self.probes.len())
            .field("star_count", &self.catalog.len())
            .finish()
    }
}

impl Simulation {
    /// Build a simulation over the supplied catalog.
    pub fn new(config: SimulationConfig, catalog: StarCatalog) -> Result<Self, SimulationError> {
        Self::with_sink(config, catalog, Box::new(NullSink))
    }

    /// Build a simulation forwarding tick summaries to `sink`.
    pub fn with_sink(
        config: SimulationConfig,
        catalog: StarCatalog,
        sink: Box<dyn TickSink>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let mut index = QuadTree::new(config.universe_rect(), config.quadtree_capacity)?;
        let mut build_stats = IndexBuildStats::default();
        for point in catalog.points() {
            if index.insert(point) {
                build_stats.inserted += 1;
            } else {
                build_stats.dropped_out_of_bounds += 1;
            }
        }
        let rng = config.seeded_rng();
        let history_capacity = config.history_capacity;
        Ok(Self {
            config,
            tick: Tick::zero(),
            rng,
            catalog,
            index,
            probes: ProbeArena::new(),
            history: VecDeque::with_capacity(history_capacity),
            sink,
            build_stats,
        })
    }

    /// Place the first probe at a catalog star. The origin star counts as
    /// already visited: it is marked explored and recorded self-visited,
    /// and the probe starts seeking rather than dispersing.
    pub fn seed_probe(
        &mut self,
        name: impl Into<String>,
        origin: StarId,
    ) -> Result<ProbeId, SimulationError> {
        let position = self
            .catalog
            .get(origin)
            .map(|star| star.position())
            .ok_or(SimulationError::UnknownStar(origin))?;
        let mut probe = Probe::new(name, position, self.config.seek_speed);
        probe.set_new_born(false);
        probe.randomize_trail_color(&mut self.rng);
        probe.remember(origin, position, true);
        self.catalog.mark_explored(origin);
        Ok(self.probes.insert(probe))
    }

    /// Append an externally constructed probe. Exposed for the host layer
    /// and tests; replication goes through the tick pipeline instead.
    pub fn spawn_probe(&mut self, probe: Probe) -> ProbeId {
        self.probes.insert(probe)
    }

    /// Execute one tick of the fixed pipeline.
    pub fn step(&mut self) -> TickEvents {
        let next_tick = self.tick.next();
        let births = self.stage_replication();
        self.stage_movement();
        self.stage_summary(next_tick, births);
        self.tick = next_tick;
        TickEvents {
            tick: self.tick,
            births,
            all_shutdown: self.all_shutdown(),
        }
    }

    /// Run until the configured iteration budget, or earlier when every
    /// probe has shut down and early exit is enabled.
    pub fn run(&mut self) -> RunOutcome {
        let mut ticks_run = 0;
        for _ in 0..self.config.iterations {
            let events = self.step();
            ticks_run += 1;
            if self.config.stop_when_all_shutdown && events.all_shutdown {
                return RunOutcome {
                    ticks_run,
                    stopped_early: ticks_run < u64::from(self.config.iterations),
                };
            }
        }
        RunOutcome {
            ticks_run,
            stopped_early: false,
        }
    }

    /// Snapshot-scan for Replicate-mode probes and spawn their children.
    /// Probes added during this stage are never considered by it.
    fn stage_replication(&mut self) -> usize {
        let replicators: Vec<ProbeId> = self
            .probes
            .iter()
            .filter(|(_, probe)| matches!(probe.mode(), ProbeMode::Replicate))
            .map(|(id, _)| id)
            .collect();

        let mut children = Vec::new();
        for id in replicators {
            let Some(parent) = self.probes.get(id) else {
                continue;
            };
            if parent.replication_count() >= self.config.replication_limit {
                if let Some(parent) = self.probes.get_mut(id) {
                    parent.force_shutdown();
                }
                continue;
            }
            let parent = parent.clone();

            // The parent sits at the star it just arrived at; that star
            // names the child's birthplace.
            let location_name = parent
                .last_visited_star()
                .and_then(|star| self.catalog.get(star))
                .map_or_else(|| parent.name().to_string(), |star| star.name().to_string());
            let mut child = Probe::new(
                naming::child_name(parent.name(), &location_name),
                parent.position(),
                parent.speed(),
            );
            child.randomize_trail_color(&mut self.rng);

            // The child inherits the parent's whole memory as hearsay.
            for entry in parent.memory() {
                child.remember(entry.star, entry.coordinates, false);
            }

            // Hand the parent's next candidate to the child so the two do
            // not race for the same star.
            let next_target = self.index.nearest_within(
                parent.position().x,
                parent.position().y,
                self.config.seek_radius,
                |star| {
                    self.catalog
                        .get(star)
                        .is_some_and(|found| !found.is_explored())
                        && !parent.remembers(star)
                },
            );
            if let Some(hit) = next_target {
                child.remember(hit.id, Vec2::new(hit.x, hit.y), false);
            }

            children.push(child);
        }

        let births = children.len();
        for child in children {
            self.probes.insert(child);
        }
        births
    }

    /// Move every probe once, in population order, children included.
    fn stage_movement(&mut self) {
        let Self {
            config,
            rng,
            catalog,
            index,
            probes,
            ..
        } = self;
        let handles: Vec<ProbeId> = probes.iter_handles().collect();
        for id in handles {
            if let Some(probe) = probes.get_mut(id) {
                let mut ctx = TickContext {
                    index: &*index,
                    catalog: &mut *catalog,
                    config: &*config,
                    rng: &mut *rng,
                };
                probe.advance(&mut ctx);
            }
        }
    }

    /// Record the post-tick summary and notify the sink on its interval.
    fn stage_summary(&mut self, next_tick: Tick, births: usize) {
        let active_probes = self
            .probes
            .iter()
            .filter(|(_, probe)| !probe.is_shutdown())
            .count();
        let total_distance = self
            .probes
            .iter()
            .map(|(_, probe)| probe.total_distance())
            .sum();
        let summary = TickSummary {
            tick: next_tick,
            probe_count: self.probes.len(),
            births,
            active_probes,
            explored_stars: self.catalog.explored_count(),
            total_distance,
        };

        let interval = self.config.summary_interval;
        if interval > 0 && next_tick.0.is_multiple_of(u64::from(interval)) {
            self.sink.on_tick(&summary);
        }

        if self.history.len() >= self.config.history_capacity {
            self.history.pop_front();
        }
        self.history.push_back(summary);
    }

    /// Whether the population is non-empty and fully shut down.
    #[must_use]
    pub fn all_shutdown(&self) -> bool {
        !self.probes.is_empty() && self.probes.iter().all(|(_, probe)| probe.is_shutdown())
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub const fn tick(&self) -> Tick {
        self.tick
    }

    #[must_use]
    pub fn catalog(&self) -> &StarCatalog {
        &self.catalog
    }

    /// Read-only tree access for debug visualization.
    #[must_use]
    pub fn index(&self) -> &QuadTree {
        &self.index
    }

    #[must_use]
    pub fn probes(&self) -> &ProbeArena {
        &self.probes
    }

    #[must_use]
    pub fn probes_mut(&mut self) -> &mut ProbeArena {
        &mut self.probes
    }

    /// Iterate over retained tick summaries, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &TickSummary> {
        self.history.iter()
    }

    #[must_use]
    pub const fn build_stats(&self) -> IndexBuildStats {
        self.build_stats
    }

    /// Replace the summary sink.
    pub fn set_sink(&mut self, sink: Box<dyn TickSink>) {
        self.sink = sink;
    }
}
