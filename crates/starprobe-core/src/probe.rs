//! The probe behavioral state machine.
//!
//! A probe is an autonomous agent cycling through Seek, Travel, Replicate,
//! and Shutdown. It reads the shared spatial index, mutates only its own
//! state and, on arrival at a star, that star's explored flag. Each call to
//! [`Probe::advance`] executes exactly one tick of behavior.

use crate::{QuadTree, StarCatalog, StarId, Vec2, config::SimulationConfig};
use rand::{Rng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

/// One remembered star system. Append-only per probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisitedSystem {
    pub star: StarId,
    /// Snapshot of the star's coordinates at recording time.
    pub coordinates: Vec2,
    /// `true` when this probe stood at the star itself, `false` for
    /// entries inherited from a parent or pre-seeded at birth.
    pub visited_by_probe: bool,
}

/// A travel leg in flight. `star` is `None` for the newborn dispersal leg,
/// which targets open space rather than a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelLeg {
    pub destination: Vec2,
    pub star: Option<StarId>,
}

/// Behavioral mode of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum ProbeMode {
    /// Looking for the next destination. Entry state for every probe.
    #[default]
    Seek,
    /// Moving toward a destination at the current speed.
    Travel(TravelLeg),
    /// Single-tick marker telling the driver to spawn a child this tick.
    Replicate,
    /// Terminal. The probe stays in the population but never acts again.
    Shutdown,
}

/// Shared world access handed to a probe for one tick.
pub struct TickContext<'a> {
    pub index: &'a QuadTree,
    pub catalog: &'a mut StarCatalog,
    pub config: &'a SimulationConfig,
    pub rng: &'a mut SmallRng,
}

/// An autonomous exploration probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Probe {
    name: String,
    position: Vec2,
    speed: f32,
    mode: ProbeMode,
    new_born: bool,
    memory: Vec<VisitedSystem>,
    replication_count: u32,
    total_distance: f32,
    trail_color: [f32; 3],
}

impl Probe {
    /// Construct a probe in Seek mode. Freshly constructed probes are
    /// newborn; the bootstrap seed probe clears the flag explicitly.
    #[must_use]
    pub fn new(name: impl Into<String>, position: Vec2, speed: f32) -> Self {
        Self {
            name: name.into(),
            position,
            speed,
            mode: ProbeMode::Seek,
            new_born: true,
            memory: Vec::new(),
            replication_count: 0,
            total_distance: 0.0,
            trail_color: [1.0, 1.0, 1.0],
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    #[must_use]
    pub const fn mode(&self) -> ProbeMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ProbeMode) {
        self.mode = mode;
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    #[must_use]
    pub const fn is_new_born(&self) -> bool {
        self.new_born
    }

    pub fn set_new_born(&mut self, new_born: bool) {
        self.new_born = new_born;
    }

    #[must_use]
    pub const fn is_shutdown(&self) -> bool {
        matches!(self.mode, ProbeMode::Shutdown)
    }

    /// Ordered visitation memory, oldest first.
    #[must_use]
    pub fn memory(&self) -> &[VisitedSystem] {
        &self.memory
    }

    #[must_use]
    pub const fn replication_count(&self) -> u32 {
        self.replication_count
    }

    /// Sum of all completed movement, in universe units.
    #[must_use]
    pub const fn total_distance(&self) -> f32 {
        self.total_distance
    }

    #[must_use]
    pub const fn trail_color(&self) -> [f32; 3] {
        self.trail_color
    }

    /// Number of systems this probe stood at itself.
    #[must_use]
    pub fn visited_count(&self) -> usize {
        self.memory
            .iter()
            .filter(|entry| entry.visited_by_probe)
            .count()
    }

    /// The star this probe most recently arrived at, if any.
    #[must_use]
    pub fn last_visited_star(&self) -> Option<StarId> {
        self.memory
            .iter()
            .rev()
            .find(|entry| entry.visited_by_probe)
            .map(|entry| entry.star)
    }

    /// Append a memory entry. Entries are never mutated or removed.
    pub fn remember(&mut self, star: StarId, coordinates: Vec2, visited_by_probe: bool) {
        self.memory.push(VisitedSystem {
            star,
            coordinates,
            visited_by_probe,
        });
    }

    /// Whether a star is already present in this probe's memory.
    #[must_use]
    pub fn remembers(&self, star: StarId) -> bool {
        self.memory.iter().any(|entry| entry.star == star)
    }

    /// Pick a random trail color with a brightness floor so trails stay
    /// visible against a dark field.
    pub fn randomize_trail_color(&mut self, rng: &mut SmallRng) {
        const MIN_LUMA: f32 = 0.4;
        let mut color = [
            rng.random_range(0.0..1.0f32),
            rng.random_range(0.0..1.0f32),
            rng.random_range(0.0..1.0f32),
        ];
        let luma = 0.299 * color[0] + 0.587 * color[1] + 0.114 * color[2];
        if luma < MIN_LUMA && luma > 0.0 {
            let ratio = MIN_LUMA / luma;
            for channel in &mut color {
                *channel = (*channel * ratio).min(1.0);
            }
        }
        self.trail_color = color;
    }

    /// Force the terminal state. Used by the tick driver when a probe at
    /// its replication limit shows up in Replicate mode.
    pub fn force_shutdown(&mut self) {
        self.mode = ProbeMode::Shutdown;
    }

    /// Execute one tick of behavior.
    pub fn advance(&mut self, ctx: &mut TickContext<'_>) {
        match self.mode {
            ProbeMode::Seek => self.advance_seek(ctx),
            ProbeMode::Travel(leg) => self.advance_travel(leg, ctx),
            ProbeMode::Replicate => self.advance_replicate(),
            ProbeMode::Shutdown => {}
        }
    }

    /// Seek: newborns with inherited memory disperse to a random nearby
    /// point before ever querying the index; everyone else asks the index
    /// for the nearest eligible star, shutting down when none is in range.
    fn advance_seek(&mut self, ctx: &mut TickContext<'_>) {
        if self.new_born && !self.memory.is_empty() {
            let angle = ctx.rng.random_range(0.0..std::f32::consts::TAU);
            let distance = ctx
                .rng
                .random_range(ctx.config.dispersal_min..=ctx.config.dispersal_max);
            let destination = Vec2::new(
                self.position.x + distance * angle.cos(),
                self.position.y + distance * angle.sin(),
            );
            self.mode = ProbeMode::Travel(TravelLeg {
                destination,
                star: None,
            });
            self.speed = ctx.config.dispersal_speed;
            return;
        }

        let memory = &self.memory;
        let catalog = &*ctx.catalog;
        let eligible = |id: StarId| {
            catalog
                .get(id)
                .is_some_and(|star| !star.is_explored())
                && !memory.iter().any(|entry| entry.star == id)
        };
        match ctx.index.nearest_within(
            self.position.x,
            self.position.y,
            ctx.config.seek_radius,
            eligible,
        ) {
            Some(hit) => {
                self.mode = ProbeMode::Travel(TravelLeg {
                    destination: Vec2::new(hit.x, hit.y),
                    star: Some(hit.id),
                });
                self.speed = ctx.config.seek_speed;
            }
            None => {
                // No reachable unexplored star; terminal for this probe.
                self.mode = ProbeMode::Shutdown;
            }
        }
    }

    /// Travel: step toward the destination, snapping on the final leg and
    /// committing the arrival (memory entry, explored flag, transition).
    fn advance_travel(&mut self, leg: TravelLeg, ctx: &mut TickContext<'_>) {
        let remaining = self.position.distance_to(leg.destination);
        if remaining > self.speed {
            let direction_x = (leg.destination.x - self.position.x) / remaining;
            let direction_y = (leg.destination.y - self.position.y) / remaining;
            self.position = Vec2::new(
                self.position.x + direction_x * self.speed,
                self.position.y + direction_y * self.speed,
            );
            return;
        }

        self.position = leg.destination;
        self.total_distance += remaining;
        if let Some(star) = leg.star {
            self.remember(star, leg.destination, true);
            ctx.catalog.mark_explored(star);
        }

        if self.new_born {
            self.new_born = false;
            self.mode = ProbeMode::Seek;
        } else if self.replication_count >= ctx.config.replication_limit {
            self.mode = ProbeMode::Shutdown;
        } else {
            self.mode = ProbeMode::Replicate;
        }
    }

    /// Replicate: the driver already spawned the child this tick; the
    /// probe just records the event and goes back to seeking.
    fn advance_replicate(&mut self) {
        self.replication_count += 1;
        self.mode = ProbeMode::Seek;
    }
}
