//! Static configuration for a probe simulation.

use crate::{Rect, SimulationError};
use rand::{SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

/// Scalar knobs for a simulation run. Constructed once by the host and
/// passed by reference into the tick driver and probe constructors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Width of the universe rectangle in world units.
    pub universe_width: f32,
    /// Height of the universe rectangle in world units.
    pub universe_height: f32,
    /// Leaf capacity of the spatial index before a node subdivides.
    pub quadtree_capacity: usize,
    /// Radius of a probe's nearest-unvisited-star search.
    pub seek_radius: f32,
    /// Replications allowed per probe before it shuts down.
    pub replication_limit: u32,
    /// Speed applied when a probe starts a seek travel leg.
    pub seek_speed: f32,
    /// Speed applied when a newborn starts its dispersal leg.
    pub dispersal_speed: f32,
    /// Minimum distance of the newborn dispersal band.
    pub dispersal_min: f32,
    /// Maximum distance of the newborn dispersal band.
    pub dispersal_max: f32,
    /// Fixed tick budget for a run.
    pub iterations: u32,
    /// Stop a run before the tick budget once every probe has shut down.
    pub stop_when_all_shutdown: bool,
    /// Optional RNG seed for reproducible runs.
    pub rng_seed: Option<u64>,
    /// Maximum number of recent tick summaries retained in memory.
    pub history_capacity: usize,
    /// Ticks between summary-sink notifications; 0 disables the sink.
    pub summary_interval: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            universe_width: 1920.0,
            universe_height: 1080.0,
            quadtree_capacity: 4,
            seek_radius: 250.0,
            replication_limit: 8,
            seek_speed: 10.0,
            dispersal_speed: 10.0,
            dispersal_min: 150.0,
            dispersal_max: 200.0,
            iterations: 1_000,
            stop_when_all_shutdown: false,
            rng_seed: None,
            history_capacity: 256,
            summary_interval: 1,
        }
    }
}

impl SimulationConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.universe_width <= 0.0 || self.universe_height <= 0.0 {
            return Err(SimulationError::InvalidConfig(
                "universe dimensions must be positive",
            ));
        }
        if self.quadtree_capacity == 0 {
            return Err(SimulationError::InvalidConfig(
                "quadtree_capacity must be at least 1",
            ));
        }
        if self.seek_radius <= 0.0 {
            return Err(SimulationError::InvalidConfig(
                "seek_radius must be positive",
            ));
        }
        if self.seek_speed <= 0.0 || self.dispersal_speed <= 0.0 {
            return Err(SimulationError::InvalidConfig(
                "probe speeds must be positive",
            ));
        }
        if self.dispersal_min <= 0.0 || self.dispersal_max < self.dispersal_min {
            return Err(SimulationError::InvalidConfig(
                "dispersal band must be positive and ordered",
            ));
        }
        if self.history_capacity == 0 {
            return Err(SimulationError::InvalidConfig(
                "history_capacity must be at least 1",
            ));
        }
        Ok(())
    }

    /// The universe boundary rectangle, anchored at the origin.
    #[must_use]
    pub const fn universe_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.universe_width, self.universe_height)
    }

    /// Returns the configured RNG, seeding from entropy when no seed is set.
    #[must_use]
    pub fn seeded_rng(&self) -> SmallRng {
        match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => {
                let seed: u64 = rand::random();
                SmallRng::seed_from_u64(seed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_values() {
        let bad = SimulationConfig {
            universe_width: 0.0,
            ..SimulationConfig::default()
        };
        assert!(bad.validate().is_err());

        let bad = SimulationConfig {
            quadtree_capacity: 0,
            ..SimulationConfig::default()
        };
        assert!(bad.validate().is_err());

        let bad = SimulationConfig {
            dispersal_min: 200.0,
            dispersal_max: 150.0,
            ..SimulationConfig::default()
        };
        assert!(bad.validate().is_err());

        let bad = SimulationConfig {
            seek_speed: 0.0,
            ..SimulationConfig::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn universe_rect_matches_dimensions() {
        let config = SimulationConfig::default();
        let rect = config.universe_rect();
        assert_eq!(rect.left, 0.0);
        assert_eq!(rect.top, 0.0);
        assert_eq!(rect.width, config.universe_width);
        assert_eq!(rect.height, config.universe_height);
    }
}
