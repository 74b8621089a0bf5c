//! Host-side configuration: a JSON file mapped onto the core
//! simulation config plus app-only knobs (starfield size, report
//! sections).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use starprobe_core::SimulationConfig;
use std::path::Path;

/// Universe extent block of the config file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UniverseSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for UniverseSettings {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

/// Report section toggles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarySettings {
    pub show_per_probe: bool,
    pub show_footer: bool,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            show_per_probe: true,
            show_footer: true,
        }
    }
}

/// Top-level config file shape.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub universe: UniverseSettings,
    pub world_seed: Option<u64>,
    pub simulation_iterations: Option<u32>,
    pub quad_tree_capacity: Option<usize>,
    pub probe_replication_limit: Option<u32>,
    pub probe_search_radius: Option<f32>,
    pub star_count: Option<u32>,
    pub stop_when_all_shutdown: Option<bool>,
    pub progress_log_interval: Option<u32>,
    pub summary: SummarySettings,
}

/// Number of stars generated when the config does not say otherwise.
pub const DEFAULT_STAR_COUNT: u32 = 1_000;

impl AppSettings {
    /// Parse a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Stars to synthesize for the starfield.
    #[must_use]
    pub fn star_count(&self) -> u32 {
        self.star_count.unwrap_or(DEFAULT_STAR_COUNT)
    }

    /// Project onto the core simulation config. The seed is pinned by the
    /// caller so the report can echo the value actually used.
    #[must_use]
    pub fn simulation_config(&self, seed: u64) -> SimulationConfig {
        let defaults = SimulationConfig::default();
        SimulationConfig {
            universe_width: self.universe.width,
            universe_height: self.universe.height,
            quadtree_capacity: self.quad_tree_capacity.unwrap_or(defaults.quadtree_capacity),
            seek_radius: self.probe_search_radius.unwrap_or(defaults.seek_radius),
            replication_limit: self
                .probe_replication_limit
                .unwrap_or(defaults.replication_limit),
            iterations: self.simulation_iterations.unwrap_or(defaults.iterations),
            stop_when_all_shutdown: self
                .stop_when_all_shutdown
                .unwrap_or(defaults.stop_when_all_shutdown),
            rng_seed: Some(seed),
            summary_interval: self.progress_log_interval.unwrap_or(100),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let settings: AppSettings = serde_json::from_str("{}").expect("parse");
        assert_eq!(settings.star_count(), DEFAULT_STAR_COUNT);
        let config = settings.simulation_config(42);
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.universe_width, 1920.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn fields_override_defaults() {
        let raw = r#"{
            "universe": { "width": 800.0, "height": 600.0 },
            "worldSeed": 7,
            "simulationIterations": 250,
            "quadTreeCapacity": 2,
            "probeReplicationLimit": 3,
            "probeSearchRadius": 120.0,
            "starCount": 64,
            "stopWhenAllShutdown": true,
            "summary": { "showPerProbe": false, "showFooter": true }
        }"#;
        let settings: AppSettings = serde_json::from_str(raw).expect("parse");
        assert_eq!(settings.world_seed, Some(7));
        assert_eq!(settings.star_count(), 64);
        assert!(!settings.summary.show_per_probe);

        let config = settings.simulation_config(7);
        assert_eq!(config.universe_width, 800.0);
        assert_eq!(config.quadtree_capacity, 2);
        assert_eq!(config.replication_limit, 3);
        assert_eq!(config.seek_radius, 120.0);
        assert_eq!(config.iterations, 250);
        assert!(config.stop_when_all_shutdown);
    }
}
