//! Core types for the starprobe workspace: star catalog, probe state
//! machine, generational naming, and the per-tick simulation driver.
//!
//! The crate is an in-process library consumed by a host loop. It owns no
//! I/O: catalog records and configuration arrive from the caller, and the
//! renderer/reporting layer reads back through the accessors exposed here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod catalog;
pub mod config;
pub mod naming;
pub mod probe;
pub mod simulation;

pub use catalog::{CatalogError, Star, StarCatalog, StarRecord};
pub use config::SimulationConfig;
pub use probe::{Probe, ProbeMode, TickContext, TravelLeg, VisitedSystem};
pub use simulation::{
    IndexBuildStats, NullSink, ProbeArena, ProbeId, RunOutcome, Simulation, TickEvents, TickSink,
    TickSummary,
};
pub use starprobe_index::{IndexError, NearestHit, QuadNode, QuadTree, Rect, StarId, StarPoint};

/// Errors surfaced while building or driving a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Indicates an invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Spatial index construction failed.
    #[error(transparent)]
    Index(#[from] IndexError),
    /// Catalog construction failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// A star handle did not resolve against the catalog.
    #[error("unknown {0}")]
    UnknownStar(StarId),
}

/// Monotonic simulation tick counter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Tick(pub u64);

impl Tick {
    #[must_use]
    pub const fn zero() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// 2D position in universe coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Self) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}
