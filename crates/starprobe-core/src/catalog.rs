//! Star catalog: immutable after load apart from the per-star `explored`
//! flag, which is only ever flipped to `true` by a probe arriving at the
//! star's coordinates.

use crate::{StarId, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while building a catalog from loader records.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two records shared the same identity.
    #[error("duplicate star id {0}")]
    DuplicateId(u32),
    /// A record arrived without a usable name.
    #[error("star id {0} has an empty name")]
    EmptyName(u32),
}

/// One star record as supplied by the external loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    pub id: u32,
    pub name: String,
    pub position: Vec2,
    /// Presentation-only; the loader owns the color/brightness mapping.
    pub color: [f32; 3],
}

/// A star system in the universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    id: StarId,
    name: String,
    position: Vec2,
    color: [f32; 3],
    explored: bool,
}

impl Star {
    #[must_use]
    pub const fn id(&self) -> StarId {
        self.id
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
    pub const fn color(&self) -> [f32; 3] {
        self.color
    }

    /// Whether any probe has arrived at this star.
    #[must_use]
    pub const fn is_explored(&self) -> bool {
        self.explored
    }
}

/// Ordered, identity-stable collection of stars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarCatalog {
    stars: Vec<Star>,
    by_id: HashMap<StarId, usize>,
}

impl StarCatalog {
    /// Build a catalog from loader records, rejecting duplicate identities
    /// and empty names.
    pub fn new(records: Vec<StarRecord>) -> Result<Self, CatalogError> {
        let mut stars = Vec::with_capacity(records.len());
        let mut by_id = HashMap::with_capacity(records.len());
        for record in records {
            if record.name.is_empty() {
                return Err(CatalogError::EmptyName(record.id));
            }
            let id = StarId(record.id);
            if by_id.insert(id, stars.len()).is_some() {
                return Err(CatalogError::DuplicateId(record.id));
            }
            stars.push(Star {
                id,
                name: record.name,
                position: record.position,
                color: record.color,
                explored: false,
            });
        }
        Ok(Self { stars, by_id })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Iterate stars in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Star> {
        self.stars.iter()
    }

    /// Look a star up by identity.
    #[must_use]
    pub fn get(&self, id: StarId) -> Option<&Star> {
        self.by_id.get(&id).map(|&idx| &self.stars[idx])
    }

    /// Set a star's explored flag. Idempotent; returns `false` for an
    /// unknown identity.
    pub fn mark_explored(&mut self, id: StarId) -> bool {
        match self.by_id.get(&id) {
            Some(&idx) => {
                self.stars[idx].explored = true;
                true
            }
            None => false,
        }
    }

    /// Number of stars some probe has arrived at.
    #[must_use]
    pub fn explored_count(&self) -> usize {
        self.stars.iter().filter(|star| star.explored).count()
    }

    /// Index points for every star, in load order.
    pub fn points(&self) -> impl Iterator<Item = crate::StarPoint> + '_ {
        self.stars.iter().map(|star| crate::StarPoint {
            id: star.id,
            x: star.position.x,
            y: star.position.y,
        })
    }
}
