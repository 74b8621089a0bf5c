//! Quadtree spatial index over the star field.
//!
//! The tree partitions a fixed rectangular universe. Leaves hold up to
//! `capacity` points; inserting past capacity splits the leaf into four
//! quadrant children and redistributes. During simulation the tree is
//! read-only: probes issue radius-bounded nearest-eligible queries against
//! a structure built once at load time.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Leaves below this depth absorb overflow instead of splitting, so
/// coincident points cannot subdivide forever.
const MAX_DEPTH: u32 = 16;

/// Errors emitted by the spatial index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Indicates configuration values that cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Stable identity of a star, assigned by the catalog at load time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct StarId(pub u32);

impl std::fmt::Display for StarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "star#{}", self.0)
    }
}

/// Axis-aligned rectangle. Containment is half-open: left/top edges are
/// inclusive, right/bottom edges exclusive, so a point on a dividing line
/// belongs to exactly one quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether the point lies inside this rectangle (half-open).
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x < self.left + self.width && y >= self.top && y < self.top + self.height
    }

    /// Whether this rectangle overlaps the axis-aligned square window
    /// centered on `(cx, cy)` with half-extent `radius`.
    #[must_use]
    pub fn intersects_window(&self, cx: f32, cy: f32, radius: f32) -> bool {
        self.left <= cx + radius
            && self.left + self.width >= cx - radius
            && self.top <= cy + radius
            && self.top + self.height >= cy - radius
    }
}

/// A star's position as stored by the index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarPoint {
    pub id: StarId,
    pub x: f32,
    pub y: f32,
}

/// Result of a nearest-eligible query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestHit {
    pub id: StarId,
    pub x: f32,
    pub y: f32,
    pub distance: f32,
}

/// A single quadtree node: a leaf with stored points, or an internal node
/// with exactly four children. The `Option` around the child array keeps
/// the leaf-XOR-children invariant structural.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadNode {
    boundary: Rect,
    points: Vec<StarPoint>,
    children: Option<Box<[QuadNode; 4]>>,
}

impl QuadNode {
    fn new(boundary: Rect) -> Self {
        Self {
            boundary,
            points: Vec::new(),
            children: None,
        }
    }

    /// The region this node covers.
    #[must_use]
    pub const fn boundary(&self) -> Rect {
        self.boundary
    }

    /// Whether this node currently stores points itself.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Child by quadrant slot (0..=3, NE/NW/SW/SE), `None` on a leaf.
    #[must_use]
    pub fn child(&self, slot: usize) -> Option<&QuadNode> {
        self.children.as_ref().and_then(|kids| kids.get(slot))
    }

    /// Points stored directly in this node. Empty once the node has split.
    #[must_use]
    pub fn points(&self) -> &[StarPoint] {
        &self.points
    }

    fn insert(&mut self, point: StarPoint, capacity: usize, depth: u32) -> bool {
        if !self.boundary.contains(point.x, point.y) {
            return false;
        }

        if self.is_leaf() {
            if self.points.len() < capacity || depth >= MAX_DEPTH {
                self.points.push(point);
                return true;
            }
            self.split(capacity, depth);
        }

        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                if child.insert(point, capacity, depth + 1) {
                    return true;
                }
            }
        }
        false
    }

    /// Create the four quadrant children and redistribute stored points.
    /// Called exactly once per node, when a full leaf receives an insert.
    fn split(&mut self, capacity: usize, depth: u32) {
        let half_w = self.boundary.width / 2.0;
        let half_h = self.boundary.height / 2.0;
        let x = self.boundary.left;
        let y = self.boundary.top;

        let mut children = Box::new([
            QuadNode::new(Rect::new(x + half_w, y, half_w, half_h)),
            QuadNode::new(Rect::new(x, y, half_w, half_h)),
            QuadNode::new(Rect::new(x, y + half_h, half_w, half_h)),
            QuadNode::new(Rect::new(x + half_w, y + half_h, half_w, half_h)),
        ]);

        for point in self.points.drain(..) {
            for child in children.iter_mut() {
                if child.insert(point, capacity, depth + 1) {
                    break;
                }
            }
        }
        self.children = Some(children);
    }

    fn nearest_into(
        &self,
        cx: f32,
        cy: f32,
        radius: f32,
        eligible: &dyn Fn(StarId) -> bool,
        best: &mut Option<NearestHit>,
    ) {
        if !self.boundary.intersects_window(cx, cy, radius) {
            return;
        }

        for point in &self.points {
            let dx = point.x - cx;
            let dy = point.y - cy;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance > radius || !eligible(point.id) {
                continue;
            }
            let closer = best
                .map(|hit| OrderedFloat(distance) < OrderedFloat(hit.distance))
                .unwrap_or(true);
            if closer {
                *best = Some(NearestHit {
                    id: point.id,
                    x: point.x,
                    y: point.y,
                    distance,
                });
            }
        }

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.nearest_into(cx, cy, radius, eligible, best);
            }
        }
    }
}

/// Quadtree over the universe rectangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadTree {
    root: QuadNode,
    capacity: usize,
    len: usize,
}

impl QuadTree {
    /// Build an empty tree covering `boundary`, splitting leaves that
    /// exceed `capacity` points.
    pub fn new(boundary: Rect, capacity: usize) -> Result<Self, IndexError> {
        if capacity == 0 {
            return Err(IndexError::InvalidConfig("capacity must be at least 1"));
        }
        if boundary.width <= 0.0 || boundary.height <= 0.0 {
            return Err(IndexError::InvalidConfig(
                "boundary extents must be positive",
            ));
        }
        Ok(Self {
            root: QuadNode::new(boundary),
            capacity,
            len: 0,
        })
    }

    /// Insert a point. Returns `false` (a no-op, not an error) when the
    /// point lies outside the universe boundary.
    pub fn insert(&mut self, point: StarPoint) -> bool {
        let inserted = self.root.insert(point, self.capacity, 0);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// The nearest star to `(cx, cy)` within `radius` that satisfies
    /// `eligible`, or `None` when no such star exists. Conservative radius
    /// search: subtrees are pruned by square-window overlap and every
    /// surviving leaf is scanned. Equidistant candidates resolve to the
    /// first one met in traversal order.
    #[must_use]
    pub fn nearest_within(
        &self,
        cx: f32,
        cy: f32,
        radius: f32,
        eligible: impl Fn(StarId) -> bool,
    ) -> Option<NearestHit> {
        let mut best = None;
        self.root.nearest_into(cx, cy, radius, &eligible, &mut best);
        best
    }

    /// Number of points successfully inserted.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The universe rectangle this tree covers.
    #[must_use]
    pub const fn boundary(&self) -> Rect {
        self.root.boundary
    }

    /// Leaf capacity configured at construction.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Read-only access to the root for traversal and debug rendering.
    #[must_use]
    pub const fn root(&self) -> &QuadNode {
        &self.root
    }
}
