//! Deterministic starfield synthesis.
//!
//! Stands in for an astronomical catalog loader: given a seed and the
//! universe rectangle it produces stable star records with display
//! colors. Record 0 is always Sol at the universe center, which the host
//! uses as the seed probe's origin.

use rand::{Rng, rngs::SmallRng};
use starprobe_core::{Rect, StarRecord, Vec2};

/// Name stems for generated stars. Three-letter prefixes are what probe
/// names are built from, so the stems keep those distinct.
const NAME_STEMS: &[&str] = &[
    "Vega", "Deneb", "Altair", "Rigel", "Mira", "Capella", "Sirius", "Procyon", "Antares",
    "Pollux", "Fomalhaut", "Betelgeuse", "Arcturus", "Spica", "Canopus", "Bellatrix", "Electra",
    "Hadar", "Izar", "Kochab", "Lesath", "Merak", "Naos", "Okab", "Phecda", "Quadrans", "Rastaban",
    "Sadr", "Thuban", "Unukalhai", "Wezen", "Xamidimura", "Yildun", "Zosma",
];

/// Synthesize `count` star records inside `universe`. Positions are kept
/// off the exclusive right/bottom edges so every record lands in the
/// spatial index.
pub fn generate(count: u32, universe: Rect, rng: &mut SmallRng) -> Vec<StarRecord> {
    let mut records = Vec::with_capacity(count as usize);
    let center = Vec2::new(
        universe.left + universe.width / 2.0,
        universe.top + universe.height / 2.0,
    );
    records.push(StarRecord {
        id: 0,
        name: "Sol".to_string(),
        position: center,
        color: [1.0, 0.95, 0.8],
    });

    for id in 1..count {
        let x = universe.left + rng.random_range(0.0..universe.width);
        let y = universe.top + rng.random_range(0.0..universe.height);
        let stem = NAME_STEMS[(id as usize - 1) % NAME_STEMS.len()];
        let ordinal = (id as usize - 1) / NAME_STEMS.len();
        let name = if ordinal == 0 {
            stem.to_string()
        } else {
            format!("{stem}-{ordinal}")
        };
        records.push(StarRecord {
            id,
            name,
            position: Vec2::new(x, y),
            color: star_color(rng),
        });
    }
    records
}

/// Random display color with a warm-to-cool tilt and a brightness floor,
/// standing in for the catalog's color-index mapping.
fn star_color(rng: &mut SmallRng) -> [f32; 3] {
    let warmth: f32 = rng.random_range(0.0..1.0);
    let brightness: f32 = rng.random_range(0.6..1.0);
    [
        brightness * (0.7 + 0.3 * warmth),
        brightness * 0.85,
        brightness * (1.0 - 0.4 * warmth),
    ]
}
