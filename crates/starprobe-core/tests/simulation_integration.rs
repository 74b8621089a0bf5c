use starprobe_core::{
    ProbeMode, Simulation, SimulationConfig, StarCatalog, StarId, StarRecord, Tick, Vec2,
};
use std::collections::HashSet;

fn record(id: u32, name: &str, x: f32, y: f32) -> StarRecord {
    StarRecord {
        id,
        name: name.to_string(),
        position: Vec2::new(x, y),
        color: [1.0, 1.0, 1.0],
    }
}

fn build(stars: Vec<StarRecord>, config: SimulationConfig) -> Simulation {
    let catalog = StarCatalog::new(stars).expect("catalog");
    let mut sim = Simulation::new(config, catalog).expect("simulation");
    sim.seed_probe("SOL-SOL-AAA", StarId(0)).expect("seed probe");
    sim
}

#[test]
fn lone_probe_explores_the_second_star_then_shuts_down() {
    // Scenario A: two stars, the seed's origin already counts as visited.
    let config = SimulationConfig {
        universe_width: 1000.0,
        universe_height: 1000.0,
        iterations: 200,
        stop_when_all_shutdown: true,
        rng_seed: Some(3),
        ..SimulationConfig::default()
    };
    let mut sim = build(
        vec![record(0, "Sol", 500.0, 500.0), record(1, "Vega", 620.0, 500.0)],
        config,
    );

    let outcome = sim.run();

    assert_eq!(sim.catalog().explored_count(), 2);
    assert!(
        sim.catalog().get(StarId(1)).expect("vega").is_explored(),
        "the probe must reach and claim the second star"
    );
    assert!(sim.all_shutdown(), "nothing left to seek");
    assert!(outcome.stopped_early);

    // One replication fired at Vega, so the population is parent + child.
    assert_eq!(sim.probes().len(), 2);
    let parent = sim
        .probes()
        .iter()
        .map(|(_, probe)| probe)
        .find(|probe| probe.name() == "SOL-SOL-AAA")
        .expect("parent");
    assert_eq!(parent.replication_count(), 1);
    assert!((parent.total_distance() - 120.0).abs() < 1e-3);
}

#[test]
fn replication_count_never_exceeds_the_configured_limit() {
    let config = SimulationConfig {
        universe_width: 2000.0,
        universe_height: 1000.0,
        replication_limit: 2,
        iterations: 2_000,
        stop_when_all_shutdown: true,
        rng_seed: Some(17),
        ..SimulationConfig::default()
    };
    let mut sim = build(
        vec![
            record(0, "Sol", 400.0, 500.0),
            record(1, "Vega", 550.0, 500.0),
            record(2, "Deneb", 700.0, 500.0),
            record(3, "Altair", 850.0, 500.0),
            record(4, "Rigel", 1000.0, 500.0),
            record(5, "Mira", 1150.0, 500.0),
        ],
        config.clone(),
    );

    sim.run();

    assert!(sim.all_shutdown(), "a bounded run must wind down");
    for (_, probe) in sim.probes().iter() {
        assert!(
            probe.replication_count() <= config.replication_limit,
            "probe {} exceeded the replication limit",
            probe.name()
        );
        assert!(matches!(probe.mode(), ProbeMode::Shutdown));
    }
}

#[test]
fn lineage_names_stay_unique_across_the_population() {
    let config = SimulationConfig {
        universe_width: 2000.0,
        universe_height: 1000.0,
        iterations: 2_000,
        stop_when_all_shutdown: true,
        rng_seed: Some(23),
        ..SimulationConfig::default()
    };
    let mut sim = build(
        vec![
            record(0, "Sol", 400.0, 500.0),
            record(1, "Vega", 550.0, 500.0),
            record(2, "Deneb", 700.0, 500.0),
            record(3, "Altair", 850.0, 500.0),
            record(4, "Rigel", 1000.0, 500.0),
        ],
        config,
    );

    sim.run();

    let names: Vec<&str> = sim.probes().iter().map(|(_, probe)| probe.name()).collect();
    let unique: HashSet<&str> = names.iter().copied().collect();
    assert_eq!(unique.len(), names.len(), "duplicate probe names: {names:?}");
    assert!(names.len() > 1, "expected at least one replication");
    for name in names {
        let groups: Vec<&str> = name.split('-').collect();
        assert_eq!(groups.len(), 3, "malformed name {name}");
        assert!(groups.iter().all(|group| group.len() == 3));
    }
}

#[test]
fn exploration_coverage_converges_on_a_reachable_field() {
    let config = SimulationConfig {
        universe_width: 2000.0,
        universe_height: 1000.0,
        iterations: 3_000,
        stop_when_all_shutdown: true,
        rng_seed: Some(5),
        ..SimulationConfig::default()
    };
    let star_count = 6;
    let mut sim = build(
        (0..star_count)
            .map(|i| {
                let names = ["Sol", "Vega", "Deneb", "Altair", "Rigel", "Mira"];
                record(i, names[i as usize], 500.0 + 150.0 * i as f32, 500.0)
            })
            .collect(),
        config,
    );

    sim.run();

    assert_eq!(
        sim.catalog().explored_count(),
        star_count as usize,
        "every star sits within seek radius of the previous one"
    );
    assert!(sim.all_shutdown());

    let latest = sim.history().last().expect("summary");
    assert_eq!(latest.explored_stars, star_count as usize);
    assert_eq!(latest.active_probes, 0);
}

#[test]
fn seeded_runs_are_deterministic() {
    let stars = || {
        vec![
            record(0, "Sol", 500.0, 500.0),
            record(1, "Vega", 620.0, 500.0),
            record(2, "Deneb", 760.0, 540.0),
            record(3, "Altair", 880.0, 480.0),
        ]
    };
    let config = SimulationConfig {
        universe_width: 1500.0,
        universe_height: 1000.0,
        iterations: 300,
        rng_seed: Some(0xDEAD_BEEF),
        ..SimulationConfig::default()
    };

    let mut sim_a = build(stars(), config.clone());
    let mut sim_b = build(stars(), config);
    sim_a.run();
    sim_b.run();

    assert_eq!(sim_a.tick(), Tick(300));
    assert_eq!(sim_b.tick(), Tick(300));

    let history_a: Vec<_> = sim_a.history().cloned().collect();
    let history_b: Vec<_> = sim_b.history().cloned().collect();
    assert_eq!(history_a, history_b, "same seed must replay identically");

    let probes_a: Vec<_> = sim_a
        .probes()
        .iter()
        .map(|(_, probe)| (probe.name().to_string(), probe.position()))
        .collect();
    let probes_b: Vec<_> = sim_b
        .probes()
        .iter()
        .map(|(_, probe)| (probe.name().to_string(), probe.position()))
        .collect();
    assert_eq!(probes_a, probes_b);
}

#[test]
fn shutdown_probes_freeze_in_place() {
    let config = SimulationConfig {
        universe_width: 1000.0,
        universe_height: 1000.0,
        iterations: 50,
        rng_seed: Some(9),
        ..SimulationConfig::default()
    };
    // A single star: the seed probe has nothing to seek and retires at
    // its origin on the first tick.
    let mut sim = build(vec![record(0, "Sol", 500.0, 500.0)], config);

    sim.step();
    let (id, probe) = sim.probes().iter().next().expect("probe");
    assert!(probe.is_shutdown());
    let frozen_at = probe.position();

    for _ in 0..10 {
        sim.step();
    }
    let probe = sim.probes().get(id).expect("probe");
    assert_eq!(probe.position(), frozen_at);
    assert_eq!(probe.total_distance(), 0.0);
}
