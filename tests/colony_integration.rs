use std::collections::HashSet;
use std::fs;

use antmaze::{
    AntColonyOptimization, ColonyConfig, Coordinate, Maze, PathSpecification, Route,
};

const EASY: &str = include_str!("../mazes/easy.txt");

fn seeded(seed: u64, ants: usize, generations: usize) -> ColonyConfig {
    ColonyConfig {
        ants_per_generation: ants,
        generations,
        q: 200.0,
        evaporation: 0.4,
        seed: Some(seed),
        ..ColonyConfig::default()
    }
}

fn assert_valid_route(maze: &Maze, spec: &PathSpecification, route: &Route) {
    assert_eq!(route.start(), spec.start());
    assert_eq!(route.end(), spec.end());
    for pair in route.directions().windows(2) {
        assert_ne!(pair[1], pair[0].opposite(), "u-turn in {:?}", route.directions());
    }
    let cells: Vec<Coordinate> = route.coordinates().collect();
    assert!(cells.iter().all(|&c| maze.is_open(c)));
    let unique: HashSet<_> = cells.iter().collect();
    assert_eq!(unique.len(), cells.len());
}

#[test]
fn every_seeded_trial_finds_a_route() {
    let maze: Maze = EASY.parse().unwrap();
    let spec = PathSpecification::new(Coordinate::new(0, 0), Coordinate::new(6, 4));

    for seed in 0..5 {
        let mut colony = AntColonyOptimization::new(maze.clone(), seeded(seed, 5, 5));
        let best = colony
            .find_shortest_route(&spec)
            .unwrap_or_else(|| panic!("seed {seed} found nothing"));
        assert_valid_route(colony.maze(), &spec, &best);
        // Manhattan distance is a lower bound
        assert!(best.len() >= 10);
        assert!(!colony.generation_stats().is_empty());
    }
}

#[test]
fn reinforced_cells_outweigh_unused_ones() {
    let maze: Maze = EASY.parse().unwrap();
    let spec = PathSpecification::new(Coordinate::new(0, 0), Coordinate::new(6, 4));
    let mut colony = AntColonyOptimization::new(maze, seeded(3, 10, 8));
    let best = colony.find_shortest_route(&spec).unwrap();

    // every route passes through both ends, so they collect the most pheromone
    let field = colony.maze().pheromones();
    let start_level = colony.maze().pheromone_at(spec.start());
    assert_eq!(start_level, field.max_level());
    assert!(start_level > 0.4f64.powi(8));
    assert!(best.coordinates().all(|c| colony.maze().pheromone_at(c) > 0.0));
}

#[test]
fn file_inputs_and_route_output() {
    let dir = tempfile::tempdir().unwrap();
    let maze_path = dir.path().join("maze.txt");
    let coordinates_path = dir.path().join("coordinates.txt");
    let route_path = dir.path().join("route.txt");
    fs::write(&maze_path, EASY).unwrap();
    fs::write(&coordinates_path, "0, 0;\n6, 4;\n").unwrap();

    let maze = Maze::from_file(&maze_path).unwrap();
    let spec = PathSpecification::read_coordinates(&coordinates_path).unwrap();
    maze.validate_spec(&spec).unwrap();

    let mut colony = AntColonyOptimization::new(maze, seeded(11, 8, 4));
    let best = colony.find_shortest_route(&spec).unwrap();
    best.write_to_file(&route_path).unwrap();

    let written = fs::read_to_string(&route_path).unwrap();
    assert!(written.starts_with(&format!("{};\n0, 0;\n", best.len())));
    assert_eq!(written.parse::<Route>().unwrap(), best);
}

#[test]
fn missing_files_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Maze::from_file(dir.path().join("nope.txt")).is_err());
    assert!(PathSpecification::read_coordinates(dir.path().join("nope.txt")).is_err());
}
