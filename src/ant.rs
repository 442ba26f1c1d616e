use log::{debug, trace};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::coordinate::{Coordinate, Direction};
use crate::maze::Maze;
use crate::route::{PathSpecification, Route};

pub const DEFAULT_MAX_STEPS: usize = 500;

/// Why a single ant came back without a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchFailure {
    #[error("dead end with no choice point left to return to")]
    DeadEndExhausted,
    #[error("walk reached the {0} step bound")]
    StepBoundExceeded(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Searching,
    DeadEnd,
    Backtracking,
    Succeeded,
    Failed(SearchFailure),
}

/// Private state of one walk. Visited may hold a coordinate more than once
/// after a backtrack, so it is kept as a list rather than a set.
struct Walk {
    visited: Vec<Coordinate>,
    route: Route,
    checkpoints: Vec<(Coordinate, usize)>,
}

impl Walk {
    fn new(start: Coordinate) -> Self {
        Self {
            visited: Vec::new(),
            route: Route::new(start),
            checkpoints: Vec::new(),
        }
    }

    fn is_visited(&self, position: Coordinate) -> bool {
        self.visited.contains(&position)
    }

    fn unmark(&mut self, position: Coordinate) {
        if let Some(idx) = self.visited.iter().position(|&c| c == position) {
            self.visited.remove(idx);
        }
    }
}

/// A single ant: one randomised depth-first walk over the pheromone field.
pub struct Ant<'a, R: Rng = StdRng> {
    maze: &'a Maze,
    start: Coordinate,
    end: Coordinate,
    current_position: Coordinate,
    max_steps: usize,
    backtracks: usize,
    rng: R,
}

impl<'a> Ant<'a, StdRng> {
    pub fn with_seed(maze: &'a Maze, spec: &PathSpecification, seed: u64) -> Self {
        Ant::new(maze, spec, StdRng::seed_from_u64(seed))
    }
}

impl<'a, R: Rng> Ant<'a, R> {
    pub fn new(maze: &'a Maze, spec: &PathSpecification, rng: R) -> Self {
        Self {
            maze,
            start: spec.start(),
            end: spec.end(),
            current_position: spec.start(),
            max_steps: DEFAULT_MAX_STEPS,
            backtracks: 0,
            rng,
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn current_position(&self) -> Coordinate {
        self.current_position
    }

    /// Backtracks taken during the last search.
    pub fn backtracks(&self) -> usize {
        self.backtracks
    }

    /// Puts the ant back on its start cell.
    pub fn reset_points(&mut self) {
        self.current_position = self.start;
        self.backtracks = 0;
    }

    pub fn find_route(&mut self) -> Option<Route> {
        self.search().ok()
    }

    pub fn search(&mut self) -> Result<Route, SearchFailure> {
        self.reset_points();
        let mut walk = Walk::new(self.start);
        let mut state = SearchState::Searching;
        loop {
            state = match state {
                SearchState::Searching => self.explore(&mut walk),
                SearchState::DeadEnd if walk.checkpoints.is_empty() => {
                    SearchState::Failed(SearchFailure::DeadEndExhausted)
                }
                SearchState::DeadEnd => SearchState::Backtracking,
                SearchState::Backtracking => self.backtrack(&mut walk),
                SearchState::Succeeded => return Ok(walk.route),
                SearchState::Failed(failure) => {
                    trace!("ant at {} gave up: {}", self.current_position, failure);
                    return Err(failure);
                }
            };
        }
    }

    /// One iteration of the walk: either a committed move or a dead end.
    fn explore(&mut self, walk: &mut Walk) -> SearchState {
        let position = self.current_position;
        let steps = walk.route.len();
        if position == self.end || steps > self.max_steps {
            return if steps >= self.max_steps {
                SearchState::Failed(SearchFailure::StepBoundExceeded(self.max_steps))
            } else {
                SearchState::Succeeded
            };
        }

        walk.visited.push(position);
        let surrounding = self.maze.surrounding_pheromone(position);

        let levels = surrounding.levels();
        let viable = Direction::ALL
            .map(|d| levels[d.index()] > 0.0 && !walk.is_visited(position.step(d)));
        let options = viable.iter().filter(|&&v| v).count();
        if options == 0 {
            return SearchState::DeadEnd;
        }

        // a zero sum always lands in the dead-end branch above
        let Some(mut probabilities) = surrounding.probabilities() else {
            return SearchState::DeadEnd;
        };
        for direction in Direction::ALL {
            if !viable[direction.index()] {
                probabilities[direction.index()] = 0.0;
            }
        }

        if options >= 2 {
            walk.checkpoints.push((position, steps));
        }

        let Some(direction) = self.choose_direction(walk, &mut probabilities) else {
            return SearchState::DeadEnd;
        };
        self.current_position = position.step(direction);
        walk.route.push(direction);
        trace!("{} -> {} ({:?})", position, self.current_position, direction);
        SearchState::Searching
    }

    /// Weighted draw, redrawn while it would U-turn or step onto a visited cell.
    fn choose_direction(&mut self, walk: &Walk, probabilities: &mut [f64; 4]) -> Option<Direction> {
        let position = self.current_position;
        let previous = walk.route.last_direction();
        for _ in 0..=Direction::ALL.len() {
            let choice = sample(&mut self.rng, probabilities)?;
            let u_turn = previous.is_some_and(|p| p.opposite() == choice);
            if !u_turn && !walk.is_visited(position.step(choice)) {
                return Some(choice);
            }
            probabilities[choice.index()] = 0.0;
            renormalize(probabilities)?;
        }
        None
    }

    fn backtrack(&mut self, walk: &mut Walk) -> SearchState {
        let Some((branch, branch_len)) = walk.checkpoints.pop() else {
            return SearchState::Failed(SearchFailure::DeadEndExhausted);
        };
        debug!(
            "dead end at {}, back to {} (route {} -> {})",
            self.current_position,
            branch,
            walk.route.len(),
            branch_len
        );
        // the branch cell is marked again when the walk resumes from it
        walk.unmark(branch);
        walk.route.truncate(branch_len);
        self.current_position = branch;
        self.backtracks += 1;
        SearchState::Searching
    }
}

fn sample<R: Rng>(rng: &mut R, probabilities: &[f64; 4]) -> Option<Direction> {
    let weights = WeightedIndex::new(probabilities).ok()?;
    Direction::from_index(weights.sample(rng))
}

fn renormalize(probabilities: &mut [f64; 4]) -> Option<()> {
    let total: f64 = probabilities.iter().sum();
    if total <= 0.0 {
        return None;
    }
    for p in probabilities.iter_mut() {
        *p /= total;
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn spec(start: (i32, i32), end: (i32, i32)) -> PathSpecification {
        PathSpecification::new(Coordinate::new(start.0, start.1), Coordinate::new(end.0, end.1))
    }

    fn corridor(width: usize) -> Maze {
        Maze::new(vec![vec![1]; width], width, 1).unwrap()
    }

    // The top row is a dead-end branch, the left column and bottom row the
    // only way through.
    fn branching_maze() -> Maze {
        "3 3\n1 1 1\n1 0 0\n1 1 1\n".parse().unwrap()
    }

    #[test]
    fn corridor_walks_straight_east() {
        let maze = corridor(3);
        let spec = spec((0, 0), (2, 0));
        for seed in 0..16 {
            let mut ant = Ant::with_seed(&maze, &spec, seed);
            let route = ant.find_route().expect("corridor is always solvable");
            assert_eq!(route.directions(), &[Direction::East, Direction::East]);
            assert_eq!(route.start(), Coordinate::new(0, 0));
            assert_eq!(ant.backtracks(), 0);
        }
    }

    #[test]
    fn backtracks_out_of_a_dead_end() {
        let mut maze = branching_maze();
        // lure the ant into the top row first
        let mut lure = Route::new(Coordinate::new(0, 0));
        lure.push(Direction::East);
        lure.push(Direction::East);
        maze.deposit_route(&lure, 1e9).unwrap();

        let spec = spec((0, 0), (2, 2));
        let mut backtracked = 0;
        for seed in 0..32 {
            let mut ant = Ant::with_seed(&maze, &spec, seed);
            let route = ant.search().expect("through-path was a recorded choice point");
            assert_eq!(
                route.directions(),
                &[Direction::South, Direction::South, Direction::East, Direction::East]
            );
            backtracked += ant.backtracks();
        }
        assert!(backtracked > 0);
    }

    #[test]
    fn walled_off_goal_exhausts_dead_ends() {
        let maze = Maze::new(vec![vec![1], vec![0], vec![1]], 3, 1).unwrap();
        let mut ant = Ant::with_seed(&maze, &spec((0, 0), (2, 0)), 7);
        assert_eq!(ant.search(), Err(SearchFailure::DeadEndExhausted));
        assert!(ant.find_route().is_none());
    }

    #[test]
    fn dead_end_branch_without_alternative_fails() {
        // from (0, 0) the only way leads into a pocket
        let maze: Maze = "3 2\n1 1 0\n0 0 1\n".parse().unwrap();
        let mut ant = Ant::with_seed(&maze, &spec((0, 0), (2, 1)), 1);
        assert_eq!(ant.search(), Err(SearchFailure::DeadEndExhausted));
    }

    #[test]
    fn step_bound_rejects_long_walks() {
        let maze = corridor(12);
        let mut ant = Ant::with_seed(&maze, &spec((0, 0), (11, 0)), 3).with_max_steps(5);
        assert_eq!(ant.search(), Err(SearchFailure::StepBoundExceeded(5)));

        // reaching the goal exactly on the bound still counts as a runaway walk
        let maze = corridor(6);
        let mut ant = Ant::with_seed(&maze, &spec((0, 0), (5, 0)), 3).with_max_steps(5);
        assert_eq!(ant.search(), Err(SearchFailure::StepBoundExceeded(5)));

        let maze = corridor(5);
        let mut ant = Ant::with_seed(&maze, &spec((0, 0), (4, 0)), 3).with_max_steps(5);
        assert_eq!(ant.search().map(|r| r.len()), Ok(4));
    }

    #[test]
    fn default_step_bound_is_500() {
        let maze = corridor(600);
        let mut ant = Ant::with_seed(&maze, &spec((0, 0), (599, 0)), 0);
        assert_eq!(
            ant.search(),
            Err(SearchFailure::StepBoundExceeded(DEFAULT_MAX_STEPS))
        );
    }

    #[test]
    fn routes_never_u_turn_or_revisit() {
        let maze = Maze::new(vec![vec![1; 6]; 6], 6, 6).unwrap();
        let spec = spec((0, 0), (5, 5));
        let mut found = 0;
        for seed in 0..64 {
            let mut ant = Ant::with_seed(&maze, &spec, seed);
            let Some(route) = ant.find_route() else { continue };
            found += 1;

            for pair in route.directions().windows(2) {
                assert_ne!(pair[1], pair[0].opposite());
            }
            let cells: Vec<_> = route.coordinates().collect();
            let unique: HashSet<_> = cells.iter().copied().collect();
            assert_eq!(unique.len(), cells.len());
            assert_eq!(route.end(), Coordinate::new(5, 5));
            assert!(cells.iter().all(|&c| maze.is_open(c)));
        }
        assert!(found > 0);
    }

    #[test]
    fn ant_is_reusable_after_reset() {
        let maze = corridor(4);
        let mut ant = Ant::with_seed(&maze, &spec((0, 0), (3, 0)), 11);
        let first = ant.find_route().unwrap();
        assert_eq!(ant.current_position(), Coordinate::new(3, 0));

        ant.reset_points();
        assert_eq!(ant.current_position(), Coordinate::new(0, 0));
        let second = ant.find_route().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn start_on_goal_yields_empty_route() {
        let maze = corridor(2);
        let mut ant = Ant::with_seed(&maze, &spec((1, 0), (1, 0)), 0);
        let route = ant.search().unwrap();
        assert!(route.is_empty());
    }

    #[test]
    fn same_seed_same_walk() {
        let maze = Maze::new(vec![vec![1; 5]; 5], 5, 5).unwrap();
        let spec = spec((0, 0), (4, 4));
        let a = Ant::with_seed(&maze, &spec, 99).search();
        let b = Ant::with_seed(&maze, &spec, 99).search();
        assert_eq!(a, b);
    }

    #[test]
    fn renormalize_rejects_zero_mass() {
        let mut probabilities = [0.0, 2.0, 0.0, 2.0];
        assert_eq!(renormalize(&mut probabilities), Some(()));
        assert_eq!(probabilities, [0.0, 0.5, 0.0, 0.5]);
        assert_eq!(renormalize(&mut [0.0; 4]), None);
    }
}
