use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Input accepted, countdown running.
    Active,
    /// Shrink animation playing, input locked.
    Resetting,
    /// Terminal for the session, input locked.
    Won,
}

impl GamePhase {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_won(self) -> bool {
        matches!(self, Self::Won)
    }
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::Active
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MoveOutcome {
    NoChange,
    Stepped,
    Strayed,
    Won,
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        use MoveOutcome::*;
        match self {
            NoChange => false,
            Stepped => true,
            Strayed => true,
            Won => true,
        }
    }
}

/// Traversal state for one session: the carved route, the run's visited
/// cells, the player, and the best score across runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraversalEngine {
    path: CarvedPath,
    visited: Array2<bool>,
    visited_count: Saturating<CellCount>,
    player: Coord2,
    player_scale: f32,
    best_score: CellCount,
    phase: GamePhase,
}

impl TraversalEngine {
    pub fn new(path: CarvedPath) -> Self {
        let size = path.size();
        let start = path.start();
        let mut visited: Array2<bool> = Array2::default(size.to_nd_index());
        visited[start.to_nd_index()] = true;
        Self {
            path,
            visited,
            visited_count: Saturating(1),
            player: start,
            player_scale: 1.0,
            best_score: 0,
            phase: Default::default(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn size(&self) -> Coord2 {
        self.path.size()
    }

    pub fn path(&self) -> &CarvedPath {
        &self.path
    }

    pub fn player(&self) -> Coord2 {
        self.player
    }

    pub fn player_scale(&self) -> f32 {
        self.player_scale
    }

    pub fn best_score(&self) -> CellCount {
        self.best_score
    }

    /// Cells stepped on during the current run, start included.
    pub fn run_length(&self) -> CellCount {
        self.visited_count.0
    }

    pub fn visited_at(&self, coords: Coord2) -> bool {
        let (rows, cols) = self.size();
        coords.0 < rows && coords.1 < cols && self.visited[coords.to_nd_index()]
    }

    pub fn handle_move(&mut self, direction: Direction) -> MoveOutcome {
        use MoveOutcome::*;

        if !self.phase.is_active() {
            return NoChange;
        }

        let Some(target) = direction.offset(self.player, self.size()) else {
            return NoChange;
        };

        if self.visited[target.to_nd_index()] {
            return NoChange;
        }

        if self.path.contains(target) {
            self.visited[target.to_nd_index()] = true;
            self.visited_count += 1;
            self.player = target;
            self.capture_score();

            if target == self.path.goal() {
                self.phase = GamePhase::Won;
                Won
            } else {
                Stepped
            }
        } else {
            // The player visibly lands on the bad cell while it shrinks.
            self.player = target;
            self.phase = GamePhase::Resetting;
            Strayed
        }
    }

    /// Countdown ran its full duration. Only acts while `Active`; a stale
    /// firing after a phase change is a no-op and reports unhandled.
    pub fn on_countdown_expired(&mut self) -> bool {
        if !self.phase.is_active() {
            return false;
        }

        self.capture_score();
        self.reset_run();
        true
    }

    /// Visual scale for the shrink animation, clamped to [0, 1].
    pub fn set_player_scale(&mut self, scale: f32) {
        if matches!(self.phase, GamePhase::Resetting) {
            self.player_scale = scale.clamp(0.0, 1.0);
        }
    }

    /// Shrink animation finished. Only acts while `Resetting`.
    pub fn on_shrink_complete(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Resetting) {
            return false;
        }

        self.capture_score();
        self.reset_run();
        self.phase = GamePhase::Active;
        true
    }

    fn capture_score(&mut self) {
        self.best_score = self.best_score.max(self.visited_count.0.saturating_sub(1));
    }

    fn reset_run(&mut self) {
        let start = self.path.start();
        self.visited.fill(false);
        self.visited[start.to_nd_index()] = true;
        self.visited_count = Saturating(1);
        self.player = start;
        self.player_scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    // 3x3 route: (2,0) -> (1,0) -> (1,1) -> (0,1) -> (0,2)
    fn engine() -> TraversalEngine {
        let cells = [(2, 0), (1, 0), (1, 1), (0, 1), (0, 2)];
        TraversalEngine::new(CarvedPath::from_cells((3, 3), &cells).unwrap())
    }

    #[test]
    fn stepping_along_the_route_grows_the_run() {
        let mut engine = engine();

        assert_eq!(engine.handle_move(Up), MoveOutcome::Stepped);
        assert_eq!(engine.player(), (1, 0));
        assert_eq!(engine.run_length(), 2);
        assert_eq!(engine.best_score(), 1);
        assert_eq!(engine.phase(), GamePhase::Active);
    }

    #[test]
    fn reaching_the_goal_wins_the_session() {
        let mut engine = engine();

        for dir in [Up, Right, Up, Right] {
            engine.handle_move(dir);
        }

        assert_eq!(engine.phase(), GamePhase::Won);
        assert_eq!(engine.player(), (0, 2));
        assert_eq!(engine.best_score(), 4);
        // Terminal: further input and timer events are ignored.
        assert_eq!(engine.handle_move(Down), MoveOutcome::NoChange);
        assert!(!engine.on_countdown_expired());
    }

    #[test]
    fn off_route_step_starts_the_losing_reset() {
        let mut engine = engine();

        assert_eq!(engine.handle_move(Right), MoveOutcome::Strayed);
        assert_eq!(engine.player(), (2, 1));
        assert_eq!(engine.phase(), GamePhase::Resetting);
        // Input locked while resetting.
        assert_eq!(engine.handle_move(Up), MoveOutcome::NoChange);
    }

    #[test]
    fn out_of_bounds_and_visited_targets_are_silent_noops() {
        let mut engine = engine();

        assert_eq!(engine.handle_move(Down), MoveOutcome::NoChange);
        assert_eq!(engine.handle_move(Left), MoveOutcome::NoChange);

        engine.handle_move(Up);
        // Back onto the start cell, already visited.
        assert_eq!(engine.handle_move(Down), MoveOutcome::NoChange);
        assert_eq!(engine.player(), (1, 0));
    }

    #[test]
    fn countdown_expiry_resets_the_run_and_keeps_the_best_score() {
        let mut engine = engine();
        engine.handle_move(Up);
        engine.handle_move(Right);

        assert!(engine.on_countdown_expired());
        assert_eq!(engine.player(), (2, 0));
        assert_eq!(engine.run_length(), 1);
        assert_eq!(engine.best_score(), 2);
        assert_eq!(engine.phase(), GamePhase::Active);
        assert!(engine.visited_at((2, 0)));
        assert!(!engine.visited_at((1, 0)));
    }

    #[test]
    fn shrink_completion_restores_the_player_at_full_scale() {
        let mut engine = engine();
        engine.handle_move(Up);
        engine.handle_move(Right);
        assert_eq!(engine.handle_move(Down), MoveOutcome::Strayed);

        engine.set_player_scale(0.25);
        assert_eq!(engine.player_scale(), 0.25);

        assert!(engine.on_shrink_complete());
        assert_eq!(engine.player(), (2, 0));
        assert_eq!(engine.player_scale(), 1.0);
        assert_eq!(engine.run_length(), 1);
        assert_eq!(engine.best_score(), 2);
        assert_eq!(engine.phase(), GamePhase::Active);
    }

    #[test]
    fn scale_only_moves_while_resetting() {
        let mut engine = engine();

        engine.set_player_scale(0.5);
        assert_eq!(engine.player_scale(), 1.0);

        engine.handle_move(Right);
        engine.set_player_scale(1.5);
        assert_eq!(engine.player_scale(), 1.0);
        engine.set_player_scale(-0.5);
        assert_eq!(engine.player_scale(), 0.0);
    }

    #[test]
    fn best_score_is_monotone_across_runs() {
        let mut engine = engine();
        engine.handle_move(Up);
        engine.handle_move(Right);
        engine.on_countdown_expired();
        assert_eq!(engine.best_score(), 2);

        engine.handle_move(Up);
        engine.on_countdown_expired();
        assert_eq!(engine.best_score(), 2);
    }
}
