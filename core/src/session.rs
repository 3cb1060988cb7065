use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TickOutcome {
    Idle,
    /// Countdown ran out while the run was active; the run was reset and the
    /// countdown is already running again.
    TimedOut,
    /// Shrink animation finished; the run was reset and a fresh countdown
    /// started.
    RunReset,
}

impl TickOutcome {
    pub const fn has_update(self) -> bool {
        use TickOutcome::*;
        match self {
            Idle => false,
            TimedOut => true,
            RunReset => true,
        }
    }
}

/// One path's lifetime: the traversal engine plus the timers that drive its
/// autonomous transitions. There is exactly one writer (the caller's input
/// and tick handlers); phase checks make stale timer firings no-ops.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    config: GameConfig,
    engine: TraversalEngine,
    timers: Scheduler,
}

impl GameSession {
    pub fn new(path: CarvedPath, config: GameConfig, now: Duration) -> Self {
        let engine = TraversalEngine::new(path);
        let mut timers = Scheduler::new();
        timers.start(TimerKind::Countdown, config.countdown, true, now);
        Self {
            config,
            engine,
            timers,
        }
    }

    pub fn engine(&self) -> &TraversalEngine {
        &self.engine
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn handle_move(&mut self, direction: Direction, now: Duration) -> MoveOutcome {
        let outcome = self.engine.handle_move(direction);
        match outcome {
            MoveOutcome::Stepped => {
                self.timers
                    .start(TimerKind::Countdown, self.config.countdown, true, now);
            }
            MoveOutcome::Won => {
                // Terminal: no countdown ever fires again this session.
                self.timers.clear();
            }
            MoveOutcome::Strayed => {
                self.timers
                    .start(TimerKind::Shrink, self.config.shrink, false, now);
                self.engine.set_player_scale(1.0);
            }
            MoveOutcome::NoChange => {}
        }
        outcome
    }

    pub fn tick(&mut self, now: Duration) -> TickOutcome {
        if let Some((TimerKind::Shrink, ratio)) = self.timers.progress(now) {
            self.engine.set_player_scale(1.0 - ratio);
        }

        let Some(fired) = self.timers.advance(now) else {
            return TickOutcome::Idle;
        };

        match fired.kind {
            TimerKind::Countdown => {
                if self.engine.on_countdown_expired() {
                    TickOutcome::TimedOut
                } else {
                    // Stale firing after a phase change; drop the timer.
                    self.timers.cancel(fired.handle);
                    TickOutcome::Idle
                }
            }
            TimerKind::Shrink => {
                if self.engine.on_shrink_complete() {
                    self.timers
                        .start(TimerKind::Countdown, self.config.countdown, true, now);
                    TickOutcome::RunReset
                } else {
                    TickOutcome::Idle
                }
            }
        }
    }

    /// Countdown elapsed ratio for the renderer, 0 when none is running.
    pub fn countdown_progress(&self, now: Duration) -> f32 {
        match self.timers.progress(now) {
            Some((TimerKind::Countdown, ratio)) => ratio,
            _ => 0.0,
        }
    }
}
