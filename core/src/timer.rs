use core::time::Duration;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    Countdown,
    Shrink,
}

/// Identity of one started timer. Stale handles (from a timer that was
/// since replaced or cancelled) never match anything.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerHandle(u64);

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimerFired {
    pub handle: TimerHandle,
    pub kind: TimerKind,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
struct ActiveTimer {
    handle: TimerHandle,
    kind: TimerKind,
    started_at: Duration,
    duration: Duration,
    repeating: bool,
}

/// Cooperative single-slot scheduler driven by an external clock.
///
/// Holds at most one timer, so the countdown and the shrink animation are
/// mutually exclusive by construction: starting one replaces the other.
/// `now` is time since an epoch the caller chooses (app start, in the web
/// layer); only differences matter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scheduler {
    active: Option<ActiveTimer>,
    next_handle: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Default::default()
    }

    /// Starts a timer, cancelling whatever was running.
    pub fn start(
        &mut self,
        kind: TimerKind,
        duration: Duration,
        repeating: bool,
        now: Duration,
    ) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        self.active = Some(ActiveTimer {
            handle,
            kind,
            started_at: now,
            duration,
            repeating,
        });
        handle
    }

    /// Cancels the active timer only when `handle` still names it.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        if self.is_live(handle) {
            self.active = None;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.active.map_or(false, |timer| timer.handle == handle)
    }

    pub fn active_kind(&self) -> Option<TimerKind> {
        self.active.map(|timer| timer.kind)
    }

    /// Elapsed/duration for the active timer, clamped to [0, 1].
    pub fn progress(&self, now: Duration) -> Option<(TimerKind, f32)> {
        self.active.map(|timer| {
            let ratio = if timer.duration.is_zero() {
                1.0
            } else {
                let elapsed = now.saturating_sub(timer.started_at);
                elapsed.as_secs_f32() / timer.duration.as_secs_f32()
            };
            (timer.kind, ratio.clamp(0.0, 1.0))
        })
    }

    /// Fires at most one due timer. A repeating timer restarts from `now`
    /// under the same handle; a one-shot clears the slot.
    pub fn advance(&mut self, now: Duration) -> Option<TimerFired> {
        let timer = self.active.as_mut()?;
        if now.saturating_sub(timer.started_at) < timer.duration {
            return None;
        }

        let fired = TimerFired {
            handle: timer.handle,
            kind: timer.kind,
        };
        if timer.repeating {
            timer.started_at = now;
        } else {
            self.active = None;
        }
        Some(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: fn(u64) -> Duration = Duration::from_millis;

    #[test]
    fn timer_fires_once_its_duration_elapses() {
        let mut timers = Scheduler::new();
        let handle = timers.start(TimerKind::Shrink, MS(400), false, MS(0));

        assert_eq!(timers.advance(MS(399)), None);
        let fired = timers.advance(MS(400)).unwrap();
        assert_eq!(fired.handle, handle);
        assert_eq!(fired.kind, TimerKind::Shrink);
        // One-shot: the slot is free afterwards.
        assert_eq!(timers.active_kind(), None);
        assert_eq!(timers.advance(MS(9000)), None);
    }

    #[test]
    fn repeating_timer_restarts_under_the_same_handle() {
        let mut timers = Scheduler::new();
        let handle = timers.start(TimerKind::Countdown, MS(100), true, MS(0));

        let first = timers.advance(MS(120)).unwrap();
        assert_eq!(first.handle, handle);
        assert!(timers.is_live(handle));
        assert_eq!(timers.advance(MS(180)), None);
        assert!(timers.advance(MS(220)).is_some());
    }

    #[test]
    fn starting_a_timer_replaces_the_previous_one() {
        let mut timers = Scheduler::new();
        let countdown = timers.start(TimerKind::Countdown, MS(100), true, MS(0));
        let shrink = timers.start(TimerKind::Shrink, MS(50), false, MS(10));

        assert!(!timers.is_live(countdown));
        assert!(timers.is_live(shrink));
        // The replaced countdown never fires, even past its due time.
        assert_eq!(timers.advance(MS(59)), None);
        assert_eq!(timers.advance(MS(60)).unwrap().kind, TimerKind::Shrink);
    }

    #[test]
    fn stale_handles_cannot_cancel_the_current_timer() {
        let mut timers = Scheduler::new();
        let old = timers.start(TimerKind::Countdown, MS(100), true, MS(0));
        let new = timers.start(TimerKind::Countdown, MS(100), true, MS(0));

        assert!(!timers.cancel(old));
        assert!(timers.is_live(new));
        assert!(timers.cancel(new));
        assert_eq!(timers.active_kind(), None);
    }

    #[test]
    fn progress_is_clamped_to_the_unit_interval() {
        let mut timers = Scheduler::new();
        timers.start(TimerKind::Countdown, MS(200), true, MS(100));

        assert_eq!(timers.progress(MS(0)), Some((TimerKind::Countdown, 0.0)));
        assert_eq!(timers.progress(MS(200)), Some((TimerKind::Countdown, 0.5)));
        assert_eq!(timers.progress(MS(900)), Some((TimerKind::Countdown, 1.0)));
    }
}
