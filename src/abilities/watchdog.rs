//! Abilities domain: completion watchdog for one-shot phases.

/// Slack added to a clip's length before the watchdog gives up on it.
pub const COMPLETION_MARGIN: f32 = 0.02;

/// Forces a phase to complete when its clip-finished notice never arrives.
///
/// The watchdog stores the phase it was armed for. Completion handlers check
/// [`Watchdog::awaits`] against the current phase, so a stale notice from an
/// earlier phase is ignored and the watchdog and the clip can never both
/// complete the same phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Watchdog<P> {
    armed: Option<(P, f32)>,
}

impl<P> Default for Watchdog<P> {
    fn default() -> Self {
        Self { armed: None }
    }
}

impl<P: Copy + PartialEq> Watchdog<P> {
    pub fn arm(&mut self, phase: P, deadline: f32) {
        self.armed = Some((phase, deadline));
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Is the watchdog armed for exactly this phase?
    pub fn awaits(&self, phase: P) -> bool {
        matches!(self.armed, Some((armed, _)) if armed == phase)
    }

    /// Disarm and return the phase once `now` reaches the deadline.
    pub fn poll(&mut self, now: f32) -> Option<P> {
        match self.armed {
            Some((phase, deadline)) if now >= deadline => {
                self.armed = None;
                Some(phase)
            }
            _ => None,
        }
    }
}
