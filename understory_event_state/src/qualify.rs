// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag start qualification.
//!
//! A pointer press does not have to become a drag straight away. This module
//! models the decision as a small state machine over
//! `Idle → Pending(Threshold | Delay) → Active`:
//!
//! - [`StartPolicy::Immediate`]: the press is a drag as soon as it happens.
//! - [`StartPolicy::Threshold`]: the pointer has to travel `distance` away
//!   from where it went down. The start is reported with the down position as
//!   the anchor, so callers can report the whole displacement rather than
//!   only what happened after qualification.
//! - [`StartPolicy::Delay`]: a long press. The caller arms a timer for the
//!   delay and calls [`StartGate::on_timeout`] when it fires. Moving farther
//!   than `tolerance` before that cancels the gesture outright; a later
//!   timeout is then ignored. This is what lets a touch scroll gesture pass
//!   through untouched.
//!
//! Distances are compared squared; no square roots are taken.
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::qualify::{GateOutcome, StartGate, StartPolicy};
//!
//! let mut gate = StartGate::new();
//! gate.on_down(StartPolicy::Delay { tolerance: 5.0 }, Point::ZERO);
//!
//! // Moved too far before the timer fired: the gesture is gone for good.
//! assert_eq!(gate.on_move(Point::new(8.0, 0.0)), GateOutcome::Cancelled);
//! assert_eq!(gate.on_timeout(), GateOutcome::Ignored);
//! ```

use kurbo::Point;

/// How a press qualifies as a drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StartPolicy {
    /// Start on press.
    Immediate,
    /// Start once the pointer is at least `distance` away from the press position.
    Threshold {
        /// Minimum straight-line distance from the anchor.
        distance: f64,
    },
    /// Start when the caller's delay timer fires, unless the pointer strayed
    /// more than `tolerance` from the press position first.
    Delay {
        /// Maximum straight-line distance from the anchor while waiting.
        tolerance: f64,
    },
}

/// Current state of a [`StartGate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GateState {
    /// No press in progress.
    Idle,
    /// Waiting for the pointer to travel far enough.
    PendingThreshold {
        /// Press position.
        anchor: Point,
        /// Latest position seen while pending.
        latest: Point,
        /// Required distance.
        distance: f64,
    },
    /// Waiting for the delay timer.
    PendingDelay {
        /// Press position.
        anchor: Point,
        /// Latest position seen while pending.
        latest: Point,
        /// Allowed drift.
        tolerance: f64,
    },
    /// The press qualified; the drag is running.
    Active,
}

/// Result of feeding an input to a [`StartGate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GateOutcome {
    /// Nothing to do: no press is in progress, or a timeout arrived for a
    /// gesture that is no longer waiting on one.
    Ignored,
    /// Still waiting to qualify.
    Pending,
    /// The press just qualified.
    Started {
        /// Where the press went down.
        anchor: Point,
        /// The position at qualification.
        position: Point,
    },
    /// Already active; the input belongs to the running drag.
    Active,
    /// The press was disqualified and the gate is idle again.
    Cancelled,
}

/// Drag start qualification state machine.
#[derive(Clone, Copy, Debug)]
pub struct StartGate {
    state: GateState,
}

impl Default for StartGate {
    fn default() -> Self {
        Self::new()
    }
}

impl StartGate {
    /// Create an idle gate.
    pub const fn new() -> Self {
        Self {
            state: GateState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Record a press at `anchor`.
    ///
    /// With [`StartPolicy::Immediate`] (or a non-positive distance) this
    /// returns [`GateOutcome::Started`] with `position == anchor`.
    pub fn on_down(&mut self, policy: StartPolicy, anchor: Point) -> GateOutcome {
        match policy {
            StartPolicy::Threshold { distance } if distance > 0.0 => {
                self.state = GateState::PendingThreshold {
                    anchor,
                    latest: anchor,
                    distance,
                };
                GateOutcome::Pending
            }
            StartPolicy::Delay { tolerance } => {
                self.state = GateState::PendingDelay {
                    anchor,
                    latest: anchor,
                    tolerance: tolerance.max(0.0),
                };
                GateOutcome::Pending
            }
            StartPolicy::Immediate | StartPolicy::Threshold { .. } => {
                self.state = GateState::Active;
                GateOutcome::Started {
                    anchor,
                    position: anchor,
                }
            }
        }
    }

    /// Feed a pointer move.
    pub fn on_move(&mut self, position: Point) -> GateOutcome {
        match &mut self.state {
            GateState::Idle => GateOutcome::Ignored,
            GateState::Active => GateOutcome::Active,
            GateState::PendingThreshold {
                anchor,
                latest,
                distance,
            } => {
                *latest = position;
                if anchor.distance_squared(position) >= *distance * *distance {
                    let anchor = *anchor;
                    self.state = GateState::Active;
                    GateOutcome::Started { anchor, position }
                } else {
                    GateOutcome::Pending
                }
            }
            GateState::PendingDelay {
                anchor,
                latest,
                tolerance,
            } => {
                if anchor.distance_squared(position) > *tolerance * *tolerance {
                    self.state = GateState::Idle;
                    GateOutcome::Cancelled
                } else {
                    *latest = position;
                    GateOutcome::Pending
                }
            }
        }
    }

    /// The delay timer fired.
    ///
    /// Qualifies a pending long press using the latest position seen while
    /// waiting. Anything else is ignored.
    pub fn on_timeout(&mut self) -> GateOutcome {
        match self.state {
            GateState::PendingDelay { anchor, latest, .. } => {
                self.state = GateState::Active;
                GateOutcome::Started {
                    anchor,
                    position: latest,
                }
            }
            _ => GateOutcome::Ignored,
        }
    }

    /// Drop any press and return to idle.
    ///
    /// Returns `true` if a pending (not yet active) press was discarded.
    pub fn reset(&mut self) -> bool {
        let was_pending = self.is_pending();
        self.state = GateState::Idle;
        was_pending
    }

    /// `true` while waiting to qualify.
    pub fn is_pending(&self) -> bool {
        matches!(
            self.state,
            GateState::PendingThreshold { .. } | GateState::PendingDelay { .. }
        )
    }

    /// `true` once the press has qualified.
    pub fn is_active(&self) -> bool {
        matches!(self.state, GateState::Active)
    }

    /// The press position of a pending gesture.
    pub fn anchor(&self) -> Option<Point> {
        match self.state {
            GateState::PendingThreshold { anchor, .. } | GateState::PendingDelay { anchor, .. } => {
                Some(anchor)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_starts_on_down() {
        let mut gate = StartGate::new();
        let outcome = gate.on_down(StartPolicy::Immediate, Point::new(3.0, 4.0));
        assert_eq!(
            outcome,
            GateOutcome::Started {
                anchor: Point::new(3.0, 4.0),
                position: Point::new(3.0, 4.0),
            }
        );
        assert!(gate.is_active());
        assert_eq!(gate.on_move(Point::new(9.0, 9.0)), GateOutcome::Active);
    }

    #[test]
    fn zero_threshold_is_immediate() {
        let mut gate = StartGate::new();
        let outcome = gate.on_down(StartPolicy::Threshold { distance: 0.0 }, Point::ZERO);
        assert!(matches!(outcome, GateOutcome::Started { .. }));
    }

    #[test]
    fn threshold_waits_for_distance() {
        let mut gate = StartGate::new();
        gate.on_down(StartPolicy::Threshold { distance: 10.0 }, Point::ZERO);

        assert_eq!(gate.on_move(Point::new(5.0, 0.0)), GateOutcome::Pending);
        assert_eq!(gate.anchor(), Some(Point::ZERO));
        assert_eq!(
            gate.on_move(Point::new(11.0, 0.0)),
            GateOutcome::Started {
                anchor: Point::ZERO,
                position: Point::new(11.0, 0.0),
            }
        );
        assert!(gate.is_active());
    }

    #[test]
    fn threshold_counts_diagonal_distance() {
        let mut gate = StartGate::new();
        gate.on_down(StartPolicy::Threshold { distance: 5.0 }, Point::ZERO);

        // 3-4-5 triangle lands exactly on the threshold.
        assert!(matches!(
            gate.on_move(Point::new(3.0, 4.0)),
            GateOutcome::Started { .. }
        ));
    }

    #[test]
    fn delay_starts_at_latest_position() {
        let mut gate = StartGate::new();
        gate.on_down(StartPolicy::Delay { tolerance: 5.0 }, Point::ZERO);

        assert_eq!(gate.on_move(Point::new(2.0, 1.0)), GateOutcome::Pending);
        assert_eq!(
            gate.on_timeout(),
            GateOutcome::Started {
                anchor: Point::ZERO,
                position: Point::new(2.0, 1.0),
            }
        );
    }

    #[test]
    fn delay_cancelled_by_movement_beyond_tolerance() {
        let mut gate = StartGate::new();
        gate.on_down(StartPolicy::Delay { tolerance: 5.0 }, Point::ZERO);

        assert_eq!(gate.on_move(Point::new(8.0, 0.0)), GateOutcome::Cancelled);
        assert_eq!(gate.state(), GateState::Idle);
        assert_eq!(gate.on_timeout(), GateOutcome::Ignored);
        assert_eq!(gate.on_move(Point::new(1.0, 0.0)), GateOutcome::Ignored);
    }

    #[test]
    fn timeout_without_pending_delay_is_ignored() {
        let mut gate = StartGate::new();
        assert_eq!(gate.on_timeout(), GateOutcome::Ignored);

        gate.on_down(StartPolicy::Threshold { distance: 4.0 }, Point::ZERO);
        assert_eq!(gate.on_timeout(), GateOutcome::Ignored);
        assert!(gate.is_pending());
    }

    #[test]
    fn reset_reports_discarded_pending_press() {
        let mut gate = StartGate::new();
        gate.on_down(StartPolicy::Threshold { distance: 4.0 }, Point::ZERO);
        assert!(gate.reset());
        assert!(!gate.reset());

        gate.on_down(StartPolicy::Immediate, Point::ZERO);
        assert!(!gate.reset());
        assert_eq!(gate.state(), GateState::Idle);
    }
}
