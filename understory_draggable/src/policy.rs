// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Movement policies and the position model.
//!
//! Each move runs through a fixed pipeline; every stage consumes the previous
//! stage's output:
//!
//! 1. grid snap ([`snap_to_grid`], applied by the core to raw pointer deltas),
//! 2. axis constraint,
//! 3. direction lock ([`DirectionLock`]),
//! 4. bounds clamp with slack ([`clamp_with_slack`]).
//!
//! [`PositionModel`] owns the committed position and runs stages 2–4. It
//! proposes a position without committing it, so a move listener can reject
//! the move and leave the model untouched. That includes the direction lock:
//! a proposal that would engage it only does so once committed.
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_draggable::Axis;
//! use understory_draggable::policy::PositionModel;
//!
//! let mut model = PositionModel::new(Point::ZERO, None);
//! model.begin_gesture();
//! let proposal = model.propose(Vec2::new(10.0, 10.0), Axis::X, None);
//! assert_eq!(proposal.position, Point::new(10.0, 0.0));
//! model.commit(proposal);
//! ```

use kurbo::{Point, Vec2};

use crate::bounds::{BoundsRect, clamp_with_slack};
use crate::options::Axis;

/// Round a delta to the nearest multiple of the grid on each axis.
///
/// Non-positive grid sizes leave that axis untouched.
pub fn snap_to_grid(grid: [f64; 2], delta: Vec2) -> Vec2 {
    let snap = |g: f64, d: f64| if g > 0.0 { (d / g).round() * g } else { d };
    Vec2::new(snap(grid[0], delta.x), snap(grid[1], delta.y))
}

/// The axis a direction lock committed to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LockAxis {
    /// Horizontal movement only.
    X,
    /// Vertical movement only.
    Y,
}

/// Commits a gesture to its dominant axis.
///
/// Displacement is measured from the position the gesture began at. Once
/// either component exceeds `threshold`, the lock engages on the larger one
/// and the other coordinate stays pinned where it was at that moment until
/// [`DirectionLock::reset`].
///
/// [`DirectionLock::apply`] does not mutate; it returns the lock as it would
/// be after the move, and the caller keeps that value if the move is kept.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectionLock {
    /// Displacement needed before the lock engages, in position units.
    pub threshold: f64,
    origin: Option<Point>,
    locked: Option<(LockAxis, f64)>,
}

impl DirectionLock {
    /// A lock that engages after `threshold`.
    pub const fn new(threshold: f64) -> Self {
        Self {
            threshold,
            origin: None,
            locked: None,
        }
    }

    /// Start measuring from `origin`.
    pub fn begin(&mut self, origin: Point) {
        self.origin = Some(origin);
        self.locked = None;
    }

    /// Apply the lock to a proposed position.
    ///
    /// Returns the allowed position and the lock after this move, engaged if
    /// the move crossed the threshold.
    pub fn apply(&self, proposed: Point) -> (Point, Self) {
        let mut next = *self;
        if next.locked.is_none() {
            let Some(origin) = next.origin else {
                return (proposed, next);
            };
            let d = proposed - origin;
            if d.x.abs() > next.threshold || d.y.abs() > next.threshold {
                next.locked = Some(if d.x.abs() >= d.y.abs() {
                    (LockAxis::X, proposed.y)
                } else {
                    (LockAxis::Y, proposed.x)
                });
            }
        }
        let position = match next.locked {
            Some((LockAxis::X, y)) => Point::new(proposed.x, y),
            Some((LockAxis::Y, x)) => Point::new(x, proposed.y),
            None => proposed,
        };
        (position, next)
    }

    /// The locked axis, if the lock has engaged.
    pub fn axis(&self) -> Option<LockAxis> {
        self.locked.map(|(axis, _)| axis)
    }

    /// Release the lock and stop measuring.
    pub fn reset(&mut self) {
        self.origin = None;
        self.locked = None;
    }
}

/// A position produced by the pipeline, not yet committed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Proposal {
    /// Position after axis, lock and bounds.
    pub position: Point,
    /// Slack to carry if this proposal is committed.
    pub slack: Vec2,
    lock: Option<DirectionLock>,
}

/// The committed position of a draggable.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionModel {
    /// Committed position.
    pub position: Point,
    /// Movement denied by bounds, fed back into the next clamp.
    pub slack: Vec2,
    lock: Option<DirectionLock>,
}

impl PositionModel {
    /// A model at `position`; `lock_threshold` enables direction locking.
    pub fn new(position: Point, lock_threshold: Option<f64>) -> Self {
        Self {
            position,
            slack: Vec2::ZERO,
            lock: lock_threshold.map(DirectionLock::new),
        }
    }

    /// Run axis constraint, direction lock and bounds for a move by `delta`.
    pub fn propose(&self, delta: Vec2, axis: Axis, bounds: Option<&BoundsRect>) -> Proposal {
        let mut position = self.position + delta;
        if !axis.can_drag_x() {
            position.x = self.position.x;
        }
        if !axis.can_drag_y() {
            position.y = self.position.y;
        }
        let mut lock = None;
        if let Some(current) = &self.lock {
            let (locked, next) = current.apply(position);
            position = locked;
            lock = Some(next);
        }
        let (position, slack) = match bounds {
            Some(bounds) => clamp_with_slack(bounds, position, self.slack),
            None => (position, Vec2::ZERO),
        };
        Proposal {
            position,
            slack,
            lock,
        }
    }

    /// Accept a proposal.
    pub fn commit(&mut self, proposal: Proposal) {
        self.position = proposal.position;
        self.slack = proposal.slack;
        if let (Some(current), Some(next)) = (&mut self.lock, proposal.lock) {
            if current.axis().is_none() {
                if let Some(axis) = next.axis() {
                    tracing::debug!(?axis, "direction lock engaged");
                }
            }
            *current = next;
        }
    }

    /// A gesture started at the current position.
    pub fn begin_gesture(&mut self) {
        let position = self.position;
        if let Some(lock) = &mut self.lock {
            lock.begin(position);
        }
    }

    /// The gesture ended: slack and the direction lock are dropped.
    pub fn end_gesture(&mut self) {
        self.slack = Vec2::ZERO;
        if let Some(lock) = &mut self.lock {
            lock.reset();
        }
    }

    /// Enable (`Some(threshold)`) or disable direction locking.
    pub fn set_lock_threshold(&mut self, threshold: Option<f64>) {
        match (threshold, &mut self.lock) {
            (Some(t), Some(lock)) => lock.threshold = t,
            (Some(t), None) => self.lock = Some(DirectionLock::new(t)),
            (None, _) => self.lock = None,
        }
    }

    /// The axis the current gesture is locked to.
    pub fn lock_axis(&self) -> Option<LockAxis> {
        self.lock.as_ref().and_then(DirectionLock::axis)
    }
}
