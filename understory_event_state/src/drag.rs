// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag position tracking: compute movement deltas against the last committed position.
//!
//! ## Usage
//!
//! 1) Reset with [`DragState::end`] so the next sample reports a zero delta, or
//!    anchor the gesture with [`DragState::start`] so the next sample reports
//!    the full displacement from the anchor.
//! 2) On each move, call [`DragState::sample`] to get the proposed position,
//!    the previous committed position, and the delta between them.
//! 3) Once the move has been accepted, call [`DragState::commit`].
//! 4) End the gesture with [`DragState::end`].
//!
//! Sampling and committing are separate so that a listener can reject a move
//! without the tracker drifting.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_event_state::drag::DragState;
//!
//! let mut drag = DragState::default();
//!
//! // The first sample of a gesture has no prior position, so its delta is zero.
//! let first = drag.sample(Point::new(10.0, 20.0));
//! assert_eq!(first.delta, Vec2::ZERO);
//! drag.commit(first.position);
//!
//! let next = drag.sample(Point::new(15.0, 25.0));
//! assert_eq!(next.delta, Vec2::new(5.0, 5.0));
//! assert_eq!(next.last, Point::new(10.0, 20.0));
//! ```

use kurbo::{Point, Vec2};

/// Tracks the committed position of a gesture.
#[derive(Debug, Clone, Default, Copy)]
pub struct DragState {
    /// Last committed position. `None` until something has been committed.
    pub last_pos: Option<Point>,
}

/// One proposed move, relative to the last committed position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSample {
    /// Proposed position.
    pub position: Point,
    /// Previous committed position (equal to `position` for the first sample).
    pub last: Point,
    /// `position - last`.
    pub delta: Vec2,
}

impl DragState {
    /// Anchor a gesture at `pos`.
    ///
    /// The anchor becomes the committed position, so the next sample reports
    /// the total displacement since the anchor.
    pub fn start(&mut self, pos: Point) {
        self.last_pos = Some(pos);
    }

    /// Describe a move to `pos` without committing it.
    pub fn sample(&self, pos: Point) -> DragSample {
        let last = self.last_pos.unwrap_or(pos);
        DragSample {
            position: pos,
            last,
            delta: pos - last,
        }
    }

    /// Record `pos` as the committed position.
    pub fn commit(&mut self, pos: Point) {
        self.last_pos = Some(pos);
    }

    /// End the current gesture and reset state.
    pub fn end(&mut self) {
        self.last_pos = None;
    }
}
