// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_state --heading-base-level=0

//! Understory Event State: small state machines for pointer gestures.
//!
//! These helpers hold the bookkeeping that sits between raw pointer input and
//! a higher-level interaction such as dragging. They do not know about any
//! particular event source, DOM, or windowing system; callers feed them
//! positions and timestamps and act on the results.
//!
//! - [`drag`]: last-committed-position tracking with an explicit "no prior
//!   move" state, producing per-move deltas.
//! - [`qualify`]: decides when a pressed pointer becomes an actual drag
//!   (immediately, after a distance threshold, or after a long-press delay
//!   with movement tolerance).
//! - [`click`]: a one-shot window that swallows the click a browser emits
//!   right after a drag is released.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::qualify::{GateOutcome, StartGate, StartPolicy};
//!
//! let mut gate = StartGate::new();
//! let policy = StartPolicy::Threshold { distance: 10.0 };
//!
//! assert_eq!(gate.on_down(policy, Point::ZERO), GateOutcome::Pending);
//! assert_eq!(gate.on_move(Point::new(5.0, 0.0)), GateOutcome::Pending);
//! assert_eq!(
//!     gate.on_move(Point::new(11.0, 0.0)),
//!     GateOutcome::Started {
//!         anchor: Point::ZERO,
//!         position: Point::new(11.0, 0.0),
//!     }
//! );
//! ```
//!
//! This crate is `no_std`.

#![no_std]

pub mod click;
pub mod drag;
pub mod qualify;
