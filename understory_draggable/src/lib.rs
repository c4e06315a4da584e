// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_draggable --heading-base-level=0

//! Understory Draggable: a headless pointer-drag engine.
//!
//! The crate turns raw mouse, touch and pointer events into a drag gesture
//! with a strict `start → drag* → stop` callback contract, and optionally
//! runs each move through a position pipeline (grid, axis, direction lock,
//! bounds with slack) to produce a CSS or SVG transform.
//!
//! It never touches a real document. Everything it needs from the platform
//! goes through the [`host`] traits:
//!
//! - [`Layout`](host::Layout): tree structure, selectors, rects, box styles,
//!   scroll offsets.
//! - [`Document`](host::Document): listener attachment, user-select
//!   suppression, click capture, pointer capture, scrolling.
//! - [`Scheduler`](host::Scheduler): animation frames, timers and the clock.
//!
//! [`headless::HeadlessHost`] implements all three in memory and is what the
//! tests and demos drive.
//!
//! ## Layers
//!
//! - [`DraggableCore`]: the gesture state machine. Reports pointer positions
//!   relative to the offset parent and owns no position of its own.
//! - [`Draggable`]: owns a position, applies the movement pipeline, and
//!   produces the transform.
//!
//! Start qualification (distance threshold, long-press delay) and click
//! suppression come from `understory_event_state`.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use understory_draggable::headless::{HeadlessHost, HeadlessNode};
//! use understory_draggable::input::InputEvent;
//! use understory_draggable::{Bounds, BoundsRect, Draggable, DraggableOptions};
//!
//! let mut host = HeadlessHost::new(Size::new(800.0, 600.0));
//! let card = host.insert(
//!     host.body_id(),
//!     HeadlessNode::element("div").with_rect(Rect::new(0.0, 0.0, 100.0, 60.0)),
//! );
//!
//! let mut drag = Draggable::new(DraggableOptions {
//!     bounds: Bounds::Rect(BoundsRect::new(0.0, 0.0, 50.0, 50.0)),
//!     ..DraggableOptions::default()
//! });
//! drag.mount(card);
//!
//! let at = |x, y| InputEvent::mouse(Some(card), Point::new(x, y));
//! drag.on_pointer_down(&mut host, &mut (), &at(10.0, 10.0))?;
//! drag.on_pointer_move(&mut host, &mut (), &at(90.0, 30.0))?;
//! drag.on_pointer_up(&mut host, &mut (), &at(90.0, 30.0))?;
//!
//! assert_eq!(drag.position(), Point::new(50.0, 20.0));
//! assert_eq!(drag.transform(), "translate(50px,20px)");
//! // Everything the gesture installed on the document is gone again.
//! assert_eq!(host.total_listeners(), 0);
//! # Ok::<(), understory_draggable::DraggableError>(())
//! ```
//!
//! ## Logging
//!
//! Gesture lifecycle events are logged with [`tracing`] at `debug`, per-move
//! detail and ignored events at `trace`. The crate never installs a
//! subscriber.

pub mod autoscroll;
pub mod bounds;
pub mod core;
pub mod draggable;
pub mod error;
pub mod geometry;
pub mod headless;
pub mod host;
pub mod input;
pub mod options;
pub mod policy;

pub use self::bounds::{Bounds, BoundsRect};
pub use self::core::{DragHandler, DraggableCore, DraggableData, Effects, Outcome};
pub use self::draggable::Draggable;
pub use self::error::DraggableError;
pub use self::options::{AutoScrollOptions, Axis, CoreOptions, DraggableOptions, TransformTarget};
