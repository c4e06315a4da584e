// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host traits: everything the engine needs from the page it runs in.
//!
//! The engine never talks to a DOM directly. A host exposes three seams:
//!
//! - [`Layout`]: read-only measurement and tree queries.
//! - [`Document`]: side effects on the shared document (listeners, the
//!   user-select style, capture-phase click listener, pointer capture,
//!   scrolling).
//! - [`Scheduler`]: the clock, animation frames and timers.
//!
//! [`Host`] is implemented for anything that provides all three.
//!
//! The document is shared between every draggable on a page. Hosts are
//! expected to reference-count [`Document::add_user_select_style`] and
//! [`Document::add_click_capture`]: the engine pairs each add with exactly one
//! remove, but several instances may have the style installed in turn.
//!
//! Frames and timers are delivered back to the engine by the host, through
//! `on_frame` and `on_timer` on [`DraggableCore`](crate::DraggableCore) or
//! [`Draggable`](crate::Draggable), using the handles returned here.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Insets, Point, Rect, Size, Vec2};

use crate::autoscroll::ScrollAxis;
use crate::input::EventFamily;

/// Handle for a requested animation frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// Handle for a pending timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Box-model edge sizes from an element's computed style.
///
/// Uses [`Insets`] as `x0 = left`, `y0 = top`, `x1 = right`, `y1 = bottom`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxStyle {
    /// Border widths.
    pub border: Insets,
    /// Padding.
    pub padding: Insets,
    /// Margins.
    pub margin: Insets,
}

/// Something that can be scrolled by the auto-scroller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScrollTarget<N> {
    /// A scrollable element.
    Element(N),
    /// The window / root scroller.
    Window,
}

/// Read-only access to the node tree and its layout.
pub trait Layout {
    /// Node handle.
    type Node: Copy + Eq + Hash + Debug;

    /// Parent node, if any.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// The node's offset parent (its positioning ancestor).
    fn offset_parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// The document body.
    fn body(&self) -> Option<Self::Node>;

    /// `true` for element nodes (as opposed to text or comment nodes).
    fn is_element(&self, node: Self::Node) -> bool;

    /// `true` while the node is attached to the document.
    fn is_connected(&self, node: Self::Node) -> bool;

    /// Whether `node` matches a CSS selector.
    fn matches_selector(&self, node: Self::Node, selector: &str) -> bool;

    /// First node in document order matching `selector`.
    fn query_selector(&self, selector: &str) -> Option<Self::Node>;

    /// Border-box rectangle in client (viewport) coordinates.
    fn bounding_client_rect(&self, node: Self::Node) -> Rect;

    /// `clientWidth` / `clientHeight`.
    fn client_size(&self, node: Self::Node) -> Size;

    /// `offsetLeft` / `offsetTop`.
    fn offset_position(&self, node: Self::Node) -> Point;

    /// Computed border, padding and margin.
    fn box_style(&self, node: Self::Node) -> BoxStyle;

    /// `scrollLeft` / `scrollTop`.
    fn scroll_offset(&self, node: Self::Node) -> Vec2;

    /// Axes on which the node can currently scroll (overflow allows it and
    /// the content is larger than the client box).
    fn overflow_axes(&self, node: Self::Node) -> ScrollAxis;

    /// The viewport rectangle in client coordinates.
    fn viewport_rect(&self) -> Rect;

    /// Whether the platform delivers pointer events.
    ///
    /// When it does, mouse listeners are never installed so one physical
    /// gesture cannot fire twice.
    fn supports_pointer_events(&self) -> bool {
        true
    }
}

/// Side effects on the shared document.
pub trait Document: Layout {
    /// Attach document-level move/stop/cancel listeners for `family`.
    fn attach_listeners(&mut self, family: EventFamily);

    /// Detach the listeners attached by [`Document::attach_listeners`].
    fn detach_listeners(&mut self, family: EventFamily);

    /// Install the global style that suppresses text selection.
    fn add_user_select_style(&mut self);

    /// Remove one installation of the user-select style.
    fn remove_user_select_style(&mut self);

    /// Install a capture-phase `click` listener routed to the engine's
    /// `on_click`.
    fn add_click_capture(&mut self);

    /// Remove the capture-phase `click` listener.
    fn remove_click_capture(&mut self);

    /// Capture `pointer_id` to `node`.
    fn set_pointer_capture(&mut self, node: Self::Node, pointer_id: i32);

    /// Release a capture taken with [`Document::set_pointer_capture`].
    fn release_pointer_capture(&mut self, node: Self::Node, pointer_id: i32);

    /// Scroll `target` by `delta`, returning the distance actually scrolled.
    fn scroll_by(&mut self, target: ScrollTarget<Self::Node>, delta: Vec2) -> Vec2;
}

/// Clock, animation frames and timers.
pub trait Scheduler {
    /// Current time in milliseconds.
    fn now(&self) -> u64;

    /// Request a callback on the next animation frame.
    fn request_frame(&mut self) -> FrameId;

    /// Cancel a requested frame.
    fn cancel_frame(&mut self, frame: FrameId);

    /// Arm a one-shot timer.
    fn set_timeout(&mut self, delay_ms: u64) -> TimerId;

    /// Cancel a timer.
    fn clear_timeout(&mut self, timer: TimerId);
}

/// Everything the engine needs from its environment.
pub trait Host: Document + Scheduler {}

impl<T: Document + Scheduler + ?Sized> Host for T {}
