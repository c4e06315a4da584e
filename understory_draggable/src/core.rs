// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag state machine.
//!
//! [`DraggableCore`] tracks one gesture at a time through
//! `Idle → [Pending] → Dragging → Idle` and reports it through a
//! [`DragHandler`]. It does not own a position: it reports where the pointer
//! is, in offset-parent coordinates divided by the scale, and leaves moving
//! anything to the caller. [`Draggable`](crate::Draggable) builds a position
//! model on top of it.
//!
//! ## Callbacks
//!
//! Every gesture produces `start`, zero or more `drag`, then exactly one
//! `stop`, including when it is aborted:
//!
//! - [`DragHandler::on_start`] returning [`Outcome::Cancel`] abandons the
//!   press before anything is installed on the document. No `stop` follows.
//! - [`DragHandler::on_drag`] returning [`Outcome::Cancel`] stops the drag
//!   with a synthetic release, running the full teardown.
//! - [`DragHandler::on_stop`]'s outcome is advisory; teardown always runs.
//!
//! A press that is still waiting to qualify (threshold or long-press delay)
//! and is released, cancelled, or unmounted produces no callbacks at all.
//!
//! ## Host contract
//!
//! The host forwards element events (`on_pointer_down`) and, while listeners
//! are attached through [`Document::attach_listeners`](crate::host::Document::attach_listeners),
//! document events (`on_pointer_move`, `on_pointer_up`, `on_pointer_cancel`).
//! Frames and timers requested through the [`Scheduler`](crate::host::Scheduler)
//! come back through [`DraggableCore::on_frame`] and [`DraggableCore::on_timer`],
//! and clicks caught by the capture listener through [`DraggableCore::on_click`].
//! Each handler returns [`Effects`] for the host to apply to the native event.
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use understory_draggable::headless::{HeadlessHost, HeadlessNode, NodeId};
//! use understory_draggable::input::InputEvent;
//! use understory_draggable::{CoreOptions, DragHandler, DraggableCore, DraggableData, Outcome};
//!
//! #[derive(Default)]
//! struct Log(Vec<(&'static str, f64, f64)>);
//!
//! impl DragHandler<NodeId> for Log {
//!     fn on_start(&mut self, _: &InputEvent<NodeId>, d: &DraggableData<NodeId>) -> Outcome {
//!         self.0.push(("start", d.x, d.y));
//!         Outcome::Continue
//!     }
//!     fn on_drag(&mut self, _: &InputEvent<NodeId>, d: &DraggableData<NodeId>) -> Outcome {
//!         self.0.push(("drag", d.delta_x, d.delta_y));
//!         Outcome::Continue
//!     }
//! }
//!
//! let mut host = HeadlessHost::new(Size::new(800.0, 600.0));
//! let node = host.insert(
//!     host.body_id(),
//!     HeadlessNode::element("div").with_rect(Rect::new(0.0, 0.0, 40.0, 40.0)),
//! );
//! let mut core = DraggableCore::new(CoreOptions::default());
//! core.mount(node);
//!
//! let mut log = Log::default();
//! let at = |x, y| InputEvent::mouse(Some(node), Point::new(x, y));
//! core.on_pointer_down(&mut host, &mut log, &at(10.0, 10.0));
//! core.on_pointer_move(&mut host, &mut log, &at(15.0, 12.0));
//! core.on_pointer_up(&mut host, &mut log, &at(15.0, 12.0));
//!
//! assert_eq!(log.0, vec![("start", 10.0, 10.0), ("drag", 5.0, 2.0)]);
//! assert!(!core.is_dragging());
//! ```

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Vec2};
use tracing::{debug, trace, warn};
use understory_event_state::click::{ClickResult, ClickSuppression};
use understory_event_state::drag::DragState;
use understory_event_state::qualify::{GateOutcome, GateState, StartGate};

use crate::autoscroll;
use crate::geometry::{FrameRectCache, offset_xy_from_parent};
use crate::host::{FrameId, Host, Layout, TimerId};
use crate::input::{self, EventFamily, InputEvent, InputKind, ListenerFamilies, PointerBinding};
use crate::options::CoreOptions;
use crate::policy::snap_to_grid;

/// Elements that never start a drag when
/// [`CoreOptions::cancel_interactive_elements`] is set.
pub const INTERACTIVE_ELEMENTS: &str = "input, textarea, select, option, button, [contenteditable]";

/// What every drag callback receives.
///
/// Positions are relative to the offset parent and divided by the scale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DraggableData<N> {
    /// The dragged node.
    pub node: N,
    /// Current x.
    pub x: f64,
    /// Current y.
    pub y: f64,
    /// `x - last_x`.
    pub delta_x: f64,
    /// `y - last_y`.
    pub delta_y: f64,
    /// Previous x.
    pub last_x: f64,
    /// Previous y.
    pub last_y: f64,
}

impl<N> DraggableData<N> {
    /// Data for a move from `last` to `position`.
    pub fn new(node: N, position: Point, last: Point) -> Self {
        let delta = position - last;
        Self {
            node,
            x: position.x,
            y: position.y,
            delta_x: delta.x,
            delta_y: delta.y,
            last_x: last.x,
            last_y: last.y,
        }
    }

    /// `(x, y)`.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// `(delta_x, delta_y)`.
    pub fn delta(&self) -> Vec2 {
        Vec2::new(self.delta_x, self.delta_y)
    }

    /// `(last_x, last_y)`.
    pub fn last(&self) -> Point {
        Point::new(self.last_x, self.last_y)
    }
}

/// A callback's verdict.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Carry on.
    #[default]
    Continue,
    /// Veto: abandon the start, or stop the drag.
    Cancel,
}

/// Receives a gesture's callbacks.
///
/// Every method has a default that accepts, so implement only what you need.
/// `()` is the handler that ignores everything.
pub trait DragHandler<N> {
    /// A press reached the element, before any filtering other than the
    /// one-gesture-at-a-time rule.
    fn on_mouse_down(&mut self, _event: &InputEvent<N>) {}

    /// The press qualified as a drag.
    fn on_start(&mut self, _event: &InputEvent<N>, _data: &DraggableData<N>) -> Outcome {
        Outcome::Continue
    }

    /// The pointer moved.
    fn on_drag(&mut self, _event: &InputEvent<N>, _data: &DraggableData<N>) -> Outcome {
        Outcome::Continue
    }

    /// The drag ended. The outcome is advisory.
    fn on_stop(&mut self, _event: &InputEvent<N>, _data: &DraggableData<N>) -> Outcome {
        Outcome::Continue
    }
}

impl<N> DragHandler<N> for () {}

bitflags::bitflags! {
    /// What the host should do with the native event after a handler ran.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Effects: u8 {
        /// Call `preventDefault()`.
        const PREVENT_DEFAULT  = 0b0000_0001;
        /// Call `stopPropagation()`.
        const STOP_PROPAGATION = 0b0000_0010;
    }
}

bitflags::bitflags! {
    /// Work queued for the next animation frame.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    struct FrameWork: u8 {
        const DRAG       = 0b0000_0001;
        const AUTOSCROLL = 0b0000_0010;
        const RECT_CACHE = 0b0000_0100;
    }
}

fn checked_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        warn!(scale, "scale must be finite and positive; using 1");
        1.0
    }
}

fn matches_up_to<L: Layout + ?Sized>(layout: &L, from: L::Node, selector: &str, base: L::Node) -> bool {
    let mut cursor = Some(from);
    while let Some(node) = cursor {
        if layout.matches_selector(node, selector) {
            return true;
        }
        if node == base {
            return false;
        }
        cursor = layout.parent(node);
    }
    false
}

fn is_within<L: Layout + ?Sized>(layout: &L, from: L::Node, base: L::Node) -> bool {
    let mut cursor = Some(from);
    while let Some(node) = cursor {
        if node == base {
            return true;
        }
        cursor = layout.parent(node);
    }
    false
}

/// The drag state machine for one element.
#[derive(Debug)]
pub struct DraggableCore<N> {
    options: CoreOptions<N>,
    scale: f64,
    node: Option<N>,
    dragging: bool,
    moved: bool,
    tracker: DragState,
    gate: StartGate,
    binding: Option<PointerBinding>,
    family: Option<input::EventFamily>,
    attached: Option<input::EventFamily>,
    pending_event: Option<InputEvent<N>>,
    delay_timer: Option<TimerId>,
    frame: Option<FrameId>,
    frame_work: FrameWork,
    buffered: Option<InputEvent<N>>,
    last_event: Option<InputEvent<N>>,
    user_select: bool,
    pointer_capture: Option<i32>,
    click: ClickSuppression,
    click_capture: bool,
    click_timer: Option<TimerId>,
    rects: FrameRectCache<N>,
}

impl<N: Copy + Eq + Hash + Debug> DraggableCore<N> {
    /// Create an unmounted core.
    pub fn new(options: CoreOptions<N>) -> Self {
        Self {
            scale: checked_scale(options.scale),
            click: ClickSuppression::new(options.click_suppression_duration),
            options,
            node: None,
            dragging: false,
            moved: false,
            tracker: DragState::default(),
            gate: StartGate::new(),
            binding: None,
            family: None,
            attached: None,
            pending_event: None,
            delay_timer: None,
            frame: None,
            frame_work: FrameWork::empty(),
            buffered: None,
            last_event: None,
            user_select: false,
            pointer_capture: None,
            click_capture: false,
            click_timer: None,
            rects: FrameRectCache::new(),
        }
    }

    /// Current options.
    pub fn options(&self) -> &CoreOptions<N> {
        &self.options
    }

    /// Replace the options. A gesture in progress keeps running with the new
    /// values.
    pub fn set_options(&mut self, options: CoreOptions<N>) {
        self.scale = checked_scale(options.scale);
        self.click.duration = options.click_suppression_duration;
        self.options = options;
    }

    /// The scale in effect (the configured one, or 1 if that was invalid).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Attach to `node`.
    pub fn mount(&mut self, node: N) {
        debug!(?node, "mounted");
        self.node = Some(node);
    }

    /// The node this core is mounted on; `None` before mount and after unmount.
    pub fn owner_node(&self) -> Option<N> {
        self.node
    }

    /// `true` between mount and unmount.
    pub fn is_mounted(&self) -> bool {
        self.node.is_some()
    }

    /// `true` from a qualified start until stop.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// `true` while a press waits to qualify.
    pub fn is_pending(&self) -> bool {
        self.gate.is_pending()
    }

    /// Last committed pointer position of the current drag.
    pub fn last_position(&self) -> Option<Point> {
        self.tracker.last_pos
    }

    /// Start listener families to install on the element.
    pub fn start_listeners<L: Layout + ?Sized>(&self, layout: &L) -> ListenerFamilies {
        input::start_listeners(
            layout.supports_pointer_events(),
            self.options.allow_mobile_scroll,
        )
    }

    /// The element's `touch-action` style.
    pub fn touch_action(&self) -> &'static str {
        input::touch_action(self.options.allow_mobile_scroll)
    }

    /// Detach from the node, force-stopping any drag in progress.
    pub fn unmount<H, D>(&mut self, host: &mut H, handler: &mut D)
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        let Some(node) = self.node else {
            return;
        };
        if self.dragging {
            let release = match &self.last_event {
                Some(event) => event.synthetic_release(),
                None => InputEvent {
                    target: Some(node),
                    kind: InputKind::mouse(Point::ZERO),
                    synthetic: true,
                },
            };
            debug!(?node, "unmounted mid-drag");
            self.stop_with(host, handler, &release, None);
        } else {
            self.teardown(host);
        }
        self.clear_click_capture(host);
        self.node = None;
        debug!(?node, "unmounted");
    }

    /// A press on the element.
    pub fn on_pointer_down<H, D>(&mut self, host: &mut H, handler: &mut D, event: &InputEvent<N>) -> Effects
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        let Some(node) = self.node else {
            return Effects::empty();
        };
        if self.dragging || self.gate.is_pending() {
            trace!("press during an active gesture ignored");
            return Effects::empty();
        }
        if self.options.allow_mobile_scroll
            && event.kind.family() == EventFamily::Pointer
            && event.kind.is_touch()
        {
            // Touch listeners own touch input while native scrolling is allowed.
            return Effects::empty();
        }

        handler.on_mouse_down(event);

        if !self.options.allow_any_click && event.kind.button().is_some_and(|b| b != 0) {
            trace!(button = event.kind.button(), "non-primary button ignored");
            return Effects::empty();
        }
        if self.options.disabled {
            return Effects::empty();
        }
        if !self.accepts_target(&*host, node, event.target) {
            return Effects::empty();
        }

        let binding = input::pick_identifier(&event.kind);
        let Some(client) = input::extract_pointer(&event.kind, binding) else {
            return Effects::empty();
        };
        let Some(position) = self.to_parent(host, node, client) else {
            trace!("press position could not be measured");
            return Effects::empty();
        };
        self.binding = binding;
        self.family = Some(event.kind.family());
        self.last_event = Some(event.clone());

        match self.gate.on_down(self.options.start_policy(self.scale), position) {
            GateOutcome::Started { anchor, position } => {
                self.activate(host, handler, event, anchor, position);
            }
            _ => {
                debug!(
                    event = event.kind.family().start_event(),
                    ?position,
                    state = ?self.gate.state(),
                    "press waiting to qualify"
                );
                self.attach(host);
                if matches!(self.gate.state(), GateState::PendingDelay { .. }) {
                    self.pending_event = Some(event.clone());
                    self.delay_timer = Some(host.set_timeout(self.options.drag_start_delay));
                }
            }
        }
        self.touch_effects(event)
    }

    /// A move delivered by the document listeners.
    pub fn on_pointer_move<H, D>(&mut self, host: &mut H, handler: &mut D, event: &InputEvent<N>) -> Effects
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        let Some(node) = self.node else {
            return Effects::empty();
        };
        let Some(client) = self.route(event) else {
            trace!("move for another pointer ignored");
            return Effects::empty();
        };

        if self.gate.is_pending() {
            let Some(position) = self.to_parent(host, node, client) else {
                return self.touch_effects(event);
            };
            match self.gate.on_move(position) {
                GateOutcome::Started { anchor, position } => {
                    self.pending_event = None;
                    self.last_event = Some(event.clone());
                    self.activate(host, handler, event, anchor, position);
                }
                GateOutcome::Cancelled => {
                    debug!(?position, "press moved past the delay tolerance; gesture cancelled");
                    self.teardown(host);
                }
                _ => {
                    self.pending_event = Some(event.clone());
                    self.last_event = Some(event.clone());
                }
            }
            return self.touch_effects(event);
        }

        if !self.dragging {
            return Effects::empty();
        }
        if self.options.use_raf_drag {
            self.buffered = Some(event.clone());
            self.schedule(host, FrameWork::DRAG);
        } else {
            self.handle_drag(host, handler, event);
        }
        self.touch_effects(event)
    }

    /// A release delivered by the document listeners.
    pub fn on_pointer_up<H, D>(&mut self, host: &mut H, handler: &mut D, event: &InputEvent<N>) -> Effects
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        let Some(node) = self.node else {
            return Effects::empty();
        };
        let Some(client) = self.route(event) else {
            return Effects::empty();
        };
        if self.gate.is_pending() {
            debug!("released before the press qualified");
            self.teardown(host);
            return Effects::empty();
        }
        if !self.dragging {
            return Effects::empty();
        }
        if let Some(buffered) = self.buffered.take() {
            self.handle_drag(host, handler, &buffered);
            if !self.dragging {
                return Effects::empty();
            }
        }
        let position = self.to_parent(host, node, client);
        self.stop_with(host, handler, event, position);
        Effects::empty()
    }

    /// The platform cancelled the pointer (`pointercancel`, `touchcancel`).
    ///
    /// Ends the drag at its last committed position.
    pub fn on_pointer_cancel<H, D>(&mut self, host: &mut H, handler: &mut D, event: &InputEvent<N>) -> Effects
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        if self.node.is_none() || self.route(event).is_none() {
            return Effects::empty();
        }
        if self.gate.is_pending() {
            debug!("press cancelled before it qualified");
            self.teardown(host);
        } else if self.dragging {
            self.stop_with(host, handler, event, None);
        }
        Effects::empty()
    }

    /// An animation frame requested by this core.
    pub fn on_frame<H, D>(&mut self, host: &mut H, handler: &mut D, frame: FrameId)
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        if self.frame != Some(frame) {
            trace!(?frame, "stale frame ignored");
            return;
        }
        self.frame = None;
        let work = core::mem::take(&mut self.frame_work);
        self.rects.clear();
        if work.contains(FrameWork::DRAG) {
            if let Some(event) = self.buffered.take() {
                self.handle_drag(host, handler, &event);
            }
        }
        if work.contains(FrameWork::AUTOSCROLL) {
            self.auto_scroll(host, handler);
        }
    }

    /// A timer set by this core fired.
    pub fn on_timer<H, D>(&mut self, host: &mut H, handler: &mut D, timer: TimerId)
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        if self.delay_timer == Some(timer) {
            self.delay_timer = None;
            if let GateOutcome::Started { anchor, position } = self.gate.on_timeout() {
                let Some(event) = self.pending_event.take() else {
                    self.teardown(host);
                    return;
                };
                debug!(?position, "long press qualified");
                self.activate(host, handler, &event, anchor, position);
            }
        } else if self.click_timer == Some(timer) {
            self.click_timer = None;
            trace!("click suppression window closed");
            self.clear_click_capture(host);
        }
    }

    /// A click caught by the capture-phase listener.
    pub fn on_click<H: Host<Node = N>>(&mut self, host: &mut H) -> Effects {
        if !self.click_capture {
            return Effects::empty();
        }
        let result = self.click.on_click(host.now());
        self.clear_click_capture(host);
        match result {
            ClickResult::Suppressed => {
                debug!("click after drag suppressed");
                Effects::PREVENT_DEFAULT | Effects::STOP_PROPAGATION
            }
            ClickResult::Passed => Effects::empty(),
        }
    }

    fn accepts_target<L: Layout<Node = N> + ?Sized>(&self, layout: &L, node: N, target: Option<N>) -> bool {
        let Some(target) = target else {
            return false;
        };
        if !layout.is_connected(node) {
            trace!(?node, "press on a detached node");
            return false;
        }
        if !is_within(layout, target, node) {
            trace!(?target, "press outside the node");
            return false;
        }
        if self
            .options
            .handle
            .as_deref()
            .is_some_and(|handle| !matches_up_to(layout, target, handle, node))
        {
            trace!(?target, "press outside the handle");
            return false;
        }
        if self
            .options
            .cancel
            .as_deref()
            .is_some_and(|cancel| matches_up_to(layout, target, cancel, node))
        {
            trace!(?target, "press on a cancel element");
            return false;
        }
        if self.options.cancel_interactive_elements
            && matches_up_to(layout, target, INTERACTIVE_ELEMENTS, node)
        {
            trace!(?target, "press on an interactive element");
            return false;
        }
        true
    }

    /// The client point of `event` if it belongs to the current gesture.
    fn route(&self, event: &InputEvent<N>) -> Option<Point> {
        if self.family != Some(event.kind.family()) {
            return None;
        }
        input::extract_pointer(&event.kind, self.binding)
    }

    fn to_parent<H: Host<Node = N>>(&mut self, host: &mut H, node: N, client: Point) -> Option<Point> {
        let body = host.body();
        let parent = self
            .options
            .offset_parent
            .or_else(|| host.offset_parent(node))
            .or(body)?;
        let origin = if Some(parent) == body {
            Point::ZERO
        } else {
            let host_ref = &*host;
            let origin = self
                .rects
                .get_or_measure(parent, || host_ref.bounding_client_rect(parent))
                .origin();
            self.schedule(host, FrameWork::RECT_CACHE);
            origin
        };
        Some(offset_xy_from_parent(
            client,
            origin,
            host.scroll_offset(parent),
            self.scale,
        ))
    }

    fn touch_effects(&self, event: &InputEvent<N>) -> Effects {
        if matches!(event.kind, InputKind::Touch { .. })
            && (self.dragging || !self.options.allow_mobile_scroll)
        {
            Effects::PREVENT_DEFAULT
        } else {
            Effects::empty()
        }
    }

    fn schedule<H: Host<Node = N>>(&mut self, host: &mut H, work: FrameWork) {
        self.frame_work |= work;
        if self.frame.is_none() {
            self.frame = Some(host.request_frame());
        }
    }

    fn attach<H: Host<Node = N>>(&mut self, host: &mut H) {
        if self.attached.is_some() {
            return;
        }
        if let Some(family) = self.family {
            trace!(
                moves = family.move_event(),
                stops = family.stop_event(),
                cancels = family.cancel_event(),
                "listeners attached"
            );
            host.attach_listeners(family);
            self.attached = Some(family);
        }
    }

    /// Start a qualified drag and, if it qualified away from the anchor, run
    /// the qualifying position as the first move.
    fn activate<H, D>(&mut self, host: &mut H, handler: &mut D, event: &InputEvent<N>, anchor: Point, position: Point)
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        if !self.begin_drag(host, handler, event, anchor, position) {
            return;
        }
        if position != anchor
            && self.drag_to(host, handler, event, position)
            && self.options.auto_scroll.enabled
        {
            self.schedule(host, FrameWork::AUTOSCROLL);
        }
    }

    fn begin_drag<H, D>(&mut self, host: &mut H, handler: &mut D, event: &InputEvent<N>, anchor: Point, position: Point) -> bool
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        let Some(node) = self.node else {
            return false;
        };
        let data = DraggableData::new(node, position, anchor);
        if handler.on_start(event, &data) == Outcome::Cancel {
            debug!(?node, "drag start vetoed");
            self.teardown(host);
            return false;
        }
        self.dragging = true;
        self.moved = false;
        self.tracker.start(anchor);
        self.attach(host);
        if self.options.enable_user_select_hack && !self.user_select {
            host.add_user_select_style();
            self.user_select = true;
        }
        if let InputKind::Pointer { pointer_id, .. } = event.kind {
            host.set_pointer_capture(node, pointer_id);
            self.pointer_capture = Some(pointer_id);
        }
        debug!(?node, x = position.x, y = position.y, "drag started");
        true
    }

    fn handle_drag<H, D>(&mut self, host: &mut H, handler: &mut D, event: &InputEvent<N>)
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        let Some(node) = self.node else {
            return;
        };
        let Some(client) = self.route(event) else {
            return;
        };
        let Some(position) = self.to_parent(host, node, client) else {
            trace!("move position could not be measured");
            return;
        };
        self.last_event = Some(event.clone());
        if self.drag_to(host, handler, event, position) && self.options.auto_scroll.enabled {
            self.schedule(host, FrameWork::AUTOSCROLL);
        }
    }

    /// Run one move through grid snapping and the drag callback.
    ///
    /// Returns `false` if the drag ended.
    fn drag_to<H, D>(&mut self, host: &mut H, handler: &mut D, event: &InputEvent<N>, position: Point) -> bool
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        let Some(node) = self.node else {
            return false;
        };
        let sample = self.tracker.sample(position);
        let mut delta = sample.delta;
        if let Some(grid) = self.options.grid {
            delta = snap_to_grid(grid, delta);
            if delta == Vec2::ZERO {
                trace!("sub-grid move ignored");
                return true;
            }
        }
        let position = sample.last + delta;
        let data = DraggableData::new(node, position, sample.last);
        trace!(x = data.x, y = data.y, dx = data.delta_x, dy = data.delta_y, "drag");
        if handler.on_drag(event, &data) == Outcome::Cancel {
            debug!(?node, "drag cancelled by listener");
            let release = event.synthetic_release();
            self.stop_with(host, handler, &release, None);
            return false;
        }
        self.tracker.commit(position);
        self.moved |= delta != Vec2::ZERO;
        true
    }

    fn auto_scroll<H, D>(&mut self, host: &mut H, handler: &mut D)
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        if !self.dragging || !self.options.auto_scroll.enabled {
            return;
        }
        let Some(node) = self.node else {
            return;
        };
        let Some(event) = self.last_event.clone() else {
            return;
        };
        let Some(client) = self.route(&event) else {
            return;
        };
        let step = autoscroll::step(host, node, client, &self.options.auto_scroll);
        if step.scrolled {
            // The node moved under a stationary pointer.
            self.rects.clear();
            if let Some(position) = self.to_parent(host, node, client) {
                if !self.drag_to(host, handler, &event, position) {
                    return;
                }
            }
        }
        if step.near_edge && self.dragging {
            self.schedule(host, FrameWork::AUTOSCROLL);
        }
    }

    /// End the drag with a `stop` callback.
    ///
    /// `position` is where the pointer was released; `None` reports the last
    /// committed position (synthetic and cancelled releases).
    fn stop_with<H, D>(&mut self, host: &mut H, handler: &mut D, event: &InputEvent<N>, position: Option<Point>)
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        let Some(node) = self.node else {
            return;
        };
        if !self.dragging {
            return;
        }
        let Some(last) = self.tracker.last_pos.or(position) else {
            self.teardown(host);
            return;
        };
        let position = match (position, self.options.grid) {
            (Some(p), Some(grid)) => last + snap_to_grid(grid, p - last),
            (Some(p), None) => p,
            (None, _) => last,
        };
        let data = DraggableData::new(node, position, last);
        if handler.on_stop(event, &data) == Outcome::Cancel {
            trace!("stop listener returned cancel; cleaning up regardless");
        }
        let moved = self.moved || data.delta() != Vec2::ZERO;
        self.teardown(host);
        if moved && self.options.enable_click_suppression {
            self.arm_click_suppression(host);
        }
        debug!(?node, x = data.x, y = data.y, synthetic = event.synthetic, "drag stopped");
    }

    /// Release everything the current gesture installed and go idle.
    fn teardown<H: Host<Node = N>>(&mut self, host: &mut H) {
        if self.gate.reset() {
            trace!("pending press discarded");
        }
        if let Some(timer) = self.delay_timer.take() {
            host.clear_timeout(timer);
        }
        if let Some(frame) = self.frame.take() {
            host.cancel_frame(frame);
        }
        self.frame_work = FrameWork::empty();
        self.buffered = None;
        self.pending_event = None;
        self.last_event = None;
        self.rects.clear();
        if let Some(family) = self.attached.take() {
            host.detach_listeners(family);
        }
        if self.user_select {
            host.remove_user_select_style();
            self.user_select = false;
        }
        if let Some(pointer_id) = self.pointer_capture.take() {
            if let Some(node) = self.node {
                host.release_pointer_capture(node, pointer_id);
            }
        }
        self.dragging = false;
        self.moved = false;
        self.tracker.end();
        self.binding = None;
        self.family = None;
    }

    fn arm_click_suppression<H: Host<Node = N>>(&mut self, host: &mut H) {
        self.click.arm(host.now());
        if let Some(timer) = self.click_timer.take() {
            host.clear_timeout(timer);
        }
        if !self.click_capture {
            host.add_click_capture();
            self.click_capture = true;
        }
        self.click_timer = Some(host.set_timeout(self.options.click_suppression_duration));
    }

    fn clear_click_capture<H: Host<Node = N>>(&mut self, host: &mut H) {
        if let Some(timer) = self.click_timer.take() {
            host.clear_timeout(timer);
        }
        if self.click_capture {
            host.remove_click_capture();
            self.click_capture = false;
        }
        self.click.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autoscroll::ScrollAxis;
    use crate::headless::{HeadlessHost, HeadlessNode, HostCall, NodeId};
    use crate::input::PointerType;
    use crate::options::AutoScrollOptions;
    use kurbo::{Rect, Size};

    #[derive(Debug, Default)]
    struct Recorder {
        log: Vec<(&'static str, DraggableData<NodeId>)>,
        downs: usize,
        veto_start: bool,
        veto_drag: bool,
    }

    impl Recorder {
        fn names(&self) -> Vec<&'static str> {
            self.log.iter().map(|(name, _)| *name).collect()
        }

        fn of(&self, kind: &str) -> Vec<DraggableData<NodeId>> {
            self.log
                .iter()
                .filter(|(name, _)| *name == kind)
                .map(|(_, data)| *data)
                .collect()
        }
    }

    impl DragHandler<NodeId> for Recorder {
        fn on_mouse_down(&mut self, _: &InputEvent<NodeId>) {
            self.downs += 1;
        }

        fn on_start(&mut self, _: &InputEvent<NodeId>, data: &DraggableData<NodeId>) -> Outcome {
            self.log.push(("start", *data));
            if self.veto_start { Outcome::Cancel } else { Outcome::Continue }
        }

        fn on_drag(&mut self, _: &InputEvent<NodeId>, data: &DraggableData<NodeId>) -> Outcome {
            self.log.push(("drag", *data));
            if self.veto_drag { Outcome::Cancel } else { Outcome::Continue }
        }

        fn on_stop(&mut self, _: &InputEvent<NodeId>, data: &DraggableData<NodeId>) -> Outcome {
            self.log.push(("stop", *data));
            Outcome::Continue
        }
    }

    struct Rig {
        host: HeadlessHost,
        node: NodeId,
        core: DraggableCore<NodeId>,
        rec: Recorder,
    }

    impl Rig {
        fn new(options: CoreOptions<NodeId>) -> Self {
            let mut host = HeadlessHost::new(Size::new(800.0, 600.0));
            let body = host.body_id();
            let node = host.insert(
                body,
                HeadlessNode::element("div").with_rect(Rect::new(0.0, 0.0, 50.0, 50.0)),
            );
            let mut core = DraggableCore::new(options);
            core.mount(node);
            Self {
                host,
                node,
                core,
                rec: Recorder::default(),
            }
        }

        fn at(&self, x: f64, y: f64) -> InputEvent<NodeId> {
            InputEvent::mouse(Some(self.node), Point::new(x, y))
        }

        fn down(&mut self, event: InputEvent<NodeId>) -> Effects {
            self.core.on_pointer_down(&mut self.host, &mut self.rec, &event)
        }

        fn mv(&mut self, event: InputEvent<NodeId>) -> Effects {
            self.core.on_pointer_move(&mut self.host, &mut self.rec, &event)
        }

        fn up(&mut self, event: InputEvent<NodeId>) -> Effects {
            self.core.on_pointer_up(&mut self.host, &mut self.rec, &event)
        }

        fn frames(&mut self) {
            for frame in self.host.take_frames() {
                self.core.on_frame(&mut self.host, &mut self.rec, frame);
            }
        }

        fn timers(&mut self, ms: u64) {
            for timer in self.host.advance(ms) {
                self.core.on_timer(&mut self.host, &mut self.rec, timer);
            }
        }
    }

    #[test]
    fn callbacks_arrive_in_order_with_consistent_deltas() {
        let mut rig = Rig::new(CoreOptions::default());
        rig.down(rig.at(0.0, 0.0));
        rig.mv(rig.at(3.0, 4.0));
        rig.mv(rig.at(10.0, 4.0));
        rig.up(rig.at(12.0, 6.0));

        assert_eq!(rig.rec.names(), ["start", "drag", "drag", "stop"]);
        let start = rig.rec.of("start")[0];
        assert_eq!(start.delta(), Vec2::ZERO);
        assert_eq!(start.position(), Point::ZERO);

        let mut last = start.position();
        for data in rig.rec.of("drag").into_iter().chain(rig.rec.of("stop")) {
            assert_eq!(data.last(), last);
            assert_eq!(data.delta(), data.position() - last);
            last = data.position();
        }
        assert_eq!(last, Point::new(12.0, 6.0));
    }

    #[test]
    fn listeners_and_user_select_are_paired() {
        let mut rig = Rig::new(CoreOptions::default());
        rig.down(rig.at(0.0, 0.0));
        assert_eq!(rig.host.listeners(EventFamily::Mouse), 1);
        assert!(rig.host.user_select_suppressed());

        rig.mv(rig.at(1.0, 1.0));
        rig.up(rig.at(1.0, 1.0));
        // A stray release after the drag changes nothing.
        rig.up(rig.at(1.0, 1.0));

        assert_eq!(rig.host.count(&HostCall::AttachListeners(EventFamily::Mouse)), 1);
        assert_eq!(rig.host.count(&HostCall::DetachListeners(EventFamily::Mouse)), 1);
        assert_eq!(rig.host.total_listeners(), 0);
        assert_eq!(rig.host.count(&HostCall::AddUserSelect), 1);
        assert_eq!(rig.host.count(&HostCall::RemoveUserSelect), 1);
        assert!(!rig.host.user_select_suppressed());
    }

    #[test]
    fn user_select_hack_can_be_disabled() {
        let mut rig = Rig::new(CoreOptions {
            enable_user_select_hack: false,
            ..CoreOptions::default()
        });
        rig.down(rig.at(0.0, 0.0));
        rig.up(rig.at(0.0, 0.0));
        assert_eq!(rig.host.count(&HostCall::AddUserSelect), 0);
    }

    #[test]
    fn grid_snaps_and_drops_sub_grid_moves() {
        let mut rig = Rig::new(CoreOptions::with_grid(5.0, 5.0));
        rig.down(rig.at(0.0, 0.0));
        rig.mv(rig.at(10.0, 4.0));
        rig.mv(rig.at(11.0, 6.0));

        let drags = rig.rec.of("drag");
        assert_eq!(drags.len(), 1);
        assert_eq!(drags[0].position(), Point::new(10.0, 5.0));
        assert_eq!(drags[0].delta(), Vec2::new(10.0, 5.0));
    }

    #[test]
    fn threshold_start_reports_full_displacement() {
        let mut rig = Rig::new(CoreOptions {
            drag_start_threshold: 10.0,
            ..CoreOptions::default()
        });
        rig.down(rig.at(0.0, 0.0));
        assert!(rig.core.is_pending());
        assert_eq!(rig.host.listeners(EventFamily::Mouse), 1);

        rig.mv(rig.at(5.0, 0.0));
        assert!(rig.rec.log.is_empty());

        rig.mv(rig.at(11.0, 0.0));
        assert_eq!(rig.rec.names(), ["start", "drag"]);
        let start = rig.rec.of("start")[0];
        assert_eq!(start.position(), Point::new(11.0, 0.0));
        assert_eq!(start.delta(), Vec2::new(11.0, 0.0));
        assert_eq!(rig.rec.of("drag")[0].delta(), Vec2::new(11.0, 0.0));

        // Still one set of listeners: the pending ones were kept.
        assert_eq!(rig.host.count(&HostCall::AttachListeners(EventFamily::Mouse)), 1);
    }

    #[test]
    fn release_before_threshold_is_silent() {
        let mut rig = Rig::new(CoreOptions {
            drag_start_threshold: 10.0,
            ..CoreOptions::default()
        });
        rig.down(rig.at(0.0, 0.0));
        rig.mv(rig.at(3.0, 0.0));
        rig.up(rig.at(3.0, 0.0));
        assert!(rig.rec.log.is_empty());
        assert_eq!(rig.host.total_listeners(), 0);
        assert!(!rig.core.is_pending());
    }

    #[test]
    fn delay_cancelled_by_movement_never_starts() {
        let mut rig = Rig::new(CoreOptions {
            drag_start_delay: 300,
            drag_start_delay_tolerance: 5.0,
            ..CoreOptions::default()
        });
        rig.down(rig.at(0.0, 0.0));
        assert_eq!(rig.host.pending_timers(), 1);

        rig.mv(rig.at(8.0, 0.0));
        assert_eq!(rig.host.pending_timers(), 0);
        assert_eq!(rig.host.total_listeners(), 0);

        rig.timers(1000);
        rig.mv(rig.at(9.0, 0.0));
        assert!(rig.rec.log.is_empty());
        assert!(!rig.core.is_dragging());
    }

    #[test]
    fn delay_starts_at_latest_pending_position() {
        let mut rig = Rig::new(CoreOptions {
            drag_start_delay: 300,
            ..CoreOptions::default()
        });
        rig.down(rig.at(0.0, 0.0));
        rig.mv(rig.at(2.0, 1.0));
        rig.timers(299);
        assert!(rig.rec.log.is_empty());

        rig.timers(1);
        assert_eq!(rig.rec.names(), ["start", "drag"]);
        assert_eq!(rig.rec.of("start")[0].position(), Point::new(2.0, 1.0));
        assert_eq!(rig.rec.of("drag")[0].delta(), Vec2::new(2.0, 1.0));
        assert!(rig.core.is_dragging());
    }

    #[test]
    fn start_veto_installs_nothing() {
        let mut rig = Rig::new(CoreOptions::default());
        rig.rec.veto_start = true;
        rig.down(rig.at(0.0, 0.0));
        rig.mv(rig.at(5.0, 5.0));
        rig.up(rig.at(5.0, 5.0));

        assert_eq!(rig.rec.names(), ["start"]);
        assert!(!rig.core.is_dragging());
        assert_eq!(rig.host.count(&HostCall::AttachListeners(EventFamily::Mouse)), 0);
        assert_eq!(rig.host.count(&HostCall::AddUserSelect), 0);
    }

    #[test]
    fn drag_veto_stops_at_last_committed_position() {
        let mut rig = Rig::new(CoreOptions::default());
        rig.down(rig.at(0.0, 0.0));
        rig.mv(rig.at(2.0, 2.0));
        rig.rec.veto_drag = true;
        rig.mv(rig.at(5.0, 5.0));

        assert_eq!(rig.rec.names(), ["start", "drag", "drag", "stop"]);
        let stop = rig.rec.of("stop")[0];
        assert_eq!(stop.position(), Point::new(2.0, 2.0));
        assert_eq!(stop.delta(), Vec2::ZERO);
        assert_eq!(rig.host.total_listeners(), 0);

        rig.mv(rig.at(9.0, 9.0));
        assert_eq!(rig.rec.log.len(), 4);
    }

    #[test]
    fn other_touches_are_ignored() {
        let mut rig = Rig::new(CoreOptions::default());
        let node = rig.node;
        let effects = rig.down(InputEvent::touch(Some(node), 1, Point::ZERO));
        assert_eq!(effects, Effects::PREVENT_DEFAULT);

        rig.mv(InputEvent::touch(Some(node), 2, Point::new(40.0, 40.0)));
        rig.mv(InputEvent::pointer(Some(node), 1, PointerType::Mouse, Point::new(40.0, 40.0)));
        assert_eq!(rig.rec.names(), ["start"]);

        rig.mv(InputEvent::touch(Some(node), 1, Point::new(4.0, 0.0)));
        rig.up(InputEvent::new(
            Some(node),
            InputKind::touch_end([input::Touch::new(2, Point::ZERO)]),
        ));
        assert!(rig.core.is_dragging());

        rig.up(InputEvent::new(
            Some(node),
            InputKind::touch_end([input::Touch::new(1, Point::new(4.0, 0.0))]),
        ));
        assert_eq!(rig.rec.names(), ["start", "drag", "stop"]);
        assert_eq!(rig.host.listeners(EventFamily::Touch), 0);
    }

    #[test]
    fn second_press_is_ignored_before_mouse_down() {
        let mut rig = Rig::new(CoreOptions::default());
        rig.down(rig.at(0.0, 0.0));
        rig.down(rig.at(20.0, 20.0));
        assert_eq!(rig.rec.downs, 1);
        assert_eq!(rig.rec.names(), ["start"]);
    }

    #[test]
    fn presses_are_filtered() {
        let mut rig = Rig::new(CoreOptions::default());
        let body = rig.host.body_id();
        rig.down(rig.at(0.0, 0.0).with_button(2));
        rig.down(InputEvent::mouse(Some(body), Point::ZERO));
        rig.down(InputEvent::mouse(None, Point::ZERO));
        assert_eq!(rig.rec.downs, 3);
        assert!(rig.rec.log.is_empty());

        let mut rig = Rig::new(CoreOptions {
            disabled: true,
            ..CoreOptions::default()
        });
        rig.down(rig.at(0.0, 0.0));
        assert!(rig.rec.log.is_empty());

        let mut rig = Rig::new(CoreOptions {
            allow_any_click: true,
            ..CoreOptions::default()
        });
        rig.down(rig.at(0.0, 0.0).with_button(1));
        assert_eq!(rig.rec.names(), ["start"]);
    }

    #[test]
    fn presses_on_a_detached_node_are_ignored() {
        let mut rig = Rig::new(CoreOptions::default());
        let node = rig.node;
        rig.host.disconnect(node);
        rig.down(rig.at(0.0, 0.0));
        assert_eq!(rig.rec.downs, 1);
        assert!(rig.rec.log.is_empty());
        assert!(rig.host.calls().is_empty());
    }

    #[test]
    fn handle_and_cancel_selectors() {
        let mut rig = Rig::new(CoreOptions {
            handle: Some(".grip".into()),
            cancel_interactive_elements: true,
            ..CoreOptions::default()
        });
        let node = rig.node;
        let grip = rig.host.insert(node, HeadlessNode::element("span").with_class("grip"));
        let icon = rig.host.insert(grip, HeadlessNode::element("i"));
        let button = rig.host.insert(grip, HeadlessNode::element("button"));

        rig.down(InputEvent::mouse(Some(node), Point::ZERO));
        rig.down(InputEvent::mouse(Some(button), Point::ZERO));
        assert!(rig.rec.log.is_empty());

        rig.down(InputEvent::mouse(Some(icon), Point::ZERO));
        assert_eq!(rig.rec.names(), ["start"]);
    }

    #[test]
    fn cancel_selector_matches_ancestors() {
        let mut rig = Rig::new(CoreOptions {
            cancel: Some(".no-drag".into()),
            ..CoreOptions::default()
        });
        let node = rig.node;
        let zone = rig.host.insert(node, HeadlessNode::element("div").with_class("no-drag"));
        let inner = rig.host.insert(zone, HeadlessNode::element("p"));
        rig.down(InputEvent::mouse(Some(inner), Point::ZERO));
        assert!(rig.rec.log.is_empty());
    }

    #[test]
    fn raf_mode_coalesces_and_flushes_on_stop() {
        let mut rig = Rig::new(CoreOptions {
            use_raf_drag: true,
            ..CoreOptions::default()
        });
        rig.down(rig.at(0.0, 0.0));
        rig.mv(rig.at(1.0, 0.0));
        rig.mv(rig.at(2.0, 0.0));
        rig.mv(rig.at(3.0, 0.0));
        assert_eq!(rig.rec.names(), ["start"]);
        assert_eq!(rig.host.pending_frames(), 1);

        rig.frames();
        assert_eq!(rig.rec.names(), ["start", "drag"]);
        assert_eq!(rig.rec.of("drag")[0].position(), Point::new(3.0, 0.0));

        rig.mv(rig.at(5.0, 0.0));
        rig.up(rig.at(6.0, 0.0));
        assert_eq!(rig.rec.names(), ["start", "drag", "drag", "stop"]);
        assert_eq!(rig.rec.of("drag")[1].position(), Point::new(5.0, 0.0));
        assert_eq!(rig.rec.of("stop")[0].position(), Point::new(6.0, 0.0));
        assert_eq!(rig.host.pending_frames(), 0);
    }

    #[test]
    fn unmount_mid_drag_forces_stop_and_releases_everything() {
        let mut rig = Rig::new(CoreOptions::default());
        let node = rig.node;
        rig.down(InputEvent::pointer(Some(node), 7, PointerType::Pen, Point::ZERO));
        assert_eq!(rig.host.pointer_captures(), &[(node, 7)]);
        rig.mv(InputEvent::pointer(Some(node), 7, PointerType::Pen, Point::new(5.0, 5.0)));

        rig.core.unmount(&mut rig.host, &mut rig.rec);
        assert_eq!(rig.rec.names(), ["start", "drag", "stop"]);
        assert_eq!(rig.rec.of("stop")[0].position(), Point::new(5.0, 5.0));
        assert!(rig.host.pointer_captures().is_empty());
        assert_eq!(rig.host.total_listeners(), 0);
        assert!(!rig.host.user_select_suppressed());
        assert_eq!(rig.core.owner_node(), None);

        rig.mv(InputEvent::pointer(Some(node), 7, PointerType::Pen, Point::new(9.0, 9.0)));
        assert_eq!(rig.rec.log.len(), 3);
    }

    #[test]
    fn unmount_while_pending_clears_timer_silently() {
        let mut rig = Rig::new(CoreOptions {
            drag_start_delay: 500,
            ..CoreOptions::default()
        });
        rig.down(rig.at(0.0, 0.0));
        rig.core.unmount(&mut rig.host, &mut rig.rec);
        assert_eq!(rig.host.pending_timers(), 0);
        assert!(rig.rec.log.is_empty());
    }

    #[test]
    fn click_after_drag_is_suppressed_once() {
        let mut rig = Rig::new(CoreOptions {
            enable_click_suppression: true,
            ..CoreOptions::default()
        });
        rig.down(rig.at(0.0, 0.0));
        rig.mv(rig.at(10.0, 0.0));
        rig.up(rig.at(10.0, 0.0));
        assert!(rig.host.click_capture_installed());

        let effects = rig.core.on_click(&mut rig.host);
        assert_eq!(effects, Effects::PREVENT_DEFAULT | Effects::STOP_PROPAGATION);
        assert!(!rig.host.click_capture_installed());
        assert_eq!(rig.host.pending_timers(), 0);
        assert_eq!(rig.core.on_click(&mut rig.host), Effects::empty());
    }

    #[test]
    fn click_capture_expires() {
        let mut rig = Rig::new(CoreOptions {
            enable_click_suppression: true,
            click_suppression_duration: 100,
            ..CoreOptions::default()
        });
        rig.down(rig.at(0.0, 0.0));
        rig.up(rig.at(4.0, 0.0));
        assert!(rig.host.click_capture_installed());

        rig.timers(100);
        assert!(!rig.host.click_capture_installed());
    }

    #[test]
    fn click_without_movement_is_not_suppressed() {
        let mut rig = Rig::new(CoreOptions {
            enable_click_suppression: true,
            ..CoreOptions::default()
        });
        rig.down(rig.at(3.0, 3.0));
        rig.up(rig.at(3.0, 3.0));
        assert!(!rig.host.click_capture_installed());
    }

    #[test]
    fn scale_divides_positions_once() {
        let mut rig = Rig::new(CoreOptions {
            scale: 2.0,
            drag_start_threshold: 10.0,
            ..CoreOptions::default()
        });
        rig.down(rig.at(0.0, 0.0));
        // 8 client px = 4 units, short of 10 / 2 = 5.
        rig.mv(rig.at(8.0, 0.0));
        assert!(rig.rec.log.is_empty());
        rig.mv(rig.at(10.0, 4.0));
        assert_eq!(rig.rec.of("drag")[0].position(), Point::new(5.0, 2.0));

        let core: DraggableCore<NodeId> = DraggableCore::new(CoreOptions {
            scale: 0.0,
            ..CoreOptions::default()
        });
        assert_eq!(core.scale(), 1.0);
    }

    #[test]
    fn positions_are_relative_to_the_offset_parent() {
        let mut rig = Rig::new(CoreOptions::default());
        let body = rig.host.body_id();
        let panel = rig.host.insert(
            body,
            HeadlessNode::element("div").with_rect(Rect::new(100.0, 50.0, 400.0, 350.0)),
        );
        let node = rig.host.insert(panel, HeadlessNode::element("div"));
        rig.host.set_scroll(panel, Vec2::new(0.0, 20.0));
        rig.core.mount(node);

        rig.down(InputEvent::mouse(Some(node), Point::new(110.0, 60.0)));
        assert_eq!(rig.rec.of("start")[0].position(), Point::new(10.0, 30.0));
        // The panel's rect is cached until the next frame.
        assert_eq!(rig.host.pending_frames(), 1);
    }

    #[test]
    fn auto_scroll_moves_container_and_reruns_the_drag() {
        let mut rig = Rig::new(CoreOptions {
            auto_scroll: AutoScrollOptions {
                enabled: true,
                ..AutoScrollOptions::default()
            },
            ..CoreOptions::default()
        });
        let body = rig.host.body_id();
        let list = rig.host.insert(
            body,
            HeadlessNode::element("div")
                .with_rect(Rect::new(0.0, 0.0, 200.0, 200.0))
                .with_scroll_size(Size::new(200.0, 1000.0))
                .with_overflow(ScrollAxis::Y),
        );
        let node = rig.host.insert(list, HeadlessNode::element("div"));
        rig.core.mount(node);

        rig.down(InputEvent::mouse(Some(node), Point::new(100.0, 100.0)));
        rig.mv(InputEvent::mouse(Some(node), Point::new(100.0, 190.0)));
        assert_eq!(rig.rec.of("drag").len(), 1);

        rig.frames();
        assert_eq!(rig.host.scroll_of(list), Vec2::new(0.0, 15.0));
        let drags = rig.rec.of("drag");
        assert_eq!(drags.len(), 2);
        assert_eq!(drags[1].delta(), Vec2::new(0.0, 15.0));

        rig.frames();
        assert_eq!(rig.host.scroll_of(list), Vec2::new(0.0, 30.0));

        // Leaving the edge zone ends the loop.
        rig.mv(InputEvent::mouse(Some(node), Point::new(100.0, 100.0)));
        rig.frames();
        rig.frames();
        assert_eq!(rig.host.scroll_of(list), Vec2::new(0.0, 30.0));
        assert_eq!(rig.host.pending_frames(), 0);
    }

    #[test]
    fn pointer_platforms_listen_for_pointer_events_only() {
        let mut rig = Rig::new(CoreOptions::default());
        assert_eq!(rig.core.start_listeners(&rig.host), ListenerFamilies::POINTER);
        rig.host.set_supports_pointer_events(false);
        assert_eq!(
            rig.core.start_listeners(&rig.host),
            ListenerFamilies::MOUSE | ListenerFamilies::TOUCH
        );
        assert_eq!(rig.core.touch_action(), "none");
    }

    #[test]
    fn touch_pointer_events_defer_to_touch_path_when_scrolling_allowed() {
        let mut rig = Rig::new(CoreOptions {
            allow_mobile_scroll: true,
            ..CoreOptions::default()
        });
        let node = rig.node;
        rig.down(InputEvent::pointer(Some(node), 3, PointerType::Touch, Point::ZERO));
        assert_eq!(rig.rec.downs, 0);
        let effects = rig.down(InputEvent::touch(Some(node), 3, Point::ZERO));
        assert_eq!(rig.rec.names(), ["start"]);
        assert_eq!(effects, Effects::PREVENT_DEFAULT);
    }
}
