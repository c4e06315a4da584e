// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory host.
//!
//! [`HeadlessHost`] implements every host trait over a small node tree whose
//! layout is set explicitly. It records each side effect the engine asks for,
//! reference-counts the shared document state, and runs a manual clock for
//! frames and timers. Tests and demos drive the engine through it; it is also
//! a reference for what a real host has to provide.
//!
//! ```
//! use kurbo::{Rect, Size};
//! use understory_draggable::headless::{HeadlessHost, HeadlessNode};
//! use understory_draggable::host::Layout;
//!
//! let mut host = HeadlessHost::new(Size::new(800.0, 600.0));
//! let card = host.insert(
//!     host.body_id(),
//!     HeadlessNode::element("div")
//!         .with_class("card")
//!         .with_rect(Rect::new(10.0, 10.0, 110.0, 60.0)),
//! );
//! assert_eq!(host.query_selector("div.card"), Some(card));
//! assert_eq!(host.client_size(card), Size::new(100.0, 50.0));
//! ```
//!
//! Selectors support comma-separated lists of compound selectors made of an
//! optional tag (or `*`), `.class` and `[attribute]` parts. Combinators are
//! not supported. Text nodes carry a tag of `#text` and may have classes of
//! their own, so a class selector can find one; `*` matches elements only.

use kurbo::{Point, Rect, Size, Vec2};

use crate::autoscroll::ScrollAxis;
use crate::host::{BoxStyle, Document, FrameId, Layout, ScrollTarget, Scheduler, TimerId};
use crate::input::EventFamily;

/// Handle to a node in a [`HeadlessHost`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Index of the node in insertion order.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Description of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessNode {
    /// Tag name, lower case.
    pub tag: String,
    /// Class list.
    pub classes: Vec<String>,
    /// Attribute names present on the node.
    pub attributes: Vec<String>,
    /// `false` for text and comment nodes.
    pub element: bool,
    /// Border-box rect in client coordinates.
    pub rect: Rect,
    /// Client size; the rect's size when unset.
    pub client_size: Option<Size>,
    /// `offsetLeft` / `offsetTop`.
    pub offset: Point,
    /// Box-model edges.
    pub style: BoxStyle,
    /// Scroll position.
    pub scroll: Vec2,
    /// Scrollable content size; the client size when unset.
    pub scroll_size: Option<Size>,
    /// Axes on which overflow is allowed to scroll.
    pub overflow: ScrollAxis,
    parent: Option<NodeId>,
    offset_parent: Option<NodeId>,
    connected: bool,
}

impl HeadlessNode {
    /// An element with the given tag.
    pub fn element(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: Vec::new(),
            element: true,
            rect: Rect::ZERO,
            client_size: None,
            offset: Point::ZERO,
            style: BoxStyle::default(),
            scroll: Vec2::ZERO,
            scroll_size: None,
            overflow: ScrollAxis::empty(),
            parent: None,
            offset_parent: None,
            connected: true,
        }
    }

    /// A text node.
    pub fn text() -> Self {
        Self {
            element: false,
            ..Self::element("#text")
        }
    }

    /// Add a class.
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_owned());
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: &str) -> Self {
        self.attributes.push(name.to_owned());
        self
    }

    /// Set the bounding rect.
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Set the client size.
    pub fn with_client_size(mut self, size: Size) -> Self {
        self.client_size = Some(size);
        self
    }

    /// Set `offsetLeft` / `offsetTop`.
    pub fn with_offset(mut self, offset: Point) -> Self {
        self.offset = offset;
        self
    }

    /// Set border, padding and margin.
    pub fn with_style(mut self, style: BoxStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the scrollable content size.
    pub fn with_scroll_size(mut self, size: Size) -> Self {
        self.scroll_size = Some(size);
        self
    }

    /// Allow scrolling on `axes`.
    pub fn with_overflow(mut self, axes: ScrollAxis) -> Self {
        self.overflow = axes;
        self
    }

    fn client(&self) -> Size {
        self.client_size.unwrap_or_else(|| self.rect.size())
    }

    fn max_scroll(&self) -> Vec2 {
        let content = self.scroll_size.unwrap_or_else(|| self.client());
        let client = self.client();
        Vec2::new(
            (content.width - client.width).max(0.0),
            (content.height - client.height).max(0.0),
        )
    }

    fn matches_compound(&self, selector: &str) -> bool {
        let is_part_start = |c: char| c == '.' || c == '[';
        let tag_end = selector.find(is_part_start).unwrap_or(selector.len());
        let tag = &selector[..tag_end];
        if tag == "*" {
            if !self.element {
                return false;
            }
        } else if !tag.is_empty() && !tag.eq_ignore_ascii_case(&self.tag) {
            return false;
        }
        let mut rest = &selector[tag_end..];
        while !rest.is_empty() {
            if let Some(r) = rest.strip_prefix('.') {
                let end = r.find(is_part_start).unwrap_or(r.len());
                if !self.classes.iter().any(|c| c == &r[..end]) {
                    return false;
                }
                rest = &r[end..];
            } else if let Some(r) = rest.strip_prefix('[') {
                let Some(end) = r.find(']') else {
                    return false;
                };
                if !self.attributes.iter().any(|a| a == &r[..end]) {
                    return false;
                }
                rest = &r[end + 1..];
            } else {
                return false;
            }
        }
        true
    }

    fn matches(&self, selector: &str) -> bool {
        selector
            .split(',')
            .map(str::trim)
            .any(|s| !s.is_empty() && self.matches_compound(s))
    }
}

/// A side effect requested from a [`HeadlessHost`].
#[derive(Clone, Debug, PartialEq)]
pub enum HostCall {
    /// [`Document::attach_listeners`].
    AttachListeners(EventFamily),
    /// [`Document::detach_listeners`].
    DetachListeners(EventFamily),
    /// [`Document::add_user_select_style`].
    AddUserSelect,
    /// [`Document::remove_user_select_style`].
    RemoveUserSelect,
    /// [`Document::add_click_capture`].
    AddClickCapture,
    /// [`Document::remove_click_capture`].
    RemoveClickCapture,
    /// [`Document::set_pointer_capture`].
    SetPointerCapture(NodeId, i32),
    /// [`Document::release_pointer_capture`].
    ReleasePointerCapture(NodeId, i32),
    /// [`Document::scroll_by`], with the distance actually scrolled.
    ScrollBy(ScrollTarget<NodeId>, Vec2),
    /// [`Scheduler::request_frame`].
    RequestFrame(FrameId),
    /// [`Scheduler::cancel_frame`].
    CancelFrame(FrameId),
    /// [`Scheduler::set_timeout`].
    SetTimeout(TimerId, u64),
    /// [`Scheduler::clear_timeout`].
    ClearTimeout(TimerId),
}

/// An in-memory document, layout and clock.
#[derive(Clone, Debug)]
pub struct HeadlessHost {
    nodes: Vec<HeadlessNode>,
    viewport: Size,
    window_scroll: Vec2,
    pointer_events: bool,
    listeners: Vec<EventFamily>,
    user_select: u32,
    click_capture: u32,
    pointer_captures: Vec<(NodeId, i32)>,
    calls: Vec<HostCall>,
    now: u64,
    next_handle: u64,
    frames: Vec<FrameId>,
    timers: Vec<(TimerId, u64)>,
}

impl HeadlessHost {
    /// A document with an empty body filling a viewport of `viewport`.
    pub fn new(viewport: Size) -> Self {
        let body = HeadlessNode::element("body").with_rect(Rect::from_origin_size(Point::ZERO, viewport));
        Self {
            nodes: vec![body],
            viewport,
            window_scroll: Vec2::ZERO,
            pointer_events: true,
            listeners: Vec::new(),
            user_select: 0,
            click_capture: 0,
            pointer_captures: Vec::new(),
            calls: Vec::new(),
            now: 0,
            next_handle: 1,
            frames: Vec::new(),
            timers: Vec::new(),
        }
    }

    /// The body node.
    pub const fn body_id(&self) -> NodeId {
        NodeId(0)
    }

    /// Append `node` as the last child of `parent`.
    pub fn insert(&mut self, parent: NodeId, mut node: HeadlessNode) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        node.parent = Some(parent);
        self.nodes.push(node);
        id
    }

    /// The node description.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this host.
    pub fn node(&self, id: NodeId) -> &HeadlessNode {
        &self.nodes[id.index()]
    }

    /// Mutable node description.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this host.
    pub fn node_mut(&mut self, id: NodeId) -> &mut HeadlessNode {
        &mut self.nodes[id.index()]
    }

    /// Move a node's bounding rect.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        self.node_mut(id).rect = rect;
    }

    /// Change a node's client size.
    pub fn set_client_size(&mut self, id: NodeId, size: Size) {
        self.node_mut(id).client_size = Some(size);
    }

    /// Change a node's scrollable content size.
    pub fn set_scroll_size(&mut self, id: NodeId, size: Size) {
        self.node_mut(id).scroll_size = Some(size);
    }

    /// Set a node's scroll position directly.
    pub fn set_scroll(&mut self, id: NodeId, scroll: Vec2) {
        self.node_mut(id).scroll = scroll;
    }

    /// A node's scroll position.
    pub fn scroll_of(&self, id: NodeId) -> Vec2 {
        self.node(id).scroll
    }

    /// Override a node's offset parent (defaults to its parent).
    pub fn set_offset_parent(&mut self, id: NodeId, offset_parent: Option<NodeId>) {
        self.node_mut(id).offset_parent = offset_parent;
    }

    /// Mark a node as detached from the document. Descendants keep their flag.
    pub fn disconnect(&mut self, id: NodeId) {
        self.node_mut(id).connected = false;
    }

    /// Window scroll position.
    pub fn window_scroll(&self) -> Vec2 {
        self.window_scroll
    }

    /// Toggle pointer event support.
    pub fn set_supports_pointer_events(&mut self, supported: bool) {
        self.pointer_events = supported;
    }

    /// Every side effect requested so far.
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Forget recorded side effects.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// How many times `call` was recorded.
    pub fn count(&self, call: &HostCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    /// Number of listener sets currently attached for `family`.
    pub fn listeners(&self, family: EventFamily) -> usize {
        self.listeners.iter().filter(|f| **f == family).count()
    }

    /// Listener sets currently attached, across all families.
    pub fn total_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// `true` while at least one user-select installation is active.
    pub fn user_select_suppressed(&self) -> bool {
        self.user_select > 0
    }

    /// `true` while at least one capture-phase click listener is installed.
    pub fn click_capture_installed(&self) -> bool {
        self.click_capture > 0
    }

    /// Active pointer captures.
    pub fn pointer_captures(&self) -> &[(NodeId, i32)] {
        &self.pointer_captures
    }

    /// Drain the frames requested since the last call, oldest first.
    pub fn take_frames(&mut self) -> Vec<FrameId> {
        core::mem::take(&mut self.frames)
    }

    /// Number of frames waiting to be delivered.
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Number of timers waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Advance the clock, returning the timers that fired, earliest first.
    pub fn advance(&mut self, ms: u64) -> Vec<TimerId> {
        self.now += ms;
        let now = self.now;
        let mut due: Vec<(TimerId, u64)> = Vec::new();
        self.timers.retain(|&(id, deadline)| {
            if deadline <= now {
                due.push((id, deadline));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(id, deadline)| (deadline, id.0));
        due.into_iter().map(|(id, _)| id).collect()
    }

    fn next_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn get(&self, id: NodeId) -> Option<&HeadlessNode> {
        self.nodes.get(id.index())
    }
}

impl Layout for HeadlessHost {
    type Node = NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|n| n.parent)
    }

    fn offset_parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|n| n.offset_parent.or(n.parent))
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body_id())
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|n| n.element)
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(|n| n.connected)
    }

    fn matches_selector(&self, node: NodeId, selector: &str) -> bool {
        self.get(node).is_some_and(|n| n.matches(selector))
    }

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.connected && n.matches(selector))
            .and_then(|i| u32::try_from(i).ok())
            .map(NodeId)
    }

    fn bounding_client_rect(&self, node: NodeId) -> Rect {
        self.get(node).map_or(Rect::ZERO, |n| n.rect)
    }

    fn client_size(&self, node: NodeId) -> Size {
        self.get(node).map_or(Size::ZERO, HeadlessNode::client)
    }

    fn offset_position(&self, node: NodeId) -> Point {
        self.get(node).map_or(Point::ZERO, |n| n.offset)
    }

    fn box_style(&self, node: NodeId) -> BoxStyle {
        self.get(node).map(|n| n.style).unwrap_or_default()
    }

    fn scroll_offset(&self, node: NodeId) -> Vec2 {
        self.get(node).map_or(Vec2::ZERO, |n| n.scroll)
    }

    fn overflow_axes(&self, node: NodeId) -> ScrollAxis {
        let Some(n) = self.get(node) else {
            return ScrollAxis::empty();
        };
        let max = n.max_scroll();
        let mut axes = ScrollAxis::empty();
        if max.x > 0.0 {
            axes |= ScrollAxis::X;
        }
        if max.y > 0.0 {
            axes |= ScrollAxis::Y;
        }
        axes & n.overflow
    }

    fn viewport_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.viewport)
    }

    fn supports_pointer_events(&self) -> bool {
        self.pointer_events
    }
}

impl Document for HeadlessHost {
    fn attach_listeners(&mut self, family: EventFamily) {
        self.listeners.push(family);
        self.calls.push(HostCall::AttachListeners(family));
    }

    fn detach_listeners(&mut self, family: EventFamily) {
        if let Some(i) = self.listeners.iter().position(|f| *f == family) {
            self.listeners.swap_remove(i);
        }
        self.calls.push(HostCall::DetachListeners(family));
    }

    fn add_user_select_style(&mut self) {
        self.user_select += 1;
        self.calls.push(HostCall::AddUserSelect);
    }

    fn remove_user_select_style(&mut self) {
        self.user_select = self.user_select.saturating_sub(1);
        self.calls.push(HostCall::RemoveUserSelect);
    }

    fn add_click_capture(&mut self) {
        self.click_capture += 1;
        self.calls.push(HostCall::AddClickCapture);
    }

    fn remove_click_capture(&mut self) {
        self.click_capture = self.click_capture.saturating_sub(1);
        self.calls.push(HostCall::RemoveClickCapture);
    }

    fn set_pointer_capture(&mut self, node: NodeId, pointer_id: i32) {
        self.pointer_captures.push((node, pointer_id));
        self.calls.push(HostCall::SetPointerCapture(node, pointer_id));
    }

    fn release_pointer_capture(&mut self, node: NodeId, pointer_id: i32) {
        self.pointer_captures.retain(|c| *c != (node, pointer_id));
        self.calls.push(HostCall::ReleasePointerCapture(node, pointer_id));
    }

    fn scroll_by(&mut self, target: ScrollTarget<NodeId>, delta: Vec2) -> Vec2 {
        let (current, max) = match target {
            ScrollTarget::Element(id) => match self.get(id) {
                Some(n) => (n.scroll, n.max_scroll()),
                None => return Vec2::ZERO,
            },
            ScrollTarget::Window => {
                let body = &self.nodes[0];
                let content = body.scroll_size.unwrap_or(self.viewport);
                let max = Vec2::new(
                    (content.width - self.viewport.width).max(0.0),
                    (content.height - self.viewport.height).max(0.0),
                );
                (self.window_scroll, max)
            }
        };
        let next = Vec2::new(
            (current.x + delta.x).clamp(0.0, max.x),
            (current.y + delta.y).clamp(0.0, max.y),
        );
        match target {
            ScrollTarget::Element(id) => self.node_mut(id).scroll = next,
            ScrollTarget::Window => self.window_scroll = next,
        }
        let moved = next - current;
        self.calls.push(HostCall::ScrollBy(target, moved));
        moved
    }
}

impl Scheduler for HeadlessHost {
    fn now(&self) -> u64 {
        self.now
    }

    fn request_frame(&mut self) -> FrameId {
        let id = FrameId(self.next_handle());
        self.frames.push(id);
        self.calls.push(HostCall::RequestFrame(id));
        id
    }

    fn cancel_frame(&mut self, frame: FrameId) {
        self.frames.retain(|f| *f != frame);
        self.calls.push(HostCall::CancelFrame(frame));
    }

    fn set_timeout(&mut self, delay_ms: u64) -> TimerId {
        let id = TimerId(self.next_handle());
        self.timers.push((id, self.now + delay_ms));
        self.calls.push(HostCall::SetTimeout(id, delay_ms));
        id
    }

    fn clear_timeout(&mut self, timer: TimerId) {
        self.timers.retain(|(id, _)| *id != timer);
        self.calls.push(HostCall::ClearTimeout(timer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors() {
        let mut host = HeadlessHost::new(Size::new(100.0, 100.0));
        let body = host.body_id();
        let input = host.insert(
            body,
            HeadlessNode::element("input").with_class("field").with_attribute("disabled"),
        );
        assert!(host.matches_selector(input, "input"));
        assert!(host.matches_selector(input, "button, input.field"));
        assert!(host.matches_selector(input, "[disabled]"));
        assert!(host.matches_selector(input, "*.field[disabled]"));
        assert!(!host.matches_selector(input, "input.other"));
        assert!(!host.matches_selector(input, "[contenteditable]"));
        assert_eq!(host.query_selector(".field"), Some(input));
        assert_eq!(host.query_selector("body"), Some(body));
    }

    #[test]
    fn text_nodes_match_by_class_but_not_universally() {
        let mut host = HeadlessHost::new(Size::new(100.0, 100.0));
        let body = host.body_id();
        let label = host.insert(body, HeadlessNode::text().with_class("label"));
        assert!(host.matches_selector(label, ".label"));
        assert!(!host.matches_selector(label, "*"));
        assert!(!host.matches_selector(label, "*.label"));
        assert_eq!(host.query_selector(".label"), Some(label));
        assert!(!host.is_element(label));
    }

    #[test]
    fn overflow_requires_content() {
        let mut host = HeadlessHost::new(Size::new(100.0, 100.0));
        let body = host.body_id();
        let pane = host.insert(
            body,
            HeadlessNode::element("div")
                .with_rect(Rect::new(0.0, 0.0, 50.0, 50.0))
                .with_overflow(ScrollAxis::all()),
        );
        assert_eq!(host.overflow_axes(pane), ScrollAxis::empty());
        host.set_scroll_size(pane, Size::new(50.0, 500.0));
        assert_eq!(host.overflow_axes(pane), ScrollAxis::Y);
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let mut host = HeadlessHost::new(Size::new(100.0, 100.0));
        let body = host.body_id();
        let pane = host.insert(
            body,
            HeadlessNode::element("div")
                .with_rect(Rect::new(0.0, 0.0, 50.0, 50.0))
                .with_scroll_size(Size::new(50.0, 80.0)),
        );
        assert_eq!(host.scroll_by(ScrollTarget::Element(pane), Vec2::new(5.0, 20.0)), Vec2::new(0.0, 20.0));
        assert_eq!(host.scroll_by(ScrollTarget::Element(pane), Vec2::new(0.0, 20.0)), Vec2::new(0.0, 10.0));
        assert_eq!(host.scroll_by(ScrollTarget::Window, Vec2::new(0.0, 20.0)), Vec2::ZERO);
    }

    #[test]
    fn timers_fire_in_deadline_order() {
        let mut host = HeadlessHost::new(Size::new(100.0, 100.0));
        let late = host.set_timeout(300);
        let early = host.set_timeout(100);
        let cleared = host.set_timeout(50);
        host.clear_timeout(cleared);

        assert!(host.advance(99).is_empty());
        assert_eq!(host.advance(150), vec![early]);
        assert_eq!(host.pending_timers(), 1);
        assert_eq!(host.advance(51), vec![late]);
        assert_eq!(host.now(), 300);
    }

    #[test]
    fn ref_counts_shared_document_state() {
        let mut host = HeadlessHost::new(Size::new(100.0, 100.0));
        host.add_user_select_style();
        host.add_user_select_style();
        host.remove_user_select_style();
        assert!(host.user_select_suppressed());
        host.remove_user_select_style();
        assert!(!host.user_select_suppressed());
        assert_eq!(host.count(&HostCall::AddUserSelect), 2);
        host.clear_calls();
        assert!(host.calls().is_empty());
    }

    #[test]
    fn offset_parent_override_and_disconnect() {
        let mut host = HeadlessHost::new(Size::new(100.0, 100.0));
        let body = host.body_id();
        let outer = host.insert(body, HeadlessNode::element("div").with_class("zone"));
        let inner = host.insert(outer, HeadlessNode::element("span").with_class("zone"));
        assert_eq!(host.offset_parent(inner), Some(outer));
        host.set_offset_parent(inner, Some(body));
        assert_eq!(host.offset_parent(inner), Some(body));

        host.disconnect(outer);
        assert!(!host.is_connected(outer));
        assert_eq!(host.query_selector(".zone"), Some(inner));
    }
}
