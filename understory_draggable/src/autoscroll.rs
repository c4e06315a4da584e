// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge auto-scrolling while dragging.
//!
//! When the pointer comes within `threshold` pixels of a scroll container's
//! edge, that container is scrolled toward the edge. Speed grows linearly with
//! proximity and is rounded up, so even one pixel inside the zone scrolls:
//!
//! ```
//! use understory_draggable::autoscroll::edge_speed;
//!
//! // 40px zone, 20px/frame max, pointer 30px inside a 0..500 container.
//! assert_eq!(edge_speed(30.0, 0.0, 500.0, 40.0, 20.0), -5.0);
//! // Right at the far edge.
//! assert_eq!(edge_speed(500.0, 0.0, 500.0, 40.0, 20.0), 20.0);
//! // Outside the zone.
//! assert_eq!(edge_speed(250.0, 0.0, 500.0, 40.0, 20.0), 0.0);
//! ```
//!
//! Candidates are visited innermost first, then the window. The first
//! container that actually absorbs movement on an axis wins that axis for the
//! frame.

use kurbo::{Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::host::{Document, Layout, ScrollTarget};
use crate::options::AutoScrollOptions;

bitflags::bitflags! {
    /// Scroll axes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ScrollAxis: u8 {
        /// Horizontal scrolling.
        const X = 0b0000_0001;
        /// Vertical scrolling.
        const Y = 0b0000_0010;
    }
}

/// Signed per-frame scroll speed along one axis.
///
/// `start..end` is the container's extent on that axis. Returns zero when the
/// pointer is outside the extent or farther than `threshold` from both edges.
pub fn edge_speed(pointer: f64, start: f64, end: f64, threshold: f64, max_speed: f64) -> f64 {
    if threshold <= 0.0 || max_speed <= 0.0 || pointer < start || pointer > end {
        return 0.0;
    }
    let ramp = |distance: f64| (max_speed * (threshold - distance) / threshold).ceil().min(max_speed);
    let to_start = pointer - start;
    let to_end = end - pointer;
    if to_start < threshold && to_start <= to_end {
        -ramp(to_start)
    } else if to_end < threshold {
        ramp(to_end)
    } else {
        0.0
    }
}

/// Scroll velocity for a container rect, per enabled axis.
pub fn velocity_for(rect: Rect, pointer: Point, axis: ScrollAxis, threshold: f64, max_speed: f64) -> Vec2 {
    let x = if axis.contains(ScrollAxis::X) {
        edge_speed(pointer.x, rect.x0, rect.x1, threshold, max_speed)
    } else {
        0.0
    };
    let y = if axis.contains(ScrollAxis::Y) {
        edge_speed(pointer.y, rect.y0, rect.y1, threshold, max_speed)
    } else {
        0.0
    };
    Vec2::new(x, y)
}

/// Containers to consider, innermost first, window last.
pub fn candidates<L: Layout + ?Sized>(
    layout: &L,
    node: L::Node,
    options: &AutoScrollOptions<L::Node>,
) -> SmallVec<[ScrollTarget<L::Node>; 4]> {
    let mut out = SmallVec::new();
    if let Some(container) = options.container {
        out.push(ScrollTarget::Element(container));
    } else {
        let body = layout.body();
        let mut cursor = layout.parent(node);
        while let Some(n) = cursor {
            if Some(n) == body {
                break;
            }
            if layout.overflow_axes(n).intersects(options.axis) {
                out.push(ScrollTarget::Element(n));
            }
            cursor = layout.parent(n);
        }
    }
    if options.include_window {
        out.push(ScrollTarget::Window);
    }
    out
}

/// Result of one auto-scroll frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScrollStep {
    /// Some container moved.
    pub scrolled: bool,
    /// The pointer is inside some container's edge zone, whether or not it
    /// could still scroll.
    pub near_edge: bool,
}

/// Run one auto-scroll frame for a pointer at `client`.
pub fn step<D: Document + ?Sized>(
    doc: &mut D,
    node: D::Node,
    client: Point,
    options: &AutoScrollOptions<D::Node>,
) -> ScrollStep {
    let mut result = ScrollStep::default();
    if !options.enabled {
        return result;
    }
    let mut remaining = options.axis;
    for target in candidates(&*doc, node, options) {
        if remaining.is_empty() {
            break;
        }
        let (rect, axes) = match target {
            ScrollTarget::Element(n) => (doc.bounding_client_rect(n), doc.overflow_axes(n) & remaining),
            ScrollTarget::Window => (doc.viewport_rect(), remaining),
        };
        let velocity = velocity_for(rect, client, axes, options.threshold, options.max_speed);
        if velocity == Vec2::ZERO {
            continue;
        }
        result.near_edge = true;
        let moved = doc.scroll_by(target, velocity);
        if moved.x != 0.0 {
            remaining.remove(ScrollAxis::X);
            result.scrolled = true;
        }
        if moved.y != 0.0 {
            remaining.remove(ScrollAxis::Y);
            result.scrolled = true;
        }
    }
    if result.scrolled {
        tracing::trace!(?client, "auto-scrolled");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessHost, HeadlessNode};
    use kurbo::Size;

    #[test]
    fn speed_ramps_and_rounds_up() {
        // One pixel into the zone still scrolls.
        assert_eq!(edge_speed(39.5, 0.0, 500.0, 40.0, 20.0), -1.0);
        assert_eq!(edge_speed(0.0, 0.0, 500.0, 40.0, 20.0), -20.0);
        assert_eq!(edge_speed(480.0, 0.0, 500.0, 40.0, 20.0), 10.0);
        assert_eq!(edge_speed(-1.0, 0.0, 500.0, 40.0, 20.0), 0.0);
        assert_eq!(edge_speed(10.0, 0.0, 500.0, 0.0, 20.0), 0.0);
    }

    #[test]
    fn velocity_respects_axis() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let v = velocity_for(rect, Point::new(95.0, 95.0), ScrollAxis::Y, 10.0, 10.0);
        assert_eq!(v, Vec2::new(0.0, 5.0));
    }

    fn scrolling_page() -> (HeadlessHost, crate::headless::NodeId, crate::headless::NodeId) {
        let mut host = HeadlessHost::new(Size::new(800.0, 600.0));
        let body = host.body_id();
        let list = host.insert(
            body,
            HeadlessNode::element("div")
                .with_rect(Rect::new(0.0, 0.0, 200.0, 200.0))
                .with_client_size(Size::new(200.0, 200.0))
                .with_scroll_size(Size::new(200.0, 1000.0))
                .with_overflow(ScrollAxis::Y),
        );
        let item = host.insert(
            list,
            HeadlessNode::element("div").with_rect(Rect::new(0.0, 0.0, 20.0, 20.0)),
        );
        host.set_scroll_size(body, Size::new(800.0, 2000.0));
        (host, list, item)
    }

    #[test]
    fn candidates_innermost_first_then_window() {
        let (host, list, item) = scrolling_page();
        let options = AutoScrollOptions {
            enabled: true,
            ..AutoScrollOptions::default()
        };
        let found = candidates(&host, item, &options);
        assert_eq!(
            found.as_slice(),
            &[ScrollTarget::Element(list), ScrollTarget::Window]
        );
    }

    #[test]
    fn inner_container_wins_the_axis() {
        let (mut host, list, item) = scrolling_page();
        let options = AutoScrollOptions {
            enabled: true,
            threshold: 40.0,
            max_speed: 20.0,
            ..AutoScrollOptions::default()
        };
        // Near the bottom of the list, which is also far from the window edge.
        let result = step(&mut host, item, Point::new(100.0, 190.0), &options);
        assert!(result.scrolled && result.near_edge);
        assert_eq!(host.scroll_of(list), Vec2::new(0.0, 15.0));
        assert_eq!(host.window_scroll(), Vec2::ZERO);
    }

    #[test]
    fn exhausted_container_falls_through_to_window() {
        let (mut host, list, item) = scrolling_page();
        host.set_scroll(list, Vec2::new(0.0, 800.0));
        let options = AutoScrollOptions {
            enabled: true,
            ..AutoScrollOptions::default()
        };
        // Bottom of the viewport is also the bottom edge of the list here.
        host.set_rect(list, Rect::new(0.0, 400.0, 200.0, 600.0));
        let result = step(&mut host, item, Point::new(100.0, 590.0), &options);
        assert!(result.scrolled);
        assert_eq!(host.scroll_of(list), Vec2::new(0.0, 800.0));
        assert_eq!(host.window_scroll(), Vec2::new(0.0, 15.0));
    }

    #[test]
    fn disabled_does_nothing() {
        let (mut host, _, item) = scrolling_page();
        let options = AutoScrollOptions::default();
        assert_eq!(
            step(&mut host, item, Point::new(100.0, 199.0), &options),
            ScrollStep::default()
        );
    }
}
