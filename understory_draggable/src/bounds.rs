// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Movement bounds: specification, resolution to numbers, and clamping.
//!
//! Bounds are expressed in the same coordinate space as the draggable's
//! position (its translation). Element-derived bounds keep the dragged node's
//! margin box inside the bounding element's padding box:
//!
//! ```text
//! left   = -node.offsetLeft + bound.paddingLeft + node.marginLeft
//! top    = -node.offsetTop  + bound.paddingTop  + node.marginTop
//! right  = innerWidth(bound)  - outerWidth(node)  - node.offsetLeft
//!          + bound.paddingRight  - node.marginRight
//! bottom = innerHeight(bound) - outerHeight(node) - node.offsetTop
//!          + bound.paddingBottom - node.marginBottom
//! ```
//!
//! Clamping carries *slack*: movement denied by a bound is remembered and fed
//! back in on the next move, so the node only comes off the edge once the
//! pointer has come back past the point where it hit it.
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_draggable::bounds::{clamp_with_slack, BoundsRect};
//!
//! let bounds = BoundsRect::new(0.0, 0.0, 100.0, 100.0);
//! let (pos, slack) = clamp_with_slack(&bounds, Point::new(130.0, 50.0), Vec2::ZERO);
//! assert_eq!(pos, Point::new(100.0, 50.0));
//! assert_eq!(slack, Vec2::new(30.0, 0.0));
//! ```

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Size, Vec2};

use crate::error::DraggableError;
use crate::geometry::{inner_height, inner_width, outer_height, outer_width};
use crate::host::Layout;

/// Numeric bounds. Missing edges leave that side unconstrained.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BoundsRect {
    /// Minimum x.
    pub left: Option<f64>,
    /// Minimum y.
    pub top: Option<f64>,
    /// Maximum x.
    pub right: Option<f64>,
    /// Maximum y.
    pub bottom: Option<f64>,
}

impl BoundsRect {
    /// Bounds with all four edges set.
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left: Some(left),
            top: Some(top),
            right: Some(right),
            bottom: Some(bottom),
        }
    }

    /// Clamp `pos` into the bounds.
    ///
    /// Right and bottom are applied before left and top, so when the bounds
    /// are inverted the left/top edge wins.
    pub fn clamp(&self, pos: Point) -> Point {
        let mut x = pos.x;
        let mut y = pos.y;
        if let Some(right) = self.right {
            x = x.min(right);
        }
        if let Some(bottom) = self.bottom {
            y = y.min(bottom);
        }
        if let Some(left) = self.left {
            x = x.max(left);
        }
        if let Some(top) = self.top {
            y = y.max(top);
        }
        Point::new(x, y)
    }

    /// `true` if `pos` is inside on every constrained side.
    pub fn contains(&self, pos: Point) -> bool {
        self.clamp(pos) == pos
    }
}

/// Where a draggable may move.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Bounds {
    /// Anywhere.
    #[default]
    Unbounded,
    /// Fixed numeric bounds.
    Rect(BoundsRect),
    /// The dragged node's parent.
    Parent,
    /// The document body.
    Body,
    /// The first element matching a selector.
    Selector(String),
}

impl Bounds {
    /// Bounds from a selector.
    pub fn selector(selector: impl Into<String>) -> Self {
        Self::Selector(selector.into())
    }
}

fn bound_node<L: Layout + ?Sized>(
    layout: &L,
    node: L::Node,
    bounds: &Bounds,
) -> Result<Option<L::Node>, DraggableError> {
    match bounds {
        Bounds::Unbounded | Bounds::Rect(_) => Ok(None),
        Bounds::Parent => layout.parent(node).map(Some).ok_or(DraggableError::NoParent),
        Bounds::Body => layout.body().map(Some).ok_or(DraggableError::NoBody),
        Bounds::Selector(selector) => {
            let found = layout
                .query_selector(selector)
                .ok_or_else(|| DraggableError::BoundsSelectorNotFound(selector.clone()))?;
            if !layout.is_element(found) {
                return Err(DraggableError::BoundsNotElement(selector.clone()));
            }
            Ok(Some(found))
        }
    }
}

/// Numeric bounds keeping `node` inside `bound`.
pub fn measure_bounds<L: Layout + ?Sized>(layout: &L, node: L::Node, bound: L::Node) -> BoundsRect {
    let node_style = layout.box_style(node);
    let bound_style = layout.box_style(bound);
    let offset = layout.offset_position(node);
    BoundsRect {
        left: Some(-offset.x + bound_style.padding.x0 + node_style.margin.x0),
        top: Some(-offset.y + bound_style.padding.y0 + node_style.margin.y0),
        right: Some(
            inner_width(layout, bound) - outer_width(layout, node) - offset.x
                + bound_style.padding.x1
                - node_style.margin.x1,
        ),
        bottom: Some(
            inner_height(layout, bound) - outer_height(layout, node) - offset.y
                + bound_style.padding.y1
                - node_style.margin.y1,
        ),
    }
}

/// Resolve bounds to numbers, measuring the layout when they are element-derived.
///
/// Returns `Ok(None)` for [`Bounds::Unbounded`].
pub fn resolve_bounds<L: Layout + ?Sized>(
    layout: &L,
    node: L::Node,
    bounds: &Bounds,
) -> Result<Option<BoundsRect>, DraggableError> {
    if let Bounds::Rect(rect) = bounds {
        return Ok(Some(*rect));
    }
    Ok(bound_node(layout, node, bounds)?.map(|bound| measure_bounds(layout, node, bound)))
}

#[derive(Clone, Debug)]
struct CacheKey<N> {
    bounds: Bounds,
    node: N,
    bound: N,
    node_size: Size,
    bound_size: Size,
}

/// Memoized element-derived bounds.
///
/// Measuring bounds reads computed styles, which is too slow to do on every
/// move. The cached value is reused while the bounds specification, both
/// nodes and both nodes' client sizes are unchanged.
#[derive(Clone, Debug)]
pub struct BoundsCache<N> {
    key: Option<CacheKey<N>>,
    value: Option<BoundsRect>,
}

impl<N> Default for BoundsCache<N> {
    fn default() -> Self {
        Self {
            key: None,
            value: None,
        }
    }
}

impl<N: Copy + Eq + Hash + Debug> BoundsCache<N> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `bounds` for `node`, reusing the previous measurement if
    /// nothing it depends on has changed.
    pub fn resolve<L: Layout<Node = N> + ?Sized>(
        &mut self,
        layout: &L,
        node: N,
        bounds: &Bounds,
    ) -> Result<Option<BoundsRect>, DraggableError> {
        let Some(bound) = bound_node(layout, node, bounds)? else {
            self.invalidate();
            self.value = resolve_bounds(layout, node, bounds)?;
            return Ok(self.value);
        };
        let node_size = layout.client_size(node);
        let bound_size = layout.client_size(bound);
        let hit = self.key.as_ref().is_some_and(|key| {
            key.node == node
                && key.bound == bound
                && key.node_size == node_size
                && key.bound_size == bound_size
                && key.bounds == *bounds
        });
        if !hit {
            let rect = measure_bounds(layout, node, bound);
            tracing::debug!(?bounds, ?rect, "resolved bounds");
            self.key = Some(CacheKey {
                bounds: bounds.clone(),
                node,
                bound,
                node_size,
                bound_size,
            });
            self.value = Some(rect);
        }
        Ok(self.value)
    }

    /// Forget the cached measurement.
    pub fn invalidate(&mut self) {
        self.key = None;
        self.value = None;
    }

    /// The last resolved bounds, if any.
    pub fn current(&self) -> Option<BoundsRect> {
        self.value
    }
}

/// Clamp `proposed + slack` into `bounds`.
///
/// Returns the clamped position and the new slack,
/// `slack + (proposed - clamped)`.
pub fn clamp_with_slack(bounds: &BoundsRect, proposed: Point, slack: Vec2) -> (Point, Vec2) {
    let clamped = bounds.clamp(proposed + slack);
    (clamped, slack + (proposed - clamped))
}
