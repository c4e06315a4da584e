// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry helpers: offset-parent coordinates, box-model measurement and
//! transform strings.
//!
//! All positions handed to drag listeners are relative to the node's offset
//! parent and divided by the configured scale:
//!
//! ```text
//! position = (client + offset_parent.scroll - offset_parent.rect.origin) / scale
//! ```
//!
//! Reading an offset parent's bounding rect forces layout, and a drag reads it
//! on every move. [`FrameRectCache`] keeps those reads to one per node per
//! animation frame.

use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::{Point, Rect, Vec2};

use crate::host::Layout;

/// Convert a client-space point into offset-parent space.
pub fn offset_xy_from_parent(
    client: Point,
    parent_origin: Point,
    parent_scroll: Vec2,
    scale: f64,
) -> Point {
    ((client.to_vec2() + parent_scroll - parent_origin.to_vec2()) / scale).to_point()
}

/// Bounding rects memoized until the next animation frame.
#[derive(Clone, Debug)]
pub struct FrameRectCache<N> {
    rects: HashMap<N, Rect>,
}

impl<N> Default for FrameRectCache<N> {
    fn default() -> Self {
        Self {
            rects: HashMap::new(),
        }
    }
}

impl<N: Copy + Eq + Hash> FrameRectCache<N> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached rect for `node`, measuring it with `measure` on a miss.
    pub fn get_or_measure(&mut self, node: N, measure: impl FnOnce() -> Rect) -> Rect {
        *self.rects.entry(node).or_insert_with(measure)
    }

    /// Forget everything (new frame, or layout known to have changed).
    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Number of cached rects.
    pub fn len(&self) -> usize {
        self.rects.len()
    }
}

/// `clientWidth` plus left and right borders.
pub fn outer_width<L: Layout + ?Sized>(layout: &L, node: L::Node) -> f64 {
    let border = layout.box_style(node).border;
    layout.client_size(node).width + border.x0 + border.x1
}

/// `clientHeight` plus top and bottom borders.
pub fn outer_height<L: Layout + ?Sized>(layout: &L, node: L::Node) -> f64 {
    let border = layout.box_style(node).border;
    layout.client_size(node).height + border.y0 + border.y1
}

/// `clientWidth` minus left and right padding.
pub fn inner_width<L: Layout + ?Sized>(layout: &L, node: L::Node) -> f64 {
    let padding = layout.box_style(node).padding;
    layout.client_size(node).width - padding.x0 - padding.x1
}

/// `clientHeight` minus top and bottom padding.
pub fn inner_height<L: Layout + ?Sized>(layout: &L, node: L::Node) -> f64 {
    let padding = layout.box_style(node).padding;
    layout.client_size(node).height - padding.y0 - padding.y1
}

/// A CSS length used in position offsets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Length {
    /// Pixels (unitless in SVG output).
    Px(f64),
    /// Percentage of the element's own size.
    Percent(f64),
}

/// Additional translation applied in front of the drag position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionOffset {
    /// Horizontal offset.
    pub x: Length,
    /// Vertical offset.
    pub y: Length,
}

impl PositionOffset {
    /// A pixel offset.
    pub const fn px(x: f64, y: f64) -> Self {
        Self {
            x: Length::Px(x),
            y: Length::Px(y),
        }
    }
}

/// Formats a number the way a browser serializes it: no trailing `.0`, no `-0`.
struct Num(f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Adding zero folds -0 into 0.
        write!(f, "{}", self.0 + 0.0)
    }
}

struct Len<'a>(Length, &'a str);

impl fmt::Display for Len<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Length::Px(v) => write!(f, "{}{}", Num(v), self.1),
            Length::Percent(v) => write!(f, "{}%", Num(v)),
        }
    }
}

fn translation(pos: Point, offset: Option<&PositionOffset>, unit: &str) -> String {
    let translate = format!("translate({}{unit},{}{unit})", Num(pos.x), Num(pos.y));
    match offset {
        Some(offset) => format!(
            "translate({}, {}){translate}",
            Len(offset.x, unit),
            Len(offset.y, unit)
        ),
        None => translate,
    }
}

/// CSS `transform` value for a drag position.
///
/// ```
/// use kurbo::Point;
/// use understory_draggable::geometry::{create_css_transform, Length, PositionOffset};
///
/// assert_eq!(
///     create_css_transform(Point::new(10.0, -2.5), None),
///     "translate(10px,-2.5px)"
/// );
/// let offset = PositionOffset { x: Length::Percent(50.0), y: Length::Px(4.0) };
/// assert_eq!(
///     create_css_transform(Point::new(1.0, 2.0), Some(&offset)),
///     "translate(50%, 4px)translate(1px,2px)"
/// );
/// ```
pub fn create_css_transform(pos: Point, offset: Option<&PositionOffset>) -> String {
    translation(pos, offset, "px")
}

/// SVG `transform` attribute for a drag position (unitless).
pub fn create_svg_transform(pos: Point, offset: Option<&PositionOffset>) -> String {
    translation(pos, offset, "")
}
