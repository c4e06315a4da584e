// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration.
//!
//! Options are plain structs with public fields and documented defaults.
//! Start from `Default` and override what you need:
//!
//! ```
//! use understory_draggable::{Axis, Bounds, DraggableOptions};
//!
//! let options: DraggableOptions<u32> = DraggableOptions {
//!     axis: Axis::X,
//!     bounds: Bounds::Parent,
//!     ..DraggableOptions::default()
//! };
//! assert_eq!(options.core.scale, 1.0);
//! ```

use kurbo::Point;
use understory_event_state::qualify::StartPolicy;

use crate::autoscroll::ScrollAxis;
use crate::bounds::Bounds;
use crate::geometry::PositionOffset;

/// Which axes a draggable may move along.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Both axes.
    #[default]
    Both,
    /// Horizontal only.
    X,
    /// Vertical only.
    Y,
    /// Neither; callbacks still fire but the position never changes.
    None,
}

impl Axis {
    /// `true` if horizontal movement is allowed.
    pub const fn can_drag_x(self) -> bool {
        matches!(self, Self::Both | Self::X)
    }

    /// `true` if vertical movement is allowed.
    pub const fn can_drag_y(self) -> bool {
        matches!(self, Self::Both | Self::Y)
    }
}

/// Output flavor of [`Draggable::transform`](crate::Draggable::transform).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransformTarget {
    /// A CSS `transform` value (`px` units).
    #[default]
    Css,
    /// An SVG `transform` attribute (unitless).
    Svg,
}

/// Auto-scroll configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct AutoScrollOptions<N> {
    /// Scroll containers while dragging near their edges.
    pub enabled: bool,
    /// Distance from an edge, in client pixels, at which scrolling starts.
    pub threshold: f64,
    /// Maximum scroll per frame, in pixels.
    pub max_speed: f64,
    /// Axes that may be scrolled.
    pub axis: ScrollAxis,
    /// Also scroll the window, after every element container.
    pub include_window: bool,
    /// Scroll only this container (plus the window, if included) instead of
    /// every scrollable ancestor.
    pub container: Option<N>,
}

impl<N> Default for AutoScrollOptions<N> {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: 40.0,
            max_speed: 20.0,
            axis: ScrollAxis::all(),
            include_window: true,
            container: None,
        }
    }
}

/// Options for [`DraggableCore`](crate::DraggableCore).
#[derive(Clone, Debug, PartialEq)]
pub struct CoreOptions<N> {
    /// Ignore every press while set.
    pub disabled: bool,
    /// Accept presses from non-primary mouse buttons.
    pub allow_any_click: bool,
    /// Leave native touch scrolling enabled (see
    /// [`start_listeners`](crate::input::start_listeners)).
    pub allow_mobile_scroll: bool,
    /// Only presses on an element matching this selector (or inside one,
    /// up to the draggable node) start a drag.
    pub handle: Option<String>,
    /// Presses on an element matching this selector (or inside one) never
    /// start a drag.
    pub cancel: Option<String>,
    /// Never start a drag from form controls and editable content.
    pub cancel_interactive_elements: bool,
    /// Coordinate origin override; defaults to the node's offset parent.
    pub offset_parent: Option<N>,
    /// Snap movement to multiples of `[x, y]`.
    pub grid: Option<[f64; 2]>,
    /// Scale of the coordinate space the node is rendered in.
    pub scale: f64,
    /// Suppress text selection on the document while dragging.
    pub enable_user_select_hack: bool,
    /// Process at most one move per animation frame.
    pub use_raf_drag: bool,
    /// Pixels the pointer must travel before a press becomes a drag.
    pub drag_start_threshold: f64,
    /// Long-press delay in milliseconds before a press becomes a drag.
    pub drag_start_delay: u64,
    /// Pixels the pointer may drift during the long-press delay.
    pub drag_start_delay_tolerance: f64,
    /// Auto-scroll configuration.
    pub auto_scroll: AutoScrollOptions<N>,
    /// Swallow the click that follows a drag.
    pub enable_click_suppression: bool,
    /// How long after a drag a click is still swallowed, in milliseconds.
    pub click_suppression_duration: u64,
}

impl<N> Default for CoreOptions<N> {
    fn default() -> Self {
        Self {
            disabled: false,
            allow_any_click: false,
            allow_mobile_scroll: false,
            handle: None,
            cancel: None,
            cancel_interactive_elements: false,
            offset_parent: None,
            grid: None,
            scale: 1.0,
            enable_user_select_hack: true,
            use_raf_drag: false,
            drag_start_threshold: 0.0,
            drag_start_delay: 0,
            drag_start_delay_tolerance: 5.0,
            auto_scroll: AutoScrollOptions::default(),
            enable_click_suppression: false,
            click_suppression_duration: 250,
        }
    }
}

impl<N> CoreOptions<N> {
    /// Options that snap to a grid.
    pub fn with_grid(x: f64, y: f64) -> Self {
        Self {
            grid: Some([x, y]),
            ..Self::default()
        }
    }

    /// The start qualification policy, in scale-adjusted units.
    ///
    /// A delay takes precedence over a distance threshold.
    pub(crate) fn start_policy(&self, scale: f64) -> StartPolicy {
        if self.drag_start_delay > 0 {
            StartPolicy::Delay {
                tolerance: self.drag_start_delay_tolerance / scale,
            }
        } else if self.drag_start_threshold > 0.0 {
            StartPolicy::Threshold {
                distance: self.drag_start_threshold / scale,
            }
        } else {
            StartPolicy::Immediate
        }
    }
}

/// Options for [`Draggable`](crate::Draggable).
#[derive(Clone, Debug, PartialEq)]
pub struct DraggableOptions<N> {
    /// Gesture options.
    pub core: CoreOptions<N>,
    /// Movement axes.
    pub axis: Axis,
    /// Movement bounds.
    pub bounds: Bounds,
    /// Commit each gesture to its dominant axis once it has moved far enough.
    pub direction_lock: bool,
    /// Pixels of movement on either axis before the direction lock engages.
    pub direction_lock_threshold: f64,
    /// Initial position for uncontrolled use.
    pub default_position: Point,
    /// Caller-owned position. While set, the draggable reverts to it when a
    /// drag ends.
    pub position: Option<Point>,
    /// Extra offset prepended to the transform.
    pub position_offset: Option<PositionOffset>,
    /// CSS or SVG transform output.
    pub transform_target: TransformTarget,
}

impl<N> Default for DraggableOptions<N> {
    fn default() -> Self {
        Self {
            core: CoreOptions::default(),
            axis: Axis::Both,
            bounds: Bounds::Unbounded,
            direction_lock: false,
            direction_lock_threshold: 5.0,
            default_position: Point::ZERO,
            position: None,
            position_offset: None,
            transform_target: TransformTarget::Css,
        }
    }
}
