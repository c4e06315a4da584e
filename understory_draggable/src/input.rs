// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input normalization across mouse, touch and pointer events.
//!
//! Browsers deliver one physical gesture through up to three event families.
//! [`InputKind`] folds them into one tagged type; [`extract_pointer`] reduces
//! any of them to a single client-space point, and [`pick_identifier`] binds a
//! gesture to one touch or pointer so that concurrent touches never
//! interleave.
//!
//! ```
//! use kurbo::Point;
//! use understory_draggable::input::{
//!     extract_pointer, pick_identifier, InputKind, PointerBinding, Touch,
//! };
//!
//! let down = InputKind::touch([Touch::new(7, Point::new(10.0, 10.0))]);
//! let binding = pick_identifier(&down);
//! assert_eq!(binding, Some(PointerBinding::Touch(7)));
//!
//! // A different finger moving is not our gesture.
//! let other = InputKind::touch([Touch::new(8, Point::new(50.0, 50.0))]);
//! assert_eq!(extract_pointer(&other, binding), None);
//! ```

use kurbo::Point;
use smallvec::SmallVec;

bitflags::bitflags! {
    /// A set of event families, used to describe which start listeners to install.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ListenerFamilies: u8 {
        /// `mousedown` / `mousemove` / `mouseup`.
        const MOUSE   = 0b0000_0001;
        /// `touchstart` / `touchmove` / `touchend` / `touchcancel`.
        const TOUCH   = 0b0000_0010;
        /// `pointerdown` / `pointermove` / `pointerup` / `pointercancel`.
        const POINTER = 0b0000_0100;
    }
}

/// The browser event family a gesture arrived through.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventFamily {
    /// Mouse events.
    Mouse,
    /// Touch events.
    Touch,
    /// Pointer events.
    Pointer,
}

impl EventFamily {
    /// Name of the start event.
    pub const fn start_event(self) -> &'static str {
        match self {
            Self::Mouse => "mousedown",
            Self::Touch => "touchstart",
            Self::Pointer => "pointerdown",
        }
    }

    /// Name of the move event.
    pub const fn move_event(self) -> &'static str {
        match self {
            Self::Mouse => "mousemove",
            Self::Touch => "touchmove",
            Self::Pointer => "pointermove",
        }
    }

    /// Name of the stop event.
    pub const fn stop_event(self) -> &'static str {
        match self {
            Self::Mouse => "mouseup",
            Self::Touch => "touchend",
            Self::Pointer => "pointerup",
        }
    }

    /// Name of the cancel event, for families that have one.
    pub const fn cancel_event(self) -> Option<&'static str> {
        match self {
            Self::Mouse => None,
            Self::Touch => Some("touchcancel"),
            Self::Pointer => Some("pointercancel"),
        }
    }

    /// The corresponding [`ListenerFamilies`] flag.
    pub const fn flag(self) -> ListenerFamilies {
        match self {
            Self::Mouse => ListenerFamilies::MOUSE,
            Self::Touch => ListenerFamilies::TOUCH,
            Self::Pointer => ListenerFamilies::POINTER,
        }
    }
}

/// Device behind a pointer event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerType {
    /// Mouse.
    Mouse,
    /// Pen / stylus.
    Pen,
    /// Touch contact.
    Touch,
}

/// One touch point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Touch {
    /// Identifier, stable for the lifetime of the contact.
    pub identifier: i64,
    /// Client-space position.
    pub client: Point,
}

impl Touch {
    /// Create a touch point.
    pub const fn new(identifier: i64, client: Point) -> Self {
        Self { identifier, client }
    }
}

/// Inline list of touches; two cover the vast majority of events.
pub type TouchList = SmallVec<[Touch; 2]>;

/// Family-specific payload of an input event.
#[derive(Clone, Debug, PartialEq)]
pub enum InputKind {
    /// A mouse event.
    Mouse {
        /// Client-space position.
        client: Point,
        /// `MouseEvent.button` (0 is the primary button).
        button: i16,
    },
    /// A pointer event.
    Pointer {
        /// `PointerEvent.pointerId`.
        pointer_id: i32,
        /// Device type.
        pointer_type: PointerType,
        /// Client-space position.
        client: Point,
        /// `PointerEvent.button` (0 is the primary button).
        button: i16,
        /// `PointerEvent.isPrimary`.
        is_primary: bool,
    },
    /// A touch event.
    Touch {
        /// Touches that changed in this event.
        changed_touches: TouchList,
        /// Touches still on the target element.
        target_touches: TouchList,
    },
}

impl InputKind {
    /// A primary-button mouse event.
    pub fn mouse(client: Point) -> Self {
        Self::Mouse { client, button: 0 }
    }

    /// A primary pointer event.
    pub fn pointer(pointer_id: i32, pointer_type: PointerType, client: Point) -> Self {
        Self::Pointer {
            pointer_id,
            pointer_type,
            client,
            button: 0,
            is_primary: true,
        }
    }

    /// A touch event whose changed touches are also the target touches.
    pub fn touch(touches: impl IntoIterator<Item = Touch>) -> Self {
        let changed: TouchList = touches.into_iter().collect();
        Self::Touch {
            target_touches: changed.clone(),
            changed_touches: changed,
        }
    }

    /// A touch-end style event: `changed` lifted, nothing left on the target.
    pub fn touch_end(changed: impl IntoIterator<Item = Touch>) -> Self {
        Self::Touch {
            changed_touches: changed.into_iter().collect(),
            target_touches: TouchList::new(),
        }
    }

    /// Which family this event belongs to.
    pub fn family(&self) -> EventFamily {
        match self {
            Self::Mouse { .. } => EventFamily::Mouse,
            Self::Pointer { .. } => EventFamily::Pointer,
            Self::Touch { .. } => EventFamily::Touch,
        }
    }

    /// The button, for families that have one.
    pub fn button(&self) -> Option<i16> {
        match self {
            Self::Mouse { button, .. } | Self::Pointer { button, .. } => Some(*button),
            Self::Touch { .. } => None,
        }
    }

    /// `true` for touch events and touch-type pointer events.
    pub fn is_touch(&self) -> bool {
        matches!(
            self,
            Self::Touch { .. }
                | Self::Pointer {
                    pointer_type: PointerType::Touch,
                    ..
                }
        )
    }
}

/// The touch or pointer a gesture is bound to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerBinding {
    /// A touch identifier.
    Touch(i64),
    /// A pointer id.
    Pointer(i32),
}

/// An input event delivered to the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct InputEvent<N> {
    /// Event target, if the host could resolve one.
    pub target: Option<N>,
    /// Family-specific payload.
    pub kind: InputKind,
    /// `true` for events the engine made up (for example the release used
    /// when a drag listener cancels the drag).
    pub synthetic: bool,
}

impl<N> InputEvent<N> {
    /// Create an event.
    pub fn new(target: Option<N>, kind: InputKind) -> Self {
        Self {
            target,
            kind,
            synthetic: false,
        }
    }

    /// A primary-button mouse event at `client`.
    pub fn mouse(target: Option<N>, client: Point) -> Self {
        Self::new(target, InputKind::mouse(client))
    }

    /// A primary pointer event at `client`.
    pub fn pointer(
        target: Option<N>,
        pointer_id: i32,
        pointer_type: PointerType,
        client: Point,
    ) -> Self {
        Self::new(target, InputKind::pointer(pointer_id, pointer_type, client))
    }

    /// A touch event with a single touch.
    pub fn touch(target: Option<N>, identifier: i64, client: Point) -> Self {
        Self::new(target, InputKind::touch([Touch::new(identifier, client)]))
    }

    /// Builder-style button override for mouse and pointer events.
    pub fn with_button(mut self, new_button: i16) -> Self {
        match &mut self.kind {
            InputKind::Mouse { button, .. } | InputKind::Pointer { button, .. } => {
                *button = new_button;
            }
            InputKind::Touch { .. } => {}
        }
        self
    }

    /// A synthetic release carrying the same payload as `self`.
    pub fn synthetic_release(&self) -> Self
    where
        N: Clone,
    {
        Self {
            target: self.target.clone(),
            kind: self.kind.clone(),
            synthetic: true,
        }
    }
}

/// Bind a gesture to one touch or pointer.
///
/// Touch events prefer the first target touch, then the first changed touch.
/// Mouse events have nothing to bind.
pub fn pick_identifier(kind: &InputKind) -> Option<PointerBinding> {
    match kind {
        InputKind::Mouse { .. } => None,
        InputKind::Pointer { pointer_id, .. } => Some(PointerBinding::Pointer(*pointer_id)),
        InputKind::Touch {
            changed_touches,
            target_touches,
        } => target_touches
            .first()
            .or_else(|| changed_touches.first())
            .map(|t| PointerBinding::Touch(t.identifier)),
    }
}

/// Reduce an event to the client-space point of the bound touch or pointer.
///
/// Returns `None` when the event does not carry the bound identifier, which
/// means the event belongs to someone else and must be ignored.
pub fn extract_pointer(kind: &InputKind, binding: Option<PointerBinding>) -> Option<Point> {
    match (kind, binding) {
        (InputKind::Mouse { client, .. }, _) => Some(*client),
        (
            InputKind::Pointer {
                pointer_id, client, ..
            },
            Some(PointerBinding::Pointer(id)),
        ) => (*pointer_id == id).then_some(*client),
        (InputKind::Pointer { client, .. }, None) => Some(*client),
        (InputKind::Pointer { .. }, Some(PointerBinding::Touch(_))) => None,
        (
            InputKind::Touch {
                changed_touches,
                target_touches,
            },
            Some(PointerBinding::Touch(id)),
        ) => target_touches
            .iter()
            .chain(changed_touches.iter())
            .find(|t| t.identifier == id)
            .map(|t| t.client),
        (
            InputKind::Touch {
                changed_touches,
                target_touches,
            },
            None,
        ) => changed_touches
            .first()
            .or_else(|| target_touches.first())
            .map(|t| t.client),
        (InputKind::Touch { .. }, Some(PointerBinding::Pointer(_))) => None,
    }
}

/// Start listener families to install on the draggable element.
///
/// Pointer-capable platforms never get mouse listeners. Touch listeners are
/// the fallback when pointer events are missing, and are also installed when
/// `allow_mobile_scroll` leaves native touch handling enabled (the browser
/// would otherwise cancel the pointer stream as soon as it starts scrolling).
pub fn start_listeners(supports_pointer_events: bool, allow_mobile_scroll: bool) -> ListenerFamilies {
    let families: &[EventFamily] = match (supports_pointer_events, allow_mobile_scroll) {
        (true, false) => &[EventFamily::Pointer],
        (true, true) => &[EventFamily::Pointer, EventFamily::Touch],
        (false, _) => &[EventFamily::Mouse, EventFamily::Touch],
    };
    families
        .iter()
        .fold(ListenerFamilies::empty(), |set, family| set | family.flag())
}

/// Value for the element's `touch-action` style.
pub const fn touch_action(allow_mobile_scroll: bool) -> &'static str {
    if allow_mobile_scroll { "auto" } else { "none" }
}
