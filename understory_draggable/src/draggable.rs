// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A draggable that owns its position.
//!
//! [`Draggable`] wraps a [`DraggableCore`] and feeds every core delta through
//! the movement pipeline (axis, direction lock, bounds with slack). Callbacks
//! see positions in translation space: `x`/`y` are where the element will be
//! drawn, and `delta_x`/`delta_y` are what actually changed after the
//! pipeline ran.
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use understory_draggable::headless::{HeadlessHost, HeadlessNode};
//! use understory_draggable::input::InputEvent;
//! use understory_draggable::{Axis, Draggable, DraggableOptions};
//!
//! let mut host = HeadlessHost::new(Size::new(800.0, 600.0));
//! let node = host.insert(
//!     host.body_id(),
//!     HeadlessNode::element("div").with_rect(Rect::new(0.0, 0.0, 40.0, 40.0)),
//! );
//! let mut drag = Draggable::new(DraggableOptions {
//!     axis: Axis::X,
//!     ..DraggableOptions::default()
//! });
//! drag.mount(node);
//!
//! let at = |x, y| InputEvent::mouse(Some(node), Point::new(x, y));
//! drag.on_pointer_down(&mut host, &mut (), &at(0.0, 0.0)).unwrap();
//! drag.on_pointer_move(&mut host, &mut (), &at(30.0, 12.0)).unwrap();
//! drag.on_pointer_up(&mut host, &mut (), &at(30.0, 12.0)).unwrap();
//!
//! assert_eq!(drag.position(), Point::new(30.0, 0.0));
//! assert_eq!(drag.transform(), "translate(30px,0px)");
//! ```

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Vec2};
use tracing::debug;

use crate::bounds::{BoundsCache, BoundsRect};
use crate::core::{DragHandler, DraggableCore, DraggableData, Effects, Outcome};
use crate::error::DraggableError;
use crate::geometry::{create_css_transform, create_svg_transform};
use crate::host::{FrameId, Host, TimerId};
use crate::input::InputEvent;
use crate::options::{DraggableOptions, TransformTarget};
use crate::policy::{LockAxis, PositionModel};

/// Runs the caller's handler with positions translated through the model.
struct Positioned<'a, N, D: ?Sized> {
    model: &'a mut PositionModel,
    options: &'a DraggableOptions<N>,
    bounds: Option<BoundsRect>,
    dragging: &'a mut bool,
    dragged: &'a mut bool,
    user: &'a mut D,
}

impl<N: Copy, D: DragHandler<N> + ?Sized> DragHandler<N> for Positioned<'_, N, D> {
    fn on_mouse_down(&mut self, event: &InputEvent<N>) {
        self.user.on_mouse_down(event);
    }

    fn on_start(&mut self, event: &InputEvent<N>, data: &DraggableData<N>) -> Outcome {
        let here = self.model.position;
        let data = DraggableData::new(data.node, here + data.delta(), here);
        if self.user.on_start(event, &data) == Outcome::Cancel {
            return Outcome::Cancel;
        }
        self.model.begin_gesture();
        *self.dragging = true;
        *self.dragged = true;
        Outcome::Continue
    }

    fn on_drag(&mut self, event: &InputEvent<N>, data: &DraggableData<N>) -> Outcome {
        if !*self.dragging {
            return Outcome::Cancel;
        }
        let proposal = self
            .model
            .propose(data.delta(), self.options.axis, self.bounds.as_ref());
        let data = DraggableData::new(data.node, proposal.position, self.model.position);
        if self.user.on_drag(event, &data) == Outcome::Cancel {
            return Outcome::Cancel;
        }
        self.model.commit(proposal);
        Outcome::Continue
    }

    fn on_stop(&mut self, event: &InputEvent<N>, data: &DraggableData<N>) -> Outcome {
        if !*self.dragging {
            return Outcome::Cancel;
        }
        let proposal = self
            .model
            .propose(data.delta(), self.options.axis, self.bounds.as_ref());
        let data = DraggableData::new(data.node, proposal.position, self.model.position);
        let outcome = self.user.on_stop(event, &data);
        if outcome == Outcome::Continue {
            self.model.commit(proposal);
        }
        self.model.end_gesture();
        *self.dragging = false;
        if let Some(controlled) = self.options.position {
            self.model.position = controlled;
        }
        outcome
    }
}

/// A draggable element with its own position.
///
/// The event methods mirror [`DraggableCore`]'s but return
/// `Result<Effects, DraggableError>`: element-derived bounds are resolved
/// before the core sees the event, and a bounds configuration that cannot be
/// resolved is reported instead of dispatching it.
#[derive(Debug)]
pub struct Draggable<N> {
    core: DraggableCore<N>,
    options: DraggableOptions<N>,
    model: PositionModel,
    bounds: BoundsCache<N>,
    resolved: Option<BoundsRect>,
    dragging: bool,
    dragged: bool,
}

impl<N: Copy + Eq + Hash + Debug> Draggable<N> {
    /// Create an unmounted draggable.
    ///
    /// Starts at `options.position` if controlled, else at
    /// `options.default_position`.
    pub fn new(options: DraggableOptions<N>) -> Self {
        let core = DraggableCore::new(options.core.clone());
        let model = PositionModel::new(
            options.position.unwrap_or(options.default_position),
            lock_threshold(&options, core.scale()),
        );
        Self {
            core,
            options,
            model,
            bounds: BoundsCache::new(),
            resolved: None,
            dragging: false,
            dragged: false,
        }
    }

    /// Current options.
    pub fn options(&self) -> &DraggableOptions<N> {
        &self.options
    }

    /// Replace the options.
    pub fn set_options(&mut self, options: DraggableOptions<N>) {
        self.core.set_options(options.core.clone());
        self.model
            .set_lock_threshold(lock_threshold(&options, self.core.scale()));
        self.set_position(options.position);
        if options.bounds != self.options.bounds {
            self.bounds.invalidate();
        }
        self.options = options;
    }

    /// Update the caller-owned position.
    ///
    /// A changed value moves the draggable immediately; `None` hands the
    /// position back to the draggable.
    pub fn set_position(&mut self, position: Option<Point>) {
        let previous = core::mem::replace(&mut self.options.position, position);
        if let Some(position) = position {
            if previous != Some(position) {
                debug!(?position, "controlled position changed");
                self.model.position = position;
                self.model.slack = Vec2::ZERO;
            }
        }
    }

    /// The gesture engine underneath.
    pub fn core(&self) -> &DraggableCore<N> {
        &self.core
    }

    /// Committed position.
    pub fn position(&self) -> Point {
        self.model.position
    }

    /// Movement currently held back by bounds.
    pub fn slack(&self) -> Vec2 {
        self.model.slack
    }

    /// `true` while a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// `true` once any drag has started.
    pub fn was_dragged(&self) -> bool {
        self.dragged
    }

    /// The axis the current gesture is locked to, if any.
    pub fn direction_lock_axis(&self) -> Option<LockAxis> {
        self.model.lock_axis()
    }

    /// The position to draw at.
    ///
    /// A controlled draggable draws at the caller's position except while a
    /// drag is in progress; an axis that cannot be dragged always draws at the
    /// caller's (or default) value.
    pub fn transform_position(&self) -> Point {
        let valid = self.options.position.unwrap_or(self.options.default_position);
        let current = if self.options.position.is_some() && !self.dragging {
            valid
        } else {
            self.model.position
        };
        Point::new(
            if self.options.axis.can_drag_x() { current.x } else { valid.x },
            if self.options.axis.can_drag_y() { current.y } else { valid.y },
        )
    }

    /// The transform for [`Self::transform_position`], as CSS or SVG per the
    /// options.
    pub fn transform(&self) -> String {
        let position = self.transform_position();
        let offset = self.options.position_offset.as_ref();
        match self.options.transform_target {
            TransformTarget::Css => create_css_transform(position, offset),
            TransformTarget::Svg => create_svg_transform(position, offset),
        }
    }

    /// Attach to `node`.
    pub fn mount(&mut self, node: N) {
        self.bounds.invalidate();
        self.core.mount(node);
    }

    /// The node this draggable is mounted on.
    pub fn owner_node(&self) -> Option<N> {
        self.core.owner_node()
    }

    /// Detach, force-stopping any drag in progress.
    pub fn unmount<H, D>(&mut self, host: &mut H, handler: &mut D)
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        self.resolved = self.bounds.current();
        self.dispatch(handler, |core, adapter| core.unmount(host, adapter));
        self.bounds.invalidate();
    }

    /// See [`DraggableCore::on_pointer_down`].
    pub fn on_pointer_down<H, D>(
        &mut self,
        host: &mut H,
        handler: &mut D,
        event: &InputEvent<N>,
    ) -> Result<Effects, DraggableError>
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        self.prepare(host, true)?;
        Ok(self.dispatch(handler, |core, adapter| {
            core.on_pointer_down(host, adapter, event)
        }))
    }

    /// See [`DraggableCore::on_pointer_move`].
    pub fn on_pointer_move<H, D>(
        &mut self,
        host: &mut H,
        handler: &mut D,
        event: &InputEvent<N>,
    ) -> Result<Effects, DraggableError>
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        self.prepare(host, false)?;
        Ok(self.dispatch(handler, |core, adapter| {
            core.on_pointer_move(host, adapter, event)
        }))
    }

    /// See [`DraggableCore::on_pointer_up`].
    pub fn on_pointer_up<H, D>(
        &mut self,
        host: &mut H,
        handler: &mut D,
        event: &InputEvent<N>,
    ) -> Result<Effects, DraggableError>
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        self.prepare(host, false)?;
        Ok(self.dispatch(handler, |core, adapter| {
            core.on_pointer_up(host, adapter, event)
        }))
    }

    /// See [`DraggableCore::on_pointer_cancel`].
    pub fn on_pointer_cancel<H, D>(
        &mut self,
        host: &mut H,
        handler: &mut D,
        event: &InputEvent<N>,
    ) -> Result<Effects, DraggableError>
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        self.prepare(host, false)?;
        Ok(self.dispatch(handler, |core, adapter| {
            core.on_pointer_cancel(host, adapter, event)
        }))
    }

    /// See [`DraggableCore::on_frame`].
    pub fn on_frame<H, D>(&mut self, host: &mut H, handler: &mut D, frame: FrameId) -> Result<(), DraggableError>
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        self.prepare(host, false)?;
        self.dispatch(handler, |core, adapter| core.on_frame(host, adapter, frame));
        Ok(())
    }

    /// See [`DraggableCore::on_timer`].
    pub fn on_timer<H, D>(&mut self, host: &mut H, handler: &mut D, timer: TimerId) -> Result<(), DraggableError>
    where
        H: Host<Node = N>,
        D: DragHandler<N> + ?Sized,
    {
        self.prepare(host, false)?;
        self.dispatch(handler, |core, adapter| core.on_timer(host, adapter, timer));
        Ok(())
    }

    /// See [`DraggableCore::on_click`].
    pub fn on_click<H: Host<Node = N>>(&mut self, host: &mut H) -> Effects {
        self.core.on_click(host)
    }

    /// Resolve bounds for the coming dispatch.
    ///
    /// A press always measures afresh; later events reuse the cache and only
    /// while a gesture is live.
    fn prepare<H: Host<Node = N>>(&mut self, host: &H, press: bool) -> Result<(), DraggableError> {
        let Some(node) = self.core.owner_node() else {
            return Ok(());
        };
        if press {
            self.bounds.invalidate();
        } else if !self.core.is_dragging() && !self.core.is_pending() {
            return Ok(());
        }
        self.resolved = self.bounds.resolve(host, node, &self.options.bounds)?;
        Ok(())
    }

    fn dispatch<D, R>(
        &mut self,
        handler: &mut D,
        f: impl FnOnce(&mut DraggableCore<N>, &mut Positioned<'_, N, D>) -> R,
    ) -> R
    where
        D: DragHandler<N> + ?Sized,
    {
        let Self {
            core,
            options,
            model,
            resolved,
            dragging,
            dragged,
            ..
        } = self;
        let mut adapter = Positioned {
            model,
            options,
            bounds: *resolved,
            dragging,
            dragged,
            user: handler,
        };
        f(core, &mut adapter)
    }
}

fn lock_threshold<N>(options: &DraggableOptions<N>, scale: f64) -> Option<f64> {
    options
        .direction_lock
        .then(|| options.direction_lock_threshold / scale)
}
