// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A positioned drag inside a scrolling list: parent bounds, a grid, and
//! edge auto-scroll, with frames and timers pumped by hand.
//!
//! Run:
//! - `RUST_LOG=understory_draggable=debug cargo run -p understory_demos --example bounded_grid`

use kurbo::{Point, Rect, Size};
use tracing_subscriber::EnvFilter;
use understory_draggable::autoscroll::ScrollAxis;
use understory_draggable::headless::{HeadlessHost, HeadlessNode, NodeId};
use understory_draggable::input::InputEvent;
use understory_draggable::{
    AutoScrollOptions, Bounds, CoreOptions, Draggable, DraggableError, DraggableOptions,
};

fn pump(
    host: &mut HeadlessHost,
    drag: &mut Draggable<NodeId>,
    frames: usize,
) -> Result<(), DraggableError> {
    for _ in 0..frames {
        for frame in host.take_frames() {
            drag.on_frame(host, &mut (), frame)?;
        }
        for timer in host.advance(16) {
            drag.on_timer(host, &mut (), timer)?;
        }
    }
    Ok(())
}

fn main() -> Result<(), DraggableError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut host = HeadlessHost::new(Size::new(800.0, 600.0));
    let body = host.body_id();
    let list = host.insert(
        body,
        HeadlessNode::element("ul")
            .with_class("list")
            .with_rect(Rect::new(0.0, 0.0, 300.0, 300.0))
            .with_scroll_size(Size::new(300.0, 1200.0))
            .with_overflow(ScrollAxis::Y),
    );
    let item = host.insert(
        list,
        HeadlessNode::element("li").with_rect(Rect::new(0.0, 0.0, 300.0, 40.0)),
    );

    let mut drag = Draggable::new(DraggableOptions {
        core: CoreOptions {
            auto_scroll: AutoScrollOptions {
                enabled: true,
                ..AutoScrollOptions::default()
            },
            enable_click_suppression: true,
            ..CoreOptions::with_grid(1.0, 20.0)
        },
        bounds: Bounds::Parent,
        ..DraggableOptions::default()
    });
    drag.mount(item);

    let at = |x, y| InputEvent::mouse(Some(item), Point::new(x, y));
    drag.on_pointer_down(&mut host, &mut (), &at(150.0, 20.0))?;
    drag.on_pointer_move(&mut host, &mut (), &at(150.0, 95.0))?;
    println!("after move:   {}", drag.transform());

    // Hold the pointer in the bottom edge zone for a few frames.
    drag.on_pointer_move(&mut host, &mut (), &at(150.0, 290.0))?;
    pump(&mut host, &mut drag, 10)?;
    println!(
        "after scroll: {} (list scrolled to {:?})",
        drag.transform(),
        host.scroll_of(list)
    );

    drag.on_pointer_up(&mut host, &mut (), &at(150.0, 290.0))?;
    let click = drag.on_click(&mut host);
    println!("release:      {} (click effects {click:?})", drag.transform());
    Ok(())
}
