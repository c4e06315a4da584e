// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A core drag with a start threshold, driven through the headless host.
//!
//! The handler prints every callback; the engine's own lifecycle logging goes
//! through `tracing`.
//!
//! Run:
//! - `RUST_LOG=understory_draggable=trace cargo run -p understory_demos --example basic_drag`

use kurbo::{Point, Rect, Size};
use tracing_subscriber::EnvFilter;
use understory_draggable::headless::{HeadlessHost, HeadlessNode, NodeId};
use understory_draggable::input::{InputEvent, PointerType};
use understory_draggable::{CoreOptions, DragHandler, DraggableCore, DraggableData, Outcome};

struct Printer;

impl DragHandler<NodeId> for Printer {
    fn on_start(&mut self, _: &InputEvent<NodeId>, data: &DraggableData<NodeId>) -> Outcome {
        println!("start  at ({:>5.1}, {:>5.1})", data.x, data.y);
        Outcome::Continue
    }

    fn on_drag(&mut self, _: &InputEvent<NodeId>, data: &DraggableData<NodeId>) -> Outcome {
        println!(
            "drag   to ({:>5.1}, {:>5.1}) by ({:>5.1}, {:>5.1})",
            data.x, data.y, data.delta_x, data.delta_y
        );
        Outcome::Continue
    }

    fn on_stop(&mut self, _: &InputEvent<NodeId>, data: &DraggableData<NodeId>) -> Outcome {
        println!("stop   at ({:>5.1}, {:>5.1})", data.x, data.y);
        Outcome::Continue
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let mut host = HeadlessHost::new(Size::new(800.0, 600.0));
    let body = host.body_id();
    let card = host.insert(
        body,
        HeadlessNode::element("div")
            .with_class("card")
            .with_rect(Rect::new(100.0, 100.0, 220.0, 180.0)),
    );

    let mut core = DraggableCore::new(CoreOptions {
        drag_start_threshold: 8.0,
        ..CoreOptions::default()
    });
    core.mount(card);
    println!("start listeners: {:?}", core.start_listeners(&host));

    let mut printer = Printer;
    let pointer = |x, y| InputEvent::pointer(Some(card), 1, PointerType::Mouse, Point::new(x, y));

    core.on_pointer_down(&mut host, &mut printer, &pointer(120.0, 120.0));
    // Inside the threshold: nothing is reported yet.
    core.on_pointer_move(&mut host, &mut printer, &pointer(124.0, 122.0));
    for step in 1..=5 {
        let step = f64::from(step);
        core.on_pointer_move(
            &mut host,
            &mut printer,
            &pointer(120.0 + 6.0 * step, 120.0 + 2.0 * step),
        );
    }
    core.on_pointer_up(&mut host, &mut printer, &pointer(150.0, 130.0));

    println!("host calls:");
    for call in host.calls() {
        println!("  {call:?}");
    }
}
