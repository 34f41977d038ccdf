use std::cell::RefCell;
use std::rc::Rc;

use leptos::html;
use leptos::prelude::*;
use log::{debug, error, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, HtmlDivElement, MouseEvent, ResizeObserver,
	WheelEvent,
};

use super::frame::FrameLoop;
use super::render;
use super::snapshot::SnapshotIssue;
use super::state::{ForceGraphState, GraphConfig, Lifecycle};
use super::types::{GraphData, GraphNode};

/// How tall the graph is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GraphHeight {
	/// Fixed height in CSS pixels.
	Fixed(f64),
	/// Take the height of the parent element.
	FillParent,
}

impl Default for GraphHeight {
	fn default() -> Self {
		Self::Fixed(600.0)
	}
}

impl GraphHeight {
	fn css(self) -> String {
		match self {
			Self::Fixed(px) => format!("height: {px}px;"),
			Self::FillParent => "height: 100%;".into(),
		}
	}
}

/// Interactive force-directed graph of notes.
///
/// Each new value of `data` discards the running layout and starts a fresh
/// one. Clicking a node hands its data to `on_node_click`; problems found in
/// the data (edges to unknown notes and the like) go to `on_diagnostic`.
#[component]
pub fn GraphView(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] on_node_click: Option<Callback<GraphNode>>,
	#[prop(optional)] on_diagnostic: Option<Callback<SnapshotIssue>>,
	#[prop(optional)] height: GraphHeight,
	#[prop(optional)] config: GraphConfig,
) -> impl IntoView {
	let container_ref = NodeRef::<html::Div>::new();
	let canvas_ref = NodeRef::<html::Canvas>::new();
	let state = Rc::new(RefCell::new(ForceGraphState::new(config)));
	let frames = FrameLoop::default();
	let watcher: Rc<RefCell<Option<SizeWatcher>>> = Rc::default();

	let (state_fx, frames_fx, watcher_fx) = (state.clone(), frames.clone(), watcher.clone());
	Effect::new(move |_| {
		let snapshot = data.get();
		let (Some(container), Some(canvas)) = (container_ref.get(), canvas_ref.get()) else {
			return;
		};
		let Some(ctx) = context_2d(&canvas) else {
			return;
		};

		// the previous generation must not tick again
		frames_fx.stop();
		let issues = {
			let mut s = state_fx.borrow_mut();
			let issues = s.load(&snapshot);
			fit(&mut s, &container, &canvas, height);
			issues
		};
		if let Some(cb) = on_diagnostic {
			for issue in issues {
				cb.run(issue);
			}
		}

		let (state_frame, container_frame, canvas_frame) =
			(state_fx.clone(), container.clone(), canvas.clone());
		let started = js_sys::Date::now();
		let mut reported = false;
		frames_fx.install(move || {
			let mut s = state_frame.borrow_mut();
			if !s.has_surface() {
				fit(&mut s, &container_frame, &canvas_frame, height);
			}
			if s.tick() {
				render::render(&s, &ctx);
			}
			if !reported && s.lifecycle() == Lifecycle::Settled {
				reported = true;
				debug!(
					"layout {} settled after {:.0}ms",
					s.generation(),
					js_sys::Date::now() - started
				);
			}
			s.wants_frames()
		});
		frames_fx.wake();

		if watcher_fx.borrow().is_none() {
			let (state_rs, frames_rs, container_rs) =
				(state_fx.clone(), frames_fx.clone(), container.clone());
			let on_resize = move || {
				fit(&mut state_rs.borrow_mut(), &container_rs, &canvas, height);
				frames_rs.wake();
			};
			*watcher_fx.borrow_mut() = SizeWatcher::install(&container, on_resize);
		}
	});

	let teardown = SendWrapper::new((state.clone(), frames.clone(), watcher));
	on_cleanup(move || {
		let (state, frames, watcher) = teardown.take();
		frames.stop();
		state.borrow_mut().unmount();
		if let Some(watcher) = watcher.borrow_mut().take() {
			watcher.disconnect();
		}
		debug!("graph view cleaned up");
	});

	let local_point = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let canvas = canvas_ref.get()?;
		let rect = canvas.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let (state_md, frames_md) = (state.clone(), frames.clone());
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = local_point(&ev) {
			let mut s = state_md.borrow_mut();
			s.pointer_down(x, y);
			set_cursor(canvas_ref, &s);
			frames_md.wake();
		}
	};

	let (state_mm, frames_mm) = (state.clone(), frames.clone());
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = local_point(&ev) {
			let mut s = state_mm.borrow_mut();
			s.pointer_move(x, y);
			set_cursor(canvas_ref, &s);
			frames_mm.wake();
		}
	};

	let (state_mu, frames_mu) = (state.clone(), frames.clone());
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		let clicked = {
			let mut s = state_mu.borrow_mut();
			let clicked = s.pointer_up(x, y);
			set_cursor(canvas_ref, &s);
			clicked
		};
		frames_mu.wake();
		if let (Some(node), Some(cb)) = (clicked, on_node_click) {
			cb.run(node);
		}
	};

	let (state_ml, frames_ml) = (state.clone(), frames.clone());
	let on_mouseleave = move |_: MouseEvent| {
		let mut s = state_ml.borrow_mut();
		s.pointer_leave();
		set_cursor(canvas_ref, &s);
		frames_ml.wake();
	};

	let (state_wh, frames_wh) = (state, frames);
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let mouse: &MouseEvent = &ev;
		if let Some((x, y)) = local_point(mouse) {
			state_wh.borrow_mut().wheel(x, y, ev.delta_y());
			frames_wh.wake();
		}
	};

	view! {
		<div
			node_ref=container_ref
			class="graph-container"
			style=format!("position: relative; width: 100%; {}", height.css())
		>
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
		</div>
	}
}

/// Re-measures the graph whenever its container changes size, whether
/// from a window resize or a layout change around it.
struct SizeWatcher {
	observer: ResizeObserver,
	_callback: Closure<dyn FnMut()>,
}

impl SizeWatcher {
	fn install(container: &HtmlDivElement, on_resize: impl FnMut() + 'static) -> Option<Self> {
		let callback = Closure::<dyn FnMut()>::new(on_resize);
		let observer = match ResizeObserver::new(callback.as_ref().unchecked_ref()) {
			Ok(observer) => observer,
			Err(err) => {
				error!("could not create a ResizeObserver: {:?}", err);
				return None;
			}
		};
		observer.observe(container);
		Some(Self {
			observer,
			_callback: callback,
		})
	}

	fn disconnect(self) {
		self.observer.disconnect();
	}
}

fn set_cursor(canvas_ref: NodeRef<html::Canvas>, state: &ForceGraphState) {
	let Some(canvas) = canvas_ref.get_untracked() else {
		return;
	};
	if let Err(err) = web_sys::HtmlElement::style(&canvas).set_property("cursor", state.cursor()) {
		warn!("could not set cursor: {:?}", err);
	}
}

/// Measure the container and size the canvas to it.
fn fit(
	state: &mut ForceGraphState,
	container: &HtmlDivElement,
	canvas: &HtmlCanvasElement,
	height: GraphHeight,
) {
	let w = container.client_width() as f64;
	let h = match height {
		GraphHeight::Fixed(px) => px,
		GraphHeight::FillParent => container.client_height() as f64,
	};
	if w > 0.0 && h > 0.0 && (canvas.width() != w as u32 || canvas.height() != h as u32) {
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
	}
	state.resize(w, h);
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	match canvas.get_context("2d") {
		Ok(Some(ctx)) => match ctx.dyn_into::<CanvasRenderingContext2d>() {
			Ok(ctx) => Some(ctx),
			Err(_) => {
				error!("2d context has an unexpected type");
				None
			}
		},
		Ok(None) => {
			error!("canvas has no 2d context");
			None
		}
		Err(err) => {
			error!("getContext failed: {:?}", err);
			None
		}
	}
}
