use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::error::GraphError;
use super::legend::GraphLegend;
use super::render;
use super::state::{Cursor, DEFAULT_HEIGHT, DEFAULT_WIDTH, KnowledgeGraphState};
use super::types::{GraphData, GraphNode, Point};

/// Controller state plus the surface it is drawn on.
struct GraphView {
	state: KnowledgeGraphState,
	ctx: Option<CanvasRenderingContext2d>,
}

impl GraphView {
	fn draw(&mut self) {
		// not mounted yet, or no 2d context: nothing to draw on
		let Some(ctx) = self.ctx.as_mut() else {
			return;
		};
		render::render(&self.state.frame(), ctx);
	}
}

type Slot = Rc<RefCell<Option<GraphView>>>;

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, GraphError> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		.ok_or(GraphError::ContextUnavailable)
}

fn surface_size(canvas: &HtmlCanvasElement, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	let parent = canvas.parent_element();
	let measured_w = parent.as_ref().map(|p| p.client_width() as f64).filter(|w| *w > 0.0);
	let measured_h = parent.as_ref().map(|p| p.client_height() as f64).filter(|h| *h > 0.0);
	(
		width.or(measured_w).unwrap_or(DEFAULT_WIDTH),
		height.or(measured_h).unwrap_or(DEFAULT_HEIGHT),
	)
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<Point> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some(Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Redraws and mirrors selection and cursor into the reactive UI.
fn refresh(slot: &Slot, selected: RwSignal<Option<GraphNode>>, cursor: RwSignal<Cursor>) {
	let (next_selected, next_cursor) = {
		let mut slot = slot.borrow_mut();
		let Some(view) = slot.as_mut() else {
			return;
		};
		view.draw();
		(view.state.selected_node().cloned(), view.state.cursor())
	};
	if selected.get_untracked() != next_selected {
		selected.set(next_selected);
	}
	if cursor.get_untracked() != next_cursor {
		cursor.set(next_cursor);
	}
}

/// Pan/zoom canvas of `graph` with zoom controls, a legend and a details strip
/// for the selected node.
#[component]
pub fn KnowledgeGraphCanvas(
	/// Graph to show; a change to its node id set recomputes the layout.
	#[prop(into)]
	graph: Signal<GraphData>,
	/// Called with the node under the pointer on mousedown.
	#[prop(optional)]
	on_node_click: Option<Callback<GraphNode>>,
	/// Surface width; measured from the container when unset.
	#[prop(default = None)]
	width: Option<f64>,
	/// Surface height; measured from the container when unset.
	#[prop(default = None)]
	height: Option<f64>,
	/// Show the node type legend above the canvas.
	#[prop(default = true)]
	show_legend: bool,
	/// Covers the canvas with a loading placeholder while true.
	#[prop(into, default = Signal::stored(false))]
	is_loading: Signal<bool>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let slot: Slot = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let selected = RwSignal::new(None::<GraphNode>);
	let cursor = RwSignal::new(Cursor::Grab);
	let (slot_init, resize_cb_init) = (slot.clone(), resize_cb.clone());

	let resize_cb_cleanup = SendWrapper::new(resize_cb.clone());
	on_cleanup(move || {
		if let (Some(window), Some(cb)) = (web_sys::window(), resize_cb_cleanup.borrow().as_ref()) {
			let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	});

	Effect::new(move |_| {
		let data = graph.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let mounted = slot_init.borrow().is_some();
		if mounted {
			if let Some(view) = slot_init.borrow_mut().as_mut() {
				if view.state.set_graph(data) {
					info!("graph node set changed, layout recomputed");
				}
			}
		} else {
			let (w, h) = surface_size(&canvas, width, height);
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
			let ctx = context_2d(&canvas)
				.inspect_err(|err| warn!("{err}; knowledge graph will not be drawn"))
				.ok();
			*slot_init.borrow_mut() = Some(GraphView {
				state: KnowledgeGraphState::new(data, w, h),
				ctx,
			});

			let (slot_resize, canvas_resize) = (slot_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let (nw, nh) = surface_size(&canvas_resize, width, height);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(view) = slot_resize.borrow_mut().as_mut() {
					view.state.resize(nw, nh);
				}
				refresh(&slot_resize, selected, cursor);
			}));
			if let (Some(window), Some(cb)) = (web_sys::window(), resize_cb_init.borrow().as_ref()) {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		refresh(&slot_init, selected, cursor);
	});

	let slot_md = slot.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(at) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		let clicked = slot_md
			.borrow_mut()
			.as_mut()
			.and_then(|view| view.state.pointer_down(at));
		refresh(&slot_md, selected, cursor);
		if let (Some(node), Some(on_node_click)) = (clicked, on_node_click) {
			on_node_click.run(node);
		}
	};

	let slot_mm = slot.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(at) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(view) = slot_mm.borrow_mut().as_mut() {
			view.state.pointer_move(at);
		}
		refresh(&slot_mm, selected, cursor);
	};

	let slot_mu = slot.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(view) = slot_mu.borrow_mut().as_mut() {
			view.state.pointer_up();
		}
		refresh(&slot_mu, selected, cursor);
	};

	let slot_ml = slot.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(view) = slot_ml.borrow_mut().as_mut() {
			view.state.pointer_leave();
		}
		refresh(&slot_ml, selected, cursor);
	};

	let slot_wh = slot.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(at) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(view) = slot_wh.borrow_mut().as_mut() {
			view.state.wheel(at, ev.delta_y());
		}
		refresh(&slot_wh, selected, cursor);
	};

	let command = move |slot: &Slot, apply: fn(&mut KnowledgeGraphState)| {
		let slot = slot.clone();
		move |_: MouseEvent| {
			if let Some(view) = slot.borrow_mut().as_mut() {
				apply(&mut view.state);
			}
			refresh(&slot, selected, cursor);
		}
	};
	let on_zoom_in = command(&slot, KnowledgeGraphState::zoom_in);
	let on_zoom_out = command(&slot, KnowledgeGraphState::zoom_out);
	let on_reset = command(&slot, KnowledgeGraphState::reset);
	let on_close = command(&slot, KnowledgeGraphState::clear_selection);

	let node_count = move || graph.with(|g| g.nodes.len());
	let details_style = move || {
		let display = if selected.with(Option::is_some) { "flex" } else { "none" };
		format!(
			"display: {display}; position: absolute; left: 1rem; right: 1rem; bottom: 1rem; \
			 justify-content: space-between; align-items: center;"
		)
	};
	let selected_swatch = move || {
		let color = selected.with(|n| n.as_ref().map(|n| n.kind.style().color).unwrap_or("transparent"));
		format!("background-color: {color};")
	};
	let loading_style = move || {
		let display = if is_loading.get() { "flex" } else { "none" };
		format!(
			"display: {display}; position: absolute; inset: 0; align-items: center; \
			 justify-content: center;"
		)
	};
	let selected_label = move || selected.with(|n| n.as_ref().map(|n| n.label.clone()).unwrap_or_default());
	let selected_kind = move || selected.with(|n| n.as_ref().map(|n| n.kind.name()).unwrap_or_default());

	view! {
		<div class="knowledge-graph">
			<div class="knowledge-graph-header">
				<h3>"Knowledge Graph"</h3>
				<span class="badge">{move || format!("{} nodes", node_count())}</span>
				<div class="knowledge-graph-controls">
					<button title="Zoom in" on:click=on_zoom_in>"+"</button>
					<button title="Zoom out" on:click=on_zoom_out>"−"</button>
					<button title="Reset layout" on:click=on_reset>"⟲"</button>
				</div>
			</div>
			{show_legend.then(|| view! { <GraphLegend /> })}
			<div class="knowledge-graph-viewport" style="position: relative; height: 400px; overflow: hidden;">
				<canvas
					node_ref=canvas_ref
					class="knowledge-graph-canvas"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:wheel=on_wheel
					style=move || {
						format!("display: block; width: 100%; height: 100%; cursor: {};", cursor.get().css())
					}
				/>
				<div class="knowledge-graph-loading" style=loading_style>"Loading graph..."</div>
				<div class="node-details" style=details_style>
					<div class="node-details-title">
						<span class="legend-swatch" style=selected_swatch></span>
						<span class="node-details-label">{selected_label}</span>
						<span class="badge">{selected_kind}</span>
					</div>
					<button on:click=on_close>"Close"</button>
				</div>
			</div>
		</div>
	}
}
