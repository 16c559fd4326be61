use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::hit_test::node_at;
use super::layout::compute_positions;
use super::render::Frame;
use super::types::{GraphData, GraphNode, Point, Positions};
use super::viewport::{Viewport, WHEEL_STEP};

/// Surface size used when the container reports none.
pub const DEFAULT_WIDTH: f64 = 800.0;
pub const DEFAULT_HEIGHT: f64 = 600.0;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct DragState {
	active: bool,
	/// Pointer position minus offset at drag start.
	anchor: Point,
}

/// Pointer affordance over the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
	/// Over a node.
	Pointer,
	/// Over empty space.
	Grab,
	/// Panning.
	Grabbing,
}

impl Cursor {
	/// CSS `cursor` value.
	pub fn css(self) -> &'static str {
		match self {
			Cursor::Pointer => "pointer",
			Cursor::Grab => "grab",
			Cursor::Grabbing => "grabbing",
		}
	}
}

/// Sole owner of layout, viewport and pointer interaction state.
pub struct KnowledgeGraphState<R = SmallRng> {
	graph: GraphData,
	positions: Positions,
	viewport: Viewport,
	hovered: Option<String>,
	selected: Option<String>,
	drag: DragState,
	width: f64,
	height: f64,
	rng: R,
}

impl KnowledgeGraphState<SmallRng> {
	/// Lays `graph` out on a `width` x `height` surface with an entropy-seeded rng.
	pub fn new(graph: GraphData, width: f64, height: f64) -> Self {
		Self::with_rng(graph, width, height, SmallRng::from_entropy())
	}
}

impl<R: Rng> KnowledgeGraphState<R> {
	/// Like `new`, with the jitter drawn from `rng`.
	pub fn with_rng(graph: GraphData, width: f64, height: f64, rng: R) -> Self {
		let mut state = Self {
			graph,
			positions: Positions::new(),
			viewport: Viewport::default(),
			hovered: None,
			selected: None,
			drag: DragState::default(),
			width,
			height,
			rng,
		};
		state.relayout();
		state
	}

	/// Graph currently shown.
	pub fn graph(&self) -> &GraphData {
		&self.graph
	}

	/// World position of every node.
	pub fn positions(&self) -> &Positions {
		&self.positions
	}

	/// Current pan and zoom.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// True between a pointer-down on empty space and the matching up or leave.
	pub fn is_dragging(&self) -> bool {
		self.drag.active
	}

	/// Node under the pointer, if any.
	pub fn hovered_node(&self) -> Option<&GraphNode> {
		self.hovered.as_deref().and_then(|id| self.graph.node(id))
	}

	/// Last clicked node, until cleared.
	pub fn selected_node(&self) -> Option<&GraphNode> {
		self.selected.as_deref().and_then(|id| self.graph.node(id))
	}

	/// Cursor for the current hover and drag state.
	pub fn cursor(&self) -> Cursor {
		if self.drag.active {
			Cursor::Grabbing
		} else if self.hovered.is_some() {
			Cursor::Pointer
		} else {
			Cursor::Grab
		}
	}

	/// Replaces the graph. Layout is recomputed only if the node id set changed.
	pub fn set_graph(&mut self, graph: GraphData) -> bool {
		let changed = !self.graph.same_node_ids(&graph);
		self.graph = graph;
		if changed {
			self.relayout();
		}
		if self.hovered.as_deref().is_some_and(|id| self.graph.node(id).is_none()) {
			self.hovered = None;
		}
		if self.selected.as_deref().is_some_and(|id| self.graph.node(id).is_none()) {
			self.selected = None;
		}
		changed
	}

	/// Fresh ring layout around the surface center.
	pub fn relayout(&mut self) {
		let center = Point::new(self.width / 2.0, self.height / 2.0);
		self.positions = compute_positions(&self.graph.nodes, center, &mut self.rng);
		info!(
			"laid out {} nodes around ({}, {})",
			self.positions.len(),
			center.x,
			center.y
		);
	}

	/// See [`Viewport::zoom_in`].
	pub fn zoom_in(&mut self) {
		self.viewport.zoom_in();
	}

	/// See [`Viewport::zoom_out`].
	pub fn zoom_out(&mut self) {
		self.viewport.zoom_out();
	}

	/// One wheel notch; `delta_y > 0` zooms out, zero (horizontal scroll) is ignored.
	pub fn wheel(&mut self, screen: Point, delta_y: f64) {
		if delta_y == 0.0 {
			return;
		}
		let factor = if delta_y > 0.0 { 1.0 / WHEEL_STEP } else { WHEEL_STEP };
		self.viewport.zoom_at(screen, factor);
	}

	/// Identity viewport plus a fresh layout.
	pub fn reset(&mut self) {
		self.viewport.reset();
		self.drag = DragState::default();
		self.relayout();
	}

	fn hit(&self, screen: Point) -> Option<&GraphNode> {
		node_at(
			&self.graph,
			&self.positions,
			self.viewport.screen_to_world(screen),
			self.hovered.as_deref(),
			self.selected.as_deref(),
		)
	}

	/// Selects the node under `screen` and returns it for the click callback,
	/// or starts a pan when the pointer is over empty space.
	pub fn pointer_down(&mut self, screen: Point) -> Option<GraphNode> {
		if let Some(node) = self.hit(screen).cloned() {
			debug!("selected node {}", node.id);
			self.selected = Some(node.id.clone());
			self.hovered = Some(node.id.clone());
			return Some(node);
		}
		self.drag = DragState {
			active: true,
			anchor: Point::new(
				screen.x - self.viewport.offset.x,
				screen.y - self.viewport.offset.y,
			),
		};
		None
	}

	/// Pans while dragging, otherwise updates the hovered node.
	pub fn pointer_move(&mut self, screen: Point) {
		if self.drag.active {
			self.viewport.offset = Point::new(
				screen.x - self.drag.anchor.x,
				screen.y - self.drag.anchor.y,
			);
			return;
		}
		self.hovered = self.hit(screen).map(|node| node.id.clone());
	}

	/// Ends any drag.
	pub fn pointer_up(&mut self) {
		self.drag.active = false;
	}

	/// Ends any drag and clears hover.
	pub fn pointer_leave(&mut self) {
		self.drag.active = false;
		self.hovered = None;
	}

	/// Drops the selection without touching hover or drag.
	pub fn clear_selection(&mut self) {
		self.selected = None;
	}

	/// Layout center stays where it was; only the surface size changes.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Snapshot for [`render`](super::render::render).
	pub fn frame(&self) -> Frame<'_> {
		Frame {
			graph: &self.graph,
			positions: &self.positions,
			viewport: self.viewport,
			hovered: self.hovered.as_deref(),
			selected: self.selected.as_deref(),
			width: self.width,
			height: self.height,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use rand::rngs::StdRng;

	use super::*;
	use crate::components::knowledge_graph::layout::RING_RADII;
	use crate::components::knowledge_graph::render::render;
	use crate::components::knowledge_graph::render::tests::Recorder;
	use crate::components::knowledge_graph::types::{GraphEdge, NodeKind};

	fn drug_with_patents() -> GraphData {
		let node = |id: &str, kind| GraphNode {
			id: id.into(),
			label: id.into(),
			kind,
			url: None,
			metadata: Some(serde_json::json!({ "source": id })),
		};
		let mut graph = GraphData {
			nodes: vec![node("drug:metformin", NodeKind::Drug)],
			edges: vec![],
		};
		for i in 0..3 {
			let id = format!("patent:{i}");
			graph.nodes.push(node(&id, NodeKind::Patent));
			graph.edges.push(GraphEdge {
				source: "drug:metformin".into(),
				target: id,
				weight: 1.0,
			});
		}
		graph
	}

	fn state() -> KnowledgeGraphState<StdRng> {
		KnowledgeGraphState::with_rng(drug_with_patents(), 800.0, 600.0, StdRng::seed_from_u64(9))
	}

	fn screen_of(state: &KnowledgeGraphState<StdRng>, id: &str) -> Point {
		state.viewport().world_to_screen(state.positions()[id])
	}

	fn empty_spot(state: &KnowledgeGraphState<StdRng>) -> Point {
		// between the drug ring and the patent ring
		state.viewport().world_to_screen(Point::new(400.0 + 180.0, 300.0 + 180.0))
	}

	#[test]
	fn clicking_the_drug_reports_it() {
		let mut s = state();
		let mut surface = Recorder::default();
		let stats = render(&s.frame(), &mut surface);
		assert_eq!((stats.edges, stats.nodes), (3, 4));

		let clicked = s.pointer_down(screen_of(&s, "drug:metformin"));
		let node = clicked.expect("drug node should be hit");
		assert_eq!(node.id, "drug:metformin");
		assert_eq!(node.metadata, Some(serde_json::json!({ "source": "drug:metformin" })));
		assert_eq!(s.selected_node().map(|n| n.id.as_str()), Some("drug:metformin"));
		assert!(!s.is_dragging());
	}

	#[test]
	fn hit_test_tracks_the_viewport() {
		let mut s = state();
		s.zoom_in();
		s.zoom_in();
		s.pointer_down(empty_spot(&s));
		s.pointer_move(Point::new(empty_spot(&s).x + 35.0, empty_spot(&s).y - 20.0));
		s.pointer_up();
		for id in ["drug:metformin", "patent:0", "patent:1", "patent:2"] {
			let at = screen_of(&s, id);
			assert_eq!(s.pointer_down(at).map(|n| n.id), Some(id.to_string()));
		}
	}

	#[test]
	fn dragging_empty_space_pans_without_callback() {
		let mut s = state();
		let before = s.positions().clone();
		let start = empty_spot(&s);
		assert!(s.pointer_down(start).is_none());
		assert!(s.is_dragging());
		assert_eq!(s.cursor(), Cursor::Grabbing);

		s.pointer_move(Point::new(start.x + 40.0, start.y - 25.0));
		assert_eq!(s.viewport().offset, Point::new(40.0, -25.0));
		// pointer is now over the drug's screen position; dragging must not hover it
		s.pointer_move(screen_of(&s, "drug:metformin"));
		assert!(s.hovered_node().is_none());
		assert_eq!(s.cursor(), Cursor::Grabbing);
		s.pointer_move(Point::new(start.x + 10.0, start.y + 5.0));
		assert_eq!(s.viewport().offset, Point::new(10.0, 5.0));
		assert_eq!(s.viewport().scale, 1.0);
		s.pointer_up();

		assert!(!s.is_dragging());
		assert!(s.selected_node().is_none());
		assert_eq!(s.positions(), &before);
		s.pointer_move(Point::new(start.x + 100.0, start.y));
		assert_eq!(s.viewport().offset, Point::new(10.0, 5.0));
	}

	#[test]
	fn second_drag_continues_from_current_offset() {
		let mut s = state();
		let start = empty_spot(&s);
		s.pointer_down(start);
		s.pointer_move(Point::new(start.x + 20.0, start.y));
		s.pointer_leave();
		let start = empty_spot(&s);
		s.pointer_down(start);
		s.pointer_move(Point::new(start.x, start.y + 30.0));
		s.pointer_up();
		assert_eq!(s.viewport().offset, Point::new(20.0, 30.0));
	}

	#[test]
	fn zoom_never_moves_nodes() {
		let mut s = state();
		let before = s.positions().clone();
		for _ in 0..5 {
			s.zoom_in();
		}
		s.wheel(Point::new(100.0, 100.0), 3.0);
		s.zoom_out();
		assert_eq!(s.positions(), &before);
	}

	#[test]
	fn horizontal_wheel_leaves_zoom_alone() {
		let mut s = state();
		s.wheel(Point::new(100.0, 100.0), 0.0);
		assert_eq!(s.viewport(), Viewport::default());
		s.wheel(Point::new(100.0, 100.0), -1.0);
		assert!((s.viewport().scale - WHEEL_STEP).abs() < 1e-12);
		s.wheel(Point::new(100.0, 100.0), 1.0);
		assert!((s.viewport().scale - 1.0).abs() < 1e-12);
	}

	#[test]
	fn hover_drives_cursor() {
		let mut s = state();
		s.pointer_move(screen_of(&s, "patent:1"));
		assert_eq!(s.hovered_node().map(|n| n.id.as_str()), Some("patent:1"));
		assert_eq!(s.cursor(), Cursor::Pointer);
		s.pointer_move(empty_spot(&s));
		assert!(s.hovered_node().is_none());
		assert_eq!(s.cursor().css(), "grab");
		s.pointer_move(screen_of(&s, "patent:1"));
		s.pointer_leave();
		assert!(s.hovered_node().is_none());
	}

	#[test]
	fn selection_clears_independently() {
		let mut s = state();
		s.pointer_down(screen_of(&s, "patent:2"));
		s.pointer_move(screen_of(&s, "patent:2"));
		s.clear_selection();
		assert!(s.selected_node().is_none());
		assert_eq!(s.hovered_node().map(|n| n.id.as_str()), Some("patent:2"));
	}

	#[test]
	fn reset_restores_view_and_relayouts_same_rings() {
		let mut s = state();
		let ring_of = |s: &KnowledgeGraphState<StdRng>| {
			s.graph()
				.nodes
				.iter()
				.map(|n| {
					let d = s.positions()[&n.id].distance(Point::new(400.0, 300.0));
					let ring = RING_RADII
						.iter()
						.enumerate()
						.min_by(|a, b| (a.1 - d).abs().total_cmp(&(b.1 - d).abs()))
						.map(|(i, _)| i);
					(n.id.clone(), ring)
				})
				.collect::<Vec<_>>()
		};
		let keys = |s: &KnowledgeGraphState<StdRng>| s.positions().keys().cloned().collect::<BTreeSet<_>>();
		let (initial_keys, initial_rings) = (keys(&s), ring_of(&s));

		s.zoom_in();
		s.pointer_down(empty_spot(&s));
		s.pointer_move(Point::new(0.0, 0.0));
		s.reset();

		assert_eq!(s.viewport(), Viewport::default());
		assert!(!s.is_dragging());
		assert_eq!(keys(&s), initial_keys);
		assert_eq!(ring_of(&s), initial_rings);
	}

	#[test]
	fn replacing_graph_relayouts_only_on_new_ids() {
		let mut s = state();
		let before = s.positions().clone();
		let mut same_ids = drug_with_patents();
		same_ids.edges.clear();
		assert!(!s.set_graph(same_ids));
		assert_eq!(s.positions(), &before);

		s.pointer_down(screen_of(&s, "patent:2"));
		s.pointer_move(screen_of(&s, "patent:2"));
		assert!(s.hovered_node().is_some());
		let mut fewer = drug_with_patents();
		fewer.nodes.truncate(2);
		assert!(s.set_graph(fewer));
		assert_eq!(s.positions().len(), 2);
		assert!(s.selected_node().is_none());
		assert!(s.hovered_node().is_none());
		assert_eq!(s.cursor(), Cursor::Grab);
	}

	#[test]
	fn resize_keeps_layout() {
		let mut s = state();
		let before = s.positions().clone();
		s.resize(1024.0, 400.0);
		assert_eq!(s.positions(), &before);
		let frame = s.frame();
		assert_eq!((frame.width, frame.height), (1024.0, 400.0));
	}
}
