use std::borrow::Cow;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::hit_test::node_radius;
use super::types::{GraphData, Point, Positions};
use super::viewport::Viewport;

/// Labels are always drawn above this zoom scale.
pub const LABEL_SCALE_THRESHOLD: f64 = 0.8;
/// Longer labels are cut and end in an ellipsis.
pub const LABEL_MAX_CHARS: usize = 40;
const LABEL_FONT: &str = "11px Inter";
const LABEL_COLOR: &str = "#e2e8f0";
const LABEL_GAP: f64 = 14.0;
const SELECTED_RING: &str = "#fff";

/// Immediate-mode drawing primitives the render loop needs.
pub trait Surface {
	/// Wipes the whole surface.
	fn clear(&mut self, width: f64, height: f64);
	/// Applies `translate(offset)` then `scale(scale)` until `pop_transform`.
	fn push_transform(&mut self, offset: Point, scale: f64);
	/// Ends the innermost `push_transform`.
	fn pop_transform(&mut self);
	/// Straight stroked segment.
	fn line(&mut self, from: Point, to: Point, color: &str, width: f64);
	/// Solid disc.
	fn fill_circle(&mut self, center: Point, radius: f64, color: &str);
	/// Circle outline.
	fn stroke_circle(&mut self, center: Point, radius: f64, color: &str, width: f64);
	/// Draws `text` horizontally centered on `at`.
	fn text(&mut self, text: &str, at: Point, font: &str, color: &str);
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&mut self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn push_transform(&mut self, offset: Point, scale: f64) {
		self.save();
		let _ = self.translate(offset.x, offset.y);
		let _ = self.scale(scale, scale);
	}

	fn pop_transform(&mut self) {
		self.restore();
	}

	fn line(&mut self, from: Point, to: Point, color: &str, width: f64) {
		self.begin_path();
		self.move_to(from.x, from.y);
		self.line_to(to.x, to.y);
		self.set_stroke_style_str(color);
		self.set_line_width(width);
		self.stroke();
	}

	fn fill_circle(&mut self, center: Point, radius: f64, color: &str) {
		self.begin_path();
		let _ = self.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
		self.set_fill_style_str(color);
		self.fill();
	}

	fn stroke_circle(&mut self, center: Point, radius: f64, color: &str, width: f64) {
		self.begin_path();
		let _ = self.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
		self.set_stroke_style_str(color);
		self.set_line_width(width);
		self.stroke();
	}

	fn text(&mut self, text: &str, at: Point, font: &str, color: &str) {
		self.set_font(font);
		self.set_fill_style_str(color);
		self.set_text_align("center");
		let _ = self.fill_text(text, at.x, at.y);
	}
}

/// Everything one redraw depends on.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
	/// Nodes and edges to draw.
	pub graph: &'a GraphData,
	/// World positions; unpositioned nodes are skipped.
	pub positions: &'a Positions,
	/// Current pan and zoom.
	pub viewport: Viewport,
	/// Id of the node under the pointer.
	pub hovered: Option<&'a str>,
	/// Id of the selected node.
	pub selected: Option<&'a str>,
	/// Surface width in pixels.
	pub width: f64,
	/// Surface height in pixels.
	pub height: f64,
}

/// What a single `render` call drew.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
	/// Edges with both endpoints positioned.
	pub edges: usize,
	/// Positioned nodes.
	pub nodes: usize,
	/// Labels drawn under nodes.
	pub labels: usize,
}

/// Clears the surface, then draws edges and nodes under the viewport transform.
pub fn render<S: Surface + ?Sized>(frame: &Frame<'_>, surface: &mut S) -> RenderStats {
	let mut stats = RenderStats::default();
	surface.clear(frame.width, frame.height);
	surface.push_transform(frame.viewport.offset, frame.viewport.scale);
	stats.edges = draw_edges(frame, surface);
	let (nodes, labels) = draw_nodes(frame, surface);
	stats.nodes = nodes;
	stats.labels = labels;
	surface.pop_transform();
	stats
}

fn draw_edges<S: Surface + ?Sized>(frame: &Frame<'_>, surface: &mut S) -> usize {
	let mut drawn = 0;
	for edge in &frame.graph.edges {
		// stale endpoints are skipped
		let (Some(&from), Some(&to)) = (
			frame.positions.get(&edge.source),
			frame.positions.get(&edge.target),
		) else {
			continue;
		};
		let weight = edge.weight.clamp(0.0, 1.0);
		let color = format!("rgba(100, 116, 139, {})", 0.2 + weight * 0.3);
		surface.line(from, to, &color, 1.0 + weight);
		drawn += 1;
	}
	drawn
}

fn draw_nodes<S: Surface + ?Sized>(frame: &Frame<'_>, surface: &mut S) -> (usize, usize) {
	let (mut nodes, mut labels) = (0, 0);
	for node in &frame.graph.nodes {
		let Some(&pos) = frame.positions.get(&node.id) else {
			continue;
		};
		let style = node.kind.style();
		let is_hovered = frame.hovered == Some(node.id.as_str());
		let is_selected = frame.selected == Some(node.id.as_str());
		let radius = node_radius(node, is_hovered || is_selected);

		surface.fill_circle(pos, radius, style.halo);
		if is_selected {
			surface.stroke_circle(pos, radius, SELECTED_RING, 3.0);
		} else {
			surface.stroke_circle(pos, radius, style.color, 2.0);
		}
		surface.fill_circle(pos, radius * 0.5, style.color);
		nodes += 1;

		if is_hovered || is_selected || frame.viewport.scale > LABEL_SCALE_THRESHOLD {
			let at = Point::new(pos.x, pos.y + radius + LABEL_GAP);
			surface.text(
				&truncate_label(&node.label, LABEL_MAX_CHARS),
				at,
				LABEL_FONT,
				LABEL_COLOR,
			);
			labels += 1;
		}
	}
	(nodes, labels)
}

/// `label` cut to `max_chars` characters, with a trailing ellipsis when cut.
pub fn truncate_label(label: &str, max_chars: usize) -> Cow<'_, str> {
	match label.char_indices().nth(max_chars) {
		None => Cow::Borrowed(label),
		Some((end, _)) => Cow::Owned(format!("{}…", &label[..end])),
	}
}
