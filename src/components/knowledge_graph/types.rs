use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A point in either world or screen space; which one is up to the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate, growing rightwards.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

impl Point {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// World-space position of every laid-out node, keyed by node id.
pub type Positions = HashMap<String, Point>;

/// Closed set of node categories. Declaration order is the ring order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// The anchor drug, drawn at the center.
	Drug,
	/// Protein targets; also used for literature.
	Protein,
	/// Pathways; also used for clinical trials.
	Pathway,
	/// Disease indications.
	Disease,
	/// Patents, on the outermost ring.
	Patent,
}

/// How a category is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
	/// Ring stroke, core fill and legend swatch.
	pub color: &'static str,
	/// Translucent fill behind the ring.
	pub halo: &'static str,
	/// Disc radius in world units.
	pub radius: f64,
}

impl NodeKind {
	/// Canonical ordering, innermost ring first.
	pub const ALL: [NodeKind; 5] = [
		NodeKind::Drug,
		NodeKind::Protein,
		NodeKind::Pathway,
		NodeKind::Disease,
		NodeKind::Patent,
	];

	/// Index into the ring table.
	pub fn ring(self) -> usize {
		self as usize
	}

	/// Lowercase name, as serialized.
	pub fn name(self) -> &'static str {
		match self {
			NodeKind::Drug => "drug",
			NodeKind::Protein => "protein",
			NodeKind::Pathway => "pathway",
			NodeKind::Disease => "disease",
			NodeKind::Patent => "patent",
		}
	}

	/// Visual style for this category.
	pub fn style(self) -> NodeStyle {
		match self {
			NodeKind::Drug => NodeStyle {
				color: "#0ea5e9",
				halo: "rgba(14, 165, 233, 0.2)",
				radius: 24.0,
			},
			NodeKind::Protein => NodeStyle {
				color: "#a855f7",
				halo: "rgba(168, 85, 247, 0.2)",
				radius: 18.0,
			},
			NodeKind::Pathway => NodeStyle {
				color: "#22c55e",
				halo: "rgba(34, 197, 94, 0.2)",
				radius: 20.0,
			},
			NodeKind::Disease => NodeStyle {
				color: "#f97316",
				halo: "rgba(249, 115, 22, 0.2)",
				radius: 22.0,
			},
			NodeKind::Patent => NodeStyle {
				color: "#eab308",
				halo: "rgba(234, 179, 8, 0.2)",
				radius: 16.0,
			},
		}
	}
}

/// Category/color pairs in ring order, for legend swatches.
pub fn legend() -> impl Iterator<Item = (NodeKind, &'static str)> {
	NodeKind::ALL.into_iter().map(|kind| (kind, kind.style().color))
}

/// A diagram node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	/// Unique within a graph.
	pub id: String,
	/// Display text, truncated when drawn.
	pub label: String,
	/// Category, serialized as `type`.
	#[serde(rename = "type")]
	pub kind: NodeKind,
	/// External reference opened by the host on click.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
	/// Opaque payload handed back to the click callback untouched.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub metadata: Option<serde_json::Value>,
}

/// Link between two node ids. Edges with an unknown endpoint are not drawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	/// Id of the first endpoint.
	pub source: String,
	/// Id of the second endpoint.
	pub target: String,
	/// Thickness and opacity in `[0, 1]`.
	pub weight: f64,
}

/// Nodes in draw and hit-test order, plus edges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	/// Node list.
	pub nodes: Vec<GraphNode>,
	/// Edge list.
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	/// Looks up a node by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|node| node.id == id)
	}

	/// True when both graphs carry exactly the same node ids, in any order.
	pub fn same_node_ids(&self, other: &GraphData) -> bool {
		if self.nodes.len() != other.nodes.len() {
			return false;
		}
		let mut ours: Vec<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
		let mut theirs: Vec<&str> = other.nodes.iter().map(|n| n.id.as_str()).collect();
		ours.sort_unstable();
		theirs.sort_unstable();
		ours == theirs
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn legend_follows_ring_order() {
		let names: Vec<_> = legend().map(|(kind, _)| kind.name()).collect();
		assert_eq!(names, ["drug", "protein", "pathway", "disease", "patent"]);
		assert!(legend().all(|(kind, color)| kind.style().color == color));
		for (ring, kind) in NodeKind::ALL.into_iter().enumerate() {
			assert_eq!(kind.ring(), ring);
		}
	}

	#[test]
	fn unknown_kind_is_rejected() {
		let json = r#"{"nodes":[{"id":"a","label":"A","type":"enzyme"}],"edges":[]}"#;
		assert!(serde_json::from_str::<GraphData>(json).is_err());
	}

	#[test]
	fn metadata_passes_through() {
		let json = r#"{
			"nodes": [{"id": "patent:0", "label": "P", "type": "patent",
				"url": "https://example.org/p", "metadata": {"assignee": "Acme", "year": 2022}}],
			"edges": [{"source": "drug:x", "target": "patent:0", "weight": 1.0}]
		}"#;
		let graph: GraphData = serde_json::from_str(json).unwrap();
		let node = &graph.nodes[0];
		assert_eq!(node.kind, NodeKind::Patent);
		assert_eq!(node.url.as_deref(), Some("https://example.org/p"));
		assert_eq!(node.metadata.as_ref().unwrap()["assignee"], "Acme");
	}

	#[test]
	fn node_id_set_comparison_ignores_order() {
		let node = |id: &str| GraphNode {
			id: id.into(),
			label: id.into(),
			kind: NodeKind::Drug,
			url: None,
			metadata: None,
		};
		let a = GraphData {
			nodes: vec![node("a"), node("b")],
			edges: vec![],
		};
		let b = GraphData {
			nodes: vec![node("b"), node("a")],
			edges: vec![],
		};
		let c = GraphData {
			nodes: vec![node("a"), node("c")],
			edges: vec![],
		};
		assert!(a.same_node_ids(&b));
		assert!(!a.same_node_ids(&c));
	}
}
