use std::f64::consts::PI;

use rand::Rng;

use super::types::{GraphNode, NodeKind, Point, Positions};

/// Ring radius per category, indexed by `NodeKind::ring`.
pub const RING_RADII: [f64; 5] = [0.0, 120.0, 200.0, 280.0, 350.0];
/// Jitter is uniform in `[-JITTER, JITTER]` on each axis.
pub const JITTER: f64 = 15.0;

/// Places every node on its category's ring around `center`.
///
/// Members of a category are spread at equal angles in graph order, then
/// nudged by independent x/y jitter drawn from `rng`. Seeding `rng` makes
/// the result reproducible.
pub fn compute_positions<R: Rng + ?Sized>(
	nodes: &[GraphNode],
	center: Point,
	rng: &mut R,
) -> Positions {
	let mut positions = Positions::with_capacity(nodes.len());

	for kind in NodeKind::ALL {
		let members: Vec<&GraphNode> = nodes.iter().filter(|n| n.kind == kind).collect();
		let radius = RING_RADII[kind.ring()];
		let step = 2.0 * PI / members.len().max(1) as f64;

		for (i, node) in members.into_iter().enumerate() {
			let angle = step * i as f64;
			let (jx, jy) = (
				rng.gen_range(-JITTER..=JITTER),
				rng.gen_range(-JITTER..=JITTER),
			);
			positions.insert(
				node.id.clone(),
				Point::new(
					center.x + radius * angle.cos() + jx,
					center.y + radius * angle.sin() + jy,
				),
			);
		}
	}

	positions
}
