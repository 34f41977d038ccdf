//! What to draw for the current layout, independent of any drawing surface.

use super::scale::{COLORS, edge_opacity, edge_width, group_color};
use super::simulation::Simulation;
use super::snapshot::GraphSnapshot;

/// Colours and sizes of the rendered graph.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphStyle {
	/// `None` leaves the surface transparent.
	pub background: Option<String>,
	pub palette: &'static [&'static str],
	pub edge_color: String,
	pub highlight_color: String,
	pub edge_width_factor: f64,
	pub edge_opacity_base: f64,
	pub edge_opacity_gain: f64,
	/// Opacity of edges not touching the hovered node.
	pub dimmed_edge_opacity: f64,
	pub arrow_size: f64,
	pub node_stroke: String,
	pub node_stroke_width: f64,
	pub hover_radius_boost: f64,
	pub hover_stroke_width: f64,
	pub label_color: String,
	pub label_font_px: f64,
	/// Distance from node centre to label baseline, added to the radius.
	pub label_offset: f64,
}

impl Default for GraphStyle {
	fn default() -> Self {
		Self {
			background: None,
			palette: COLORS,
			edge_color: "#999".into(),
			highlight_color: "#6366f1".into(),
			edge_width_factor: 3.0,
			edge_opacity_base: 0.3,
			edge_opacity_gain: 0.5,
			dimmed_edge_opacity: 0.1,
			arrow_size: 6.0,
			node_stroke: "#fff".into(),
			node_stroke_width: 2.0,
			hover_radius_boost: 3.0,
			hover_stroke_width: 3.0,
			label_color: "#333".into(),
			label_font_px: 12.0,
			label_offset: 15.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeShape<'a> {
	pub from: (f64, f64),
	pub to: (f64, f64),
	/// Radius of the target circle; the arrowhead stops at its rim.
	pub target_radius: f64,
	pub color: &'a str,
	pub width: f64,
	pub opacity: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeShape<'a> {
	pub center: (f64, f64),
	pub radius: f64,
	pub fill: &'a str,
	pub stroke: &'a str,
	pub stroke_width: f64,
	pub label: &'a str,
	pub label_dy: f64,
}

/// Draw list for one frame, in layout coordinates. Edges go under nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene<'a> {
	pub edges: Vec<EdgeShape<'a>>,
	pub nodes: Vec<NodeShape<'a>>,
}

impl<'a> Scene<'a> {
	pub fn build(
		snapshot: &'a GraphSnapshot,
		simulation: &Simulation,
		hover: Option<usize>,
		style: &'a GraphStyle,
	) -> Self {
		let positions = simulation.nodes();
		let radius_of = |idx: usize| {
			let base = positions[idx].radius;
			if hover == Some(idx) {
				base + style.hover_radius_boost
			} else {
				base
			}
		};

		let edges = simulation
			.links()
			.iter()
			.map(|link| {
				let (s, t) = (&positions[link.source], &positions[link.target]);
				let incident = hover.is_some_and(|h| h == link.source || h == link.target);
				let (color, opacity) = match hover {
					None => (
						style.edge_color.as_str(),
						edge_opacity(link.weight, style.edge_opacity_base, style.edge_opacity_gain),
					),
					Some(_) if incident => (style.highlight_color.as_str(), 1.0),
					Some(_) => (style.edge_color.as_str(), style.dimmed_edge_opacity),
				};
				EdgeShape {
					from: (s.x, s.y),
					to: (t.x, t.y),
					target_radius: radius_of(link.target),
					color,
					width: edge_width(link.weight, style.edge_width_factor),
					opacity,
				}
			})
			.collect();

		let nodes = snapshot
			.nodes()
			.iter()
			.zip(positions)
			.enumerate()
			.map(|(idx, (node, sim))| {
				let hovered = hover == Some(idx);
				NodeShape {
					center: (sim.x, sim.y),
					radius: radius_of(idx),
					fill: group_color(node.group.as_deref(), style.palette),
					stroke: if hovered {
						style.highlight_color.as_str()
					} else {
						style.node_stroke.as_str()
					},
					stroke_width: if hovered {
						style.hover_stroke_width
					} else {
						style.node_stroke_width
					},
					label: node.label.as_str(),
					label_dy: sim.radius + style.label_offset,
				}
			})
			.collect();

		Self { edges, nodes }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::scale::SizeScale;
	use crate::components::force_graph::simulation::SimulationConfig;
	use crate::components::force_graph::types::{GraphData, GraphEdge, GraphNode};

	fn fixture() -> (GraphSnapshot, Simulation) {
		let node = |id: &str, group: Option<&str>, size: Option<f64>| GraphNode {
			id: id.into(),
			label: format!("Note {id}"),
			group: group.map(Into::into),
			size,
		};
		let edge = |s: &str, t: &str, w: f64| GraphEdge {
			source: s.into(),
			target: t.into(),
			weight: w,
		};
		let data = GraphData {
			nodes: vec![
				node("a", Some("work"), Some(2.0)),
				node("b", None, None),
				node("c", Some("work"), None),
			],
			edges: vec![edge("a", "b", 0.9), edge("b", "c", 0.2), edge("c", "nowhere", 0.5)],
		};
		let (snapshot, _) = GraphSnapshot::build(&data);
		let mut sim = Simulation::new(
			&snapshot,
			SimulationConfig::default(),
			&SizeScale::default(),
			(200.0, 200.0),
		);
		sim.run_to_settle(50);
		(snapshot, sim)
	}

	#[test]
	fn resting_scene_uses_weight_styling() {
		let (snapshot, sim) = fixture();
		let style = GraphStyle::default();
		let scene = Scene::build(&snapshot, &sim, None, &style);

		assert_eq!(scene.edges.len(), 2);
		assert_eq!(scene.nodes.len(), 3);
		assert!((scene.edges[0].opacity - 0.75).abs() < 1e-12);
		assert!((scene.edges[0].width - 2.7_f64.sqrt()).abs() < 1e-12);
		assert!(scene.edges.iter().all(|e| e.color == "#999"));

		let a = &scene.nodes[0];
		assert_eq!(a.radius, 20.0);
		assert_eq!(a.label, "Note a");
		assert_eq!(a.label_dy, 35.0);
		assert_eq!(a.stroke, "#fff");
		assert_eq!(a.fill, scene.nodes[2].fill);
		assert_eq!((a.center.0, a.center.1), (sim.nodes()[0].x, sim.nodes()[0].y));
	}

	#[test]
	fn hover_emphasises_node_and_incident_edges_only() {
		let (snapshot, sim) = fixture();
		let style = GraphStyle::default();
		let scene = Scene::build(&snapshot, &sim, Some(0), &style);

		let a = &scene.nodes[0];
		assert_eq!(a.radius, 23.0);
		assert_eq!(a.stroke, "#6366f1");
		assert_eq!(a.stroke_width, 3.0);
		assert_eq!(a.label_dy, 35.0);
		assert_eq!(scene.nodes[1].radius, 10.0);

		assert_eq!(scene.edges[0].color, "#6366f1");
		assert_eq!(scene.edges[0].opacity, 1.0);
		assert_eq!(scene.edges[1].color, "#999");
		assert_eq!(scene.edges[1].opacity, 0.1);
	}

	#[test]
	fn hover_changes_presentation_not_positions() {
		let (snapshot, sim) = fixture();
		let style = GraphStyle::default();
		let before = sim.nodes().to_vec();
		let plain = Scene::build(&snapshot, &sim, None, &style);
		let hovered = Scene::build(&snapshot, &sim, Some(1), &style);

		assert_eq!(sim.nodes(), &before[..]);
		for (p, h) in plain.nodes.iter().zip(&hovered.nodes) {
			assert_eq!(p.center, h.center);
		}
		for (p, h) in plain.edges.iter().zip(&hovered.edges) {
			assert_eq!((p.from, p.to), (h.from, h.to));
		}
	}

	#[test]
	fn building_twice_gives_identical_scene() {
		let (snapshot, sim) = fixture();
		let style = GraphStyle::default();
		assert_eq!(
			Scene::build(&snapshot, &sim, Some(2), &style),
			Scene::build(&snapshot, &sim, Some(2), &style)
		);
	}
}
