use std::collections::HashMap;

use thiserror::Error;

use super::scale::clamp_weight;
use super::types::{GraphData, GraphNode};

/// Something wrong with an incoming snapshot. None of these are fatal: the
/// offending element is dropped or repaired and the graph still renders.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SnapshotIssue {
	#[error("edge {from} -> {to} references unknown node `{missing}`, dropped")]
	DanglingEdge {
		from: String,
		to: String,
		missing: String,
	},
	#[error("duplicate node id `{id}`, later occurrence dropped")]
	DuplicateNode { id: String },
	#[error("self-loop on node `{id}` dropped")]
	SelfLoop { id: String },
	#[error("edge {from} -> {to} has weight {weight} outside [0, 1], clamped")]
	WeightOutOfRange {
		from: String,
		to: String,
		weight: f64,
	},
}

/// An edge whose endpoints resolved to node indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapshotEdge {
	pub source: usize,
	pub target: usize,
	/// Always within `[0, 1]`.
	pub weight: f64,
}

/// A validated graph, ready to be simulated.
#[derive(Clone, Debug, Default)]
pub struct GraphSnapshot {
	nodes: Vec<GraphNode>,
	edges: Vec<SnapshotEdge>,
	index: HashMap<String, usize>,
}

impl GraphSnapshot {
	/// Resolve ids to indices, dropping whatever cannot be resolved.
	pub fn build(data: &GraphData) -> (Self, Vec<SnapshotIssue>) {
		let mut issues = Vec::new();
		let mut nodes = Vec::with_capacity(data.nodes.len());
		let mut index = HashMap::with_capacity(data.nodes.len());

		for node in &data.nodes {
			if index.contains_key(&node.id) {
				issues.push(SnapshotIssue::DuplicateNode {
					id: node.id.clone(),
				});
				continue;
			}
			index.insert(node.id.clone(), nodes.len());
			nodes.push(node.clone());
		}

		let mut edges = Vec::with_capacity(data.edges.len());
		for edge in &data.edges {
			let (source, target) = match (index.get(&edge.source), index.get(&edge.target)) {
				(Some(&s), Some(&t)) => (s, t),
				(None, _) => {
					issues.push(SnapshotIssue::DanglingEdge {
						from: edge.source.clone(),
						to: edge.target.clone(),
						missing: edge.source.clone(),
					});
					continue;
				}
				(_, None) => {
					issues.push(SnapshotIssue::DanglingEdge {
						from: edge.source.clone(),
						to: edge.target.clone(),
						missing: edge.target.clone(),
					});
					continue;
				}
			};
			if source == target {
				issues.push(SnapshotIssue::SelfLoop {
					id: edge.source.clone(),
				});
				continue;
			}
			if !(0.0..=1.0).contains(&edge.weight) {
				issues.push(SnapshotIssue::WeightOutOfRange {
					from: edge.source.clone(),
					to: edge.target.clone(),
					weight: edge.weight,
				});
			}
			edges.push(SnapshotEdge {
				source,
				target,
				weight: clamp_weight(edge.weight),
			});
		}

		(
			Self {
				nodes,
				edges,
				index,
			},
			issues,
		)
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[SnapshotEdge] {
		&self.edges
	}

	#[allow(dead_code)]
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn node(&self, idx: usize) -> Option<&GraphNode> {
		self.nodes.get(idx)
	}

	#[allow(dead_code)]
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::GraphEdge;

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.to_uppercase(),
			group: None,
			size: None,
		}
	}

	fn edge(source: &str, target: &str, weight: f64) -> GraphEdge {
		GraphEdge {
			source: source.into(),
			target: target.into(),
			weight,
		}
	}

	#[test]
	fn resolves_ids_in_input_order() {
		let data = GraphData {
			nodes: vec![node("a"), node("b"), node("c")],
			edges: vec![edge("c", "a", 0.4)],
		};
		let (snapshot, issues) = GraphSnapshot::build(&data);

		assert!(issues.is_empty());
		assert_eq!(snapshot.index_of("b"), Some(1));
		assert_eq!(
			snapshot.edges(),
			&[SnapshotEdge {
				source: 2,
				target: 0,
				weight: 0.4
			}]
		);
	}

	#[test]
	fn dangling_edges_are_dropped_and_reported() {
		let data = GraphData {
			nodes: vec![node("a"), node("b")],
			edges: vec![
				edge("a", "ghost", 0.5),
				edge("phantom", "b", 0.5),
				edge("a", "b", 0.5),
			],
		};
		let (snapshot, issues) = GraphSnapshot::build(&data);

		assert_eq!(snapshot.edges().len(), 1);
		assert_eq!(issues.len(), 2);
		assert_eq!(
			issues[0],
			SnapshotIssue::DanglingEdge {
				from: "a".into(),
				to: "ghost".into(),
				missing: "ghost".into(),
			}
		);
		assert!(matches!(&issues[1], SnapshotIssue::DanglingEdge { missing, .. } if missing == "phantom"));
	}

	#[test]
	fn weights_are_clamped_but_edges_kept() {
		let data = GraphData {
			nodes: vec![node("a"), node("b"), node("c")],
			edges: vec![edge("a", "b", 1.7), edge("b", "c", f64::NAN)],
		};
		let (snapshot, issues) = GraphSnapshot::build(&data);

		assert_eq!(snapshot.edges()[0].weight, 1.0);
		assert_eq!(snapshot.edges()[1].weight, 0.0);
		assert_eq!(issues.len(), 2);
		assert!(issues[0].to_string().contains("clamped"));
	}

	#[test]
	fn duplicates_and_self_loops_are_dropped() {
		let mut dup = node("a");
		dup.label = "Second".into();
		let data = GraphData {
			nodes: vec![node("a"), dup],
			edges: vec![edge("a", "a", 0.5)],
		};
		let (snapshot, issues) = GraphSnapshot::build(&data);

		assert_eq!(snapshot.nodes().len(), 1);
		assert_eq!(snapshot.nodes()[0].label, "A");
		assert!(snapshot.edges().is_empty());
		assert_eq!(
			issues,
			vec![
				SnapshotIssue::DuplicateNode { id: "a".into() },
				SnapshotIssue::SelfLoop { id: "a".into() },
			]
		);
	}

	#[test]
	fn empty_input_builds_empty_snapshot() {
		let (snapshot, issues) = GraphSnapshot::build(&GraphData::default());
		assert!(snapshot.is_empty());
		assert!(issues.is_empty());
	}
}
