use serde::{Deserialize, Serialize};

/// A note as delivered by the graph-data endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	#[serde(default)]
	pub group: Option<String>,
	#[serde(default)]
	pub size: Option<f64>,
}

/// A similarity link between two notes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	pub source: String,
	pub target: String,
	pub weight: f64,
}

/// One snapshot of the note graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	/// Parse the JSON body returned by `/api/notes/graph/data`.
	pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(body)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_backend_payload_with_optional_fields() {
		let body = r#"{
			"nodes": [
				{"id": "1", "label": "Rust notes", "group": "programming", "size": 1.4},
				{"id": "2", "label": "Untagged"}
			],
			"edges": [{"source": "1", "target": "2", "weight": 0.82}]
		}"#;
		let data = GraphData::from_json(body).unwrap();

		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].group.as_deref(), Some("programming"));
		assert_eq!(data.nodes[0].size, Some(1.4));
		assert_eq!(data.nodes[1].group, None);
		assert_eq!(data.nodes[1].size, None);
		assert_eq!(data.edges[0].weight, 0.82);
	}

	#[test]
	fn null_group_and_missing_edges_are_accepted() {
		let body = r#"{"nodes": [{"id": "a", "label": "A", "group": null, "size": null}]}"#;
		let data = GraphData::from_json(body).unwrap();

		assert_eq!(data.nodes[0].group, None);
		assert!(data.edges.is_empty());
		assert!(!data.is_empty());
	}

	#[test]
	fn rejects_edge_without_weight() {
		let body = r#"{"nodes": [], "edges": [{"source": "a", "target": "b"}]}"#;
		assert!(GraphData::from_json(body).is_err());
	}
}
