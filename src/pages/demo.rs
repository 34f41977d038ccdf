use leptos::prelude::*;
use log::info;

use crate::components::force_graph::{
	GraphData, GraphEdge, GraphHeight, GraphNode, GraphView, SnapshotIssue,
};
use crate::components::note_panel::NotePanel;

const GROUPS: [&str; 5] = ["research", "journal", "ideas", "reading", "work"];

/// Generate sample note data: a random tree of similarity links plus a few
/// cross links. The last edge points at a note that does not exist.
fn generate_sample_data(n: usize, seed: usize) -> GraphData {
	let nodes: Vec<GraphNode> = (0..n)
		.map(|i| GraphNode {
			id: format!("note-{i}"),
			label: format!("Note {i}"),
			group: (i % 7 != 0).then(|| GROUPS[i % GROUPS.len()].to_string()),
			size: Some(0.8 + rand_simple(seed * 7919 + i) * 1.2),
		})
		.collect();

	let mut edges: Vec<GraphEdge> = (1..n)
		.map(|i| {
			let target = (rand_simple(seed * 104_729 + i) * (i as f64)) as usize;
			GraphEdge {
				source: format!("note-{i}"),
				target: format!("note-{target}"),
				weight: 0.5 + rand_simple(seed * 31 + i) * 0.5,
			}
		})
		.collect();

	for i in (3..n).step_by(5) {
		let target = (rand_simple(seed * 613 + i) * (i as f64)) as usize;
		if target + 1 < i {
			edges.push(GraphEdge {
				source: format!("note-{i}"),
				target: format!("note-{target}"),
				weight: 0.5 + rand_simple(seed * 17 + i) * 0.2,
			});
		}
	}

	if n > 0 {
		edges.push(GraphEdge {
			source: "note-0".into(),
			target: "archived-note".into(),
			weight: 0.7,
		});
	}

	GraphData { nodes, edges }
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed as u64 + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Demo page with generated notes, no backend needed.
#[component]
pub fn Demo() -> impl IntoView {
	let (seed, set_seed) = signal(1usize);
	let graph_data = Signal::derive(move || generate_sample_data(60, seed.get()));

	let (issues, set_issues) = signal(Vec::<String>::new());
	let on_diagnostic = Callback::new(move |issue: SnapshotIssue| {
		set_issues.update(|list| list.push(issue.to_string()));
	});

	let (selected, set_selected) = signal(None::<GraphNode>);
	let on_node_click = Callback::new(move |node: GraphNode| {
		info!("clicked {}", node.id);
		set_selected.set(Some(node));
	});

	let reshuffle = move |_| {
		set_issues.set(Vec::new());
		set_selected.set(None);
		set_seed.update(|s| *s += 1);
	};

	view! {
		<div class="fullscreen-graph">
			<GraphView
				data=graph_data
				on_node_click=on_node_click
				on_diagnostic=on_diagnostic
				height=GraphHeight::FillParent
			/>
			<div class="graph-overlay">
				<h1>"Note Graph Demo"</h1>
				<p class="subtitle">"Drag notes to reposition. Scroll to zoom. Drag background to pan."</p>
				<button on:click=reshuffle>"New sample"</button>
				<ul class="diagnostics">
					{move || {
						issues.get().into_iter().map(|issue| view! { <li>{issue}</li> }).collect_view()
					}}
				</ul>
			</div>
			<NotePanel selected=selected />
		</div>
	}
}
