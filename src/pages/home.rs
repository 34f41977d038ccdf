use leptos::prelude::*;
use log::{error, info};

use crate::api::{DEFAULT_GRAPH_LIMIT, NoteApi};
use crate::components::force_graph::{GraphHeight, GraphView, GraphNode};
use crate::components::note_panel::NotePanel;

/// Default Home Page: the similarity graph of the user's notes.
#[component]
pub fn Home() -> impl IntoView {
	let api = NoteApi::from_env();
	let panel_api = api.clone();
	let graph = LocalResource::new(move || {
		let api = api.clone();
		async move {
			let result = api.fetch_graph_data(DEFAULT_GRAPH_LIMIT).await;
			match &result {
				Ok(data) => info!(
					"loaded {} notes and {} links",
					data.nodes.len(),
					data.edges.len()
				),
				Err(err) => error!("graph request failed: {err}"),
			}
			result
		}
	});

	let (selected, set_selected) = signal(None::<GraphNode>);
	let on_node_click = Callback::new(move |node: GraphNode| {
		info!("opened note {}", node.id);
		set_selected.set(Some(node));
	});

	view! {
		<div class="fullscreen-graph">
			{move || match graph.get() {
				None => view! { <p class="graph-status">"Loading graph..."</p> }.into_any(),
				Some(Err(err)) => {
					view! {
						<div class="graph-status error">
							<p>"Could not load the note graph."</p>
							<p>{err.to_string()}</p>
							<button on:click=move |_| graph.refetch()>"Retry"</button>
						</div>
					}
						.into_any()
				}
				Some(Ok(data)) if data.is_empty() => {
					view! {
						<p class="graph-status">"No notes yet. Similar notes will be linked here."</p>
					}
						.into_any()
				}
				Some(Ok(data)) => {
					view! {
						<GraphView
							data=Signal::derive(move || data.clone())
							on_node_click=on_node_click
							height=GraphHeight::FillParent
						/>
					}
						.into_any()
				}
			}}
			<div class="graph-overlay">
				<h1>"Note Graph"</h1>
				<p class="subtitle">"Drag notes to reposition. Scroll to zoom. Drag background to pan."</p>
			</div>
			<NotePanel selected=selected api=panel_api />
		</div>
	}
}
