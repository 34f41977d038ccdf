use leptos::prelude::*;
use log::warn;

use crate::api::{Note, NoteApi};
use crate::components::force_graph::GraphNode;

const EXCERPT_CHARS: usize = 280;

/// Side panel describing the last clicked note.
///
/// With an `api` the full note (summary, tags, dates, an excerpt) is loaded
/// from the backend; without one only what the graph node carries is shown.
#[component]
pub fn NotePanel(
	#[prop(into)] selected: Signal<Option<GraphNode>>,
	#[prop(optional)] api: Option<NoteApi>,
) -> impl IntoView {
	let online = api.is_some();
	let note = LocalResource::new(move || {
		let id = selected.get().map(|node| node.id);
		let api = api.clone();
		async move {
			let (id, api) = (id?, api?);
			let result = api.fetch_note(&id).await;
			if let Err(err) = &result {
				warn!("could not load note {id}: {err}");
			}
			Some((id, result))
		}
	});

	move || {
		selected.get().map(|node| {
			let group = node.group.unwrap_or_else(|| "ungrouped".into());
			let id = node.id.clone();
			let details = move || {
				if !online {
					return None;
				}
				let view = match note.get().flatten() {
					Some((loaded, Ok(full))) if loaded == id => {
						view! { <NoteDetails note=full /> }.into_any()
					}
					Some((loaded, Err(err))) if loaded == id => {
						view! {
							<p class="note-status error">{format!("Could not load the note: {err}")}</p>
						}
							.into_any()
					}
					_ => view! { <p class="note-status">"Loading note..."</p> }.into_any(),
				};
				Some(view)
			};
			view! {
				<aside class="note-panel">
					<h2>{node.label}</h2>
					<dl>
						<dt>"Id"</dt>
						<dd>{node.id}</dd>
						<dt>"Group"</dt>
						<dd>{group}</dd>
					</dl>
					{details}
				</aside>
			}
		})
	}
}

#[component]
fn NoteDetails(note: Note) -> impl IntoView {
	let excerpt = excerpt(&note.content);
	let dates = format!("Created {} · updated {}", note.created_on(), note.updated_on());
	let tags = note.tags.unwrap_or_default();
	view! {
		<div class="note-details">
			<h3>{note.title}</h3>
			<p class="note-dates">{dates}</p>
			{note.summary.map(|summary| view! { <p class="note-summary">{summary}</p> })}
			<ul class="note-tags">
				{tags.into_iter().map(|tag| view! { <li>{tag}</li> }).collect_view()}
			</ul>
			<p class="note-excerpt">{excerpt}</p>
		</div>
	}
}

fn excerpt(content: &str) -> String {
	let mut chars = content.chars();
	let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
	if chars.next().is_some() { format!("{}...", head.trim_end()) } else { head }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn long_content_is_cut_on_a_char_boundary() {
		assert_eq!(excerpt("short note"), "short note");

		let long = "노트 ".repeat(200);
		let cut = excerpt(&long);
		assert!(cut.ends_with("..."));
		assert!(cut.trim_end_matches("...").chars().count() <= EXCERPT_CHARS);
	}
}
