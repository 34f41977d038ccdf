//! Browser entry point: mounts the note graph app.

use note_graph_canvas::{App, init_logging};

fn main() {
	init_logging();
	leptos::mount::mount_to_body(App);
}
