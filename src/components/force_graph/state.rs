use log::{debug, info, warn};

use super::interaction::{
	InteractionController, NodeHit, PointerResponse, ViewTransform, ZoomConfig,
};
use super::scale::SizeScale;
use super::scene::{GraphStyle, Scene};
use super::simulation::{DragCommand, Simulation, SimulationConfig};
use super::snapshot::{GraphSnapshot, SnapshotIssue};
use super::types::{GraphData, GraphNode};

/// Everything tunable about one graph instance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphConfig {
	pub simulation: SimulationConfig,
	pub zoom: ZoomConfig,
	pub style: GraphStyle,
	pub size_scale: SizeScale,
}

/// Where a mounted graph is in its life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
	/// No simulation yet: waiting for data or a non-zero surface.
	Uninitialized,
	/// Cooling after a fresh snapshot.
	Simulating,
	/// Alpha below threshold; nothing moves until reheated.
	Settled,
	/// Heated by a drag, cooling again once it ends.
	Reheated,
	/// Torn down. Terminal.
	Unmounted,
}

/// One graph instance: snapshot, physics, interaction and surface size.
pub struct ForceGraphState {
	config: GraphConfig,
	snapshot: GraphSnapshot,
	simulation: Option<Simulation>,
	controller: InteractionController,
	width: f64,
	height: f64,
	lifecycle: Lifecycle,
	generation: u64,
	view_placed: bool,
	dirty: bool,
}

impl ForceGraphState {
	pub fn new(config: GraphConfig) -> Self {
		Self {
			controller: InteractionController::new(config.zoom.clone()),
			config,
			snapshot: GraphSnapshot::default(),
			simulation: None,
			width: 0.0,
			height: 0.0,
			lifecycle: Lifecycle::Uninitialized,
			generation: 0,
			view_placed: false,
			dirty: false,
		}
	}

	/// Replace the snapshot. The previous simulation is dropped before the
	/// new one is built.
	pub fn load(&mut self, data: &GraphData) -> Vec<SnapshotIssue> {
		if self.lifecycle == Lifecycle::Unmounted {
			warn!("ignoring graph data for an unmounted graph");
			return Vec::new();
		}
		let (snapshot, issues) = GraphSnapshot::build(data);
		for issue in &issues {
			warn!("graph snapshot: {}", issue);
		}

		self.generation += 1;
		self.simulation = None;
		self.snapshot = snapshot;
		self.controller.reset_nodes();
		self.lifecycle = Lifecycle::Uninitialized;
		info!(
			"graph generation {}: {} nodes, {} edges",
			self.generation,
			self.snapshot.nodes().len(),
			self.snapshot.edges().len()
		);
		self.start_if_sized();
		self.dirty = true;
		issues
	}

	/// New surface size in CSS pixels. A zero or non-finite size defers the
	/// simulation.
	pub fn resize(&mut self, width: f64, height: f64) {
		if self.lifecycle == Lifecycle::Unmounted {
			return;
		}
		let (width, height) = (sanitize(width), sanitize(height));
		if (width, height) == (self.width, self.height) {
			return;
		}
		self.width = width;
		self.height = height;
		if !self.has_surface() {
			debug!("graph surface collapsed to {}x{}", width, height);
			return;
		}
		if !self.view_placed {
			self.controller.reset_view(width, height);
			self.view_placed = true;
		}
		match self.simulation.as_mut() {
			Some(sim) => {
				sim.set_center(width / 2.0, height / 2.0);
				sim.restart();
				if sim.is_running() && self.lifecycle == Lifecycle::Settled {
					self.lifecycle = Lifecycle::Simulating;
				}
			}
			None => self.start_if_sized(),
		}
		self.dirty = true;
	}

	fn start_if_sized(&mut self) {
		if self.simulation.is_some() || !self.has_surface() {
			return;
		}
		let sim = Simulation::new(
			&self.snapshot,
			self.config.simulation.clone(),
			&self.config.size_scale,
			(self.width / 2.0, self.height / 2.0),
		);
		self.lifecycle = if sim.is_running() {
			Lifecycle::Simulating
		} else {
			Lifecycle::Settled
		};
		debug!(
			"graph generation {} simulation started ({:?})",
			self.generation, self.lifecycle
		);
		self.simulation = Some(sim);
	}

	/// Advance one frame. Returns whether the surface needs a redraw.
	pub fn tick(&mut self) -> bool {
		if self.lifecycle == Lifecycle::Unmounted {
			return false;
		}
		if let Some(sim) = self.simulation.as_mut() {
			if sim.tick() {
				self.dirty = true;
			}
			if !sim.is_running() && self.lifecycle != Lifecycle::Settled {
				debug!("graph generation {} settled", self.generation);
				self.lifecycle = Lifecycle::Settled;
			}
		}
		std::mem::take(&mut self.dirty)
	}

	/// Whether the host should keep scheduling frames.
	pub fn wants_frames(&self) -> bool {
		match self.lifecycle {
			Lifecycle::Unmounted => false,
			Lifecycle::Uninitialized => true,
			_ => self.dirty || self.simulation.as_ref().is_some_and(Simulation::is_running),
		}
	}

	/// Tear down. Nothing runs afterwards.
	pub fn unmount(&mut self) {
		self.simulation = None;
		self.controller.reset_nodes();
		self.lifecycle = Lifecycle::Unmounted;
		self.dirty = false;
		debug!("graph generation {} unmounted", self.generation);
	}

	fn hit(&self, sx: f64, sy: f64) -> Option<NodeHit> {
		let sim = self.simulation.as_ref()?;
		let (gx, gy) = self.controller.transform().screen_to_graph(sx, sy);
		let node = sim.node_at(gx, gy)?;
		let pos = sim.node(node)?;
		Some(NodeHit {
			node,
			x: pos.x,
			y: pos.y,
		})
	}

	fn apply(&mut self, response: PointerResponse) -> Option<GraphNode> {
		if let (Some(command), Some(sim)) = (response.command, self.simulation.as_mut()) {
			sim.apply(command);
			if matches!(command, DragCommand::Start { .. }) && sim.is_running() {
				self.lifecycle = Lifecycle::Reheated;
			}
		}
		self.dirty |= response.redraw;
		response
			.clicked
			.and_then(|idx| self.snapshot.node(idx))
			.cloned()
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		let hit = self.hit(sx, sy);
		let response = self.controller.pointer_down(sx, sy, hit);
		self.apply(response);
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		let hit = self.hit(sx, sy).map(|h| h.node);
		let response = self.controller.pointer_move(sx, sy, hit);
		self.apply(response);
	}

	/// Returns the clicked note, if the release completed a click.
	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Option<GraphNode> {
		let hit = self.hit(sx, sy).map(|h| h.node);
		let response = self.controller.pointer_up(hit);
		self.apply(response)
	}

	pub fn pointer_leave(&mut self) {
		let response = self.controller.pointer_leave();
		self.apply(response);
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let response = self.controller.wheel(sx, sy, delta_y);
		self.apply(response);
	}

	/// Set the zoom scale, clamped to the configured extent.
	#[allow(dead_code)]
	pub fn set_scale(&mut self, k: f64) -> f64 {
		self.dirty = true;
		self.controller.set_scale(k)
	}

	/// Draw list for the current state, if a simulation exists.
	pub fn scene(&self) -> Option<Scene<'_>> {
		let sim = self.simulation.as_ref()?;
		Some(Scene::build(
			&self.snapshot,
			sim,
			self.controller.hovered(),
			&self.config.style,
		))
	}

	pub fn lifecycle(&self) -> Lifecycle {
		self.lifecycle
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	#[allow(dead_code)]
	pub fn simulation(&self) -> Option<&Simulation> {
		self.simulation.as_ref()
	}

	pub fn transform(&self) -> ViewTransform {
		self.controller.transform()
	}

	pub fn hovered(&self) -> Option<usize> {
		self.controller.hovered()
	}

	/// CSS cursor for the surface under the current gesture.
	pub fn cursor(&self) -> &'static str {
		if self.controller.dragged().is_some() {
			"grabbing"
		} else if self.hovered().is_some() {
			"pointer"
		} else {
			"grab"
		}
	}

	pub fn style(&self) -> &GraphStyle {
		&self.config.style
	}

	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	pub fn has_surface(&self) -> bool {
		self.width > 0.0 && self.height > 0.0
	}
}

fn sanitize(len: f64) -> f64 {
	if len.is_finite() && len > 0.0 { len } else { 0.0 }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::GraphEdge;

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: format!("Note {id}"),
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

	fn chain() -> GraphData {
		GraphData {
			nodes: vec![node("a"), node("b"), node("c")],
			edges: vec![edge("a", "b", 0.9), edge("b", "c", 0.3)],
		}
	}

	fn sized(data: &GraphData) -> ForceGraphState {
		let mut state = ForceGraphState::new(GraphConfig::default());
		state.resize(800.0, 600.0);
		state.load(data);
		state
	}

	fn settle(state: &mut ForceGraphState) {
		for _ in 0..2_000 {
			state.tick();
			if !state.wants_frames() {
				break;
			}
		}
	}

	fn screen_pos(state: &ForceGraphState, idx: usize) -> (f64, f64) {
		let n = &state.simulation().unwrap().nodes()[idx];
		state.transform().graph_to_screen(n.x, n.y)
	}

	#[test]
	fn zero_sized_surface_defers_simulation() {
		let mut state = ForceGraphState::new(GraphConfig::default());
		state.load(&chain());
		assert_eq!(state.lifecycle(), Lifecycle::Uninitialized);
		assert!(state.simulation().is_none());
		assert!(state.wants_frames());

		state.resize(0.0, 600.0);
		state.resize(f64::NAN, 600.0);
		state.tick();
		assert!(state.simulation().is_none());

		state.resize(800.0, 600.0);
		assert_eq!(state.lifecycle(), Lifecycle::Simulating);
		let sim = state.simulation().unwrap();
		assert_eq!(sim.center(), (400.0, 300.0));
		assert!((state.transform().x - 40.0).abs() < 1e-9);
		assert_eq!(state.transform().k, 0.9);
	}

	#[test]
	fn simulation_settles_and_stops_asking_for_frames() {
		let mut state = sized(&chain());
		assert!(state.tick());
		settle(&mut state);

		assert_eq!(state.lifecycle(), Lifecycle::Settled);
		assert!(!state.wants_frames());
		assert!(!state.tick());
	}

	#[test]
	fn empty_graph_is_settled_immediately() {
		let mut state = sized(&GraphData::default());
		assert_eq!(state.lifecycle(), Lifecycle::Settled);
		assert!(state.tick());
		assert!(!state.wants_frames());
		assert!(state.scene().unwrap().nodes.is_empty());
	}

	#[test]
	fn dangling_edge_still_renders_valid_parts() {
		let mut data = chain();
		data.edges.push(edge("c", "ghost", 0.7));
		let mut state = ForceGraphState::new(GraphConfig::default());
		state.resize(640.0, 480.0);
		let issues = state.load(&data);

		assert_eq!(issues.len(), 1);
		settle(&mut state);
		let scene = state.scene().unwrap();
		assert_eq!(scene.nodes.len(), 3);
		assert_eq!(scene.edges.len(), 2);
	}

	#[test]
	fn new_snapshot_replaces_previous_generation() {
		let mut state = sized(&chain());
		settle(&mut state);
		state.pointer_move(0.0, 0.0);
		let (sx, sy) = screen_pos(&state, 0);
		state.pointer_move(sx, sy);
		assert_eq!(state.hovered(), Some(0));

		let replacement = GraphData {
			nodes: vec![node("x")],
			edges: vec![],
		};
		state.load(&replacement);

		assert_eq!(state.generation(), 2);
		assert_eq!(state.lifecycle(), Lifecycle::Simulating);
		assert_eq!(state.simulation().unwrap().nodes().len(), 1);
		assert_eq!(state.hovered(), None);
	}

	#[test]
	fn hover_does_not_move_nodes() {
		let mut state = sized(&chain());
		settle(&mut state);
		let before = state.simulation().unwrap().nodes().to_vec();

		let (sx, sy) = screen_pos(&state, 1);
		state.pointer_move(sx, sy);
		assert_eq!(state.hovered(), Some(1));
		assert!(state.tick());
		assert_eq!(state.simulation().unwrap().nodes(), &before[..]);
		assert_eq!(state.lifecycle(), Lifecycle::Settled);

		state.pointer_leave();
		assert_eq!(state.hovered(), None);
		assert_eq!(state.simulation().unwrap().nodes(), &before[..]);
	}

	#[test]
	fn drag_reheats_and_holds_node_under_pointer() {
		let mut state = sized(&chain());
		settle(&mut state);

		let (sx, sy) = screen_pos(&state, 2);
		state.pointer_down(sx, sy);
		assert_eq!(state.lifecycle(), Lifecycle::Reheated);
		assert!(state.wants_frames());

		state.pointer_move(sx + 90.0, sy + 45.0);
		for _ in 0..100 {
			state.tick();
		}
		let held = screen_pos(&state, 2);
		assert!((held.0 - (sx + 90.0)).abs() < 1e-6 && (held.1 - (sy + 45.0)).abs() < 1e-6);

		assert_eq!(state.pointer_up(sx + 90.0, sy + 45.0), None);
		settle(&mut state);
		assert_eq!(state.lifecycle(), Lifecycle::Settled);
		assert!(state.simulation().unwrap().nodes()[2].pin.is_none());
	}

	#[test]
	fn cursor_follows_gesture() {
		let mut state = sized(&chain());
		settle(&mut state);
		assert_eq!(state.cursor(), "grab");

		let (sx, sy) = screen_pos(&state, 0);
		state.pointer_move(sx, sy);
		assert_eq!(state.cursor(), "pointer");
		state.pointer_down(sx, sy);
		assert_eq!(state.cursor(), "grabbing");
		state.pointer_up(sx, sy);
		assert_eq!(state.cursor(), "pointer");
		state.pointer_leave();
		assert_eq!(state.cursor(), "grab");
	}

	#[test]
	fn click_reports_the_note() {
		let mut state = sized(&chain());
		settle(&mut state);

		let (sx, sy) = screen_pos(&state, 1);
		state.pointer_down(sx, sy);
		let clicked = state.pointer_up(sx, sy);
		assert_eq!(clicked, Some(node("b")));
	}

	#[test]
	fn zoom_is_clamped() {
		let mut state = sized(&chain());
		assert_eq!(state.set_scale(10.0), 4.0);
		assert_eq!(state.set_scale(0.01), 0.1);
		assert!(state.tick());
	}

	#[test]
	fn resize_moves_centering_target() {
		let mut state = sized(&chain());
		settle(&mut state);
		state.resize(1000.0, 800.0);

		assert_eq!(state.simulation().unwrap().center(), (500.0, 400.0));
		settle(&mut state);
		let nodes = state.simulation().unwrap().nodes();
		let cx = nodes.iter().map(|n| n.x).sum::<f64>() / nodes.len() as f64;
		assert!((cx - 500.0).abs() < 5.0, "{cx}");
		// the initial view is kept
		assert!((state.transform().x - 40.0).abs() < 1e-9);
	}

	#[test]
	fn unmounted_state_is_inert() {
		let mut state = sized(&chain());
		state.unmount();

		assert_eq!(state.lifecycle(), Lifecycle::Unmounted);
		assert!(!state.tick());
		assert!(!state.wants_frames());
		assert!(state.load(&chain()).is_empty());
		assert!(state.simulation().is_none());
		assert_eq!(state.lifecycle(), Lifecycle::Unmounted);
	}
}
