//! Force-directed layout of a note graph.
//!
//! Link, charge, centering and collision forces are relaxed under a cooling
//! `alpha`. Each node's simulation record is owned here and indexed the same
//! way as the snapshot it was built from; the caller's data is never touched.

use std::f64::consts::PI;

use super::scale::{SizeScale, link_distance};
use super::snapshot::GraphSnapshot;

/// Tunable physics. The defaults give a readable layout for a few dozen notes.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
	/// Link rest length for two completely unrelated notes.
	pub link_base_distance: f64,
	pub link_iterations: usize,
	/// Negative values repel.
	pub charge_strength: f64,
	pub charge_distance_min: f64,
	pub center_strength: f64,
	/// Added to each node's radius for the non-overlap constraint.
	pub collision_padding: f64,
	/// `0` disables collision.
	pub collision_strength: f64,
	pub alpha: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target while a node is being dragged.
	pub drag_alpha_target: f64,
	pub initial_radius: f64,
	/// Seed for separating coincident nodes.
	pub seed: u32,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			link_base_distance: 150.0,
			link_iterations: 1,
			charge_strength: -300.0,
			charge_distance_min: 1.0,
			center_strength: 1.0,
			collision_padding: 5.0,
			collision_strength: 1.0,
			alpha: 1.0,
			alpha_min: 0.001,
			alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
			initial_radius: 10.0,
			seed: 1,
		}
	}
}

/// Per-node simulation state.
#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Position forced by a drag; overrides integration while set.
	pub pin: Option<(f64, f64)>,
	/// Rendered radius.
	pub radius: f64,
	collide_radius: f64,
}

/// A resolved link with its precomputed spring parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SimLink {
	pub source: usize,
	pub target: usize,
	pub weight: f64,
	pub distance: f64,
	strength: f64,
	bias: f64,
}

/// Drag gestures as seen by the physics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragCommand {
	/// Pin the node where it is and reheat.
	Start { node: usize },
	/// Move the pin, in layout coordinates.
	Move { node: usize, x: f64, y: f64 },
	/// Release the pin and let alpha cool.
	End { node: usize },
}

/// d3-style linear congruential generator.
#[derive(Clone, Debug)]
struct Lcg(u32);

impl Lcg {
	fn next(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		self.0 as f64 / 4_294_967_296.0
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	config: SimulationConfig,
	alpha: f64,
	alpha_target: f64,
	running: bool,
	center: (f64, f64),
	rng: Lcg,
}

impl Simulation {
	/// Build the simulation for `snapshot`, scattering nodes around `center`.
	pub fn new(
		snapshot: &GraphSnapshot,
		config: SimulationConfig,
		size_scale: &SizeScale,
		center: (f64, f64),
	) -> Self {
		let initial_angle = PI * (3.0 - 5.0_f64.sqrt());
		let nodes: Vec<SimNode> = snapshot
			.nodes()
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let radius = config.initial_radius * (0.5 + i as f64).sqrt();
				let angle = i as f64 * initial_angle;
				let render_radius = size_scale.radius(node.size);
				SimNode {
					x: center.0 + radius * angle.cos(),
					y: center.1 + radius * angle.sin(),
					vx: 0.0,
					vy: 0.0,
					pin: None,
					radius: render_radius,
					collide_radius: render_radius + config.collision_padding,
				}
			})
			.collect();

		let mut degree = vec![0usize; nodes.len()];
		for edge in snapshot.edges() {
			degree[edge.source] += 1;
			degree[edge.target] += 1;
		}
		let links = snapshot
			.edges()
			.iter()
			.map(|edge| {
				let (ds, dt) = (degree[edge.source] as f64, degree[edge.target] as f64);
				SimLink {
					source: edge.source,
					target: edge.target,
					weight: edge.weight,
					distance: link_distance(config.link_base_distance, edge.weight),
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		Self {
			running: !nodes.is_empty(),
			alpha: config.alpha,
			alpha_target: 0.0,
			rng: Lcg(config.seed),
			nodes,
			links,
			config,
			center,
		}
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn node(&self, idx: usize) -> Option<&SimNode> {
		self.nodes.get(idx)
	}

	pub fn links(&self) -> &[SimLink] {
		&self.links
	}

	#[allow(dead_code)]
	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	#[allow(dead_code)]
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	#[allow(dead_code)]
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Whether further ticks will move anything.
	pub fn is_running(&self) -> bool {
		self.running
	}

	#[allow(dead_code)]
	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	/// Move the centering target, e.g. after the surface was resized.
	pub fn set_center(&mut self, cx: f64, cy: f64) {
		self.center = (cx, cy);
	}

	/// Place a node explicitly, discarding its velocity.
	#[allow(dead_code)]
	pub fn set_position(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.x = x;
			node.y = y;
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}

	/// Resume ticking without touching alpha.
	pub fn restart(&mut self) {
		self.running = !self.nodes.is_empty();
	}

	#[allow(dead_code)]
	pub fn stop(&mut self) {
		self.running = false;
	}

	/// Advance one tick. Returns `false` when the simulation is stopped and
	/// nothing moved.
	pub fn tick(&mut self) -> bool {
		if !self.running {
			return false;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		for _ in 0..self.config.link_iterations {
			self.apply_link_force();
		}
		self.apply_charge_force();
		self.apply_center_force();
		self.apply_collision_force();
		self.integrate();

		if self.alpha < self.config.alpha_min {
			self.running = false;
		}
		true
	}

	/// Tick until settled or `max_ticks` is reached. Returns the ticks run.
	#[allow(dead_code)]
	pub fn run_to_settle(&mut self, max_ticks: usize) -> usize {
		let mut ticks = 0;
		while ticks < max_ticks && self.tick() {
			ticks += 1;
		}
		ticks
	}

	/// Apply a drag gesture. Unknown node indices are ignored.
	pub fn apply(&mut self, command: DragCommand) {
		match command {
			DragCommand::Start { node } => {
				let Some(n) = self.nodes.get_mut(node) else {
					return;
				};
				n.pin = Some((n.x, n.y));
				self.alpha_target = self.config.drag_alpha_target;
				self.running = true;
			}
			DragCommand::Move { node, x, y } => {
				if let Some(n) = self.nodes.get_mut(node) {
					n.pin = Some((x, y));
				}
			}
			DragCommand::End { node } => {
				if let Some(n) = self.nodes.get_mut(node) {
					n.pin = None;
				}
				self.alpha_target = 0.0;
			}
		}
	}

	/// Topmost node whose rendered circle contains the layout point.
	pub fn node_at(&self, x: f64, y: f64) -> Option<usize> {
		self.nodes.iter().enumerate().rev().find_map(|(idx, node)| {
			let (dx, dy) = (node.x - x, node.y - y);
			(dx * dx + dy * dy <= node.radius * node.radius).then_some(idx)
		})
	}

	fn apply_link_force(&mut self) {
		let alpha = self.alpha;
		for link in &self.links {
			let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 {
				x = self.rng.jiggle();
			}
			if y == 0.0 {
				y = self.rng.jiggle();
			}
			let l = (x * x + y * y).sqrt();
			if l == 0.0 {
				continue;
			}
			let k = (l - link.distance) / l * alpha * link.strength;
			let (x, y) = (x * k, y * k);

			let target = &mut self.nodes[link.target];
			target.vx -= x * link.bias;
			target.vy -= y * link.bias;
			let source = &mut self.nodes[link.source];
			source.vx += x * (1.0 - link.bias);
			source.vy += y * (1.0 - link.bias);
		}
	}

	fn apply_charge_force(&mut self) {
		let strength = self.config.charge_strength;
		if strength == 0.0 {
			return;
		}
		let alpha = self.alpha;
		let min2 = self.config.charge_distance_min * self.config.charge_distance_min;
		let n = self.nodes.len();

		for i in 0..n {
			let (mut dvx, mut dvy) = (0.0, 0.0);
			for j in 0..n {
				if i == j {
					continue;
				}
				let mut x = self.nodes[j].x - self.nodes[i].x;
				let mut y = self.nodes[j].y - self.nodes[i].y;
				let mut l = x * x + y * y;
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				if l < min2 {
					l = (min2 * l).sqrt();
				}
				let w = strength * alpha / l;
				dvx += x * w;
				dvy += y * w;
			}
			self.nodes[i].vx += dvx;
			self.nodes[i].vy += dvy;
		}
	}

	fn apply_center_force(&mut self) {
		let n = self.nodes.len();
		if n == 0 {
			return;
		}
		let (sum_x, sum_y) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let shift_x = (sum_x / n as f64 - self.center.0) * self.config.center_strength;
		let shift_y = (sum_y / n as f64 - self.center.1) * self.config.center_strength;
		for node in &mut self.nodes {
			node.x -= shift_x;
			node.y -= shift_y;
		}
	}

	fn apply_collision_force(&mut self) {
		let strength = self.config.collision_strength;
		if strength <= 0.0 {
			return;
		}
		let n = self.nodes.len();

		for i in 0..n {
			let ri = self.nodes[i].collide_radius;
			let ri2 = ri * ri;
			let xi = self.nodes[i].x + self.nodes[i].vx;
			let yi = self.nodes[i].y + self.nodes[i].vy;

			for j in (i + 1)..n {
				let rj = self.nodes[j].collide_radius;
				let r = ri + rj;
				let mut x = xi - self.nodes[j].x - self.nodes[j].vx;
				let mut y = yi - self.nodes[j].y - self.nodes[j].vy;
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				let dist = l.sqrt();
				if dist == 0.0 {
					continue;
				}
				let k = (r - dist) / dist * strength;
				let (x, y) = (x * k, y * k);
				let rj2 = rj * rj;
				let share = rj2 / (ri2 + rj2);

				self.nodes[i].vx += x * share;
				self.nodes[i].vy += y * share;
				self.nodes[j].vx -= x * (1.0 - share);
				self.nodes[j].vy -= y * (1.0 - share);
			}
		}
	}

	fn integrate(&mut self) {
		let keep = 1.0 - self.config.velocity_decay;
		for node in &mut self.nodes {
			match node.pin {
				Some((fx, fy)) => {
					node.x = fx;
					node.y = fy;
					node.vx = 0.0;
					node.vy = 0.0;
				}
				None => {
					node.vx *= keep;
					node.vy *= keep;
					node.x += node.vx;
					node.y += node.vy;
				}
			}
		}
	}
}
