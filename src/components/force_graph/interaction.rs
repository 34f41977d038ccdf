//! Pointer input to graph actions: pan, zoom, drag, hover and click.
//!
//! The controller never touches the simulation. Drags come out as
//! [`DragCommand`]s for the owner to apply.

use super::simulation::DragCommand;

/// Screen = graph * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	#[allow(dead_code)]
	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ZoomConfig {
	pub min_scale: f64,
	pub max_scale: f64,
	pub initial_scale: f64,
	/// Initial translation as a fraction of the surface size.
	pub initial_offset: f64,
	/// Scale exponent per wheel delta unit.
	pub wheel_sensitivity: f64,
	/// Pointer travel, in pixels, below which a press still counts as a click.
	pub click_tolerance: f64,
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.1,
			max_scale: 4.0,
			initial_scale: 0.9,
			initial_offset: 0.05,
			wheel_sensitivity: 0.002,
			click_tolerance: 3.0,
		}
	}
}

impl ZoomConfig {
	/// The usable `(min, max)` scale extent. Inverted bounds are swapped and
	/// non-finite or non-positive ones fall back to the defaults.
	pub fn extent(&self) -> (f64, f64) {
		let defaults = Self::default();
		let min = positive_or(self.min_scale, defaults.min_scale);
		let max = positive_or(self.max_scale, defaults.max_scale);
		(min.min(max), min.max(max))
	}

	pub fn clamp(&self, k: f64) -> f64 {
		let (min, max) = self.extent();
		if k.is_nan() {
			return positive_or(self.initial_scale, Self::default().initial_scale).clamp(min, max);
		}
		k.clamp(min, max)
	}

	fn offset(&self) -> f64 {
		if self.initial_offset.is_finite() {
			self.initial_offset
		} else {
			Self::default().initial_offset
		}
	}
}

fn positive_or(value: f64, fallback: f64) -> f64 {
	if value.is_finite() && value > 0.0 { value } else { fallback }
}

/// A node under the pointer and where it currently sits in layout space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeHit {
	pub node: usize,
	pub x: f64,
	pub y: f64,
}

/// What the owner should do after a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerResponse {
	pub command: Option<DragCommand>,
	pub clicked: Option<usize>,
	pub redraw: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Gesture {
	#[default]
	Idle,
	Drag {
		node: usize,
		press: (f64, f64),
		grab: (f64, f64),
		origin: (f64, f64),
		moved: bool,
	},
	Pan {
		press: (f64, f64),
		origin: (f64, f64),
	},
}

#[derive(Clone, Debug)]
pub struct InteractionController {
	zoom: ZoomConfig,
	transform: ViewTransform,
	gesture: Gesture,
	hover: Option<usize>,
}

impl InteractionController {
	pub fn new(zoom: ZoomConfig) -> Self {
		Self {
			transform: ViewTransform {
				k: zoom.clamp(zoom.initial_scale),
				..ViewTransform::default()
			},
			zoom,
			gesture: Gesture::Idle,
			hover: None,
		}
	}

	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hover
	}

	/// Node currently being dragged.
	pub fn dragged(&self) -> Option<usize> {
		match self.gesture {
			Gesture::Drag { node, .. } => Some(node),
			_ => None,
		}
	}

	/// Initial view for a surface: slightly zoomed out and inset.
	pub fn reset_view(&mut self, width: f64, height: f64) {
		self.transform = ViewTransform {
			x: width * self.zoom.offset(),
			y: height * self.zoom.offset(),
			k: self.zoom.clamp(self.zoom.initial_scale),
		};
	}

	/// Forget per-snapshot state: node indices from the old snapshot are void.
	pub fn reset_nodes(&mut self) {
		self.gesture = Gesture::Idle;
		self.hover = None;
	}

	/// Set the scale directly, clamped to the configured extent.
	pub fn set_scale(&mut self, k: f64) -> f64 {
		self.transform.k = self.zoom.clamp(k);
		self.transform.k
	}

	/// Zoom to `k` keeping the screen point `(sx, sy)` over the same graph point.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, k: f64) {
		let (gx, gy) = self.transform.screen_to_graph(sx, sy);
		let k = self.zoom.clamp(k);
		self.transform = ViewTransform {
			x: sx - gx * k,
			y: sy - gy * k,
			k,
		};
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) -> PointerResponse {
		let factor = 2f64.powf(-delta_y * self.zoom.wheel_sensitivity);
		if !delta_y.is_finite() || !factor.is_finite() {
			return PointerResponse::default();
		}
		let k = self.zoom.clamp(self.transform.k * factor);
		if k == self.transform.k {
			return PointerResponse::default();
		}
		self.zoom_at(sx, sy, k);
		PointerResponse {
			redraw: true,
			..PointerResponse::default()
		}
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64, hit: Option<NodeHit>) -> PointerResponse {
		match hit {
			Some(hit) => {
				self.gesture = Gesture::Drag {
					node: hit.node,
					press: (sx, sy),
					grab: self.transform.screen_to_graph(sx, sy),
					origin: (hit.x, hit.y),
					moved: false,
				};
				let redraw = self.hover != Some(hit.node);
				self.hover = Some(hit.node);
				PointerResponse {
					command: Some(DragCommand::Start { node: hit.node }),
					redraw,
					..PointerResponse::default()
				}
			}
			None => {
				self.gesture = Gesture::Pan {
					press: (sx, sy),
					origin: (self.transform.x, self.transform.y),
				};
				PointerResponse::default()
			}
		}
	}

	/// `hit` is the node under the pointer, used for hover while idle.
	pub fn pointer_move(&mut self, sx: f64, sy: f64, hit: Option<usize>) -> PointerResponse {
		let tolerance = self.zoom.click_tolerance;
		match &mut self.gesture {
			Gesture::Drag {
				node,
				press,
				grab,
				origin,
				moved,
			} => {
				*moved |= travelled(*press, (sx, sy)) > tolerance;
				let (gx, gy) = self.transform.screen_to_graph(sx, sy);
				PointerResponse {
					command: Some(DragCommand::Move {
						node: *node,
						x: origin.0 + (gx - grab.0),
						y: origin.1 + (gy - grab.1),
					}),
					..PointerResponse::default()
				}
			}
			Gesture::Pan { press, origin } => {
				self.transform.x = origin.0 + (sx - press.0);
				self.transform.y = origin.1 + (sy - press.1);
				PointerResponse {
					redraw: true,
					..PointerResponse::default()
				}
			}
			Gesture::Idle => {
				let redraw = self.hover != hit;
				self.hover = hit;
				PointerResponse {
					redraw,
					..PointerResponse::default()
				}
			}
		}
	}

	/// `hit` is the node under the pointer at release.
	pub fn pointer_up(&mut self, hit: Option<usize>) -> PointerResponse {
		let gesture = std::mem::take(&mut self.gesture);
		match gesture {
			Gesture::Drag { node, moved, .. } => PointerResponse {
				command: Some(DragCommand::End { node }),
				clicked: (!moved && hit == Some(node)).then_some(node),
				redraw: false,
			},
			Gesture::Pan { .. } | Gesture::Idle => PointerResponse::default(),
		}
	}

	/// Pointer left the surface: abandon any gesture and drop hover.
	pub fn pointer_leave(&mut self) -> PointerResponse {
		let command = match std::mem::take(&mut self.gesture) {
			Gesture::Drag { node, .. } => Some(DragCommand::End { node }),
			_ => None,
		};
		let redraw = self.hover.take().is_some();
		PointerResponse {
			command,
			clicked: None,
			redraw,
		}
	}
}

fn travelled(from: (f64, f64), to: (f64, f64)) -> f64 {
	((to.0 - from.0).powi(2) + (to.1 - from.1).powi(2)).sqrt()
}
