//! Pure mappings from note data to layout and presentation values.
//!
//! Nothing here holds state, so two graphs on the same page never share a
//! colour or size assignment.

/// Category-10 palette.
pub const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Group key used for notes without a group.
pub const DEFAULT_GROUP: &str = "default";

/// Clamp a similarity weight into `[0, 1]`. NaN becomes `0`.
pub fn clamp_weight(weight: f64) -> f64 {
	if weight.is_nan() {
		0.0
	} else {
		weight.clamp(0.0, 1.0)
	}
}

/// Rest length of a link: more similar notes sit closer together.
pub fn link_distance(base_distance: f64, weight: f64) -> f64 {
	base_distance * (1.0 - clamp_weight(weight))
}

/// Stroke width of an edge.
pub fn edge_width(weight: f64, factor: f64) -> f64 {
	(clamp_weight(weight) * factor).sqrt()
}

/// Resting stroke opacity of an edge.
pub fn edge_opacity(weight: f64, base: f64, gain: f64) -> f64 {
	base + clamp_weight(weight) * gain
}

/// Colour for a group, stable across graphs and page loads.
pub fn group_color<'a>(group: Option<&str>, palette: &[&'a str]) -> &'a str {
	if palette.is_empty() {
		return "#999";
	}
	let key = group.unwrap_or(DEFAULT_GROUP);
	// FNV-1a
	let hash = key
		.bytes()
		.fold(0x811c_9dc5_u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193));
	palette[hash as usize % palette.len()]
}

/// Clamped linear mapping from a note's size weight to its radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeScale {
	pub domain: (f64, f64),
	pub range: (f64, f64),
	/// Size used when a note carries none.
	pub default_size: f64,
}

impl Default for SizeScale {
	fn default() -> Self {
		Self {
			domain: (0.8, 2.0),
			range: (8.0, 20.0),
			default_size: 1.0,
		}
	}
}

impl SizeScale {
	pub fn radius(&self, size: Option<f64>) -> f64 {
		let size = size
			.filter(|s| s.is_finite())
			.unwrap_or(self.default_size);
		let (d0, d1) = self.domain;
		let (r0, r1) = self.range;
		if (d1 - d0).abs() < f64::EPSILON {
			return r0;
		}
		let t = ((size - d0) / (d1 - d0)).clamp(0.0, 1.0);
		r0 + (r1 - r0) * t
	}
}
