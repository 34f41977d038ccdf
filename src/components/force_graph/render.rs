use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scene::{EdgeShape, GraphStyle, NodeShape, Scene};
use super::state::ForceGraphState;

/// Redraw the whole surface from the current state.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (width, height) = state.size();
	ctx.set_global_alpha(1.0);
	ctx.clear_rect(0.0, 0.0, width, height);
	if let Some(background) = &state.style().background {
		ctx.set_fill_style_str(background);
		ctx.fill_rect(0.0, 0.0, width, height);
	}
	let Some(scene) = state.scene() else {
		return;
	};

	let transform = state.transform();
	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);
	draw_edges(&scene, state.style().arrow_size, ctx);
	draw_nodes(&scene, ctx);
	draw_labels(&scene, state.style(), ctx);
	ctx.restore();
}

fn draw_edges(scene: &Scene<'_>, arrow_size: f64, ctx: &CanvasRenderingContext2d) {
	for edge in &scene.edges {
		let EdgeShape {
			from: (x1, y1),
			to: (x2, y2),
			target_radius,
			color,
			width,
			opacity,
		} = *edge;
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		ctx.set_global_alpha(opacity);
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();

		if dist <= target_radius + arrow_size {
			continue;
		}
		ctx.set_fill_style_str(color);
		let (tip_x, tip_y) = (x2 - ux * target_radius, y2 - uy * target_radius);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(scene: &Scene<'_>, ctx: &CanvasRenderingContext2d) {
	for node in &scene.nodes {
		let NodeShape {
			center: (x, y),
			radius,
			fill,
			stroke,
			stroke_width,
			..
		} = *node;
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(fill);
		ctx.fill();
		ctx.set_stroke_style_str(stroke);
		ctx.set_line_width(stroke_width);
		ctx.stroke();
	}
}

fn draw_labels(scene: &Scene<'_>, style: &GraphStyle, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(&style.label_color);
	ctx.set_font(&format!("{}px sans-serif", style.label_font_px));
	ctx.set_text_align("center");
	for node in &scene.nodes {
		if node.label.is_empty() {
			continue;
		}
		let (x, y) = node.center;
		let _ = ctx.fill_text(node.label, x, y + node.label_dy);
	}
}
