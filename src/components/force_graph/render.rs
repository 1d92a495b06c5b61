use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, ease_out_cubic};

const BACKGROUND: &str = "#0a0a0a";
const LABEL_PX: f64 = 10.0;

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (dash, gap) = (8.0 / k, 4.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();
	let positions = state.positions();

	for link in state.links() {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&link.source), positions.get(&link.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		// Highlighted links keep their color and thicken; the rest fade out.
		let lit = state.is_highlighted(link.source) && state.is_highlighted(link.target);
		let (alpha, width) = match (has_highlight, lit) {
			(false, _) => (1.0, link.width / k),
			(true, true) => (1.0, link.width * (1.0 + 0.5 * t) / k),
			(true, false) => (1.0 - 0.75 * t, link.width * (1.0 - 0.3 * t) / k),
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(&link.color);
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		// Slight bend so parallel links stay distinguishable.
		let (mx, my) = ((x1 + x2) / 2.0 - dy * 0.1, (y1 + y2) / 2.0 + dx * 0.1);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.quadratic_curve_to(mx, my, x2, y2);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	ctx.set_global_alpha(1.0);
}

fn draw_glow(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, glow: &str, strength: f64) {
	let outer = radius * (1.6 + 0.8 * strength);
	let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.5, x, y, outer) else {
		return;
	};
	if gradient.add_color_stop(0.0, glow).is_err()
		|| gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0)").is_err()
	{
		return;
	}
	ctx.begin_path();
	let _ = ctx.arc(x, y, outer, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}

fn draw_label(ctx: &CanvasRenderingContext2d, text: &str, x: f64, y: f64, scale: f64, k: f64, alpha: f64) {
	ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha));
	let px = LABEL_PX * (0.8 + 0.1 * scale) / k.max(0.5);
	ctx.set_font(&format!("{}px sans-serif", px));
	ctx.set_text_align("center");
	let _ = ctx.fill_text(text, x, y + 3.0);
	ctx.set_text_align("start");
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let (alpha, radius) = if has_highlight {
			(1.0 - 0.7 * t, info.radius * (1.0 - 0.15 * t))
		} else {
			(1.0, info.radius)
		};

		ctx.set_global_alpha(alpha);
		if let Some(glow) = &info.glow {
			draw_glow(ctx, x, y, radius, glow, 0.0);
		}
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.color);
		ctx.fill();
		ctx.set_global_alpha(1.0);

		if let Some(label) = &info.label {
			draw_label(ctx, label, x, y, info.label_scale, k, alpha * 0.9);
		}
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let is_hovered = state.is_hovered(idx);
		let is_neighbor =
			state.hover.neighbors.contains(&idx) || state.hover.prev_neighbors.contains(&idx);

		let (radius, strength) = if is_hovered {
			(info.radius * (1.0 + 0.35 * t), t)
		} else if is_neighbor {
			(info.radius * (1.0 + 0.2 * t), 0.5 * t)
		} else {
			(info.radius, 0.0)
		};

		if let Some(glow) = &info.glow {
			draw_glow(ctx, x, y, radius, glow, strength);
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.color);
		ctx.fill();

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		if let Some(label) = &info.label {
			draw_label(ctx, label, x, y, info.label_scale, k, 1.0);
		}
	});
}
