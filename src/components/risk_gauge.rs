//! Canvas dial for the unbounded assessment score.

use std::f64::consts::PI;

use leptos::html::Canvas;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::risk::AssessmentScale;

/// Dial sweep in degrees, measured clockwise from twelve o'clock.
pub const MIN_DEG: f64 = -135.0;
pub const MAX_DEG: f64 = 135.0;
pub const TOTAL_TICKS: usize = 40;

const SIZE: f64 = 320.0;
const UNLIT: &str = "#404040";

pub fn needle_degrees(fraction: f64) -> f64 {
	MIN_DEG + fraction.clamp(0.0, 1.0) * (MAX_DEG - MIN_DEG)
}

pub fn tick_degrees(i: usize) -> f64 {
	MIN_DEG + (i as f64 / TOTAL_TICKS as f64) * (MAX_DEG - MIN_DEG)
}

/// Ticks at or behind the needle, counting the one at the start of the sweep.
pub fn lit_ticks(fraction: f64) -> usize {
	let needle = needle_degrees(fraction);
	(0..=TOTAL_TICKS)
		.take_while(|&i| tick_degrees(i) <= needle + 1e-9)
		.count()
}

pub fn score_readout(score: u64) -> String {
	format!("{score:04}")
}

fn to_canvas_radians(deg: f64) -> f64 {
	(deg - 90.0) * PI / 180.0
}

fn draw(ctx: &CanvasRenderingContext2d, score: u64, scale: &AssessmentScale) {
	let (cx, cy) = (SIZE / 2.0, SIZE / 2.0);
	let color = scale.color(score).to_hex();
	let fraction = scale.gauge_fraction(score);
	let lit = lit_ticks(fraction);

	ctx.clear_rect(0.0, 0.0, SIZE, SIZE);
	ctx.set_fill_style_str("#0a0a0a");
	ctx.fill_rect(0.0, 0.0, SIZE, SIZE);

	ctx.set_line_cap("round");
	ctx.set_line_width(4.0);
	for i in 0..=TOTAL_TICKS {
		let a = to_canvas_radians(tick_degrees(i));
		let (inner, outer) = (SIZE * 0.42, SIZE * 0.47);
		ctx.set_global_alpha(if i < lit { 1.0 } else { 0.2 });
		ctx.set_stroke_style_str(if i < lit { color.as_str() } else { UNLIT });
		ctx.begin_path();
		ctx.move_to(cx + inner * a.cos(), cy + inner * a.sin());
		ctx.line_to(cx + outer * a.cos(), cy + outer * a.sin());
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);

	ctx.begin_path();
	let _ = ctx.arc(cx, cy, SIZE * 0.35, 0.0, 2.0 * PI);
	ctx.set_fill_style_str("#171717");
	ctx.fill();
	ctx.set_stroke_style_str("#262626");
	ctx.set_line_width(1.0);
	ctx.stroke();

	let a = to_canvas_radians(needle_degrees(fraction));
	ctx.set_stroke_style_str(&color);
	ctx.set_line_width(6.0);
	ctx.begin_path();
	ctx.move_to(cx + SIZE * 0.22 * a.cos(), cy + SIZE * 0.22 * a.sin());
	ctx.line_to(cx + SIZE * 0.31 * a.cos(), cy + SIZE * 0.31 * a.sin());
	ctx.stroke();

	ctx.set_text_align("center");
	ctx.set_fill_style_str("#737373");
	ctx.set_font("12px monospace");
	let _ = ctx.fill_text("RISK", cx, cy - 8.0);
	ctx.set_fill_style_str(&color);
	ctx.set_font("bold 36px monospace");
	let _ = ctx.fill_text(&score_readout(score), cx, cy + 30.0);
	ctx.set_text_align("start");
}

/// Draws the dial into `node_ref`, which the report reuses as its snapshot.
#[component]
pub fn RiskGauge(
	#[prop(into)] score: Signal<u64>,
	scale: AssessmentScale,
	node_ref: NodeRef<Canvas>,
) -> impl IntoView {
	Effect::new(move |_| {
		let score = score.get();
		let Some(canvas) = node_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		canvas.set_width(SIZE as u32);
		canvas.set_height(SIZE as u32);
		match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		{
			Some(ctx) => draw(&ctx, score, &scale),
			None => log::warn!("risk gauge has no 2d context"),
		}
	});

	view! { <canvas node_ref=node_ref class="risk-gauge" /> }
}
