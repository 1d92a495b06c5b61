use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::GraphData;
use crate::camera::CameraSurface;
use crate::error::SurfaceError;

const RING_BASE: f64 = 60.0;
const RING_STEP: f64 = 90.0;
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: Option<String>,
	pub color: String,
	pub glow: Option<String>,
	pub radius: f64,
	pub hit_radius: f64,
	pub label_scale: f64,
}

#[derive(Clone, Debug)]
pub struct LinkInfo {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub color: String,
	pub width: f64,
}

/// Screen = graph * k + (x, y).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// Eased move of the view transform, timed on `flow_time`.
#[derive(Clone, Copy, Debug)]
struct CameraTween {
	from: ViewTransform,
	to: ViewTransform,
	start: f64,
	duration: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	links: Vec<LinkInfo>,
	ids: HashMap<DefaultNodeIdx, String>,
	reference_distance: f64,
	tween: Option<CameraTween>,
}

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

impl ForceGraphState {
	/// `reference_distance` is the camera distance drawn at zoom 1.
	pub fn new(data: &GraphData, width: f64, height: f64, reference_distance: f64) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 400.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});
		let mut id_to_idx = HashMap::new();
		let mut ids = HashMap::new();
		let mut links = Vec::new();

		let count = data.nodes.len().max(1) as f64;
		for (i, node) in data.nodes.iter().enumerate() {
			// Seed each wallet on a ring per layer so the layout settles quickly.
			let angle = (i as f64) * 2.0 * PI / count;
			let ring = RING_BASE + RING_STEP * node.layer as f64;
			let (x, y) = ((ring * angle.cos()) as f32, (ring * angle.sin()) as f32);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					color: node.color.clone(),
					glow: node.glow.clone(),
					radius: node.radius,
					hit_radius: node.hit_radius,
					label_scale: node.label_scale,
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
			ids.insert(idx, node.id.clone());
		}

		for link in &data.links {
			let (Some(&src), Some(&tgt)) = (id_to_idx.get(&link.source), id_to_idx.get(&link.target))
			else {
				log::debug!("dropping link {} -> {}: unknown endpoint", link.source, link.target);
				continue;
			};
			if src != tgt {
				graph.add_edge(src, tgt, EdgeData::default());
			}
			links.push(LinkInfo {
				source: src,
				target: tgt,
				color: link.color.clone(),
				width: link.width,
			});
		}

		Self {
			graph,
			links,
			ids,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
			reference_distance,
			tween: None,
		}
	}

	pub fn links(&self) -> &[LinkInfo] {
		&self.links
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<&str> {
		self.ids.get(&idx).map(String::as_str)
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// Hit radius is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.hit_radius {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for link in &self.links {
				if link.source == idx {
					self.hover.neighbors.insert(link.target);
				} else if link.target == idx {
					self.hover.neighbors.insert(link.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Cancels any camera move in flight; user input takes over.
	pub fn interrupt_camera(&mut self) {
		self.tween = None;
	}

	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		self.interrupt_camera();
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	fn start_tween(&mut self, to: ViewTransform, duration_ms: u32) {
		if duration_ms == 0 {
			self.transform = to;
			self.tween = None;
			return;
		}
		self.tween = Some(CameraTween {
			from: self.transform,
			to,
			start: self.flow_time,
			duration: duration_ms as f64 / 1000.0,
		});
	}

	fn step_tween(&mut self) {
		let Some(tween) = self.tween else {
			return;
		};
		let t = ((self.flow_time - tween.start) / tween.duration).clamp(0.0, 1.0);
		let e = ease_out_cubic(t);
		let lerp = |a: f64, b: f64| a + (b - a) * e;
		self.transform = ViewTransform {
			x: lerp(tween.from.x, tween.to.x),
			y: lerp(tween.from.y, tween.to.y),
			k: lerp(tween.from.k, tween.to.k),
		};
		if t >= 1.0 {
			self.tween = None;
		}
	}

	/// Axis-aligned bounds of all nodes including their radius.
	pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let r = node.data.user_data.radius;
			let (x, y) = (node.x() as f64, node.y() as f64);
			bounds = Some(match bounds {
				None => (x - r, y - r, x + r, y + r),
				Some((x0, y0, x1, y1)) => (x0.min(x - r), y0.min(y - r), x1.max(x + r), y1.max(y + r)),
			});
		});
		bounds
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;
		self.step_tween();

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}
}

impl CameraSurface for ForceGraphState {
	/// Looks at the origin from `distance`; zoom is inversely proportional.
	fn move_camera(&mut self, distance: f64, transition_ms: u32) -> Result<(), SurfaceError> {
		let k = (self.reference_distance / distance.max(f64::EPSILON)).clamp(MIN_ZOOM, MAX_ZOOM);
		let to = ViewTransform {
			x: self.width / 2.0,
			y: self.height / 2.0,
			k,
		};
		self.start_tween(to, transition_ms);
		Ok(())
	}

	fn zoom_to_fit(&mut self, duration_ms: u32, padding: f64) -> Result<(), SurfaceError> {
		let (x0, y0, x1, y1) = self.bounds().ok_or(SurfaceError::EmptyGraph)?;
		let (bw, bh) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let (aw, ah) = (
			(self.width - 2.0 * padding).max(1.0),
			(self.height - 2.0 * padding).max(1.0),
		);
		let k = (aw / bw).min(ah / bh).clamp(MIN_ZOOM, MAX_ZOOM);
		let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		let to = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
		self.start_tween(to, duration_ms);
		Ok(())
	}
}
