use crate::config::CameraConfig;
use crate::error::SurfaceError;

use super::schedule::TaskQueue;

const APPLY_TASK: &str = "apply-scale";
const SETTLE_TASK: &str = "settle-scale";
const FIT_TASK: &str = "auto-fit";

/// Something that can move a camera. Implemented by the canvas state.
pub trait CameraSurface {
	fn move_camera(&mut self, distance: f64, transition_ms: u32) -> Result<(), SurfaceError>;
	fn zoom_to_fit(&mut self, duration_ms: u32, padding: f64) -> Result<(), SurfaceError>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraCommand {
	MoveTo { distance: f64, transition_ms: u32 },
	ZoomToFit { duration_ms: u32, padding: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum CameraTask {
	Apply,
	Settle(f64),
	AutoFit,
}

/// `max(min_distance, reference / max(floor, scale))`, unclamped input.
pub fn camera_distance(scale: f64, config: &CameraConfig) -> f64 {
	(config.reference_distance / scale.max(config.scale_floor)).max(config.min_distance)
}

/// Zoom slider value, clamped to the configured range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomState {
	scale: f64,
}

impl ZoomState {
	pub fn new(scale: f64, config: &CameraConfig) -> Self {
		let mut zoom = Self { scale: 1.0 };
		zoom.set(scale, config);
		zoom
	}

	pub fn scale(&self) -> f64 {
		self.scale
	}

	pub fn set(&mut self, scale: f64, config: &CameraConfig) {
		self.scale = if scale.is_nan() {
			config.min_scale
		} else {
			scale.clamp(config.min_scale, config.max_scale)
		};
	}

	pub fn camera_distance(&self, config: &CameraConfig) -> f64 {
		camera_distance(self.scale, config)
	}
}

/// Owns the zoom state of one view and the deferred camera work tied to the
/// graph currently on screen.
#[derive(Clone, Debug)]
pub struct CameraController {
	config: CameraConfig,
	zoom: ZoomState,
	queue: TaskQueue<CameraTask>,
	loaded: bool,
}

impl CameraController {
	pub fn new(config: CameraConfig) -> Self {
		Self {
			zoom: ZoomState::new(config.initial_scale, &config),
			config,
			queue: TaskQueue::new(),
			loaded: false,
		}
	}

	pub fn config(&self) -> &CameraConfig {
		&self.config
	}

	pub fn scale(&self) -> f64 {
		self.zoom.scale()
	}

	pub fn camera_distance(&self) -> f64 {
		self.zoom.camera_distance(&self.config)
	}

	/// Updates the zoom and, once a graph is on screen, queues a camera move.
	/// An explicit scale supersedes a pending settle. Returns the new camera
	/// distance.
	pub fn set_scale(&mut self, scale: f64, now_ms: f64) -> f64 {
		self.zoom.set(scale, &self.config);
		if self.loaded {
			self.queue.cancel(SETTLE_TASK);
			self.queue.schedule(APPLY_TASK, now_ms, 0, CameraTask::Apply);
		}
		self.camera_distance()
	}

	/// Called once per successful graph load. Starts zoomed in, settles to the
	/// resting zoom shortly after and frames the content once layout has had
	/// time to spread it out.
	pub fn content_ready(&mut self, node_count: usize, now_ms: f64) {
		self.queue.clear();
		self.loaded = true;
		self.set_scale(self.config.initial_scale, now_ms);
		self.queue.schedule(
			SETTLE_TASK,
			now_ms,
			self.config.settle_delay_ms,
			CameraTask::Settle(self.config.settled_scale),
		);
		if node_count > 0 {
			self.queue
				.schedule(FIT_TASK, now_ms, self.config.fit_delay_ms, CameraTask::AutoFit);
		}
		log::debug!("camera primed for {node_count} nodes");
	}

	/// Drops pending work and returns to the initial zoom. Call when the view
	/// navigates away or starts a new load.
	pub fn reset(&mut self) {
		self.queue.clear();
		self.loaded = false;
		self.zoom.set(self.config.initial_scale, &self.config);
	}

	pub fn is_loaded(&self) -> bool {
		self.loaded
	}

	pub fn has_pending(&self) -> bool {
		!self.queue.is_empty()
	}

	/// Commands due at `now_ms`, in the order they should be applied.
	pub fn poll(&mut self, now_ms: f64) -> Vec<CameraCommand> {
		self.queue
			.drain_due(now_ms)
			.into_iter()
			.map(|(_, task)| match task {
				CameraTask::Apply => self.move_command(),
				CameraTask::Settle(scale) => {
					self.zoom.set(scale, &self.config);
					self.move_command()
				}
				CameraTask::AutoFit => CameraCommand::ZoomToFit {
					duration_ms: self.config.fit_duration_ms,
					padding: self.config.fit_padding,
				},
			})
			.collect()
	}

	/// Polls and applies due commands. Failures are logged and dropped.
	pub fn drive<S: CameraSurface>(&mut self, now_ms: f64, mut surface: Option<&mut S>) {
		for command in self.poll(now_ms) {
			let result = match surface.as_deref_mut() {
				None => Err(SurfaceError::NotMounted),
				Some(s) => apply(s, command),
			};
			if let Err(err) = result {
				log::warn!("camera command {command:?} skipped: {err}");
			}
		}
	}

	fn move_command(&self) -> CameraCommand {
		CameraCommand::MoveTo {
			distance: self.camera_distance(),
			transition_ms: self.config.transition_ms,
		}
	}
}

impl Default for CameraController {
	fn default() -> Self {
		Self::new(CameraConfig::default())
	}
}

fn apply<S: CameraSurface>(surface: &mut S, command: CameraCommand) -> Result<(), SurfaceError> {
	match command {
		CameraCommand::MoveTo {
			distance,
			transition_ms,
		} => surface.move_camera(distance, transition_ms),
		CameraCommand::ZoomToFit {
			duration_ms,
			padding,
		} => surface.zoom_to_fit(duration_ms, padding),
	}
}
