mod controller;
mod schedule;

pub use controller::{
	CameraCommand, CameraController, CameraSurface, ZoomState, camera_distance,
};
pub use schedule::{LoadGeneration, TaskQueue};
