//! Build-time and default configuration.

use serde::{Deserialize, Serialize};

use crate::risk::{AssessmentScale, GraphRiskScale, LinkRiskScale};

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Where the risk service lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
	pub backend_url: String,
	/// Forwarded verbatim as `BASE_URL` in every `/validate` request.
	pub base_url: String,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			backend_url: option_env!("RISK_BACKEND_URL")
				.unwrap_or(DEFAULT_BACKEND_URL)
				.trim_end_matches('/')
				.to_string(),
			base_url: option_env!("RISK_BASE_URL")
				.unwrap_or(DEFAULT_BASE_URL)
				.to_string(),
		}
	}
}

impl ApiConfig {
	pub fn validate_url(&self) -> String {
		format!("{}/validate", self.backend_url)
	}
}

/// Camera tuning. Distances are in the surface's reference units where
/// `reference_distance` equals a zoom factor of 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
	pub min_scale: f64,
	pub max_scale: f64,
	pub scale_step: f64,
	pub reference_distance: f64,
	pub min_distance: f64,
	/// Divisor floor so a zero scale never divides by zero.
	pub scale_floor: f64,
	pub transition_ms: u32,
	pub initial_scale: f64,
	pub settled_scale: f64,
	pub settle_delay_ms: u32,
	pub fit_delay_ms: u32,
	pub fit_duration_ms: u32,
	pub fit_padding: f64,
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.5,
			max_scale: 5.0,
			scale_step: 0.1,
			reference_distance: 350.0,
			min_distance: 40.0,
			scale_floor: 0.1,
			transition_ms: 1200,
			initial_scale: 3.5,
			settled_scale: 3.0,
			settle_delay_ms: 100,
			fit_delay_ms: 500,
			fit_duration_ms: 1500,
			fit_padding: 100.0,
		}
	}
}

/// Everything a view needs, assembled once at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
	pub api: ApiConfig,
	pub graph_scale: GraphRiskScale,
	pub link_scale: LinkRiskScale,
	pub assessment_scale: AssessmentScale,
	pub camera: CameraConfig,
}
