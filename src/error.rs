//! Error types shared by the payload boundary, the rendering surface and the
//! report exporter.

use thiserror::Error;

/// A risk payload that failed schema validation.
#[derive(Error, Debug)]
pub enum PayloadError {
	#[error("Malformed payload: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Payload has an empty root wallet")]
	EmptyRoot,

	#[error("Node at index {index} has an empty id")]
	EmptyId { index: usize },

	#[error("Node '{id}' appears more than once")]
	DuplicateNode { id: String },

	#[error("Node '{id}' has suspicious score {score}, expected 0-100")]
	ScoreOutOfRange { id: String, score: u32 },

	#[error("Node '{id}' has invalid balance {balance}")]
	InvalidBalance { id: String, balance: f64 },
}

/// Failure of a `/validate` round trip.
#[derive(Error, Debug)]
pub enum FetchError {
	#[error("API error: {status} {reason}")]
	Status { status: u16, reason: String },

	#[error("Request failed: {0}")]
	Transport(#[from] reqwest::Error),

	#[error(transparent)]
	Payload(#[from] PayloadError),
}

/// Camera commands the canvas could not honour.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
	#[error("Rendering surface is not mounted")]
	NotMounted,

	#[error("Nothing to frame: graph has no nodes")]
	EmptyGraph,
}

/// Rasterizing a visual handle for the report failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
	#[error("Visual element is not available")]
	Unavailable,

	#[error("Visual element has zero size")]
	ZeroSize,

	#[error("Encoding failed: {0}")]
	Encode(String),
}

pub type PayloadResult<T> = Result<T, PayloadError>;
