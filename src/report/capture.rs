use web_sys::HtmlCanvasElement;

use crate::error::CaptureError;

/// Encoded raster plus its pixel size.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
	pub data_url: String,
	pub width: u32,
	pub height: u32,
}

impl RasterImage {
	/// Height that keeps the source aspect ratio at `width`.
	pub fn scaled_height(&self, width: f64) -> f64 {
		if self.width == 0 {
			return 0.0;
		}
		self.height as f64 / self.width as f64 * width
	}
}

/// A visual element that can be rasterized for the report.
pub trait VisualCapture {
	fn capture(&self) -> Result<RasterImage, CaptureError>;
}

/// Captures a `<canvas>` element through `toDataURL`.
pub struct CanvasCapture {
	canvas: Option<HtmlCanvasElement>,
}

impl CanvasCapture {
	pub fn new(canvas: Option<HtmlCanvasElement>) -> Self {
		Self { canvas }
	}
}

impl VisualCapture for CanvasCapture {
	fn capture(&self) -> Result<RasterImage, CaptureError> {
		let canvas = self.canvas.as_ref().ok_or(CaptureError::Unavailable)?;
		let (width, height) = (canvas.width(), canvas.height());
		if width == 0 || height == 0 {
			return Err(CaptureError::ZeroSize);
		}
		let data_url = canvas
			.to_data_url_with_type("image/png")
			.map_err(|e| CaptureError::Encode(format!("{e:?}")))?;
		Ok(RasterImage {
			data_url,
			width,
			height,
		})
	}
}
