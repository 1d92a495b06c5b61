//! Risk report synthesis against an abstract paginated canvas.

mod canvas;
mod capture;
mod svg;
mod synthesizer;

pub use canvas::{
	DrawCommand, Font, FontFamily, FontWeight, PageCanvas, PageSize, RecordingCanvas, wrap_text,
};
pub use capture::{CanvasCapture, RasterImage, VisualCapture};
pub use svg::SvgPageCanvas;
pub use synthesizer::{
	NetworkStats, ReportDocument, ReportLayout, ReportSynthesizer, RiskReport, top_risk_nodes,
};
