//! Paginated drawing surface the report is written against.

use serde::Serialize;

use crate::risk::Rgb;

use super::capture::RasterImage;

/// Points to millimetres.
pub const PT_TO_MM: f64 = 25.4 / 72.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FontFamily {
	Helvetica,
	Courier,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FontWeight {
	Normal,
	Bold,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Font {
	pub family: FontFamily,
	pub weight: FontWeight,
	/// Size in points.
	pub size: f64,
}

impl Font {
	pub const fn helvetica(size: f64) -> Self {
		Self {
			family: FontFamily::Helvetica,
			weight: FontWeight::Normal,
			size,
		}
	}

	pub const fn courier(size: f64) -> Self {
		Self {
			family: FontFamily::Courier,
			weight: FontWeight::Normal,
			size,
		}
	}

	pub const fn bold(self) -> Self {
		Self {
			weight: FontWeight::Bold,
			..self
		}
	}

	/// Average advance of one glyph in millimetres. Courier is exact, the
	/// proportional face is an approximation good enough for wrapping.
	pub fn glyph_width(&self) -> f64 {
		let em = match (self.family, self.weight) {
			(FontFamily::Courier, _) => 0.6,
			(FontFamily::Helvetica, FontWeight::Normal) => 0.5,
			(FontFamily::Helvetica, FontWeight::Bold) => 0.55,
		};
		self.size * PT_TO_MM * em
	}

	pub fn text_width(&self, text: &str) -> f64 {
		text.chars().count() as f64 * self.glyph_width()
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
	Text {
		text: String,
		x: f64,
		y: f64,
		font: Font,
		color: Rgb,
	},
	Line {
		x1: f64,
		y1: f64,
		x2: f64,
		y2: f64,
		color: Rgb,
	},
	FillRect {
		x: f64,
		y: f64,
		width: f64,
		height: f64,
		color: Rgb,
	},
	Image {
		data_url: String,
		x: f64,
		y: f64,
		width: f64,
		height: f64,
	},
	NewPage,
}

/// Page dimensions in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PageSize {
	pub width: f64,
	pub height: f64,
}

impl PageSize {
	pub const A4_PORTRAIT: PageSize = PageSize {
		width: 210.0,
		height: 297.0,
	};
}

pub trait PageCanvas {
	fn page_size(&self) -> PageSize;

	fn draw(&mut self, command: DrawCommand);

	/// Extension of the file this canvas ends up as.
	fn file_extension(&self) -> &'static str;

	fn text(&mut self, text: &str, x: f64, y: f64, font: Font, color: Rgb) {
		self.draw(DrawCommand::Text {
			text: text.to_string(),
			x,
			y,
			font,
			color,
		});
	}

	fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Rgb) {
		self.draw(DrawCommand::Line {
			x1,
			y1,
			x2,
			y2,
			color,
		});
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb) {
		self.draw(DrawCommand::FillRect {
			x,
			y,
			width,
			height,
			color,
		});
	}

	fn image(&mut self, image: &RasterImage, x: f64, y: f64, width: f64, height: f64) {
		self.draw(DrawCommand::Image {
			data_url: image.data_url.clone(),
			x,
			y,
			width,
			height,
		});
	}

	fn add_page(&mut self) {
		self.draw(DrawCommand::NewPage);
	}
}

/// Greedy word wrap to `max_width` millimetres. Words longer than a line are
/// split by character. Always returns at least one line.
pub fn wrap_text(text: &str, font: &Font, max_width: f64) -> Vec<String> {
	let per_line = ((max_width / font.glyph_width()).floor() as usize).max(1);
	let mut lines = Vec::new();
	for paragraph in text.split('\n') {
		let mut current = String::new();
		let mut current_len = 0usize;
		for word in paragraph.split_whitespace() {
			let word_len = word.chars().count();
			if current_len > 0 && current_len + 1 + word_len <= per_line {
				current.push(' ');
				current.push_str(word);
				current_len += 1 + word_len;
				continue;
			}
			if current_len > 0 {
				lines.push(std::mem::take(&mut current));
				current_len = 0;
			}
			let chars: Vec<char> = word.chars().collect();
			let mut chunks = chars.chunks(per_line).peekable();
			while let Some(chunk) = chunks.next() {
				if chunks.peek().is_some() {
					lines.push(chunk.iter().collect());
				} else {
					current = chunk.iter().collect();
					current_len = chunk.len();
				}
			}
		}
		lines.push(current);
	}
	lines
}

/// Keeps every command; handy for tests and for handing the document to a
/// renderer elsewhere as JSON.
#[derive(Clone, Debug, Serialize)]
pub struct RecordingCanvas {
	size: PageSize,
	commands: Vec<DrawCommand>,
}

impl Default for RecordingCanvas {
	fn default() -> Self {
		Self::new(PageSize::A4_PORTRAIT)
	}
}

impl RecordingCanvas {
	pub fn new(size: PageSize) -> Self {
		Self {
			size,
			commands: Vec::new(),
		}
	}

	pub fn commands(&self) -> &[DrawCommand] {
		&self.commands
	}

	pub fn page_count(&self) -> usize {
		1 + self
			.commands
			.iter()
			.filter(|c| matches!(c, DrawCommand::NewPage))
			.count()
	}

	/// Commands grouped per page.
	pub fn pages(&self) -> Vec<&[DrawCommand]> {
		self.commands
			.split(|c| matches!(c, DrawCommand::NewPage))
			.collect()
	}

	/// Text runs in drawing order.
	pub fn texts(&self) -> Vec<&str> {
		self.commands
			.iter()
			.filter_map(|c| match c {
				DrawCommand::Text { text, .. } => Some(text.as_str()),
				_ => None,
			})
			.collect()
	}

	pub fn to_json(&self) -> serde_json::Result<String> {
		serde_json::to_string_pretty(self)
	}
}

impl PageCanvas for RecordingCanvas {
	fn page_size(&self) -> PageSize {
		self.size
	}

	fn draw(&mut self, command: DrawCommand) {
		self.commands.push(command);
	}

	fn file_extension(&self) -> &'static str {
		"json"
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wrap_respects_width() {
		let font = Font::courier(10.0);
		// 10pt courier is ~2.12mm per glyph, so 21.2mm holds 10 glyphs.
		let lines = wrap_text("alpha beta gamma delta", &font, 21.2);
		assert_eq!(lines, vec!["alpha beta", "gamma", "delta"]);
	}

	#[test]
	fn wrap_splits_long_words() {
		let font = Font::courier(10.0);
		let lines = wrap_text("0123456789abcdef", &font, 21.2);
		assert_eq!(lines, vec!["0123456789", "abcdef"]);
	}

	#[test]
	fn wrap_keeps_empty_text_as_one_line() {
		assert_eq!(wrap_text("", &Font::helvetica(10.0), 100.0), vec![String::new()]);
	}

	#[test]
	fn recording_groups_pages() {
		let mut canvas = RecordingCanvas::default();
		canvas.text("one", 0.0, 0.0, Font::helvetica(10.0), Rgb::new(0, 0, 0));
		canvas.add_page();
		canvas.text("two", 0.0, 0.0, Font::helvetica(10.0), Rgb::new(0, 0, 0));
		assert_eq!(canvas.page_count(), 2);
		assert_eq!(canvas.pages().len(), 2);
		assert_eq!(canvas.texts(), vec!["one", "two"]);
		assert!(canvas.to_json().unwrap().contains("\"op\": \"new_page\""));
	}
}
