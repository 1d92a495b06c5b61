use crate::risk::Rgb;

use super::canvas::{DrawCommand, FontFamily, FontWeight, PT_TO_MM, PageCanvas, PageSize};

/// Renders every page as an inline SVG in millimetre units and bundles them
/// into one printable HTML document.
#[derive(Clone, Debug)]
pub struct SvgPageCanvas {
	size: PageSize,
	title: String,
	pages: Vec<String>,
}

impl SvgPageCanvas {
	pub fn new(size: PageSize, title: impl Into<String>) -> Self {
		Self {
			size,
			title: title.into(),
			pages: vec![String::new()],
		}
	}

	pub fn page_count(&self) -> usize {
		self.pages.len()
	}

	pub fn page_svg(&self, index: usize) -> Option<String> {
		self.pages.get(index).map(|body| self.wrap_page(body))
	}

	fn wrap_page(&self, body: &str) -> String {
		let PageSize { width, height } = self.size;
		format!(
			r#"<svg xmlns="http://www.w3.org/2000/svg" class="page" width="{width}mm" height="{height}mm" viewBox="0 0 {width} {height}">{body}</svg>"#
		)
	}

	pub fn into_html(self) -> String {
		let mut html = format!(
			"<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\"><title>{}</title>\
			<style>body{{margin:0;background:#525659}}\
			svg.page{{display:block;margin:8mm auto;background:#fff;page-break-after:always}}\
			@media print{{body{{background:none}}svg.page{{margin:0}}}}</style></head><body>",
			escape(&self.title)
		);
		for body in &self.pages {
			html.push_str(&self.wrap_page(body));
		}
		html.push_str("</body></html>");
		html
	}

	fn current(&mut self) -> &mut String {
		if self.pages.is_empty() {
			self.pages.push(String::new());
		}
		let last = self.pages.len() - 1;
		&mut self.pages[last]
	}
}

impl PageCanvas for SvgPageCanvas {
	fn page_size(&self) -> PageSize {
		self.size
	}

	fn file_extension(&self) -> &'static str {
		"html"
	}

	fn draw(&mut self, command: DrawCommand) {
		let element = match command {
			DrawCommand::Text {
				text,
				x,
				y,
				font,
				color,
			} => {
				let family = match font.family {
					FontFamily::Helvetica => "Helvetica, Arial, sans-serif",
					FontFamily::Courier => "Courier New, monospace",
				};
				let weight = match font.weight {
					FontWeight::Normal => "normal",
					FontWeight::Bold => "bold",
				};
				format!(
					r#"<text x="{x}" y="{y}" font-family="{family}" font-weight="{weight}" font-size="{size:.3}" fill="{fill}" xml:space="preserve">{body}</text>"#,
					size = font.size * PT_TO_MM,
					fill = hex(color),
					body = escape(&text),
				)
			}
			DrawCommand::Line {
				x1,
				y1,
				x2,
				y2,
				color,
			} => format!(
				r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{}" stroke-width="0.2"/>"#,
				hex(color)
			),
			DrawCommand::FillRect {
				x,
				y,
				width,
				height,
				color,
			} => format!(
				r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{}"/>"#,
				hex(color)
			),
			DrawCommand::Image {
				data_url,
				x,
				y,
				width,
				height,
			} => format!(
				r#"<image href="{}" x="{x}" y="{y}" width="{width}" height="{height}"/>"#,
				escape(&data_url)
			),
			DrawCommand::NewPage => {
				self.pages.push(String::new());
				return;
			}
		};
		self.current().push_str(&element);
	}
}

fn hex(color: Rgb) -> String {
	color.to_hex()
}

fn escape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			c => out.push(c),
		}
	}
	out
}
