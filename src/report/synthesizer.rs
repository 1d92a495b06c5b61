//! Lays out the wallet risk report on a [`PageCanvas`].

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{AssessmentPayload, FlowEdge, WalletNode};
use crate::risk::{AssessmentScale, Rgb};

use super::canvas::{Font, PageCanvas, PageSize, wrap_text};
use super::capture::VisualCapture;

const ACCENT: Rgb = Rgb::new(100, 150, 200);
const HEADER_FILL: Rgb = Rgb::new(15, 15, 30);
const MUTED: Rgb = Rgb::new(100, 100, 100);
const BODY: Rgb = Rgb::new(150, 150, 150);

/// Clear space kept between body text and the footer line.
const FOOTER_CLEARANCE: f64 = 5.0;
const SECTION_RULE_GAP: f64 = 5.0;
const SECTION_TITLE_GAP: f64 = 8.0;
const SECTION_TITLE_SIZE: f64 = 14.0;
const SECTION_AFTER_TITLE: f64 = 5.0;
/// Cursor travel from the section rule to the first body line.
const SECTION_SPAN: f64 =
	SECTION_RULE_GAP + SECTION_TITLE_GAP + SECTION_TITLE_SIZE + SECTION_AFTER_TITLE;

/// Geometry and cut-offs of the report, in millimetres.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportLayout {
	pub title: String,
	pub file_prefix: String,
	pub margin: f64,
	pub header_height: f64,
	pub page_top: f64,
	pub body_top: f64,
	pub footer_offset: f64,
	/// Break before the next reason once the cursor passes
	/// `page_height - reasons_bottom`.
	pub reasons_bottom: f64,
	pub network_bottom: f64,
	pub flow_bottom: f64,
	pub snapshot_bottom: f64,
	pub snapshot_width: f64,
	pub top_wallets: usize,
	pub id_prefix_chars: usize,
	/// Suspicious score above which a wallet counts as high risk.
	pub high_risk_above: u32,
	pub medium_risk_above: u32,
}

impl Default for ReportLayout {
	fn default() -> Self {
		Self {
			title: "Wallet Risk Assessment Report".into(),
			file_prefix: "wallet-risk-report".into(),
			margin: 20.0,
			header_height: 40.0,
			page_top: 20.0,
			body_top: 50.0,
			footer_offset: 10.0,
			reasons_bottom: 30.0,
			network_bottom: 60.0,
			flow_bottom: 50.0,
			snapshot_bottom: 80.0,
			snapshot_width: 80.0,
			top_wallets: 5,
			id_prefix_chars: 10,
			high_risk_above: 60,
			medium_risk_above: 40,
		}
	}
}

/// Snapshot of an assessment, taken for one export.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskReport<'a> {
	pub address: &'a str,
	pub risk_score: u64,
	pub reasons: &'a [String],
	pub nodes: &'a [WalletNode],
	pub edges: &'a [FlowEdge],
	pub root_wallet: Option<&'a str>,
}

impl<'a> RiskReport<'a> {
	pub fn from_assessment(address: &'a str, payload: &'a AssessmentPayload) -> Self {
		Self {
			address,
			risk_score: payload.risk_score,
			reasons: &payload.reasons,
			nodes: payload.nodes.as_deref().unwrap_or_default(),
			edges: payload.edges.as_deref().unwrap_or_default(),
			root_wallet: payload.root_wallet.as_deref(),
		}
	}
}

/// Finished export.
#[derive(Debug)]
pub struct ReportDocument<C> {
	pub filename: String,
	pub pages: usize,
	pub canvas: C,
}

/// Network counts printed in the report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkStats {
	pub total: usize,
	pub high: usize,
	pub medium: usize,
}

#[derive(Clone, Debug, Default)]
pub struct ReportSynthesizer {
	scale: AssessmentScale,
	layout: ReportLayout,
}

impl ReportSynthesizer {
	pub fn new(scale: AssessmentScale, layout: ReportLayout) -> Self {
		Self { scale, layout }
	}

	pub fn layout(&self) -> &ReportLayout {
		&self.layout
	}

	pub fn network_stats(&self, nodes: &[WalletNode]) -> NetworkStats {
		let high = self.layout.high_risk_above;
		let medium = self.layout.medium_risk_above;
		NetworkStats {
			total: nodes.len(),
			high: nodes.iter().filter(|n| n.suspicious_score > high).count(),
			medium: nodes
				.iter()
				.filter(|n| n.suspicious_score > medium && n.suspicious_score <= high)
				.count(),
		}
	}

	pub fn filename(&self, address: &str, generated_at: DateTime<Utc>, extension: &str) -> String {
		format!(
			"{}-{}-{}.{}",
			self.layout.file_prefix,
			truncate_chars(address, self.layout.id_prefix_chars),
			generated_at.timestamp_millis(),
			extension
		)
	}

	/// Writes the whole report to `canvas`. A failing `snapshot` only drops
	/// the visualization section.
	pub fn export<C, V>(
		&self,
		report: &RiskReport<'_>,
		snapshot: Option<&V>,
		generated_at: DateTime<Utc>,
		mut canvas: C,
	) -> ReportDocument<C>
	where
		C: PageCanvas,
		V: VisualCapture + ?Sized,
	{
		let footer = format!(
			"Report Generated: {}",
			generated_at.format("%Y-%m-%d %H:%M:%S UTC")
		);
		let filename = self.filename(report.address, generated_at, canvas.file_extension());

		let mut writer = Writer::new(&mut canvas, &self.layout, footer);
		writer.header();
		self.risk_section(&mut writer, report.risk_score);
		self.wallet_section(&mut writer, report.address);
		self.reasons_section(&mut writer, report.reasons);
		self.network_section(&mut writer, report.nodes);
		self.flow_section(&mut writer, report.edges);
		if let Some(snapshot) = snapshot {
			self.snapshot_section(&mut writer, snapshot);
		}
		let pages = writer.finish();

		log::info!("report {filename} laid out on {pages} page(s)");
		ReportDocument {
			filename,
			pages,
			canvas,
		}
	}

	fn risk_section<C: PageCanvas>(&self, w: &mut Writer<'_, C>, risk_score: u64) {
		w.section("Risk Analysis");
		let color = self.scale.color(risk_score);
		let m = self.layout.margin;
		w.text_at("Risk Score:", m, Font::helvetica(12.0), BODY);
		w.text_at(&risk_score.to_string(), 80.0, Font::helvetica(24.0).bold(), color);
		w.text_at(
			&format!("({})", self.scale.label(risk_score)),
			110.0,
			Font::helvetica(14.0).bold(),
			color,
		);
		w.advance(15.0);
		w.text_at(&self.scale.legend(), m, Font::helvetica(10.0), MUTED);
		w.advance(10.0);
	}

	fn wallet_section<C: PageCanvas>(&self, w: &mut Writer<'_, C>, address: &str) {
		w.section("Wallet Information");
		let m = self.layout.margin;
		w.text_at("Address:", m, Font::helvetica(10.0), MUTED);
		let font = Font::courier(9.0);
		let lines = wrap_text(address, &font, w.content_width());
		w.lines_at(&lines, m, 5.0, 4.0, font, BODY);
		w.advance(15.0 + lines.len() as f64 * 4.0);
	}

	fn reasons_section<C: PageCanvas>(&self, w: &mut Writer<'_, C>, reasons: &[String]) {
		if reasons.is_empty() {
			return;
		}
		w.section("Risk Factors");
		let font = Font::helvetica(10.0);
		for (i, reason) in reasons.iter().enumerate() {
			let lines = wrap_text(&format!("{}. {reason}", i + 1), &font, w.content_width());
			w.lines_at(&lines, self.layout.margin, 0.0, 5.0, font, BODY);
			w.advance(lines.len() as f64 * 5.0 + 3.0);
			w.break_if_past(self.layout.reasons_bottom);
		}
	}

	fn network_section<C: PageCanvas>(&self, w: &mut Writer<'_, C>, nodes: &[WalletNode]) {
		if nodes.is_empty() {
			return;
		}
		w.break_if_past(self.layout.network_bottom);
		w.section("Connected Wallet Network");

		let m = self.layout.margin;
		let font = Font::helvetica(9.0);
		let stats = self.network_stats(nodes);
		w.text_at(&format!("Total Connected Wallets: {}", stats.total), m, font, MUTED);
		w.advance(8.0);
		w.text_at(&format!("High Risk Nodes: {}", stats.high), m, font, MUTED);
		w.advance(6.0);
		w.text_at(&format!("Medium Risk Nodes: {}", stats.medium), m, font, MUTED);
		w.advance(10.0);

		w.break_if_past(self.layout.network_bottom);
		w.text_at("Top Risk Wallets:", m, font.bold(), ACCENT);
		w.advance(7.0);
		for (i, node) in top_risk_nodes(nodes, self.layout.top_wallets).iter().enumerate() {
			w.break_if_past(self.layout.network_bottom);
			let line = format!(
				"{}. {}... - Risk: {}/100",
				i + 1,
				truncate_chars(&node.id, self.layout.id_prefix_chars),
				node.suspicious_score
			);
			w.text_at(&line, m + 5.0, font, BODY);
			w.advance(6.0);
		}
	}

	fn flow_section<C: PageCanvas>(&self, w: &mut Writer<'_, C>, edges: &[FlowEdge]) {
		if edges.is_empty() {
			return;
		}
		w.break_if_past(self.layout.flow_bottom);
		w.section("Transaction Flow Summary");

		let m = self.layout.margin;
		let font = Font::helvetica(9.0);
		let risky = edges.iter().filter(|e| e.risk_flag).count();
		w.text_at(&format!("Total Connections: {}", edges.len()), m, font, MUTED);
		w.advance(6.0);
		w.text_at(&format!("Risky Connections: {risky}"), m, font, MUTED);
		w.advance(10.0);
	}

	fn snapshot_section<C, V>(&self, w: &mut Writer<'_, C>, snapshot: &V)
	where
		C: PageCanvas,
		V: VisualCapture + ?Sized,
	{
		let image = match snapshot.capture() {
			Ok(image) => image,
			Err(err) => {
				log::warn!("risk visualization skipped: {err}");
				return;
			}
		};
		let width = self.layout.snapshot_width;
		let height = image.scaled_height(width);
		w.break_if_past(self.layout.snapshot_bottom);
		w.ensure_room(SECTION_SPAN + height);
		w.section("Risk Score Visualization");

		let x = (w.page.width - width) / 2.0;
		let y = w.y;
		w.canvas.image(&image, x, y, width, height);
		w.advance(height + 15.0);
	}
}

/// The `n` most suspicious wallets, highest first; ties keep payload order.
pub fn top_risk_nodes(nodes: &[WalletNode], n: usize) -> Vec<&WalletNode> {
	let mut ranked: Vec<&WalletNode> = nodes.iter().collect();
	ranked.sort_by_key(|node| Reverse(node.suspicious_score));
	ranked.truncate(n);
	ranked
}

fn truncate_chars(s: &str, n: usize) -> &str {
	match s.char_indices().nth(n) {
		Some((idx, _)) => &s[..idx],
		None => s,
	}
}

/// Vertical cursor over the canvas; owns page breaks and footers.
struct Writer<'a, C: PageCanvas> {
	canvas: &'a mut C,
	layout: &'a ReportLayout,
	page: PageSize,
	footer: String,
	y: f64,
	pages: usize,
}

impl<'a, C: PageCanvas> Writer<'a, C> {
	fn new(canvas: &'a mut C, layout: &'a ReportLayout, footer: String) -> Self {
		let page = canvas.page_size();
		Self {
			canvas,
			layout,
			page,
			footer,
			y: layout.page_top,
			pages: 1,
		}
	}

	fn content_width(&self) -> f64 {
		self.page.width - 2.0 * self.layout.margin
	}

	fn header(&mut self) {
		self.canvas
			.fill_rect(0.0, 0.0, self.page.width, self.layout.header_height, HEADER_FILL);
		self.canvas.text(
			&self.layout.title,
			self.layout.margin,
			self.layout.page_top,
			Font::helvetica(28.0).bold(),
			ACCENT,
		);
		self.y = self.layout.body_top;
	}

	fn section(&mut self, title: &str) {
		self.ensure_room(SECTION_RULE_GAP + SECTION_TITLE_GAP);
		self.advance(SECTION_RULE_GAP);
		let m = self.layout.margin;
		self.canvas
			.line(m, self.y, self.page.width - m, self.y, ACCENT);
		self.advance(SECTION_TITLE_GAP);
		let font = Font::helvetica(SECTION_TITLE_SIZE).bold();
		self.text_at(title, m, font, ACCENT);
		self.advance(font.size + SECTION_AFTER_TITLE);
	}

	fn text_at(&mut self, text: &str, x: f64, font: Font, color: Rgb) {
		self.ensure_room(0.0);
		self.canvas.text(text, x, self.y, font, color);
	}

	/// Draws `lines` starting `offset` below the cursor without moving it.
	fn lines_at(&mut self, lines: &[String], x: f64, offset: f64, step: f64, font: Font, color: Rgb) {
		let span = offset + lines.len().saturating_sub(1) as f64 * step;
		self.ensure_room(span);
		for (i, line) in lines.iter().enumerate() {
			self.canvas
				.text(line, x, self.y + offset + i as f64 * step, font, color);
		}
	}

	fn advance(&mut self, dy: f64) {
		self.y += dy;
	}

	fn break_if_past(&mut self, bottom: f64) {
		if self.y > self.page.height - bottom {
			self.new_page();
		}
	}

	/// Lowest baseline body content may use.
	fn content_bottom(&self) -> f64 {
		self.page.height - self.layout.footer_offset - FOOTER_CLEARANCE
	}

	/// Moves to a new page unless `height` more fits above the footer. A
	/// block taller than a page is drawn from the top of a fresh one.
	fn ensure_room(&mut self, height: f64) {
		if self.y + height > self.content_bottom() && self.y > self.layout.page_top {
			self.new_page();
		}
	}

	fn new_page(&mut self) {
		self.footer();
		self.canvas.add_page();
		self.pages += 1;
		self.y = self.layout.page_top;
	}

	fn footer(&mut self) {
		self.canvas.text(
			&self.footer,
			self.layout.margin,
			self.page.height - self.layout.footer_offset,
			Font::helvetica(8.0),
			MUTED,
		);
	}

	fn finish(mut self) -> usize {
		self.footer();
		self.pages
	}
}

#[cfg(test)]
mod tests {
	use chrono::TimeZone;

	use super::*;
	use crate::error::CaptureError;
	use crate::report::canvas::{DrawCommand, RecordingCanvas};
	use crate::report::capture::RasterImage;

	struct FixedCapture(Result<RasterImage, CaptureError>);

	impl VisualCapture for FixedCapture {
		fn capture(&self) -> Result<RasterImage, CaptureError> {
			self.0.clone()
		}
	}

	fn wallet(id: &str, suspicious_score: u32) -> WalletNode {
		WalletNode {
			id: id.into(),
			distance: 1,
			layer: 1,
			balance: 0.0,
			tx_count: 0,
			risk_score: 0,
			suspicious_score,
			is_scam: false,
			message: String::new(),
		}
	}

	fn edge(risk_flag: bool) -> FlowEdge {
		FlowEdge {
			source: "a".into(),
			target: "b".into(),
			risk_flag,
		}
	}

	fn at() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
	}

	const ADDRESS: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

	fn report<'a>(
		reasons: &'a [String],
		nodes: &'a [WalletNode],
		edges: &'a [FlowEdge],
	) -> RiskReport<'a> {
		RiskReport {
			address: ADDRESS,
			risk_score: 320,
			reasons,
			nodes,
			edges,
			root_wallet: None,
		}
	}

	fn export(report: &RiskReport<'_>, snapshot: Option<&FixedCapture>) -> ReportDocument<RecordingCanvas> {
		ReportSynthesizer::default().export(report, snapshot, at(), RecordingCanvas::default())
	}

	#[test]
	fn top_five_is_stable() {
		let nodes: Vec<WalletNode> = [("a", 90), ("b", 90), ("c", 70), ("d", 50), ("e", 30), ("f", 10), ("g", 5)]
			.into_iter()
			.map(|(id, s)| wallet(id, s))
			.collect();
		let top: Vec<(&str, u32)> = top_risk_nodes(&nodes, 5)
			.iter()
			.map(|n| (n.id.as_str(), n.suspicious_score))
			.collect();
		assert_eq!(top, vec![("a", 90), ("b", 90), ("c", 70), ("d", 50), ("e", 30)]);
	}

	#[test]
	fn network_counts_use_exclusive_bounds() {
		let nodes: Vec<WalletNode> = [61, 60, 41, 40, 100]
			.into_iter()
			.enumerate()
			.map(|(i, s)| wallet(&i.to_string(), s))
			.collect();
		let stats = ReportSynthesizer::default().network_stats(&nodes);
		assert_eq!(stats, NetworkStats { total: 5, high: 2, medium: 2 });
	}

	#[test]
	fn sections_appear_in_order() {
		let reasons = vec!["Interacted with mixer".to_string()];
		let nodes = vec![wallet("0xB", 85), wallet("0xC", 45)];
		let edges = vec![edge(true), edge(false)];
		let doc = export(&report(&reasons, &nodes, &edges), None);
		let texts = doc.canvas.texts();

		let position = |needle: &str| {
			texts
				.iter()
				.position(|t| *t == needle)
				.unwrap_or_else(|| panic!("missing {needle}"))
		};
		let order = [
			"Wallet Risk Assessment Report",
			"Risk Analysis",
			"Wallet Information",
			"Risk Factors",
			"Connected Wallet Network",
			"Transaction Flow Summary",
		];
		let positions: Vec<usize> = order.iter().map(|s| position(s)).collect();
		assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");

		assert!(texts.contains(&"320"));
		assert!(texts.contains(&"(Medium Risk)"));
		assert!(texts.contains(&"1. Interacted with mixer"));
		assert!(texts.contains(&"Total Connected Wallets: 2"));
		assert!(texts.contains(&"High Risk Nodes: 1"));
		assert!(texts.contains(&"Medium Risk Nodes: 1"));
		assert!(texts.contains(&"1. 0xB... - Risk: 85/100"));
		assert!(texts.contains(&"Total Connections: 2"));
		assert!(texts.contains(&"Risky Connections: 1"));
		assert!(texts.contains(&"Report Generated: 2024-05-01 12:30:00 UTC"));

		// The top wallets start past the network cut-off, so they and the
		// flow summary continue on the next page.
		assert_eq!(doc.pages, 2);
		let second = doc.canvas.pages()[1];
		assert!(second.iter().any(
			|c| matches!(c, DrawCommand::Text { text, .. } if text == "Transaction Flow Summary")
		));
	}

	#[test]
	fn network_section_moves_past_its_cutoff() {
		let nodes = vec![wallet("0xB", 85)];
		let page_of = |reason_count: usize| {
			let reasons: Vec<String> = (0..reason_count).map(|i| format!("short {i}")).collect();
			let doc = export(&report(&reasons, &nodes, &[]), None);
			doc.canvas.pages().iter().position(|page| {
				page.iter().any(|c| {
					matches!(c, DrawCommand::Text { text, .. } if text == "Connected Wallet Network")
				})
			})
		};
		assert_eq!(page_of(5), Some(0));
		assert_eq!(page_of(6), Some(1));
	}

	#[test]
	fn body_text_stays_above_footer() {
		let nodes: Vec<WalletNode> = (0..5).map(|i| wallet(&format!("0x{i}"), 90 - i)).collect();
		let edges = vec![edge(true), edge(false)];
		let capture = FixedCapture(Ok(RasterImage {
			data_url: "data:image/png;base64,AAAA".into(),
			width: 400,
			height: 300,
		}));
		let bottom = 297.0 - 10.0 - 5.0;
		for reason_count in 0..12 {
			let reasons: Vec<String> = (0..reason_count).map(|i| format!("reason {i}")).collect();
			let doc = export(&report(&reasons, &nodes, &edges), Some(&capture));
			for command in doc.canvas.commands() {
				match command {
					DrawCommand::Text { text, y, .. } if !text.starts_with("Report Generated") => {
						assert!(*y <= bottom, "{reason_count} reasons: {text} at {y}");
					}
					DrawCommand::Image { y, height, .. } => {
						assert!(y + height <= bottom, "{reason_count} reasons: image ends at {}", y + height);
					}
					_ => {}
				}
			}
		}
	}

	#[test]
	fn score_is_colored_by_assessment_scale() {
		let doc = export(&report(&[], &[], &[]), None);
		let color = doc.canvas.commands().iter().find_map(|c| match c {
			DrawCommand::Text { text, color, .. } if text == "320" => Some(*color),
			_ => None,
		});
		assert_eq!(color, Some(Rgb::new(249, 115, 22)));
	}

	#[test]
	fn optional_sections_are_skipped() {
		let doc = export(&report(&[], &[], &[]), None);
		let texts = doc.canvas.texts();
		assert!(!texts.contains(&"Risk Factors"));
		assert!(!texts.contains(&"Connected Wallet Network"));
		assert!(!texts.contains(&"Transaction Flow Summary"));
		assert!(!texts.contains(&"Risk Score Visualization"));
	}

	#[test]
	fn long_reason_lists_paginate_with_footer_on_every_page() {
		let reasons: Vec<String> = (0..40)
			.map(|i| format!("Reason number {i} with enough words to fill a line of text"))
			.collect();
		let doc = export(&report(&reasons, &[], &[]), None);
		assert!(doc.pages > 1);
		assert_eq!(doc.pages, doc.canvas.page_count());
		for page in doc.canvas.pages() {
			let footers = page
				.iter()
				.filter(|c| matches!(c, DrawCommand::Text { text, .. } if text.starts_with("Report Generated")))
				.count();
			assert_eq!(footers, 1);
		}
		// Nothing but the footer is drawn below the reasons cut-off.
		for command in doc.canvas.commands() {
			if let DrawCommand::Text { text, y, .. } = command {
				if !text.starts_with("Report Generated") {
					assert!(*y <= 297.0 - 30.0 + 5.0 * 3.0, "{text} at {y}");
				}
			}
		}
	}

	#[test]
	fn snapshot_is_centered_and_scaled() {
		let capture = FixedCapture(Ok(RasterImage {
			data_url: "data:image/png;base64,AAAA".into(),
			width: 400,
			height: 300,
		}));
		let doc = export(&report(&[], &[], &[]), Some(&capture));
		let image = doc.canvas.commands().iter().find_map(|c| match c {
			DrawCommand::Image { x, width, height, .. } => Some((*x, *width, *height)),
			_ => None,
		});
		assert_eq!(image, Some((65.0, 80.0, 60.0)));
		assert!(doc.canvas.texts().contains(&"Risk Score Visualization"));
	}

	#[test]
	fn failed_snapshot_is_omitted() {
		let capture = FixedCapture(Err(CaptureError::Unavailable));
		let doc = export(&report(&[], &[], &[]), Some(&capture));
		assert!(!doc.canvas.texts().contains(&"Risk Score Visualization"));
		assert!(doc.canvas.texts().iter().any(|t| t.starts_with("Report Generated")));
	}

	#[test]
	fn filename_uses_address_prefix_and_millis() {
		let doc = export(&report(&[], &[], &[]), None);
		assert_eq!(
			doc.filename,
			format!("wallet-risk-report-0x52908400-{}.json", at().timestamp_millis())
		);
	}

	#[test]
	fn address_is_wrapped_in_monospace() {
		let doc = export(&report(&[], &[], &[]), None);
		let address_run = doc.canvas.commands().iter().find_map(|c| match c {
			DrawCommand::Text { text, font, .. } if text == ADDRESS => Some(*font),
			_ => None,
		});
		assert_eq!(address_run, Some(Font::courier(9.0)));
	}

	#[test]
	fn truncation_is_char_safe() {
		assert_eq!(truncate_chars("0xA", 10), "0xA");
		assert_eq!(truncate_chars("ééééééééééé", 10).chars().count(), 10);
	}
}
