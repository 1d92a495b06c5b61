//! Threshold tables mapping risk numbers to visual encodings.
//!
//! Two unrelated scales live here. [`GraphRiskScale`] and [`LinkRiskScale`]
//! read the per-wallet `suspicious_score` (0-100) that colors the graph;
//! [`AssessmentScale`] reads the aggregate `risk_score`, which is unbounded
//! and breaks at 100/200/500. Keep them apart.

use serde::{Deserialize, Serialize};

use super::color::{Rgb, Rgba};

const DEEP_RED: Rgb = Rgb::new(220, 38, 38);
const RED: Rgb = Rgb::new(239, 68, 68);
const ORANGE: Rgb = Rgb::new(249, 115, 22);
const YELLOW: Rgb = Rgb::new(234, 179, 8);
const GREEN: Rgb = Rgb::new(34, 197, 94);
const SLATE: Rgb = Rgb::new(100, 116, 139);

const BASE_RADIUS: f64 = 8.0;
const RADIUS_DIVISOR: f64 = 15.0;

/// Five-way bucketing of a suspicious score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SuspicionTier {
	Safe,
	Low,
	Medium,
	High,
	Critical,
}

impl SuspicionTier {
	pub const ALL: [SuspicionTier; 5] = [
		SuspicionTier::Safe,
		SuspicionTier::Low,
		SuspicionTier::Medium,
		SuspicionTier::High,
		SuspicionTier::Critical,
	];

	pub fn color(self) -> Rgb {
		match self {
			SuspicionTier::Critical => DEEP_RED,
			SuspicionTier::High => RED,
			SuspicionTier::Medium => ORANGE,
			SuspicionTier::Low => YELLOW,
			SuspicionTier::Safe => GREEN,
		}
	}

	/// Halo drawn behind the node; stronger for worse tiers.
	pub fn glow(self) -> Rgba {
		let alpha = match self {
			SuspicionTier::Critical => 0.6,
			SuspicionTier::High => 0.5,
			SuspicionTier::Medium => 0.4,
			SuspicionTier::Low => 0.3,
			SuspicionTier::Safe => 0.2,
		};
		self.color().with_alpha(alpha)
	}

	/// Status line used in hover tooltips.
	pub fn status(self) -> &'static str {
		match self {
			SuspicionTier::Critical => "🚨 Critical Fraud",
			SuspicionTier::High => "🔴 High Risk",
			SuspicionTier::Medium => "⚠️ Medium Risk",
			SuspicionTier::Low => "⚡ Low Risk",
			SuspicionTier::Safe => "✅ Safe",
		}
	}

	/// Legend caption.
	pub fn name(self) -> &'static str {
		match self {
			SuspicionTier::Critical => "Critical",
			SuspicionTier::High => "High Risk",
			SuspicionTier::Medium => "Medium Risk",
			SuspicionTier::Low => "Low Risk",
			SuspicionTier::Safe => "Safe",
		}
	}
}

/// Inclusive lower bounds of each tier on the 0-100 suspicious scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRiskScale {
	pub critical: u32,
	pub high: u32,
	pub medium: u32,
	pub low: u32,
}

impl Default for GraphRiskScale {
	fn default() -> Self {
		Self {
			critical: 80,
			high: 60,
			medium: 40,
			low: 20,
		}
	}
}

impl GraphRiskScale {
	pub fn tier(&self, suspicious_score: u32) -> SuspicionTier {
		if suspicious_score >= self.critical {
			SuspicionTier::Critical
		} else if suspicious_score >= self.high {
			SuspicionTier::High
		} else if suspicious_score >= self.medium {
			SuspicionTier::Medium
		} else if suspicious_score >= self.low {
			SuspicionTier::Low
		} else {
			SuspicionTier::Safe
		}
	}

	pub fn node_color(&self, suspicious_score: u32) -> Rgb {
		self.tier(suspicious_score).color()
	}

	pub fn glow(&self, suspicious_score: u32) -> Rgba {
		self.tier(suspicious_score).glow()
	}

	/// `(tier, lower, upper)` rows for the on-screen legend, safest first.
	pub fn legend(&self) -> [(SuspicionTier, u32, u32); 5] {
		[
			(SuspicionTier::Safe, 0, self.low),
			(SuspicionTier::Low, self.low, self.medium),
			(SuspicionTier::Medium, self.medium, self.high),
			(SuspicionTier::High, self.high, self.critical),
			(SuspicionTier::Critical, self.critical, 100),
		]
	}
}

/// Node radius grows linearly with suspicion.
pub fn node_radius(suspicious_score: u32) -> f64 {
	BASE_RADIUS + suspicious_score as f64 / RADIUS_DIVISOR
}

/// Pointer hit area, twice the drawn radius.
pub fn hit_radius(suspicious_score: u32) -> f64 {
	node_radius(suspicious_score) * 2.0
}

/// Label text height multiplier so important nodes stand out.
pub fn label_scale(suspicious_score: u32) -> f64 {
	0.4 + suspicious_score as f64 / 20.0
}

/// Link weight keyed on the suspicious score of the link's source wallet.
/// Bounds here are exclusive, unlike the node tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRiskScale {
	pub severe_above: u32,
	pub elevated_above: u32,
	pub notable_above: u32,
	pub wide_above: u32,
}

impl Default for LinkRiskScale {
	fn default() -> Self {
		Self {
			severe_above: 80,
			elevated_above: 60,
			notable_above: 40,
			wide_above: 60,
		}
	}
}

impl LinkRiskScale {
	/// `None` means the source wallet is unknown to the payload.
	pub fn color(&self, source_score: Option<u32>) -> Rgba {
		match source_score {
			Some(s) if s > self.severe_above => DEEP_RED.with_alpha(0.5),
			Some(s) if s > self.elevated_above => RED.with_alpha(0.4),
			Some(s) if s > self.notable_above => ORANGE.with_alpha(0.3),
			_ => SLATE.with_alpha(0.2),
		}
	}

	pub fn width(&self, source_score: Option<u32>) -> f64 {
		match source_score {
			Some(s) if s > self.wide_above => 2.0,
			_ => 1.0,
		}
	}
}

/// Verdict for the aggregate risk score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssessmentLevel {
	Safe,
	Low,
	Medium,
	High,
}

impl AssessmentLevel {
	pub fn color(self) -> Rgb {
		match self {
			AssessmentLevel::Safe => GREEN,
			AssessmentLevel::Low => YELLOW,
			AssessmentLevel::Medium => ORANGE,
			AssessmentLevel::High => RED,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			AssessmentLevel::Safe => "Safe",
			AssessmentLevel::Low => "Low Risk",
			AssessmentLevel::Medium => "Medium Risk",
			AssessmentLevel::High => "High Risk",
		}
	}
}

/// Exclusive upper bounds of each level on the unbounded risk scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentScale {
	pub low: u64,
	pub medium: u64,
	pub high: u64,
	/// Score at which the gauge reads full.
	pub gauge_max: u64,
}

impl Default for AssessmentScale {
	fn default() -> Self {
		Self {
			low: 100,
			medium: 200,
			high: 500,
			gauge_max: 500,
		}
	}
}

impl AssessmentScale {
	pub fn level(&self, risk_score: u64) -> AssessmentLevel {
		if risk_score < self.low {
			AssessmentLevel::Safe
		} else if risk_score < self.medium {
			AssessmentLevel::Low
		} else if risk_score < self.high {
			AssessmentLevel::Medium
		} else {
			AssessmentLevel::High
		}
	}

	pub fn color(&self, risk_score: u64) -> Rgb {
		self.level(risk_score).color()
	}

	pub fn label(&self, risk_score: u64) -> &'static str {
		self.level(risk_score).label()
	}

	/// One-line legend printed under the score in reports.
	pub fn legend(&self) -> String {
		format!(
			"Safe: < {}  |  Low Risk: {}-{}  |  Medium: {}-{}  |  High: > {}",
			self.low, self.low, self.medium, self.medium, self.high, self.high
		)
	}

	/// Gauge fill in `[0, 1]`.
	pub fn gauge_fraction(&self, risk_score: u64) -> f64 {
		if self.gauge_max == 0 {
			return 1.0;
		}
		(risk_score as f64 / self.gauge_max as f64).min(1.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_color_boundaries_are_inclusive() {
		let scale = GraphRiskScale::default();
		let cases = [
			(100, DEEP_RED),
			(80, DEEP_RED),
			(79, RED),
			(60, RED),
			(59, ORANGE),
			(40, ORANGE),
			(39, YELLOW),
			(20, YELLOW),
			(19, GREEN),
			(0, GREEN),
		];
		for (score, expected) in cases {
			assert_eq!(scale.node_color(score), expected, "score {score}");
		}
		assert_eq!(scale.node_color(80).to_hex(), "#dc2626");
		assert_eq!(scale.node_color(19).to_hex(), "#22c55e");
	}

	#[test]
	fn glow_weakens_with_tier() {
		let alphas: Vec<f64> = SuspicionTier::ALL.iter().map(|t| t.glow().a).collect();
		assert_eq!(alphas, vec![0.2, 0.3, 0.4, 0.5, 0.6]);
		assert_eq!(
			GraphRiskScale::default().glow(85).to_string(),
			"rgba(220, 38, 38, 0.6)"
		);
	}

	#[test]
	fn radius_is_linear() {
		assert_eq!(node_radius(0), 8.0);
		assert_eq!(node_radius(15), 9.0);
		assert_eq!(node_radius(90), 14.0);
		assert_eq!(hit_radius(90), 28.0);
	}

	#[test]
	fn link_bounds_are_exclusive() {
		let links = LinkRiskScale::default();
		assert_eq!(links.color(Some(81)).to_string(), "rgba(220, 38, 38, 0.5)");
		assert_eq!(links.color(Some(80)).to_string(), "rgba(239, 68, 68, 0.4)");
		assert_eq!(links.color(Some(60)).to_string(), "rgba(249, 115, 22, 0.3)");
		assert_eq!(links.color(Some(40)).to_string(), "rgba(100, 116, 139, 0.2)");
		assert_eq!(links.color(None).to_string(), "rgba(100, 116, 139, 0.2)");
		assert_eq!(links.width(Some(61)), 2.0);
		assert_eq!(links.width(Some(60)), 1.0);
		assert_eq!(links.width(None), 1.0);
	}

	#[test]
	fn assessment_label_boundaries() {
		let scale = AssessmentScale::default();
		assert_eq!(scale.label(0), "Safe");
		assert_eq!(scale.label(99), "Safe");
		assert_eq!(scale.label(100), "Low Risk");
		assert_eq!(scale.label(199), "Low Risk");
		assert_eq!(scale.label(200), "Medium Risk");
		assert_eq!(scale.label(499), "Medium Risk");
		assert_eq!(scale.label(500), "High Risk");
		assert_eq!(scale.color(500), RED);
		assert_eq!(scale.color(99), GREEN);
	}

	#[test]
	fn scales_are_independent() {
		// 90 is critical on the graph scale but safe as an aggregate score.
		assert_eq!(GraphRiskScale::default().tier(90), SuspicionTier::Critical);
		assert_eq!(AssessmentScale::default().level(90), AssessmentLevel::Safe);

		let strict = GraphRiskScale {
			critical: 50,
			..GraphRiskScale::default()
		};
		assert_eq!(strict.tier(55), SuspicionTier::Critical);
		assert_eq!(AssessmentScale::default().level(55), AssessmentLevel::Safe);
	}

	#[test]
	fn assessment_legend_text() {
		assert_eq!(
			AssessmentScale::default().legend(),
			"Safe: < 100  |  Low Risk: 100-200  |  Medium: 200-500  |  High: > 500"
		);
	}

	#[test]
	fn gauge_saturates() {
		let scale = AssessmentScale::default();
		assert_eq!(scale.gauge_fraction(250), 0.5);
		assert_eq!(scale.gauge_fraction(5000), 1.0);
	}

	#[test]
	fn legend_rows_cover_full_range() {
		let rows = GraphRiskScale::default().legend();
		assert_eq!(rows[0], (SuspicionTier::Safe, 0, 20));
		assert_eq!(rows[4], (SuspicionTier::Critical, 80, 100));
	}
}
