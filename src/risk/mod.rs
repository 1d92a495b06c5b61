mod color;
mod scale;

pub use color::{Rgb, Rgba};
pub use scale::{
	AssessmentLevel, AssessmentScale, GraphRiskScale, LinkRiskScale, SuspicionTier, hit_radius,
	label_scale, node_radius,
};

/// The three threshold tables used to encode risk, bundled so views and the
/// report agree on one set of breakpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RiskEncoder {
	pub graph: GraphRiskScale,
	pub links: LinkRiskScale,
	pub assessment: AssessmentScale,
}

impl RiskEncoder {
	pub fn from_config(config: &crate::config::AppConfig) -> Self {
		Self {
			graph: config.graph_scale,
			links: config.link_scale,
			assessment: config.assessment_scale,
		}
	}
}
