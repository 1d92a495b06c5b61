use crate::model::{GraphModel, short_label};
use crate::risk::{RiskEncoder, hit_radius, label_scale, node_radius};

/// Neutral styling for the root when the payload does not list it.
const ANCHOR_COLOR: &str = "#64748b";
const ANCHOR_SCORE: u32 = 0;

/// A node as the canvas draws it; all styling is resolved up front.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub label: Option<String>,
	pub color: String,
	pub glow: Option<String>,
	pub radius: f64,
	pub hit_radius: f64,
	pub label_scale: f64,
	/// Ring the node starts on before the simulation spreads it out.
	pub layer: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	pub color: String,
	pub width: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Applies the risk encoding to a built graph. Links are colored by the
	/// suspicion of their source wallet. A root that the payload omitted is
	/// added as a neutral anchor so its edges have somewhere to attach.
	pub fn from_model(model: &GraphModel, encoder: &RiskEncoder) -> Self {
		let mut nodes: Vec<GraphNode> = model
			.nodes
			.iter()
			.map(|node| {
				let score = node.wallet.suspicious_score;
				GraphNode {
					id: node.wallet.id.clone(),
					label: Some(node.label.clone()),
					color: encoder.graph.node_color(score).to_hex(),
					glow: Some(encoder.graph.glow(score).to_string()),
					radius: node_radius(score),
					hit_radius: hit_radius(score),
					label_scale: label_scale(score),
					layer: node.wallet.layer,
				}
			})
			.collect();

		let links_to_root = model.edges.iter().any(|e| e.source == model.root_wallet);
		if links_to_root && !model.contains_root() {
			nodes.insert(
				0,
				GraphNode {
					id: model.root_wallet.clone(),
					label: Some(short_label(&model.root_wallet)),
					color: ANCHOR_COLOR.to_string(),
					glow: None,
					radius: node_radius(ANCHOR_SCORE),
					hit_radius: hit_radius(ANCHOR_SCORE),
					label_scale: label_scale(ANCHOR_SCORE),
					layer: 0,
				},
			);
		}

		let links = model
			.edges
			.iter()
			.map(|edge| {
				let source_score = model.node(&edge.source).map(|n| n.wallet.suspicious_score);
				GraphLink {
					source: edge.source.clone(),
					target: edge.target.clone(),
					color: encoder.links.color(source_score).to_string(),
					width: encoder.links.width(source_score),
				}
			})
			.collect();

		Self { nodes, links }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{GraphModelBuilder, GraphPayload, WalletNode};

	fn wallet(id: &str, distance: u32, layer: u32, suspicious_score: u32) -> WalletNode {
		WalletNode {
			id: id.into(),
			distance,
			layer,
			balance: 0.0,
			tx_count: 0,
			risk_score: 0,
			suspicious_score,
			is_scam: false,
			message: String::new(),
		}
	}

	fn data(nodes: Vec<WalletNode>) -> GraphData {
		let payload = GraphPayload {
			root_wallet: "0xAAA".into(),
			nodes,
		};
		let model = GraphModelBuilder::default().build(&payload);
		GraphData::from_model(&model, &RiskEncoder::default())
	}

	#[test]
	fn missing_root_becomes_anchor() {
		let graph = data(vec![wallet("0xB01", 1, 1, 90), wallet("0xC02", 2, 2, 10)]);
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.nodes[0].id, "0xAAA");
		assert_eq!(graph.nodes[0].color, ANCHOR_COLOR);
		assert_eq!(graph.links.len(), 3);
	}

	#[test]
	fn listed_root_is_not_duplicated() {
		let graph = data(vec![wallet("0xAAA", 0, 0, 0), wallet("0xB01", 1, 1, 0)]);
		assert_eq!(graph.nodes.len(), 2);
	}

	#[test]
	fn no_root_links_no_anchor() {
		let graph = data(vec![wallet("0xB01", 0, 0, 0)]);
		assert_eq!(graph.nodes.len(), 1);
	}

	#[test]
	fn nodes_and_links_carry_risk_encoding() {
		let graph = data(vec![wallet("0xB01", 1, 1, 90), wallet("0xC02", 2, 2, 10)]);
		let b = graph.nodes.iter().find(|n| n.id == "0xB01").unwrap();
		assert_eq!(b.color, "#dc2626");
		assert_eq!(b.radius, 14.0);
		assert_eq!(b.label.as_deref(), Some("0x..B01"));
		assert_eq!(b.glow.as_deref(), Some("rgba(220, 38, 38, 0.6)"));

		let from_b = graph.links.iter().find(|l| l.source == "0xB01").unwrap();
		assert_eq!(from_b.color, "rgba(220, 38, 38, 0.5)");
		assert_eq!(from_b.width, 2.0);

		let from_root = graph.links.iter().find(|l| l.source == "0xAAA").unwrap();
		assert_eq!(from_root.color, "rgba(100, 116, 139, 0.2)");
		assert_eq!(from_root.width, 1.0);
	}
}
