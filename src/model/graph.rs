//! Turns a flat wallet list into labelled nodes and derived edges.
//!
//! Edge derivation is order-sensitive: the parent picked for a node is the
//! *first* wallet in payload order one layer above it. Callers must preserve
//! the order the risk service returned.

use serde::Serialize;

use super::payload::{GraphPayload, WalletNode};
use crate::risk::GraphRiskScale;

const LABEL_PREFIX: &str = "0x..";
const LABEL_SUFFIX_CHARS: usize = 3;
const RULE: &str = "════════════════════════════════════════";
const SEPARATOR: &str = "────────────────────────────────────────";

/// Wallet plus display fields derived from it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnrichedNode {
	#[serde(flatten)]
	pub wallet: WalletNode,
	pub label: String,
	pub tooltip: String,
}

impl EnrichedNode {
	pub fn id(&self) -> &str {
		&self.wallet.id
	}
}

/// Directed in storage, unordered in meaning.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
	pub source: String,
	pub target: String,
}

impl Edge {
	fn new(source: &str, target: &str) -> Self {
		Self {
			source: source.to_string(),
			target: target.to_string(),
		}
	}
}

/// Output of [`GraphModelBuilder::build`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GraphModel {
	pub root_wallet: String,
	pub nodes: Vec<EnrichedNode>,
	pub edges: Vec<Edge>,
}

impl GraphModel {
	pub fn node(&self, id: &str) -> Option<&EnrichedNode> {
		self.nodes.iter().find(|n| n.id() == id)
	}

	pub fn contains_root(&self) -> bool {
		self.node(&self.root_wallet).is_some()
	}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GraphModelBuilder {
	scale: GraphRiskScale,
}

impl GraphModelBuilder {
	pub fn new(scale: GraphRiskScale) -> Self {
		Self { scale }
	}

	pub fn build(&self, payload: &GraphPayload) -> GraphModel {
		let nodes: Vec<EnrichedNode> = payload
			.nodes
			.iter()
			.map(|wallet| EnrichedNode {
				label: short_label(&wallet.id),
				tooltip: self.tooltip(wallet),
				wallet: wallet.clone(),
			})
			.collect();

		let edges = derive_edges(&payload.root_wallet, &payload.nodes);
		log::debug!(
			"built graph for {}: {} nodes, {} edges",
			payload.root_wallet,
			nodes.len(),
			edges.len()
		);

		GraphModel {
			root_wallet: payload.root_wallet.clone(),
			nodes,
			edges,
		}
	}

	pub fn tooltip(&self, node: &WalletNode) -> String {
		let status = self.scale.tier(node.suspicious_score).status();
		let scam = if node.is_scam { "⛔ Yes" } else { "✓ No" };
		format!(
			"{RULE}
  WALLET  |  Layer {layer}
{SEPARATOR}
  Address   {id}
  Balance   {balance:.6} ETH
  Tx Count  {tx_count}
{SEPARATOR}
  Risk Score       {risk}
  Suspicion Score  {suspicion}/100
  Status           {status}
  Is Scam          {scam}
  Reason: {message}
{RULE}",
			layer = node.layer,
			id = node.id,
			balance = node.balance,
			tx_count = node.tx_count,
			risk = node.risk_score,
			suspicion = node.suspicious_score,
			message = node.message,
		)
	}
}

/// `0x..` plus the last three characters of the address.
pub fn short_label(id: &str) -> String {
	let count = id.chars().count();
	let tail: String = id
		.chars()
		.skip(count.saturating_sub(LABEL_SUFFIX_CHARS))
		.collect();
	format!("{LABEL_PREFIX}{tail}")
}

/// Per node, in order: a root edge when `distance > 0`, then an edge from the
/// first node one layer up unless that node is the root. Duplicates are kept.
pub fn derive_edges(root_wallet: &str, nodes: &[WalletNode]) -> Vec<Edge> {
	let mut edges = Vec::new();
	for node in nodes {
		if node.distance > 0 {
			edges.push(Edge::new(root_wallet, &node.id));
		}
		let parent = node
			.layer
			.checked_sub(1)
			.and_then(|up| nodes.iter().find(|n| n.layer == up));
		if let Some(parent) = parent.filter(|p| p.id != root_wallet) {
			edges.push(Edge::new(&parent.id, &node.id));
		}
	}
	edges
}

#[cfg(test)]
mod tests {
	use super::*;

	fn wallet(id: &str, distance: u32, layer: u32, suspicious_score: u32) -> WalletNode {
		WalletNode {
			id: id.into(),
			distance,
			layer,
			balance: 1.5,
			tx_count: 7,
			risk_score: 42,
			suspicious_score,
			is_scam: false,
			message: "ok".into(),
		}
	}

	fn payload(root: &str, nodes: Vec<WalletNode>) -> GraphPayload {
		GraphPayload {
			root_wallet: root.into(),
			nodes,
		}
	}

	fn pairs(model: &GraphModel) -> Vec<(&str, &str)> {
		model
			.edges
			.iter()
			.map(|e| (e.source.as_str(), e.target.as_str()))
			.collect()
	}

	#[test]
	fn zero_distance_same_layer_has_no_edges() {
		let p = payload(
			"0xA",
			vec![wallet("0xB", 0, 0, 0), wallet("0xC", 0, 0, 0), wallet("0xD", 0, 0, 0)],
		);
		assert!(GraphModelBuilder::default().build(&p).edges.is_empty());
	}

	#[test]
	fn lone_node_gets_root_edge_only() {
		let p = payload("0xA", vec![wallet("0xB", 2, 3, 10)]);
		let model = GraphModelBuilder::default().build(&p);
		assert_eq!(pairs(&model), vec![("0xA", "0xB")]);
	}

	#[test]
	fn node_with_parent_gets_two_edges() {
		let p = payload("0xA", vec![wallet("0xP", 0, 1, 0), wallet("0xB", 1, 2, 0)]);
		let model = GraphModelBuilder::default().build(&p);
		let into_b: Vec<_> = pairs(&model)
			.into_iter()
			.filter(|(_, t)| *t == "0xB")
			.collect();
		assert_eq!(into_b, vec![("0xA", "0xB"), ("0xP", "0xB")]);
	}

	#[test]
	fn root_is_never_a_layer_parent() {
		let p = payload("0xA", vec![wallet("0xA", 0, 0, 0), wallet("0xB", 1, 1, 0)]);
		let model = GraphModelBuilder::default().build(&p);
		assert_eq!(pairs(&model), vec![("0xA", "0xB")]);
		assert!(model.contains_root());
	}

	#[test]
	fn first_node_in_layer_wins() {
		let p = payload(
			"0xA",
			vec![
				wallet("0xP1", 0, 1, 0),
				wallet("0xP2", 0, 1, 0),
				wallet("0xC", 0, 2, 0),
			],
		);
		let model = GraphModelBuilder::default().build(&p);
		assert_eq!(pairs(&model), vec![("0xP1", "0xC")]);

		let reordered = payload(
			"0xA",
			vec![
				wallet("0xP2", 0, 1, 0),
				wallet("0xP1", 0, 1, 0),
				wallet("0xC", 0, 2, 0),
			],
		);
		let model = GraphModelBuilder::default().build(&reordered);
		assert_eq!(pairs(&model), vec![("0xP2", "0xC")]);
	}

	#[test]
	fn parent_may_appear_after_child() {
		let p = payload("0xA", vec![wallet("0xC", 0, 2, 0), wallet("0xB", 0, 1, 0)]);
		let model = GraphModelBuilder::default().build(&p);
		assert_eq!(pairs(&model), vec![("0xB", "0xC")]);
	}

	#[test]
	fn sibling_chain_shares_first_parent() {
		let p = payload(
			"0xA",
			vec![
				wallet("0xB", 1, 1, 0),
				wallet("0xC", 1, 2, 0),
				wallet("0xD", 1, 2, 0),
			],
		);
		let model = GraphModelBuilder::default().build(&p);
		assert_eq!(
			pairs(&model),
			vec![
				("0xA", "0xB"),
				("0xA", "0xC"),
				("0xB", "0xC"),
				("0xA", "0xD"),
				("0xB", "0xD"),
			]
		);
	}

	#[test]
	fn duplicate_edges_are_kept() {
		let p = payload("0xA", vec![wallet("0xB", 1, 1, 0), wallet("0xB", 1, 1, 0)]);
		let model = GraphModelBuilder::default().build(&p);
		assert_eq!(pairs(&model), vec![("0xA", "0xB"), ("0xA", "0xB")]);
	}

	#[test]
	fn root_absent_from_node_list() {
		let p = payload("0xA", vec![wallet("0xB", 1, 1, 0), wallet("0xC", 2, 2, 0)]);
		let model = GraphModelBuilder::default().build(&p);
		assert!(!model.contains_root());
		assert_eq!(
			pairs(&model),
			vec![("0xA", "0xB"), ("0xA", "0xC"), ("0xB", "0xC")]
		);
	}

	#[test]
	fn build_is_idempotent() {
		let p = payload(
			"0xA",
			vec![wallet("0xB", 1, 1, 90), wallet("0xC", 2, 2, 10), wallet("0xD", 0, 0, 0)],
		);
		let builder = GraphModelBuilder::default();
		assert_eq!(builder.build(&p), builder.build(&p));
	}

	#[test]
	fn labels_use_last_three_chars() {
		assert_eq!(short_label("0x52908400098527886E0F7030069857D2E4169EE7"), "0x..EE7");
		assert_eq!(short_label("ab"), "0x..ab");
		let p = payload("0xA", vec![wallet("0x1234", 0, 0, 0), wallet("0x9234", 0, 0, 0)]);
		let model = GraphModelBuilder::default().build(&p);
		assert_eq!(model.nodes[0].label, model.nodes[1].label);
	}

	#[test]
	fn tooltip_layout() {
		let mut node = wallet("0xB", 1, 2, 85);
		node.balance = 0.1234567;
		node.is_scam = true;
		node.message = "drainer".into();
		let tooltip = GraphModelBuilder::default().tooltip(&node);
		let lines: Vec<&str> = tooltip.lines().collect();
		assert_eq!(lines.len(), 13);
		assert_eq!(lines[1], "  WALLET  |  Layer 2");
		assert_eq!(lines[3], "  Address   0xB");
		assert_eq!(lines[4], "  Balance   0.123457 ETH");
		assert_eq!(lines[5], "  Tx Count  7");
		assert_eq!(lines[7], "  Risk Score       42");
		assert_eq!(lines[8], "  Suspicion Score  85/100");
		assert_eq!(lines[9], "  Status           🚨 Critical Fraud");
		assert_eq!(lines[10], "  Is Scam          ⛔ Yes");
		assert_eq!(lines[11], "  Reason: drainer");
	}

	#[test]
	fn tooltip_status_tiers() {
		let builder = GraphModelBuilder::default();
		let status = |score| builder.tooltip(&wallet("0xB", 0, 0, score));
		assert!(status(60).contains("🔴 High Risk"));
		assert!(status(40).contains("⚠️ Medium Risk"));
		assert!(status(20).contains("⚡ Low Risk"));
		assert!(status(19).contains("✅ Safe"));
		assert!(status(0).contains("✓ No"));
	}
}
