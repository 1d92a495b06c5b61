//! Wire shapes returned by `/validate`, validated at the boundary.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{PayloadError, PayloadResult};

/// Highest valid suspicious score.
pub const MAX_SUSPICIOUS_SCORE: u32 = 100;

/// One wallet discovered around the root.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalletNode {
	pub id: String,
	/// Hop count from the root.
	pub distance: u32,
	/// BFS depth in the upstream traversal; root is layer 0.
	pub layer: u32,
	pub balance: f64,
	pub tx_count: u64,
	pub risk_score: u64,
	/// 0-100, drives the graph encoding.
	pub suspicious_score: u32,
	pub is_scam: bool,
	pub message: String,
}

/// Graph view response: root plus its neighborhood, in traversal order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
	pub root_wallet: String,
	pub nodes: Vec<WalletNode>,
}

impl GraphPayload {
	pub fn from_json(body: &str) -> PayloadResult<Self> {
		let payload: Self = serde_json::from_str(body)?;
		payload.validate()?;
		Ok(payload)
	}

	pub fn validate(&self) -> PayloadResult<()> {
		if self.root_wallet.trim().is_empty() {
			return Err(PayloadError::EmptyRoot);
		}
		validate_nodes(&self.nodes)
	}
}

/// A transaction between two wallets as reported by the assessment service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
	pub source: String,
	pub target: String,
	/// Any JSON-truthy value counts as flagged.
	#[serde(default, deserialize_with = "truthy")]
	pub risk_flag: bool,
}

/// Assessment view response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssessmentPayload {
	pub risk_score: u64,
	#[serde(default)]
	pub reasons: Vec<String>,
	#[serde(default)]
	pub nodes: Option<Vec<WalletNode>>,
	#[serde(default)]
	pub edges: Option<Vec<FlowEdge>>,
	#[serde(default)]
	pub root_wallet: Option<String>,
}

impl AssessmentPayload {
	pub fn from_json(body: &str) -> PayloadResult<Self> {
		let payload: Self = serde_json::from_str(body)?;
		if let Some(nodes) = &payload.nodes {
			validate_nodes(nodes)?;
		}
		Ok(payload)
	}

	/// Graph slice of the assessment, rooted at the reported root or, when the
	/// service omitted it, at the wallet that was assessed.
	pub fn graph(&self, assessed: &str) -> Option<GraphPayload> {
		let nodes = self.nodes.as_ref().filter(|n| !n.is_empty())?;
		let root_wallet = self
			.root_wallet
			.clone()
			.filter(|r| !r.trim().is_empty())
			.unwrap_or_else(|| assessed.to_string());
		Some(GraphPayload {
			root_wallet,
			nodes: nodes.clone(),
		})
	}
}

fn validate_nodes(nodes: &[WalletNode]) -> PayloadResult<()> {
	let mut seen = HashSet::with_capacity(nodes.len());
	for (index, node) in nodes.iter().enumerate() {
		if node.id.trim().is_empty() {
			return Err(PayloadError::EmptyId { index });
		}
		if !seen.insert(node.id.as_str()) {
			return Err(PayloadError::DuplicateNode {
				id: node.id.clone(),
			});
		}
		if node.suspicious_score > MAX_SUSPICIOUS_SCORE {
			return Err(PayloadError::ScoreOutOfRange {
				id: node.id.clone(),
				score: node.suspicious_score,
			});
		}
		if !node.balance.is_finite() || node.balance < 0.0 {
			return Err(PayloadError::InvalidBalance {
				id: node.id.clone(),
				balance: node.balance,
			});
		}
	}
	Ok(())
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;
	Ok(match value {
		None | Some(Value::Null) => false,
		Some(Value::Bool(b)) => b,
		Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
		Some(Value::String(s)) => !s.is_empty(),
		Some(Value::Array(_)) | Some(Value::Object(_)) => true,
	})
}

/// `0x` followed by exactly 40 hex digits.
pub fn is_evm_address(address: &str) -> bool {
	address
		.strip_prefix("0x")
		.is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
	use super::*;

	const NODE: &str = r#"{"id":"0xB","distance":1,"layer":1,"balance":0.5,"tx_count":3,
		"risk_score":120,"suspicious_score":45,"is_scam":false,"message":"mixer"}"#;

	#[test]
	fn parses_graph_payload() {
		let body = format!(r#"{{"root_wallet":"0xA","nodes":[{NODE}]}}"#);
		let payload = GraphPayload::from_json(&body).unwrap();
		assert_eq!(payload.root_wallet, "0xA");
		assert_eq!(payload.nodes.len(), 1);
		assert_eq!(payload.nodes[0].suspicious_score, 45);
	}

	#[test]
	fn missing_field_is_an_error() {
		let body = r#"{"root_wallet":"0xA","nodes":[{"id":"0xB","distance":1}]}"#;
		assert!(matches!(
			GraphPayload::from_json(body),
			Err(PayloadError::Json(_))
		));
	}

	#[test]
	fn negative_layer_is_rejected() {
		let body = NODE.replace(r#""layer":1"#, r#""layer":-1"#);
		let body = format!(r#"{{"root_wallet":"0xA","nodes":[{body}]}}"#);
		assert!(GraphPayload::from_json(&body).is_err());
	}

	#[test]
	fn duplicate_ids_are_rejected() {
		let body = format!(r#"{{"root_wallet":"0xA","nodes":[{NODE},{NODE}]}}"#);
		match GraphPayload::from_json(&body) {
			Err(PayloadError::DuplicateNode { id }) => assert_eq!(id, "0xB"),
			other => panic!("unexpected {other:?}"),
		}
	}

	#[test]
	fn score_above_hundred_is_rejected() {
		let body = NODE.replace(r#""suspicious_score":45"#, r#""suspicious_score":101"#);
		let body = format!(r#"{{"root_wallet":"0xA","nodes":[{body}]}}"#);
		assert!(matches!(
			GraphPayload::from_json(&body),
			Err(PayloadError::ScoreOutOfRange { score: 101, .. })
		));
	}

	#[test]
	fn empty_root_is_rejected() {
		let body = r#"{"root_wallet":" ","nodes":[]}"#;
		assert!(matches!(
			GraphPayload::from_json(body),
			Err(PayloadError::EmptyRoot)
		));
	}

	#[test]
	fn assessment_defaults_reasons() {
		let payload = AssessmentPayload::from_json(r#"{"risk_score":250}"#).unwrap();
		assert_eq!(payload.risk_score, 250);
		assert!(payload.reasons.is_empty());
		assert!(payload.nodes.is_none());
		assert!(payload.graph("0xA").is_none());
	}

	#[test]
	fn assessment_requires_score() {
		assert!(AssessmentPayload::from_json(r#"{"reasons":["x"]}"#).is_err());
	}

	#[test]
	fn risk_flag_follows_json_truthiness() {
		let body = r#"{"risk_score":1,"edges":[
			{"source":"a","target":"b","risk_flag":true},
			{"source":"a","target":"b","risk_flag":1},
			{"source":"a","target":"b","risk_flag":"yes"},
			{"source":"a","target":"b","risk_flag":0},
			{"source":"a","target":"b","risk_flag":""},
			{"source":"a","target":"b","risk_flag":null},
			{"source":"a","target":"b"}
		]}"#;
		let payload = AssessmentPayload::from_json(body).unwrap();
		let flags: Vec<bool> = payload
			.edges
			.unwrap()
			.iter()
			.map(|e| e.risk_flag)
			.collect();
		assert_eq!(flags, vec![true, true, true, false, false, false, false]);
	}

	#[test]
	fn assessment_graph_falls_back_to_assessed_wallet() {
		let body = format!(r#"{{"risk_score":10,"nodes":[{NODE}]}}"#);
		let payload = AssessmentPayload::from_json(&body).unwrap();
		let graph = payload.graph("0xA").unwrap();
		assert_eq!(graph.root_wallet, "0xA");
		assert_eq!(graph.nodes.len(), 1);
	}

	#[test]
	fn evm_address_shape() {
		assert!(is_evm_address("0x52908400098527886E0F7030069857D2E4169EE7"));
		assert!(!is_evm_address("52908400098527886E0F7030069857D2E4169EE7"));
		assert!(!is_evm_address("0x52908400098527886E0F7030069857D2E4169EE"));
		assert!(!is_evm_address("0x52908400098527886E0F7030069857D2E4169EEZ"));
	}
}
