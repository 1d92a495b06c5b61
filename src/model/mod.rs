mod graph;
mod payload;

pub use graph::{Edge, EnrichedNode, GraphModel, GraphModelBuilder, derive_edges, short_label};
pub use payload::{
	AssessmentPayload, FlowEdge, GraphPayload, MAX_SUSPICIOUS_SCORE, WalletNode, is_evm_address,
};
