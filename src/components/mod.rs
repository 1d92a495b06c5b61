pub mod force_graph;
pub mod risk_gauge;
