use thiserror::Error;

/// Errors surfaced by the knowledge graph and its data loading.
#[derive(Debug, Error)]
pub enum GraphError {
	/// The canvas could not hand out a 2d context.
	#[error("canvas has no 2d rendering context")]
	ContextUnavailable,
	/// The analysis JSON did not parse.
	#[error("invalid analysis document: {0}")]
	Analysis(#[from] serde_json::Error),
}
