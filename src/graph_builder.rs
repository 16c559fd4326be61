//! Turns an analysis report into the graph shown by the knowledge graph canvas.

use serde::{Deserialize, Serialize};

use crate::components::knowledge_graph::{GraphData, GraphEdge, GraphError, GraphNode, NodeKind};

/// Labels are cut to this many characters.
pub const LABEL_LIMIT: usize = 80;

const PATENT_WEIGHT: f64 = 1.0;
const LITERATURE_WEIGHT: f64 = 0.8;
const TRIAL_WEIGHT: f64 = 0.9;

/// One patent hit. Every field may be missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Patent {
	#[serde(default)]
	/// Display title.
	pub title: Option<String>,
	#[serde(default)]
	/// Publication number, used when the title is missing.
	pub patent_number: Option<String>,
	#[serde(default)]
	/// Named inventor.
	pub inventor: Option<String>,
	#[serde(default)]
	/// Current assignee.
	pub assignee: Option<String>,
	#[serde(default)]
	/// Filing date as reported.
	pub filing_date: Option<String>,
	#[serde(default)]
	/// Link opened on click.
	pub url: Option<String>,
}

/// One literature hit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Literature {
	#[serde(default)]
	/// Display title.
	pub title: Option<String>,
	#[serde(default)]
	/// PubMed id, used when the title is missing.
	pub pmid: Option<String>,
	#[serde(default)]
	/// Search relevance.
	pub relevance_score: Option<f64>,
	#[serde(default)]
	/// Index the hit came from.
	pub source: Option<String>,
	#[serde(default)]
	/// Link opened on click.
	pub url: Option<String>,
}

/// One registered trial.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicalTrial {
	#[serde(default)]
	/// Display title.
	pub title: Option<String>,
	#[serde(default)]
	/// Registry id, used when the title is missing.
	pub nct_id: Option<String>,
	#[serde(default)]
	/// Recruitment status.
	pub status: Option<String>,
	#[serde(default)]
	/// Trial phase.
	pub phase: Option<String>,
	#[serde(default)]
	/// Brief summary.
	pub summary: Option<String>,
	#[serde(default)]
	/// Link opened on click.
	pub url: Option<String>,
}

/// The parts of an analysis report that end up in the graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
	/// Drug the report is about; becomes the hub node.
	pub target_drug: String,
	/// Patent hits.
	#[serde(default)]
	pub patents: Vec<Patent>,
	/// Literature hits.
	#[serde(default)]
	pub literature: Vec<Literature>,
	/// Trial hits.
	#[serde(default)]
	pub clinical_trials: Vec<ClinicalTrial>,
}

impl AnalysisResult {
	/// Parses a report, ignoring fields the graph has no use for.
	pub fn from_json(json: &str) -> Result<Self, GraphError> {
		Ok(serde_json::from_str(json)?)
	}
}

fn label(candidates: [Option<&str>; 2], fallback: impl FnOnce() -> String) -> String {
	let chosen = candidates
		.into_iter()
		.flatten()
		.find(|s| !s.is_empty())
		.map(str::to_owned)
		.unwrap_or_else(fallback);
	chosen.chars().take(LABEL_LIMIT).collect()
}

/// Drug hub with one spoke per patent, paper and trial.
///
/// Literature is drawn with the protein style and trials with the pathway
/// style; each source record is kept as node metadata.
pub fn build_knowledge_graph(data: &AnalysisResult) -> GraphData {
	let drug_id = format!("drug:{}", data.target_drug);
	let mut graph = GraphData {
		nodes: vec![GraphNode {
			id: drug_id.clone(),
			label: data.target_drug.clone(),
			kind: NodeKind::Drug,
			url: None,
			metadata: None,
		}],
		edges: Vec::new(),
	};

	let mut spoke = |id: String, label: String, kind, url: Option<String>, metadata, weight| {
		graph.edges.push(GraphEdge {
			source: drug_id.clone(),
			target: id.clone(),
			weight,
		});
		graph.nodes.push(GraphNode {
			id,
			label,
			kind,
			url,
			metadata,
		});
	};

	for (i, p) in data.patents.iter().enumerate() {
		spoke(
			format!("patent:{i}"),
			label([p.title.as_deref(), p.patent_number.as_deref()], || {
				format!("Patent {}", i + 1)
			}),
			NodeKind::Patent,
			p.url.clone(),
			serde_json::to_value(p).ok(),
			PATENT_WEIGHT,
		);
	}
	for (i, l) in data.literature.iter().enumerate() {
		spoke(
			format!("lit:{i}"),
			label([l.title.as_deref(), l.pmid.as_deref()], || format!("Paper {}", i + 1)),
			NodeKind::Protein,
			l.url.clone(),
			serde_json::to_value(l).ok(),
			LITERATURE_WEIGHT,
		);
	}
	for (i, t) in data.clinical_trials.iter().enumerate() {
		spoke(
			format!("trial:{i}"),
			label([t.title.as_deref(), t.nct_id.as_deref()], || format!("Trial {}", i + 1)),
			NodeKind::Pathway,
			t.url.clone(),
			serde_json::to_value(t).ok(),
			TRIAL_WEIGHT,
		);
	}

	graph
}
