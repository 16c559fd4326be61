use leptos::prelude::*;
use log::{debug, warn};

use crate::components::knowledge_graph::{GraphNode, KnowledgeGraphCanvas};
use crate::graph_builder::{AnalysisResult, build_knowledge_graph};

const SAMPLE_ANALYSIS: &str = include_str!("../../assets/sample_analysis.json");

/// Opens the node's link in a new tab; nodes without one are only logged.
fn open_node(node: GraphNode) {
	let Some(url) = node.url.as_deref() else {
		debug!("clicked {} ({}), no link", node.id, node.kind.name());
		return;
	};
	let Some(window) = web_sys::window() else {
		return;
	};
	if window
		.open_with_url_and_target_and_features(url, "_blank", "noopener,noreferrer")
		.is_err()
	{
		warn!("could not open {url}");
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let analysis = AnalysisResult::from_json(SAMPLE_ANALYSIS);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			{analysis
				.map(|analysis| {
					let drug = analysis.target_drug.clone();
					let graph = build_knowledge_graph(&analysis);
					view! {
						<div class="results">
							<header class="results-header">
								<h1>{drug}</h1>
								<p class="subtitle">"Patents, literature and trials linked to the target drug."</p>
							</header>
							<KnowledgeGraphCanvas
								graph=Signal::derive(move || graph.clone())
								on_node_click=Callback::new(open_node)
							/>
						</div>
					}
				})}
		</ErrorBoundary>
	}
}
