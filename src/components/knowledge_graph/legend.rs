use leptos::prelude::*;

use super::types::legend;

/// One swatch per node category, colored from the same table the canvas uses.
#[component]
pub fn GraphLegend() -> impl IntoView {
	view! {
		<div class="knowledge-graph-legend">
			{legend()
				.map(|(kind, color)| {
					view! {
						<div class="legend-item">
							<span class="legend-swatch" style=format!("background-color: {color};")></span>
							<span class="legend-label">{kind.name()}</span>
						</div>
					}
				})
				.collect_view()}
		</div>
	}
}
