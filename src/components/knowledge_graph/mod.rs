//! Canvas view of a drug with its patents, literature and trials.

mod component;
mod error;
mod layout;
mod legend;
mod render;
mod state;
mod types;
mod viewport;

pub use component::KnowledgeGraphCanvas;
pub use error::GraphError;
pub use legend::GraphLegend;
pub use render::{Frame, RenderStats, Surface, render};
pub use state::{Cursor, KnowledgeGraphState};
pub use types::{GraphData, GraphEdge, GraphNode, NodeKind, NodeStyle, Point, Positions, legend};
pub use viewport::Viewport;
