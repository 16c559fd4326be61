/// Interactive drug knowledge graph canvas.
pub mod knowledge_graph;
