// Domain layer - graph models and the pure pipeline pieces
pub mod display;
pub mod graph;
pub mod range;
pub mod transform;
pub mod wizard;
