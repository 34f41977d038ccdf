mod component;
mod frame;
mod interaction;
mod render;
mod scale;
mod scene;
mod simulation;
mod snapshot;
mod state;
mod types;

pub use component::{GraphHeight, GraphView};
pub use snapshot::SnapshotIssue;
pub use state::GraphConfig;
pub use types::{GraphData, GraphEdge, GraphNode};
