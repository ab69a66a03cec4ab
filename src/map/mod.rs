pub mod arc;
pub mod geometry;
pub mod projection;
pub mod scene;
pub mod topo;

pub use projection::{Projection, ProjectionConfig};
pub use scene::StaticScene;
pub use topo::Topology;
