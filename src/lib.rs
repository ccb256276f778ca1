pub mod error;
pub mod generation;
pub mod heightmap;
pub mod meshing;

pub use error::TerrainError;
pub use generation::{Perturbation, TerrainSettings};
pub use heightmap::HeightMap;
pub use meshing::{DrawMode, RenderCapabilities, TerrainMesh};
