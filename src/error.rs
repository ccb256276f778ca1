use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    #[error("grid needs at least one division, got {0}")]
    InvalidDivisions(usize),

    #[error("degenerate extents x: {min_x}..{max_x}, y: {min_y}..{max_y}")]
    DegenerateExtents {
        min_x: f32,
        max_x: f32,
        min_y: f32,
        max_y: f32,
    },

    /// Only the u32 index range is enforced; memory runs out well before it.
    #[error("{0} vertices do not fit in a u32 index buffer")]
    TooManyVertices(usize),

    #[error("height step must be finite, got {0}")]
    InvalidStep(f32),

    #[error("vertex ({row}, {col}) is outside a grid with {div} divisions")]
    VertexOutOfRange { row: usize, col: usize, div: usize },

    #[error("{num_vertices} vertices need u32 indices, which the renderer does not support")]
    UnsupportedIndexWidth { num_vertices: usize },
}
