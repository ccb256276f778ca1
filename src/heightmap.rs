use ndarray::Array2;

use crate::error::TerrainError;

/// Vertex heights laid out `[[row, col]]`, row following y and col following x.
pub struct HeightMap(pub Array2<f32>);

impl HeightMap {
    pub fn height_at(&self, row: usize, col: usize) -> Result<f32, TerrainError> {
        self.0
            .get([row, col])
            .copied()
            .ok_or(TerrainError::VertexOutOfRange {
                row,
                col,
                div: self.0.nrows().saturating_sub(1),
            })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.0.dim()
    }

    pub fn min(&self) -> f32 {
        self.0.fold(f32::INFINITY, |acc, &v| acc.min(v))
    }

    pub fn max(&self) -> f32 {
        self.0.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v))
    }

    pub fn mean(&self) -> f32 {
        self.0.mean().unwrap_or(0.)
    }
}
