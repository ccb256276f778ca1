use bevy::prelude::Vec3;

use crate::generation::TerrainSettings;

/// Flat buffer index of the vertex at `(row, col)` in a grid with `div` cells per side.
///
/// Rows follow y and columns follow x, so columns vary fastest.
#[inline]
pub fn vertex_index(div: usize, row: usize, col: usize) -> usize {
    row * (div + 1) + col
}

/// Evenly spaced vertices over the extents, all at height zero.
pub fn grid_vertices(settings: &TerrainSettings) -> Vec<Vec3> {
    let div = settings.div;
    let cell = settings.cell_size();
    let mut vertices = vec![Vec3::ZERO; (div + 1) * (div + 1)];

    for row in 0..=div {
        for col in 0..=div {
            vertices[vertex_index(div, row, col)] = Vec3 {
                x: col as f32 * cell.x + settings.min_x,
                y: row as f32 * cell.y + settings.min_y,
                z: 0.,
            };
        }
    }

    vertices
}

/// Two triangles per cell, wound so `(v1 - v2) x (v3 - v2)` points up on a flat grid.
pub fn grid_triangles(div: usize) -> Vec<u32> {
    let idx = |row: usize, col: usize| -> u32 { vertex_index(div, row, col) as u32 };
    let mut triangles = Vec::with_capacity(div * div * 6);

    for row in 0..div {
        for col in 0..div {
            let bottom_left = idx(row, col);
            let bottom_right = idx(row, col + 1);
            let top_left = idx(row + 1, col);
            let top_right = idx(row + 1, col + 1);

            triangles.extend([bottom_left, top_left, bottom_right]);
            triangles.extend([bottom_right, top_left, top_right]);
        }
    }

    triangles
}
