mod edges;
mod grid;
mod normals;

pub use edges::triangle_edges;
pub use grid::{grid_triangles, grid_vertices, vertex_index};
pub use normals::vertex_normals;

use bevy::{
    log::{debug, info},
    prelude::*,
    render::{mesh::Indices, render_resource::PrimitiveTopology},
};
use ndarray::Array2;

use crate::{
    error::TerrainError,
    generation::{perturb_heights, TerrainSettings},
    heightmap::HeightMap,
};

/// What the renderer can accept for index buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderCapabilities {
    pub u32_indices: bool,
}

impl Default for RenderCapabilities {
    fn default() -> Self {
        Self { u32_indices: true }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawMode {
    /// Filled triangles from the face buffer.
    Triangles,
    /// Line segments from the edge buffer.
    Edges,
}

/// Static terrain: grid vertices with perturbed heights, faces, smooth normals and wireframe edges.
#[derive(Clone, Debug)]
pub struct TerrainMesh {
    div: usize,
    vertices: Vec<Vec3>,
    triangles: Vec<u32>,
    normals: Vec<Vec3>,
    edges: Vec<u32>,
}

impl TerrainMesh {
    /// Runs the whole pipeline: grid, triangulation, heights, normals, edges.
    pub fn generate(settings: &TerrainSettings) -> Result<Self, TerrainError> {
        settings.validate()?;

        let div = settings.div;
        let mut vertices = grid_vertices(settings);
        let normals = vec![Vec3::Z; vertices.len()];
        info!("Terrain: allocated buffers for {} vertices", vertices.len());

        let triangles = grid_triangles(div);
        info!("Terrain: generated {} triangles", triangles.len() / 3);

        perturb_heights(&mut vertices, settings)?;
        debug!("Terrain: applied {:?}", settings.perturbation);

        let mut mesh = Self {
            div,
            vertices,
            triangles,
            normals,
            edges: Vec::new(),
        };
        mesh.recompute_normals();

        mesh.edges = triangle_edges(&mesh.triangles);
        info!("Terrain: generated {} lines", mesh.num_edges());

        Ok(mesh)
    }

    pub fn div(&self) -> usize {
        self.div
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_faces(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len() / 2
    }

    fn checked_index(&self, row: usize, col: usize) -> Result<usize, TerrainError> {
        if row > self.div || col > self.div {
            return Err(TerrainError::VertexOutOfRange {
                row,
                col,
                div: self.div,
            });
        }
        Ok(vertex_index(self.div, row, col))
    }

    pub fn vertex(&self, row: usize, col: usize) -> Result<Vec3, TerrainError> {
        Ok(self.vertices[self.checked_index(row, col)?])
    }

    /// Overwrites a vertex position. Normals are left alone until
    /// [`TerrainMesh::recompute_normals`] is called.
    pub fn set_vertex(&mut self, position: Vec3, row: usize, col: usize) -> Result<(), TerrainError> {
        let i = self.checked_index(row, col)?;
        self.vertices[i] = position;
        Ok(())
    }

    pub fn normal(&self, row: usize, col: usize) -> Result<Vec3, TerrainError> {
        Ok(self.normals[self.checked_index(row, col)?])
    }

    pub fn recompute_normals(&mut self) {
        self.normals = vertex_normals(&self.vertices, &self.triangles);
        debug!("Terrain: computed {} normals", self.normals.len());
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Vertex index triples, one per face.
    pub fn face_buffer(&self) -> &[u32] {
        &self.triangles
    }

    /// Vertex index pairs, three per face.
    pub fn edge_buffer(&self) -> &[u32] {
        &self.edges
    }

    /// Positions as `x, y, z` per vertex.
    pub fn position_buffer(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.to_array()).collect()
    }

    /// Normals as `x, y, z` per vertex.
    pub fn normal_buffer(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| n.to_array()).collect()
    }

    pub fn height_map(&self) -> HeightMap {
        let side = self.div + 1;
        HeightMap(Array2::from_shape_fn((side, side), |(row, col)| {
            self.vertices[vertex_index(self.div, row, col)].z
        }))
    }

    pub fn log_buffers(&self) {
        for v in &self.vertices {
            debug!("v {} {} {}", v.x, v.y, v.z);
        }
        for f in self.triangles.chunks_exact(3) {
            debug!("f {} {} {}", f[0], f[1], f[2]);
        }
    }

    /// Index buffer in the narrowest width the vertex count allows.
    fn indices(&self, source: &[u32], caps: RenderCapabilities) -> Result<Indices, TerrainError> {
        if self.num_vertices() <= u16::MAX as usize + 1 {
            Ok(Indices::U16(source.iter().map(|&i| i as u16).collect()))
        } else if caps.u32_indices {
            Ok(Indices::U32(source.to_vec()))
        } else {
            Err(TerrainError::UnsupportedIndexWidth {
                num_vertices: self.num_vertices(),
            })
        }
    }

    pub fn to_render_mesh(
        &self,
        caps: RenderCapabilities,
        mode: DrawMode,
    ) -> Result<Mesh, TerrainError> {
        let (topology, source) = match mode {
            DrawMode::Triangles => (PrimitiveTopology::TriangleList, &self.triangles),
            DrawMode::Edges => (PrimitiveTopology::LineList, &self.edges),
        };
        let indices = self.indices(source, caps)?;

        let mut mesh = Mesh::new(topology);
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.vertices.clone());
        info!("Loaded {} vertices", self.num_vertices());
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals.clone());
        info!("Loaded {} normals", self.normals.len());
        mesh.set_indices(Some(indices));
        match mode {
            DrawMode::Triangles => info!("Loaded {} triangles", self.num_faces()),
            DrawMode::Edges => info!("Loaded {} edges", self.num_edges()),
        }

        Ok(mesh)
    }
}
