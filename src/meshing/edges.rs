/// Line-list indices for wireframe drawing: `(a, b), (b, c), (c, a)` per face.
///
/// Edges shared by two faces are emitted twice.
pub fn triangle_edges(triangles: &[u32]) -> Vec<u32> {
    let mut edges = Vec::with_capacity(triangles.len() * 2);

    for face in triangles.chunks_exact(3) {
        edges.extend([face[0], face[1]]);
        edges.extend([face[1], face[2]]);
        edges.extend([face[2], face[0]]);
    }

    edges
}
