use bevy::prelude::Vec3;

/// Area-weighted vertex normals.
///
/// Each face adds its raw cross product `(v1 - v2) x (v3 - v2)` to its three
/// vertices, so larger faces weigh more. Vertices whose sum is zero fall back
/// to `Vec3::Z`.
pub fn vertex_normals(vertices: &[Vec3], triangles: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; vertices.len()];

    for face in triangles.chunks_exact(3) {
        let [a, b, c] = [face[0] as usize, face[1] as usize, face[2] as usize];
        let normal = (vertices[a] - vertices[b]).cross(vertices[c] - vertices[b]);

        normals[a] += normal;
        normals[b] += normal;
        normals[c] += normal;
    }

    for n in normals.iter_mut() {
        let length = n.length();
        // Divide rather than multiply by the reciprocal so axis-aligned sums stay exact
        *n = if length > 0. && length.is_finite() {
            *n / length
        } else {
            Vec3::Z
        };
    }

    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_triangle_points_up() {
        let vertices = [
            Vec3::new(0., 0., 0.),
            Vec3::new(0., 1., 0.),
            Vec3::new(1., 0., 0.),
        ];
        let normals = vertex_normals(&vertices, &[0, 1, 2]);
        assert!(normals.iter().all(|n| *n == Vec3::Z));
    }

    #[test]
    fn larger_faces_weigh_more() {
        // Shared edge 0-1 along y; face A is flat, face B is small and tilted
        let vertices = [
            Vec3::new(0., 0., 0.),
            Vec3::new(0., 1., 0.),
            Vec3::new(4., 0., 0.),
            Vec3::new(-0.1, 0., 0.1),
        ];
        let normals = vertex_normals(&vertices, &[0, 1, 2, 3, 1, 0]);

        let n = normals[0];
        assert!((n.length() - 1.).abs() < 1e-5);
        assert!(n.z > 0.99);
    }

    #[test]
    fn unreferenced_vertex_falls_back_to_up() {
        let vertices = [
            Vec3::new(0., 0., 0.),
            Vec3::new(0., 1., 0.),
            Vec3::new(1., 0., 0.),
            Vec3::new(5., 5., 5.),
        ];
        let normals = vertex_normals(&vertices, &[0, 1, 2]);
        assert_eq!(normals[3], Vec3::Z);
    }

    #[test]
    fn degenerate_face_falls_back_to_up() {
        let vertices = [Vec3::ZERO, Vec3::X, Vec3::X * 2.];
        let normals = vertex_normals(&vertices, &[0, 1, 2]);
        assert!(normals.iter().all(|n| *n == Vec3::Z));
    }
}
