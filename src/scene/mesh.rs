use nalgebra::{Vector2, Vector3};

/// Indices of one triangle corner into the mesh's attribute arrays.
/// Position, uv and normal are indexed independently, as OBJ stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceVertex {
    pub position: usize,
    pub uv: usize,
    pub normal: usize,
}

impl FaceVertex {
    /// A corner using the same index for all three attributes.
    pub fn uniform(index: usize) -> Self {
        Self {
            position: index,
            uv: index,
            normal: index,
        }
    }
}

/// Triangulated geometry with per-corner attribute indices.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Vector3<f32>>,
    pub uvs: Vec<Vector2<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub faces: Vec<[FaceVertex; 3]>,
}

impl Mesh {
    pub fn new(
        positions: Vec<Vector3<f32>>,
        uvs: Vec<Vector2<f32>>,
        normals: Vec<Vector3<f32>>,
        faces: Vec<[FaceVertex; 3]>,
    ) -> Self {
        Self {
            positions,
            uvs,
            normals,
            faces,
        }
    }

    /// Builds a mesh from loose triangles: one face normal per triangle,
    /// uvs taken from the xy coordinates.
    pub fn from_triangles(triangles: &[[Vector3<f32>; 3]]) -> Self {
        let mut mesh = Mesh::default();
        for (f, tri) in triangles.iter().enumerate() {
            let base = mesh.positions.len();
            mesh.positions.extend_from_slice(tri);
            mesh.uvs.extend(tri.iter().map(|p| p.xy()));
            mesh.normals.push(face_normal(tri));
            mesh.faces.push([0, 1, 2].map(|i| FaceVertex {
                position: base + i,
                uv: base + i,
                normal: f,
            }));
        }
        mesh
    }

    /// Creates a simple triangle mesh for testing purposes.
    ///
    /// Vertices are arranged in Counter-Clockwise (CCW) order, facing +Z.
    pub fn create_test_triangle() -> Self {
        Self::new(
            vec![
                Vector3::new(0.0, 0.5, 0.0),
                Vector3::new(-0.5, -0.5, 0.0),
                Vector3::new(0.5, -0.5, 0.0),
            ],
            vec![
                Vector2::new(0.5, 1.0),
                Vector2::new(0.0, 0.0),
                Vector2::new(1.0, 0.0),
            ],
            vec![Vector3::z(); 3],
            vec![[FaceVertex::uniform(0), FaceVertex::uniform(1), FaceVertex::uniform(2)]],
        )
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn position(&self, face: usize, nth: usize) -> Vector3<f32> {
        self.positions[self.faces[face][nth].position]
    }

    /// UV of a corner, (0, 0) when the mesh carries none.
    #[inline]
    pub fn uv(&self, face: usize, nth: usize) -> Vector2<f32> {
        self.uvs
            .get(self.faces[face][nth].uv)
            .copied()
            .unwrap_or_else(Vector2::zeros)
    }

    /// Normal of a corner; falls back to the face normal when the mesh carries none.
    #[inline]
    pub fn normal(&self, face: usize, nth: usize) -> Vector3<f32> {
        match self.normals.get(self.faces[face][nth].normal) {
            Some(n) => *n,
            None => face_normal(&[0, 1, 2].map(|i| self.position(face, i))),
        }
    }
}

/// Unit normal of a counter-clockwise triangle; zero for degenerate ones.
pub fn face_normal(tri: &[Vector3<f32>; 3]) -> Vector3<f32> {
    let n = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
    n.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros)
}
