use crate::scene::material::Material;
use crate::scene::mesh::Mesh;
use nalgebra::{Vector2, Vector3};

/// A Model represents a complete 3D object: geometry plus its texture maps.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub name: String,
    pub mesh: Mesh,
    pub material: Material,
}

impl Model {
    pub fn new(name: impl Into<String>, mesh: Mesh, material: Material) -> Self {
        Self {
            name: name.into(),
            mesh,
            material,
        }
    }

    /// Untextured model.
    pub fn from_mesh(mesh: Mesh) -> Self {
        Self::new("mesh", mesh, Material::default())
    }

    pub fn face_count(&self) -> usize {
        self.mesh.face_count()
    }

    pub fn vertex_position(&self, face: usize, nth: usize) -> Vector3<f32> {
        self.mesh.position(face, nth)
    }

    pub fn vertex_normal(&self, face: usize, nth: usize) -> Vector3<f32> {
        self.mesh.normal(face, nth)
    }

    pub fn vertex_uv(&self, face: usize, nth: usize) -> Vector2<f32> {
        self.mesh.uv(face, nth)
    }

    pub fn diffuse(&self, uv: Vector2<f32>) -> Vector3<f32> {
        self.material.diffuse(uv)
    }

    pub fn specular(&self, uv: Vector2<f32>) -> f32 {
        self.material.specular(uv)
    }

    pub fn normal(&self, uv: Vector2<f32>) -> Option<Vector3<f32>> {
        self.material.normal(uv)
    }

    pub fn tangent_normal(&self, uv: Vector2<f32>) -> Option<Vector3<f32>> {
        self.material.tangent_normal(uv)
    }
}
