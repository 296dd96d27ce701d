use crate::error::{RenderError, Result};
use crate::scene::mesh::{FaceVertex, Mesh, face_normal};
use log::{info, warn};
use nalgebra::{Vector2, Vector3};
use std::path::Path;

/// Loads an OBJ file into a single triangulated Mesh.
///
/// Position, uv and normal indices are kept separate, so seams in uv space
/// survive. Sub-objects of the file are merged. Missing normals are replaced
/// by face normals, missing uvs by (0, 0).
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path_obj = path.as_ref();
    let fail = |reason: String| RenderError::MeshLoad {
        path: path_obj.display().to_string(),
        reason,
    };
    if !path_obj.exists() {
        return Err(fail("file not found".to_string()));
    }

    info!("Loading OBJ file: {}", path_obj.display());

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ..Default::default()
    };

    // Materials come from the `<stem>_*.tga` convention instead of MTL files.
    let (models, _materials) =
        tobj::load_obj(path_obj, &load_options).map_err(|e| fail(e.to_string()))?;

    let mut mesh = Mesh::default();

    for model in models {
        let src = &model.mesh;
        if src.indices.len() % 3 != 0 {
            return Err(fail(format!(
                "object '{}' has {} indices, not a triangle list",
                model.name,
                src.indices.len()
            )));
        }

        // 1. Attribute arrays, appended with per-attribute offsets
        let position_base = mesh.positions.len();
        let uv_base = mesh.uvs.len();
        let normal_base = mesh.normals.len();

        mesh.positions.extend(
            src.positions
                .chunks_exact(3)
                .map(|p| Vector3::new(p[0], p[1], p[2])),
        );
        mesh.uvs.extend(
            src.texcoords
                .chunks_exact(2)
                .map(|t| Vector2::new(t[0], t[1])),
        );
        mesh.normals.extend(
            src.normals
                .chunks_exact(3)
                .map(|n| Vector3::new(n[0], n[1], n[2])),
        );

        let has_uvs = src.texcoord_indices.len() == src.indices.len();
        let has_normals = src.normal_indices.len() == src.indices.len();
        if !has_uvs {
            warn!("Mesh '{}' is missing texture coordinates.", model.name);
        }
        if !has_normals {
            warn!("Mesh '{}' is missing normals. Using face normals.", model.name);
        }

        // 2. Faces
        for (f, corners) in src.indices.chunks_exact(3).enumerate() {
            let mut face = [FaceVertex::default(); 3];
            for (nth, &index) in corners.iter().enumerate() {
                let position = position_base + index as usize;
                if position >= mesh.positions.len() {
                    return Err(fail(format!("position index {index} out of range")));
                }
                face[nth].position = position;
                face[nth].uv = if has_uvs {
                    uv_base + src.texcoord_indices[f * 3 + nth] as usize
                } else {
                    usize::MAX
                };
            }

            if has_normals {
                for nth in 0..3 {
                    face[nth].normal = normal_base + src.normal_indices[f * 3 + nth] as usize;
                }
            } else {
                let n = face_normal(&face.map(|c| mesh.positions[c.position]));
                let index = mesh.normals.len();
                mesh.normals.push(n);
                for corner in face.iter_mut() {
                    corner.normal = index;
                }
            }
            mesh.faces.push(face);
        }
    }

    if mesh.faces.is_empty() {
        return Err(fail("no triangles".to_string()));
    }

    info!(
        "OBJ loaded successfully. Positions: {}, UVs: {}, Normals: {}, Faces: {}",
        mesh.positions.len(),
        mesh.uvs.len(),
        mesh.normals.len(),
        mesh.face_count()
    );

    Ok(mesh)
}
