use crate::error::Result;
use crate::io::obj_loader::load_obj;
use crate::scene::material::Material;
use crate::scene::model::Model;
use crate::scene::texture::Texture;
use log::{error, info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// `<stem><suffix>.tga` next to the OBJ file.
fn sibling_map(obj_path: &Path, suffix: &str) -> Option<PathBuf> {
    let stem = obj_path.file_stem()?.to_str()?;
    Some(obj_path.with_file_name(format!("{stem}{suffix}.tga")))
}

/// Loads one optional texture map. A missing or unreadable map is logged and skipped.
fn load_map(obj_path: &Path, suffix: &str, what: &str) -> Option<Texture> {
    let path = sibling_map(obj_path, suffix)?;
    if !path.exists() {
        warn!("No {what} map at {:?}, using fallback", path);
        return None;
    }
    match Texture::load(&path) {
        Ok(tex) => Some(tex),
        Err(e) => {
            warn!("Failed to load {what} map {:?}: {e}", path);
            None
        }
    }
}

/// Loads a mesh and the texture maps that follow the naming convention
/// `<stem>_diffuse.tga`, `<stem>_nm.tga`, `<stem>_nm_tangent.tga`, `<stem>_spec.tga`.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Model> {
    let path = path.as_ref();
    let mesh = load_obj(path)?;

    let material = Material {
        diffuse: load_map(path, "_diffuse", "diffuse"),
        normal: load_map(path, "_nm", "normal"),
        tangent_normal: load_map(path, "_nm_tangent", "tangent-space normal"),
        specular: load_map(path, "_spec", "specular"),
    };

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    info!("Model '{}' ready: {} faces", name, mesh.face_count());
    Ok(Model::new(name, mesh, material))
}

/// Loads every model independently and in parallel.
///
/// Returns the successfully loaded models in input order together with the
/// number of paths that failed; failures are logged and skipped.
pub fn load_models<P: AsRef<Path> + Sync>(paths: &[P]) -> (Vec<Model>, usize) {
    let results: Vec<Result<Model>> = paths.par_iter().map(|p| load_model(p)).collect();

    let mut models = Vec::with_capacity(results.len());
    let mut failed = 0;
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(model) => models.push(model),
            Err(e) => {
                error!("Skipping {:?}: {e}", path.as_ref());
                failed += 1;
            }
        }
    }
    (models, failed)
}
