use crate::core::math::transform::TransformSet;
use crate::io::config::Config;
use crate::io::image::Image;
use crate::pipeline::passes::{SceneSetup, render_single_pass, render_with_shadows};
use crate::pipeline::renderer::Renderer;
use crate::pipeline::shaders::ShaderKind;
use crate::pipeline::shaders::flat::FlatShader;
use crate::scene::camera::{Camera, Viewport};
use crate::scene::context::RenderContext;
use crate::scene::light::DirectionalLight;
use crate::scene::loader::load_models;
use crate::scene::mesh::Mesh;
use crate::scene::model::Model;
use anyhow::{Context, Result, bail};
use log::{info, warn};
use nalgebra::Vector3;
use std::path::Path;
use std::time::Instant;

/// Side length of the built-in demo canvas.
pub const DEMO_SIZE: usize = 200;

const WIREFRAME_COLOR: [u8; 4] = [255, 255, 255, 255];

/// The three screen-space triangles rendered when no mesh is given,
/// with their colors (red, white, green).
pub fn demo_scene() -> (Model, FlatShader) {
    let tri = |a: (f32, f32), b: (f32, f32), c: (f32, f32)| {
        [a, b, c].map(|(x, y)| Vector3::new(x, y, 0.0))
    };
    let mesh = Mesh::from_triangles(&[
        tri((10.0, 70.0), (50.0, 160.0), (70.0, 80.0)),
        tri((180.0, 50.0), (150.0, 1.0), (70.0, 180.0)),
        tri((180.0, 150.0), (120.0, 160.0), (130.0, 180.0)),
    ]);
    let shader = FlatShader::new(vec![
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(1.0, 1.0, 1.0),
        Vector3::new(0.0, 1.0, 0.0),
    ]);
    (Model::new("demo", mesh, Default::default()), shader)
}

/// Renders the demo triangles with identity transforms: vertex coordinates are pixels.
pub fn render_demo(renderer: &mut Renderer, wireframe: bool) {
    let (model, mut shader) = demo_scene();
    let ctx = RenderContext::new(&model, Vector3::z(), TransformSet::identity());
    renderer.clear();
    renderer.draw_model(&ctx, &mut shader);
    if wireframe {
        renderer.draw_wireframe(&ctx, WIREFRAME_COLOR);
    }
}

/// Flips to a top-left origin and writes an uncompressed TGA.
pub fn write_image(image: &Image, path: &str) -> Result<()> {
    let mut flipped = image.clone();
    flipped.flip_vertically();
    flipped
        .write_tga(Path::new(path))
        .with_context(|| format!("failed to write {path}"))
}

fn scene_setup(config: &Config) -> Result<SceneSetup> {
    let r = &config.render;
    let camera = Camera::new(
        Vector3::from(config.camera.eye),
        Vector3::from(config.camera.center),
        Vector3::from(config.camera.up),
    );
    let light = DirectionalLight::new(Vector3::from(config.light.direction))
        .context("invalid [light] section")?;
    let viewport = match r.viewport {
        Some([x, y, width, height]) => Viewport {
            x,
            y,
            width,
            height,
            depth: r.depth,
        },
        None => Viewport::centered(r.width, r.height, r.depth),
    };
    Ok(SceneSetup {
        camera,
        light,
        viewport,
        shadow_bias: r.shadow_bias,
        ambient: r.ambient,
    })
}

/// Runs the renderer in CLI mode: load, render, write.
///
/// Meshes that fail to load are skipped; the remaining ones are rendered
/// and written before the failure is reported.
pub fn run(config: &Config) -> Result<()> {
    let start_time = Instant::now();
    let r = &config.render;

    if config.meshes.is_empty() {
        info!("No meshes given, rendering the demo scene ({DEMO_SIZE}x{DEMO_SIZE})");
        let mut renderer = Renderer::new(DEMO_SIZE, DEMO_SIZE);
        render_demo(&mut renderer, r.wireframe);
        write_image(&renderer.framebuffer.image, &r.output)?;
        if r.zbuffer {
            write_image(&renderer.depth_image(), &r.zbuffer_output)?;
        }
        info!("Done in {:?}", start_time.elapsed());
        return Ok(());
    }

    // 1. Resources
    let (models, failed) = load_models(&config.meshes);
    if models.is_empty() {
        bail!("none of the {} meshes could be loaded", config.meshes.len());
    }
    let setup = scene_setup(config)?;

    // 2. Passes
    let mut renderer = Renderer::new(r.width, r.height);
    renderer.rasterizer.set_cull_mode(r.cull_mode);
    info!(
        "Rendering {} models with {:?} shading at {}x{}",
        models.len(),
        r.shader,
        r.width,
        r.height
    );

    let stats = if r.shader == ShaderKind::Shadow {
        let mut shadow_renderer = Renderer::new(r.width, r.height);
        shadow_renderer.rasterizer.set_cull_mode(r.cull_mode);
        let (stats, shadow_map) =
            render_with_shadows(&mut renderer, &mut shadow_renderer, &models, &setup)
                .context("shadow rendering failed")?;
        write_image(&shadow_map.image(), &r.shadow_output)?;
        stats
    } else {
        render_single_pass(&mut renderer, &models, &setup, r.shader)
            .context("rendering failed")?
    };
    info!(
        "{} pixels written, {} occluded, {} discarded",
        stats.written, stats.occluded, stats.discarded
    );

    if r.wireframe {
        let transforms = setup.camera.transforms(&setup.viewport)?;
        for model in &models {
            let ctx = RenderContext::new(model, setup.light.direction(), transforms);
            renderer.draw_wireframe(&ctx, WIREFRAME_COLOR);
        }
    }

    // 3. Output
    write_image(&renderer.framebuffer.image, &r.output)?;
    if r.zbuffer {
        write_image(&renderer.depth_image(), &r.zbuffer_output)?;
    }
    info!("Done in {:?}", start_time.elapsed());

    if failed > 0 {
        warn!("{failed} of {} meshes were skipped", config.meshes.len());
        bail!("{failed} mesh(es) failed to load");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_scene_paints_three_colors() {
        let mut renderer = Renderer::new(DEMO_SIZE, DEMO_SIZE);
        render_demo(&mut renderer, false);
        let image = &renderer.framebuffer.image;

        // Centroids of the three triangles.
        assert_eq!(image.get(43, 103), Some([255, 0, 0, 255]));
        assert_eq!(image.get(133, 77), Some([255, 255, 255, 255]));
        assert_eq!(image.get(143, 163), Some([0, 255, 0, 255]));
        assert_eq!(image.get(5, 5), Some([0, 0, 0, 255]));
    }

    #[test]
    fn config_viewport_overrides_the_default() {
        let mut config = Config::default();
        config.render.viewport = Some([1.0, 2.0, 30.0, 40.0]);
        let setup = scene_setup(&config).unwrap();
        assert_eq!(setup.viewport.width, 30.0);
        assert_eq!(setup.viewport.depth, config.render.depth);

        config.render.viewport = None;
        let setup = scene_setup(&config).unwrap();
        assert_eq!(setup.viewport, Viewport::centered(800, 800, 2000.0));
    }

    #[test]
    fn zero_light_is_rejected() {
        let mut config = Config::default();
        config.light.direction = [0.0, 0.0, 0.0];
        assert!(scene_setup(&config).is_err());
    }
}
