use crate::core::framebuffer::DepthBuffer;
use crate::core::math::transform::TransformSet;
use crate::core::pipeline::Shader;
use crate::core::rasterizer::TriangleStats;
use crate::error::{RenderError, Result};
use crate::io::image::Image;
use crate::pipeline::renderer::Renderer;
use crate::pipeline::shaders::ShaderKind;
use crate::pipeline::shaders::flat::FlatShader;
use crate::pipeline::shaders::gouraud::{GouraudShader, TexturedGouraudShader, ToonShader};
use crate::pipeline::shaders::normal_map::{NormalMapShader, TangentSpaceShader};
use crate::pipeline::shaders::phong::PhongShader;
use crate::pipeline::shaders::shadow::{DepthShader, ShadowPhongShader};
use crate::scene::camera::{Camera, Viewport};
use crate::scene::context::RenderContext;
use crate::scene::light::DirectionalLight;
use crate::scene::model::Model;
use log::info;
use nalgebra::Matrix4;

/// Camera, light and lighting constants shared by all passes of a frame.
#[derive(Debug, Clone, Copy)]
pub struct SceneSetup {
    pub camera: Camera,
    pub light: DirectionalLight,
    pub viewport: Viewport,
    pub shadow_bias: f32,
    pub ambient: f32,
}

/// Result of the light pass: the depth seen from the light and the
/// transforms that produced it.
#[derive(Debug, Clone)]
pub struct ShadowMap {
    pub depth: DepthBuffer,
    pub transforms: TransformSet,
}

impl ShadowMap {
    /// Normalized grayscale view of the light's depth buffer, nearest brightest.
    /// Written as the shadow artifact; the depth pass's color image is not kept.
    pub fn image(&self) -> Image {
        self.depth.to_image()
    }
}

/// Light pass transforms: the light direction is the eye, looking at the
/// camera's target with the camera's up vector, orthographic projection,
/// same viewport and depth range as the camera.
pub fn light_transforms(setup: &SceneSetup) -> Result<TransformSet> {
    Camera::orthographic(
        setup.light.direction(),
        setup.camera.center,
        setup.camera.up,
    )
    .transforms(&setup.viewport)
}

/// Maps camera screen coordinates to light screen coordinates:
/// (Vₗ·Pₗ·MVₗ) · (V꜀·P꜀·MV꜀)⁻¹.
pub fn shadow_matrix(light: &TransformSet, camera: &TransformSet) -> Result<Matrix4<f32>> {
    let inverse_camera = camera.inverse_combined()?;
    let m = light.combined() * inverse_camera;
    if m.iter().all(|v| v.is_finite()) {
        Ok(m)
    } else {
        Err(RenderError::SingularTransform("shadow matrix"))
    }
}

/// Executes the Shadow Mapping Pass: depth of every model as seen from the light.
pub fn render_shadow_map(
    renderer: &mut Renderer,
    models: &[Model],
    setup: &SceneSetup,
) -> Result<ShadowMap> {
    let transforms = light_transforms(setup)?;
    renderer.clear();

    let mut stats = TriangleStats::default();
    for model in models {
        let ctx = RenderContext::new(model, setup.light.direction(), transforms);
        let mut shader = DepthShader::new(setup.viewport.depth);
        stats.accumulate(renderer.draw_model(&ctx, &mut shader));
    }
    info!(
        "Shadow pass: {} pixels covered by {} models",
        stats.written,
        models.len()
    );

    Ok(ShadowMap {
        depth: renderer.framebuffer.depth.clone(),
        transforms,
    })
}

/// Executes the lit camera pass over a finished shadow map.
pub fn render_lit_pass(
    renderer: &mut Renderer,
    models: &[Model],
    setup: &SceneSetup,
    shadow_map: &ShadowMap,
) -> Result<TriangleStats> {
    let transforms = setup.camera.transforms(&setup.viewport)?;
    let matrix = shadow_matrix(&shadow_map.transforms, &transforms)?;
    renderer.clear();

    let mut stats = TriangleStats::default();
    for model in models {
        let ctx = RenderContext::new(model, setup.light.direction(), transforms);
        let mut shader = ShadowPhongShader::new(
            &ctx,
            matrix,
            &shadow_map.depth,
            setup.shadow_bias,
            setup.ambient,
        )?;
        stats.accumulate(renderer.draw_model(&ctx, &mut shader));
    }
    Ok(stats)
}

/// Two passes: light depth first for every model, then the lit camera pass.
pub fn render_with_shadows(
    renderer: &mut Renderer,
    shadow_renderer: &mut Renderer,
    models: &[Model],
    setup: &SceneSetup,
) -> Result<(TriangleStats, ShadowMap)> {
    let shadow_map = render_shadow_map(shadow_renderer, models, setup)?;
    let stats = render_lit_pass(renderer, models, setup, &shadow_map)?;
    Ok((stats, shadow_map))
}

/// Builds the single-pass shader of `kind` for one model.
fn single_pass_shader(
    kind: ShaderKind,
    ctx: &RenderContext,
    setup: &SceneSetup,
) -> Result<Box<dyn Shader>> {
    Ok(match kind {
        ShaderKind::Flat => Box::new(FlatShader::rainbow()),
        ShaderKind::Gouraud => Box::new(GouraudShader::new()),
        ShaderKind::Toon => Box::new(ToonShader::default()),
        ShaderKind::TexturedGouraud => Box::new(TexturedGouraudShader::new()),
        ShaderKind::NormalMap => Box::new(NormalMapShader::new(ctx)?),
        ShaderKind::Phong => Box::new(PhongShader::new(ctx)?.with_ambient(setup.ambient)),
        ShaderKind::TangentSpace => Box::new(TangentSpaceShader::new(ctx)?),
        ShaderKind::Depth => Box::new(DepthShader::new(setup.viewport.depth)),
        ShaderKind::Shadow => {
            return Err(RenderError::Config(
                "shadow shading needs two passes".to_string(),
            ));
        }
    })
}

/// Executes the Main Rendering Pass with a single-pass shader.
pub fn render_single_pass(
    renderer: &mut Renderer,
    models: &[Model],
    setup: &SceneSetup,
    kind: ShaderKind,
) -> Result<TriangleStats> {
    let transforms = setup.camera.transforms(&setup.viewport)?;
    renderer.clear();

    let mut stats = TriangleStats::default();
    for model in models {
        let ctx = RenderContext::new(model, setup.light.direction(), transforms);
        let mut shader = single_pass_shader(kind, &ctx, setup)?;
        stats.accumulate(renderer.draw_model(&ctx, shader.as_mut()));
    }
    Ok(stats)
}
