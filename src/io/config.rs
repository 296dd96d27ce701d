use crate::core::rasterizer::CullMode;
use crate::error::{RenderError, Result};
use crate::pipeline::shaders::ShaderKind;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    /// OBJ files to render. Empty means the built-in demo scene.
    #[serde(default)]
    pub meshes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_zbuffer_output")]
    pub zbuffer_output: String,
    #[serde(default = "default_shadow_output")]
    pub shadow_output: String,
    #[serde(default = "default_false")]
    pub zbuffer: bool,

    // --- Pipeline ---
    #[serde(default = "default_shader")]
    pub shader: ShaderKind,
    #[serde(default = "default_depth")]
    pub depth: f32,
    /// `[x, y, width, height]`; centered three-quarter rectangle when absent.
    #[serde(default)]
    pub viewport: Option<[f32; 4]>,
    #[serde(default)]
    pub cull_mode: CullMode,
    #[serde(default = "default_false")]
    pub wireframe: bool,

    // --- Lighting & Shadows ---
    #[serde(default = "default_shadow_bias")]
    pub shadow_bias: f32,
    #[serde(default = "default_ambient")]
    pub ambient: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            zbuffer_output: default_zbuffer_output(),
            shadow_output: default_shadow_output(),
            zbuffer: false,
            shader: default_shader(),
            depth: default_depth(),
            viewport: None,
            cull_mode: CullMode::None,
            wireframe: false,
            shadow_bias: default_shadow_bias(),
            ambient: default_ambient(),
        }
    }
}

fn default_width() -> usize {
    800
}
fn default_height() -> usize {
    800
}
fn default_output() -> String {
    "output.tga".to_string()
}
fn default_zbuffer_output() -> String {
    "zbuffer.tga".to_string()
}
fn default_shadow_output() -> String {
    "depth.tga".to_string()
}
fn default_shader() -> ShaderKind {
    ShaderKind::Phong
}
fn default_depth() -> f32 {
    2000.0
}
fn default_shadow_bias() -> f32 {
    40.0
}
fn default_ambient() -> f32 {
    20.0 / 255.0
}
fn default_false() -> bool {
    false
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_eye")]
    pub eye: [f32; 3],
    #[serde(default)]
    pub center: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: default_eye(),
            center: [0.0, 0.0, 0.0],
            up: default_up(),
        }
    }
}

fn default_eye() -> [f32; 3] {
    [1.0, 1.0, 3.0]
}
fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightConfig {
    /// Toward the light.
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
        }
    }
}

fn default_light_direction() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RenderError::Config(format!(
                "failed to read config file {:?}: {e}",
                path.as_ref()
            ))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| RenderError::Config(format!("failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values no render pass can work with.
    pub fn validate(&self) -> Result<()> {
        let r = &self.render;
        if r.width == 0 || r.height == 0 {
            return Err(RenderError::Config(format!(
                "image size {}x{} is empty",
                r.width, r.height
            )));
        }
        if !(r.depth.is_finite() && r.depth > 0.0) {
            return Err(RenderError::Config(format!(
                "depth range must be positive, got {}",
                r.depth
            )));
        }
        if !r.shadow_bias.is_finite() || r.shadow_bias < 0.0 {
            return Err(RenderError::Config(format!(
                "shadow bias must be non-negative, got {}",
                r.shadow_bias
            )));
        }
        if let Some([_, _, w, h]) = r.viewport
            && (w <= 0.0 || h <= 0.0)
        {
            return Err(RenderError::Config(format!(
                "viewport {w}x{h} is empty"
            )));
        }
        Ok(())
    }
}
