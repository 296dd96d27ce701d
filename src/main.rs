use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use softraster::app;
use softraster::io::config::Config;
use softraster::pipeline::shaders::ShaderKind;

/// CPU software rasterizer
#[derive(Parser, Debug)]
#[command(name = "softraster", version)]
#[command(about = "Renders OBJ meshes to TGA images on the CPU")]
struct Cli {
    /// Config file path (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Lighting model
    #[arg(short, long, value_enum)]
    shader: Option<ShaderKind>,

    /// Output image path
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Image width in pixels
    #[arg(long)]
    width: Option<usize>,

    /// Image height in pixels
    #[arg(long)]
    height: Option<usize>,

    /// Also write the z-buffer as an image
    #[arg(long)]
    zbuffer: bool,

    /// Outline every triangle
    #[arg(long)]
    wireframe: bool,

    /// OBJ files to render; the demo scene when empty
    #[arg(value_name = "MESHES")]
    meshes: Vec<String>,
}

impl Cli {
    /// Config file (or defaults) with command line values on top.
    fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading config file: {path}");
                Config::load(path).with_context(|| format!("cannot use config {path}"))?
            }
            None => Config::default(),
        };

        let render = &mut config.render;
        if let Some(shader) = self.shader {
            render.shader = shader;
        }
        if let Some(output) = self.output {
            render.output = output;
        }
        if let Some(width) = self.width {
            render.width = width;
        }
        if let Some(height) = self.height {
            render.height = height;
        }
        render.zbuffer |= self.zbuffer;
        render.wireframe |= self.wireframe;
        if !self.meshes.is_empty() {
            config.meshes = self.meshes;
        }

        config.validate().context("invalid settings")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .format_level(true)
        .init();

    let config = Cli::parse().into_config()?;
    app::run(&config)
}
