use softraster::app::{self, DEMO_SIZE};
use softraster::io::config::Config;
use softraster::pipeline::shaders::ShaderKind;
use std::fs;
use std::path::{Path, PathBuf};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("softraster-app-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn config_writing_to(dir: &Path) -> Config {
    let mut config = Config::default();
    config.render.width = 64;
    config.render.height = 64;
    config.render.output = dir.join("output.tga").to_string_lossy().into_owned();
    config.render.zbuffer_output = dir.join("zbuffer.tga").to_string_lossy().into_owned();
    config.render.shadow_output = dir.join("depth.tga").to_string_lossy().into_owned();
    config
}

const PYRAMID_OBJ: &str = "\
v -0.5 -0.5 0.0
v 0.5 -0.5 0.0
v 0.0 0.5 0.0
v 0.0 0.0 0.6
f 1 2 4
f 2 3 4
f 3 1 4
f 1 3 2
";

#[test]
fn demo_run_writes_top_left_origin_tga() {
    let dir = scratch_dir("demo");
    let mut config = config_writing_to(&dir);
    config.render.zbuffer = true;
    app::run(&config).unwrap();

    let image = image::open(&config.render.output).unwrap().to_rgb8();
    assert_eq!(image.dimensions(), (DEMO_SIZE as u32, DEMO_SIZE as u32));
    // The red triangle's centroid (43, 103) counted from the bottom row.
    assert_eq!(image.get_pixel(43, (DEMO_SIZE - 1 - 103) as u32).0, [255, 0, 0]);
    assert!(Path::new(&config.render.zbuffer_output).exists());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn shadow_run_writes_the_light_depth_too() {
    let dir = scratch_dir("shadow");
    let mesh = dir.join("pyramid.obj");
    fs::write(&mesh, PYRAMID_OBJ).unwrap();

    let mut config = config_writing_to(&dir);
    config.render.shader = ShaderKind::Shadow;
    config.meshes = vec![mesh.to_string_lossy().into_owned()];
    app::run(&config).unwrap();

    let output = image::open(&config.render.output).unwrap().to_rgb8();
    assert_eq!(output.dimensions(), (64, 64));
    assert!(output.pixels().any(|p| p.0 != [0, 0, 0]));
    assert!(Path::new(&config.render.shadow_output).exists());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn missing_mesh_fails_after_writing_the_others() {
    let dir = scratch_dir("partial");
    let mesh = dir.join("pyramid.obj");
    fs::write(&mesh, PYRAMID_OBJ).unwrap();

    let mut config = config_writing_to(&dir);
    config.render.shader = ShaderKind::Gouraud;
    config.meshes = vec![
        mesh.to_string_lossy().into_owned(),
        dir.join("absent.obj").to_string_lossy().into_owned(),
    ];
    assert!(app::run(&config).is_err());
    assert!(Path::new(&config.render.output).exists());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn only_missing_meshes_writes_nothing() {
    let dir = scratch_dir("none");
    let mut config = config_writing_to(&dir);
    config.meshes = vec![dir.join("absent.obj").to_string_lossy().into_owned()];
    assert!(app::run(&config).is_err());
    assert!(!Path::new(&config.render.output).exists());

    fs::remove_dir_all(dir).ok();
}
