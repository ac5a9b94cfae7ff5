//! Loading scenes and parameters from disk.

use std::fs;
use std::path::PathBuf;

use lumen_core::obj::{load_obj, ObjError};
use lumen_core::{ConfigError, Projection, RenderParameters};
use lumen_math::Vec3;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lumen-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

const MTL: &str = "\
newmtl matte
Ka 0.1 0.1 0.1
Kd 0.8 0.2 0.2
Ks 0 0 0
Ns 10
illum 2

newmtl chrome
Kd 0.1 0.1 0.1
Ks 0.9 0.9 0.9
Ns 200
illum 3

newmtl lamp
Kd 1 1 1
Ke 4 4 3
illum 1
";

const OBJ: &str = "\
mtllib scene.mtl
o floor
v -1 0 -1
v 1 0 -1
v 1 0 1
v -1 0 1
usemtl matte
f 1 4 3 2
o mirror
v -1 0 2
v 1 0 2
v 0 2 2
usemtl chrome
f 5 6 7
o lamp
v -0.5 3 -0.5
v 0.5 3 -0.5
v 0 3 0.5
usemtl lamp
f 8 10 9
";

#[test]
fn obj_with_materials() {
    let dir = scratch_dir("obj");
    fs::write(dir.join("scene.mtl"), MTL).unwrap();
    fs::write(dir.join("scene.obj"), OBJ).unwrap();

    let scene = load_obj(dir.join("scene.obj")).unwrap();

    assert_eq!(scene.name, "scene");
    assert_eq!(scene.model_count(), 3);
    assert_eq!(scene.total_triangle_count(), 4);
    // Default material plus three from the library
    assert_eq!(scene.material_count(), 4);

    let material = |model: usize| scene.get_material(scene.models[model].material_id()).unwrap();

    let matte = material(0);
    assert_eq!(matte.name, "matte");
    assert_eq!(matte.diffuse, Vec3::new(0.8, 0.2, 0.2));
    assert_eq!(matte.reflectivity, 0.0);
    assert!(!matte.is_light());

    let chrome = material(1);
    assert!((chrome.reflectivity - 0.9).abs() < 1e-6);
    assert_eq!(chrome.shininess, 200.0);

    let lamp = material(2);
    assert_eq!(lamp.emissive, Vec3::new(4.0, 4.0, 3.0));
    assert!(lamp.is_light());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn obj_missing_file() {
    let result = load_obj(scratch_dir("missing").join("nope.obj"));
    assert!(matches!(result, Err(ObjError::Load(_))));
}

#[test]
fn params_from_file() {
    let dir = scratch_dir("params");
    let path = dir.join("render.json");

    let mut params = RenderParameters::default();
    params.projection = Projection::Orthographic;
    params.bounces = 3;
    params.lights[0].color = Vec3::new(0.5, 0.25, 1.0);
    fs::write(&path, params.to_json().unwrap()).unwrap();

    assert_eq!(RenderParameters::load(&path).unwrap(), params);

    fs::write(&path, "{ \"bounces\": \"many\" }").unwrap();
    assert!(matches!(RenderParameters::load(&path), Err(ConfigError::Json(_))));

    assert!(matches!(
        RenderParameters::load(dir.join("absent.json")),
        Err(ConfigError::Io(_))
    ));

    fs::remove_dir_all(dir).ok();
}
