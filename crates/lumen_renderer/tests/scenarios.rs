//! End-to-end renders of small hand-built scenes.

use std::sync::atomic::AtomicBool;

use lumen_core::{Light, Material, Mesh, Model, RenderParameters, Scene};
use lumen_renderer::{
    clear_color, color_to_rgba, render_frame, FrameOutcome, ImageBuffer, RaytraceScene,
    RenderState, Raytracer,
};
use lumen_math::{Vec3, Vec4};

fn render(scene: &Scene, params: &RenderParameters, width: u32, height: u32) -> ImageBuffer {
    let snapshot = RaytraceScene::build(scene, params).unwrap();
    let mut image = ImageBuffer::new(width, height);
    let outcome = render_frame(&snapshot, params, &mut image, &AtomicBool::new(false));
    assert_eq!(outcome, FrameOutcome::Completed);
    image
}

/// Wall at depth `z` facing the camera, spanning x in [x0, x1].
fn facing_wall(x0: f32, x1: f32, z: f32) -> Mesh {
    Mesh::quad(
        Vec3::new(x0, -100.0, z),
        Vec3::new(0.0, 200.0, 0.0),
        Vec3::new(x1 - x0, 0.0, 0.0),
    )
}

/// Wall at depth `z` facing away from the camera.
fn back_wall(z: f32) -> Mesh {
    Mesh::quad(
        Vec3::new(-100.0, -100.0, z),
        Vec3::new(200.0, 0.0, 0.0),
        Vec3::new(0.0, 200.0, 0.0),
    )
}

fn local_params(lights: Vec<Light>) -> RenderParameters {
    RenderParameters {
        reflection_enabled: false,
        shadows_enabled: false,
        phong_enabled: false,
        lights,
        ..Default::default()
    }
}

#[test]
fn ambient_only_triangle_over_background() {
    let mut scene = Scene::new("ambient");
    let material = scene.add_material(Material {
        ambient: Vec3::new(0.2, 0.4, 0.0),
        ..Material::default()
    });
    let triangle = Mesh::new(
        vec![
            Vec3::new(-1.0, -1.0, 5.0),
            Vec3::new(0.0, 1.0, 5.0),
            Vec3::new(1.0, -1.0, 5.0),
        ],
        vec![0, 1, 2],
        None,
    );
    scene
        .add_model(Model::new("tri", triangle).with_material(material))
        .unwrap();

    let mut params = local_params(vec![Light::new(Vec3::new(0.0, 5.0, 0.0), Vec3::ONE)]);
    params.background = Vec4::new(0.0, 0.0, 0.5, 1.0);

    let image = render(&scene, &params, 32, 32);
    let ambient = color_to_rgba(Vec4::new(0.2, 0.4, 0.0, 1.0));
    let background = clear_color(&params);

    let covered = image.pixels.iter().filter(|p| **p == ambient).count();
    let uncovered = image.pixels.iter().filter(|p| **p == background).count();
    assert_eq!(covered + uncovered, image.pixels.len());
    assert!(covered > 0);
    assert!(uncovered > 0);

    assert_eq!(image.get(16, 16), ambient);
    assert_eq!(image.get(0, 31), background);
    assert_eq!(image.get(31, 0), background);
}

#[test]
fn ambient_sums_over_lights() {
    let mut scene = Scene::new("two lights");
    let material = scene.add_material(Material {
        ambient: Vec3::splat(0.25),
        ..Material::default()
    });
    scene
        .add_model(Model::new("wall", facing_wall(-100.0, 100.0, 5.0)).with_material(material))
        .unwrap();

    let one = render(&scene, &local_params(vec![Light::default()]), 8, 8);
    let two = render(
        &scene,
        &local_params(vec![Light::default(), Light::default()]),
        8,
        8,
    );

    assert_eq!(one.get(4, 4), color_to_rgba(Vec4::new(0.25, 0.25, 0.25, 1.0)));
    assert_eq!(two.get(4, 4), color_to_rgba(Vec4::new(0.5, 0.5, 0.5, 1.0)));
}

#[test]
fn bounce_changes_only_mirror_pixels() {
    let mut scene = Scene::new("mirrors");
    let mirror = scene.add_material(Material::mirror("mirror", 1.0));
    let green = scene.add_material(Material {
        ambient: Vec3::new(0.0, 0.5, 0.0),
        ..Material::default()
    });
    let red = scene.add_material(Material {
        ambient: Vec3::new(0.6, 0.0, 0.0),
        ..Material::default()
    });

    // Mirror on the left half, matte green on the right, red behind the eye
    scene
        .add_model(Model::new("mirror", facing_wall(-100.0, 0.0, 5.0)).with_material(mirror))
        .unwrap();
    scene
        .add_model(Model::new("green", facing_wall(0.0, 100.0, 5.0)).with_material(green))
        .unwrap();
    scene
        .add_model(Model::new("red", back_wall(-5.0)).with_material(red))
        .unwrap();

    let base = RenderParameters {
        reflection_enabled: true,
        shadows_enabled: false,
        lights: Vec::new(),
        ..Default::default()
    };
    let flat = render(&scene, &RenderParameters { bounces: 0, ..base.clone() }, 24, 16);
    let bounced = render(&scene, &RenderParameters { bounces: 1, ..base }, 24, 16);

    let black = [0, 0, 0, 255];
    let mut mirror_pixels = 0;
    for (before, after) in flat.pixels.iter().zip(&bounced.pixels) {
        if *before == black {
            mirror_pixels += 1;
            assert_eq!(*after, color_to_rgba(Vec4::new(0.6, 0.0, 0.0, 1.0)));
        } else {
            assert_eq!(before, after);
        }
    }

    assert!(mirror_pixels > 0);
    assert!(mirror_pixels < flat.pixels.len());
    assert_eq!(flat.get(20, 8), color_to_rgba(Vec4::new(0.0, 0.5, 0.0, 1.0)));
}

fn shadow_scene() -> Scene {
    let mut scene = Scene::new("shadow");
    let matte = scene.add_material(Material {
        ambient: Vec3::ZERO,
        specular: Vec3::ZERO,
        ..Material::new("matte", Vec3::splat(0.8))
    });

    // Floor at y = -1 facing up
    let floor = Mesh::quad(
        Vec3::new(-100.0, -1.0, -100.0),
        Vec3::new(0.0, 0.0, 200.0),
        Vec3::new(200.0, 0.0, 0.0),
    );
    // Overhang above the camera covering x < 0, facing down
    let overhang = Mesh::quad(
        Vec3::new(-100.0, 3.0, 0.0),
        Vec3::new(100.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 100.0),
    );

    scene
        .add_model(Model::new("floor", floor).with_material(matte))
        .unwrap();
    scene
        .add_model(Model::new("overhang", overhang).with_material(matte))
        .unwrap();
    scene
}

#[test]
fn overhang_casts_shadow_on_floor() {
    let scene = shadow_scene();
    let light = Light::new(Vec3::new(0.0, 10.0, 10.0), Vec3::ONE);
    let black = [0, 0, 0, 255];

    let shadowed = RenderParameters {
        shadows_enabled: true,
        ..local_params(vec![light])
    };
    let image = render(&scene, &shadowed, 32, 32);
    let under = image.get(4, 4);
    let open = image.get(27, 4);
    assert_eq!(under, black);
    assert!(open[0] > 0);

    // Unoccluded Blinn-Phong lights both sides
    let unshadowed = RenderParameters {
        phong_enabled: true,
        ..local_params(vec![light])
    };
    let image = render(&scene, &unshadowed, 32, 32);
    assert!(image.get(4, 4)[0] > 0);
    assert!(image.get(27, 4)[0] > 0);
}

#[test]
fn background_raytracer_lifecycle() {
    let _ = env_logger::builder().is_test(true).try_init();

    let scene = shadow_scene();
    let params = RenderParameters {
        lights: vec![Light::new(Vec3::new(0.0, 10.0, 10.0), Vec3::ONE)],
        threads: 2,
        ..Default::default()
    };

    let mut raytracer = Raytracer::with_size(48, 32);
    raytracer.start_render(&scene, &params).unwrap();
    assert_eq!(raytracer.wait(), Some(FrameOutcome::Completed));
    assert_eq!(raytracer.state(), RenderState::Stopped);

    let first = raytracer.frame();
    assert_eq!(first, render(&scene, &params, 48, 32));

    let exported = first.to_image();
    assert_eq!(exported.dimensions(), (48, 32));
    assert_eq!(exported.get_pixel(0, 31).0, first.get(0, 0));

    // Restart twice, then interrupt
    raytracer.start_render(&scene, &params).unwrap();
    raytracer.start_render(&scene, &params).unwrap();
    raytracer.stop_render();
    assert!(!raytracer.is_running());

    raytracer.resize(8, 8);
    raytracer.start_render(&scene, &params).unwrap();
    assert_eq!(raytracer.wait(), Some(FrameOutcome::Completed));
    assert_eq!(raytracer.frame().pixels.len(), 64);
}

#[test]
fn stopping_mid_frame_reports_cancelled() {
    let mut scene = Scene::new("mirror box");
    let mirror = scene.add_material(Material {
        ambient: Vec3::new(0.0, 0.3, 0.0),
        ..Material::mirror("mirror", 0.9)
    });
    scene
        .add_model(Model::new("front", facing_wall(-100.0, 100.0, 5.0)).with_material(mirror))
        .unwrap();
    scene
        .add_model(Model::new("back", back_wall(-5.0)).with_material(mirror))
        .unwrap();

    let params = RenderParameters {
        threads: 1,
        lights: Vec::new(),
        ..Default::default()
    };
    let background = clear_color(&params);

    let mut raytracer = Raytracer::with_size(1024, 1024);
    raytracer.start_render(&scene, &params).unwrap();
    let outcome = raytracer.stop_render();
    let frame = raytracer.frame();
    let untouched = frame.pixels.iter().filter(|p| **p == background).count();

    // Every pixel hits a wall, so only rows that never ran keep the clear color.
    match outcome {
        Some(FrameOutcome::Cancelled) => assert!(untouched > 0),
        Some(FrameOutcome::Completed) => assert_eq!(untouched, 0),
        None => panic!("a started render must report an outcome"),
    }
    assert_eq!(raytracer.state(), RenderState::Stopped);
}
