//! Built-in scene used when no OBJ file is given.

use lumen_core::{Light, Material, Mesh, Model, Scene, SceneError, Transform};
use lumen_math::{Camera, Quat, Vec3};

/// Mirror floor, a mirror wall behind, and two colored triangles between them.
pub fn scene() -> Result<Scene, SceneError> {
    let mut scene = Scene::new("demo");

    let floor_mirror = scene.add_material(Material {
        diffuse: Vec3::splat(0.2),
        ..Material::mirror("floor", 0.5)
    });
    let back_mirror = scene.add_material(Material::mirror("back", 0.9));
    let orange = scene.add_material(Material {
        ambient: Vec3::new(0.1, 0.05, 0.0),
        specular: Vec3::splat(0.3),
        shininess: 64.0,
        ..Material::new("orange", Vec3::new(0.9, 0.4, 0.1))
    });
    let teal = scene.add_material(Material {
        ambient: Vec3::new(0.0, 0.05, 0.05),
        ..Material::new("teal", Vec3::new(0.1, 0.6, 0.6))
    });

    // Floor at y = 0, facing up
    let floor = Mesh::quad(
        Vec3::new(-6.0, 0.0, -4.0),
        Vec3::new(0.0, 0.0, 14.0),
        Vec3::new(12.0, 0.0, 0.0),
    );
    // Back wall at z = 8, facing the camera
    let back = Mesh::quad(
        Vec3::new(-6.0, 0.0, 8.0),
        Vec3::new(0.0, 6.0, 0.0),
        Vec3::new(12.0, 0.0, 0.0),
    );

    scene.add_model(Model::new("floor", floor).with_material(floor_mirror))?;
    scene.add_model(Model::new("back", back).with_material(back_mirror))?;
    scene.add_model(
        Model::new("left", standing_triangle())
            .with_material(orange)
            .with_transform(Transform {
                translation: Vec3::new(-1.2, 0.0, 4.0),
                rotation: Quat::from_rotation_y(0.4),
                scale: Vec3::ONE,
            }),
    )?;
    scene.add_model(
        Model::new("right", standing_triangle())
            .with_material(teal)
            .with_transform(Transform {
                translation: Vec3::new(1.4, 0.0, 5.0),
                rotation: Quat::from_rotation_y(-0.5),
                scale: Vec3::new(1.2, 1.5, 1.0),
            }),
    )?;

    Ok(scene)
}

/// Upright triangle with its base on y = 0.
fn standing_triangle() -> Mesh {
    let mut mesh = Mesh::new(
        vec![
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
        ],
        vec![0, 1, 2],
        None,
    );
    mesh.compute_normals();
    mesh
}

pub fn lights() -> Vec<Light> {
    vec![
        Light::new(Vec3::new(-3.0, 5.0, 0.0), Vec3::new(0.8, 0.8, 0.7)),
        Light::new(Vec3::new(4.0, 3.0, 2.0), Vec3::new(0.3, 0.3, 0.4)),
    ]
}

pub fn camera() -> Camera {
    Camera::new(Vec3::new(0.0, 1.5, -3.0), Vec3::new(0.0, 1.0, 5.0))
}
