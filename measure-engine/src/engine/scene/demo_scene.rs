use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::render_settings::HELPER_RENDER_LAYER;

use crate::engine::camera::viewport_camera::ViewportCamera;

/// Box obstacles placed on the ground slab: (centre, size, colour).
const DEMO_BLOCKS: [(Vec3, Vec3, Color); 4] = [
    (
        Vec3::new(-3.0, 1.0, -2.0),
        Vec3::new(2.0, 2.0, 2.0),
        Color::srgb(0.75, 0.45, 0.3),
    ),
    (
        Vec3::new(3.5, 1.5, -4.0),
        Vec3::new(3.0, 3.0, 1.5),
        Color::srgb(0.35, 0.55, 0.75),
    ),
    (
        Vec3::new(1.0, 0.5, 3.0),
        Vec3::new(4.0, 1.0, 1.0),
        Color::srgb(0.6, 0.65, 0.4),
    ),
    (
        Vec3::new(-5.0, 2.5, 4.0),
        Vec3::new(1.0, 5.0, 1.0),
        Color::srgb(0.7, 0.7, 0.72),
    ),
];

/// Spawns the ground, the blocks, lighting and a camera that also renders the measure helpers.
pub fn spawn_demo_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    viewport_camera: Res<ViewportCamera>,
) {
    commands.spawn((
        Name::new("ground"),
        Mesh3d(meshes.add(Cuboid::new(40.0, 0.2, 40.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.32, 0.34, 0.3),
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.1, 0.0),
    ));

    for (index, (centre, size, colour)) in DEMO_BLOCKS.into_iter().enumerate() {
        commands.spawn((
            Name::new(format!("block_{index}")),
            Mesh3d(meshes.add(Cuboid::from_size(size))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: colour,
                ..default()
            })),
            Transform::from_translation(centre),
        ));
    }

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(viewport_camera.focus_point)
            .with_rotation(viewport_camera.rotation()),
        RenderLayers::default().with(HELPER_RENDER_LAYER),
    ));

    info!("Demo scene spawned with {} blocks", DEMO_BLOCKS.len());
}
