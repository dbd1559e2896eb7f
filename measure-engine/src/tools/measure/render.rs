//! Turns the in-memory measure scene and labels into entities.

use super::host::{Geometry, LabelId, Visual, VisualKind};
use super::plugin::MeasureTool;
use super::scene::{LabelState, MeasureLabels, MeasureScene};
use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::view::RenderLayers;
use constants::measure::LABEL_FONT_SIZE;
use constants::render_settings::{
    DRAW_LINE_WIDTH, DRAW_VERTEX_SIZE, FILL_COLOUR, HELPER_RENDER_LAYER, LABEL_BACKGROUND,
    LABEL_PADDING_PX, LABEL_TEXT_COLOUR, LINE_COLOUR, LINE_EMISSIVE, MIN_SEGMENT_LENGTH,
    MOUSE_COLOUR, MOUSE_EMISSIVE, MOUSE_RAYCAST_INTERSECTION_SPHERE_SIZE, POINT_COLOUR,
    POINT_EMISSIVE,
};
use std::collections::HashSet;

/// Tag for every entity spawned from [`MeasureScene`].
#[derive(Component, Clone)]
pub struct MeasureVisual;

/// UI node showing the label with this id.
#[derive(Component)]
pub struct MeasureLabelNode(pub LabelId);

/// Shared meshes and materials for helper geometry.
#[derive(Resource)]
pub struct MeasureMaterials {
    vertex_mesh: Handle<Mesh>,
    mouse_mesh: Handle<Mesh>,
    point: Handle<StandardMaterial>,
    mouse: Handle<StandardMaterial>,
    line: Handle<StandardMaterial>,
    fill: Handle<StandardMaterial>,
}

impl FromWorld for MeasureMaterials {
    fn from_world(world: &mut World) -> Self {
        let (vertex_mesh, mouse_mesh) = {
            let mut meshes = world.resource_mut::<Assets<Mesh>>();
            (
                meshes.add(Sphere::new(DRAW_VERTEX_SIZE)),
                meshes.add(Sphere::new(MOUSE_RAYCAST_INTERSECTION_SPHERE_SIZE)),
            )
        };

        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        let overlay = |base_color: Color, emissive: LinearRgba| StandardMaterial {
            base_color,
            emissive,
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            ..default()
        };
        Self {
            vertex_mesh,
            mouse_mesh,
            point: materials.add(overlay(POINT_COLOUR, POINT_EMISSIVE)),
            mouse: materials.add(overlay(MOUSE_COLOUR, MOUSE_EMISSIVE)),
            line: materials.add(overlay(LINE_COLOUR, LINE_EMISSIVE)),
            fill: materials.add(StandardMaterial {
                base_color: FILL_COLOUR,
                unlit: true,
                cull_mode: None,
                double_sided: true,
                alpha_mode: AlphaMode::Blend,
                ..default()
            }),
        }
    }
}

/// Rebuilds helper entities whenever the measure scene changes.
pub fn sync_measure_visuals(
    mut commands: Commands,
    scene: Res<MeasureScene>,
    tool: Res<MeasureTool>,
    materials: Res<MeasureMaterials>,
    mut meshes: ResMut<Assets<Mesh>>,
    existing: Query<Entity, With<MeasureVisual>>,
) {
    if !scene.is_changed() {
        return;
    }

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    let name = Name::new(tool.session.helper_name().to_string());
    for (_, visual) in scene.iter().filter(|(_, visual)| visual.visible) {
        spawn_visual(&mut commands, visual, &name, &materials, &mut meshes);
    }
}

fn spawn_visual(
    commands: &mut Commands,
    visual: &Visual,
    name: &Name,
    materials: &MeasureMaterials,
    meshes: &mut Assets<Mesh>,
) {
    let helper = (
        MeasureVisual,
        name.clone(),
        RenderLayers::layer(HELPER_RENDER_LAYER),
    );

    match (&visual.geometry, visual.kind) {
        (Geometry::Points(points), VisualKind::MouseMarker) => {
            for point in points {
                commands.spawn((
                    Mesh3d(materials.mouse_mesh.clone()),
                    MeshMaterial3d(materials.mouse.clone()),
                    Transform::from_translation(*point),
                    helper.clone(),
                ));
            }
        }
        (Geometry::Points(points), _) => {
            for point in points {
                commands.spawn((
                    Mesh3d(materials.vertex_mesh.clone()),
                    MeshMaterial3d(materials.point.clone()),
                    Transform::from_translation(*point),
                    helper.clone(),
                ));
            }
        }
        (Geometry::LineStrip(vertices), _) => {
            for segment in vertices.windows(2) {
                let (start, end) = (segment[0], segment[1]);
                let direction = end - start;
                let length = direction.length();
                if length < MIN_SEGMENT_LENGTH {
                    continue;
                }
                // Oriented cuboid along the segment; WebGPU has no wide lines.
                let rotation = Quat::from_rotation_arc(Vec3::X, direction / length);
                commands.spawn((
                    Mesh3d(meshes.add(Cuboid::new(length, DRAW_LINE_WIDTH, DRAW_LINE_WIDTH))),
                    MeshMaterial3d(materials.line.clone()),
                    Transform::from_translation((start + end) * 0.5).with_rotation(rotation),
                    helper.clone(),
                ));
            }
        }
        (Geometry::Triangles { positions, indices }, _) => {
            if indices.is_empty() {
                return;
            }
            commands.spawn((
                Mesh3d(meshes.add(fill_mesh(positions, indices))),
                MeshMaterial3d(materials.fill.clone()),
                Transform::IDENTITY,
                helper,
            ));
        }
    }
}

/// Triangle-list mesh for an area fill, with one face normal shared by all vertices.
fn fill_mesh(positions: &[Vec3], indices: &[u32]) -> Mesh {
    let normal = match positions {
        [a, b, c, ..] => (*b - *a).cross(*c - *a).normalize_or(Vec3::Y),
        _ => Vec3::Y,
    };

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );
    mesh.insert_attribute(
        Mesh::ATTRIBUTE_POSITION,
        positions.iter().map(|p| p.to_array()).collect::<Vec<_>>(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, vec![normal.to_array(); positions.len()]);
    mesh.insert_indices(Indices::U32(indices.to_vec()));
    mesh
}

/// Keeps one UI text node per label, projected onto the screen every frame.
pub fn update_measure_labels(
    mut commands: Commands,
    labels: Res<MeasureLabels>,
    tool: Res<MeasureTool>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut nodes: Query<(Entity, &MeasureLabelNode, &mut Node, &mut Text, &mut Visibility)>,
) {
    let camera = cameras.single().ok();
    let offset = tool.session.settings().label_offset_px;
    let mut shown = HashSet::new();

    for (entity, label_node, mut node, mut text, mut visibility) in nodes.iter_mut() {
        let Some(label) = labels.get(label_node.0) else {
            commands.entity(entity).despawn();
            continue;
        };
        shown.insert(label_node.0);

        if text.0 != label.text {
            text.0.clone_from(&label.text);
        }
        match camera.and_then(|(camera, transform)| project(camera, transform, label)) {
            Some(screen) => {
                node.left = Val::Px(screen.x);
                node.top = Val::Px(screen.y - offset);
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }

    for (id, label) in labels.iter().filter(|(id, _)| !shown.contains(*id)) {
        commands.spawn((
            Text::new(label.text.clone()),
            TextFont {
                font_size: LABEL_FONT_SIZE,
                ..default()
            },
            TextColor(LABEL_TEXT_COLOUR),
            BackgroundColor(LABEL_BACKGROUND),
            Node {
                position_type: PositionType::Absolute,
                padding: UiRect::all(Val::Px(LABEL_PADDING_PX)),
                ..default()
            },
            Visibility::Hidden,
            MeasureLabelNode(*id),
        ));
    }
}

/// Screen position of a visible label, `None` when hidden or behind the camera.
fn project(camera: &Camera, transform: &GlobalTransform, label: &LabelState) -> Option<Vec2> {
    if !label.visible {
        return None;
    }
    camera.world_to_viewport(transform, label.anchor).ok()
}
