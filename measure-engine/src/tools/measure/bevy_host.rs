//! Bevy-backed implementations of the host contracts.

use super::host::{CursorStyle, HostSurface, MeasureHost, RayHit, RayProvider};
use super::scene::{MeasureLabels, MeasureScene};
use bevy::ecs::system::SystemParam;
use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, SystemCursorIcon};
use bevy::winit::cursor::CursorIcon;

/// Mesh ray casting through the viewport camera.
#[derive(SystemParam)]
pub struct MeasureRayCast<'w, 's> {
    ray_cast: MeshRayCast<'w, 's>,
    cameras: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<Camera3d>>,
    windows: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    names: Query<'w, 's, &'static Name>,
}

impl RayProvider for MeasureRayCast<'_, '_> {
    fn cast_ray(&mut self, ndc: Vec2) -> Vec<RayHit> {
        let Ok(window) = self.windows.single() else {
            return Vec::new();
        };
        let Ok((camera, camera_transform)) = self.cameras.single() else {
            return Vec::new();
        };

        // Back from NDC to logical viewport coordinates (origin top-left).
        let viewport_position = Vec2::new(
            (ndc.x + 1.0) * 0.5 * window.width(),
            (1.0 - ndc.y) * 0.5 * window.height(),
        );
        let Ok(ray) = camera.viewport_to_world(camera_transform, viewport_position) else {
            return Vec::new();
        };

        // Helpers must stay in the hit list so the picker can skip them itself.
        let settings = MeshRayCastSettings::default().never_early_exit();
        let names = &self.names;
        self.ray_cast
            .cast_ray(ray, &settings)
            .iter()
            .map(|(entity, hit)| RayHit {
                name: names.get(*entity).ok().map(|name| name.as_str().to_string()),
                point: hit.point,
                distance: hit.distance,
            })
            .collect()
    }
}

/// Primary window as seen by the session: logical size and requested cursor.
pub struct WindowSurface {
    size: Vec2,
    requested: Option<CursorStyle>,
}

impl HostSurface for WindowSurface {
    fn client_size(&self) -> Vec2 {
        self.size
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        self.requested = Some(cursor);
    }
}

fn cursor_icon(style: CursorStyle) -> CursorIcon {
    match style {
        CursorStyle::Default => CursorIcon::from(SystemCursorIcon::Default),
        CursorStyle::Crosshair => CursorIcon::from(SystemCursorIcon::Crosshair),
    }
}

/// Everything needed to build a [`MeasureHost`] inside a system.
#[derive(SystemParam)]
pub struct MeasureHostParam<'w, 's> {
    scene: ResMut<'w, MeasureScene>,
    labels: ResMut<'w, MeasureLabels>,
    rays: MeasureRayCast<'w, 's>,
    windows: Query<'w, 's, (Entity, &'static Window), With<PrimaryWindow>>,
    commands: Commands<'w, 's>,
}

impl MeasureHostParam<'_, '_> {
    /// Runs `f` against a host borrowed from the ECS, then applies any cursor change.
    pub fn with_host<R>(&mut self, f: impl FnOnce(&mut MeasureHost<'_>) -> R) -> R {
        let (window_entity, size) = match self.windows.single() {
            Ok((entity, window)) => (Some(entity), Vec2::new(window.width(), window.height())),
            Err(_) => (None, Vec2::ZERO),
        };
        let mut surface = WindowSurface {
            size,
            requested: None,
        };

        let result = {
            let mut host = MeasureHost {
                scene: &mut *self.scene,
                rays: &mut self.rays,
                labels: &mut *self.labels,
                surface: &mut surface,
            };
            f(&mut host)
        };

        if let (Some(style), Some(entity)) = (surface.requested, window_entity) {
            self.commands.entity(entity).insert(cursor_icon(style));
        }
        result
    }
}
