use bevy::input::mouse::{AccumulatedMouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::EulerRot;
use bevy::prelude::*;

/// Fly camera state: a position plus yaw/pitch, eased towards each frame.
#[derive(Resource)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub base_speed: f32,
}

impl ViewportCamera {
    pub fn new(focus_point: Vec3, pitch: f32, yaw: f32) -> Self {
        Self {
            focus_point,
            pitch,
            yaw,
            base_speed: 8.0,
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn look(&mut self, mouse_delta: Vec2) {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        self.yaw += -mouse_delta.x * yaw_sens;
        self.pitch = (self.pitch - mouse_delta.y * pitch_sens).clamp(-1.55, 1.55);
    }

    /// Moves along the view axes; `input` is (right, up, back) in -1..=1.
    pub fn translate(&mut self, input: Vec3, distance: f32) {
        if input == Vec3::ZERO {
            return;
        }
        let rotation = self.rotation();
        let forward = (rotation * Vec3::Z).normalize();
        let right = (rotation * Vec3::X).normalize();
        let world_delta = right * input.x + Vec3::Y * input.y + forward * input.z;
        self.focus_point += world_delta.normalize() * distance;
    }

    /// Pushes the camera along its view direction.
    pub fn dolly(&mut self, amount: f32) {
        let forward = (self.rotation() * Vec3::Z).normalize();
        self.focus_point -= forward * amount;
    }
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self::new(Vec3::new(-6.0, 7.0, 12.0), -0.5, -0.45)
    }
}

/// Right-drag to look, WASD to move, Q/E for down/up, scroll to dolly.
pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    if mouse_button.pressed(MouseButton::Right) && mouse_motion.delta != Vec2::ZERO {
        viewport_camera.look(mouse_motion.delta);
    }

    let scroll_accum: f32 = scroll_events
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        })
        .sum();
    if scroll_accum.abs() > f32::EPSILON {
        viewport_camera.dolly(scroll_accum);
    }

    let mut move_input = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        move_input.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        move_input.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        move_input.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        move_input.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyE) {
        move_input.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyQ) {
        move_input.y -= 1.0;
    }

    // Shift = faster, ctrl = slower.
    let mut speed = viewport_camera.base_speed;
    if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
        speed *= 3.5;
    }
    if keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]) {
        speed *= 0.25;
    }
    viewport_camera.translate(move_input, speed * time.delta_secs());

    let target_rot = viewport_camera.rotation();
    let target_pos = viewport_camera.focus_point;
    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target_pos, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target_rot, lerp_speed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_is_clamped_short_of_vertical() {
        let mut camera = ViewportCamera::default();
        camera.look(Vec2::new(0.0, -10_000.0));
        assert!((camera.pitch - 1.55).abs() < 1e-6);
    }

    #[test]
    fn forward_input_moves_along_view_direction() {
        let mut camera = ViewportCamera::new(Vec3::ZERO, 0.0, 0.0);
        camera.translate(Vec3::new(0.0, 0.0, -1.0), 2.0);
        assert!((camera.focus_point - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
    }
}
