use bevy::color::{Color, LinearRgba};

pub const DRAW_LINE_WIDTH: f32 = 0.03;
pub const DRAW_VERTEX_SIZE: f32 = 0.06;
pub const MOUSE_RAYCAST_INTERSECTION_SPHERE_SIZE: f32 = 0.1;

/// Segments shorter than this are not drawn.
pub const MIN_SEGMENT_LENGTH: f32 = 0.002;

pub const LINE_COLOUR: Color = Color::srgba(1.0, 0.0, 0.0, 0.8);
pub const LINE_EMISSIVE: LinearRgba = LinearRgba::new(1.0, 0.0, 0.0, 1.0);
pub const POINT_COLOUR: Color = Color::srgb(0.0, 1.0, 0.0);
pub const POINT_EMISSIVE: LinearRgba = LinearRgba::new(0.0, 1.0, 0.0, 1.0);
pub const MOUSE_COLOUR: Color = Color::srgb(1.0, 0.0, 0.0);
pub const MOUSE_EMISSIVE: LinearRgba = LinearRgba::new(1.0, 1.0, 1.0, 1.0);
/// Light sky blue, translucent.
pub const FILL_COLOUR: Color = Color::srgba(0.53, 0.81, 0.98, 0.8);

pub const LABEL_TEXT_COLOUR: Color = Color::srgb(1.0, 0.0, 0.0);
pub const LABEL_BACKGROUND: Color = Color::srgba(1.0, 1.0, 1.0, 0.5);
pub const LABEL_PADDING_PX: f32 = 5.0;

/// Helper geometry lives on this render layer; the viewport camera renders 0 and 1.
pub const HELPER_RENDER_LAYER: usize = 1;
