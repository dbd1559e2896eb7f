/// Hits further than this from the camera are treated as background (skybox, far terrain).
pub const MAX_PICK_DISTANCE: f32 = 500.0;

/// Name tag carried by every helper entity the measure tool spawns.
/// Ray casts skip anything with this name so the tool never picks its own preview.
pub const HELPER_OBJECT_NAME: &str = "object_for_measure";

/// A commit click within this window of the previous commit is a double-click echo.
pub const CLICK_DEBOUNCE_MS: u64 = 500;

/// Two releases within this window (and slop) are reported as a double-click.
pub const DOUBLE_CLICK_MS: u64 = 500;
pub const DOUBLE_CLICK_SLOP_PX: f32 = 4.0;

/// Distance from the angle vertex to the arc, as a fraction of the shorter arm.
pub const ARC_RADIUS_FACTOR: f32 = 0.2;
/// Quadratic arc is sampled into `ARC_SEGMENTS + 1` points.
pub const ARC_SEGMENTS: usize = 4;

/// Label box is lifted this many logical pixels above its anchor.
pub const LABEL_OFFSET_PX: f32 = 40.0;
pub const LABEL_FONT_SIZE: f32 = 15.0;

pub const UNIT_DISTANCE: &str = "m";
pub const UNIT_AREA: &str = "m²";
pub const UNIT_ANGLE: &str = "°";
