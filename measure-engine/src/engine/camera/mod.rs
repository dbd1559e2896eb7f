/// Fly camera driven by mouse and keyboard.
pub mod viewport_camera;
