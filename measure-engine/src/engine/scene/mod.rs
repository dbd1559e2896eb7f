//! Scene content for the standalone viewer.

/// Ground slab, block obstacles, lighting and the main camera.
pub mod demo_scene;
