//! Shared constants for the measurement engine.

/// Picking, input timing and label defaults for measurement sessions.
pub mod measure;

/// Helper geometry sizes and colours.
pub mod render_settings;
