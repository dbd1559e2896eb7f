//! Core application setup.
//!
//! Handles window configuration and plugin initialisation for both native and
//! WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the measurement tool, RPC layer, camera and demo scene.
pub mod app_setup;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
