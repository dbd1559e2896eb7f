//! Interactive distance, area and angle measurement for a Bevy 3D viewport.
//!
//! Runs natively with keyboard shortcuts or as a WASM module embedded in an
//! iframe and driven over JSON-RPC 2.0.

/// Application shell: window, camera, demo scene and diagnostics.
pub mod engine;

/// JSON-RPC 2.0 bridge to the hosting web page.
pub mod rpc;

/// Measurement tools and the tool manager.
pub mod tools;
