use bevy::prelude::*;
use constants::measure::{
    ARC_RADIUS_FACTOR, ARC_SEGMENTS, CLICK_DEBOUNCE_MS, DOUBLE_CLICK_MS, DOUBLE_CLICK_SLOP_PX,
    HELPER_OBJECT_NAME, LABEL_OFFSET_PX, MAX_PICK_DISTANCE,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Tunables for measurement sessions.
///
/// Loaded from `measure_settings.json` when present; every field falls back
/// to the defaults in `constants::measure`.
#[derive(Asset, TypePath, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureSettings {
    pub max_pick_distance: f32,
    pub helper_name: String,
    pub click_debounce_ms: u64,
    pub double_click_ms: u64,
    pub double_click_slop_px: f32,
    /// Upper bound on committed points per session. `None` means unbounded.
    pub max_points: Option<usize>,
    pub arc_radius_factor: f32,
    pub arc_segments: usize,
    pub label_offset_px: f32,
}

impl Default for MeasureSettings {
    fn default() -> Self {
        Self {
            max_pick_distance: MAX_PICK_DISTANCE,
            helper_name: HELPER_OBJECT_NAME.to_string(),
            click_debounce_ms: CLICK_DEBOUNCE_MS,
            double_click_ms: DOUBLE_CLICK_MS,
            double_click_slop_px: DOUBLE_CLICK_SLOP_PX,
            max_points: None,
            arc_radius_factor: ARC_RADIUS_FACTOR,
            arc_segments: ARC_SEGMENTS,
            label_offset_px: LABEL_OFFSET_PX,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("max_pick_distance must be positive, got {0}")]
    NonPositiveDistance(f32),
    #[error("helper_name must not be empty")]
    EmptyHelperName,
    #[error("max_points must be at least 1 when set")]
    ZeroPointCap,
    #[error("arc_radius_factor must be positive, got {0}")]
    NonPositiveArcFactor(f32),
    #[error("arc_segments must be at least 1")]
    NoArcSegments,
}

impl MeasureSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.max_pick_distance > 0.0) {
            return Err(SettingsError::NonPositiveDistance(self.max_pick_distance));
        }
        if self.helper_name.is_empty() {
            return Err(SettingsError::EmptyHelperName);
        }
        if self.max_points == Some(0) {
            return Err(SettingsError::ZeroPointCap);
        }
        if !(self.arc_radius_factor > 0.0) {
            return Err(SettingsError::NonPositiveArcFactor(self.arc_radius_factor));
        }
        if self.arc_segments == 0 {
            return Err(SettingsError::NoArcSegments);
        }
        Ok(())
    }

    pub fn click_debounce(&self) -> Duration {
        Duration::from_millis(self.click_debounce_ms)
    }

    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = MeasureSettings::default();
        assert_eq!(settings.validate(), Ok(()));
        assert_eq!(settings.max_pick_distance, 500.0);
        assert_eq!(settings.click_debounce(), Duration::from_millis(500));
        assert_eq!(settings.max_points, None);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let settings: MeasureSettings =
            serde_json::from_str(r#"{ "max_pick_distance": 120.0, "max_points": 64 }"#)
                .expect("valid settings json");
        assert_eq!(settings.max_pick_distance, 120.0);
        assert_eq!(settings.max_points, Some(64));
        assert_eq!(settings.helper_name, HELPER_OBJECT_NAME);
        assert_eq!(settings.arc_segments, ARC_SEGMENTS);
    }

    #[test]
    fn rejects_bad_values() {
        let mut settings = MeasureSettings::default();
        settings.max_pick_distance = 0.0;
        assert_eq!(
            settings.validate(),
            Err(SettingsError::NonPositiveDistance(0.0))
        );

        let mut settings = MeasureSettings::default();
        settings.max_points = Some(0);
        assert_eq!(settings.validate(), Err(SettingsError::ZeroPointCap));

        let mut settings = MeasureSettings::default();
        settings.helper_name.clear();
        assert_eq!(settings.validate(), Err(SettingsError::EmptyHelperName));
    }
}
