use super::host::{RayHit, RayProvider};
use bevy::math::{Vec2, Vec3};

/// Resolves pointer positions to points on visible scene geometry.
///
/// Created when a session opens and dropped when it closes; a session
/// without a picker accepts no picks.
#[derive(Debug, Clone)]
pub struct PickingSurface {
    max_distance: f32,
    helper_name: String,
}

impl PickingSurface {
    pub fn new(max_distance: f32, helper_name: impl Into<String>) -> Self {
        Self {
            max_distance,
            helper_name: helper_name.into(),
        }
    }

    /// Name carried by the tool's own helpers, which picks skip.
    pub fn helper_name(&self) -> &str {
        &self.helper_name
    }

    /// Maps a pointer position to normalized device coordinates.
    ///
    /// `client_size` must be the layout size of the canvas. Using the
    /// backing-store size would skew picks on high-DPI displays.
    pub fn to_ndc(screen: Vec2, client_size: Vec2) -> Option<Vec2> {
        if client_size.x <= 0.0 || client_size.y <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            screen.x / client_size.x * 2.0 - 1.0,
            -(screen.y / client_size.y) * 2.0 + 1.0,
        ))
    }

    /// Nearest surface point under `screen`, ignoring the tool's own helpers
    /// and anything at or beyond the maximum distance.
    pub fn pick(&self, screen: Vec2, client_size: Vec2, rays: &mut dyn RayProvider) -> Option<Vec3> {
        let ndc = Self::to_ndc(screen, client_size)?;
        self.nearest(rays.cast_ray(ndc))
    }

    fn nearest(&self, hits: Vec<RayHit>) -> Option<Vec3> {
        let hit = hits
            .into_iter()
            .find(|hit| hit.name.as_deref() != Some(self.helper_name.as_str()))?;
        (hit.distance < self.max_distance).then_some(hit.point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        hits: Vec<RayHit>,
        last_ndc: Option<Vec2>,
    }

    impl RayProvider for Scripted {
        fn cast_ray(&mut self, ndc: Vec2) -> Vec<RayHit> {
            self.last_ndc = Some(ndc);
            self.hits.clone()
        }
    }

    fn hit(name: Option<&str>, point: Vec3, distance: f32) -> RayHit {
        RayHit {
            name: name.map(str::to_string),
            point,
            distance,
        }
    }

    #[test]
    fn ndc_uses_client_size() {
        let size = Vec2::new(800.0, 600.0);
        assert_eq!(PickingSurface::to_ndc(Vec2::ZERO, size), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(PickingSurface::to_ndc(size, size), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(
            PickingSurface::to_ndc(Vec2::new(400.0, 300.0), size),
            Some(Vec2::ZERO)
        );
        assert_eq!(PickingSurface::to_ndc(Vec2::ZERO, Vec2::ZERO), None);
    }

    #[test]
    fn skips_helper_geometry() {
        let picker = PickingSurface::new(500.0, "helper");
        let mut rays = Scripted {
            hits: vec![
                hit(Some("helper"), Vec3::X, 1.0),
                hit(Some("ground"), Vec3::Y, 2.0),
            ],
            last_ndc: None,
        };
        let point = picker.pick(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0), &mut rays);
        assert_eq!(point, Some(Vec3::Y));
        assert_eq!(rays.last_ndc, Some(Vec2::ZERO));
    }

    #[test]
    fn rejects_distant_hits() {
        let picker = PickingSurface::new(500.0, "helper");
        let mut rays = Scripted {
            hits: vec![hit(None, Vec3::Z, 500.0)],
            last_ndc: None,
        };
        assert_eq!(picker.pick(Vec2::ONE, Vec2::splat(2.0), &mut rays), None);
    }

    #[test]
    fn empty_after_filtering_is_none() {
        let picker = PickingSurface::new(500.0, "helper");
        let mut rays = Scripted {
            hits: vec![hit(Some("helper"), Vec3::X, 1.0)],
            last_ndc: None,
        };
        assert_eq!(picker.pick(Vec2::ONE, Vec2::splat(2.0), &mut rays), None);
    }
}
