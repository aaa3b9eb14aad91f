//! Horizontal camera that trails the projectile

use serde::{Deserialize, Serialize};

use super::config::PhysicsConfig;

/// Viewport offset in world pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
}

impl Camera {
    /// Offset the camera is easing toward; never left of the start
    #[inline]
    pub fn target_for(focus_x: f32, viewport_width: f32, config: &PhysicsConfig) -> f32 {
        (focus_x - viewport_width * config.camera_lead).max(0.0)
    }

    /// Close a fixed fraction of the gap to the target each frame
    pub fn update(&mut self, focus_x: f32, viewport_width: f32, config: &PhysicsConfig) {
        let target = Self::target_for(focus_x, viewport_width, config);
        self.x += (target - self.x) * config.camera_smoothing;
    }

    pub fn reset(&mut self) {
        self.x = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_never_targets_left_of_start() {
        let config = PhysicsConfig::default();
        assert_eq!(Camera::target_for(100.0, 1000.0, &config), 0.0);

        let mut cam = Camera::default();
        cam.update(100.0, 1000.0, &config);
        assert_eq!(cam.x, 0.0);
    }

    #[test]
    fn test_camera_eases_toward_target() {
        let config = PhysicsConfig::default();
        let mut cam = Camera::default();
        // target = 1300 - 300 = 1000
        cam.update(1300.0, 1000.0, &config);
        assert!((cam.x - 100.0).abs() < 1e-4);
        cam.update(1300.0, 1000.0, &config);
        assert!((cam.x - 190.0).abs() < 1e-3);

        for _ in 0..200 {
            cam.update(1300.0, 1000.0, &config);
        }
        assert!(cam.x <= 1000.0);
        assert!((cam.x - 1000.0).abs() < 0.01);
    }
}
