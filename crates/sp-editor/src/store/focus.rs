//! Camera focus animation toward a search hit

use std::time::Duration;

use glam::Vec3;

pub const DEFAULT_FOCUS_DURATION: Duration = Duration::from_millis(800);

/// Initial orbit target of the scene camera
pub const DEFAULT_CAMERA_TARGET: Vec3 = Vec3::new(5.0, 0.0, 5.0);

/// Linear move of the camera target from `from` to `to`.
///
/// Elapsed time is accumulated as a `Duration`. A new focus replaces the
/// running one, starting from wherever the target currently is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusAnimation {
    from: Vec3,
    to: Vec3,
    elapsed: Duration,
    duration: Duration,
}

impl FocusAnimation {
    pub fn new(from: Vec3, to: Vec3, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
        }
    }

    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Progress in [0.0, 1.0]
    pub fn progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    /// Current camera target
    pub fn target(&self) -> Vec3 {
        self.from.lerp(self.to, self.progress())
    }

    pub fn destination(&self) -> Vec3 {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_focus_progress() {
        let mut focus = FocusAnimation::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 4.0), Duration::from_secs(1));
        assert_eq!(focus.target(), Vec3::ZERO);

        focus.tick(Duration::from_millis(500));
        assert_relative_eq!(focus.target().x, 5.0, epsilon = 1e-4);
        assert_relative_eq!(focus.target().z, 2.0, epsilon = 1e-4);
        assert!(!focus.is_complete());

        focus.tick(Duration::from_secs(2));
        assert!(focus.is_complete());
        assert!(focus.target().distance(focus.destination()) < 1e-5);
    }

    #[test]
    fn test_zero_duration_completes_on_first_tick() {
        let mut focus = FocusAnimation::new(Vec3::ZERO, Vec3::ONE, Duration::ZERO);
        focus.tick(Duration::from_millis(1));
        assert!(focus.is_complete());
    }
}
