//! Grid movement and quarter-turn rotation
//!
//! Fixtures move in fixed steps on the floor plane (X/Z) and rotate about +Y in
//! 90° increments. Stored rotations use the degree domain where `360` is the
//! identity rotation; `0` is never produced.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::fmt;

use glam::{Quat, Vec3};
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::IDENTITY_DEGREE;

/// Direction of a single grid move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Parse a direction name (`up`, `down`, `left`, `right`), case-insensitive
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Map a keyboard arrow key name to a direction
    pub fn from_arrow_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Translate a position one step in the given direction.
///
/// `Left`/`Right` move along X, `Up` moves toward -Z and `Down` toward +Z.
/// `None` (an unrecognized direction) returns the input unchanged.
pub fn move_position(position: Vec3, direction: Option<Direction>, step: f32) -> Vec3 {
    match direction {
        Some(Direction::Up) => Vec3::new(position.x, position.y, position.z - step),
        Some(Direction::Down) => Vec3::new(position.x, position.y, position.z + step),
        Some(Direction::Left) => Vec3::new(position.x - step, position.y, position.z),
        Some(Direction::Right) => Vec3::new(position.x + step, position.y, position.z),
        None => position,
    }
}

/// Add a quarter turn to a rotation in radians, normalized into `[0, 2π)`
pub fn rotate_step(radians: f32) -> f32 {
    let next = (radians + FRAC_PI_2).rem_euclid(TAU);
    // rem_euclid may round up to exactly TAU for inputs just below a full turn
    if next >= TAU { 0.0 } else { next }
}

/// Shortest angular distance between two angles in radians
pub fn angle_distance(a: f32, b: f32) -> f32 {
    let diff = (a - b).rem_euclid(TAU);
    diff.min(TAU - diff)
}

/// Map a point from a fixture frame (position + heading about +Y) to its parent frame
pub fn local_to_world(frame_position: Vec3, frame_degree: Degree, local: Vec3) -> Vec3 {
    frame_position + Quat::from_rotation_y(frame_degree.to_radians()) * local
}

/// Quarter-turn rotation in degrees: one of 90, 180, 270 or 360.
///
/// `360` is the identity rotation. Any input is rounded to the nearest
/// multiple of 90 and a result of 0 is reported as 360.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Degree(u16);

impl Degree {
    pub const IDENTITY: Degree = Degree(IDENTITY_DEGREE);
    pub const QUARTER: Degree = Degree(90);
    pub const HALF: Degree = Degree(180);
    pub const THREE_QUARTERS: Degree = Degree(270);

    /// Normalize an arbitrary degree value
    pub fn from_degrees(degrees: f64) -> Self {
        if !degrees.is_finite() {
            return Self::IDENTITY;
        }
        let quarters = (degrees / 90.0).round() as i64;
        match quarters.rem_euclid(4) {
            1 => Self::QUARTER,
            2 => Self::HALF,
            3 => Self::THREE_QUARTERS,
            _ => Self::IDENTITY,
        }
    }

    /// Convert a rotation in radians to the nearest quarter turn
    pub fn from_radians(radians: f32) -> Self {
        Self::from_degrees(f64::from(radians).to_degrees())
    }

    /// Rotation in radians, with the identity mapped to 0
    pub fn to_radians(self) -> f32 {
        if self.is_identity() {
            0.0
        } else {
            f32::from(self.0).to_radians()
        }
    }

    /// Raw degree value (90, 180, 270 or 360)
    pub fn value(self) -> u16 {
        self.0
    }

    /// Next quarter turn (90 → 180 → 270 → 360 → 90)
    pub fn step(self) -> Self {
        Self::from_degrees(f64::from(self.0) + 90.0)
    }

    pub fn is_identity(self) -> bool {
        self.0 == IDENTITY_DEGREE
    }
}

impl Default for Degree {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\u{00b0}", self.0)
    }
}

impl<'de> Deserialize<'de> for Degree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        Ok(Degree::from_degrees(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    #[test]
    fn test_move_position_axes() {
        let origin = Vec3::new(1.0, 0.0, 1.0);
        assert_eq!(
            move_position(origin, Some(Direction::Left), 0.5),
            Vec3::new(0.5, 0.0, 1.0)
        );
        assert_eq!(
            move_position(origin, Some(Direction::Right), 0.5),
            Vec3::new(1.5, 0.0, 1.0)
        );
        assert_eq!(
            move_position(origin, Some(Direction::Up), 0.5),
            Vec3::new(1.0, 0.0, 0.5)
        );
        assert_eq!(
            move_position(origin, Some(Direction::Down), 0.5),
            Vec3::new(1.0, 0.0, 1.5)
        );
    }

    #[test]
    fn test_unknown_direction_is_noop() {
        let origin = Vec3::new(3.0, 0.0, -2.0);
        assert_eq!(move_position(origin, Direction::parse("sideways"), 0.5), origin);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse(" Up "), Some(Direction::Up));
        assert_eq!(Direction::from_arrow_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_arrow_key("r"), None);
    }

    #[test]
    fn test_rotate_step_wraps() {
        assert_relative_eq!(rotate_step(0.0), FRAC_PI_2);
        assert_relative_eq!(rotate_step(PI), 1.5 * PI);
        assert!(rotate_step(1.5 * PI) < 1e-5);
    }

    #[test]
    fn test_degree_identity_sentinel() {
        assert_eq!(Degree::from_radians(0.0).value(), 360);
        assert_eq!(Degree::from_degrees(0.0), Degree::IDENTITY);
        assert_eq!(Degree::from_degrees(-90.0), Degree::THREE_QUARTERS);
        assert_eq!(Degree::from_degrees(359.0), Degree::IDENTITY);
        assert_eq!(Degree::from_degrees(134.0), Degree::QUARTER);
        assert_eq!(Degree::IDENTITY.to_radians(), 0.0);
    }

    #[test]
    fn test_degree_step_cycle() {
        let mut degree = Degree::IDENTITY;
        let mut seen = Vec::new();
        for _ in 0..4 {
            degree = degree.step();
            seen.push(degree.value());
        }
        assert_eq!(seen, vec![90, 180, 270, 360]);
    }

    #[test]
    fn test_degree_deserialize_normalizes() {
        let degree: Degree = serde_json::from_str("0").unwrap();
        assert_eq!(degree, Degree::IDENTITY);
        let degree: Degree = serde_json::from_str("180.0").unwrap();
        assert_eq!(degree, Degree::HALF);
    }

    #[test]
    fn test_local_to_world_quarter_turn() {
        let world = local_to_world(Vec3::new(10.0, 0.0, 20.0), Degree::QUARTER, Vec3::X * 3.0);
        assert_relative_eq!(world.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(world.z, 17.0, epsilon = 1e-5);
    }
}
