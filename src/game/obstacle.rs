//! Static obstacles spawned by abilities.

use crate::game::Vec2;

/// Unique identifier for an obstacle.
pub type ObstacleId = u32;

/// A circular blocker agents are pushed out of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Unique identifier.
    pub id: ObstacleId,
    /// Center.
    pub position: Vec2,
    /// Blocking radius.
    pub radius: f32,
}

impl Obstacle {
    /// If `point` lies inside, the nearest point on the rim; otherwise `None`.
    ///
    /// A point exactly at the center is pushed along +x.
    #[must_use]
    pub fn push_out(&self, point: Vec2) -> Option<Vec2> {
        let offset = point - self.position;
        let dist = offset.length();
        if dist >= self.radius {
            return None;
        }
        let dir = if dist <= f32::EPSILON {
            Vec2::new(1.0, 0.0)
        } else {
            offset * (1.0 / dist)
        };
        Some(self.position + dir * self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_out() {
        let obstacle = Obstacle {
            id: 1,
            position: Vec2::new(10.0, 10.0),
            radius: 5.0,
        };
        assert_eq!(obstacle.push_out(Vec2::new(20.0, 10.0)), None);
        let pushed = obstacle.push_out(Vec2::new(12.0, 10.0)).unwrap();
        assert!((pushed.x - 15.0).abs() < 1e-5);
        let center = obstacle.push_out(obstacle.position).unwrap();
        assert!((center.distance(obstacle.position) - 5.0).abs() < 1e-5);
    }
}
