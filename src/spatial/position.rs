//! 3D positions with bounded movement
//!
//! The playfield is a square of `grid_size` feet on x/y with an open sky.
//! Every mutation re-clamps, so a position can never leave the field.

use glam::DVec3;
use ordered_float::OrderedFloat;

/// A point on the playfield (feet)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    coords: DVec3,
    grid_size: f64,
}

impl Position {
    /// Create a position, clamping x/y to the grid and z to the ground
    pub fn new(x: f64, y: f64, z: f64, grid_size: f64) -> Self {
        let mut position = Self {
            coords: DVec3::new(x, y, z),
            grid_size,
        };
        position.clamp();
        position
    }

    pub fn x(&self) -> f64 {
        self.coords.x
    }

    pub fn y(&self) -> f64 {
        self.coords.y
    }

    pub fn z(&self) -> f64 {
        self.coords.z
    }

    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    pub fn coords(&self) -> DVec3 {
        self.coords
    }

    /// Set altitude (clamped at the ground)
    pub fn set_z(&mut self, z: f64) {
        self.coords.z = z.max(0.0);
    }

    pub fn is_airborne(&self) -> bool {
        self.coords.z > 0.0
    }

    /// Euclidean distance in 3D
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.coords.distance(other.coords)
    }

    /// Move straight toward `target` by up to `speed` feet
    ///
    /// Zero distance or zero speed is a no-op. Returns the distance covered.
    pub fn move_towards(&mut self, target: &Position, speed: f64) -> f64 {
        let distance = self.distance_to(target);
        self.step(target.coords - self.coords, distance, speed.min(distance))
    }

    /// Close in on `target` until within `reach`, spending at most `speed`
    ///
    /// Stops at exactly `reach` rather than on top of the target.
    pub fn advance_within(&mut self, target: &Position, speed: f64, reach: f64) -> f64 {
        let distance = self.distance_to(target);
        if distance <= reach {
            return 0.0;
        }
        self.step(target.coords - self.coords, distance, speed.min(distance - reach))
    }

    /// Back away from `target` until `standoff` feet separate them
    ///
    /// Already far enough, or standing on the target (no direction), is a no-op.
    pub fn retreat_to(&mut self, target: &Position, speed: f64, standoff: f64) -> f64 {
        let distance = self.distance_to(target);
        if distance >= standoff {
            return 0.0;
        }
        self.step(self.coords - target.coords, distance, speed.min(standoff - distance))
    }

    /// Travel `travel` feet along `offset` (whose length is `length`)
    fn step(&mut self, offset: DVec3, length: f64, travel: f64) -> f64 {
        if length <= 0.0 || travel <= 0.0 {
            return 0.0;
        }
        let before = self.coords;
        self.coords += offset * (travel / length);
        self.clamp();
        before.distance(self.coords)
    }

    fn clamp(&mut self) {
        self.coords.x = self.coords.x.clamp(0.0, self.grid_size);
        self.coords.y = self.coords.y.clamp(0.0, self.grid_size);
        self.coords.z = self.coords.z.max(0.0);
    }
}

/// Index of the candidate closest to `from`
///
/// Ties go to the earliest candidate so results follow roster order.
pub fn nearest<'a, I>(from: &Position, candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = (usize, &'a Position)>,
{
    candidates
        .into_iter()
        .min_by_key(|(_, p)| OrderedFloat(from.distance_to(p)))
        .map(|(idx, _)| idx)
}
