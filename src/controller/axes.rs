//! Named axis pairs with pair-wise dead-zone filtering and digital
//! directional press derivation.

use crate::catalog::AxisPairSchema;
use crate::events::PadDirection;

/// Pair-wise dead-zone filter.
///
/// Either both axes of a pair pass through raw, or the pair is suppressed to
/// (0, 0) together. Filtering one axis while leaving the other raw would skew
/// the delivered direction, so a pair with any component inside the dead zone
/// is treated as resting.
pub fn deadzone_pair(x: f32, y: f32, threshold: f32) -> (f32, f32) {
    if x.abs() > threshold && y.abs() > threshold {
        (x, y)
    } else {
        (0.0, 0.0)
    }
}

/// One tracked axis pair: two raw axis slots under a stable name.
#[derive(Debug, Clone)]
pub struct TrackedAxisPair {
    name: String,
    indexes: (usize, usize),
    /// Last delivered (filtered) values
    pub(crate) x: f32,
    pub(crate) y: f32,
    thumbstick: bool,
    invert_y: bool,
    pressed: [bool; 4],
}

impl TrackedAxisPair {
    pub(crate) fn from_schema(schema: &AxisPairSchema, invert_y: bool) -> Self {
        Self {
            name: schema.name.to_string(),
            indexes: schema.indexes,
            x: 0.0,
            y: 0.0,
            thumbstick: schema.thumbstick,
            invert_y,
            pressed: [false; 4],
        }
    }

    /// Generic pair for devices without a catalog schema. Ordinals are
    /// 1-based: `axes_1` reads slots (0, 1), `axes_2` reads (2, 3).
    pub(crate) fn generic(ordinal: usize, indexes: (usize, usize)) -> Self {
        Self {
            name: format!("axes_{}", ordinal),
            indexes,
            x: 0.0,
            y: 0.0,
            thumbstick: false,
            invert_y: false,
            pressed: [false; 4],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_thumbstick(&self) -> bool {
        self.thumbstick
    }

    /// Last delivered values.
    pub fn values(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn direction_pressed(&self, direction: PadDirection) -> bool {
        self.pressed[direction.index()]
    }

    /// Raw unfiltered values at this pair's source indexes. Missing slots
    /// read as 0.
    pub(crate) fn read_raw(&self, axes: &[f32]) -> (f32, f32) {
        let x = axes.get(self.indexes.0).copied().unwrap_or(0.0);
        let y = axes.get(self.indexes.1).copied().unwrap_or(0.0);
        (x, y)
    }

    /// Values as delivered: dead-zone filtered for thumbsticks, then the
    /// hardware Y-convention correction where the schema demands one.
    pub(crate) fn filtered(&self, axes: &[f32], deadzone: f32) -> (f32, f32) {
        let (x, mut y) = if self.thumbstick {
            let (rx, ry) = self.read_raw(axes);
            deadzone_pair(rx, ry, deadzone)
        } else {
            self.read_raw(axes)
        };
        if self.invert_y {
            y = -y;
        }
        (x, y)
    }

    fn directions_from(raw_x: f32, raw_y: f32, threshold: f32) -> [bool; 4] {
        let mut pressed = [false; 4];
        pressed[PadDirection::Up.index()] = raw_y < -threshold;
        pressed[PadDirection::Down.index()] = raw_y > threshold;
        pressed[PadDirection::Left.index()] = raw_x < -threshold;
        pressed[PadDirection::Right.index()] = raw_x > threshold;
        pressed
    }

    /// Re-derives the digital directional states from raw values and returns
    /// each transition as (direction, began).
    pub(crate) fn update_directions(
        &mut self,
        raw_x: f32,
        raw_y: f32,
        threshold: f32,
    ) -> Vec<(PadDirection, bool)> {
        let next = Self::directions_from(raw_x, raw_y, threshold);
        let mut transitions = Vec::new();
        for direction in PadDirection::ALL {
            let i = direction.index();
            if next[i] != self.pressed[i] {
                transitions.push((direction, next[i]));
            }
        }
        self.pressed = next;
        transitions
    }

    /// Primes last-seen state from a construction-time snapshot so the first
    /// poll over the same data emits nothing.
    pub(crate) fn prime(&mut self, axes: &[f32], deadzone: f32, threshold: f32) {
        let (x, y) = self.filtered(axes, deadzone);
        self.x = x;
        self.y = y;
        let (rx, ry) = self.read_raw(axes);
        self.pressed = Self::directions_from(rx, ry, threshold);
    }
}
