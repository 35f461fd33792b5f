//! Per-frame input snapshot produced by the host between ticks.

use bevy::math::Vec2;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Resource, Serialize, Deserialize)]
pub struct InputIntent {
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub attack_held: bool,
    pub dodge_pressed: bool,
    /// One-shot; cleared by the tick once a pickup was attempted
    pub pickup_pressed: bool,
    /// Pointer in screen-space pixels
    pub pointer: Vec2,
}

impl InputIntent {
    /// Unit movement vector from the direction flags, zero when idle
    pub fn movement(&self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.move_up {
            v.y -= 1.0;
        }
        if self.move_down {
            v.y += 1.0;
        }
        if self.move_left {
            v.x -= 1.0;
        }
        if self.move_right {
            v.x += 1.0;
        }
        v.normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_is_normalized() {
        let input = InputIntent {
            move_up: true,
            move_right: true,
            ..Default::default()
        };
        let v = input.movement();
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert!(v.x > 0.0 && v.y < 0.0);
    }

    #[test]
    fn test_opposing_flags_cancel() {
        let input = InputIntent {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        assert_eq!(input.movement(), Vec2::ZERO);
    }
}
