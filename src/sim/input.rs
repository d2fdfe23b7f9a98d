//! Input normalization
//!
//! Turns raw device state into the unit-or-zero intent vectors a tick
//! consumes. Analog sticks win over keys and pointer when deflected.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Four independent directional flags (WASD or arrows)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionKeys {
    /// Summed key directions (screen coordinates, +y is down)
    fn sum(&self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.up {
            v.y -= 1.0;
        }
        if self.down {
            v.y += 1.0;
        }
        if self.left {
            v.x -= 1.0;
        }
        if self.right {
            v.x += 1.0;
        }
        v
    }
}

/// Device state as the host captured it this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub keys: DirectionKeys,
    /// Touch move stick deflection (zero when released)
    pub move_stick: Vec2,
    /// Touch aim stick deflection (zero when released)
    pub aim_stick: Vec2,
    /// Pointer position in world coordinates
    pub pointer: Vec2,
    /// Pointer button held
    pub engage: bool,
}

/// Where the player is aiming
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Aim {
    /// Unit direction from an analog stick
    Direction(Vec2),
    /// World position; resolved against the player after it moves
    Pointer(Vec2),
}

impl Default for Aim {
    fn default() -> Self {
        Aim::Direction(Vec2::ZERO)
    }
}

impl Aim {
    /// Unit aim direction for a player standing at `from` (zero if undefined)
    pub fn direction(&self, from: Vec2) -> Vec2 {
        match *self {
            Aim::Direction(dir) => dir,
            Aim::Pointer(target) => crate::direction_to(from, target),
        }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Unit or zero
    pub move_dir: Vec2,
    pub aim: Aim,
    pub firing: bool,
}

/// Normalize raw device state into tick intents
pub fn normalize(raw: &RawInput) -> TickInput {
    let move_dir = if raw.move_stick != Vec2::ZERO {
        raw.move_stick.normalize_or_zero()
    } else {
        raw.keys.sum().normalize_or_zero()
    };

    // A deflected aim stick both aims and fires; otherwise the pointer aims
    // and the held button fires.
    let (aim, firing) = if raw.aim_stick != Vec2::ZERO {
        (Aim::Direction(raw.aim_stick.normalize_or_zero()), true)
    } else {
        (Aim::Pointer(raw.pointer), raw.engage)
    };

    TickInput {
        move_dir,
        aim,
        firing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_input_is_idle() {
        let input = normalize(&RawInput::default());
        assert_eq!(input.move_dir, Vec2::ZERO);
        assert!(!input.firing);
    }

    #[test]
    fn test_diagonal_keys_are_unit_length() {
        let raw = RawInput {
            keys: DirectionKeys {
                up: true,
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let input = normalize(&raw);
        assert!((input.move_dir.length() - 1.0).abs() < 1e-6);
        assert!(input.move_dir.x > 0.0 && input.move_dir.y < 0.0);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let raw = RawInput {
            keys: DirectionKeys {
                left: true,
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(normalize(&raw).move_dir, Vec2::ZERO);
    }

    #[test]
    fn test_stick_overrides_keys() {
        let raw = RawInput {
            keys: DirectionKeys {
                up: true,
                ..Default::default()
            },
            move_stick: Vec2::new(0.3, 0.0),
            ..Default::default()
        };
        assert_eq!(normalize(&raw).move_dir, Vec2::X);
    }

    #[test]
    fn test_aim_stick_fires() {
        let raw = RawInput {
            aim_stick: Vec2::new(0.0, -0.5),
            engage: false,
            ..Default::default()
        };
        let input = normalize(&raw);
        assert!(input.firing);
        assert_eq!(input.aim, Aim::Direction(-Vec2::Y));
    }

    #[test]
    fn test_pointer_fallback_uses_engage() {
        let raw = RawInput {
            pointer: Vec2::new(600.0, 400.0),
            engage: true,
            ..Default::default()
        };
        let input = normalize(&raw);
        assert!(input.firing);
        assert_eq!(input.aim.direction(Vec2::new(500.0, 400.0)), Vec2::X);
        // Pointer on top of the player gives no direction
        assert_eq!(input.aim.direction(Vec2::new(600.0, 400.0)), Vec2::ZERO);
    }
}
