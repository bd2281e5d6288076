//! Input store types: the latest validated control intent per participant

use crate::game::movement::{MAX_PITCH, MAX_SPEED_MULTIPLIER, MIN_SPEED_MULTIPLIER};
use crate::ws::protocol::{MoveWire, ViewWire};

/// Default speed multiplier for a fresh input sample
pub const DEFAULT_SPEED: f32 = 0.6;

/// Clamped movement intent per axis, each in [-1, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveIntent {
    pub forward: f32,
    pub right: f32,
    pub up: f32,
}

/// Desired view angles; yaw is unbounded, pitch is held within ±60°
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewIntent {
    pub yaw: f32,
    pub pitch: f32,
}

/// The latest validated input for one participant.
///
/// Kept separate from the participant's simulated state so a partial or
/// garbage message can never corrupt an authoritative position directly;
/// the tick is the only writer of positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSample {
    pub movement: MoveIntent,
    pub speed: f32,
    pub view: ViewIntent,
}

impl Default for InputSample {
    fn default() -> Self {
        Self {
            movement: MoveIntent::default(),
            speed: DEFAULT_SPEED,
            view: ViewIntent::default(),
        }
    }
}

impl InputSample {
    /// Apply a partial update from an `input` message. Fields absent on the
    /// wire leave the stored value untouched; present fields are clamped
    /// into range on ingestion.
    pub fn apply(&mut self, movement: Option<MoveWire>, speed: Option<f32>, view: Option<ViewWire>) {
        if let Some(m) = movement {
            self.movement = MoveIntent {
                forward: m.forward.clamp(-1.0, 1.0),
                right: m.right.clamp(-1.0, 1.0),
                up: m.up.clamp(-1.0, 1.0),
            };
        }
        if let Some(s) = speed {
            self.speed = s.clamp(MIN_SPEED_MULTIPLIER, MAX_SPEED_MULTIPLIER);
        }
        if let Some(v) = view {
            self.view = ViewIntent {
                yaw: v.yaw,
                pitch: v.pitch.clamp(-MAX_PITCH, MAX_PITCH),
            };
        }
    }
}
