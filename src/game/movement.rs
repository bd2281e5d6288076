//! Movement integration and world-volume constraints

use crate::game::input::InputSample;

/// Base linear speed in world units per second, before the per-participant
/// speed multiplier.
pub const BASE_MOVE_SPEED: f32 = 0.9;

/// Speed multiplier bounds
pub const MIN_SPEED_MULTIPLIER: f32 = 0.1;
pub const MAX_SPEED_MULTIPLIER: f32 = 2.0;

/// Maximum pitch magnitude in radians (60 degrees)
pub const MAX_PITCH: f32 = std::f32::consts::PI / 3.0;

/// Half-extents of the world volume per axis. The volume is asymmetric:
/// taller along y than it is wide on x/z.
pub const WORLD_BOUNDS: WorldBounds = WorldBounds {
    x: 2.2,
    y: 3.2,
    z: 2.2,
};

/// Axis-aligned half-extents positions are clamped into
#[derive(Debug, Clone, Copy)]
pub struct WorldBounds {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Movement system for integrating participant positions from input
pub struct MovementSystem;

impl MovementSystem {
    /// Forward unit vector for a view direction, spherical-to-Cartesian
    pub fn forward_vector(yaw: f32, pitch: f32) -> (f32, f32, f32) {
        let cos_pitch = pitch.cos();
        (yaw.sin() * cos_pitch, yaw.cos() * cos_pitch, -pitch.sin())
    }

    /// Horizontal right vector, derived from yaw alone (no z component)
    pub fn right_vector(yaw: f32) -> (f32, f32) {
        (yaw.cos(), -yaw.sin())
    }

    /// Integrate one participant's position over `dt` seconds of input.
    /// Returns (new_x, new_y, new_z, new_yaw, new_pitch).
    ///
    /// Ordering matters: orientation is taken from the input first, the
    /// displacement is derived from it, and the world-bounds clamp is always
    /// the final step so a single-tick overshoot never accumulates.
    pub fn integrate(
        x: f32,
        y: f32,
        z: f32,
        input: &InputSample,
        dt: f32,
    ) -> (f32, f32, f32, f32, f32) {
        // A stalled or backwards clock yields zero displacement, not a fault
        let dt = dt.max(0.0);

        // Orientation comes straight from the latest input sample; the pitch
        // and speed clamps are re-applied even though ingestion already
        // enforces them
        let yaw = input.view.yaw;
        let pitch = input.view.pitch.clamp(-MAX_PITCH, MAX_PITCH);
        let speed = BASE_MOVE_SPEED
            * input
                .speed
                .clamp(MIN_SPEED_MULTIPLIER, MAX_SPEED_MULTIPLIER);
        let step = speed * dt;

        let (fx, fy, fz) = Self::forward_vector(yaw, pitch);
        let (rx, ry) = Self::right_vector(yaw);

        let movement = &input.movement;
        let new_x = x + fx * movement.forward * step + rx * movement.right * step;
        let new_y = y + fy * movement.forward * step + ry * movement.right * step;
        let new_z = z + fz * movement.forward * step + movement.up * step;

        (
            new_x.clamp(-WORLD_BOUNDS.x, WORLD_BOUNDS.x),
            new_y.clamp(-WORLD_BOUNDS.y, WORLD_BOUNDS.y),
            new_z.clamp(-WORLD_BOUNDS.z, WORLD_BOUNDS.z),
            yaw,
            pitch,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::input::{InputSample, MoveIntent, ViewIntent};

    fn sample(forward: f32, right: f32, up: f32, speed: f32, yaw: f32, pitch: f32) -> InputSample {
        InputSample {
            movement: MoveIntent { forward, right, up },
            speed,
            view: ViewIntent { yaw, pitch },
        }
    }

    #[test]
    fn forward_vector_at_rest_points_along_y() {
        let (x, y, z) = MovementSystem::forward_vector(0.0, 0.0);
        assert_eq!(x, 0.0);
        assert_eq!(y, 1.0);
        assert_eq!(z, 0.0);
    }

    #[test]
    fn right_vector_at_rest_points_along_x() {
        let (x, y) = MovementSystem::right_vector(0.0);
        assert_eq!(x, 1.0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn one_second_of_forward_input_moves_base_speed_along_y() {
        let input = sample(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        let (x, y, z, yaw, pitch) = MovementSystem::integrate(0.0, 0.0, 0.0, &input, 1.0);
        assert_eq!(x, 0.0);
        assert_eq!(y, BASE_MOVE_SPEED);
        assert_eq!(z, 0.0);
        assert_eq!(yaw, 0.0);
        assert_eq!(pitch, 0.0);
    }

    #[test]
    fn vertical_intent_moves_along_z_only() {
        let input = sample(0.0, 0.0, 1.0, 1.0, 0.0, 0.0);
        let (x, y, z, ..) = MovementSystem::integrate(0.0, 0.0, 0.0, &input, 1.0);
        assert_eq!(x, 0.0);
        assert_eq!(y, 0.0);
        assert_eq!(z, BASE_MOVE_SPEED);
    }

    #[test]
    fn non_positive_elapsed_time_yields_zero_displacement() {
        let input = sample(1.0, 1.0, 1.0, 2.0, 0.7, 0.3);
        let (x, y, z, ..) = MovementSystem::integrate(0.5, -0.5, 0.25, &input, 0.0);
        assert_eq!((x, y, z), (0.5, -0.5, 0.25));
        let (x, y, z, ..) = MovementSystem::integrate(0.5, -0.5, 0.25, &input, -0.1);
        assert_eq!((x, y, z), (0.5, -0.5, 0.25));
    }

    #[test]
    fn position_never_escapes_world_bounds() {
        let input = sample(1.0, 0.0, 1.0, 2.0, 0.0, 0.0);
        let mut pos = (0.0, 0.0, 0.0);
        // 100 huge steps straight ahead and up
        for _ in 0..100 {
            let (x, y, z, ..) = MovementSystem::integrate(pos.0, pos.1, pos.2, &input, 10.0);
            pos = (x, y, z);
            assert!(pos.0.abs() <= WORLD_BOUNDS.x);
            assert!(pos.1.abs() <= WORLD_BOUNDS.y);
            assert!(pos.2.abs() <= WORLD_BOUNDS.z);
        }
        assert_eq!(pos.1, WORLD_BOUNDS.y);
        assert_eq!(pos.2, WORLD_BOUNDS.z);
    }

    #[test]
    fn clamp_is_a_no_op_for_in_bounds_positions() {
        let input = sample(0.0, 0.0, 0.0, 1.0, 1.3, 0.4);
        let (x, y, z, ..) = MovementSystem::integrate(1.0, -2.0, 0.5, &input, 1.0);
        assert_eq!((x, y, z), (1.0, -2.0, 0.5));
    }

    #[test]
    fn out_of_range_pitch_and_speed_are_reclamped_at_tick_time() {
        // A store should never hold these, but the tick guards anyway
        let input = sample(1.0, 0.0, 0.0, 50.0, 0.0, std::f32::consts::PI);
        let (_, _, _, _, pitch) = MovementSystem::integrate(0.0, 0.0, 0.0, &input, 0.001);
        assert_eq!(pitch, MAX_PITCH);

        let flat = sample(1.0, 0.0, 0.0, 50.0, 0.0, 0.0);
        let (_, y, ..) = MovementSystem::integrate(0.0, 0.0, 0.0, &flat, 1.0);
        assert_eq!(y, BASE_MOVE_SPEED * MAX_SPEED_MULTIPLIER);
    }

    #[test]
    fn yaw_quarter_turn_moves_along_x() {
        let input = sample(1.0, 0.0, 0.0, 1.0, std::f32::consts::FRAC_PI_2, 0.0);
        let (x, y, _, yaw, _) = MovementSystem::integrate(0.0, 0.0, 0.0, &input, 1.0);
        assert!((x - BASE_MOVE_SPEED).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
        assert_eq!(yaw, std::f32::consts::FRAC_PI_2);
    }
}
