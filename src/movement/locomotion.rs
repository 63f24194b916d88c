//! Movement domain: walk/run and air control driven by the move axis.

use bevy::prelude::*;

use crate::core::CharacterStatus;
use crate::movement::{CharacterBody, Facing};

/// Axis magnitudes below this are treated as no input.
pub const INPUT_DEADZONE: f32 = 0.1;

/// Locomotion values taken from the action settings.
#[derive(Debug, Clone, Copy)]
pub struct LocomotionTuning {
    pub move_speed: f32,
    pub can_move_vertical: bool,
}

/// Ground locomotion. Sets `Run` while moving and `Idle` otherwise.
pub fn drive(
    body: &mut dyn CharacterBody,
    status: &mut CharacterStatus,
    facing: &mut Facing,
    axis: Vec2,
    tuning: LocomotionTuning,
) {
    let mut direction = axis;
    if !tuning.can_move_vertical {
        // A purely vertical press means nothing on a side-on level.
        if direction.x.abs() < INPUT_DEADZONE && direction.y.abs() >= INPUT_DEADZONE {
            halt(body, status, tuning);
            return;
        }
        direction.y = 0.0;
    }

    if direction.length() < INPUT_DEADZONE {
        halt(body, status, tuning);
        return;
    }

    let direction = direction.normalize();
    let velocity = body.velocity();
    let vy = if tuning.can_move_vertical {
        direction.y * tuning.move_speed
    } else {
        velocity.y
    };
    body.set_velocity(Vec2::new(direction.x * tuning.move_speed, vy));

    if let Some(next) = Facing::from_direction(direction.x) {
        *facing = next;
    }
    status.set(CharacterStatus::Run);
}

/// Horizontal steering while airborne. Leaves the status alone.
pub fn air_control(
    body: &mut dyn CharacterBody,
    facing: &mut Facing,
    axis: Vec2,
    tuning: LocomotionTuning,
) {
    let x = if axis.x.abs() < INPUT_DEADZONE {
        0.0
    } else {
        axis.x.signum()
    };
    body.set_velocity_x(x * tuning.move_speed);
    if let Some(next) = Facing::from_direction(x) {
        *facing = next;
    }
}

fn halt(body: &mut dyn CharacterBody, status: &mut CharacterStatus, tuning: LocomotionTuning) {
    if tuning.can_move_vertical {
        body.set_velocity(Vec2::ZERO);
    } else {
        body.set_velocity_x(0.0);
    }
    status.stop();
}
