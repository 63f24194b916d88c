//! Movement domain: keyboard sampling into the action input latch.

use bevy::prelude::*;

/// Input latched between frame updates and fixed ticks.
///
/// Button presses accumulate until a fixed tick takes them, so a press is
/// never lost on frames where the fixed schedule does not run.
#[derive(Resource, Debug, Default, Clone)]
pub struct ActionInput {
    pub axis: Vec2,
    pub jump_pressed: bool,
    pub dash_pressed: bool,
    pub attack_pressed: bool,
    pub interact_pressed: bool,
}

impl ActionInput {
    /// Take the latched presses, keeping the held axis.
    pub fn take(&mut self) -> ActionInput {
        let taken = self.clone();
        self.jump_pressed = false;
        self.dash_pressed = false;
        self.attack_pressed = false;
        self.interact_pressed = false;
        taken
    }
}

pub(crate) fn read_input(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<ActionInput>) {
    // Horizontal axis
    let mut x = 0.0;
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        x += 1.0;
    }

    // Vertical axis (ladders, top-down mode)
    let mut y = 0.0;
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        y += 1.0;
    }

    input.axis = Vec2::new(x, y);
    input.jump_pressed |=
        keyboard.just_pressed(KeyCode::Space) || keyboard.just_pressed(KeyCode::KeyK);
    input.dash_pressed |=
        keyboard.just_pressed(KeyCode::ShiftLeft) || keyboard.just_pressed(KeyCode::KeyJ);
    input.attack_pressed |=
        keyboard.just_pressed(KeyCode::KeyZ) || keyboard.just_pressed(KeyCode::KeyU);
    input.interact_pressed |=
        keyboard.just_pressed(KeyCode::KeyE) || keyboard.just_pressed(KeyCode::KeyF);
}
