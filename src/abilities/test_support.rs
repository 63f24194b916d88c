//! Test doubles for driving abilities without an ECS world.

use std::collections::HashMap;

use bevy::prelude::*;

use super::{Ability, AbilityContext, AbilityEvent, PhysicsOverride};
use crate::content::{ActionSettings, ComboTable, GameContent, SettingsHandle};
use crate::core::CharacterStatus;
use crate::interaction::InteractableId;
use crate::movement::{
    BodyMode, CastHit, CharacterBody, Facing, KinematicProbe, TargetBodies,
};
use crate::sprites::ClipPlayer;

pub const DT: f32 = 1.0 / 60.0;

#[derive(Debug, Clone)]
pub struct MockBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity_scale: f32,
    pub mode: BodyMode,
    pub half_extents: Vec2,
}

impl Default for MockBody {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            mode: BodyMode::Dynamic,
            half_extents: Vec2::new(0.5, 1.0),
        }
    }
}

impl MockBody {
    /// Semi-implicit Euler step, resting on `ground_y` when given.
    pub fn integrate(&mut self, dt: f32, world_gravity: f32, ground_y: Option<f32>) {
        if self.mode != BodyMode::Dynamic {
            return;
        }
        self.velocity.y -= world_gravity * self.gravity_scale * dt;
        self.position += self.velocity * dt;
        if let Some(ground) = ground_y {
            if self.position.y < ground {
                self.position.y = ground;
                self.velocity.y = self.velocity.y.max(0.0);
            }
        }
    }
}

impl CharacterBody for MockBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn move_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    fn set_gravity_scale(&mut self, scale: f32) {
        self.gravity_scale = scale;
    }

    fn mode(&self) -> BodyMode {
        self.mode
    }

    fn set_mode(&mut self, mode: BodyMode) {
        self.mode = mode;
    }

    fn half_extents(&self) -> Vec2 {
        self.half_extents
    }
}

/// Flat ground at `ground_y` and an optional vertical wall at `wall_x`.
#[derive(Debug, Clone)]
pub struct MockProbe {
    pub ground_y: Option<f32>,
    pub wall_x: Option<f32>,
    pub target_blocked: bool,
    pub skin: f32,
}

impl Default for MockProbe {
    fn default() -> Self {
        Self {
            ground_y: None,
            wall_x: None,
            target_blocked: false,
            skin: 0.04,
        }
    }
}

impl KinematicProbe for MockProbe {
    fn is_grounded(&self, position: Vec2) -> bool {
        self.ground_y.is_some_and(|ground| position.y <= ground + 1e-3)
    }

    fn skin(&self) -> f32 {
        self.skin
    }

    fn cast_character(&self, origin: Vec2, direction: Vec2, distance: f32) -> Vec<CastHit> {
        let Some(wall) = self.wall_x else {
            return Vec::new();
        };
        let gap = (wall - origin.x) * direction.x.signum();
        if gap >= 0.0 && gap <= distance {
            vec![CastHit::new(gap)]
        } else {
            Vec::new()
        }
    }

    fn cast_target(&self, _target: InteractableId, _direction: Vec2, _distance: f32) -> Vec<CastHit> {
        if self.target_blocked {
            vec![CastHit::new(0.0)]
        } else {
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockAnimator {
    pub clips: HashMap<String, f32>,
    pub played: Vec<String>,
}

impl MockAnimator {
    pub fn with_clips(clips: &[(&str, f32)]) -> Self {
        Self {
            clips: clips
                .iter()
                .map(|(name, duration)| (name.to_string(), *duration))
                .collect(),
            played: Vec::new(),
        }
    }

    pub fn last_played(&self) -> Option<&str> {
        self.played.last().map(String::as_str)
    }
}

impl ClipPlayer for MockAnimator {
    fn play_clip(&mut self, clip: &str) {
        self.played.push(clip.to_string());
    }

    fn has_clip(&self, clip: &str) -> bool {
        self.clips.contains_key(clip)
    }

    fn clip_duration(&self, clip: &str) -> Option<f32> {
        self.clips.get(clip).copied()
    }
}

#[derive(Debug, Clone)]
pub struct MockBox {
    pub position: Vec2,
    pub half_size: Vec2,
    pub velocity_x: f32,
    pub solid: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MockTargets {
    pub boxes: HashMap<InteractableId, MockBox>,
}

impl MockTargets {
    pub fn with_box(id: InteractableId, position: Vec2, half_size: Vec2) -> Self {
        let mut targets = Self::default();
        targets.boxes.insert(
            id,
            MockBox {
                position,
                half_size,
                velocity_x: 0.0,
                solid: false,
            },
        );
        targets
    }
}

impl TargetBodies for MockTargets {
    fn position(&self, id: InteractableId) -> Option<Vec2> {
        self.boxes.get(&id).map(|b| b.position)
    }

    fn move_position(&mut self, id: InteractableId, position: Vec2) {
        if let Some(b) = self.boxes.get_mut(&id) {
            b.position = position;
        }
    }

    fn bounds(&self, id: InteractableId) -> Option<Rect> {
        self.boxes
            .get(&id)
            .map(|b| Rect::from_center_half_size(b.position, b.half_size))
    }

    fn set_velocity_x(&mut self, id: InteractableId, x: f32) {
        if let Some(b) = self.boxes.get_mut(&id) {
            b.velocity_x = x;
        }
    }

    fn set_solid(&mut self, id: InteractableId, solid: bool) {
        if let Some(b) = self.boxes.get_mut(&id) {
            b.solid = solid;
        }
    }
}

/// A character with every collaborator mocked.
pub struct Rig {
    pub body: MockBody,
    pub probe: MockProbe,
    pub animator: MockAnimator,
    pub targets: MockTargets,
    pub status: CharacterStatus,
    pub facing: Facing,
    pub physics: PhysicsOverride,
    pub events: Vec<AbilityEvent>,
    pub axis: Vec2,
    pub now: f32,
    pub dt: f32,
}

impl Default for Rig {
    fn default() -> Self {
        Self {
            body: MockBody::default(),
            probe: MockProbe {
                ground_y: Some(0.0),
                ..default()
            },
            animator: MockAnimator::default(),
            targets: MockTargets::default(),
            status: CharacterStatus::Idle,
            facing: Facing::Right,
            physics: PhysicsOverride::default(),
            events: Vec::new(),
            axis: Vec2::ZERO,
            now: 0.0,
            dt: DT,
        }
    }
}

impl Rig {
    pub fn ctx(&mut self) -> AbilityContext<'_> {
        AbilityContext {
            body: &mut self.body,
            probe: &self.probe,
            animator: &mut self.animator,
            targets: &mut self.targets,
            status: &mut self.status,
            facing: &mut self.facing,
            physics: &mut self.physics,
            events: &mut self.events,
            axis: self.axis,
            now: self.now,
            dt: self.dt,
        }
    }

    /// Run one fixed tick of `ability` and advance the clock.
    pub fn tick(&mut self, ability: &mut dyn Ability) {
        ability.update(&mut self.ctx());
        self.now += self.dt;
    }

    /// Tick until the ability goes inactive. Returns the number of ticks.
    pub fn run_until_idle(&mut self, ability: &mut dyn Ability, max_ticks: usize) -> usize {
        for n in 0..max_ticks {
            if !ability.is_active() {
                return n;
            }
            self.tick(ability);
        }
        max_ticks
    }

    pub fn clip_finished(&mut self, ability: &mut dyn Ability, clip: &str) {
        ability.on_clip_finished(&mut self.ctx(), clip);
    }

    pub fn cancel(&mut self, ability: &mut dyn Ability, skip_exit_clip: bool, restore: bool) {
        ability.cancel(&mut self.ctx(), skip_exit_clip, restore);
    }
}

pub fn settings_with(tune: impl FnOnce(&mut ActionSettings)) -> SettingsHandle {
    let mut content = GameContent::with_defaults();
    tune(&mut content.settings);
    SettingsHandle::new(content)
}

pub fn combo_with(table: ComboTable) -> SettingsHandle {
    let mut content = GameContent::with_defaults();
    content.combo = table;
    SettingsHandle::new(content)
}
