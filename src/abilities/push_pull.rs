//! Abilities domain: gripping, pushing and pulling a movable box.

use bevy::prelude::*;

use super::{
    Ability, AbilityContext, AbilityEvent, AbilityFault, Capability, Watchdog, one_shot_deadline,
};
use crate::content::{ActionSettings, SettingsHandle, SettingsWatch};
use crate::core::{AbilityKind, CharacterStatus};
use crate::interaction::InteractableId;
use crate::movement::{Facing, INPUT_DEADZONE};

pub const CLIP_PUSH: &str = "push";
pub const CLIP_PUSH_WAIT: &str = "push_wait";
pub const CLIP_PULL_PLAY: &str = "pull_play";
pub const CLIP_PUSH_PLAY: &str = "push_play";
pub const CLIP_PUSH_END: &str = "push_end";

const ONE_SHOT_FALLBACK: f32 = 0.25;

/// A movable box as seen by the push/pull ability.
#[derive(Debug, Clone, PartialEq)]
pub struct PushTargetSpec {
    pub id: InteractableId,
    pub can_push: bool,
    pub can_pull: bool,
    /// Overrides for the settings' push and pull speed fractions.
    pub push_speed: Option<f32>,
    pub pull_speed: Option<f32>,
}

impl PushTargetSpec {
    pub fn new(id: InteractableId) -> Self {
        Self {
            id,
            can_push: true,
            can_pull: true,
            push_speed: None,
            pull_speed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PushPullPhase {
    #[default]
    None,
    Enter,
    Wait,
    Pull,
    Push,
    End,
}

/// Which face of the box the character holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GripSide {
    /// Character stands left of the box and faces right.
    #[default]
    Left,
    Right,
}

pub struct PushPullAbility {
    watch: SettingsWatch,
    capability: Capability,
    phase: PushPullPhase,
    target: Option<PushTargetSpec>,
    grip: GripSide,
    move_speed: f32,
    push_speed: f32,
    pull_speed: f32,
    grip_gap: f32,
    saved_velocity: Vec2,
    watchdog: Watchdog<PushPullPhase>,
}

impl PushPullAbility {
    pub fn new(settings: &SettingsHandle) -> Self {
        let watch = settings.watch();
        let content = watch.current();
        let mut push_pull = Self {
            watch,
            capability: Capability::default(),
            phase: PushPullPhase::None,
            target: None,
            grip: GripSide::Left,
            move_speed: 0.0,
            push_speed: 0.0,
            pull_speed: 0.0,
            grip_gap: 0.0,
            saved_velocity: Vec2::ZERO,
            watchdog: Watchdog::default(),
        };
        push_pull.apply_settings(&content.settings);
        push_pull
    }

    pub fn apply_settings(&mut self, settings: &ActionSettings) {
        self.move_speed = settings.move_speed;
        self.push_speed = settings.push_speed;
        self.pull_speed = settings.pull_speed;
        self.grip_gap = settings.grip_gap;
    }

    pub fn phase(&self) -> PushPullPhase {
        self.phase
    }

    pub fn grip(&self) -> GripSide {
        self.grip
    }

    pub fn target(&self) -> Option<InteractableId> {
        self.target.as_ref().map(|t| t.id)
    }

    pub fn begin(&mut self, ctx: &mut AbilityContext, target: &PushTargetSpec) -> bool {
        if !self.capability.enabled() {
            return false;
        }
        if self.is_active() {
            return true;
        }
        if ctx.status.blocks_actions() {
            debug!(
                "{}",
                AbilityFault::InvalidTransition {
                    ability: AbilityKind::PushPull,
                    status: *ctx.status,
                }
            );
            return false;
        }
        let Some(bounds) = ctx.targets.bounds(target.id) else {
            warn!("Push target {:?} has no body", target.id);
            return false;
        };

        self.saved_velocity = ctx.body.velocity();
        ctx.targets.set_solid(target.id, true);
        self.grip = if (ctx.body.position().x - bounds.min.x).abs()
            <= (ctx.body.position().x - bounds.max.x).abs()
        {
            GripSide::Left
        } else {
            GripSide::Right
        };
        self.target = Some(target.clone());
        self.snap_to_grip(ctx);
        ctx.body.set_velocity(Vec2::ZERO);
        ctx.status.set(CharacterStatus::Push);
        debug!("Gripped {:?} from the {:?}", target.id, self.grip);

        self.phase = PushPullPhase::Enter;
        if ctx.play_if_present(CLIP_PUSH) {
            let deadline = one_shot_deadline(ctx, CLIP_PUSH, ONE_SHOT_FALLBACK);
            self.watchdog.arm(PushPullPhase::Enter, deadline);
        } else {
            self.enter_loop(ctx, PushPullPhase::Wait);
        }
        true
    }

    /// Let go of the box, playing the release clip if there is one.
    pub fn end(&mut self, ctx: &mut AbilityContext) {
        if !self.is_active() || self.phase == PushPullPhase::End {
            return;
        }
        self.watchdog.cancel();
        self.enter_end(ctx);
    }

    fn enter_loop(&mut self, ctx: &mut AbilityContext, phase: PushPullPhase) {
        self.phase = phase;
        let clip = match phase {
            PushPullPhase::Push => CLIP_PUSH_PLAY,
            PushPullPhase::Pull => CLIP_PULL_PLAY,
            _ => CLIP_PUSH_WAIT,
        };
        ctx.play_if_present(clip);
    }

    fn enter_end(&mut self, ctx: &mut AbilityContext) {
        self.hold(ctx);
        if ctx.play_if_present(CLIP_PUSH_END) {
            self.phase = PushPullPhase::End;
            let deadline = one_shot_deadline(ctx, CLIP_PUSH_END, ONE_SHOT_FALLBACK);
            self.watchdog.arm(PushPullPhase::End, deadline);
        } else {
            self.finish(ctx, true);
        }
    }

    fn finish(&mut self, ctx: &mut AbilityContext, restore_velocity: bool) {
        self.phase = PushPullPhase::None;
        self.watchdog.cancel();
        let target = self.target.take();
        if let Some(target) = &target {
            ctx.targets.set_velocity_x(target.id, 0.0);
            ctx.targets.set_solid(target.id, false);
        }
        if restore_velocity {
            ctx.body.set_velocity(self.saved_velocity);
        }
        if *ctx.status == CharacterStatus::Push {
            ctx.status.stop();
        }
        if let Some(target) = target {
            debug!("Released {:?}", target.id);
            ctx.events.push(AbilityEvent::InteractionEnded {
                candidate: target.id,
                ability: AbilityKind::PushPull,
            });
        }
    }

    fn complete_one_shot(&mut self, ctx: &mut AbilityContext, phase: PushPullPhase) {
        match phase {
            PushPullPhase::Enter => self.enter_loop(ctx, PushPullPhase::Wait),
            PushPullPhase::End => self.finish(ctx, true),
            _ => {}
        }
    }

    /// Keep the character glued to the gripped face and facing the box.
    fn snap_to_grip(&self, ctx: &mut AbilityContext) {
        let Some(target) = &self.target else {
            return;
        };
        let Some(bounds) = ctx.targets.bounds(target.id) else {
            return;
        };
        let half = ctx.body.half_extents().x;
        let y = ctx.body.position().y;
        let (x, facing) = match self.grip {
            GripSide::Left => (bounds.min.x - self.grip_gap - half, Facing::Right),
            GripSide::Right => (bounds.max.x + self.grip_gap + half, Facing::Left),
        };
        ctx.body.move_position(Vec2::new(x, y));
        *ctx.facing = facing;
    }

    fn hold(&self, ctx: &mut AbilityContext) {
        if let Some(target) = &self.target {
            ctx.targets.set_velocity_x(target.id, 0.0);
        }
        ctx.body.set_velocity_x(0.0);
        self.snap_to_grip(ctx);
    }

    fn move_target(&self, ctx: &mut AbilityContext, raw_x: f32) {
        let Some(target) = &self.target else {
            return;
        };
        let fraction = match self.phase {
            PushPullPhase::Pull => target.pull_speed.unwrap_or(self.pull_speed),
            _ => target.push_speed.unwrap_or(self.push_speed),
        };
        let dx = raw_x * self.move_speed * fraction * ctx.dt;
        if dx.abs() <= f32::EPSILON {
            self.hold(ctx);
            return;
        }

        let direction = Vec2::new(dx.signum(), 0.0);
        let hits = ctx
            .probe
            .cast_target(target.id, direction, dx.abs() + ctx.probe.skin());
        let allowed = ctx.probe.allowed_travel(&hits, dx.abs());
        if allowed > f32::EPSILON {
            if let Some(position) = ctx.targets.position(target.id) {
                ctx.targets
                    .move_position(target.id, position + direction * allowed);
            }
        }
        if allowed < dx.abs() {
            ctx.targets.set_velocity_x(target.id, 0.0);
        }
        ctx.body.set_velocity_x(0.0);
        self.snap_to_grip(ctx);
    }

    fn step(&mut self, ctx: &mut AbilityContext) {
        let Some(target) = &self.target else {
            return;
        };
        let (can_push, can_pull) = (target.can_push, target.can_pull);
        let raw_x = ctx.axis.x;
        // Positive means away from the character, whichever side it grips.
        let x = match self.grip {
            GripSide::Left => raw_x,
            GripSide::Right => -raw_x,
        };

        match self.phase {
            PushPullPhase::Wait => {
                if x < -INPUT_DEADZONE && can_pull {
                    self.enter_loop(ctx, PushPullPhase::Pull);
                } else if x > INPUT_DEADZONE && can_push {
                    self.enter_loop(ctx, PushPullPhase::Push);
                } else {
                    self.hold(ctx);
                }
            }
            PushPullPhase::Pull => {
                if x < -INPUT_DEADZONE {
                    self.move_target(ctx, raw_x);
                } else {
                    self.enter_loop(ctx, PushPullPhase::Wait);
                }
            }
            PushPullPhase::Push => {
                if x > INPUT_DEADZONE {
                    self.move_target(ctx, raw_x);
                } else {
                    self.enter_loop(ctx, PushPullPhase::Wait);
                }
            }
            _ => {}
        }
    }
}

impl Ability for PushPullAbility {
    fn kind(&self) -> AbilityKind {
        AbilityKind::PushPull
    }

    fn is_active(&self) -> bool {
        self.phase != PushPullPhase::None
    }

    fn update(&mut self, ctx: &mut AbilityContext) {
        if let Some(content) = self.watch.changed() {
            self.apply_settings(&content.settings);
        }
        if !self.capability.enabled() || !self.is_active() {
            return;
        }

        if let Some(target) = &self.target {
            if ctx.targets.bounds(target.id).is_none() {
                warn!("Push target {:?} vanished", target.id);
                self.finish(ctx, false);
                return;
            }
        }

        if let Some(phase) = self.watchdog.poll(ctx.now) {
            if phase == self.phase {
                debug!(
                    "{}",
                    AbilityFault::AnimationEventTimeout {
                        ability: AbilityKind::PushPull,
                        phase: format!("{:?}", phase),
                    }
                );
                self.complete_one_shot(ctx, phase);
            }
        }

        self.step(ctx);
    }

    fn cancel(&mut self, ctx: &mut AbilityContext, skip_exit_clip: bool, restore_physics: bool) {
        if !self.is_active() {
            return;
        }
        if !skip_exit_clip && self.phase == PushPullPhase::End {
            return;
        }
        self.watchdog.cancel();
        if skip_exit_clip {
            self.finish(ctx, restore_physics);
        } else {
            self.enter_end(ctx);
        }
    }

    fn awaits_clip(&self, clip: &str) -> bool {
        match clip {
            CLIP_PUSH => self.watchdog.awaits(PushPullPhase::Enter),
            CLIP_PUSH_END => self.watchdog.awaits(PushPullPhase::End),
            _ => false,
        }
    }

    fn on_clip_finished(&mut self, ctx: &mut AbilityContext, clip: &str) {
        if !self.awaits_clip(clip) {
            return;
        }
        let phase = self.phase;
        self.watchdog.cancel();
        self.complete_one_shot(ctx, phase);
    }

    fn disable(&mut self, capability: &'static str) {
        self.capability.disable(AbilityKind::PushPull, capability);
    }
}
