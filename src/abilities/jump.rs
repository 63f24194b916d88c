//! Abilities domain: jump with designer-specified height and time to apex,
//! plus the automatic cliff fall.

use bevy::prelude::*;

use super::{
    Ability, AbilityContext, AbilityFault, ActivityFlag, Capability, Watchdog, one_shot_deadline,
};
use crate::content::{ActionSettings, SettingsHandle, SettingsWatch};
use crate::core::{AbilityKind, CharacterStatus};

pub const CLIP_JUMP: &str = "jump";
pub const CLIP_JUMP_WAIT: &str = "jump_wait";
pub const CLIP_JUMP_END: &str = "jump_end";
pub const CLIP_JUMP_LAND: &str = "jump_land";

const LANDING_FALLBACK: f32 = 0.2;
const APEX_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JumpPhase {
    #[default]
    None,
    Rising,
    Falling,
    Landing,
}

/// Launch values for a jump of height `h` reaching its apex after `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpLaunch {
    /// Gravity magnitude the jump needs.
    pub gravity: f32,
    /// `gravity` divided by world gravity.
    pub gravity_scale: f32,
    pub velocity: f32,
}

impl JumpLaunch {
    /// `g = 2h / t²`, `v0 = g·t`, so the apex is reached after exactly `t`.
    pub fn new(height: f32, time_to_apex: f32, world_gravity: f32) -> Self {
        let height = height.max(0.01);
        let time_to_apex = time_to_apex.max(0.05);
        let gravity = 2.0 * height / (time_to_apex * time_to_apex);
        let world = world_gravity.abs().max(f32::EPSILON);
        Self {
            gravity,
            gravity_scale: gravity / world,
            velocity: gravity * time_to_apex,
        }
    }
}

pub struct JumpAbility {
    watch: SettingsWatch,
    capability: Capability,
    phase: JumpPhase,
    launch: JumpLaunch,
    coyote_time: f32,
    cliff_fall_speed: f32,
    /// Started by walking off a ledge rather than by input.
    from_cliff: bool,
    fall_clip_played: bool,
    airborne_time: f32,
    dash_active: Option<ActivityFlag>,
    watchdog: Watchdog<JumpPhase>,
}

impl JumpAbility {
    pub fn new(settings: &SettingsHandle) -> Self {
        let watch = settings.watch();
        let content = watch.current();
        let mut jump = Self {
            watch,
            capability: Capability::default(),
            phase: JumpPhase::None,
            launch: JumpLaunch::new(1.0, 1.0, 1.0),
            coyote_time: 0.0,
            cliff_fall_speed: 0.0,
            from_cliff: false,
            fall_clip_played: false,
            airborne_time: 0.0,
            dash_active: None,
            watchdog: Watchdog::default(),
        };
        jump.apply_settings(&content.settings);
        jump
    }

    pub fn apply_settings(&mut self, settings: &ActionSettings) {
        self.launch = JumpLaunch::new(
            settings.jump_height,
            settings.jump_time_to_apex,
            settings.world_gravity,
        );
        self.coyote_time = settings.coyote_time;
        self.cliff_fall_speed = settings.cliff_fall_speed;
    }

    /// Lets the jump see whether a dash is running, to hold off the cliff fall.
    pub fn set_dash_active_query(&mut self, flag: ActivityFlag) {
        self.dash_active = Some(flag);
    }

    pub fn phase(&self) -> JumpPhase {
        self.phase
    }

    /// Active because the character walked off a ledge.
    pub fn is_cliff_fall(&self) -> bool {
        self.is_active() && self.from_cliff
    }

    /// Launch a jump. Repeated calls while jumping are a successful no-op.
    pub fn begin(&mut self, ctx: &mut AbilityContext) -> bool {
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
                    ability: AbilityKind::Jump,
                    status: *ctx.status,
                }
            );
            return false;
        }
        if !ctx.physics.claim(AbilityKind::Jump, &*ctx.body) {
            return false;
        }

        ctx.status.set(CharacterStatus::Jump);
        ctx.body.set_gravity_scale(self.launch.gravity_scale);
        let velocity = ctx.body.velocity();
        ctx.body
            .set_velocity(Vec2::new(velocity.x, velocity.y.max(self.launch.velocity)));
        ctx.play_if_present(CLIP_JUMP);

        self.phase = JumpPhase::Rising;
        self.from_cliff = false;
        self.fall_clip_played = false;
        debug!("Jump launched at {:.2}", self.launch.velocity);
        true
    }

    fn try_cliff_fall(&mut self, ctx: &mut AbilityContext) {
        let dashing = self.dash_active.as_ref().is_some_and(ActivityFlag::get);
        let idle = matches!(*ctx.status, CharacterStatus::Idle | CharacterStatus::Run);
        if dashing || !idle || self.airborne_time <= self.coyote_time {
            return;
        }
        if ctx.body.velocity().y >= self.cliff_fall_speed {
            return;
        }

        // Falls under the body's own gravity, so no physics override.
        ctx.status.set(CharacterStatus::Jump);
        ctx.play_if_present(CLIP_JUMP_END);
        self.phase = JumpPhase::Falling;
        self.from_cliff = true;
        self.fall_clip_played = true;
        debug!("Cliff fall started");
    }

    fn enter_landing(&mut self, ctx: &mut AbilityContext) {
        if ctx.play_if_present(CLIP_JUMP_LAND) {
            self.phase = JumpPhase::Landing;
            let deadline = one_shot_deadline(ctx, CLIP_JUMP_LAND, LANDING_FALLBACK);
            self.watchdog.arm(JumpPhase::Landing, deadline);
        } else {
            self.finish(ctx, true);
        }
    }

    fn finish(&mut self, ctx: &mut AbilityContext, restore_physics: bool) {
        self.phase = JumpPhase::None;
        self.watchdog.cancel();
        if !self.from_cliff {
            if restore_physics {
                ctx.physics.restore(AbilityKind::Jump, ctx.body);
            } else {
                ctx.physics.release(AbilityKind::Jump);
            }
        }
        self.from_cliff = false;
        if *ctx.status == CharacterStatus::Jump {
            ctx.status.stop();
        }
    }
}

impl Ability for JumpAbility {
    fn kind(&self) -> AbilityKind {
        AbilityKind::Jump
    }

    fn is_active(&self) -> bool {
        self.phase != JumpPhase::None
    }

    fn update(&mut self, ctx: &mut AbilityContext) {
        if let Some(content) = self.watch.changed() {
            self.apply_settings(&content.settings);
        }
        if !self.capability.enabled() {
            return;
        }

        let grounded = ctx.is_grounded();
        if grounded {
            self.airborne_time = 0.0;
        } else {
            self.airborne_time += ctx.dt;
        }

        if let Some(phase) = self.watchdog.poll(ctx.now) {
            if phase == self.phase {
                debug!(
                    "{}",
                    AbilityFault::AnimationEventTimeout {
                        ability: AbilityKind::Jump,
                        phase: format!("{:?}", phase),
                    }
                );
                self.finish(ctx, true);
            }
            return;
        }

        let vy = ctx.body.velocity().y;
        match self.phase {
            JumpPhase::None => {
                if !grounded {
                    self.try_cliff_fall(ctx);
                }
            }
            JumpPhase::Rising => {
                if vy <= APEX_EPSILON {
                    self.phase = JumpPhase::Falling;
                    ctx.play_if_present(CLIP_JUMP_WAIT);
                }
            }
            JumpPhase::Falling => {
                if !self.fall_clip_played && vy < -APEX_EPSILON {
                    self.fall_clip_played = true;
                    ctx.play_if_present(CLIP_JUMP_END);
                }
                if grounded && vy <= APEX_EPSILON {
                    self.enter_landing(ctx);
                }
            }
            JumpPhase::Landing => {}
        }
    }

    fn cancel(&mut self, ctx: &mut AbilityContext, skip_exit_clip: bool, restore_physics: bool) {
        if !self.is_active() {
            return;
        }
        if !skip_exit_clip && self.phase == JumpPhase::Landing {
            return;
        }
        self.watchdog.cancel();
        if !skip_exit_clip && ctx.animator.has_clip(CLIP_JUMP_LAND) {
            self.enter_landing(ctx);
            return;
        }
        self.finish(ctx, restore_physics);
    }

    fn awaits_clip(&self, clip: &str) -> bool {
        clip == CLIP_JUMP_LAND && self.watchdog.awaits(JumpPhase::Landing)
    }

    fn on_clip_finished(&mut self, ctx: &mut AbilityContext, clip: &str) {
        if self.phase == JumpPhase::Landing && self.awaits_clip(clip) {
            self.finish(ctx, true);
        }
    }

    fn disable(&mut self, capability: &'static str) {
        self.capability.disable(AbilityKind::Jump, capability);
    }
}
