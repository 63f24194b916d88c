//! Abilities domain: fixed-distance dash along the facing direction.

use bevy::prelude::*;

use super::{
    Ability, AbilityContext, AbilityFault, ActivityFlag, Capability, DashCurve, Watchdog,
    one_shot_deadline,
};
use crate::content::{ActionSettings, SettingsHandle, SettingsWatch};
use crate::core::{AbilityKind, CharacterStatus};

pub const CLIP_DASH: &str = "dash";
pub const CLIP_DASH_PLAY: &str = "dash_play";
pub const CLIP_DASH_END: &str = "dash_end";

const ONE_SHOT_FALLBACK: f32 = 0.2;
const TIME_EPSILON: f32 = 1e-5;
const DISTANCE_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DashPhase {
    #[default]
    None,
    Start,
    Travel,
    End,
}

pub struct DashAbility {
    watch: SettingsWatch,
    capability: Capability,
    phase: DashPhase,
    distance: f32,
    duration: f32,
    curve: DashCurve,
    direction: f32,
    elapsed: f32,
    progress: f32,
    moved: f32,
    watchdog: Watchdog<DashPhase>,
    active: ActivityFlag,
}

impl DashAbility {
    pub fn new(settings: &SettingsHandle) -> Self {
        let watch = settings.watch();
        let content = watch.current();
        let mut dash = Self {
            watch,
            capability: Capability::default(),
            phase: DashPhase::None,
            distance: 0.0,
            duration: 0.0,
            curve: DashCurve::default(),
            direction: 1.0,
            elapsed: 0.0,
            progress: 0.0,
            moved: 0.0,
            watchdog: Watchdog::default(),
            active: ActivityFlag::default(),
        };
        dash.apply_settings(&content.settings);
        dash
    }

    pub fn apply_settings(&mut self, settings: &ActionSettings) {
        self.distance = settings.dash_distance.max(0.01);
        self.duration = settings.dash_duration.max(0.02);
        self.curve = DashCurve::from_settings(settings);
    }

    pub fn activity_flag(&self) -> ActivityFlag {
        self.active.clone()
    }

    pub fn phase(&self) -> DashPhase {
        self.phase
    }

    /// Distance covered so far in the current dash.
    pub fn moved(&self) -> f32 {
        self.moved
    }

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
                    ability: AbilityKind::Dash,
                    status: *ctx.status,
                }
            );
            return false;
        }
        if !ctx.physics.claim(AbilityKind::Dash, &*ctx.body) {
            return false;
        }

        ctx.status.set(CharacterStatus::Dash);
        ctx.body.set_gravity_scale(0.0);
        ctx.body.set_velocity(Vec2::ZERO);

        self.direction = ctx.facing.sign();
        self.elapsed = 0.0;
        self.progress = 0.0;
        self.moved = 0.0;
        self.active.set(true);
        debug!("Dash started, direction {}", self.direction);
        self.enter_start(ctx);
        true
    }

    fn enter_start(&mut self, ctx: &mut AbilityContext) {
        self.phase = DashPhase::Start;
        if ctx.play_if_present(CLIP_DASH) {
            let deadline = one_shot_deadline(ctx, CLIP_DASH, ONE_SHOT_FALLBACK);
            self.watchdog.arm(DashPhase::Start, deadline);
        } else {
            self.enter_travel(ctx);
        }
    }

    fn enter_travel(&mut self, ctx: &mut AbilityContext) {
        self.phase = DashPhase::Travel;
        ctx.play_if_present(CLIP_DASH_PLAY);
    }

    fn enter_end(&mut self, ctx: &mut AbilityContext) {
        self.phase = DashPhase::End;
        ctx.body.set_velocity(Vec2::ZERO);
        if ctx.play_if_present(CLIP_DASH_END) {
            let deadline = one_shot_deadline(ctx, CLIP_DASH_END, ONE_SHOT_FALLBACK);
            self.watchdog.arm(DashPhase::End, deadline);
        } else {
            self.finish(ctx, true);
        }
    }

    fn finish(&mut self, ctx: &mut AbilityContext, restore_physics: bool) {
        self.phase = DashPhase::None;
        self.watchdog.cancel();
        self.active.set(false);
        ctx.body.set_velocity_x(0.0);
        if restore_physics {
            ctx.physics.restore(AbilityKind::Dash, ctx.body);
        } else {
            ctx.physics.release(AbilityKind::Dash);
        }
        if *ctx.status == CharacterStatus::Dash {
            ctx.status.stop();
        }
        debug!("Dash finished after {:.3}", self.moved);
    }

    fn complete_one_shot(&mut self, ctx: &mut AbilityContext, phase: DashPhase) {
        match phase {
            DashPhase::Start => self.enter_travel(ctx),
            DashPhase::End => self.finish(ctx, true),
            _ => {}
        }
    }

    fn travel(&mut self, ctx: &mut AbilityContext) {
        self.elapsed += ctx.dt;
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        let progress = self.curve.evaluate(t);
        let delta = ((progress - self.progress) * self.distance).max(0.0);

        if delta > 0.0 {
            let direction = Vec2::new(self.direction, 0.0);
            let origin = ctx.body.position();
            let hits = ctx
                .probe
                .cast_character(origin, direction, delta + ctx.probe.skin());
            let allowed = ctx.probe.allowed_travel(&hits, delta);
            if allowed < delta {
                ctx.body.translate(direction * allowed);
                self.moved += allowed;
                debug!("Dash blocked after {:.3}", self.moved);
                self.enter_end(ctx);
                return;
            }
            ctx.body.translate(direction * delta);
            self.moved += delta;
        }
        ctx.body.set_velocity(Vec2::ZERO);
        self.progress = progress;

        if self.elapsed >= self.duration - TIME_EPSILON
            || self.moved >= self.distance - DISTANCE_EPSILON
        {
            self.enter_end(ctx);
        }
    }
}

impl Ability for DashAbility {
    fn kind(&self) -> AbilityKind {
        AbilityKind::Dash
    }

    fn is_active(&self) -> bool {
        self.phase != DashPhase::None
    }

    fn update(&mut self, ctx: &mut AbilityContext) {
        if let Some(content) = self.watch.changed() {
            self.apply_settings(&content.settings);
        }
        if !self.capability.enabled() || !self.is_active() {
            return;
        }

        if let Some(phase) = self.watchdog.poll(ctx.now) {
            if phase == self.phase {
                debug!(
                    "{}",
                    AbilityFault::AnimationEventTimeout {
                        ability: AbilityKind::Dash,
                        phase: format!("{:?}", phase),
                    }
                );
                self.complete_one_shot(ctx, phase);
            }
        }

        if self.phase == DashPhase::Travel {
            self.travel(ctx);
        }
    }

    fn cancel(&mut self, ctx: &mut AbilityContext, skip_exit_clip: bool, restore_physics: bool) {
        if !self.is_active() {
            return;
        }
        if !skip_exit_clip && self.phase == DashPhase::End {
            return;
        }
        self.watchdog.cancel();
        if skip_exit_clip || !ctx.animator.has_clip(CLIP_DASH_END) {
            self.finish(ctx, restore_physics);
        } else {
            self.enter_end(ctx);
        }
    }

    fn awaits_clip(&self, clip: &str) -> bool {
        match clip {
            CLIP_DASH => self.watchdog.awaits(DashPhase::Start),
            CLIP_DASH_END => self.watchdog.awaits(DashPhase::End),
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
        self.capability.disable(AbilityKind::Dash, capability);
    }
}
