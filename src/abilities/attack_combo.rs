//! Abilities domain: chained attack steps with a combo window between them.

use bevy::prelude::*;

use super::{
    Ability, AbilityContext, AbilityEvent, AbilityFault, Capability, Watchdog, one_shot_deadline,
};
use crate::content::{ComboTable, SettingsHandle, SettingsWatch};
use crate::core::{AbilityKind, CharacterStatus};

pub const CLIP_ATTACK_WAIT: &str = "attack_wait";
pub const CLIP_ATTACK_END: &str = "attack_end";

const ONE_SHOT_FALLBACK: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttackPhase {
    #[default]
    None,
    Strike,
    ComboWait,
    Recover,
}

/// Forward lunge that runs alongside a strike.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Lunge {
    distance: f32,
    duration: f32,
    elapsed: f32,
    moved: f32,
}

pub struct AttackComboAbility {
    watch: SettingsWatch,
    capability: Capability,
    phase: AttackPhase,
    table: ComboTable,
    index: Option<usize>,
    strike_clip: Option<String>,
    lunge: Option<Lunge>,
    watchdog: Watchdog<AttackPhase>,
}

impl AttackComboAbility {
    pub fn new(settings: &SettingsHandle) -> Self {
        let watch = settings.watch();
        let table = watch.current().combo.clone();
        Self {
            watch,
            capability: Capability::default(),
            phase: AttackPhase::None,
            table,
            index: None,
            strike_clip: None,
            lunge: None,
            watchdog: Watchdog::default(),
        }
    }

    pub fn phase(&self) -> AttackPhase {
        self.phase
    }

    pub fn combo_index(&self) -> Option<usize> {
        self.index
    }

    /// Handle an attack press: start a combo, advance it inside the combo
    /// window, or ignore the press.
    pub fn press(&mut self, ctx: &mut AbilityContext) -> bool {
        if !self.capability.enabled() {
            return false;
        }
        let count = self.table.len();
        if count == 0 {
            return false;
        }
        match *ctx.status {
            CharacterStatus::Attack | CharacterStatus::Dead | CharacterStatus::Damage => {
                debug!(
                    "{}",
                    AbilityFault::InvalidTransition {
                        ability: AbilityKind::Attack,
                        status: *ctx.status,
                    }
                );
                return false;
            }
            _ => {}
        }

        let in_window = self.phase == AttackPhase::ComboWait;
        let next = if count > 1 {
            match self.index {
                Some(last) if last + 1 >= count && self.is_active() => return false,
                Some(current) if in_window => current + 1,
                _ => 0,
            }
        } else if in_window {
            return false;
        } else {
            0
        };

        self.watchdog.cancel();
        self.strike(ctx, next);
        true
    }

    fn strike(&mut self, ctx: &mut AbilityContext, index: usize) {
        let Some(step) = self.table.step(index).cloned() else {
            return;
        };
        self.index = Some(index);
        self.phase = AttackPhase::Strike;
        ctx.status.set(CharacterStatus::Attack);
        ctx.body.set_velocity_x(0.0);

        let duration = ctx
            .animator
            .clip_duration(&step.clip)
            .unwrap_or(ONE_SHOT_FALLBACK);
        if let Some(affect_id) = step.affect_id {
            ctx.events.push(AbilityEvent::AffectTriggered {
                affect_id,
                duration,
            });
        }

        let lunge_time = duration * step.forward_time_fraction.clamp(0.0, 1.0);
        self.lunge = (step.forward_distance.abs() > f32::EPSILON && lunge_time > 0.0).then(|| {
            Lunge {
                distance: step.forward_distance * ctx.facing.sign(),
                duration: lunge_time,
                elapsed: 0.0,
                moved: 0.0,
            }
        });

        debug!("Attack step {} ({})", index, step.clip);
        if ctx.play_if_present(&step.clip) {
            let deadline = one_shot_deadline(ctx, &step.clip, ONE_SHOT_FALLBACK);
            self.watchdog.arm(AttackPhase::Strike, deadline);
            self.strike_clip = Some(step.clip);
        } else {
            self.strike_clip = None;
            self.lunge = None;
            self.enter_combo_wait(ctx);
        }
    }

    fn enter_combo_wait(&mut self, ctx: &mut AbilityContext) {
        self.lunge = None;
        let wait = self
            .index
            .and_then(|i| self.table.step(i))
            .map_or(0.0, |step| step.wait_time);
        if wait <= 0.0 {
            self.enter_recover(ctx);
            return;
        }
        self.phase = AttackPhase::ComboWait;
        ctx.status.set(CharacterStatus::AttackComboWait);
        ctx.play_if_present(CLIP_ATTACK_WAIT);
        self.watchdog.arm(AttackPhase::ComboWait, ctx.now + wait);
    }

    fn enter_recover(&mut self, ctx: &mut AbilityContext) {
        self.lunge = None;
        if ctx.play_if_present(CLIP_ATTACK_END) {
            self.phase = AttackPhase::Recover;
            ctx.status.set(CharacterStatus::AttackComboWait);
            let deadline = one_shot_deadline(ctx, CLIP_ATTACK_END, ONE_SHOT_FALLBACK);
            self.watchdog.arm(AttackPhase::Recover, deadline);
        } else {
            self.finish(ctx);
        }
    }

    fn finish(&mut self, ctx: &mut AbilityContext) {
        self.phase = AttackPhase::None;
        self.watchdog.cancel();
        self.index = None;
        self.strike_clip = None;
        self.lunge = None;
        if ctx.status.is_attacking() {
            ctx.status.stop();
        }
        if let Some(content) = self.watch.changed() {
            self.table = content.combo.clone();
        }
    }

    fn complete_one_shot(&mut self, ctx: &mut AbilityContext, phase: AttackPhase) {
        match phase {
            AttackPhase::Strike => self.enter_combo_wait(ctx),
            AttackPhase::ComboWait => self.enter_recover(ctx),
            AttackPhase::Recover => self.finish(ctx),
            AttackPhase::None => {}
        }
    }

    fn advance_lunge(&mut self, ctx: &mut AbilityContext) {
        let Some(mut lunge) = self.lunge else {
            return;
        };
        lunge.elapsed += ctx.dt;
        let t = (lunge.elapsed / lunge.duration).clamp(0.0, 1.0);
        let delta = lunge.distance * t - lunge.moved;

        if delta.abs() > f32::EPSILON {
            let direction = Vec2::new(delta.signum(), 0.0);
            let origin = ctx.body.position();
            let hits = ctx
                .probe
                .cast_character(origin, direction, delta.abs() + ctx.probe.skin());
            let allowed = ctx.probe.allowed_travel(&hits, delta.abs());
            if allowed < delta.abs() {
                ctx.body.translate(direction * allowed);
                self.lunge = None;
                return;
            }
            ctx.body.translate(Vec2::new(delta, 0.0));
            lunge.moved += delta;
        }
        self.lunge = (t < 1.0).then_some(lunge);
    }
}

impl Ability for AttackComboAbility {
    fn kind(&self) -> AbilityKind {
        AbilityKind::Attack
    }

    fn is_active(&self) -> bool {
        self.phase != AttackPhase::None
    }

    fn update(&mut self, ctx: &mut AbilityContext) {
        if !self.is_active() {
            if let Some(content) = self.watch.changed() {
                self.table = content.combo.clone();
            }
            return;
        }
        if !self.capability.enabled() {
            return;
        }

        if self.phase == AttackPhase::Strike {
            self.advance_lunge(ctx);
        }

        if let Some(phase) = self.watchdog.poll(ctx.now) {
            if phase == self.phase {
                if phase != AttackPhase::ComboWait {
                    debug!(
                        "{}",
                        AbilityFault::AnimationEventTimeout {
                            ability: AbilityKind::Attack,
                            phase: format!("{:?}", phase),
                        }
                    );
                }
                self.complete_one_shot(ctx, phase);
            }
        }
    }

    fn cancel(&mut self, ctx: &mut AbilityContext, skip_exit_clip: bool, _restore_physics: bool) {
        if !self.is_active() {
            return;
        }
        if !skip_exit_clip && self.phase == AttackPhase::Recover {
            return;
        }
        self.watchdog.cancel();
        self.lunge = None;
        if skip_exit_clip {
            self.finish(ctx);
        } else {
            self.enter_recover(ctx);
        }
    }

    fn awaits_clip(&self, clip: &str) -> bool {
        match self.phase {
            AttackPhase::Strike => {
                self.strike_clip.as_deref() == Some(clip)
                    && self.watchdog.awaits(AttackPhase::Strike)
            }
            AttackPhase::Recover => {
                clip == CLIP_ATTACK_END && self.watchdog.awaits(AttackPhase::Recover)
            }
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
        self.capability.disable(AbilityKind::Attack, capability);
    }
}
