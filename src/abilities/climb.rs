//! Abilities domain: ladder climbing.
//!
//! The body is switched to kinematic with zero gravity while on the ladder
//! and moved by position writes. Leaving at the top, the bottom or the side
//! plays the matching exit clip before physics comes back.

use bevy::prelude::*;

use super::{
    Ability, AbilityContext, AbilityEvent, AbilityFault, Capability, Watchdog, one_shot_deadline,
};
use crate::content::{ActionSettings, SettingsHandle, SettingsWatch};
use crate::core::{AbilityKind, CharacterStatus};
use crate::interaction::InteractableId;
use crate::movement::{BodyMode, INPUT_DEADZONE};

pub const CLIP_CLIMB: &str = "climb";
pub const CLIP_CLIMB_WAIT: &str = "climb_wait";
pub const CLIP_CLIMB_UP: &str = "climb_up";
pub const CLIP_CLIMB_DOWN: &str = "climb_down";
pub const CLIP_CLIMB_END: &str = "climb_end";
pub const CLIP_CLIMB_START_BOTTOM: &str = "climb_start_bottom";
pub const CLIP_CLIMB_START_TOP: &str = "climb_start_top";
pub const CLIP_CLIMB_END_BOTTOM: &str = "climb_end_bottom";
pub const CLIP_CLIMB_END_TOP: &str = "climb_end_top";
pub const CLIP_CLIMB_END_SIDE: &str = "climb_end_side";

const ONE_SHOT_FALLBACK: f32 = 0.25;

/// A ladder as seen by the climb ability.
#[derive(Debug, Clone, PartialEq)]
pub struct LadderSpec {
    pub id: InteractableId,
    /// World-space extent of the climbable area.
    pub bounds: Rect,
    /// Distance below the top edge that counts as arriving at the top.
    pub top_exit_snap: f32,
    /// Distance above the bottom edge that counts as arriving at the bottom.
    pub bottom_exit_snap: f32,
    /// Per-ladder speed multiplier.
    pub speed: f32,
}

impl LadderSpec {
    pub fn new(id: InteractableId, bounds: Rect) -> Self {
        Self {
            id,
            bounds,
            top_exit_snap: 0.2,
            bottom_exit_snap: 0.2,
            speed: 1.0,
        }
    }

    pub fn top_exit_y(&self) -> f32 {
        self.bounds.max.y - self.top_exit_snap
    }

    pub fn bottom_exit_y(&self) -> f32 {
        self.bounds.min.y + self.bottom_exit_snap
    }

    /// Height of the character's feet after leaving over the top.
    pub fn top_landing_y(&self) -> f32 {
        self.bounds.max.y + self.top_exit_snap
    }

    /// Height of the character's feet after stepping off the bottom.
    pub fn bottom_landing_y(&self) -> f32 {
        self.bounds.min.y
    }

    /// Band around the ladder's middle used to classify the entry side.
    fn near_threshold(&self) -> f32 {
        (self.bounds.height() * 0.15).max(0.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClimbPhase {
    #[default]
    None,
    Enter,
    Wait,
    Up,
    Down,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClimbExit {
    #[default]
    Default,
    Top,
    Bottom,
    Side,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntrySide {
    Bottom,
    Top,
    Middle,
}

pub struct ClimbAbility {
    watch: SettingsWatch,
    capability: Capability,
    phase: ClimbPhase,
    ladder: Option<LadderSpec>,
    climb_speed: f32,
    can_move_side: bool,
    entry: EntrySide,
    exit: ClimbExit,
    saved_velocity: Vec2,
    enter_clip: &'static str,
    exit_clip: Option<&'static str>,
    watchdog: Watchdog<ClimbPhase>,
}

impl ClimbAbility {
    pub fn new(settings: &SettingsHandle) -> Self {
        let watch = settings.watch();
        let content = watch.current();
        let mut climb = Self {
            watch,
            capability: Capability::default(),
            phase: ClimbPhase::None,
            ladder: None,
            climb_speed: 0.0,
            can_move_side: false,
            entry: EntrySide::Middle,
            exit: ClimbExit::Default,
            saved_velocity: Vec2::ZERO,
            enter_clip: CLIP_CLIMB,
            exit_clip: None,
            watchdog: Watchdog::default(),
        };
        climb.apply_settings(&content.settings);
        climb
    }

    pub fn apply_settings(&mut self, settings: &ActionSettings) {
        self.climb_speed = settings.move_speed * settings.climb_speed;
        self.can_move_side = settings.can_move_side_while_climbing;
    }

    pub fn phase(&self) -> ClimbPhase {
        self.phase
    }

    pub fn ladder(&self) -> Option<InteractableId> {
        self.ladder.as_ref().map(|l| l.id)
    }

    pub fn begin(&mut self, ctx: &mut AbilityContext, ladder: &LadderSpec) -> bool {
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
                    ability: AbilityKind::Climb,
                    status: *ctx.status,
                }
            );
            return false;
        }
        if !ctx.physics.claim(AbilityKind::Climb, &*ctx.body) {
            return false;
        }

        self.saved_velocity = ctx.body.velocity();
        ctx.body.set_gravity_scale(0.0);
        ctx.body.set_velocity(Vec2::ZERO);
        ctx.body.set_mode(BodyMode::Kinematic);

        let position = ctx.body.position();
        self.entry = classify_entry(ladder, position.y);
        ctx.body
            .move_position(Vec2::new(ladder.bounds.center().x, position.y));
        ctx.status.set(CharacterStatus::Climb);

        self.ladder = Some(ladder.clone());
        self.exit = ClimbExit::Default;
        debug!("Climb started on {:?} from {:?}", ladder.id, self.entry);
        self.enter_enter(ctx);
        true
    }

    /// Leave the ladder right away, as when interact is pressed again.
    pub fn end(&mut self, ctx: &mut AbilityContext) {
        self.exit = ClimbExit::Default;
        self.cancel(ctx, true, true);
    }

    fn enter_enter(&mut self, ctx: &mut AbilityContext) {
        self.phase = ClimbPhase::Enter;
        let sided = match self.entry {
            EntrySide::Bottom => Some(CLIP_CLIMB_START_BOTTOM),
            EntrySide::Top => Some(CLIP_CLIMB_START_TOP),
            EntrySide::Middle => None,
        };
        let clip = sided
            .filter(|clip| ctx.animator.has_clip(clip))
            .unwrap_or(CLIP_CLIMB);
        if ctx.play_if_present(clip) {
            self.enter_clip = clip;
            let deadline = one_shot_deadline(ctx, clip, ONE_SHOT_FALLBACK);
            self.watchdog.arm(ClimbPhase::Enter, deadline);
        } else {
            self.enter_loop(ctx, ClimbPhase::Wait);
        }
    }

    fn enter_loop(&mut self, ctx: &mut AbilityContext, phase: ClimbPhase) {
        self.phase = phase;
        let clip = match phase {
            ClimbPhase::Up => CLIP_CLIMB_UP,
            ClimbPhase::Down => CLIP_CLIMB_DOWN,
            _ => CLIP_CLIMB_WAIT,
        };
        ctx.play_if_present(clip);
    }

    fn exit_clip_for(&self, ctx: &AbilityContext) -> Option<&'static str> {
        let candidates: &[&'static str] = match self.exit {
            ClimbExit::Top => &[CLIP_CLIMB_END_TOP, CLIP_CLIMB_END],
            ClimbExit::Bottom => &[CLIP_CLIMB_END_BOTTOM, CLIP_CLIMB_END],
            ClimbExit::Side => &[CLIP_CLIMB_END_SIDE],
            ClimbExit::Default => &[CLIP_CLIMB_END],
        };
        candidates
            .iter()
            .copied()
            .find(|clip| ctx.animator.has_clip(clip))
    }

    fn enter_end(&mut self, ctx: &mut AbilityContext, exit: ClimbExit) {
        self.exit = exit;
        match self.exit_clip_for(ctx) {
            Some(clip) => {
                self.phase = ClimbPhase::End;
                self.exit_clip = Some(clip);
                ctx.animator.play_clip(clip);
                let deadline = one_shot_deadline(ctx, clip, ONE_SHOT_FALLBACK);
                self.watchdog.arm(ClimbPhase::End, deadline);
            }
            None => self.finish(ctx, true),
        }
    }

    fn finish(&mut self, ctx: &mut AbilityContext, restore_physics: bool) {
        self.phase = ClimbPhase::None;
        self.watchdog.cancel();
        self.exit_clip = None;
        let ladder = self.ladder.take();

        if let Some(ladder) = &ladder {
            let feet = match self.exit {
                ClimbExit::Top => Some(ladder.top_landing_y()),
                ClimbExit::Bottom => Some(ladder.bottom_landing_y()),
                _ => None,
            };
            if let Some(feet) = feet {
                let x = ctx.body.position().x;
                ctx.body
                    .move_position(Vec2::new(x, feet + ctx.body.half_extents().y));
            }
        }
        if restore_physics {
            ctx.physics.restore(AbilityKind::Climb, ctx.body);
            ctx.body.set_velocity(self.saved_velocity);
        } else {
            ctx.physics.release(AbilityKind::Climb);
        }
        self.exit = ClimbExit::Default;
        if *ctx.status == CharacterStatus::Climb {
            ctx.status.stop();
        }
        if let Some(ladder) = ladder {
            debug!("Climb ended on {:?}", ladder.id);
            ctx.events.push(AbilityEvent::InteractionEnded {
                candidate: ladder.id,
                ability: AbilityKind::Climb,
            });
        }
    }

    fn complete_one_shot(&mut self, ctx: &mut AbilityContext, phase: ClimbPhase) {
        match phase {
            ClimbPhase::Enter => self.enter_loop(ctx, ClimbPhase::Wait),
            ClimbPhase::End => self.finish(ctx, true),
            _ => {}
        }
    }

    fn step(&mut self, ctx: &mut AbilityContext) {
        if !matches!(
            self.phase,
            ClimbPhase::Wait | ClimbPhase::Up | ClimbPhase::Down
        ) {
            return;
        }
        let Some(ladder) = self.ladder.as_ref() else {
            return;
        };
        let vertical = ctx.axis.y;
        let horizontal = if self.can_move_side { ctx.axis.x } else { 0.0 };
        let step = self.climb_speed * ladder.speed * ctx.dt;
        let top = ladder.top_exit_y();
        let bottom = ladder.bottom_exit_y();
        let floor = ladder.bottom_landing_y();
        let (left, right) = (ladder.bounds.min.x, ladder.bounds.max.x);

        let position = ctx.body.position();
        if horizontal.abs() > INPUT_DEADZONE {
            let next_x = position.x + horizontal * step;
            if next_x < left || next_x > right {
                self.enter_end(ctx, ClimbExit::Side);
                return;
            }
            ctx.body.move_position(Vec2::new(next_x, position.y));
        }

        // Top is judged by the body's centre, bottom by its feet.
        let feet = position.y - ctx.body.half_extents().y;
        if vertical > INPUT_DEADZONE {
            if position.y >= top {
                self.enter_end(ctx, ClimbExit::Top);
                return;
            }
            if self.phase != ClimbPhase::Up {
                self.enter_loop(ctx, ClimbPhase::Up);
            }
            ctx.body.translate(Vec2::new(0.0, vertical * step));
        } else if vertical < -INPUT_DEADZONE {
            if feet <= bottom {
                self.enter_end(ctx, ClimbExit::Bottom);
                return;
            }
            if self.phase != ClimbPhase::Down {
                self.enter_loop(ctx, ClimbPhase::Down);
            }
            let dy = (vertical * step).max(floor - feet);
            ctx.body.translate(Vec2::new(0.0, dy));
        } else if self.phase != ClimbPhase::Wait {
            self.enter_loop(ctx, ClimbPhase::Wait);
        }
    }
}

fn classify_entry(ladder: &LadderSpec, y: f32) -> EntrySide {
    let near = ladder.near_threshold();
    if y <= ladder.bounds.min.y + near {
        EntrySide::Bottom
    } else if y >= ladder.bounds.max.y - near {
        EntrySide::Top
    } else {
        EntrySide::Middle
    }
}

impl Ability for ClimbAbility {
    fn kind(&self) -> AbilityKind {
        AbilityKind::Climb
    }

    fn is_active(&self) -> bool {
        self.phase != ClimbPhase::None
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
                        ability: AbilityKind::Climb,
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
        if !skip_exit_clip && self.phase == ClimbPhase::End {
            return;
        }
        self.watchdog.cancel();
        if skip_exit_clip {
            self.finish(ctx, restore_physics);
        } else {
            self.enter_end(ctx, ClimbExit::Default);
        }
    }

    fn awaits_clip(&self, clip: &str) -> bool {
        match self.phase {
            ClimbPhase::Enter => clip == self.enter_clip && self.watchdog.awaits(ClimbPhase::Enter),
            ClimbPhase::End => {
                self.exit_clip == Some(clip) && self.watchdog.awaits(ClimbPhase::End)
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
        self.capability.disable(AbilityKind::Climb, capability);
    }
}
