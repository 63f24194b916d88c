//! Arbitration domain: the per-character coordinator that owns the five
//! abilities, gates requests through the permission matrix and drives
//! locomotion between them.

use bevy::prelude::*;

use crate::abilities::{
    Ability, AbilityContext, AbilityEvent, AttackComboAbility, ClimbAbility, DashAbility,
    JumpAbility, LadderSpec, PhysicsOverride, PushPullAbility, PushTargetSpec,
};
use crate::content::{GameContent, PermissionMatrix, SettingsHandle, SettingsWatch};
use crate::core::{AbilityKind, CharacterStatus};
use crate::interaction::{Candidate, Interactable, InteractableId, InteractionActor, select_best};
use crate::movement::{
    ActionInput, CharacterBody, Facing, INPUT_DEADZONE, KinematicProbe, LocomotionTuning,
    TargetBodies, air_control, drive,
};
use crate::sprites::ClipPlayer;

/// Why a request did not start its ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDenied {
    Dead,
    Busy(CharacterStatus),
    ConflictDenied {
        requested: AbilityKind,
        active: AbilityKind,
    },
    /// The ability itself refused to begin.
    Rejected(AbilityKind),
    NoCandidate,
}

impl std::fmt::Display for RequestDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestDenied::Dead => write!(f, "character is dead"),
            RequestDenied::Busy(status) => write!(f, "character is busy ({:?})", status),
            RequestDenied::ConflictDenied { requested, active } => {
                write!(f, "{} is not allowed while {} is active", requested, active)
            }
            RequestDenied::Rejected(kind) => write!(f, "{} refused to begin", kind),
            RequestDenied::NoCandidate => write!(f, "nothing to interact with"),
        }
    }
}

/// The five abilities of one character.
pub struct AbilitySet {
    pub jump: JumpAbility,
    pub dash: DashAbility,
    pub climb: ClimbAbility,
    pub push_pull: PushPullAbility,
    pub attack: AttackComboAbility,
}

impl AbilitySet {
    pub fn new(settings: &SettingsHandle) -> Self {
        let dash = DashAbility::new(settings);
        let mut jump = JumpAbility::new(settings);
        jump.set_dash_active_query(dash.activity_flag());
        Self {
            jump,
            dash,
            climb: ClimbAbility::new(settings),
            push_pull: PushPullAbility::new(settings),
            attack: AttackComboAbility::new(settings),
        }
    }

    pub fn get(&self, kind: AbilityKind) -> &dyn Ability {
        match kind {
            AbilityKind::Jump => &self.jump,
            AbilityKind::Dash => &self.dash,
            AbilityKind::Climb => &self.climb,
            AbilityKind::PushPull => &self.push_pull,
            AbilityKind::Attack => &self.attack,
        }
    }

    fn get_mut(&mut self, kind: AbilityKind) -> &mut dyn Ability {
        match kind {
            AbilityKind::Jump => &mut self.jump,
            AbilityKind::Dash => &mut self.dash,
            AbilityKind::Climb => &mut self.climb,
            AbilityKind::PushPull => &mut self.push_pull,
            AbilityKind::Attack => &mut self.attack,
        }
    }

    fn all_mut(&mut self) -> [&mut dyn Ability; 5] {
        [
            &mut self.jump,
            &mut self.dash,
            &mut self.climb,
            &mut self.push_pull,
            &mut self.attack,
        ]
    }

    /// Kinds of the abilities currently running.
    pub fn active(&self) -> Vec<AbilityKind> {
        AbilityKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_active())
            .collect()
    }
}

/// The character's collaborators for one coordinator call.
pub struct TickEnv<'a> {
    pub body: &'a mut dyn CharacterBody,
    pub probe: &'a dyn KinematicProbe,
    pub animator: &'a mut dyn ClipPlayer,
    pub targets: &'a mut dyn TargetBodies,
    pub status: &'a mut CharacterStatus,
    pub facing: &'a mut Facing,
    pub axis: Vec2,
    pub now: f32,
    pub dt: f32,
}

fn context<'b>(
    env: &'b mut TickEnv<'_>,
    physics: &'b mut PhysicsOverride,
    events: &'b mut Vec<AbilityEvent>,
) -> AbilityContext<'b> {
    AbilityContext {
        body: &mut *env.body,
        probe: env.probe,
        animator: &mut *env.animator,
        targets: &mut *env.targets,
        status: &mut *env.status,
        facing: &mut *env.facing,
        physics,
        events,
        axis: env.axis,
        now: env.now,
        dt: env.dt,
    }
}

/// Owns and arbitrates the abilities of a single character.
#[derive(Component)]
pub struct AbilityCoordinator {
    abilities: AbilitySet,
    physics: PhysicsOverride,
    events: Vec<AbilityEvent>,
    watch: SettingsWatch,
    permissions: PermissionMatrix,
    locomotion: LocomotionTuning,
    /// The interaction the character is currently engaged in.
    engaged: Option<(InteractableId, AbilityKind)>,
}

impl AbilityCoordinator {
    pub fn new(settings: &SettingsHandle) -> Self {
        let watch = settings.watch();
        let content = watch.current();
        let mut coordinator = Self {
            abilities: AbilitySet::new(settings),
            physics: PhysicsOverride::default(),
            events: Vec::new(),
            watch,
            permissions: content.permissions,
            locomotion: LocomotionTuning {
                move_speed: 0.0,
                can_move_vertical: false,
            },
            engaged: None,
        };
        coordinator.apply_content(&content);
        coordinator
    }

    fn apply_content(&mut self, content: &GameContent) {
        self.permissions = content.permissions;
        self.locomotion = LocomotionTuning {
            move_speed: content.settings.move_speed,
            can_move_vertical: content.settings.can_move_vertical,
        };
    }

    pub fn abilities(&self) -> &AbilitySet {
        &self.abilities
    }

    pub fn physics(&self) -> &PhysicsOverride {
        &self.physics
    }

    pub fn engaged(&self) -> Option<(InteractableId, AbilityKind)> {
        self.engaged
    }

    /// One fixed step: update every ability, serve this tick's requests,
    /// run locomotion, then hand back the events published on the way.
    pub fn tick(
        &mut self,
        env: &mut TickEnv,
        input: &ActionInput,
        candidates: &[Candidate],
    ) -> Vec<AbilityEvent> {
        if let Some(content) = self.watch.changed() {
            self.apply_content(&content);
        }

        for ability in self.abilities.all_mut() {
            ability.update(&mut context(env, &mut self.physics, &mut self.events));
        }

        if !env.status.is_dead() {
            self.serve_requests(env, input, candidates);
            self.locomote(env);
        }

        self.physics.settle(&mut *env.body);
        self.drain_events()
    }

    fn serve_requests(&mut self, env: &mut TickEnv, input: &ActionInput, candidates: &[Candidate]) {
        let mut results = Vec::new();
        if input.attack_pressed {
            results.push(self.request_attack(env));
        }
        if input.jump_pressed {
            results.push(self.request_jump(env));
        }
        if input.dash_pressed {
            results.push(self.request_dash(env));
        }
        if input.interact_pressed {
            results.push(self.interact(env, candidates));
        }

        for denied in results.into_iter().filter_map(Result::err) {
            match denied {
                RequestDenied::ConflictDenied { .. } => warn!("Request dropped: {}", denied),
                _ => debug!("Request dropped: {}", denied),
            }
        }
    }

    fn locomote(&mut self, env: &mut TickEnv) {
        match *env.status {
            CharacterStatus::Idle | CharacterStatus::Run => {
                drive(
                    &mut *env.body,
                    &mut *env.status,
                    &mut *env.facing,
                    env.axis,
                    self.locomotion,
                );
            }
            CharacterStatus::Jump => {
                air_control(&mut *env.body, &mut *env.facing, env.axis, self.locomotion);
            }
            CharacterStatus::Dash => {
                let moving = env.axis.x.abs() > INPUT_DEADZONE;
                let grounded = env.probe.is_grounded(env.body.position());
                if self.permissions.move_while_dashing && moving && grounded {
                    debug!("Dash interrupted by movement");
                    self.abilities.dash.cancel(
                        &mut context(env, &mut self.physics, &mut self.events),
                        true,
                        true,
                    );
                    drive(
                        &mut *env.body,
                        &mut *env.status,
                        &mut *env.facing,
                        env.axis,
                        self.locomotion,
                    );
                }
            }
            _ => {}
        }
    }

    fn drain_events(&mut self) -> Vec<AbilityEvent> {
        for event in &self.events {
            if let AbilityEvent::InteractionEnded { candidate, .. } = event {
                let ended = self.engaged.is_some_and(|(id, kind)| {
                    id == *candidate && !self.abilities.get(kind).is_active()
                });
                if ended {
                    self.engaged = None;
                }
            }
        }
        std::mem::take(&mut self.events)
    }

    /// Make room for `requested`. Returns true when it is already running.
    fn clear_way(
        &mut self,
        env: &mut TickEnv,
        requested: AbilityKind,
    ) -> Result<bool, RequestDenied> {
        match *env.status {
            CharacterStatus::Dead => return Err(RequestDenied::Dead),
            CharacterStatus::Damage => return Err(RequestDenied::Busy(*env.status)),
            _ => {}
        }

        let active = self.abilities.active();
        if active.contains(&requested) {
            return Ok(true);
        }
        if let Some(blocking) = active
            .iter()
            .copied()
            .find(|b| !self.permissions.allows(requested, *b))
        {
            return Err(RequestDenied::ConflictDenied {
                requested,
                active: blocking,
            });
        }

        for other in active {
            // The automatic cliff fall never took the physics override.
            let restore = !(other == AbilityKind::Jump && self.abilities.jump.is_cliff_fall());
            debug!("{} cancels {}", requested, other);
            self.abilities.get_mut(other).cancel(
                &mut context(env, &mut self.physics, &mut self.events),
                true,
                restore,
            );
        }
        Ok(false)
    }

    pub fn request_jump(&mut self, env: &mut TickEnv) -> Result<(), RequestDenied> {
        if self.clear_way(env, AbilityKind::Jump)? {
            return Ok(());
        }
        let ctx = &mut context(env, &mut self.physics, &mut self.events);
        if self.abilities.jump.begin(ctx) {
            Ok(())
        } else {
            Err(RequestDenied::Rejected(AbilityKind::Jump))
        }
    }

    pub fn request_dash(&mut self, env: &mut TickEnv) -> Result<(), RequestDenied> {
        if self.clear_way(env, AbilityKind::Dash)? {
            return Ok(());
        }
        let ctx = &mut context(env, &mut self.physics, &mut self.events);
        if self.abilities.dash.begin(ctx) {
            Ok(())
        } else {
            Err(RequestDenied::Rejected(AbilityKind::Dash))
        }
    }

    /// Attack presses while attacking go to the combo logic.
    pub fn request_attack(&mut self, env: &mut TickEnv) -> Result<(), RequestDenied> {
        self.clear_way(env, AbilityKind::Attack)?;
        let ctx = &mut context(env, &mut self.physics, &mut self.events);
        if self.abilities.attack.press(ctx) {
            Ok(())
        } else {
            Err(RequestDenied::Rejected(AbilityKind::Attack))
        }
    }

    pub fn request_climb(
        &mut self,
        env: &mut TickEnv,
        ladder: &LadderSpec,
    ) -> Result<(), RequestDenied> {
        if self.clear_way(env, AbilityKind::Climb)? {
            return Ok(());
        }
        let ctx = &mut context(env, &mut self.physics, &mut self.events);
        if self.abilities.climb.begin(ctx, ladder) {
            self.engaged = Some((ladder.id, AbilityKind::Climb));
            Ok(())
        } else {
            Err(RequestDenied::Rejected(AbilityKind::Climb))
        }
    }

    pub fn request_push_pull(
        &mut self,
        env: &mut TickEnv,
        target: &PushTargetSpec,
    ) -> Result<(), RequestDenied> {
        if self.clear_way(env, AbilityKind::PushPull)? {
            return Ok(());
        }
        let ctx = &mut context(env, &mut self.physics, &mut self.events);
        if self.abilities.push_pull.begin(ctx, target) {
            self.engaged = Some((target.id, AbilityKind::PushPull));
            Ok(())
        } else {
            Err(RequestDenied::Rejected(AbilityKind::PushPull))
        }
    }

    /// Interact toggles: end the current interaction, or begin the best
    /// candidate in range.
    pub fn interact(
        &mut self,
        env: &mut TickEnv,
        candidates: &[Candidate],
    ) -> Result<(), RequestDenied> {
        let engaged = self
            .engaged
            .filter(|(_, kind)| self.abilities.get(*kind).is_active());
        if let Some((id, _)) = engaged {
            if let Some(candidate) = candidates.iter().find(|c| c.id() == id) {
                candidate.end_interact(&mut CoordinatorActor {
                    coordinator: self,
                    env,
                });
            } else {
                CoordinatorActor {
                    coordinator: self,
                    env,
                }
                .end_engaged();
            }
            return Ok(());
        }

        let mut actor = CoordinatorActor {
            coordinator: self,
            env,
        };
        let best = select_best(candidates, &actor).ok_or(RequestDenied::NoCandidate)?;
        debug!("Interacting with {:?}", best.id());
        if best.begin_interact(&mut actor) {
            Ok(())
        } else {
            Err(RequestDenied::Rejected(match best {
                Candidate::Ladder(_) => AbilityKind::Climb,
                Candidate::PushBox(_) => AbilityKind::PushPull,
            }))
        }
    }

    /// Route a clip-finished notice to the one ability waiting for it.
    pub fn on_clip_finished(&mut self, env: &mut TickEnv, clip: &str) -> bool {
        let Some(kind) = AbilityKind::ALL
            .into_iter()
            .find(|kind| self.abilities.get(*kind).awaits_clip(clip))
        else {
            return false;
        };
        self.abilities.get_mut(kind).on_clip_finished(
            &mut context(env, &mut self.physics, &mut self.events),
            clip,
        );
        true
    }

    /// Cancel everything without exit clips and mark the character dead.
    pub fn on_left_playable_area(&mut self, env: &mut TickEnv) {
        let restore_jump = !self.abilities.jump.is_cliff_fall();
        for kind in AbilityKind::ALL {
            let restore = kind != AbilityKind::Jump || restore_jump;
            self.abilities.get_mut(kind).cancel(
                &mut context(env, &mut self.physics, &mut self.events),
                true,
                restore,
            );
        }
        self.physics.settle(&mut *env.body);
        env.status.set(CharacterStatus::Dead);
        self.engaged = None;
        info!("Character left the playable area; all abilities cancelled");
    }

    /// Permanently disable every ability after a missing capability.
    pub fn disable_all(&mut self, capability: &'static str) {
        for ability in self.abilities.all_mut() {
            ability.disable(capability);
        }
    }
}

/// The coordinator seen from an interactable.
struct CoordinatorActor<'c, 'e, 'a> {
    coordinator: &'c mut AbilityCoordinator,
    env: &'e mut TickEnv<'a>,
}

impl CoordinatorActor<'_, '_, '_> {
    fn end_engaged(&mut self) {
        match self.coordinator.engaged {
            Some((id, AbilityKind::Climb)) => self.end_climb(id),
            Some((id, AbilityKind::PushPull)) => self.end_push_pull(id),
            _ => {}
        }
    }
}

impl InteractionActor for CoordinatorActor<'_, '_, '_> {
    fn position(&self) -> Vec2 {
        self.env.body.position()
    }

    fn try_begin_climb(&mut self, ladder: &LadderSpec) -> bool {
        self.coordinator.request_climb(self.env, ladder).is_ok()
    }

    fn end_climb(&mut self, ladder: InteractableId) {
        let coordinator = &mut *self.coordinator;
        if coordinator.abilities.climb.ladder() == Some(ladder) {
            coordinator.abilities.climb.end(&mut context(
                self.env,
                &mut coordinator.physics,
                &mut coordinator.events,
            ));
        }
    }

    fn try_begin_push_pull(&mut self, target: &PushTargetSpec) -> bool {
        self.coordinator.request_push_pull(self.env, target).is_ok()
    }

    fn end_push_pull(&mut self, target: InteractableId) {
        let coordinator = &mut *self.coordinator;
        if coordinator.abilities.push_pull.target() == Some(target) {
            coordinator.abilities.push_pull.end(&mut context(
                self.env,
                &mut coordinator.physics,
                &mut coordinator.events,
            ));
        }
    }
}
